//! 顶点属性位掩码
//!
//! 决定模型中哪些并行数组有效，同时决定去重键比较哪些字段。

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// 顶点属性集合
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct AttribCode: u32 {
        /// 位置
        const POSITION = 1 << 0;
        /// 法线
        const NORMAL = 1 << 1;
        /// 纹理坐标
        const UV = 1 << 2;
        /// 切线
        const TANGENT = 1 << 3;
        /// 副切线
        const BITANGENT = 1 << 4;
    }
}

impl AttribCode {
    /// 三角网格的默认组合
    pub const POS_NORM_UV: AttribCode = AttribCode::POSITION
        .union(AttribCode::NORMAL)
        .union(AttribCode::UV);

    /// 头发模型的默认组合
    pub const POS_TAN: AttribCode = AttribCode::POSITION.union(AttribCode::TANGENT);

    /// 从属性名称列表构建
    pub fn from_attributes<'a, I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = &'a VertexAttrib>,
    {
        attributes
            .into_iter()
            .fold(AttribCode::empty(), |code, attr| code | attr.code())
    }
}

/// 单个顶点属性，同时也是配置文件中的属性名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexAttrib {
    Position,
    Normal,
    Uv,
    Tangent,
    Bitangent,
}

impl VertexAttrib {
    /// 按着色器槽位顺序排列的全部属性
    pub const ALL: [VertexAttrib; 5] = [
        VertexAttrib::Position,
        VertexAttrib::Normal,
        VertexAttrib::Uv,
        VertexAttrib::Tangent,
        VertexAttrib::Bitangent,
    ];

    pub fn code(self) -> AttribCode {
        match self {
            VertexAttrib::Position => AttribCode::POSITION,
            VertexAttrib::Normal => AttribCode::NORMAL,
            VertexAttrib::Uv => AttribCode::UV,
            VertexAttrib::Tangent => AttribCode::TANGENT,
            VertexAttrib::Bitangent => AttribCode::BITANGENT,
        }
    }

    /// 每个顶点的分量个数
    pub fn components(self) -> u32 {
        match self {
            VertexAttrib::Uv => 2,
            _ => 3,
        }
    }
}
