//! 去重键定义模块
//!
//! `ModelVertex` 只在构建阶段存在：每个面角点生成一个键，
//! 交给去重器查表后即被丢弃。

use std::hash::{Hash, Hasher};

/// 顶点去重键
///
/// 未启用的属性保持零值，因此总是相等，不影响比较结果。
/// `fence` 为形状序号，保证不同形状的顶点即使数值完全相同也不会合并。
///
/// 相等与哈希都基于浮点数的位模式，两者保持一致
/// （`0.0` 与 `-0.0` 视为不同，`NaN` 与自身相同）。
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
    pub texcoord: [f32; 2],
    pub fence: u32,
}

impl ModelVertex {
    /// 创建一个只带分隔值的空键
    pub fn with_fence(fence: u32) -> Self {
        Self {
            fence,
            ..Default::default()
        }
    }

    #[inline]
    fn float_bits(&self) -> impl Iterator<Item = u32> + '_ {
        self.position
            .iter()
            .chain(&self.normal)
            .chain(&self.tangent)
            .chain(&self.bitangent)
            .chain(&self.texcoord)
            .map(|f| f.to_bits())
    }
}

impl PartialEq for ModelVertex {
    fn eq(&self, other: &Self) -> bool {
        self.fence == other.fence && self.float_bits().eq(other.float_bits())
    }
}

impl Eq for ModelVertex {}

impl Hash for ModelVertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for bits in self.float_bits() {
            state.write_u32(bits);
        }
        state.write_u32(self.fence);
    }
}
