//! 统一模型数据结构
//!
//! 定义 CPU 侧的模型容器。OBJ 网格与 IND_HAIR 头发都加载为同一种 [`Model`]，
//! 由 [`AttribCode`] 说明哪些顶点数组有效，由 [`ModelType`] 说明图元拓扑。
//!
//! # 架构说明
//!
//! - **CPU侧**: `Model` 只持有原始数组，不包含任何 GPU 资源
//! - **GPU侧**: 渲染器按 [`Model::vertex_layout`] 和 [`Model::draw_range`]
//!   自行创建并持有缓冲区，生命周期与渲染器绑定

use std::path::{Path, PathBuf};

use super::attrib::{AttribCode, VertexAttrib};
use super::loaders::{HairLoader, LoadOptions, ModelLoader, ObjLoader};
use super::vertex::ModelVertex;
use crate::core::error::{MeshLoadError, Result};
use crate::math::{Aabb, Matrix4, Point3, Vector3};

/// 图元重启索引
///
/// 头发模型在相邻发丝之间插入此值；顶点索引永远不会取到它。
pub const PRIMITIVE_RESTART_INDEX: u32 = u32::MAX;

/// 模型类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    /// 三角网格（OBJ）
    TriangleMesh,
    /// 头发（IND_HAIR），每根发丝是一条折线
    Hair,
}

/// 图元拓扑
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
    LineStrip,
}

impl ModelType {
    pub fn topology(self) -> PrimitiveTopology {
        match self {
            ModelType::TriangleMesh => PrimitiveTopology::TriangleList,
            ModelType::Hair => PrimitiveTopology::LineStrip,
        }
    }

    /// 绘制时需要开启的图元重启索引
    pub fn primitive_restart(self) -> Option<u32> {
        match self {
            ModelType::TriangleMesh => None,
            ModelType::Hair => Some(PRIMITIVE_RESTART_INDEX),
        }
    }
}

/// 材质
///
/// 纹理路径已经相对源文件所在目录解析完毕。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    pub name: String,

    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],

    /// map_Ka
    pub ambient_texture: Option<PathBuf>,
    /// map_Kd
    pub diffuse_texture: Option<PathBuf>,
    /// map_Ks
    pub specular_texture: Option<PathBuf>,
    /// map_bump / bump
    pub bump_texture: Option<PathBuf>,
    /// map_d
    pub alpha_texture: Option<PathBuf>,
}

/// 部件
///
/// 顶点数组与索引数组中各一段连续区间，对应一个源形状及其材质。
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub vstart: u32,
    pub vcount: u32,
    pub istart: u32,
    pub icount: u32,
    pub material: Material,
}

/// 单个部件的绘制参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRange {
    pub vstart: u32,
    pub vcount: u32,
    pub istart: u32,
    pub icount: u32,
    pub topology: PrimitiveTopology,
    pub primitive_restart: Option<u32>,
}

/// 顶点布局中的一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// 着色器属性槽位
    pub location: u32,
    pub attrib: VertexAttrib,
    /// 浮点分量个数
    pub components: u32,
    /// 字节步长
    pub stride: u32,
}

/// 并行顶点数组
///
/// 按属性掩码填充，未启用的数组保持为空。
#[derive(Debug, Clone, Default)]
pub struct VertexStreams {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub tangents: Vec<[f32; 3]>,
    pub bitangents: Vec<[f32; 3]>,
}

impl VertexStreams {
    /// 追加一个去重键中启用的字段
    pub fn push_vertex(&mut self, acode: AttribCode, vertex: &ModelVertex) {
        self.positions.push(vertex.position);
        if acode.contains(AttribCode::NORMAL) {
            self.normals.push(vertex.normal);
        }
        if acode.contains(AttribCode::UV) {
            self.uvs.push(vertex.texcoord);
        }
        if acode.contains(AttribCode::TANGENT) {
            self.tangents.push(vertex.tangent);
        }
        if acode.contains(AttribCode::BITANGENT) {
            self.bitangents.push(vertex.bitangent);
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn stream_len(&self, attrib: VertexAttrib) -> usize {
        match attrib {
            VertexAttrib::Position => self.positions.len(),
            VertexAttrib::Normal => self.normals.len(),
            VertexAttrib::Uv => self.uvs.len(),
            VertexAttrib::Tangent => self.tangents.len(),
            VertexAttrib::Bitangent => self.bitangents.len(),
        }
    }
}

/// 统一模型
///
/// 只能通过加载器创建。加载后可以修改局部变换，
/// 包围盒随之按角点近似更新。
#[derive(Debug, Clone)]
pub struct Model {
    pub(crate) name: Option<String>,
    pub(crate) streams: VertexStreams,
    pub(crate) indices: Vec<u32>,
    pub(crate) parts: Vec<Part>,
    pub(crate) acode: AttribCode,
    pub(crate) model_type: ModelType,
    pub(crate) bounds: Aabb,
    pub(crate) local_transform: Matrix4,
}

impl Model {
    /// 由加载器组装模型，包围盒由顶点位置计算
    pub(crate) fn assemble(
        name: Option<String>,
        model_type: ModelType,
        acode: AttribCode,
        streams: VertexStreams,
        indices: Vec<u32>,
        parts: Vec<Part>,
    ) -> Self {
        let bounds = Aabb::from_points(streams.positions.iter().copied());
        Self {
            name,
            streams,
            indices,
            parts,
            acode,
            model_type,
            bounds,
            local_transform: Matrix4::identity(),
        }
    }

    /// 加载 OBJ 文件
    ///
    /// `acode` 为 `None` 时使用 [`AttribCode::POS_NORM_UV`]；
    /// `placement` 为 `None` 或没有正尺寸时不做摆放。
    pub fn load_from_obj_file(
        path: impl AsRef<Path>,
        acode: Option<AttribCode>,
        placement: Option<Aabb>,
    ) -> Result<Model> {
        ObjLoader::load_from_file(path.as_ref(), &LoadOptions::new(acode, placement))
    }

    /// 加载 IND_HAIR 二进制头发文件
    ///
    /// `acode` 为 `None` 时使用 [`AttribCode::POS_TAN`]。
    pub fn load_from_ind_file(
        path: impl AsRef<Path>,
        acode: Option<AttribCode>,
        placement: Option<Aabb>,
    ) -> Result<Model> {
        HairLoader::load_from_file(path.as_ref(), &LoadOptions::new(acode, placement))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    pub fn attrib_code(&self) -> AttribCode {
        self.acode
    }

    pub fn num_verts(&self) -> usize {
        self.streams.positions.len()
    }

    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// 材质；越界返回 `None`
    pub fn material(&self, part_idx: usize) -> Option<&Material> {
        self.parts.get(part_idx).map(|p| &p.material)
    }

    fn stream<'a, T>(&'a self, bit: AttribCode, data: &'a [T]) -> Option<&'a [T]> {
        self.acode.contains(bit).then_some(data)
    }

    /// 位置数组（POSITION 位未设置时为 `None`）
    pub fn positions(&self) -> Option<&[[f32; 3]]> {
        self.stream(AttribCode::POSITION, &self.streams.positions)
    }

    pub fn normals(&self) -> Option<&[[f32; 3]]> {
        self.stream(AttribCode::NORMAL, &self.streams.normals)
    }

    pub fn uvs(&self) -> Option<&[[f32; 2]]> {
        self.stream(AttribCode::UV, &self.streams.uvs)
    }

    pub fn tangents(&self) -> Option<&[[f32; 3]]> {
        self.stream(AttribCode::TANGENT, &self.streams.tangents)
    }

    pub fn bitangents(&self) -> Option<&[[f32; 3]]> {
        self.stream(AttribCode::BITANGENT, &self.streams.bitangents)
    }

    /// 某个属性数组的原始字节，供渲染器原样上传
    pub fn attribute_bytes(&self, attrib: VertexAttrib) -> Option<&[u8]> {
        match attrib {
            VertexAttrib::Position => self.positions().map(bytemuck::cast_slice),
            VertexAttrib::Normal => self.normals().map(bytemuck::cast_slice),
            VertexAttrib::Uv => self.uvs().map(bytemuck::cast_slice),
            VertexAttrib::Tangent => self.tangents().map(bytemuck::cast_slice),
            VertexAttrib::Bitangent => self.bitangents().map(bytemuck::cast_slice),
        }
    }

    /// 索引数组的原始字节
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// 顶点布局
    ///
    /// 启用的属性按 位置、法线、UV、切线、副切线 的顺序依次占用槽位，
    /// 每个属性一个独立缓冲区。没有位置属性的组合无法构建网格。
    pub fn vertex_layout(&self) -> Result<Vec<VertexAttribute>> {
        if !self.acode.contains(AttribCode::POSITION) {
            return Err(MeshLoadError::UnsupportedAttributes {
                requested: self.acode,
                reason: "a GPU mesh needs the position stream".to_string(),
            }
            .into());
        }

        Ok(VertexAttrib::ALL
            .iter()
            .filter(|attrib| self.acode.contains(attrib.code()))
            .enumerate()
            .map(|(location, &attrib)| VertexAttribute {
                location: location as u32,
                attrib,
                components: attrib.components(),
                stride: attrib.components() * std::mem::size_of::<f32>() as u32,
            })
            .collect())
    }

    /// 某个部件的绘制参数
    pub fn draw_range(&self, part_idx: usize) -> Option<DrawRange> {
        self.parts.get(part_idx).map(|part| DrawRange {
            vstart: part.vstart,
            vcount: part.vcount,
            istart: part.istart,
            icount: part.icount,
            topology: self.model_type.topology(),
            primitive_restart: self.model_type.primitive_restart(),
        })
    }

    pub fn local_transform(&self) -> Matrix4 {
        self.local_transform
    }

    /// 设置局部变换并更新包围盒
    ///
    /// 只变换当前包围盒的八个角点，不重新遍历顶点，开销与顶点数无关。
    /// 旋转后得到的包围盒可能比真实包围盒大，且多次调用会累积放大；
    /// 需要紧包围盒时调用 [`Model::recompute_bounds`]。
    pub fn set_local_transform(&mut self, matrix: Matrix4) {
        self.local_transform = matrix;
        self.bounds = self.bounds.transformed_corners(&matrix);
    }

    /// 当前（可能已变换的）包围盒
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// 用当前局部变换逐个变换顶点，重新计算精确包围盒
    pub fn recompute_bounds(&mut self) -> Aabb {
        let matrix = self.local_transform;
        self.bounds = Aabb::from_points(
            self.streams
                .positions
                .iter()
                .map(|p| matrix.transform_point(&Point3::from(Vector3::from(*p))).coords),
        );
        self.bounds
    }

    /// 验证模型数据的有效性
    ///
    /// 检查：
    /// - 启用的属性数组长度与位置数组一致
    /// - 索引都在顶点范围内（头发模型允许图元重启索引）
    /// - 部件首尾相接，计数之和等于数组长度
    pub fn validate(&self) -> std::result::Result<(), String> {
        let vertex_count = self.streams.positions.len();

        for attrib in VertexAttrib::ALL {
            if self.acode.contains(attrib.code()) && self.streams.stream_len(attrib) != vertex_count {
                return Err(format!(
                    "属性 {:?} 的长度 {} 与顶点数 {} 不一致",
                    attrib,
                    self.streams.stream_len(attrib),
                    vertex_count
                ));
            }
        }

        let restart = self.model_type.primitive_restart();
        for (i, &index) in self.indices.iter().enumerate() {
            if Some(index) != restart && index as usize >= vertex_count {
                return Err(format!(
                    "索引 {} 处的值 {} 超出顶点范围 (共 {} 个顶点)",
                    i, index, vertex_count
                ));
            }
        }

        let (mut vnext, mut inext) = (0u32, 0u32);
        for (i, part) in self.parts.iter().enumerate() {
            if part.vstart != vnext || part.istart != inext {
                return Err(format!(
                    "部件 {} 不连续: vstart={}, istart={}, 期望 {}/{}",
                    i, part.vstart, part.istart, vnext, inext
                ));
            }
            vnext += part.vcount;
            inext += part.icount;
        }

        if vnext as usize != vertex_count || inext as usize != self.indices.len() {
            return Err(format!(
                "部件计数之和 ({}, {}) 与数组长度 ({}, {}) 不一致",
                vnext,
                inext,
                vertex_count,
                self.indices.len()
            ));
        }

        Ok(())
    }
}
