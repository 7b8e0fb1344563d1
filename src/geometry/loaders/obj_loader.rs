//! OBJ 文件加载器
//!
//! 使用 tobj crate 解析 Wavefront OBJ / MTL 语法，再由本模块完成
//! 摆放、逐形状去重与部件划分。
//!
//! # 构建流程
//!
//! ```text
//! tobj 模型（同名相邻的合并为一个形状）
//!     ↓
//! 扁平位置数组 → 摆放到目标包围盒
//!     ↓
//! 每个形状: 开启部件 → 逐面角点构造去重键（fence = 形状序号）→ 去重
//!     ↓
//! 切线空间（按需）→ Model
//! ```

use std::path::Path;

use super::{model_name, LoadOptions, ModelLoader};
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::attrib::AttribCode;
use crate::geometry::dedup::VertexDeduplicator;
use crate::geometry::model::{Material, Model, ModelType, VertexStreams};
use crate::geometry::parts::PartSegmenter;
use crate::geometry::placement::fit_placement_flat;
use crate::geometry::vertex::ModelVertex;
use crate::math::geometry::compute_tangent_frames;

/// OBJ 格式加载器
///
/// 实现 `ModelLoader` trait。
///
/// # 特性
///
/// - 使用 tobj 解析，自动三角化，位置/法线/UV 各自独立索引
/// - 相同的面角点只生成一个顶点，不同形状之间不共享顶点
/// - 每个形状一个部件，材质取形状的第一个材质
/// - UV 保持文件中的原值，不做翻转
///
/// # 使用示例
///
/// ```rust,no_run
/// use strand_model::geometry::loaders::{LoadOptions, ModelLoader, ObjLoader};
/// use std::path::Path;
///
/// let model = ObjLoader::load_from_file(Path::new("model.obj"), &LoadOptions::default())?;
/// println!("加载了 {} 个顶点", model.num_verts());
/// # Ok::<(), strand_model::core::StrandModelError>(())
/// ```
pub struct ObjLoader;

/// 面角点，索引指向合并后的扁平数组
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: u32,
    normal: Option<u32>,
    texcoord: Option<u32>,
}

#[derive(Debug)]
struct ObjShape {
    name: String,
    material_id: Option<usize>,
    corners: Vec<Corner>,
}

/// 所有 tobj 模型拼接后的数据
#[derive(Debug, Default)]
struct ObjSource {
    positions: Vec<f32>,
    normals: Vec<f32>,
    texcoords: Vec<f32>,
    shapes: Vec<ObjShape>,
    missing_normals: bool,
    missing_texcoords: bool,
}

fn tobj_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

fn element_count(data: &[f32], width: usize) -> Result<u32> {
    u32::try_from(data.len() / width).map_err(|_| MeshLoadError::IndexOverflow.into())
}

fn fetch<const N: usize>(data: &[f32], index: u32, what: &str) -> Result<[f32; N]> {
    let start = index as usize * N;
    data.get(start..start + N)
        .and_then(|slice| <[f32; N]>::try_from(slice).ok())
        .ok_or_else(|| MeshLoadError::InvalidGeometry(format!("{} 索引 {} 越界", what, index)).into())
}

impl ObjSource {
    /// 拼接 tobj 模型，并把同名相邻的模型合并回一个形状
    ///
    /// tobj 在同一个组内遇到 `usemtl` 时会拆出一个同名模型。
    fn collect(models: Vec<tobj::Model>) -> Result<Self> {
        let mut source = ObjSource::default();

        for model in models {
            let mesh = model.mesh;
            // 没有面的模型（只有顶点或空文件）不构成形状
            if mesh.indices.is_empty() {
                continue;
            }

            let base_position = element_count(&source.positions, 3)?;
            let base_normal = element_count(&source.normals, 3)?;
            let base_texcoord = element_count(&source.texcoords, 2)?;

            let has_normals = !mesh.normal_indices.is_empty() && mesh.normal_indices.len() == mesh.indices.len();
            let has_texcoords =
                !mesh.texcoord_indices.is_empty() && mesh.texcoord_indices.len() == mesh.indices.len();
            source.missing_normals |= !has_normals;
            source.missing_texcoords |= !has_texcoords;

            let corners = mesh.indices.iter().enumerate().map(|(i, &position)| Corner {
                position: base_position + position,
                normal: has_normals.then(|| base_normal + mesh.normal_indices[i]),
                texcoord: has_texcoords.then(|| base_texcoord + mesh.texcoord_indices[i]),
            });

            match source.shapes.last_mut() {
                Some(shape) if shape.name == model.name => {
                    if shape.material_id.is_none() {
                        shape.material_id = mesh.material_id;
                    } else if mesh.material_id.is_some() && mesh.material_id != shape.material_id {
                        tracing::warn!(
                            shape = %shape.name,
                            "形状包含多个材质，仅使用第一个材质"
                        );
                    }
                    shape.corners.extend(corners);
                }
                _ => {
                    let shape = ObjShape {
                        name: model.name.clone(),
                        material_id: mesh.material_id,
                        corners: corners.collect(),
                    };
                    source.shapes.push(shape);
                }
            }

            source.positions.extend_from_slice(&mesh.positions);
            source.normals.extend_from_slice(&mesh.normals);
            source.texcoords.extend_from_slice(&mesh.texcoords);
        }

        Ok(source)
    }

    /// 构造去重键，只填充 `key_code` 中启用的字段
    fn vertex_key(&self, corner: &Corner, key_code: AttribCode, fence: u32) -> Result<ModelVertex> {
        let mut key = ModelVertex::with_fence(fence);
        key.position = fetch(&self.positions, corner.position, "位置")?;

        if key_code.contains(AttribCode::NORMAL) {
            if let Some(normal) = corner.normal {
                key.normal = fetch(&self.normals, normal, "法线")?;
            }
        }
        if key_code.contains(AttribCode::UV) {
            if let Some(texcoord) = corner.texcoord {
                key.texcoord = fetch(&self.texcoords, texcoord, "UV")?;
            }
        }

        Ok(key)
    }

    /// 检查请求的属性文件中是否都有
    fn check_attributes(&self, acode: AttribCode) -> Result<()> {
        let reject = |reason: &str| -> Result<()> {
            Err(MeshLoadError::UnsupportedAttributes {
                requested: acode,
                reason: reason.to_string(),
            }
            .into())
        };

        if !acode.contains(AttribCode::POSITION) {
            return reject("position is required to build a triangle mesh");
        }
        if acode.contains(AttribCode::NORMAL) && self.missing_normals {
            return reject("the file has faces without vertex normals");
        }
        let needs_uv = acode.intersects(AttribCode::UV | AttribCode::TANGENT | AttribCode::BITANGENT);
        if needs_uv && self.missing_texcoords {
            return reject("the file has faces without texture coordinates");
        }
        Ok(())
    }
}

/// MTL 材质转换，纹理路径相对 `base_dir` 解析
fn convert_material(material: &tobj::Material, base_dir: &Path) -> Material {
    let texture = |name: &Option<String>| name.as_deref().map(|t| base_dir.join(t));

    Material {
        name: material.name.clone(),
        ambient: material.ambient.unwrap_or_default(),
        diffuse: material.diffuse.unwrap_or_default(),
        specular: material.specular.unwrap_or_default(),
        ambient_texture: texture(&material.ambient_texture),
        diffuse_texture: texture(&material.diffuse_texture),
        specular_texture: texture(&material.specular_texture),
        bump_texture: texture(&material.normal_texture),
        alpha_texture: texture(&material.dissolve_texture),
    }
}

fn index_count(indices: &[u32]) -> Result<u32> {
    u32::try_from(indices.len()).map_err(|_| MeshLoadError::IndexOverflow.into())
}

impl ObjLoader {
    /// 从内存中的 OBJ 与可选 MTL 数据加载
    ///
    /// `mtllib` 指向的文件名被忽略，统一使用 `mtl`；没有 `mtl` 时材质库视为缺失。
    /// 纹理路径相对 `base_dir` 解析。
    pub fn load_from_buffers(
        obj: &[u8],
        mtl: Option<&[u8]>,
        base_dir: &Path,
        options: &LoadOptions,
    ) -> Result<Model> {
        let mut reader = obj;
        let (models, materials) = tobj::load_obj_buf(&mut reader, &tobj_options(), |_| {
            mtl.map_or(Err(tobj::LoadError::OpenFileFailed), |mut bytes| {
                tobj::load_mtl_buf(&mut bytes)
            })
        })
        .map_err(|e| MeshLoadError::ParseError(format!("tobj 解析失败: {}", e)))?;

        Self::build(models, materials, base_dir, options, None)
    }

    fn build(
        models: Vec<tobj::Model>,
        materials: std::result::Result<Vec<tobj::Material>, tobj::LoadError>,
        base_dir: &Path,
        options: &LoadOptions,
        name: Option<String>,
    ) -> Result<Model> {
        let materials = materials.unwrap_or_else(|e| {
            tracing::warn!("材质库加载失败，使用默认材质: {}", e);
            Vec::new()
        });

        let acode = options.attributes_or(AttribCode::POS_NORM_UV);
        let mut source = ObjSource::collect(models)?;
        if source.shapes.is_empty() {
            return Err(MeshLoadError::ValidationError("OBJ 文件不包含任何形状".to_string()).into());
        }
        source.check_attributes(acode)?;

        if let Some(target) = &options.placement {
            fit_placement_flat(&mut source.positions, target);
        }

        // 切线空间在去重之后由 UV 计算，键中只需要 UV，不需要切线本身
        let wants_frames = acode.intersects(AttribCode::TANGENT | AttribCode::BITANGENT);
        let mut key_code = acode - (AttribCode::TANGENT | AttribCode::BITANGENT);
        if wants_frames {
            key_code |= AttribCode::UV;
        }

        let corner_count: usize = source.shapes.iter().map(|s| s.corners.len()).sum();
        let mut streams = VertexStreams::default();
        let mut indices = Vec::with_capacity(corner_count);
        let mut dedup = VertexDeduplicator::with_capacity(key_code, corner_count / 2);
        let mut segmenter = PartSegmenter::with_capacity(source.shapes.len());

        for (fence, shape) in source.shapes.iter().enumerate() {
            let material = match shape.material_id {
                Some(id) => match materials.get(id) {
                    Some(m) => convert_material(m, base_dir),
                    None => {
                        tracing::warn!(shape = %shape.name, id, "材质索引越界，使用默认材质");
                        Material::default()
                    }
                },
                None => Material::default(),
            };
            segmenter.begin(material, streams.len() as u32, index_count(&indices)?);

            let fence = u32::try_from(fence).map_err(|_| MeshLoadError::IndexOverflow)?;
            for corner in &shape.corners {
                let key = source.vertex_key(corner, key_code, fence)?;
                indices.push(dedup.insert(key, &mut streams)?);
            }

            tracing::debug!(shape = %shape.name, corners = shape.corners.len(), "形状构建完成");
        }

        let parts = segmenter.finish(streams.len() as u32, index_count(&indices)?);

        if wants_frames {
            let normals = acode
                .contains(AttribCode::NORMAL)
                .then_some(streams.normals.as_slice());
            let frames = compute_tangent_frames(&streams.positions, &streams.uvs, normals, &indices);

            if acode.contains(AttribCode::TANGENT) {
                streams.tangents = frames.tangents;
            }
            if acode.contains(AttribCode::BITANGENT) {
                streams.bitangents = frames.bitangents;
            }
            if !acode.contains(AttribCode::UV) {
                streams.uvs = Vec::new();
            }
        }

        let model = Model::assemble(name, ModelType::TriangleMesh, acode, streams, indices, parts);

        model
            .validate()
            .map_err(MeshLoadError::ValidationError)?;

        tracing::info!(
            "成功加载 OBJ 文件: {} 个顶点, {} 个三角形, {} 个部件",
            model.num_verts(),
            model.indices().len() / 3,
            model.num_parts()
        );

        Ok(model)
    }
}

impl ModelLoader for ObjLoader {
    fn load_from_file(path: &Path, options: &LoadOptions) -> Result<Model> {
        let _span = tracing::info_span!("load_obj", path = %path.display()).entered();

        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let (models, materials) = tobj::load_obj(path, &tobj_options())
            .map_err(|e| MeshLoadError::ParseError(format!("tobj 解析失败: {}", e)))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::build(models, materials, base_dir, options, model_name(path))
    }

    fn load_from_memory(data: &[u8], options: &LoadOptions) -> Result<Model> {
        Self::load_from_buffers(data, None, Path::new(""), options)
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}
