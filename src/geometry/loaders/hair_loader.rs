//! IND_HAIR 二进制头发加载器
//!
//! 文件布局（小端序，无版本字段）：
//!
//! ```text
//! offset 0   : 8 字节 ASCII 魔数 "IND_HAIR"（不含 NUL）
//! offset 8   : u32 发丝数 F
//! offset 12  : u32 顶点总数 V
//! 重复 F 次:
//!   u32 点数 n
//!   n * (3 * f32)  位置 x, y, z
//! ```
//!
//! 所有发丝打包进同一个部件，相邻的有效发丝之间用图元重启索引分隔。

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::ops::Range;
use std::path::Path;

use super::{model_name, LoadOptions, ModelLoader};
use crate::core::error::{MeshLoadError, Result, StrandModelError};
use crate::geometry::attrib::AttribCode;
use crate::geometry::model::{Material, Model, ModelType, Part, VertexStreams, PRIMITIVE_RESTART_INDEX};
use crate::geometry::placement::fit_placement;
use crate::geometry::tangent::estimate_fiber_tangents;

/// 文件头魔数
pub const HAIR_MAGIC: [u8; 8] = *b"IND_HAIR";

/// 按文件头预分配的上限，避免损坏的计数导致巨量分配
const MAX_PREALLOC_VERTICES: usize = 1 << 20;

/// 头发模型支持的属性
const SUPPORTED_ATTRIBUTES: AttribCode = AttribCode::POS_TAN;

/// IND_HAIR 格式加载器
///
/// 实现 `ModelLoader` trait，流式读取发丝记录：
///
/// - 点数为 0 的发丝直接跳过
/// - 点数为 1 的发丝读出后丢弃（单点无法构成线段）
/// - 其余发丝的顶点依次追加，索引顺序递增
pub struct HairLoader;

/// 扫描结果（摆放与切线计算之前）
#[derive(Debug, Default)]
struct FiberScan {
    declared_fibers: u32,
    declared_vertices: u32,
    positions: Vec<[f32; 3]>,
    indices: Vec<u32>,
    /// 每根有效发丝的顶点范围
    fibers: Vec<Range<usize>>,
    /// 最后一条记录之后的字节数
    trailing_bytes: u64,
}

fn truncated(err: io::Error, context: impl FnOnce() -> String) -> StrandModelError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        MeshLoadError::Truncated { context: context() }.into()
    } else {
        err.into()
    }
}

fn read_u32<R: Read>(reader: &mut R, context: impl FnOnce() -> String) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(|e| truncated(e, context))?;
    Ok(u32::from_le_bytes(buf))
}

fn read_point<R: Read>(reader: &mut R, fiber: u32) -> Result<[f32; 3]> {
    let mut buf = [0u8; 12];
    reader
        .read_exact(&mut buf)
        .map_err(|e| truncated(e, || format!("positions of fiber {}", fiber)))?;

    let component = |i: usize| f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);
    Ok([component(0), component(4), component(8)])
}

/// 流式扫描全部发丝记录
fn scan_fibers<R: Read>(reader: &mut R) -> Result<FiberScan> {
    let mut magic = [0u8; 8];
    reader
        .read_exact(&mut magic)
        .map_err(|e| truncated(e, || "file header".to_string()))?;
    if magic != HAIR_MAGIC {
        return Err(MeshLoadError::InvalidMagic { found: magic }.into());
    }

    let declared_fibers = read_u32(reader, || "fiber count".to_string())?;
    let declared_vertices = read_u32(reader, || "vertex count".to_string())?;

    let reserve = (declared_vertices as usize).min(MAX_PREALLOC_VERTICES);
    let mut scan = FiberScan {
        declared_fibers,
        declared_vertices,
        positions: Vec::with_capacity(reserve),
        indices: Vec::with_capacity(reserve),
        ..Default::default()
    };

    for fiber in 0..declared_fibers {
        let point_count = read_u32(reader, || format!("point count of fiber {}", fiber))?;

        match point_count {
            0 => continue,
            1 => {
                read_point(reader, fiber)?;
                continue;
            }
            _ => {}
        }

        let start = scan.positions.len();
        let end = start + point_count as usize;
        if end >= PRIMITIVE_RESTART_INDEX as usize {
            return Err(MeshLoadError::IndexOverflow.into());
        }

        if !scan.fibers.is_empty() {
            scan.indices.push(PRIMITIVE_RESTART_INDEX);
        }

        for index in start..end {
            scan.positions.push(read_point(reader, fiber)?);
            scan.indices.push(index as u32);
        }
        scan.fibers.push(start..end);
    }

    scan.trailing_bytes = io::copy(reader, &mut io::sink())?;
    Ok(scan)
}

/// 对照文件头检查扫描结果
fn check_counts(scan: &FiberScan) -> Result<()> {
    let vertex_count = scan.positions.len() as u64;
    if vertex_count != scan.declared_vertices as u64 {
        return Err(MeshLoadError::CountMismatch {
            what: "vertex",
            expected: scan.declared_vertices as u64,
            actual: vertex_count,
        }
        .into());
    }

    // 有效发丝之间各一个分隔索引
    let separators = (scan.fibers.len() as u64).saturating_sub(1);
    let expected_indices = scan.declared_vertices as u64 + separators;
    if scan.indices.len() as u64 != expected_indices {
        return Err(MeshLoadError::CountMismatch {
            what: "index",
            expected: expected_indices,
            actual: scan.indices.len() as u64,
        }
        .into());
    }

    Ok(())
}

fn check_attributes(acode: AttribCode) -> Result<()> {
    if !acode.contains(AttribCode::POSITION) || !SUPPORTED_ATTRIBUTES.contains(acode) {
        return Err(MeshLoadError::UnsupportedAttributes {
            requested: acode,
            reason: "hair models provide position and tangent streams only".to_string(),
        }
        .into());
    }
    Ok(())
}

impl HairLoader {
    /// 从任意字节流加载
    pub fn load_from_reader<R: Read>(
        reader: &mut R,
        options: &LoadOptions,
        name: Option<String>,
    ) -> Result<Model> {
        let acode = options.attributes_or(AttribCode::POS_TAN);
        check_attributes(acode)?;

        let mut scan = scan_fibers(reader)?;
        check_counts(&scan)?;

        if scan.trailing_bytes > 0 {
            if options.strict {
                return Err(MeshLoadError::TrailingData { bytes: scan.trailing_bytes }.into());
            }
            tracing::warn!(bytes = scan.trailing_bytes, "头发文件末尾存在多余数据，已忽略");
        }

        tracing::debug!(
            declared_fibers = scan.declared_fibers,
            fibers = scan.fibers.len(),
            "发丝扫描完成"
        );

        if let Some(target) = &options.placement {
            fit_placement(&mut scan.positions, target);
        }

        let tangents = if acode.contains(AttribCode::TANGENT) {
            estimate_fiber_tangents(&scan.positions, &scan.fibers)
        } else {
            Vec::new()
        };

        let part = Part {
            vstart: 0,
            vcount: scan.positions.len() as u32,
            istart: 0,
            icount: scan.indices.len() as u32,
            material: Material::default(),
        };

        let streams = VertexStreams {
            positions: scan.positions,
            tangents,
            ..Default::default()
        };

        let model = Model::assemble(name, ModelType::Hair, acode, streams, scan.indices, vec![part]);

        model
            .validate()
            .map_err(MeshLoadError::ValidationError)?;

        tracing::info!(
            "成功加载头发: {} 根发丝, {} 个顶点, {} 个索引",
            scan.fibers.len(),
            model.num_verts(),
            model.indices().len()
        );

        Ok(model)
    }
}

impl ModelLoader for HairLoader {
    fn load_from_file(path: &Path, options: &LoadOptions) -> Result<Model> {
        let _span = tracing::info_span!("load_hair", path = %path.display()).entered();

        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let mut reader = BufReader::new(File::open(path)?);
        Self::load_from_reader(&mut reader, options, model_name(path))
    }

    fn load_from_memory(data: &[u8], options: &LoadOptions) -> Result<Model> {
        let mut reader = data;
        Self::load_from_reader(&mut reader, options, None)
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["ind"]
    }
}
