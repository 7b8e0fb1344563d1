//! 模型加载器模块
//!
//! 提供统一的加载接口和各种格式的具体实现。
//!
//! # 支持的格式
//!
//! - **OBJ**: Wavefront OBJ + MTL（使用 tobj crate 解析语法）
//! - **IND**: IND_HAIR 二进制头发文件（流式读取）
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use strand_model::geometry::loaders::{load_model, LoadOptions};
//! use std::path::Path;
//!
//! let model = load_model(Path::new("hair.ind"), &LoadOptions::default())?;
//! println!("顶点数: {}", model.num_verts());
//! # Ok::<(), strand_model::core::StrandModelError>(())
//! ```

use std::path::Path;

use crate::core::error::{MeshLoadError, Result};
use crate::geometry::attrib::AttribCode;
use crate::geometry::model::Model;
use crate::math::Aabb;

pub mod hair_loader;
pub mod obj_loader;

pub use hair_loader::HairLoader;
pub use obj_loader::ObjLoader;

/// 加载选项
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// 需要的顶点属性；`None` 表示使用格式默认值
    pub attributes: Option<AttribCode>,

    /// 目标摆放包围盒；`None` 或没有正尺寸时保持原始坐标
    pub placement: Option<Aabb>,

    /// 严格模式：二进制文件末尾的多余字节视为错误
    pub strict: bool,
}

impl LoadOptions {
    pub fn new(attributes: Option<AttribCode>, placement: Option<Aabb>) -> Self {
        Self {
            attributes,
            placement,
            strict: false,
        }
    }

    pub fn with_attributes(mut self, attributes: AttribCode) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_placement(mut self, placement: Aabb) -> Self {
        self.placement = Some(placement);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// 实际使用的属性掩码
    pub(crate) fn attributes_or(&self, default: AttribCode) -> AttribCode {
        self.attributes.unwrap_or(default)
    }
}

/// 模型加载器 trait
///
/// 所有格式的加载器都实现此 trait。
///
/// # 实现要求
///
/// - 加载器是无状态的（使用静态方法），每次加载互不影响
/// - 返回 CPU 侧的 [`Model`]，不涉及 GPU 资源
/// - 结构性错误返回 `Err`，不返回不完整的模型
pub trait ModelLoader {
    /// 从文件路径加载模型
    ///
    /// # 错误
    ///
    /// - 文件不存在或无法读取
    /// - 文件格式错误或损坏
    /// - 请求的属性组合不受支持
    fn load_from_file(path: &Path, options: &LoadOptions) -> Result<Model>;

    /// 从内存数据加载模型
    fn load_from_memory(data: &[u8], options: &LoadOptions) -> Result<Model>;

    /// 支持的文件扩展名列表（小写，不含点号）
    fn supported_extensions() -> &'static [&'static str];
}

/// 根据文件扩展名选择合适的加载器
pub fn load_model(path: &Path, options: &LoadOptions) -> Result<Model> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| MeshLoadError::UnsupportedFormat("无法确定文件扩展名".to_string()))?;

    if ObjLoader::supported_extensions().contains(&extension.as_str()) {
        ObjLoader::load_from_file(path, options)
    } else if HairLoader::supported_extensions().contains(&extension.as_str()) {
        HairLoader::load_from_file(path, options)
    } else {
        Err(MeshLoadError::UnsupportedFormat(format!("不支持的文件格式: .{}", extension)).into())
    }
}

/// 模型名称取文件名（不含扩展名）
pub(crate) fn model_name(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
}
