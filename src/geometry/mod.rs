//! 几何体加载和处理模块
//!
//! 把 OBJ 网格和 IND_HAIR 头发加载为统一的 [`Model`]。
//!
//! # 模块结构
//!
//! - `attrib`: 顶点属性位掩码
//! - `vertex`: 去重键定义
//! - `dedup`: 顶点去重
//! - `parts`: 部件划分
//! - `placement`: 摆放到目标包围盒
//! - `tangent`: 发丝切线估计
//! - `model`: 统一模型数据结构
//! - `loaders`: 各种格式的模型加载器
//!
//! # 架构设计
//!
//! ```text
//! 文件 (OBJ/IND)
//!     ↓
//! Loader (ObjLoader/HairLoader)
//!     ↓
//! 摆放 → 去重 / 部件划分 → 切线
//!     ↓
//! Model (CPU侧数据)
//!     ↓
//! Renderer (上传到GPU)
//! ```
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use strand_model::geometry::{AttribCode, Model};
//!
//! let model = Model::load_from_ind_file("hair.ind", Some(AttribCode::POS_TAN), None)?;
//!
//! println!("顶点数: {}", model.num_verts());
//! println!("部件数: {}", model.num_parts());
//!
//! # Ok::<(), strand_model::core::StrandModelError>(())
//! ```

pub mod attrib;
pub mod dedup;
pub mod loaders;
pub mod model;
pub mod parts;
pub mod placement;
pub mod tangent;
pub mod vertex;

// 重新导出常用类型
pub use attrib::{AttribCode, VertexAttrib};
pub use loaders::{load_model, LoadOptions, ModelLoader};
pub use model::{
    DrawRange, Material, Model, ModelType, Part, PrimitiveTopology, VertexAttribute,
    PRIMITIVE_RESTART_INDEX,
};
