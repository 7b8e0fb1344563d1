//! strand_model - OBJ 网格与 IND_HAIR 头发模型加载库
//!
//! 把两种来源的几何数据构建为同一种 CPU 侧模型，供渲染器直接上传。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（日志、配置、场景、错误处理）
//! - `geometry`: 模型构建（去重、部件划分、摆放、切线、加载器）
//! - `math`: 数学类型与包围盒
//!
//! # 使用示例
//!
//! ```no_run
//! use strand_model::geometry::{AttribCode, Model};
//! use strand_model::math::{Aabb, Vector3};
//!
//! // 加载网格并摆放到以原点为中心、边长为 2 的包围盒中
//! let target = Aabb::from_center_size(Vector3::zeros(), Vector3::repeat(2.0));
//! let model = Model::load_from_obj_file("head.obj", Some(AttribCode::POS_NORM_UV), Some(target))?;
//!
//! for (i, part) in model.parts().iter().enumerate() {
//!     println!("部件 {}: {} 个索引, 材质 {}", i, part.icount, part.material.name);
//! }
//! # Ok::<(), strand_model::core::StrandModelError>(())
//! ```

pub mod core;
pub mod geometry;
pub mod math;
