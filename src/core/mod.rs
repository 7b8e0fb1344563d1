//! 核心功能模块
//!
//! 本模块提供加载器之外的基础设施：日志系统、配置管理和错误处理。
//!
//! # 模块组织
//!
//! - `log`：日志系统，基于 tracing 的结构化日志
//! - `config`：工具配置，支持从 TOML 文件加载并由命令行参数覆盖
//! - `scene`：场景配置，描述一次批量加载的模型列表
//! - `error`：错误处理，定义统一的错误类型

pub mod config;
pub mod error;
pub mod log;
pub mod scene;

// 重新导出常用类型，方便使用
pub use config::Config;
pub use error::{MeshLoadError, Result, StrandModelError};
pub use scene::{ModelEntry, SceneConfig, Transform};
