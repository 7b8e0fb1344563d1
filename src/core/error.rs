//! 错误处理模块
//!
//! 定义了模型加载流程中使用的统一错误类型。
//! 原先会直接终止进程的结构性错误（魔数错误、数据截断、计数不匹配等）
//! 在这里全部变成可匹配的错误值，由调用方决定是重试、跳过还是中止。
//!
//! # 设计原则
//!
//! - 为每种错误类型提供清晰的上下文信息
//! - 支持错误链（error source）
//! - 易于模式匹配和错误处理

use std::fmt;
use std::path::PathBuf;

use crate::geometry::attrib::AttribCode;

/// 统一的 Result 类型
///
/// 所有可能返回错误的函数都应该使用这个类型。
pub type Result<T> = std::result::Result<T, StrandModelError>;

/// 顶层错误类型
#[derive(Debug)]
pub enum StrandModelError {
    /// 配置错误
    Config(ConfigError),

    /// 模型加载错误
    MeshLoading(MeshLoadError),

    /// IO 错误
    Io(std::io::Error),

    /// 日志系统错误
    Log(String),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 模型加载相关的错误
#[derive(Debug)]
pub enum MeshLoadError {
    /// 文件不存在
    FileNotFound(PathBuf),

    /// 不支持的文件格式
    UnsupportedFormat(String),

    /// 解析失败（OBJ 语法错误等）
    ParseError(String),

    /// 数据验证失败
    ValidationError(String),

    /// 几何数据无效
    InvalidGeometry(String),

    /// 二进制文件头魔数不匹配
    InvalidMagic { found: [u8; 8] },

    /// 二进制数据流提前结束
    Truncated { context: String },

    /// 实际读出的数量与文件头声明的不一致
    CountMismatch {
        what: &'static str,
        expected: u64,
        actual: u64,
    },

    /// 最后一条记录之后仍有多余字节（严格模式）
    TrailingData { bytes: u64 },

    /// 请求了当前格式或网格构建器不支持的属性组合
    UnsupportedAttributes { requested: AttribCode, reason: String },

    /// 顶点数量超出 32 位索引（最大值保留给图元重启）
    IndexOverflow,
}

impl fmt::Display for StrandModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrandModelError::Config(e) => write!(f, "Configuration error: {}", e),
            StrandModelError::MeshLoading(e) => write!(f, "Mesh loading error: {}", e),
            StrandModelError::Io(e) => write!(f, "IO error: {}", e),
            StrandModelError::Log(msg) => write!(f, "Log error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for MeshLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshLoadError::FileNotFound(path) => write!(f, "Mesh file not found: {}", path.display()),
            MeshLoadError::UnsupportedFormat(msg) => write!(f, "Unsupported mesh format: {}", msg),
            MeshLoadError::ParseError(msg) => write!(f, "Failed to parse mesh: {}", msg),
            MeshLoadError::ValidationError(msg) => write!(f, "Mesh validation failed: {}", msg),
            MeshLoadError::InvalidGeometry(msg) => write!(f, "Invalid geometry data: {}", msg),
            MeshLoadError::InvalidMagic { found } => write!(
                f,
                "Wrong input: expected magic \"IND_HAIR\", found {:?}",
                String::from_utf8_lossy(found)
            ),
            MeshLoadError::Truncated { context } => {
                write!(f, "Unexpected end of stream while reading {}", context)
            }
            MeshLoadError::CountMismatch { what, expected, actual } => write!(
                f,
                "{} count mismatch: header declares {}, file contains {}",
                what, expected, actual
            ),
            MeshLoadError::TrailingData { bytes } => {
                write!(f, "{} unexpected bytes after the last fiber record", bytes)
            }
            MeshLoadError::UnsupportedAttributes { requested, reason } => {
                write!(f, "Unsupported attribute combination {:?}: {}", requested, reason)
            }
            MeshLoadError::IndexOverflow => {
                write!(f, "Vertex count exceeds the 32-bit index range")
            }
        }
    }
}

impl std::error::Error for StrandModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StrandModelError::Io(e) => Some(e),
            StrandModelError::Config(e) => Some(e),
            StrandModelError::MeshLoading(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for MeshLoadError {}

// 实现 From trait 以便于错误转换
impl From<std::io::Error> for StrandModelError {
    fn from(err: std::io::Error) -> Self {
        StrandModelError::Io(err)
    }
}

impl From<ConfigError> for StrandModelError {
    fn from(err: ConfigError) -> Self {
        StrandModelError::Config(err)
    }
}

impl From<MeshLoadError> for StrandModelError {
    fn from(err: MeshLoadError) -> Self {
        StrandModelError::MeshLoading(err)
    }
}

impl StrandModelError {
    /// 若为模型加载错误则返回内部错误
    pub fn as_mesh_error(&self) -> Option<&MeshLoadError> {
        match self {
            StrandModelError::MeshLoading(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_error_message() {
        let err: StrandModelError = MeshLoadError::InvalidMagic { found: *b"BAD_HAIR" }.into();
        let msg = err.to_string();
        assert!(msg.contains("IND_HAIR"));
        assert!(msg.contains("BAD_HAIR"));
    }

    #[test]
    fn test_as_mesh_error() {
        let err: StrandModelError = MeshLoadError::IndexOverflow.into();
        assert!(matches!(err.as_mesh_error(), Some(MeshLoadError::IndexOverflow)));

        let io: StrandModelError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(io.as_mesh_error().is_none());
    }
}
