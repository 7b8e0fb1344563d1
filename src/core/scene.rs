//! 场景配置模块
//!
//! 描述一次批量加载：每个模型条目给出文件路径、需要的顶点属性、
//! 摆放包围盒和加载后的局部变换。
//!
//! # 配置文件格式 (scene.toml)
//!
//! ```toml
//! [[models]]
//! path = "assets/head.obj"
//! attributes = ["position", "normal", "uv"]
//!
//! [models.placement]
//! min = [-1.0, -1.0, -1.0]
//! max = [1.0, 1.0, 1.0]
//!
//! [models.transform]
//! position = [0.0, 1.5, 0.0]
//! rotation = [0.0, 90.0, 0.0]
//!
//! [[models]]
//! path = "assets/hair.ind"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{ConfigError, Result, StrandModelError};
use crate::geometry::attrib::{AttribCode, VertexAttrib};
use crate::geometry::loaders::{load_model, LoadOptions};
use crate::geometry::model::Model;
use crate::math::constants::DEG_TO_RAD;
use crate::math::{matrix, Aabb, Matrix4, Vector3};

/// 3D 变换数据
///
/// 包含位置、旋转和缩放信息。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// 位置 (x, y, z)
    #[serde(default = "default_position")]
    pub position: [f32; 3],

    /// 旋转（欧拉角，度数）(pitch, yaw, roll)
    #[serde(default = "default_rotation")]
    pub rotation: [f32; 3],

    /// 缩放 (x, y, z)
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

fn default_position() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn default_rotation() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: default_position(),
            rotation: default_rotation(),
            scale: default_scale(),
        }
    }
}

impl Transform {
    /// 创建模型矩阵
    ///
    /// 变换顺序：缩放 -> 旋转 (X, Y, Z) -> 平移，即 T * Rz * Ry * Rx * S
    pub fn to_matrix(&self) -> Matrix4 {
        let [px, py, pz] = self.position;
        let [pitch, yaw, roll] = self.rotation.map(|deg| deg * DEG_TO_RAD);
        let [sx, sy, sz] = self.scale;

        let rotation = matrix::rotation_z(roll) * matrix::rotation_y(yaw) * matrix::rotation_x(pitch);

        matrix::translation(px, py, pz) * rotation * matrix::scaling(sx, sy, sz)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// 摆放包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl PlacementConfig {
    pub fn to_aabb(&self) -> Aabb {
        Aabb::new(Vector3::from(self.min), Vector3::from(self.max))
    }
}

/// 单个模型条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    /// 模型文件路径（.obj 或 .ind）
    pub path: String,

    /// 需要的顶点属性；省略时使用格式默认值
    #[serde(default)]
    pub attributes: Option<Vec<VertexAttrib>>,

    /// 目标摆放包围盒；省略时保持原始坐标
    #[serde(default)]
    pub placement: Option<PlacementConfig>,

    /// 加载后的局部变换
    #[serde(default)]
    pub transform: Transform,
}

impl ModelEntry {
    /// 只有路径、其余取默认值的条目
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            attributes: None,
            placement: None,
            transform: Transform::default(),
        }
    }

    /// 转换为加载选项
    pub fn load_options(&self, strict: bool) -> LoadOptions {
        LoadOptions {
            attributes: self.attributes.as_ref().map(|a| AttribCode::from_attributes(a)),
            placement: self.placement.map(|p| p.to_aabb()),
            strict,
        }
    }

    /// 按条目加载模型并应用局部变换
    pub fn load(&self, strict: bool) -> Result<Model> {
        let mut model = load_model(Path::new(&self.path), &self.load_options(strict))?;

        if !self.transform.is_identity() {
            model.set_local_transform(self.transform.to_matrix());
        }

        Ok(model)
    }
}

/// 场景配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    /// 要加载的模型
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

impl SceneConfig {
    /// 由一组文件路径构建（全部使用默认选项）
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            models: paths.into_iter().map(ModelEntry::from_path).collect(),
        }
    }

    /// 从文件加载场景配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            StrandModelError::Config(ConfigError::FileNotFound(format!(
                "Failed to read scene config file '{}': {}",
                path.display(),
                e
            )))
        })?;

        toml::from_str(&contents).map_err(|e| {
            StrandModelError::Config(ConfigError::ParseError(format!(
                "Failed to parse scene config: {}",
                e
            )))
        })
    }

    /// 从文件加载，如果文件不存在或无法解析则返回空场景
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if path.exists() {
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!("Loaded scene config from: {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load scene config: {}, using defaults", e);
                    Self::default()
                }
            }
        } else {
            tracing::info!("Scene config not found, using defaults");
            Self::default()
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self).map_err(|e| {
            StrandModelError::Config(ConfigError::ParseError(format!(
                "Failed to serialize scene config: {}",
                e
            )))
        })?;

        fs::write(path, contents)?;

        tracing::info!("Saved scene config to: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use approx::assert_abs_diff_eq;

    const SCENE_TOML: &str = r#"
[[models]]
path = "assets/head.obj"
attributes = ["position", "normal"]

[models.placement]
min = [-1.0, -1.0, -1.0]
max = [1.0, 1.0, 1.0]

[models.transform]
position = [0.0, 1.5, 0.0]

[[models]]
path = "assets/hair.ind"
"#;

    #[test]
    fn test_default_transform() {
        let transform = Transform::default();
        assert_eq!(transform.position, [0.0, 0.0, 0.0]);
        assert_eq!(transform.rotation, [0.0, 0.0, 0.0]);
        assert_eq!(transform.scale, [1.0, 1.0, 1.0]);
        assert!(transform.is_identity());
        assert_eq!(transform.to_matrix(), Matrix4::identity());
    }

    #[test]
    fn test_transform_to_matrix() {
        let transform = Transform {
            position: [1.0, 2.0, 3.0],
            rotation: [0.0, 90.0, 0.0],
            scale: [2.0, 2.0, 2.0],
        };
        let matrix = transform.to_matrix();

        // 先缩放，再绕 Y 轴旋转 90 度（+X 转到 -Z），最后平移
        let p = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(p.coords, Vector3::new(1.0, 2.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_parse_scene() {
        let scene: SceneConfig = toml::from_str(SCENE_TOML).unwrap();
        assert_eq!(scene.models.len(), 2);

        let head = &scene.models[0];
        let options = head.load_options(true);
        assert_eq!(options.attributes, Some(AttribCode::POSITION | AttribCode::NORMAL));
        assert_eq!(options.placement.unwrap().size(), Vector3::repeat(2.0));
        assert!(options.strict);
        assert_eq!(head.transform.position, [0.0, 1.5, 0.0]);
        assert_eq!(head.transform.scale, [1.0, 1.0, 1.0]);

        let hair = &scene.models[1];
        assert!(hair.attributes.is_none());
        assert!(hair.placement.is_none());
        assert!(hair.transform.is_identity());
    }

    #[test]
    fn test_from_paths() {
        let scene = SceneConfig::from_paths(["a.obj", "b.ind"]);
        assert_eq!(scene.models.len(), 2);
        assert_eq!(scene.models[1].path, "b.ind");
        assert!(scene.models[0].load_options(false).attributes.is_none());
    }

    #[test]
    fn test_entry_load_applies_transform() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mut entry = ModelEntry::from_path(path.to_string_lossy());
        entry.attributes = Some(vec![VertexAttrib::Position]);
        entry.transform.position = [0.0, 0.0, 4.0];

        let model = entry.load(false).unwrap();
        assert_abs_diff_eq!(model.bounds().min, Vector3::new(0.0, 0.0, 4.0), epsilon = 1e-6);
        assert_eq!(model.local_transform(), entry.transform.to_matrix());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.toml");

        let scene: SceneConfig = toml::from_str(SCENE_TOML).unwrap();
        scene.save_to_file(&path).unwrap();

        let loaded = SceneConfig::from_file(&path).unwrap();
        assert_eq!(loaded.models.len(), 2);
        assert_eq!(loaded.models[0].placement, scene.models[0].placement);
        assert_eq!(loaded.models[0].attributes, scene.models[0].attributes);
    }

    #[test]
    fn test_missing_scene_file() {
        let scene = SceneConfig::from_file_or_default("does/not/exist.toml");
        assert!(scene.models.is_empty());
        assert!(SceneConfig::from_file("does/not/exist.toml").is_err());
    }
}
