//! 数学库模块
//!
//! 基于 `nalgebra` 提供模型构建所需的数学类型。
//! 顶点数据本身用原始数组存储（便于 `bytemuck` 直接上传），
//! 计算时再转换为这里的向量类型。
//!
//! # 模块组织
//!
//! - **基础类型**：Vector3/4, Matrix4, Point3
//! - **常量**：EPSILON 等
//! - **矩阵辅助函数**：translation, rotation, scaling
//! - `bounds`：轴对齐包围盒
//! - `geometry`：三角网格切线空间计算

pub type Vector3 = nalgebra::Vector3<f32>;
pub type Vector4 = nalgebra::Vector4<f32>;
pub type Matrix4 = nalgebra::Matrix4<f32>;
pub type Point3 = nalgebra::Point3<f32>;

pub mod bounds;
pub mod geometry;

pub use bounds::Aabb;

/// 数学常量
pub mod constants {
    /// 角度转弧度的系数
    pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;

    /// 归一化时视为零向量的长度阈值
    pub const EPSILON: f32 = 1e-6;
}

/// 矩阵辅助函数
pub mod matrix {
    use super::*;

    /// 创建平移矩阵
    pub fn translation(x: f32, y: f32, z: f32) -> Matrix4 {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// 创建缩放矩阵
    pub fn scaling(x: f32, y: f32, z: f32) -> Matrix4 {
        Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z))
    }

    /// 创建绕 X 轴旋转的矩阵
    pub fn rotation_x(angle: f32) -> Matrix4 {
        Matrix4::from_axis_angle(&Vector3::x_axis(), angle)
    }

    /// 创建绕 Y 轴旋转的矩阵
    pub fn rotation_y(angle: f32) -> Matrix4 {
        Matrix4::from_axis_angle(&Vector3::y_axis(), angle)
    }

    /// 创建绕 Z 轴旋转的矩阵
    pub fn rotation_z(angle: f32) -> Matrix4 {
        Matrix4::from_axis_angle(&Vector3::z_axis(), angle)
    }
}

/// 归一化；长度小于 [`constants::EPSILON`] 时返回 `None`
#[inline]
pub fn try_normalize(v: &Vector3) -> Option<Vector3> {
    v.try_normalize(constants::EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_translation() {
        let mat = matrix::translation(1.0, 2.0, 3.0);
        let point = Vector4::new(0.0, 0.0, 0.0, 1.0);
        let result = mat * point;

        assert!((result.x - 1.0).abs() < 1e-6);
        assert!((result.y - 2.0).abs() < 1e-6);
        assert!((result.z - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_try_normalize() {
        assert!(try_normalize(&Vector3::zeros()).is_none());

        let n = try_normalize(&Vector3::new(3.0, 4.0, 0.0)).unwrap();
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.y - 0.8).abs() < 1e-6);
    }
}
