//! 轴对齐包围盒
//!
//! 加载时对顶点位置逐个折叠 min/max 得到包围盒；
//! 模型变换后则只变换包围盒的八个角点来近似新的包围盒。

use super::{Matrix4, Point3, Vector3};

/// 轴对齐包围盒（AABB）
///
/// 空包围盒的 `min` 为 `+inf`、`max` 为 `-inf`，
/// 因此任何一个点的 [`Aabb::update`] 都会使其变为有效。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3,
    pub max: Vector3,
}

impl Aabb {
    /// 由最小/最大角点创建
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    /// 以中心和边长创建
    pub fn from_center_size(center: Vector3, size: Vector3) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// 空包围盒
    pub fn empty() -> Self {
        Self {
            min: Vector3::repeat(f32::INFINITY),
            max: Vector3::repeat(f32::NEG_INFINITY),
        }
    }

    /// 对一组点计算包围盒
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Vector3>,
    {
        let mut aabb = Self::empty();
        for p in points {
            aabb.update(&p.into());
        }
        aabb
    }

    /// 将一个点并入包围盒
    #[inline]
    pub fn update(&mut self, p: &Vector3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// 是否还没有包含任何点
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// 至少有一个轴的尺寸严格大于零
    pub fn has_positive_extent(&self) -> bool {
        let size = self.size();
        size.x > 0.0 || size.y > 0.0 || size.z > 0.0
    }

    /// 八个角点
    pub fn corners(&self) -> [Vector3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vector3::new(hi.x, hi.y, hi.z),
            Vector3::new(hi.x, hi.y, lo.z),
            Vector3::new(hi.x, lo.y, hi.z),
            Vector3::new(hi.x, lo.y, lo.z),
            Vector3::new(lo.x, hi.y, hi.z),
            Vector3::new(lo.x, hi.y, lo.z),
            Vector3::new(lo.x, lo.y, hi.z),
            Vector3::new(lo.x, lo.y, lo.z),
        ]
    }

    /// 变换八个角点后重新求包围盒
    ///
    /// 结果总是包含真实的变换后几何体，但在旋转时会偏大。
    /// 空包围盒原样返回。
    pub fn transformed_corners(&self, matrix: &Matrix4) -> Aabb {
        if self.is_empty() {
            return *self;
        }

        Aabb::from_points(
            self.corners()
                .iter()
                .map(|c| matrix.transform_point(&Point3::from(*c)).coords),
        )
    }

    /// 点是否位于（向外扩张 `epsilon` 后的）包围盒内
    pub fn contains(&self, p: &Vector3, epsilon: f32) -> bool {
        (0..3).all(|axis| p[axis] >= self.min[axis] - epsilon && p[axis] <= self.max[axis] + epsilon)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::matrix;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_empty_box() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
        assert!(!aabb.has_positive_extent());
        assert_eq!(Aabb::default(), aabb);
    }

    #[test]
    fn test_from_points() {
        let aabb = Aabb::from_points([[1.0, -2.0, 0.5], [-1.0, 3.0, 0.0], [0.0, 0.0, 2.0]]);

        assert_eq!(aabb.min, Vector3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 3.0, 2.0));
        assert_eq!(aabb.center(), Vector3::new(0.0, 0.5, 1.0));
        assert_eq!(aabb.size(), Vector3::new(2.0, 5.0, 2.0));
    }

    #[test]
    fn test_single_point_has_no_extent() {
        let aabb = Aabb::from_points([[1.0, 1.0, 1.0]]);
        assert!(!aabb.is_empty());
        assert!(!aabb.has_positive_extent());
    }

    #[test]
    fn test_contains_with_epsilon() {
        let aabb = Aabb::new(Vector3::zeros(), Vector3::repeat(1.0));
        assert!(aabb.contains(&Vector3::new(0.5, 0.5, 0.5), 0.0));
        assert!(aabb.contains(&Vector3::new(1.0 + 1e-7, 0.0, 0.0), 1e-6));
        assert!(!aabb.contains(&Vector3::new(1.1, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_translate_corners_is_exact() {
        let aabb = Aabb::new(Vector3::zeros(), Vector3::repeat(1.0));
        let moved = aabb.transformed_corners(&matrix::translation(1.0, 2.0, 3.0));

        assert_abs_diff_eq!(moved.min, Vector3::new(1.0, 2.0, 3.0), epsilon = 1e-6);
        assert_abs_diff_eq!(moved.max, Vector3::new(2.0, 3.0, 4.0), epsilon = 1e-6);
    }

    #[test]
    fn test_rotated_corners_grow() {
        // 单位立方体绕 Z 轴旋转 45° 后，XY 方向的边长变为 sqrt(2)
        let aabb = Aabb::from_center_size(Vector3::zeros(), Vector3::repeat(1.0));
        let rotated = aabb.transformed_corners(&matrix::rotation_z(std::f32::consts::FRAC_PI_4));

        let size = rotated.size();
        assert_abs_diff_eq!(size.x, 2.0f32.sqrt(), epsilon = 1e-5);
        assert_abs_diff_eq!(size.y, 2.0f32.sqrt(), epsilon = 1e-5);
        assert_abs_diff_eq!(size.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_empty_stays_empty() {
        let aabb = Aabb::empty().transformed_corners(&matrix::scaling(2.0, 2.0, 2.0));
        assert!(aabb.is_empty());
    }
}
