//! 模型摆放
//!
//! 在构建拓扑之前，把原始顶点位置等比缩放并平移到目标包围盒中。

use crate::math::{Aabb, Vector3};

/// 计算等比缩放系数
///
/// 取各轴 目标尺寸 / 原尺寸 的最小值，保证每个轴都放得下。
/// 原尺寸不为正的轴不参与比较；没有可比较的轴时返回 1。
/// 目标在某轴上尺寸为零而模型在该轴有厚度时，结果为 0。
fn uniform_scale(source: &Aabb, target: &Aabb) -> f32 {
    let (src, dst) = (source.size(), target.size());

    (0..3)
        .filter(|&axis| src[axis] > 0.0)
        .map(|axis| dst[axis] / src[axis])
        .reduce(f32::min)
        .unwrap_or(1.0)
}

/// 把顶点位置摆放到目标包围盒内
///
/// `p = (p - 源中心) * scale + 目标中心`，原地修改。
/// 目标包围盒没有任何正尺寸的轴时视为“不需要摆放”，返回 `false`。
pub fn fit_placement(positions: &mut [[f32; 3]], target: &Aabb) -> bool {
    if !target.has_positive_extent() || positions.is_empty() {
        return false;
    }

    let source = Aabb::from_points(positions.iter().copied());
    let scale = uniform_scale(&source, target);
    let (source_center, target_center) = (source.center(), target.center());

    for p in positions.iter_mut() {
        let fitted = (Vector3::from(*p) - source_center) * scale + target_center;
        *p = fitted.into();
    }

    tracing::debug!(scale, vertices = positions.len(), "模型摆放完成");
    true
}

/// 扁平 `xyz xyz ...` 缓冲区版本，末尾不足三个的分量被忽略
pub fn fit_placement_flat(positions: &mut [f32], target: &Aabb) -> bool {
    let usable = positions.len() / 3 * 3;
    let points: &mut [[f32; 3]] = bytemuck::cast_slice_mut(&mut positions[..usable]);
    fit_placement(points, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_target() -> Aabb {
        Aabb::from_center_size(Vector3::zeros(), Vector3::repeat(2.0))
    }

    #[test]
    fn test_fit_into_centered_box() {
        let mut positions = vec![[10.0, 10.0, 10.0], [14.0, 12.0, 11.0], [12.0, 11.0, 10.5]];

        assert!(fit_placement(&mut positions, &unit_target()));

        let fitted = Aabb::from_points(positions.iter().copied());
        let size = fitted.size();
        assert_abs_diff_eq!(size.max(), 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(fitted.center(), Vector3::zeros(), epsilon = 1e-5);

        // 等比缩放保持长宽比 4:2:1
        assert_abs_diff_eq!(size.y, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(size.z, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_tightest_axis_wins() {
        let mut positions = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        let target = Aabb::new(Vector3::zeros(), Vector3::new(4.0, 2.0, 8.0));

        fit_placement(&mut positions, &target);

        let fitted = Aabb::from_points(positions.iter().copied());
        assert_abs_diff_eq!(fitted.size(), Vector3::repeat(2.0), epsilon = 1e-5);
        assert_abs_diff_eq!(fitted.center(), Vector3::new(2.0, 1.0, 4.0), epsilon = 1e-5);
    }

    #[test]
    fn test_non_positive_target_is_skipped() {
        let original = vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let mut positions = original.clone();

        assert!(!fit_placement(&mut positions, &Aabb::empty()));
        let inverted = Aabb::new(Vector3::zeros(), Vector3::repeat(-1.0));
        assert!(!fit_placement(&mut positions, &inverted));

        assert_eq!(positions, original);
    }

    #[test]
    fn test_flat_model_only_recenters_on_flat_axis() {
        // Z 方向厚度为零，不参与缩放系数
        let mut positions = vec![[0.0, 0.0, 5.0], [2.0, 1.0, 5.0]];

        fit_placement(&mut positions, &unit_target());

        let fitted = Aabb::from_points(positions.iter().copied());
        assert_abs_diff_eq!(fitted.size(), Vector3::new(2.0, 1.0, 0.0), epsilon = 1e-5);
        assert_abs_diff_eq!(fitted.center(), Vector3::zeros(), epsilon = 1e-5);
    }

    #[test]
    fn test_flat_target_does_not_overflow() {
        // 目标 Y 方向厚度为零，模型不能在 Y 方向溢出
        let mut positions = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        let target = Aabb::new(Vector3::new(-1.0, 0.0, -1.0), Vector3::new(1.0, 0.0, 1.0));

        assert!(fit_placement(&mut positions, &target));

        for p in &positions {
            assert!(target.contains(&Vector3::from(*p), 1e-6));
        }
        let fitted = Aabb::from_points(positions.iter().copied());
        assert_abs_diff_eq!(fitted.size(), Vector3::zeros(), epsilon = 1e-6);
        assert_abs_diff_eq!(fitted.center(), target.center(), epsilon = 1e-6);
    }

    #[test]
    fn test_flat_buffer() {
        let mut flat = vec![0.0, 0.0, 0.0, 4.0, 4.0, 4.0];

        assert!(fit_placement_flat(&mut flat, &unit_target()));
        assert_abs_diff_eq!(flat[0], -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(flat[5], 1.0, epsilon = 1e-6);
    }
}
