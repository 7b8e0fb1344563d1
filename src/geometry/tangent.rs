//! 发丝切线估计
//!
//! 沿每根发丝做前向差分，并与上一个切线相加后归一化，
//! 相当于一个沿曲线方向的因果平滑滤波，抑制局部的急转。

use std::ops::Range;

use crate::math::{try_normalize, Vector3};

/// 为每根发丝计算逐顶点切线
///
/// `fibers` 为每根发丝在 `positions` 中的顶点范围，长度至少为 2。
/// 不在任何范围内的顶点切线为零。
pub fn estimate_fiber_tangents(positions: &[[f32; 3]], fibers: &[Range<usize>]) -> Vec<[f32; 3]> {
    let mut tangents = vec![[0.0; 3]; positions.len()];

    for fiber in fibers {
        estimate_polyline_tangents(&positions[fiber.clone()], &mut tangents[fiber.clone()]);
    }

    tangents
}

/// 单条折线的切线
///
/// - 首顶点: normalize(p1 - p0)
/// - 中间顶点: normalize(normalize(p[v+1] - p[v]) + t[v-1])
/// - 尾顶点: normalize(p[last] - p[last-1])
///
/// 重合的相邻点或原路折返会让方向无法归一化，此时沿用相邻的切线，
/// 因此输出始终是单位向量。
pub fn estimate_polyline_tangents(points: &[[f32; 3]], out: &mut [[f32; 3]]) {
    debug_assert_eq!(points.len(), out.len());
    let n = points.len();
    if n < 2 {
        return;
    }

    let segment = |v: usize| try_normalize(&(Vector3::from(points[v + 1]) - Vector3::from(points[v])));

    // 首顶点：跳过重合点，找到第一个有效的线段方向；
    // 整根发丝退化为一个点时取 +Y
    let first = (0..n - 1).find_map(&segment).unwrap_or_else(Vector3::y);
    out[0] = first.into();

    let mut previous = first;
    for v in 1..n - 1 {
        let tangent = match segment(v) {
            Some(forward) => try_normalize(&(forward + previous)).unwrap_or(forward),
            None => previous,
        };
        out[v] = tangent.into();
        previous = tangent;
    }

    let last = segment(n - 2).unwrap_or(previous);
    out[n - 1] = last.into();
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_unit(tangents: &[[f32; 3]]) {
        for t in tangents {
            assert_abs_diff_eq!(Vector3::from(*t).norm(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_straight_line() {
        let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [3.0, 0.0, 0.0]];
        let mut out = [[0.0; 3]; 4];

        estimate_polyline_tangents(&points, &mut out);

        for t in &out {
            assert_abs_diff_eq!(Vector3::from(*t), Vector3::x(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_corner_is_smoothed() {
        // 在 p1 处直角转弯
        let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]];
        let mut out = [[0.0; 3]; 3];

        estimate_polyline_tangents(&points, &mut out);

        let diagonal = Vector3::new(1.0, 1.0, 0.0).normalize();
        assert_abs_diff_eq!(Vector3::from(out[0]), Vector3::x(), epsilon = 1e-6);
        assert_abs_diff_eq!(Vector3::from(out[1]), diagonal, epsilon = 1e-6);
        assert_abs_diff_eq!(Vector3::from(out[2]), Vector3::y(), epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_points_stay_unit() {
        let points = [
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0], // 原路折返
            [0.0, 0.0, 0.0],
        ];
        let mut out = [[0.0; 3]; 5];

        estimate_polyline_tangents(&points, &mut out);

        assert_unit(&out);
        assert_abs_diff_eq!(Vector3::from(out[0]), Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_collapsed_fiber_uses_fallback() {
        let points = [[1.0, 1.0, 1.0]; 3];
        let mut out = [[0.0; 3]; 3];

        estimate_polyline_tangents(&points, &mut out);

        assert_unit(&out);
        assert_eq!(out[0], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_fibers_are_independent() {
        let positions = [
            [0.0, 0.0, 0.0], [1.0, 0.0, 0.0],
            [5.0, 5.0, 5.0], [5.0, 6.0, 5.0], [5.0, 7.0, 5.0],
        ];

        let tangents = estimate_fiber_tangents(&positions, &[0..2, 2..5]);

        assert_unit(&tangents);
        // 第二根发丝的首切线不受第一根影响
        assert_abs_diff_eq!(Vector3::from(tangents[2]), Vector3::y(), epsilon = 1e-6);
        assert_abs_diff_eq!(Vector3::from(tangents[1]), Vector3::x(), epsilon = 1e-6);
    }
}
