//! 三角网格切线空间计算
//!
//! 去重完成后，用 UV 导数为每个顶点累加切线与副切线，
//! 再对法线做 Gram-Schmidt 正交化并归一化。

use super::{try_normalize, Vector3};

/// 逐顶点切线与副切线
#[derive(Debug, Clone, Default)]
pub struct TangentFrames {
    pub tangents: Vec<[f32; 3]>,
    pub bitangents: Vec<[f32; 3]>,
}

/// 计算三角网格的切线空间
///
/// # 算法
///
/// 1. 对于每个三角形 (v0, v1, v2):
///    - 位置导数: dp1 = p1 - p0, dp2 = p2 - p0
///    - UV 导数: duv1 = uv1 - uv0, duv2 = uv2 - uv0
///    - r = 1 / (duv1.x * duv2.y - duv1.y * duv2.x)
///    - tangent = (dp1 * duv2.y - dp2 * duv1.y) * r
///    - bitangent = (dp2 * duv1.x - dp1 * duv2.x) * r
///    - 累加到三个顶点
/// 2. 有法线时: tangent = normalize(tangent - n * dot(n, tangent))
///
/// UV 退化的三角形不参与累加。最终仍为零的向量保持为零。
///
/// # 参数
///
/// - `positions` / `uvs`: 顶点属性，长度必须一致
/// - `normals`: 可选法线，用于正交化
/// - `indices`: 三角形列表索引
pub fn compute_tangent_frames(
    positions: &[[f32; 3]],
    uvs: &[[f32; 2]],
    normals: Option<&[[f32; 3]]>,
    indices: &[u32],
) -> TangentFrames {
    let mut tangents = vec![Vector3::zeros(); positions.len()];
    let mut bitangents = vec![Vector3::zeros(); positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];

        let p0 = Vector3::from(positions[i0]);
        let dp1 = Vector3::from(positions[i1]) - p0;
        let dp2 = Vector3::from(positions[i2]) - p0;

        let uv0 = uvs[i0];
        let duv1 = [uvs[i1][0] - uv0[0], uvs[i1][1] - uv0[1]];
        let duv2 = [uvs[i2][0] - uv0[0], uvs[i2][1] - uv0[1]];

        let det = duv1[0] * duv2[1] - duv1[1] * duv2[0];

        // 避免除以零
        if det.abs() < 1e-6 {
            continue;
        }

        let r = 1.0 / det;
        let tangent = (dp1 * duv2[1] - dp2 * duv1[1]) * r;
        let bitangent = (dp2 * duv1[0] - dp1 * duv2[0]) * r;

        for i in [i0, i1, i2] {
            tangents[i] += tangent;
            bitangents[i] += bitangent;
        }
    }

    let orthogonalize = |v: Vector3, n: Option<Vector3>| -> [f32; 3] {
        let v = match n {
            Some(n) => v - n * n.dot(&v),
            None => v,
        };
        try_normalize(&v).unwrap_or_else(Vector3::zeros).into()
    };

    let normal_at = |i: usize| normals.map(|n| Vector3::from(n[i]));

    TangentFrames {
        tangents: tangents
            .iter()
            .enumerate()
            .map(|(i, t)| orthogonalize(*t, normal_at(i)))
            .collect(),
        bitangents: bitangents
            .iter()
            .enumerate()
            .map(|(i, b)| orthogonalize(*b, normal_at(i)))
            .collect(),
    }
}
