//! 部件划分
//!
//! 维护顶点/索引的运行计数，在形状边界处关闭上一个部件并打开下一个。

use super::model::{Material, Part};

#[derive(Debug)]
struct OpenPart {
    vstart: u32,
    istart: u32,
    material: Material,
}

/// 部件划分器
///
/// 部件按遇到的顺序排列，彼此不重叠且首尾相接，
/// 因此所有部件的 `vcount` / `icount` 之和等于数组长度。
#[derive(Debug, Default)]
pub struct PartSegmenter {
    parts: Vec<Part>,
    open: Option<OpenPart>,
}

impl PartSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            parts: Vec::with_capacity(capacity),
            open: None,
        }
    }

    /// 在当前计数处开始新部件（如有未关闭的部件则先关闭）
    pub fn begin(&mut self, material: Material, vertex_count: u32, index_count: u32) {
        self.close(vertex_count, index_count);
        self.open = Some(OpenPart {
            vstart: vertex_count,
            istart: index_count,
            material,
        });
    }

    /// 关闭最后一个部件并返回全部部件
    pub fn finish(mut self, vertex_count: u32, index_count: u32) -> Vec<Part> {
        self.close(vertex_count, index_count);
        self.parts
    }

    fn close(&mut self, vertex_count: u32, index_count: u32) {
        if let Some(open) = self.open.take() {
            debug_assert!(vertex_count >= open.vstart && index_count >= open.istart);
            self.parts.push(Part {
                vstart: open.vstart,
                vcount: vertex_count.saturating_sub(open.vstart),
                istart: open.istart,
                icount: index_count.saturating_sub(open.istart),
                material: open.material,
            });
        }
    }
}
