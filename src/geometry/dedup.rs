//! 顶点去重
//!
//! 以 [`ModelVertex`] 为键的哈希表：相同的面角点只写入顶点数组一次，
//! 之后只复用它的索引。键中的 `fence` 把不同形状隔开。

use std::collections::HashMap;

use super::attrib::AttribCode;
use super::model::{VertexStreams, PRIMITIVE_RESTART_INDEX};
use super::vertex::ModelVertex;
use crate::core::error::{MeshLoadError, Result};

/// 顶点去重器
///
/// 每次加载独立创建，不与其他加载共享状态。
#[derive(Debug)]
pub struct VertexDeduplicator {
    acode: AttribCode,
    lookup: HashMap<ModelVertex, u32>,
}

impl VertexDeduplicator {
    pub fn new(acode: AttribCode) -> Self {
        Self {
            acode,
            lookup: HashMap::new(),
        }
    }

    /// 按预计的唯一顶点数预分配
    pub fn with_capacity(acode: AttribCode, capacity: usize) -> Self {
        Self {
            acode,
            lookup: HashMap::with_capacity(capacity),
        }
    }

    /// 查找或新建顶点，返回其索引
    ///
    /// 新顶点按属性掩码把启用的字段追加到 `streams`。
    /// 索引不会达到 [`PRIMITIVE_RESTART_INDEX`]，否则返回 `IndexOverflow`。
    pub fn insert(&mut self, key: ModelVertex, streams: &mut VertexStreams) -> Result<u32> {
        if let Some(&index) = self.lookup.get(&key) {
            return Ok(index);
        }

        let index = u32::try_from(streams.positions.len())
            .ok()
            .filter(|&i| i < PRIMITIVE_RESTART_INDEX)
            .ok_or(MeshLoadError::IndexOverflow)?;

        streams.push_vertex(self.acode, &key);
        self.lookup.insert(key, index);
        Ok(index)
    }

    /// 已发出的唯一顶点数
    pub fn unique_count(&self) -> usize {
        self.lookup.len()
    }
}
