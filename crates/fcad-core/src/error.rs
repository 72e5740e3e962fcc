//! 布局模型错误定义
//!
//! 只用于模型构建阶段（插入、加载、配置解析）。交互操作本身从不返回错误，
//! 被拒绝的操作以 `bool` / `Option` 表示。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Duplicate entity id: {0}")]
    DuplicateId(String),

    #[error("Path from {from} to {to} already exists")]
    DuplicatePath { from: String, to: String },

    #[error("Node not found: {0}")]
    UnknownNode(String),

    #[error("Runway not found: {0}")]
    UnknownRunway(String),

    #[error("Zone {id} needs at least 3 points, got {count}")]
    DegenerateZone { id: String, count: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
