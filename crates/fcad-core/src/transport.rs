//! 输送线与 AGV 线路

use crate::math::Point2;
use serde::{Deserialize, Serialize};

/// 输送线：连接两个节点，沿折线布置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conveyor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub from_node_id: String,
    pub to_node_id: String,
    /// 折线路径点
    #[serde(default)]
    pub path: Vec<Point2>,
}

impl Conveyor {
    pub fn new(
        id: impl Into<String>,
        from_node_id: impl Into<String>,
        to_node_id: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            from_node_id: from_node_id.into(),
            to_node_id: to_node_id.into(),
            path: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: Vec<Point2>) -> Self {
        self.path = path;
        self
    }

    /// 路径起点
    pub fn start_point(&self) -> Option<&Point2> {
        self.path.first()
    }
}

/// AGV 路径点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgvWaypoint {
    pub id: String,
    pub position: Point2,
}

impl AgvWaypoint {
    pub fn new(id: impl Into<String>, position: Point2) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

/// AGV 线路段（两个路径点之间）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgvPath {
    pub id: String,
    pub from_waypoint_id: String,
    pub to_waypoint_id: String,
}

impl AgvPath {
    pub fn new(
        id: impl Into<String>,
        from_waypoint_id: impl Into<String>,
        to_waypoint_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from_waypoint_id: from_waypoint_id.into(),
            to_waypoint_id: to_waypoint_id.into(),
        }
    }
}
