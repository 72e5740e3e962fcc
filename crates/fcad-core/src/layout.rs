//! 布局模型
//!
//! `LayoutModel` 是唯一的可变聚合根，独占所有实体。插入时强制：
//! - 所有实体ID全局唯一
//! - 路径的 (From, To) 不重复，且两端节点存在
//! - 桥式起重机引用的轨道存在，大车位置在轨道工作区间内
//! - 非空区域至少 3 个顶点
//!
//! 轨道按插入顺序存放，另有ID索引表；起重机只保存轨道ID，使用时再查找。

use crate::crane::{JibCrane, OverheadCrane, Runway};
use crate::error::LayoutError;
use crate::math::Point2;
use crate::node::{Node, Path};
use crate::transport::{AgvPath, AgvWaypoint, Conveyor};
use crate::zone::Zone;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 画布尺寸（原点在左上角）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

/// 布局模型
#[derive(Debug, Clone, Default)]
pub struct LayoutModel {
    canvas: Option<CanvasSize>,
    nodes: Vec<Node>,
    paths: Vec<Path>,
    runways: Vec<Runway>,
    /// 轨道ID → `runways` 下标
    runway_index: HashMap<String, usize>,
    overhead_cranes: Vec<OverheadCrane>,
    jib_cranes: Vec<JibCrane>,
    conveyors: Vec<Conveyor>,
    agv_waypoints: Vec<AgvWaypoint>,
    agv_paths: Vec<AgvPath>,
    zones: Vec<Zone>,
    /// 已占用的实体ID
    ids: HashSet<String>,
}

impl LayoutModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas = Some(CanvasSize::new(width, height));
        self
    }

    pub fn canvas(&self) -> Option<CanvasSize> {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: Option<CanvasSize>) {
        self.canvas = canvas;
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn claim_id(&mut self, id: &str) -> Result<(), LayoutError> {
        if !self.ids.insert(id.to_string()) {
            return Err(LayoutError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    // === 插入 ===

    pub fn insert_node(&mut self, node: Node) -> Result<(), LayoutError> {
        self.claim_id(&node.id)?;
        self.nodes.push(node);
        Ok(())
    }

    pub fn insert_path(&mut self, path: Path) -> Result<(), LayoutError> {
        if self.node(&path.from).is_none() {
            return Err(LayoutError::UnknownNode(path.from));
        }
        if self.node(&path.to).is_none() {
            return Err(LayoutError::UnknownNode(path.to));
        }
        if self.has_path(&path.from, &path.to) {
            return Err(LayoutError::DuplicatePath {
                from: path.from,
                to: path.to,
            });
        }
        self.claim_id(&path.id)?;
        self.paths.push(path);
        Ok(())
    }

    pub fn insert_runway(&mut self, mut runway: Runway) -> Result<(), LayoutError> {
        self.claim_id(&runway.id)?;
        runway.normalize_zone();
        self.runway_index.insert(runway.id.clone(), self.runways.len());
        self.runways.push(runway);
        Ok(())
    }

    pub fn insert_overhead_crane(&mut self, mut crane: OverheadCrane) -> Result<(), LayoutError> {
        let Some(runway) = self.runway(&crane.runway_id) else {
            return Err(LayoutError::UnknownRunway(crane.runway_id));
        };
        let zone = runway.zone;
        self.claim_id(&crane.id)?;
        let position = crane.bridge_position();
        crane.set_bridge_position(position, &zone);
        crane.capture_animation_start();
        self.overhead_cranes.push(crane);
        Ok(())
    }

    pub fn insert_jib_crane(&mut self, mut crane: JibCrane) -> Result<(), LayoutError> {
        self.claim_id(&crane.id)?;
        crane.radius = crane.radius.max(1.0);
        self.jib_cranes.push(crane);
        Ok(())
    }

    pub fn insert_conveyor(&mut self, conveyor: Conveyor) -> Result<(), LayoutError> {
        self.claim_id(&conveyor.id)?;
        self.conveyors.push(conveyor);
        Ok(())
    }

    pub fn insert_agv_waypoint(&mut self, waypoint: AgvWaypoint) -> Result<(), LayoutError> {
        self.claim_id(&waypoint.id)?;
        self.agv_waypoints.push(waypoint);
        Ok(())
    }

    pub fn insert_agv_path(&mut self, path: AgvPath) -> Result<(), LayoutError> {
        self.claim_id(&path.id)?;
        self.agv_paths.push(path);
        Ok(())
    }

    pub fn insert_zone(&mut self, mut zone: Zone) -> Result<(), LayoutError> {
        zone.validate()?;
        self.claim_id(&zone.id)?;
        zone.refresh_bounds();
        self.zones.push(zone);
        Ok(())
    }

    /// 删除轨道（引用它的起重机保留，之后的拖动会失败）
    pub fn remove_runway(&mut self, id: &str) -> Option<Runway> {
        let index = self.runway_index.remove(id)?;
        let runway = self.runways.remove(index);
        for slot in self.runway_index.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
        self.ids.remove(id);
        Some(runway)
    }

    // === 查询 ===

    /// 按插入顺序排列的节点
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn has_path(&self, from: &str, to: &str) -> bool {
        self.paths.iter().any(|p| p.from == from && p.to == to)
    }

    /// 按插入顺序排列的轨道
    pub fn runways(&self) -> &[Runway] {
        &self.runways
    }

    pub fn runway(&self, id: &str) -> Option<&Runway> {
        self.runway_index.get(id).map(|&i| &self.runways[i])
    }

    pub fn overhead_cranes(&self) -> &[OverheadCrane] {
        &self.overhead_cranes
    }

    pub fn overhead_crane(&self, id: &str) -> Option<&OverheadCrane> {
        self.overhead_cranes.iter().find(|c| c.id == id)
    }

    pub fn jib_cranes(&self) -> &[JibCrane] {
        &self.jib_cranes
    }

    pub fn jib_crane(&self, id: &str) -> Option<&JibCrane> {
        self.jib_cranes.iter().find(|c| c.id == id)
    }

    pub fn conveyors(&self) -> &[Conveyor] {
        &self.conveyors
    }

    pub fn conveyor(&self, id: &str) -> Option<&Conveyor> {
        self.conveyors.iter().find(|c| c.id == id)
    }

    pub fn agv_waypoints(&self) -> &[AgvWaypoint] {
        &self.agv_waypoints
    }

    pub fn agv_paths(&self) -> &[AgvPath] {
        &self.agv_paths
    }

    pub fn agv_path(&self, id: &str) -> Option<&AgvPath> {
        self.agv_paths.iter().find(|p| p.id == id)
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    // === 修改 ===

    /// 设置大车位置，按所属轨道的工作区间截断
    ///
    /// 起重机或其轨道不存在时返回 false，模型不变。
    pub fn set_bridge_position(&mut self, crane_id: &str, position: f64) -> bool {
        let Some(crane) = self.overhead_cranes.iter_mut().find(|c| c.id == crane_id) else {
            return false;
        };
        let Some(runway) = self.runway_index.get(&crane.runway_id).map(|&i| &self.runways[i]) else {
            return false;
        };
        crane.set_bridge_position(position, &runway.zone);
        true
    }

    /// 移动节点左上角
    pub fn move_node_to(&mut self, id: &str, origin: Point2) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.bounds.move_to(origin);
                true
            }
            None => false,
        }
    }

    pub(crate) fn zone_mut(&mut self, id: &str) -> Option<&mut Zone> {
        self.zones.iter_mut().find(|z| z.id == id)
    }

    /// 为所有起重机记录动画起点快照
    pub fn capture_animation_start(&mut self) {
        for crane in &mut self.overhead_cranes {
            crane.capture_animation_start();
        }
        for jib in &mut self.jib_cranes {
            jib.capture_animation_start();
        }
    }

    // === 快照 ===

    /// 从快照构建模型，逐个执行插入校验
    pub fn from_snapshot(snapshot: LayoutSnapshot) -> Result<Self, LayoutError> {
        let mut layout = LayoutModel {
            canvas: snapshot.canvas,
            ..Default::default()
        };

        for runway in snapshot.runways {
            layout.insert_runway(runway)?;
        }
        for node in snapshot.nodes {
            layout.insert_node(node)?;
        }
        for path in snapshot.paths {
            layout.insert_path(path)?;
        }
        for crane in snapshot.overhead_cranes {
            layout.insert_overhead_crane(crane)?;
        }
        for crane in snapshot.jib_cranes {
            layout.insert_jib_crane(crane)?;
        }
        for conveyor in snapshot.conveyors {
            layout.insert_conveyor(conveyor)?;
        }
        for waypoint in snapshot.agv_waypoints {
            layout.insert_agv_waypoint(waypoint)?;
        }
        for path in snapshot.agv_paths {
            layout.insert_agv_path(path)?;
        }
        for zone in snapshot.zones {
            layout.insert_zone(zone)?;
        }

        Ok(layout)
    }

    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let snapshot: LayoutSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    pub fn to_snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            canvas: self.canvas,
            nodes: self.nodes.clone(),
            paths: self.paths.clone(),
            runways: self.runways.clone(),
            overhead_cranes: self.overhead_cranes.clone(),
            jib_cranes: self.jib_cranes.clone(),
            conveyors: self.conveyors.clone(),
            agv_waypoints: self.agv_waypoints.clone(),
            agv_paths: self.agv_paths.clone(),
            zones: self.zones.clone(),
        }
    }
}

/// 布局的纯数据形式，用于序列化
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutSnapshot {
    pub canvas: Option<CanvasSize>,
    pub nodes: Vec<Node>,
    pub paths: Vec<Path>,
    pub runways: Vec<Runway>,
    pub overhead_cranes: Vec<OverheadCrane>,
    pub jib_cranes: Vec<JibCrane>,
    pub conveyors: Vec<Conveyor>,
    pub agv_waypoints: Vec<AgvWaypoint>,
    pub agv_paths: Vec<AgvPath>,
    pub zones: Vec<Zone>,
}
