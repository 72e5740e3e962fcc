//! 几何交互引擎
//!
//! 把约束拖动、捕捉和自动连线组合在一起，对外提供界面需要的全部操作。
//! 引擎本身不持有布局，每次调用显式传入。调用方保证同一时刻只有一个实体在被拖动。

use crate::auto_path::AutoPathDetector;
use crate::config::EngineConfig;
use crate::constraint::{GuideGeometry, Projection};
use crate::drag::ConstrainedDragService;
use crate::entity::EntityRef;
use crate::layout::LayoutModel;
use crate::math::Point2;
use crate::snap::{SnapEngine, SnapResult, SpacingGuide};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct InteractionEngine {
    drag: ConstrainedDragService,
    snap: SnapEngine,
    auto_path: AutoPathDetector,
}

impl InteractionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            drag: ConstrainedDragService::new(config.collision),
            snap: SnapEngine::new(config.snap),
            auto_path: AutoPathDetector::new(config.auto_path),
        }
    }

    pub fn snap_engine(&self) -> &SnapEngine {
        &self.snap
    }

    pub fn snap_engine_mut(&mut self) -> &mut SnapEngine {
        &mut self.snap
    }

    // === 约束拖动 ===

    pub fn project_to_constraint(
        &self,
        layout: &LayoutModel,
        entity: &EntityRef,
        pointer: Point2,
    ) -> Projection {
        self.drag.project_to_constraint(layout, entity, pointer)
    }

    pub fn update_entity_position(
        &self,
        layout: &mut LayoutModel,
        entity: &EntityRef,
        pointer: Point2,
    ) -> bool {
        self.drag.update_entity_position(layout, entity, pointer)
    }

    pub fn constraint_guide(&self, layout: &LayoutModel, entity: &EntityRef) -> Option<GuideGeometry> {
        self.drag.constraint_guide(layout, entity)
    }

    pub fn supports_constrained_movement(&self, layout: &LayoutModel, entity: &EntityRef) -> bool {
        self.drag.supports_constrained_movement(layout, entity)
    }

    pub fn would_collide(&self, layout: &LayoutModel, entity: &EntityRef, position: Point2) -> bool {
        self.drag.would_collide(layout, entity, position)
    }

    pub fn collision_warnings(
        &self,
        layout: &LayoutModel,
        entity: &EntityRef,
        position: Point2,
    ) -> Vec<String> {
        self.drag.collision_warnings(layout, entity, position)
    }

    // === 捕捉 ===

    pub fn snap(&self, layout: &LayoutModel, point: Point2, exclude_id: Option<&str>) -> SnapResult {
        self.snap.snap(point, layout, exclude_id)
    }

    pub fn snap_to_grid(&self, point: Point2) -> Point2 {
        self.snap.snap_to_grid(point)
    }

    pub fn snap_value_to_grid(&self, value: f64) -> f64 {
        self.snap.snap_value_to_grid(value)
    }

    pub fn calculate_spacing(&self, layout: &LayoutModel) -> Vec<SpacingGuide> {
        self.snap.calculate_spacing(layout)
    }

    /// 自由拖动节点：捕捉（排除节点自身）后把左上角放到捕捉点
    pub fn move_node(&self, layout: &mut LayoutModel, id: &str, pointer: Point2) -> Option<SnapResult> {
        layout.node(id)?;
        let result = self.snap.snap(pointer, layout, Some(id));
        if !layout.move_node_to(id, result.point) {
            return None;
        }
        debug!("节点 {} 移动到 ({:.1}, {:.1})", id, result.point.x, result.point.y);
        Some(result)
    }

    // === 自动连线 ===

    pub fn detect_and_connect<S: AsRef<str>>(&self, layout: &mut LayoutModel, moved: &[S]) -> usize {
        self.auto_path.detect_and_connect(layout, moved)
    }

    pub fn detect_and_connect_single(&self, layout: &mut LayoutModel, node_id: &str) -> usize {
        self.auto_path.detect_and_connect_single(layout, node_id)
    }
}
