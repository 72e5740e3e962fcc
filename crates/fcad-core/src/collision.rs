//! 碰撞与边界检测
//!
//! 拖动时依次执行三道检查：碰撞 → 边界 → 画布。任一检查失败，移动即被拒绝。
//! 警告信息只用于界面提示，不影响合法性判断。

use crate::constraint::ConstraintFactory;
use crate::crane::ZoneRange;
use crate::entity::EntityRef;
use crate::layout::LayoutModel;
use crate::math::{distance, Point2};
use serde::{Deserialize, Serialize};

/// 碰撞检测配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollisionConfig {
    /// 同一轨道上两台桥吊的最小间距（占轨道长度的比例）
    pub crane_clearance_ratio: f64,
    /// 悬臂吊覆盖范围外扩量
    pub jib_margin: f64,
    /// 区域中心最小间距
    pub zone_separation: f64,
    /// 输送线最小间距
    pub conveyor_separation: f64,
    /// 边界检查容差
    pub boundary_tolerance: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            crane_clearance_ratio: 0.1,
            jib_margin: 5.0,
            zone_separation: 20.0,
            conveyor_separation: 10.0,
            boundary_tolerance: 1.0,
        }
    }
}

/// 边界违规类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoundaryViolation {
    /// 超出轨道物理范围
    OutsideRunway,
    /// 在轨道上，但超出工作区间
    OutsideZone,
    /// 偏离约束曲线
    OffConstraint,
}

impl BoundaryViolation {
    pub fn message(&self) -> &'static str {
        match self {
            BoundaryViolation::OutsideRunway => "Position outside runway extent",
            BoundaryViolation::OutsideZone => "Position outside crane operating zone",
            BoundaryViolation::OffConstraint => "Position outside constraint boundary",
        }
    }
}

/// 碰撞检测器
#[derive(Debug, Clone, Default)]
pub struct CollisionDetector {
    config: CollisionConfig,
    factory: ConstraintFactory,
}

impl CollisionDetector {
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            config,
            factory: ConstraintFactory,
        }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// 实体放到 `position` 是否会与其他实体冲突
    pub fn check_constraint_collision(
        &self,
        layout: &LayoutModel,
        entity: &EntityRef,
        position: Point2,
    ) -> bool {
        !self.colliding_entities(layout, entity, position).is_empty()
    }

    /// 与候选位置冲突的实体
    pub fn colliding_entities(
        &self,
        layout: &LayoutModel,
        entity: &EntityRef,
        position: Point2,
    ) -> Vec<EntityRef> {
        match entity {
            EntityRef::OverheadCrane(id) => self.overhead_crane_collisions(layout, id, position),
            EntityRef::JibCrane(id) => layout
                .jib_cranes()
                .iter()
                .filter(|other| &other.id != id)
                .filter(|other| other.contains_point(&position, self.config.jib_margin))
                .map(|other| EntityRef::JibCrane(other.id.clone()))
                .collect(),
            EntityRef::Zone(id) => layout
                .zones()
                .iter()
                .filter(|other| &other.id != id && !other.is_empty())
                .filter(|other| distance(&position, &other.centroid()) < self.config.zone_separation)
                .map(|other| EntityRef::Zone(other.id.clone()))
                .collect(),
            EntityRef::Conveyor(id) => layout
                .conveyors()
                .iter()
                .filter(|other| &other.id != id)
                .filter(|other| {
                    other
                        .start_point()
                        .is_some_and(|p| distance(&position, p) < self.config.conveyor_separation)
                })
                .map(|other| EntityRef::Conveyor(other.id.clone()))
                .collect(),
            EntityRef::Node(_) | EntityRef::AgvPath(_) => Vec::new(),
        }
    }

    /// 同一轨道上的其他桥吊，占用区间与候选大车位置重叠即为冲突
    fn overhead_crane_collisions(
        &self,
        layout: &LayoutModel,
        crane_id: &str,
        position: Point2,
    ) -> Vec<EntityRef> {
        let Some(crane) = layout.overhead_crane(crane_id) else {
            return Vec::new();
        };
        let Some(runway) = layout.runway(&crane.runway_id) else {
            return Vec::new();
        };

        let clearance = self.config.crane_clearance_ratio * runway.length();
        let candidate = runway
            .zone
            .clamp(runway.parameter_at(&position) * runway.length());
        let half = clearance / 2.0;
        let span = ZoneRange::new(candidate - half, candidate + half);

        layout
            .overhead_cranes()
            .iter()
            .filter(|other| other.id != crane.id && other.runway_id == crane.runway_id)
            .filter(|other| other.bridge_span(clearance).overlaps(&span))
            .map(|other| EntityRef::OverheadCrane(other.id.clone()))
            .collect()
    }

    /// 候选位置违反了哪种边界
    ///
    /// 桥吊区分"超出轨道"和"超出工作区间"；其他实体只检查是否偏离约束。
    /// 没有约束的实体不会违规。
    pub fn boundary_violation(
        &self,
        layout: &LayoutModel,
        entity: &EntityRef,
        position: Point2,
    ) -> Option<BoundaryViolation> {
        let tolerance = self.config.boundary_tolerance;

        if let EntityRef::OverheadCrane(id) = entity {
            let crane = layout.overhead_crane(id)?;
            let runway = layout.runway(&crane.runway_id)?;
            let length = runway.length();
            let along = runway.raw_parameter_at(&position) * length;

            if along < -tolerance || along > length + tolerance {
                return Some(BoundaryViolation::OutsideRunway);
            }
            if !runway.zone.contains(along, tolerance) {
                return Some(BoundaryViolation::OutsideZone);
            }
            let offset = (position - runway.start).dot(&runway.perpendicular()).abs();
            if offset > tolerance {
                return Some(BoundaryViolation::OffConstraint);
            }
            return None;
        }

        let constraint = self.factory.constraint_for(layout, entity)?;
        let projected = constraint.project(position);
        (distance(&position, &projected.point) > tolerance).then_some(BoundaryViolation::OffConstraint)
    }

    pub fn check_boundary_violation(
        &self,
        layout: &LayoutModel,
        entity: &EntityRef,
        position: Point2,
    ) -> bool {
        self.boundary_violation(layout, entity, position).is_some()
    }

    /// 是否在画布范围内（未设置画布时总是 true）
    pub fn is_within_canvas_bounds(&self, layout: &LayoutModel, position: Point2) -> bool {
        layout.canvas().is_none_or(|canvas| canvas.contains(&position))
    }

    /// 界面提示信息
    pub fn collision_warnings(
        &self,
        layout: &LayoutModel,
        entity: &EntityRef,
        position: Point2,
    ) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(violation) = self.boundary_violation(layout, entity, position) {
            warnings.push(violation.message().to_string());
        }

        for other in self.colliding_entities(layout, entity, position) {
            warnings.push(format!("Collision with {}", display_name(layout, &other)));
        }

        if !self.is_within_canvas_bounds(layout, position) {
            warnings.push("Position outside canvas".to_string());
        }

        if !matches!(entity, EntityRef::Zone(_)) {
            for zone in layout.zones().iter().filter(|z| z.contains_point(&position)) {
                warnings.push(format!("Inside zone {}", zone.name));
            }
        }

        warnings
    }
}

fn display_name(layout: &LayoutModel, entity: &EntityRef) -> String {
    let name = match entity {
        EntityRef::OverheadCrane(id) => layout.overhead_crane(id).map(|c| c.name.as_str()),
        EntityRef::JibCrane(id) => layout.jib_crane(id).map(|c| c.name.as_str()),
        EntityRef::Zone(id) => layout.zone(id).map(|z| z.name.as_str()),
        EntityRef::Conveyor(id) => layout.conveyor(id).map(|c| c.name.as_str()),
        EntityRef::Node(id) => layout.node(id).map(|n| n.name.as_str()),
        EntityRef::AgvPath(_) => None,
    };
    match name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => entity.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crane::{JibCrane, OverheadCrane, Runway};
    use crate::transport::Conveyor;
    use crate::zone::Zone;

    fn square(id: &str, x: f64, y: f64) -> Zone {
        Zone::new(
            id,
            vec![
                Point2::new(x, y),
                Point2::new(x + 10.0, y),
                Point2::new(x + 10.0, y + 10.0),
                Point2::new(x, y + 10.0),
            ],
        )
        .unwrap()
    }

    fn runway_layout() -> LayoutModel {
        let mut layout = LayoutModel::new();
        layout
            .insert_runway(
                Runway::new("r", Point2::new(0.0, 0.0), Point2::new(300.0, 0.0))
                    .with_zone(0.0, 200.0),
            )
            .unwrap();
        layout
            .insert_overhead_crane(OverheadCrane::new("c1", "r", 50.0))
            .unwrap();
        layout
            .insert_overhead_crane(OverheadCrane::new("c2", "r", 150.0))
            .unwrap();
        layout
    }

    #[test]
    fn test_overhead_crane_clearance() {
        let layout = runway_layout();
        let detector = CollisionDetector::default();
        let c1 = EntityRef::OverheadCrane("c1".into());

        // 间距 30 = 0.1 × 300
        assert!(detector.check_constraint_collision(&layout, &c1, Point2::new(130.0, 0.0)));
        assert!(!detector.check_constraint_collision(&layout, &c1, Point2::new(119.0, 0.0)));
        // 自己原来的位置不算冲突
        assert!(!detector.check_constraint_collision(&layout, &c1, Point2::new(50.0, 0.0)));
    }

    #[test]
    fn test_overhead_crane_boundary_kinds() {
        let layout = runway_layout();
        let detector = CollisionDetector::default();
        let c1 = EntityRef::OverheadCrane("c1".into());

        assert_eq!(detector.boundary_violation(&layout, &c1, Point2::new(100.0, 0.0)), None);
        assert_eq!(
            detector.boundary_violation(&layout, &c1, Point2::new(250.0, 0.0)),
            Some(BoundaryViolation::OutsideZone)
        );
        assert_eq!(
            detector.boundary_violation(&layout, &c1, Point2::new(390.0, 0.0)),
            Some(BoundaryViolation::OutsideRunway)
        );
        assert_eq!(
            detector.boundary_violation(&layout, &c1, Point2::new(100.0, 20.0)),
            Some(BoundaryViolation::OffConstraint)
        );
    }

    #[test]
    fn test_jib_and_zone_collisions() {
        let mut layout = LayoutModel::new();
        layout
            .insert_jib_crane(JibCrane::new("j1", Point2::new(0.0, 0.0), 30.0))
            .unwrap();
        layout
            .insert_jib_crane(JibCrane::new("j2", Point2::new(100.0, 0.0), 30.0))
            .unwrap();
        layout.insert_zone(square("z1", 0.0, 0.0)).unwrap();
        layout.insert_zone(square("z2", 200.0, 200.0)).unwrap();

        let detector = CollisionDetector::default();
        let j1 = EntityRef::JibCrane("j1".into());
        assert!(detector.check_constraint_collision(&layout, &j1, Point2::new(66.0, 0.0)));
        assert!(!detector.check_constraint_collision(&layout, &j1, Point2::new(64.0, 0.0)));

        let z1 = EntityRef::Zone("z1".into());
        assert!(detector.check_constraint_collision(&layout, &z1, Point2::new(195.0, 195.0)));
        assert!(!detector.check_constraint_collision(&layout, &z1, Point2::new(150.0, 150.0)));
        // 自由约束不会偏离
        assert!(!detector.check_boundary_violation(&layout, &z1, Point2::new(150.0, 150.0)));
    }

    #[test]
    fn test_conveyor_collision_uses_first_point() {
        let mut layout = LayoutModel::new();
        layout
            .insert_conveyor(Conveyor::new("a", "n1", "n2"))
            .unwrap();
        layout
            .insert_conveyor(
                Conveyor::new("b", "n3", "n4")
                    .with_path(vec![Point2::new(50.0, 50.0), Point2::new(90.0, 50.0)]),
            )
            .unwrap();

        let detector = CollisionDetector::default();
        let a = EntityRef::Conveyor("a".into());
        assert!(detector.check_constraint_collision(&layout, &a, Point2::new(55.0, 50.0)));
        assert!(!detector.check_constraint_collision(&layout, &a, Point2::new(89.0, 50.0)));
    }

    #[test]
    fn test_canvas_bounds() {
        let detector = CollisionDetector::default();
        let unbounded = LayoutModel::new();
        assert!(detector.is_within_canvas_bounds(&unbounded, Point2::new(-1e6, 1e6)));

        let layout = LayoutModel::new().with_canvas(100.0, 50.0);
        assert!(detector.is_within_canvas_bounds(&layout, Point2::new(100.0, 50.0)));
        assert!(!detector.is_within_canvas_bounds(&layout, Point2::new(100.1, 0.0)));
        assert!(!detector.is_within_canvas_bounds(&layout, Point2::new(0.0, -0.1)));
    }

    #[test]
    fn test_warnings_name_colliding_entity() {
        let mut layout = runway_layout().with_canvas(120.0, 100.0);
        let mut zone = square("bay", 120.0, -5.0);
        zone.name = "Bay 3".into();
        layout.insert_zone(zone).unwrap();

        let detector = CollisionDetector::default();
        let c1 = EntityRef::OverheadCrane("c1".into());
        let warnings = detector.collision_warnings(&layout, &c1, Point2::new(125.0, 0.0));
        assert_eq!(
            warnings,
            vec![
                "Collision with c2".to_string(),
                "Position outside canvas".to_string(),
                "Inside zone Bay 3".to_string(),
            ]
        );
    }
}
