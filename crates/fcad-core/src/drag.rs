//! 约束拖动服务
//!
//! 把鼠标位置转换成合法的模型修改：
//! 投影到约束 → 碰撞/边界/画布检查 → 按实体类型修改模型。
//! 任一检查失败时返回 false，模型保持不变。

use crate::collision::{CollisionConfig, CollisionDetector};
use crate::constraint::{ConstraintFactory, GuideGeometry, Parameter, Projection};
use crate::entity::EntityRef;
use crate::layout::LayoutModel;
use crate::math::Point2;
use tracing::debug;

/// 约束拖动服务
#[derive(Debug, Clone, Default)]
pub struct ConstrainedDragService {
    factory: ConstraintFactory,
    detector: CollisionDetector,
}

impl ConstrainedDragService {
    pub fn new(collision: CollisionConfig) -> Self {
        Self {
            factory: ConstraintFactory,
            detector: CollisionDetector::new(collision),
        }
    }

    pub fn detector(&self) -> &CollisionDetector {
        &self.detector
    }

    /// 投影到实体的约束上；没有约束时原样返回，参数为标量 0
    pub fn project_to_constraint(
        &self,
        layout: &LayoutModel,
        entity: &EntityRef,
        pointer: Point2,
    ) -> Projection {
        match self.factory.constraint_for(layout, entity) {
            Some(constraint) => constraint.project(pointer),
            None => Projection {
                point: pointer,
                parameter: Parameter::Scalar(0.0),
            },
        }
    }

    /// 按鼠标位置更新实体，成功返回 true
    pub fn update_entity_position(
        &self,
        layout: &mut LayoutModel,
        entity: &EntityRef,
        pointer: Point2,
    ) -> bool {
        let Some(constraint) = self.factory.constraint_for(layout, entity) else {
            debug!("{} 不支持约束移动", entity);
            return false;
        };
        let Projection { point, parameter } = constraint.project(pointer);

        if self.detector.check_constraint_collision(layout, entity, point) {
            debug!("{} 移动被碰撞检查拒绝: ({:.1}, {:.1})", entity, point.x, point.y);
            return false;
        }
        if let Some(violation) = self.detector.boundary_violation(layout, entity, point) {
            debug!(
                "{} 移动被边界检查拒绝 ({:?}): ({:.1}, {:.1})",
                entity, violation, point.x, point.y
            );
            return false;
        }
        if !self.detector.is_within_canvas_bounds(layout, point) {
            debug!("{} 移动超出画布: ({:.1}, {:.1})", entity, point.x, point.y);
            return false;
        }

        match entity {
            EntityRef::OverheadCrane(id) => {
                // 轨道在修改时按ID重新查找
                let Some(zone) = layout
                    .overhead_crane(id)
                    .and_then(|c| layout.runway(&c.runway_id))
                    .map(|r| r.zone)
                else {
                    return false;
                };
                let Some(t) = parameter.scalar() else {
                    return false;
                };
                layout.set_bridge_position(id, zone.lerp(t))
            }
            // 悬臂吊只旋转，立柱不动；角度由动画单独驱动
            EntityRef::JibCrane(_) => true,
            EntityRef::Zone(id) => {
                let Some(zone) = layout.zone_mut(id) else {
                    return false;
                };
                if zone.is_empty() {
                    return false;
                }
                let offset = point - zone.centroid();
                zone.translate(&offset);
                true
            }
            EntityRef::Node(_) | EntityRef::Conveyor(_) | EntityRef::AgvPath(_) => false,
        }
    }

    pub fn constraint_guide(&self, layout: &LayoutModel, entity: &EntityRef) -> Option<GuideGeometry> {
        self.factory
            .constraint_for(layout, entity)
            .map(|c| c.visual_guide())
    }

    pub fn supports_constrained_movement(&self, layout: &LayoutModel, entity: &EntityRef) -> bool {
        self.factory.supports_constrained_movement(layout, entity)
    }

    pub fn would_collide(&self, layout: &LayoutModel, entity: &EntityRef, position: Point2) -> bool {
        self.detector.check_constraint_collision(layout, entity, position)
    }

    pub fn collision_warnings(
        &self,
        layout: &LayoutModel,
        entity: &EntityRef,
        position: Point2,
    ) -> Vec<String> {
        self.detector.collision_warnings(layout, entity, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crane::{JibCrane, OverheadCrane, Runway};
    use crate::math::{Rect, EPSILON};
    use crate::transport::{AgvPath, Conveyor};
    use crate::zone::Zone;

    fn layout() -> LayoutModel {
        let mut layout = LayoutModel::new();
        layout
            .insert_runway(
                Runway::new("r", Point2::new(0.0, 100.0), Point2::new(300.0, 100.0))
                    .with_zone(0.0, 200.0),
            )
            .unwrap();
        layout
            .insert_overhead_crane(OverheadCrane::new("c", "r", 50.0))
            .unwrap();
        layout
            .insert_zone(
                Zone::new(
                    "z",
                    vec![
                        Point2::new(0.0, 0.0),
                        Point2::new(20.0, 0.0),
                        Point2::new(20.0, 10.0),
                        Point2::new(0.0, 10.0),
                    ],
                )
                .unwrap(),
            )
            .unwrap();
        layout
    }

    #[test]
    fn test_overhead_crane_moves_along_zone() {
        let mut layout = layout();
        let service = ConstrainedDragService::default();
        let crane = EntityRef::OverheadCrane("c".into());

        assert!(service.update_entity_position(&mut layout, &crane, Point2::new(120.0, 140.0)));
        let bridge = layout.overhead_crane("c").unwrap().bridge_position();
        assert!((bridge - 120.0).abs() < EPSILON);
    }

    #[test]
    fn test_zone_translates_rigidly() {
        let mut layout = layout();
        let service = ConstrainedDragService::default();
        let zone = EntityRef::Zone("z".into());

        assert!(service.update_entity_position(&mut layout, &zone, Point2::new(110.0, 55.0)));
        let z = layout.zone("z").unwrap();
        let c = z.centroid();
        assert!((c.x - 110.0).abs() < EPSILON);
        assert!((c.y - 55.0).abs() < EPSILON);
        assert_eq!(z.bounds(), Rect::new(100.0, 50.0, 20.0, 10.0));
    }

    #[test]
    fn test_jib_drag_reports_success_without_mutation() {
        let mut layout = layout();
        layout
            .insert_jib_crane(JibCrane::new("j", Point2::new(250.0, 250.0), 30.0))
            .unwrap();
        let before = layout.jib_crane("j").cloned();
        let service = ConstrainedDragService::default();

        assert!(service.update_entity_position(
            &mut layout,
            &EntityRef::JibCrane("j".into()),
            Point2::new(260.0, 270.0)
        ));
        assert_eq!(layout.jib_crane("j").cloned(), before);
    }

    #[test]
    fn test_unsupported_and_missing_entities() {
        let mut layout = layout();
        layout
            .insert_conveyor(Conveyor::new("cv", "a", "b"))
            .unwrap();
        layout.insert_agv_path(AgvPath::new("ap", "w1", "w2")).unwrap();
        let service = ConstrainedDragService::default();
        let p = Point2::new(10.0, 10.0);

        for entity in [
            EntityRef::Conveyor("cv".into()),
            EntityRef::AgvPath("ap".into()),
            EntityRef::OverheadCrane("missing".into()),
            EntityRef::Node("nope".into()),
        ] {
            assert!(!service.update_entity_position(&mut layout, &entity, p));
            let projection = service.project_to_constraint(&layout, &entity, p);
            assert_eq!(projection.point, p);
            assert_eq!(projection.parameter, Parameter::Scalar(0.0));
            assert!(service.constraint_guide(&layout, &entity).is_none());
        }
    }

    #[test]
    fn test_dangling_runway_fails() {
        let mut layout = layout();
        layout.remove_runway("r");
        let service = ConstrainedDragService::default();
        let crane = EntityRef::OverheadCrane("c".into());

        assert!(!service.update_entity_position(&mut layout, &crane, Point2::new(120.0, 100.0)));
        assert_eq!(layout.overhead_crane("c").unwrap().bridge_position(), 50.0);
    }

    #[test]
    fn test_canvas_gate_rejects() {
        let mut layout = layout().with_canvas(100.0, 200.0);
        let service = ConstrainedDragService::default();
        let crane = EntityRef::OverheadCrane("c".into());

        assert!(!service.update_entity_position(&mut layout, &crane, Point2::new(150.0, 100.0)));
        assert_eq!(layout.overhead_crane("c").unwrap().bridge_position(), 50.0);
        assert!(service.update_entity_position(&mut layout, &crane, Point2::new(90.0, 100.0)));
    }
}
