//! 约束系统
//!
//! 每种可拖动实体对应一条参数化曲线或区域，拖动时鼠标位置先投影到约束上：
//! - `Linear`: 桥式起重机沿轨道工作区间移动，参数 ∈ [0, 1]
//! - `Arc`: 悬臂吊绕立柱旋转，参数为角度（弧度）
//! - `Free`: 区域整体平移，参数就是平面上的点，投影和求值都是恒等映射
//!
//! 约束是派生数据，每次查询时按实体当前几何重新构建，不做缓存。

use crate::entity::EntityRef;
use crate::layout::LayoutModel;
use crate::math::{normalize_angle, Point2, Vector2, EPSILON, TAU};
use serde::{Deserialize, Serialize};

/// 约束类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintKind {
    Linear,
    Arc,
    Free,
}

/// 约束参数
///
/// 线段和圆弧是一维参数，自由平移的参数域是平面本身。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parameter {
    Scalar(f64),
    Point(Point2),
}

impl Parameter {
    pub fn scalar(self) -> Option<f64> {
        match self {
            Parameter::Scalar(t) => Some(t),
            Parameter::Point(_) => None,
        }
    }
}

impl From<f64> for Parameter {
    fn from(t: f64) -> Self {
        Parameter::Scalar(t)
    }
}

impl From<Point2> for Parameter {
    fn from(point: Point2) -> Self {
        Parameter::Point(point)
    }
}

/// 投影结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// 约束上的位置
    pub point: Point2,
    /// 约束参数，`evaluate(parameter) == point`
    pub parameter: Parameter,
}

/// 约束的可视化引导几何（只用于显示）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GuideGeometry {
    Segment {
        start: Point2,
        end: Point2,
    },
    #[serde(rename_all = "camelCase")]
    Arc {
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Polygon {
        points: Vec<Point2>,
    },
}

/// 线段约束
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearConstraint {
    pub start: Point2,
    pub end: Point2,
}

impl LinearConstraint {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    fn project(&self, point: &Point2) -> f64 {
        let d = self.end - self.start;
        let len_sq = d.norm_squared();
        if len_sq < EPSILON {
            return 0.0;
        }
        ((point - self.start).dot(&d) / len_sq).clamp(0.0, 1.0)
    }

    fn evaluate(&self, t: f64) -> Point2 {
        let t = t.clamp(0.0, 1.0);
        self.start + (self.end - self.start) * t
    }
}

/// 圆弧约束（弧度，`end_angle >= start_angle`）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcConstraint {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ArcConstraint {
    /// 创建圆弧约束，终止角小于起始角时加一整圈
    pub fn new(center: Point2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        let start_angle = normalize_angle(start_angle);
        let mut end_angle = start_angle + normalize_angle(end_angle - start_angle);
        if end_angle - start_angle < EPSILON {
            end_angle = start_angle + TAU;
        }
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    pub fn is_full_circle(&self) -> bool {
        self.end_angle - self.start_angle >= TAU - EPSILON
    }

    /// 鼠标方向的角度，截断到圆弧范围
    ///
    /// 落在圆弧外时取角度上更近的一端，距离相等时取起点。
    fn project(&self, point: &Point2) -> f64 {
        let offset = point - self.center;
        if offset.norm() < EPSILON {
            return self.start_angle;
        }

        let angle = offset.y.atan2(offset.x);
        let lifted = self.start_angle + normalize_angle(angle - self.start_angle);
        if lifted <= self.end_angle {
            return lifted;
        }

        let past_end = lifted - self.end_angle;
        let before_start = self.start_angle + TAU - lifted;
        if before_start <= past_end {
            self.start_angle
        } else {
            self.end_angle
        }
    }

    fn evaluate(&self, angle: f64) -> Point2 {
        let angle = angle.clamp(self.start_angle, self.end_angle);
        self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius
    }
}

/// 自由平移约束
#[derive(Debug, Clone, PartialEq)]
pub struct FreeConstraint {
    /// 实体锚点（区域中心）
    pub anchor: Point2,
    /// 实体轮廓
    pub outline: Vec<Point2>,
}

/// 约束
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Linear(LinearConstraint),
    Arc(ArcConstraint),
    Free(FreeConstraint),
}

impl Constraint {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Linear(_) => ConstraintKind::Linear,
            Constraint::Arc(_) => ConstraintKind::Arc,
            Constraint::Free(_) => ConstraintKind::Free,
        }
    }

    /// 把任意点投影到约束上
    pub fn project(&self, point: Point2) -> Projection {
        match self {
            Constraint::Linear(c) => {
                let t = c.project(&point);
                Projection {
                    point: c.evaluate(t),
                    parameter: Parameter::Scalar(t),
                }
            }
            Constraint::Arc(c) => {
                let t = c.project(&point);
                Projection {
                    point: c.evaluate(t),
                    parameter: Parameter::Scalar(t),
                }
            }
            Constraint::Free(_) => Projection {
                point,
                parameter: Parameter::Point(point),
            },
        }
    }

    /// 参数对应的位置（标量参数会被截断到有效范围）
    ///
    /// 自由平移原样返回点参数，标量参数落在锚点上；
    /// 线段和圆弧收到点参数时先投影。
    pub fn evaluate(&self, parameter: Parameter) -> Point2 {
        match (self, parameter) {
            (Constraint::Free(_), Parameter::Point(point)) => point,
            (Constraint::Free(c), Parameter::Scalar(_)) => c.anchor,
            (_, Parameter::Point(point)) => self.project(point).point,
            (Constraint::Linear(c), Parameter::Scalar(t)) => c.evaluate(t),
            (Constraint::Arc(c), Parameter::Scalar(angle)) => c.evaluate(angle),
        }
    }

    pub fn parameter_range(&self) -> (f64, f64) {
        match self {
            Constraint::Linear(_) => (0.0, 1.0),
            Constraint::Arc(c) => (c.start_angle, c.end_angle),
            Constraint::Free(_) => (0.0, 0.0),
        }
    }

    pub fn visual_guide(&self) -> GuideGeometry {
        match self {
            Constraint::Linear(c) => GuideGeometry::Segment {
                start: c.start,
                end: c.end,
            },
            Constraint::Arc(c) => GuideGeometry::Arc {
                center: c.center,
                radius: c.radius,
                start_angle: c.start_angle,
                end_angle: c.end_angle,
            },
            Constraint::Free(c) => GuideGeometry::Polygon {
                points: c.outline.clone(),
            },
        }
    }
}

/// 按实体类型构建约束
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintFactory;

impl ConstraintFactory {
    /// 查找实体对应的约束，不支持约束移动或实体不存在时返回 `None`
    pub fn constraint_for(&self, layout: &LayoutModel, entity: &EntityRef) -> Option<Constraint> {
        match entity {
            EntityRef::OverheadCrane(id) => {
                let crane = layout.overhead_crane(id)?;
                let runway = layout.runway(&crane.runway_id)?;
                let (start, end) = runway.zone_endpoints();
                Some(Constraint::Linear(LinearConstraint::new(start, end)))
            }
            EntityRef::JibCrane(id) => {
                let jib = layout.jib_crane(id)?;
                let (start, end) = jib.arc_radians();
                Some(Constraint::Arc(ArcConstraint::new(
                    jib.center, jib.radius, start, end,
                )))
            }
            EntityRef::Zone(id) => {
                let zone = layout.zone(id)?;
                Some(Constraint::Free(FreeConstraint {
                    anchor: zone.centroid(),
                    outline: zone.points().to_vec(),
                }))
            }
            EntityRef::Node(_) | EntityRef::Conveyor(_) | EntityRef::AgvPath(_) => None,
        }
    }

    pub fn supports_constrained_movement(&self, layout: &LayoutModel, entity: &EntityRef) -> bool {
        match entity {
            EntityRef::OverheadCrane(id) => layout
                .overhead_crane(id)
                .is_some_and(|c| layout.runway(&c.runway_id).is_some()),
            EntityRef::JibCrane(id) => layout.jib_crane(id).is_some(),
            EntityRef::Zone(id) => layout.zone(id).is_some(),
            EntityRef::Node(_) | EntityRef::Conveyor(_) | EntityRef::AgvPath(_) => false,
        }
    }
}
