//! 起重设备
//!
//! - `Runway`: 桥式起重机的轨道，带一个工作区间 [min, max]（沿轨道距离）
//! - `OverheadCrane`: 桥式起重机，大车位置受所属轨道工作区间约束
//! - `JibCrane`: 悬臂吊，固定立柱 + 圆弧覆盖范围

use crate::math::{normalize_angle, Point2, Vector2, EPSILON, TAU};
use serde::{Deserialize, Serialize};

/// 轨道工作区间（沿轨道从起点量起的距离）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneRange {
    pub min: f64,
    pub max: f64,
}

impl ZoneRange {
    /// 创建区间，自动整理上下界顺序
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        value >= self.min - tolerance && value <= self.max + tolerance
    }

    /// 参数 t ∈ [0,1] 映射到区间内的位置
    pub fn lerp(&self, t: f64) -> f64 {
        self.min + t * self.span()
    }

    /// 两个区间是否有重叠（端点相接不算）
    pub fn overlaps(&self, other: &ZoneRange) -> bool {
        self.min < other.max && other.min < self.max
    }
}

/// 桥式起重机轨道
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runway {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub start: Point2,
    pub end: Point2,
    /// 工作区间
    pub zone: ZoneRange,
}

impl Runway {
    /// 创建轨道，工作区间默认覆盖整条轨道
    pub fn new(id: impl Into<String>, start: Point2, end: Point2) -> Self {
        let length = (end - start).norm();
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            start,
            end,
            zone: ZoneRange::new(0.0, length),
        }
    }

    /// 设置工作区间（会被限制在轨道长度内）
    pub fn with_zone(mut self, min: f64, max: f64) -> Self {
        self.zone = ZoneRange::new(min, max);
        self.normalize_zone();
        self
    }

    /// 把工作区间整理到 [0, length]
    pub fn normalize_zone(&mut self) {
        let length = self.length();
        let a = self.zone.min.clamp(0.0, length);
        let b = self.zone.max.clamp(0.0, length);
        self.zone = ZoneRange::new(a, b);
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// 轨道方向角（弧度）
    pub fn angle(&self) -> f64 {
        let d = self.end - self.start;
        d.y.atan2(d.x)
    }

    /// 轨道上比例位置的坐标（0 = 起点, 1 = 终点）
    pub fn position_at(&self, t: f64) -> Point2 {
        let t = t.clamp(0.0, 1.0);
        self.start + (self.end - self.start) * t
    }

    /// 轨道上指定距离处的坐标
    pub fn position_at_distance(&self, distance: f64) -> Point2 {
        let length = self.length();
        if length < EPSILON {
            return self.start;
        }
        self.position_at(distance / length)
    }

    /// 点投影到轨道直线上的比例参数（不截断，可能超出 [0,1]）
    pub fn raw_parameter_at(&self, point: &Point2) -> f64 {
        let d = self.end - self.start;
        let len_sq = d.norm_squared();
        if len_sq < 0.001 {
            return 0.0;
        }
        (point - self.start).dot(&d) / len_sq
    }

    /// 点投影到轨道上的比例参数，截断到 [0,1]
    pub fn parameter_at(&self, point: &Point2) -> f64 {
        self.raw_parameter_at(point).clamp(0.0, 1.0)
    }

    /// 左侧单位法向量（从起点看向终点）
    pub fn perpendicular(&self) -> Vector2 {
        let length = self.length();
        if length < 0.001 {
            return Vector2::zeros();
        }
        let d = self.end - self.start;
        Vector2::new(-d.y / length, d.x / length)
    }

    /// 工作区间两端的坐标
    pub fn zone_endpoints(&self) -> (Point2, Point2) {
        (
            self.position_at_distance(self.zone.min),
            self.position_at_distance(self.zone.max),
        )
    }
}

/// 桥式起重机（EOT）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverheadCrane {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// 所属轨道ID（按ID查找，不持有引用）
    pub runway_id: String,
    /// 大车沿轨道的位置，只能通过 `LayoutModel::set_bridge_position` 修改
    bridge_position: f64,
    /// 左侧（从起点看向终点）覆盖宽度
    #[serde(default = "default_reach")]
    pub reach_left: f64,
    /// 右侧覆盖宽度
    #[serde(default = "default_reach")]
    pub reach_right: f64,
    /// 动画起始位置快照
    #[serde(skip)]
    pub animation_start_position: f64,
}

fn default_reach() -> f64 {
    10.0
}

impl OverheadCrane {
    pub fn new(id: impl Into<String>, runway_id: impl Into<String>, bridge_position: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            runway_id: runway_id.into(),
            bridge_position,
            reach_left: default_reach(),
            reach_right: default_reach(),
            animation_start_position: bridge_position,
        }
    }

    pub fn bridge_position(&self) -> f64 {
        self.bridge_position
    }

    /// 写入大车位置并截断到工作区间
    pub(crate) fn set_bridge_position(&mut self, value: f64, zone: &ZoneRange) {
        self.bridge_position = zone.clamp(value);
    }

    /// 记录当前大车位置作为动画起点
    pub fn capture_animation_start(&mut self) {
        self.animation_start_position = self.bridge_position;
    }

    /// 大车在轨道上的坐标
    pub fn bridge_point(&self, runway: &Runway) -> Point2 {
        runway.position_at_distance(self.bridge_position)
    }

    pub fn total_reach(&self) -> f64 {
        self.reach_left + self.reach_right
    }

    /// 以大车位置为中心、宽度为 `clearance` 的占用区间
    pub fn bridge_span(&self, clearance: f64) -> ZoneRange {
        let half = clearance / 2.0;
        ZoneRange::new(self.bridge_position - half, self.bridge_position + half)
    }

    /// 服务范围：轨道工作区间两侧各按覆盖宽度外扩的四边形
    ///
    /// 顶点顺序：区间起点左侧、终点左侧、终点右侧、起点右侧。
    pub fn service_envelope(&self, runway: &Runway) -> [Point2; 4] {
        let (a, b) = runway.zone_endpoints();
        let n = runway.perpendicular();
        [
            a + n * self.reach_left,
            b + n * self.reach_left,
            b - n * self.reach_right,
            a - n * self.reach_right,
        ]
    }
}

/// 悬臂吊
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JibCrane {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// 立柱中心
    pub center: Point2,
    /// 臂长
    pub radius: f64,
    /// 圆弧起始角（度，0 = 右侧，逆时针）
    pub arc_start: f64,
    /// 圆弧终止角（度），与起始角相等表示整圆
    pub arc_end: f64,
    /// 当前臂角（度）
    #[serde(default)]
    pub current_angle: f64,
    /// 动画起始角快照
    #[serde(skip)]
    pub animation_start_angle: f64,
}

impl JibCrane {
    pub fn new(id: impl Into<String>, center: Point2, radius: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            center,
            radius: radius.max(1.0),
            arc_start: 0.0,
            arc_end: 360.0,
            current_angle: 0.0,
            animation_start_angle: 0.0,
        }
    }

    /// 设置覆盖圆弧（度）
    pub fn with_arc(mut self, start: f64, end: f64) -> Self {
        self.arc_start = start;
        self.arc_end = end;
        self
    }

    /// 扫过的角度（度），范围 (0, 360]
    pub fn sweep(&self) -> f64 {
        let sweep = (self.arc_end - self.arc_start).rem_euclid(360.0);
        if sweep < EPSILON {
            360.0
        } else {
            sweep
        }
    }

    pub fn is_full_circle(&self) -> bool {
        (self.sweep() - 360.0).abs() < 0.1
    }

    /// 圆弧起止角（弧度），终止角总是不小于起始角
    pub fn arc_radians(&self) -> (f64, f64) {
        let start = normalize_angle(self.arc_start.to_radians());
        (start, start + self.sweep().to_radians())
    }

    /// 检查点是否在覆盖扇形内，`margin` 向外扩展半径
    pub fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        let offset = point - self.center;
        if offset.norm() >= self.radius + margin {
            return false;
        }
        if self.is_full_circle() || offset.norm() < EPSILON {
            return true;
        }

        let (start, end) = self.arc_radians();
        let angle = normalize_angle(offset.y.atan2(offset.x));
        start + normalize_angle(angle - start) <= end
    }

    pub fn capture_animation_start(&mut self) {
        self.animation_start_angle = self.current_angle;
    }

    /// 覆盖范围多边形
    ///
    /// 整圆时返回 `segments` 个圆周点；扇形时首个顶点为立柱中心，其后是
    /// `segments + 1` 个圆弧点。
    pub fn coverage_polygon(&self, segments: usize) -> Vec<Point2> {
        let segments = segments.max(3);
        if self.is_full_circle() {
            return (0..segments)
                .map(|i| self.point_at_angle(TAU * i as f64 / segments as f64))
                .collect();
        }

        let (start, end) = self.arc_radians();
        let step = (end - start) / segments as f64;
        std::iter::once(self.center)
            .chain((0..=segments).map(|i| self.point_at_angle(start + step * i as f64)))
            .collect()
    }

    /// 臂长处指定角度（弧度）的点
    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_range_normalized() {
        let zone = ZoneRange::new(200.0, 50.0);
        assert_eq!(zone.min, 50.0);
        assert_eq!(zone.max, 200.0);
        assert_eq!(zone.clamp(260.0), 200.0);
        assert!((zone.lerp(0.5) - 125.0).abs() < EPSILON);
    }

    #[test]
    fn test_runway_zone_clamped_to_length() {
        let runway = Runway::new("r", Point2::new(0.0, 0.0), Point2::new(100.0, 0.0))
            .with_zone(-20.0, 150.0);
        assert_eq!(runway.zone, ZoneRange::new(0.0, 100.0));
    }

    #[test]
    fn test_runway_parameters() {
        let runway = Runway::new("r", Point2::new(0.0, 0.0), Point2::new(200.0, 0.0));
        assert!((runway.raw_parameter_at(&Point2::new(260.0, 30.0)) - 1.3).abs() < EPSILON);
        assert_eq!(runway.parameter_at(&Point2::new(260.0, 30.0)), 1.0);
        assert_eq!(runway.parameter_at(&Point2::new(-50.0, 0.0)), 0.0);

        let p = runway.position_at_distance(50.0);
        assert!((p.x - 50.0).abs() < EPSILON);

        let perp = runway.perpendicular();
        assert!((perp.y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_jib_sweep_and_full_circle() {
        let full = JibCrane::new("j", Point2::origin(), 20.0);
        assert!(full.is_full_circle());

        let wrapped = JibCrane::new("j", Point2::origin(), 20.0).with_arc(270.0, 90.0);
        assert!((wrapped.sweep() - 180.0).abs() < EPSILON);
        let (start, end) = wrapped.arc_radians();
        assert!(end > start);
    }

    #[test]
    fn test_jib_contains_point() {
        let jib = JibCrane::new("j", Point2::new(0.0, 0.0), 20.0).with_arc(0.0, 90.0);
        assert!(jib.contains_point(&Point2::new(10.0, 10.0), 0.0));
        assert!(!jib.contains_point(&Point2::new(-10.0, 10.0), 0.0));
        assert!(!jib.contains_point(&Point2::new(30.0, 0.0), 0.0));
        assert!(jib.contains_point(&Point2::new(22.0, 1.0), 5.0));

        let wrapped = JibCrane::new("j", Point2::new(0.0, 0.0), 20.0).with_arc(270.0, 90.0);
        assert!(wrapped.contains_point(&Point2::new(10.0, 0.5), 0.0));
        assert!(!wrapped.contains_point(&Point2::new(-10.0, 0.5), 0.0));
    }

    #[test]
    fn test_bridge_spans_overlap() {
        let a = OverheadCrane::new("a", "r", 50.0);
        let b = OverheadCrane::new("b", "r", 65.0);
        assert!(a.bridge_span(20.0).overlaps(&b.bridge_span(20.0)));
        assert!(!a.bridge_span(10.0).overlaps(&b.bridge_span(10.0)));
    }

    #[test]
    fn test_service_envelope() {
        let runway = Runway::new("r", Point2::new(0.0, 0.0), Point2::new(100.0, 0.0))
            .with_zone(20.0, 80.0);
        let mut crane = OverheadCrane::new("c", "r", 50.0);
        crane.reach_left = 5.0;
        crane.reach_right = 15.0;

        let env = crane.service_envelope(&runway);
        assert!((env[0] - Point2::new(20.0, 5.0)).norm() < EPSILON);
        assert!((env[1] - Point2::new(80.0, 5.0)).norm() < EPSILON);
        assert!((env[2] - Point2::new(80.0, -15.0)).norm() < EPSILON);
        assert!((env[3] - Point2::new(20.0, -15.0)).norm() < EPSILON);
    }

    #[test]
    fn test_coverage_polygon() {
        let full = JibCrane::new("j", Point2::new(10.0, 10.0), 20.0);
        let ring = full.coverage_polygon(16);
        assert_eq!(ring.len(), 16);
        assert!(ring.iter().all(|p| ((p - full.center).norm() - 20.0).abs() < 1e-6));

        let quarter = JibCrane::new("j", Point2::origin(), 20.0).with_arc(0.0, 90.0);
        let fan = quarter.coverage_polygon(8);
        assert_eq!(fan.len(), 10);
        assert_eq!(fan[0], Point2::origin());
        assert!((fan[1] - Point2::new(20.0, 0.0)).norm() < 1e-6);
        assert!((fan[9] - Point2::new(0.0, 20.0)).norm() < 1e-6);
    }

    #[test]
    fn test_crane_animation_snapshot_is_independent() {
        let mut crane = OverheadCrane::new("c", "r", 50.0);
        crane.set_bridge_position(80.0, &ZoneRange::new(0.0, 200.0));
        assert_eq!(crane.animation_start_position, 50.0);
        crane.capture_animation_start();
        assert_eq!(crane.animation_start_position, 80.0);
    }
}
