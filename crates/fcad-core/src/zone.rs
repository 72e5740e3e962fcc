//! 区域（闭合多边形）
//!
//! 区域的包围盒是派生数据：每次顶点变化后重新计算，不能单独修改。

use crate::error::LayoutError;
use crate::math::{Point2, Rect, Vector2};
use serde::{Deserialize, Serialize};

/// 多边形区域
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// 区域类型（storage / staging / restricted ...）
    #[serde(default)]
    pub zone_type: String,
    points: Vec<Point2>,
    #[serde(skip)]
    bounds: Rect,
}

impl Zone {
    /// 创建区域，非空多边形至少需要 3 个顶点
    pub fn new(id: impl Into<String>, points: Vec<Point2>) -> Result<Self, LayoutError> {
        let id = id.into();
        let mut zone = Self {
            name: id.clone(),
            id,
            zone_type: String::new(),
            points: Vec::new(),
            bounds: Rect::default(),
        };
        zone.set_points(points)?;
        Ok(zone)
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 替换顶点并重新计算包围盒
    pub fn set_points(&mut self, points: Vec<Point2>) -> Result<(), LayoutError> {
        if !points.is_empty() && points.len() < 3 {
            return Err(LayoutError::DegenerateZone {
                id: self.id.clone(),
                count: points.len(),
            });
        }
        self.points = points;
        self.refresh_bounds();
        Ok(())
    }

    /// 检查顶点数量（反序列化后使用）
    pub(crate) fn validate(&self) -> Result<(), LayoutError> {
        if !self.points.is_empty() && self.points.len() < 3 {
            return Err(LayoutError::DegenerateZone {
                id: self.id.clone(),
                count: self.points.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn refresh_bounds(&mut self) {
        self.bounds = Rect::from_points(&self.points);
    }

    /// 顶点平均值作为区域中心；空区域返回包围盒原点
    pub fn centroid(&self) -> Point2 {
        if self.points.is_empty() {
            return self.bounds.origin();
        }
        let n = self.points.len() as f64;
        let sum = self
            .points
            .iter()
            .fold(Vector2::zeros(), |acc, p| acc + p.coords);
        Point2::from(sum / n)
    }

    /// 整体平移（所有顶点和包围盒一起移动，不改变形状）
    pub fn translate(&mut self, offset: &Vector2) {
        for p in &mut self.points {
            *p += *offset;
        }
        self.bounds.translate(offset);
    }

    /// 奇偶规则判断点是否在多边形内
    pub fn contains_point(&self, point: &Point2) -> bool {
        if self.points.len() < 3 || !self.bounds.contains(point) {
            return false;
        }

        let mut inside = false;
        let n = self.points.len();
        let mut j = n - 1;
        for i in 0..n {
            let pi = &self.points[i];
            let pj = &self.points[j];
            if (pi.y > point.y) != (pj.y > point.y)
                && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}
