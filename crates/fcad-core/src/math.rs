//! 数学基础类型
//!
//! 基于 nalgebra 的二维点/向量，以及布局中通用的轴对齐矩形。

use serde::{Deserialize, Serialize};

/// 二维点（世界坐标）
pub type Point2 = nalgebra::Point2<f64>;

/// 二维向量
pub type Vector2 = nalgebra::Vector2<f64>;

/// 浮点比较容差
pub const EPSILON: f64 = 1e-9;

/// 2π
pub const TAU: f64 = std::f64::consts::TAU;

/// 两点间欧氏距离
#[inline]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

/// 将角度归一化到 [0, 2π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// 轴对齐矩形（左上角 + 宽高）
///
/// 节点外形和区域包围盒都用它表示。Y 轴向下。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 从点集创建包围矩形，点集为空时返回零矩形
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2>) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Point2 {
        Point2::new(self.center_x(), self.center_y())
    }

    /// 左上角
    pub fn origin(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// 检查点是否在矩形内（含边界）
    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// 平移
    pub fn translate(&mut self, offset: &Vector2) {
        self.x += offset.x;
        self.y += offset.y;
    }

    /// 移动左上角到指定位置
    pub fn move_to(&mut self, origin: Point2) {
        self.x = origin.x;
        self.y = origin.y;
    }
}
