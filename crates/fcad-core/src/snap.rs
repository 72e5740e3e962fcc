//! 布局捕捉系统
//!
//! 两级捕捉，用于不受约束的自由放置（例如拖动节点）：
//! - 元素捕捉：对齐到其他节点的左/右/中线、上/下/中线
//! - 网格捕捉：按网格间距取整
//!
//! 元素捕捉优先；只有元素捕捉没有产生任何参考线时才回退到网格捕捉。

use crate::layout::LayoutModel;
use crate::math::Point2;
use serde::{Deserialize, Serialize};

/// 捕捉配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapConfig {
    /// 网格间距
    pub grid_size: f64,
    /// 元素捕捉距离阈值
    pub snap_threshold: f64,
    /// 是否启用网格捕捉
    pub grid_snap_enabled: bool,
    /// 是否启用元素捕捉
    pub element_snap_enabled: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            grid_size: 10.0,
            snap_threshold: 8.0,
            grid_snap_enabled: true,
            element_snap_enabled: true,
        }
    }
}

impl SnapConfig {
    /// 实际使用的网格间距（不小于 1）
    pub fn effective_grid_size(&self) -> f64 {
        self.grid_size.max(1.0)
    }

    /// 实际使用的捕捉阈值（不小于 1）
    pub fn effective_threshold(&self) -> f64 {
        self.snap_threshold.max(1.0)
    }
}

/// 参考线方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuideAxis {
    /// 竖线（固定 X）
    Vertical,
    /// 横线（固定 Y）
    Horizontal,
}

/// 对齐参考线
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideLine {
    pub axis: GuideAxis,
    pub coordinate: f64,
}

impl GuideLine {
    pub fn vertical(x: f64) -> Self {
        Self {
            axis: GuideAxis::Vertical,
            coordinate: x,
        }
    }

    pub fn horizontal(y: f64) -> Self {
        Self {
            axis: GuideAxis::Horizontal,
            coordinate: y,
        }
    }
}

/// 间距参考（相邻两个节点之间的空隙）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingGuide {
    pub start: f64,
    pub end: f64,
    pub is_horizontal: bool,
    pub spacing: f64,
}

/// 捕捉结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    pub point: Point2,
    pub guides: Vec<GuideLine>,
}

impl SnapResult {
    pub fn unchanged(point: Point2) -> Self {
        Self {
            point,
            guides: Vec::new(),
        }
    }

    /// 是否对齐到了某个元素
    pub fn snapped_to_element(&self) -> bool {
        !self.guides.is_empty()
    }
}

/// 捕捉引擎
#[derive(Debug, Clone, Default)]
pub struct SnapEngine {
    config: SnapConfig,
}

impl SnapEngine {
    pub fn new(config: SnapConfig) -> Self {
        Self { config }
    }

    /// 获取配置
    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    /// 获取配置（可变）
    pub fn config_mut(&mut self) -> &mut SnapConfig {
        &mut self.config
    }

    /// 点对齐到网格（关闭网格捕捉时原样返回）
    pub fn snap_to_grid(&self, point: Point2) -> Point2 {
        Point2::new(self.snap_value_to_grid(point.x), self.snap_value_to_grid(point.y))
    }

    /// 单个数值对齐到网格
    pub fn snap_value_to_grid(&self, value: f64) -> f64 {
        if !self.config.grid_snap_enabled {
            return value;
        }
        let size = self.config.effective_grid_size();
        (value / size).round() * size
    }

    /// 对齐到其他节点的边和中线
    ///
    /// 按节点顺序扫描，每个轴取第一个落入阈值的候选，之后不再更换。
    pub fn snap_to_elements(
        &self,
        point: Point2,
        layout: &LayoutModel,
        exclude_id: Option<&str>,
    ) -> SnapResult {
        if !self.config.element_snap_enabled {
            return SnapResult::unchanged(point);
        }

        let threshold = self.config.effective_threshold();
        let mut result = SnapResult::unchanged(point);
        let mut snapped_x = false;
        let mut snapped_y = false;

        for node in layout.nodes() {
            if exclude_id == Some(node.id.as_str()) {
                continue;
            }
            let b = &node.bounds;

            if !snapped_x {
                for x in [b.left(), b.right(), b.center_x()] {
                    if (point.x - x).abs() < threshold {
                        result.point.x = x;
                        result.guides.push(GuideLine::vertical(x));
                        snapped_x = true;
                        break;
                    }
                }
            }

            if !snapped_y {
                for y in [b.top(), b.bottom(), b.center_y()] {
                    if (point.y - y).abs() < threshold {
                        result.point.y = y;
                        result.guides.push(GuideLine::horizontal(y));
                        snapped_y = true;
                        break;
                    }
                }
            }

            if snapped_x && snapped_y {
                break;
            }
        }

        result
    }

    /// 组合捕捉：元素优先，没有任何参考线时回退到网格
    ///
    /// 只对齐了一个轴时，另一个轴保持原值，不做网格取整。
    pub fn snap(&self, point: Point2, layout: &LayoutModel, exclude_id: Option<&str>) -> SnapResult {
        let result = self.snap_to_elements(point, layout, exclude_id);
        if result.guides.is_empty() {
            return SnapResult::unchanged(self.snap_to_grid(point));
        }
        result
    }

    /// 按 X 排序后计算相邻节点的水平间距
    pub fn calculate_spacing(&self, layout: &LayoutModel) -> Vec<SpacingGuide> {
        let mut sorted: Vec<_> = layout.nodes().iter().map(|n| n.bounds).collect();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

        sorted
            .windows(2)
            .filter_map(|pair| {
                let gap = pair[1].left() - pair[0].right();
                (gap > 0.0).then(|| SpacingGuide {
                    start: pair[0].right(),
                    end: pair[1].left(),
                    is_horizontal: true,
                    spacing: gap,
                })
            })
            .collect()
    }
}
