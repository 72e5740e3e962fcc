//! 工艺节点与连接
//!
//! 节点是布局中的矩形设备（源、工位、缓存、汇等），通过有向路径相连。
//! 每个节点最多有一个输入端子和一个输出端子，端子位于矩形某一侧的中点并向外伸出。

use crate::math::{Point2, Rect};
use serde::{Deserialize, Serialize};

/// 端子所在的边
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TerminalSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl TerminalSide {
    /// 输入端子默认在左侧
    pub const DEFAULT_INPUT: TerminalSide = TerminalSide::Left;
    /// 输出端子默认在右侧
    pub const DEFAULT_OUTPUT: TerminalSide = TerminalSide::Right;

    pub fn name(&self) -> &'static str {
        match self {
            TerminalSide::Left => "left",
            TerminalSide::Right => "right",
            TerminalSide::Top => "top",
            TerminalSide::Bottom => "bottom",
        }
    }
}

fn default_input_side() -> TerminalSide {
    TerminalSide::DEFAULT_INPUT
}

fn default_output_side() -> TerminalSide {
    TerminalSide::DEFAULT_OUTPUT
}

/// 布局节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// 类型标签（source / machine / buffer / sink ...）
    pub node_type: String,
    /// 位置与尺寸
    pub bounds: Rect,
    #[serde(default = "default_input_side")]
    pub input_terminal: TerminalSide,
    #[serde(default = "default_output_side")]
    pub output_terminal: TerminalSide,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>, bounds: Rect) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            node_type: node_type.into(),
            bounds,
            input_terminal: TerminalSide::DEFAULT_INPUT,
            output_terminal: TerminalSide::DEFAULT_OUTPUT,
        }
    }

    /// 设置端子位置
    pub fn with_terminals(mut self, input: TerminalSide, output: TerminalSide) -> Self {
        self.input_terminal = input;
        self.output_terminal = output;
        self
    }

    /// 汇类节点没有输出端子
    pub fn has_output_terminal(&self) -> bool {
        let t = self.node_type.to_lowercase();
        !t.contains("sink") && t != "snk"
    }

    /// 源类节点没有输入端子
    pub fn has_input_terminal(&self) -> bool {
        let t = self.node_type.to_lowercase();
        !t.contains("source") && t != "src"
    }

    /// 指定边上端子的世界坐标
    pub fn terminal_at(&self, side: TerminalSide, stick_out: f64) -> Point2 {
        let b = &self.bounds;
        match side {
            TerminalSide::Left => Point2::new(b.left() - stick_out, b.center_y()),
            TerminalSide::Right => Point2::new(b.right() + stick_out, b.center_y()),
            TerminalSide::Top => Point2::new(b.center_x(), b.top() - stick_out),
            TerminalSide::Bottom => Point2::new(b.center_x(), b.bottom() + stick_out),
        }
    }

    pub fn input_terminal_position(&self, stick_out: f64) -> Point2 {
        self.terminal_at(self.input_terminal, stick_out)
    }

    pub fn output_terminal_position(&self, stick_out: f64) -> Point2 {
        self.terminal_at(self.output_terminal, stick_out)
    }
}

/// 连接类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionType {
    /// 逻辑物料流
    #[default]
    PartFlow,
    /// 操作员/资源分配
    ResourceBinding,
    /// 控制信号
    ControlSignal,
    /// 通用运输连接
    TransportLink,
    /// AGV/AMR 自动线路
    AgvTrack,
    /// 叉车、牵引车线路
    TTrack,
    /// 固定输送线
    Conveyor,
    /// 自动生成的兜底路径
    General,
}

impl ConnectionType {
    /// 显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            ConnectionType::PartFlow => "Part Flow",
            ConnectionType::ResourceBinding => "Resource Binding",
            ConnectionType::ControlSignal => "Control Signal",
            ConnectionType::TransportLink => "Transport Link",
            ConnectionType::AgvTrack => "AGV Track",
            ConnectionType::TTrack => "T-Track (Forklift/Truck)",
            ConnectionType::Conveyor => "Conveyor",
            ConnectionType::General => "General Path",
        }
    }
}

/// 节点间的有向路径
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub connection_type: ConnectionType,
}

impl Path {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            connection_type: ConnectionType::default(),
        }
    }

    pub fn with_connection_type(mut self, connection_type: ConnectionType) -> Self {
        self.connection_type = connection_type;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;

    #[test]
    fn test_terminal_kinds_by_type() {
        let source = Node::new("s", "Source", Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(!source.has_input_terminal());
        assert!(source.has_output_terminal());

        let sink = Node::new("k", "sink", Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(sink.has_input_terminal());
        assert!(!sink.has_output_terminal());

        let abbreviated = Node::new("a", "SNK", Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(!abbreviated.has_output_terminal());

        let machine = Node::new("m", "machine", Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(machine.has_input_terminal());
        assert!(machine.has_output_terminal());
    }

    #[test]
    fn test_terminal_positions() {
        let node = Node::new("m", "machine", Rect::new(100.0, 50.0, 40.0, 20.0));

        let output = node.output_terminal_position(10.0);
        assert!((output.x - 150.0).abs() < EPSILON);
        assert!((output.y - 60.0).abs() < EPSILON);

        let input = node.input_terminal_position(10.0);
        assert!((input.x - 90.0).abs() < EPSILON);

        let top = node.terminal_at(TerminalSide::Top, 10.0);
        assert!((top.x - 120.0).abs() < EPSILON);
        assert!((top.y - 40.0).abs() < EPSILON);

        let bottom = node.terminal_at(TerminalSide::Bottom, 10.0);
        assert!((bottom.y - 80.0).abs() < EPSILON);
    }

    #[test]
    fn test_node_json_defaults() {
        let json = r#"{"id":"n1","nodeType":"machine","bounds":{"x":0,"y":0,"width":10,"height":10}}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.input_terminal, TerminalSide::Left);
        assert_eq!(node.output_terminal, TerminalSide::Right);
    }
}
