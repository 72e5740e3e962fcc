//! 自动连线
//!
//! 拖动或放置结束后，检查移动过的节点与其余节点的端子是否接触：
//! 输出端子与输入端子距离不超过阈值时，自动创建一条有向路径。

use crate::layout::LayoutModel;
use crate::math::distance;
use crate::node::{Node, Path};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

/// 自动连线配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoPathConfig {
    /// 端子接触距离（含）
    pub touch_threshold: f64,
    /// 端子伸出节点边框的距离
    pub terminal_stick_out: f64,
}

impl Default for AutoPathConfig {
    fn default() -> Self {
        Self {
            touch_threshold: 25.0,
            terminal_stick_out: 10.0,
        }
    }
}

/// 自动连线检测器
#[derive(Debug, Clone, Default)]
pub struct AutoPathDetector {
    config: AutoPathConfig,
}

impl AutoPathDetector {
    pub fn new(config: AutoPathConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AutoPathConfig {
        &self.config
    }

    /// 检测一组同时移动的节点，返回新建路径数
    ///
    /// 同组节点之间不互相检测（它们的相对位置没有变化）。
    pub fn detect_and_connect<S: AsRef<str>>(&self, layout: &mut LayoutModel, moved: &[S]) -> usize {
        let moved_ids: HashSet<&str> = moved.iter().map(|s| s.as_ref()).collect();
        let mut created = 0;

        for moved_id in moved.iter().map(|s| s.as_ref()) {
            let Some(moved_node) = layout.node(moved_id) else {
                continue;
            };

            let mut pairs = Vec::new();
            for other in layout.nodes() {
                if other.id == moved_node.id || moved_ids.contains(other.id.as_str()) {
                    continue;
                }
                if self.can_connect(layout, moved_node, other) {
                    pairs.push((moved_node.id.clone(), other.id.clone()));
                }
                if self.can_connect(layout, other, moved_node) {
                    pairs.push((other.id.clone(), moved_node.id.clone()));
                }
            }

            for (from, to) in pairs {
                let path = Path::new(uuid::Uuid::new_v4().to_string(), from, to);
                let (from, to) = (path.from.clone(), path.to.clone());
                match layout.insert_path(path) {
                    Ok(()) => {
                        info!("自动连线: {} -> {}", from, to);
                        created += 1;
                    }
                    Err(e) => warn!("跳过自动连线 {} -> {}: {}", from, to, e),
                }
            }
        }

        created
    }

    /// 检测单个节点
    pub fn detect_and_connect_single(&self, layout: &mut LayoutModel, node_id: &str) -> usize {
        self.detect_and_connect(layout, &[node_id])
    }

    /// `from` 的输出端子能否连到 `to` 的输入端子
    fn can_connect(&self, layout: &LayoutModel, from: &Node, to: &Node) -> bool {
        from.has_output_terminal()
            && to.has_input_terminal()
            && !layout.has_path(&from.id, &to.id)
            && self.are_touching(from, to)
    }

    /// 端子距离是否在接触阈值内（含边界）
    pub fn are_touching(&self, from: &Node, to: &Node) -> bool {
        let stick_out = self.config.terminal_stick_out;
        let output = from.output_terminal_position(stick_out);
        let input = to.input_terminal_position(stick_out);
        distance(&output, &input) <= self.config.touch_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Rect;
    use crate::node::TerminalSide;

    fn layout_with(nodes: Vec<Node>) -> LayoutModel {
        let mut layout = LayoutModel::new();
        for node in nodes {
            layout.insert_node(node).unwrap();
        }
        layout
    }

    #[test]
    fn test_connects_touching_pair_once() {
        // A 右边 x=100，B 左边 x=108
        let mut layout = layout_with(vec![
            Node::new("a", "machine", Rect::new(50.0, 0.0, 50.0, 40.0)),
            Node::new("b", "machine", Rect::new(108.0, 0.0, 50.0, 40.0)),
        ]);
        let detector = AutoPathDetector::default();

        assert_eq!(detector.detect_and_connect_single(&mut layout, "a"), 1);
        assert!(layout.has_path("a", "b"));
        assert!(!layout.has_path("b", "a"));

        assert_eq!(detector.detect_and_connect_single(&mut layout, "a"), 0);
        assert_eq!(layout.paths().len(), 1);
    }

    #[test]
    fn test_source_and_sink_terminals() {
        // sink 没有输出，source 没有输入
        let mut layout = layout_with(vec![
            Node::new("sink", "Sink", Rect::new(50.0, 0.0, 50.0, 40.0)),
            Node::new("src", "source", Rect::new(108.0, 0.0, 50.0, 40.0)),
        ]);
        let detector = AutoPathDetector::default();
        assert_eq!(detector.detect_and_connect_single(&mut layout, "sink"), 0);
    }

    #[test]
    fn test_custom_terminal_sides() {
        // m 的输出在下方，正对 b 上方的输入
        let m = Node::new("m", "machine", Rect::new(0.0, 0.0, 40.0, 40.0))
            .with_terminals(TerminalSide::Top, TerminalSide::Bottom);
        let b = Node::new("b", "buffer", Rect::new(0.0, 60.0, 40.0, 40.0))
            .with_terminals(TerminalSide::Top, TerminalSide::Right);
        let mut layout = layout_with(vec![m, b]);

        let detector = AutoPathDetector::new(AutoPathConfig {
            touch_threshold: 25.0,
            terminal_stick_out: 5.0,
        });
        assert_eq!(detector.detect_and_connect_single(&mut layout, "m"), 1);
        assert!(layout.has_path("m", "b"));
    }

    #[test]
    fn test_group_members_are_not_connected_to_each_other() {
        let mut layout = layout_with(vec![
            Node::new("a", "machine", Rect::new(50.0, 0.0, 50.0, 40.0)),
            Node::new("b", "machine", Rect::new(108.0, 0.0, 50.0, 40.0)),
        ]);
        let detector = AutoPathDetector::default();
        assert_eq!(detector.detect_and_connect(&mut layout, &["a", "b"]), 0);
        assert!(layout.paths().is_empty());
    }

    #[test]
    fn test_unknown_moved_id_is_ignored() {
        let mut layout = layout_with(vec![Node::new(
            "a",
            "machine",
            Rect::new(0.0, 0.0, 10.0, 10.0),
        )]);
        assert_eq!(
            AutoPathDetector::default().detect_and_connect_single(&mut layout, "ghost"),
            0
        );
    }
}
