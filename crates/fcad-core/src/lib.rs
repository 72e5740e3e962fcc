//! FCAD 几何交互引擎
//!
//! 把鼠标位置转换成对工厂布局模型的合法修改。
//!
//! # 数据流
//!
//! ```text
//! 鼠标位置 → 约束投影 → 碰撞/边界/画布检查 → 模型修改 → (松开后) 自动连线
//! ```
//!
//! 自由放置的节点走另一条路径：捕捉（元素优先，其次网格）后直接移动。
//!
//! # 示例
//!
//! ```rust
//! use fcad_core::prelude::*;
//!
//! let mut layout = LayoutModel::new();
//! layout
//!     .insert_runway(Runway::new("r1", Point2::new(0.0, 0.0), Point2::new(200.0, 0.0)))
//!     .unwrap();
//! layout
//!     .insert_overhead_crane(OverheadCrane::new("c1", "r1", 50.0))
//!     .unwrap();
//!
//! let engine = InteractionEngine::default();
//! let crane = EntityRef::OverheadCrane("c1".into());
//! assert!(engine.update_entity_position(&mut layout, &crane, Point2::new(500.0, 0.0)));
//! assert_eq!(layout.overhead_crane("c1").unwrap().bridge_position(), 200.0);
//! ```

pub mod auto_path;
pub mod collision;
pub mod config;
pub mod constraint;
pub mod crane;
pub mod drag;
pub mod engine;
pub mod entity;
pub mod error;
pub mod layout;
pub mod math;
pub mod node;
pub mod snap;
pub mod transport;
pub mod zone;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::auto_path::{AutoPathConfig, AutoPathDetector};
    pub use crate::collision::{BoundaryViolation, CollisionConfig, CollisionDetector};
    pub use crate::config::EngineConfig;
    pub use crate::constraint::{Constraint, ConstraintFactory, ConstraintKind, GuideGeometry, Parameter, Projection};
    pub use crate::crane::{JibCrane, OverheadCrane, Runway, ZoneRange};
    pub use crate::drag::ConstrainedDragService;
    pub use crate::engine::InteractionEngine;
    pub use crate::entity::EntityRef;
    pub use crate::error::LayoutError;
    pub use crate::layout::{CanvasSize, LayoutModel, LayoutSnapshot};
    pub use crate::math::{Point2, Rect, Vector2};
    pub use crate::node::{ConnectionType, Node, Path, TerminalSide};
    pub use crate::snap::{GuideLine, SnapConfig, SnapEngine, SnapResult, SpacingGuide};
    pub use crate::transport::{AgvPath, AgvWaypoint, Conveyor};
    pub use crate::zone::Zone;
}
