//! 实体句柄
//!
//! 交互引擎不持有实体，只通过 `EntityRef`（类型 + ID）在布局模型中查找。

use serde::{Deserialize, Serialize};

/// 对布局中某个实体的引用
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum EntityRef {
    Node(String),
    OverheadCrane(String),
    JibCrane(String),
    Zone(String),
    Conveyor(String),
    AgvPath(String),
}

impl EntityRef {
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Node(id)
            | EntityRef::OverheadCrane(id)
            | EntityRef::JibCrane(id)
            | EntityRef::Zone(id)
            | EntityRef::Conveyor(id)
            | EntityRef::AgvPath(id) => id,
        }
    }

    /// 类型名称（用于日志和提示）
    pub fn kind_name(&self) -> &'static str {
        match self {
            EntityRef::Node(_) => "Node",
            EntityRef::OverheadCrane(_) => "OverheadCrane",
            EntityRef::JibCrane(_) => "JibCrane",
            EntityRef::Zone(_) => "Zone",
            EntityRef::Conveyor(_) => "Conveyor",
            EntityRef::AgvPath(_) => "AgvPath",
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind_name(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ref_json() {
        let r: EntityRef = serde_json::from_str(r#"{"kind":"overheadCrane","id":"c1"}"#).unwrap();
        assert_eq!(r, EntityRef::OverheadCrane("c1".into()));
        assert_eq!(r.id(), "c1");
        assert_eq!(r.to_string(), "OverheadCrane(c1)");
    }
}
