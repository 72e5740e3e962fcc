//! 引擎配置
//!
//! 各服务各自持有一份配置副本，没有全局可变状态。

use crate::auto_path::AutoPathConfig;
use crate::collision::CollisionConfig;
use crate::error::LayoutError;
use crate::snap::SnapConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub snap: SnapConfig,
    pub collision: CollisionConfig,
    pub auto_path: AutoPathConfig,
}

impl EngineConfig {
    /// 从 JSON 解析，缺省字段取默认值
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }
}
