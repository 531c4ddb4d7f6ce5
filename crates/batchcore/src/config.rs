use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::internal::scheduler::selection::NodeSelection;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulingPolicy {
    Fifo,
    #[default]
    Backfill,
}

/// Scheduler settings as read from a TOML file:
///
/// ```toml
/// policy = "backfill"
/// node-selection = "smallest-fit"
/// max-backfill-candidates = 500
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SchedulerConfig {
    pub policy: SchedulingPolicy,
    /// Node selection of the backfilling scheduler. The FIFO scheduler always
    /// takes nodes in partition order.
    pub node_selection: NodeSelection,
    pub max_backfill_candidates: Option<usize>,
}

impl SchedulerConfig {
    pub fn from_toml(text: &str) -> crate::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        log::debug!("Scheduler configuration loaded from {}: {config:?}", path.display());
        Ok(config)
    }
}
