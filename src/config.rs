//! Graph connection settings.

use serde::{Deserialize, Serialize};

use crate::cypher::validate_name;
use crate::Result;

/// How a [`crate::Graph`] prepares its session.
///
/// Usually deserialized from the application's own config file:
///
/// ```
/// let cfg: age_rs::AgeConfig = serde_json::from_str(r#"{"graph_name": "social"}"#).unwrap();
/// assert!(cfg.load_extension);
/// assert!(!cfg.create_graph);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeConfig {
    /// Target graph. Must be a plain identifier.
    pub graph_name: String,
    /// Issue `LOAD 'age';` during setup.
    pub load_extension: bool,
    /// Put `ag_catalog` on the search path during setup.
    pub set_search_path: bool,
    /// Create the graph during setup.
    pub create_graph: bool,
}

impl Default for AgeConfig {
    fn default() -> Self {
        Self {
            graph_name: String::new(),
            load_extension: true,
            set_search_path: true,
            create_graph: false,
        }
    }
}

impl AgeConfig {
    pub fn new(graph_name: impl Into<String>) -> Self {
        Self { graph_name: graph_name.into(), ..Self::default() }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        validate_name(&self.graph_name).map(|_| ())
    }
}
