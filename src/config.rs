//! Runtime configuration.
//!
//! ```toml
//! listen = "CLICK | KEY_DOWN | DOUBLE_CLICK"
//! prune_handlers = true
//! default_route = "#/all"
//! initial_hash = ""
//! mount_tag = "div"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Listen;

/// Settings for one [`Runtime`](crate::Runtime).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Event kinds the root listener dispatches.
    pub listen: Listen,
    /// Clear the handler registry before every render. With `false`,
    /// entries accumulate for the lifetime of the runtime.
    pub prune_handlers: bool,
    /// Route reported by [`Runtime::route`](crate::Runtime::route) when the
    /// fragment is empty.
    pub default_route: String,
    /// Fragment the location starts with.
    pub initial_hash: String,
    /// Tag of the mount element [`Runtime::create_mount_point`](crate::Runtime::create_mount_point) creates.
    pub mount_tag: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            listen: Listen::default(),
            prune_handlers: true,
            default_route: "#/all".to_string(),
            initial_hash: String::new(),
            mount_tag: "div".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn with_listen(mut self, listen: Listen) -> Self {
        self.listen = listen;
        self
    }

    pub fn with_prune_handlers(mut self, prune: bool) -> Self {
        self.prune_handlers = prune;
        self
    }

    pub fn with_initial_hash(mut self, hash: impl Into<String>) -> Self {
        self.initial_hash = hash.into();
        self
    }
}
