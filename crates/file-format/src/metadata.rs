use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bookkeeping stored alongside a panel's parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterMetadata {
    /// Human-readable preset or project name.
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    /// Image the parameters were last used with, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_image: Option<String>,
}

impl ParameterMetadata {
    /// Metadata with the given name, stamped now.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            created: now,
            modified: now,
            source_image: None,
        }
    }

    pub fn with_source_image(mut self, path: impl Into<String>) -> Self {
        self.source_image = Some(path.into());
        self
    }

    /// Bump `modified` to now.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}
