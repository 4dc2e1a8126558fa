//! Extension manifest types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{Metadata, Permission, Version};

/// Extension manifest containing metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionManifest {
    pub id: String,
    pub name: String,
    pub version: Version,
    pub description: String,
    #[serde(default)]
    pub provides: Provides,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl ExtensionManifest {
    /// Create a new extension manifest.
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: Version) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version,
            description: String::new(),
            provides: Provides::default(),
            permissions: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// What an extension provides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Provides {
    #[serde(default)]
    pub tools: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_round_trip() {
        let mut manifest = ExtensionManifest::new("tools-order", "Order Tools", Version::new(0, 1, 0))
            .with_description("Coffee ordering workflow");
        manifest.provides.tools = vec!["order_login".to_string()];

        let json = serde_json::to_string(&manifest).unwrap();
        let back: ExtensionManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "tools-order");
        assert_eq!(back.provides.tools, vec!["order_login"]);
    }

    #[test]
    fn test_manifest_defaults() {
        let manifest = ExtensionManifest::new("x", "X", Version::new(1, 0, 0));
        assert!(manifest.provides.tools.is_empty());
        assert!(manifest.permissions.is_empty());
    }
}
