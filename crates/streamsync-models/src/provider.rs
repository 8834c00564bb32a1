//! Wallet provider announcements.
//!
//! Providers announce themselves in the EIP-6963 shape: a stable `uuid`
//! per provider instance plus display metadata.

use serde::{Deserialize, Serialize};

/// Display metadata for one announced provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Unique id of this provider instance.
    pub uuid: String,
    /// Human-readable wallet name.
    pub name: String,
    /// Icon as a data URI.
    pub icon: String,
    /// Reverse-DNS identifier, e.g. `com.example.wallet`.
    pub rdns: String,
}

/// One provider announcement.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProviderDetail {
    /// Provider metadata.
    pub info: ProviderInfo,
}

impl ProviderDetail {
    /// Convenience constructor.
    pub fn new(
        uuid: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        rdns: impl Into<String>,
    ) -> Self {
        Self {
            info: ProviderInfo {
                uuid: uuid.into(),
                name: name.into(),
                icon: icon.into(),
                rdns: rdns.into(),
            },
        }
    }

    /// The provider's unique id.
    pub fn uuid(&self) -> &str {
        &self.info.uuid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_announcement() {
        let detail: ProviderDetail = serde_json::from_value(serde_json::json!({
            "info": {
                "uuid": "350670db-19fa-4704-a166-e52e178b59d2",
                "name": "Example Wallet",
                "icon": "data:image/svg+xml,<svg/>",
                "rdns": "com.example.wallet"
            }
        }))
        .unwrap();
        assert_eq!(detail.uuid(), "350670db-19fa-4704-a166-e52e178b59d2");
        assert_eq!(detail.info.rdns, "com.example.wallet");
    }
}
