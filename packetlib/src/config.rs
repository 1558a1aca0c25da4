//! Node configuration.

use crate::core::MAX_FIELD_LEN;
use crate::error::{Error, Field, Result};

/// Settings for a [`Node`](crate::Node).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Identity written as the source of every originated frame.
    pub identity: String,
    /// Answer ack-required frames with an ack.
    pub auto_ack: bool,
    /// Seed for packet id generation; `None` seeds from OS entropy.
    pub id_seed: Option<u64>,
}

impl NodeConfig {
    /// Creates a config for `identity` with auto-ack on.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            auto_ack: true,
            id_seed: None,
        }
    }

    /// Enables or disables automatic ack replies.
    pub fn with_auto_ack(mut self, auto_ack: bool) -> Self {
        self.auto_ack = auto_ack;
        self
    }

    /// Makes generated packet ids reproducible.
    pub fn with_id_seed(mut self, seed: u64) -> Self {
        self.id_seed = Some(seed);
        self
    }

    /// Checks that the identity fits a source field.
    pub fn validate(&self) -> Result<()> {
        if self.identity.len() > MAX_FIELD_LEN {
            return Err(Error::OversizeField {
                field: Field::Source,
                len: self.identity.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::new("node-1");
        assert_eq!(config.identity, "node-1");
        assert!(config.auto_ack);
        assert_eq!(config.id_seed, None);
        config.validate().unwrap();
    }

    #[test]
    fn test_builder() {
        let config = NodeConfig::new("node-1").with_auto_ack(false).with_id_seed(7);
        assert!(!config.auto_ack);
        assert_eq!(config.id_seed, Some(7));
    }

    #[test]
    fn test_oversize_identity() {
        let config = NodeConfig::new("n".repeat(256));
        assert!(matches!(
            config.validate(),
            Err(Error::OversizeField {
                field: Field::Source,
                len: 256
            })
        ));
    }
}
