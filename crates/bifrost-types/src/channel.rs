//! Fixed channel identities.

use serde::{Deserialize, Serialize};

/// One of the three channels Bifrost opens on the engine messenger.
///
/// Each channel is addressed independently and carries its own handler
/// slot and buffering policy.
///
/// | Variant | Wire name | Purpose |
/// |---------|-----------|---------|
/// | [`Common`](Self::Common) | `bifrost/common` | opaque pass-through to a host handler |
/// | [`Coordinator`](Self::Coordinator) | `bifrost/coordinator` | page lifecycle protocol |
/// | [`Notification`](Self::Notification) | `bifrost/notification` | keyed host callbacks |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelName {
    Common,
    Coordinator,
    Notification,
}

impl ChannelName {
    /// All channels, in the order they are opened at engine start.
    pub const ALL: [ChannelName; 3] = [Self::Coordinator, Self::Notification, Self::Common];

    /// Returns the logical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "bifrost/common",
            Self::Coordinator => "bifrost/coordinator",
            Self::Notification => "bifrost/notification",
        }
    }

    /// Resolves a wire name back to a channel.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl std::fmt::Display for ChannelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(ChannelName::Coordinator.as_str(), "bifrost/coordinator");
        assert_eq!(ChannelName::Notification.to_string(), "bifrost/notification");
        assert_eq!(
            ChannelName::from_wire("bifrost/common"),
            Some(ChannelName::Common)
        );
        assert_eq!(ChannelName::from_wire("bifrost/other"), None);
    }
}
