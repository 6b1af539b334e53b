//! Named channel registry shared by the host and the engine runtime.

use super::method_channel::{MethodChannel, Side};
use bifrost_types::ChannelName;
use std::sync::Arc;

/// The engine's message bus: one [`MethodChannel`] pair per [`ChannelName`].
///
/// A runtime owns the messenger; the host opens its side of each channel
/// through [`host`](Self::host), the engine-side code through
/// [`engine`](Self::engine). Clones share the same channels.
///
/// # Example
///
/// ```
/// use bifrost_runtime::channel::{Messenger, Side};
/// use bifrost_types::ChannelName;
///
/// let messenger = Messenger::new();
/// let host = messenger.host(ChannelName::Coordinator);
/// let engine = messenger.engine(ChannelName::Coordinator);
/// assert_eq!(host.side(), Side::Host);
/// assert_eq!(engine.side(), Side::Engine);
/// ```
#[derive(Debug, Clone)]
pub struct Messenger {
    channels: Arc<Channels>,
}

#[derive(Debug)]
struct Channels {
    common: (MethodChannel, MethodChannel),
    coordinator: (MethodChannel, MethodChannel),
    notification: (MethodChannel, MethodChannel),
}

impl Messenger {
    /// Creates a messenger with every Bifrost channel open and idle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: Arc::new(Channels {
                common: MethodChannel::pair(ChannelName::Common),
                coordinator: MethodChannel::pair(ChannelName::Coordinator),
                notification: MethodChannel::pair(ChannelName::Notification),
            }),
        }
    }

    /// Host-side handle of `name`.
    #[must_use]
    pub fn host(&self, name: ChannelName) -> MethodChannel {
        self.side(name, Side::Host)
    }

    /// Engine-side handle of `name`.
    #[must_use]
    pub fn engine(&self, name: ChannelName) -> MethodChannel {
        self.side(name, Side::Engine)
    }

    fn side(&self, name: ChannelName, side: Side) -> MethodChannel {
        let pair = match name {
            ChannelName::Common => &self.channels.common,
            ChannelName::Coordinator => &self.channels.coordinator,
            ChannelName::Notification => &self.channels.notification,
        };
        match side {
            Side::Host => pair.0.clone(),
            Side::Engine => pair.1.clone(),
        }
    }
}

impl Default for Messenger {
    fn default() -> Self {
        Self::new()
    }
}
