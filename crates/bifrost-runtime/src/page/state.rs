//! Page container states.
//!
//! ```text
//! Created ──► Visible ◄──► Hidden
//!    │           │            │
//!    └───────────┴────────────┴──► Detaching ──► Gone
//! ```

/// Lifecycle state of a page container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerState {
    /// `onCreatePage` sent, never shown.
    Created,
    /// On screen; owns the engine surface.
    Visible,
    /// Off screen.
    Hidden,
    /// Teardown in progress.
    Detaching,
    /// `onDeallocPage` sent.
    Gone,
}

impl ContainerState {
    /// Still part of a host view hierarchy.
    #[must_use]
    pub fn is_live(self) -> bool {
        !matches!(self, Self::Detaching | Self::Gone)
    }

    /// May act on a back gesture.
    #[must_use]
    pub fn accepts_back(self) -> bool {
        matches!(self, Self::Visible | Self::Hidden)
    }
}

impl std::fmt::Display for ContainerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::Detaching => "detaching",
            Self::Gone => "gone",
        };
        f.write_str(name)
    }
}

/// Result of a back press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// The engine intercepted; `onBackPressed` was sent.
    Intercepted,
    /// The host ran its default back action.
    DefaultNavigation,
    /// The container was not attached; nothing was sent.
    Suppressed,
    /// The container detached before the answer arrived.
    Discarded,
}
