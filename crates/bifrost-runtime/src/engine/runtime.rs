//! Embedded engine runtime seam.

use crate::channel::Messenger;

/// The embedded rendering engine as seen by the host.
///
/// Provides the [`Messenger`] the engine talks over and runs its entry
/// point. Engine-side code installs its own handlers on
/// [`Messenger::engine`] channels.
pub trait EngineRuntime: Send + Sync {
    /// Channels shared with the engine.
    fn messenger(&self) -> Messenger;

    /// Runs the named entry point.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason if the entry point cannot run.
    fn run_entrypoint(&self, entrypoint: &str) -> Result<(), String>;
}
