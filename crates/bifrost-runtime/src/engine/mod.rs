//! Engine lifecycle.
//!
//! - [`Bifrost`]: starts the single engine and opens pages on it
//! - [`Engine`]: the running engine with its host-side channels
//! - [`EngineRuntime`]: the embedded engine, supplied by the host
//! - [`Surface`]: exclusive ownership of the render surface

mod bifrost;
#[allow(clippy::module_inception)]
mod engine;
mod error;
mod runtime;
mod surface;

pub use bifrost::Bifrost;
pub use engine::Engine;
pub use error::EngineError;
pub use runtime::EngineRuntime;
pub use surface::{Claimant, Surface};
