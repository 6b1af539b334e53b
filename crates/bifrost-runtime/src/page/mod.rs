//! Page containers.
//!
//! A [`PageContainer`] is the platform-neutral state machine behind one
//! native page; [`HostContainer`] is what the platform implements.

mod container;
mod descriptor;
mod error;
mod handed_over;
mod host;
mod state;

pub use container::PageContainer;
pub use descriptor::{Page, PageDescriptor, PageOptions};
pub use error::PageError;
pub use handed_over::HandedOver;
pub use host::HostContainer;
pub use state::{BackOutcome, ContainerState};
