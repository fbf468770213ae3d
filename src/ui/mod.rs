// Presentation layer: text rendering of the voyage page and its event loop.

pub mod form_view;
pub mod format;
pub mod page;
#[cfg(feature = "cli")]
pub mod shell;
pub mod table;

pub use page::{Outcome, VoyagePage};
