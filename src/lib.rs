pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod ui;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::HttpApi;
pub use config::AppConfig;
pub use crate::core::{notify::ToastQueue, service::VoyageService};
pub use ui::{Outcome, VoyagePage};
pub use utils::error::{Result, VoyageError};
