pub mod cache;
pub mod form;
pub mod notify;
pub mod schema;
pub mod service;

pub use crate::domain::model::{UnitType, Vessel, Voyage, VoyageDraft, VoyagePayload};
pub use crate::domain::ports::{ApiTransport, ConfigProvider, Notifier};
pub use crate::utils::error::Result;
