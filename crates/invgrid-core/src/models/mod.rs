//! Data models for extraction output and configuration.

pub mod config;
pub mod record;

pub use config::InvgridConfig;
pub use record::{ExtractionStatus, Field, InvoiceFields, InvoiceRecord};
