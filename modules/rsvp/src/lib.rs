//! Bilingual (Italian/Albanian) wedding RSVP: guest intake, admin listing,
//! aggregate report and PDF export.

pub mod api;
pub mod config;
pub mod contract;
pub mod domain;
pub mod gateways;
pub mod infra;
pub mod module;

pub use config::RsvpConfig;
pub use contract::{RsvpApi, RsvpError};
pub use module::RsvpModule;
