#![forbid(unsafe_code)]

//! Core services for a QR guest-WiFi phishing-awareness simulation.
//!
//! The landing form, admin dashboard, and analytics views are external
//! hosts; this crate provides what they consume: email validation, the
//! submission workflow, the camelCase↔snake_case normalization boundary
//! around the hosted backend, admin queries with aggregation, and a
//! realtime feed of new submissions.

pub mod analytics;
pub mod backend;
pub mod config;
pub mod errors;
pub mod models;
pub mod net;
pub mod observability;
pub mod query;
pub mod realtime;
pub mod submission;
pub mod validation;

pub use config::{BackendCredentials, GlobalConfig};
pub use errors::{AppError, Result};
