//! Event registration backend.
//!
//! Accepts registration submissions, stamps them with a regional timestamp
//! and the client address, and serves them back to an admin page:
//! - date-windowed JSON queries and CSV downloads
//! - short-lived admin tokens for a single credential pair

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod export;
pub mod registration;

pub use auth::{AdminClaims, AdminSessions, CredentialVerifier, StaticCredentials};
pub use config::Config;
pub use error::ApiError;
pub use export::{ExportArtifact, ExportService};
pub use registration::RegistrationService;
