//! Registration submission.

use crate::error::ApiError;
use axum::http::HeaderMap;
use registration_store::{NewRegistration, RecordStore, StoredRecord};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// Header carrying the client address when behind a proxy.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Writes new registrations.
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn RecordStore>,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Store a submission. Field contents are not validated.
    pub async fn submit(
        &self,
        table_number: String,
        name: String,
        phone_number: String,
        source_ip: String,
    ) -> Result<StoredRecord, ApiError> {
        let registration = NewRegistration {
            table_number,
            name,
            phone_number,
            ip_address: source_ip,
        };

        match self.store.create(registration).await {
            Ok(stored) => {
                info!(
                    id = stored.id,
                    ip = %stored.record.ip_address,
                    registration_time = %stored.record.registration_time,
                    "Registration saved"
                );
                Ok(stored)
            }
            Err(e) => {
                error!("Error saving registration: {}", e);
                Err(ApiError::Storage(e))
            }
        }
    }
}

/// Resolve the client address: first `X-Forwarded-For` entry, else the peer.
///
/// The header is trusted as sent.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => String::new(),
    }
}
