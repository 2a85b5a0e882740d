//! Registration record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields a caller supplies when submitting a registration.
///
/// Carries no timestamp; the store assigns one on create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRegistration {
    pub table_number: String,
    pub name: String,
    pub phone_number: String,
    pub ip_address: String,
}

impl NewRegistration {
    pub fn new(
        table_number: impl Into<String>,
        name: impl Into<String>,
        phone_number: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            table_number: table_number.into(),
            name: name.into(),
            phone_number: phone_number.into(),
            ip_address: ip_address.into(),
        }
    }
}

/// A registration document as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub table_number: String,
    pub name: String,
    pub phone_number: String,
    /// Regional timestamp string, e.g. `16/1/2024, 9:05:03 am`
    pub registration_time: String,
    pub ip_address: String,
}

/// A record together with its store-assigned identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    #[serde(rename = "_id")]
    pub id: u64,

    #[serde(flatten)]
    pub record: RegistrationRecord,

    /// Creation instant; orders records independently of the display string
    pub created_at: DateTime<Utc>,
}
