//! Resource models returned by the API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::output::Renderable;

/// Registrar domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub id: u64,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub auto_renew: bool,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub currency: String,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub nameservers: Vec<String>,
    #[serde(default)]
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub country: String,
}

impl Domain {
    pub const STATUS_ACTIVE: &'static str = "active";
    pub const STATUS_FAILED: &'static str = "failed";
}

impl Renderable for Domain {
    fn default_columns() -> &'static [&'static str] {
        &["id", "name", "status", "expires_at"]
    }

    fn monetary_columns() -> &'static [&'static str] {
        &["price"]
    }
}

/// SSL certificate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub id: u64,
    pub name: String,
    pub common_name: String,
    #[serde(default, rename = "subject_alternative_names")]
    pub sans: Vec<String>,
    pub issuer: Option<String>,
    pub status: String,
    #[serde(default)]
    pub automated: bool,
    pub validity: Validity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validity {
    pub not_before: Option<DateTime<Utc>>,
    pub not_after: Option<DateTime<Utc>>,
}

impl Renderable for Certificate {
    fn default_columns() -> &'static [&'static str] {
        &["id", "name", "common_name", "status", "validity_not_after", "days_left"]
    }
}

/// DDoS protection / WAF resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedResource {
    pub id: u64,
    pub name: String,
    pub ip: String,
    pub status: String,
    #[serde(default)]
    pub waf_enabled: bool,
    #[serde(default)]
    pub bandwidth_mbps: f64,
    #[serde(flatten)]
    pub owner: Owner,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub client_id: u64,
    #[serde(default)]
    pub region: String,
}

impl Renderable for ProtectedResource {
    fn default_columns() -> &'static [&'static str] {
        &["id", "name", "ip", "status", "waf_enabled"]
    }
}

/// Object storage bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    pub id: u64,
    pub name: String,
    pub location: String,
    #[serde(rename = "type")]
    pub storage_type: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub objects: u64,
    #[serde(default)]
    pub monthly_cost: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub credentials: Option<Credentials>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl Renderable for Bucket {
    fn default_columns() -> &'static [&'static str] {
        &["id", "name", "location", "type", "size_bytes"]
    }

    fn ignored_columns() -> &'static [&'static str] {
        &["credentials"]
    }

    fn monetary_columns() -> &'static [&'static str] {
        &["monthly_cost"]
    }
}
