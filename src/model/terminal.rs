//! Terminal events: sale, cull and death
//!
//! Each of these retires exactly one rabbit. A rabbit accepts one of them
//! over its whole lifetime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::RecordId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: RecordId,
    pub rabbit_id: RecordId,
    pub sale_date: DateTime<Utc>,
    pub sale_price: f64,
    pub buyer_name: Option<String>,
    pub buyer_contact: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub rabbit_id: RecordId,
    pub sale_date: DateTime<Utc>,
    pub sale_price: f64,
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub buyer_contact: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewSale {
    pub fn new(rabbit_id: RecordId, sale_date: DateTime<Utc>, sale_price: f64) -> Self {
        Self {
            rabbit_id,
            sale_date,
            sale_price,
            buyer_name: None,
            buyer_contact: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cull {
    pub id: RecordId,
    pub rabbit_id: RecordId,
    pub cull_date: DateTime<Utc>,
    pub reason: Option<String>,
    pub destination: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCull {
    pub rabbit_id: RecordId,
    pub cull_date: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewCull {
    pub fn new(rabbit_id: RecordId, cull_date: DateTime<Utc>) -> Self {
        Self {
            rabbit_id,
            cull_date,
            reason: None,
            destination: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Death {
    pub id: RecordId,
    pub rabbit_id: RecordId,
    pub death_date: DateTime<Utc>,
    pub cause: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDeath {
    pub rabbit_id: RecordId,
    pub death_date: DateTime<Utc>,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewDeath {
    pub fn new(rabbit_id: RecordId, death_date: DateTime<Utc>) -> Self {
        Self {
            rabbit_id,
            death_date,
            cause: None,
            notes: None,
        }
    }
}
