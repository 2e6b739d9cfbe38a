//! Driver earnings and payout ledger types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How many qualifying orders the recent-earnings feed returns.
pub const RECENT_EARNINGS_LIMIT: usize = 20;

/// Payout ledger row status.
///
/// PENDING reserves the amount while the transfer is in flight; it is
/// finalized to SUCCEEDED or FAILED exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutStatus {
    Pending,
    Succeeded,
    Failed,
}

impl PayoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "SUCCEEDED" => Some(Self::Succeeded),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Append-only payout ledger row. Never mutated after finalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverPayout {
    pub id: String,
    pub driver_id: String,
    pub amount: Decimal,
    pub status: PayoutStatus,
    /// Transfer id at the external payout rail, set on success
    pub external_transfer_id: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One qualifying order in the recent-earnings feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningEntry {
    pub order_id: String,
    pub order_number: String,
    /// "fuel" or "charging"
    pub kind: &'static str,
    pub delivery_fee: Decimal,
    pub tip: Decimal,
    /// delivery_fee + tip
    pub amount: Decimal,
    pub completed_at: DateTime<Utc>,
}

/// Driver earnings snapshot, derived from order state at read time
#[derive(Debug, Clone, Serialize)]
pub struct EarningsSummary {
    pub driver_id: String,
    pub total_earned: Decimal,
    pub total_paid_out: Decimal,
    /// max(0, earned - paid out)
    pub available_balance: Decimal,
    pub can_withdraw: bool,
    pub recent: Vec<EarningEntry>,
}
