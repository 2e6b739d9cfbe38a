//! Earnings and payout DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::payout::{DriverPayout, EarningEntry, EarningsSummary};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EarningEntryDto {
    pub order_id: String,
    pub order_number: String,
    /// fuel or charging
    pub kind: String,
    pub delivery_fee: Decimal,
    pub tip: Decimal,
    /// delivery_fee + tip
    pub amount: Decimal,
    pub completed_at: DateTime<Utc>,
}

impl EarningEntryDto {
    pub fn from_domain(entry: &EarningEntry) -> Self {
        Self {
            order_id: entry.order_id.clone(),
            order_number: entry.order_number.clone(),
            kind: entry.kind.to_string(),
            delivery_fee: entry.delivery_fee,
            tip: entry.tip,
            amount: entry.amount,
            completed_at: entry.completed_at,
        }
    }
}

/// Driver earnings snapshot
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EarningsDto {
    pub driver_id: String,
    pub total_earned: Decimal,
    pub total_paid_out: Decimal,
    pub available_balance: Decimal,
    pub can_withdraw: bool,
    /// Most recent qualifying orders, newest first
    pub recent: Vec<EarningEntryDto>,
}

impl EarningsDto {
    pub fn from_domain(summary: &EarningsSummary) -> Self {
        Self {
            driver_id: summary.driver_id.clone(),
            total_earned: summary.total_earned,
            total_paid_out: summary.total_paid_out,
            available_balance: summary.available_balance,
            can_withdraw: summary.can_withdraw,
            recent: summary.recent.iter().map(EarningEntryDto::from_domain).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PayoutDto {
    pub id: String,
    pub driver_id: String,
    pub amount: Decimal,
    /// PENDING, SUCCEEDED, FAILED
    pub status: String,
    pub external_transfer_id: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PayoutDto {
    pub fn from_domain(payout: &DriverPayout) -> Self {
        Self {
            id: payout.id.clone(),
            driver_id: payout.driver_id.clone(),
            amount: payout.amount,
            status: payout.status.as_str().to_string(),
            external_transfer_id: payout.external_transfer_id.clone(),
            failure_reason: payout.failure_reason.clone(),
            created_at: payout.created_at,
        }
    }
}

/// Request a payout against the available balance
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PayoutRequest {
    #[validate(custom(function = positive_amount))]
    pub amount: Decimal,
}

fn positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_positive() && !amount.is_zero() {
        Ok(())
    } else {
        Err(ValidationError::new("positive"))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn payout_request_requires_a_positive_amount() {
        assert!(PayoutRequest { amount: dec!(0) }.validate().is_err());
        assert!(PayoutRequest { amount: dec!(-5) }.validate().is_err());
        assert!(PayoutRequest { amount: dec!(25) }.validate().is_ok());
    }
}
