//! Earnings and payout ledger

pub mod model;
pub mod repository;

pub use model::{
    DriverPayout, EarningEntry, EarningsSummary, PayoutStatus, RECENT_EARNINGS_LIMIT,
};
pub use repository::PayoutRepository;
