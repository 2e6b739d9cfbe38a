//! Geospatial pricing: great-circle distance, tiered delivery fee,
//! sales tax and the internal fuel markup.
//!
//! Pure functions, no persistence. All amounts are `Decimal` rounded to
//! 2 decimal places; each component is rounded independently, so a total
//! may carry the cumulative rounding of its parts.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Earth radius in miles, matching the fee schedule's calibration.
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Pricing constants.
///
/// The markup and tax figures mirror current business rules but are kept
/// as configuration rather than inline literals so they can be changed
/// without a release.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Delivery fee per mile for the first tier.
    pub base_rate_per_mile: Decimal,
    /// Delivery fee per mile beyond the tier break.
    pub extended_rate_per_mile: Decimal,
    /// Distance in miles where the marginal rate drops.
    pub tier_break_miles: Decimal,
    /// Flat sales tax rate applied to fuel/base cost plus delivery fee.
    pub tax_rate: Decimal,
    /// Internal markup rate added on top of the product base price.
    pub fuel_markup_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_rate_per_mile: dec!(1.25),
            extended_rate_per_mile: dec!(0.95),
            tier_break_miles: dec!(3),
            tax_rate: dec!(0.06),
            fuel_markup_rate: dec!(0.00095),
        }
    }
}

/// Round a money/distance amount to 2 decimals, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Great-circle (haversine) distance between two points, in miles,
/// rounded to 2 decimals.
pub fn distance_miles(origin: Coordinates, dest: Coordinates) -> Decimal {
    let lat1 = origin.lat.to_radians();
    let lat2 = dest.lat.to_radians();
    let d_lat = (dest.lat - origin.lat).to_radians();
    let d_lon = (dest.lon - origin.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let miles = 2.0 * EARTH_RADIUS_MILES * a.sqrt().asin();

    round2(Decimal::from_f64(miles).unwrap_or(Decimal::ZERO))
}

impl PricingConfig {
    /// Two-tier marginal delivery fee schedule.
    ///
    /// Zero at or below zero distance; `base_rate` per mile up to the
    /// tier break, `extended_rate` per marginal mile beyond it. The
    /// break itself bills entirely at the base rate.
    pub fn delivery_fee(&self, distance: Decimal) -> Decimal {
        if distance <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let fee = if distance <= self.tier_break_miles {
            distance * self.base_rate_per_mile
        } else {
            self.tier_break_miles * self.base_rate_per_mile
                + (distance - self.tier_break_miles) * self.extended_rate_per_mile
        };
        round2(fee)
    }

    /// Flat sales tax on a subtotal.
    ///
    /// `state_code` is accepted for a future per-jurisdiction table and
    /// currently unused.
    pub fn tax(&self, subtotal: Decimal, _state_code: Option<&str>) -> Decimal {
        round2(subtotal * self.tax_rate)
    }

    /// Internal-only markup on a base fuel cost. Never exposed to the
    /// customer; reported separately for accounting.
    pub fn fuel_markup(&self, base_cost: Decimal) -> Decimal {
        round2(base_cost * self.fuel_markup_rate)
    }

    /// Customer-facing unit price: base price with the markup applied.
    pub fn unit_price(&self, base_price: Decimal) -> Decimal {
        round2(base_price * (Decimal::ONE + self.fuel_markup_rate))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PricingConfig {
        PricingConfig::default()
    }

    #[test]
    fn delivery_fee_zero_and_negative_distance() {
        assert_eq!(cfg().delivery_fee(dec!(0)), dec!(0));
        assert_eq!(cfg().delivery_fee(dec!(-1.5)), dec!(0));
    }

    #[test]
    fn delivery_fee_below_tier_break() {
        // 2 miles -> 2 * 1.25 = 2.50
        assert_eq!(cfg().delivery_fee(dec!(2)), dec!(2.50));
        assert_eq!(cfg().delivery_fee(dec!(0.5)), dec!(0.63)); // 0.625 rounds up
    }

    #[test]
    fn delivery_fee_exact_break() {
        assert_eq!(cfg().delivery_fee(dec!(3)), dec!(3.75));
    }

    #[test]
    fn delivery_fee_beyond_tier_break() {
        // 10 miles -> 3.75 + 7 * 0.95 = 10.40
        assert_eq!(cfg().delivery_fee(dec!(10)), dec!(10.40));
        // Just past the break bills marginally at 0.95
        assert_eq!(cfg().delivery_fee(dec!(3.01)), dec!(3.76));
    }

    #[test]
    fn tax_is_flat_six_percent() {
        assert_eq!(cfg().tax(dec!(100), None), dec!(6.00));
        assert_eq!(cfg().tax(dec!(19.99), Some("TX")), dec!(1.20));
    }

    #[test]
    fn markup_and_unit_price() {
        assert_eq!(cfg().fuel_markup(dec!(1000)), dec!(0.95));
        assert_eq!(cfg().unit_price(dec!(3.50)), dec!(3.50)); // 3.503325 rounds back down
        assert_eq!(cfg().unit_price(dec!(100)), dec!(100.10));
    }

    #[test]
    fn distance_same_point_is_zero() {
        let p = Coordinates::new(29.7604, -95.3698);
        assert_eq!(distance_miles(p, p), dec!(0));
    }

    #[test]
    fn distance_known_pairs() {
        // One degree of longitude on the equator
        assert_eq!(
            distance_miles(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0)),
            dec!(69.10)
        );
        // New York -> Los Angeles
        assert_eq!(
            distance_miles(
                Coordinates::new(40.7128, -74.0060),
                Coordinates::new(34.0522, -118.2437)
            ),
            dec!(2445.71)
        );
    }

    #[test]
    fn coordinate_validity() {
        assert!(Coordinates::new(90.0, -180.0).is_valid());
        assert!(!Coordinates::new(90.01, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, 180.5).is_valid());
    }
}
