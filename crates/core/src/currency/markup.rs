//! Tiered markup (fee) schedules.
//!
//! A schedule carries a default percentage and optional value ranges with
//! their own percentage. Ranges are scanned in order and the LAST range that
//! contains the value wins. Overlapping ranges are not rejected.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Largest scale a `Decimal` can carry.
const MAX_SCALE: u32 = 28;

/// Rounding applied to a marked-up price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<RoundingCode>")]
pub enum MarkupRounding {
    /// Toward negative infinity.
    Floor,
    /// Half toward positive infinity.
    #[default]
    Round,
    /// Toward positive infinity.
    Ceil,
}

/// Raw `round` field as stored by plan configurations.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RoundingCode {
    /// Legacy numeric code: 1 floor, 2 round, 3 ceil.
    Code(i64),
    /// Mode name, case-insensitive; `NONE` means round.
    Name(String),
}

impl From<Option<RoundingCode>> for MarkupRounding {
    fn from(raw: Option<RoundingCode>) -> Self {
        match raw {
            None | Some(RoundingCode::Code(2)) => Self::Round,
            Some(RoundingCode::Code(1)) => Self::Floor,
            Some(RoundingCode::Code(3)) => Self::Ceil,
            Some(RoundingCode::Code(code)) => {
                tracing::warn!(code, "Unknown markup rounding code, using round");
                Self::Round
            }
            Some(RoundingCode::Name(name)) => match name.to_lowercase().as_str() {
                "floor" => Self::Floor,
                "ceil" => Self::Ceil,
                "round" | "none" => Self::Round,
                other => {
                    tracing::warn!(mode = other, "Unknown markup rounding mode, using round");
                    Self::Round
                }
            },
        }
    }
}

impl MarkupRounding {
    /// Rounds `value` to `precision` places with this mode.
    #[must_use]
    pub fn apply(self, value: Decimal, precision: u32) -> Decimal {
        let strategy = match self {
            Self::Floor => RoundingStrategy::ToNegativeInfinity,
            Self::Ceil => RoundingStrategy::ToPositiveInfinity,
            // Half toward +inf: away from zero above zero, toward zero below.
            Self::Round if value.is_sign_negative() => RoundingStrategy::MidpointTowardZero,
            Self::Round => RoundingStrategy::MidpointAwayFromZero,
        };
        value.round_dp_with_strategy(precision.min(MAX_SCALE), strategy)
    }
}

/// A value range with its own markup percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRange {
    /// Exclusive lower bound.
    pub from: Decimal,
    /// Inclusive upper bound.
    pub to: Decimal,
    /// Markup percentage for values in `(from, to]`.
    pub factor: Decimal,
}

impl FeeRange {
    /// Returns true if `value` lies in `(from, to]`.
    #[must_use]
    pub fn contains(&self, value: Decimal) -> bool {
        value > self.from && value <= self.to
    }
}

/// Markup configuration for a plan or reseller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Markup percentage when no range matches.
    #[serde(default)]
    pub default: Decimal,
    /// Decimal places of the result.
    #[serde(default)]
    pub precision: u32,
    /// Rounding of the result.
    #[serde(default)]
    pub round: MarkupRounding,
    /// Ordered ranges; later matches override earlier ones.
    #[serde(default)]
    pub ranges: Vec<FeeRange>,
}

impl FeeSchedule {
    /// Percentage that applies to `value`.
    #[must_use]
    pub fn percent_for(&self, value: Decimal) -> Decimal {
        self.ranges
            .iter()
            .rev()
            .find(|range| range.contains(value))
            .map_or(self.default, |range| range.factor)
    }

    /// Multiplier that applies to `value` (`percent / 100 + 1`).
    #[must_use]
    pub fn multiplier_for(&self, value: Decimal) -> Decimal {
        self.percent_for(value) / HUNDRED + Decimal::ONE
    }
}

/// Applies a markup schedule to a price.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use pricebook_core::currency::{FeeRange, FeeSchedule, apply_markup};
///
/// let fee = FeeSchedule {
///     default: dec!(10),
///     precision: 2,
///     ranges: vec![FeeRange { from: dec!(100), to: dec!(200), factor: dec!(20) }],
///     ..FeeSchedule::default()
/// };
/// assert_eq!(apply_markup(dec!(150), &fee), dec!(180.00));
/// assert_eq!(apply_markup(dec!(50), &fee), dec!(55.00));
/// ```
#[must_use]
pub fn apply_markup(value: Decimal, fee: &FeeSchedule) -> Decimal {
    let Some(marked_up) = value.checked_mul(fee.multiplier_for(value)) else {
        tracing::warn!(%value, "Markup overflowed, using zero");
        return Decimal::ZERO;
    };

    let rounded = fee.round.apply(marked_up, fee.precision);
    if rounded.is_zero() { Decimal::ZERO } else { rounded }
}
