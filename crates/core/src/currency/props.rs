//! Property-based tests for currency operations.
//!
//! - Rate resolution: identity, direct edges, no multi-hop
//! - Conversion: unknown rates, round trips
//! - Rounding: zero, small magnitudes, idempotence
//! - Markup: range selection

use proptest::prelude::*;
use rust_decimal::Decimal;

use pricebook_shared::CurrencyCode;

use super::conversion::convert;
use super::exchange::{ExchangeRate, RateTable, resolve_rate};
use super::markup::{FeeRange, FeeSchedule};
use super::rounding::format_price;
use super::types::Rounding;

/// Strategy to generate amounts with up to 6 decimal places (-1,000,000 to 1,000,000).
fn any_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000_000i64..1_000_000_000_000i64).prop_map(|v| Decimal::new(v, 6))
}

/// Strategy to generate positive amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate decimal places (0 to 6).
fn precision() -> impl Strategy<Value = u32> {
    0u32..=6
}

fn rounding() -> impl Strategy<Value = Rounding> {
    prop_oneof![
        Just(Rounding::RoundHalf),
        Just(Rounding::RoundDown),
        Just(Rounding::RoundUp),
    ]
}

fn currency_code() -> impl Strategy<Value = CurrencyCode> {
    "[A-Z]{3}".prop_map(CurrencyCode::from)
}

/// Edges between `C0`..`C5`, never touching `A`, `B` or the neutral unit.
fn distractor_edges() -> impl Strategy<Value = Vec<ExchangeRate>> {
    prop::collection::vec((0u8..6, 0u8..6, positive_rate()), 0..12).prop_map(|edges| {
        edges
            .into_iter()
            .map(|(from, to, rate)| ExchangeRate::new(format!("C{from}"), format!("C{to}"), rate))
            .collect()
    })
}

fn code(s: &str) -> CurrencyCode {
    CurrencyCode::new(s)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Same currency resolves to 1 for any table, including an empty one.
    #[test]
    fn prop_same_currency_resolves_to_one(
        c in currency_code(),
        base in currency_code(),
        edges in distractor_edges(),
    ) {
        prop_assert_eq!(resolve_rate(&c, &c, &edges, &base), Some(Decimal::ONE));
        prop_assert_eq!(resolve_rate(&c, &c, &[], &base), Some(Decimal::ONE));
    }

    /// A direct edge resolves to its rate wherever it sits in the table.
    #[test]
    fn prop_direct_edge_is_order_independent(
        rate in positive_rate(),
        (edges, shuffled) in distractor_edges()
            .prop_flat_map(|mut edges| {
                edges.push(ExchangeRate::new("A", "B", Decimal::ONE));
                (Just(edges.clone()), Just(edges).prop_shuffle())
            }),
    ) {
        let base = code("USD");
        let with_rate = |mut edges: Vec<ExchangeRate>| {
            for edge in &mut edges {
                if edge.from == "A" && edge.to == "B" {
                    edge.rate = rate;
                }
            }
            edges
        };

        let ordered = with_rate(edges);
        let shuffled = with_rate(shuffled);

        prop_assert_eq!(resolve_rate(&code("A"), &code("B"), &ordered, &base), Some(rate));
        prop_assert_eq!(resolve_rate(&code("A"), &code("B"), &shuffled, &base), Some(rate));
    }

    /// `A -> B` and `B -> C` never yield `A -> C`.
    #[test]
    fn prop_no_multi_hop(ab in positive_rate(), bc in positive_rate()) {
        let table = RateTable::new(vec![
            ExchangeRate::new("AAA", "BBB", ab),
            ExchangeRate::new("BBB", "CCC", bc),
        ]);
        prop_assert_eq!(table.resolve(&code("AAA"), &code("CCC"), &code("USD")), None);
    }

    /// An unknown or zero rate converts anything to zero.
    #[test]
    fn prop_convert_without_rate_is_zero(amount in any_amount()) {
        prop_assert_eq!(convert(amount, None), Decimal::ZERO);
        prop_assert_eq!(convert(amount, Some(Decimal::ZERO)), Decimal::ZERO);
    }

    /// Converting there and back stays within a tiny tolerance.
    #[test]
    fn prop_round_trip_within_tolerance(amount in positive_amount(), rate in positive_rate()) {
        let there = convert(amount, Some(rate));
        let back = convert(there, Some(Decimal::ONE / rate));
        let tolerance = Decimal::new(1, 9);
        prop_assert!(
            (back - amount).abs() <= tolerance,
            "{} -> {} -> {}", amount, there, back
        );
    }

    /// Zero formats to zero for every precision and policy.
    #[test]
    fn prop_zero_formats_to_zero(p in 0u32..=28, m in rounding()) {
        let result = format_price(Decimal::ZERO, p, m);
        prop_assert_eq!(result, Decimal::ZERO);
        prop_assert!(!result.is_sign_negative());
    }

    /// Sub-cent positives ignore the requested precision.
    #[test]
    fn prop_sub_cent_keeps_value(v in 1i64..10_000, p in precision(), m in rounding()) {
        // 0.000001 ..= 0.009999
        let amount = Decimal::new(v, 6);
        prop_assert_eq!(format_price(amount, p, m), amount);
    }

    /// Formatting an already formatted value changes nothing.
    #[test]
    fn prop_format_is_idempotent(x in any_amount(), p in precision(), m in rounding()) {
        let once = format_price(x, p, m);
        let twice = format_price(once, p, m);
        prop_assert_eq!(once, twice);
    }

    /// Idempotence also holds for amounts finer than the small-amount precision.
    #[test]
    fn prop_format_is_idempotent_near_windows(
        v in -1_000_000_000_000_000i64..20_000_000_000_000i64,
        p in precision(),
        m in rounding(),
    ) {
        // -1.0 ..= 0.02 with 15 decimal places
        let x = Decimal::new(v, 15);
        let once = format_price(x, p, m);
        prop_assert_eq!(format_price(once, p, m), once);
    }

    /// Round-half results never carry more than `precision` places.
    #[test]
    fn prop_round_half_scale(x in any_amount(), p in precision()) {
        prop_assume!(x <= Decimal::NEGATIVE_ONE || x >= Decimal::new(1, 2));
        let result = format_price(x, p, Rounding::RoundHalf);
        prop_assert!(result.scale() <= p);
    }

    /// A value inside the last listed range always uses that range's factor.
    #[test]
    fn prop_last_matching_range_wins(
        from in 0i64..1_000,
        width in 1i64..1_000,
        offset in 1i64..1_000,
        factor in 0i64..100,
        earlier in prop::collection::vec((0i64..2_000, 1i64..2_000, 0i64..100), 0..5),
    ) {
        let offset = offset.min(width);
        let value = Decimal::from(from + offset);

        let mut ranges: Vec<FeeRange> = earlier
            .into_iter()
            .map(|(f, w, k)| FeeRange {
                from: Decimal::from(f),
                to: Decimal::from(f + w),
                factor: Decimal::from(k),
            })
            .collect();
        ranges.push(FeeRange {
            from: Decimal::from(from),
            to: Decimal::from(from + width),
            factor: Decimal::from(factor),
        });

        let fee = FeeSchedule {
            default: Decimal::from(7),
            ranges,
            ..FeeSchedule::default()
        };
        prop_assert_eq!(fee.percent_for(value), Decimal::from(factor));
    }
}
