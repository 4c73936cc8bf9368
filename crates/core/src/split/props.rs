//! Property-based tests for share allocation.
//!
//! - Property 1: Equal split sum invariant
//! - Property 2: Weighted split sum invariant
//! - Property 3: Degenerate and empty inputs

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::allocation::ShareAllocator;

/// Strategy to generate positive amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate participant counts (1 to 50).
fn participant_count() -> impl Strategy<Value = usize> {
    1usize..50
}

/// Strategy to generate non-negative weights with at least one positive,
/// mixing zeros, whole numbers and fractions.
fn weights() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec((0u32..1_000, 0u32..3), 1..20)
        .prop_filter("at least one positive weight", |ws| ws.iter().any(|(w, _)| *w > 0))
        .prop_map(|ws| {
            ws.into_iter()
                .map(|(w, scale)| Decimal::new(i64::from(w), scale))
                .collect()
        })
}

/// Largest distance a rounded share may sit from its exact portion: half a
/// cent, plus slack for the 28-digit ratio.
fn rounding_slack() -> Decimal {
    Decimal::new(5_000_001, 9)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property 1: Equal split sum invariant
    // =========================================================================

    /// *For any* amount and count >= 1, equal shares SHALL sum exactly to the amount.
    #[test]
    fn prop_split_equal_sums_to_amount(
        amount in positive_amount(),
        count in participant_count(),
    ) {
        let shares = ShareAllocator::default().split_equal(amount, count);
        prop_assert_eq!(shares.len(), count);
        prop_assert_eq!(shares.iter().copied().sum::<Decimal>(), amount);
    }

    /// Every share but the first SHALL be the rounded quotient; the first
    /// absorbs the signed remainder.
    #[test]
    fn prop_split_equal_remainder_on_first_only(
        amount in positive_amount(),
        count in participant_count(),
    ) {
        let allocator = ShareAllocator::default();
        let shares = allocator.split_equal(amount, count);
        let base = allocator.round(amount / Decimal::from(count as u64));
        prop_assert!(shares[1..].iter().all(|s| *s == base));

        let rest: Decimal = shares[1..].iter().copied().sum();
        prop_assert_eq!(shares[0], amount - rest);
    }

    // =========================================================================
    // Property 2: Weighted split sum invariant
    // =========================================================================

    /// *For any* amount and weights with a positive total, shares SHALL sum
    /// exactly to the amount.
    #[test]
    fn prop_split_by_shares_sums_to_amount(
        amount in positive_amount(),
        weights in weights(),
    ) {
        let shares = ShareAllocator::default().split_by_shares(amount, &weights);
        prop_assert_eq!(shares.len(), weights.len());
        prop_assert_eq!(shares.iter().copied().sum::<Decimal>(), amount);
    }

    /// Every share but the first SHALL be its exact portion rounded to the cent.
    #[test]
    fn prop_split_by_shares_rounds_each_portion(
        amount in positive_amount(),
        weights in weights(),
    ) {
        let shares = ShareAllocator::default().split_by_shares(amount, &weights);
        let total_weight: Decimal = weights.iter().copied().sum();
        for (share, weight) in shares.iter().zip(&weights).skip(1) {
            let exact = amount * *weight / total_weight;
            prop_assert!((*share - exact).abs() <= rounding_slack());
        }
    }

    /// Allocation is a deterministic function of its inputs.
    #[test]
    fn prop_split_by_shares_deterministic(
        amount in positive_amount(),
        weights in weights(),
    ) {
        let allocator = ShareAllocator::default();
        prop_assert_eq!(
            allocator.split_by_shares(amount, &weights),
            allocator.split_by_shares(amount, &weights)
        );
    }

    // =========================================================================
    // Property 3: Degenerate and empty inputs
    // =========================================================================

    /// All-zero weights allocate nothing.
    #[test]
    fn prop_zero_weights_allocate_nothing(
        amount in positive_amount(),
        count in participant_count(),
    ) {
        let zeros = vec![Decimal::ZERO; count];
        let shares = ShareAllocator::default().split_by_shares(amount, &zeros);
        prop_assert!(shares.iter().all(Decimal::is_zero));
    }

    /// Empty inputs give empty outputs.
    #[test]
    fn prop_empty_inputs(amount in positive_amount()) {
        let allocator = ShareAllocator::default();
        prop_assert!(allocator.split_equal(amount, 0).is_empty());
        prop_assert!(allocator.split_by_shares(amount, &[]).is_empty());
    }
}
