// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PROPERTY-BASED TESTS — ascent-core
//
// Invariants of the widened arithmetic and the asset token ledger that must
// hold for all inputs.
//
// Run: cargo test --release -p ascent-core --test prop_core
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use ascent_core::math::{isqrt, isqrt_product, mul_div, widen, Rounding, U256};
use ascent_core::{AssetToken, LaunchError};
use proptest::prelude::*;

// ─────────────────────────────────────────────────────────────────
// ARITHMETIC PROPERTIES
// ─────────────────────────────────────────────────────────────────

proptest! {
    /// isqrt returns the floor square root.
    #[test]
    fn prop_isqrt_is_floor(n in any::<u128>()) {
        let r = widen(isqrt(n));
        prop_assert!(r * r <= widen(n));
        prop_assert!((r + U256::one()) * (r + U256::one()) > widen(n));
    }

    /// isqrt_product never overflows and agrees with isqrt when the product fits.
    #[test]
    fn prop_isqrt_product_matches(a in 0u128..u64::MAX as u128, b in 0u128..u64::MAX as u128) {
        prop_assert_eq!(isqrt_product(a, b).unwrap(), isqrt(a * b));
    }

    /// Rounding up differs from rounding down by at most one, and only on a remainder.
    #[test]
    fn prop_mul_div_rounding_gap(a in any::<u64>(), b in any::<u64>(), d in 1u128..u64::MAX as u128) {
        let down = mul_div(a as u128, b as u128, d, Rounding::Down).unwrap();
        let up = mul_div(a as u128, b as u128, d, Rounding::Up).unwrap();
        let exact = (a as u128) * (b as u128) % d == 0;
        prop_assert_eq!(up - down, if exact { 0 } else { 1 });
    }
}

// ─────────────────────────────────────────────────────────────────
// TOKEN LEDGER PROPERTIES
// ─────────────────────────────────────────────────────────────────

const HOLDERS: [&str; 3] = ["ASCWa", "ASCWb", "ASCWc"];

#[derive(Debug, Clone)]
enum Op {
    Mint(usize, u128),
    Burn(usize, u128),
    Transfer(usize, usize, u128),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3, 1u128..1_000_000).prop_map(|(h, a)| Op::Mint(h, a)),
        (0usize..3, 1u128..1_000_000).prop_map(|(h, a)| Op::Burn(h, a)),
        (0usize..3, 0usize..3, 1u128..1_000_000).prop_map(|(f, t, a)| Op::Transfer(f, t, a)),
    ]
}

proptest! {
    /// Sum of balances always equals total supply; failed ops change nothing.
    #[test]
    fn prop_balances_sum_to_supply(ops in prop::collection::vec(arb_op(), 1..60)) {
        let mut token = AssetToken::new(
            "ASCTprop".to_string(),
            "Prop".to_string(),
            "PRP".to_string(),
            10_000_000,
        ).unwrap();

        for op in ops {
            let before: Vec<u128> = HOLDERS.iter().map(|h| token.balance_of(h)).collect();
            let result = match op {
                Op::Mint(h, a) => token.mint(HOLDERS[h], a),
                Op::Burn(h, a) => token.burn(HOLDERS[h], a),
                Op::Transfer(f, t, a) => token.transfer(HOLDERS[f], HOLDERS[t], a),
            };
            if let Err(e) = result {
                prop_assert!(matches!(
                    e,
                    LaunchError::InsufficientBalance { .. } | LaunchError::MaxSupplyExceeded { .. }
                ), "unexpected error: {:?}", e);
                let after: Vec<u128> = HOLDERS.iter().map(|h| token.balance_of(h)).collect();
                prop_assert_eq!(before, after);
            }
            let sum: u128 = HOLDERS.iter().map(|h| token.balance_of(h)).sum();
            prop_assert_eq!(sum, token.total_supply());
            prop_assert!(token.total_supply() <= 10_000_000);
        }
    }
}
