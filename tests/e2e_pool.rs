// ============================================================================
// E2E POOL TEST — ASCENT LAUNCHPAD
// ============================================================================
//
// End-to-end tests for the constant-product pools that graduated assets
// trade in.
//
// Architecture:
//   - Pool math is checked directly on `AmmPool` for exact figures.
//   - Everything else runs through the `Launchpad` engine, so token and
//     native balances move together with the reserves.
//
// Test Scenarios:
//   1. First deposit mints isqrt(X·Y); a proportional k-times deposit mints k·L
//   2. Swaps both ways keep k non-decreasing and match their quotes
//   3. Slippage protection leaves the pool untouched
//   4. Liquidity add and remove through the engine
//   5. Registry rules: one pool per asset, missing pools fail
//   6. Early pools stay locked while the curve trades
//   7. Migrated liquidity stays with the pool
//   8. Liquidity units move between providers; the treasury's stay locked
//
// Run:
//   cargo test --release --test e2e_pool -- --nocapture
//
// ============================================================================

use ascent_amm::{pool_address_for, AmmPool, PoolInfo};
use ascent_core::math::{isqrt_product, widen};
use ascent_core::{
    LaunchConfig, LaunchError, SwapDirection, CREATION_FEE, FUNDING_GOAL,
    LIQUIDITY_TOLERANCE_BPS, SWAP_FEE_BPS, UNIT,
};
use ascent_launchpad::{AssetMetadata, Launchpad};

// ============================================================================
// HELPERS
// ============================================================================

const CREATOR: &str = "ASCWcreator";
const ALICE: &str = "ASCWalice";
const BOB: &str = "ASCWbob";

/// Engine with one graduated asset. Alice bought 4 base worth before
/// graduation; Bob's 6 base buy crossed the goal.
fn graduated() -> (Launchpad, String, String) {
    let lp = Launchpad::new(LaunchConfig::default()).unwrap();
    lp.deposit_native(CREATOR, UNIT).unwrap();
    lp.deposit_native(ALICE, 50 * UNIT).unwrap();
    lp.deposit_native(BOB, 50 * UNIT).unwrap();
    let asset = lp
        .create_asset(CREATOR, AssetMetadata::new("Pool Test", "POOL"), CREATION_FEE)
        .unwrap();
    lp.buy_with_budget(ALICE, &asset, 4 * UNIT, 0).unwrap();
    let pool = lp
        .buy_with_budget(BOB, &asset, 6 * UNIT, 0)
        .unwrap()
        .migrated_pool
        .expect("goal reached");
    (lp, asset, pool)
}

fn k(info: &PoolInfo) -> ascent_core::math::U256 {
    widen(info.reserve_asset) * widen(info.reserve_base)
}

fn assert_pool_backed(lp: &Launchpad, asset: &str, pool: &str) {
    let info = lp.pool(pool).unwrap();
    assert_eq!(lp.asset_balance(asset, pool).unwrap(), info.reserve_asset);
    lp.audit().unwrap();
}

// ============================================================================
// TEST 1: LIQUIDITY MINTING
// ============================================================================
#[test]
fn test_liquidity_minting() {
    println!("\n=== TEST 1: Liquidity Minting ===\n");
    let mut pool = AmmPool::new(
        pool_address_for("ASCTmint"),
        "ASCTmint".to_string(),
        CREATOR.to_string(),
        SWAP_FEE_BPS,
    )
    .unwrap();

    let first = pool
        .add_liquidity(ALICE, 4 * UNIT, 9 * UNIT, LIQUIDITY_TOLERANCE_BPS)
        .unwrap();
    assert_eq!(first.minted, 6 * UNIT);
    assert_eq!(first.minted, isqrt_product(4 * UNIT, 9 * UNIT).unwrap());

    let second = pool
        .add_liquidity(BOB, 8 * UNIT, 18 * UNIT, LIQUIDITY_TOLERANCE_BPS)
        .unwrap();
    assert_eq!(second.minted, 2 * first.minted);
    assert_eq!(second.asset_refund, 0);
    assert_eq!(second.base_refund, 0);
    assert_eq!(pool.liquidity_supply(), 18 * UNIT);

    let err = pool
        .add_liquidity(BOB, UNIT, 3 * UNIT, LIQUIDITY_TOLERANCE_BPS)
        .unwrap_err();
    assert!(matches!(err, LaunchError::DisproportionateDeposit { .. }));
    println!("  L after two deposits: {}", pool.liquidity_supply());
}

// ============================================================================
// TEST 2: SWAPS
// ============================================================================
#[test]
fn test_swaps_keep_k() {
    println!("\n=== TEST 2: Swaps ===\n");
    let (lp, asset, pool) = graduated();
    let start = lp.pool(&pool).unwrap();
    assert_eq!(start.reserve_base, FUNDING_GOAL);

    // base in, asset out
    let quote = lp
        .quote_swap(&pool, SwapDirection::BaseToAsset, UNIT)
        .unwrap();
    let held = lp.asset_balance(&asset, BOB).unwrap();
    let r = lp
        .swap(BOB, &pool, UNIT, SwapDirection::BaseToAsset, quote.amount_out)
        .unwrap();
    assert_eq!(r.amount_out, quote.amount_out);
    assert_eq!(r.fee, UNIT * SWAP_FEE_BPS / 10_000);
    assert_eq!(lp.asset_balance(&asset, BOB).unwrap(), held + r.amount_out);
    let mid = lp.pool(&pool).unwrap();
    assert!(k(&mid) >= k(&start));
    assert_eq!(mid.reserve_base, start.reserve_base + UNIT);
    assert_pool_backed(&lp, &asset, &pool);

    // asset out again, back to base
    let native = lp.native_balance(ALICE).unwrap();
    let r = lp
        .swap(ALICE, &pool, 10_000 * UNIT, SwapDirection::AssetToBase, 1)
        .unwrap();
    assert!(r.amount_out > 0);
    assert_eq!(lp.native_balance(ALICE).unwrap(), native + r.amount_out);
    let end = lp.pool(&pool).unwrap();
    assert!(k(&end) >= k(&mid));
    assert_eq!(end.swap_count, 2);
    assert_pool_backed(&lp, &asset, &pool);
}

// ============================================================================
// TEST 3: SLIPPAGE
// ============================================================================
#[test]
fn test_slippage_protection() {
    println!("\n=== TEST 3: Slippage ===\n");
    let (lp, asset, pool) = graduated();
    let before = lp.pool(&pool).unwrap();
    let quote = lp
        .quote_swap(&pool, SwapDirection::BaseToAsset, UNIT)
        .unwrap();
    let native = lp.native_balance(BOB).unwrap();

    let err = lp
        .swap(BOB, &pool, UNIT, SwapDirection::BaseToAsset, quote.amount_out + 1)
        .unwrap_err();
    assert_eq!(
        err,
        LaunchError::SlippageExceeded {
            out: quote.amount_out,
            min: quote.amount_out + 1
        }
    );
    assert_eq!(lp.pool(&pool).unwrap(), before);
    assert_eq!(lp.native_balance(BOB).unwrap(), native);

    // swapping with no base currency fails the settlement, not the pool
    let err = lp
        .swap("ASCWbroke", &pool, UNIT, SwapDirection::BaseToAsset, 0)
        .unwrap_err();
    assert!(matches!(err, LaunchError::InsufficientBalance { .. }));
    assert_eq!(lp.pool(&pool).unwrap(), before);
    assert_pool_backed(&lp, &asset, &pool);
}

// ============================================================================
// TEST 4: LIQUIDITY THROUGH THE ENGINE
// ============================================================================
#[test]
fn test_add_and_remove_liquidity() {
    println!("\n=== TEST 4: Add / Remove Liquidity ===\n");
    let (lp, asset, pool) = graduated();
    let info = lp.pool(&pool).unwrap();
    let asset_in = info.reserve_asset / 100;
    let base_in = info.reserve_base / 100;

    let receipt = lp.add_liquidity(ALICE, &pool, asset_in, base_in).unwrap();
    assert_eq!(receipt.minted, info.liquidity_supply / 100);
    assert!(receipt.asset_used <= asset_in && receipt.base_used <= base_in);
    assert_eq!(lp.liquidity_of(&pool, ALICE).unwrap(), receipt.minted);
    let position = lp.position(&pool, ALICE).unwrap();
    assert_eq!(position.units, receipt.minted);
    assert!(position.share_bps > 0);
    assert_pool_backed(&lp, &asset, &pool);

    let tokens = lp.asset_balance(&asset, ALICE).unwrap();
    let native = lp.native_balance(ALICE).unwrap();
    let (a, b) = lp.remove_liquidity(ALICE, &pool, receipt.minted).unwrap();
    assert!(a <= receipt.asset_used && b <= receipt.base_used);
    assert_eq!(lp.asset_balance(&asset, ALICE).unwrap(), tokens + a);
    assert_eq!(lp.native_balance(ALICE).unwrap(), native + b);
    assert_eq!(lp.liquidity_of(&pool, ALICE).unwrap(), 0);

    assert!(matches!(
        lp.remove_liquidity(ALICE, &pool, 1),
        Err(LaunchError::InsufficientBalance { .. })
    ));
    assert!(matches!(
        lp.add_liquidity(ALICE, &pool, asset_in, base_in * 3),
        Err(LaunchError::DisproportionateDeposit { .. })
    ));
    assert_pool_backed(&lp, &asset, &pool);
}

// ============================================================================
// TEST 5: REGISTRY RULES
// ============================================================================
#[test]
fn test_pool_registry_rules() {
    println!("\n=== TEST 5: Registry Rules ===\n");
    let (lp, asset, pool) = graduated();
    assert_eq!(pool, pool_address_for(&asset));
    assert_eq!(
        lp.create_pool(ALICE, &asset).unwrap_err(),
        LaunchError::PoolAlreadyExists(asset.clone())
    );
    assert_eq!(
        lp.create_pool(ALICE, "ASCTmissing").unwrap_err(),
        LaunchError::AssetNotFound("ASCTmissing".to_string())
    );
    assert_eq!(
        lp.get_pool_for("ASCTmissing").unwrap_err(),
        LaunchError::PoolNotFound("ASCTmissing".to_string())
    );
    assert!(matches!(
        lp.pool("ASCPmissing"),
        Err(LaunchError::PoolNotFound(_))
    ));
    assert_eq!(lp.list_pools().unwrap().len(), 1);
}

// ============================================================================
// TEST 6: EARLY POOL
// ============================================================================
#[test]
fn test_early_pool_locked() {
    println!("\n=== TEST 6: Early Pool ===\n");
    let lp = Launchpad::new(LaunchConfig::default()).unwrap();
    lp.deposit_native(CREATOR, UNIT).unwrap();
    lp.deposit_native(ALICE, 50 * UNIT).unwrap();
    let asset = lp
        .create_asset(CREATOR, AssetMetadata::new("Early", "EARLY"), CREATION_FEE)
        .unwrap();
    let pool = lp.create_pool(ALICE, &asset).unwrap();
    lp.buy_with_budget(ALICE, &asset, UNIT, 0).unwrap();

    assert_eq!(
        lp.add_liquidity(ALICE, &pool, 1_000 * UNIT, UNIT / 10)
            .unwrap_err(),
        LaunchError::CurveStillTrading(asset.clone())
    );
    assert!(matches!(
        lp.swap(ALICE, &pool, UNIT, SwapDirection::BaseToAsset, 0),
        Err(LaunchError::InsufficientLiquidity(_))
    ));

    let receipt = lp
        .buy_with_budget(ALICE, &asset, FUNDING_GOAL - UNIT, 0)
        .unwrap();
    assert_eq!(receipt.migrated_pool.as_deref(), Some(pool.as_str()));
    assert_eq!(lp.pool(&pool).unwrap().reserve_base, FUNDING_GOAL);
}

// ============================================================================
// TEST 7: MIGRATED LIQUIDITY
// ============================================================================
#[test]
fn test_migrated_liquidity_locked() {
    println!("\n=== TEST 7: Migrated Liquidity ===\n");
    let (lp, _asset, pool) = graduated();
    let treasury = lp.config().treasury.clone();
    let units = lp.liquidity_of(&pool, &treasury).unwrap();
    assert!(units > 0);
    assert_eq!(
        lp.remove_liquidity(&treasury, &pool, units).unwrap_err(),
        LaunchError::ReservedAccount(treasury.clone())
    );
    assert_eq!(lp.liquidity_of(&pool, &treasury).unwrap(), units);
}

// ============================================================================
// TEST 8: TRANSFERABLE LIQUIDITY UNITS
// ============================================================================
#[test]
fn test_liquidity_units_transfer() {
    println!("\n=== TEST 8: Liquidity Transfer ===\n");
    let (lp, asset, pool) = graduated();
    let info = lp.pool(&pool).unwrap();
    let receipt = lp
        .add_liquidity(ALICE, &pool, info.reserve_asset / 100, info.reserve_base / 100)
        .unwrap();
    let half = receipt.minted / 2;

    lp.transfer_liquidity(ALICE, &pool, BOB, half).unwrap();
    assert_eq!(lp.liquidity_of(&pool, BOB).unwrap(), half);
    assert_eq!(lp.liquidity_of(&pool, ALICE).unwrap(), receipt.minted - half);
    assert_eq!(lp.pool(&pool).unwrap().liquidity_supply, info.liquidity_supply + receipt.minted);

    let native = lp.native_balance(BOB).unwrap();
    let (_, b) = lp.remove_liquidity(BOB, &pool, half).unwrap();
    assert!(b > 0);
    assert_eq!(lp.native_balance(BOB).unwrap(), native + b);
    assert_eq!(lp.liquidity_of(&pool, BOB).unwrap(), 0);

    let treasury = lp.config().treasury.clone();
    let locked = lp.liquidity_of(&pool, &treasury).unwrap();
    assert_eq!(
        lp.transfer_liquidity(&treasury, &pool, ALICE, locked).unwrap_err(),
        LaunchError::ReservedAccount(treasury.clone())
    );
    assert!(matches!(
        lp.transfer_liquidity(ALICE, &pool, &pool, 1),
        Err(LaunchError::ReservedAccount(_))
    ));
    assert!(matches!(
        lp.transfer_liquidity(BOB, &pool, ALICE, 1),
        Err(LaunchError::InsufficientBalance { .. })
    ));
    assert_eq!(lp.liquidity_of(&pool, &treasury).unwrap(), locked);
    assert_pool_backed(&lp, &asset, &pool);
}
