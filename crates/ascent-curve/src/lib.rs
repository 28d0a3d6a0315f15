// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ASCENT LAUNCHPAD - BONDING CURVE MODULE
//
// Supply-driven issuance for newly launched assets.
// - Pluggable marginal-price shapes (linear reference, quadratic)
// - Exact integral pricing: buys round up, sells round down
// - Per-asset sale ledger with a one-way Trading → Migrated transition
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod ledger;
pub mod pricing;

pub use ledger::{BondingCurveLedger, BuyFill, CurveStatus};
pub use pricing::{CurveKind, LinearCurve, PricingCurve, QuadraticCurve};
