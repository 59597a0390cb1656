//! Currency and identifier scalars.
//!
//! 1 GAL = 10^8 grains. The supply is fixed at genesis (21 million GAL)
//! and nothing in the workspace can create grains afterwards.

/// Grain: the smallest indivisible unit of GAL.
pub type Grain = u128;

/// Number of decimal places in GAL.
pub const GAL_DECIMALS: u32 = 8;

/// One full GAL in grains.
pub const GRAINS_PER_GAL: Grain = 100_000_000;

/// Fixed total supply: 21 million GAL.
pub const TOTAL_SUPPLY_GRAINS: Grain = 21_000_000 * GRAINS_PER_GAL;

/// Miner identity: a 32-byte account key.
pub type MinerId = [u8; 32];

/// A 32-byte hash digest.
pub type Digest = [u8; 32];

/// Milliseconds since the Unix epoch, supplied by the caller's clock.
pub type TimestampMs = u64;

/// Render a 32-byte digest or identity as lowercase hex.
pub fn to_hex(bytes: &[u8; 32]) -> String {
    hex::encode(bytes)
}

/// Render a grain amount as a decimal GAL string, e.g. `12.50000000`.
pub fn format_gal(amount: Grain) -> String {
    let whole = amount / GRAINS_PER_GAL;
    let frac = amount % GRAINS_PER_GAL;
    format!("{whole}.{frac:08}")
}
