//! Galena core types
//!
//! Scalar types, protocol constants, and checked integer math shared by
//! every crate in the workspace. All amounts are denominated in grains,
//! the smallest indivisible unit of GAL; all math is integer-only.

pub mod math;
pub mod units;

pub use math::mul_div_u128;
pub use units::*;
