//! Order-book depth math: fills against a ladder and slippage windows.

pub mod bounds;
pub mod calc;

pub use bounds::{BIPS_BASE, Bounds, compute_bounds};
pub use calc::{FillPlan, LevelCapacity, LevelFill, compute_opposing_amount, fill_levels};
