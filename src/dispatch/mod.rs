//! Dispatch engine: splits forecast renewable generation between the local
//! load and the grid.
//!
//! The engine is a pure function of three numbers. It does no I/O and keeps
//! no state, so it can be called from any number of request handlers at once.

mod engine;
mod types;

pub use engine::allocate;
pub use types::{Allocation, DispatchError, Forecast, InvariantViolation, round2};
