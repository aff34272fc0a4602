//! SLE Core - Fundamental types
//!
//! This crate provides the vocabulary shared by the solver and its clients:
//! - `SleError`: Structured errors returned by every solve stage
//! - `Incompatibility`: Why a system has no unique solution
//! - `PivotStrategy`, `SolveMethod`, `RoundingPolicy`: Solve options
//! - Size bounds and the floating-point noise tolerance

mod error;
mod options;

pub use error::{SleError, ErrorContext, Incompatibility, Severity, codes};
pub use options::{
    PivotStrategy, SolveMethod, RoundingPolicy,
    validate_size, clamp_size, MIN_SIZE, MAX_SIZE, NOISE_TOLERANCE,
};
