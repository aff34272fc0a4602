//! Solve options shared by the solver and its clients

use serde::{Deserialize, Serialize};
use crate::SleError;

/// Smallest accepted system size
pub const MIN_SIZE: usize = 2;

/// Largest accepted system size
pub const MAX_SIZE: usize = 8;

/// Magnitudes below this are floating-point noise and snap to zero
pub const NOISE_TOLERANCE: f64 = 1e-12;

/// Pivoting strategy used during elimination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotStrategy {
    /// Use the diagonal as found
    #[default]
    None,
    /// Row swaps only
    Partial,
    /// Row and column swaps
    Complete,
}

impl PivotStrategy {
    pub const ALL: [PivotStrategy; 3] = [PivotStrategy::None, PivotStrategy::Partial, PivotStrategy::Complete];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "gauss" | "no" | "0" => Some(PivotStrategy::None),
            "partial" | "1" => Some(PivotStrategy::Partial),
            "complete" | "full" | "total" | "2" => Some(PivotStrategy::Complete),
            _ => None,
        }
    }

    /// Numeric tag (0 = none, 1 = partial, 2 = complete)
    pub fn tag(self) -> u8 {
        match self {
            PivotStrategy::None => 0,
            PivotStrategy::Partial => 1,
            PivotStrategy::Complete => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(PivotStrategy::None),
            1 => Some(PivotStrategy::Partial),
            2 => Some(PivotStrategy::Complete),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PivotStrategy::None => "none",
            PivotStrategy::Partial => "partial",
            PivotStrategy::Complete => "complete",
        }
    }
}

impl std::fmt::Display for PivotStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which elimination path(s) a request runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveMethod {
    /// Forward elimination then back substitution
    #[default]
    Gauss,
    /// LU factorization then two triangular solves
    Lu,
    /// Both paths, reported side by side
    Both,
}

impl SolveMethod {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gauss" | "gaussian" | "direct" => Some(SolveMethod::Gauss),
            "lu" => Some(SolveMethod::Lu),
            "both" | "all" => Some(SolveMethod::Both),
            _ => None,
        }
    }

    pub fn runs_gauss(self) -> bool {
        matches!(self, SolveMethod::Gauss | SolveMethod::Both)
    }

    pub fn runs_lu(self) -> bool {
        matches!(self, SolveMethod::Lu | SolveMethod::Both)
    }
}

/// Parameters of the cosmetic decimal-rounding pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingPolicy {
    /// Run of identical decimal digits that triggers rounding
    pub min_run: usize,
    /// Decimal digits seen before rounding unconditionally
    pub max_decimals: usize,
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self { min_run: 3, max_decimals: 4 }
    }
}

/// Reject sizes outside `MIN_SIZE..=MAX_SIZE`
pub fn validate_size(size: usize) -> Result<usize, SleError> {
    if (MIN_SIZE..=MAX_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(SleError::invalid_size(size, MIN_SIZE, MAX_SIZE))
    }
}

/// Clamp a requested size into `MIN_SIZE..=MAX_SIZE`
pub fn clamp_size(size: usize) -> usize {
    size.clamp(MIN_SIZE, MAX_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pivot_from_str() {
        assert_eq!(PivotStrategy::from_str("Partial"), Some(PivotStrategy::Partial));
        assert_eq!(PivotStrategy::from_str(" complete "), Some(PivotStrategy::Complete));
        assert_eq!(PivotStrategy::from_str("2"), Some(PivotStrategy::Complete));
        assert_eq!(PivotStrategy::from_str("diagonal"), None);
    }

    #[test]
    fn test_pivot_tags_round_trip() {
        for strategy in PivotStrategy::ALL {
            assert_eq!(PivotStrategy::from_tag(strategy.tag()), Some(strategy));
        }
        assert_eq!(PivotStrategy::from_tag(3), None);
    }

    #[test]
    fn test_pivot_serde_lowercase() {
        let json = serde_json::to_string(&PivotStrategy::Complete).unwrap();
        assert_eq!(json, "\"complete\"");
    }

    #[test]
    fn test_method_paths() {
        assert!(SolveMethod::Both.runs_gauss() && SolveMethod::Both.runs_lu());
        assert!(!SolveMethod::Lu.runs_gauss());
        assert_eq!(SolveMethod::default(), SolveMethod::Gauss);
        assert_eq!(SolveMethod::from_str("LU"), Some(SolveMethod::Lu));
    }

    #[test]
    fn test_size_bounds() {
        assert!(validate_size(1).is_err());
        assert_eq!(validate_size(2).unwrap(), 2);
        assert_eq!(validate_size(8).unwrap(), 8);
        assert_eq!(validate_size(9).unwrap_err().code, crate::codes::INVALID_SIZE);
        assert_eq!(clamp_size(0), 2);
        assert_eq!(clamp_size(12), 8);
        assert_eq!(clamp_size(5), 5);
    }

    #[test]
    fn test_rounding_defaults() {
        let policy = RoundingPolicy::default();
        assert_eq!((policy.min_run, policy.max_decimals), (3, 4));
    }
}
