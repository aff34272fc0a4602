//! Structured errors for solver clients
//!
//! Failures are values. The engines detect them locally and hand them back
//! to the caller, which decides whether to alert, log or ignore.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INCOMPATIBLE_SYSTEM: &str = "INCOMPATIBLE_SYSTEM";
    pub const INVALID_SIZE: &str = "INVALID_SIZE";
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Why a system has no unique solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Incompatibility {
    /// A coefficient row and its right-hand side are both zero
    #[error("the system has infinitely many solutions (row {row} is all zero)")]
    InfiniteSolutions { row: usize },

    /// A diagonal entry of the reduced matrix is zero
    #[error("the system has no solutions (zero pivot at row {row})")]
    NoSolution { row: usize },
}

impl Incompatibility {
    /// Row that triggered the verdict
    pub fn row(&self) -> usize {
        match self {
            Incompatibility::InfiniteSolutions { row } | Incompatibility::NoSolution { row } => *row,
        }
    }
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The current solve failed
    Error,
    /// The request cannot be processed at all
    Fatal,
}

/// Context about where an error occurred
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Row of the working matrix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,

    /// Elimination step (pivot column)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<usize>,

    /// Stage that raised the error (elimination, lu, substitution, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// Structured error returned by every public solver operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    /// Typed cause for incompatible systems
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incompatibility: Option<Incompatibility>,

    pub severity: Severity,
}

impl SleError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            context: None,
            incompatibility: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set row context
    pub fn at_row(mut self, row: usize) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.row = Some(row);
        self
    }

    /// Builder: set elimination step context
    pub fn at_step(mut self, step: usize) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.step = Some(step);
        self
    }

    /// Builder: set stage context
    pub fn in_stage(mut self, stage: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.stage = Some(stage.into());
        self
    }

    /// Builder: add note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.notes.push(note.into());
        self
    }

    /// Builder: note every elimination step skipped for a zero pivot
    ///
    /// The first such step becomes the context step.
    pub fn with_degenerate_steps(mut self, steps: &[usize]) -> Self {
        if let Some(&first) = steps.first() {
            self = self.at_step(first);
        }
        for step in steps {
            self = self.with_note(format!("zero pivot at column {}", step));
        }
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_incompatible(&self) -> bool {
        self.incompatibility.is_some()
    }

    // ========== Common Error Constructors ==========

    pub fn incompatible(cause: Incompatibility) -> Self {
        let suggestion = match cause {
            Incompatibility::InfiniteSolutions { .. } => {
                "Rows are linearly dependent; remove or change the redundant equation"
            }
            Incompatibility::NoSolution { .. } => {
                "The equations contradict each other; check the coefficients and right-hand side"
            }
        };
        let mut err = Self::new(codes::INCOMPATIBLE_SYSTEM, format!("Incompatible system: {}", cause))
            .with_suggestion(suggestion)
            .at_row(cause.row());
        err.incompatibility = Some(cause);
        err
    }

    pub fn invalid_size(size: usize, min: usize, max: usize) -> Self {
        Self::new(
            codes::INVALID_SIZE,
            format!("Invalid system size {}: must be between {} and {}", size, min, max),
        )
        .with_suggestion(format!("Use a square matrix with {}..={} rows", min, max))
        .with_severity(Severity::Fatal)
    }

    pub fn dimension_mismatch(what: &str, expected: usize, got: usize) -> Self {
        Self::new(
            codes::DIMENSION_MISMATCH,
            format!("Dimension mismatch: {} expected {}, got {}", what, expected, got),
        )
        .with_severity(Severity::Fatal)
    }

    pub fn invalid_argument(name: &str, details: impl Into<String>) -> Self {
        Self::new(
            codes::INVALID_ARGUMENT,
            format!("Argument '{}': {}", name, details.into()),
        )
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for SleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for SleError {}

impl From<Incompatibility> for SleError {
    fn from(cause: Incompatibility) -> Self {
        Self::incompatible(cause)
    }
}
