//! Error types for cellforge

use thiserror::Error;

/// Main error type for cellforge operations.
///
/// Every variant describes a malformed problem instance or request. These are
/// raised before any search begins; an infeasible instance is never an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CellforgeError {
    /// Grid dimensions must both be positive
    #[error("Invalid grid: {width}x{height}")]
    InvalidGrid { width: u32, height: u32 },

    /// A demand point lies outside the grid
    #[error("House at ({x}, {y}) is outside grid bounds {width}x{height}")]
    DemandOutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// No antenna type is left after applying the allowed-types filter
    #[error("Antenna catalog is empty after filtering")]
    EmptyCatalog,

    /// An allowed-types entry names a type the catalog does not contain
    #[error("Unknown antenna type: {0}")]
    UnknownAntennaType(String),

    /// Strategy name could not be resolved
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    /// Progress streaming was requested for a strategy that does not emit it
    #[error("Streaming is only supported for simulated-annealing, got {0}")]
    StreamingUnsupported(String),

    /// A tuning parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for cellforge operations
pub type Result<T> = std::result::Result<T, CellforgeError>;
