//! Error types for doselog
//!
//! Uses `thiserror` for library errors. Validation, capacity, and not-found
//! errors are all rejected before any ledger mutation takes place.

use thiserror::Error;

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Compound identifier is not in the fixed catalog
    #[error("unknown compound '{name}'")]
    UnknownCompound { name: String },

    /// Vial created with a non-positive capacity
    #[error("invalid vial capacity {capacity} - must be positive")]
    InvalidCapacity { capacity: f64 },

    /// Weight recorded with a non-positive value
    #[error("invalid weight {weight} - must be positive")]
    InvalidWeight { weight: f64 },

    /// Dose recorded with a non-positive amount
    #[error("invalid dose {dose} - must be positive")]
    InvalidDose { dose: f64 },

    /// Inventory adjustment with a negative or non-finite amount
    #[error("invalid amount {amount} - must be a positive finite number")]
    InvalidAmount { amount: f64 },

    /// Injection admitted without a vial selection
    #[error("no vial selected - a dose must be drawn from a vial")]
    NoVialSelected,

    /// Requested dose exceeds the vial's remaining content
    #[error("insufficient capacity: requested {requested}, vial has {remaining} remaining")]
    InsufficientCapacity { requested: f64, remaining: f64 },

    /// No vial with the given identifier
    #[error("vial {id} not found")]
    VialNotFound { id: u64 },

    /// No record with the given identifier
    #[error("record {id} not found")]
    RecordNotFound { id: u64 },

    /// Administrative correction outside the vial's valid range
    #[error("remaining {value} out of range - must be between 0 and {total}")]
    OutOfRange { value: f64, total: f64 },

    /// Progress toward a target equal to the start weight is undefined
    #[error("target equals start weight {start} - progress is undefined")]
    DegenerateTarget { start: f64 },

    /// Statistic requested over an empty weight ledger
    #[error("no weight records")]
    NoData,

    /// IO error from the persistence boundary
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed saved state
    #[error("state parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
