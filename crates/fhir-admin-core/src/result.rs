//! Result type alias for administration operations

use crate::error::AdminError;

/// Standard Result type for administration operations
pub type Result<T> = std::result::Result<T, AdminError>;
