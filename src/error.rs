//! The ways a LinkedHashMap can fail to get the memory it wants. Missing keys
//! and out-of-range indices aren't errors, those come back as `None`.

use std::{collections::TryReserveError, error::Error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The requested slot count doesn't fit in a usize once rounded up to a
    /// power of two.
    CapacityOverflow,

    /// The allocator refused to hand over a new slot array.
    AllocationFailed(TryReserveError),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::CapacityOverflow => {
                write!(f, "slot count overflowed usize")
            }
            TableError::AllocationFailed(e) => {
                write!(f, "failed to allocate slot array: {}", e)
            }
        }
    }
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TableError::CapacityOverflow => None,
            TableError::AllocationFailed(e) => Some(e),
        }
    }
}

impl From<TryReserveError> for TableError {
    fn from(e: TryReserveError) -> Self {
        TableError::AllocationFailed(e)
    }
}
