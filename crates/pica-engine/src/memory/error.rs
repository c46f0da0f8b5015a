use std::fmt;

/// A failed linear heap allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// No free range is large enough.
    OutOfMemory {
        requested: usize,
        largest_free: u32,
    },
    /// The request does not fit the 32-bit physical address space.
    TooLarge { requested: usize },
    /// The heap the buffer belonged to has been dropped.
    HeapGone,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::OutOfMemory { requested, largest_free } => write!(
                f,
                "linear heap exhausted: requested {requested} bytes, largest free block is {largest_free} bytes"
            ),
            AllocError::TooLarge { requested } => {
                write!(f, "allocation of {requested} bytes exceeds the physical address space")
            }
            AllocError::HeapGone => f.write_str("linear heap no longer exists"),
        }
    }
}

impl std::error::Error for AllocError {}
