use std::error;
use std::fmt;

/// Everything that can go wrong in a container operation whose preconditions
/// are not trivially satisfied. Lookups and inserts never produce these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Positional access outside of the container.
    OutOfRange {
        index: usize,
        len: usize,
    },
    /// A run with `level` levels can't be moved into a container which only
    /// supports up to `max_level`.
    IncompatibleLevel {
        level: usize,
        max_level: usize,
    },
    /// A position from one container was handed to another.
    ForeignPosition,
    /// The element the position referred to has been removed.
    StalePosition,
    /// Positional rearrangement was requested on a key-ordered index of a
    /// composite container.
    OrderedIndex {
        index: usize,
    },
    /// A composite container has no ordering with this id.
    NoSuchIndex {
        index: usize,
        count: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::OutOfRange { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            }
            Error::IncompatibleLevel { level, max_level } => write!(
                f,
                "run of level {} does not fit a container with max level {}",
                level, max_level
            ),
            Error::ForeignPosition => f.write_str("position belongs to another container"),
            Error::StalePosition => f.write_str("position refers to a removed element"),
            Error::OrderedIndex { index } => {
                write!(f, "index {} is key ordered and cannot be rearranged", index)
            }
            Error::NoSuchIndex { index, count } => {
                write!(f, "no index {} (container has {})", index, count)
            }
        }
    }
}

impl error::Error for Error {}

pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::OutOfRange { index, len })
    }
}

/// Ranges are half open and `end` may equal `len`.
pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<()> {
    if end > len {
        Err(Error::OutOfRange { index: end, len })
    } else if start > end {
        Err(Error::OutOfRange { index: start, len: end })
    } else {
        Ok(())
    }
}
