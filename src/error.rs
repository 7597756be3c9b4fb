//! Errors reported by the map and its arena.

use std::collections::TryReserveError;
use std::error;
use std::fmt;
use std::result;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Storage for a new node could not be reserved.
    AllocationFailed,
    /// The requested key is not stored in the map.
    KeyNotFound,
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Error {
        Error::AllocationFailed
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::AllocationFailed => write!(f, "cannot allocate memory for a new node"),
            Error::KeyNotFound => write!(f, "key does not exist"),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_display() {
        assert_eq!(Error::KeyNotFound.to_string(), "key does not exist");
        assert_eq!(
            Error::AllocationFailed.to_string(),
            "cannot allocate memory for a new node",
        );
    }

    #[test]
    fn test_from_try_reserve_error() {
        let err = Vec::<u64>::new().try_reserve_exact(usize::max_value()).unwrap_err();
        assert_eq!(Error::from(err), Error::AllocationFailed);
    }
}
