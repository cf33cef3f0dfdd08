//! Error type and the small checks that raise it.

/// Failure conditions reported by [`EventDictionary`](crate::EventDictionary).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DictError {
    /// A required argument was absent or unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The operation needs an existing key and the key is absent.
    #[error("key not found")]
    NotFound,
    /// `add` was called with a key that is already present.
    #[error("key already exists")]
    AlreadyExists,
    /// A numeric argument fell outside `[min, max]`.
    #[error("{what} out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
}

pub type Result<T, E = DictError> = core::result::Result<T, E>;

/// Unwrap an optional argument, reporting `InvalidArgument` when absent.
pub fn require<T>(item: Option<T>, what: &'static str) -> Result<T> {
    item.ok_or(DictError::InvalidArgument(what))
}

/// Check `min <= value <= max`.
pub fn check_range(value: usize, min: usize, max: usize, what: &'static str) -> Result<()> {
    if value < min || value > max {
        return Err(DictError::OutOfRange {
            what,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_passes_present_values_through() {
        assert_eq!(require(Some(3), "value"), Ok(3));
    }

    #[test]
    fn require_reports_absent_argument() {
        assert_eq!(
            require::<i32>(None, "key"),
            Err(DictError::InvalidArgument("key"))
        );
    }

    /// Both bounds are inclusive.
    #[test]
    fn check_range_bounds_are_inclusive() {
        assert!(check_range(0, 0, 4, "offset").is_ok());
        assert!(check_range(4, 0, 4, "offset").is_ok());
        match check_range(5, 0, 4, "offset") {
            Err(DictError::OutOfRange {
                what,
                value,
                min,
                max,
            }) => {
                assert_eq!((what, value, min, max), ("offset", 5, 0, 4));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(check_range(1, 2, 4, "offset").is_err());
    }

    #[test]
    fn messages_name_the_condition() {
        assert_eq!(DictError::NotFound.to_string(), "key not found");
        assert_eq!(DictError::AlreadyExists.to_string(), "key already exists");
        let e = DictError::OutOfRange {
            what: "offset",
            value: 9,
            min: 0,
            max: 3,
        };
        assert_eq!(e.to_string(), "offset out of range: 9 not in [0, 3]");
    }
}
