//! Exit code constants for the scaffold CLI.
//!
//! - 0: Success
//! - 1: One or more output files failed to write (or a post hook failed)
//! - 2: Configuration, answer, or template validation failed before any write

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Write failure: at least one output file could not be written, or a
/// post-generation hook failed. Every failed path is reported.
pub const WRITE_FAILURE: i32 = 1;

/// Validation failure: broken configuration, missing or invalid answers,
/// undefined expression names, or template errors. Nothing was written.
pub const VALIDATION_FAILURE: i32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, WRITE_FAILURE, VALIDATION_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn exit_codes_have_expected_values() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(WRITE_FAILURE, 1);
        assert_eq!(VALIDATION_FAILURE, 2);
    }
}
