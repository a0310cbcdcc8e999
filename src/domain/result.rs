//! Result type alias for the reporting service
//!
//! This module provides a convenient Result type alias that uses ReportingError
//! as the error type.

use super::errors::ReportingError;

/// Result type alias for reporting operations
///
/// # Examples
///
/// ```
/// use claims_reporting::domain::result::Result;
/// use claims_reporting::domain::errors::ReportingError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ReportingError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ReportingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ReportingError;

    #[test]
    fn test_result_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(ReportingError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
