use crate::ServiceError;

/// Parse a path segment as a positive integer id.
///
/// `what` names the resource for the error message, e.g. `"branch"`
/// yields `Invalid branch ID`.
pub fn parse_id(raw: &str, what: &str) -> Result<i64, ServiceError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ServiceError::Validation(format!("Invalid {} ID", what))),
    }
}
