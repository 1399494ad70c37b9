use thiserror::Error;

/// Classified failures surfaced by the rate client.
///
/// Every core operation returns one of these instead of letting a
/// transport or serde fault escape the component boundary.
#[derive(Error, Debug)]
pub enum RateError {
    /// DNS failure, connection refused, timeout or a non-2xx status.
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body does not match the expected schema,
    /// including rate values that are not finite and positive.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A well-formed conversion response that is missing the requested
    /// target currency.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Caller-side rejection before any request is issued.
    #[error("Invalid input: {0}")]
    Validation(String),
}
