#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    #[error("race date is missing")]
    MissingDate,

    #[error("invalid race date '{0}' (expected RFC 3339, 'YYYY-MM-DD HH:MM[:SS]' or 'YYYY-MM-DD')")]
    InvalidDate(String),

    #[error("race date {0} is out of the supported calendar range")]
    OutOfRange(String),
}
