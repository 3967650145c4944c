use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlError {
    /// A partial update was requested with no fields to change.
    #[error("No data to update")]
    EmptyInput,
}
