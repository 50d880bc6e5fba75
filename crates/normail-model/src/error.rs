use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("expected exactly one '@' separator, found {count}")]
    SeparatorCount { count: usize },
}
