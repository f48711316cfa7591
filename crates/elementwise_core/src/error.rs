use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the registry itself. Numeric operations never fail; they return
/// IEEE-754 infinities or NaN instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown elementwise operation '{0}'")]
    UnknownOperation(String),
}
