use alloc::string::String;

use crate::Method;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    #[error("method `{0}` does not exist on infinitable")]
    UnknownMethod(String),

    #[error("arguments do not match method `{method}`")]
    BadArguments { method: Method },

    #[error("table is not initialized")]
    NotInitialized,

    #[error(transparent)]
    Table(#[from] infinitable::Error),
}
