use crate::protocols::AccountRole;

/// Failure to decode a fixed-layout instruction payload.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("payload is {actual} bytes, schema {schema} expects {expected}")]
    LengthMismatch {
        schema: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("field {field} needs {needed} bytes at offset {offset}, {remaining} remaining")]
    Truncated {
        field: &'static str,
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("{width}-byte value does not fit in u128")]
    Overflow { width: usize },
}

/// Failure to map instruction account positions onto pool roles.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("instruction references {actual} accounts, pool layout needs {required}")]
    InsufficientAccounts { required: usize, actual: usize },

    #[error("account index {index} for role {role} is outside the account table (len {table_len})")]
    IndexOutOfRange {
        role: AccountRole,
        index: usize,
        table_len: usize,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("balance lookup unavailable for {address}: {reason}")]
    LookupUnavailable { address: String, reason: String },

    #[error("transaction not found: {signature}")]
    TransactionNotFound { signature: String },

    #[error("config error: {reason}")]
    Config { reason: String },

    #[error("wire error: {reason}")]
    Wire { reason: String },

    #[error("sink error: {reason}")]
    Sink { reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
