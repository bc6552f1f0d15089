#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod config;
pub mod decoder;
pub mod error;
pub mod protocols;
pub mod scanner;
pub mod types;

pub use config::ScannerConfig;
pub use decoder::{
    DecodedInstruction, FieldSpec, FieldWidth, InstructionSchema, decode, decode_instruction,
    le_bytes_to_u128, to_decimal_units,
};
pub use error::{DecodeError, Error, ResolveError};
pub use protocols::amm_v4::{classify, resolve};
pub use protocols::{AccountRole, InstructionKind, SchemaId};
pub use scanner::adapters::{BalanceLookup, EventSink, MemorySink, TransactionSource};
pub use scanner::pipeline::{Pipeline, ScanReport};
pub use scanner::{InstructionDiagnostic, Scan, Scanner};
pub use types::{LiquidityEvent, LiquiditySnapshot, PoolAccountSet, RawInstruction, RawTransaction};
