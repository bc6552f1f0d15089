use serde::Serialize;

use super::InstructionSchema;
use crate::error::DecodeError;
use crate::protocols::{InstructionKind, SchemaId};

/// `Initialize` (v1): creates the pool accounts without seeding liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreatePool {
    pub discriminant: u8,
    pub nonce: u8,
    pub open_time: u64,
}

/// `Initialize2`: creates the pool and seeds both vaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InitializePool {
    pub discriminant: u8,
    pub nonce: u8,
    pub open_time: u64,
    pub init_pc_amount: u64,
    pub init_coin_amount: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddLiquidity {
    pub discriminant: u8,
    pub max_coin_amount: u64,
    pub max_pc_amount: u64,
    /// 0 = coin side fixed, 1 = pc side fixed.
    pub fixed_side: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemoveLiquidity {
    pub discriminant: u8,
    pub amount: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecodedInstruction {
    AddLiquidity(AddLiquidity),
    RemoveLiquidity(RemoveLiquidity),
    CreatePool(CreatePool),
    InitializePool(InitializePool),
    Unknown { discriminant: u8 },
}

impl DecodedInstruction {
    /// Build the typed record from field values read in schema order.
    pub(crate) fn from_fields(
        schema: &InstructionSchema,
        values: &[u64],
    ) -> Result<Self, DecodeError> {
        let decoded = match (schema.id, values) {
            (SchemaId::CreatePool, &[discriminant, nonce, open_time]) => {
                Self::CreatePool(CreatePool {
                    discriminant: discriminant as u8,
                    nonce: nonce as u8,
                    open_time,
                })
            }
            (
                SchemaId::InitializePool,
                &[
                    discriminant,
                    nonce,
                    open_time,
                    init_pc_amount,
                    init_coin_amount,
                ],
            ) => Self::InitializePool(InitializePool {
                discriminant: discriminant as u8,
                nonce: nonce as u8,
                open_time,
                init_pc_amount,
                init_coin_amount,
            }),
            (
                SchemaId::AddLiquidity,
                &[discriminant, max_coin_amount, max_pc_amount, fixed_side],
            ) => Self::AddLiquidity(AddLiquidity {
                discriminant: discriminant as u8,
                max_coin_amount,
                max_pc_amount,
                fixed_side: fixed_side as u8,
            }),
            (SchemaId::RemoveLiquidity, &[discriminant, amount]) => {
                Self::RemoveLiquidity(RemoveLiquidity {
                    discriminant: discriminant as u8,
                    amount,
                })
            }
            _ => {
                return Err(DecodeError::LengthMismatch {
                    schema: schema.name,
                    expected: schema.fields.len(),
                    actual: values.len(),
                });
            }
        };
        Ok(decoded)
    }

    pub fn kind(&self) -> InstructionKind {
        match self {
            Self::AddLiquidity(_) => InstructionKind::AddLiquidity,
            Self::RemoveLiquidity(_) => InstructionKind::RemoveLiquidity,
            Self::CreatePool(_) => InstructionKind::CreatePool,
            Self::InitializePool(_) => InstructionKind::InitializePool,
            Self::Unknown { .. } => InstructionKind::Unknown,
        }
    }

    /// True for the variants that open a new pool.
    pub fn is_pool_creation(&self) -> bool {
        match self {
            Self::CreatePool(_) | Self::InitializePool(_) => true,
            Self::AddLiquidity(_) | Self::RemoveLiquidity(_) | Self::Unknown { .. } => false,
        }
    }

    pub fn discriminant(&self) -> u8 {
        match self {
            Self::AddLiquidity(ix) => ix.discriminant,
            Self::RemoveLiquidity(ix) => ix.discriminant,
            Self::CreatePool(ix) => ix.discriminant,
            Self::InitializePool(ix) => ix.discriminant,
            Self::Unknown { discriminant } => *discriminant,
        }
    }
}
