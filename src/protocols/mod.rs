pub mod amm_v4;

use serde::Serialize;

pub const RAYDIUM_AMM_V4_PROGRAM_ID: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";
pub const SERUM_MARKET_PROGRAM_ID: &str = "srmqPvymJeFKQ4zGQed1GFppgkRHL9kaELCbyksJtPX";

/// Instruction variants with a known payload layout.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum SchemaId {
    CreatePool,
    InitializePool,
    AddLiquidity,
    RemoveLiquidity,
}

/// Type tag carried on every decoded instruction and emitted event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InstructionKind {
    AddLiquidity,
    RemoveLiquidity,
    CreatePool,
    InitializePool,
    Unknown,
}

impl From<SchemaId> for InstructionKind {
    fn from(id: SchemaId) -> Self {
        match id {
            SchemaId::CreatePool => Self::CreatePool,
            SchemaId::InitializePool => Self::InitializePool,
            SchemaId::AddLiquidity => Self::AddLiquidity,
            SchemaId::RemoveLiquidity => Self::RemoveLiquidity,
        }
    }
}

/// Semantic slot of a pool-creation account.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum AccountRole {
    ProgramId,
    AmmId,
    AmmAuthority,
    AmmOpenOrders,
    CoinVault,
    PcVault,
    LpMint,
    CoinMint,
    PcMint,
    AmmTargetOrders,
    SerumMarket,
    SerumProgram,
    Deployer,
}

/// Decode a base58 address and check it is 32 bytes long.
pub fn validate_address(address: &str) -> Result<[u8; 32], String> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| format!("{address} is not base58: {e}"))?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| format!("{address} decodes to {} bytes, expected 32", bytes.len()))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    #[test]
    fn role_names_use_camel_case() {
        assert_eq!(AccountRole::LpMint.to_string(), "lpMint");
        assert_eq!(AccountRole::AmmTargetOrders.to_string(), "ammTargetOrders");
        assert_eq!(AccountRole::Deployer.as_ref(), "deployer");
    }

    #[test]
    fn instruction_kind_roundtrip() {
        assert_eq!(
            "initialize_pool".parse::<InstructionKind>().ok(),
            Some(InstructionKind::InitializePool)
        );
        assert_eq!(InstructionKind::AddLiquidity.to_string(), "add_liquidity");
        assert_eq!(
            InstructionKind::from(SchemaId::RemoveLiquidity),
            InstructionKind::RemoveLiquidity
        );
        assert_eq!("swap".parse::<InstructionKind>().ok(), None);
    }

    #[test]
    fn known_program_ids_validate() {
        assert!(validate_address(RAYDIUM_AMM_V4_PROGRAM_ID).is_ok());
        assert!(validate_address(SERUM_MARKET_PROGRAM_ID).is_ok());
        assert!(validate_address("not-base58!").is_err());
        let short = bs58::encode([7_u8; 8]).into_string();
        assert!(validate_address(&short).unwrap_err().contains("8 bytes"));
    }
}
