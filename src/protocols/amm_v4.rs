//! Instruction interface of the AMM v4 program: discriminants, payload layouts
//! and the account positions of the pool-creation instruction.
//!
//! These tables track the upstream program. A program upgrade that moves a
//! discriminant or an account bumps the matching version constant and edits
//! the table, nothing else.

use crate::decoder::{FieldSpec, InstructionSchema};
use crate::error::ResolveError;
use crate::protocols::{AccountRole, SchemaId};
use crate::types::PoolAccountSet;

pub const DISCRIMINANT_TABLE_VERSION: u32 = 1;
pub const ROLE_TABLE_VERSION: u32 = 1;

/// Offset of the discriminant byte within an instruction payload.
pub const DISCRIMINANT_OFFSET: usize = 0;

pub const DISCRIMINANTS: &[(u8, SchemaId)] = &[
    (1, SchemaId::CreatePool),
    (2, SchemaId::InitializePool),
    (3, SchemaId::AddLiquidity),
    (4, SchemaId::RemoveLiquidity),
];

pub const CREATE_POOL_SCHEMA: InstructionSchema = InstructionSchema {
    id: SchemaId::CreatePool,
    name: "initialize",
    fields: &[
        FieldSpec::u8("discriminant"),
        FieldSpec::u8("nonce"),
        FieldSpec::u64("open_time"),
    ],
};

pub const INITIALIZE_POOL_SCHEMA: InstructionSchema = InstructionSchema {
    id: SchemaId::InitializePool,
    name: "initialize2",
    fields: &[
        FieldSpec::u8("discriminant"),
        FieldSpec::u8("nonce"),
        FieldSpec::u64("open_time"),
        FieldSpec::u64("init_pc_amount"),
        FieldSpec::u64("init_coin_amount"),
    ],
};

pub const ADD_LIQUIDITY_SCHEMA: InstructionSchema = InstructionSchema {
    id: SchemaId::AddLiquidity,
    name: "deposit",
    fields: &[
        FieldSpec::u8("discriminant"),
        FieldSpec::u64("max_coin_amount"),
        FieldSpec::u64("max_pc_amount"),
        FieldSpec::u8("fixed_side"),
    ],
};

pub const REMOVE_LIQUIDITY_SCHEMA: InstructionSchema = InstructionSchema {
    id: SchemaId::RemoveLiquidity,
    name: "withdraw",
    fields: &[FieldSpec::u8("discriminant"), FieldSpec::u64("amount")],
};

/// Read the discriminant byte and map it to a schema. Only the discriminant is inspected.
pub fn classify(data: &[u8]) -> Option<SchemaId> {
    let discriminant = *data.get(DISCRIMINANT_OFFSET)?;
    DISCRIMINANTS
        .iter()
        .find(|(d, _)| *d == discriminant)
        .map(|(_, id)| *id)
}

pub fn schema_for(id: SchemaId) -> &'static InstructionSchema {
    match id {
        SchemaId::CreatePool => &CREATE_POOL_SCHEMA,
        SchemaId::InitializePool => &INITIALIZE_POOL_SCHEMA,
        SchemaId::AddLiquidity => &ADD_LIQUIDITY_SCHEMA,
        SchemaId::RemoveLiquidity => &REMOVE_LIQUIDITY_SCHEMA,
    }
}

/// Positions within the pool-creation instruction's account list.
///
/// Position 9 holds the pool withdraw queue and is not surfaced.
pub mod pool_roles {
    pub const AMM_ID: usize = 0;
    pub const AMM_AUTHORITY: usize = 1;
    pub const AMM_OPEN_ORDERS: usize = 2;
    pub const COIN_VAULT: usize = 3;
    pub const PC_VAULT: usize = 4;
    pub const LP_MINT: usize = 5;
    pub const COIN_MINT: usize = 6;
    pub const PC_MINT: usize = 7;
    pub const AMM_TARGET_ORDERS: usize = 8;
    pub const SERUM_PROGRAM: usize = 10;
    pub const SERUM_MARKET: usize = 11;

    pub const REQUIRED_ACCOUNTS: usize = SERUM_MARKET + 1;
}

/// Map a pool-creation instruction's account indices onto pool roles.
///
/// `deployer` is the last entry of the transaction's account table, not of
/// the instruction's own account list.
pub fn resolve(
    account_table: &[String],
    program_index: u8,
    indices: &[u8],
) -> Result<PoolAccountSet, ResolveError> {
    if indices.len() < pool_roles::REQUIRED_ACCOUNTS {
        return Err(ResolveError::InsufficientAccounts {
            required: pool_roles::REQUIRED_ACCOUNTS,
            actual: indices.len(),
        });
    }

    let table_len = account_table.len();
    let lookup = |role: AccountRole, index: usize| {
        account_table
            .get(index)
            .cloned()
            .ok_or(ResolveError::IndexOutOfRange {
                role,
                index,
                table_len,
            })
    };
    let slot = |role: AccountRole, position: usize| {
        let index = indices.get(position).map_or(usize::MAX, |i| usize::from(*i));
        lookup(role, index)
    };

    let program_id = lookup(AccountRole::ProgramId, usize::from(program_index))?;
    let amm_id = slot(AccountRole::AmmId, pool_roles::AMM_ID)?;
    let amm_authority = slot(AccountRole::AmmAuthority, pool_roles::AMM_AUTHORITY)?;
    let amm_open_orders = slot(AccountRole::AmmOpenOrders, pool_roles::AMM_OPEN_ORDERS)?;
    let coin_vault = slot(AccountRole::CoinVault, pool_roles::COIN_VAULT)?;
    let pc_vault = slot(AccountRole::PcVault, pool_roles::PC_VAULT)?;
    let lp_mint = slot(AccountRole::LpMint, pool_roles::LP_MINT)?;
    let coin_mint = slot(AccountRole::CoinMint, pool_roles::COIN_MINT)?;
    let pc_mint = slot(AccountRole::PcMint, pool_roles::PC_MINT)?;
    let amm_target_orders = slot(AccountRole::AmmTargetOrders, pool_roles::AMM_TARGET_ORDERS)?;
    let serum_program = slot(AccountRole::SerumProgram, pool_roles::SERUM_PROGRAM)?;
    let serum_market = slot(AccountRole::SerumMarket, pool_roles::SERUM_MARKET)?;
    let deployer = lookup(AccountRole::Deployer, table_len.saturating_sub(1))?;

    Ok(PoolAccountSet {
        program_id,
        amm_id,
        amm_authority,
        amm_open_orders,
        coin_vault,
        pc_vault,
        lp_mint,
        coin_mint,
        pc_mint,
        amm_target_orders,
        serum_market,
        serum_program,
        deployer,
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    fn table(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("A{i}")).collect()
    }

    fn lcg_next(state: &mut u64) -> u64 {
        *state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1);
        *state
    }

    #[test]
    fn classify_all_discriminants() {
        assert_eq!(classify(&[1]), Some(SchemaId::CreatePool));
        assert_eq!(classify(&[2]), Some(SchemaId::InitializePool));
        assert_eq!(classify(&[3]), Some(SchemaId::AddLiquidity));
        assert_eq!(classify(&[4]), Some(SchemaId::RemoveLiquidity));
        assert_eq!(classify(&[0]), None);
        assert_eq!(classify(&[9]), None);
        assert_eq!(classify(&[]), None);
    }

    #[test]
    fn classification_ignores_trailing_bytes() {
        let mut seed = 0x000C_1A55_u64;
        for discriminant in 0..=u8::MAX {
            let expected = classify(&[discriminant]);
            for _ in 0..64 {
                let len = (lcg_next(&mut seed) % 40) as usize;
                let mut data = vec![discriminant];
                data.extend((0..len).map(|_| lcg_next(&mut seed) as u8));
                assert_eq!(classify(&data), expected, "discriminant {discriminant}");
            }
        }
    }

    #[test]
    fn classify_ignores_readable_names_in_payload() {
        let data = b"\x07initialize2 CreatePool";
        assert_eq!(classify(data), None);
    }

    #[test]
    fn discriminant_table_matches_schemas() {
        for (discriminant, id) in DISCRIMINANTS {
            let schema = schema_for(*id);
            assert_eq!(schema.id, *id);
            assert_eq!(schema.fields.first().map(|f| f.name), Some("discriminant"));
            assert_eq!(classify(&[*discriminant]), Some(*id));
        }
    }

    #[test]
    fn resolve_maps_positions_and_deployer() {
        let accounts = table(13);
        let indices: Vec<u8> = (0..12).collect();
        let set = resolve(&accounts, 12, &indices).unwrap();

        assert_eq!(set.program_id, "A12");
        assert_eq!(set.amm_id, "A0");
        assert_eq!(set.amm_authority, "A1");
        assert_eq!(set.amm_open_orders, "A2");
        assert_eq!(set.coin_vault, "A3");
        assert_eq!(set.pc_vault, "A4");
        assert_eq!(set.lp_mint, "A5");
        assert_eq!(set.coin_mint, "A6");
        assert_eq!(set.pc_mint, "A7");
        assert_eq!(set.amm_target_orders, "A8");
        assert_eq!(set.serum_program, "A10");
        assert_eq!(set.serum_market, "A11");
        assert_eq!(set.deployer, "A12");
    }

    #[test]
    fn resolve_follows_indirection() {
        let accounts = table(20);
        let indices: Vec<u8> = (0..12).rev().map(|i| i + 5).collect();
        let set = resolve(&accounts, 19, &indices).unwrap();
        assert_eq!(set.amm_id, "A16");
        assert_eq!(set.serum_market, "A5");
        assert_eq!(set.deployer, "A19");
    }

    #[test]
    fn resolve_rejects_short_account_lists() {
        let accounts = table(13);
        for len in 0..12_u8 {
            let indices: Vec<u8> = (0..len).collect();
            assert_eq!(
                resolve(&accounts, 12, &indices),
                Err(ResolveError::InsufficientAccounts {
                    required: 12,
                    actual: usize::from(len),
                })
            );
        }
    }

    #[test]
    fn resolve_names_out_of_range_role() {
        let accounts = table(13);
        let mut indices: Vec<u8> = (0..12).collect();
        indices[5] = 40;

        let err = resolve(&accounts, 12, &indices).unwrap_err();
        assert_eq!(
            err,
            ResolveError::IndexOutOfRange {
                role: AccountRole::LpMint,
                index: 40,
                table_len: 13,
            }
        );
        assert!(err.to_string().contains("lpMint"));
    }

    #[test]
    fn resolve_rejects_bad_program_index() {
        let accounts = table(13);
        let indices: Vec<u8> = (0..12).collect();
        assert!(matches!(
            resolve(&accounts, 50, &indices),
            Err(ResolveError::IndexOutOfRange {
                role: AccountRole::ProgramId,
                ..
            })
        ));
    }

    #[test]
    fn extra_indices_are_ignored() {
        let accounts = table(16);
        let indices: Vec<u8> = (0..15).collect();
        let set = resolve(&accounts, 15, &indices).unwrap();
        assert_eq!(set.serum_market, "A11");
        assert_eq!(set.deployer, "A15");
    }
}
