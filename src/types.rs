use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decoder::{DecodedInstruction, to_decimal_units};
use crate::error::{DecodeError, Error};
use crate::protocols::InstructionKind;

/// A transaction as returned by the chain data source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    /// Transaction signature (base58).
    pub signature: String,
    /// Static account list of the message, in order.
    pub account_keys: Vec<String>,
    /// Top-level instructions, in execution order.
    pub instructions: Vec<RawInstruction>,
}

/// A compiled instruction: every account is an index into the transaction's account table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInstruction {
    /// Index of the invoked program in the account table.
    pub program_id_index: u8,
    /// Account table indices, in the program's declared order.
    pub accounts: Vec<u8>,
    /// Instruction payload as carried on the wire (base58).
    pub data: String,
}

impl RawInstruction {
    pub fn data_bytes(&self) -> Result<Vec<u8>, Error> {
        bs58::decode(&self.data).into_vec().map_err(|e| Error::Wire {
            reason: format!("instruction data is not base58: {e}"),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcMessage {
    account_keys: Vec<String>,
    instructions: Vec<RawInstruction>,
}

impl RawTransaction {
    /// Build from the `result` of a JSON-RPC `getTransaction` call (`json` encoding).
    /// A `null` result means the node does not know the signature.
    pub fn from_rpc_result(result: &serde_json::Value) -> Result<Option<Self>, Error> {
        if result.is_null() {
            return Ok(None);
        }
        let transaction = result.get("transaction").ok_or_else(|| Error::Wire {
            reason: "getTransaction result has no transaction".into(),
        })?;
        let signature = transaction
            .get("signatures")
            .and_then(|s| s.get(0))
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::Wire {
                reason: "transaction has no signature".into(),
            })?
            .to_string();
        let message = transaction.get("message").ok_or_else(|| Error::Wire {
            reason: "transaction has no message".into(),
        })?;
        let RpcMessage {
            account_keys,
            instructions,
        } = serde_json::from_value(message.clone())?;

        Ok(Some(Self {
            signature,
            account_keys,
            instructions,
        }))
    }
}

/// Accounts of a newly created pool, by role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolAccountSet {
    pub program_id: String,
    pub amm_id: String,
    pub amm_authority: String,
    pub amm_open_orders: String,
    pub coin_vault: String,
    pub pc_vault: String,
    pub lp_mint: String,
    pub coin_mint: String,
    pub pc_mint: String,
    pub amm_target_orders: String,
    pub serum_market: String,
    pub serum_program: String,
    /// Last entry of the transaction's account table.
    pub deployer: String,
}

/// Point-in-time balance of a pool account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiquiditySnapshot {
    pub address: String,
    /// Balance in base units as reported by the chain.
    pub raw: u64,
    /// `raw` scaled by `decimals`. Serialized as a string.
    pub amount: Decimal,
    pub decimals: u8,
}

impl LiquiditySnapshot {
    pub fn new(address: &str, raw: u64, decimals: u8) -> Result<Self, DecodeError> {
        Ok(Self {
            address: address.to_string(),
            raw,
            amount: to_decimal_units(u128::from(raw), decimals)?,
            decimals,
        })
    }
}

/// A detected pool creation, ready for the event sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiquidityEvent {
    pub signature: String,
    /// Position of the originating instruction within the transaction.
    pub instruction_index: usize,
    pub kind: InstructionKind,
    pub observed_at: DateTime<Utc>,
    pub instruction: DecodedInstruction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<LiquiditySnapshot>,
    pub accounts: PoolAccountSet,
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    #[test]
    fn data_bytes_decodes_base58() {
        let ix = RawInstruction {
            program_id_index: 0,
            accounts: vec![],
            data: bs58::encode([2_u8, 254, 0]).into_string(),
        };
        assert_eq!(ix.data_bytes().unwrap(), vec![2, 254, 0]);

        let bad = RawInstruction {
            data: "0OIl".to_string(),
            ..ix
        };
        assert!(matches!(bad.data_bytes(), Err(Error::Wire { .. })));
    }

    #[test]
    fn from_rpc_result_reads_message() {
        let result = serde_json::json!({
            "slot": 250_000_000,
            "transaction": {
                "signatures": ["sig1"],
                "message": {
                    "accountKeys": ["A0", "A1", "P"],
                    "instructions": [
                        { "programIdIndex": 2, "accounts": [0, 1], "data": "3DTZbgwsozUF" }
                    ]
                }
            }
        });
        let tx = RawTransaction::from_rpc_result(&result).unwrap().unwrap();
        assert_eq!(tx.signature, "sig1");
        assert_eq!(tx.account_keys, vec!["A0", "A1", "P"]);
        assert_eq!(tx.instructions.len(), 1);
        assert_eq!(tx.instructions[0].program_id_index, 2);
        assert_eq!(tx.instructions[0].accounts, vec![0, 1]);
    }

    #[test]
    fn from_rpc_result_null_is_not_found() {
        assert!(
            RawTransaction::from_rpc_result(&serde_json::Value::Null)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn from_rpc_result_without_message_errors() {
        let result = serde_json::json!({ "transaction": { "signatures": ["s"] } });
        assert!(matches!(
            RawTransaction::from_rpc_result(&result),
            Err(Error::Wire { .. })
        ));
    }

    #[test]
    fn snapshot_scales_raw_balance() {
        let snapshot = LiquiditySnapshot::new("vault", 2_500_000_000, 9).unwrap();
        assert_eq!(snapshot.raw, 2_500_000_000);
        assert_eq!(snapshot.amount, Decimal::new(25, 1));
    }

    #[test]
    fn snapshot_is_exact_for_large_vaults() {
        let snapshot = LiquiditySnapshot::new("vault", 1_000_000_000_000_000_001, 9).unwrap();
        assert_eq!(snapshot.amount.to_string(), "1000000000.000000001");

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["amount"], "1000000000.000000001");
        assert_eq!(json["raw"], 1_000_000_000_000_000_001_u64);
    }
}
