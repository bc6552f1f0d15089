pub mod adapters;
pub mod pipeline;

use std::iter::Enumerate;
use std::slice;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::ScannerConfig;
use crate::decoder;
use crate::error::Error;
use crate::protocols::amm_v4;
use crate::types::{LiquidityEvent, RawInstruction, RawTransaction};

/// A per-instruction failure. Never aborts the rest of the scan.
#[derive(Debug)]
pub struct InstructionDiagnostic {
    pub signature: String,
    pub instruction_index: usize,
    /// Program the failing instruction invoked.
    pub program_id: String,
    pub error: Error,
}

/// Watches one AMM program for pool-creation instructions.
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScannerConfig,
}

impl Scanner {
    pub fn new(config: ScannerConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Lazily walk `tx`'s instructions, yielding one item per pool-creation
    /// instruction of the target program and one per instruction that failed.
    /// Events carry no liquidity snapshot.
    pub fn scan<'a>(&'a self, tx: &'a RawTransaction) -> Scan<'a> {
        Scan {
            scanner: self,
            tx,
            instructions: tx.instructions.iter().enumerate(),
        }
    }

    fn inspect(
        &self,
        tx: &RawTransaction,
        index: usize,
        ix: &RawInstruction,
    ) -> Option<Result<LiquidityEvent, InstructionDiagnostic>> {
        let program_id = tx.account_keys.get(usize::from(ix.program_id_index))?;
        if *program_id != self.config.amm_program_id {
            return None;
        }

        let diagnostic = |error: Error| {
            warn!(
                signature = %tx.signature,
                instruction_index = index,
                error = %error,
                "skipping instruction"
            );
            InstructionDiagnostic {
                signature: tx.signature.clone(),
                instruction_index: index,
                program_id: program_id.clone(),
                error,
            }
        };

        let data = match ix.data_bytes() {
            Ok(data) => data,
            Err(e) => return Some(Err(diagnostic(e))),
        };
        let Some(schema_id) = amm_v4::classify(&data) else {
            debug!(
                signature = %tx.signature,
                instruction_index = index,
                discriminant = data.first().copied(),
                "unrecognised discriminant"
            );
            return None;
        };
        let decoded = match decoder::decode(amm_v4::schema_for(schema_id), &data) {
            Ok(decoded) => decoded,
            Err(e) => return Some(Err(diagnostic(e.into()))),
        };

        if !decoded.is_pool_creation() {
            debug!(
                signature = %tx.signature,
                instruction_index = index,
                kind = %decoded.kind(),
                "not a pool creation"
            );
            return None;
        }

        let accounts = match amm_v4::resolve(&tx.account_keys, ix.program_id_index, &ix.accounts)
        {
            Ok(accounts) => accounts,
            Err(e) => return Some(Err(diagnostic(e.into()))),
        };
        if accounts.serum_program != self.config.market_program_id {
            warn!(
                signature = %tx.signature,
                instruction_index = index,
                serum_program = %accounts.serum_program,
                "pool paired with an unexpected market program"
            );
        }

        info!(
            signature = %tx.signature,
            instruction_index = index,
            kind = %decoded.kind(),
            amm_id = %accounts.amm_id,
            "pool creation detected"
        );
        Some(Ok(LiquidityEvent {
            signature: tx.signature.clone(),
            instruction_index: index,
            kind: decoded.kind(),
            observed_at: Utc::now(),
            instruction: decoded,
            liquidity: None,
            accounts,
        }))
    }
}

/// Iterator returned by [`Scanner::scan`].
pub struct Scan<'a> {
    scanner: &'a Scanner,
    tx: &'a RawTransaction,
    instructions: Enumerate<slice::Iter<'a, RawInstruction>>,
}

impl Iterator for Scan<'_> {
    type Item = Result<LiquidityEvent, InstructionDiagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, ix) in self.instructions.by_ref() {
            if let Some(outcome) = self.scanner.inspect(self.tx, index, ix) {
                return Some(outcome);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.instructions.size_hint().1)
    }
}
