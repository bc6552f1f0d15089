use tracing::{info, warn};

use super::adapters::{BalanceLookup, EventSink, TransactionSource};
use super::{InstructionDiagnostic, Scanner};
use crate::error::Error;
use crate::types::{LiquiditySnapshot, RawTransaction};

/// Outcome of processing one transaction.
#[derive(Debug)]
pub struct ScanReport {
    pub signature: String,
    /// Inserts the sink acknowledged. A deduplicating sink acknowledges
    /// events it already holds, so this can exceed what it stored.
    pub emitted: usize,
    /// Events emitted without a liquidity snapshot.
    pub missing_snapshots: usize,
    /// Events the sink rejected. Not retried.
    pub sink_failures: usize,
    pub diagnostics: Vec<InstructionDiagnostic>,
}

impl ScanReport {
    fn new(signature: &str) -> Self {
        Self {
            signature: signature.to_string(),
            emitted: 0,
            missing_snapshots: 0,
            sink_failures: 0,
            diagnostics: Vec::new(),
        }
    }
}

/// Fetch, scan, snapshot and persist, one transaction at a time.
///
/// Collaborators are injected once and reused for every signature.
pub struct Pipeline<S, B, K> {
    scanner: Scanner,
    source: S,
    balances: B,
    sink: K,
}

impl<S, B, K> Pipeline<S, B, K>
where
    S: TransactionSource,
    B: BalanceLookup,
    K: EventSink,
{
    pub fn new(scanner: Scanner, source: S, balances: B, sink: K) -> Self {
        Self {
            scanner,
            source,
            balances,
            sink,
        }
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn balances(&self) -> &B {
        &self.balances
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Fails only when the transaction cannot be fetched; nothing is emitted in that case.
    pub async fn process_signature(&self, signature: &str) -> Result<ScanReport, Error> {
        let tx = self
            .source
            .transaction_details(signature)
            .await?
            .ok_or_else(|| Error::TransactionNotFound {
                signature: signature.to_string(),
            })?;
        Ok(self.process_transaction(&tx).await)
    }

    pub async fn process_transaction(&self, tx: &RawTransaction) -> ScanReport {
        let mut report = ScanReport::new(&tx.signature);

        for outcome in self.scanner.scan(tx) {
            let mut event = match outcome {
                Ok(event) => event,
                Err(diagnostic) => {
                    report.diagnostics.push(diagnostic);
                    continue;
                }
            };

            event.liquidity = self.snapshot(&event.accounts.coin_vault).await;
            if event.liquidity.is_none() {
                report.missing_snapshots += 1;
            }

            let amm_id = event.accounts.amm_id.clone();
            match self.sink.insert(event).await {
                Ok(()) => report.emitted += 1,
                Err(e) => {
                    warn!(signature = %tx.signature, %amm_id, error = %e, "event sink insert failed");
                    report.sink_failures += 1;
                }
            }
        }

        info!(
            signature = %tx.signature,
            emitted = report.emitted,
            diagnostics = report.diagnostics.len(),
            "transaction processed"
        );
        report
    }

    async fn snapshot(&self, address: &str) -> Option<LiquiditySnapshot> {
        let raw = match self.balances.account_balance(address).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(%address, error = %e, "balance lookup failed, emitting without snapshot");
                return None;
            }
        };
        match LiquiditySnapshot::new(address, raw, self.scanner.config().snapshot_decimals) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(%address, raw, error = %e, "balance not representable, emitting without snapshot");
                None
            }
        }
    }
}
