use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Error;
use crate::types::{LiquidityEvent, RawTransaction};

/// Source of transaction details, typically a JSON-RPC client.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// `Ok(None)` when the signature is unknown to the source.
    async fn transaction_details(&self, signature: &str) -> Result<Option<RawTransaction>, Error>;
}

/// Native balance lookup for the liquidity snapshot.
#[async_trait]
pub trait BalanceLookup: Send + Sync {
    /// Balance in base units. Failures should be reported as [`Error::LookupUnavailable`].
    async fn account_balance(&self, address: &str) -> Result<u64, Error>;
}

/// Durable destination for detected events. Responsible for deduplication
/// when the upstream feed can redeliver a signature.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn insert(&self, event: LiquidityEvent) -> Result<(), Error>;
}

/// In-process sink keyed on `(signature, amm_id)`; repeated inserts are dropped.
#[derive(Debug, Default)]
pub struct MemorySink {
    inner: Mutex<MemorySinkState>,
}

#[derive(Debug, Default)]
struct MemorySinkState {
    seen: HashSet<(String, String)>,
    events: Vec<LiquidityEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LiquidityEvent> {
        match self.inner.lock() {
            Ok(state) => state.events.clone(),
            Err(poisoned) => poisoned.into_inner().events.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.inner.lock() {
            Ok(state) => state.events.len(),
            Err(poisoned) => poisoned.into_inner().events.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn insert(&self, event: LiquidityEvent) -> Result<(), Error> {
        let mut state = self.inner.lock().map_err(|e| Error::Sink {
            reason: format!("memory sink poisoned: {e}"),
        })?;
        let key = (event.signature.clone(), event.accounts.amm_id.clone());
        if !state.seen.insert(key) {
            debug!(
                signature = %event.signature,
                amm_id = %event.accounts.amm_id,
                "duplicate event dropped"
            );
            return Ok(());
        }
        state.events.push(event);
        Ok(())
    }
}
