//! The async front door: serialises blocks from any number of submitters.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use safebox_core::{Call, Height};
use safebox_store::{StateDigest, Store};
use tokio::sync::mpsc;

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::processor::CommandProcessor;
use crate::receipt::BlockReceipt;

/// An ordered source of blocks, such as a consensus feed.
#[async_trait]
pub trait BlockSource: Send {
    /// The next block, or `None` once the source is exhausted.
    async fn next_block(&mut self) -> Option<Vec<Call>>;
}

/// A block source fed through a tokio channel.
pub struct ChannelSource {
    receiver: mpsc::Receiver<Vec<Call>>,
}

impl ChannelSource {
    pub fn new(receiver: mpsc::Receiver<Vec<Call>>) -> Self {
        Self { receiver }
    }

    /// Create a bounded channel and the source draining it.
    pub fn channel(capacity: usize) -> (mpsc::Sender<Vec<Call>>, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (sender, Self::new(receiver))
    }
}

#[async_trait]
impl BlockSource for ChannelSource {
    async fn next_block(&mut self) -> Option<Vec<Call>> {
        self.receiver.recv().await
    }
}

#[async_trait]
impl BlockSource for std::vec::IntoIter<Vec<Call>> {
    async fn next_block(&mut self) -> Option<Vec<Call>> {
        self.next()
    }
}

/// Shared handle to a command processor.
///
/// Cloning is cheap; every clone submits to the same processor. Blocks are
/// applied on the blocking thread pool, one at a time, in the order their
/// submitters acquire the processor.
pub struct Ledger<S: Store + 'static> {
    processor: Arc<Mutex<CommandProcessor<S>>>,
}

impl<S: Store + 'static> Clone for Ledger<S> {
    fn clone(&self) -> Self {
        Self {
            processor: Arc::clone(&self.processor),
        }
    }
}

impl Ledger<Box<dyn Store>> {
    /// Open the configured store and wrap a processor over it.
    pub fn open(config: &LedgerConfig) -> Result<Self> {
        let store = config.open_store()?;
        Ok(Self::new(CommandProcessor::open(store, &config.registry())?))
    }
}

impl<S: Store + 'static> Ledger<S> {
    /// Wrap an existing processor.
    pub fn new(processor: CommandProcessor<S>) -> Self {
        Self {
            processor: Arc::new(Mutex::new(processor)),
        }
    }

    /// Apply one block.
    pub async fn submit(&self, calls: Vec<Call>) -> Result<BlockReceipt> {
        self.with_processor(move |processor| processor.apply_block(&calls)).await
    }

    /// Apply every block from `source` until it is exhausted.
    ///
    /// Stops at the first fault; blocks applied before it stay applied.
    pub async fn run<B: BlockSource>(&self, source: &mut B) -> Result<Vec<BlockReceipt>> {
        let mut receipts = Vec::new();
        while let Some(calls) = source.next_block().await {
            receipts.push(self.submit(calls).await?);
        }
        tracing::debug!(blocks = receipts.len(), "block source exhausted");
        Ok(receipts)
    }

    /// Height of the last applied block.
    pub async fn height(&self) -> Result<Height> {
        self.with_processor(|processor| Ok(processor.height())).await
    }

    /// Blake3 digest over the entire state.
    pub async fn state_digest(&self) -> Result<StateDigest> {
        self.with_processor(|processor| processor.state_digest()).await
    }

    /// Run a closure against the processor on the blocking pool.
    pub async fn with_processor<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut CommandProcessor<S>) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let processor = Arc::clone(&self.processor);
        tokio::task::spawn_blocking(move || {
            let mut guard = processor
                .lock()
                .map_err(|e| LedgerError::LockPoisoned(e.to_string()))?;
            f(&mut *guard)
        })
        .await
        .map_err(|e| LedgerError::Task(e.to_string()))?
    }
}
