//! Storage network and ledger doubles shared by the pipeline tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use permapub_client::{ClientError, ClientResult, Currency, FundReceipt, StorageNetwork, UploadReceipt};
use permapub_crypto::{Address, U256};
use permapub_ledger::{InMemoryLedger, Ledger, LedgerError, LedgerLock, LedgerResult, UploadLedger};
use permapub_types::{ContentDigest, RemoteId};

/// Price quoted for every request: 0.0001 ETH per call.
pub const QUOTE: u64 = 100_000_000_000_000;

/// Counts every call and hands out sequential ids `id-1`, `id-2`, ...
#[derive(Default)]
pub struct RecordingNetwork {
    uploads: Mutex<Vec<PathBuf>>,
    price_calls: AtomicUsize,
    fail_uploads: AtomicBool,
    fail_price: AtomicBool,
}

impl RecordingNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_price(&self, fail: bool) {
        self.fail_price.store(fail, Ordering::SeqCst);
    }

    pub fn uploads(&self) -> Vec<PathBuf> {
        self.uploads.lock().expect("lock poisoned").clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().expect("lock poisoned").len()
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageNetwork for RecordingNetwork {
    fn currency(&self) -> Currency {
        Currency::Ethereum
    }

    async fn upload_file(&self, path: &Path) -> ClientResult<UploadReceipt> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                endpoint: "POST /tx".into(),
                status: 503,
                body: "node unavailable".into(),
            });
        }
        let mut uploads = self.uploads.lock().expect("lock poisoned");
        uploads.push(path.to_path_buf());
        let id = RemoteId::new(format!("id-{}", uploads.len())).expect("valid id");
        Ok(UploadReceipt { id })
    }

    async fn get_price(&self, _bytes: u64) -> ClientResult<U256> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_price.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                endpoint: "GET /price".into(),
                status: 500,
                body: "oracle down".into(),
            });
        }
        Ok(U256::from(QUOTE))
    }

    async fn get_balance(&self, _address: Address) -> ClientResult<U256> {
        Ok(U256::from(2_500_000_000_000_000_000u128))
    }

    async fn fund(&self, amount: U256) -> ClientResult<FundReceipt> {
        Ok(FundReceipt {
            id: "0xfeed".into(),
            quantity: amount,
        })
    }
}

/// Ledger whose reads and lock work but whose every write fails.
#[derive(Default)]
pub struct UnwritableLedger {
    inner: InMemoryLedger,
}

#[async_trait]
impl UploadLedger for UnwritableLedger {
    fn load(&self) -> LedgerResult<Ledger> {
        self.inner.load()
    }

    async fn lock(&self) -> LedgerResult<LedgerLock> {
        self.inner.lock().await
    }

    fn record(
        &self,
        _lock: &LedgerLock,
        _digest: &ContentDigest,
        _remote_id: &RemoteId,
        _source_path: &str,
    ) -> LedgerResult<Ledger> {
        Err(LedgerError::Serialization("store is read-only".into()))
    }
}
