//! Test fixtures and helpers.
//!
//! Common setup code for scenario and integration tests.

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use safebox::{Call, CommandProcessor, CommandResult, Height};
use safebox_core::{BoundedText, DocumentHash, EncryptionKey, GroupId, Principal};
use safebox_registry::RegistryConfig;
use safebox_store::{MemoryStore, StateDigest};

const ACCOUNT_CONTEXT: &str = "safebox-testkit 2024 account seed";
const KEY_CONTEXT: &str = "safebox-testkit 2024 wrapped key";

/// A named principal backed by an Ed25519 key.
pub struct Account {
    pub name: String,
    signing_key: SigningKey,
}

impl Account {
    /// Create an account with a deterministic key derived from its name.
    pub fn derived(name: &str) -> Self {
        let seed = blake3::derive_key(ACCOUNT_CONTEXT, name.as_bytes());
        Self::from_seed(name, seed)
    }

    /// Create an account from an explicit key seed.
    pub fn from_seed(name: &str, seed: [u8; 32]) -> Self {
        Self {
            name: name.to_string(),
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Create an account with a random key.
    pub fn random(name: &str) -> Self {
        Self {
            name: name.to_string(),
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// The principal the registry sees for this account.
    pub fn principal(&self) -> Principal {
        Principal::from_bytes(self.signing_key.verifying_key().to_bytes())
    }
}

/// A deployer plus numbered wallets, all with deterministic keys.
pub struct Accounts {
    deployer: Account,
    wallets: Vec<Account>,
}

impl Accounts {
    /// Create the deployer and `wallets` wallets named `wallet_1..`.
    pub fn new(wallets: usize) -> Self {
        Self {
            deployer: Account::derived("deployer"),
            wallets: (1..=wallets)
                .map(|n| Account::derived(&format!("wallet_{n}")))
                .collect(),
        }
    }

    pub fn deployer(&self) -> &Account {
        &self.deployer
    }

    /// The `n`th wallet, counting from 1.
    ///
    /// Panics if there is no such wallet.
    pub fn wallet(&self, n: usize) -> &Account {
        &self.wallets[n - 1]
    }

    /// Every principal, deployer first.
    pub fn principals(&self) -> Vec<Principal> {
        std::iter::once(&self.deployer)
            .chain(&self.wallets)
            .map(Account::principal)
            .collect()
    }
}

impl Default for Accounts {
    fn default() -> Self {
        Self::new(8)
    }
}

/// Document hash of some content.
pub fn document_hash(content: &[u8]) -> DocumentHash {
    DocumentHash::from_bytes(*blake3::hash(content).as_bytes())
}

/// Group id derived from a name.
pub fn group_id(name: &str) -> GroupId {
    GroupId::from_bytes(*blake3::hash(name.as_bytes()).as_bytes())
}

/// Stand-in wrapped key derived from a label.
pub fn encryption_key(label: &str) -> EncryptionKey {
    EncryptionKey::from_bytes(blake3::derive_key(KEY_CONTEXT, label.as_bytes()))
}

/// Bounded text from a literal.
///
/// Panics if the literal is not valid bounded text.
pub fn text(s: &str) -> BoundedText {
    match BoundedText::new(s) {
        Ok(text) => text,
        Err(e) => panic!("invalid test text {s:?}: {e}"),
    }
}

/// A processor over a fresh memory store.
pub struct TestRegistry {
    processor: CommandProcessor<MemoryStore>,
}

impl TestRegistry {
    /// Create with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&RegistryConfig::default())
    }

    /// Create with a custom configuration.
    pub fn with_config(config: &RegistryConfig) -> Self {
        match CommandProcessor::open(MemoryStore::new(), config) {
            Ok(processor) => Self { processor },
            Err(e) => panic!("memory store failed to open: {e}"),
        }
    }

    /// Apply one call as its own block and return its result.
    pub fn run(&mut self, call: Call) -> CommandResult {
        match self.processor.apply_block(std::slice::from_ref(&call)) {
            Ok(mut block) => block.receipts.remove(0).result,
            Err(e) => panic!("memory store fault: {e}"),
        }
    }

    /// Apply a sequence of calls as one block and return their results.
    pub fn run_block(&mut self, calls: &[Call]) -> Vec<CommandResult> {
        match self.processor.apply_block(calls) {
            Ok(block) => block.receipts.into_iter().map(|r| r.result).collect(),
            Err(e) => panic!("memory store fault: {e}"),
        }
    }

    pub fn height(&self) -> Height {
        self.processor.height()
    }

    pub fn digest(&self) -> StateDigest {
        match self.processor.state_digest() {
            Ok(digest) => digest,
            Err(e) => panic!("memory store fault: {e}"),
        }
    }

    /// Get the underlying processor.
    pub fn processor(&self) -> &CommandProcessor<MemoryStore> {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut CommandProcessor<MemoryStore> {
        &mut self.processor
    }
}

impl Default for TestRegistry {
    fn default() -> Self {
        Self::new()
    }
}
