//! Whole-ledger properties over generated command sequences.

use proptest::prelude::*;

use safebox::store::{MemoryStore, SqliteStore};
use safebox::{Command, CommandProcessor, Output};
use safebox_registry::RegistryConfig;
use safebox_testkit::generators::{block, blocks, CallPool};
use safebox_testkit::TestRegistry;

fn replay<S: safebox::store::Store>(
    store: S,
    blocks: &[Vec<safebox::Call>],
) -> (Vec<safebox::BlockReceipt>, safebox::store::StateDigest) {
    let mut processor = CommandProcessor::open(store, &RegistryConfig::default()).unwrap();
    let receipts = blocks
        .iter()
        .map(|calls| processor.apply_block(calls).unwrap())
        .collect();
    (receipts, processor.state_digest().unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_replay_is_deterministic(blocks in blocks(4, 12)) {
        let (receipts_a, digest_a) = replay(MemoryStore::new(), &blocks);
        let (receipts_b, digest_b) = replay(MemoryStore::new(), &blocks);

        prop_assert_eq!(receipts_a, receipts_b);
        prop_assert_eq!(digest_a, digest_b);
    }

    #[test]
    fn test_backends_agree(blocks in blocks(3, 8)) {
        let dir = tempfile::tempdir().unwrap();
        let sqlite = SqliteStore::open(dir.path().join("replay.db")).unwrap();

        let (memory_receipts, memory_digest) = replay(MemoryStore::new(), &blocks);
        let (sqlite_receipts, sqlite_digest) = replay(sqlite, &blocks);

        prop_assert_eq!(memory_receipts, sqlite_receipts);
        prop_assert_eq!(memory_digest, sqlite_digest);
    }

    #[test]
    fn test_rejected_and_read_only_calls_leave_state_unchanged(
        calls in block(&CallPool::default(), 24),
    ) {
        let mut registry = TestRegistry::new();

        for call in calls {
            let before = registry.digest();
            let receipt = registry.processor_mut().apply(&call).unwrap();
            let after = registry.digest();

            if receipt.result.is_err() || call.command.is_read_only() {
                prop_assert_eq!(before, after, "{} changed state", receipt.command);
            }
        }
    }

    #[test]
    fn test_has_access_always_answers(calls in block(&CallPool::default(), 16)) {
        let pool = CallPool::default();
        let mut registry = TestRegistry::new();
        registry.run_block(&calls);

        for hash in &pool.hashes {
            for principal in &pool.principals {
                let result = registry.run(
                    Command::HasAccess { hash: *hash, principal: *principal }.by(*principal),
                );
                let answered = matches!(result, Ok(Output::Bool(_)));
                prop_assert!(answered, "has-access returned {:?}", result);
            }
        }
    }

    #[test]
    fn test_versions_match_history_length(calls in block(&CallPool::default(), 24)) {
        let pool = CallPool::default();
        let mut registry = TestRegistry::new();
        registry.run_block(&calls);

        for hash in &pool.hashes {
            let processor = registry.processor();
            let Some(version) = processor.version(hash).unwrap() else {
                continue;
            };
            let history = processor
                .query(pool.principals[0], &Command::GetDocumentHistory { hash: *hash })
                .unwrap();
            match history {
                Some(Ok(Output::History(chain))) => {
                    prop_assert_eq!(chain.len() as u64, version + 1);
                    prop_assert_eq!(chain[0], *hash);
                }
                other => prop_assert!(false, "unexpected history result {:?}", other),
            }
        }
    }
}
