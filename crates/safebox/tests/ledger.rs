//! The async ledger front door.

use std::sync::Once;

use safebox::core::BoundedText;
use safebox::{Call, ChannelSource, Command, DocumentHash, Height, Ledger, LedgerConfig, Principal};

const OWNER: Principal = Principal::from_bytes([0xd0; 32]);

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

fn register(b: u8) -> Call {
    Command::RegisterDocument {
        hash: DocumentHash::from_bytes([b; 32]),
        title: BoundedText::new("Doc").unwrap(),
        description: BoundedText::new("Desc").unwrap(),
        encryption_key: None,
    }
    .by(OWNER)
}

#[tokio::test]
async fn test_ledger_from_json_config() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let json = format!(
        r#"{{ "store": {{ "backend": "sqlite", "path": {:?} }} }}"#,
        dir.path().join("ledger.db")
    );
    let config = LedgerConfig::from_json(&json).unwrap();

    {
        let ledger = Ledger::open(&config).unwrap();
        let block = ledger.submit(vec![register(1), register(2)]).await.unwrap();
        assert_eq!(block.accepted(), 2);
    }

    let ledger = Ledger::open(&config).unwrap();
    assert_eq!(ledger.height().await.unwrap(), Height(1));
    let block = ledger.submit(vec![register(1)]).await.unwrap();
    assert_eq!(block.rejected(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_producer_and_ledger_run_concurrently() {
    init_tracing();
    let ledger = Ledger::open(&LedgerConfig::default()).unwrap();
    let (sender, mut source) = ChannelSource::channel(2);

    let producer = tokio::spawn(async move {
        for b in 0..10u8 {
            sender.send(vec![register(b), register(b)]).await.unwrap();
        }
    });

    let receipts = ledger.run(&mut source).await.unwrap();
    producer.await.unwrap();

    assert_eq!(receipts.len(), 10);
    for (i, block) in receipts.iter().enumerate() {
        assert_eq!(block.height, Height(i as u64 + 1));
        assert_eq!(block.accepted(), 1);
        assert_eq!(block.rejected(), 1);
    }
}

#[tokio::test]
async fn test_replayed_blocks_reach_same_digest() {
    let blocks: Vec<Vec<Call>> = (0..5u8).map(|b| vec![register(b), register(b / 2)]).collect();

    let first = Ledger::open(&LedgerConfig::default()).unwrap();
    let second = Ledger::open(&LedgerConfig::default()).unwrap();

    let a = first.run(&mut blocks.clone().into_iter()).await.unwrap();
    let b = second.run(&mut blocks.into_iter()).await.unwrap();

    assert_eq!(a, b);
    assert_eq!(
        first.state_digest().await.unwrap(),
        second.state_digest().await.unwrap()
    );
}
