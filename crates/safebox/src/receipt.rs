//! Receipts: what the ledger reports back for each applied command.

use safebox_core::{CommandResult, Height, Principal};
use serde::{Deserialize, Serialize};

/// Outcome of one command within a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReceipt {
    /// Position of the command within its block.
    pub index: usize,
    pub caller: Principal,
    /// Kebab-case command name, e.g. `register-document`.
    pub command: String,
    pub result: CommandResult,
}

impl CommandReceipt {
    /// Whether the command succeeded.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of every command in a block, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockReceipt {
    pub height: Height,
    pub receipts: Vec<CommandReceipt>,
}

impl BlockReceipt {
    /// Number of commands that succeeded.
    pub fn accepted(&self) -> usize {
        self.receipts.iter().filter(|r| r.is_ok()).count()
    }

    /// Number of commands that were rejected.
    pub fn rejected(&self) -> usize {
        self.receipts.len() - self.accepted()
    }
}
