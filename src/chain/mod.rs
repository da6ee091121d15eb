//! # Chain Entities
//!
//! Blockchain structures carried inside cluster messages. This layer only
//! knows how to encode them; hashing, validation and fork choice live with
//! the blockchain logic that consumes the messages.

pub mod account;
pub mod block;
pub mod identity;
pub mod shard;

pub use account::{Address, CrossShardTransactionDeposit, CrossShardTransactionList, Transaction};
pub use block::{MinorBlock, MinorBlockHeader, MinorBlockMeta, RootBlock, RootBlockHeader};
pub use identity::PeerId;
pub use shard::{Branch, ShardMask};
