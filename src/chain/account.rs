use crate::core::container::PrefixedBytes;
use crate::core::record::wire_record;
use crate::core::wire::U256;

wire_record! {
    /// Account identifier scoped to a shard
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Address {
        pub recipient: [u8; 20],
        pub full_shard_id: u32,
    }
}

impl Address {
    pub fn new(recipient: [u8; 20], full_shard_id: u32) -> Self {
        Self {
            recipient,
            full_shard_id,
        }
    }

    /// Shard the account lives in for a power-of-two `shard_size`
    pub fn shard_id(&self, shard_size: u32) -> u32 {
        self.full_shard_id & shard_size.wrapping_sub(1)
    }
}

wire_record! {
    /// Serialized transaction, opaque to the cluster protocol
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Transaction {
        pub payload: Vec<u8> => PrefixedBytes<4>,
    }
}

impl Transaction {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

wire_record! {
    /// Value moving from one shard to `address` on another
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CrossShardTransactionDeposit {
        pub address: Address,
        pub amount: U256,
        pub gas_price: U256,
    }
}

wire_record! {
    /// Deposits produced by one minor block for one destination shard
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct CrossShardTransactionList {
        pub tx_list: Vec<CrossShardTransactionDeposit>,
    }
}
