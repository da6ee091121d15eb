use crate::chain::account::{Address, Transaction};
use crate::chain::shard::Branch;
use crate::core::record::wire_record;
use crate::core::wire::{H256, U256};

wire_record! {
    /// Lightweight summary of a minor block
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MinorBlockHeader {
        pub version: u32,
        pub branch: Branch,
        pub height: u64,
        pub coinbase_address: Address,
        pub coinbase_amount: U256,
        pub hash_prev_minor_block: H256,
        pub hash_prev_root_block: H256,
        pub hash_meta: H256,
        pub create_time: u64,
        pub difficulty: u64,
        pub nonce: u64,
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct MinorBlockMeta {
        pub hash_merkle_root: H256,
        pub hash_evm_state_root: H256,
        pub evm_gas_used: U256,
    }
}

wire_record! {
    /// Full minor block as exchanged between master and slaves
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MinorBlock {
        pub header: MinorBlockHeader,
        pub meta: MinorBlockMeta,
        pub tx_list: Vec<Transaction>,
    }
}

impl MinorBlock {
    pub fn branch(&self) -> Branch {
        self.header.branch
    }

    pub fn height(&self) -> u64 {
        self.header.height
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RootBlockHeader {
        pub version: u32,
        pub height: u32,
        pub shard_size: u32,
        pub hash_prev_block: H256,
        pub hash_merkle_root: H256,
        pub coinbase_address: Address,
        pub coinbase_amount: U256,
        pub create_time: u64,
        pub difficulty: u64,
        pub nonce: u32,
    }
}

wire_record! {
    /// Root block with the minor block headers it confirms
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RootBlock {
        pub header: RootBlockHeader,
        pub minor_block_header_list: Vec<MinorBlockHeader>,
    }
}

impl RootBlock {
    pub fn height(&self) -> u32 {
        self.header.height
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::core::wire::Wire;

    fn header(height: u64) -> MinorBlockHeader {
        MinorBlockHeader {
            version: 0,
            branch: Branch::create(2, 1).unwrap(),
            height,
            coinbase_address: Address::new([9; 20], 1),
            coinbase_amount: U256::from(5u64),
            hash_prev_minor_block: H256::new([1; 32]),
            hash_prev_root_block: H256::new([2; 32]),
            hash_meta: H256::new([3; 32]),
            create_time: 1_500_000_000,
            difficulty: 1000,
            nonce: 0,
        }
    }

    #[test]
    fn test_minor_header_size() {
        // 4 + 4 + 8 + 24 + 32 + 3 * 32 + 3 * 8
        assert_eq!(header(1).to_bytes().unwrap().len(), 192);
    }

    #[test]
    fn test_root_block_roundtrip() {
        let block = RootBlock {
            header: RootBlockHeader {
                version: 0,
                height: 3,
                shard_size: 2,
                hash_prev_block: H256::new([4; 32]),
                hash_merkle_root: H256::ZERO,
                coinbase_address: Address::default(),
                coinbase_amount: U256::from(10u64),
                create_time: 1_500_000_100,
                difficulty: 5,
                nonce: 8,
            },
            minor_block_header_list: vec![header(1), header(2)],
        };
        let bytes = block.to_bytes().unwrap();
        let decoded = RootBlock::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, block);
        assert_eq!(decoded.height(), 3);
    }

    #[test]
    fn test_minor_block_roundtrip() {
        let block = MinorBlock {
            header: header(7),
            meta: MinorBlockMeta::default(),
            tx_list: vec![Transaction::new(vec![1, 2]), Transaction::default()],
        };
        let decoded = MinorBlock::from_bytes(&block.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, block);
        assert_eq!(decoded.height(), 7);
        assert_eq!(decoded.branch().shard_id(), 1);
    }
}
