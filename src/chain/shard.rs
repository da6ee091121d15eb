use crate::core::record::wire_record;
use crate::error::{ProtocolError, Result};

wire_record! {
    /// Self-describing selection of shard ids.
    ///
    /// The highest set bit of `value` marks how many low bits form the
    /// pattern; a shard id matches when its low bits equal the pattern.
    /// `ShardMask(0b1)` selects every shard, `0b10` the even shards,
    /// `0b11` the odd ones, `0b101` ids with `id % 4 == 1`.
    ///
    /// An empty list of masks on a peer identity means the peer is the
    /// root-chain participant, not a peer without shards.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShardMask {
        value: u32,
    }
}

impl ShardMask {
    pub fn new(value: u32) -> Result<Self> {
        if value == 0 {
            return Err(ProtocolError::InvalidShardMask(value));
        }
        Ok(Self { value })
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    fn pattern_mask(&self) -> Option<u32> {
        self.value.checked_ilog2().map(|bits| (1u32 << bits) - 1)
    }

    /// A zero mask, which can only arrive off the wire, contains nothing
    pub fn contains_shard(&self, shard_id: u32) -> bool {
        match self.pattern_mask() {
            Some(mask) => shard_id & mask == self.value & mask,
            None => false,
        }
    }

    pub fn contains_branch(&self, branch: Branch) -> bool {
        self.contains_shard(branch.shard_id())
    }

    /// Shard ids below `shard_size` selected by this mask, ascending
    pub fn shards(&self, shard_size: u32) -> impl Iterator<Item = u32> {
        let mask = *self;
        (0..shard_size).filter(move |id| mask.contains_shard(*id))
    }
}

wire_record! {
    /// One minor chain, `value = shard_size | shard_id` with a power-of-two
    /// shard size
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Branch {
        value: u32,
    }
}

impl Branch {
    pub fn create(shard_size: u32, shard_id: u32) -> Result<Self> {
        if !shard_size.is_power_of_two() || shard_id >= shard_size {
            return Err(ProtocolError::InvalidBranch {
                shard_size,
                shard_id,
            });
        }
        Ok(Self {
            value: shard_size | shard_id,
        })
    }

    /// Raw value as carried on the wire
    pub fn from_value(value: u32) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn shard_size(&self) -> u32 {
        self.value.checked_ilog2().map_or(0, |bit| 1u32 << bit)
    }

    pub fn shard_id(&self) -> u32 {
        self.value ^ self.shard_size()
    }
}
