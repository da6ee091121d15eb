//! # Message Catalog
//!
//! Every record exchanged between cluster participants, grouped by phase:
//!
//! - **Bootstrap**: `Ping`/`Pong` handshake, `ConnectToSlaves*`
//! - **Master → slave**: root/minor block propagation, mining economics,
//!   unconfirmed headers, account queries, transaction submission,
//!   bulk minor block download
//! - **Slave → master**: `AddMinorBlockHeader*`
//! - **Slave → slave**: `AddXshardTxList*`
//!
//! Every response carries an `error_code`: zero is success, anything else is
//! an application failure this layer does not interpret. When the code is
//! non-zero the response's other fields are undefined and must be ignored;
//! [`Response::into_result`] enforces that at the use site.

use crate::chain::{
    Address, Branch, CrossShardTransactionList, MinorBlock, MinorBlockHeader, PeerId, RootBlock,
    ShardMask, Transaction,
};
use crate::core::container::{PrefixedBytes, PrefixedList};
use crate::core::packet::Frame;
use crate::core::reader::{DecodeLimits, WireReader};
use crate::core::record::{wire_record, Record};
use crate::core::wire::{Wire, H256, U256};
use crate::error::Result;
use crate::protocol::opcode::ClusterOp;
use crate::protocol::registry::RecordTypeDescriptor;
use bytes::{Bytes, BytesMut};
use std::net::{IpAddr, Ipv6Addr, SocketAddr};

// ============================================================================
// BOOTSTRAP
// ============================================================================

wire_record! {
    /// Handshake opener. An empty `shard_mask_list` means the sender is the
    /// root-chain participant (the master).
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Ping {
        pub id: PeerId,
        pub shard_mask_list: Vec<ShardMask>,
    }
}

impl Ping {
    pub fn new(id: PeerId, shard_mask_list: Vec<ShardMask>) -> Self {
        Self {
            id,
            shard_mask_list,
        }
    }

    pub fn is_root(&self) -> bool {
        self.shard_mask_list.is_empty()
    }
}

wire_record! {
    /// Handshake reply. Carries the responder's own identity and masks,
    /// never an echo of the requester's.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Pong {
        pub id: PeerId,
        pub shard_mask_list: Vec<ShardMask>,
    }
}

impl Pong {
    pub fn new(id: PeerId, shard_mask_list: Vec<ShardMask>) -> Self {
        Self {
            id,
            shard_mask_list,
        }
    }

    pub fn is_root(&self) -> bool {
        self.shard_mask_list.is_empty()
    }
}

wire_record! {
    /// Where to reach a slave and which shards it serves
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SlaveInfo {
        pub id: PeerId,
        pub ip: u128,
        pub port: u16,
        pub shard_mask_list: Vec<ShardMask>,
    }
}

impl SlaveInfo {
    /// IPv4 addresses are carried in their IPv6-mapped form
    pub fn from_socket_addr(id: PeerId, addr: SocketAddr, shard_mask_list: Vec<ShardMask>) -> Self {
        let v6 = match addr.ip() {
            IpAddr::V4(v4) => v4.to_ipv6_mapped(),
            IpAddr::V6(v6) => v6,
        };
        Self {
            id,
            ip: u128::from(v6),
            port: addr.port(),
            shard_mask_list,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        let v6 = Ipv6Addr::from(self.ip);
        let ip = match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        };
        SocketAddr::new(ip, self.port)
    }
}

wire_record! {
    /// Master instructs a slave to connect to the listed slaves
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ConnectToSlavesRequest {
        pub slave_info_list: Vec<SlaveInfo>,
    }
}

wire_record! {
    /// One entry per slave of the request, in the same order. An empty entry
    /// is a successful connection, otherwise the entry is an error message.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ConnectToSlavesResponse {
        pub result_list: Vec<Vec<u8>> => PrefixedList<PrefixedBytes<4>, 4>,
    }
}

impl ConnectToSlavesResponse {
    /// All `count` connections succeeded
    pub fn success(count: usize) -> Self {
        Self {
            result_list: vec![Vec::new(); count],
        }
    }

    /// Per-slave outcome, positionally aligned with the request
    pub fn results(&self) -> impl Iterator<Item = std::result::Result<(), &[u8]>> + '_ {
        self.result_list.iter().map(|entry| {
            if entry.is_empty() {
                Ok(())
            } else {
                Err(entry.as_slice())
            }
        })
    }

    pub fn failure_count(&self) -> usize {
        self.result_list.iter().filter(|e| !e.is_empty()).count()
    }

    /// Whether there is exactly one result per requested slave
    pub fn is_aligned_with(&self, request: &ConnectToSlavesRequest) -> bool {
        self.result_list.len() == request.slave_info_list.len()
    }
}

// ============================================================================
// MASTER -> SLAVE
// ============================================================================

wire_record! {
    /// Propagates a root block. `expect_switch` is the master's belief that
    /// the block becomes the new head.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AddRootBlockRequest {
        pub root_block: RootBlock,
        pub expect_switch: bool,
    }
}

wire_record! {
    /// `switched` reports whether the slave actually adopted the block as its
    /// head, which its own fork choice may decide against `expect_switch`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AddRootBlockResponse {
        pub error_code: u32,
        pub switched: bool,
    }
}

wire_record! {
    /// Per-branch economics the master uses to pick the next block to mine
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EcoInfo {
        pub branch: Branch,
        pub height: u64,
        pub coinbase_amount: U256,
        pub difficulty: u64,
        pub unconfirmed_headers_coinbase_amount: U256,
    }
}

wire_record! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GetEcoInfoListRequest {}
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct GetEcoInfoListResponse {
        pub error_code: u32,
        pub eco_info_list: Vec<EcoInfo>,
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct GetNextBlockToMineRequest {
        pub branch: Branch,
        pub address: Address,
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct GetNextBlockToMineResponse {
        pub error_code: u32,
        pub block: MinorBlock,
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AddMinorBlockRequest {
        pub minor_block: MinorBlock,
    }
}

wire_record! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AddMinorBlockResponse {
        pub error_code: u32,
    }
}

wire_record! {
    /// Minor block headers of one branch not yet confirmed by a root block
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct HeadersInfo {
        pub branch: Branch,
        pub header_list: Vec<MinorBlockHeader>,
    }
}

wire_record! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GetUnconfirmedHeadersRequest {}
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct GetUnconfirmedHeadersResponse {
        pub error_code: u32,
        pub headers_info_list: Vec<HeadersInfo>,
    }
}

wire_record! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GetTransactionCountRequest {
        pub address: Address,
    }
}

wire_record! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GetTransactionCountResponse {
        pub error_code: u32,
        pub count: U256,
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AddTransactionRequest {
        pub tx: Transaction,
    }
}

wire_record! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AddTransactionResponse {
        pub error_code: u32,
    }
}

wire_record! {
    /// Bulk fetch of full minor blocks by hash, for catch-up after only the
    /// headers were seen. Also sent between slaves.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DownloadMinorBlockListRequest {
        pub minor_block_hash_list: Vec<H256>,
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DownloadMinorBlockListResponse {
        pub error_code: u32,
        pub minor_block_list: Vec<MinorBlock>,
    }
}

impl DownloadMinorBlockListResponse {
    pub fn new(error_code: u32, minor_block_list: Vec<MinorBlock>) -> Self {
        Self {
            error_code,
            minor_block_list,
        }
    }
}

// ============================================================================
// SLAVE -> MASTER
// ============================================================================

wire_record! {
    /// A slave reports a newly confirmed minor block header
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AddMinorBlockHeaderRequest {
        pub minor_block_header: MinorBlockHeader,
    }
}

wire_record! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AddMinorBlockHeaderResponse {
        pub error_code: u32,
    }
}

// ============================================================================
// SLAVE -> SLAVE
// ============================================================================

wire_record! {
    /// Cross-shard deposits for the destination shard, keyed by
    /// `(branch, minor_block_hash)` of the block that produced them
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AddXshardTxListRequest {
        pub branch: Branch,
        pub minor_block_hash: H256,
        pub tx_list: CrossShardTransactionList,
    }
}

wire_record! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AddXshardTxListResponse {
        pub error_code: u32,
    }
}

// ============================================================================
// RESPONSE STATUS
// ============================================================================

/// Responses carrying an application error code
pub trait Response: Sized {
    fn error_code(&self) -> u32;

    fn is_success(&self) -> bool {
        self.error_code() == 0
    }

    /// The response if it succeeded, its error code otherwise. Data fields of
    /// a failed response are never exposed through this path.
    fn into_result(self) -> std::result::Result<Self, u32> {
        match self.error_code() {
            0 => Ok(self),
            code => Err(code),
        }
    }
}

macro_rules! impl_response {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Response for $ty {
                #[inline]
                fn error_code(&self) -> u32 {
                    self.error_code
                }
            }
        )*
    };
}

impl_response!(
    AddRootBlockResponse,
    GetEcoInfoListResponse,
    GetNextBlockToMineResponse,
    AddMinorBlockResponse,
    GetUnconfirmedHeadersResponse,
    GetTransactionCountResponse,
    AddTransactionResponse,
    DownloadMinorBlockListResponse,
    AddMinorBlockHeaderResponse,
    AddXshardTxListResponse,
);

// ============================================================================
// TAGGED UNION
// ============================================================================

/// A catalog record bound to its opcode
pub trait ClusterRecord: Record + Into<ClusterMessage> {
    const OP: ClusterOp;

    /// Encode and wrap in a frame envelope
    fn to_frame(&self, rpc_id: u64) -> Result<Frame> {
        Ok(Frame::new(Self::OP, rpc_id, self.to_bytes()?))
    }
}

/// Variant names match `ClusterOp` names, so one list drives the enum, the
/// opcode mapping and the descriptor table. Matches over `ClusterOp` are
/// exhaustive: an opcode without a record fails to compile.
macro_rules! cluster_messages {
    ($($variant:ident),* $(,)?) => {
        /// Any message of the cluster catalog
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum ClusterMessage {
            $( $variant($variant), )*
        }

        impl ClusterMessage {
            pub fn opcode(&self) -> ClusterOp {
                match self {
                    $( ClusterMessage::$variant(_) => ClusterOp::$variant, )*
                }
            }

            fn encode_payload(&self, buf: &mut BytesMut) -> Result<()> {
                match self {
                    $( ClusterMessage::$variant(m) => m.encode_to(buf), )*
                }
            }

            fn decode_payload(op: ClusterOp, reader: &mut WireReader<'_>) -> Result<Self> {
                match op {
                    $( ClusterOp::$variant => $variant::decode_from(reader).map(ClusterMessage::$variant), )*
                }
            }
        }

        pub(crate) fn descriptor(op: ClusterOp) -> &'static RecordTypeDescriptor {
            match op {
                $(
                    ClusterOp::$variant => {
                        static DESCRIPTOR: RecordTypeDescriptor = RecordTypeDescriptor {
                            op: ClusterOp::$variant,
                            name: <$variant as Record>::NAME,
                            fields: <$variant as Record>::FIELDS,
                        };
                        &DESCRIPTOR
                    }
                )*
            }
        }

        $(
            impl ClusterRecord for $variant {
                const OP: ClusterOp = ClusterOp::$variant;
            }

            impl From<$variant> for ClusterMessage {
                fn from(message: $variant) -> Self {
                    ClusterMessage::$variant(message)
                }
            }

            impl TryFrom<ClusterMessage> for $variant {
                type Error = ClusterMessage;

                fn try_from(message: ClusterMessage) -> std::result::Result<Self, ClusterMessage> {
                    match message {
                        ClusterMessage::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

cluster_messages!(
    Ping,
    Pong,
    ConnectToSlavesRequest,
    ConnectToSlavesResponse,
    AddRootBlockRequest,
    AddRootBlockResponse,
    GetEcoInfoListRequest,
    GetEcoInfoListResponse,
    GetNextBlockToMineRequest,
    GetNextBlockToMineResponse,
    GetUnconfirmedHeadersRequest,
    GetUnconfirmedHeadersResponse,
    GetTransactionCountRequest,
    GetTransactionCountResponse,
    AddTransactionRequest,
    AddTransactionResponse,
    AddMinorBlockHeaderRequest,
    AddMinorBlockHeaderResponse,
    AddXshardTxListRequest,
    AddXshardTxListResponse,
    DownloadMinorBlockListRequest,
    DownloadMinorBlockListResponse,
    AddMinorBlockRequest,
    AddMinorBlockResponse,
);

impl ClusterMessage {
    /// Record type name, e.g. `"AddRootBlockRequest"`
    pub fn name(&self) -> &'static str {
        descriptor(self.opcode()).name
    }

    pub fn is_request(&self) -> bool {
        self.opcode().is_request()
    }

    /// Payload bytes, without any frame envelope
    pub fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        self.encode_payload(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Decode a payload whose type is known only by its opcode
    pub fn decode(opcode: u32, payload: &[u8]) -> Result<Self> {
        Self::decode_with_limits(opcode, payload, DecodeLimits::default())
    }

    /// Decode with explicit bounds. The payload must be consumed exactly.
    pub fn decode_with_limits(opcode: u32, payload: &[u8], limits: DecodeLimits) -> Result<Self> {
        let op = ClusterOp::from_code(opcode)?;
        let mut reader = WireReader::with_limits(payload, limits);
        let message = Self::decode_payload(op, &mut reader)?;
        reader.finish()?;
        Ok(message)
    }

    pub fn to_frame(&self, rpc_id: u64) -> Result<Frame> {
        Ok(Frame::new(self.opcode(), rpc_id, self.encode()?))
    }

    pub fn from_frame(frame: &Frame) -> Result<Self> {
        Self::decode(u32::from(frame.opcode), &frame.payload)
    }
}
