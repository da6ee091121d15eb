//! Cluster opcode space.
//!
//! Opcodes are `CLUSTER_OP_BASE + index` with indices 1..=24, keeping the
//! cluster protocol clear of the P2P protocol's opcodes on a shared
//! transport. Requests and their responses are adjacent, request first.

use crate::config::CLUSTER_OP_BASE;
use crate::error::{ProtocolError, Result};
use std::fmt;

/// Protocol phase a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Cluster initialization: handshake and slave interconnection
    Bootstrap,
    MasterToSlave,
    SlaveToMaster,
    SlaveToSlave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ClusterOp {
    Ping = CLUSTER_OP_BASE + 1,
    Pong = CLUSTER_OP_BASE + 2,
    ConnectToSlavesRequest = CLUSTER_OP_BASE + 3,
    ConnectToSlavesResponse = CLUSTER_OP_BASE + 4,
    AddRootBlockRequest = CLUSTER_OP_BASE + 5,
    AddRootBlockResponse = CLUSTER_OP_BASE + 6,
    GetEcoInfoListRequest = CLUSTER_OP_BASE + 7,
    GetEcoInfoListResponse = CLUSTER_OP_BASE + 8,
    GetNextBlockToMineRequest = CLUSTER_OP_BASE + 9,
    GetNextBlockToMineResponse = CLUSTER_OP_BASE + 10,
    GetUnconfirmedHeadersRequest = CLUSTER_OP_BASE + 11,
    GetUnconfirmedHeadersResponse = CLUSTER_OP_BASE + 12,
    GetTransactionCountRequest = CLUSTER_OP_BASE + 13,
    GetTransactionCountResponse = CLUSTER_OP_BASE + 14,
    AddTransactionRequest = CLUSTER_OP_BASE + 15,
    AddTransactionResponse = CLUSTER_OP_BASE + 16,
    AddMinorBlockHeaderRequest = CLUSTER_OP_BASE + 17,
    AddMinorBlockHeaderResponse = CLUSTER_OP_BASE + 18,
    AddXshardTxListRequest = CLUSTER_OP_BASE + 19,
    AddXshardTxListResponse = CLUSTER_OP_BASE + 20,
    DownloadMinorBlockListRequest = CLUSTER_OP_BASE + 21,
    DownloadMinorBlockListResponse = CLUSTER_OP_BASE + 22,
    AddMinorBlockRequest = CLUSTER_OP_BASE + 23,
    AddMinorBlockResponse = CLUSTER_OP_BASE + 24,
}

impl ClusterOp {
    /// Every opcode in ascending order
    pub const ALL: [ClusterOp; 24] = [
        ClusterOp::Ping,
        ClusterOp::Pong,
        ClusterOp::ConnectToSlavesRequest,
        ClusterOp::ConnectToSlavesResponse,
        ClusterOp::AddRootBlockRequest,
        ClusterOp::AddRootBlockResponse,
        ClusterOp::GetEcoInfoListRequest,
        ClusterOp::GetEcoInfoListResponse,
        ClusterOp::GetNextBlockToMineRequest,
        ClusterOp::GetNextBlockToMineResponse,
        ClusterOp::GetUnconfirmedHeadersRequest,
        ClusterOp::GetUnconfirmedHeadersResponse,
        ClusterOp::GetTransactionCountRequest,
        ClusterOp::GetTransactionCountResponse,
        ClusterOp::AddTransactionRequest,
        ClusterOp::AddTransactionResponse,
        ClusterOp::AddMinorBlockHeaderRequest,
        ClusterOp::AddMinorBlockHeaderResponse,
        ClusterOp::AddXshardTxListRequest,
        ClusterOp::AddXshardTxListResponse,
        ClusterOp::DownloadMinorBlockListRequest,
        ClusterOp::DownloadMinorBlockListResponse,
        ClusterOp::AddMinorBlockRequest,
        ClusterOp::AddMinorBlockResponse,
    ];

    /// Lowest cluster opcode
    pub const FIRST: u8 = CLUSTER_OP_BASE + 1;

    /// Highest cluster opcode
    pub const LAST: u8 = CLUSTER_OP_BASE + 24;

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Position in the catalog, starting at 1
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8 - CLUSTER_OP_BASE
    }

    /// Resolve a raw opcode; anything outside the catalog is rejected
    pub fn from_code(code: u32) -> Result<Self> {
        match u8::try_from(code) {
            Ok(byte) if (Self::FIRST..=Self::LAST).contains(&byte) => {
                Ok(Self::ALL[usize::from(byte - Self::FIRST)])
            }
            _ => Err(ProtocolError::UnknownOpcode(code)),
        }
    }

    /// Requests sit at odd catalog indices; Ping counts as the request of Pong
    #[inline]
    pub const fn is_request(self) -> bool {
        self.index() % 2 == 1
    }

    /// Paired response of a request
    pub fn response(self) -> Option<ClusterOp> {
        if self.is_request() {
            Some(Self::ALL[usize::from(self.index())])
        } else {
            None
        }
    }

    /// Paired request of a response
    pub fn request(self) -> Option<ClusterOp> {
        if self.is_request() {
            None
        } else {
            Some(Self::ALL[usize::from(self.index() - 2)])
        }
    }

    pub fn phase(self) -> Phase {
        use ClusterOp::*;
        match self {
            Ping | Pong | ConnectToSlavesRequest | ConnectToSlavesResponse => Phase::Bootstrap,
            AddMinorBlockHeaderRequest | AddMinorBlockHeaderResponse => Phase::SlaveToMaster,
            AddXshardTxListRequest | AddXshardTxListResponse => Phase::SlaveToSlave,
            AddRootBlockRequest
            | AddRootBlockResponse
            | GetEcoInfoListRequest
            | GetEcoInfoListResponse
            | GetNextBlockToMineRequest
            | GetNextBlockToMineResponse
            | GetUnconfirmedHeadersRequest
            | GetUnconfirmedHeadersResponse
            | GetTransactionCountRequest
            | GetTransactionCountResponse
            | AddTransactionRequest
            | AddTransactionResponse
            | DownloadMinorBlockListRequest
            | DownloadMinorBlockListResponse
            | AddMinorBlockRequest
            | AddMinorBlockResponse => Phase::MasterToSlave,
        }
    }

    pub fn name(self) -> &'static str {
        use ClusterOp::*;
        match self {
            Ping => "PING",
            Pong => "PONG",
            ConnectToSlavesRequest => "CONNECT_TO_SLAVES_REQUEST",
            ConnectToSlavesResponse => "CONNECT_TO_SLAVES_RESPONSE",
            AddRootBlockRequest => "ADD_ROOT_BLOCK_REQUEST",
            AddRootBlockResponse => "ADD_ROOT_BLOCK_RESPONSE",
            GetEcoInfoListRequest => "GET_ECO_INFO_LIST_REQUEST",
            GetEcoInfoListResponse => "GET_ECO_INFO_LIST_RESPONSE",
            GetNextBlockToMineRequest => "GET_NEXT_BLOCK_TO_MINE_REQUEST",
            GetNextBlockToMineResponse => "GET_NEXT_BLOCK_TO_MINE_RESPONSE",
            GetUnconfirmedHeadersRequest => "GET_UNCONFIRMED_HEADERS_REQUEST",
            GetUnconfirmedHeadersResponse => "GET_UNCONFIRMED_HEADERS_RESPONSE",
            GetTransactionCountRequest => "GET_TRANSACTION_COUNT_REQUEST",
            GetTransactionCountResponse => "GET_TRANSACTION_COUNT_RESPONSE",
            AddTransactionRequest => "ADD_TRANSACTION_REQUEST",
            AddTransactionResponse => "ADD_TRANSACTION_RESPONSE",
            AddMinorBlockHeaderRequest => "ADD_MINOR_BLOCK_HEADER_REQUEST",
            AddMinorBlockHeaderResponse => "ADD_MINOR_BLOCK_HEADER_RESPONSE",
            AddXshardTxListRequest => "ADD_XSHARD_TX_LIST_REQUEST",
            AddXshardTxListResponse => "ADD_XSHARD_TX_LIST_RESPONSE",
            DownloadMinorBlockListRequest => "DOWNLOAD_MINOR_BLOCK_LIST_REQUEST",
            DownloadMinorBlockListResponse => "DOWNLOAD_MINOR_BLOCK_LIST_RESPONSE",
            AddMinorBlockRequest => "ADD_MINOR_BLOCK_REQUEST",
            AddMinorBlockResponse => "ADD_MINOR_BLOCK_RESPONSE",
        }
    }
}

impl TryFrom<u32> for ClusterOp {
    type Error = ProtocolError;

    fn try_from(code: u32) -> Result<Self> {
        Self::from_code(code)
    }
}

impl TryFrom<u8> for ClusterOp {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code(u32::from(code))
    }
}

impl From<ClusterOp> for u8 {
    fn from(op: ClusterOp) -> Self {
        op.code()
    }
}

impl fmt::Display for ClusterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.code())
    }
}
