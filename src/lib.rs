//! # Cluster Protocol
//!
//! Wire protocol spoken between the master and the slaves of a sharded
//! blockchain cluster: a deterministic big-endian codec, the catalog of 24
//! RPC messages, the opcode registry that resolves an incoming frame to its
//! record type, and a handler dispatcher.
//!
//! ## Layers
//! - [`core`]: primitives, length-prefixed containers, the record serializer,
//!   and the frame envelope with its Tokio codec
//! - [`chain`]: blockchain entities carried inside messages
//! - [`protocol`]: opcodes, messages, registry, dispatcher
//! - [`config`], [`error`], [`utils`]: configuration, errors, logging, metrics
//!
//! ## Quick Start
//! ```rust
//! use cluster_protocol::protocol::{AddRootBlockResponse, ClusterMessage, Dispatcher};
//! use cluster_protocol::protocol::{AddRootBlockRequest, ClusterRecord};
//!
//! let dispatcher = Dispatcher::builder()
//!     .on(|request: AddRootBlockRequest| {
//!         Ok(AddRootBlockResponse {
//!             error_code: 0,
//!             switched: request.expect_switch,
//!         })
//!     })
//!     .build();
//!
//! let frame = AddRootBlockResponse { error_code: 0, switched: true }.to_frame(1).unwrap();
//! let message = dispatcher.decode_frame(&frame).unwrap();
//! assert_eq!(message.name(), "AddRootBlockResponse");
//! ```
//!
//! Encoding and decoding never touch shared state; every type here can be
//! used from any thread.

pub mod chain;
pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::codec::FrameCodec;
pub use crate::core::packet::Frame;
pub use crate::core::reader::{DecodeLimits, WireReader};
pub use crate::core::wire::{Wire, H256, U256};
pub use config::ProtocolConfig;
pub use error::{ProtocolError, Result};
pub use protocol::{ClusterMessage, ClusterOp, Dispatcher};
