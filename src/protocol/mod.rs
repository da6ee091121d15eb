//! # Cluster Protocol
//!
//! Message catalog, opcode registry and dispatch for the master/slave
//! cluster RPC.
//!
//! ## Components
//! - **Opcode**: the 24 cluster opcodes, their pairing and phase
//! - **Message**: every record type and the [`ClusterMessage`] union
//! - **Registry**: static descriptors for opcode → record type lookups
//! - **Dispatcher**: routes decoded requests to handlers and frames replies
//!
//! ## Example
//! ```rust
//! use cluster_protocol::chain::PeerId;
//! use cluster_protocol::protocol::{ClusterMessage, ClusterOp, Ping};
//!
//! let ping = ClusterMessage::from(Ping::new(PeerId::new(*b"0000"), vec![]));
//! let bytes = ping.encode().unwrap();
//! assert_eq!(&bytes[..], b"0000\0\0\0\0");
//!
//! let decoded = ClusterMessage::decode(u32::from(ClusterOp::Ping.code()), &bytes).unwrap();
//! assert_eq!(decoded, ping);
//! ```

pub mod dispatcher;
pub mod message;
pub mod opcode;
pub mod registry;


pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use message::*;
pub use opcode::{ClusterOp, Phase};
pub use registry::{opcode_of, registry, type_of, RecordTypeDescriptor};
