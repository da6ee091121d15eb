//! Opcode registry: static descriptors mapping opcodes to record types.
//!
//! The table is built at compile time from the message catalog, so it is
//! immutable, complete, and safe to read from any thread without
//! initialization order concerns.

use crate::error::Result;
use crate::protocol::message::{descriptor, ClusterMessage};
use crate::protocol::opcode::{ClusterOp, Phase};

/// One registered record type
#[derive(Debug, PartialEq, Eq)]
pub struct RecordTypeDescriptor {
    pub op: ClusterOp,
    /// Record type name
    pub name: &'static str,
    /// Field names in wire order
    pub fields: &'static [&'static str],
}

impl RecordTypeDescriptor {
    pub fn code(&self) -> u8 {
        self.op.code()
    }

    pub fn phase(&self) -> Phase {
        self.op.phase()
    }

    pub fn is_request(&self) -> bool {
        self.op.is_request()
    }

    /// Descriptor of the paired request or response
    pub fn paired(&self) -> &'static RecordTypeDescriptor {
        match self.op.response().or_else(|| self.op.request()) {
            Some(op) => descriptor(op),
            None => descriptor(self.op),
        }
    }
}

/// Record type registered under `opcode`
pub fn type_of(opcode: u32) -> Result<&'static RecordTypeDescriptor> {
    ClusterOp::from_code(opcode).map(descriptor)
}

/// Opcode of a message value. Total over the catalog.
pub fn opcode_of(message: &ClusterMessage) -> ClusterOp {
    message.opcode()
}

/// Every descriptor in ascending opcode order
pub fn registry() -> impl Iterator<Item = &'static RecordTypeDescriptor> {
    ClusterOp::ALL.iter().map(|op| descriptor(*op))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::error::ProtocolError;
    use std::collections::HashSet;

    #[test]
    fn test_registry_is_complete_and_injective() {
        let entries: Vec<_> = registry().collect();
        assert_eq!(entries.len(), 24);

        let codes: HashSet<u8> = entries.iter().map(|d| d.code()).collect();
        let names: HashSet<&str> = entries.iter().map(|d| d.name).collect();
        assert_eq!(codes.len(), 24);
        assert_eq!(names.len(), 24);
        assert_eq!(codes.iter().min(), Some(&129));
        assert_eq!(codes.iter().max(), Some(&152));
    }

    #[test]
    fn test_type_of() {
        let descriptor = type_of(133).unwrap();
        assert_eq!(descriptor.name, "AddRootBlockRequest");
        assert_eq!(descriptor.fields, &["root_block", "expect_switch"]);
        assert_eq!(descriptor.phase(), Phase::MasterToSlave);

        assert!(matches!(type_of(999), Err(ProtocolError::UnknownOpcode(999))));
        assert!(matches!(type_of(128), Err(ProtocolError::UnknownOpcode(128))));
    }

    #[test]
    fn test_lookups_are_stable() {
        let first = type_of(140).unwrap();
        let second = type_of(140).unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_paired_descriptors() {
        let ping = type_of(129).unwrap();
        assert_eq!(ping.paired().name, "Pong");
        assert_eq!(ping.paired().paired().name, "Ping");
        assert!(ping.is_request());
        assert!(!ping.paired().is_request());
    }

    #[test]
    fn test_opcode_of_agrees_with_type_of() {
        let message = ClusterMessage::from(crate::protocol::message::AddMinorBlockResponse {
            error_code: 0,
        });
        let op = opcode_of(&message);
        assert_eq!(type_of(u32::from(op.code())).unwrap().name, message.name());
    }
}
