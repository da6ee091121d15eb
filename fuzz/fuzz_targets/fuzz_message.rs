#![no_main]

use cluster_protocol::ClusterMessage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte selects the opcode, the rest is the payload
    let Some((&opcode, payload)) = data.split_first() else {
        return;
    };

    if let Ok(message) = ClusterMessage::decode(u32::from(opcode), payload) {
        // Accepted payloads are canonical
        let encoded = message.encode().expect("decoded message must re-encode");
        assert_eq!(&encoded[..], payload);
    }
});
