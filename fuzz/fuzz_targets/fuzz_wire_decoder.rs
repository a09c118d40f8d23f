//! Fuzz the link wire decoders: arbitrary bytes must never panic,
//! only decode or be rejected.

#![no_main]

use camlink::link::codec::{decode_reg_command, encode_reg_command, unpack_command};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Byte-payload path: reject or round-trip, never panic.
    if let Ok(cmd) = decode_reg_command(data) {
        let bytes = encode_reg_command(&cmd).expect("decoded command must re-encode");
        assert_eq!(decode_reg_command(&bytes), Ok(cmd));
    }

    // Command-word path.
    if data.len() >= 4 {
        let word = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let _ = unpack_command(word);
    }
});
