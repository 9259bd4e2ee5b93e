#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate radix4;

mod utils;

use radix4::Codec;

fuzz_target!(|data: &[u8]| {
    let config = utils::random_config(data);
    let codec = Codec::new(config.clone());

    let encoded = codec.encode_to_bytes(data).unwrap();
    assert_eq!(encoded.len(), codec.compute_encoded_length(data).unwrap());

    let decoded = codec.decode_from_bytes(&encoded).unwrap();
    assert_eq!(data, decoded.as_slice());

    // Every byte of the encoding must come from the alphabet, the
    // terminator, or the configured line break.
    for &b in &encoded {
        assert!(b < 0x80);
    }
});
