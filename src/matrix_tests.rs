//! Table-driven round-trip tests over the configuration matrix (optimistic
//! × terminated × block/stream × line-wrapped).

use rstest::rstest;
use rstest_reuse::{apply, template};

use crate::config::{ConfigBuilder, Mode};
use crate::Codec;

#[template]
#[rstest]
#[case(Mode::Block, false, false, 0)]
#[case(Mode::Block, false, true, 0)]
#[case(Mode::Block, true, false, 0)]
#[case(Mode::Block, true, true, 0)]
#[case(Mode::Block, true, false, 12)]
#[case(Mode::Stream, false, false, 0)]
#[case(Mode::Stream, false, true, 0)]
#[case(Mode::Stream, true, false, 0)]
#[case(Mode::Stream, true, true, 0)]
#[case(Mode::Stream, true, false, 12)]
fn configuration_matrix(
    #[case] mode: Mode,
    #[case] optimistic: bool,
    #[case] terminated: bool,
    #[case] line_length: usize,
) {
}

fn codec_for(mode: Mode, optimistic: bool, terminated: bool, line_length: usize) -> Codec {
    let builder = match mode {
        Mode::Block => ConfigBuilder::block(),
        Mode::Stream => ConfigBuilder::stream(),
    };
    let config = builder
        .optimistic(optimistic)
        .terminated(terminated)
        .line_length(line_length)
        .build()
        .unwrap();
    Codec::new(config)
}

#[apply(configuration_matrix)]
fn round_trips_across_lengths(mode: Mode, optimistic: bool, terminated: bool, line_length: usize) {
    let codec = codec_for(mode, optimistic, terminated, line_length);
    for n in [0usize, 1, 2, 3, 4, 7, 13, 40, 97] {
        let bytes: Vec<u8> = (0..n).map(|i| (i * 41 + 5) as u8).collect();
        let encoded = codec.encode_to_bytes(&bytes).unwrap();
        assert_eq!(
            encoded.len(),
            codec.compute_encoded_length(&bytes).unwrap(),
            "mode={:?} optimistic={} terminated={} line_length={} n={}",
            mode,
            optimistic,
            terminated,
            line_length,
            n
        );
        let decoded = codec.decode_from_bytes(&encoded).unwrap();
        assert_eq!(decoded, bytes, "mode={:?} n={}", mode, n);
    }
}

#[apply(configuration_matrix)]
fn every_output_byte_is_ascii(mode: Mode, optimistic: bool, terminated: bool, line_length: usize) {
    let codec = codec_for(mode, optimistic, terminated, line_length);
    let bytes: Vec<u8> = (0..50u8).collect();
    let encoded = codec.encode_to_bytes(&bytes).unwrap();
    assert!(encoded.iter().all(|&b| b < 0x80));
}

#[apply(configuration_matrix)]
fn no_trailing_line_break(mode: Mode, optimistic: bool, terminated: bool, line_length: usize) {
    let codec = codec_for(mode, optimistic, terminated, line_length);
    let bytes: Vec<u8> = (0..37u8).collect();
    let encoded = codec.encode_to_string(&bytes).unwrap();
    assert_eq!(encoded.trim_end_matches('\n'), encoded);
}
