//! Radix4: a binary-to-text codec mapping bytes onto a 64-character ASCII
//! alphabet (`[-_A-Za-z0-9]`) such that alphabet-only input encodes to
//! (near-)itself, and the "radix" bits that don't fit the alphabet are
//! collected into separate marker characters instead of being spread across
//! every output character the way base64 does.
//!
//! The crate is organized the way `base64` organizes itself: a thin facade
//! (this module) dispatching to a block engine or a streaming engine, both
//! built on a shared [`Mapping`], a derived [`CharClass`] lookup table, and
//! a length calculator, all tied together by an immutable [`Config`]
//! produced by [`ConfigBuilder`].

mod block;
pub mod config;
pub mod error;
pub mod io;
mod length;
pub mod mapping;
#[cfg(test)]
mod matrix_tests;
// rstest_reuse's `#[template]` macro expands to a `macro_rules!` that needs
// to be visible from the crate root; see the rstest_reuse docs.
#[cfg(test)]
use rstest_reuse;
mod stream;
mod tables;
mod wrap;

use std::io::{Read, Write};
use std::sync::OnceLock;

pub use config::{Config, ConfigBuilder, Mode};
pub use error::{Error, MappingError};
pub use io::{CharsSource, ReadSource, Sink, SliceSource, Source, StringSink, VecSink, WriteSink};
pub use mapping::{Mapping, DEFAULT_ALPHABET};
pub use stream::{StreamDecoder, StreamEncoder};
pub use tables::{CharClass, WhitespaceSet};

/// Compute the length `encode`ing `bytes` under `config` would produce,
/// without performing the encode. The block encoder uses this to pre-size
/// its output buffer; it is also part of the public surface so callers can
/// pre-size their own buffers.
pub fn compute_encoded_length(config: &Config, bytes: &[u8]) -> Result<usize, Error> {
    length::compute_encoded_length(config, bytes)
}

/// An immutable, shareable codec: a [`Config`] plus the four batch
/// operations and six stream-adapter factories.
///
/// `Codec` is cheap to clone (the underlying `Config` is reference-counted)
/// and, being immutable, safe to share across threads; only the
/// [`StreamEncoder`]/[`StreamDecoder`] instances it hands out are
/// single-owner.
#[derive(Clone)]
pub struct Codec {
    config: Config,
}

impl Codec {
    pub fn new(config: Config) -> Codec {
        Codec { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The canonical block-mode facade, built once on first use.
    pub fn block() -> &'static Codec {
        static BLOCK: OnceLock<Codec> = OnceLock::new();
        BLOCK.get_or_init(|| {
            Codec::new(
                ConfigBuilder::block()
                    .build()
                    .expect("default block configuration is always valid"),
            )
        })
    }

    /// The canonical stream-mode facade, built once on first use.
    pub fn stream() -> &'static Codec {
        static STREAM: OnceLock<Codec> = OnceLock::new();
        STREAM.get_or_init(|| {
            Codec::new(
                ConfigBuilder::stream()
                    .build()
                    .expect("default stream configuration is always valid"),
            )
        })
    }

    /// Encode `bytes`, dispatching to the block or stream engine per
    /// [`Config::mode`], and return the result as a `Vec<u8>`.
    pub fn encode_to_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>, Error> {
        match self.config.mode() {
            Mode::Block => block::encode(&self.config, bytes),
            Mode::Stream => {
                let mut encoder = StreamEncoder::new(self.config.clone(), VecSink::new());
                encoder.write(bytes)?;
                encoder.close()?;
                Ok(encoder.into_inner().into_inner())
            }
        }
    }

    /// Encode `bytes` and return the result as a `String`. Every byte this
    /// crate ever writes is drawn from the alphabet, the terminator, or a
    /// whitespace-only line break, all of which are ASCII, so the
    /// `from_utf8` below can never fail.
    pub fn encode_to_string(&self, bytes: &[u8]) -> Result<String, Error> {
        let encoded = self.encode_to_bytes(bytes)?;
        Ok(String::from_utf8(encoded).expect("radix4 only ever encodes to ASCII"))
    }

    /// Decode `input` (8-bit ASCII encoded bytes), dispatching to the block
    /// or stream engine per [`Config::mode`].
    pub fn decode_from_bytes(&self, input: &[u8]) -> Result<Vec<u8>, Error> {
        match self.config.mode() {
            Mode::Block => block::decode(&self.config, input),
            Mode::Stream => {
                let mut decoder = StreamDecoder::new(self.config.clone(), SliceSource::new(input));
                let mut out = Vec::with_capacity(input.len() * 3 / 4);
                while let Some(b) = decoder.read()? {
                    out.push(b);
                }
                Ok(out)
            }
        }
    }

    /// Decode `input`. Encoded text is always ASCII, so this is equivalent
    /// to [`Self::decode_from_bytes`] on the string's UTF-8 bytes; any
    /// non-ASCII byte (which can only arise from a non-ASCII `char` in the
    /// original string) is rejected as [`Error::InvalidCharacter`] the same
    /// way a raw byte of that value would be.
    pub fn decode_from_string(&self, input: &str) -> Result<Vec<u8>, Error> {
        self.decode_from_bytes(input.as_bytes())
    }

    /// The length [`Self::encode_to_bytes`] would produce for `bytes`,
    /// without performing the encode.
    pub fn compute_encoded_length(&self, bytes: &[u8]) -> Result<usize, Error> {
        compute_encoded_length(&self.config, bytes)
    }

    /// A stream encoder writing into an in-memory buffer, recovered with
    /// `into_inner().into_inner()`.
    pub fn stream_encoder_to_bytes(&self) -> StreamEncoder<VecSink> {
        StreamEncoder::new(self.config.clone(), VecSink::new())
    }

    /// A stream encoder writing through any [`std::io::Write`].
    pub fn stream_encoder_to_writer<W: Write>(&self, writer: W) -> StreamEncoder<WriteSink<W>> {
        StreamEncoder::new(self.config.clone(), WriteSink::new(writer))
    }

    /// A stream encoder appending into a growable `String`.
    pub fn stream_encoder_to_builder(&self) -> StreamEncoder<StringSink> {
        StreamEncoder::new(self.config.clone(), StringSink::new())
    }

    /// A stream decoder pulling encoded bytes from a borrowed slice.
    pub fn stream_decoder_from_bytes<'a>(&self, bytes: &'a [u8]) -> StreamDecoder<SliceSource<'a>> {
        StreamDecoder::new(self.config.clone(), SliceSource::new(bytes))
    }

    /// A stream decoder pulling encoded bytes through any [`std::io::Read`].
    pub fn stream_decoder_from_reader<R: Read>(&self, reader: R) -> StreamDecoder<ReadSource<R>> {
        StreamDecoder::new(self.config.clone(), ReadSource::new(reader))
    }

    /// A stream decoder pulling already-decoded Unicode code points from a
    /// `char` iterator (e.g. `some_str.chars()`).
    pub fn stream_decoder_from_chars<I: Iterator<Item = char>>(
        &self,
        chars: I,
    ) -> StreamDecoder<CharsSource<I>> {
        StreamDecoder::new(self.config.clone(), CharsSource::new(chars))
    }
}

impl From<Config> for Codec {
    fn from(config: Config) -> Codec {
        Codec::new(config)
    }
}
