use std::sync::Arc;

use crate::error::Error;
use crate::mapping::Mapping;
use crate::tables::{Tables, WhitespaceSet};
use crate::wrap::LineBreak;

/// Whether a [`Config`] dispatches to the block or the stream engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Block,
    Stream,
}

struct Inner {
    mapping: Mapping,
    tables: Tables,
    whitespace: WhitespaceSet,
    terminator: u8,
    line_length: usize,
    line_break: LineBreak,
    mode: Mode,
    optimistic: bool,
    terminated: bool,
    buffer_size: usize,
}

/// An immutable, cheaply-cloneable codec configuration.
///
/// Produced only by [`ConfigBuilder::build`] after its invariants are
/// checked; safe to share across threads — no interior mutability, no
/// locks needed.
#[derive(Clone)]
pub struct Config {
    inner: Arc<Inner>,
}

impl Config {
    pub fn mapping(&self) -> &Mapping {
        &self.inner.mapping
    }

    pub fn tables(&self) -> &Tables {
        &self.inner.tables
    }

    pub fn whitespace(&self) -> &WhitespaceSet {
        &self.inner.whitespace
    }

    pub fn terminator(&self) -> u8 {
        self.inner.terminator
    }

    pub fn line_length(&self) -> usize {
        self.inner.line_length
    }

    pub fn line_break(&self) -> &LineBreak {
        &self.inner.line_break
    }

    pub fn mode(&self) -> Mode {
        self.inner.mode
    }

    pub fn optimistic(&self) -> bool {
        self.inner.optimistic
    }

    pub fn terminated(&self) -> bool {
        self.inner.terminated
    }

    pub fn buffer_size(&self) -> usize {
        self.inner.buffer_size
    }

    #[inline]
    pub fn alphabet_char(&self, index: u8) -> u8 {
        self.inner.mapping.alphabet_char(index)
    }
}

/// A validating builder for [`Config`], the Rust analogue of the source
/// library's configuration builder.
pub struct ConfigBuilder {
    mapping: Mapping,
    whitespace: Vec<u8>,
    terminator: u8,
    line_length: usize,
    line_break: Vec<u8>,
    mode: Mode,
    optimistic: bool,
    terminated: bool,
    buffer_size: usize,
}

const DEFAULT_TERMINATOR: u8 = b'.';
const DEFAULT_BUFFER_SIZE: usize = 1024;

impl ConfigBuilder {
    fn defaults(mode: Mode) -> ConfigBuilder {
        ConfigBuilder {
            mapping: Mapping::default_mapping(),
            whitespace: b"\r\n\t ".to_vec(),
            terminator: DEFAULT_TERMINATOR,
            line_length: 0,
            line_break: b"\n".to_vec(),
            mode,
            optimistic: true,
            terminated: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Start from the default block-mode configuration.
    pub fn block() -> ConfigBuilder {
        ConfigBuilder::defaults(Mode::Block)
    }

    /// Start from the default stream-mode configuration.
    pub fn stream() -> ConfigBuilder {
        ConfigBuilder::defaults(Mode::Stream)
    }

    /// Start from an existing configuration snapshot.
    pub fn from_config(config: &Config) -> ConfigBuilder {
        ConfigBuilder {
            mapping: config.inner.mapping.clone(),
            whitespace: config.inner.whitespace.as_bytes().to_vec(),
            terminator: config.inner.terminator,
            line_length: config.inner.line_length,
            line_break: config.inner.line_break.as_bytes().to_vec(),
            mode: config.inner.mode,
            optimistic: config.inner.optimistic,
            terminated: config.inner.terminated,
            buffer_size: config.inner.buffer_size,
        }
    }

    pub fn mapping(mut self, mapping: Mapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn whitespace(mut self, whitespace: impl Into<Vec<u8>>) -> Self {
        self.whitespace = whitespace.into();
        self
    }

    pub fn terminator(mut self, terminator: u8) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn line_length(mut self, line_length: usize) -> Self {
        self.line_length = line_length;
        self
    }

    pub fn line_break(mut self, line_break: impl Into<Vec<u8>>) -> Self {
        self.line_break = line_break.into();
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn optimistic(mut self, optimistic: bool) -> Self {
        self.optimistic = optimistic;
        self
    }

    pub fn terminated(mut self, terminated: bool) -> Self {
        self.terminated = terminated;
        self
    }

    /// Stream-encoder internal buffer size. Rounded up to a multiple of 4
    /// at build time so a reserved radix slot is never flushed
    /// before it can be backfilled.
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn build(self) -> Result<Config, Error> {
        let whitespace = WhitespaceSet::new(&self.whitespace)?;

        if self.line_break.is_empty() || !self.line_break.iter().all(|&b| whitespace.contains(b)) {
            return Err(Error::InvalidLineBreak);
        }

        let alphabet = &self.mapping.decmap()[..64];
        if alphabet.contains(&self.terminator) || whitespace.contains(self.terminator) {
            return Err(Error::InvalidTerminator);
        }
        if alphabet.iter().any(|&b| whitespace.contains(b)) {
            return Err(Error::InvalidWhitespace);
        }

        let tables = Tables::build(&self.mapping, &whitespace, self.terminator);

        let buffer_size = if self.buffer_size == 0 {
            4
        } else {
            (self.buffer_size + 3) & !3
        };

        Ok(Config {
            inner: Arc::new(Inner {
                mapping: self.mapping,
                tables,
                whitespace,
                terminator: self.terminator,
                line_length: self.line_length,
                line_break: LineBreak::new_unchecked(self.line_break),
                mode: self.mode,
                optimistic: self.optimistic,
                terminated: self.terminated,
                buffer_size,
            }),
        })
    }
}
