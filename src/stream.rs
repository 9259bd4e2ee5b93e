//! Incremental, single-owner stream encoder/decoder with radix characters
//! interleaved every (up to) three data characters, so a prefix of the
//! output is decodable before the whole input has arrived.

use std::collections::VecDeque;

use crate::config::Config;
use crate::error::Error;
use crate::io::{Sink, Source};
use crate::tables::CharClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Prefix,
    Triple,
}

/// Pushes bytes through the radix-free-prefix/triplet encoding a few at a
/// time, flushing to the underlying [`Sink`] once `Config::buffer_size`
/// bytes have accumulated. The wire format places each group's radix
/// character *before* its (up to three) data characters, so a group's data
/// characters are held in `pending_data` — never pushed to `buf` — until
/// its radix value is known; there is never a reserved-but-unbackfilled
/// slot already sitting in `buf` to worry about flushing early.
pub struct StreamEncoder<S: Sink> {
    config: Config,
    sink: S,
    mode: Mode,
    buf: Vec<u8>,
    col: usize,
    pending_data: [u8; 3],
    pending_len: u8,
    radix_acc: u8,
    closed: bool,
}

impl<S: Sink> StreamEncoder<S> {
    pub fn new(config: Config, sink: S) -> StreamEncoder<S> {
        let mode = if config.optimistic() { Mode::Prefix } else { Mode::Triple };
        StreamEncoder {
            config,
            sink,
            mode,
            buf: Vec::new(),
            col: 0,
            pending_data: [0; 3],
            pending_len: 0,
            radix_acc: 0,
            closed: false,
        }
    }

    fn emit(&mut self, byte: u8) {
        let line_length = self.config.line_length();
        if line_length > 0 && self.col == line_length {
            self.buf.extend_from_slice(self.config.line_break().as_bytes());
            self.col = 0;
        }
        self.buf.push(byte);
        self.col += 1;
    }

    /// Emit the pending group's radix character followed by its (one to
    /// three) already-known data characters, then reset the group.
    fn flush_group(&mut self) {
        if self.pending_len == 0 {
            return;
        }
        self.emit(self.config.alphabet_char(self.radix_acc));
        for i in 0..self.pending_len as usize {
            self.emit(self.pending_data[i]);
        }
        self.radix_acc = 0;
        self.pending_len = 0;
    }

    fn encode_triple_byte(&mut self, byte: u8) {
        let m = self.config.mapping().map_byte(byte);
        let data_char = self.config.alphabet_char(m & 0x3F);
        self.radix_acc |= (m & 0xC0) >> ((self.pending_len as u32 + 1) * 2);
        self.pending_data[self.pending_len as usize] = data_char;
        self.pending_len += 1;
        if self.pending_len == 3 {
            self.flush_group();
        }
    }

    /// Encode `bytes` and push them toward the sink.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if self.closed {
            return Err(Error::StreamClosed);
        }
        for &b in bytes {
            match self.mode {
                Mode::Prefix => {
                    if self.config.mapping().is_radix_free(b) {
                        self.emit(b);
                    } else {
                        self.mode = Mode::Triple;
                        self.emit(self.config.terminator());
                        self.encode_triple_byte(b);
                    }
                }
                Mode::Triple => self.encode_triple_byte(b),
            }
        }
        if self.buf.len() >= self.config.buffer_size() {
            self.flush_buf()?;
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<(), Error> {
        if !self.buf.is_empty() {
            self.sink.write(&self.buf)?;
            self.buf.clear();
        }
        Ok(())
    }

    /// Push any buffered output to the sink and flush the sink itself.
    ///
    /// A pending partial group (`pending_len != 0`) holds its data
    /// characters back in `pending_data`, not yet in `buf`, because its
    /// radix value isn't final — so there's nothing of the pending group to
    /// flush; it is left untouched rather than forced out early. The
    /// underlying sink is flushed unconditionally either way. Call
    /// [`Self::close`] to finalize a trailing partial group.
    pub fn flush(&mut self) -> Result<(), Error> {
        if self.pending_len == 0 {
            self.flush_buf()?;
        }
        self.sink.flush()
    }

    /// Finalize the stream: emit any trailing partial-group radix character
    /// and its data characters, the terminator (if configured), and flush
    /// and close the sink. The encoder may not be written to again
    /// afterward. Idempotent: calling `close` again once already closed is
    /// a no-op (only `write` after close is an error).
    pub fn close(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        self.flush_group();
        // d == 0: the radix-free prefix never transitioned into triplet
        // mode, so the marker that normally doubles as "start of triplet
        // region" was never written. A terminated configuration still
        // needs it, distinct from the final terminator appended below.
        if self.mode == Mode::Prefix && self.config.optimistic() && self.config.terminated() {
            self.emit(self.config.terminator());
        }
        if self.config.terminated() {
            self.emit(self.config.terminator());
        }
        self.flush_buf()?;
        // A terminated stream is self-delimited, so the caller may still
        // want to append further content to the sink after this call —
        // only a non-terminated stream forwards `close`.
        if !self.config.terminated() {
            self.sink.close()?;
        } else {
            self.sink.flush()?;
        }
        self.closed = true;
        Ok(())
    }

    /// Recover the underlying sink. Typically called after [`Self::close`].
    pub fn into_inner(self) -> S {
        self.sink
    }
}

/// Pulls code points from a [`Source`] one at a time and yields decoded
/// bytes one at a time, buffering at most the current (not yet fully
/// known-length) data/radix group — up to three pending 6-bit indices —
/// instead of the whole input.
pub struct StreamDecoder<So: Source> {
    config: Config,
    source: So,
    mode: Mode,
    group: Vec<u8>,
    queue: VecDeque<u8>,
    position: usize,
    done: bool,
}

impl<So: Source> StreamDecoder<So> {
    pub fn new(config: Config, source: So) -> StreamDecoder<So> {
        let mode = if config.optimistic() { Mode::Prefix } else { Mode::Triple };
        StreamDecoder {
            config,
            source,
            mode,
            group: Vec::new(),
            queue: VecDeque::new(),
            position: 0,
            done: false,
        }
    }

    /// Pull and decode as much as needed to yield the next byte, or `None`
    /// at a clean end of stream.
    pub fn read(&mut self) -> Result<Option<u8>, Error> {
        loop {
            if let Some(b) = self.queue.pop_front() {
                return Ok(Some(b));
            }
            if self.done {
                return Ok(None);
            }
            self.pull_one()?;
        }
    }

    /// Resolve the current pending group into decoded bytes, using the
    /// invariant that the first character pulled into a group is its radix
    /// character, followed by one to three data characters:
    /// `( radix_char data_char data_char data_char )*`.
    fn resolve_group(&mut self) -> Result<(), Error> {
        let radix = match self.group.len() {
            0 => return Ok(()),
            1 => return Err(Error::InvalidLength),
            _ => self.group[0],
        };
        let data_count = self.group.len() - 1;
        let mapping = self.config.mapping();
        for k in 0..data_count {
            let top2 = (radix << ((k as u32 + 1) * 2)) & 0xC0;
            self.queue.push_back(mapping.unmap(self.group[1 + k] | top2));
        }
        self.group.clear();
        Ok(())
    }

    fn handle_data(&mut self, index: u8) -> Result<(), Error> {
        match self.mode {
            Mode::Prefix => {
                self.queue.push_back(self.config.mapping().unmap(index));
                Ok(())
            }
            Mode::Triple => {
                self.group.push(index);
                if self.group.len() == 4 {
                    self.resolve_group()
                } else {
                    Ok(())
                }
            }
        }
    }

    fn handle_terminator(&mut self) -> Result<(), Error> {
        match self.mode {
            Mode::Prefix => {
                self.mode = Mode::Triple;
                Ok(())
            }
            Mode::Triple => {
                if !self.config.terminated() {
                    return Err(Error::MisplacedTerminator {
                        index: self.position,
                    });
                }
                self.resolve_group()?;
                self.done = true;
                Ok(())
            }
        }
    }

    fn handle_eos(&mut self) -> Result<(), Error> {
        if self.config.terminated() {
            return Err(Error::UnexpectedEndOfStream);
        }
        if self.mode == Mode::Triple {
            self.resolve_group()?;
        }
        self.done = true;
        Ok(())
    }

    fn pull_one(&mut self) -> Result<(), Error> {
        loop {
            let cp = match self.source.read_next()? {
                Some(cp) => cp,
                None => return self.handle_eos(),
            };

            match self.config.tables().classify(cp) {
                CharClass::Whitespace => continue,
                CharClass::Invalid => {
                    return Err(Error::InvalidCharacter {
                        index: self.position,
                        byte: cp,
                    })
                }
                CharClass::Terminator => {
                    let result = self.handle_terminator();
                    self.position += 1;
                    return result;
                }
                CharClass::Data(index) => {
                    let result = self.handle_data(index);
                    self.position += 1;
                    return result;
                }
            }
        }
    }
}
