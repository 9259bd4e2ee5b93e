//! Line-break insertion.
//!
//! Two-phase strategy: encode unwrapped, then spread line breaks into
//! place with in-place `ptr::copy` shifts, working from the end of the
//! buffer backward so each move only has to account for separators not
//! yet written. The separator is an arbitrary whitespace-only byte string,
//! not just LF/CRLF.

use std::ptr;

use num::ToPrimitive;

/// A validated, non-empty, whitespace-only line-break separator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineBreak {
    bytes: Vec<u8>,
}

impl LineBreak {
    pub(crate) fn new_unchecked(bytes: Vec<u8>) -> LineBreak {
        LineBreak { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Default for LineBreak {
    fn default() -> Self {
        LineBreak::new_unchecked(vec![b'\n'])
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct WrapParameters {
    /// number of lines that need a separator after them
    pub lines_with_seps: usize,
    /// length of the last line (never gets a separator)
    pub last_line_len: usize,
    /// length of all full lines plus their separators
    pub total_full_wrapped_lines_len: usize,
    /// length of the whole wrapped output
    pub total_len: usize,
    /// length contributed by separators alone
    pub total_sep_len: usize,
}

/// Compute how many lines, and of what lengths, `input_len` unwrapped bytes
/// will occupy once wrapped at `line_len` with a `sep_len`-byte separator.
/// Assumes the last line never gets a trailing separator, even if it is a
/// full line.
pub fn wrap_parameters(input_len: usize, line_len: usize, sep_len: usize) -> WrapParameters {
    if input_len <= line_len {
        return WrapParameters {
            lines_with_seps: 0,
            last_line_len: input_len,
            total_full_wrapped_lines_len: 0,
            total_len: input_len,
            total_sep_len: 0,
        };
    }

    let (lines_with_seps, last_line_len) = if input_len % line_len > 0 {
        (input_len / line_len, input_len % line_len)
    } else {
        (input_len / line_len - 1, line_len)
    };

    let single_full_line_with_sep = line_len
        .checked_add(sep_len)
        .expect("line length with separator exceeds usize");
    let total_full_wrapped_lines_len = lines_with_seps
        .checked_mul(single_full_line_with_sep)
        .expect("full lines with separators length exceeds usize");
    let total_len = total_full_wrapped_lines_len
        .checked_add(last_line_len)
        .expect("total wrapped length exceeds usize");
    let total_sep_len = lines_with_seps
        .checked_mul(sep_len)
        .expect("total separator length exceeds usize");

    WrapParameters {
        lines_with_seps,
        last_line_len,
        total_full_wrapped_lines_len,
        total_len,
        total_sep_len,
    }
}

/// Insert `sep` after every complete `line_len`-byte line of the first
/// `input_len` bytes of `buf`, in place, shifting content down to make room.
/// `buf` must already be at least `wrap_parameters(input_len, line_len,
/// sep.len()).total_len` bytes long. Returns the number of separator bytes
/// written. The last line never receives a trailing separator.
pub fn insert_line_breaks(buf: &mut [u8], input_len: usize, line_len: usize, sep: &[u8]) -> usize {
    let params = wrap_parameters(input_len, line_len, sep.len());

    assert!(
        buf.len() >= params.total_len,
        "buffer must be able to hold the wrapped data"
    );

    if params.lines_with_seps == 0 {
        return 0;
    }

    // Move the last (separator-less) line into its final position first.
    unsafe {
        let last_line_start = params
            .lines_with_seps
            .checked_mul(line_len)
            .and_then(|o| o.to_isize())
            .map(|o| buf.as_ptr().offset(o))
            .expect("start of last line exceeds isize");
        let new_line_start = params
            .total_full_wrapped_lines_len
            .to_isize()
            .map(|o| buf.as_mut_ptr().offset(o))
            .expect("full wrapped lines length exceeds isize");

        ptr::copy(last_line_start, new_line_start, params.last_line_len);
    }

    let mut sep_bytes_written = 0;
    let line_len_isize = line_len.to_isize().expect("line_len must fit in isize");

    for line_num in 0..params.lines_with_seps {
        let lines_before_this_line = params.lines_with_seps - 1 - line_num;
        let line_start_offset = lines_before_this_line
            .checked_mul(line_len)
            .and_then(|o| o.to_isize())
            .expect("line start offset exceeds isize");
        let seps_before_this_line = lines_before_this_line
            .checked_mul(sep.len())
            .and_then(|o| o.to_isize())
            .expect("cumulative separator length exceeds isize");

        unsafe {
            let orig_line_start = buf.as_ptr().offset(line_start_offset);
            let new_line_start = buf
                .as_mut_ptr()
                .offset(line_start_offset)
                .offset(seps_before_this_line);

            ptr::copy(orig_line_start, new_line_start, line_len);
            ptr::copy_nonoverlapping(
                sep.as_ptr(),
                new_line_start.offset(line_len_isize),
                sep.len(),
            );
        }
        sep_bytes_written += sep.len();
    }

    assert_eq!(params.total_sep_len, sep_bytes_written);

    sep_bytes_written
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn params_perfect_multiple_of_line_length() {
        let params = wrap_parameters(100, 20, 1);
        assert_eq!(
            WrapParameters {
                lines_with_seps: 4,
                last_line_len: 20,
                total_full_wrapped_lines_len: 84,
                total_len: 104,
                total_sep_len: 4,
            },
            params
        );
    }

    #[test]
    fn params_partial_last_line_two_byte_sep() {
        let params = wrap_parameters(103, 20, 2);
        assert_eq!(
            WrapParameters {
                lines_with_seps: 5,
                last_line_len: 3,
                total_full_wrapped_lines_len: 110,
                total_len: 113,
                total_sep_len: 10,
            },
            params
        );
    }

    #[test]
    fn params_line_len_longer_than_input() {
        let params = wrap_parameters(100, 200, 2);
        assert_eq!(
            WrapParameters {
                lines_with_seps: 0,
                last_line_len: 100,
                total_full_wrapped_lines_len: 0,
                total_len: 100,
                total_sep_len: 0,
            },
            params
        );
    }

    #[test]
    fn params_line_len_equal_to_input() {
        let params = wrap_parameters(100, 100, 2);
        assert_eq!(
            WrapParameters {
                lines_with_seps: 0,
                last_line_len: 100,
                total_full_wrapped_lines_len: 0,
                total_len: 100,
                total_sep_len: 0,
            },
            params
        );
    }

    fn do_wrap(buf: &mut Vec<u8>, line_len: usize, sep: &[u8]) -> usize {
        let orig_len = buf.len();
        buf.reserve(orig_len * 2 + sep.len());
        let target = buf.len() + orig_len * 2 + sep.len();
        buf.resize(target, 0);

        let bytes_written = insert_line_breaks(buf, orig_len, line_len, sep);

        buf.truncate(orig_len + bytes_written);
        bytes_written
    }

    #[test]
    fn wrap_length_1() {
        let mut buf = vec![0x1, 0x2, 0x3, 0x4];
        do_wrap(&mut buf, 1, b"\n");
        assert_eq!(vec![0x1, b'\n', 0x2, b'\n', 0x3, b'\n', 0x4], buf);
    }

    #[test]
    fn wrap_length_1_multi_byte_sep() {
        let mut buf = vec![0x1, 0x2, 0x3, 0x4];
        do_wrap(&mut buf, 1, b"\r\n");
        assert_eq!(
            vec![0x1, b'\r', b'\n', 0x2, b'\r', b'\n', 0x3, b'\r', b'\n', 0x4],
            buf
        );
    }

    #[test]
    fn wrap_length_2_partial_line() {
        let mut buf = vec![0x1, 0x2, 0x3, 0x4, 0x5];
        do_wrap(&mut buf, 2, b"\n");
        assert_eq!(vec![0x1, 0x2, b'\n', 0x3, 0x4, b'\n', 0x5], buf);
    }

    #[test]
    fn wrap_random_round_trips() {
        let mut rng = rand::thread_rng();
        let mut buf: Vec<u8> = Vec::new();

        for _ in 0..2_000 {
            buf.clear();
            let buf_len = rng.gen_range(10..1000);
            let line_len = rng.gen_range(10..100);
            let sep: &[u8] = if rng.gen() { b"\n" } else { b"\r\n" };

            for _ in 0..buf_len {
                buf.push(rng.gen());
            }

            let params = wrap_parameters(buf_len, line_len, sep.len());
            let unwrapped = buf.clone();

            let sep_bytes = do_wrap(&mut buf, line_len, sep);

            assert_eq!(buf_len + params.lines_with_seps * sep.len(), buf.len());
            assert_eq!(params.total_len, buf.len());
            assert_eq!(params.total_sep_len, sep_bytes);

            for line_num in 0..params.lines_with_seps {
                let offset = (line_num + 1) * line_len;
                for _ in 0..sep.len() {
                    buf.remove(offset);
                }
            }

            assert_eq!(unwrapped, buf);
        }
    }
}
