//! Single-pass, array-to-array block encode/decode with tail-grouped radix
//! characters.

use crate::config::Config;
use crate::error::Error;
use crate::length;
use crate::tables::CharClass;
use crate::wrap;

/// Encode `bytes` into a freshly allocated `Vec<u8>`.
pub fn encode(config: &Config, bytes: &[u8]) -> Result<Vec<u8>, Error> {
    let r = if config.optimistic() {
        config.mapping().radix_free_prefix_len(bytes)
    } else {
        0
    };
    let unwrapped = length::unwrapped_len(config, bytes.len(), r)?;
    let total = length::wrapped_total_len(config, unwrapped);

    let mut out = vec![0u8; total];
    encode_unwrapped(config, bytes, r, &mut out[..unwrapped]);

    if config.line_length() > 0 {
        wrap::insert_line_breaks(
            &mut out,
            unwrapped,
            config.line_length(),
            config.line_break().as_bytes(),
        );
    }

    Ok(out)
}

/// Fill `out` (sized exactly to the unwrapped encoded length) with the
/// fixed-layout block encoding:
/// `[ prefix(R) ][ marker? ][ data(D) ][ radix(ceil(D/3)) ][ terminator? ]`.
fn encode_unwrapped(config: &Config, bytes: &[u8], r: usize, out: &mut [u8]) {
    let mapping = config.mapping();
    let n = bytes.len();
    let d = n - r;

    for (i, &b) in bytes[..r].iter().enumerate() {
        out[i] = config.alphabet_char(mapping.map_byte(b) & 0x3F);
    }

    let marker = config.optimistic() && (config.terminated() || d > 0);
    let data_start = r + if marker { 1 } else { 0 };
    if marker {
        out[r] = config.terminator();
    }

    let radix_chars = (d + 2) / 3;
    let radix_start = data_start + d;

    let remaining = &bytes[r..];
    let mut radix_acc: u8 = 0;
    let mut triplet_pos: u32 = 0;
    let mut radix_cursor = radix_start;

    for (k, &b) in remaining.iter().enumerate() {
        let m = mapping.map_byte(b);
        out[data_start + k] = config.alphabet_char(m & 0x3F);
        radix_acc |= (m & 0xC0) >> ((triplet_pos + 1) * 2);
        triplet_pos += 1;
        if triplet_pos == 3 {
            out[radix_cursor] = config.alphabet_char(radix_acc);
            radix_cursor += 1;
            radix_acc = 0;
            triplet_pos = 0;
        }
    }
    if triplet_pos != 0 {
        out[radix_cursor] = config.alphabet_char(radix_acc);
        radix_cursor += 1;
    }
    debug_assert_eq!(radix_cursor, radix_start + radix_chars);

    if config.terminated() {
        *out.last_mut().expect("terminated output is never empty") = config.terminator();
    }
}

/// Decode `input` (8-bit ASCII bytes) into a freshly allocated `Vec<u8>`.
pub fn decode(config: &Config, input: &[u8]) -> Result<Vec<u8>, Error> {
    for (index, &b) in input.iter().enumerate() {
        if b >= 0x80 {
            return Err(Error::InvalidCharacter {
                index,
                byte: b as u32,
            });
        }
    }

    let body_owned;
    let body: &[u8] = if config.whitespace().as_bytes().is_empty() {
        input
    } else {
        body_owned = input
            .iter()
            .copied()
            .filter(|&b| !config.whitespace().contains(b))
            .collect::<Vec<u8>>();
        &body_owned
    };

    let mut body_len = body.len();

    if config.terminated() {
        if body_len == 0 || body[body_len - 1] != config.terminator() {
            return Err(Error::MissingTerminator);
        }
        body_len -= 1;
    }
    let body = &body[..body_len];

    let (first_radix, term_len) = if config.optimistic() {
        match body.iter().rposition(|&b| b == config.terminator()) {
            // The marker is the very last character: the data/radix region
            // it would introduce is empty, so it was superfluous. Drop it
            // from the body entirely rather than counting it as a
            // consumed marker.
            Some(p) if p == body_len.saturating_sub(1) => {
                body_len = p;
                (p, 0)
            }
            Some(p) => (p, 1),
            None => (body_len, 0),
        }
    } else {
        (0, 0)
    };
    let body = &body[..body_len];

    let d_chars = body_len - first_radix - term_len;
    if d_chars % 4 == 1 {
        return Err(Error::InvalidLength);
    }

    let denc = (d_chars / 4) * 3
        + match d_chars % 4 {
            0 => 0,
            2 => 1,
            3 => 2,
            _ => unreachable!("validated above"),
        };

    let mut out = vec![0u8; first_radix + denc];
    let tables = config.tables();
    let mapping = config.mapping();

    for i in 0..first_radix {
        match tables.classify(body[i] as u32) {
            CharClass::Data(index) => out[i] = mapping.unmap(index),
            CharClass::Terminator => return Err(Error::MisplacedTerminator { index: i }),
            _ => {
                return Err(Error::InvalidCharacter {
                    index: i,
                    byte: body[i] as u32,
                })
            }
        }
    }

    let data_start = first_radix + term_len;
    let radix_start = data_start + denc;
    let mut radix_cursor = radix_start;
    let mut radix_val: u8 = 0;

    for k in 0..denc {
        if k % 3 == 0 {
            radix_val = match tables.classify(body[radix_cursor] as u32) {
                CharClass::Data(index) => index,
                CharClass::Terminator => {
                    return Err(Error::MisplacedTerminator {
                        index: radix_cursor,
                    })
                }
                _ => {
                    return Err(Error::InvalidCharacter {
                        index: radix_cursor,
                        byte: body[radix_cursor] as u32,
                    })
                }
            };
            radix_cursor += 1;
        }

        let data_index = match tables.classify(body[data_start + k] as u32) {
            CharClass::Data(index) => index,
            CharClass::Terminator => {
                return Err(Error::MisplacedTerminator {
                    index: data_start + k,
                })
            }
            _ => {
                return Err(Error::InvalidCharacter {
                    index: data_start + k,
                    byte: body[data_start + k] as u32,
                })
            }
        };

        let triplet_pos = k % 3;
        let top2 = (radix_val << ((triplet_pos as u32 + 1) * 2)) & 0xC0;
        out[first_radix + k] = mapping.unmap(data_index | top2);
    }

    Ok(out)
}
