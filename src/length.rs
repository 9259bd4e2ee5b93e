use crate::config::Config;
use crate::error::Error;
use crate::wrap;

/// Number of radix characters contributed by `remainder` data bytes left
/// over after full triplets: `0 -> 0, 1 -> 2, 2 -> 3`.
#[inline]
fn remainder_chars(remainder: usize) -> usize {
    match remainder {
        0 => 0,
        1 => 2,
        2 => 3,
        _ => unreachable!("remainder of a division by 3 is always 0, 1, or 2"),
    }
}

/// The unwrapped (no line breaks) encoded length for `input_len` bytes of
/// which `r` form the leading radix-free prefix.
pub(crate) fn unwrapped_len(config: &Config, input_len: usize, r: usize) -> Result<usize, Error> {
    let d = input_len - r;
    let rem = d % 3;

    let mut enc = r
        .checked_add((d / 3).checked_mul(4).ok_or(Error::BytesTooLong)?)
        .and_then(|n| n.checked_add(remainder_chars(rem)))
        .ok_or(Error::BytesTooLong)?;

    if config.terminated() {
        enc = enc.checked_add(1).ok_or(Error::BytesTooLong)?;
    }
    if config.optimistic() && (config.terminated() || r < input_len) {
        enc = enc.checked_add(1).ok_or(Error::BytesTooLong)?;
    }

    Ok(enc)
}

/// The final encoded length, including line breaks.
pub(crate) fn encoded_length_with_prefix(
    config: &Config,
    input_len: usize,
    r: usize,
) -> Result<usize, Error> {
    let enc = unwrapped_len(config, input_len, r)?;

    if config.line_length() > 0 && enc > 0 {
        let extra = ((enc - 1) / config.line_length())
            .checked_mul(config.line_break().len())
            .ok_or(Error::BytesTooLong)?;
        enc.checked_add(extra).ok_or(Error::BytesTooLong)
    } else {
        Ok(enc)
    }
}

/// Compute the encoded length of `bytes` under `config`, without performing
/// the encode. Used both as the public `compute_encoded_length` surface and
/// to pre-size the block encoder's output buffer.
pub fn compute_encoded_length(config: &Config, bytes: &[u8]) -> Result<usize, Error> {
    let r = if config.optimistic() {
        config.mapping().radix_free_prefix_len(bytes)
    } else {
        0
    };
    encoded_length_with_prefix(config, bytes.len(), r)
}

/// Total length wrapping would produce over an unwrapped span, exposed for
/// the block encoder (which wraps the whole unwrapped buffer in one pass).
pub(crate) fn wrapped_total_len(config: &Config, unwrapped_len: usize) -> usize {
    if config.line_length() == 0 {
        unwrapped_len
    } else {
        wrap::wrap_parameters(unwrapped_len, config.line_length(), config.line_break().len())
            .total_len
    }
}
