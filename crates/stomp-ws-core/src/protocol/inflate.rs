//! Bounded zlib inflater for compressed frame bodies.
//!
//! The body must be a complete zlib stream: running out of input before the
//! stream-end marker is an error, not a partial result. Output is capped so a
//! tiny payload cannot expand without limit.

use flate2::{Decompress, FlushDecompress, Status};

use crate::error::{Result, StompWsError};

/// Growth step when the output buffer is full.
const MIN_GROW: usize = 4096;

/// Inflate a zlib-wrapped DEFLATE stream, reading until stream end.
///
/// Bytes after the stream-end marker are ignored.
pub fn inflate_zlib(input: &[u8], max_size: usize) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let initial_cap = input
        .len()
        .saturating_mul(4)
        .max(1024)
        .min(max_size.saturating_add(1));
    let mut output: Vec<u8> = Vec::with_capacity(initial_cap);

    loop {
        if output.len() == output.capacity() {
            // one byte past the cap is enough to detect overflow
            let headroom = max_size.saturating_sub(output.len()).saturating_add(1);
            output.reserve(output.capacity().max(MIN_GROW).min(headroom));
        }

        let before_in = inflater.total_in();
        let before_out = inflater.total_out();
        let rest = input.get(before_in as usize..).unwrap_or(&[]);

        let status = inflater
            .decompress_vec(rest, &mut output, FlushDecompress::None)
            .map_err(|e| StompWsError::Decompression(format!("inflate error: {e}")))?;

        if output.len() > max_size {
            return Err(too_large(max_size));
        }

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                let progressed =
                    inflater.total_in() != before_in || inflater.total_out() != before_out;
                if !progressed {
                    return Err(StompWsError::Decompression(
                        "truncated stream: input ended before stream end".into(),
                    ));
                }
            }
        }
    }

    let trailing = input.len().saturating_sub(inflater.total_in() as usize);
    if trailing > 0 {
        tracing::trace!(trailing, "ignoring bytes after zlib stream end");
    }

    Ok(output)
}

fn too_large(max_size: usize) -> StompWsError {
    StompWsError::Decompression(format!("inflated body exceeds {max_size} bytes"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Write;

    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    use super::*;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn inflates_beyond_initial_capacity() {
        let big = vec![b'a'; 200_000];
        let out = inflate_zlib(&zlib(&big), 1 << 20).unwrap();
        assert_eq!(out, big);
    }

    #[test]
    fn rejects_output_over_limit() {
        let big = vec![b'z'; 10_000];
        let err = inflate_zlib(&zlib(&big), 4096).unwrap_err();
        assert_eq!(err.kind().as_str(), "DECOMPRESSION");
    }

    #[test]
    fn exact_limit_is_allowed() {
        let data = vec![b'q'; 4096];
        assert_eq!(inflate_zlib(&zlib(&data), 4096).unwrap(), data);
    }

    #[test]
    fn empty_input_is_truncated() {
        let err = inflate_zlib(&[], 1024).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut buf = zlib(b"payload");
        buf.extend_from_slice(b"junk");
        assert_eq!(inflate_zlib(&buf, 1024).unwrap(), b"payload");
    }
}
