//! Whitespace-separated decimal token primitives.
//!
//! The replay wire format is mostly textual: integers are written as decimal
//! tokens, each followed by exactly one ASCII space. The single raw binary
//! region (the packed map block) relies on that discipline — the reader
//! consumes the one separator byte that terminates a token, so raw bytes can
//! follow a token directly with no further framing.
//!
//! All functions operate on `&mut dyn Read` / `&mut dyn Write` so callers
//! can use `&[u8]`, `Vec<u8>`, or buffered files interchangeably.

use std::fmt;
use std::io::{self, Read, Write};

/// Errors from the token layer.
#[derive(Debug)]
pub enum TokenError {
    /// An I/O error from the underlying stream.
    Io(io::Error),
    /// The stream ended where a token was expected.
    UnexpectedEof,
    /// A byte that is neither a digit nor a separator appeared in a token.
    UnexpectedByte {
        /// The offending byte.
        found: u8,
    },
    /// The token does not fit in the requested integer type.
    Overflow,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "unexpected end of stream in token"),
            Self::UnexpectedByte { found } => {
                write!(f, "unexpected byte {found:#04x} in integer token")
            }
            Self::Overflow => write!(f, "integer token out of range"),
        }
    }
}

impl std::error::Error for TokenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TokenError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Read one byte, retrying on `Interrupted`. `None` means end of stream.
fn read_byte(r: &mut dyn Read) -> Result<Option<u8>, TokenError> {
    let mut buf = [0u8; 1];
    loop {
        match r.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(TokenError::Io(e)),
        }
    }
}

/// Write a decimal token followed by its single-space separator.
pub fn write_int(w: &mut dyn Write, v: i64) -> Result<(), TokenError> {
    write!(w, "{v} ")?;
    Ok(())
}

/// Read a decimal token as an `i64`.
///
/// Skips leading ASCII whitespace, accepts an optional `-` sign, and
/// consumes the single whitespace byte that terminates the token (end of
/// stream also terminates it). The full `i64` range round-trips.
pub fn read_int(r: &mut dyn Read) -> Result<i64, TokenError> {
    let mut b = loop {
        match read_byte(r)? {
            None => return Err(TokenError::UnexpectedEof),
            Some(c) if c.is_ascii_whitespace() => continue,
            Some(c) => break c,
        }
    };

    let negative = b == b'-';
    if negative {
        b = match read_byte(r)? {
            None => return Err(TokenError::UnexpectedEof),
            Some(c) => c,
        };
    }
    if !b.is_ascii_digit() {
        return Err(TokenError::UnexpectedByte { found: b });
    }

    // Accumulate toward the sign so i64::MIN parses without overflow.
    let mut value: i64 = 0;
    loop {
        let digit = i64::from(b - b'0');
        value = value
            .checked_mul(10)
            .and_then(|v| {
                if negative {
                    v.checked_sub(digit)
                } else {
                    v.checked_add(digit)
                }
            })
            .ok_or(TokenError::Overflow)?;
        match read_byte(r)? {
            None => break,
            Some(c) if c.is_ascii_whitespace() => break,
            Some(c) if c.is_ascii_digit() => b = c,
            Some(c) => return Err(TokenError::UnexpectedByte { found: c }),
        }
    }
    Ok(value)
}

/// Read a decimal token as an `i32`, failing with [`TokenError::Overflow`]
/// if it does not fit.
pub fn read_i32(r: &mut dyn Read) -> Result<i32, TokenError> {
    i32::try_from(read_int(r)?).map_err(|_| TokenError::Overflow)
}

/// Read a decimal token as a `u32`, failing with [`TokenError::Overflow`]
/// on negative or oversized values.
pub fn read_u32(r: &mut dyn Read) -> Result<u32, TokenError> {
    u32::try_from(read_int(r)?).map_err(|_| TokenError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_token_roundtrip() {
        let mut buf = Vec::new();
        write_int(&mut buf, 42).unwrap();
        assert_eq!(buf, b"42 ");
        assert_eq!(read_int(&mut buf.as_slice()).unwrap(), 42);
    }

    #[test]
    fn token_sequence_roundtrip() {
        let mut buf = Vec::new();
        for v in [0, -7, 123_456, i64::MAX, i64::MIN] {
            write_int(&mut buf, v).unwrap();
        }
        let mut r = buf.as_slice();
        assert_eq!(read_int(&mut r).unwrap(), 0);
        assert_eq!(read_int(&mut r).unwrap(), -7);
        assert_eq!(read_int(&mut r).unwrap(), 123_456);
        assert_eq!(read_int(&mut r).unwrap(), i64::MAX);
        assert_eq!(read_int(&mut r).unwrap(), i64::MIN);
    }

    #[test]
    fn separator_is_consumed_before_raw_bytes() {
        // A raw binary region can start right after a token's separator.
        let mut buf = Vec::new();
        write_int(&mut buf, 7).unwrap();
        buf.extend_from_slice(&[0xFF, 0x20, 0x00]);

        let mut r = buf.as_slice();
        assert_eq!(read_int(&mut r).unwrap(), 7);
        let mut raw = [0u8; 3];
        r.read_exact(&mut raw).unwrap();
        assert_eq!(raw, [0xFF, 0x20, 0x00]);
    }

    #[test]
    fn leading_whitespace_is_skipped() {
        let mut r = b"  \n\t 99 ".as_slice();
        assert_eq!(read_int(&mut r).unwrap(), 99);
    }

    #[test]
    fn token_at_eof_without_separator_parses() {
        let mut r = b"314".as_slice();
        assert_eq!(read_int(&mut r).unwrap(), 314);
    }

    #[test]
    fn empty_stream_is_unexpected_eof() {
        let mut r = b"".as_slice();
        assert!(matches!(read_int(&mut r), Err(TokenError::UnexpectedEof)));
        let mut r = b"   ".as_slice();
        assert!(matches!(read_int(&mut r), Err(TokenError::UnexpectedEof)));
    }

    #[test]
    fn bare_sign_is_unexpected_eof() {
        let mut r = b"-".as_slice();
        assert!(matches!(read_int(&mut r), Err(TokenError::UnexpectedEof)));
    }

    #[test]
    fn non_digit_rejected() {
        let mut r = b"abc ".as_slice();
        assert!(matches!(
            read_int(&mut r),
            Err(TokenError::UnexpectedByte { found: b'a' })
        ));
        let mut r = b"12x ".as_slice();
        assert!(matches!(
            read_int(&mut r),
            Err(TokenError::UnexpectedByte { found: b'x' })
        ));
    }

    #[test]
    fn oversized_token_overflows() {
        let mut r = b"99999999999999999999 ".as_slice();
        assert!(matches!(read_int(&mut r), Err(TokenError::Overflow)));
    }

    #[test]
    fn narrow_reads_range_check() {
        let mut buf = Vec::new();
        write_int(&mut buf, i64::from(i32::MAX) + 1).unwrap();
        assert!(matches!(
            read_i32(&mut buf.as_slice()),
            Err(TokenError::Overflow)
        ));

        let mut buf = Vec::new();
        write_int(&mut buf, -1).unwrap();
        assert!(matches!(
            read_u32(&mut buf.as_slice()),
            Err(TokenError::Overflow)
        ));
    }

    proptest! {
        #[test]
        fn roundtrip_any_i64(v in any::<i64>()) {
            let mut buf = Vec::new();
            write_int(&mut buf, v).unwrap();
            prop_assert_eq!(read_int(&mut buf.as_slice()).unwrap(), v);
        }

        #[test]
        fn roundtrip_any_sequence(vs in prop::collection::vec(any::<i64>(), 0..32)) {
            let mut buf = Vec::new();
            for &v in &vs {
                write_int(&mut buf, v).unwrap();
            }
            let mut r = buf.as_slice();
            for &v in &vs {
                prop_assert_eq!(read_int(&mut r).unwrap(), v);
            }
        }
    }
}
