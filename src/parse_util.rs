use std::str::FromStr;
use std::str::Utf8Error;

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unexpected end of file, expected '{exp}'")]
    UnexpectedEof { exp: char },

    #[error("Expected '{exp}', but got '{got}'")]
    UnexpectedToken { exp: char, got: char },

    #[error("Expected \"{exp}\", but got \"{got}\"")]
    UnexpectedSlice { exp: String, got: String },
}

/// Consumes the slice until a non-ascii whitespace character is reached.
pub fn take_ws(bytes: &[u8]) -> &[u8] {
    let i = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());

    &bytes[i..]
}

/// Like `take_ws` but stops at a linebreak or non-ascii whitespace character. Returns whether any
/// bytes were consumed.
///
/// A linebreak is any of
/// * `\n`
/// * `\r`
/// * `\r\n`
///
/// This function completely consumes the linebreak.
pub fn take_ws_line(bytes: &[u8]) -> (bool, &[u8]) {
    let mut i = bytes.len();

    for (j, b) in bytes.iter().enumerate() {
        match b {
            b'\n' => {
                i = j + 1;

                break;
            }
            b'\r' => {
                if let Some(b'\n') = peek_1(&bytes[j + 1..]) {
                    i = j + 2;
                } else {
                    i = j + 1;
                }

                break;
            }
            w if w.is_ascii_whitespace() => {}
            _ => {
                i = j;

                break;
            }
        }
    }

    let bytes = &bytes[i..];
    let consumed = i != 0;

    (consumed, bytes)
}

/// Like `take_ws_line` but consumes as many blank lines as possible
pub fn take_ws_lines(mut bytes: &[u8]) -> &[u8] {
    while let (true, rest) = take_ws_line(bytes) {
        bytes = rest;
    }

    bytes
}

/// Split off the current line and consume its linebreak. The returned line has no `\n` and no
/// trailing `\r`. At the end of input, the whole slice is the line.
pub fn take_line(bytes: &[u8]) -> (&[u8], &[u8]) {
    let (line, rest) = match bytes.iter().position(|&b| b == b'\n') {
        Some(i) => (&bytes[..i], &bytes[i + 1..]),
        None => (bytes, &bytes[bytes.len()..]),
    };

    (line.strip_suffix(b"\r").unwrap_or(line), rest)
}

/// Takes the next character from the slice. If none is found, the slice is left as-is.
pub const fn take_1(bytes: &[u8]) -> (Option<u8>, &[u8]) {
    let [b, bytes @ ..] = bytes else {
        return (None, bytes);
    };

    (Some(*b), bytes)
}

/// Like `take_1`, but doesn't consume the token
pub fn peek_1(bytes: &[u8]) -> Option<u8> {
    bytes.first().copied()
}

/// Expects the next character in `bytes` to be `b`. Otherwise leaves `bytes` unchanged.
pub fn expect(b: u8, bytes: &[u8]) -> ParseResult<&[u8]> {
    let (Some(a), bytes) = take_1(bytes) else {
        return Err(ParseError::UnexpectedEof { exp: b as char });
    };

    if a != b {
        return Err(ParseError::UnexpectedToken {
            exp: b as char,
            got: a as char,
        });
    }

    Ok(bytes)
}

/// Expects `bytes` to start with `bs`. Otherwise leaves `bytes` unchanged.
pub fn expect_slice<'a>(bs: &[u8], bytes: &'a [u8]) -> ParseResult<&'a [u8]> {
    if let Some(rest) = bytes.strip_prefix(bs) {
        return Ok(rest);
    }

    let n = bs.len().min(bytes.len());

    Err(ParseError::UnexpectedSlice {
        exp: String::from_utf8_lossy(bs).to_string(),
        got: String::from_utf8_lossy(&bytes[..n]).to_string(),
    })
}

/// Advance the slice until `P` is satisfied, without consuming the byte that satisfied it.
///
/// Returns `None` and leaves `bytes` as-is if nothing would be taken, that is if `P` holds for
/// the first byte or for no byte at all.
#[inline]
pub fn take_until_fn<P>(p: P, bytes: &[u8]) -> (Option<&[u8]>, &[u8])
where
    P: Fn(u8) -> bool,
{
    match bytes.iter().position(|&a| p(a)) {
        None | Some(0) => (None, bytes),
        Some(i) => {
            let (res, bytes) = bytes.split_at(i);

            (Some(res), bytes)
        }
    }
}

/// Advance the slice until byte `b` is found, without consuming it.
///
/// If `b` is never found, `bytes` is left as-is.
pub fn take_until(b: u8, bytes: &[u8]) -> (Option<&[u8]>, &[u8]) {
    take_until_fn(|a| a == b, bytes)
}

/// Like `take_until`, but also consumes `b` without adding it to the output.
pub fn take_with(b: u8, bytes: &[u8]) -> (Option<&[u8]>, &[u8]) {
    let (Some(res), bytes) = take_until(b, bytes) else {
        return (None, bytes);
    };

    let (_, bytes) = take_1(bytes);

    (Some(res), bytes)
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Error parsing bytes from UTF-8: {0}")]
    InvalidUTF8(#[from] Utf8Error),

    #[error("Failed to convert \"{str}\"")]
    ParseError { str: String },
}

/// Converts `&[u8]` to `T` if `T: FromStr`. Surrounding ascii whitespace is ignored.
pub fn convert<T: FromStr>(bytes: &[u8]) -> Result<T, ConvertError> {
    let str = std::str::from_utf8(bytes.trim_ascii())?;

    let Ok(res) = str.parse::<T>() else {
        return Err(ConvertError::ParseError {
            str: str.to_string(),
        });
    };

    Ok(res)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_take_ws_full_ws() {
        let bytes = b"  ";

        let res = super::take_ws(bytes);

        assert_eq!(res, b"")
    }

    #[test]
    fn test_take_ws_lines() {
        let bytes = b"  \r\n\n\t\nx = 1";

        assert_eq!(super::take_ws_lines(bytes), b"x = 1");
    }

    #[test]
    fn test_take_line() {
        let (line, rest) = super::take_line(b"#C hi\r\nbo!");
        assert_eq!(line, b"#C hi");
        assert_eq!(rest, b"bo!");

        let (line, rest) = super::take_line(b"3o!");
        assert_eq!(line, b"3o!");
        assert_eq!(rest, b"");
    }

    #[test]
    fn test_take_with() {
        let (res, rest) = super::take_with(b',', b"12, y");
        assert_eq!(res, Some(b"12".as_slice()));
        assert_eq!(rest, b" y");

        // Never found
        let (res, rest) = super::take_with(b',', b"12");
        assert_eq!(res, None);
        assert_eq!(rest, b"12");
    }

    #[test]
    fn test_expect() {
        assert!(super::expect(b'x', b"x = 1").is_ok());
        assert!(super::expect(b'x', b"y = 1").is_err());
        assert!(super::expect(b'x', b"").is_err());
        assert_eq!(super::expect_slice(b"rule", b"rule = B3").unwrap(), b" = B3");
        assert!(super::expect_slice(b"rule", b"ru").is_err());
    }

    #[test]
    fn test_convert() {
        assert_eq!(super::convert::<i64>(b" -12 ").unwrap(), -12);
        assert!(super::convert::<i64>(b"1x").is_err());
        assert!(super::convert::<i64>(&[0xff]).is_err());
    }
}
