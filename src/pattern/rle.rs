use thiserror::Error;
use tracing::warn;

use crate::WorldOffset;
use crate::grid::HEIGHT;
use crate::grid::WIDTH;
use crate::parse_util;
use crate::parse_util::ConvertError;
use crate::parse_util::ParseError;
use crate::parse_util::convert;
use crate::rule_set;
use crate::rule_set::B3S23;
use crate::rule_set::RuleError;
use crate::rule_set::RuleSet;

#[derive(Default, Debug)]
pub struct RleFile {
    pub name: Option<String>,
    pub author: Option<String>,

    /// Top-left corner of the pattern, from a `#P` or `#R` line
    pub offset: Option<(WorldOffset, WorldOffset)>,

    /// Width and height of the pattern, from the header line
    pub size: Option<(WorldOffset, WorldOffset)>,

    pub set: RuleSet,
}

#[derive(Debug, Error)]
pub enum RleError {
    #[error("Comment line error: {0}")]
    CommentLine(#[from] RleCommentLineError),

    #[error("Header line error: {0}")]
    HeaderLine(#[from] RleHeaderLineError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] RleEncodingError),

    #[error("Unsupported rule {set}, only B3/S23 can be simulated")]
    UnsupportedRule { set: RuleSet },
}

/// Parse the RLE file format, calling `f` with the position of every live cell. Assumes the bytes
/// are valid Ascii.
///
/// Rows grow downward. The first cell of the pattern is at `(0, 0)` unless the file gives an
/// offset.
///
/// See: https://conwaylife.com/wiki/Run_Length_Encoded
pub fn read_rle<F>(mut bytes: &[u8], f: F) -> Result<RleFile, RleError>
where
    F: FnMut(WorldOffset, WorldOffset),
{
    let mut file = RleFile::default();

    // Parse as many comment lines as possible
    loop {
        bytes = parse_util::take_ws_lines(bytes);

        let (Some(line), rest) = read_line_comment(bytes)? else {
            break;
        };

        match line {
            RleCommentLine::Comment => {}
            RleCommentLine::Name { name } => {
                if file.name.is_some() {
                    warn!("RLE file name already defined. Using latest");
                }

                file.name = Some(name);
            }
            RleCommentLine::Author { author } => {
                if file.author.is_some() {
                    warn!("RLE author already defined. Using latest");
                }

                file.author = Some(author);
            }
            RleCommentLine::Offset { x, y } => {
                if file.offset.is_some() {
                    warn!("RLE offset already defined. Using latest");
                }

                file.offset = Some((x, y))
            }
            RleCommentLine::RuleSet { set } => {
                file.set = set;
            }
        }

        bytes = rest;
    }

    // Parse header line, if it's present
    if let (Some(header), rest) = read_line_header(bytes)? {
        let RleHeaderLine { x, y, set } = header;

        file.size = Some((x, y));
        if let Some(set) = set {
            file.set = set;
        }

        bytes = rest;
    }

    if file.set != B3S23 {
        return Err(RleError::UnsupportedRule { set: file.set });
    }

    let (dx, dy) = file.offset.unwrap_or_default();

    // Parse encoding
    read_encoding(bytes, dx, dy, f)?;

    Ok(file)
}

enum RleCommentLine {
    Comment,
    Name { name: String },
    Author { author: String },
    Offset { x: WorldOffset, y: WorldOffset },
    RuleSet { set: RuleSet },
}

#[derive(Debug, Error)]
pub enum RleCommentLineError {
    #[error("No comment type")]
    NoType,

    #[error("Empty name line")]
    EmptyName,

    #[error("Empty author line")]
    EmptyAuthor,

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Invalid coordinates: {0}")]
    InvalidCoord(#[from] RleCoordError),

    #[error("Invalid comment type, found '{got}'")]
    InvalidType { got: char },
}

/// Attempt to parse a comment line, otherwise leaves `bytes` as-is.
fn read_line_comment(
    bytes: &[u8],
) -> Result<(Option<RleCommentLine>, &[u8]), RleCommentLineError> {
    let Ok(bytes) = parse_util::expect(b'#', bytes) else {
        return Ok((None, bytes));
    };

    let (Some(b), bytes) = parse_util::take_1(bytes) else {
        return Err(RleCommentLineError::NoType);
    };

    let (line, bytes) = parse_util::take_line(bytes);
    let line = line.trim_ascii();

    let line = match b {
        // Comment line
        b'C' | b'c' => RleCommentLine::Comment,

        // Pattern name
        b'N' => {
            if line.is_empty() {
                return Err(RleCommentLineError::EmptyName);
            }

            RleCommentLine::Name {
                name: String::from_utf8_lossy(line).into_owned(),
            }
        }

        // Pattern author
        b'O' => {
            if line.is_empty() {
                return Err(RleCommentLineError::EmptyAuthor);
            }

            RleCommentLine::Author {
                author: String::from_utf8_lossy(line).into_owned(),
            }
        }

        // Pattern offset
        b'R' | b'P' => {
            let (x, y) = read_offset(line)?;

            RleCommentLine::Offset { x, y }
        }

        // Pattern rules
        b'r' => RleCommentLine::RuleSet {
            set: rule_set::parse_rule(line)?,
        },

        b => return Err(RleCommentLineError::InvalidType { got: b as char }),
    };

    Ok((Some(line), bytes))
}

struct RleHeaderLine {
    x: WorldOffset,
    y: WorldOffset,
    set: Option<RuleSet>,
}

#[derive(Debug, Error)]
pub enum RleHeaderLineError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Invalid coordinates: {0}")]
    InvalidCoord(#[from] RleCoordError),

    #[error("Invalid token: expected ',' or end of line, found '{got}'")]
    InvalidToken { got: char },

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),
}

/// Attempt to parse a header line, otherwise leaves `bytes` as-is.
fn read_line_header(bytes: &[u8]) -> Result<(Option<RleHeaderLine>, &[u8]), RleHeaderLineError> {
    if parse_util::peek_1(bytes) != Some(b'x') {
        return Ok((None, bytes));
    }

    let (line, bytes) = parse_util::take_line(bytes);
    let ((x, y), line) = read_coordinates(line)?;

    let line = parse_util::take_ws(line);
    let set = match parse_util::take_1(line) {
        (None, _) => None,
        (Some(b','), line) => {
            let line = parse_util::take_ws(line);
            let line = parse_util::expect_slice(b"rule", line)?;
            let line = parse_util::take_ws(line);
            let line = parse_util::expect(b'=', line)?;

            Some(rule_set::parse_rule(line)?)
        }
        (Some(b), _) => return Err(RleHeaderLineError::InvalidToken { got: b as char }),
    };

    Ok((Some(RleHeaderLine { x, y, set }), bytes))
}

#[derive(Debug, Error)]
pub enum RleEncodingError {
    #[error("Unexpected EOF")]
    UnexpectedEof,

    #[error("Failed to convert run length: {0}")]
    RunLength(#[from] ConvertError),

    #[error("Run length {rep} does not fit in the world")]
    Overflow { rep: u64 },

    #[error("Cell ({x}, {y}) shifted by the pattern offset does not fit in the world")]
    OffsetOverflow { x: WorldOffset, y: WorldOffset },

    #[error("Unrecognized byte: 0x{got:0X}")]
    UnrecognizedByte { got: u8 },
}

fn read_encoding<F>(
    mut bytes: &[u8],
    dx: WorldOffset,
    dy: WorldOffset,
    mut f: F,
) -> Result<(), RleEncodingError>
where
    F: FnMut(WorldOffset, WorldOffset),
{
    let mut rep: u64 = 1;

    let (mut x, mut y): (WorldOffset, WorldOffset) = (0, 0);

    loop {
        let Some(b) = parse_util::peek_1(bytes) else {
            return Err(RleEncodingError::UnexpectedEof);
        };

        match b {
            // Line breaks may appear anywhere between tokens
            w if w.is_ascii_whitespace() => {
                bytes = parse_util::take_ws(bytes);
            }

            // End of input
            b'!' => break,

            // Dead cell
            b'b' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                x = advance(x, rep, WIDTH)?;

                rep = 1;
            }

            // Live cell
            b'o' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                let end = advance(x, rep, WIDTH)?;
                for x in x..end {
                    let (Some(cx), Some(cy)) = (dx.checked_add(x), dy.checked_add(y)) else {
                        return Err(RleEncodingError::OffsetOverflow { x, y });
                    };

                    f(cx, cy)
                }

                x = end;

                rep = 1;
            }

            // End of line
            b'$' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                y = advance(y, rep, HEIGHT)?;
                x = 0;

                rep = 1;
            }

            n if n.is_ascii_digit() => {
                let (Some(n), rest) = parse_util::take_until_fn(|b| !b.is_ascii_digit(), bytes)
                else {
                    // The count runs into the end of input
                    return Err(RleEncodingError::UnexpectedEof);
                };
                bytes = rest;

                rep = convert(n)?;
            }

            b => return Err(RleEncodingError::UnrecognizedByte { got: b }),
        }
    }

    Ok(())
}

/// Move `pos` forward by a run of `rep` cells. A pattern wider or taller than the world is
/// rejected before any of its cells are emitted.
fn advance(
    pos: WorldOffset,
    rep: u64,
    limit: WorldOffset,
) -> Result<WorldOffset, RleEncodingError> {
    WorldOffset::try_from(rep)
        .ok()
        .and_then(|rep| pos.checked_add(rep))
        .filter(|&end| end <= limit)
        .ok_or(RleEncodingError::Overflow { rep })
}

#[derive(Debug, Error)]
pub enum RleCoordError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Expected x coordinate, found end of input")]
    NoX,

    #[error("Failed to parse x coordinate: {0}")]
    ParseX(#[source] ConvertError),

    #[error("Expected y coordinate, found end of input")]
    NoY,

    #[error("Failed to parse y coordinate: {0}")]
    ParseY(#[source] ConvertError),
}

/// Read `x = <x>, y = <y>` and return what follows `<y>`.
fn read_coordinates(bytes: &[u8]) -> Result<((WorldOffset, WorldOffset), &[u8]), RleCoordError> {
    let bytes = parse_util::expect(b'x', bytes)?;
    let bytes = parse_util::take_ws(bytes);
    let bytes = parse_util::expect(b'=', bytes)?;
    let bytes = parse_util::take_ws(bytes);

    let (Some(x_bytes), bytes) = parse_util::take_with(b',', bytes) else {
        return Err(RleCoordError::NoX);
    };
    let x: WorldOffset = convert(x_bytes).map_err(RleCoordError::ParseX)?;

    let bytes = parse_util::take_ws(bytes);
    let bytes = parse_util::expect(b'y', bytes)?;
    let bytes = parse_util::take_ws(bytes);
    let bytes = parse_util::expect(b'=', bytes)?;
    let bytes = parse_util::take_ws(bytes);

    // `y` is followed by the rule, or by nothing.
    let end = bytes.iter().position(|&b| b == b',').unwrap_or(bytes.len());
    let (y_bytes, bytes) = bytes.split_at(end);
    if y_bytes.trim_ascii().is_empty() {
        return Err(RleCoordError::NoY);
    }
    let y: WorldOffset = convert(y_bytes).map_err(RleCoordError::ParseY)?;

    Ok(((x, y), bytes))
}

/// Read the `<x> <y>` pair of a `#P` or `#R` line.
fn read_offset(line: &[u8]) -> Result<(WorldOffset, WorldOffset), RleCoordError> {
    let mut parts = line
        .split(u8::is_ascii_whitespace)
        .filter(|part| !part.is_empty());

    let x = parts.next().ok_or(RleCoordError::NoX)?;
    let x: WorldOffset = convert(x).map_err(RleCoordError::ParseX)?;

    let y = parts.next().ok_or(RleCoordError::NoY)?;
    let y: WorldOffset = convert(y).map_err(RleCoordError::ParseY)?;

    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(bytes: &[u8]) -> Result<(RleFile, Vec<(WorldOffset, WorldOffset)>), RleError> {
        let mut cells = Vec::new();
        let file = read_rle(bytes, |x, y| cells.push((x, y)))?;
        cells.sort();

        Ok((file, cells))
    }

    #[test]
    fn read_coordinates() {
        let bytes = b"x = 1, y = 1";
        let ((x, y), rest) = super::read_coordinates(bytes.as_slice()).unwrap();

        assert_eq!((x, y), (1, 1));
        assert_eq!(rest, b"");
    }

    #[test]
    fn read_coordinates_before_rule() {
        let bytes = b"x=36,y=9,rule=B3/S23";
        let ((x, y), rest) = super::read_coordinates(bytes.as_slice()).unwrap();

        assert_eq!((x, y), (36, 9));
        assert_eq!(rest, b",rule=B3/S23");
    }

    #[test]
    fn glider() {
        let (file, cells) = cells(b"#N Glider\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n").unwrap();

        assert_eq!(file.name.as_deref(), Some("Glider"));
        assert_eq!(file.size, Some((3, 3)));
        assert_eq!(cells, vec![(0, 2), (1, 0), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn headerless() {
        let (file, cells) = cells(b"2o$2o!").unwrap();

        assert_eq!(file.size, None);
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn blank_rows_and_line_breaks() {
        let (_, cells) = cells(b"x = 2, y = 4\r\no\r\n3$\r\nbo!").unwrap();

        assert_eq!(cells, vec![(0, 0), (1, 3)]);
    }

    #[test]
    fn comments_and_offset() {
        let bytes = b"#C first\n#C\n#O someone\n#P -1 2\nx = 1, y = 1\no!";
        let (file, cells) = cells(bytes).unwrap();

        assert_eq!(file.author.as_deref(), Some("someone"));
        assert_eq!(file.offset, Some((-1, 2)));
        assert_eq!(cells, vec![(-1, 2)]);
    }

    #[test]
    fn legacy_rule_comment() {
        assert!(cells(b"#r 23/3\nbo$bo$bo!").is_ok());
    }

    #[test]
    fn unsupported_rule() {
        let err = cells(b"x = 3, y = 1, rule = B36/S23\n3o!").unwrap_err();

        assert!(matches!(err, RleError::UnsupportedRule { .. }));
        assert_eq!(
            err.to_string(),
            "Unsupported rule B36/S23, only B3/S23 can be simulated"
        );
    }

    #[test]
    fn missing_terminator() {
        let err = cells(b"x = 3, y = 1\n3o").unwrap_err();
        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::UnexpectedEof)
        ));

        let err = cells(b"x = 3, y = 1\n3o$12").unwrap_err();
        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::UnexpectedEof)
        ));
    }

    #[test]
    fn run_longer_than_world() {
        let mut calls = 0;
        let err = read_rle(b"x = 1, y = 1\n4000000000o!", |_, _| calls += 1).unwrap_err();

        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::Overflow { rep: 4_000_000_000 })
        ));
        assert_eq!(calls, 0);

        // Runs add up across a row
        let err = cells(b"999990b10o!").unwrap_err();
        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::Overflow { rep: 10 })
        ));

        let err = cells(b"o1000000$o!").unwrap_err();
        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::Overflow { rep: 1_000_000 })
        ));

        assert!(cells(b"999989b10o!").is_ok());
    }

    #[test]
    fn offset_overflow() {
        let err = cells(b"#P 9223372036854775807 0\n2o!").unwrap_err();
        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::OffsetOverflow { x: 1, y: 0 })
        ));

        let err = cells(b"#R 0 9223372036854775807\no$o!").unwrap_err();
        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::OffsetOverflow { x: 0, y: 1 })
        ));
    }

    #[test]
    fn unknown_state() {
        let err = cells(b"x = 3, y = 1\n2oA!").unwrap_err();
        assert!(matches!(
            err,
            RleError::Encoding(RleEncodingError::UnrecognizedByte { got: b'A' })
        ));
    }

    #[test]
    fn bad_header() {
        let err = cells(b"x = three, y = 1\n3o!").unwrap_err();
        assert!(matches!(
            err,
            RleError::HeaderLine(RleHeaderLineError::InvalidCoord(RleCoordError::ParseX(_)))
        ));
    }

    #[test]
    fn bad_comment() {
        let err = cells(b"#Z what\nbo!").unwrap_err();
        assert!(matches!(
            err,
            RleError::CommentLine(RleCommentLineError::InvalidType { got: 'Z' })
        ));
    }
}
