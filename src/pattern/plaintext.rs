use crate::WorldOffset;
use crate::parse_util;

/// Marks a live cell. Every other character is a dead cell.
pub const LIVE: u8 = b'O';

/// Lines starting with this are comments.
pub const COMMENT: u8 = b'!';

#[derive(Default, Debug)]
pub struct PlaintextFile {
    pub name: Option<String>,
}

/// Parse the plaintext format, calling `f` with the position of every live cell.
///
/// Each physical line of the file is one row, counted from 0 at the top. Comment and blank lines
/// produce no cells but still take up a row.
///
/// See: https://conwaylife.com/wiki/Plaintext
pub fn read_plaintext<F>(mut bytes: &[u8], mut f: F) -> PlaintextFile
where
    F: FnMut(WorldOffset, WorldOffset),
{
    let mut file = PlaintextFile::default();
    let mut y: WorldOffset = 0;

    while !bytes.is_empty() {
        let (line, rest) = parse_util::take_line(bytes);
        bytes = rest;

        match line {
            [] => {}
            [COMMENT, comment @ ..] => {
                if let Some(name) = comment.strip_prefix(b"Name:") {
                    file.name = Some(String::from_utf8_lossy(name.trim_ascii()).into_owned());
                }
            }
            cells => {
                for (x, _) in cells.iter().enumerate().filter(|&(_, &b)| b == LIVE) {
                    f(x as WorldOffset, y);
                }
            }
        }

        y += 1;
    }

    file
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(bytes: &[u8]) -> (PlaintextFile, Vec<(WorldOffset, WorldOffset)>) {
        let mut cells = Vec::new();
        let file = read_plaintext(bytes, |x, y| cells.push((x, y)));
        cells.sort();

        (file, cells)
    }

    #[test]
    fn glider() {
        let (file, cells) = cells(b".O.\n..O\nOOO\n");

        assert_eq!(file.name, None);
        assert_eq!(cells, vec![(0, 2), (1, 0), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn comments_take_a_row() {
        let (file, cells) = cells(b"!Name: Blinker\r\n!\r\n\r\nOOO\r\n");

        assert_eq!(file.name.as_deref(), Some("Blinker"));
        assert_eq!(cells, vec![(0, 3), (1, 3), (2, 3)]);
    }

    #[test]
    fn other_characters_are_dead() {
        let (_, cells) = cells(b"o*O. X O");

        assert_eq!(cells, vec![(2, 0), (7, 0)]);
    }

    #[test]
    fn no_trailing_newline() {
        let (_, cells) = cells(b"OO\nOO");

        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn empty() {
        let (_, cells) = cells(b"");

        assert!(cells.is_empty());
    }
}
