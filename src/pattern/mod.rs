//! Loading initial patterns from files.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::grid::Aabb;
use crate::grid::Coord;
use crate::world::LiveSet;

pub mod plaintext;
pub mod rle;

pub use self::rle::RleError;

/// Supported pattern file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternFormat {
    /// One row per line, `O` for live cells, `!` for comments
    Plaintext,

    /// Run Length Encoded
    Rle,
}

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Pattern file {path:?} has no extension")]
    MissingExtension { path: PathBuf },

    #[error("Unsupported pattern format \"{ext}\", expected .cells, .txt, .life or .rle")]
    UnsupportedFormat { ext: String },

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("RLE error: {0}")]
    Rle(#[from] RleError),

    #[error("Cell {cell:?} lies outside the simulation domain")]
    OutOfBounds { cell: Coord },
}

impl PatternFormat {
    /// Pick a format from the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self, PatternError> {
        let Some(ext) = path.extension() else {
            return Err(PatternError::MissingExtension {
                path: path.to_path_buf(),
            });
        };

        let ext = ext.to_string_lossy().to_ascii_lowercase();

        match ext.as_str() {
            "cells" | "txt" | "life" => Ok(Self::Plaintext),
            "rle" => Ok(Self::Rle),
            _ => Err(PatternError::UnsupportedFormat { ext }),
        }
    }

    pub fn parse(self, bytes: &[u8]) -> Result<Pattern, PatternError> {
        let mut cells = Vec::new();
        let push = |x, y| cells.push(Coord::new(x, y));

        let name = match self {
            Self::Plaintext => plaintext::read_plaintext(bytes, push).name,
            Self::Rle => rle::read_rle(bytes, push)?.name,
        };

        Ok(Pattern { name, cells })
    }
}

/// A pattern as read from a file, in coordinates relative to the pattern itself.
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    pub name: Option<String>,
    pub cells: Vec<Coord>,
}

impl Pattern {
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_coords(&self.cells)
    }

    /// Translate the pattern by `origin` into the simulation domain.
    ///
    /// Fails on the first cell that would land outside of the domain.
    pub fn place(&self, origin: Coord) -> Result<LiveSet, PatternError> {
        self.cells
            .iter()
            .map(|c| {
                origin
                    .checked_offset(c.x, c.y)
                    .filter(Coord::in_bounds)
                    .ok_or_else(|| PatternError::OutOfBounds {
                        cell: Coord::new(origin.x.saturating_add(c.x), origin.y.saturating_add(c.y)),
                    })
            })
            .collect()
    }
}

/// Read the pattern file at `path`, choosing the format from its extension.
pub fn load(path: &Path) -> Result<Pattern, PatternError> {
    let format = PatternFormat::from_path(path)?;

    let bytes = std::fs::read(path).map_err(|source| PatternError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let pattern = format.parse(&bytes)?;

    info!(
        ?path,
        ?format,
        name = pattern.name.as_deref().unwrap_or("<unnamed>"),
        cells = pattern.cells.len(),
        "loaded pattern"
    );

    Ok(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::HEIGHT;
    use crate::grid::WIDTH;

    #[test]
    fn format_from_extension() {
        let cases = [
            ("glider.cells", PatternFormat::Plaintext),
            ("glider.TXT", PatternFormat::Plaintext),
            ("dir.v2/glider.life", PatternFormat::Plaintext),
            ("gun.rle", PatternFormat::Rle),
            ("gun.RLE", PatternFormat::Rle),
        ];

        for (path, format) in cases {
            assert_eq!(PatternFormat::from_path(Path::new(path)).unwrap(), format);
        }
    }

    #[test]
    fn unsupported_extension() {
        assert!(matches!(
            PatternFormat::from_path(Path::new("gun.mc")),
            Err(PatternError::UnsupportedFormat { ext }) if ext == "mc"
        ));
        assert!(matches!(
            PatternFormat::from_path(Path::new("gun")),
            Err(PatternError::MissingExtension { .. })
        ));
    }

    #[test]
    fn both_formats_agree() {
        let plain = PatternFormat::Plaintext.parse(b"!Name: Glider\n.O\n..O\nOOO").unwrap();
        let rle = PatternFormat::Rle.parse(b"x = 3, y = 3\nbo$2bo$3o!").unwrap();

        // The plaintext comment line takes a row
        let plain = plain.place(Coord::new(10, 9)).unwrap();
        let rle = rle.place(Coord::new(10, 10)).unwrap();

        assert_eq!(plain, rle);
    }

    #[test]
    fn place_translates() {
        let pattern = Pattern {
            name: None,
            cells: vec![Coord::new(0, 0), Coord::new(2, 1), Coord::new(2, 1)],
        };

        let live = pattern.place(Coord::new(100, 200)).unwrap();
        let expected: LiveSet = [Coord::new(100, 200), Coord::new(102, 201)].into();

        assert_eq!(live, expected);
    }

    #[test]
    fn place_rejects_out_of_bounds() {
        let pattern = Pattern {
            name: None,
            cells: vec![Coord::new(0, 0), Coord::new(-1, 0)],
        };

        assert!(matches!(
            pattern.place(Coord::new(0, 5)),
            Err(PatternError::OutOfBounds { cell }) if cell == Coord::new(-1, 5)
        ));

        let pattern = Pattern {
            name: None,
            cells: vec![Coord::new(1, 1)],
        };

        assert!(pattern.place(Coord::new(WIDTH - 2, HEIGHT - 2)).is_ok());
        assert!(pattern.place(Coord::new(WIDTH - 1, 0)).is_err());
    }

    #[test]
    fn bounding_box() {
        let pattern = PatternFormat::Rle.parse(b"#P -2 -3\n3o$o!").unwrap();
        let b = pattern.bounding_box().unwrap();

        assert_eq!(b.min, Coord::new(-2, -3));
        assert_eq!((b.width(), b.height()), (3, 2));
    }
}
