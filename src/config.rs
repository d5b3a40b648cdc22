//! Parsing command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::style::Color;

use crate::WorldOffset;
use crate::camera::DEFAULT_SCROLL;
use crate::camera::MAX_ZOOM;
use crate::color;
use crate::color::ColorPolicy;
use crate::grid::Coord;
use crate::grid::HEIGHT;
use crate::grid::WIDTH;
use crate::simulation::Speed;

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Conway's Game of Life in the terminal",
    long_about = "Conway's Game of Life in the terminal\n\
                  \n\
                  Loads a pattern from a plaintext (.cells) or RLE (.rle) file and runs it on a \n\
                  999999 x 999999 board. Cells beyond the edge of the board are always dead.\n\
                  \n\
                  Keys: q quit, u/d speed up/slow down, arrows or hjkl move, +/- zoom, 0 recenter."
)]
pub struct Args {
    /// Pattern file to start from (.cells, .txt, .life or .rle)
    #[arg(long, visible_alias = "patternfile")]
    pub pattern_file: PathBuf,

    /// Initial delay between generations, in milliseconds
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(1..))]
    pub init_speed: u64,

    /// How much u and d change the delay by, in milliseconds
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
    pub speed_step: u64,

    /// How far the arrow keys move the view, in braille dots
    #[arg(long, default_value_t = DEFAULT_SCROLL)]
    pub scroll_incr: usize,

    /// Color of live cells, by name or as #rrggbb
    #[arg(long, default_value = "red", value_parser = color::parse_color)]
    pub color: Color,

    /// Give every cell a random color from a fixed palette
    #[arg(long)]
    pub multicolor: bool,

    /// Initial zoom level. At level n, each dot covers 2^n by 2^n cells
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(..=MAX_ZOOM as i64))]
    pub zoom: u32,

    /// Column of the board where the pattern's first column is placed [default: board center]
    #[arg(long, allow_negative_numbers = true)]
    pub origin_x: Option<WorldOffset>,

    /// Row of the board where the pattern's first row is placed [default: board center]
    #[arg(long, allow_negative_numbers = true)]
    pub origin_y: Option<WorldOffset>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn speed(&self) -> Speed {
        Speed::new(
            Duration::from_millis(self.init_speed),
            Duration::from_millis(self.speed_step),
        )
    }

    pub fn color_policy(&self) -> ColorPolicy {
        if self.multicolor {
            ColorPolicy::palette()
        } else {
            ColorPolicy::Fixed(self.color)
        }
    }

    /// Where the pattern's `(0, 0)` lands on the board.
    pub fn origin(&self) -> Coord {
        Coord::new(
            self.origin_x.unwrap_or(WIDTH / 2),
            self.origin_y.unwrap_or(HEIGHT / 2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["sparselife", "--pattern-file", "glider.rle"]).unwrap();

        assert_eq!(args.pattern_file, PathBuf::from("glider.rle"));
        assert_eq!(args.speed(), Speed::default());
        assert_eq!(args.scroll_incr, 15);
        assert_eq!(args.zoom, 0);
        assert_eq!(
            args.color_policy(),
            ColorPolicy::Fixed(Color::Rgb { r: 255, g: 0, b: 0 })
        );
        assert_eq!(args.origin(), Coord::new(499_999, 499_999));
        assert!(args.log_file.is_none());
    }

    #[test]
    fn all_options() {
        let args = Args::try_parse_from([
            "sparselife",
            "--patternfile",
            "gun.cells",
            "--init-speed",
            "100",
            "--speed-step",
            "10",
            "--scroll-incr",
            "4",
            "--multicolor",
            "--zoom",
            "3",
            "--origin-x",
            "10",
            "--origin-y",
            "-1",
        ])
        .unwrap();

        assert_eq!(
            args.speed(),
            Speed::new(Duration::from_millis(100), Duration::from_millis(10))
        );
        assert_eq!(args.scroll_incr, 4);
        assert_eq!(args.zoom, 3);
        assert_eq!(args.color_policy(), ColorPolicy::palette());
        assert_eq!(args.origin(), Coord::new(10, -1));
    }

    #[test]
    fn rejected_values() {
        let parse = |extra: &[&str]| {
            let mut argv = vec!["sparselife", "--pattern-file", "a.rle"];
            argv.extend_from_slice(extra);
            Args::try_parse_from(argv)
        };

        assert!(parse(&["--init-speed", "0"]).is_err());
        assert!(parse(&["--color", "chartreuse"]).is_err());
        assert!(parse(&["--zoom", "17"]).is_err());
        assert!(parse(&["--color", "#2e8b57"]).is_ok());
        assert!(Args::try_parse_from(["sparselife"]).is_err());
    }
}
