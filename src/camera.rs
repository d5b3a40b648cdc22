use crate::ScreenSize;
use crate::WorldOffset;
use crate::events::Direction;
use crate::grid::Coord;
use crate::world::LiveSet;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
pub const BRAILLE_EMPTY: u32 = 0x2800;

/// Furthest zoom level. At level `n`, each dot covers a `2^n` by `2^n` square of cells.
pub const MAX_ZOOM: u32 = 16;

/// Default number of dots the view moves by per pan.
pub const DEFAULT_SCROLL: usize = 15;

/// A viewport onto the world, drawn with braille characters.
///
/// Each terminal character holds 2x4 dots. At zoom level 0 a dot is a single cell; a dot is lit
/// when any cell it covers is alive.
pub struct Camera {
    /// The cell buffer
    cb: Vec<bool>,

    /// The frame buffer.
    fb: String,

    /// Codepoints. This allows us to construct the framebuffer more easily
    cp: Vec<u32>,

    /// Width of the cell buffer, in dots
    w: usize,

    /// Height of the cell buffer, in dots
    h: usize,

    /// World coordinate of the top-left dot
    x: WorldOffset,
    y: WorldOffset,

    zoom: u32,

    /// Dots moved per pan
    scroll: usize,
}

impl Camera {
    /// Create a camera filling `cols` by `rows` terminal characters.
    pub fn new(cols: ScreenSize, rows: ScreenSize) -> Self {
        let (w, h) = Self::dots(cols, rows);

        // For each braille character, we need 3 bytes:
        //  - The leader byte:     0b11100010
        //  - Continuation byte 1: 0b101000xx
        //  - Continuation byte 2: 0b10xxxxxx
        // For each newline, we need one byte: 0b00001010
        let (bw, bh) = (w / 2, h / 4);

        Self {
            cb: vec![false; w * h],
            fb: String::with_capacity(3 * (bw * bh) + bh),
            cp: vec![BRAILLE_EMPTY; bw * bh],
            w,
            h,
            x: 0,
            y: 0,
            zoom: 0,
            scroll: DEFAULT_SCROLL,
        }
    }

    fn dots(cols: ScreenSize, rows: ScreenSize) -> (usize, usize) {
        (cols.max(1) as usize * 2, rows.max(1) as usize * 4)
    }

    /// Change the size of the view, keeping its center in place.
    pub fn resize(&mut self, cols: ScreenSize, rows: ScreenSize) {
        let center = self.center();
        let (w, h) = Self::dots(cols, rows);

        self.w = w;
        self.h = h;
        self.cb = vec![false; w * h];
        self.cp = vec![BRAILLE_EMPTY; (w / 2) * (h / 4)];

        self.center_on(center);
    }

    /// Width of the view, in dots
    pub fn width(&self) -> usize {
        self.w
    }

    /// Height of the view, in dots
    pub fn height(&self) -> usize {
        self.h
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn set_scroll(&mut self, dots: usize) {
        self.scroll = dots;
    }

    /// World coordinate of the top-left dot.
    pub fn origin(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    pub fn set_origin(&mut self, c: Coord) {
        self.x = c.x;
        self.y = c.y;
    }

    /// Side length, in cells, of the square covered by one dot
    fn span(&self) -> WorldOffset {
        1 << self.zoom
    }

    /// World coordinate at the middle of the view.
    pub fn center(&self) -> Coord {
        let span = self.span();

        Coord::new(
            self.x + self.w as WorldOffset * span / 2,
            self.y + self.h as WorldOffset * span / 2,
        )
    }

    pub fn center_on(&mut self, c: Coord) {
        let span = self.span();

        self.x = c.x - self.w as WorldOffset * span / 2;
        self.y = c.y - self.h as WorldOffset * span / 2;
    }

    pub fn pan(&mut self, direction: Direction) {
        let d = self.scroll as WorldOffset * self.span();

        match direction {
            Direction::Up => self.y -= d,
            Direction::Down => self.y += d,
            Direction::Left => self.x -= d,
            Direction::Right => self.x += d,
        }
    }

    /// Set the zoom level, keeping the center of the view in place. Levels past [`MAX_ZOOM`] are
    /// clamped.
    pub fn set_zoom(&mut self, zoom: u32) {
        let center = self.center();
        self.zoom = zoom.min(MAX_ZOOM);
        self.center_on(center);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom.saturating_sub(1));
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom + 1);
    }

    /// Reset the cell buffer
    pub fn reset(&mut self) {
        self.cb.fill(false);
    }

    /// Light up the dots covering the cells of `live` that are in view.
    pub fn draw(&mut self, live: &LiveSet) {
        self.reset();

        for &c in live {
            if let Some((x, y)) = self.project(c) {
                let i = self.xy_from(x, y);
                self.cb[i] = true;
            }
        }

        self.compose();
    }

    /// The dot showing `c`, if it is in view.
    fn project(&self, c: Coord) -> Option<(usize, usize)> {
        let (dx, dy) = (c.x - self.x, c.y - self.y);
        if dx < 0 || dy < 0 {
            return None;
        }

        let (x, y) = ((dx >> self.zoom) as usize, (dy >> self.zoom) as usize);

        (x < self.w && y < self.h).then_some((x, y))
    }

    /// Compute the codepoints from the cell buffer
    fn compose(&mut self) {
        let bw = self.w / 2;

        self.cp.fill(BRAILLE_EMPTY);

        for (n, &px) in self.cb.iter().enumerate() {
            if px {
                let (x, y) = (n % self.w, n / self.w);
                self.cp[(y / 4) * bw + (x / 2)] += Self::get_hex_value(x, y);
            }
        }
    }

    /// Number of dots lit by the last [`Camera::draw`].
    pub fn visible(&self) -> usize {
        self.cb.iter().filter(|&&px| px).count()
    }

    /// Rows of braille codepoints of the last [`Camera::draw`].
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cp.chunks(self.w / 2)
    }

    /// The last [`Camera::draw`] as text, one line per row of characters.
    pub fn render(&mut self) -> &str {
        self.fb.clear();

        let bw = self.w / 2;
        for (i, &c) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            self.fb.push(char::from_u32(c).unwrap_or(' '));
        }
        self.fb.push('\n');

        &self.fb
    }

    fn xy_from(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}
