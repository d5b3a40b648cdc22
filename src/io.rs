use std::io;
use std::io::Write;
use std::time::Duration;

use crossterm::cursor;
use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;
use rand::Rng;
use tracing::trace;

use crate::ScreenSize;
use crate::camera::BRAILLE_EMPTY;
use crate::camera::Camera;
use crate::color::ColorPolicy;
use crate::events::AppEvent;
use crate::events::CameraEvent;
use crate::events::Direction;
use crate::events::Event;
use crate::events::TimerEvent;

/// Converts a crossterm event into an application event
pub fn convert_event(event: CrossTermEvent) -> Option<Event> {
    trace!(?event, "terminal event");

    match event {
        CrossTermEvent::Key(KeyEvent {
            kind: KeyEventKind::Release,
            ..
        }) => None,
        CrossTermEvent::Key(key_event) => convert_key(key_event),
        CrossTermEvent::Resize(cols, rows) => {
            Some(Event::AppEvent(AppEvent::Resize { cols, rows }))
        }
        _ => None,
    }
}

fn convert_key(key_event: KeyEvent) -> Option<Event> {
    let camera = |e| Some(Event::AppEvent(AppEvent::CameraEvent(e)));
    let timer = |e| Some(Event::TimerEvent(e));

    match key_event {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
        | KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            ..
        } => Some(Event::AppEvent(AppEvent::Exit)),

        KeyEvent { code, .. } => match code {
            KeyCode::Char('u') => timer(TimerEvent::SpeedUp),
            KeyCode::Char('d') => timer(TimerEvent::SlowDown),

            KeyCode::Up | KeyCode::Char('k') => camera(CameraEvent::Move(Direction::Up)),
            KeyCode::Down | KeyCode::Char('j') => camera(CameraEvent::Move(Direction::Down)),
            KeyCode::Left | KeyCode::Char('h') => camera(CameraEvent::Move(Direction::Left)),
            KeyCode::Right | KeyCode::Char('l') => camera(CameraEvent::Move(Direction::Right)),

            KeyCode::Char('K' | '+') => camera(CameraEvent::ZoomIn),
            KeyCode::Char('J' | '-') => camera(CameraEvent::ZoomOut),
            KeyCode::Char('0') => camera(CameraEvent::ResetView),

            _ => None,
        },
    }
}

/// The bottom line of the screen.
pub fn status_line(generation: u64, population: usize, interval: Duration, zoom: u32) -> String {
    format!(
        "gen {generation} | cells {population} | {}ms | zoom 1:{} | q quit, u/d speed, arrows move, +/- zoom",
        interval.as_millis(),
        1u64 << zoom,
    )
}

/// Write the last drawing of `cam` to `out`, followed by `status`.
pub fn draw_frame<W, R>(
    out: &mut W,
    cam: &Camera,
    colors: &ColorPolicy,
    rng: &mut R,
    status: &str,
) -> io::Result<()>
where
    W: Write,
    R: Rng + ?Sized,
{
    let mut rows: ScreenSize = 0;

    for glyphs in cam.rows() {
        queue!(out, cursor::MoveTo(0, rows))?;

        match colors {
            ColorPolicy::Fixed(color) => {
                let line: String = glyphs.iter().map(|&c| glyph(c)).collect();
                queue!(out, style::SetForegroundColor(*color), style::Print(line))?;
            }
            ColorPolicy::Random(_) => {
                for &c in glyphs {
                    if c != BRAILLE_EMPTY {
                        queue!(out, style::SetForegroundColor(colors.pick(rng)))?;
                    }

                    queue!(out, style::Print(glyph(c)))?;
                }
            }
        }

        rows = rows.saturating_add(1);
    }

    queue!(
        out,
        style::ResetColor,
        cursor::MoveTo(0, rows),
        style::Print(status),
        terminal::Clear(terminal::ClearType::UntilNewLine),
    )?;

    out.flush()
}

fn glyph(c: u32) -> char {
    char::from_u32(c).unwrap_or(' ')
}

/// Raw mode on the alternate screen, for as long as this lives.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self { _private: () };

        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide,
        )?;

        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Nothing useful can be done if the terminal can't be restored
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
