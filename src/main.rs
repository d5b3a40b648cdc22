use std::fs::File;
use std::io;
use std::io::Stdout;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::event;
use crossterm::terminal;
use rand::Rng;
use tracing::debug;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sparselife::camera::Camera;
use sparselife::color::ColorPolicy;
use sparselife::config::Args;
use sparselife::events::AppEvent;
use sparselife::events::CameraEvent;
use sparselife::events::Event;
use sparselife::events::TimerEvent;
use sparselife::grid::Aabb;
use sparselife::io::TerminalGuard;
use sparselife::io::convert_event;
use sparselife::io::draw_frame;
use sparselife::io::status_line;
use sparselife::pattern;
use sparselife::simulation::Simulation;
use sparselife::simulation::Speed;
use sparselife::simulation::Ticker;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let pattern = pattern::load(&args.pattern_file)
        .with_context(|| format!("Failed to load pattern {}", args.pattern_file.display()))?;

    let origin = args.origin();
    let live = pattern
        .place(origin)
        .context("Pattern does not fit on the board")?;

    info!(population = live.len(), ?origin, "starting");

    run(&args, Simulation::new(live))
}

fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;

            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }

    Ok(())
}

fn run(args: &Args, mut sim: Simulation) -> anyhow::Result<()> {
    let colors = args.color_policy();
    let mut speed = args.speed();
    let mut rng = rand::thread_rng();

    let _guard = TerminalGuard::enter().context("Failed to set up the terminal")?;
    let mut stdout = io::stdout();

    // The last row is the status line
    let (cols, rows) = terminal::size()?;
    let mut cam = Camera::new(cols, rows.saturating_sub(1));
    cam.set_scroll(args.scroll_incr);
    cam.set_zoom(args.zoom);
    recenter(&mut cam, &sim);

    draw(&mut stdout, &mut cam, &sim, &speed, &colors, &mut rng)?;
    let mut ticker = Ticker::start(Instant::now(), &speed);

    loop {
        // Input is read before every generation, even when generations run late
        let now = Instant::now();
        if event::poll(ticker.remaining(now))? {
            if let Some(event) = convert_event(event::read()?) {
                match event {
                    Event::AppEvent(AppEvent::Exit) => break,
                    Event::AppEvent(AppEvent::Resize { cols, rows }) => {
                        cam.resize(cols, rows.saturating_sub(1));
                    }
                    Event::AppEvent(AppEvent::CameraEvent(event)) => match event {
                        CameraEvent::Move(direction) => cam.pan(direction),
                        CameraEvent::ZoomIn => cam.zoom_in(),
                        CameraEvent::ZoomOut => cam.zoom_out(),
                        CameraEvent::ResetView => recenter(&mut cam, &sim),
                    },
                    Event::TimerEvent(TimerEvent::SpeedUp) => {
                        speed.speed_up();
                        ticker.hurry(Instant::now(), &speed);
                    }
                    Event::TimerEvent(TimerEvent::SlowDown) => speed.slow_down(),
                }

                draw(&mut stdout, &mut cam, &sim, &speed, &colors, &mut rng)?;
            }
        }

        let now = Instant::now();
        if ticker.is_due(now) {
            sim.advance();
            debug!(elapsed = ?now.elapsed(), "computed generation");

            draw(&mut stdout, &mut cam, &sim, &speed, &colors, &mut rng)?;
            ticker.reschedule(Instant::now(), &speed);
        }
    }

    info!(generation = sim.generation(), "exiting");

    Ok(())
}

/// Point the camera at the middle of the live cells.
fn recenter(cam: &mut Camera, sim: &Simulation) {
    if let Some(bbox) = Aabb::from_coords(sim.live()) {
        cam.center_on(bbox.center());
    }
}

fn draw<R: Rng>(
    out: &mut Stdout,
    cam: &mut Camera,
    sim: &Simulation,
    speed: &Speed,
    colors: &ColorPolicy,
    rng: &mut R,
) -> io::Result<()> {
    cam.draw(sim.live());

    let status = status_line(
        sim.generation(),
        sim.population(),
        speed.interval(),
        cam.zoom(),
    );

    draw_frame(out, cam, colors, rng, &status)
}
