mod audio;
mod config;
mod error;
mod render;
mod show;

use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute, terminal,
};
use error::ShowError;
use render::{Canvas, CanvasRenderer, ColorMode, RenderMode};
use show::SimulationClock;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "fireshow", about = "New Year fireworks show for the terminal")]
struct Cli {
    /// Simulation ticks per second (1-120)
    #[arg(short, long)]
    fps: Option<u32>,

    /// Fixed random seed; the same seed replays the same show
    #[arg(long)]
    seed: Option<u64>,

    /// Render mode
    #[arg(short, long, value_enum)]
    render: Option<RenderMode>,

    /// Color mode
    #[arg(short, long, value_enum)]
    color: Option<ColorMode>,

    /// Scale factor for particle counts (0.5-2.0)
    #[arg(short, long)]
    scale: Option<f64>,

    /// Countdown length in seconds
    #[arg(long)]
    countdown: Option<u32>,

    /// Hide the status bar
    #[arg(long)]
    clean: bool,

    /// Disable sound
    #[arg(long)]
    no_audio: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a commented default config and exit
    #[arg(long)]
    print_config: bool,

    /// Print the config file path and exit
    #[arg(long)]
    show_config: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fireshow: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ShowError> {
    if cli.print_config {
        print!("{}", config::default_config_string());
        return Ok(());
    }
    if cli.show_config {
        match cli.config.clone().or_else(config::config_path) {
            Some(path) => println!("{}", path.display()),
            None => println!("no config directory on this platform"),
        }
        return Ok(());
    }

    let mut cfg = config::load_config(cli.config.as_deref())?;
    apply_cli(&mut cfg, &cli);
    init_logging(cfg.log_file.as_deref())?;
    match &cli.config {
        Some(path) => log::info!("config: {}", path.display()),
        None => log::info!("config: {:?} (defaults when absent)", config::config_path()),
    }

    let scale = cfg.scale.clamp(0.5, 2.0);
    cfg.apply_scale(scale);
    let mut clock = SimulationClock::new(&cfg)?;
    let mut audio: Box<dyn audio::AudioCue> = if cli.no_audio {
        Box::new(audio::Silent)
    } else {
        audio::from_config(&cfg.audio)
    };

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let modes = (
        cli.render.or(cfg.render.map(RenderMode::from)).unwrap_or(RenderMode::Braille),
        cli.color.or(cfg.color.map(ColorMode::from)).unwrap_or(ColorMode::TrueColor),
    );
    let mut writer = BufWriter::with_capacity(256 * 1024, stdout);
    let result = run_loop(&mut writer, &cfg, modes, &mut clock, audio.as_mut());

    // Cleanup
    execute!(writer, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    log::info!("show stopped after {} ticks", clock.ticks());
    result
}

fn apply_cli(cfg: &mut config::ShowConfig, cli: &Cli) {
    if let Some(fps) = cli.fps {
        cfg.tick_rate = fps.clamp(1, 120);
    }
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }
    if let Some(scale) = cli.scale {
        cfg.scale = scale;
    }
    if let Some(secs) = cli.countdown {
        cfg.scene.countdown_seconds = secs;
    }
    if cli.clean {
        cfg.clean = true;
    }
    if cli.log_file.is_some() {
        cfg.log_file = cli.log_file.clone();
    }
}

/// Logs go to a file because the show owns the terminal. Without a log file
/// nothing is logged.
fn init_logging(path: Option<&std::path::Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

const RENDER_MODES: [RenderMode; 3] = [RenderMode::Braille, RenderMode::HalfBlock, RenderMode::Ascii];
const COLOR_MODES: [ColorMode; 4] = [ColorMode::TrueColor, ColorMode::Ansi256, ColorMode::Ansi16, ColorMode::Mono];

fn build_canvas(cols: u16, rows: u16, hide_status: bool, render_mode: RenderMode, color_mode: ColorMode, quant: u8) -> Canvas {
    let display_rows = if hide_status { rows as usize } else { (rows as usize).saturating_sub(1) };
    let mut canvas = Canvas::new(cols as usize, display_rows, render_mode, color_mode);
    canvas.color_quant = quant;
    canvas
}

fn run_loop(
    stdout: &mut BufWriter<io::Stdout>,
    cfg: &config::ShowConfig,
    (mut render_mode, mut color_mode): (RenderMode, ColorMode),
    clock: &mut SimulationClock,
    audio: &mut dyn audio::AudioCue,
) -> Result<(), ShowError> {
    let (mut cols, mut rows) = terminal::size()?;
    let mut hide_status = cfg.clean;
    let mut canvas = build_canvas(cols, rows, hide_status, render_mode, color_mode, cfg.color_quant);
    let frame_dur = Duration::from_secs_f64(1.0 / cfg.tick_rate as f64);

    let mut frame_count: u64 = 0;
    let mut actual_fps: f64 = 0.0;
    let mut fps_update = Instant::now();
    let mut rebuild_canvas = false;
    let mut stop = false;

    loop {
        let frame_start = Instant::now();

        // Handle input (non-blocking)
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Resize(w, h) => {
                    if w >= 10 && h >= 5 {
                        cols = w;
                        rows = h;
                        rebuild_canvas = true;
                    }
                }
                Event::Key(KeyEvent { code, modifiers, .. }) => match code {
                    KeyCode::Char('q') | KeyCode::Esc => stop = true,
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => stop = true,
                    // Cycle render mode
                    KeyCode::Char('r') => {
                        let idx = RENDER_MODES.iter().position(|&m| m == render_mode).unwrap_or(0);
                        render_mode = RENDER_MODES[(idx + 1) % RENDER_MODES.len()];
                        rebuild_canvas = true;
                    }
                    // Cycle color mode
                    KeyCode::Char('c') => {
                        let idx = COLOR_MODES.iter().position(|&m| m == color_mode).unwrap_or(0);
                        color_mode = COLOR_MODES[(idx + 1) % COLOR_MODES.len()];
                        rebuild_canvas = true;
                    }
                    // Toggle status bar
                    KeyCode::Char('h') => {
                        hide_status = !hide_status;
                        rebuild_canvas = true;
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        if rebuild_canvas {
            let (settled_cols, settled_rows) = terminal::size()?;
            if settled_cols >= 10 && settled_rows >= 5 {
                cols = settled_cols;
                rows = settled_rows;
            }
            canvas = build_canvas(cols, rows, hide_status, render_mode, color_mode, cfg.color_quant);
            write!(stdout, "\x1b[2J\x1b[H")?;
            stdout.flush()?;
            rebuild_canvas = false;
        }

        // The tick in progress always completes before a stop takes effect.
        clock.tick(audio);
        if stop {
            return Ok(());
        }

        canvas.fade(cfg.physics.trail_fade);
        clock.draw(&mut CanvasRenderer::new(&mut canvas, cfg.display));
        let frame = canvas.render();

        // Skip frames rendered for a stale terminal size
        let (check_cols, check_rows) = terminal::size()?;
        if check_cols != cols || check_rows != rows {
            cols = check_cols;
            rows = check_rows;
            rebuild_canvas = true;
            continue;
        }

        stdout.write_all(b"\x1b[H")?;
        stdout.write_all(frame.as_bytes())?;

        frame_count += 1;
        if fps_update.elapsed() >= Duration::from_secs(1) {
            actual_fps = frame_count as f64 / fps_update.elapsed().as_secs_f64();
            frame_count = 0;
            fps_update = Instant::now();
        }
        if !hide_status {
            let status = format!(
                " {} | {} fireworks | {} particles | {:?} | {:?} | {:.0} fps | [r] render  [c] color  [h] hide  [q] quit ",
                clock.phase().name(),
                clock.fireworks().len(),
                clock.particle_count(),
                render_mode,
                color_mode,
                actual_fps,
            );
            let w = cols as usize;
            let truncated: String = status.chars().take(w).collect();
            write!(stdout, "\x1b[{};1H\x1b[7m{:<width$}\x1b[0m", rows, truncated, width = w)?;
        }

        stdout.flush()?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
