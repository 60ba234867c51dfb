//! The simulation loop.
//!
//! Owns the terminal, the audio output and the perception thread, and drives
//! [`GameStateMachine`] at a fixed rate: read input, pick up the newest
//! preview and any pending jump, tick, play the resulting cues, draw.

use std::io::{self, Stdout, Write, stdout};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use tracing::{error, info, trace, warn};

use crate::audio::{self, AudioSink, Cue};
use crate::config::{CameraMode, Config};
use crate::error::CaptureError;
use crate::game::{GameStateMachine, TickReport};
use crate::perception::sim::{ColorBlobExtractor, HopTrigger, SimulatedCamera};
use crate::perception::{
    Frame, FrameSource, LandmarkSmoother, PerceptionHandle, PerceptionWorker, PoseExtractor,
    SharedChannel, WorkerOptions,
};
use crate::render::{CameraStatus, Hud, Renderer};

/// Pace of the simulated camera, about 30 fps.
const SIM_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Run the game until the player quits.
pub fn run(config: Config) -> anyhow::Result<()> {
    let audio = audio::open(config.muted);
    let channel = Arc::new(SharedChannel::new());
    let mut camera = Camera::start(&config, Arc::clone(&channel));

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, practice = config.invulnerable, "new game");
    let mut game = GameStateMachine::new(seed).with_collisions(!config.invulnerable);

    let result = TerminalGuard::enter()
        .context("cannot switch the terminal to game mode")
        .and_then(|mut terminal| {
            drive(&config, &mut game, &channel, &camera, audio.as_ref(), &mut terminal.out)
        });

    camera.stop();
    info!(score = game.state().score, ticks = game.ticks(), "quit");
    result
}

fn drive(
    config: &Config,
    game: &mut GameStateMachine,
    channel: &SharedChannel,
    camera: &Camera,
    audio: &dyn AudioSink,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let (cols, rows) = terminal::size().context("cannot read terminal size")?;
    let mut renderer = Renderer::new(cols, rows);
    let tick = Duration::from_secs_f64(1.0 / config.tick_hz as f64);
    let mut preview: Option<Arc<Frame>> = None;

    loop {
        let tick_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char('r') => {
                        if !game.restart() {
                            trace!("restart ignored while running");
                        }
                    }
                    KeyCode::Char(' ') | KeyCode::Up => camera.hop(),
                    _ => {}
                },
                Event::Resize(c, r) => renderer.resize(c, r),
                _ => {}
            }
        }

        let report = step(game, channel, &mut preview);
        for event in &report.events {
            if let Some(cue) = Cue::for_event(event) {
                audio.play(cue);
            }
        }

        let hud = Hud {
            preview: preview.as_deref(),
            camera: camera.status,
            practice: config.invulnerable,
        };
        renderer.compose(game, &hud).render(out)?;

        // Frame pacing
        let elapsed = tick_start.elapsed();
        if elapsed < tick {
            thread::sleep(tick - elapsed);
        }
    }
}

/// One tick of the loop minus input and drawing: pick up the newest preview,
/// take the pending jump if the game would act on it, advance the game.
///
/// `preview` keeps the last frame when nothing newer has been published. The
/// latch is only consumed while running, so a jump raised while collided
/// survives until the restart.
pub fn step(
    game: &mut GameStateMachine,
    channel: &SharedChannel,
    preview: &mut Option<Arc<Frame>>,
) -> TickReport {
    if let Some(frame) = channel.latest_frame() {
        *preview = Some(frame);
    }
    let jump = game.accepts_jumps() && channel.take_jump();
    game.tick(jump)
}

// ── Camera ──────────────────────────────────────────────────────────────────

/// An opened camera: frames, the extractor that reads them, and how the HUD
/// should describe it.
struct Backend {
    source: Box<dyn FrameSource>,
    extractor: Box<dyn PoseExtractor>,
    hop: Option<HopTrigger>,
    status: CameraStatus,
}

fn open_backend(mode: CameraMode) -> Result<Backend, CaptureError> {
    match mode {
        CameraMode::Simulated => {
            let (camera, hop) = SimulatedCamera::open(SIM_FRAME_INTERVAL);
            Ok(Backend {
                source: Box::new(camera),
                extractor: Box::new(ColorBlobExtractor::for_simulated_head()),
                hop: Some(hop),
                status: CameraStatus::Simulated,
            })
        }
        CameraMode::Off => Err(CaptureError::Unavailable("disabled by RUNNER_CAMERA".into())),
    }
}

/// The perception side as the loop sees it.
struct Camera {
    handle: Option<PerceptionHandle>,
    hop: Option<HopTrigger>,
    status: CameraStatus,
}

impl Camera {
    /// Open the configured backend and start the worker. Any failure leaves
    /// the game running degraded: no preview and no jumps.
    fn start(config: &Config, channel: Arc<SharedChannel>) -> Self {
        let backend = match open_backend(config.camera) {
            Ok(backend) => backend,
            Err(e) => {
                warn!("running without a camera: {}", e);
                return Self::degraded();
            }
        };
        let worker = PerceptionWorker::new(
            backend.source,
            backend.extractor,
            LandmarkSmoother::from_config(&config.tracking),
            channel,
            WorkerOptions::from_config(&config.tracking),
        );
        match PerceptionHandle::spawn(worker) {
            Ok(handle) => Self {
                handle: Some(handle),
                hop: backend.hop,
                status: backend.status,
            },
            Err(e) => {
                error!("cannot start perception thread: {}", e);
                Self::degraded()
            }
        }
    }

    fn degraded() -> Self {
        Self {
            handle: None,
            hop: None,
            status: CameraStatus::Off,
        }
    }

    fn hop(&self) {
        if let Some(hop) = &self.hop {
            hop.press();
        }
    }

    fn stop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.stop();
        }
    }
}

// ── Terminal ────────────────────────────────────────────────────────────────

/// Raw mode plus the alternate screen, undone on drop.
struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = Self { out: stdout() };
        execute!(
            guard.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let restored = execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )
        .and_then(|_| terminal::disable_raw_mode());
        if let Err(e) = restored {
            error!("cannot restore terminal: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crashed(seed: u64) -> GameStateMachine {
        let mut game = GameStateMachine::new(seed);
        for _ in 0..20_000 {
            if game.tick(false).collided() {
                break;
            }
        }
        assert!(!game.accepts_jumps());
        game
    }

    #[test]
    fn test_step_clears_jump_raised_mid_arc() {
        let channel = SharedChannel::new();
        let mut game = GameStateMachine::new(3);
        let mut preview = None;

        channel.raise_jump();
        assert!(step(&mut game, &channel, &mut preview).jumped());
        assert!(game.player().is_jumping());

        channel.raise_jump();
        let report = step(&mut game, &channel, &mut preview);
        assert!(!report.jumped());
        assert!(!channel.jump_pending());
    }

    #[test]
    fn test_step_keeps_last_preview() {
        let channel = SharedChannel::new();
        let mut game = GameStateMachine::new(3);
        let shown = Arc::new(Frame::new(4, 3, crate::color::WHITE));
        let mut preview = Some(Arc::clone(&shown));

        // Nothing published: the old frame stays up.
        step(&mut game, &channel, &mut preview);
        assert!(Arc::ptr_eq(preview.as_ref().unwrap(), &shown));

        channel.publish_frame(Frame::new(8, 6, crate::color::WHITE));
        step(&mut game, &channel, &mut preview);
        assert_eq!(preview.as_ref().unwrap().width(), 8);
    }

    #[test]
    fn test_step_holds_jump_until_restart() {
        let channel = SharedChannel::new();
        let mut game = crashed(4);
        let mut preview = None;

        channel.raise_jump();
        for _ in 0..30 {
            assert!(!step(&mut game, &channel, &mut preview).jumped());
        }
        assert!(channel.jump_pending());

        assert!(game.restart());
        assert!(step(&mut game, &channel, &mut preview).jumped());
        assert!(!channel.jump_pending());
    }

    #[test]
    fn test_backend_reports_its_status() {
        let backend = open_backend(CameraMode::Simulated).unwrap();
        assert_eq!(backend.status, CameraStatus::Simulated);
        assert!(backend.hop.is_some());
        assert!(matches!(
            open_backend(CameraMode::Off),
            Err(CaptureError::Unavailable(_))
        ));
    }

    #[test]
    fn test_camera_off_is_degraded() {
        let config = Config {
            camera: CameraMode::Off,
            ..Config::default()
        };
        let mut camera = Camera::start(&config, Arc::new(SharedChannel::new()));
        assert_eq!(camera.status, CameraStatus::Off);
        assert!(camera.handle.is_none());
        camera.hop();
        camera.stop();
    }

    #[test]
    fn test_simulated_camera_publishes_preview() {
        let channel = Arc::new(SharedChannel::new());
        let mut camera = Camera::start(&Config::default(), Arc::clone(&channel));
        assert_eq!(camera.status, CameraStatus::Simulated);

        let deadline = Instant::now() + Duration::from_secs(5);
        while channel.latest_frame().is_none() {
            assert!(Instant::now() < deadline, "no preview published");
            thread::sleep(Duration::from_millis(5));
        }
        camera.stop();
        assert!(camera.handle.is_none());
    }
}
