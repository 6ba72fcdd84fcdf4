/// Terminal host for the tower viewer
use anyhow::Context;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, info, warn};
use std::io::{stdout, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use towerview_core::{
    stl, PrimitiveTowerParams, TickOutcome, TowerDataset, Viewer, ViewerConfig,
};

pub mod renderer;

pub use renderer::AsciiRenderer;

const ROTATE_STEP: f32 = 0.1;
const ZOOM_STEP: f32 = 1.1;

/// Interactive terminal session around a mounted [`Viewer`]
pub struct TerminalApp {
    viewer: Viewer<AsciiRenderer>,
    target_frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Mount a viewer sized to the current terminal
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        let (cols, rows) = terminal::size().context("failed to query terminal size")?;
        Ok(Self::with_size(config, cols as u32, rows as u32))
    }

    /// Mount a viewer on a `cols` x `rows` character grid
    pub fn with_size(config: ViewerConfig, cols: u32, rows: u32) -> Self {
        let target_frame_time = Duration::from_millis(1000 / u64::from(config.render.target_fps.max(1)));
        let mut viewer = Viewer::new(config, AsciiRenderer::new(0, 0));
        // Cells are about twice as tall as wide
        viewer.mount(cols, rows * 2);

        Self {
            viewer,
            target_frame_time,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn viewer(&self) -> &Viewer<AsciiRenderer> {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer<AsciiRenderer> {
        &mut self.viewer
    }

    pub fn load_dataset(&mut self, path: &Path) -> anyhow::Result<()> {
        let dataset = TowerDataset::load(path)
            .with_context(|| format!("failed to load dataset {}", path.display()))?;
        info!(
            "loaded {} levels and {} devices from {}",
            dataset.levels.len(),
            dataset.devices.len(),
            path.display()
        );
        self.viewer.load_dataset(&dataset)?;
        Ok(())
    }

    pub fn load_primitive(&mut self, path: &Path) -> anyhow::Result<()> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let params = PrimitiveTowerParams::from_json_str(&json)
            .with_context(|| format!("invalid primitive tower in {}", path.display()))?;
        self.viewer.load_primitive_tower(&params)?;
        Ok(())
    }

    /// Replace the generated tower column with an STL model
    pub fn load_model(&mut self, path: &Path) -> anyhow::Result<()> {
        let mesh = stl::load_stl(path)
            .with_context(|| format!("failed to load model {}", path.display()))?;
        info!("loaded {} triangles from {}", mesh.triangles.len(), path.display());
        self.viewer.set_tower_model(mesh)?;
        Ok(())
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        self.viewer.unmount();
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
            }
            if !self.running {
                break;
            }

            if self.viewer.tick()? == TickOutcome::Stop {
                break;
            }
            self.present()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Apply one input event to the orbit controls or the session
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(cols, rows) => {
                debug!("terminal resized to {}x{}", cols, rows);
                self.viewer.resize(cols as u32, rows as u32 * 2);
                if let Err(e) = execute!(stdout(), terminal::Clear(ClearType::All)) {
                    warn!("failed to clear terminal after resize: {}", e);
                }
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        let controls = self.viewer.controls_mut();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => controls.rotate_up(ROTATE_STEP),
            KeyCode::Char('s') | KeyCode::Down => controls.rotate_up(-ROTATE_STEP),
            KeyCode::Char('a') | KeyCode::Left => controls.rotate_left(ROTATE_STEP),
            KeyCode::Char('d') | KeyCode::Right => controls.rotate_left(-ROTATE_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => controls.zoom(1.0 / ZOOM_STEP),
            KeyCode::Char('-') => controls.zoom(ZOOM_STEP),
            KeyCode::Char(' ') => controls.auto_rotate = !controls.auto_rotate,
            _ => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn present(&mut self) -> anyhow::Result<()> {
        let mut stdout = stdout();
        self.viewer.renderer().draw(&mut stdout)?;

        // UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Towerview | FPS: {:.1} | WASD/Arrows=Orbit +/-=Zoom Space=Spin Q=Quit",
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use towerview_core::{Device, Equipment, Level, Status, Tower};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app() -> TerminalApp {
        let mut app = TerminalApp::with_size(ViewerConfig::default(), 80, 24);
        let dataset = TowerDataset {
            tower: Tower::new(180.0).unwrap(),
            levels: vec![Level::new(72.0, Status::Available)],
            devices: vec![Device::new(147.0, Status::Busy, Equipment::with_dimensions(11.9, 96.6, 7.1))],
        };
        app.viewer_mut().load_dataset(&dataset).unwrap();
        app
    }

    #[test]
    fn test_mounts_with_cell_aspect() {
        let app = app();
        assert!(app.viewer().is_mounted());
        assert_eq!(app.viewer().renderer().size(), (80, 24));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.handle_event(press(KeyCode::Char('x')));
        assert!(app.is_running());
        app.handle_event(press(KeyCode::Esc));
        assert!(!app.is_running());
    }

    #[test]
    fn test_zoom_key_moves_camera() {
        let mut app = app();
        let before = app.viewer().scene().unwrap().camera().distance();
        app.handle_event(press(KeyCode::Char('+')));
        app.viewer_mut().tick().unwrap();
        let after = app.viewer().scene().unwrap().camera().distance();
        assert!(after < before);
    }

    #[test]
    fn test_space_toggles_auto_rotate() {
        let mut app = app();
        app.handle_event(press(KeyCode::Char(' ')));
        assert!(app.viewer_mut().controls_mut().auto_rotate);
        app.handle_event(press(KeyCode::Char(' ')));
        assert!(!app.viewer_mut().controls_mut().auto_rotate);
    }

    #[test]
    fn test_resize_event_resizes_buffer() {
        let mut app = app();
        app.handle_event(Event::Resize(100, 30));
        assert_eq!(app.viewer().renderer().size(), (100, 30));
    }

    #[test]
    fn test_tick_draws_tower() {
        let mut app = app();
        app.viewer_mut().tick().unwrap();
        assert!(app.viewer().renderer().covered() > 0);
    }
}
