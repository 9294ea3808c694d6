use crate::config::Settings;
use crate::input::{poll_actions, Action};
use crate::raster::BrailleSurface;
use crate::sim::Aquarium;
use crate::surface::Surface;
use crate::term::Terminal;
use crossterm::style::Color;
use log::{debug, info};
use std::time::{Duration, Instant};

const HUD_FG: Color = Color::Rgb { r: 200, g: 220, b: 235 };

/// Decision ticks allowed to run in one frame after a stall.
const MAX_CATCH_UP: u32 = 5;

pub(crate) struct App {
    settings: Settings,
    term: Terminal,
    surface: BrailleSurface,
    aquarium: Aquarium,
    seed: u64,
    paused: bool,
    show_hud: bool,
    should_quit: bool,
    clock: Clock,
    fps_est: f64,
}

/// Simulation time plus the fixed-step accumulator for decision ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Clock {
    step: Duration,
    accum: Duration,
    sim_time: Duration,
}

impl Clock {
    pub(crate) fn new(step: Duration) -> Self {
        Self {
            step,
            accum: Duration::ZERO,
            sim_time: Duration::ZERO,
        }
    }

    /// Feeds one frame of wall time and returns how many update ticks are due.
    /// A paused frame moves nothing.
    pub(crate) fn advance(&mut self, real_dt: Duration, paused: bool) -> u32 {
        if paused {
            return 0;
        }
        self.sim_time += real_dt;
        self.accum = self.accum.saturating_add(real_dt).min(self.step * MAX_CATCH_UP);

        let mut ticks = 0;
        while self.accum >= self.step {
            self.accum -= self.step;
            ticks += 1;
        }
        ticks
    }

    pub(crate) fn seconds(&self) -> f64 {
        self.sim_time.as_secs_f64()
    }
}

impl App {
    fn init(settings: Settings) -> anyhow::Result<Self> {
        let term = Terminal::begin()?;
        let surface = BrailleSurface::new(term.cols, term.rows, settings.scale);

        let seed = settings.seed.unwrap_or_else(rand::random);
        let aquarium = Aquarium::new(
            surface.width(),
            surface.height(),
            settings.fish,
            settings.weeds,
            seed,
        );
        info!(
            "tank {}x{} cells, {:.0}x{:.0} world, {} fish, {} weeds, seed {seed}",
            term.cols,
            term.rows,
            surface.width(),
            surface.height(),
            settings.fish,
            settings.weeds
        );

        let clock = Clock::new(settings.update_interval());

        Ok(Self {
            show_hud: settings.hud,
            settings,
            term,
            surface,
            aquarium,
            seed,
            paused: false,
            should_quit: false,
            clock,
            fps_est: 0.0,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = self.settings.frame_time();
        let mut last_frame = Instant::now();

        while !self.should_quit {
            let frame_start = Instant::now();

            for action in poll_actions()? {
                self.apply(action);
            }
            if self.should_quit {
                break;
            }

            let real_dt = frame_start.saturating_duration_since(last_frame);
            last_frame = frame_start;
            if real_dt > Duration::ZERO {
                let inst = 1.0 / real_dt.as_secs_f64();
                self.fps_est = if self.fps_est == 0.0 { inst } else { self.fps_est * 0.9 + inst * 0.1 };
            }

            for _ in 0..self.clock.advance(real_dt, self.paused) {
                let report = self.aquarium.update();
                debug!("update {report:?}, {} bubbles", self.aquarium.bubbles.len());
            }

            self.render_frame()?;

            spin_sleep(frame_dt, frame_start);
        }

        info!("quit after {:.1}s of tank time", self.clock.seconds());
        Ok(())
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::TogglePause => {
                self.paused = !self.paused;
                debug!("paused: {}", self.paused);
            }
            Action::ToggleHud => self.show_hud = !self.show_hud,
            Action::Redraw => self.term.request_full_redraw(),
            Action::Resize(cols, rows) => {
                self.term.resize(cols, rows);
                self.surface = BrailleSurface::new(cols, rows, self.settings.scale);
                info!("resized to {cols}x{rows} cells");
            }
        }
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let t = self.clock.seconds();
        if self.paused {
            self.aquarium.draw(&mut self.surface, t);
        } else {
            self.aquarium.render(&mut self.surface, t);
        }
        self.surface.to_cells(&mut self.term.cur);

        if self.show_hud {
            let line = self.hud_line();
            self.term.cur.draw_text(0, 0, &line, HUD_FG);
        }

        self.term.present()?;
        Ok(())
    }

    fn hud_line(&self) -> String {
        hud_text(
            self.aquarium.fishes.len(),
            self.aquarium.bubbles.len(),
            self.seed,
            self.fps_est,
            self.paused,
        )
    }
}

fn hud_text(fish: usize, bubbles: usize, seed: u64, fps: f64, paused: bool) -> String {
    let state = if paused { "PAUSED" } else { "" };
    format!(
        " fish {fish}  bubbles {bubbles}  seed {seed}  {fps:>3.0} fps  p/space pause  h hud  q quit {state}"
    )
}

pub(crate) fn run(settings: Settings) -> anyhow::Result<()> {
    let mut app = App::init(settings)?;
    app.run()
}

fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        if end - t > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
