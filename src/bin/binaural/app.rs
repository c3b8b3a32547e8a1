//! Application state, input handling and the UI loop.

use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use binaural_dsp::{scope::ScopeSampler, Engine, EngineConfig, EngineState, StereoFrame};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};

use crate::presets::{self, PRESETS};
use crate::ui::{
    dials::{render_dial, DialSpec},
    presets::render_presets,
    scope::render_scope,
    spectrum::{render_spectrum, SpectrumAnalyzer},
    transport::{render_transport, AudioStats, TransportInfo},
};

const HELP: &str = concat!(
    " [Space] Start/Stop  [←/→] Carrier  [↓/↑] Beat  [Shift] Coarse",
    "  [+/-] Volume  [1-6] Presets  [Q] Quit",
);

/// Redraw period; the scope refreshes at about 30 Hz.
const REFRESH: Duration = Duration::from_millis(30);

const CARRIER_DIAL: DialSpec = DialSpec {
    title: " Carrier ",
    min: 50.0,
    max: 2000.0,
    decimals: 1,
    color: Color::Rgb(76, 175, 80),
};

const BEAT_DIAL: DialSpec = DialSpec {
    title: " Beat ",
    min: 0.1,
    max: 40.0,
    decimals: 2,
    color: Color::Rgb(122, 255, 55),
};

pub struct App {
    engine: Engine,
    sampler: ScopeSampler,
    errors: Receiver<String>,
    /// Last message for the status line
    status: Option<String>,
    /// Latest scope window, split per channel below
    frames: Vec<StereoFrame>,
    left: Vec<f32>,
    right: Vec<f32>,
    mix: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    should_quit: bool,
}

impl App {
    pub fn new(config: EngineConfig, note: Option<String>) -> Self {
        let mut engine = Engine::new(config);

        let (tx, errors) = mpsc::channel();
        engine.on_stream_error(move |err| {
            let _ = tx.send(err.to_string());
        });

        let sampler = engine.sampler();
        let capacity = sampler.capacity();

        Self {
            engine,
            spectrum: SpectrumAnalyzer::new(capacity, config.sample_rate as f32),
            sampler,
            errors,
            status: note,
            frames: Vec::with_capacity(capacity),
            left: Vec::with_capacity(capacity),
            right: Vec::with_capacity(capacity),
            mix: Vec::with_capacity(capacity),
            should_quit: false,
        }
    }

    /// Run the UI event loop until quit, then fade out and close the device.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.tick();

            terminal
                .draw(|frame| self.render(frame))
                .wrap_err("failed to draw frame")?;

            if event::poll(REFRESH)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        self.engine.shutdown();
        Ok(())
    }

    /// Advance the engine and pull fresh scope data.
    fn tick(&mut self) {
        self.engine.poll();

        while let Ok(msg) = self.errors.try_recv() {
            self.status = Some(msg);
        }

        // One read so all three traces show the same window.
        self.sampler.snapshot_frames(&mut self.frames);
        self.left.clear();
        self.right.clear();
        self.mix.clear();
        for frame in &self.frames {
            self.left.push(frame.left);
            self.right.push(frame.right);
            self.mix.push(frame.mono());
        }
        self.spectrum.update(&self.mix);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let coarse = key.modifiers.contains(KeyModifiers::SHIFT);
        let params = self.engine.params();

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.toggle_playback(),
            KeyCode::Left | KeyCode::Right => {
                let step = if coarse { 10.0 } else { 1.0 };
                let delta = if key.code == KeyCode::Left { -step } else { step };
                self.engine
                    .set_carrier_frequency(params.carrier_hz.round() + delta);
            }
            KeyCode::Down | KeyCode::Up => {
                // The beat dial moves in tenths of a hertz.
                let step = if coarse { 10.0 } else { 1.0 };
                let delta = if key.code == KeyCode::Down { -step } else { step };
                let tenths = (params.beat_hz * 10.0).round() + delta;
                self.engine.set_beat_frequency(tenths / 10.0);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.engine.set_gain(params.volume + 0.05);
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                self.engine.set_gain(params.volume - 0.05);
            }
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                self.engine.apply_preset(PRESETS[index].beat_hz);
            }
            _ => {}
        }
    }

    fn toggle_playback(&mut self) {
        match self.engine.state() {
            EngineState::Starting | EngineState::Running => self.engine.stop(),
            EngineState::Idle | EngineState::Stopping => {
                if let Err(err) = self.engine.start() {
                    self.status = Some(err.to_string());
                } else {
                    self.status = None;
                }
            }
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Main layout: transport, controls, scope, spectrum, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Transport
                Constraint::Length(8), // Dials and presets
                Constraint::Min(8),    // Oscilloscope
                Constraint::Length(10), // Spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let params = self.engine.params();
        let info = TransportInfo {
            state: self.engine.state(),
            left_hz: self.engine.left_frequency(),
            right_hz: self.engine.right_frequency(),
            volume: params.volume,
            sample_rate: self
                .engine
                .sample_rate()
                .unwrap_or(self.engine.config().sample_rate),
            channels: self.engine.channels(),
            diagnostics: self.engine.diagnostics(),
            status: self.status.as_deref().or(self.engine.last_warning()),
            peak_hz: self.spectrum.peak_frequency(),
        };
        render_transport(frame, chunks[0], &info, &AudioStats::from_buffer(&self.mix));

        // Carrier dial | presets | beat dial, as 2:1:2
        let controls = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(2, 5),
                Constraint::Ratio(1, 5),
                Constraint::Ratio(2, 5),
            ])
            .split(chunks[1]);
        render_dial(frame, controls[0], &CARRIER_DIAL, params.carrier_hz);
        render_presets(frame, controls[1], presets::matching(params.beat_hz));
        render_dial(frame, controls[2], &BEAT_DIAL, params.beat_hz);

        render_scope(frame, chunks[2], &self.left, &self.right);
        render_spectrum(frame, chunks[3], self.spectrum.data());

        let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}
