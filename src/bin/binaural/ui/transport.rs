//! Transport bar widget - play state, ear frequencies, volume, audio stats

use binaural_dsp::{engine::state::Diagnostics, EngineState};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Everything the transport bar shows, gathered by the app each frame.
pub struct TransportInfo<'a> {
    pub state: EngineState,
    pub left_hz: f32,
    pub right_hz: f32,
    pub volume: f32,
    pub sample_rate: u32,
    /// Device channel count while a stream is open
    pub channels: Option<u16>,
    pub diagnostics: Diagnostics,
    pub status: Option<&'a str>,
    pub peak_hz: Option<f32>,
}

fn state_style(state: EngineState) -> (&'static str, Color) {
    match state {
        EngineState::Idle => ("■", Color::Yellow),
        EngineState::Starting => ("▷", Color::LightGreen),
        EngineState::Running => ("▶", Color::Green),
        EngineState::Stopping => ("◁", Color::LightYellow),
    }
}

/// Render the transport bar
pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    info: &TransportInfo,
    audio_stats: &AudioStats,
) {
    let block = Block::default()
        .title(" binaural ")
        .borders(Borders::ALL);

    let (symbol, color) = state_style(info.state);
    let sample_rate_khz = info.sample_rate as f32 / 1000.0;
    let channels = match info.channels {
        Some(n) => format!("{n}ch  "),
        None => String::new(),
    };
    let peak = match info.peak_hz {
        Some(hz) => format!("{hz:.0} Hz"),
        None => "-".to_string(),
    };

    let levels = Line::from(vec![
        Span::styled(
            format!(" {} {}  ", symbol, info.state),
            Style::default().fg(color),
        ),
        Span::styled(
            format!("L: {:.1} Hz  R: {:.1} Hz  ", info.left_hz, info.right_hz),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Vol: {:.0}%  ", info.volume * 100.0),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz  {}", sample_rate_khz, channels),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "Peak: {:.2}  RMS: {:.2}  FFT: {}",
                audio_stats.peak, audio_stats.rms, peak
            ),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let d = info.diagnostics;
    let mut health = vec![Span::styled(
        format!(
            " callbacks {}  underruns {}  faults {}  backend {}  ",
            d.callbacks, d.underruns, d.faults, d.backend_errors
        ),
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(status) = info.status {
        health.push(Span::styled(status.to_string(), Style::default().fg(Color::Red)));
    }

    let paragraph = Paragraph::new(vec![levels, Line::from(health)]).block(block);
    frame.render_widget(paragraph, area);
}
