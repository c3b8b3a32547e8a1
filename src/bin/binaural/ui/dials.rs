//! Frequency dials drawn as labelled gauges.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
    Frame,
};

/// Static description of one dial.
pub struct DialSpec {
    pub title: &'static str,
    pub min: f32,
    pub max: f32,
    pub decimals: usize,
    pub color: Color,
}

impl DialSpec {
    /// Position of `value` along the dial, in `[0, 1]`.
    pub fn ratio(&self, value: f32) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 || !value.is_finite() {
            return 0.0;
        }
        (((value - self.min) / span) as f64).clamp(0.0, 1.0)
    }
}

pub fn render_dial(frame: &mut Frame, area: Rect, spec: &DialSpec, value: f32) {
    let block = Block::default().title(spec.title).borders(Borders::ALL);

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(spec.color).bg(Color::Black))
        .ratio(spec.ratio(value))
        .label(format!("{:.*} Hz", spec.decimals, value));

    frame.render_widget(gauge, area);
}
