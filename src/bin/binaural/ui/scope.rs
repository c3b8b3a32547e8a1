//! Stereo oscilloscope widget

use binaural_dsp::scope::resample;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Braille cells hold two dots across.
const DOTS_PER_CELL: usize = 2;

/// Convert a trace to chart points spanning x in `[0, 1]`.
fn points(trace: &[f32], width: usize) -> Vec<(f64, f64)> {
    let resampled = resample(trace, width);
    let last = width.saturating_sub(1).max(1) as f64;
    resampled
        .iter()
        .enumerate()
        .map(|(i, &s)| (i as f64 / last, s as f64))
        .collect()
}

/// Render left and right traces overlaid.
pub fn render_scope(frame: &mut Frame, area: Rect, left: &[f32], right: &[f32]) {
    let block = Block::default()
        .title(" Oscilloscope (L green / R cyan) ")
        .borders(Borders::ALL);

    let width = (area.width.saturating_sub(2) as usize * DOTS_PER_CELL).max(2);
    let left = points(left, width);
    let right = points(right, width);

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&left),
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&right),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
