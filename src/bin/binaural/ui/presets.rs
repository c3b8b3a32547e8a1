//! Preset list with the active entry highlighted.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::presets::PRESETS;

pub fn render_presets(frame: &mut Frame, area: Rect, active: Option<usize>) {
    let block = Block::default().title(" Presets ").borders(Borders::ALL);

    let lines: Vec<Line> = PRESETS
        .iter()
        .enumerate()
        .map(|(i, preset)| {
            let style = if active == Some(i) {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:>4} Hz {}", preset.beat_hz, preset.name), style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
