//! Spectrum analyzer widget
//!
//! FFT of the mixed scope trace on log-spaced bins, plus the strongest
//! bin so the two tones can be read off as numbers.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Number of frequency bins to display
const SPECTRUM_BINS: usize = 64;

/// Upper edge of the display; carriers top out at 2 kHz.
const MAX_DISPLAY_HZ: f32 = 4_000.0;

/// Power below this is treated as silence when looking for a peak.
const PEAK_FLOOR_DB: f64 = -60.0;

pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    /// FFT bin index for each display point
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (frequency_hz, magnitude_db) per display point
    spectrum: Vec<(f64, f64)>,
    sample_rate: f32,
    peak_hz: Option<f32>,
}

impl SpectrumAnalyzer {
    /// `buffer_len` is the FFT size; shorter traces are zero-padded.
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let buffer_len = buffer_len.max(2);
        let fft = FftPlanner::new().plan_fft_forward(buffer_len);

        let denom = (buffer_len - 1) as f32;
        let window: Vec<f32> = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        // Log-spaced from 20 Hz to the lower of Nyquist and the display edge
        let max_freq = (sample_rate / 2.0).min(MAX_DISPLAY_HZ).max(21.0) as f64;
        let min_freq = 20.0f64;
        let ratio = max_freq / min_freq;
        let half = buffer_len / 2;

        let mut spectrum = Vec::with_capacity(SPECTRUM_BINS);
        let mut bin_indices = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
            let freq = min_freq * ratio.powf(t);
            let index = (freq * buffer_len as f64 / sample_rate as f64).round() as usize;
            bin_indices.push(index.min(half - 1));
            spectrum.push((freq, -120.0));
        }

        Self {
            window,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
            sample_rate,
            peak_hz: None,
        }
    }

    /// Recompute the spectrum from the latest trace.
    pub fn update(&mut self, buffer: &[f32]) {
        for (i, bin) in self.scratch.iter_mut().enumerate() {
            let sample = buffer.get(i).copied().unwrap_or(0.0);
            *bin = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.scratch);

        let half = self.scratch.len() / 2;
        let norm = (self.scratch.len() as f32 / 2.0).powi(2);
        let power_db =
            |bin: Complex<f32>| 10.0 * ((bin.norm_sqr() / norm).max(1e-12) as f64).log10();

        for ((_, magnitude_db), &idx) in self.spectrum.iter_mut().zip(&self.bin_indices) {
            *magnitude_db = power_db(self.scratch[idx]);
        }

        self.peak_hz = self.scratch[1..half]
            .iter()
            .enumerate()
            .map(|(i, &bin)| (i + 1, power_db(bin)))
            .filter(|&(_, db)| db > PEAK_FLOOR_DB)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i as f32 * self.sample_rate / self.scratch.len() as f32);
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }

    /// Frequency of the strongest bin, `None` when the trace is silent.
    pub fn peak_frequency(&self) -> Option<f32> {
        self.peak_hz
    }
}

/// Render the spectrum analyzer widget
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default()
        .title(" Spectrum ")
        .borders(Borders::ALL);

    // Log frequency on x so the low carriers are not squashed
    let data: Vec<(f64, f64)> = spectrum.iter().map(|&(f, db)| (f.log10(), db)).collect();
    let (min_x, max_x) = match (data.first(), data.last()) {
        (Some(first), Some(last)) if last.0 > first.0 => (first.0, last.0),
        _ => (0.0, 1.0),
    };

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec!["20", "200", "2k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-100.0, 0.0])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
