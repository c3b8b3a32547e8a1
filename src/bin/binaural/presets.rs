//! Beat-frequency presets shown in the preset panel.

pub struct Preset {
    pub name: &'static str,
    pub beat_hz: f32,
}

pub const PRESETS: [Preset; 6] = [
    Preset { name: "Deep sleep/Healing", beat_hz: 2.5 },
    Preset { name: "Astral/OBE/RV", beat_hz: 4.0 },
    Preset { name: "Creativity/Calm", beat_hz: 7.0 },
    Preset { name: "Relaxation/Flow", beat_hz: 10.0 },
    Preset { name: "Focus/Energy", beat_hz: 16.0 },
    Preset { name: "Peak Cognition", beat_hz: 40.0 },
];

/// Index of the preset whose beat matches `beat_hz`, if any.
pub fn matching(beat_hz: f32) -> Option<usize> {
    PRESETS
        .iter()
        .position(|p| (p.beat_hz - beat_hz).abs() < 0.05)
}
