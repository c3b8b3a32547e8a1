use rtrb::Consumer;

/// Control messages sent from the UI thread to the audio thread.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    SetCarrier { hz: f32 },
    SetBeat { hz: f32 },
    SetVolume { level: f32 },
    /// Open the gate: ramp gain up to the volume.
    FadeIn,
    /// Close the gate: ramp gain down to silence.
    FadeOut,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}
