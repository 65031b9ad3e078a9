use std::collections::HashMap;

use asteroids_core::{AudioSink, SoundEvent};

/// Headless audio output: every cue is logged at `trace` and counted.
#[derive(Debug, Default)]
pub struct TraceSink {
    counts: HashMap<SoundEvent, u64>,
    total: u64,
}

impl TraceSink {
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn count(&self, event: SoundEvent) -> u64 {
        self.counts.get(&event).copied().unwrap_or(0)
    }
}

impl AudioSink for TraceSink {
    fn play(&mut self, event: SoundEvent) {
        let cue = event.cue();
        tracing::trace!(
            ?event,
            notes = cue.len(),
            first_hz = ?cue.first().map(|note| note.tone.frequency),
            "sound"
        );
        *self.counts.entry(event).or_default() += 1;
        self.total += 1;
    }
}
