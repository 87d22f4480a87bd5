use std::f64::consts::TAU;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSettings {
    pub sample_rate: u32,
    /// Length of the tone in seconds.
    pub duration: f32,
    pub volume: f32,
    /// Frequency in Hz that a ratio of 1.0 maps to.
    pub reference_pitch: f32,
}

impl Default for ToneSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            duration: 5.0,
            volume: 0.5,
            reference_pitch: 440.0,
        }
    }
}

impl ToneSettings {
    pub fn sample_count(&self) -> usize {
        (self.sample_rate as f64 * self.duration as f64).round() as usize
    }
}

/// A mono buffer ready to be written to an output device.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl ToneBuffer {
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// Average of two sines at `ratio_a * reference_pitch` and `ratio_b *
/// reference_pitch`, scaled by the volume.
pub fn synthesize(ratio_a: f64, ratio_b: f64, settings: &ToneSettings) -> ToneBuffer {
    let rate = settings.sample_rate as f64;
    let step_a = TAU * ratio_a * settings.reference_pitch as f64 / rate;
    let step_b = TAU * ratio_b * settings.reference_pitch as f64 / rate;
    let volume = settings.volume as f64;

    let samples = (0..settings.sample_count())
        .map(|n| {
            let n = n as f64;
            let mixed = ((step_a * n).sin() + (step_b * n).sin()) / 2.0;
            (volume * mixed) as f32
        })
        .collect();

    ToneBuffer {
        samples,
        sample_rate: settings.sample_rate,
    }
}
