use clap::Parser;
use thiserror::Error;

use crate::curve::SampleRange;
use crate::params::NoteSelectBehavior;
use crate::tone::ToneSettings;

/// Longest tone, in seconds.
pub const MAX_DURATION: f32 = 60.0;
/// Most samples a tone buffer may hold (60 s at 192 kHz).
pub const MAX_TONE_SAMPLES: usize = 192_000 * 60;
/// Most points a curve may hold.
pub const MAX_CURVE_SAMPLES: usize = 1_000_000;

#[derive(Parser, Debug)]
#[command(name = "lissajous-generator")]
#[command(about = "Draw Lissajous curves and play the tones they are made from")]
pub struct Cli {
    /// Output sample rate in Hz.
    #[arg(long, default_value_t = 44100)]
    pub sample_rate: u32,
    /// Tone length in seconds.
    #[arg(long, default_value_t = 5.0)]
    pub duration: f32,
    /// Playback volume between 0 and 1.
    #[arg(long, default_value_t = 0.5)]
    pub volume: f32,
    /// Frequency in Hz that a frequency of 1.0 plays at.
    #[arg(long, default_value_t = 440.0)]
    pub reference_pitch: f32,
    /// Number of curve samples.
    #[arg(long, default_value_t = 10001)]
    pub samples: usize,
    /// Distance in t between curve samples.
    #[arg(long, default_value_t = 0.01)]
    pub t_step: f64,
    /// Picking a note also sets that wave's amplitude to 5 and clears the phase.
    #[arg(long)]
    pub reset_on_note: bool,
    /// Show sliders next to the entry fields.
    #[arg(long)]
    pub sliders: bool,
    /// Do not open the audio device.
    #[arg(long)]
    pub mute: bool,
}

#[derive(Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("sample rate must be positive")]
    SampleRate,
    #[error("duration must be between 0 and {max} seconds, got {0}", max = MAX_DURATION)]
    Duration(f32),
    #[error("tone would need {0} samples, at most {max} are allowed", max = MAX_TONE_SAMPLES)]
    ToneTooLong(usize),
    #[error("volume must be between 0 and 1, got {0}")]
    Volume(f32),
    #[error("reference pitch must be a positive frequency, got {0}")]
    ReferencePitch(f32),
    #[error("at least one curve sample is required")]
    SampleCount,
    #[error("at most {max} curve samples are allowed, got {0}", max = MAX_CURVE_SAMPLES)]
    TooManyCurveSamples(usize),
    #[error("t step must be finite and positive, got {0}")]
    Step(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub tone: ToneSettings,
    pub range: SampleRange,
    pub note_behavior: NoteSelectBehavior,
    pub show_sliders: bool,
    pub audio_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tone: ToneSettings::default(),
            range: SampleRange::default(),
            note_behavior: NoteSelectBehavior::default(),
            show_sliders: false,
            audio_enabled: true,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let tone = &self.tone;
        if tone.sample_rate == 0 {
            return Err(SettingsError::SampleRate);
        }
        if !(0.0..=MAX_DURATION).contains(&tone.duration) {
            return Err(SettingsError::Duration(tone.duration));
        }
        if tone.sample_count() > MAX_TONE_SAMPLES {
            return Err(SettingsError::ToneTooLong(tone.sample_count()));
        }
        if !(0.0..=1.0).contains(&tone.volume) {
            return Err(SettingsError::Volume(tone.volume));
        }
        if !tone.reference_pitch.is_finite() || tone.reference_pitch <= 0.0 {
            return Err(SettingsError::ReferencePitch(tone.reference_pitch));
        }
        if self.range.count == 0 {
            return Err(SettingsError::SampleCount);
        }
        if self.range.count > MAX_CURVE_SAMPLES {
            return Err(SettingsError::TooManyCurveSamples(self.range.count));
        }
        if !self.range.step.is_finite() || self.range.step <= 0.0 {
            return Err(SettingsError::Step(self.range.step));
        }
        Ok(())
    }
}

impl TryFrom<Cli> for Settings {
    type Error = SettingsError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let settings = Settings {
            tone: ToneSettings {
                sample_rate: cli.sample_rate,
                duration: cli.duration,
                volume: cli.volume,
                reference_pitch: cli.reference_pitch,
            },
            range: SampleRange {
                count: cli.samples,
                step: cli.t_step,
                ..SampleRange::default()
            },
            note_behavior: if cli.reset_on_note {
                NoteSelectBehavior::ResetVoice
            } else {
                NoteSelectBehavior::FrequencyOnly
            },
            show_sliders: cli.sliders,
            audio_enabled: !cli.mute,
        };
        settings.validate()?;
        Ok(settings)
    }
}
