use thiserror::Error;

use crate::notes::NoteTable;

/// Amplitude applied to a wave when a note resets its voice.
pub const NOTE_AMPLITUDE: f64 = 5.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("{0} must be a finite number")]
    NotFinite(f64),
    #[error("unknown note: {0}")]
    UnknownNote(String),
}

/// The five scalars of `X = A sin(a t + delta)`, `Y = B sin(b t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LissajousParams {
    pub amplitude_x: f64,
    pub amplitude_y: f64,
    pub frequency_x: f64,
    pub frequency_y: f64,
    pub phase: f64,
}

impl Default for LissajousParams {
    fn default() -> Self {
        Self {
            amplitude_x: 10.0,
            amplitude_y: 10.0,
            frequency_x: 3.0,
            frequency_y: 2.0,
            phase: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    AmplitudeX,
    AmplitudeY,
    FrequencyX,
    FrequencyY,
    Phase,
}

impl ParamField {
    pub const ALL: [ParamField; 5] = [
        ParamField::AmplitudeX,
        ParamField::AmplitudeY,
        ParamField::FrequencyX,
        ParamField::FrequencyY,
        ParamField::Phase,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ParamField::AmplitudeX => "A amplitude",
            ParamField::AmplitudeY => "B amplitude",
            ParamField::FrequencyX => "A frequency",
            ParamField::FrequencyY => "B frequency",
            ParamField::Phase => "Phase Shift",
        }
    }

    /// Slider range for the field.
    pub fn range(self) -> std::ops::RangeInclusive<f64> {
        match self {
            ParamField::AmplitudeX | ParamField::AmplitudeY => 0.0..=10.0,
            ParamField::FrequencyX | ParamField::FrequencyY => 0.0..=16.0,
            ParamField::Phase => 0.0..=std::f64::consts::TAU,
        }
    }
}

/// Which of the two oscillations a note list drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteSelectBehavior {
    /// Only the wave's frequency changes.
    #[default]
    FrequencyOnly,
    /// Also set the wave's amplitude to [`NOTE_AMPLITUDE`] and clear the phase.
    ResetVoice,
}

impl LissajousParams {
    pub fn get(&self, field: ParamField) -> f64 {
        match field {
            ParamField::AmplitudeX => self.amplitude_x,
            ParamField::AmplitudeY => self.amplitude_y,
            ParamField::FrequencyX => self.frequency_x,
            ParamField::FrequencyY => self.frequency_y,
            ParamField::Phase => self.phase,
        }
    }

    fn slot(&mut self, field: ParamField) -> &mut f64 {
        match field {
            ParamField::AmplitudeX => &mut self.amplitude_x,
            ParamField::AmplitudeY => &mut self.amplitude_y,
            ParamField::FrequencyX => &mut self.frequency_x,
            ParamField::FrequencyY => &mut self.frequency_y,
            ParamField::Phase => &mut self.phase,
        }
    }
}

/// Parse the text of an entry field into a parameter value.
pub fn parse_value(text: &str) -> Result<f64, ParamError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| ParamError::NotANumber(text.trim().to_string()))?;
    if !value.is_finite() {
        return Err(ParamError::NotFinite(value));
    }
    Ok(value)
}

/// The parameters plus the note table that note selections read from.
pub struct ParameterStore {
    params: LissajousParams,
    notes: NoteTable,
    behavior: NoteSelectBehavior,
}

impl ParameterStore {
    pub fn new(params: LissajousParams, notes: NoteTable, behavior: NoteSelectBehavior) -> Self {
        Self {
            params,
            notes,
            behavior,
        }
    }

    pub fn params(&self) -> LissajousParams {
        self.params
    }

    pub fn notes(&self) -> &NoteTable {
        &self.notes
    }

    pub fn set(&mut self, field: ParamField, value: f64) -> Result<(), ParamError> {
        if !value.is_finite() {
            return Err(ParamError::NotFinite(value));
        }
        *self.params.slot(field) = value;
        Ok(())
    }

    pub fn set_from_text(&mut self, field: ParamField, text: &str) -> Result<f64, ParamError> {
        let value = parse_value(text)?;
        self.set(field, value)?;
        Ok(value)
    }

    /// Apply a note from the table to one wave.
    pub fn select_note(&mut self, wave: Wave, name: &str) -> Result<f64, ParamError> {
        let ratio = self
            .notes
            .lookup(name)
            .ok_or_else(|| ParamError::UnknownNote(name.to_string()))?;

        let (frequency, amplitude) = match wave {
            Wave::X => (ParamField::FrequencyX, ParamField::AmplitudeX),
            Wave::Y => (ParamField::FrequencyY, ParamField::AmplitudeY),
        };
        *self.params.slot(frequency) = ratio;
        if self.behavior == NoteSelectBehavior::ResetVoice {
            *self.params.slot(amplitude) = NOTE_AMPLITUDE;
            self.params.phase = 0.0;
        }

        log::debug!("Selected {} for wave {:?} (ratio {:.4})", name, wave, ratio);
        Ok(ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(behavior: NoteSelectBehavior) -> ParameterStore {
        let params = LissajousParams {
            phase: 1.25,
            ..LissajousParams::default()
        };
        ParameterStore::new(params, NoteTable::default(), behavior)
    }

    #[test]
    fn test_defaults() {
        let params = LissajousParams::default();
        assert_eq!(params.amplitude_x, 10.0);
        assert_eq!(params.amplitude_y, 10.0);
        assert_eq!(params.frequency_x, 3.0);
        assert_eq!(params.frequency_y, 2.0);
        assert_eq!(params.phase, 0.0);
    }

    #[test]
    fn test_select_note_only_touches_frequency() {
        let mut store = store(NoteSelectBehavior::FrequencyOnly);
        let before = store.params();

        let ratio = store.select_note(Wave::X, "E5").unwrap();
        assert_eq!(ratio, 1.5);

        let after = store.params();
        assert_eq!(after.frequency_x, 1.5);
        assert_eq!(after.amplitude_x, before.amplitude_x);
        assert_eq!(after.amplitude_y, before.amplitude_y);
        assert_eq!(after.frequency_y, before.frequency_y);
        assert_eq!(after.phase, before.phase);
    }

    #[test]
    fn test_select_note_for_second_wave() {
        let mut store = store(NoteSelectBehavior::FrequencyOnly);
        let before = store.params();

        store.select_note(Wave::Y, "A6").unwrap();
        let after = store.params();
        assert_eq!(after.frequency_y, 4.0);
        assert_eq!(after.frequency_x, before.frequency_x);
    }

    #[test]
    fn test_reset_voice_sets_amplitude_and_clears_phase() {
        let mut store = store(NoteSelectBehavior::ResetVoice);
        let before = store.params();

        store.select_note(Wave::Y, "C#5").unwrap();
        let after = store.params();
        assert_eq!(after.frequency_y, 1.25);
        assert_eq!(after.amplitude_y, NOTE_AMPLITUDE);
        assert_eq!(after.phase, 0.0);
        // The other wave is left alone.
        assert_eq!(after.amplitude_x, before.amplitude_x);
        assert_eq!(after.frequency_x, before.frequency_x);
    }

    #[test]
    fn test_unknown_note_leaves_params() {
        let mut store = store(NoteSelectBehavior::ResetVoice);
        let before = store.params();
        assert_eq!(
            store.select_note(Wave::X, "Z9"),
            Err(ParamError::UnknownNote("Z9".to_string()))
        );
        assert_eq!(store.params(), before);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("3"), Ok(3.0));
        assert_eq!(parse_value("  -0.25 "), Ok(-0.25));
        assert_eq!(parse_value("1e2"), Ok(100.0));
        assert_eq!(parse_value("abc"), Err(ParamError::NotANumber("abc".to_string())));
        assert_eq!(parse_value(""), Err(ParamError::NotANumber(String::new())));
        assert!(matches!(parse_value("inf"), Err(ParamError::NotFinite(_))));
        assert!(matches!(parse_value("NaN"), Err(ParamError::NotFinite(_))));
    }

    #[test]
    fn test_invalid_text_keeps_last_value() {
        let mut store = store(NoteSelectBehavior::FrequencyOnly);
        assert_eq!(store.set_from_text(ParamField::AmplitudeX, "7.5"), Ok(7.5));
        assert!(store.set_from_text(ParamField::AmplitudeX, "7.5x").is_err());
        assert_eq!(store.params().get(ParamField::AmplitudeX), 7.5);
    }

    #[test]
    fn test_set_rejects_non_finite() {
        let mut store = store(NoteSelectBehavior::FrequencyOnly);
        assert!(store.set(ParamField::Phase, f64::INFINITY).is_err());
        assert_eq!(store.params().phase, 1.25);
        store.set(ParamField::Phase, 0.5).unwrap();
        assert_eq!(store.params().get(ParamField::Phase), 0.5);
    }
}
