/// Frequency ratios relative to A4 for one octave, just-tuned to A major using
/// 7-limit just intonation.
const OCTAVE_RATIOS: [(&str, f64); 12] = [
    ("A", 1.0),
    ("A#", 16.0 / 15.0),
    ("B", 8.0 / 7.0),
    ("C", 6.0 / 5.0),
    ("C#", 5.0 / 4.0),
    ("D", 4.0 / 3.0),
    ("D#", 10.0 / 7.0),
    ("E", 3.0 / 2.0),
    ("F", 8.0 / 5.0),
    ("F#", 5.0 / 3.0),
    ("G", 7.0 / 4.0),
    ("G#", 15.0 / 8.0),
];

const OCTAVES: usize = 3;
const FIRST_OCTAVE: u32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub name: String,
    pub ratio: f64,
}

/// Ordered note-name to frequency-ratio lookup.
#[derive(Debug, Clone)]
pub struct NoteTable {
    notes: Vec<Note>,
}

impl NoteTable {
    /// A4 through G#7. Octave numbers follow scientific pitch notation, so they
    /// tick over at C rather than at A.
    pub fn just_a_major() -> Self {
        let mut notes = Vec::with_capacity(OCTAVES * OCTAVE_RATIOS.len());
        for octave in 0..OCTAVES {
            let multiplier = (1u32 << octave) as f64;
            for &(pitch, ratio) in OCTAVE_RATIOS.iter() {
                let octave_number = FIRST_OCTAVE + octave as u32 + u32::from(starts_octave(pitch));
                notes.push(Note {
                    name: format!("{}{}", pitch, octave_number),
                    ratio: ratio * multiplier,
                });
            }
        }
        Self { notes }
    }

    pub fn lookup(&self, name: &str) -> Option<f64> {
        self.notes.iter().find(|n| n.name == name).map(|n| n.ratio)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }
}

impl Default for NoteTable {
    fn default() -> Self {
        Self::just_a_major()
    }
}

// Pitches from C upward belong to the next scientific octave.
fn starts_octave(pitch: &str) -> bool {
    !matches!(pitch, "A" | "A#" | "B")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_table_spans_a4_to_g_sharp_7() {
        let table = NoteTable::just_a_major();
        assert_eq!(table.iter().count(), 36);

        let names: Vec<&str> = table.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"A4"));
        assert_eq!(names.last(), Some(&"G#7"));
        assert_eq!(&names[..5], &["A4", "A#4", "B4", "C5", "C#5"]);
        assert_eq!(&names[12..15], &["A5", "A#5", "B5"]);
        assert_eq!(names[15], "C6");
    }

    #[test]
    fn test_ratios_match_just_intonation() {
        let table = NoteTable::just_a_major();
        assert_relative_eq!(table.lookup("A4").unwrap(), 1.0);
        assert_relative_eq!(table.lookup("E5").unwrap(), 1.5);
        assert_relative_eq!(table.lookup("D#5").unwrap(), 10.0 / 7.0);
        assert_relative_eq!(table.lookup("A5").unwrap(), 2.0);
        assert_relative_eq!(table.lookup("B6").unwrap(), 32.0 / 7.0);
        assert_relative_eq!(table.lookup("C#7").unwrap(), 5.0);
        assert_relative_eq!(table.lookup("G#7").unwrap(), 15.0 / 2.0);
    }

    #[test]
    fn test_unknown_note() {
        let table = NoteTable::default();
        assert_eq!(table.lookup("H4"), None);
        assert_eq!(table.lookup("A8"), None);
    }

    #[test]
    fn test_ratios_increase_monotonically() {
        let table = NoteTable::default();
        let ratios: Vec<f64> = table.iter().map(|n| n.ratio).collect();
        assert!(ratios.windows(2).all(|w| w[0] < w[1]));
    }
}
