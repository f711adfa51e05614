//! The two built-in melodies.
//!
//! Each melody is a pair of parallel tables: pitches in Hz (0 = rest) and the
//! on-time of each pitch in milliseconds.

/// An immutable melody: `pitches[i]` sounds for `durations[i]` ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Melody {
    pitches: &'static [u32],
    durations: &'static [u32],
}

impl Melody {
    /// Pair up a pitch table with its duration table.
    ///
    /// Panics (at compile time when used in a `const`) if the tables differ in
    /// length or are empty.
    pub const fn new(pitches: &'static [u32], durations: &'static [u32]) -> Self {
        assert!(
            pitches.len() == durations.len(),
            "pitch and duration tables must have the same length"
        );
        assert!(!pitches.is_empty(), "a melody needs at least one note");
        Self { pitches, durations }
    }

    pub const fn len(&self) -> usize {
        self.pitches.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    /// Pitch and duration of note `index`, if it exists.
    pub fn note(&self, index: usize) -> Option<(u32, u32)> {
        Some((*self.pitches.get(index)?, *self.durations.get(index)?))
    }

    pub fn pitches(&self) -> &'static [u32] {
        self.pitches
    }

    pub fn durations(&self) -> &'static [u32] {
        self.durations
    }

    /// Total playing time in milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.durations.iter().map(|&d| d as u64).sum()
    }
}

/// Index of the short "Happy Birthday" rendition.
pub const SHORT: usize = 0;
/// Index of the extended tune.
pub const LONG: usize = 1;

/// Every melody the player can pick from, indexed by [`SHORT`] and [`LONG`].
pub static LIBRARY: [Melody; 2] = [
    Melody::new(&HAPPY_BIRTHDAY_PITCHES, &HAPPY_BIRTHDAY_DURATIONS),
    Melody::new(&EXTENDED_PITCHES, &EXTENDED_DURATIONS),
];

const HAPPY_BIRTHDAY_PITCHES: [u32; 25] = [
    264, 264, 297, 264, 352, 330, // Happy birthday to you
    264, 264, 297, 264, 396, 352, // Happy birthday to you
    264, 264, 528, 440, 352, 330, 297, // Happy birthday dear
    466, 466, 440, 352, 396, 352, // Happy birthday to you
];

const HAPPY_BIRTHDAY_DURATIONS: [u32; 25] = [
    250, 250, 500, 500, 500, 1000, //
    250, 250, 500, 500, 500, 1000, //
    250, 250, 500, 500, 500, 500, 1000, //
    250, 250, 500, 500, 500, 1000,
];

#[rustfmt::skip]
const EXTENDED_PITCHES: [u32; 253] = [
    261, 293, 293, 261, 246, 164, 220, 246,
    246, 220, 195, 195, 184, 195, 195, 195,
    184, 184, 184, 195, 220, 261, 293, 293,
    261, 246, 164, 220, 246, 246, 220, 195,
    195, 184, 195, 195, 195, 184, 184, 184,
    195, 220, 220, 246, 293, 369, 369, 329,
    329, 329, 329, 329, 293, 329, 293, 246,
    220, 293, 246, 220, 195, 184, 164, 261,
    293, 293, 261, 246, 164, 220, 246, 246,
    220, 195, 195, 184, 195, 195, 195, 184,
    184, 184, 195, 220, 261, 293, 293, 261,
    246, 164, 220, 246, 246, 220, 195, 195,
    184, 195, 195, 195, 184, 184, 184, 195,
    220, 220, 246, 293, 369, 369, 329, 329,
    329, 329, 329, 293, 329, 293, 246, 220,
    293, 246, 220, 195, 184, 164, 164, 246,
    246, 246, 220, 195, 164, 329, 329, 329,
    329, 329, 293, 261, 246, 293, 293, 293,
    293, 293, 261, 246, 220, 220, 220, 220,
    220, 220, 220, 293, 246, 246, 246, 246,
    246, 220, 220, 195, 164, 164, 329, 329,
    329, 329, 329, 293, 261, 246, 293, 293,
    293, 293, 293, 261, 246, 220, 220, 220,
    220, 220, 195, 184, 195, 164, 261, 293,
    293, 261, 246, 164, 220, 246, 246, 220,
    195, 195, 184, 195, 195, 195, 184, 184,
    184, 195, 220, 261, 293, 293, 261, 246,
    164, 220, 246, 246, 220, 195, 195, 184,
    195, 195, 195, 184, 184, 184, 195, 220,
    220, 246, 293, 369, 369, 329, 329, 329,
    329, 329, 293, 329, 293, 246, 220, 293,
    246, 220, 195, 184, 164,
];

#[rustfmt::skip]
const EXTENDED_DURATIONS: [u32; 253] = [
    166, 361, 542, 361, 361, 361, 166, 361,
    535, 361, 361, 361, 166, 339, 512, 339,
    339, 339, 339, 346, 685, 166, 361, 542,
    361, 361, 361, 166, 361, 535, 361, 361,
    361, 166, 339, 512, 339, 339, 361, 339,
    361, 670, 339, 1024, 361, 361, 361, 693,
    166, 361, 700, 361, 723, 339, 361, 166,
    813, 1047, 1084, 339, 339, 700, 685, 166,
    361, 542, 361, 361, 361, 166, 361, 535,
    361, 361, 361, 166, 339, 512, 339, 339,
    339, 339, 346, 685, 166, 361, 542, 361,
    361, 361, 166, 361, 535, 361, 361, 361,
    166, 339, 512, 339, 339, 361, 339, 361,
    670, 339, 1024, 361, 361, 361, 693, 166,
    361, 700, 361, 723, 339, 361, 166, 813,
    1047, 1084, 339, 339, 700, 685, 723, 331,
    723, 331, 723, 331, 361, 331, 685, 339,
    723, 331, 339, 723, 685, 331, 685, 361,
    723, 331, 339, 723, 670, 339, 685, 339,
    678, 361, 723, 331, 685, 361, 670, 339,
    723, 331, 723, 339, 181, 361, 331, 685,
    339, 723, 331, 339, 723, 685, 331, 685,
    361, 723, 331, 339, 723, 670, 339, 685,
    339, 339, 346, 670, 1024, 1024, 166, 361,
    542, 361, 361, 361, 166, 361, 535, 361,
    361, 361, 166, 339, 512, 339, 339, 339,
    339, 346, 685, 166, 361, 542, 361, 361,
    361, 166, 361, 535, 361, 361, 361, 166,
    339, 512, 339, 339, 361, 339, 361, 670,
    339, 1024, 361, 361, 361, 693, 166, 361,
    700, 361, 723, 339, 361, 166, 813, 1047,
    1084, 339, 339, 700, 685,
];
