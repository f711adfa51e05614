//! Note scheduler.
//!
//! The player never blocks: `tick` is called from the main loop with the
//! current millisecond clock and advances at most one note per call. All
//! elapsed-time arithmetic wraps, so the u32 clock rolling over every ~49
//! days does not stall a song.

use log::{error, info};

use crate::buzzer::Tone;
use crate::melody::Melody;
use crate::platform::Entropy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Playing {
        /// Index into the player's library.
        song: usize,
        /// Next note to emit; equal to the melody length once the last note
        /// has been issued.
        cursor: usize,
        /// When note `cursor - 1` was issued.
        note_start_ms: u32,
    },
}

pub struct Player<'a, T> {
    tone: T,
    library: &'a [Melody],
    state: State,
}

impl<'a, T: Tone> Player<'a, T> {
    /// A silent, idle player choosing from `library`.
    pub fn new(mut tone: T, library: &'a [Melody]) -> Self {
        tone.stop_tone();
        Self {
            tone,
            library,
            state: State::Idle,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, State::Playing { .. })
    }

    pub fn tone(&self) -> &T {
        &self.tone
    }

    /// Start a randomly chosen song.
    pub fn start(&mut self, now: u32, entropy: &mut impl Entropy) {
        let count = self.library.len().max(1);
        let song = entropy.rand32() as usize % count;
        self.start_song(song, now);
    }

    /// Start `song` from its first note, which sounds immediately.
    pub fn start_song(&mut self, song: usize, now: u32) {
        let Some((pitch, _)) = self.library.get(song).and_then(|m| m.note(0)) else {
            error!("Melody {song} does not exist");
            self.halt();
            return;
        };

        info!("Playing song {}!", song + 1);
        self.tone.play_tone(pitch);
        self.state = State::Playing {
            song,
            cursor: 1,
            note_start_ms: now,
        };
    }

    /// Stop playback and silence the buzzer. Safe to call when idle.
    pub fn stop(&mut self) {
        if self.is_playing() {
            info!("Song stopped!");
        }
        self.halt();
    }

    /// Advance the song if the current note has run its course.
    pub fn tick(&mut self, now: u32) {
        let State::Playing {
            song,
            cursor,
            note_start_ms,
        } = self.state
        else {
            return;
        };

        let Some(melody) = self.library.get(song) else {
            error!("Melody {song} vanished mid-song");
            self.halt();
            return;
        };

        // cursor >= 1 while playing; the note that is sounding is cursor - 1
        let Some((_, duration)) = melody.note(cursor.wrapping_sub(1)) else {
            error!("Cursor {cursor} outside melody {song}");
            self.halt();
            return;
        };

        if now.wrapping_sub(note_start_ms) < duration {
            return;
        }

        match melody.note(cursor) {
            Some((pitch, _)) => {
                self.tone.play_tone(pitch);
                self.state = State::Playing {
                    song,
                    cursor: cursor + 1,
                    note_start_ms: now,
                };
            }
            None => {
                info!("Song finished!");
                self.halt();
            }
        }
    }

    fn halt(&mut self) {
        self.tone.stop_tone();
        self.state = State::Idle;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::melody::{LIBRARY, LONG, SHORT};
    use crate::platform::tests::FixedEntropy;

    /// Remembers every pitch requested, and what is sounding now.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingTone {
        pub played: Vec<u32>,
        pub sounding: Option<u32>,
    }

    impl Tone for RecordingTone {
        fn play_tone(&mut self, freq_hz: u32) {
            self.played.push(freq_hz);
            self.sounding = (freq_hz > 0).then_some(freq_hz);
        }
    }

    fn cursor_of(player: &Player<'_, RecordingTone>) -> Option<usize> {
        match player.state() {
            State::Playing { cursor, .. } => Some(cursor),
            State::Idle => None,
        }
    }

    #[test]
    fn new_player_is_idle_and_silent() {
        let player = Player::new(RecordingTone::default(), &LIBRARY);
        assert!(!player.is_playing());
        assert_eq!(player.tone().sounding, None);
    }

    #[test]
    fn start_picks_song_from_entropy_and_sounds_first_note() {
        let mut player = Player::new(RecordingTone::default(), &LIBRARY);
        player.start(0, &mut FixedEntropy(7));
        assert_eq!(
            player.state(),
            State::Playing {
                song: LONG,
                cursor: 1,
                note_start_ms: 0
            }
        );
        assert_eq!(player.tone().sounding, Some(261));

        player.stop();
        player.start(0, &mut FixedEntropy(42));
        assert!(matches!(player.state(), State::Playing { song: SHORT, .. }));
        assert_eq!(player.tone().sounding, Some(264));
    }

    #[test]
    fn tick_waits_for_the_current_duration() {
        let mut player = Player::new(RecordingTone::default(), &LIBRARY);
        player.start_song(SHORT, 1000);
        player.tick(1249);
        assert_eq!(cursor_of(&player), Some(1));
        player.tick(1250);
        assert_eq!(cursor_of(&player), Some(2));
        assert_eq!(player.tone().played, vec![0, 264, 264]);
    }

    #[test]
    fn stop_is_idempotent_and_silent() {
        let mut player = Player::new(RecordingTone::default(), &LIBRARY);
        player.start_song(SHORT, 0);
        player.stop();
        player.stop();
        assert!(!player.is_playing());
        assert_eq!(player.tone().sounding, None);

        for t in (0..20_000).step_by(50) {
            player.tick(t);
            assert_eq!(player.tone().sounding, None, "no tone after stop at {t}");
        }
    }

    #[test]
    fn one_advance_per_tick_even_when_late() {
        let mut player = Player::new(RecordingTone::default(), &LIBRARY);
        player.start_song(SHORT, 0);
        // Far past several notes' worth of time: still only one step.
        player.tick(5_000);
        assert_eq!(cursor_of(&player), Some(2));
        player.tick(5_000);
        assert_eq!(cursor_of(&player), Some(2));
    }

    #[test]
    fn completion_silences_and_idles() {
        let mut player = Player::new(RecordingTone::default(), &LIBRARY);
        player.start_song(SHORT, 0);
        let mut now = 0u32;
        while player.is_playing() {
            now += 50;
            player.tick(now);
            assert!(now < 20_000, "song never finished");
        }
        assert_eq!(player.tone().sounding, None);
        assert_eq!(now as u64, LIBRARY[SHORT].total_ms());
    }

    static ZERO_LENGTH: [Melody; 1] = [Melody::new(&[330, 440, 0], &[0, 0, 0])];

    #[test]
    fn zero_duration_notes_still_advance() {
        let mut player = Player::new(RecordingTone::default(), &ZERO_LENGTH);
        player.start_song(0, 10);
        player.tick(10);
        player.tick(10);
        player.tick(10);
        assert!(!player.is_playing());
        assert_eq!(player.tone().played, vec![0, 330, 440, 0, 0]);
    }

    #[test]
    fn clock_wrap_keeps_the_beat() {
        let mut player = Player::new(RecordingTone::default(), &LIBRARY);
        let start = u32::MAX - 100;
        player.start_song(SHORT, start);

        player.tick(start.wrapping_add(200));
        assert_eq!(cursor_of(&player), Some(1), "250 ms note not yet over");

        player.tick(start.wrapping_add(250));
        assert_eq!(cursor_of(&player), Some(2));
        assert!(matches!(
            player.state(),
            State::Playing { note_start_ms: 149, .. }
        ));

        player.tick(start.wrapping_add(499));
        assert_eq!(cursor_of(&player), Some(2));
        player.tick(start.wrapping_add(500));
        assert_eq!(cursor_of(&player), Some(3));
    }

    #[test]
    fn unknown_song_leaves_player_idle() {
        let mut player = Player::new(RecordingTone::default(), &LIBRARY);
        player.start_song(9, 0);
        assert!(!player.is_playing());
        assert_eq!(player.tone().sounding, None);
    }

    #[test]
    fn empty_library_never_plays() {
        let mut player = Player::new(RecordingTone::default(), &[]);
        player.start(0, &mut FixedEntropy(3));
        assert!(!player.is_playing());
    }
}
