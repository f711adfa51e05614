//! One iteration of the cooperative main loop.

use embedded_hal::digital::InputPin;

use crate::button::{Button, Press};
use crate::buzzer::Tone;
use crate::platform::Entropy;
use crate::player::Player;

/// Main-loop period; also the shortest note the player can resolve.
pub const LOOP_PERIOD_MS: u32 = 50;

/// Button, player and randomness wired together.
pub struct Jukebox<'a, P, T, E> {
    button: Button<P>,
    player: Player<'a, T>,
    entropy: E,
}

impl<'a, P, T, E> Jukebox<'a, P, T, E>
where
    P: InputPin,
    T: Tone,
    E: Entropy,
{
    pub fn new(button: Button<P>, player: Player<'a, T>, entropy: E) -> Self {
        Self {
            button,
            player,
            entropy,
        }
    }

    pub fn player(&self) -> &Player<'a, T> {
        &self.player
    }

    /// Sample the button, toggle playback on a press, then advance the song.
    pub fn step(&mut self, now: u32) {
        if let Some(Press) = self.button.sample() {
            if self.player.is_playing() {
                self.player.stop();
            } else {
                self.player.start(now, &mut self.entropy);
            }
        }
        self.player.tick(now);
    }
}
