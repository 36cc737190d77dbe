/*!
  The two algorithms the interpreter leaves to the LED backend: rescaling a byte into a buffer
  index and blurring a run of pixels. `Software` implements both with FastLED's fixed point
  arithmetic, so an emulator renders what the device would.
*/

use crate::pixel::{scale8, Pixel};

pub trait Effects {
  /// Rescales `value` from `0..=255` into `0..=max_index`.
  fn scale(&self, value: u8, max_index: u8) -> u8;

  /// Blurs `window` in place by `amount`.
  fn blur(&mut self, window: &mut [Pixel], amount: u8);
}

/// FastLED's `map8` and `blur1d`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Software;

impl Effects for Software {

  fn scale(&self, value: u8, max_index: u8) -> u8 {
    scale8(value, max_index)
  }

  /**
    Every pixel keeps `255 - amount` of itself and gives `amount / 2` to each neighbour. The ends
    of the window leak nothing outside of it.
  */
  fn blur(&mut self, window: &mut [Pixel], amount: u8) {
    let keep = u8::MAX - amount;
    let seep = amount >> 1;
    let mut carryover = Pixel::BLACK;

    for i in 0..window.len() {
      let current = window[i];
      let part = current.scaled(seep);

      if i > 0 {
        window[i - 1] = window[i - 1] + part;
      }
      window[i] = current.scaled(keep) + carryover;
      carryover = part;
    }
  }
}
