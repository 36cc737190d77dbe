use std::fmt::{Display, Formatter};
use std::ops::Add;

use crate::bytecode::Color;

/// One RGB pixel of the buffers.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, Debug)]
pub struct Pixel {
  pub red   : u8,
  pub green : u8,
  pub blue  : u8,
}

impl Pixel {

  pub const BLACK: Pixel = Pixel { red: 0, green: 0, blue: 0 };

  pub fn new(red: u8, green: u8, blue: u8) -> Pixel {
    Pixel { red, green, blue }
  }

  pub fn channel(&self, color: Color) -> u8 {
    match color {
      Color::Red   => self.red,
      Color::Green => self.green,
      Color::Blue  => self.blue,
    }
  }

  pub fn set_channel(&mut self, color: Color, value: u8) {
    match color {
      Color::Red   => self.red   = value,
      Color::Green => self.green = value,
      Color::Blue  => self.blue  = value,
    }
  }

  /// Scales every channel by `scale/256`, FastLED's `nscale8`.
  pub fn scaled(self, scale: u8) -> Pixel {
    Pixel {
      red   : scale8(self.red,   scale),
      green : scale8(self.green, scale),
      blue  : scale8(self.blue,  scale),
    }
  }
}

/// `value * (scale + 1) / 256`, so that a scale of 255 keeps the value.
pub fn scale8(value: u8, scale: u8) -> u8 {
  ((value as u16 * (scale as u16 + 1)) >> 8) as u8
}

// Channels saturate.
impl Add for Pixel {
  type Output = Pixel;
  fn add(self, rhs: Pixel) -> Pixel {
    Pixel {
      red   : self.red.saturating_add(rhs.red),
      green : self.green.saturating_add(rhs.green),
      blue  : self.blue.saturating_add(rhs.blue),
    }
  }
}

impl Display for Pixel {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
  }
}
