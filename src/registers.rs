//! The two general registers and the read-only variables of the machine.

use std::fmt::{Display, Formatter};

use num_enum::TryFromPrimitive;

use crate::bytecode::Word;

/// Identifier of this revision of the instruction set, readable through `LDX $ 00`.
pub const VERSION: u8 = 0x01;

/// The codes LOADX/LOADY accept in variable mode.
#[derive(TryFromPrimitive, Clone, Copy, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum VariableCode {
  Version    = 0x00,
  BufferSize = 0x01,
}

/// Facts about the machine, fixed for the lifetime of an interpreter.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Variables {
  pub version     : u8,
  pub buffer_size : u8,
}

impl Variables {
  pub fn new(version: u8, buffer_size: u8) -> Variables {
    Variables { version, buffer_size }
  }

  pub fn get(&self, code: VariableCode) -> u8 {
    match code {
      VariableCode::Version    => self.version,
      VariableCode::BufferSize => self.buffer_size,
    }
  }
}

/**
  How the registers are filled when an interpreter starts. Earlier firmware disagreed on this, so
  it is a choice rather than a constant.
*/
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub enum RegisterSeed {
  /// X holds the version, Y the buffer size.
  #[default]
  VersionSize,
  /// X holds the buffer size, Y the version.
  SizeVersion,
  Explicit { x: u8, y: u8 },
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct Registers {
  pub x: u8,
  pub y: u8,
}

impl Registers {

  pub fn seeded(seed: RegisterSeed, variables: Variables) -> Registers {
    match seed {
      RegisterSeed::VersionSize      => Registers { x: variables.version, y: variables.buffer_size },
      RegisterSeed::SizeVersion      => Registers { x: variables.buffer_size, y: variables.version },
      RegisterSeed::Explicit { x, y } => Registers { x, y },
    }
  }

  /// Both registers in one word, X in the high byte. This is what a register read returns.
  pub fn to_word(&self) -> Word {
    ((self.x as Word) << 8) | self.y as Word
  }

  pub fn from_word(word: Word) -> Registers {
    Registers { x: (word >> 8) as u8, y: word as u8 }
  }
}

impl Display for Registers {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "X={:02X} Y={:02X}", self.x, self.y)
  }
}
