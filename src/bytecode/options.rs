/*!
  The two option bits of an instruction. Each opcode that uses them reads them as exactly one of
  the enums below; `Options` ties the enum to the instruction.

  The `strum` serializations are the assembly tokens of each option, so `Display` on an option is
  its disassembly and `FromStr` parses the options that are matched by exact token.
*/

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};

use super::Opcode;

/// Mask of the options field once shifted down.
pub const OPTIONS_BITS: u8 = 0b11;

/// How SELECT interprets its value.
#[derive(
  StrumDisplay, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,     Eq, PartialEq, Debug, Hash
)]
#[repr(u8)]
pub enum SelectMode {
  #[strum(to_string = "#")]
  Absolute = 0,
  #[strum(to_string = "%")]
  Relative = 1,
}

impl SelectMode {
  pub fn from_leading(c: char) -> Option<SelectMode> {
    match c {
      '#' => Some(SelectMode::Absolute),
      '%' => Some(SelectMode::Relative),
      _   => None
    }
  }
}

/// Which end of the range RANGE moves, and how it interprets its value.
#[derive(
  StrumDisplay, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,       Eq, PartialEq, Debug, Hash
)]
#[repr(u8)]
pub enum RangeBound {
  #[strum(to_string = "#")]
  AbsoluteStart = 0,
  #[strum(to_string = "%")]
  RelativeStart = 1,
  #[strum(to_string = "##")]
  AbsoluteEnd   = 2,
  #[strum(to_string = "%%")]
  RelativeEnd   = 3,
}

impl RangeBound {
  pub fn is_start(&self) -> bool {
    matches!(self, RangeBound::AbsoluteStart | RangeBound::RelativeStart)
  }

  pub fn is_relative(&self) -> bool {
    matches!(self, RangeBound::RelativeStart | RangeBound::RelativeEnd)
  }
}

/// A color channel, used by SET and FILL.
#[derive(
  StrumDisplay, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,     Eq, PartialEq, Debug, Hash
)]
#[repr(u8)]
pub enum Color {
  #[strum(to_string = "R")]
  Red   = 0,
  #[strum(to_string = "G")]
  Green = 1,
  #[strum(to_string = "B")]
  Blue  = 2,
}

impl Color {
  pub fn from_leading(c: char) -> Option<Color> {
    match c {
      'R' => Some(Color::Red),
      'G' => Some(Color::Green),
      'B' => Some(Color::Blue),
      _   => None
    }
  }
}

/// Where BLUR applies.
#[derive(
  StrumDisplay, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,       Eq, PartialEq, Debug, Hash
)]
#[repr(u8)]
pub enum EffectScope {
  #[strum(to_string = "ALL")]
  All   = 0,
  #[strum(to_string = "RAN")]
  Range = 1,
}

/// The unit of a SLEEP value.
#[derive(
  StrumDisplay, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,       Eq, PartialEq, Debug, Hash
)]
#[repr(u8)]
pub enum TimeUnit {
  #[strum(to_string = "US")]
  Micros  = 0,
  #[strum(to_string = "MS")]
  Millis  = 1,
  #[strum(to_string = "SEC")]
  Seconds = 2,
  #[strum(to_string = "MIN")]
  Minutes = 3,
}

/// What LOADX/LOADY copy into the register.
#[derive(
  StrumDisplay, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,     Eq, PartialEq, Debug, Hash
)]
#[repr(u8)]
pub enum LoadSource {
  /// A variable, chosen by the value byte.
  #[strum(to_string = "$")]
  Variable = 0,
  #[strum(to_string = "R")]
  Red      = 1,
  #[strum(to_string = "G")]
  Green    = 2,
  #[strum(to_string = "B")]
  Blue     = 3,
}

impl LoadSource {
  pub fn from_leading(c: char) -> Option<LoadSource> {
    match c {
      '$' | 'S' => Some(LoadSource::Variable),
      'R'       => Some(LoadSource::Red),
      'G'       => Some(LoadSource::Green),
      'B'       => Some(LoadSource::Blue),
      _         => None
    }
  }

  /// The pixel channel read by this source, if it reads one.
  pub fn channel(&self) -> Option<Color> {
    match self {
      LoadSource::Variable => None,
      LoadSource::Red      => Some(Color::Red),
      LoadSource::Green    => Some(Color::Green),
      LoadSource::Blue     => Some(Color::Blue),
    }
  }
}

/**
  The options of an instruction, interpreted for its opcode.

  `None` belongs to opcodes without options. `Raw` holds option bits that mean nothing for the
  owning opcode, so that every word decodes to something that encodes back to the same word.
*/
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Options {
  None,
  Select(SelectMode),
  Range(RangeBound),
  Color(Color),
  Effect(EffectScope),
  Time(TimeUnit),
  Load(LoadSource),
  Raw(u8),
}

impl Options {

  /// Interprets the option bits the way `opcode` defines them.
  pub fn from_bits(opcode: Opcode, bits: u8) -> Options {
    let bits = bits & OPTIONS_BITS;
    let options = match opcode {
      Opcode::Select                => SelectMode::try_from(bits).ok().map(Options::Select),
      Opcode::Range                 => RangeBound::try_from(bits).ok().map(Options::Range),
      Opcode::Set   | Opcode::Fill  => Color::try_from(bits).ok().map(Options::Color),
      Opcode::Blur                  => EffectScope::try_from(bits).ok().map(Options::Effect),
      Opcode::Sleep                 => TimeUnit::try_from(bits).ok().map(Options::Time),
      Opcode::LoadX | Opcode::LoadY => LoadSource::try_from(bits).ok().map(Options::Load),
      _                             => (bits == 0).then_some(Options::None),
    };
    options.unwrap_or(Options::Raw(bits))
  }

  /// The raw option bits.
  pub fn bits(&self) -> u8 {
    match self {
      Options::None           => 0,
      Options::Select(mode)   => (*mode).into(),
      Options::Range(bound)   => (*bound).into(),
      Options::Color(color)   => (*color).into(),
      Options::Effect(scope)  => (*scope).into(),
      Options::Time(unit)     => (*unit).into(),
      Options::Load(source)   => (*source).into(),
      Options::Raw(bits)      => *bits & OPTIONS_BITS,
    }
  }

  /// Whether this is the variant `opcode` reads its option bits as.
  pub fn fits(&self, opcode: Opcode) -> bool {
    match (opcode, self) {
      (Opcode::Select, Options::Select(_))                => true,
      (Opcode::Range,  Options::Range(_))                 => true,
      (Opcode::Set,    Options::Color(_))
      | (Opcode::Fill, Options::Color(_))                 => true,
      (Opcode::Blur,   Options::Effect(_))                => true,
      (Opcode::Sleep,  Options::Time(_))                  => true,
      (Opcode::LoadX,  Options::Load(_))
      | (Opcode::LoadY, Options::Load(_))                 => true,
      (opcode, Options::None)                             => !opcode.takes_options(),
      _                                                   => false
    }
  }

  /**
    Parses the option token of an assembly line for `opcode`. SELECT, SET, FILL and the loads
    only look at the leading character of the token; RANGE, BLUR and SLEEP match it exactly.
  */
  pub fn parse(opcode: Opcode, token: &str) -> Option<Options> {
    let lead = token.chars().next()?;
    match opcode {
      Opcode::Select                => SelectMode::from_leading(lead).map(Options::Select),
      Opcode::Range                 => RangeBound::from_str(token).ok().map(Options::Range),
      Opcode::Set   | Opcode::Fill  => Color::from_leading(lead).map(Options::Color),
      Opcode::Blur                  => EffectScope::from_str(token).ok().map(Options::Effect),
      Opcode::Sleep                 => TimeUnit::from_str(token).ok().map(Options::Time),
      Opcode::LoadX | Opcode::LoadY => LoadSource::from_leading(lead).map(Options::Load),
      _                             => None
    }
  }
}

impl Display for Options {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Options::None           => Ok(()),
      Options::Select(mode)   => write!(f, "{}", mode),
      Options::Range(bound)   => write!(f, "{}", bound),
      Options::Color(color)   => write!(f, "{}", color),
      Options::Effect(scope)  => write!(f, "{}", scope),
      Options::Time(unit)     => write!(f, "{}", unit),
      Options::Load(source)   => write!(f, "{}", source),
      Options::Raw(bits)      => write!(f, "{:#04b}", bits),
    }
  }
}
