//! An `Either` type for the operand of SELECT and RANGE: a buffer index, or a fraction of the
//! buffer expressed on `0..=255`.

use std::fmt::{Display, Formatter};

use crate::bytecode::{RangeBound, SelectMode};
use crate::effects::Effects;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Address {
  /// An index into the working buffer.
  Absolute(u8),
  /// A fraction of the buffer; 0 is the first pixel and 255 the last.
  Relative(u8),
}

impl Address {

  pub fn for_select(mode: SelectMode, value: u8) -> Address {
    match mode {
      SelectMode::Absolute => Address::Absolute(value),
      SelectMode::Relative => Address::Relative(value),
    }
  }

  pub fn for_bound(bound: RangeBound, value: u8) -> Address {
    match bound.is_relative() {
      true  => Address::Relative(value),
      false => Address::Absolute(value),
    }
  }

  /**
    Converts the address to an index. Relative addresses are rescaled onto
    `0..=buffer_size - 1`, so 255 always lands on the last pixel.
  */
  pub fn resolve<E>(&self, effects: &E, buffer_size: u8) -> u8
    where E: Effects + ?Sized
  {
    match self {
      Address::Absolute(index)   => *index,
      Address::Relative(portion) => effects.scale(*portion, buffer_size.saturating_sub(1)),
    }
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Address::Absolute(index)   => write!(f, "#{:02X}", index),
      Address::Relative(portion) => write!(f, "%{:02X}", portion),
    }
  }
}
