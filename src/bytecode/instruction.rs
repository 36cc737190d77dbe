use std::fmt::{Display, Formatter};

use super::{Opcode, Options};
use crate::error::InstructionError;
use crate::symboltable::MNEMONICS;

/// Comment marker of the assembly text format.
pub const COMMENT: &str = "--";

/**
  Holds the unencoded components of an instruction. The fields are only reachable through
  `Instruction::new`, which admits exactly the instructions that some word decodes to, so every
  instruction encodes to a word that decodes back to it.
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Instruction {
  opcode  : Opcode,
  options : Options, // Always the variant `Options::from_bits` gives for `opcode`
  value   : u8,
}

impl Instruction {

  /**
    Builds an instruction, refusing opcodes without a wire encoding and options that `opcode`
    would read as something else, such as a COLOR on SELECT.
  */
  pub fn new(opcode: Opcode, options: Options, value: u8) -> Result<Instruction, InstructionError> {
    if !opcode.is_encodable() {
      return Err(InstructionError::UnencodableOpcode(opcode.code()));
    }
    if Options::from_bits(opcode, options.bits()) != options {
      return Err(InstructionError::MismatchedOptions { opcode, options });
    }
    Ok(Instruction::from_parts(opcode, options, value))
  }

  /// An instruction without options or value, such as UPDATE.
  pub fn nullary(opcode: Opcode) -> Result<Instruction, InstructionError> {
    Instruction::new(opcode, Options::None, 0)
  }

  /// For the decoder and the assembler, which only produce canonical parts.
  pub(super) fn from_parts(opcode: Opcode, options: Options, value: u8) -> Instruction {
    Instruction { opcode, options, value }
  }

  pub fn ignore() -> Instruction {
    Instruction::from_parts(Opcode::Ignore, Options::None, 0)
  }

  pub fn exception() -> Instruction {
    Instruction::from_parts(Opcode::Exception, Options::None, 0)
  }

  pub fn opcode(&self) -> Opcode {
    self.opcode
  }

  pub fn options(&self) -> Options {
    self.options
  }

  pub fn value(&self) -> u8 {
    self.value
  }

  pub fn is_ignore(&self) -> bool {
    self.opcode == Opcode::Ignore
  }

  /// True for EXCEPTION and for every opcode the machine does not define.
  pub fn is_exception(&self) -> bool {
    matches!(self.opcode, Opcode::Exception | Opcode::Undefined(_))
  }

  /// Whether some assembly line produces exactly this instruction.
  fn is_assemblable(&self) -> bool {
    self.options.fits(self.opcode) && (self.opcode.takes_value() || self.value == 0)
  }
}

impl Default for Instruction {
  fn default() -> Self {
    Instruction::ignore()
  }
}

/**
  The disassembly of the instruction: the assembly line that produces it. Instructions with no
  assembly form (EXCEPTION, undefined opcodes, options that do not fit the opcode, a value byte
  on an opcode that takes none) print as a comment, so a disassembled program always assembles
  again.
*/
impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mnemonic = match MNEMONICS.mnemonic(self.opcode) {
      Some(mnemonic) if self.is_assemblable() => mnemonic,
      _ => {
        return write!(
          f,
          "{} {} options={} value={:02X}",
          COMMENT, self.opcode, self.options.bits(), self.value
        );
      }
    };

    match self.opcode.takes_value() {
      true  => write!(f, "{} {} {:02X}", mnemonic, self.options, self.value),
      false => write!(f, "{}", mnemonic)
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::{Color, RangeBound, SelectMode, TimeUnit};

  #[test]
  fn disassembly() {
    let select = Instruction::new(Opcode::Select, Options::Select(SelectMode::Relative), 0xFF);
    assert_eq!(select.unwrap().to_string(), "SEL % FF");

    let range = Instruction::new(Opcode::Range, Options::Range(RangeBound::AbsoluteEnd), 0x09);
    assert_eq!(range.unwrap().to_string(), "RAN ## 09");

    let sleep = Instruction::new(Opcode::Sleep, Options::Time(TimeUnit::Seconds), 0x0A);
    assert_eq!(sleep.unwrap().to_string(), "SLP SEC 0A");

    assert_eq!(Instruction::nullary(Opcode::Update).unwrap().to_string(), "UPDT");
    assert_eq!(Instruction::ignore().to_string(), "NOP");
  }

  #[test]
  fn unassemblable_instructions_print_as_comments() {
    assert!(Instruction::exception().to_string().starts_with(COMMENT));

    let undefined = Instruction::new(Opcode::Undefined(0x2A), Options::Raw(1), 0x10).unwrap();
    assert_eq!(undefined.to_string(), "-- UNDEFINED options=1 value=10");

    let misfit = Instruction::new(Opcode::Set, Options::Raw(3), 0x10).unwrap();
    assert!(misfit.to_string().starts_with(COMMENT));

    // UPDT would assemble to a zero value byte.
    let update = Instruction::new(Opcode::Update, Options::None, 0xFF).unwrap();
    assert_eq!(update.to_string(), "-- UPDATE options=0 value=FF");
  }

  #[test]
  fn mismatched_options_are_refused() {
    assert_eq!(
      Instruction::new(Opcode::Select, Options::Color(Color::Green), 5),
      Err(InstructionError::MismatchedOptions {
        opcode  : Opcode::Select,
        options : Options::Color(Color::Green)
      })
    );
    assert!(Instruction::new(Opcode::Select, Options::Raw(0), 5).is_err());
    assert!(Instruction::new(Opcode::Clear, Options::Raw(5), 0).is_err());
    assert!(Instruction::nullary(Opcode::Select).is_err());
    assert!(Instruction::new(Opcode::Fill, Options::Color(Color::Red), 5).is_ok());
  }

  #[test]
  fn opcodes_without_an_encoding_are_refused() {
    assert_eq!(
      Instruction::nullary(Opcode::Undefined(0x42)),
      Err(InstructionError::UnencodableOpcode(0x42))
    );
    assert_eq!(
      Instruction::nullary(Opcode::Undefined(0x02)),
      Err(InstructionError::UnencodableOpcode(0x02))
    );
    assert!(Instruction::nullary(Opcode::Undefined(0x20)).is_ok());
  }

  #[test]
  fn exception_covers_undefined_opcodes() {
    assert!(Instruction::exception().is_exception());
    assert!(Instruction::nullary(Opcode::Undefined(0x11)).unwrap().is_exception());
    assert!(!Instruction::ignore().is_exception());
  }
}
