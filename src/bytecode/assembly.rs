/*!
  The human readable textual form of bytecode is called assembly. One line holds one
  instruction as whitespace separated tokens:

    ```text
    <line>     ::= <mnemonic> [<option> <operand>] [<ignored>]
    <operand>  ::= ['0x'] <hexdigit>+ | 'X' | 'Y'
    <ignored>  ::= .*
    ```

  Lines shorter than three characters and lines starting with a comment assemble to IGNORE, as
  does `NOP`, which ends the line. Whatever follows the last token an instruction takes is
  ignored, so `CLR 00` is CLEAR and `SET R FF 10` sets 0xFF. A line that cannot be assembled
  becomes EXCEPTION; use `try_parse_line` to learn why.
*/

use nom::{
  branch::alt,
  bytes::complete::{tag, take_till1},
  character::complete::{hex_digit1, space0},
  combinator::{all_consuming, map_res, opt},
  sequence::preceded,
  IResult,
};
use tracing::debug;

use super::instruction::COMMENT;
use super::{Instruction, Opcode, Options};
use crate::error::AssemblyError;
use crate::registers::Registers;
use crate::symboltable::MNEMONICS;

/// Shorter lines are blank.
pub const MINIMUM_LINE_LENGTH: usize = 3;

/**
  Turns assembly lines into instructions. An assembler built `with_registers` substitutes the
  operands `X` and `Y` with the values of that register snapshot; without one they are errors.
*/
#[derive(Clone, Copy, Debug, Default)]
pub struct Assembler {
  registers: Option<Registers>
}

impl Assembler {

  pub fn new() -> Assembler {
    Assembler { registers: None }
  }

  pub fn with_registers(registers: Registers) -> Assembler {
    Assembler { registers: Some(registers) }
  }

  /// Total form of `try_parse_line`: rejected lines become EXCEPTION.
  pub fn parse_line(&self, text: &str) -> Instruction {
    match self.try_parse_line(text) {
      Ok(instruction) => instruction,
      Err(error) => {
        debug!(line = text, %error, "rejected assembly line");
        Instruction::exception()
      }
    }
  }

  pub fn try_parse_line(&self, text: &str) -> Result<Instruction, AssemblyError> {
    let line = text.trim();
    if line.len() < MINIMUM_LINE_LENGTH || line.starts_with(COMMENT) {
      return Ok(Instruction::ignore());
    }

    let (input, mnemonic) = next_token(line)
      .map_err(|_| AssemblyError::UnknownMnemonic(line.to_string()))?;
    let opcode = MNEMONICS.opcode(mnemonic)
      .ok_or_else(|| AssemblyError::UnknownMnemonic(mnemonic.to_string()))?;

    match opcode {
      // NOP ends the line, whatever follows.
      Opcode::Ignore => return Ok(Instruction::ignore()),
      _ if !opcode.takes_options() => {
        log_ignored(mnemonic, input);
        return Ok(Instruction::from_parts(opcode, Options::None, 0));
      }
      _ => {}
    }

    let (input, option_token) = next_token(input)
      .map_err(|_| AssemblyError::MissingOption { mnemonic: mnemonic.to_string() })?;
    let options = Options::parse(opcode, option_token)
      .ok_or_else(|| AssemblyError::InvalidOption {
        mnemonic : mnemonic.to_string(),
        token    : option_token.to_string()
      })?;

    let (input, operand_token) = next_token(input)
      .map_err(|_| AssemblyError::MissingOperand { mnemonic: mnemonic.to_string() })?;
    let value = self.parse_operand(operand_token)?;

    log_ignored(mnemonic, input);

    Ok(Instruction::from_parts(opcode, options, value))
  }

  fn parse_operand(&self, token: &str) -> Result<u8, AssemblyError> {
    match (token, self.registers) {
      ("X", Some(registers)) => Ok(registers.x),
      ("Y", Some(registers)) => Ok(registers.y),
      _ => {
        hex_byte(token)
          .map(|(_, value)| value)
          .map_err(|_| AssemblyError::InvalidOperand(token.to_string()))
      }
    }
  }
}

/// Assembles one line with the default assembler.
pub fn parse_line(text: &str) -> Instruction {
  Assembler::new().parse_line(text)
}

pub fn try_parse_line(text: &str) -> Result<Instruction, AssemblyError> {
  Assembler::new().try_parse_line(text)
}

/// Assembles a line that may be absent. No line at all is EXCEPTION, not IGNORE.
pub fn parse_input(text: Option<&str>) -> Instruction {
  match text {
    Some(text) => parse_line(text),
    None       => Instruction::exception()
  }
}

// region Token parsers

fn next_token(input: &str) -> IResult<&str, &str> {
  preceded(space0, take_till1(|c: char| c.is_whitespace()))(input)
}

/// Trailing text is dropped. Only text that is not a comment is worth a log line.
fn log_ignored(mnemonic: &str, rest: &str) {
  let rest = rest.trim();
  if !rest.is_empty() && !rest.starts_with(COMMENT) {
    debug!(mnemonic, ignored = rest, "ignored trailing tokens");
  }
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
  all_consuming(
    map_res(
      preceded(opt(alt((tag("0x"), tag("0X")))), hex_digit1),
      |digits: &str| u8::from_str_radix(digits, 16)
    )
  )(input)
}

// endregion


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::{Color, EffectScope, LoadSource, RangeBound, SelectMode, TimeUnit};

  #[test]
  fn blank_and_comment_lines_are_ignored() {
    assert_eq!(parse_line(""), Instruction::ignore());
    assert_eq!(parse_line("  "), Instruction::ignore());
    assert_eq!(parse_line("AB"), Instruction::ignore());
    assert_eq!(parse_line("-- FILL R FF"), Instruction::ignore());
    assert_eq!(parse_line("   -- indented comment"), Instruction::ignore());
  }

  #[test]
  fn absent_input_is_an_exception() {
    assert_eq!(parse_input(None), Instruction::exception());
    assert_eq!(parse_input(Some("UPDT")), Instruction::nullary(Opcode::Update).unwrap());
  }

  #[test]
  fn nop_ends_the_line() {
    assert_eq!(parse_line("NOP"), Instruction::ignore());
    assert_eq!(parse_line("NOP whatever follows"), Instruction::ignore());
  }

  #[test]
  fn nullary_instructions() {
    let update = Instruction::nullary(Opcode::Update).unwrap();
    let clear = Instruction::nullary(Opcode::Clear).unwrap();
    assert_eq!(parse_line("UPDT"), update);
    assert_eq!(parse_line("CLR -- wipe"), clear);
  }

  #[test]
  fn trailing_tokens_are_ignored() {
    assert_eq!(parse_line("CLR 00"), Instruction::nullary(Opcode::Clear).unwrap());
    assert_eq!(parse_line("UPDT now"), Instruction::nullary(Opcode::Update).unwrap());
    assert_eq!(parse_line("SET R FF 10").value(), 0xFF);
    assert_eq!(
      try_parse_line("SLP MS 20 and then some"),
      Ok(Instruction::new(Opcode::Sleep, Options::Time(TimeUnit::Millis), 0x20).unwrap())
    );
  }

  #[test]
  fn relative_select() {
    assert_eq!(
      parse_line("SEL % FF"),
      Instruction::new(Opcode::Select, Options::Select(SelectMode::Relative), 0xFF).unwrap()
    );
    assert_eq!(
      parse_line("SEL # 05"),
      Instruction::new(Opcode::Select, Options::Select(SelectMode::Absolute), 0x05).unwrap()
    );
  }

  #[test]
  fn every_option_form() {
    let cases = [
      ("RAN % 10",   Opcode::Range,  Options::Range(RangeBound::RelativeStart), 0x10),
      ("RAN %% 80",  Opcode::Range,  Options::Range(RangeBound::RelativeEnd),   0x80),
      ("RAN # 0",    Opcode::Range,  Options::Range(RangeBound::AbsoluteStart), 0x00),
      ("RAN ## 9",   Opcode::Range,  Options::Range(RangeBound::AbsoluteEnd),   0x09),
      ("SET G 80",   Opcode::Set,    Options::Color(Color::Green),              0x80),
      ("FILL R 0xFF",Opcode::Fill,   Options::Color(Color::Red),                0xFF),
      ("FILL BLUE 1",Opcode::Fill,   Options::Color(Color::Blue),               0x01),
      ("EBLR ALL 40",Opcode::Blur,   Options::Effect(EffectScope::All),         0x40),
      ("EBLR RAN 40",Opcode::Blur,   Options::Effect(EffectScope::Range),       0x40),
      ("SLP US 20",  Opcode::Sleep,  Options::Time(TimeUnit::Micros),           0x20),
      ("SLP MS 20",  Opcode::Sleep,  Options::Time(TimeUnit::Millis),           0x20),
      ("SLP SEC 2",  Opcode::Sleep,  Options::Time(TimeUnit::Seconds),          0x02),
      ("SLP MIN 1",  Opcode::Sleep,  Options::Time(TimeUnit::Minutes),          0x01),
      ("LDX $ 01",   Opcode::LoadX,  Options::Load(LoadSource::Variable),       0x01),
      ("LDY S 00",   Opcode::LoadY,  Options::Load(LoadSource::Variable),       0x00),
      ("LDY B 1D",   Opcode::LoadY,  Options::Load(LoadSource::Blue),           0x1D),
    ];
    for (text, opcode, options, value) in cases.iter() {
      assert_eq!(
        try_parse_line(text),
        Ok(Instruction::new(*opcode, *options, *value).unwrap()),
        "{}", text
      );
    }
  }

  #[test]
  fn unknown_mnemonic_is_an_exception() {
    assert_eq!(parse_line("FOO"), Instruction::exception());
    assert_eq!(
      try_parse_line("FOO"),
      Err(AssemblyError::UnknownMnemonic("FOO".to_string()))
    );
    assert_eq!(parse_line("updt"), Instruction::exception());
  }

  #[test]
  fn bad_options_are_exceptions() {
    assert_eq!(parse_line("SEL * 05"), Instruction::exception());
    assert_eq!(parse_line("RAN %%% 05"), Instruction::exception());
    assert_eq!(parse_line("SET Y 05"), Instruction::exception());
    assert_eq!(parse_line("EBLR SOME 05"), Instruction::exception());
    assert_eq!(parse_line("SLP HRS 05"), Instruction::exception());
    assert_eq!(parse_line("LDX Q 05"), Instruction::exception());
  }

  #[test]
  fn missing_tokens_never_read_past_the_line() {
    assert_eq!(
      try_parse_line("SEL"),
      Err(AssemblyError::MissingOption { mnemonic: "SEL".to_string() })
    );
    assert_eq!(
      try_parse_line("SEL %"),
      Err(AssemblyError::MissingOperand { mnemonic: "SEL".to_string() })
    );
    assert_eq!(
      try_parse_line("FILL R   "),
      Err(AssemblyError::MissingOperand { mnemonic: "FILL".to_string() })
    );
    assert_eq!(parse_line("RAN"), Instruction::exception());
    assert_eq!(parse_line("SLP MS"), Instruction::exception());
    assert_eq!(parse_line("LDY R"), Instruction::exception());
    assert_eq!(parse_line("EBLR"), Instruction::exception());
  }

  #[test]
  fn operands() {
    assert_eq!(try_parse_line("SET R 100"), Err(AssemblyError::InvalidOperand("100".to_string())));
    assert_eq!(try_parse_line("SET R GG"), Err(AssemblyError::InvalidOperand("GG".to_string())));
    assert_eq!(try_parse_line("SET R 0x"), Err(AssemblyError::InvalidOperand("0x".to_string())));
    assert_eq!(parse_line("SET R 0a").value(), 0x0A);
    assert_eq!(parse_line("SET R 00fF").value(), 0xFF);
    assert_eq!(parse_line("SET R FF -- full red").value(), 0xFF);
  }

  #[test]
  fn register_substitution() {
    let registers = Registers { x: 0x12, y: 0x1D };
    let assembler = Assembler::with_registers(registers);
    assert_eq!(assembler.parse_line("SEL # X").value(), 0x12);
    assert_eq!(assembler.parse_line("FILL G Y").value(), 0x1D);
    assert_eq!(parse_line("SEL # X"), Instruction::exception());
  }
}
