/*!
  Turns an assembly source file into a program: a flat sequence of wire words, one per
  instruction, with blank lines, comments and NOPs left out.

  ```text
  text -> [`Assembler::try_parse_line`] -> `Instruction`s -> [`encode`] -> `Word`s
  ```
  Compilation stops at the first line the assembler rejects.
*/

use std::time::Instant;

use tracing::{debug, info};

use crate::bytecode::{decode, encode, words_to_bytes, Assembler, Instruction, Word};
use crate::error::CompileError;

/// A `Compilation` is the result of `Compilation::compile(source)`: the bytecode plus a listing
/// pairing each word with its address and disassembly.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Compilation {
  pub code    : Vec<Word>,  // Code memory, in execution order
  pub listing : String,     // One `address  word  mnemonic` line per word
}

impl Compilation {

  pub fn compile(text: &str) -> Result<Compilation, CompileError> {
    Compilation::compile_with(text, &Assembler::new())
  }

  /// Compiles with an assembler that may substitute register operands.
  pub fn compile_with(text: &str, assembler: &Assembler) -> Result<Compilation, CompileError> {
    let compilation_time = Instant::now();
    let mut compilation  = Compilation::default();

    for (number, line) in text.lines().enumerate() {
      let instruction = assembler.try_parse_line(line).map_err(
        |source| CompileError {
          line : number + 1,
          text : line.trim().to_string(),
          source
        }
      )?;

      match instruction.is_ignore() {
        true  => debug!(line = number + 1, "skipping line"),
        false => compilation.emit(instruction),
      }
    }

    info!(
      words   = compilation.code.len(),
      bytes   = compilation.code.len() * 2,
      elapsed = ?compilation_time.elapsed(),
      "compiled program"
    );

    Ok(compilation)
  }

  fn emit(&mut self, instruction: Instruction) {
    let word = encode(instruction);
    self.listing.push_str(&format!("{:04X}  {:04X}  {}\n", self.code.len(), word, instruction));
    self.code.push(word);
  }

  /// The program as it is written to disk.
  pub fn to_bytes(&self) -> Vec<u8> {
    words_to_bytes(&self.code)
  }

  pub fn instructions(&self) -> impl Iterator<Item = Instruction> + '_ {
    self.code.iter().map(|word| decode(*word))
  }

  pub fn len(&self) -> usize {
    self.code.len()
  }

  pub fn is_empty(&self) -> bool {
    self.code.is_empty()
  }
}

pub fn compile(text: &str) -> Result<Compilation, CompileError> {
  Compilation::compile(text)
}

/**
  One line per word. Words with no assembly form come out as `--` comments, so the result
  compiles back to the same program minus those words and any NOPs.
*/
pub fn disassemble(words: &[Word]) -> String {
  words.iter()
       .map(|word| format!("{}\n", decode(*word)))
       .collect()
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::{parse_line, Opcode};
  use crate::error::AssemblyError;
  use crate::registers::Registers;

  const PROGRAM: &str = "\
-- Sweep a red pixel to the end of the strip
CLR

SEL % 00
SET R FF   -- full red
RAN # 0x00
RAN %% FF
FILL B 20
EBLR RAN 40
UPDT
NOP anything goes here
SLP MS 0A
LDX $ 01
";

  #[test]
  fn drops_comments_blank_lines_and_nops() {
    let compilation = compile(PROGRAM).unwrap();
    assert_eq!(compilation.len(), 10);
    assert!(compilation.instructions().all(|instruction| !instruction.is_ignore()));
    assert_eq!(compilation.to_bytes().len(), 20);
  }

  #[test]
  fn matches_the_line_assembler() {
    let compilation = compile(PROGRAM).unwrap();
    let expected: Vec<Word> =
      PROGRAM.lines()
             .map(parse_line)
             .filter(|instruction| !instruction.is_ignore())
             .map(encode)
             .collect();
    assert_eq!(compilation.code, expected);
  }

  #[test]
  fn reports_the_first_rejected_line() {
    let error = compile("FOO").unwrap_err();
    assert_eq!(error.line, 1);
    assert_eq!(error.text, "FOO");
    assert_eq!(error.source, AssemblyError::UnknownMnemonic("FOO".to_string()));

    let error = compile("CLR\n-- fine\n  SET Q 10  \nFOO\n").unwrap_err();
    assert_eq!(error.line, 3);
    assert_eq!(
      error.to_string(),
      "line 3: `SET Q 10`: `Q` is not an option of SET"
    );
  }

  #[test]
  fn register_operands() {
    let assembler   = Assembler::with_registers(Registers { x: 0x0C, y: 0x1D });
    let compilation = Compilation::compile_with("SEL # X\nSEL # Y\n", &assembler).unwrap();
    let cursors: Vec<u8> = compilation.instructions().map(|instruction| instruction.value()).collect();
    assert_eq!(cursors, vec![0x0C, 0x1D]);

    assert!(matches!(
      compile("SEL # X").unwrap_err().source,
      AssemblyError::InvalidOperand(_)
    ));
  }

  #[test]
  fn listing() {
    let compilation = compile("UPDT\nSEL % FF\n").unwrap();
    let lines: Vec<&str> = compilation.listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("0000  {:04X}  UPDT", encode(Instruction::nullary(Opcode::Update).unwrap())));
    assert!(lines[1].starts_with("0001  "));
    assert!(lines[1].ends_with("  SEL % FF"));
  }

  #[test]
  fn disassembly_compiles_back() {
    let compilation = compile(PROGRAM).unwrap();
    let text        = disassemble(&compilation.code);
    assert_eq!(compile(&text).unwrap().code, compilation.code);
  }

  #[test]
  fn unassemblable_words_are_commented_out() {
    let undefined = encode(Instruction::nullary(Opcode::Undefined(0x20)).unwrap());
    let update    = encode(Instruction::nullary(Opcode::Update).unwrap());
    let text      = disassemble(&[undefined, update]);

    assert!(text.starts_with("--"));
    assert_eq!(compile(&text).unwrap().code, vec![update]);
  }

  #[test]
  fn value_bytes_on_nullary_opcodes_are_commented_out() {
    // UPDT and CLR with a stray value byte: printed as themselves they would compile to 0x0000.
    let text = disassemble(&[0x00FF, 0x0401]);
    assert!(text.lines().all(|line| line.starts_with("--")), "{}", text);
    assert!(compile(&text).unwrap().is_empty());
  }
}
