/*!
  This module is responsible for the encoding and decoding of binary instructions.

*/

use super::{Instruction, Opcode, Options};

// If you change this you must also change `encode` and `decode`.
pub type Word = u16;

pub const OPCODE_SHIFT  : u32  = 10;
pub const OPTIONS_SHIFT : u32  = 8;
pub const OPCODE_MASK   : Word = 0xFC00;
pub const OPTIONS_MASK  : Word = 0x0300;
pub const VALUE_MASK    : Word = 0x00FF;

/**
  Decodes a word into an instruction. Total: opcodes and options without a defined meaning are
  kept as `Opcode::Undefined` and `Options::Raw`, and left for the interpreter to reject.
*/
pub fn decode(word: Word) -> Instruction {
  // [OpCode:6][Options:2][Value:8]
  let opcode  = Opcode::from_field(((word & OPCODE_MASK) >> OPCODE_SHIFT) as u8);
  let options = Options::from_bits(opcode, ((word & OPTIONS_MASK) >> OPTIONS_SHIFT) as u8);
  let value   = (word & VALUE_MASK) as u8;

  Instruction::from_parts(opcode, options, value)
}

/**
  Encodes the instruction into its word. The inverse of `decode`: `Instruction::new` only admits
  parts that some word decodes to.
*/
pub fn encode(instruction: Instruction) -> Word {
  // [OpCode:6][Options:2][Value:8]
  ((instruction.opcode().field()  as Word) << OPCODE_SHIFT)  & OPCODE_MASK  |
  ((instruction.options().bits()  as Word) << OPTIONS_SHIFT) & OPTIONS_MASK |
  ( instruction.value()           as Word)                   & VALUE_MASK
}

/// The transport and program byte order: high byte first.
pub fn to_bytes(word: Word) -> [u8; 2] {
  word.to_be_bytes()
}

pub fn from_bytes(bytes: [u8; 2]) -> Word {
  Word::from_be_bytes(bytes)
}

pub fn words_to_bytes(words: &[Word]) -> Vec<u8> {
  words.iter().flat_map(|word| to_bytes(*word)).collect()
}

/**
  Splits a byte stream into words. Returns the words and, if the stream has an odd length, the
  dangling final byte.
*/
pub fn bytes_to_words(bytes: &[u8]) -> (Vec<Word>, Option<u8>) {
  let chunks = bytes.chunks_exact(2);
  let dangling = chunks.remainder().first().copied();
  let words = chunks.map(|pair| from_bytes([pair[0], pair[1]])).collect();
  (words, dangling)
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::{
    Color, EffectScope, LoadSource, RangeBound, SelectMode, TimeUnit, MAX_OPCODE_FIELD
  };

  fn assert_instruction(word: Word, instruction: Instruction) {
    assert_eq!(decode(word), instruction);
    assert_eq!(encode(instruction), word);
  }

  #[test]
  fn known_words() {
    assert_instruction(
      0b0000000011111111,
      Instruction::new(Opcode::Update, Options::None, 0xFF).unwrap()
    );
    assert_instruction(
      0b0000100110101010,
      Instruction::new(Opcode::Select, Options::Select(SelectMode::Relative), 0xAA).unwrap()
    );
    assert_instruction(
      0b0000111011111111,
      Instruction::new(Opcode::Range, Options::Range(RangeBound::AbsoluteEnd), 0xFF).unwrap()
    );
    assert_instruction(
      0b0001011011110000,
      Instruction::new(Opcode::Fill, Options::Color(Color::Blue), 0xF0).unwrap()
    );
    assert_instruction(
      0b0001100111110000,
      Instruction::new(Opcode::Blur, Options::Effect(EffectScope::Range), 0xF0).unwrap()
    );
    assert_instruction(
      0b0001111111110000,
      Instruction::new(Opcode::Sleep, Options::Time(TimeUnit::Minutes), 0xF0).unwrap()
    );
    assert_instruction(
      0b0010010000000001,
      Instruction::new(Opcode::LoadY, Options::Load(LoadSource::Variable), 0x01).unwrap()
    );
    assert_instruction(0xF800, Instruction::ignore());
    assert_instruction(0xFC00, Instruction::exception());
  }

  #[test]
  fn every_word_round_trips() {
    for word in 0..=Word::MAX {
      assert_eq!(encode(decode(word)), word, "word {:#06x}", word);
    }
  }

  #[test]
  fn every_canonical_instruction_round_trips() {
    for field in 0..=MAX_OPCODE_FIELD {
      let opcode = Opcode::from_field(field);
      for bits in 0..4 {
        let options = Options::from_bits(opcode, bits);
        for value in [0x00, 0x01, 0x7F, 0x80, 0xFF] {
          let instruction = Instruction::new(opcode, options, value).unwrap();
          assert_eq!(decode(encode(instruction)), instruction);
        }
      }
    }
  }

  #[test]
  fn only_decodable_instructions_are_built() {
    let options = [
      Options::None,
      Options::Select(SelectMode::Relative),
      Options::Range(RangeBound::AbsoluteEnd),
      Options::Color(Color::Green),
      Options::Effect(EffectScope::Range),
      Options::Time(TimeUnit::Seconds),
      Options::Load(LoadSource::Variable),
      Options::Raw(0),
      Options::Raw(1),
      Options::Raw(3),
    ];
    let opcodes = (0..=0xFFu8).map(Opcode::from).chain((0..=0xFFu8).map(Opcode::Undefined));

    for opcode in opcodes {
      for options in options {
        if let Ok(instruction) = Instruction::new(opcode, options, 0x05) {
          assert_eq!(decode(encode(instruction)), instruction, "{:?} {:?}", opcode, options);
        }
      }
    }

    // Each of these would otherwise encode to a word that decodes to a different instruction.
    assert!(Instruction::new(Opcode::Select, Options::Color(Color::Green), 5).is_err());
    assert!(Instruction::new(Opcode::Select, Options::Raw(0), 5).is_err());
    assert!(Instruction::nullary(Opcode::Undefined(0x42)).is_err());
  }

  #[test]
  fn high_byte_first() {
    assert_eq!(to_bytes(0x0AFF), [0x0A, 0xFF]);
    assert_eq!(from_bytes([0x0A, 0xFF]), 0x0AFF);
    assert_eq!(words_to_bytes(&[0x0102, 0x0304]), vec![1, 2, 3, 4]);
  }

  #[test]
  fn dangling_byte_is_reported() {
    assert_eq!(bytes_to_words(&[1, 2, 3, 4]), (vec![0x0102, 0x0304], None));
    assert_eq!(bytes_to_words(&[1, 2, 3]), (vec![0x0102], Some(3)));
    assert_eq!(bytes_to_words(&[]), (vec![], None));
  }
}
