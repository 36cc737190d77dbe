//! The error types of every layer. None of them is fatal: the caller decides whether to skip
//! the offending instruction or to stop.

use std::io;

use thiserror::Error;

use crate::bytecode::{Instruction, Opcode, Options};

/// An instruction that has no word of its own: encoding it and decoding the word would give
/// back a different instruction.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum InstructionError {
  #[error("opcode {0:#04x} has no wire encoding")]
  UnencodableOpcode(u8),

  #[error("options `{options}` do not apply to {opcode}")]
  MismatchedOptions { opcode: Opcode, options: Options },
}

/// Why an assembly line was rejected. `parse_line` folds all of these into EXCEPTION.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum AssemblyError {
  #[error("`{0}` is not an operation")]
  UnknownMnemonic(String),

  #[error("{mnemonic} requires an option")]
  MissingOption { mnemonic: String },

  #[error("`{token}` is not an option of {mnemonic}")]
  InvalidOption { mnemonic: String, token: String },

  #[error("{mnemonic} requires an operand")]
  MissingOperand { mnemonic: String },

  #[error("`{0}` is neither a hex byte nor a register")]
  InvalidOperand(String),
}

/// A failed instruction. The interpreter state is untouched when one of these is returned.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ExecutionError {
  #[error("EXCEPTION instruction reached the interpreter")]
  Exception,

  #[error("undefined opcode {0:#04x}")]
  UndefinedOpcode(u8),

  #[error("options `{options}` do not apply to {opcode}")]
  InvalidOption { opcode: Opcode, options: Options },

  #[error("invalid variable code {0:#04x}")]
  InvalidVariableCode(u8),

  #[error("index {index} is out of bounds for a buffer of {len} pixels")]
  IndexOutOfBounds { index: usize, len: usize },
}

#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum ConfigError {
  #[error("the pixel buffer must hold at least one pixel")]
  ZeroBufferSize,
}

/// A rejected enqueue. The instruction is handed back to the producer.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum QueueError {
  #[error("the instruction queue is full")]
  Full(Instruction),

  #[error("the instruction queue has no consumer")]
  Disconnected(Instruction),
}

/// The first line of a program that failed to assemble.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("line {line}: `{text}`: {source}")]
pub struct CompileError {
  /// 1-based.
  pub line   : usize,
  pub text   : String,
  pub source : AssemblyError,
}

#[derive(Debug, Error)]
pub enum ProgramError {
  #[error("failed to access the program")]
  Io(#[from] io::Error),

  #[error("the program ends in half a word ({byte:#04x})")]
  TruncatedWord { byte: u8 },
}
