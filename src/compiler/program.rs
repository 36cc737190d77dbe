//! Program files: the compiled words back to back, high byte first, with no header.

use std::io::{Read, Write};

use tracing::info;

use crate::bytecode::{bytes_to_words, words_to_bytes, Word};
use crate::error::ProgramError;

pub fn write_program<W: Write>(mut writer: W, words: &[Word]) -> Result<(), ProgramError> {
  writer.write_all(&words_to_bytes(words))?;
  writer.flush()?;
  info!(words = words.len(), "wrote program");
  Ok(())
}

/// Reads words to the end of the stream. A stream of odd length is rejected whole.
pub fn read_program<R: Read>(mut reader: R) -> Result<Vec<Word>, ProgramError> {
  let mut bytes = Vec::new();
  reader.read_to_end(&mut bytes)?;

  match bytes_to_words(&bytes) {
    (words, None)   => Ok(words),
    (_, Some(byte)) => Err(ProgramError::TruncatedWord { byte }),
  }
}
