use bimap::BiMap;
use lazy_static::lazy_static;

use crate::bytecode::Opcode;

/// The standard instruction set. Distinct on both sides, so no entry shadows another.
pub const STANDARD: [(&str, Opcode); 11] = [
  ("NOP",  Opcode::Ignore),
  ("UPDT", Opcode::Update),
  ("CLR",  Opcode::Clear),
  ("SEL",  Opcode::Select),
  ("RAN",  Opcode::Range),
  ("SET",  Opcode::Set),
  ("FILL", Opcode::Fill),
  ("EBLR", Opcode::Blur),
  ("SLP",  Opcode::Sleep),
  ("LDX",  Opcode::LoadX),
  ("LDY",  Opcode::LoadY),
];

/**
  The mnemonic table maps the assembly mnemonics to their opcodes and back. It is really just a
  convenience wrapper around a BiMap. EXCEPTION and undefined opcodes have no mnemonic.

*/
pub struct MnemonicTable {
  table: BiMap<&'static str, Opcode>
}

impl MnemonicTable {

  pub fn new() -> MnemonicTable {
    MnemonicTable {
      table: BiMap::new()
    }
  }

  /// The table of the standard instruction set.
  pub fn standard() -> MnemonicTable {
    MnemonicTable {
      table: STANDARD.iter().copied().collect()
    }
  }

  pub fn opcode(&self, mnemonic: &str) -> Option<Opcode> {
    self.table.get_by_left(mnemonic).copied()
  }

  pub fn mnemonic(&self, opcode: Opcode) -> Option<&'static str> {
    self.table.get_by_right(&opcode).copied()
  }

  pub fn insert(&mut self, mnemonic: &'static str, opcode: Opcode)
    -> Result<(), (&'static str, Opcode)>{
    self.table.insert_no_overwrite(mnemonic, opcode)
  }

  pub fn len(&self) -> usize {
    self.table.len()
  }

  pub fn is_empty(&self) -> bool {
    self.table.is_empty()
  }
}

impl Default for MnemonicTable {
  fn default() -> Self {
    MnemonicTable::standard()
  }
}

lazy_static! {
  pub static ref MNEMONICS: MnemonicTable = MnemonicTable::standard();
}
