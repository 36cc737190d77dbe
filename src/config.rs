use crate::error::ConfigError;
use crate::registers::{RegisterSeed, Variables, VERSION};

/// Pixels of the buffer when nothing else is configured.
pub const DEFAULT_BUFFER_SIZE: u8 = 30;

/// Everything an interpreter is built from.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct InterpreterConfig {
  pub buffer_size : u8,
  pub version     : u8,
  pub seed        : RegisterSeed,
}

impl InterpreterConfig {

  pub fn new(buffer_size: u8) -> InterpreterConfig {
    InterpreterConfig { buffer_size, ..InterpreterConfig::default() }
  }

  pub fn with_version(mut self, version: u8) -> InterpreterConfig {
    self.version = version;
    self
  }

  pub fn with_seed(mut self, seed: RegisterSeed) -> InterpreterConfig {
    self.seed = seed;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    match self.buffer_size {
      0 => Err(ConfigError::ZeroBufferSize),
      _ => Ok(())
    }
  }

  pub fn variables(&self) -> Variables {
    Variables::new(self.version, self.buffer_size)
  }
}

impl Default for InterpreterConfig {
  fn default() -> Self {
    InterpreterConfig {
      buffer_size : DEFAULT_BUFFER_SIZE,
      version     : VERSION,
      seed        : RegisterSeed::default(),
    }
  }
}
