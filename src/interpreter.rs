//! The Newton virtual machine: two pixel buffers, a selection cursor, a range and two registers,
//! driven one instruction at a time by `Interpreter::execute`.

use std::fmt::{Display, Formatter};
use std::ops::Range;
use std::time::Duration;

use lazy_static::lazy_static;
use prettytable::{format as TableFormat, row, Table};
use tracing::debug;

use crate::address::Address;
use crate::bytecode::{Color, EffectScope, Instruction, LoadSource, Opcode, Options, TimeUnit};
use crate::config::InterpreterConfig;
use crate::effects::{Effects, Software};
use crate::error::{ConfigError, ExecutionError};
use crate::pixel::Pixel;
use crate::registers::{Registers, VariableCode, Variables};

pub struct Interpreter<E: Effects = Software> {

  // Pixel buffers
  working   : Box<[Pixel]>, // Mutated by SET, FILL, BLUR and CLEAR
  committed : Box<[Pixel]>, // What the LEDs show, replaced wholesale on UPDATE

  // Registers //
  cursor    : u8,        // Selection cursor, read by SET
  range     : (u8, u8),  // Inclusive `[start, end]`, read by FILL and ranged BLUR
  registers : Registers, // X and Y
  variables : Variables, // Read-only facts

  effects   : E,
}

impl Interpreter<Software> {
  pub fn new(config: InterpreterConfig) -> Result<Interpreter<Software>, ConfigError> {
    Interpreter::with_effects(config, Software)
  }
}

impl<E: Effects> Interpreter<E> {

  // region Display methods

  fn make_pixel_table(&self) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Index", ub->"Working", ub->"Committed", ubl->"Marks"]);

    for (i, (working, committed)) in self.working.iter().zip(self.committed.iter()).enumerate() {
      table.add_row(
        row![r->format!("{} =", i), format!("{}", working), format!("{}", committed), self.marks(i)]
      );
    }
    table
  }

  /// The registers that point at pixel `index`.
  fn marks(&self, index: usize) -> String {
    let mut marks = vec![];
    if index == self.cursor as usize {
      marks.push("<-- cursor");
    }
    if index == self.range.0 as usize {
      marks.push("start");
    }
    if index == self.range.1 as usize {
      marks.push("end");
    }
    marks.join(", ")
  }

  // endregion

  // region Construction and accessors

  /// An interpreter whose SELECT/RANGE rescaling and BLUR are done by `effects`.
  pub fn with_effects(config: InterpreterConfig, effects: E) -> Result<Interpreter<E>, ConfigError> {
    config.validate()?;

    let variables = config.variables();
    let size      = config.buffer_size as usize;

    Ok(
      Interpreter {
        working   : vec![Pixel::BLACK; size].into_boxed_slice(),
        committed : vec![Pixel::BLACK; size].into_boxed_slice(),
        cursor    : 0,
        range     : (0, 0),
        registers : Registers::seeded(config.seed, variables),
        variables,
        effects,
      }
    )
  }

  pub fn working(&self) -> &[Pixel] {
    &self.working
  }

  /// The buffer a renderer should push to the LEDs.
  pub fn committed(&self) -> &[Pixel] {
    &self.committed
  }

  pub fn cursor(&self) -> u8 {
    self.cursor
  }

  pub fn range(&self) -> (u8, u8) {
    self.range
  }

  pub fn registers(&self) -> Registers {
    self.registers
  }

  pub fn variables(&self) -> Variables {
    self.variables
  }

  pub fn effects(&self) -> &E {
    &self.effects
  }

  // endregion

  // region Execution

  /**
    Performs one transition and returns how long the caller should pause before the next
    instruction. The interpreter never sleeps itself.

    A failed instruction has no effect at all: every index is checked before the buffers or
    registers are touched.
  */
  pub fn execute(&mut self, instruction: &Instruction) -> Result<Duration, ExecutionError> {
    debug!(%instruction, "executing");

    let result = self.transition(instruction);

    #[cfg(feature = "trace_computation")]
    println!("{}\n{}", instruction, self);

    result
  }

  fn transition(&mut self, instruction: &Instruction) -> Result<Duration, ExecutionError> {
    let opcode  = instruction.opcode();
    let options = instruction.options();
    let value   = instruction.value();

    match (opcode, options) {

      (Opcode::Ignore, _) => {}

      (Opcode::Exception, _) => return Err(ExecutionError::Exception),

      (Opcode::Undefined(code), _) => return Err(ExecutionError::UndefinedOpcode(code)),

      (Opcode::Update, _) => {
        self.committed.copy_from_slice(&self.working);
      }

      (Opcode::Clear, _) => {
        self.working.fill(Pixel::BLACK);
      }

      (Opcode::Select, Options::Select(mode)) => {
        self.cursor = self.resolve(Address::for_select(mode, value));
      }

      (Opcode::Range, Options::Range(bound)) => {
        let index = self.resolve(Address::for_bound(bound, value));
        match bound.is_start() {
          true  => self.range.0 = index,
          false => self.range.1 = index,
        }
      }

      (Opcode::Set, Options::Color(color)) => {
        let index = self.checked_index(self.cursor)?;
        self.working[index].set_channel(color, value);
      }

      (Opcode::Fill, Options::Color(color)) => {
        let window = self.range_window()?;
        fill(&mut self.working[window], color, value);
      }

      (Opcode::Blur, Options::Effect(scope)) => {
        let window = match scope {
          EffectScope::All   => 0..self.working.len(),
          EffectScope::Range => self.range_window()?,
        };
        self.effects.blur(&mut self.working[window], value);
      }

      (Opcode::Sleep, Options::Time(unit)) => return Ok(pause(unit, value)),

      (Opcode::LoadX, Options::Load(source)) => {
        self.registers.x = self.load(source, value)?;
      }

      (Opcode::LoadY, Options::Load(source)) => {
        self.registers.y = self.load(source, value)?;
      }

      (opcode, options) => return Err(ExecutionError::InvalidOption { opcode, options }),

    }

    Ok(Duration::ZERO)
  }

  fn resolve(&self, address: Address) -> u8 {
    address.resolve(&self.effects, self.variables.buffer_size)
  }

  fn checked_index(&self, index: u8) -> Result<usize, ExecutionError> {
    let index = index as usize;
    match index < self.working.len() {
      true  => Ok(index),
      false => Err(ExecutionError::IndexOutOfBounds { index, len: self.working.len() }),
    }
  }

  /// The inclusive range as a slice range. A range whose start lies past its end is empty.
  fn range_window(&self) -> Result<Range<usize>, ExecutionError> {
    let (start, end) = self.range;
    if start > end {
      return Ok(0..0);
    }
    let end = self.checked_index(end)?;
    Ok(start as usize..end + 1)
  }

  fn load(&self, source: LoadSource, value: u8) -> Result<u8, ExecutionError> {
    match source.channel() {

      Some(color) => {
        let index = self.checked_index(value)?;
        Ok(self.working[index].channel(color))
      }

      None => {
        VariableCode::try_from(value)
          .map(|code| self.variables.get(code))
          .map_err(|_| ExecutionError::InvalidVariableCode(value))
      }

    }
  }

  // endregion

}

fn fill(window: &mut [Pixel], color: Color, value: u8) {
  for pixel in window.iter_mut() {
    pixel.set_channel(color, value);
  }
}

fn pause(unit: TimeUnit, value: u8) -> Duration {
  let value = value as u64;
  match unit {
    TimeUnit::Micros  => Duration::from_micros(value),
    TimeUnit::Millis  => Duration::from_millis(value),
    TimeUnit::Seconds => Duration::from_millis(value * 1_000),
    TimeUnit::Minutes => Duration::from_millis(value * 60_000),
  }
}

impl<E: Effects> Display for Interpreter<E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let pixel_table = self.make_pixel_table();

    write!(
      f,
      "Cursor: {}\tRange: [{}, {}]\t{}\n{}",
      self.cursor,
      self.range.0,
      self.range.1,
      self.registers,
      pixel_table
    )
  }
}


lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}
