//! `newtonc`, the offline compiler: assembles, disassembles and test-runs Newton programs.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use newton::bytecode::Word;
use newton::compiler::{disassemble, read_program, write_program, Compilation};
use newton::config::{InterpreterConfig, DEFAULT_BUFFER_SIZE};
use newton::error::{CompileError, ConfigError, ProgramError, QueueError};
use newton::interpreter::Interpreter;
use newton::pixel::Pixel;
use newton::queue::{channel, Player, Renderer};

/// Newton offline compiler
#[derive(Parser, Debug)]
#[command(name = "newtonc", version)]
#[command(about = "Compile, inspect and run Newton LED programs", long_about = None)]
struct Arguments {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Assemble a source file into a program file
  Compile {
    /// Assembly source, one instruction per line
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the program
    #[arg(short, long, default_value = "out.bin")]
    output: PathBuf,

    /// Print the address, word and mnemonic of every instruction
    #[arg(short, long)]
    listing: bool,
  },

  /// Print a program file as assembly
  Disassemble {
    #[arg(short, long)]
    input: PathBuf,
  },

  /// Run a program on a software interpreter and print the final committed buffer
  Run {
    /// A program file (`.bin`) or assembly source (anything else)
    #[arg(short, long)]
    input: PathBuf,

    /// Number of pixels
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    size: u8,

    /// Print the machine state after every instruction
    #[arg(long)]
    trace: bool,

    /// Actually wait out SLEEP instructions
    #[arg(long)]
    sleep: bool,
  },
}

#[derive(Debug, Error)]
enum CliError {
  #[error("cannot read `{}`: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("cannot write `{}`: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Compile(#[from] CompileError),

  #[error("`{}`: {source}", path.display())]
  Program { path: PathBuf, source: ProgramError },

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Queue(#[from] QueueError),
}

/// Counts the frames the program would have shown.
#[derive(Default)]
struct FrameCounter(usize);

impl Renderer for FrameCounter {
  fn render(&mut self, _pixels: &[Pixel]) {
    self.0 += 1;
  }
}

fn main() -> ExitCode {
  let arguments = Arguments::parse();

  // RUST_LOG controls the log level, WARN by default.
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();

  exit_code(execute(arguments.command))
}

/// Reports a failed command on stderr.
fn exit_code(result: Result<(), CliError>) -> ExitCode {
  match result {
    Ok(())     => ExitCode::SUCCESS,
    Err(error) => {
      eprintln!("error: {}", error);
      ExitCode::FAILURE
    }
  }
}

fn execute(command: Command) -> Result<(), CliError> {
  match command {
    Command::Compile { input, output, listing }   => compile(&input, &output, listing),
    Command::Disassemble { input }                => {
      print!("{}", disassemble(&load_program(&input)?));
      Ok(())
    }
    Command::Run { input, size, trace, sleep }    => run(&input, size, trace, sleep),
  }
}

fn read_source(path: &Path) -> Result<String, CliError> {
  fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn load_program(path: &Path) -> Result<Vec<Word>, CliError> {
  let file = File::open(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
  read_program(file).map_err(|source| CliError::Program { path: path.to_path_buf(), source })
}

fn compile(input: &Path, output: &Path, listing: bool) -> Result<(), CliError> {
  let compilation = Compilation::compile(&read_source(input)?)?;

  if listing {
    print!("{}", compilation.listing);
  }

  let file = File::create(output)
    .map_err(|source| CliError::Write { path: output.to_path_buf(), source })?;
  write_program(file, &compilation.code)
    .map_err(|source| CliError::Program { path: output.to_path_buf(), source })?;

  println!(
    "Compiled {} instructions into {} bytes: {}",
    compilation.len(),
    compilation.len() * 2,
    output.display()
  );
  Ok(())
}

fn run(input: &Path, size: u8, trace: bool, sleep: bool) -> Result<(), CliError> {
  let words = match input.extension().and_then(|extension| extension.to_str()) {
    Some("bin") => load_program(input)?,
    _           => Compilation::compile(&read_source(input)?)?.code,
  };

  let interpreter = Interpreter::new(InterpreterConfig::new(size))?;
  let (producer, consumer) = channel(words.len().max(1));
  for word in words {
    producer.enqueue_word(word)?;
  }
  drop(producer);

  let mut player = Player::new(interpreter, FrameCounter::default(), consumer);
  if !sleep {
    player = player.without_pauses();
  }

  let played = match trace {
    true => {
      let mut played = 0;
      while player.step() {
        played += 1;
        println!("{}", player.interpreter());
      }
      played
    }
    false => player.run(),
  };

  let (interpreter, frames) = player.into_parts();
  info!(played, frames = frames.0, "program finished");

  println!("{} instructions, {} frames", played, frames.0);
  for (index, pixel) in interpreter.committed().iter().enumerate() {
    println!("{:>3}  {}", index, pixel);
  }
  Ok(())
}
