/*!
  Newton: a 16-bit bytecode for addressable-LED animations, with the pieces to produce and run it.

  ```text
  assembly text -> [`bytecode::Assembler`] -> `Instruction` -> [`bytecode::encode`] -> wire word
                                                   │
  wire word -> [`bytecode::decode`] -> [`queue::Producer`] -> [`queue::Player`] -> `Interpreter`
  ```
  The offline compiler (`compiler`, and the `newtonc` binary) turns a whole source file into a
  program file of wire words.
*/

pub mod address;
pub mod bytecode;
pub mod compiler;
pub mod config;
pub mod effects;
pub mod error;
pub mod interpreter;
pub mod pixel;
pub mod queue;
pub mod registers;
pub mod symboltable;

pub use bytecode::{decode, encode, parse_line, try_parse_line, Instruction, Opcode, Options, Word};
pub use config::InterpreterConfig;
pub use effects::{Effects, Software};
pub use error::{
  AssemblyError,
  CompileError,
  ConfigError,
  ExecutionError,
  InstructionError,
  ProgramError,
  QueueError
};
pub use interpreter::Interpreter;
pub use pixel::Pixel;
pub use registers::{RegisterSeed, Registers, Variables, VERSION};
