mod compile;
mod program;

pub use compile::*;
pub use program::{read_program, write_program};
