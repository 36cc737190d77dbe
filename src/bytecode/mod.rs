/*!

  Instructions are a single 16 bit word. The word is built by explicit shifts and masks, never by
  reinterpreting memory, so the layout below holds on any host regardless of its endianness:

    Opcode:   6 bits   [15..10]
    Options:  2 bits   [ 9.. 8]
    Value:    8 bits   [ 7.. 0]

  The meaning of the two option bits depends entirely on the opcode. SELECT reads them as a
  `SelectMode`, SLEEP as a `TimeUnit`, and so on. The options are therefore carried as a sum type,
  `Options`, whose variant is chosen from the opcode whenever a word is decoded or a line is
  assembled. Nothing reads the option bits without first asking the opcode what they mean.

  IGNORE and EXCEPTION have the in-memory codes 0xFE and 0xFF, which do not fit in six bits. On
  the wire they take the top two field codes, 0x3E and 0x3F (their low six bits). Every other
  field code without a defined meaning decodes to `Opcode::Undefined` and survives a round trip
  untouched; the interpreter, not the decoder, refuses to run it.

  Words travel high byte first, both over the transport and in program files.

*/

mod assembly;
mod binary;
mod instruction;
mod options;

pub use assembly::{parse_input, parse_line, try_parse_line, Assembler};
pub use binary::{
  bytes_to_words, decode, encode, from_bytes, to_bytes, words_to_bytes, Word, OPCODE_MASK,
  OPCODE_SHIFT, OPTIONS_MASK, OPTIONS_SHIFT, VALUE_MASK,
};
pub use instruction::Instruction;
pub use options::{Color, EffectScope, LoadSource, Options, RangeBound, SelectMode, TimeUnit};

use num_enum::FromPrimitive;
use strum_macros::{Display as StrumDisplay, IntoStaticStr};

/// Width of the opcode field on the wire.
pub const OPCODE_FIELD_BITS: u32 = 6;
/// Largest value the opcode field can hold.
pub const MAX_OPCODE_FIELD: u8 = (1 << OPCODE_FIELD_BITS) - 1;

/**
  Opcodes of the virtual machine.

  The discriminants are the codes the instruction set has always used and must not change.
  `Undefined` catches every other code so that a decoded word never loses its opcode bits.
  Only the opcodes `Opcode::from_field` can return have an encoding; `Instruction::new` refuses
  the others, such as an `Undefined` holding a defined code or a code above the field width.
*/
#[derive(
  StrumDisplay, IntoStaticStr, FromPrimitive,
  Clone,        Copy,          Eq, PartialEq, Debug, Hash
)]
#[strum(serialize_all = "UPPERCASE")]
#[repr(u8)]
pub enum Opcode {
  // Control //
  Update    = 0x00,
  Clear     = 0x01,

  // Selection //
  Select    = 0x02,
  Range     = 0x03,

  // Buffer alteration //
  Set       = 0x04,
  Fill      = 0x05,

  // Effects //
  Blur      = 0x06,
  Sleep     = 0x07,

  // Registers //
  LoadX     = 0x08,
  LoadY     = 0x09,

  // Takes the implicit discriminant 0x0A, so it must come before the codes at the top of the
  // range. Its payload, not its discriminant, is the code.
  #[num_enum(catch_all)]
  Undefined(u8),

  // Misc //
  Ignore    = 0xFE,
  Exception = 0xFF,
}

impl Opcode {

  /// Every defined opcode, in code order.
  pub const DEFINED: [Opcode; 12] = [
    Opcode::Update, Opcode::Clear, Opcode::Select, Opcode::Range, Opcode::Set, Opcode::Fill,
    Opcode::Blur, Opcode::Sleep, Opcode::LoadX, Opcode::LoadY, Opcode::Ignore, Opcode::Exception,
  ];

  /// The in-memory code of the opcode.
  pub fn code(&self) -> u8 {
    match self {
      Opcode::Update       => 0x00,
      Opcode::Clear        => 0x01,
      Opcode::Select       => 0x02,
      Opcode::Range        => 0x03,
      Opcode::Set          => 0x04,
      Opcode::Fill         => 0x05,
      Opcode::Blur         => 0x06,
      Opcode::Sleep        => 0x07,
      Opcode::LoadX        => 0x08,
      Opcode::LoadY        => 0x09,
      Opcode::Ignore       => 0xFE,
      Opcode::Exception    => 0xFF,
      Opcode::Undefined(c) => *c,
    }
  }

  /// The six bit code the opcode occupies on the wire.
  pub fn field(&self) -> u8 {
    self.code() & MAX_OPCODE_FIELD
  }

  /// Inverse of `Opcode::field`.
  pub fn from_field(field: u8) -> Opcode {
    match field & MAX_OPCODE_FIELD {
      0x3E  => Opcode::Ignore,
      0x3F  => Opcode::Exception,
      field => Opcode::from(field),
    }
  }

  /// Whether the opcode survives `field` and `from_field` unchanged.
  pub fn is_encodable(&self) -> bool {
    Opcode::from_field(self.field()) == *self
  }

  pub fn is_defined(&self) -> bool {
    !matches!(self, Opcode::Undefined(_))
  }

  /// Whether the two option bits carry meaning for this opcode.
  pub fn takes_options(&self) -> bool {
    matches!(
      self,
      Opcode::Select | Opcode::Range | Opcode::Set | Opcode::Fill | Opcode::Blur
        | Opcode::Sleep | Opcode::LoadX | Opcode::LoadY
    )
  }

  /// Whether the value byte carries meaning for this opcode.
  pub fn takes_value(&self) -> bool {
    self.takes_options()
  }
}
