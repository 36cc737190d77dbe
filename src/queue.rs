/*!
  The host side of the interpreter. A transport decodes wire words and pushes them through a
  `Producer`; a `Player` pulls them one at a time, runs them and waits out any pause before
  moving on. The queue is bounded: a full queue rejects (`try_enqueue`) or blocks (`enqueue`),
  it never overwrites.

  ```text
  transport --word--> Producer ==[ bounded queue ]==> Consumer --> Player --> Renderer
                                                                      │
                                                                 Interpreter
  ```
*/

use std::thread;

use crossbeam::channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, warn};

use crate::bytecode::{decode, Instruction, Opcode, Word};
use crate::effects::{Effects, Software};
use crate::error::QueueError;
use crate::interpreter::Interpreter;
use crate::pixel::Pixel;

/// Creates a queue holding at most `capacity` instructions. A capacity of zero makes every
/// `enqueue` a rendezvous with the player.
pub fn channel(capacity: usize) -> (Producer, Consumer) {
  let (sender, receiver) = bounded(capacity);
  (Producer { sender }, Consumer { receiver })
}

pub struct Producer {
  sender: Sender<Instruction>,
}

impl Producer {

  /// Enqueues without waiting. A full queue hands the instruction back.
  pub fn try_enqueue(&self, instruction: Instruction) -> Result<(), QueueError> {
    self.sender.try_send(instruction).map_err(
      |error| match error {
        TrySendError::Full(instruction)         => QueueError::Full(instruction),
        TrySendError::Disconnected(instruction) => QueueError::Disconnected(instruction),
      }
    )
  }

  /// Waits for room in the queue.
  pub fn enqueue(&self, instruction: Instruction) -> Result<(), QueueError> {
    self.sender
        .send(instruction)
        .map_err(|error| QueueError::Disconnected(error.into_inner()))
  }

  /**
    Decodes a word as delivered by the transport and enqueues it without waiting. Malformed words
    are queued as they decode; the player reports them when it reaches them.
  */
  pub fn enqueue_word(&self, word: Word) -> Result<(), QueueError> {
    self.try_enqueue(decode(word))
  }

  pub fn len(&self) -> usize {
    self.sender.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sender.is_empty()
  }

  pub fn is_full(&self) -> bool {
    self.sender.is_full()
  }
}

pub struct Consumer {
  receiver: Receiver<Instruction>,
}

impl Consumer {

  /// Waits for the next instruction. `None` once the producer is gone and the queue is drained.
  pub fn dequeue(&self) -> Option<Instruction> {
    self.receiver.recv().ok()
  }

  pub fn try_dequeue(&self) -> Option<Instruction> {
    self.receiver.try_recv().ok()
  }

  pub fn len(&self) -> usize {
    self.receiver.len()
  }

  pub fn is_empty(&self) -> bool {
    self.receiver.is_empty()
  }
}

/// Whatever pushes the committed buffer to the LEDs.
pub trait Renderer {
  fn render(&mut self, pixels: &[Pixel]);
}

/// Runs queued instructions, one per `step`.
pub struct Player<R: Renderer, E: Effects = Software> {
  interpreter : Interpreter<E>,
  renderer    : R,
  consumer    : Consumer,
  pauses      : bool, // Whether SLEEP actually blocks the loop
}

impl<R: Renderer, E: Effects> Player<R, E> {

  pub fn new(interpreter: Interpreter<E>, renderer: R, consumer: Consumer) -> Player<R, E> {
    Player {
      interpreter,
      renderer,
      consumer,
      pauses: true,
    }
  }

  /// A player that returns from SLEEP immediately, for running programs offline.
  pub fn without_pauses(mut self) -> Player<R, E> {
    self.pauses = false;
    self
  }

  /**
    Runs the next instruction, waiting for one if the queue is empty. Returns `false` once the
    producer is gone and nothing is left to run.

    A failing instruction is logged and skipped. The queue keeps accepting instructions while
    the player waits out a pause.
  */
  pub fn step(&mut self) -> bool {
    match self.consumer.dequeue() {
      Some(instruction) => {
        self.play(&instruction);
        true
      }
      None => false
    }
  }

  /// Steps until the producer disconnects. Returns the number of instructions played.
  pub fn run(&mut self) -> usize {
    let mut played = 0;
    while self.step() {
      played += 1;
    }
    debug!(played, "instruction queue closed");
    played
  }

  fn play(&mut self, instruction: &Instruction) {
    match self.interpreter.execute(instruction) {

      Ok(pause) => {
        if self.pauses && !pause.is_zero() {
          thread::sleep(pause);
        }
        if instruction.opcode() == Opcode::Update {
          self.renderer.render(self.interpreter.committed());
        }
      }

      Err(error) => {
        warn!(%instruction, %error, "skipping instruction");
      }

    }
  }

  pub fn interpreter(&self) -> &Interpreter<E> {
    &self.interpreter
  }

  pub fn renderer(&self) -> &R {
    &self.renderer
  }

  pub fn into_parts(self) -> (Interpreter<E>, R) {
    (self.interpreter, self.renderer)
  }
}
