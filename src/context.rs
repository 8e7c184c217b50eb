//! Everything one thread of execution owns: the four stacks, the input
//! cursor, and the halted/paused flags.

use crate::cursor::InputCursor;
use crate::dictionary::DictionaryEntry;
use crate::error::ForthError;
use crate::value::Value;
use std::cell::Cell;
use std::rc::Rc;

/// A return-stack entry: the definition currently executing, and the index
/// of the next compiled cell to dispatch.
pub struct Frame {
    pub dict: Rc<DictionaryEntry>,
    pub i: usize,
}

/// A one-shot completion signal, resolved exactly once when `halted`
/// transitions to true. The engine is synchronous, so "resolved" is simply
/// observable after the fact; an embedder driving an async host can poll it.
#[derive(Default)]
pub struct HaltedPromise {
    resolved: Cell<bool>,
}

impl HaltedPromise {
    pub fn resolve(&self) {
        self.resolved.set(true);
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get()
    }
}

pub struct Context {
    pub parameter_stack: Vec<Value>,
    pub return_stack: Vec<Frame>,
    pub control_stack: Vec<Value>,
    pub compilation_stack: Vec<Rc<DictionaryEntry>>,
    pub input: InputCursor,
    pub halted: bool,
    pub paused: bool,
    pub halted_promise: HaltedPromise,
    pub execute_at_end: bool,
    pub did_execute_and_end: bool,
    pub me: Value,
}

impl Context {
    pub fn new(input: InputCursor, base: Rc<DictionaryEntry>) -> Context {
        Context {
            parameter_stack: Vec::new(),
            return_stack: Vec::new(),
            control_stack: Vec::new(),
            compilation_stack: vec![base],
            input,
            halted: false,
            paused: false,
            halted_promise: HaltedPromise::default(),
            execute_at_end: true,
            did_execute_and_end: false,
            me: Value::Undefined,
        }
    }

    pub fn push(&mut self, v: Value) {
        self.parameter_stack.push(v);
    }

    pub fn pop(&mut self, caller: &'static str) -> Result<Value, ForthError> {
        self.parameter_stack
            .pop()
            .ok_or(ForthError::StackUnderflow(caller))
    }

    pub fn peek(&self, caller: &'static str) -> Result<&Value, ForthError> {
        self.parameter_stack
            .last()
            .ok_or(ForthError::StackUnderflow(caller))
    }

    pub fn pop_number(&mut self, caller: &'static str) -> Result<f64, ForthError> {
        match self.pop(caller)? {
            Value::Number(n) => Ok(n),
            other => {
                self.parameter_stack.push(other);
                Err(ForthError::StackUnderflow(caller))
            }
        }
    }

    pub fn compile_target(&self) -> Rc<DictionaryEntry> {
        self.compilation_stack
            .last()
            .expect("compilation_stack always has a base entry")
            .clone()
    }

    pub fn current_frame_mut(&mut self) -> Result<&mut Frame, ForthError> {
        self.return_stack
            .last_mut()
            .ok_or(ForthError::ReturnStackUnderflow)
    }
}
