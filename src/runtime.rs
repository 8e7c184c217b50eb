//! Ties the dictionary, a context, and a host bridge together, and drives
//! the inner executor (`query`/`inner_next`) plus the compiler's one-token
//! step (`interpret`).

use crate::context::{Context, Frame};
use crate::cursor::InputCursor;
use crate::dictionary::{CompiledItem, Dictionary, DictionaryEntry};
use crate::error::ForthError;
use crate::host::HostBridge;
use crate::internals;
use crate::internals::pause::{BlockingScheduler, Scheduler};
use crate::value::Value;
use log::{debug, trace, warn};
use std::rc::Rc;

pub struct Runtime {
    pub dictionary: Rc<Dictionary>,
    pub host: Rc<dyn HostBridge>,
    pub scheduler: Rc<dyn Scheduler>,
    pub ctx: Context,
}

impl Runtime {
    /// Builds a dictionary with every core word registered and the boot
    /// source compiled in, ready to hand out fresh contexts.
    pub fn bootstrap(host: Rc<dyn HostBridge>) -> Rc<Dictionary> {
        let dictionary = Dictionary::new();
        internals::install(&dictionary);
        let base = DictionaryEntry::uncallable();
        let mut boot_rt = Runtime {
            dictionary: dictionary.clone(),
            host,
            scheduler: Rc::new(BlockingScheduler),
            ctx: Context::new(InputCursor::new(crate::boot::SOURCE), base),
        };
        boot_rt.ctx.execute_at_end = true;
        boot_rt.query().expect("boot source must compile cleanly");
        dictionary.finish_core_phase();
        dictionary
    }

    /// A fresh context sharing the given dictionary and host — the shape
    /// every new top-level session, and every `wordToFunc:` invocation,
    /// starts from. Uses a blocking `sleep` by default; swap it with
    /// [`Runtime::set_scheduler`] for a cooperative embedding.
    pub fn new_ctx(dictionary: Rc<Dictionary>, host: Rc<dyn HostBridge>, source: impl Into<String>) -> Runtime {
        let base = DictionaryEntry::uncallable();
        Runtime {
            dictionary,
            host,
            scheduler: Rc::new(BlockingScheduler),
            ctx: Context::new(InputCursor::new(source), base),
        }
    }

    pub fn set_scheduler(&mut self, scheduler: Rc<dyn Scheduler>) {
        self.scheduler = scheduler;
    }

    pub fn define(
        &mut self,
        name: Option<&str>,
        primitive: crate::dictionary::Primitive,
        immediate: bool,
    ) -> Rc<DictionaryEntry> {
        self.dictionary.define(name.map(|s| s.to_string()), primitive, immediate)
    }

    pub fn find_dictionary_entry(&self, name: &str) -> Option<Rc<DictionaryEntry>> {
        self.dictionary.find(name)
    }

    pub fn consume(&mut self, until: crate::cursor::Until, including: bool, ignore_ws: bool) -> String {
        self.ctx.input.consume(until, including, ignore_ws)
    }

    pub fn core_word_impl(&self, name: &str) -> Option<crate::dictionary::Primitive> {
        self.dictionary.core_word(name)
    }

    /// Runs until halted or paused. The only loop in the engine: drain the
    /// return stack one cell at a time, and when it empties, compile one
    /// more token.
    pub fn query(&mut self) -> Result<(), ForthError> {
        while !self.ctx.halted && !self.ctx.paused {
            if !self.ctx.return_stack.is_empty() {
                self.inner_next()?;
            } else {
                self.interpret()?;
            }
        }
        if self.ctx.halted {
            self.ctx.halted_promise.resolve();
        }
        Ok(())
    }

    /// Fetch-then-advance: read `(dict, i)` off the top frame, store `i + 1`
    /// back immediately, then dispatch `dict.compiled[i]` — the
    /// pre-increment `i`. `branch`/`falsyBranch`/`lit`/`tick` rely on this:
    /// by the time their primitive runs, `frame.i` already points one past
    /// their own cell, i.e. at their operand.
    fn inner_next(&mut self) -> Result<(), ForthError> {
        let depth = self.ctx.return_stack.len();
        let (dict, i) = {
            let frame = &mut self.ctx.return_stack[depth - 1];
            let i = frame.i;
            frame.i = i + 1;
            (frame.dict.clone(), i)
        };
        let len = dict.compiled.borrow().len();
        if i == len {
            self.ctx.return_stack.pop();
            trace!("exit {}", dict.name.as_deref().unwrap_or("<anon>"));
            return Ok(());
        }
        let cell = dict.compiled.borrow()[i].clone();
        match cell {
            CompiledItem::Word(entry) => {
                trace!("call {}", entry.name.as_deref().unwrap_or("<anon>"));
                entry.call(self)
            }
            CompiledItem::Literal(v) => {
                self.ctx.push(v);
                Ok(())
            }
        }
    }

    /// The compiler's "interpret one token" step, per the always-be-compiling
    /// model: look the token up, run it now if immediate, otherwise append it
    /// to the current compilation target.
    fn interpret(&mut self) -> Result<(), ForthError> {
        if self.ctx.input.at_end() {
            if self.ctx.execute_at_end && !self.ctx.did_execute_and_end {
                self.ctx.did_execute_and_end = true;
                self.ctx.compilation_stack.truncate(1);
                return internals::definition::execute_primitive(self);
            }
            self.ctx.halted = true;
            return Ok(());
        }
        let word = self.ctx.input.next_word();
        if word.is_empty() {
            return Ok(());
        }
        if let Some(entry) = self.dictionary.find(&word) {
            if entry.immediate.get() {
                debug!("immediate {}", word);
                entry.call(self)
            } else {
                let target = self.ctx.compile_target();
                target.compiled.borrow_mut().push(CompiledItem::Word(entry));
                Ok(())
            }
        } else if let Some(v) = parse_literal(&word) {
            let target = self.ctx.compile_target();
            target.compiled.borrow_mut().push(CompiledItem::Literal(v));
            Ok(())
        } else {
            warn!("unknown word: {}", word);
            Err(ForthError::UnknownWord(word))
        }
    }
}

pub(crate) fn parse_literal(word: &str) -> Option<Value> {
    match word {
        "true" => return Some(Value::Boolean(true)),
        "false" => return Some(Value::Boolean(false)),
        "undefined" => return Some(Value::Undefined),
        "null" => return Some(Value::Null),
        _ => {}
    }
    word.parse::<f64>().ok().map(Value::Number)
}

/// Pushes `{dict: entry, i: 0}` onto the return stack — the DOCOL primitive
/// shared by every user-defined word, and the shape `EXECUTE`/`wordToFunc:`
/// use to kick off threaded execution.
pub fn push_frame(rt: &mut Runtime, entry: Rc<DictionaryEntry>) {
    rt.ctx.return_stack.push(Frame { dict: entry, i: 0 });
}
