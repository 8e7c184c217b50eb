//! `: ; immediate postpone tick lit , compileNow:` and the `EXECUTE`
//! primitive that kicks off threaded execution of everything compiled so
//! far.

use crate::cursor::Until;
use crate::dictionary::{CompiledItem, Dictionary, DictionaryEntry};
use crate::error::ForthError;
use crate::runtime::{self, Runtime};
use crate::value::Value;
use std::rc::Rc;

/// Pushes `{dict: top of compilation stack, i: 0}` onto the return stack.
/// Invoked at end-of-input (when `execute_at_end` is set) and by
/// `wordToFunc:` to begin threading through a definition.
pub fn execute_primitive(rt: &mut Runtime) -> Result<(), ForthError> {
    let target = rt.ctx.compile_target();
    runtime::push_frame(rt, target);
    Ok(())
}

fn read_next_name(rt: &mut Runtime) -> String {
    rt.consume(Until::Whitespace, false, true)
}

pub fn install(dictionary: &Rc<Dictionary>) {
    dictionary.define(Some("EXECUTE".into()), Rc::new(execute_primitive), false);

    dictionary.define(
        Some(":".into()),
        Rc::new(|rt| {
            let name = read_next_name(rt);
            let entry = rt.dictionary.define_docol(Some(name), false);
            rt.ctx.compilation_stack.push(entry);
            Ok(())
        }),
        true,
    );

    dictionary.define(
        Some(";".into()),
        Rc::new(|rt| {
            if rt.ctx.compilation_stack.len() <= 1 {
                return Err(ForthError::CompilationStackUnderflow);
            }
            rt.ctx.compilation_stack.pop();
            Ok(())
        }),
        true,
    );

    dictionary.define(
        Some("immediate".into()),
        Rc::new(|rt| {
            rt.ctx.compile_target().immediate.set(true);
            Ok(())
        }),
        true,
    );

    dictionary.define(
        Some("postpone".into()),
        Rc::new(|rt| {
            let name = read_next_name(rt);
            let target_entry = rt
                .dictionary
                .find(&name)
                .ok_or_else(|| ForthError::UnknownWord(name.clone()))?;
            let enclosing = rt.ctx.compile_target();
            if target_entry.immediate.get() {
                enclosing.compiled.borrow_mut().push(CompiledItem::Word(target_entry));
            } else {
                let captured = target_entry.clone();
                let helper = DictionaryEntry::anonymous(Rc::new(move |rt: &mut Runtime| {
                    let then_current = rt.ctx.compile_target();
                    then_current
                        .compiled
                        .borrow_mut()
                        .push(CompiledItem::Word(captured.clone()));
                    Ok(())
                }));
                enclosing.compiled.borrow_mut().push(CompiledItem::Word(helper));
            }
            Ok(())
        }),
        true,
    );

    dictionary.define(Some("tick".into()), Rc::new(read_and_skip_operand_as(OperandKind::Entry)), false);
    dictionary.define(Some("lit".into()), Rc::new(read_and_skip_operand_as(OperandKind::Literal)), false);

    dictionary.define(
        Some(",".into()),
        Rc::new(|rt| {
            let v = rt.ctx.pop(",")?;
            rt.ctx.compile_target().compiled.borrow_mut().push(CompiledItem::Literal(v));
            Ok(())
        }),
        false,
    );

    dictionary.define(
        Some("compileNow:".into()),
        Rc::new(|rt| {
            let name = read_next_name(rt);
            match runtime::parse_literal(&name) {
                Some(v) => {
                    rt.ctx.compile_target().compiled.borrow_mut().push(CompiledItem::Literal(v));
                    Ok(())
                }
                None => Err(ForthError::CompileNowNotPrimitive),
            }
        }),
        true,
    );
}

enum OperandKind {
    Entry,
    Literal,
}

/// `tick` and `lit` both read the compiled cell the compiler parked right
/// after their own cell and then skip past it — the same
/// fetch-then-advance convention `branch` relies on, just without a jump.
fn read_and_skip_operand_as(kind: OperandKind) -> impl Fn(&mut Runtime) -> Result<(), ForthError> {
    move |rt: &mut Runtime| {
        let frame = rt.ctx.current_frame_mut()?;
        let (dict, i) = (frame.dict.clone(), frame.i);
        let cell = dict
            .compiled
            .borrow()
            .get(i)
            .cloned()
            .ok_or(ForthError::BadBranch)?;
        let value = match (&kind, cell) {
            (OperandKind::Entry, CompiledItem::Word(e)) => Value::DictEntry(e),
            (OperandKind::Literal, CompiledItem::Literal(v)) => v,
            (OperandKind::Entry, CompiledItem::Literal(v)) => v,
            (OperandKind::Literal, CompiledItem::Word(e)) => Value::DictEntry(e),
        };
        let frame = rt.ctx.current_frame_mut()?;
        frame.i = i + 1;
        rt.ctx.push(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::host::PlainObjectHost;

    fn make(source: &str) -> Runtime {
        let dict = Dictionary::new();
        crate::internals::install(&dict);
        dict.finish_core_phase();
        Runtime::new_ctx(dict, Rc::new(PlainObjectHost::new()), source)
    }

    #[test]
    fn colon_semicolon_round_trip() {
        let mut rt = make(": inner 3 ; : outer 4 inner ; outer");
        rt.query().unwrap();
        let nums: Vec<f64> = rt
            .ctx
            .parameter_stack
            .iter()
            .map(|v| match v {
                Value::Number(n) => *n,
                _ => panic!("expected number"),
            })
            .collect();
        assert_eq!(nums, vec![4.0, 3.0]);
    }

    #[test]
    fn semicolon_without_colon_underflows() {
        let mut rt = make(";");
        let err = rt.query().unwrap_err();
        assert!(matches!(err, ForthError::CompilationStackUnderflow));
    }
}
