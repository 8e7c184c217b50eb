//! Arrays, the control stack, and iteration: `[]`/`{}`, `push`/`pop`/
//! `first`/`nth`/`clone`/`collect`/`spread`, `>control`/`control>`/`I`, the
//! `[ ... ]` array-literal brackets, and the `each ... endeach` loop.

use crate::dictionary::{CompiledItem, Dictionary, DictionaryEntry};
use crate::error::ForthError;
use crate::runtime::Runtime;
use crate::value::Value;
use std::rc::Rc;

fn want_array(v: Value, caller: &'static str) -> Result<crate::value::Array, ForthError> {
    match v {
        Value::Array(a) => Ok(a),
        _ => Err(match caller {
            "clone" => ForthError::CloneNonArray,
            _ => ForthError::Host(format!("{} expects an array", caller)),
        }),
    }
}

pub fn install(dictionary: &Rc<Dictionary>) {
    dictionary.define(Some("[]".into()), Rc::new(|rt| {
        rt.ctx.push(Value::array(Vec::new()));
        Ok(())
    }), false);

    dictionary.define(Some("{}".into()), Rc::new(|rt| {
        let obj = rt.host.make_object();
        rt.ctx.push(obj);
        Ok(())
    }), false);

    dictionary.define(Some("push".into()), Rc::new(|rt| {
        let value = rt.ctx.pop("push")?;
        let arr = want_array(rt.ctx.pop("push")?, "push")?;
        arr.borrow_mut().push(value);
        rt.ctx.push(Value::Array(arr));
        Ok(())
    }), false);

    dictionary.define(Some("pop".into()), Rc::new(|rt| {
        let arr = want_array(rt.ctx.pop("pop")?, "pop")?;
        let popped = arr.borrow_mut().pop().unwrap_or(Value::Undefined);
        rt.ctx.push(Value::Array(arr));
        rt.ctx.push(popped);
        Ok(())
    }), false);

    dictionary.define(Some("first".into()), Rc::new(|rt| {
        let arr = want_array(rt.ctx.pop("first")?, "first")?;
        let v = arr.borrow().first().cloned().unwrap_or(Value::Undefined);
        rt.ctx.push(v);
        Ok(())
    }), false);

    dictionary.define(Some("nth".into()), Rc::new(|rt| {
        let index = rt.ctx.pop_number("nth")? as usize;
        let arr = want_array(rt.ctx.pop("nth")?, "nth")?;
        let v = arr.borrow().get(index).cloned().unwrap_or(Value::Undefined);
        rt.ctx.push(v);
        Ok(())
    }), false);

    dictionary.define(Some("clone".into()), Rc::new(|rt| {
        let arr = want_array(rt.ctx.pop("clone")?, "clone")?;
        let copy = arr.borrow().clone();
        rt.ctx.push(Value::array(copy));
        Ok(())
    }), false);

    dictionary.define(Some("collect".into()), Rc::new(|rt| {
        let n = rt.ctx.pop_number("collect")? as usize;
        if rt.ctx.parameter_stack.len() < n {
            return Err(ForthError::StackUnderflow("collect"));
        }
        let split_at = rt.ctx.parameter_stack.len() - n;
        let items: Vec<Value> = rt.ctx.parameter_stack.split_off(split_at);
        rt.ctx.push(Value::array(items));
        Ok(())
    }), false);

    dictionary.define(Some("spread".into()), Rc::new(|rt| {
        let arr = want_array(rt.ctx.pop("spread")?, "spread")?;
        let items = arr.borrow().clone();
        rt.ctx.parameter_stack.extend(items);
        Ok(())
    }), false);

    dictionary.define(Some(">control".into()), Rc::new(|rt| {
        let v = rt.ctx.pop(">control")?;
        rt.ctx.control_stack.push(v);
        Ok(())
    }), false);

    dictionary.define(Some("control>".into()), Rc::new(|rt| {
        let v = rt.ctx.control_stack.pop().ok_or(ForthError::StackUnderflow("control>"))?;
        rt.ctx.push(v);
        Ok(())
    }), false);

    dictionary.define(Some("I".into()), Rc::new(|rt| {
        let v = rt.ctx.control_stack.last().ok_or(ForthError::StackUnderflow("I"))?.clone();
        rt.ctx.push(v);
        Ok(())
    }), false);

    install_array_literal(dictionary);
    install_each(dictionary);
}

/// `[` opens an anonymous compilation target; `]` closes it and folds its
/// compiled sequence into a single array literal in the enclosing target.
/// A `Word` cell (a non-literal token used inside the brackets) becomes a
/// `DictEntryRef` element rather than being invoked — the bracket body is
/// never executed at parse time, only ever reinterpreted as data.
fn install_array_literal(dictionary: &Rc<Dictionary>) {
    dictionary.define(Some("[".into()), Rc::new(|rt| {
        let anon = DictionaryEntry::anonymous(Rc::new(|_| Ok(())));
        rt.ctx.compilation_stack.push(anon);
        Ok(())
    }), true);

    dictionary.define(Some("]".into()), Rc::new(|rt| {
        if rt.ctx.compilation_stack.len() <= 1 {
            return Err(ForthError::CompilationStackUnderflow);
        }
        let anon = rt.ctx.compilation_stack.pop().unwrap();
        let items: Vec<Value> = anon
            .compiled
            .borrow()
            .iter()
            .map(|cell| match cell {
                CompiledItem::Literal(v) => v.clone(),
                CompiledItem::Word(e) => Value::DictEntry(e.clone()),
            })
            .collect();
        let target = rt.ctx.compile_target();
        target.compiled.borrow_mut().push(CompiledItem::Literal(Value::array(items)));
        Ok(())
    }), true);
}

/// `each`/`endeach` compile the same branch/patch idiom the boot file uses
/// for `if`/`begin`: a guard, a clone of the iterated array, the array and
/// a running index pushed onto the control stack, a per-iteration "step"
/// that either advances (pushing the current element) or signals
/// exhaustion, a `falsyBranch` forward jump over the body to a cleanup
/// cell, the body itself (compiled as ordinary code between `each` and
/// `endeach`), a "tail" that drops the element and bumps the index, an
/// unconditional `branch` back to the step, and the cleanup that drops the
/// index and array once the loop is done.
fn install_each(dictionary: &Rc<Dictionary>) {
    let clone_word = dictionary.find("clone").expect("clone installed before each");
    let to_control = dictionary.find(">control").expect(">control installed before each");
    let falsy_branch = dictionary.find("falsyBranch").expect("falsyBranch installed before aggregates");
    let branch = dictionary.find("branch").expect("branch installed before aggregates");

    let guard = DictionaryEntry::anonymous(Rc::new(|rt: &mut Runtime| {
        match rt.ctx.peek("each") {
            Ok(Value::Array(_)) => Ok(()),
            _ => Err(ForthError::EachNeedsArray),
        }
    }));

    let step = DictionaryEntry::anonymous(Rc::new(|rt: &mut Runtime| {
        let len = rt.ctx.control_stack.len();
        let index = match &rt.ctx.control_stack[len - 1] {
            Value::Number(n) => *n as usize,
            _ => return Err(ForthError::Host("each: corrupt loop index".into())),
        };
        let array = match &rt.ctx.control_stack[len - 2] {
            Value::Array(a) => a.clone(),
            _ => return Err(ForthError::Host("each: corrupt loop array".into())),
        };
        if index < array.borrow().len() {
            let element = array.borrow()[index].clone();
            rt.ctx.control_stack.push(element);
            rt.ctx.push(Value::Boolean(true));
        } else {
            rt.ctx.push(Value::Boolean(false));
        }
        Ok(())
    }));

    let tail = DictionaryEntry::anonymous(Rc::new(|rt: &mut Runtime| {
        rt.ctx.control_stack.pop().ok_or(ForthError::StackUnderflow("endeach"))?;
        let len = rt.ctx.control_stack.len();
        match &rt.ctx.control_stack[len - 1] {
            Value::Number(n) => rt.ctx.control_stack[len - 1] = Value::Number(n + 1.0),
            _ => return Err(ForthError::Host("each: corrupt loop index".into())),
        }
        Ok(())
    }));

    let cleanup = DictionaryEntry::anonymous(Rc::new(|rt: &mut Runtime| {
        rt.ctx.control_stack.pop().ok_or(ForthError::StackUnderflow("endeach"))?;
        rt.ctx.control_stack.pop().ok_or(ForthError::StackUnderflow("endeach"))?;
        Ok(())
    }));

    {
        let guard = guard.clone();
        let clone_word = clone_word.clone();
        let to_control = to_control.clone();
        let step = step.clone();
        let falsy_branch = falsy_branch.clone();
        dictionary.define(
            Some("each".into()),
            Rc::new(move |rt| {
                let target = rt.ctx.compile_target();
                let mut body = target.compiled.borrow_mut();
                body.push(CompiledItem::Word(guard.clone()));
                body.push(CompiledItem::Word(clone_word.clone()));
                body.push(CompiledItem::Word(to_control.clone()));
                drop(body);
                target.compiled.borrow_mut().push(CompiledItem::Literal(Value::Number(0.0)));
                target.compiled.borrow_mut().push(CompiledItem::Word(to_control.clone()));
                let loop_start = target.compiled.borrow().len();
                target.compiled.borrow_mut().push(CompiledItem::Word(step.clone()));
                target.compiled.borrow_mut().push(CompiledItem::Word(falsy_branch.clone()));
                let fwd = target.compiled.borrow().len();
                target.compiled.borrow_mut().push(CompiledItem::Literal(Value::Number(0.0)));
                rt.ctx.push(Value::CompiledCell(target.clone(), loop_start));
                rt.ctx.push(Value::CompiledCell(target.clone(), fwd));
                Ok(())
            }),
            true,
        );
    }

    {
        let tail = tail.clone();
        let branch = branch.clone();
        let cleanup = cleanup.clone();
        dictionary.define(
            Some("endeach".into()),
            Rc::new(move |rt| {
                let target = rt.ctx.compile_target();
                target.compiled.borrow_mut().push(CompiledItem::Word(tail.clone()));

                let fwd = rt.ctx.pop("endeach")?;
                let loop_start = rt.ctx.pop("endeach")?;
                let (fwd_entry, fwd_i) = match fwd {
                    Value::CompiledCell(e, i) => (e, i),
                    _ => return Err(ForthError::BadStackFrame),
                };
                let (loop_entry, loop_i) = match loop_start {
                    Value::CompiledCell(e, i) => (e, i),
                    _ => return Err(ForthError::BadStackFrame),
                };
                if !Rc::ptr_eq(&fwd_entry, &target) || !Rc::ptr_eq(&loop_entry, &target) {
                    return Err(ForthError::BadStackFrame);
                }

                target.compiled.borrow_mut().push(CompiledItem::Word(branch.clone()));
                let back_operand_i = target.compiled.borrow().len();
                let back_offset = loop_i as i64 - back_operand_i as i64;
                target.compiled.borrow_mut().push(CompiledItem::Literal(Value::Number(back_offset as f64)));

                let cleanup_i = target.compiled.borrow().len();
                let fwd_offset = cleanup_i as i64 - fwd_i as i64;
                target.compiled.borrow_mut()[fwd_i] = CompiledItem::Literal(Value::Number(fwd_offset as f64));

                target.compiled.borrow_mut().push(CompiledItem::Word(cleanup.clone()));
                Ok(())
            }),
            true,
        );
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
    fn each_sums_array() {
        let mut rt = make("0 [ 3 5 7 ] : addall each I + endeach ; addall");
        rt.query().unwrap();
        match rt.ctx.parameter_stack.last().unwrap() {
            Value::Number(n) => assert_eq!(*n, 15.0),
            _ => panic!("expected number"),
        }
    }

    #[test]
    fn each_leaves_untouched_stack_below_the_loop_alone() {
        let mut rt = make("[ 1 2 3 ] dup each endeach");
        rt.query().unwrap();
        match rt.ctx.parameter_stack.last().unwrap() {
            Value::Array(a) => assert_eq!(a.borrow().len(), 3),
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn each_collects_elements_in_order_via_push() {
        let mut rt = make("[] [ 10 20 30 ] : gather each I push endeach ; gather");
        rt.query().unwrap();
        match rt.ctx.parameter_stack.last().unwrap() {
            Value::Array(a) => {
                let nums: Vec<f64> = a.borrow().iter().map(|v| match v {
                    Value::Number(n) => *n,
                    _ => panic!(),
                }).collect();
                assert_eq!(nums, vec![10.0, 20.0, 30.0]);
            }
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn each_needs_array() {
        let mut rt = make(": bad each drop endeach ; 5 bad");
        let err = rt.query().unwrap_err();
        assert!(matches!(err, ForthError::EachNeedsArray));
    }

    #[test]
    fn array_literal_matches_pushes() {
        let mut rt = make("[ 1 2 3 ]");
        rt.query().unwrap();
        match rt.ctx.parameter_stack.last().unwrap() {
            Value::Array(a) => {
                let nums: Vec<f64> = a.borrow().iter().map(|v| match v {
                    Value::Number(n) => *n,
                    _ => panic!(),
                }).collect();
                assert_eq!(nums, vec![1.0, 2.0, 3.0]);
            }
            _ => panic!("expected array"),
        }
    }
}
