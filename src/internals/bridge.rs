//! The dynamic property access and host-callable words: `C`, `.`/`.!`,
//! `jsApply`, `.apply:`, and `wordToFunc:`. Everything here goes through
//! `Runtime::host`, the one seam the core uses to talk to whatever embeds
//! it — a real browser DOM, a TUI, or the crate's own `PlainObjectHost`.

use crate::cursor::Until;
use crate::dictionary::{CompiledItem, Dictionary, DictionaryEntry};
use crate::error::ForthError;
use crate::runtime::Runtime;
use crate::value::Value;
use std::rc::Rc;

fn read_name(rt: &mut Runtime) -> String {
    rt.consume(Until::Whitespace, false, true)
}

/// A read-only snapshot of the running context, shaped as a plain host
/// object so `.`/`.!` can address it the same way they address any other
/// host value. Taken at the moment `C` runs, not live-linked to `ctx`.
fn context_snapshot(rt: &Runtime) -> Value {
    let obj = rt.host.make_object();
    let _ = rt.host.set_property(&obj, "parameterStack", Value::array(rt.ctx.parameter_stack.clone()));
    let _ = rt.host.set_property(&obj, "controlStack", Value::array(rt.ctx.control_stack.clone()));
    let _ = rt.host.set_property(&obj, "returnStackDepth", Value::Number(rt.ctx.return_stack.len() as f64));
    let _ = rt.host.set_property(&obj, "halted", Value::Boolean(rt.ctx.halted));
    let _ = rt.host.set_property(&obj, "paused", Value::Boolean(rt.ctx.paused));
    let _ = rt.host.set_property(&obj, "me", rt.ctx.me.clone());
    obj
}

pub fn install(dictionary: &Rc<Dictionary>) {
    dictionary.define(
        Some("C".into()),
        Rc::new(|rt| {
            let snapshot = context_snapshot(rt);
            rt.ctx.push(snapshot);
            Ok(())
        }),
        false,
    );

    dictionary.define(
        Some(".".into()),
        Rc::new(|rt| {
            let name = read_name(rt);
            let helper = DictionaryEntry::anonymous(Rc::new(move |rt: &mut Runtime| {
                let target = rt.ctx.pop(".")?;
                let value = rt.host.get_property(&target, &name)?;
                rt.ctx.push(value);
                Ok(())
            }));
            rt.ctx.compile_target().compiled.borrow_mut().push(CompiledItem::Word(helper));
            Ok(())
        }),
        true,
    );

    dictionary.define(
        Some(".!".into()),
        Rc::new(|rt| {
            let name = read_name(rt);
            let helper = DictionaryEntry::anonymous(Rc::new(move |rt: &mut Runtime| {
                let target = rt.ctx.pop(".!")?;
                let value = rt.ctx.pop(".!")?;
                rt.host.set_property(&target, &name, value)
            }));
            rt.ctx.compile_target().compiled.borrow_mut().push(CompiledItem::Word(helper));
            Ok(())
        }),
        true,
    );

    dictionary.define(
        Some("jsApply".into()),
        Rc::new(|rt| {
            let args = rt.ctx.pop("jsApply")?;
            let func = rt.ctx.pop("jsApply")?;
            let args = match args {
                Value::Array(a) => a.borrow().clone(),
                other => vec![other],
            };
            let result = rt.host.apply(&func, &args)?;
            rt.ctx.push(result);
            Ok(())
        }),
        false,
    );

    dictionary.define(
        Some(".apply:".into()),
        Rc::new(|rt| {
            let name = read_name(rt);
            let helper = DictionaryEntry::anonymous(Rc::new(move |rt: &mut Runtime| {
                let args = rt.ctx.pop(".apply:")?;
                let target = rt.ctx.pop(".apply:")?;
                let args = match args {
                    Value::Array(a) => a.borrow().clone(),
                    other => vec![other],
                };
                let func = rt.host.get_property(&target, &name)?;
                let result = rt.host.apply(&func, &args)?;
                rt.ctx.push(result);
                Ok(())
            }));
            rt.ctx.compile_target().compiled.borrow_mut().push(CompiledItem::Word(helper));
            Ok(())
        }),
        true,
    );

    dictionary.define(
        Some("wordToFunc:".into()),
        Rc::new(|rt| {
            let name = read_name(rt);
            let entry = rt
                .dictionary
                .find(&name)
                .ok_or_else(|| ForthError::UnknownWord(name.clone()))?;
            let dictionary = rt.dictionary.clone();
            let host = rt.host.clone();
            let scheduler = rt.scheduler.clone();
            let callable = Rc::new(move |args: &[Value]| -> Result<Option<Value>, ForthError> {
                let mut inner = Runtime::new_ctx(dictionary.clone(), host.clone(), "");
                inner.set_scheduler(scheduler.clone());
                inner.ctx.execute_at_end = false;
                for a in args {
                    inner.ctx.push(a.clone());
                }
                crate::runtime::push_frame(&mut inner, entry.clone());
                inner.query()?;
                Ok(inner.ctx.parameter_stack.last().cloned())
            });
            rt.ctx.push(Value::Callable(callable));
            Ok(())
        }),
        true,
    );
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
    fn dot_reads_a_property_off_the_context_snapshot() {
        let mut rt = make("1 2 3 C . parameterStack");
        rt.query().unwrap();
        match rt.ctx.parameter_stack.last().unwrap() {
            Value::Array(a) => {
                let nums: Vec<f64> = a
                    .borrow()
                    .iter()
                    .map(|v| match v {
                        Value::Number(n) => *n,
                        _ => panic!("expected number"),
                    })
                    .collect();
                assert_eq!(nums, vec![1.0, 2.0, 3.0]);
            }
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn dot_bang_writes_a_property() {
        let mut rt = make("C dup 5 swap .! tagged . tagged");
        rt.query().unwrap();
        match rt.ctx.parameter_stack.last().unwrap() {
            Value::Number(n) => assert_eq!(*n, 5.0),
            _ => panic!("expected number"),
        }
    }

    #[test]
    fn word_to_func_runs_the_word_and_returns_its_top_of_stack() {
        let mut rt = make(": triple 3 * ; wordToFunc: triple");
        rt.query().unwrap();
        let func = rt.ctx.pop("test").unwrap();
        match func {
            Value::Callable(f) => {
                let result = f(&[Value::Number(7.0)]).unwrap();
                match result {
                    Some(Value::Number(n)) => assert_eq!(n, 21.0),
                    _ => panic!("expected number"),
                }
            }
            _ => panic!("expected callable"),
        }
    }
}
