//! `var: NAME`, `const: NAME`, and the polymorphic `!`/`@` that address
//! either a variable's private slot or a bare `CompiledCell` — the same
//! primitive the boot file's `endif` uses to patch a branch placeholder.

use crate::cursor::Until;
use crate::dictionary::{CompiledItem, Dictionary, DictionaryEntry};
use crate::error::ForthError;
use crate::runtime::Runtime;
use crate::value::Value;
use std::rc::Rc;

fn read_next_name(rt: &mut Runtime) -> String {
    rt.consume(Until::Whitespace, false, true)
}

pub fn install(dictionary: &Rc<Dictionary>) {
    dictionary.define(
        Some("var:".into()),
        Rc::new(|rt| {
            let name = read_next_name(rt);
            let entry = rt.dictionary.define_docol(Some(name), false);
            // Overwrite the default DOCOL primitive: a variable's own word
            // pushes a reference to itself, not a return frame.
            entry.compiled.borrow_mut().push(CompiledItem::Literal(Value::Undefined));
            let self_ref = entry.clone();
            entry.replace_primitive(Rc::new(move |rt: &mut Runtime| {
                rt.ctx.push(Value::DictEntry(self_ref.clone()));
                Ok(())
            }));
            Ok(())
        }),
        true,
    );

    dictionary.define(
        Some("const:".into()),
        Rc::new(|rt| {
            let name = read_next_name(rt);
            let entry = rt.dictionary.define(Some(name), Rc::new(|_| Ok(())), false);
            entry.compiled.borrow_mut().push(CompiledItem::Literal(Value::Undefined));
            let capture_target = entry.clone();
            let self_ref = entry.clone();
            entry.replace_primitive(Rc::new(move |rt: &mut Runtime| {
                let c = self_ref.compiled.borrow();
                let v = match c.get(0) {
                    Some(CompiledItem::Literal(v)) => v.clone(),
                    _ => Value::Undefined,
                };
                rt.ctx.push(v);
                Ok(())
            }));
            let helper = DictionaryEntry::anonymous(Rc::new(move |rt: &mut Runtime| {
                let v = rt.ctx.pop("const:")?;
                capture_target.compiled.borrow_mut()[0] = CompiledItem::Literal(v);
                Ok(())
            }));
            let enclosing = rt.ctx.compile_target();
            enclosing.compiled.borrow_mut().push(CompiledItem::Word(helper));
            Ok(())
        }),
        true,
    );

    dictionary.define(
        Some("!".into()),
        Rc::new(|rt| {
            let addr = rt.ctx.pop("!")?;
            let val = rt.ctx.pop("!")?;
            store(addr, val)
        }),
        false,
    );

    dictionary.define(
        Some("@".into()),
        Rc::new(|rt| {
            let addr = rt.ctx.pop("@")?;
            let v = fetch(addr)?;
            rt.ctx.push(v);
            Ok(())
        }),
        false,
    );
}

fn store(addr: Value, val: Value) -> Result<(), ForthError> {
    match addr {
        Value::DictEntry(e) => {
            let mut c = e.compiled.borrow_mut();
            if c.is_empty() {
                c.push(CompiledItem::Literal(val));
            } else {
                c[0] = CompiledItem::Literal(val);
            }
            Ok(())
        }
        Value::CompiledCell(e, i) => {
            let mut c = e.compiled.borrow_mut();
            if i >= c.len() {
                return Err(ForthError::BadStackFrame);
            }
            c[i] = CompiledItem::Literal(val);
            Ok(())
        }
        _ => Err(ForthError::BadStackFrame),
    }
}

fn fetch(addr: Value) -> Result<Value, ForthError> {
    match addr {
        Value::DictEntry(e) => {
            let c = e.compiled.borrow();
            Ok(match c.get(0) {
                Some(CompiledItem::Literal(v)) => v.clone(),
                Some(CompiledItem::Word(w)) => Value::DictEntry(w.clone()),
                None => Value::Undefined,
            })
        }
        Value::CompiledCell(e, i) => {
            let c = e.compiled.borrow();
            Ok(match c.get(i) {
                Some(CompiledItem::Literal(v)) => v.clone(),
                Some(CompiledItem::Word(w)) => Value::DictEntry(w.clone()),
                None => Value::Undefined,
            })
        }
        _ => Err(ForthError::BadStackFrame),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PlainObjectHost;

    fn make(source: &str) -> Runtime {
        let dict = Dictionary::new();
        crate::internals::install(&dict);
        dict.finish_core_phase();
        Runtime::new_ctx(dict, Rc::new(PlainObjectHost::new()), source)
    }

    #[test]
    fn var_store_and_fetch() {
        let mut rt = make("var: v 5 v ! v @");
        rt.query().unwrap();
        match rt.ctx.parameter_stack.last().unwrap() {
            Value::Number(n) => assert_eq!(*n, 5.0),
            _ => panic!("expected number"),
        }
    }
}
