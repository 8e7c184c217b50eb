//! Arithmetic, comparisons, and parameter-stack shuffling. None of these
//! are immediate — the compiler just appends them to whatever is currently
//! being built.

use crate::dictionary::Dictionary;
use crate::error::ForthError;
use crate::runtime::Runtime;
use crate::value::Value;
use std::rc::Rc;

const NAME: &str = "arith";

fn num(rt: &mut Runtime) -> Result<f64, ForthError> {
    rt.ctx.pop_number(NAME)
}

fn binop(rt: &mut Runtime, f: impl Fn(f64, f64) -> f64) -> Result<(), ForthError> {
    let b = num(rt)?;
    let a = num(rt)?;
    rt.ctx.push(Value::Number(f(a, b)));
    Ok(())
}

fn cmpop(rt: &mut Runtime, f: impl Fn(f64, f64) -> bool) -> Result<(), ForthError> {
    let b = num(rt)?;
    let a = num(rt)?;
    rt.ctx.push(Value::Boolean(f(a, b)));
    Ok(())
}

pub fn install(dictionary: &Rc<Dictionary>) {
    dictionary.define(Some("+".into()), Rc::new(|rt| binop(rt, |a, b| a + b)), false);
    dictionary.define(Some("-".into()), Rc::new(|rt| binop(rt, |a, b| a - b)), false);
    dictionary.define(Some("*".into()), Rc::new(|rt| binop(rt, |a, b| a * b)), false);
    dictionary.define(Some("/".into()), Rc::new(|rt| binop(rt, |a, b| a / b)), false);
    dictionary.define(Some("mod".into()), Rc::new(|rt| binop(rt, |a, b| a % b)), false);
    dictionary.define(Some("<".into()), Rc::new(|rt| cmpop(rt, |a, b| a < b)), false);
    dictionary.define(Some(">".into()), Rc::new(|rt| cmpop(rt, |a, b| a > b)), false);

    dictionary.define(
        Some("0=".into()),
        Rc::new(|rt| {
            let a = num(rt)?;
            rt.ctx.push(Value::Boolean(a == 0.0));
            Ok(())
        }),
        false,
    );
    dictionary.define(
        Some("0<".into()),
        Rc::new(|rt| {
            let a = num(rt)?;
            rt.ctx.push(Value::Boolean(a < 0.0));
            Ok(())
        }),
        false,
    );

    dictionary.define(
        Some("==".into()),
        Rc::new(|rt| {
            let b = rt.ctx.pop(NAME)?;
            let a = rt.ctx.pop(NAME)?;
            rt.ctx.push(Value::Boolean(a.loose_eq(&b)));
            Ok(())
        }),
        false,
    );
    dictionary.define(
        Some("===".into()),
        Rc::new(|rt| {
            let b = rt.ctx.pop(NAME)?;
            let a = rt.ctx.pop(NAME)?;
            rt.ctx.push(Value::Boolean(a.strict_eq(&b)));
            Ok(())
        }),
        false,
    );
    dictionary.define(
        Some("and".into()),
        Rc::new(|rt| {
            let b = rt.ctx.pop(NAME)?;
            let a = rt.ctx.pop(NAME)?;
            rt.ctx.push(Value::Boolean(a.is_truthy() && b.is_truthy()));
            Ok(())
        }),
        false,
    );
    dictionary.define(
        Some("or".into()),
        Rc::new(|rt| {
            let b = rt.ctx.pop(NAME)?;
            let a = rt.ctx.pop(NAME)?;
            rt.ctx.push(Value::Boolean(a.is_truthy() || b.is_truthy()));
            Ok(())
        }),
        false,
    );

    dictionary.define(
        Some("dup".into()),
        Rc::new(|rt| {
            let v = rt.ctx.peek("dup")?.clone();
            rt.ctx.push(v);
            Ok(())
        }),
        false,
    );
    dictionary.define(
        Some("drop".into()),
        Rc::new(|rt| {
            rt.ctx.pop("drop")?;
            Ok(())
        }),
        false,
    );
    dictionary.define(
        Some("swap".into()),
        Rc::new(|rt| {
            let b = rt.ctx.pop("swap")?;
            let a = rt.ctx.pop("swap")?;
            rt.ctx.push(b);
            rt.ctx.push(a);
            Ok(())
        }),
        false,
    );
    dictionary.define(
        Some("over".into()),
        Rc::new(|rt| {
            let len = rt.ctx.parameter_stack.len();
            if len < 2 {
                return Err(ForthError::StackUnderflow("over"));
            }
            let v = rt.ctx.parameter_stack[len - 2].clone();
            rt.ctx.push(v);
            Ok(())
        }),
        false,
    );
    dictionary.define(
        Some("rot".into()),
        Rc::new(|rt| {
            let c = rt.ctx.pop("rot")?;
            let b = rt.ctx.pop("rot")?;
            let a = rt.ctx.pop("rot")?;
            rt.ctx.push(b);
            rt.ctx.push(c);
            rt.ctx.push(a);
            Ok(())
        }),
        false,
    );
    dictionary.define(
        Some("-rot".into()),
        Rc::new(|rt| {
            let c = rt.ctx.pop("-rot")?;
            let b = rt.ctx.pop("-rot")?;
            let a = rt.ctx.pop("-rot")?;
            rt.ctx.push(c);
            rt.ctx.push(a);
            rt.ctx.push(b);
            Ok(())
        }),
        false,
    );
    dictionary.define(
        Some("pick".into()),
        Rc::new(|rt| {
            let n = rt.ctx.pop_number("pick")? as usize;
            let len = rt.ctx.parameter_stack.len();
            if n >= len {
                return Err(ForthError::StackUnderflow("pick"));
            }
            let v = rt.ctx.parameter_stack[len - 1 - n].clone();
            rt.ctx.push(v);
            Ok(())
        }),
        false,
    );
    dictionary.define(
        Some("roll".into()),
        Rc::new(|rt| {
            let n = rt.ctx.pop_number("roll")? as usize;
            let len = rt.ctx.parameter_stack.len();
            if n >= len {
                return Err(ForthError::StackUnderflow("roll"));
            }
            let v = rt.ctx.parameter_stack.remove(len - 1 - n);
            rt.ctx.push(v);
            Ok(())
        }),
        false,
    );
    dictionary.define(
        Some("depth".into()),
        Rc::new(|rt| {
            let d = rt.ctx.parameter_stack.len();
            rt.ctx.push(Value::Number(d as f64));
            Ok(())
        }),
        false,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::host::PlainObjectHost;

    fn rt_for(source: &str) -> Runtime {
        let dict = Dictionary::new();
        install(&dict);
        Runtime::new_ctx(dict, Rc::new(PlainObjectHost::new()), source)
    }

    #[test]
    fn addition() {
        let mut rt = rt_for("");
        rt.ctx.push(Value::Number(3.0));
        rt.ctx.push(Value::Number(5.0));
        binop(&mut rt, |a, b| a + b).unwrap();
        match rt.ctx.pop("test").unwrap() {
            Value::Number(n) => assert_eq!(n, 8.0),
            _ => panic!(),
        }
    }

    #[test]
    fn rot_rotates_three() {
        let mut rt = rt_for("");
        let rot = dictionary_word(&rt, "rot");
        rt.ctx.push(Value::Number(1.0));
        rt.ctx.push(Value::Number(2.0));
        rt.ctx.push(Value::Number(3.0));
        (rot)(&mut rt).unwrap();
        let top: Vec<f64> = rt
            .ctx
            .parameter_stack
            .iter()
            .map(|v| match v {
                Value::Number(n) => *n,
                _ => panic!(),
            })
            .collect();
        assert_eq!(top, vec![2.0, 3.0, 1.0]);
    }

    fn dictionary_word(rt: &Runtime, name: &str) -> crate::dictionary::Primitive {
        rt.dictionary.find(name).unwrap().primitive.borrow().clone()
    }
}
