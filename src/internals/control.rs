//! `branch`/`0branch`/`falsyBranch`/`here`/`-stackFrame` — the five
//! primitives the boot file's `if/else/begin/until` bootstrap is built
//! from — plus `quit` and `throwNewError`, the two ways execution can
//! unwind back to the top level.

use crate::dictionary::Dictionary;
use crate::error::ForthError;
use crate::runtime::Runtime;
use crate::value::Value;
use std::rc::Rc;

/// Reads the operand cell at the current frame's position (the literal
/// offset a compiler placed right after this primitive's own cell) without
/// yet advancing past it.
fn read_offset(rt: &mut Runtime) -> Result<(usize, f64), ForthError> {
    let frame = rt.ctx.current_frame_mut()?;
    let (dict, i) = (frame.dict.clone(), frame.i);
    let cell = dict.compiled.borrow().get(i).cloned();
    match cell {
        Some(crate::dictionary::CompiledItem::Literal(Value::Number(n))) if n.is_finite() => Ok((i, n)),
        _ => Err(ForthError::BadBranch),
    }
}

fn jump(rt: &mut Runtime, i: usize, offset: f64) -> Result<(), ForthError> {
    let frame = rt.ctx.current_frame_mut()?;
    frame.i = (i as i64 + offset as i64) as usize;
    Ok(())
}

fn step_over(rt: &mut Runtime, i: usize) -> Result<(), ForthError> {
    let frame = rt.ctx.current_frame_mut()?;
    frame.i = i + 1;
    Ok(())
}

pub fn install(dictionary: &Rc<Dictionary>) {
    dictionary.define(
        Some("branch".into()),
        Rc::new(|rt| {
            let (i, offset) = read_offset(rt)?;
            jump(rt, i, offset)
        }),
        false,
    );

    dictionary.define(
        Some("0branch".into()),
        Rc::new(|rt| {
            let cond = rt.ctx.pop("0branch")?;
            let n = match cond {
                Value::Number(n) if n.is_finite() => n,
                other => {
                    rt.ctx.push(other);
                    return Err(ForthError::BadStackForZeroBranch);
                }
            };
            let (i, offset) = read_offset(rt)?;
            if n == 0.0 {
                jump(rt, i, offset)
            } else {
                step_over(rt, i)
            }
        }),
        false,
    );

    dictionary.define(
        Some("falsyBranch".into()),
        Rc::new(|rt| {
            let cond = rt.ctx.pop("falsyBranch")?;
            let (i, offset) = read_offset(rt)?;
            if !cond.is_truthy() {
                jump(rt, i, offset)
            } else {
                step_over(rt, i)
            }
        }),
        false,
    );

    dictionary.define(
        Some("here".into()),
        Rc::new(|rt| {
            let target = rt.ctx.compile_target();
            let idx = target.compiled.borrow().len();
            rt.ctx.push(Value::CompiledCell(target, idx));
            Ok(())
        }),
        false,
    );

    dictionary.define(
        Some("-stackFrame".into()),
        Rc::new(|rt| {
            let b = rt.ctx.pop("-stackFrame")?;
            let a = rt.ctx.pop("-stackFrame")?;
            match (a, b) {
                (Value::CompiledCell(da, ia), Value::CompiledCell(db, ib)) if Rc::ptr_eq(&da, &db) => {
                    rt.ctx.push(Value::Number(ia as f64 - ib as f64));
                    Ok(())
                }
                _ => Err(ForthError::BadStackFrame),
            }
        }),
        false,
    );

    // Unlike classical Forth's QUIT, this truncates the return stack to
    // length 1 rather than clearing it — the enclosing frame's own
    // fetch-then-advance loop keeps stepping from wherever it left off,
    // and `Runtime::query` only falls back to `interpret` once that last
    // frame drains naturally.
    dictionary.define(
        Some("quit".into()),
        Rc::new(|rt| {
            rt.ctx.return_stack.truncate(1);
            Ok(())
        }),
        false,
    );

    dictionary.define(
        Some("throwNewError".into()),
        Rc::new(|rt| {
            let message = rt.ctx.pop("throwNewError")?;
            let text = match message {
                Value::Str(s) => s.to_string(),
                other => format!("{:?}", other),
            };
            Err(ForthError::UserThrow(text))
        }),
        false,
    );
}
