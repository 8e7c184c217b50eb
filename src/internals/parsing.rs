//! Parsing words: `'` (quoted string), `(` (comment), `re/`/`match/`
//! (regex literals), and `word` (read one token). All five are immediate —
//! each must run at compile time so it can read straight from the cursor,
//! positioned immediately after its own trailing whitespace.

use crate::cursor::Until;
use crate::dictionary::{CompiledItem, Dictionary};
use crate::error::ForthError;
use crate::runtime::Runtime;
use crate::value::Value;
use std::rc::Rc;

fn append_literal(rt: &mut Runtime, v: Value) {
    rt.ctx.compile_target().compiled.borrow_mut().push(CompiledItem::Literal(v));
}

pub fn install(dictionary: &Rc<Dictionary>) {
    dictionary.define(
        Some("'".into()),
        Rc::new(|rt| {
            rt.ctx.input.skip_one(' ');
            let s = rt.consume(Until::Char('\''), true, false);
            append_literal(rt, Value::str(s));
            Ok(())
        }),
        true,
    );

    dictionary.define(
        Some("(".into()),
        Rc::new(|rt| {
            rt.consume(Until::Char(')'), true, false);
            Ok(())
        }),
        true,
    );

    dictionary.define(
        Some("re/".into()),
        Rc::new(|rt| {
            rt.ctx.input.skip_one(' ');
            let pattern = rt.consume(Until::Char('/'), true, false);
            let re = compile_regex(&pattern)?;
            append_literal(rt, Value::Regex(Rc::new(re)));
            Ok(())
        }),
        true,
    );

    dictionary.define(
        Some("match/".into()),
        Rc::new(|rt| {
            rt.ctx.input.skip_one(' ');
            let pattern = rt.consume(Until::Char('/'), true, false);
            let re = compile_regex(&pattern)?;
            append_literal(rt, Value::Regex(Rc::new(re)));
            let swap = rt.dictionary.find("swap").expect("core word swap");
            let matcher = rt.dictionary.find("match").expect("core word match");
            let target = rt.ctx.compile_target();
            target.compiled.borrow_mut().push(CompiledItem::Word(swap));
            target.compiled.borrow_mut().push(CompiledItem::Word(matcher));
            Ok(())
        }),
        true,
    );

    dictionary.define(
        Some("word".into()),
        Rc::new(|rt| {
            let w = rt.ctx.input.next_word();
            rt.ctx.push(Value::str(w));
            Ok(())
        }),
        true,
    );

    dictionary.define(
        Some("match".into()),
        Rc::new(|rt| {
            let subject = rt.ctx.pop("match")?;
            let re = rt.ctx.pop("match")?;
            let (re, subject) = match (re, subject) {
                (Value::Regex(re), Value::Str(s)) => (re, s),
                _ => return Err(ForthError::Host("match expects a regex and a string".into())),
            };
            let found: Vec<Value> = match re.find(&subject) {
                Some(m) => vec![Value::str(m.as_str())],
                None => Vec::new(),
            };
            rt.ctx.push(Value::array(found));
            Ok(())
        }),
        false,
    );
}

fn compile_regex(pattern: &str) -> Result<regex::Regex, ForthError> {
    regex::Regex::new(pattern).map_err(|e| ForthError::Host(format!("bad regex /{}/: {}", pattern, e)))
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
    fn quoted_string_pushes_literal() {
        let mut rt = make("' hello world' ");
        rt.query().unwrap();
        match rt.ctx.parameter_stack.last().unwrap() {
            Value::Str(s) => assert_eq!(&**s, "hello world"),
            _ => panic!("expected string"),
        }
    }

    #[test]
    fn comment_is_skipped() {
        let mut rt = make("1 ( this is ignored ) 2 +");
        rt.query().unwrap();
        match rt.ctx.parameter_stack.last().unwrap() {
            Value::Number(n) => assert_eq!(*n, 3.0),
            _ => panic!("expected number"),
        }
    }

    #[test]
    fn regex_match_first() {
        let mut rt = make(r"re/ e\\d+/ ' te123st' match first ' e123' ===");
        rt.query().unwrap();
        match rt.ctx.parameter_stack.last().unwrap() {
            Value::Boolean(b) => assert!(b),
            _ => panic!("expected boolean"),
        }
    }
}
