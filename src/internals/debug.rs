//! Inspection words carried over from the teacher's debug support
//! (`f_show_stack`/`f_stack_depth`/`f_dbg`), rebuilt on the `log` facade
//! instead of the original `Msg`/`DebugLevel` pair: `.s` dumps the
//! parameter stack, `words` lists the dictionary, `see` dumps a word's
//! compiled body.

use crate::cursor::Until;
use crate::dictionary::{CompiledItem, Dictionary};
use crate::value::Value;
use log::info;
use std::rc::Rc;

pub fn install(dictionary: &Rc<Dictionary>) {
    dictionary.define(
        Some(".s".into()),
        Rc::new(|rt| {
            info!("<{}> {:?}", rt.ctx.parameter_stack.len(), rt.ctx.parameter_stack);
            Ok(())
        }),
        false,
    );

    dictionary.define(
        Some("words".into()),
        Rc::new(|rt| {
            let mut names = Vec::new();
            let mut cur = rt.dictionary.latest();
            while let Some(entry) = cur {
                if let Some(name) = &entry.name {
                    names.push(name.clone());
                }
                cur = entry.previous.clone();
            }
            info!("{}", names.join(" "));
            Ok(())
        }),
        false,
    );

    dictionary.define(
        Some("see".into()),
        Rc::new(|rt| {
            let name = rt.consume(Until::Whitespace, false, true);
            match rt.dictionary.find(&name) {
                Some(entry) => {
                    let cells: Vec<String> = entry
                        .compiled
                        .borrow()
                        .iter()
                        .map(|c| match c {
                            CompiledItem::Word(w) => w.name.clone().unwrap_or_else(|| "<anon>".into()),
                            CompiledItem::Literal(v) => format!("{:?}", v),
                        })
                        .collect();
                    info!(": {} {} ;", name, cells.join(" "));
                    rt.ctx.push(Value::Boolean(true));
                }
                None => {
                    info!("{} ?", name);
                    rt.ctx.push(Value::Boolean(false));
                }
            }
            Ok(())
        }),
        true,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PlainObjectHost;
    use crate::runtime::Runtime;

    fn make(source: &str) -> Runtime {
        let dict = Dictionary::new();
        crate::internals::install(&dict);
        dict.finish_core_phase();
        Runtime::new_ctx(dict, Rc::new(PlainObjectHost::new()), source)
    }

    #[test]
    fn see_reports_whether_a_word_is_defined() {
        let mut rt = make(": double 2 * ; see double see nope");
        rt.query().unwrap();
        let flags: Vec<bool> = rt
            .ctx
            .parameter_stack
            .iter()
            .map(|v| matches!(v, Value::Boolean(true)))
            .collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn dot_s_does_not_disturb_the_stack() {
        let mut rt = make("1 2 3 .s");
        rt.query().unwrap();
        assert_eq!(rt.ctx.parameter_stack.len(), 3);
    }
}
