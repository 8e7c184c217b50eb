//! An interactive REPL embedding: read one line at a time from stdin, run
//! it through a persistent `Runtime`, and on error print the message with
//! the input cursor marked per the §7 host-boundary policy instead of
//! propagating — unlike the file runner in `main.rs`, which lets errors
//! abort the process.

use log::error;
use std::io::{self, Write};
use std::rc::Rc;
use stackforth::cursor::InputCursor;
use stackforth::host::PlainObjectHost;
use stackforth::Runtime;

pub fn run() {
    let dictionary = Runtime::bootstrap(Rc::new(PlainObjectHost::new()));
    let mut rt = Runtime::new_ctx(dictionary, Rc::new(PlainObjectHost::new()), "");

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }
        let mut line = String::new();
        if io::stdin().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }

        rt.ctx.input = InputCursor::new(line);
        rt.ctx.halted = false;
        rt.ctx.did_execute_and_end = false;
        rt.ctx.execute_at_end = true;

        if let Err(e) = rt.query() {
            let marked = rt.ctx.input.marked_at(rt.ctx.input.position());
            error!("{}: {}", e, marked);
            rt.ctx.compilation_stack.truncate(1);
            rt.ctx.return_stack.clear();
            rt.ctx.halted = false;
            continue;
        }

        if !rt.ctx.parameter_stack.is_empty() {
            println!("ok {:?}", rt.ctx.parameter_stack);
        } else {
            println!("ok");
        }
    }
}
