//! Command-line argument processing, in the teacher's `clap::{arg, Command}`
//! style. `-f`/`--file PATH` is required and runs that file, propagating any
//! error with a non-zero exit, per the external-interface contract. The
//! interactive console is a separate, explicitly-requested mode (`--repl`),
//! not a fallback for an omitted `-f`.

use clap::{arg, Command};

pub const VERSION: &str = "0.1.0";

pub struct Config {
    pub file: Option<String>,
    pub repl: bool,
}

impl Config {
    pub fn from_args() -> Config {
        let arguments = Command::new("stackforth")
            .version(VERSION)
            .author("stackforth")
            .about("An embeddable, concatenative, always-be-compiling stack language")
            .arg(
                arg!(-f --file <PATH> "Source file to run")
                    .required_unless_present("repl"),
            )
            .arg(arg!(--repl "Start an interactive console instead of running a file").required(false))
            .get_matches();

        Config {
            file: arguments.get_one::<String>("file").cloned(),
            repl: arguments.get_flag("repl"),
        }
    }
}
