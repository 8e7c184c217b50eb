mod config;
mod console;
mod files;

use config::Config;
use std::process::ExitCode;
use std::rc::Rc;
use stackforth::host::PlainObjectHost;
use stackforth::Runtime;

fn main() -> ExitCode {
    env_logger::init();
    let config = Config::from_args();

    if config.repl {
        console::run();
        return ExitCode::SUCCESS;
    }

    // clap enforces `-f`/`--file` as required unless `--repl` is present, so
    // `config.file` is always `Some` by the time we get here.
    let path = config.file.expect("clap requires --file when --repl is absent");
    match files::read_source(&path) {
        Ok(source) => {
            let dictionary = Runtime::bootstrap(Rc::new(PlainObjectHost::new()));
            let mut rt = Runtime::new_ctx(dictionary, Rc::new(PlainObjectHost::new()), source);
            match rt.query() {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
