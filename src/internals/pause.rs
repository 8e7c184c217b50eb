//! The cooperative pause/resume mechanism: `sleep` sets `paused` and hands
//! the wait off to whatever [`Scheduler`] the embedding installed. A batch
//! embedding (the CLI) can simply block; an event-loop embedding can leave
//! `paused` set and re-enter `Runtime::query` from a real timer later.

use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::runtime::Runtime;
use std::rc::Rc;
use std::time::Duration;

/// Backs the `sleep` primitive. `ctx.paused` is already `true` when this is
/// called; the implementation decides how (and when) to clear it.
pub trait Scheduler {
    fn sleep(&self, ctx: &mut Context, millis: f64);
}

/// The simplest faithful embedding for a batch runner with no event loop of
/// its own: block the current thread for the requested duration, then
/// immediately clear `paused`. `Runtime::query`'s caller never actually
/// observes a suspended session — the pause and the resume happen inside
/// one call — which is a deliberate embedding choice, not a requirement of
/// the engine (see `sleep`'s own doc comment for the cooperative contract).
pub struct BlockingScheduler;

impl Scheduler for BlockingScheduler {
    fn sleep(&self, ctx: &mut Context, millis: f64) {
        if millis > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(millis / 1000.0));
        }
        ctx.paused = false;
    }
}

pub fn install(dictionary: &Rc<Dictionary>) {
    dictionary.define(
        Some("sleep".into()),
        Rc::new(|rt: &mut Runtime| {
            let ms = rt.ctx.pop_number("sleep")?;
            rt.ctx.paused = true;
            let scheduler = rt.scheduler.clone();
            scheduler.sleep(&mut rt.ctx, ms);
            Ok(())
        }),
        false,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PlainObjectHost;
    use std::time::Instant;

    #[test]
    fn sleep_blocks_for_roughly_the_requested_duration() {
        let dict = Dictionary::new();
        crate::internals::install(&dict);
        dict.finish_core_phase();
        let mut rt = Runtime::new_ctx(dict, Rc::new(PlainObjectHost::new()), "20 sleep");
        let start = Instant::now();
        rt.query().unwrap();
        assert!(start.elapsed().as_millis() >= 15);
        assert!(!rt.ctx.paused);
    }
}
