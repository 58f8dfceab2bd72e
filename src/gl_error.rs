//! poll the GL error flags around a call
//!
//! The poller is picked once, at build configuration time, by [`default_poller`]:
//! debug builds report errors, release builds skip the `glGetError` round-trips.

use crate::driver::ErrorQueue;

/// a lost context may keep reporting errors, so draining stops after this many reads
const MAX_DRAIN: usize = 64;

pub trait ErrorPoller {
    /// Drop every pending error without reporting it.
    fn clear(&self, queue: &dyn ErrorQueue);

    /// Drain pending errors, reporting each one. Returns the drained codes.
    fn check_and_report(&self, queue: &dyn ErrorQueue) -> Vec<u32>;
}

pub fn error_name(error_code: u32) -> &'static str {
    match error_code {
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        glow::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        glow::CONTEXT_LOST => "GL_CONTEXT_LOST",
        _ => "<unknown>",
    }
}

fn drain(queue: &dyn ErrorQueue) -> Vec<u32> {
    std::iter::repeat_with(|| queue.pop_error())
        .take(MAX_DRAIN)
        .take_while(|&code| code != glow::NO_ERROR)
        .collect()
}

/// Reports every pending error through `log::error`.
#[derive(Copy, Clone, Debug, Default)]
pub struct ReportingPoller;

impl ErrorPoller for ReportingPoller {
    fn clear(&self, queue: &dyn ErrorQueue) {
        drain(queue);
    }

    fn check_and_report(&self, queue: &dyn ErrorQueue) -> Vec<u32> {
        let codes = drain(queue);
        for &code in &codes {
            log::error!("[OpenGL Error] (0x{code:x}) {}", error_name(code));
        }
        codes
    }
}

/// Never touches the GL.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopPoller;

impl ErrorPoller for NoopPoller {
    fn clear(&self, _queue: &dyn ErrorQueue) {}

    fn check_and_report(&self, _queue: &dyn ErrorQueue) -> Vec<u32> {
        vec![]
    }
}

pub fn default_poller() -> Box<dyn ErrorPoller + Send + Sync> {
    if cfg!(debug_assertions) {
        Box::new(ReportingPoller)
    } else {
        Box::new(NoopPoller)
    }
}

/// Run `f` between a `clear` and a `check_and_report`.
pub fn gl_call<R>(poller: &dyn ErrorPoller, queue: &dyn ErrorQueue, f: impl FnOnce() -> R) -> R {
    poller.clear(queue);
    let value = f();
    poller.check_and_report(queue);
    value
}
