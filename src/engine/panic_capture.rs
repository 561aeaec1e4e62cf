//! Panic capture for feature runs.
//!
//! A process-wide hook is installed once and chains to whatever hook was there before. While a thread is inside
//! [`capture`], the hook records the panic (message, location, forced backtrace) into a thread-local slot instead of
//! printing it. Panics on any other thread, or outside a capture, reach the previous hook untouched.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static CAPTURED: RefCell<Option<CapturedPanic>> = const { RefCell::new(None) };
}

static INSTALL_HOOK: Once = Once::new();

/// Everything known about a captured panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPanic {
    pub message: String,
    pub location: Option<String>,
    pub backtrace: String,
}

impl CapturedPanic {
    /// Diagnostic text in the same layout as a fault report.
    pub fn report(&self) -> String {
        let mut out = format!("panicked: {}", self.message);
        if let Some(location) = &self.location {
            out.push_str("\n  at ");
            out.push_str(location);
        }
        if !self.backtrace.is_empty() {
            out.push_str("\nstack backtrace:\n");
            out.push_str(&self.backtrace);
        }
        out
    }
}

/// Install the capturing hook. Idempotent.
pub fn install() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !CAPTURING.with(Cell::get) {
                previous(info);
                return;
            }
            let captured = CapturedPanic {
                message: payload_message(info.payload()),
                location: info.location().map(ToString::to_string),
                backtrace: Backtrace::force_capture().to_string(),
            };
            CAPTURED.with(|slot| *slot.borrow_mut() = Some(captured));
        }));
        tracing::debug!("panic capture hook installed");
    });
}

/// Run `f` on the current thread, turning a panic into `Err`.
pub fn capture<T>(f: impl FnOnce() -> T) -> Result<T, CapturedPanic> {
    install();
    let was_capturing = CAPTURING.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CAPTURING.with(|flag| flag.set(was_capturing));

    result.map_err(|payload| {
        CAPTURED
            .with(|slot| slot.borrow_mut().take())
            .unwrap_or_else(|| CapturedPanic {
                message: payload_message(&*payload),
                location: None,
                backtrace: String::new(),
            })
    })
}

/// Best-effort text of a panic payload.
pub fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
