//! Chrome Trace ("flame style") profiling of kernel execution.
//!
//! Feature-gated with `--features profiling`.
//!
//! Usage:
//!   forkjoin_kernels::profiling::profiler::init("profile/trace.json");
//!   {
//!     let _g = forkjoin_kernels::profiling::profiler::span("bench::sum");
//!     // run kernels...
//!   }
//!   forkjoin_kernels::profiling::profiler::shutdown();

use std::borrow::Cow;
use std::path::Path;

#[cfg(feature = "profiling")]
mod enabled {
    use std::fs::File;
    use std::io::{BufWriter, Write};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::{Mutex, OnceLock};
    use std::time::Instant;

    use log::warn;

    use super::*;


    /// A Chrome trace complete event (`ph:"X"`) or thread-name metadata (`ph:"M"`).
    #[derive(Debug)]
    enum TraceEvent {
        Complete {
            name: String,
            ts_us: u64,
            dur_us: u64,
            tid: u64,
            args: Vec<(String, super::Arg)>,
        },
        ThreadName {
            tid: u64,
            name: String,
        },
    }

    struct ProfilerState {
        start: Instant,
        out_path: PathBuf,
        is_on: AtomicBool,
        events: Mutex<Vec<TraceEvent>>,
    }

    static STATE: OnceLock<ProfilerState> = OnceLock::new();
    static NEXT_TID: AtomicU64 = AtomicU64::new(1);

    thread_local! {
        static TID: u64 = NEXT_TID.fetch_add(1, Ordering::Relaxed);
    }

    const PID: u32 = 1;

    fn now_us(st: &ProfilerState) -> u64 {
        st.start.elapsed().as_micros() as u64
    }

    fn tid() -> u64 {
        TID.with(|t| *t)
    }

    fn active() -> Option<&'static ProfilerState> {
        STATE.get().filter(|st| st.is_on.load(Ordering::Acquire))
    }

    fn push_event(st: &ProfilerState, ev: TraceEvent) {
        // a poisoned lock only means another span panicked mid-push
        let mut guard = st.events.lock().unwrap_or_else(|e| e.into_inner());
        guard.push(ev);
    }

    /// Initialize the profiler and set the output path. Later calls are ignored.
    pub fn init<P: AsRef<Path>>(path: P) {
        let _ = STATE.set(ProfilerState {
            start: Instant::now(),
            out_path: path.as_ref().to_path_buf(),
            is_on: AtomicBool::new(true),
            events: Mutex::new(Vec::new()),
        });
    }

    /// Stop recording and write the Chrome Trace JSON.
    pub fn shutdown() {
        if let Some(st) = STATE.get() {
            st.is_on.store(false, Ordering::Release);
            if let Err(e) = write_trace_file(st) {
                warn!("profiler::shutdown failed to write trace: {e}");
            }
        }
    }

    /// Name the calling thread in the trace viewer.
    pub fn thread_name(name: impl Into<String>) {
        if let Some(st) = active() {
            push_event(st, TraceEvent::ThreadName { tid: tid(), name: name.into() });
        }
    }

    /// Open a span that is recorded when the returned guard drops.
    pub fn span(name: impl Into<super::SpanName>) -> SpanGuard {
        match active() {
            Some(st) => SpanGuard {
                name: name.into().0.into_owned(),
                ts0: now_us(st),
                tid: tid(),
                args: Vec::new(),
                active: true,
            },
            None => SpanGuard::disabled(),
        }
    }

    /// RAII guard recording one complete event.
    pub struct SpanGuard {
        name: String,
        ts0: u64,
        tid: u64,
        args: Vec<(String, super::Arg)>,
        active: bool,
    }

    impl SpanGuard {
        fn disabled() -> Self {
            Self { name: String::new(), ts0: 0, tid: 0, args: Vec::new(), active: false }
        }

        /// Attach an argument to this span (builder-style).
        #[inline]
        pub fn arg(mut self, key: impl Into<String>, value: super::Arg) -> Self {
            if self.active {
                self.args.push((key.into(), value));
            }
            self
        }
    }

    impl Drop for SpanGuard {
        fn drop(&mut self) {
            if !self.active {
                return;
            }
            let Some(st) = STATE.get() else { return };
            let dur_us = now_us(st).saturating_sub(self.ts0);
            push_event(st, TraceEvent::Complete {
                name: std::mem::take(&mut self.name),
                ts_us: self.ts0,
                dur_us,
                tid: self.tid,
                args: std::mem::take(&mut self.args),
            });
        }
    }

    fn write_trace_file(st: &ProfilerState) -> std::io::Result<()> {
        let events = {
            let mut guard = st.events.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *guard)
        };

        if let Some(parent) = st.out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut w = BufWriter::new(File::create(&st.out_path)?);

        write!(w, "{{\"traceEvents\":[")?;
        for (n, ev) in events.into_iter().enumerate() {
            if n > 0 {
                write!(w, ",")?;
            }
            match ev {
                TraceEvent::Complete { name, ts_us, dur_us, tid, args } => {
                    write!(w, "{{\"name\":")?;
                    write_json_string(&mut w, &name)?;
                    write!(
                        w,
                        ",\"cat\":\"kernel\",\"ph\":\"X\",\"ts\":{ts_us},\"dur\":{dur_us},\"pid\":{PID},\"tid\":{tid}"
                    )?;
                    if !args.is_empty() {
                        write!(w, ",\"args\":{{")?;
                        for (m, (k, v)) in args.iter().enumerate() {
                            if m > 0 {
                                write!(w, ",")?;
                            }
                            write_json_string(&mut w, k)?;
                            write!(w, ":")?;
                            write_arg(&mut w, v)?;
                        }
                        write!(w, "}}")?;
                    }
                    write!(w, "}}")?;
                }
                TraceEvent::ThreadName { tid, name } => {
                    write!(
                        w,
                        "{{\"name\":\"thread_name\",\"ph\":\"M\",\"pid\":{PID},\"tid\":{tid},\"args\":{{\"name\":"
                    )?;
                    write_json_string(&mut w, &name)?;
                    write!(w, "}}}}")?;
                }
            }
        }
        write!(w, "]}}")?;
        w.flush()
    }

    fn write_arg<W: Write>(w: &mut W, value: &super::Arg) -> std::io::Result<()> {
        match value {
            super::Arg::Str(s) => write_json_string(w, s),
            super::Arg::U64(v) => write!(w, "{v}"),
            super::Arg::F64(v) if v.is_finite() => write!(w, "{v}"),
            super::Arg::F64(v) => write_json_string(w, &v.to_string()),
            super::Arg::Bool(v) => write!(w, "{v}"),
        }
    }

    fn write_json_string<W: Write>(w: &mut W, s: &str) -> std::io::Result<()> {
        write!(w, "\"")?;
        for ch in s.chars() {
            match ch {
                '"' => write!(w, "\\\"")?,
                '\\' => write!(w, "\\\\")?,
                '\n' => write!(w, "\\n")?,
                '\t' => write!(w, "\\t")?,
                c if c.is_control() => write!(w, "\\u{:04x}", c as u32)?,
                c => write!(w, "{c}")?,
            }
        }
        write!(w, "\"")
    }
}

#[cfg(not(feature = "profiling"))]
mod disabled {
    use super::*;

    /// Initialize profiler (no-op when profiling is disabled).
    #[inline]
    pub fn init<P: AsRef<Path>>(_path: P) {}

    /// Shut down profiler (no-op).
    #[inline]
    pub fn shutdown() {}

    /// Set thread name (no-op).
    #[inline]
    pub fn thread_name(_name: impl Into<String>) {}

    /// Create profiling span (no-op).
    #[inline]
    pub fn span(_name: impl Into<super::SpanName>) -> SpanGuard {
        SpanGuard
    }

    /// No-op span guard.
    pub struct SpanGuard;

    impl SpanGuard {
        /// Attach an argument to this span (builder-style; no-op).
        #[inline]
        pub fn arg(self, _key: impl Into<String>, _value: super::Arg) -> Self {
            self
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API surface (stable regardless of feature flag)
// ─────────────────────────────────────────────────────────────────────────────

/// A span name; accepts `&'static str`, `String`, or `Cow<'static, str>`.
pub struct SpanName(pub Cow<'static, str>);

impl From<&'static str> for SpanName {
    fn from(s: &'static str) -> Self {
        SpanName(Cow::Borrowed(s))
    }
}
impl From<String> for SpanName {
    fn from(s: String) -> Self {
        SpanName(Cow::Owned(s))
    }
}
impl From<Cow<'static, str>> for SpanName {
    fn from(s: Cow<'static, str>) -> Self {
        SpanName(s)
    }
}

/// Argument value attached to a span.
///
/// Serialized into the `args` field of the trace event.
#[derive(Debug, Clone)]
pub enum Arg {
    /// UTF-8 string value.
    Str(String),

    /// Unsigned 64-bit integer value.
    U64(u64),

    /// 64-bit floating-point value.
    F64(f64),

    /// Boolean value.
    Bool(bool),
}

#[cfg(feature = "profiling")]
pub use enabled::SpanGuard;

#[cfg(not(feature = "profiling"))]
pub use disabled::SpanGuard;

#[cfg(feature = "profiling")]
pub use enabled::{init, shutdown, span, thread_name};

#[cfg(not(feature = "profiling"))]
pub use disabled::{init, shutdown, span, thread_name};
