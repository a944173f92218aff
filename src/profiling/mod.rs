/// Chrome Trace (flame-style) execution profiler.
///
/// This module provides a **feature-gated, zero-overhead (when disabled)**
/// profiling API for the kernels. When enabled, it records one span per
/// kernel call and emits a **Chrome Trace Event JSON** file that can be
/// inspected using:
///
/// - `chrome://tracing`
/// - <https://ui.perfetto.dev>
///
/// ## Feature flag
///
/// This module records only when the `profiling` feature is enabled:
///
/// ```bash
/// cargo bench --features profiling
/// ```
///
/// When the feature is disabled, all profiling calls compile to no-ops.
///
/// ## Usage
///
/// ```no_run
/// use forkjoin_kernels::profiling::profiler;
///
/// profiler::init("profile/trace.json");
///
/// {
///     let _g = profiler::span("bench::sum");
///     // run kernels
/// }
///
/// profiler::shutdown();
/// ```
///
/// ## Design notes
///
/// - Spans are recorded using RAII guards (`SpanGuard`)
/// - Events are timestamped using a monotonic clock
/// - Each worker thread registers a stable name when the pool starts it
pub mod profiler;
