//! Pipeline stages for a screenshot-and-bind run.
//!
//! Each submodule implements exactly one step. Keeping stages separate makes
//! each independently testable and lets the runner swap pieces (e.g. the
//! merge-order policy) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! source ──▶ job × N ──▶ merge
//! (CSV)      (shoot,     (concat
//!             convert)    in order)
//! ```
//!
//! 1. [`source`] — read one CSV column of URLs from a file, URL, or stdin
//! 2. [`job`]    — per URL: hash-named artifacts, skip-if-exists, two tool
//!    invocations; runs under the bounded fan-out in [`crate::run`]
//! 3. [`merge`]  — hand the per-URL PDFs to the concatenation tool once
//!
//! [`exec`] is the shared subprocess runner all tool invocations go through;
//! it is the only place that spawns, waits, and honours cancellation.

pub mod exec;
pub mod job;
pub mod merge;
pub mod source;
