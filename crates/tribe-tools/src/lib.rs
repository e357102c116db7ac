//! Tooling primitives for tribe agents.
//!
//! This crate is intentionally lightweight and engine-agnostic. Inspectors and overlays should
//! live in dedicated adapter crates.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{emit_report, NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink};
