//! Umbrella crate that re-exports the `tribe-*` building blocks.
//!
//! Besides the re-exports it owns the pieces a host application wires up once: YAML
//! configuration ([`config`]) and the tracing subscriber ([`telemetry`]).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod telemetry;

pub use config::TribeConfig;

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use tribe_core as core;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use tribe_bt as bt;

#[cfg(feature = "tasks")]
#[cfg_attr(docsrs, doc(cfg(feature = "tasks")))]
pub use tribe_tasks as tasks;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use tribe_tools as tools;
