#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]

//! # A library-embedded traffic-governance engine
//!
//! This crate is an in-process interceptor that each application request
//! traverses to be admitted, shaped, or rejected according to rules attached
//! to a named "resource". It is not a network service: it is linked into an
//! application and invoked synchronously on the request thread before the
//! protected work runs.
//!
//! The engine adopts a Chain-of-Responsibility pattern: rules are checked via
//! slots composed in a fixed order inside `base::SlotChain`. Using it generally
//! takes a few steps:
//! 1. Initialize configuration.
//! 2. Define a resource to be protected and build an entry for it.
//! 3. Load the rules for each resource.
//! 4. Write the code at the entry and exit points.
//!
//! ## General Configuration and Initialization
//!
//! The `api` module provides:
//!
//! - `init_default()`: load configuration from environment variables, falling
//!   back to defaults for anything undefined.
//! - `init_with_config_file(config_path: &mut String)`: load configuration
//!   from a YAML file.
//! - `init_with_config(config_entity: ConfigEntity)`: initialize from a
//!   hand-crafted `ConfigEntity`.
//!
//! Example:
//!
//! ```rust
//! use sentinel_rs::{init_default, logging};
//! init_default().unwrap_or_else(|err| logging::error!("{:?}", err));
//! ```
//!
//! ## Resource Definition
//!
//! A snippet of code is regarded as a resource, protected by defining an
//! entry for it. Constructing an `EntryBuilder` and calling `build()` creates
//! an `Entry`; if the call is blocked, `build()` returns an error.
//!
//! ```rust
//! use sentinel_rs::base;
//! use sentinel_rs::api::EntryBuilder;
//! let entry_builder = EntryBuilder::new(res_name.clone())
//!     .with_traffic_type(base::TrafficType::Inbound);
//! if let Ok(entry) = entry_builder.build() {
//!     // The request is allowed to be processed.
//!     // after finish the logic, exit the entry.
//!     entry.exit()
//! } else {
//!     // The request is blocked.
//!     // you do not need to call `exit()` on entry now.
//! }
//! ```
//!
//! ## Loading Rules
//!
//! `load_rules()` overwrites all rules previously defined for a resource;
//! `append_rule()` adds one incrementally. For example:
//!
//! ```rust
//! flow::load_rules(vec![Arc::new(flow::Rule {
//!     resource: "example".into(),
//!     threshold: 10.0,
//!     calculate_strategy: flow::CalculateStrategy::Direct,
//!     control_strategy: flow::ControlStrategy::Reject,
//!     ..Default::default()
//! })]);
//! ```
//!
//! ## Scope
//!
//! This crate implements the slot-chain execution pipeline, the calling-tree
//! statistics runtime, and the flow-rule checker with its three
//! traffic-shaping controllers (immediate-reject, leaky-bucket uniform rate,
//! and token-bucket warm-up). Caller authorization, system adaptive
//! protection, and circuit breaking are named in the fixed slot-chain
//! composition order but are treated as external collaborators: their slots
//! hold their chain position without implementing a rule engine behind them.
//! Rule-source adapters (file/config-service pollers), a metrics/dashboard
//! endpoint, and distributed coordination between engine instances are
//! likewise out of scope.

/// Sentinel API
pub mod api;
/// Core implementations, including the statistic structures (the sliding
/// window and its underlying LeapArray), the calling-tree node graph, and
/// the flow-rule manager and its traffic-shaping controllers.
pub mod core;
/// Adapters for different logging crates.
pub mod logging;
// Utility functions.
pub mod utils;

// re-export precludes
pub use crate::core::*;
pub use api::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
