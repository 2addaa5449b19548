//! Gate stack: day-level orchestration over the stage library (distilled
//! spec §4.5, §5). This crate depends on both `truth_kernel` and
//! `truth_stages`; it owns gate precedence evaluation, verdict/failure
//! artifacts, and the `truth_pipeline` CLI binary.
//!
//! # Crate dependency graph
//!
//! ```text
//! truth_kernel  ←  truth_stages  ←  truth_orchestrator
//! (codec, writer)   (stage math)     (gates, pipeline, CLI)
//! ```
//!
//! # Modules
//!
//! - [`config`] — `RuntimeConfig` and the variant-authority policy knob
//! - [`gate`] — gate registry and per-gate evaluator
//! - [`verdict`] — precedence walk over the registry; verdict artifact
//! - [`failure`] — governed failure artifacts
//! - [`pipeline`] — fixed stage order, topological-order check, gate run

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod failure;
pub mod gate;
pub mod pipeline;
pub mod verdict;
