//! Truth kernel: the deterministic core of the evidence engine.
//!
//! # Module dependency direction
//!
//! `codec` ← `hash` ← `manifest`/`day` ← `writer` ← `schema` ← `artifact`
//!
//! One-way only, no cycles. `codec` is the single canonical-JSON
//! implementation; everything that hashes or writes JSON routes through it.
//! `paths` and `decimal` are leaves used by stage writers built on top of
//! this crate.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod artifact;
pub mod codec;
pub mod day;
pub mod decimal;
pub mod error;
pub mod hash;
pub mod hash_domain;
pub mod manifest;
pub mod paths;
pub mod schema;
pub mod writer;
