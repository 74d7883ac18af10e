//! # VETZ Core Library
//!
//! Game-agnostic experience and veterancy bookkeeping for deterministic,
//! networked simulations.
//!
//! Every trainable actor owns one [`ExperienceTracker`]. The tracker:
//!
//! - **Accumulates** experience points and derives a veterancy level from a
//!   [`LevelCurve`]
//! - **Prices kills**: a dead actor is worth its template value or half of
//!   its own accumulated points, whichever is larger
//! - **Redirects** earned experience to a *sink* actor, scaled by a per-actor
//!   multiplier
//! - **Notifies** its owner exactly once per call that changes the level
//! - **Serializes** itself through the [`Xfer`] contract, which drives save,
//!   load, and the crc that lockstep peers compare every frame
//!
//! The owning actor, its template, and the object registry are supplied by
//! the host game through the traits in [`owner`].
//!
//! ## Determinism Contract
//!
//! Given identical state, [`Snapshot::crc`] produces bit-identical output on
//! every replica. All level thresholds are computed with plain IEEE-754
//! multiplication and integer comparison, never with platform `pow`.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod curve;
pub mod error;
pub mod owner;
pub mod tracker;
pub mod types;
pub mod xfer;

pub use config::VetzConfig;
pub use curve::LevelCurve;
pub use error::{Result, VetzError};
pub use owner::{ExperienceOwner, ExperienceTemplate, ExperienceWorld, ExperienceWorldExt};
pub use tracker::ExperienceTracker;
pub use types::*;
pub use xfer::{Snapshot, Xfer, XferCrc, XferLoad, XferMode, XferSave, XferVersion};
