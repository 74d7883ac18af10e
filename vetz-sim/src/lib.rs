//! # vetz-sim: Reference Simulation Host for VETZ
//!
//! This crate provides the collaborators `vetz-core` expects from a game:
//! an object registry, per-type templates, and actors that own an
//! [`ExperienceTracker`](vetz_core::ExperienceTracker) and react to level
//! changes. It also provides the game-side plumbing around the tracker: kill
//! events and whole-world save, load, and crc.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               vetz-sim                   │
//! │  ┌────────────┐   ┌──────────────────┐   │
//! │  │ templates  │──▶│ components/Actor │   │
//! │  └────────────┘   └────────┬─────────┘   │
//! │  ┌────────────┐   ┌────────▼─────────┐   │
//! │  │  events    │──▶│ world/GameWorld  │◀──┼── save (xfer / crc)
//! │  └─────┬──────┘   └────────┬─────────┘   │
//! │        └──▶ systems ───────┘             │
//! │                    │                     │
//! │         ┌──────────▼──────────┐          │
//! │         │      vetz-core      │          │
//! │         └─────────────────────┘          │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `templates`: static per-type data, loadable from TOML
//! - `components`: the `Actor` that owns a tracker
//! - `world`: the object registry; implements `ExperienceWorld`
//! - `events`: game events that move experience around
//! - `systems`: event processing
//! - `save`: world save / load / crc

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod components;
pub mod events;
pub mod save;
pub mod systems;
pub mod templates;
pub mod world;

pub use components::Actor;
pub use events::GameEvent;
pub use templates::{TemplateRegistry, ThingTemplate};
pub use world::GameWorld;
