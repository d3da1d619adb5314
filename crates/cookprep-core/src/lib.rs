//! Cookprep Core -- automatic ingredient preparation for cooking stations.
//!
//! A player looks at a recipe board; the engine finds the nearest station
//! that can cook the recipe, works out which of its slots already hold the
//! right ingredients, and fills the rest from the player's inventory when the
//! player confirms.
//!
//! # Flow
//!
//! 1. **Bind** -- [`binder::StationBinder`] tracks the closest placed station
//!    of the right kind within reach of the board.
//! 2. **Plan** -- [`plan::PreparationPlan::calculate`] matches the recipe's
//!    cost entries against slot contents and inventory counts.
//! 3. **Present** -- [`calculator::PreparationCalculator::observe`] maps the
//!    plan and station state to an [`status::InteractionState`] and a status
//!    line, highlighting uncovered cost entries via [`flags`].
//! 4. **Apply** -- on confirm the plan is applied through the
//!    [`world::World`] command surface, or cooking is started.
//!
//! Plans are cached until something that could change them happens: a
//! binding change, a slot change on the bound station, an inventory refresh,
//! or the plan being applied.
//!
//! # Key Types
//!
//! - [`coordinator::Coordinator`] -- owns every live calculator and routes
//!   [`event::HostEvent`]s to them.
//! - [`world::World`] -- everything the core asks of or tells the host.
//! - [`registry::Registry`] -- immutable item and recipe definitions.
//! - [`config::PrepConfig`] -- reach, alert colour, and shuffle settings.

pub mod binder;
pub mod calculator;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod fixed;
pub mod flags;
pub mod focus;
pub mod id;
pub mod item;
pub mod plan;
pub mod registry;
pub mod rng;
pub mod station;
pub mod status;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
