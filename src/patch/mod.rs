//! Classification of changed classes and methods, and naming of the patch classes they need
//!
//! Given a [`UnitGraph`](crate::model::UnitGraph) whose classes and methods carry the added and
//! modified markers, a [`Classifier`] produces a [`PatchManifest`]. A [`NameRegistry`] then names
//! the patch classes, and [`PatchPlan`] groups everything the emission stage needs per class.

mod classify;
mod errors;
mod ledger;
mod manifest;
mod naming;
mod plan;
mod settings;

pub use classify::*;
pub use errors::*;
pub use ledger::*;
pub use manifest::*;
pub use naming::*;
pub use plan::*;
pub use settings::*;
