//! The progression engine: which content is unlocked, what the learner
//! completed and discovered, accumulated score, achievement grants.
//!
//! Mini-games never mutate this state directly; they trigger
//! [`progression_events::UnitCompleted`] (and friends) and the observers
//! here apply them. All rules are data-driven by the
//! [`catalog_assets::ContentCatalog`].

mod engine;
pub mod systems;


pub use engine::{
    AchievementGrant, CompletionOutcome, CompletionRecord, DiscoveryOutcome, Progression,
    ProgressionError, ProgressionSnapshot,
};

use {bevy::prelude::*, std::collections::HashMap};

/// Associates a spawned entity with a catalog unit.
#[derive(Component)]
pub struct UnitNode {
    pub id: String,
}

/// O(1) lookup of unit entities by id.
#[derive(Resource, Default)]
pub struct CatalogMap {
    pub entities: HashMap<String, Entity>,
}

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Progression>()
            .init_resource::<CatalogMap>()
            .register_type::<Progression>()
            .add_observer(systems::on_unit_completed)
            .add_observer(systems::on_item_discovered)
            .add_observer(systems::on_tally_bump);
    }
}
