//! Shared lock-state marker components for content-unit entities.
//!
//! Every era, timeline event and environment from the catalog is spawned as
//! an entity carrying exactly one of these markers; the progression engine
//! transitions them as the learner advances.

use bevy::prelude::*;

pub struct UnitStatesPlugin;

impl Plugin for UnitStatesPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Locked>()
            .register_type::<Available>()
            .register_type::<Completed>();
    }
}

/// Default state - prerequisites not met, greyed out in UI.
#[derive(Component, Default, Reflect)]
#[reflect(Component)]
pub struct Locked;

/// Reachable by the learner, its activity can be started.
#[derive(Component, Reflect)]
#[reflect(Component)]
pub struct Available;

/// The learner finished this unit's activity.
#[derive(Component, Reflect)]
#[reflect(Component)]
pub struct Completed;
