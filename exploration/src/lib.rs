//! Environment exploration mini-game adapter.
//!
//! The learner pokes around a habitat scene looking for hidden
//! organisms. Every find is a one-time discovery; finding them all
//! completes the environment unit exactly once.

pub mod systems;

#[cfg(test)]
mod tests;

use {bevy::prelude::*, states::ScreenState, std::collections::HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorePhase {
    Briefing,
    Exploring,
    Complete,
}

/// State of the exploration visit currently on screen.
#[derive(Resource, Debug)]
pub struct ExploreSession {
    pub site_id: String,
    pub unit_id: String,
    /// Spots found so far; mirrors the engine's discovered set at start.
    pub found: HashSet<String>,
    pub phase: ExplorePhase,
    reported: bool,
}

impl ExploreSession {
    pub fn reported(&self) -> bool {
        self.reported
    }
}

// --- Control events (triggered by the exploration screen UI) ---

#[derive(Debug, Event)]
pub struct StartExploration(pub String);

#[derive(Debug, Event)]
pub struct BeginExploring;

/// The learner clicked a point that resolved to this hidden spot.
#[derive(Debug, Event)]
pub struct SpotInspected {
    pub item: String,
}

pub struct ExplorationPlugin;

impl Plugin for ExplorationPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(systems::start_exploration)
            .add_observer(systems::begin_exploring)
            .add_observer(systems::on_spot_inspected)
            .add_systems(
                OnExit(ScreenState::Exploration),
                systems::cleanup_exploration,
            );
    }
}
