use bevy::prelude::*;

#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameState {
    #[default]
    Loading,
    Running,
}

/// Which screen of the game the learner is currently on.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScreenState {
    #[default]
    Home,
    Timeline,
    Quiz,
    Matching,
    Exploration,
    Microscope,
    Progress,
}

impl ScreenState {
    /// Stable key used for guide visit counters and log lines.
    pub fn key(&self) -> &'static str {
        match self {
            ScreenState::Home => "home",
            ScreenState::Timeline => "timeline",
            ScreenState::Quiz => "quiz",
            ScreenState::Matching => "matching",
            ScreenState::Exploration => "exploration",
            ScreenState::Microscope => "microscope",
            ScreenState::Progress => "progress",
        }
    }
}

#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LoadingPhase {
    #[default]
    Assets,     // wait for catalog + activity content files
    SpawnUnits, // spawn one entity per content unit
    Hydrate,    // restore saved progression, seed initial unlocks
    Ready,      // all done, hand over to Running
}
