//! Matching mini-game adapter.
//!
//! The learner flips microbe cards and fact cards trying to pair them.
//! A matched pair is a one-time discovery: re-clicking an already
//! matched card never re-awards points or re-triggers events. Matching
//! every pair completes the set's content unit exactly once.

pub mod systems;

#[cfg(test)]
mod tests;

use {bevy::prelude::*, states::ScreenState, std::collections::HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Instructions,
    Playing,
    Feedback { matched: bool },
    Complete,
}

/// One face-down card on the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRef {
    /// The pair this card belongs to.
    pub microbe: String,
    pub face: CardFace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Microbe,
    Fact,
}

/// State of the matching attempt currently on screen.
#[derive(Resource, Debug)]
pub struct MatchSession {
    pub set_id: String,
    pub unit_id: String,
    /// Pairs already matched; mirrors the engine's discovered set at
    /// start so earlier finds stay matched across sessions.
    pub matched: HashSet<String>,
    pub first_pick: Option<CardRef>,
    /// Shuffled presentation order; purely cosmetic.
    pub layout: Vec<CardRef>,
    pub score: u32,
    pub phase: MatchPhase,
    reported: bool,
}

impl MatchSession {
    pub fn reported(&self) -> bool {
        self.reported
    }
}

// --- Control events (triggered by the matching screen UI) ---

#[derive(Debug, Event)]
pub struct StartMatching(pub String);

#[derive(Debug, Event)]
pub struct BeginMatching;

#[derive(Debug, Event)]
pub struct CardPicked(pub CardRef);

#[derive(Debug, Event)]
pub struct DismissFeedback;

pub struct MatchingPlugin;

impl Plugin for MatchingPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(systems::start_matching)
            .add_observer(systems::begin_matching)
            .add_observer(systems::on_card_picked)
            .add_observer(systems::dismiss_feedback)
            .add_systems(OnExit(ScreenState::Matching), systems::cleanup_matching);
    }
}
