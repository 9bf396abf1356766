use bevy::prelude::*;

/// A mini-game finished one successful attempt for a content unit.
///
/// This **Observer** event is the only way mini-games talk to the
/// progression engine - they never touch `Progression` directly. Each
/// adapter guarantees exactly one emission per successful attempt.
///
/// # Observers
/// - `progression`: records the completion, recomputes unlocks and
///   achievements, fans out the follow-up events below.
#[derive(Debug, Event)]
pub struct UnitCompleted {
    pub unit_id: String,
    /// Score the adapter awards for this attempt. Ignored when the unit
    /// was already completed earlier.
    pub score: u32,
}

/// Fired after the engine processed a [`UnitCompleted`] event.
#[derive(Debug, Event)]
pub struct CompletionRecorded {
    pub unit_id: String,
    /// False when the unit had been completed before (idempotent repeat).
    pub newly_completed: bool,
    pub total_points: u32,
}

/// Fired once per unit when its prerequisites become fully satisfied.
#[derive(Debug, Event)]
pub struct UnitUnlocked {
    pub unit_id: String,
}

/// Fired once per achievement, the first time its predicate holds.
#[derive(Debug, Event)]
pub struct AchievementUnlocked {
    pub achievement_id: String,
    pub name: String,
    pub points: u32,
}

/// One-time find inside a matching/exploration/microscope activity.
/// Re-discovering the same item is a no-op on the engine side.
#[derive(Debug, Event)]
pub struct ItemDiscovered {
    pub item_id: String,
    pub points: u32,
}

/// Increment a named tally (e.g. correct quiz answers) feeding
/// counter-based achievement predicates.
#[derive(Debug, Event)]
pub struct TallyBump {
    pub counter: String,
    pub amount: u32,
}

/// Fired on every screen's `OnEnter`; drives guide visit counting.
#[derive(Debug, Event)]
pub struct ScreenEntered {
    pub screen: String,
}
