//! Microscope mini-game adapter.
//!
//! A slide holds specimens that are only visible inside a zoom band.
//! Clicking a specimen at the wrong magnification is a miss the learner
//! can simply retry; an in-band click is a one-time discovery. Spotting
//! every specimen completes the slide's unit exactly once.

pub mod systems;


use {bevy::prelude::*, states::ScreenState, std::collections::HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopePhase {
    Briefing,
    Viewing,
    Complete,
}

/// State of the microscope session currently on screen.
#[derive(Resource, Debug)]
pub struct ScopeSession {
    pub slide_id: String,
    pub unit_id: String,
    /// Current magnification, 1..=max_zoom of the slide.
    pub zoom: u8,
    /// Specimens spotted; mirrors the engine's discovered set at start.
    pub spotted: HashSet<String>,
    /// Out-of-focus clicks this session, surfaced as a hint by the UI.
    pub misses: u32,
    pub phase: ScopePhase,
    reported: bool,
}

impl ScopeSession {
    pub fn reported(&self) -> bool {
        self.reported
    }
}

// --- Control events (triggered by the microscope screen UI) ---

#[derive(Debug, Event)]
pub struct StartSlide(pub String);

#[derive(Debug, Event)]
pub struct BeginViewing;

/// The learner turned the zoom dial.
#[derive(Debug, Event)]
pub struct ZoomSet {
    pub level: u8,
}

/// The learner clicked where this specimen sits on the slide.
#[derive(Debug, Event)]
pub struct SpecimenClicked {
    pub item: String,
}

pub struct MicroscopePlugin;

impl Plugin for MicroscopePlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(systems::start_slide)
            .add_observer(systems::begin_viewing)
            .add_observer(systems::on_zoom_set)
            .add_observer(systems::on_specimen_clicked)
            .add_systems(OnExit(ScreenState::Microscope), systems::cleanup_microscope);
    }
}
