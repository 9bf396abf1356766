//! Session persistence.
//!
//! This crate owns the [`ProfileStore`] key-value file (guide visit
//! counters, saved progression snapshot) and the systems that move
//! progression state in and out of it. The engine itself never performs
//! I/O; everything on disk goes through here.

mod store;


pub use store::ProfileStore;

use {
    bevy::prelude::*,
    catalog_assets::ContentCatalog,
    progression::{Progression, ProgressionSnapshot},
    states::GameState,
    std::path::PathBuf,
    system_schedule::GameSchedule,
};

/// Store key holding the serialized progression snapshot.
const PROGRESS_KEY: &str = "progress";

pub struct SaveLoadPlugin;

impl Plugin for SaveLoadPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProfileStore>()
            .add_systems(Startup, load_profile)
            .add_systems(
                Update,
                (save_progress, flush_profile)
                    .chain()
                    .in_set(GameSchedule::FrameEnd)
                    .run_if(in_state(GameState::Running)),
            )
            .add_systems(OnExit(GameState::Running), flush_profile);
    }
}

/// Replaces the placeholder store with the one read from disk.
pub fn load_profile(mut store: ResMut<ProfileStore>) {
    let path = PathBuf::from("profile").join("profile.json");
    *store = ProfileStore::at_path(path);
    info!("profile store loaded");
}

/// Restores a saved progression snapshot, or seeds a fresh session.
/// Runs during the Hydrate loading phase, after the catalog is validated.
pub fn hydrate_progression(
    store: Res<ProfileStore>,
    catalog: Res<ContentCatalog>,
    mut progression: ResMut<Progression>,
) {
    match store.get(PROGRESS_KEY) {
        Some(json) => match serde_json::from_str::<ProgressionSnapshot>(json) {
            Ok(snapshot) => {
                progression.restore(snapshot, &catalog);
                info!(
                    completed = progression.completed_count(),
                    points = progression.total_points(),
                    "restored saved progression"
                );
            }
            Err(error) => {
                warn!("saved progression unreadable, starting fresh: {error}");
                progression.reseed(&catalog);
            }
        },
        None => {
            progression.reseed(&catalog);
            info!("no saved progression, fresh session");
        }
    }
}

/// Mirrors the progression state into the store whenever it changes.
fn save_progress(progression: Res<Progression>, mut store: ResMut<ProfileStore>) {
    if !progression.is_changed() || progression.is_added() {
        return;
    }
    match serde_json::to_string(&progression.snapshot()) {
        Ok(json) => store.set(PROGRESS_KEY, json),
        Err(error) => error!("could not serialize progression snapshot: {error}"),
    }
}

/// Writes the store to disk when something changed.
fn flush_profile(mut store: ResMut<ProfileStore>) {
    if !store.is_dirty() {
        return;
    }
    if let Err(error) = store.flush() {
        error!("could not write profile store: {error}");
    }
}
