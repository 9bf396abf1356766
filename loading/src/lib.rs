//! Phased startup.
//!
//! Loading runs through [`LoadingPhase`]: wait for the catalog and
//! activity content to load, validate the catalog, spawn one entity per
//! content unit, hydrate saved progression, then hand over to Running.
//! An invalid catalog is a content-authoring bug: it is reported once
//! and the game stays on the loading screen instead of running broken.

use {
    bevy::{asset::LoadedFolder, prelude::*},
    catalog_assets::{CatalogSource, ContentCatalog},
    states::{GameState, LoadingPhase},
};

pub struct LoadingManagerPlugin;

impl Plugin for LoadingManagerPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<LoadingPhase>()
            .init_resource::<PendingContent>()
            .add_systems(Startup, start_loading)
            .add_systems(
                Update,
                check_content_loaded
                    .run_if(in_state(GameState::Loading).and(in_state(LoadingPhase::Assets))),
            )
            .add_systems(
                OnEnter(LoadingPhase::SpawnUnits),
                (progression::systems::spawn_unit_entities, advance_to_hydrate).chain(),
            )
            .add_systems(
                OnEnter(LoadingPhase::Hydrate),
                (
                    save_load::hydrate_progression,
                    progression::systems::sync_unit_markers,
                    advance_to_ready,
                )
                    .chain(),
            )
            .add_systems(OnEnter(LoadingPhase::Ready), finish_loading)
            .add_systems(OnEnter(GameState::Loading), setup_loading_ui)
            .add_systems(OnExit(GameState::Loading), cleanup_loading_ui);
    }
}

#[derive(Resource, Default)]
struct PendingContent {
    catalog: Handle<CatalogSource>,
    activities: Handle<LoadedFolder>,
    /// Validation already failed; don't re-report every frame.
    failed: bool,
}

fn start_loading(mut pending: ResMut<PendingContent>, asset_server: Res<AssetServer>) {
    info!("loading content");
    pending.catalog = asset_server.load("content/core.catalog.ron");
    pending.activities = asset_server.load_folder("content/activities");
}

fn check_content_loaded(
    mut pending: ResMut<PendingContent>,
    asset_server: Res<AssetServer>,
    catalogs: Res<Assets<CatalogSource>>,
    mut commands: Commands,
    mut next_phase: ResMut<NextState<LoadingPhase>>,
) {
    if pending.failed {
        return;
    }
    if !asset_server.is_loaded_with_dependencies(&pending.catalog)
        || !asset_server.is_loaded_with_dependencies(&pending.activities)
    {
        return;
    }
    let Some(source) = catalogs.get(&pending.catalog) else {
        return;
    };

    match ContentCatalog::from_source(source) {
        Ok(catalog) => {
            info!(units = catalog.len(), "content catalog validated");
            commands.insert_resource(catalog);
            next_phase.set(LoadingPhase::SpawnUnits);
        }
        Err(error) => {
            error!("content catalog invalid: {error}");
            pending.failed = true;
        }
    }
}

fn advance_to_hydrate(mut next_phase: ResMut<NextState<LoadingPhase>>) {
    next_phase.set(LoadingPhase::Hydrate);
}

fn advance_to_ready(mut next_phase: ResMut<NextState<LoadingPhase>>) {
    next_phase.set(LoadingPhase::Ready);
}

fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    info!("content ready, starting session");
    next_state.set(GameState::Running);
}

// --- Loading UI ---

#[derive(Component)]
struct LoadingUi;

fn setup_loading_ui(mut commands: Commands) {
    commands.spawn((
        LoadingUi,
        Text::new("Growing cultures..."),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(40.0),
            top: Val::Percent(45.0),
            ..default()
        },
    ));
}

fn cleanup_loading_ui(mut commands: Commands, query: Query<Entity, With<LoadingUi>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}
