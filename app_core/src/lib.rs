use {
    bevy::prelude::*,
    catalog_assets::CatalogAssetsPlugin,
    exploration::ExplorationPlugin,
    guide::GuidePlugin,
    guide_ui::GuideUiPlugin,
    loading::LoadingManagerPlugin,
    matching::MatchingPlugin,
    microscope::MicroscopePlugin,
    minigame_assets::MinigameAssetsPlugin,
    notification_ui::NotificationUiPlugin,
    progression::ProgressionPlugin,
    progression_events::ScreenEntered,
    quiz::QuizPlugin,
    save_load::SaveLoadPlugin,
    states::{GameState, ScreenState},
    system_schedule::GameSchedule,
    unit_states::UnitStatesPlugin,
};

mod systems;

pub struct AppCorePlugin;

impl Plugin for AppCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_state::<ScreenState>()
            .configure_sets(
                Update,
                (
                    GameSchedule::FrameStart,
                    GameSchedule::ResolveInput,
                    GameSchedule::ApplyProgress,
                    GameSchedule::FrameEnd,
                )
                    .chain(),
            )
            .add_plugins((
                UnitStatesPlugin,
                CatalogAssetsPlugin,
                MinigameAssetsPlugin,
                ProgressionPlugin,
                SaveLoadPlugin,
                GuidePlugin,
                LoadingManagerPlugin,
            ))
            .add_plugins((
                QuizPlugin,
                MatchingPlugin,
                ExplorationPlugin,
                MicroscopePlugin,
                NotificationUiPlugin,
                GuideUiPlugin,
            ))
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                systems::switch_screen_on_keypress
                    .in_set(GameSchedule::ResolveInput)
                    .run_if(in_state(GameState::Running)),
            )
            .add_systems(OnEnter(ScreenState::Quiz), systems::launch_quiz)
            .add_systems(OnEnter(ScreenState::Matching), systems::launch_matching)
            .add_systems(OnEnter(ScreenState::Exploration), systems::launch_exploration)
            .add_systems(OnEnter(ScreenState::Microscope), systems::launch_microscope);

        // Every screen announces itself so guide counters stay uncoupled
        // from the screens themselves.
        for screen in [
            ScreenState::Home,
            ScreenState::Timeline,
            ScreenState::Quiz,
            ScreenState::Matching,
            ScreenState::Exploration,
            ScreenState::Microscope,
            ScreenState::Progress,
        ] {
            let name = screen.key();
            app.add_systems(OnEnter(screen), move |mut commands: Commands| {
                commands.trigger(ScreenEntered {
                    screen: name.to_string(),
                });
            });
        }
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
