//! Guide overlay UI.
//! When the guide decides a screen should be introduced (see the `guide`
//! crate), this spawns a small overlay panel that dismisses itself after
//! a few seconds. The panel and its timer never outlive the screen that
//! spawned them.

use {
    bevy::prelude::*,
    guide::GuidePrompt,
    states::{GameState, ScreenState},
};

/// Seconds before the guide panel dismisses itself.
const GUIDE_DURATION: f32 = 6.0;

pub struct GuideUiPlugin;

impl Plugin for GuideUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(on_guide_prompt)
            .add_systems(
                Update,
                tick_guide_panels.run_if(in_state(GameState::Running)),
            )
            .add_systems(OnExit(GameState::Running), cleanup_guide_panels);

        // The panel belongs to the screen that prompted it; leaving the
        // screen takes the panel and its timer with it.
        for screen in [
            ScreenState::Home,
            ScreenState::Timeline,
            ScreenState::Quiz,
            ScreenState::Matching,
            ScreenState::Exploration,
            ScreenState::Microscope,
            ScreenState::Progress,
        ] {
            app.add_systems(OnExit(screen), cleanup_guide_panels);
        }
    }
}

#[derive(Component)]
struct GuidePanel {
    timer: Timer,
}

/// Picks the guide's line for a screen. Content-light on purpose; the
/// real copy lives with the art team.
fn tip_for(screen: &str) -> &'static str {
    match screen {
        "home" => "Welcome to the micro world! Pick a door to start exploring.",
        "timeline" => "Travel through the history of tiny life, one era at a time.",
        "quiz" => "Answer before the timer runs out - wrong guesses are fine!",
        "matching" => "Flip cards to pair each microbe with its fact.",
        "exploration" => "Click around the scene, tiny creatures are hiding everywhere.",
        "microscope" => "Turn the zoom dial until the specimen comes into focus.",
        "progress" => "Here is everything you have discovered so far.",
        _ => "Look around and see what you can discover!",
    }
}

/// Observer that replaces any existing guide panel with one for the
/// screen just entered.
fn on_guide_prompt(
    trigger: On<GuidePrompt>,
    existing: Query<Entity, With<GuidePanel>>,
    mut commands: Commands,
) {
    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    let event = trigger.event();
    debug!(screen = %event.screen, visit = event.visit, "showing guide");
    commands
        .spawn((
            GuidePanel {
                timer: Timer::from_seconds(GUIDE_DURATION, TimerMode::Once),
            },
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(24.0),
                left: Val::Percent(15.0),
                right: Val::Percent(15.0),
                padding: UiRect::all(Val::Px(14.0)),
                border: UiRect::all(Val::Px(2.0)),
                justify_content: JustifyContent::Center,
                border_radius: BorderRadius::all(Val::Px(10.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.1, 0.12, 0.2, 0.95)),
            BorderColor::all(Color::srgba(0.4, 0.6, 0.9, 1.0)),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new(tip_for(&event.screen)),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// Dismisses guide panels once their timer runs out.
fn tick_guide_panels(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut GuidePanel)>,
) {
    for (entity, mut panel) in query.iter_mut() {
        panel.timer.tick(time.delta());
        if panel.timer.is_finished() {
            commands.entity(entity).despawn();
        }
    }
}

fn cleanup_guide_panels(mut commands: Commands, query: Query<Entity, With<GuidePanel>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}
