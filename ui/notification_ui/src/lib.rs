//! On-screen toasts for progression moments.
//!
//! Newly unlocked content, achievement grants and first-time discoveries
//! each pop a short-lived toast. Toasts stack downward from the top of
//! the screen, oldest first; when too many are alive the oldest ones are
//! dropped early, and everything despawns when the session leaves the
//! Running state.

use {
    bevy::prelude::*,
    progression_events::{AchievementUnlocked, ItemDiscovered, UnitUnlocked},
    states::GameState,
};

/// Seconds a toast stays on screen.
const TOAST_SECONDS: f32 = 5.0;
/// Vertical space one toast row occupies, gap included.
const TOAST_STRIDE: f32 = 56.0;
/// Live toasts beyond this many push the oldest out early.
const MAX_TOASTS: usize = 4;

pub struct NotificationUiPlugin;

impl Plugin for NotificationUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(on_unit_unlocked)
            .add_observer(on_achievement_unlocked)
            .add_observer(on_item_discovered)
            .add_systems(
                Update,
                (expire_toasts, restack_toasts)
                    .chain()
                    .run_if(in_state(GameState::Running)),
            )
            .add_systems(OnExit(GameState::Running), clear_toasts);
    }
}

#[derive(Component)]
struct Toast {
    timer: Timer,
}

#[derive(Clone, Copy)]
enum ToastKind {
    Unlock,
    Achievement,
    Discovery,
}

impl ToastKind {
    fn accent(self) -> Color {
        match self {
            ToastKind::Unlock => Color::srgb(0.35, 0.75, 0.45),
            ToastKind::Achievement => Color::srgb(0.9, 0.75, 0.25),
            ToastKind::Discovery => Color::srgb(0.45, 0.65, 0.95),
        }
    }
}

fn on_unit_unlocked(
    trigger: On<UnitUnlocked>,
    live: Query<(Entity, &Toast)>,
    mut commands: Commands,
) {
    let text = format!("New to explore: {}", trigger.event().unit_id);
    spawn_toast(&mut commands, &live, ToastKind::Unlock, text);
}

fn on_achievement_unlocked(
    trigger: On<AchievementUnlocked>,
    live: Query<(Entity, &Toast)>,
    mut commands: Commands,
) {
    let event = trigger.event();
    let text = format!("Achievement: {} (+{} pts)", event.name, event.points);
    spawn_toast(&mut commands, &live, ToastKind::Achievement, text);
}

fn on_item_discovered(
    trigger: On<ItemDiscovered>,
    live: Query<(Entity, &Toast)>,
    mut commands: Commands,
) {
    let text = format!("Discovered: {}", trigger.event().item_id);
    spawn_toast(&mut commands, &live, ToastKind::Discovery, text);
}

/// Spawns one toast row below the live ones, evicting the oldest rows
/// when the stack is full. `restack_toasts` settles exact positions on
/// the next frame.
fn spawn_toast(
    commands: &mut Commands,
    live: &Query<(Entity, &Toast)>,
    kind: ToastKind,
    text: String,
) {
    let mut rows: Vec<(Entity, f32)> = live
        .iter()
        .map(|(entity, toast)| (entity, toast.timer.remaining_secs()))
        .collect();
    rows.sort_by(|a, b| a.1.total_cmp(&b.1));
    let evict = (rows.len() + 1).saturating_sub(MAX_TOASTS);
    for &(entity, _) in rows.iter().take(evict) {
        commands.entity(entity).despawn();
    }

    let row = rows.len() - evict;
    commands.spawn((
        Toast {
            timer: Timer::from_seconds(TOAST_SECONDS, TimerMode::Once),
        },
        Text::new(text),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(row_top(row)),
            left: Val::Percent(24.0),
            right: Val::Percent(24.0),
            padding: UiRect::all(Val::Px(12.0)),
            border: UiRect::all(Val::Px(2.0)),
            justify_content: JustifyContent::Center,
            border_radius: BorderRadius::all(Val::Px(8.0)),
            ..default()
        },
        TextColor(Color::WHITE),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        BackgroundColor(Color::srgba(0.1, 0.12, 0.18, 0.92)),
        BorderColor::all(kind.accent()),
    ));
}

fn row_top(row: usize) -> f32 {
    12.0 + row as f32 * TOAST_STRIDE
}

/// Ticks every toast and despawns the expired ones.
fn expire_toasts(
    mut commands: Commands,
    time: Res<Time>,
    mut toasts: Query<(Entity, &mut Toast)>,
) {
    for (entity, mut toast) in toasts.iter_mut() {
        toast.timer.tick(time.delta());
        if toast.timer.is_finished() {
            commands.entity(entity).despawn();
        }
    }
}

/// Keeps the stack packed from the top, oldest toast first.
fn restack_toasts(mut toasts: Query<(&Toast, &mut Node)>) {
    let mut rows: Vec<_> = toasts.iter_mut().collect();
    rows.sort_by(|a, b| {
        a.0.timer
            .remaining_secs()
            .total_cmp(&b.0.timer.remaining_secs())
    });
    for (row, (_, node)) in rows.iter_mut().enumerate() {
        node.top = Val::Px(row_top(row));
    }
}

fn clear_toasts(mut commands: Commands, toasts: Query<Entity, With<Toast>>) {
    for entity in toasts.iter() {
        commands.entity(entity).despawn();
    }
}
