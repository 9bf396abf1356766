use {
    bevy::prelude::*,
    catalog_assets::{Activity, ContentCatalog},
    progression::Progression,
    states::ScreenState,
};

/// Number keys jump between screens. Real navigation chrome is out of
/// scope here; this keeps every screen reachable in a dev build.
pub fn switch_screen_on_keypress(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_screen: ResMut<NextState<ScreenState>>,
) {
    let targets = [
        (KeyCode::Digit1, ScreenState::Home),
        (KeyCode::Digit2, ScreenState::Timeline),
        (KeyCode::Digit3, ScreenState::Quiz),
        (KeyCode::Digit4, ScreenState::Matching),
        (KeyCode::Digit5, ScreenState::Exploration),
        (KeyCode::Digit6, ScreenState::Microscope),
        (KeyCode::Digit7, ScreenState::Progress),
    ];
    for (key, screen) in targets {
        if keyboard.just_pressed(key) {
            next_screen.set(screen);
        }
    }
}

/// Picks the first unlocked-but-unfinished unit carrying the wanted
/// activity kind. Catalog order is the curriculum order.
fn next_activity<F>(catalog: &ContentCatalog, progression: &Progression, pick: F) -> Option<String>
where
    F: Fn(&Activity) -> Option<String>,
{
    catalog.units().find_map(|unit| {
        let content = pick(&unit.activity)?;
        (progression.is_unlocked(&unit.id) && !progression.is_completed(&unit.id))
            .then_some(content)
    })
}

pub fn launch_quiz(
    catalog: Res<ContentCatalog>,
    progression: Res<Progression>,
    mut commands: Commands,
) {
    match next_activity(&catalog, &progression, |activity| match activity {
        Activity::Quiz { quiz } => Some(quiz.clone()),
        _ => None,
    }) {
        Some(quiz_id) => commands.trigger(quiz::StartQuiz(quiz_id)),
        None => info!("no quiz available right now"),
    }
}

pub fn launch_matching(
    catalog: Res<ContentCatalog>,
    progression: Res<Progression>,
    mut commands: Commands,
) {
    match next_activity(&catalog, &progression, |activity| match activity {
        Activity::Matching { set } => Some(set.clone()),
        _ => None,
    }) {
        Some(set_id) => commands.trigger(matching::StartMatching(set_id)),
        None => info!("no matching set available right now"),
    }
}

pub fn launch_exploration(
    catalog: Res<ContentCatalog>,
    progression: Res<Progression>,
    mut commands: Commands,
) {
    match next_activity(&catalog, &progression, |activity| match activity {
        Activity::Exploration { site } => Some(site.clone()),
        _ => None,
    }) {
        Some(site_id) => commands.trigger(exploration::StartExploration(site_id)),
        None => info!("no habitat available right now"),
    }
}

pub fn launch_microscope(
    catalog: Res<ContentCatalog>,
    progression: Res<Progression>,
    mut commands: Commands,
) {
    match next_activity(&catalog, &progression, |activity| match activity {
        Activity::Microscope { slide } => Some(slide.clone()),
        _ => None,
    }) {
        Some(slide_id) => commands.trigger(microscope::StartSlide(slide_id)),
        None => info!("no slide available right now"),
    }
}
