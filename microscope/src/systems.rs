use {
    crate::{BeginViewing, ScopePhase, ScopeSession, SpecimenClicked, StartSlide, ZoomSet},
    bevy::prelude::*,
    minigame_assets::{Library, SlideSpec},
    progression::Progression,
    progression_events::{ItemDiscovered, UnitCompleted},
    std::collections::HashSet,
};

fn lookup<'a>(
    library: &Library<SlideSpec>,
    slides: &'a Assets<SlideSpec>,
    slide_id: &str,
) -> Option<&'a SlideSpec> {
    library.handle(slide_id).and_then(|handle| slides.get(handle))
}

/// Observer that puts a slide under the microscope, starting at the
/// lowest magnification.
pub fn start_slide(
    trigger: On<StartSlide>,
    library: Res<Library<SlideSpec>>,
    slides: Res<Assets<SlideSpec>>,
    progression: Res<Progression>,
    mut commands: Commands,
) {
    let slide_id = &trigger.event().0;
    let Some(slide) = lookup(&library, &slides, slide_id) else {
        warn!(%slide_id, "slide content not loaded");
        return;
    };
    if slide.specimens.is_empty() {
        warn!(%slide_id, "slide has no specimens");
        return;
    }
    if !progression.is_unlocked(&slide.unit) {
        warn!(%slide_id, unit_id = %slide.unit, "slide unit is still locked");
        return;
    }

    let spotted: HashSet<String> = slide
        .specimens
        .iter()
        .filter(|specimen| progression.is_discovered(&specimen.item))
        .map(|specimen| specimen.item.clone())
        .collect();

    debug!(%slide_id, specimens = slide.specimens.len(), pre_spotted = spotted.len(), "slide loaded");
    commands.insert_resource(ScopeSession {
        slide_id: slide.id.clone(),
        unit_id: slide.unit.clone(),
        zoom: 1,
        spotted,
        misses: 0,
        phase: ScopePhase::Briefing,
        reported: false,
    });
}

pub fn begin_viewing(
    _trigger: On<BeginViewing>,
    session: Option<ResMut<ScopeSession>>,
    library: Res<Library<SlideSpec>>,
    slides: Res<Assets<SlideSpec>>,
    mut commands: Commands,
) {
    let Some(mut session) = session else {
        return;
    };
    if session.phase != ScopePhase::Briefing {
        return;
    }
    let Some(slide) = lookup(&library, &slides, &session.slide_id) else {
        return;
    };
    session.phase = ScopePhase::Viewing;
    // Everything may already be spotted from earlier sessions.
    maybe_finish(&mut session, slide, &mut commands);
}

/// Observer clamping the zoom dial to the slide's range.
pub fn on_zoom_set(
    trigger: On<ZoomSet>,
    session: Option<ResMut<ScopeSession>>,
    library: Res<Library<SlideSpec>>,
    slides: Res<Assets<SlideSpec>>,
) {
    let Some(mut session) = session else {
        return;
    };
    if session.phase != ScopePhase::Viewing {
        return;
    }
    let Some(slide) = lookup(&library, &slides, &session.slide_id) else {
        return;
    };
    let level = trigger.event().level.clamp(1, slide.max_zoom);
    debug!(zoom = level, "magnification changed");
    session.zoom = level;
}

/// Observer resolving a click on a specimen. Out-of-band clicks are
/// misses the learner retries freely; in-band clicks are idempotent
/// discoveries.
pub fn on_specimen_clicked(
    trigger: On<SpecimenClicked>,
    session: Option<ResMut<ScopeSession>>,
    library: Res<Library<SlideSpec>>,
    slides: Res<Assets<SlideSpec>>,
    mut commands: Commands,
) {
    let Some(mut session) = session else {
        return;
    };
    if session.phase != ScopePhase::Viewing {
        return;
    }
    let Some(slide) = lookup(&library, &slides, &session.slide_id) else {
        return;
    };

    let item = &trigger.event().item;
    let Some(specimen) = slide.specimens.iter().find(|s| &s.item == item) else {
        debug!(%item, "no such specimen on this slide");
        return;
    };
    if session.spotted.contains(item) {
        debug!(%item, "specimen already spotted, ignored");
        return;
    }
    if session.zoom < specimen.min_zoom || session.zoom > specimen.max_zoom {
        session.misses += 1;
        debug!(%item, zoom = session.zoom, "specimen out of focus");
        return;
    }

    session.spotted.insert(specimen.item.clone());
    debug!(%item, points = specimen.points, "specimen spotted");
    commands.trigger(ItemDiscovered {
        item_id: specimen.item.clone(),
        points: specimen.points,
    });
    maybe_finish(&mut session, slide, &mut commands);
}

fn maybe_finish(session: &mut ScopeSession, slide: &SlideSpec, commands: &mut Commands) {
    if session.spotted.len() < slide.specimens.len() {
        return;
    }
    session.phase = ScopePhase::Complete;
    if !session.reported {
        session.reported = true;
        info!(slide_id = %session.slide_id, "every specimen spotted");
        commands.trigger(UnitCompleted {
            unit_id: session.unit_id.clone(),
            score: slide.completion_bonus,
        });
    }
}

pub fn cleanup_microscope(mut commands: Commands) {
    commands.remove_resource::<ScopeSession>();
}
