use {
    crate::{BeginExploring, ExplorePhase, ExploreSession, SpotInspected, StartExploration},
    bevy::prelude::*,
    minigame_assets::{FieldSite, Library},
    progression::Progression,
    progression_events::{ItemDiscovered, UnitCompleted},
    std::collections::HashSet,
};

fn lookup<'a>(
    library: &Library<FieldSite>,
    sites: &'a Assets<FieldSite>,
    site_id: &str,
) -> Option<&'a FieldSite> {
    library.handle(site_id).and_then(|handle| sites.get(handle))
}

/// Observer that opens an exploration session for a habitat. Organisms
/// found in earlier sessions start out already marked.
pub fn start_exploration(
    trigger: On<StartExploration>,
    library: Res<Library<FieldSite>>,
    sites: Res<Assets<FieldSite>>,
    progression: Res<Progression>,
    mut commands: Commands,
) {
    let site_id = &trigger.event().0;
    let Some(site) = lookup(&library, &sites, site_id) else {
        warn!(%site_id, "field site content not loaded");
        return;
    };
    if site.spots.is_empty() {
        warn!(%site_id, "field site has no hidden spots");
        return;
    }
    if !progression.is_unlocked(&site.unit) {
        warn!(%site_id, unit_id = %site.unit, "environment is still locked");
        return;
    }

    let found: HashSet<String> = site
        .spots
        .iter()
        .filter(|spot| progression.is_discovered(&spot.item))
        .map(|spot| spot.item.clone())
        .collect();

    debug!(%site_id, spots = site.spots.len(), pre_found = found.len(), "exploration started");
    commands.insert_resource(ExploreSession {
        site_id: site.id.clone(),
        unit_id: site.unit.clone(),
        found,
        phase: ExplorePhase::Briefing,
        reported: false,
    });
}

pub fn begin_exploring(
    _trigger: On<BeginExploring>,
    session: Option<ResMut<ExploreSession>>,
    library: Res<Library<FieldSite>>,
    sites: Res<Assets<FieldSite>>,
    mut commands: Commands,
) {
    let Some(mut session) = session else {
        return;
    };
    if session.phase != ExplorePhase::Briefing {
        return;
    }
    let Some(site) = lookup(&library, &sites, &session.site_id) else {
        return;
    };
    session.phase = ExplorePhase::Exploring;
    // Everything may already be found from earlier sessions.
    maybe_finish(&mut session, site, &mut commands);
}

/// Observer resolving a click on a hidden spot. Repeats on an already
/// found spot are ignored.
pub fn on_spot_inspected(
    trigger: On<SpotInspected>,
    session: Option<ResMut<ExploreSession>>,
    library: Res<Library<FieldSite>>,
    sites: Res<Assets<FieldSite>>,
    mut commands: Commands,
) {
    let Some(mut session) = session else {
        return;
    };
    if session.phase != ExplorePhase::Exploring {
        return;
    }
    let Some(site) = lookup(&library, &sites, &session.site_id) else {
        return;
    };

    let item = &trigger.event().item;
    let Some(spot) = site.spots.iter().find(|spot| &spot.item == item) else {
        debug!(%item, "nothing hidden there");
        return;
    };
    if !session.found.insert(spot.item.clone()) {
        debug!(%item, "spot already found, ignored");
        return;
    }

    debug!(%item, points = spot.points, "organism found");
    commands.trigger(ItemDiscovered {
        item_id: spot.item.clone(),
        points: spot.points,
    });
    maybe_finish(&mut session, site, &mut commands);
}

fn maybe_finish(session: &mut ExploreSession, site: &FieldSite, commands: &mut Commands) {
    if session.found.len() < site.spots.len() {
        return;
    }
    session.phase = ExplorePhase::Complete;
    if !session.reported {
        session.reported = true;
        info!(site_id = %session.site_id, "every organism found");
        commands.trigger(UnitCompleted {
            unit_id: session.unit_id.clone(),
            score: site.completion_bonus,
        });
    }
}

pub fn cleanup_exploration(mut commands: Commands) {
    commands.remove_resource::<ExploreSession>();
}
