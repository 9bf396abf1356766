use {
    crate::{
        BeginMatching, CardFace, CardPicked, CardRef, DismissFeedback, MatchPhase, MatchSession,
        StartMatching,
    },
    bevy::prelude::*,
    minigame_assets::{Library, MatchSet},
    progression::Progression,
    progression_events::{ItemDiscovered, UnitCompleted},
    rand::seq::SliceRandom,
    std::collections::HashSet,
};

fn lookup<'a>(
    library: &Library<MatchSet>,
    sets: &'a Assets<MatchSet>,
    set_id: &str,
) -> Option<&'a MatchSet> {
    library.handle(set_id).and_then(|handle| sets.get(handle))
}

/// Observer that opens a matching session. Pairs the learner discovered
/// in earlier sessions start out already matched.
pub fn start_matching(
    trigger: On<StartMatching>,
    library: Res<Library<MatchSet>>,
    sets: Res<Assets<MatchSet>>,
    progression: Res<Progression>,
    mut commands: Commands,
) {
    let set_id = &trigger.event().0;
    let Some(set) = lookup(&library, &sets, set_id) else {
        warn!(%set_id, "match set content not loaded");
        return;
    };
    if set.pairs.is_empty() {
        warn!(%set_id, "match set has no pairs");
        return;
    }
    if !progression.is_unlocked(&set.unit) {
        warn!(%set_id, unit_id = %set.unit, "matching unit is still locked");
        return;
    }

    let matched: HashSet<String> = set
        .pairs
        .iter()
        .filter(|pair| progression.is_discovered(&pair.microbe))
        .map(|pair| pair.microbe.clone())
        .collect();

    let mut layout: Vec<CardRef> = set
        .pairs
        .iter()
        .flat_map(|pair| {
            [
                CardRef {
                    microbe: pair.microbe.clone(),
                    face: CardFace::Microbe,
                },
                CardRef {
                    microbe: pair.microbe.clone(),
                    face: CardFace::Fact,
                },
            ]
        })
        .collect();
    layout.shuffle(&mut rand::rng());

    debug!(%set_id, pairs = set.pairs.len(), pre_matched = matched.len(), "matching started");
    commands.insert_resource(MatchSession {
        set_id: set.id.clone(),
        unit_id: set.unit.clone(),
        matched,
        first_pick: None,
        layout,
        score: 0,
        phase: MatchPhase::Instructions,
        reported: false,
    });
}

pub fn begin_matching(
    _trigger: On<BeginMatching>,
    session: Option<ResMut<MatchSession>>,
    library: Res<Library<MatchSet>>,
    sets: Res<Assets<MatchSet>>,
    mut commands: Commands,
) {
    let Some(mut session) = session else {
        return;
    };
    if session.phase != MatchPhase::Instructions {
        return;
    }
    let Some(set) = lookup(&library, &sets, &session.set_id) else {
        return;
    };
    session.phase = MatchPhase::Playing;
    // Everything may already be matched from earlier sessions.
    maybe_finish(&mut session, set, &mut commands);
}

/// Observer resolving a card pick. Picks on matched pairs are ignored;
/// the second pick of an attempt either matches or sends the session
/// into (retryable) mismatch feedback.
pub fn on_card_picked(
    trigger: On<CardPicked>,
    session: Option<ResMut<MatchSession>>,
    library: Res<Library<MatchSet>>,
    sets: Res<Assets<MatchSet>>,
    mut commands: Commands,
) {
    let Some(mut session) = session else {
        return;
    };
    if session.phase != MatchPhase::Playing {
        return;
    }
    let Some(set) = lookup(&library, &sets, &session.set_id) else {
        return;
    };

    let card = &trigger.event().0;
    if session.matched.contains(&card.microbe) {
        debug!(microbe = %card.microbe, "card already matched, ignored");
        return;
    }

    let Some(first) = session.first_pick.take() else {
        session.first_pick = Some(card.clone());
        return;
    };
    if first == *card {
        // Same card twice is not an attempt.
        session.first_pick = Some(first);
        return;
    }

    if first.microbe == card.microbe && first.face != card.face {
        session.matched.insert(card.microbe.clone());
        session.score += set.points_per_pair;
        commands.trigger(ItemDiscovered {
            item_id: card.microbe.clone(),
            points: set.points_per_pair,
        });
        session.phase = MatchPhase::Feedback { matched: true };
        debug!(microbe = %card.microbe, "pair matched");
    } else {
        session.phase = MatchPhase::Feedback { matched: false };
    }
}

pub fn dismiss_feedback(
    _trigger: On<DismissFeedback>,
    session: Option<ResMut<MatchSession>>,
    library: Res<Library<MatchSet>>,
    sets: Res<Assets<MatchSet>>,
    mut commands: Commands,
) {
    let Some(mut session) = session else {
        return;
    };
    if !matches!(session.phase, MatchPhase::Feedback { .. }) {
        return;
    }
    let Some(set) = lookup(&library, &sets, &session.set_id) else {
        return;
    };
    session.phase = MatchPhase::Playing;
    maybe_finish(&mut session, set, &mut commands);
}

fn maybe_finish(session: &mut MatchSession, set: &MatchSet, commands: &mut Commands) {
    if session.matched.len() < set.pairs.len() {
        return;
    }
    session.phase = MatchPhase::Complete;
    if !session.reported {
        session.reported = true;
        info!(set_id = %session.set_id, "all pairs matched");
        commands.trigger(UnitCompleted {
            unit_id: session.unit_id.clone(),
            score: set.completion_bonus,
        });
    }
}

pub fn cleanup_matching(mut commands: Commands) {
    commands.remove_resource::<MatchSession>();
}
