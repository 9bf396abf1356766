use {
    crate::{CatalogMap, Progression, UnitNode},
    bevy::prelude::*,
    catalog_assets::ContentCatalog,
    progression_events::{
        AchievementUnlocked, CompletionRecorded, ItemDiscovered, TallyBump, UnitCompleted,
        UnitUnlocked,
    },
    unit_states::{Available, Completed, Locked},
};

/// Spawns one entity per catalog unit, all starting Locked. Called from
/// the loading sequence once the catalog is validated.
pub fn spawn_unit_entities(
    mut commands: Commands,
    catalog: Res<ContentCatalog>,
    mut map: ResMut<CatalogMap>,
) {
    for unit in catalog.units() {
        if map.entities.contains_key(&unit.id) {
            continue;
        }
        let entity = commands
            .spawn((
                UnitNode {
                    id: unit.id.clone(),
                },
                Locked,
            ))
            .id();
        map.entities.insert(unit.id.clone(), entity);
        debug!(unit_id = %unit.id, "spawned content unit entity");
    }
}

/// Aligns every unit entity's marker with the progression state. Used
/// after hydration; steady-state transitions happen in the observers.
pub fn sync_unit_markers(
    mut commands: Commands,
    progression: Res<Progression>,
    units: Query<(Entity, &UnitNode)>,
) {
    for (entity, node) in &units {
        let mut entity = commands.entity(entity);
        entity.remove::<(Locked, Available, Completed)>();
        if progression.is_completed(&node.id) {
            entity.insert(Completed);
        } else if progression.is_unlocked(&node.id) {
            entity.insert(Available);
        } else {
            entity.insert(Locked);
        }
    }
}

/// Observer for completion events coming out of the mini-game adapters.
/// A failed call is logged and dropped; the session keeps running.
pub fn on_unit_completed(
    trigger: On<UnitCompleted>,
    mut progression: ResMut<Progression>,
    catalog: Res<ContentCatalog>,
    time: Res<Time>,
    map: Res<CatalogMap>,
    mut commands: Commands,
) {
    let event = trigger.event();
    let now = time.elapsed_secs_f64();

    let outcome = match progression.record_completion(&catalog, &event.unit_id, event.score, now) {
        Ok(outcome) => outcome,
        Err(error) => {
            warn!(unit_id = %event.unit_id, "ignoring completion event: {error}");
            return;
        }
    };

    if outcome.newly_completed {
        info!(unit_id = %event.unit_id, score = event.score, "unit completed");
        if let Some(&entity) = map.entities.get(&event.unit_id) {
            commands
                .entity(entity)
                .remove::<(Locked, Available)>()
                .insert(Completed);
        }
    }
    commands.trigger(CompletionRecorded {
        unit_id: event.unit_id.clone(),
        newly_completed: outcome.newly_completed,
        total_points: outcome.total_points,
    });

    for unit_id in outcome.unlocked {
        info!(%unit_id, "unit unlocked");
        if let Some(&entity) = map.entities.get(&unit_id) {
            commands.entity(entity).remove::<Locked>().insert(Available);
        }
        commands.trigger(UnitUnlocked { unit_id });
    }

    for grant in outcome.achievements {
        info!(achievement_id = %grant.id, points = grant.points, "achievement unlocked");
        commands.trigger(AchievementUnlocked {
            achievement_id: grant.id,
            name: grant.name,
            points: grant.points,
        });
    }
}

/// Observer for item discoveries. Only a first find changes anything.
pub fn on_item_discovered(
    trigger: On<ItemDiscovered>,
    mut progression: ResMut<Progression>,
    catalog: Res<ContentCatalog>,
    mut commands: Commands,
) {
    let event = trigger.event();
    let outcome = progression.record_discovery(&catalog, &event.item_id, event.points);
    if !outcome.newly_discovered {
        debug!(item_id = %event.item_id, "item already discovered");
        return;
    }
    debug!(item_id = %event.item_id, points = event.points, "item discovered");
    for grant in outcome.achievements {
        info!(achievement_id = %grant.id, points = grant.points, "achievement unlocked");
        commands.trigger(AchievementUnlocked {
            achievement_id: grant.id,
            name: grant.name,
            points: grant.points,
        });
    }
}

/// Observer for named tallies (correct answers etc).
pub fn on_tally_bump(
    trigger: On<TallyBump>,
    mut progression: ResMut<Progression>,
    catalog: Res<ContentCatalog>,
    mut commands: Commands,
) {
    let event = trigger.event();
    for grant in progression.bump_counter(&catalog, &event.counter, event.amount) {
        info!(achievement_id = %grant.id, points = grant.points, "achievement unlocked");
        commands.trigger(AchievementUnlocked {
            achievement_id: grant.id,
            name: grant.name,
            points: grant.points,
        });
    }
}
