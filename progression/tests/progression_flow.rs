use {
    bevy::prelude::*,
    catalog_assets::{
        AchievementDef, Activity, CatalogSource, ContentCatalog, PredicateNode, UnitDef, UnitKind,
    },
    progression::{CatalogMap, Progression, ProgressionPlugin, UnitNode},
    progression_events::{AchievementUnlocked, UnitCompleted, UnitUnlocked},
    unit_states::{Available, Completed, Locked},
};

#[derive(Resource, Default)]
struct SeenEvents {
    unlocked: Vec<String>,
    achievements: Vec<String>,
}

fn test_catalog() -> ContentCatalog {
    let unit = |id: &str, requires: &[&str]| UnitDef {
        id: id.to_string(),
        name: id.to_string(),
        kind: UnitKind::Era,
        order: 0,
        requires: requires.iter().map(|r| r.to_string()).collect(),
        activity: Activity::Reading,
    };
    ContentCatalog::from_source(&CatalogSource {
        units: vec![unit("a", &[]), unit("b", &["a"]), unit("c", &["a", "b"])],
        achievements: vec![AchievementDef {
            id: "starter".to_string(),
            name: "Starter".to_string(),
            points: 50,
            predicate: PredicateNode::CompletedAtLeast { count: 1 },
        }],
    })
    .expect("catalog should validate")
}

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(ProgressionPlugin)
        .insert_resource(test_catalog())
        .init_resource::<SeenEvents>()
        .add_observer(|trigger: On<UnitUnlocked>, mut seen: ResMut<SeenEvents>| {
            seen.unlocked.push(trigger.event().unit_id.clone());
        })
        .add_observer(
            |trigger: On<AchievementUnlocked>, mut seen: ResMut<SeenEvents>| {
                seen.achievements
                    .push(trigger.event().achievement_id.clone());
            },
        );
    app.add_systems(Startup, progression::systems::spawn_unit_entities);
    app.update();

    // Seed initial unlocks and align markers, the way loading does.
    let catalog = app.world().resource::<ContentCatalog>().clone();
    app.world_mut()
        .resource_mut::<Progression>()
        .reseed(&catalog);
    app.add_systems(Update, progression::systems::sync_unit_markers);
    app.update();
    app
}

fn marker_of(app: &mut App, unit_id: &str) -> &'static str {
    let entity = *app
        .world()
        .resource::<CatalogMap>()
        .entities
        .get(unit_id)
        .expect("unit entity should exist");
    let world = app.world();
    if world.get::<Completed>(entity).is_some() {
        "completed"
    } else if world.get::<Available>(entity).is_some() {
        "available"
    } else if world.get::<Locked>(entity).is_some() {
        "locked"
    } else {
        "none"
    }
}

#[test]
fn completion_events_drive_markers_and_unlocks() {
    let mut app = test_app();

    assert_eq!(marker_of(&mut app, "a"), "available");
    assert_eq!(marker_of(&mut app, "b"), "locked");
    assert_eq!(marker_of(&mut app, "c"), "locked");

    app.world_mut().trigger(UnitCompleted {
        unit_id: "a".to_string(),
        score: 10,
    });
    app.update();

    assert_eq!(marker_of(&mut app, "a"), "completed");
    assert_eq!(marker_of(&mut app, "b"), "available");
    assert_eq!(marker_of(&mut app, "c"), "locked", "c needs b as well");

    {
        let seen = app.world().resource::<SeenEvents>();
        assert_eq!(seen.unlocked, vec!["b".to_string()]);
        assert_eq!(seen.achievements, vec!["starter".to_string()]);
    }

    app.world_mut().trigger(UnitCompleted {
        unit_id: "b".to_string(),
        score: 20,
    });
    app.update();

    assert_eq!(marker_of(&mut app, "c"), "available");
    let progression = app.world().resource::<Progression>();
    // 10 + 20 + 50 achievement bonus.
    assert_eq!(progression.total_points(), 80);
}

#[test]
fn duplicate_completion_event_changes_nothing() {
    let mut app = test_app();

    app.world_mut().trigger(UnitCompleted {
        unit_id: "a".to_string(),
        score: 10,
    });
    app.update();
    let points = app.world().resource::<Progression>().total_points();
    let unlocked_events = app.world().resource::<SeenEvents>().unlocked.len();

    app.world_mut().trigger(UnitCompleted {
        unit_id: "a".to_string(),
        score: 10,
    });
    app.update();

    let progression = app.world().resource::<Progression>();
    assert_eq!(progression.total_points(), points);
    assert_eq!(
        app.world().resource::<SeenEvents>().unlocked.len(),
        unlocked_events,
        "no duplicate unlock events"
    );
}

#[test]
fn unknown_unit_event_is_dropped() {
    let mut app = test_app();

    app.world_mut().trigger(UnitCompleted {
        unit_id: "ghost".to_string(),
        score: 10,
    });
    app.update();

    let progression = app.world().resource::<Progression>();
    assert_eq!(progression.total_points(), 0);
    assert!(!progression.is_completed("ghost"));

    // The engine is still healthy afterwards.
    app.world_mut().trigger(UnitCompleted {
        unit_id: "a".to_string(),
        score: 5,
    });
    app.update();
    assert!(app.world().resource::<Progression>().is_completed("a"));

    // Unit entities never appeared for the unknown id.
    let mut query = app.world_mut().query::<&UnitNode>();
    assert!(query.iter(app.world()).all(|node| node.id != "ghost"));
}
