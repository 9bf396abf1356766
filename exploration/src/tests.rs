use {
    crate::{
        BeginExploring, ExplorePhase, ExploreSession, SpotInspected, StartExploration, systems,
    },
    bevy::prelude::*,
    catalog_assets::{Activity, CatalogSource, ContentCatalog, UnitDef, UnitKind},
    minigame_assets::{FieldSite, HiddenSpot, Library},
    progression::Progression,
    progression_events::{ItemDiscovered, UnitCompleted},
};

#[derive(Resource, Default)]
struct Completions(Vec<(String, u32)>);

#[derive(Resource, Default)]
struct Discoveries(Vec<(String, u32)>);

fn spot(item: &str, points: u32) -> HiddenSpot {
    HiddenSpot {
        item: item.to_string(),
        points,
        hint: None,
    }
}

fn field_site() -> FieldSite {
    FieldSite {
        id: "site_soil".to_string(),
        unit: "env_soil".to_string(),
        spots: vec![spot("nematode", 5), spot("tardigrade", 10)],
        completion_bonus: 15,
    }
}

fn test_catalog() -> ContentCatalog {
    ContentCatalog::from_source(&CatalogSource {
        units: vec![UnitDef {
            id: "env_soil".to_string(),
            name: "Garden soil".to_string(),
            kind: UnitKind::Environment {
                microbes: vec!["nematode".to_string(), "tardigrade".to_string()],
            },
            order: 0,
            requires: Vec::new(),
            activity: Activity::Exploration {
                site: "site_soil".to_string(),
            },
        }],
        achievements: Vec::new(),
    })
    .expect("catalog should validate")
}

fn unlocked_progression() -> Progression {
    let mut progression = Progression::default();
    progression.reseed(&test_catalog());
    progression
}

fn test_app(progression: Progression) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(AssetPlugin::default())
        .init_asset::<FieldSite>()
        .init_resource::<Library<FieldSite>>()
        .insert_resource(progression)
        .init_resource::<Completions>()
        .init_resource::<Discoveries>()
        .add_observer(systems::start_exploration)
        .add_observer(systems::begin_exploring)
        .add_observer(systems::on_spot_inspected)
        .add_observer(
            |trigger: On<UnitCompleted>, mut completions: ResMut<Completions>| {
                let event = trigger.event();
                completions.0.push((event.unit_id.clone(), event.score));
            },
        )
        .add_observer(
            |trigger: On<ItemDiscovered>, mut discoveries: ResMut<Discoveries>| {
                let event = trigger.event();
                discoveries.0.push((event.item_id.clone(), event.points));
            },
        );

    let site = field_site();
    let id = site.id.clone();
    let handle = app
        .world_mut()
        .resource_mut::<Assets<FieldSite>>()
        .add(site);
    app.world_mut()
        .resource_mut::<Library<FieldSite>>()
        .handles
        .insert(id, handle);
    app.update();
    app
}

fn trigger_and_update<E: Event>(app: &mut App, event: E)
where
    for<'t> E::Trigger<'t>: Default,
{
    app.world_mut().trigger(event);
    app.update();
}

fn inspect(item: &str) -> SpotInspected {
    SpotInspected {
        item: item.to_string(),
    }
}

#[test]
fn finding_everything_completes_once() {
    let mut app = test_app(unlocked_progression());
    trigger_and_update(&mut app, StartExploration("site_soil".to_string()));
    trigger_and_update(&mut app, BeginExploring);

    trigger_and_update(&mut app, inspect("nematode"));
    {
        let session = app.world().resource::<ExploreSession>();
        assert_eq!(session.phase, ExplorePhase::Exploring);
        assert!(session.found.contains("nematode"));
    }
    assert_eq!(
        app.world().resource::<Discoveries>().0,
        vec![("nematode".to_string(), 5)]
    );

    trigger_and_update(&mut app, inspect("tardigrade"));
    assert_eq!(
        app.world().resource::<ExploreSession>().phase,
        ExplorePhase::Complete
    );
    assert_eq!(
        app.world().resource::<Completions>().0,
        vec![("env_soil".to_string(), 15)]
    );
}

#[test]
fn refinding_a_spot_is_ignored() {
    let mut app = test_app(unlocked_progression());
    trigger_and_update(&mut app, StartExploration("site_soil".to_string()));
    trigger_and_update(&mut app, BeginExploring);

    trigger_and_update(&mut app, inspect("nematode"));
    trigger_and_update(&mut app, inspect("nematode"));
    trigger_and_update(&mut app, inspect("nematode"));

    assert_eq!(app.world().resource::<Discoveries>().0.len(), 1);
    assert!(app.world().resource::<Completions>().0.is_empty());
}

#[test]
fn unknown_spots_do_nothing() {
    let mut app = test_app(unlocked_progression());
    trigger_and_update(&mut app, StartExploration("site_soil".to_string()));
    trigger_and_update(&mut app, BeginExploring);

    trigger_and_update(&mut app, inspect("unicorn"));
    let session = app.world().resource::<ExploreSession>();
    assert!(session.found.is_empty());
    assert!(app.world().resource::<Discoveries>().0.is_empty());
}

#[test]
fn prior_discoveries_count_towards_completion() {
    let catalog = test_catalog();
    let mut progression = Progression::default();
    progression.reseed(&catalog);
    progression.record_discovery(&catalog, "nematode", 5);

    let mut app = test_app(progression);
    trigger_and_update(&mut app, StartExploration("site_soil".to_string()));
    assert!(
        app.world()
            .resource::<ExploreSession>()
            .found
            .contains("nematode")
    );

    trigger_and_update(&mut app, BeginExploring);
    trigger_and_update(&mut app, inspect("tardigrade"));
    assert_eq!(
        app.world().resource::<ExploreSession>().phase,
        ExplorePhase::Complete
    );
    assert_eq!(app.world().resource::<Completions>().0.len(), 1);
}

#[test]
fn locked_environment_refuses_to_start() {
    let mut app = test_app(Progression::default());
    trigger_and_update(&mut app, StartExploration("site_soil".to_string()));
    assert!(app.world().get_resource::<ExploreSession>().is_none());
}
