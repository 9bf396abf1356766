use {
    crate::{
        BeginMatching, CardFace, CardPicked, CardRef, DismissFeedback, MatchPhase, MatchSession,
        StartMatching, systems,
    },
    bevy::prelude::*,
    catalog_assets::{Activity, CatalogSource, ContentCatalog, UnitDef, UnitKind},
    minigame_assets::{Library, MatchPair, MatchSet},
    progression::Progression,
    progression_events::{ItemDiscovered, UnitCompleted},
};

#[derive(Resource, Default)]
struct Completions(Vec<(String, u32)>);

#[derive(Resource, Default)]
struct Discoveries(Vec<String>);

fn match_set() -> MatchSet {
    MatchSet {
        id: "match_pond".to_string(),
        unit: "env_pond".to_string(),
        pairs: vec![
            MatchPair {
                microbe: "paramecium".to_string(),
                fact: "Moves with tiny hairs called cilia".to_string(),
            },
            MatchPair {
                microbe: "euglena".to_string(),
                fact: "Makes food from sunlight".to_string(),
            },
        ],
        points_per_pair: 5,
        completion_bonus: 20,
    }
}

fn test_catalog() -> ContentCatalog {
    ContentCatalog::from_source(&CatalogSource {
        units: vec![UnitDef {
            id: "env_pond".to_string(),
            name: "Pond water".to_string(),
            kind: UnitKind::Environment {
                microbes: vec!["paramecium".to_string(), "euglena".to_string()],
            },
            order: 0,
            requires: Vec::new(),
            activity: Activity::Matching {
                set: "match_pond".to_string(),
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
        .init_asset::<MatchSet>()
        .init_resource::<Library<MatchSet>>()
        .insert_resource(progression)
        .init_resource::<Completions>()
        .init_resource::<Discoveries>()
        .add_observer(systems::start_matching)
        .add_observer(systems::begin_matching)
        .add_observer(systems::on_card_picked)
        .add_observer(systems::dismiss_feedback)
        .add_observer(
            |trigger: On<UnitCompleted>, mut completions: ResMut<Completions>| {
                let event = trigger.event();
                completions.0.push((event.unit_id.clone(), event.score));
            },
        )
        .add_observer(
            |trigger: On<ItemDiscovered>, mut discoveries: ResMut<Discoveries>| {
                discoveries.0.push(trigger.event().item_id.clone());
            },
        );

    let set = match_set();
    let id = set.id.clone();
    let handle = app.world_mut().resource_mut::<Assets<MatchSet>>().add(set);
    app.world_mut()
        .resource_mut::<Library<MatchSet>>()
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

fn card(microbe: &str, face: CardFace) -> CardPicked {
    CardPicked(CardRef {
        microbe: microbe.to_string(),
        face,
    })
}

fn phase(app: &App) -> MatchPhase {
    app.world().resource::<MatchSession>().phase
}

#[test]
fn matching_every_pair_completes_once() {
    let mut app = test_app(unlocked_progression());
    trigger_and_update(&mut app, StartMatching("match_pond".to_string()));
    trigger_and_update(&mut app, BeginMatching);
    assert_eq!(phase(&app), MatchPhase::Playing);

    trigger_and_update(&mut app, card("paramecium", CardFace::Microbe));
    trigger_and_update(&mut app, card("paramecium", CardFace::Fact));
    assert_eq!(phase(&app), MatchPhase::Feedback { matched: true });
    assert_eq!(
        app.world().resource::<Discoveries>().0,
        vec!["paramecium".to_string()]
    );

    trigger_and_update(&mut app, DismissFeedback);
    assert_eq!(phase(&app), MatchPhase::Playing);

    trigger_and_update(&mut app, card("euglena", CardFace::Fact));
    trigger_and_update(&mut app, card("euglena", CardFace::Microbe));
    trigger_and_update(&mut app, DismissFeedback);
    assert_eq!(phase(&app), MatchPhase::Complete);

    let completions = app.world().resource::<Completions>();
    assert_eq!(completions.0, vec![("env_pond".to_string(), 20)]);

    // Further dismissals never re-emit.
    trigger_and_update(&mut app, DismissFeedback);
    assert_eq!(app.world().resource::<Completions>().0.len(), 1);
}

#[test]
fn mismatch_gives_retryable_feedback() {
    let mut app = test_app(unlocked_progression());
    trigger_and_update(&mut app, StartMatching("match_pond".to_string()));
    trigger_and_update(&mut app, BeginMatching);

    trigger_and_update(&mut app, card("paramecium", CardFace::Microbe));
    trigger_and_update(&mut app, card("euglena", CardFace::Fact));
    assert_eq!(phase(&app), MatchPhase::Feedback { matched: false });
    assert!(app.world().resource::<Discoveries>().0.is_empty());

    trigger_and_update(&mut app, DismissFeedback);
    let session = app.world().resource::<MatchSession>();
    assert_eq!(session.phase, MatchPhase::Playing);
    assert!(session.matched.is_empty());
    assert!(session.first_pick.is_none());
}

#[test]
fn matched_cards_are_inert() {
    let mut app = test_app(unlocked_progression());
    trigger_and_update(&mut app, StartMatching("match_pond".to_string()));
    trigger_and_update(&mut app, BeginMatching);

    trigger_and_update(&mut app, card("paramecium", CardFace::Microbe));
    trigger_and_update(&mut app, card("paramecium", CardFace::Fact));
    trigger_and_update(&mut app, DismissFeedback);

    // Clicking the matched pair again neither scores nor picks.
    trigger_and_update(&mut app, card("paramecium", CardFace::Microbe));
    let session = app.world().resource::<MatchSession>();
    assert!(session.first_pick.is_none());
    assert_eq!(session.score, 5);
    assert_eq!(
        app.world().resource::<Discoveries>().0.len(),
        1,
        "no duplicate discovery"
    );
}

#[test]
fn same_card_twice_is_not_an_attempt() {
    let mut app = test_app(unlocked_progression());
    trigger_and_update(&mut app, StartMatching("match_pond".to_string()));
    trigger_and_update(&mut app, BeginMatching);

    trigger_and_update(&mut app, card("paramecium", CardFace::Microbe));
    trigger_and_update(&mut app, card("paramecium", CardFace::Microbe));

    let session = app.world().resource::<MatchSession>();
    assert_eq!(session.phase, MatchPhase::Playing);
    assert_eq!(
        session.first_pick,
        Some(CardRef {
            microbe: "paramecium".to_string(),
            face: CardFace::Microbe,
        })
    );
}

#[test]
fn earlier_discoveries_start_matched() {
    let catalog = test_catalog();
    let mut progression = Progression::default();
    progression.reseed(&catalog);
    progression.record_discovery(&catalog, "paramecium", 5);

    let mut app = test_app(progression);
    trigger_and_update(&mut app, StartMatching("match_pond".to_string()));

    let session = app.world().resource::<MatchSession>();
    assert!(session.matched.contains("paramecium"));
    assert_eq!(session.matched.len(), 1);
    // The layout still deals every card of every pair.
    assert_eq!(session.layout.len(), 4);
}

#[test]
fn locked_unit_refuses_to_start() {
    let mut app = test_app(Progression::default());
    trigger_and_update(&mut app, StartMatching("match_pond".to_string()));
    assert!(app.world().get_resource::<MatchSession>().is_none());
}
