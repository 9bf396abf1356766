use {
    crate::{GuideCounters, GuidePrompt, on_screen_entered},
    bevy::prelude::*,
    progression_events::ScreenEntered,
    save_load::ProfileStore,
};

#[test]
fn shows_on_first_and_every_third_visit() {
    let mut counters = GuideCounters::default();

    let mut shown = Vec::new();
    for visit in 1..=9 {
        counters.record_visit("quiz");
        if counters.should_show("quiz") {
            shown.push(visit);
        }
    }
    assert_eq!(shown, vec![1, 3, 6, 9]);
}

#[test]
fn screens_count_independently() {
    let mut counters = GuideCounters::default();
    counters.record_visit("quiz");
    counters.record_visit("quiz");
    counters.record_visit("matching");

    assert_eq!(counters.visits("quiz"), 2);
    assert_eq!(counters.visits("matching"), 1);
    assert!(!counters.should_show("quiz"));
    assert!(counters.should_show("matching"));
    assert!(!counters.should_show("microscope"), "never visited");
}

#[test]
fn hydrates_from_store_and_skips_garbage() {
    let mut store = ProfileStore::in_memory();
    store.set("guide:quiz", "5");
    store.set("guide:home", "not-a-number");
    store.set("progress", "{}");

    let mut counters = GuideCounters::default();
    counters.hydrate(&store);

    assert_eq!(counters.visits("quiz"), 5);
    assert_eq!(counters.visits("home"), 0);
    assert_eq!(counters.visits("progress"), 0, "non-guide keys ignored");
}

#[test]
fn visits_are_recorded_and_prompted_through_events() {
    #[derive(Resource, Default)]
    struct Prompts(Vec<(String, u32)>);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .init_resource::<GuideCounters>()
        .insert_resource(ProfileStore::in_memory())
        .init_resource::<Prompts>()
        .add_observer(on_screen_entered)
        .add_observer(|trigger: On<GuidePrompt>, mut prompts: ResMut<Prompts>| {
            let event = trigger.event();
            prompts.0.push((event.screen.clone(), event.visit));
        });

    for _ in 0..4 {
        app.world_mut().trigger(ScreenEntered {
            screen: "exploration".to_string(),
        });
        app.update();
    }

    let prompts = app.world().resource::<Prompts>();
    assert_eq!(
        prompts.0,
        vec![
            ("exploration".to_string(), 1),
            ("exploration".to_string(), 3)
        ]
    );
    assert_eq!(
        app.world().resource::<ProfileStore>().get("guide:exploration"),
        Some("4")
    );
}
