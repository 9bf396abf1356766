//! Per-screen guide visit counters.
//!
//! The guide character introduces a screen on the first visit and then on
//! every Nth visit (default every 3rd), so returning learners are not
//! re-taught constantly. Counters are independent of the progression
//! state and persist through the profile store.

#[cfg(test)]
mod tests;

use {
    bevy::prelude::*,
    progression_events::ScreenEntered,
    save_load::ProfileStore,
    std::collections::HashMap,
};

const STORE_PREFIX: &str = "guide:";

/// Fired after a visit is recorded, when the guide should appear on the
/// screen just entered. UI listens to this instead of re-deriving the
/// display rule.
#[derive(Debug, Event)]
pub struct GuidePrompt {
    pub screen: String,
    pub visit: u32,
}

#[derive(Resource, Debug)]
pub struct GuideCounters {
    counts: HashMap<String, u32>,
    /// Show the guide on every visit count divisible by this.
    every: u32,
}

impl Default for GuideCounters {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
            every: 3,
        }
    }
}

impl GuideCounters {
    pub fn record_visit(&mut self, screen: &str) -> u32 {
        let count = self.counts.entry(screen.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// True on the first visit and on every `every`th visit after that.
    pub fn should_show(&self, screen: &str) -> bool {
        let count = self.visits(screen);
        count == 1 || (count > 0 && count % self.every == 0)
    }

    pub fn visits(&self, screen: &str) -> u32 {
        self.counts.get(screen).copied().unwrap_or(0)
    }

    /// Reads persisted counters back from the profile store. Unparsable
    /// values are skipped; a missing counter just restarts at zero.
    pub fn hydrate(&mut self, store: &ProfileStore) {
        for (key, value) in store.entries() {
            let Some(screen) = key.strip_prefix(STORE_PREFIX) else {
                continue;
            };
            match value.parse::<u32>() {
                Ok(count) => {
                    self.counts.insert(screen.to_string(), count);
                }
                Err(_) => warn!(%key, %value, "skipping unparsable guide counter"),
            }
        }
    }
}

pub struct GuidePlugin;

impl Plugin for GuidePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GuideCounters>()
            .add_systems(Startup, hydrate_counters.after(save_load::load_profile))
            .add_observer(on_screen_entered);
    }
}

fn hydrate_counters(mut counters: ResMut<GuideCounters>, store: Res<ProfileStore>) {
    counters.hydrate(&store);
}

/// Observer counting every screen entry and prompting the guide when the
/// display rule says so.
fn on_screen_entered(
    trigger: On<ScreenEntered>,
    mut counters: ResMut<GuideCounters>,
    mut store: ResMut<ProfileStore>,
    mut commands: Commands,
) {
    let screen = &trigger.event().screen;
    let visit = counters.record_visit(screen);
    store.set(&format!("{STORE_PREFIX}{screen}"), visit.to_string());
    debug!(%screen, visit, "screen visited");

    if counters.should_show(screen) {
        commands.trigger(GuidePrompt {
            screen: screen.clone(),
            visit,
        });
    }
}
