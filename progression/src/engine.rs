use {
    bevy::prelude::*,
    catalog_assets::{ContentCatalog, PredicateNode},
    serde::{Deserialize, Serialize},
    std::collections::{HashMap, HashSet},
    thiserror::Error,
};

/// Errors a progression call can fail with. All are local and
/// recoverable: callers log and continue, and a failed call leaves the
/// state exactly as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("unknown content unit `{0}`")]
    UnknownUnit(String),
}

/// One completed unit. Append-only, keyed by unit id in [`Progression`].
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Seconds since session start when the unit was finished.
    pub completed_at: f64,
    pub score_awarded: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementGrant {
    pub id: String,
    pub name: String,
    pub points: u32,
}

/// What a [`Progression::record_completion`] call changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// False when the unit had already been completed (idempotent repeat:
    /// no record change, no score).
    pub newly_completed: bool,
    /// Units whose prerequisites became fully satisfied by this call.
    pub unlocked: Vec<String>,
    pub achievements: Vec<AchievementGrant>,
    pub total_points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    pub newly_discovered: bool,
    pub achievements: Vec<AchievementGrant>,
    pub total_points: u32,
}

/// The learner's session progress. Owned exclusively by the progression
/// engine: mini-games submit events, UI reads [`Progression::snapshot`],
/// nothing outside this crate mutates the sets.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct Progression {
    records: HashMap<String, CompletionRecord>,
    unlocked: HashSet<String>,
    achievements: HashSet<String>,
    discovered: HashSet<String>,
    counters: HashMap<String, u32>,
    total_points: u32,
}

/// Owned copy of the progression state for rendering and persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSnapshot {
    pub completed: HashMap<String, CompletionRecord>,
    pub unlocked: HashSet<String>,
    pub achievements: HashSet<String>,
    pub discovered: HashSet<String>,
    pub counters: HashMap<String, u32>,
    pub total_points: u32,
}

impl Progression {
    /// Records that `unit_id` was completed with `score` points at session
    /// time `now`. Re-completing a unit awards nothing but still
    /// re-evaluates unlocks and achievements, so the call is safe to
    /// repeat. Unknown units fail without touching any state.
    pub fn record_completion(
        &mut self,
        catalog: &ContentCatalog,
        unit_id: &str,
        score: u32,
        now: f64,
    ) -> Result<CompletionOutcome, ProgressionError> {
        if !catalog.contains(unit_id) {
            return Err(ProgressionError::UnknownUnit(unit_id.to_string()));
        }

        let newly_completed = !self.records.contains_key(unit_id);
        if newly_completed {
            self.records.insert(
                unit_id.to_string(),
                CompletionRecord {
                    completed_at: now,
                    score_awarded: score,
                },
            );
            self.total_points += score;
            // A completed unit counts as reachable even if its own
            // prerequisites were never recorded (replayed profiles).
            self.unlocked.insert(unit_id.to_string());
        }

        let unlocked = self.recompute_unlocks(catalog);
        let achievements = self.evaluate_achievements(catalog);

        Ok(CompletionOutcome {
            newly_completed,
            unlocked,
            achievements,
            total_points: self.total_points,
        })
    }

    /// One-time discovery of a hidden item. Points are awarded only the
    /// first time; repeats are no-ops.
    pub fn record_discovery(
        &mut self,
        catalog: &ContentCatalog,
        item_id: &str,
        points: u32,
    ) -> DiscoveryOutcome {
        let newly_discovered = self.discovered.insert(item_id.to_string());
        let mut achievements = Vec::new();
        if newly_discovered {
            self.total_points += points;
            achievements = self.evaluate_achievements(catalog);
        }
        DiscoveryOutcome {
            newly_discovered,
            achievements,
            total_points: self.total_points,
        }
    }

    /// Adds to a named tally and re-evaluates achievements.
    pub fn bump_counter(
        &mut self,
        catalog: &ContentCatalog,
        counter: &str,
        amount: u32,
    ) -> Vec<AchievementGrant> {
        *self.counters.entry(counter.to_string()).or_insert(0) += amount;
        self.evaluate_achievements(catalog)
    }

    /// Pure read; unknown ids are simply not unlocked.
    pub fn is_unlocked(&self, unit_id: &str) -> bool {
        self.unlocked.contains(unit_id)
    }

    /// Pure read; unknown ids are simply not completed.
    pub fn is_completed(&self, unit_id: &str) -> bool {
        self.records.contains_key(unit_id)
    }

    pub fn is_discovered(&self, item_id: &str) -> bool {
        self.discovered.contains(item_id)
    }

    pub fn achievement_unlocked(&self, achievement_id: &str) -> bool {
        self.achievements.contains(achievement_id)
    }

    pub fn counter(&self, counter: &str) -> u32 {
        self.counters.get(counter).copied().unwrap_or(0)
    }

    pub fn total_points(&self) -> u32 {
        self.total_points
    }

    pub fn completed_count(&self) -> usize {
        self.records.len()
    }

    pub fn snapshot(&self) -> ProgressionSnapshot {
        ProgressionSnapshot {
            completed: self.records.clone(),
            unlocked: self.unlocked.clone(),
            achievements: self.achievements.clone(),
            discovered: self.discovered.clone(),
            counters: self.counters.clone(),
            total_points: self.total_points,
        }
    }

    /// Replaces the state with a persisted snapshot, then recomputes the
    /// unlocked set against the current catalog (content may have changed
    /// since the snapshot was written).
    pub fn restore(&mut self, snapshot: ProgressionSnapshot, catalog: &ContentCatalog) {
        self.records = snapshot.completed;
        self.unlocked = snapshot.unlocked;
        self.achievements = snapshot.achievements;
        self.discovered = snapshot.discovered;
        self.counters = snapshot.counters;
        self.total_points = snapshot.total_points;
        for unit_id in self.records.keys() {
            self.unlocked.insert(unit_id.clone());
        }
        self.reseed(catalog);
    }

    /// Recomputes the unlocked set from the completed set. Seeds root
    /// units (empty `requires`) on a fresh session.
    pub fn reseed(&mut self, catalog: &ContentCatalog) -> Vec<String> {
        self.recompute_unlocks(catalog)
    }

    fn recompute_unlocks(&mut self, catalog: &ContentCatalog) -> Vec<String> {
        let mut newly = Vec::new();
        for unit in catalog.units() {
            if self.unlocked.contains(&unit.id) {
                continue;
            }
            if unit.requires.iter().all(|r| self.records.contains_key(r)) {
                self.unlocked.insert(unit.id.clone());
                newly.push(unit.id.clone());
            }
        }
        newly
    }

    /// Grants every not-yet-unlocked achievement whose predicate holds.
    /// Runs to a fixpoint: bonus points may satisfy further
    /// point-threshold predicates within the same mutation.
    fn evaluate_achievements(&mut self, catalog: &ContentCatalog) -> Vec<AchievementGrant> {
        let mut granted = Vec::new();
        loop {
            let mut progressed = false;
            for def in catalog.achievements() {
                if self.achievements.contains(&def.id) {
                    continue;
                }
                if self.eval(catalog, &def.predicate) {
                    self.achievements.insert(def.id.clone());
                    self.total_points += def.points;
                    granted.push(AchievementGrant {
                        id: def.id.clone(),
                        name: def.name.clone(),
                        points: def.points,
                    });
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }
        granted
    }

    fn eval(&self, catalog: &ContentCatalog, node: &PredicateNode) -> bool {
        match node {
            PredicateNode::All(nodes) => nodes.iter().all(|n| self.eval(catalog, n)),
            PredicateNode::Any(nodes) => nodes.iter().any(|n| self.eval(catalog, n)),
            PredicateNode::Not(node) => !self.eval(catalog, node),
            PredicateNode::CompletedUnit(unit_id) => self.records.contains_key(unit_id),
            PredicateNode::CompletedAllOf { parent } => {
                let mut children = catalog.children_of(parent).peekable();
                children.peek().is_some()
                    && children.all(|unit| self.records.contains_key(&unit.id))
            }
            PredicateNode::CompletedAtLeast { count } => self.records.len() as u32 >= *count,
            PredicateNode::PointsAtLeast { points } => self.total_points >= *points,
            PredicateNode::DiscoveredAtLeast { count } => self.discovered.len() as u32 >= *count,
            PredicateNode::CounterAtLeast { counter, at_least } => {
                self.counter(counter) >= *at_least
            }
        }
    }
}
