//! Content catalog data for the microbiology curriculum.
//!
//! The catalog is authored as a single `.catalog.ron` asset listing every
//! era, timeline event and explorable environment, plus the achievement
//! definitions. It is validated once at load time into [`ContentCatalog`];
//! the rest of the game never touches the raw asset again.

mod catalog;


pub use catalog::{CatalogError, ContentCatalog};

use {
    bevy::prelude::*,
    bevy_common_assets::ron::RonAssetPlugin,
    serde::{Deserialize, Serialize},
};

pub struct CatalogAssetsPlugin;

impl Plugin for CatalogAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<CatalogSource>::new(&["catalog.ron"]))
            .init_resource::<ContentCatalog>();
    }
}

/// Raw catalog file as authored on disk, before validation.
#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
pub struct CatalogSource {
    pub units: Vec<UnitDef>,
    #[serde(default)]
    pub achievements: Vec<AchievementDef>,
}

/// One piece of unlockable content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnitDef {
    /// Unique key for this unit (e.g. "event_pasteur_flask").
    pub id: String,
    /// Display name for UI.
    pub name: String,
    pub kind: UnitKind,
    /// Sort position among siblings.
    #[serde(default)]
    pub order: u32,
    /// Ids that must all be completed before this unit unlocks.
    /// Empty means unlocked from the start.
    #[serde(default)]
    pub requires: Vec<String>,
    /// The mini-game that completes this unit.
    #[serde(default)]
    pub activity: Activity,
}

/// Discriminated content-unit kinds. Kind-specific fields live on the
/// variant so a loaded unit can never be missing them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum UnitKind {
    /// A chapter of the microbiology timeline.
    Era,
    /// A historical event inside an era.
    Event { era: String },
    /// An explorable habitat with a fixed microbe roster.
    Environment { microbes: Vec<String> },
}

/// How a unit is completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Activity {
    /// Completed by reading through the unit's story card.
    #[default]
    Reading,
    Quiz { quiz: String },
    Matching { set: String },
    Exploration { site: String },
    Microscope { slide: String },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AchievementDef {
    pub id: String,
    pub name: String,
    /// Bonus awarded once, the first time the predicate holds.
    pub points: u32,
    pub predicate: PredicateNode,
}

/// A node in an achievement's condition tree, evaluated against the
/// progression state after every mutation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum PredicateNode {
    // --- Logic gates ---
    /// Requires ALL sub-conditions to hold.
    All(Vec<PredicateNode>),
    /// Requires ANY sub-condition to hold.
    Any(Vec<PredicateNode>),
    /// Inverts the sub-condition.
    Not(Box<PredicateNode>),

    // --- Leaves over the progression state ---
    /// A specific unit is completed.
    CompletedUnit(String),
    /// Every event of the given era is completed. An era with no events
    /// never satisfies this.
    CompletedAllOf { parent: String },
    /// At least `count` units of any kind are completed.
    CompletedAtLeast { count: u32 },
    PointsAtLeast { points: u32 },
    /// At least `count` distinct items discovered across activities.
    DiscoveredAtLeast { count: u32 },
    /// A named tally reached a threshold (e.g. "quiz:correct").
    CounterAtLeast { counter: String, at_least: u32 },
}
