//! Mini-game content definitions loaded from RON files.
//!
//! Each activity kind has its own asset type and file extension
//! (`.quiz.ron`, `.match.ron`, `.site.ron`, `.slide.ron`). Loaded assets
//! are indexed into per-kind [`Library`] resources for O(1) id lookup.

use {
    bevy::prelude::*,
    bevy_common_assets::ron::RonAssetPlugin,
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
};

pub struct MinigameAssetsPlugin;

impl Plugin for MinigameAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            RonAssetPlugin::<QuizSet>::new(&["quiz.ron"]),
            RonAssetPlugin::<MatchSet>::new(&["match.ron"]),
            RonAssetPlugin::<FieldSite>::new(&["site.ron"]),
            RonAssetPlugin::<SlideSpec>::new(&["slide.ron"]),
        ))
        .init_resource::<Library<QuizSet>>()
        .init_resource::<Library<MatchSet>>()
        .init_resource::<Library<FieldSite>>()
        .init_resource::<Library<SlideSpec>>()
        .add_systems(
            Update,
            (
                index_library::<QuizSet>,
                index_library::<MatchSet>,
                index_library::<FieldSite>,
                index_library::<SlideSpec>,
            ),
        );
    }
}

/// An asset that can be looked up by its content id.
pub trait ContentAsset: Asset {
    fn content_id(&self) -> &str;
    /// Authoring problems worth a log line but not a refusal.
    fn lint(&self) -> Vec<String> {
        Vec::new()
    }
}

/// O(1) id -> handle lookup for one content asset kind.
#[derive(Resource)]
pub struct Library<A: Asset> {
    pub handles: HashMap<String, Handle<A>>,
}

impl<A: Asset> Default for Library<A> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<A: Asset> Library<A> {
    pub fn handle(&self, id: &str) -> Option<&Handle<A>> {
        self.handles.get(id)
    }
}

/// Indexes newly loaded content assets into their [`Library`].
pub fn index_library<A: ContentAsset>(
    mut events: MessageReader<AssetEvent<A>>,
    mut assets: ResMut<Assets<A>>,
    mut library: ResMut<Library<A>>,
) {
    let added_ids: Vec<_> = events
        .read()
        .filter_map(|event| {
            if let AssetEvent::Added { id } = event {
                Some(*id)
            } else {
                None
            }
        })
        .collect();

    for id in added_ids {
        let Some(asset) = assets.get(id) else {
            continue;
        };
        let content_id = asset.content_id().to_string();
        for problem in asset.lint() {
            warn!(%content_id, "content lint: {problem}");
        }
        let Some(handle) = assets.get_strong_handle(id) else {
            continue;
        };
        debug!(%content_id, "indexed content asset");
        library.handles.insert(content_id, handle);
    }
}

// --- Quiz ---

#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
pub struct QuizSet {
    pub id: String,
    /// Content unit completed by passing this quiz.
    pub unit: String,
    pub questions: Vec<Question>,
    /// Seconds the learner has per question.
    #[serde(default = "default_question_seconds")]
    pub seconds_per_question: f32,
    /// Correct answers needed to pass.
    pub pass_mark: u32,
    /// Extra score on top of per-question points when passing.
    #[serde(default)]
    pub completion_bonus: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Question {
    pub prompt: String,
    pub choices: Vec<String>,
    /// Index into `choices`.
    pub answer: usize,
    #[serde(default = "default_question_points")]
    pub points: u32,
}

fn default_question_seconds() -> f32 {
    20.0
}

fn default_question_points() -> u32 {
    10
}

impl ContentAsset for QuizSet {
    fn content_id(&self) -> &str {
        &self.id
    }

    fn lint(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.questions.is_empty() {
            problems.push("quiz has no questions".to_string());
        }
        if self.pass_mark as usize > self.questions.len() {
            problems.push("pass_mark exceeds question count".to_string());
        }
        for (index, question) in self.questions.iter().enumerate() {
            if question.answer >= question.choices.len() {
                problems.push(format!("question {index} answer index out of range"));
            }
        }
        problems
    }
}

// --- Matching ---

#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
pub struct MatchSet {
    pub id: String,
    pub unit: String,
    pub pairs: Vec<MatchPair>,
    #[serde(default = "default_pair_points")]
    pub points_per_pair: u32,
    #[serde(default)]
    pub completion_bonus: u32,
}

/// A microbe card and its matching fact card.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchPair {
    pub microbe: String,
    pub fact: String,
}

fn default_pair_points() -> u32 {
    5
}

impl ContentAsset for MatchSet {
    fn content_id(&self) -> &str {
        &self.id
    }

    fn lint(&self) -> Vec<String> {
        if self.pairs.is_empty() {
            vec!["match set has no pairs".to_string()]
        } else {
            Vec::new()
        }
    }
}

// --- Exploration ---

#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
pub struct FieldSite {
    pub id: String,
    /// The environment unit this site completes.
    pub unit: String,
    pub spots: Vec<HiddenSpot>,
    #[serde(default)]
    pub completion_bonus: u32,
}

/// A hidden organism the learner can find in the scene.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HiddenSpot {
    pub item: String,
    #[serde(default = "default_spot_points")]
    pub points: u32,
    #[serde(default)]
    pub hint: Option<String>,
}

fn default_spot_points() -> u32 {
    5
}

impl ContentAsset for FieldSite {
    fn content_id(&self) -> &str {
        &self.id
    }

    fn lint(&self) -> Vec<String> {
        if self.spots.is_empty() {
            vec!["field site has no hidden spots".to_string()]
        } else {
            Vec::new()
        }
    }
}

// --- Microscope ---

#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
pub struct SlideSpec {
    pub id: String,
    pub unit: String,
    /// Zoom levels run 1..=max_zoom.
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
    pub specimens: Vec<Specimen>,
    #[serde(default)]
    pub completion_bonus: u32,
}

/// A specimen visible only within its zoom band.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Specimen {
    pub item: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
    #[serde(default = "default_spot_points")]
    pub points: u32,
}

fn default_max_zoom() -> u8 {
    4
}

impl ContentAsset for SlideSpec {
    fn content_id(&self) -> &str {
        &self.id
    }

    fn lint(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.specimens.is_empty() {
            problems.push("slide has no specimens".to_string());
        }
        for specimen in &self.specimens {
            if specimen.min_zoom > specimen.max_zoom {
                problems.push(format!("specimen `{}` zoom band is inverted", specimen.item));
            }
            if specimen.min_zoom == 0 || specimen.max_zoom > self.max_zoom {
                problems.push(format!(
                    "specimen `{}` zoom band outside 1..={}",
                    specimen.item, self.max_zoom
                ));
            }
        }
        problems
    }
}
