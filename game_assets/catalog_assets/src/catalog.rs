use {
    crate::{AchievementDef, CatalogSource, PredicateNode, UnitDef, UnitKind},
    bevy::prelude::*,
    std::collections::{HashMap, HashSet},
    thiserror::Error,
};

/// Problems found while validating a [`CatalogSource`]. All of these are
/// content-authoring bugs; the game refuses to start on them rather than
/// failing at play time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate unit id `{0}`")]
    DuplicateUnit(String),
    #[error("unit `{unit}` requires unknown unit `{requirement}`")]
    UnknownRequirement { unit: String, requirement: String },
    #[error("unit `{0}` requires itself")]
    SelfRequirement(String),
    #[error("event `{unit}` references unknown era `{era}`")]
    UnknownEra { unit: String, era: String },
    #[error("event `{unit}` parent `{era}` is not an era")]
    NotAnEra { unit: String, era: String },
    #[error("environment `{0}` has an empty microbe roster")]
    EmptyEnvironment(String),
    #[error("duplicate achievement id `{0}`")]
    DuplicateAchievement(String),
    #[error("achievement `{achievement}` references unknown unit `{unit}`")]
    UnknownPredicateUnit { achievement: String, unit: String },
}

/// Validated content catalog. Built once during loading, read-only after.
#[derive(Resource, Debug, Default, Clone)]
pub struct ContentCatalog {
    units: HashMap<String, UnitDef>,
    /// Unit ids sorted by (order, id) for stable iteration.
    ordered: Vec<String>,
    achievements: Vec<AchievementDef>,
}

impl ContentCatalog {
    pub fn from_source(source: &CatalogSource) -> Result<Self, CatalogError> {
        let mut units = HashMap::new();
        for unit in &source.units {
            if units.insert(unit.id.clone(), unit.clone()).is_some() {
                return Err(CatalogError::DuplicateUnit(unit.id.clone()));
            }
        }

        for unit in &source.units {
            for requirement in &unit.requires {
                if requirement == &unit.id {
                    return Err(CatalogError::SelfRequirement(unit.id.clone()));
                }
                if !units.contains_key(requirement) {
                    return Err(CatalogError::UnknownRequirement {
                        unit: unit.id.clone(),
                        requirement: requirement.clone(),
                    });
                }
            }
            match &unit.kind {
                UnitKind::Event { era } => match units.get(era) {
                    None => {
                        return Err(CatalogError::UnknownEra {
                            unit: unit.id.clone(),
                            era: era.clone(),
                        });
                    }
                    Some(parent) if parent.kind != UnitKind::Era => {
                        return Err(CatalogError::NotAnEra {
                            unit: unit.id.clone(),
                            era: era.clone(),
                        });
                    }
                    Some(_) => {}
                },
                UnitKind::Environment { microbes } if microbes.is_empty() => {
                    return Err(CatalogError::EmptyEnvironment(unit.id.clone()));
                }
                _ => {}
            }
        }

        let mut seen = HashSet::new();
        for achievement in &source.achievements {
            if !seen.insert(achievement.id.as_str()) {
                return Err(CatalogError::DuplicateAchievement(achievement.id.clone()));
            }
            check_predicate_units(&achievement.id, &achievement.predicate, &units)?;
        }

        let mut ordered: Vec<String> = units.keys().cloned().collect();
        ordered.sort_by_key(|id| (units[id].order, id.clone()));

        let catalog = Self {
            units,
            ordered,
            achievements: source.achievements.clone(),
        };
        catalog.warn_unreachable();
        Ok(catalog)
    }

    pub fn contains(&self, unit_id: &str) -> bool {
        self.units.contains_key(unit_id)
    }

    pub fn unit(&self, unit_id: &str) -> Option<&UnitDef> {
        self.units.get(unit_id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// All units in stable (order, id) order.
    pub fn units(&self) -> impl Iterator<Item = &UnitDef> {
        self.ordered.iter().map(|id| &self.units[id])
    }

    /// Events belonging to the given era, in stable order.
    pub fn children_of<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a UnitDef> {
        self.units()
            .filter(move |unit| matches!(&unit.kind, UnitKind::Event { era } if era.as_str() == parent))
    }

    pub fn achievements(&self) -> &[AchievementDef] {
        &self.achievements
    }

    /// Flags units that can never unlock because some (transitive)
    /// requirement is itself unreachable - usually a requirement cycle.
    /// Content bug, not a load failure.
    fn warn_unreachable(&self) {
        let mut reachable: HashSet<&str> = HashSet::new();
        loop {
            let before = reachable.len();
            for unit in self.units.values() {
                if unit.requires.iter().all(|r| reachable.contains(r.as_str())) {
                    reachable.insert(unit.id.as_str());
                }
            }
            if reachable.len() == before {
                break;
            }
        }
        for id in &self.ordered {
            if !reachable.contains(id.as_str()) {
                warn!(unit_id = %id, "unit can never unlock, check its requirements");
            }
        }
    }
}

fn check_predicate_units(
    achievement: &str,
    node: &PredicateNode,
    units: &HashMap<String, UnitDef>,
) -> Result<(), CatalogError> {
    match node {
        PredicateNode::All(nodes) | PredicateNode::Any(nodes) => {
            for node in nodes {
                check_predicate_units(achievement, node, units)?;
            }
        }
        PredicateNode::Not(node) => check_predicate_units(achievement, node, units)?,
        PredicateNode::CompletedUnit(unit) | PredicateNode::CompletedAllOf { parent: unit } => {
            if !units.contains_key(unit) {
                return Err(CatalogError::UnknownPredicateUnit {
                    achievement: achievement.to_string(),
                    unit: unit.clone(),
                });
            }
        }
        PredicateNode::CompletedAtLeast { .. }
        | PredicateNode::PointsAtLeast { .. }
        | PredicateNode::DiscoveredAtLeast { .. }
        | PredicateNode::CounterAtLeast { .. } => {}
    }
    Ok(())
}
