//! Data models for rocket queries and solutions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineType {
    #[default]
    Steam,
    Oil,
    Hydrogen,
}

impl EngineType {
    pub const ALL: [EngineType; 3] = [EngineType::Steam, EngineType::Oil, EngineType::Hydrogen];

    /// Steam engines burn steam on its own; the others need an oxidizer.
    pub fn uses_oxidizer(self) -> bool {
        !matches!(self, EngineType::Steam)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EngineType::Steam => "steam",
            EngineType::Oil => "oil",
            EngineType::Hydrogen => "hydrogen",
        }
    }
}

impl FromStr for EngineType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "steam" => Ok(EngineType::Steam),
            "oil" | "petroleum" | "kerosene" => Ok(EngineType::Oil),
            "hydrogen" => Ok(EngineType::Hydrogen),
            other => Err(format!("unknown engine type '{}'", other)),
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OxidizerType {
    #[default]
    Solid,
    Liquid,
}

impl OxidizerType {
    pub const ALL: [OxidizerType; 2] = [OxidizerType::Solid, OxidizerType::Liquid];

    pub fn as_str(self) -> &'static str {
        match self {
            OxidizerType::Solid => "solid",
            OxidizerType::Liquid => "liquid",
        }
    }
}

impl FromStr for OxidizerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" | "oxylite" => Ok(OxidizerType::Solid),
            "liquid" | "lox" => Ok(OxidizerType::Liquid),
            other => Err(format!("unknown oxidizer type '{}'", other)),
        }
    }
}

impl fmt::Display for OxidizerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auxiliary modules that only add dead weight to the rocket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Research,
    Warehouse,
    Gas,
    Liquid,
    Creature,
    VisitorRoom,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 6] = [
        ModuleKind::Research,
        ModuleKind::Warehouse,
        ModuleKind::Gas,
        ModuleKind::Liquid,
        ModuleKind::Creature,
        ModuleKind::VisitorRoom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ModuleKind::Research => "research module",
            ModuleKind::Warehouse => "cargo bay",
            ModuleKind::Gas => "gas cargo canister",
            ModuleKind::Liquid => "liquid cargo tank",
            ModuleKind::Creature => "biological cargo bay",
            ModuleKind::VisitorRoom => "sight-seeing module",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModuleCounts {
    pub research: u32,
    pub warehouse: u32,
    pub gas: u32,
    pub liquid: u32,
    pub creature: u32,
    pub visitor_room: u32,
}

impl ModuleCounts {
    pub fn get(&self, kind: ModuleKind) -> u32 {
        match kind {
            ModuleKind::Research => self.research,
            ModuleKind::Warehouse => self.warehouse,
            ModuleKind::Gas => self.gas,
            ModuleKind::Liquid => self.liquid,
            ModuleKind::Creature => self.creature,
            ModuleKind::VisitorRoom => self.visitor_room,
        }
    }

    pub fn set(&mut self, kind: ModuleKind, count: u32) {
        let slot = match kind {
            ModuleKind::Research => &mut self.research,
            ModuleKind::Warehouse => &mut self.warehouse,
            ModuleKind::Gas => &mut self.gas,
            ModuleKind::Liquid => &mut self.liquid,
            ModuleKind::Creature => &mut self.creature,
            ModuleKind::VisitorRoom => &mut self.visitor_room,
        };
        *slot = count;
    }

    pub fn total(&self) -> u32 {
        ModuleKind::ALL.iter().map(|&kind| self.get(kind)).sum()
    }
}

/// A normalized rocket query
///
/// Built fresh for every submit or history replay. `distance_km` is always
/// positive when produced by [`crate::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub engine: EngineType,
    pub oxidizer: OxidizerType,
    pub distance_km: f64,
    pub allow_waste: bool,
    pub modules: ModuleCounts,
}

impl Query {
    /// Oxidizer that actually takes part in the burn, if any
    pub fn effective_oxidizer(&self) -> Option<OxidizerType> {
        self.engine.uses_oxidizer().then_some(self.oxidizer)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.effective_oxidizer() {
            Some(oxidizer) => write!(f, "[{} - {}]", self.engine, oxidizer)?,
            None => write!(f, "[{}]", self.engine)?,
        }
        write!(f, " {} KM", self.distance_km)?;
        if self.allow_waste {
            write!(f, " (waste allowed)")?;
        }
        Ok(())
    }
}

/// Unvalidated field values as collected by a form or the command line
#[derive(Debug, Clone, Default)]
pub struct RawQuery {
    pub engine: Option<String>,
    pub oxidizer: Option<String>,
    pub distance: Option<String>,
    pub allow_waste: Option<String>,
    pub research: Option<String>,
    pub warehouse: Option<String>,
    pub gas: Option<String>,
    pub liquid: Option<String>,
    pub creature: Option<String>,
    pub visitor_room: Option<String>,
}

impl RawQuery {
    pub fn module(&self, kind: ModuleKind) -> Option<&str> {
        let field = match kind {
            ModuleKind::Research => &self.research,
            ModuleKind::Warehouse => &self.warehouse,
            ModuleKind::Gas => &self.gas,
            ModuleKind::Liquid => &self.liquid,
            ModuleKind::Creature => &self.creature,
            ModuleKind::VisitorRoom => &self.visitor_room,
        };
        field.as_deref()
    }
}

/// One enumerated loadout before distance evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawCandidate {
    pub fuel_count: u32,
    pub oxidizer_count: Option<u32>,
    pub booster_count: u32,
    /// Fuel mass carried in kg
    pub capacity: f64,
    /// Mass of tanks, boosters and everything loaded into them, in kg
    pub wet_weight: f64,
}

/// A loadout with its weight and distance figures
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub fuel_count: u32,
    pub oxidizer_count: Option<u32>,
    pub booster_count: u32,
    pub capacity: f64,
    pub dry_weight: f64,
    pub wet_weight: f64,
    pub weight: f64,
    pub merged_distance: f64,
    pub punish: f64,
    pub final_distance: f64,
}

/// Ordered list of qualifying solutions, lightest first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolutionSet(Vec<Solution>);

impl SolutionSet {
    pub fn new(solutions: Vec<Solution>) -> Self {
        SolutionSet(solutions)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&Solution> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Solution> {
        self.0.iter()
    }

}

impl<'a> IntoIterator for &'a SolutionSet {
    type Item = &'a Solution;
    type IntoIter = std::slice::Iter<'a, Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
