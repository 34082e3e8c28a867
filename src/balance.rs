//! Game balance table
//!
//! Every mass, capacity and efficiency the solver uses lives here so a new
//! game revision only needs a new table, never a new algorithm. Values are
//! kilograms, kilometres per kilogram of fuel, or plain multipliers.

use serde::Serialize;

use crate::error::{CalcError, Result};
use crate::models::{EngineType, ModuleKind, OxidizerType};

/// Upper bound for any search limit, keeps enumeration small
pub const MAX_SEARCH_LIMIT: u32 = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balance {
    pub command_capsule_kg: f64,
    pub modules: ModuleWeights,
    pub engines: EngineTable,
    pub oxidizers: OxidizerTable,
    pub fuel_tank: TankSpec,
    pub booster: BoosterSpec,
    pub penalty: PenaltySpec,
    pub limits: SearchLimits,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleWeights {
    pub research_kg: f64,
    pub warehouse_kg: f64,
    pub gas_kg: f64,
    pub liquid_kg: f64,
    pub creature_kg: f64,
    pub visitor_room_kg: f64,
}

impl ModuleWeights {
    pub fn get(&self, kind: ModuleKind) -> f64 {
        match kind {
            ModuleKind::Research => self.research_kg,
            ModuleKind::Warehouse => self.warehouse_kg,
            ModuleKind::Gas => self.gas_kg,
            ModuleKind::Liquid => self.liquid_kg,
            ModuleKind::Creature => self.creature_kg,
            ModuleKind::VisitorRoom => self.visitor_room_kg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineSpec {
    pub mass_kg: f64,
    pub efficiency_km_per_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineTable {
    pub steam: EngineSpec,
    pub oil: EngineSpec,
    pub hydrogen: EngineSpec,
}

impl EngineTable {
    pub fn get(&self, engine: EngineType) -> &EngineSpec {
        match engine {
            EngineType::Steam => &self.steam,
            EngineType::Oil => &self.oil,
            EngineType::Hydrogen => &self.hydrogen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OxidizerSpec {
    /// Multiplier applied to the engine's efficiency
    pub efficiency: f64,
    pub tank_mass_kg: f64,
    pub tank_capacity_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OxidizerTable {
    pub solid: OxidizerSpec,
    pub liquid: OxidizerSpec,
}

impl OxidizerTable {
    pub fn get(&self, oxidizer: OxidizerType) -> &OxidizerSpec {
        match oxidizer {
            OxidizerType::Solid => &self.solid,
            OxidizerType::Liquid => &self.liquid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TankSpec {
    pub mass_kg: f64,
    pub capacity_kg: f64,
}

/// Solid fuel thruster: carries its own fuel and oxidizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoosterSpec {
    pub mass_kg: f64,
    pub fuel_kg: f64,
    pub oxidizer_kg: f64,
    pub efficiency_km_per_kg: f64,
}

impl BoosterSpec {
    pub fn loaded_mass(&self) -> f64 {
        self.mass_kg + self.fuel_kg + self.oxidizer_kg
    }

    pub fn distance_km(&self) -> f64 {
        self.fuel_kg * self.efficiency_km_per_kg
    }
}

/// Weight penalty `max(weight, (weight / divisor_kg) ^ exponent)`
///
/// This is the game's own penalty. It never drops below the total weight, so
/// even the lightest loadout pays it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PenaltySpec {
    pub divisor_kg: f64,
    pub exponent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchLimits {
    pub max_fuel_tanks: u32,
    pub max_oxidizer_tanks: u32,
    pub max_boosters: u32,
}

impl Default for Balance {
    fn default() -> Self {
        Balance {
            command_capsule_kg: 200.0,
            modules: ModuleWeights::default(),
            engines: EngineTable::default(),
            oxidizers: OxidizerTable::default(),
            fuel_tank: TankSpec::default(),
            booster: BoosterSpec::default(),
            penalty: PenaltySpec::default(),
            limits: SearchLimits::default(),
        }
    }
}

impl Default for ModuleWeights {
    fn default() -> Self {
        ModuleWeights {
            research_kg: 200.0,
            warehouse_kg: 2000.0,
            gas_kg: 2000.0,
            liquid_kg: 2000.0,
            creature_kg: 2000.0,
            visitor_room_kg: 200.0,
        }
    }
}

impl Default for EngineTable {
    fn default() -> Self {
        EngineTable {
            steam: EngineSpec {
                mass_kg: 2000.0,
                efficiency_km_per_kg: 20.0,
            },
            oil: EngineSpec {
                mass_kg: 200.0,
                efficiency_km_per_kg: 40.0,
            },
            hydrogen: EngineSpec {
                mass_kg: 500.0,
                efficiency_km_per_kg: 60.0,
            },
        }
    }
}

impl Default for OxidizerTable {
    fn default() -> Self {
        OxidizerTable {
            solid: OxidizerSpec {
                efficiency: 1.0,
                tank_mass_kg: 100.0,
                tank_capacity_kg: 900.0,
            },
            liquid: OxidizerSpec {
                efficiency: 1.33,
                tank_mass_kg: 100.0,
                tank_capacity_kg: 900.0,
            },
        }
    }
}

impl Default for TankSpec {
    fn default() -> Self {
        TankSpec {
            mass_kg: 100.0,
            capacity_kg: 900.0,
        }
    }
}

impl Default for BoosterSpec {
    fn default() -> Self {
        BoosterSpec {
            mass_kg: 200.0,
            fuel_kg: 400.0,
            oxidizer_kg: 400.0,
            efficiency_km_per_kg: 30.0,
        }
    }
}

impl Default for PenaltySpec {
    fn default() -> Self {
        PenaltySpec {
            divisor_kg: 300.0,
            exponent: 3.2,
        }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            max_fuel_tanks: 10,
            max_oxidizer_tanks: 10,
            max_boosters: 8,
        }
    }
}

fn check_mass(key: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::InvalidBalance(format!(
            "{} must be a finite non-negative number, got {}",
            key, value
        )));
    }
    Ok(())
}

fn check_positive(key: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::InvalidBalance(format!(
            "{} must be a finite positive number, got {}",
            key, value
        )));
    }
    Ok(())
}

impl Balance {
    /// Reject tables the solver cannot work with
    pub fn validate(&self) -> Result<()> {
        for (key, value) in self.entries() {
            if key.starts_with("limits.") {
                if value > MAX_SEARCH_LIMIT as f64 {
                    return Err(CalcError::InvalidBalance(format!(
                        "{} must be at most {}, got {}",
                        key, MAX_SEARCH_LIMIT, value
                    )));
                }
            } else if key.ends_with("capacity_kg")
                || key.contains("efficiency")
                || key.starts_with("penalty.")
            {
                check_positive(key, value)?;
            } else {
                check_mass(key, value)?;
            }
        }

        if self.limits.max_fuel_tanks == 0 {
            return Err(CalcError::InvalidBalance(
                "limits.max_fuel_tanks must allow at least one tank".to_string(),
            ));
        }
        if self.limits.max_oxidizer_tanks == 0 {
            return Err(CalcError::InvalidBalance(
                "limits.max_oxidizer_tanks must allow at least one tank".to_string(),
            ));
        }

        Ok(())
    }

    /// Flatten the table into dotted keys, in a stable order
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let m = &self.modules;
        let e = &self.engines;
        let o = &self.oxidizers;
        vec![
            ("command_capsule_kg", self.command_capsule_kg),
            ("modules.research_kg", m.research_kg),
            ("modules.warehouse_kg", m.warehouse_kg),
            ("modules.gas_kg", m.gas_kg),
            ("modules.liquid_kg", m.liquid_kg),
            ("modules.creature_kg", m.creature_kg),
            ("modules.visitor_room_kg", m.visitor_room_kg),
            ("engines.steam.mass_kg", e.steam.mass_kg),
            ("engines.steam.efficiency_km_per_kg", e.steam.efficiency_km_per_kg),
            ("engines.oil.mass_kg", e.oil.mass_kg),
            ("engines.oil.efficiency_km_per_kg", e.oil.efficiency_km_per_kg),
            ("engines.hydrogen.mass_kg", e.hydrogen.mass_kg),
            ("engines.hydrogen.efficiency_km_per_kg", e.hydrogen.efficiency_km_per_kg),
            ("oxidizers.solid.efficiency", o.solid.efficiency),
            ("oxidizers.solid.tank_mass_kg", o.solid.tank_mass_kg),
            ("oxidizers.solid.tank_capacity_kg", o.solid.tank_capacity_kg),
            ("oxidizers.liquid.efficiency", o.liquid.efficiency),
            ("oxidizers.liquid.tank_mass_kg", o.liquid.tank_mass_kg),
            ("oxidizers.liquid.tank_capacity_kg", o.liquid.tank_capacity_kg),
            ("fuel_tank.mass_kg", self.fuel_tank.mass_kg),
            ("fuel_tank.capacity_kg", self.fuel_tank.capacity_kg),
            ("booster.mass_kg", self.booster.mass_kg),
            ("booster.fuel_kg", self.booster.fuel_kg),
            ("booster.oxidizer_kg", self.booster.oxidizer_kg),
            ("booster.efficiency_km_per_kg", self.booster.efficiency_km_per_kg),
            ("penalty.divisor_kg", self.penalty.divisor_kg),
            ("penalty.exponent", self.penalty.exponent),
            ("limits.max_fuel_tanks", self.limits.max_fuel_tanks as f64),
            ("limits.max_oxidizer_tanks", self.limits.max_oxidizer_tanks as f64),
            ("limits.max_boosters", self.limits.max_boosters as f64),
        ]
    }

    /// Set a value by its dotted key. Returns false for unknown keys.
    pub fn set(&mut self, key: &str, value: f64) -> bool {
        if let Some(limit) = self.limit_mut(key) {
            *limit = if value.is_finite() && value > 0.0 {
                value.min(u32::MAX as f64) as u32
            } else {
                0
            };
            return true;
        }
        match self.value_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    fn limit_mut(&mut self, key: &str) -> Option<&mut u32> {
        let l = &mut self.limits;
        match key {
            "limits.max_fuel_tanks" => Some(&mut l.max_fuel_tanks),
            "limits.max_oxidizer_tanks" => Some(&mut l.max_oxidizer_tanks),
            "limits.max_boosters" => Some(&mut l.max_boosters),
            _ => None,
        }
    }

    fn value_mut(&mut self, key: &str) -> Option<&mut f64> {
        let slot = match key {
            "command_capsule_kg" => &mut self.command_capsule_kg,
            "modules.research_kg" => &mut self.modules.research_kg,
            "modules.warehouse_kg" => &mut self.modules.warehouse_kg,
            "modules.gas_kg" => &mut self.modules.gas_kg,
            "modules.liquid_kg" => &mut self.modules.liquid_kg,
            "modules.creature_kg" => &mut self.modules.creature_kg,
            "modules.visitor_room_kg" => &mut self.modules.visitor_room_kg,
            "engines.steam.mass_kg" => &mut self.engines.steam.mass_kg,
            "engines.steam.efficiency_km_per_kg" => &mut self.engines.steam.efficiency_km_per_kg,
            "engines.oil.mass_kg" => &mut self.engines.oil.mass_kg,
            "engines.oil.efficiency_km_per_kg" => &mut self.engines.oil.efficiency_km_per_kg,
            "engines.hydrogen.mass_kg" => &mut self.engines.hydrogen.mass_kg,
            "engines.hydrogen.efficiency_km_per_kg" => {
                &mut self.engines.hydrogen.efficiency_km_per_kg
            }
            "oxidizers.solid.efficiency" => &mut self.oxidizers.solid.efficiency,
            "oxidizers.solid.tank_mass_kg" => &mut self.oxidizers.solid.tank_mass_kg,
            "oxidizers.solid.tank_capacity_kg" => &mut self.oxidizers.solid.tank_capacity_kg,
            "oxidizers.liquid.efficiency" => &mut self.oxidizers.liquid.efficiency,
            "oxidizers.liquid.tank_mass_kg" => &mut self.oxidizers.liquid.tank_mass_kg,
            "oxidizers.liquid.tank_capacity_kg" => &mut self.oxidizers.liquid.tank_capacity_kg,
            "fuel_tank.mass_kg" => &mut self.fuel_tank.mass_kg,
            "fuel_tank.capacity_kg" => &mut self.fuel_tank.capacity_kg,
            "booster.mass_kg" => &mut self.booster.mass_kg,
            "booster.fuel_kg" => &mut self.booster.fuel_kg,
            "booster.oxidizer_kg" => &mut self.booster.oxidizer_kg,
            "booster.efficiency_km_per_kg" => &mut self.booster.efficiency_km_per_kg,
            "penalty.divisor_kg" => &mut self.penalty.divisor_kg,
            "penalty.exponent" => &mut self.penalty.exponent,
            _ => return None,
        };
        Some(slot)
    }
}
