//! Dry weight of a rocket

use crate::balance::Balance;
use crate::models::{EngineType, ModuleCounts, ModuleKind};

/// Rocket mass without tanks, boosters or propellant, in kg
///
/// Command capsule and engine plus every mounted auxiliary module.
pub fn dry_weight(modules: &ModuleCounts, engine: EngineType, balance: &Balance) -> f64 {
    let module_mass: f64 = ModuleKind::ALL
        .iter()
        .map(|&kind| modules.get(kind) as f64 * balance.modules.get(kind))
        .sum();

    balance.command_capsule_kg + balance.engines.get(engine).mass_kg + module_mass
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_rocket_is_capsule_plus_engine() {
        let balance = Balance::default();
        let modules = ModuleCounts::default();
        assert_eq!(dry_weight(&modules, EngineType::Steam, &balance), 2200.0);
        assert_eq!(dry_weight(&modules, EngineType::Oil, &balance), 400.0);
        assert_eq!(dry_weight(&modules, EngineType::Hydrogen, &balance), 700.0);
    }

    #[test]
    fn modules_add_linearly() {
        let balance = Balance::default();
        let modules = ModuleCounts {
            research: 1,
            warehouse: 2,
            visitor_room: 1,
            ..ModuleCounts::default()
        };
        // 200 + 2 * 2000 + 200 on top of capsule and oil engine
        assert_eq!(dry_weight(&modules, EngineType::Oil, &balance), 400.0 + 4400.0);
    }

    #[test]
    fn uses_injected_unit_weights() {
        let mut balance = Balance::default();
        balance.modules.creature_kg = 1.5;
        balance.command_capsule_kg = 0.0;
        balance.engines.steam.mass_kg = 0.0;
        let modules = ModuleCounts {
            creature: 4,
            ..ModuleCounts::default()
        };
        assert_eq!(dry_weight(&modules, EngineType::Steam, &balance), 6.0);
    }
}
