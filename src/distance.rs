//! Converts a candidate loadout into distance figures

use crate::balance::{Balance, BoosterSpec, EngineSpec, OxidizerSpec, PenaltySpec};
use crate::models::{Query, RawCandidate, Solution};

pub struct DistanceModel {
    engine: EngineSpec,
    oxidizer: Option<OxidizerSpec>,
    booster: BoosterSpec,
    penalty: PenaltySpec,
}

impl DistanceModel {
    pub fn new(balance: &Balance, query: &Query) -> Self {
        DistanceModel {
            engine: *balance.engines.get(query.engine),
            oxidizer: query
                .effective_oxidizer()
                .map(|oxidizer| *balance.oxidizers.get(oxidizer)),
            booster: balance.booster,
            penalty: balance.penalty,
        }
    }

    /// Fuel that can actually be burned, limited by oxidizer on board
    pub fn burnable_fuel(&self, candidate: &RawCandidate) -> f64 {
        match (self.oxidizer, candidate.oxidizer_count) {
            (Some(spec), Some(count)) => candidate.capacity.min(count as f64 * spec.tank_capacity_kg),
            (Some(_), None) => 0.0,
            (None, _) => candidate.capacity,
        }
    }

    /// Ideal distance before the weight penalty
    pub fn merged_distance(&self, candidate: &RawCandidate) -> f64 {
        let oxidizer_efficiency = self.oxidizer.map_or(1.0, |spec| spec.efficiency);
        let engine_km =
            self.burnable_fuel(candidate) * self.engine.efficiency_km_per_kg * oxidizer_efficiency;
        let booster_km = candidate.booster_count as f64 * self.booster.distance_km();
        engine_km + booster_km
    }

    /// Distance lost to the rocket's total weight, never less than the weight
    pub fn punish(&self, weight: f64) -> f64 {
        let curve = (weight / self.penalty.divisor_kg).powf(self.penalty.exponent);
        weight.max(curve).max(0.0)
    }

    pub fn evaluate(&self, candidate: &RawCandidate, dry_weight: f64) -> Solution {
        let weight = dry_weight + candidate.wet_weight;
        let merged_distance = self.merged_distance(candidate);
        let punish = self.punish(weight);

        Solution {
            fuel_count: candidate.fuel_count,
            oxidizer_count: candidate.oxidizer_count,
            booster_count: candidate.booster_count,
            capacity: candidate.capacity,
            dry_weight,
            wet_weight: candidate.wet_weight,
            weight,
            merged_distance,
            punish,
            final_distance: (merged_distance - punish).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EngineType, ModuleCounts, OxidizerType};

    fn query(engine: EngineType, oxidizer: OxidizerType) -> Query {
        Query {
            engine,
            oxidizer,
            distance_km: 10_000.0,
            allow_waste: false,
            modules: ModuleCounts::default(),
        }
    }

    fn candidate(fuel: u32, oxidizer: Option<u32>, booster: u32) -> RawCandidate {
        RawCandidate {
            fuel_count: fuel,
            oxidizer_count: oxidizer,
            booster_count: booster,
            capacity: fuel as f64 * 900.0,
            wet_weight: (fuel + oxidizer.unwrap_or(0) + booster) as f64 * 1000.0,
        }
    }

    #[test]
    fn single_tank_steam_rocket() {
        let model = DistanceModel::new(&Balance::default(), &query(EngineType::Steam, OxidizerType::Solid));
        let solution = model.evaluate(&candidate(1, None, 0), 2200.0);

        assert_eq!(solution.weight, 3200.0);
        assert_eq!(solution.merged_distance, 18_000.0);
        // Below 4000 kg the linear term dominates the curve
        assert_eq!(solution.punish, 3200.0);
        assert_eq!(solution.final_distance, 14_800.0);
    }

    #[test]
    fn oxidizer_limits_burnable_fuel() {
        let model = DistanceModel::new(&Balance::default(), &query(EngineType::Oil, OxidizerType::Solid));
        assert_eq!(model.burnable_fuel(&candidate(3, Some(1), 0)), 900.0);
        assert_eq!(model.burnable_fuel(&candidate(1, Some(3), 0)), 900.0);
        assert_eq!(model.merged_distance(&candidate(2, Some(2), 0)), 1800.0 * 40.0);
    }

    #[test]
    fn liquid_oxidizer_is_more_efficient() {
        let balance = Balance::default();
        let solid = DistanceModel::new(&balance, &query(EngineType::Hydrogen, OxidizerType::Solid));
        let liquid = DistanceModel::new(&balance, &query(EngineType::Hydrogen, OxidizerType::Liquid));
        let c = candidate(2, Some(2), 0);
        assert!(liquid.merged_distance(&c) > solid.merged_distance(&c));
    }

    #[test]
    fn steam_ignores_oxidizer_choice() {
        let balance = Balance::default();
        let solid = DistanceModel::new(&balance, &query(EngineType::Steam, OxidizerType::Solid));
        let liquid = DistanceModel::new(&balance, &query(EngineType::Steam, OxidizerType::Liquid));
        let c = candidate(3, None, 1);
        assert_eq!(solid.evaluate(&c, 2200.0), liquid.evaluate(&c, 2200.0));
    }

    #[test]
    fn boosters_add_fixed_range() {
        let model = DistanceModel::new(&Balance::default(), &query(EngineType::Steam, OxidizerType::Solid));
        let without = model.merged_distance(&candidate(1, None, 0));
        let with = model.merged_distance(&candidate(1, None, 2));
        assert_eq!(with - without, 24_000.0);
    }

    #[test]
    fn heavy_rockets_follow_the_curve() {
        let model = DistanceModel::new(&Balance::default(), &query(EngineType::Steam, OxidizerType::Solid));
        let weight = 12_000.0;
        let expected = (weight / 300.0_f64).powf(3.2);
        assert!(expected > weight);
        assert_eq!(model.punish(weight), expected);
    }

    #[test]
    fn light_rockets_pay_their_weight() {
        let model = DistanceModel::new(&Balance::default(), &query(EngineType::Oil, OxidizerType::Solid));
        for weight in [200.0, 1_000.0, 3_000.0] {
            assert!((weight / 300.0_f64).powf(3.2) < weight);
            assert_eq!(model.punish(weight), weight);
        }
    }

    #[test]
    fn final_distance_never_negative() {
        let model = DistanceModel::new(&Balance::default(), &query(EngineType::Steam, OxidizerType::Solid));
        let solution = model.evaluate(&candidate(1, None, 0), 40_000.0);
        assert!(solution.punish > solution.merged_distance);
        assert_eq!(solution.final_distance, 0.0);
    }
}
