//! Rocket loadout calculator
//!
//! Runs the whole pipeline: dry weight, enumeration, distance evaluation,
//! then filtering. A [`Calculator`] holds only a validated balance table, so
//! it is a pure function of its query and can be shared across threads.

use std::fmt;

use crate::balance::Balance;
use crate::distance::DistanceModel;
use crate::error::{CalcError, Result};
use crate::filter;
use crate::models::{ModuleCounts, ModuleKind, Query, Solution, SolutionSet};
use crate::search::SearchEngine;
use crate::weight;

#[derive(Debug, Clone)]
pub struct Calculator {
    balance: Balance,
}

impl Default for Calculator {
    fn default() -> Self {
        Calculator {
            balance: Balance::default(),
        }
    }
}

impl Calculator {
    /// Validate the balance table once, up front
    pub fn new(balance: Balance) -> Result<Self> {
        balance.validate()?;
        Ok(Calculator { balance })
    }

    /// Number of loadouts a query searches before filtering
    pub fn search_space(&self, query: &Query) -> usize {
        SearchEngine::new(&self.balance, query).space_size()
    }

    /// Every candidate that reaches the query's distance, unordered
    pub fn qualifying(&self, query: &Query) -> Result<Vec<Solution>> {
        if !query.distance_km.is_finite() || query.distance_km <= 0.0 {
            return Err(CalcError::InvalidQuery(query.distance_km.to_string()));
        }

        let dry_weight = weight::dry_weight(&query.modules, query.engine, &self.balance);
        let search = SearchEngine::new(&self.balance, query);
        let model = DistanceModel::new(&self.balance, query);

        Ok(search
            .enumerate()
            .map(|candidate| model.evaluate(&candidate, dry_weight))
            .filter(|solution| solution.final_distance >= query.distance_km)
            .collect())
    }

    /// Solve a query. An empty set means no loadout reaches the distance.
    pub fn calculate(&self, query: &Query) -> Result<SolutionSet> {
        let solutions = self.qualifying(query)?;
        Ok(filter::select(solutions, query.allow_waste))
    }
}

/// Format one solution as an indented block
pub fn format_solution(solution: &Solution, indent: usize) -> String {
    let mut output = String::new();
    let prefix = "  ".repeat(indent);

    output.push_str(&format!("{}Fuel tanks: {}\n", prefix, solution.fuel_count));
    if let Some(oxidizer) = solution.oxidizer_count {
        output.push_str(&format!("{}Oxidizer tanks: {}\n", prefix, oxidizer));
    }
    if solution.booster_count > 0 {
        output.push_str(&format!("{}Boosters: {}\n", prefix, solution.booster_count));
    }
    output.push_str(&format!("{}Fuel: {:.0} kg\n", prefix, solution.capacity));
    output.push_str(&format!("{}Dry weight: {:.0} kg\n", prefix, solution.dry_weight));
    output.push_str(&format!("{}Wet weight: {:.0} kg\n", prefix, solution.wet_weight));
    output.push_str(&format!("{}Total weight: {:.0} kg\n", prefix, solution.weight));
    output.push_str(&format!("{}Ideal distance: {:.0} km\n", prefix, solution.merged_distance));
    output.push_str(&format!("{}Penalty: {:.0} km\n", prefix, solution.punish));
    output.push_str(&format!("{}Final distance: {:.0} km\n", prefix, solution.final_distance));

    output
}

/// Describe the auxiliary modules, e.g. "1 research module, 2 cargo bays"
pub fn format_modules(modules: &ModuleCounts) -> String {
    if modules.total() == 0 {
        return "none".to_string();
    }
    ModuleKind::ALL
        .iter()
        .filter_map(|&kind| match modules.get(kind) {
            0 => None,
            1 => Some(format!("1 {}", kind.label())),
            n => Some(format!("{} {}s", n, kind.label())),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for SolutionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No feasible configuration reaches the requested distance.");
        }

        writeln!(
            f,
            "{:<8} {:>5} {:>9} {:>8} {:>10} {:>12}",
            "Plan", "Fuel", "Oxidizer", "Booster", "Weight", "Distance"
        )?;
        writeln!(f, "{}", "-".repeat(57))?;
        for (index, solution) in self.iter().enumerate() {
            let oxidizer = solution
                .oxidizer_count
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            writeln!(
                f,
                "{:<8} {:>5} {:>9} {:>8} {:>10.0} {:>12.0}",
                format!("Plan {}", index + 1),
                solution.fuel_count,
                oxidizer,
                solution.booster_count,
                solution.weight,
                solution.final_distance
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EngineType, ModuleCounts, OxidizerType};

    fn query(engine: EngineType, distance_km: f64) -> Query {
        Query {
            engine,
            oxidizer: OxidizerType::Solid,
            distance_km,
            allow_waste: false,
            modules: ModuleCounts::default(),
        }
    }

    #[test]
    fn steam_ten_thousand_km() {
        let set = Calculator::default()
            .calculate(&query(EngineType::Steam, 10_000.0))
            .unwrap();

        let first = set.first().unwrap();
        assert_eq!(first.fuel_count, 1);
        assert_eq!(first.booster_count, 0);
        assert_eq!(first.oxidizer_count, None);
        assert_eq!(first.final_distance, 14_800.0);
        // Adding boosters only makes it heavier, so nothing else survives
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn rejects_bad_distance() {
        let calculator = Calculator::default();
        for distance in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                calculator.calculate(&query(EngineType::Oil, distance)),
                Err(CalcError::InvalidQuery(_))
            ));
        }
    }

    #[test]
    fn rejects_degenerate_balance() {
        let mut balance = Balance::default();
        balance.engines.oil.efficiency_km_per_kg = 0.0;
        assert!(matches!(
            Calculator::new(balance),
            Err(CalcError::InvalidBalance(_))
        ));
    }

    #[test]
    fn unreachable_distance_is_empty() {
        let set = Calculator::default()
            .calculate(&query(EngineType::Oil, 10_000_000.0))
            .unwrap();
        assert!(set.is_empty());
        assert!(set.to_string().contains("No feasible configuration"));
    }

    #[test]
    fn report_lists_every_plan() {
        let mut q = query(EngineType::Hydrogen, 20_000.0);
        q.allow_waste = true;
        let set = Calculator::default().calculate(&q).unwrap();
        let report = set.to_string();
        assert!(report.contains("Plan 1"));
        assert!(report.contains(&format!("Plan {}", set.len())));
    }

    #[test]
    fn formatted_solution_skips_absent_parts() {
        let set = Calculator::default()
            .calculate(&query(EngineType::Steam, 10_000.0))
            .unwrap();
        let text = format_solution(set.first().unwrap(), 1);
        assert!(text.starts_with("  Fuel tanks: 1\n"));
        assert!(!text.contains("Oxidizer"));
        assert!(!text.contains("Boosters"));
        assert!(text.contains("Final distance: 14800 km"));
    }

    #[test]
    fn search_space_counts_every_loadout() {
        let calculator = Calculator::default();
        // 10 fuel tanks, 9 booster options
        assert_eq!(calculator.search_space(&query(EngineType::Steam, 1.0)), 90);
        // plus 10 oxidizer tank options
        assert_eq!(calculator.search_space(&query(EngineType::Oil, 1.0)), 900);
    }

    #[test]
    fn modules_are_described_by_name() {
        assert_eq!(format_modules(&ModuleCounts::default()), "none");

        let modules = ModuleCounts {
            research: 1,
            warehouse: 2,
            ..ModuleCounts::default()
        };
        assert_eq!(format_modules(&modules), "1 research module, 2 cargo bays");
    }
}
