//! C# source code extraction for ONI rocket balance data
//!
//! Parses decompiled C# source from Assembly-CSharp.dll. Rocket part configs
//! (`*Config.cs`) give masses, engine efficiencies and tank capacities,
//! either as literals or as references into the TUNING tables, which are
//! collected from every file first.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use rusqlite::Connection;
use walkdir::WalkDir;

use crate::db::{self, BalanceEntry};

/// Balance keys a rocket part config can fill in
struct PartKeys {
    mass: Option<&'static str>,
    efficiency: Option<&'static str>,
    capacity: &'static [&'static str],
}

const fn mass_only(key: &'static str) -> PartKeys {
    PartKeys {
        mass: Some(key),
        efficiency: None,
        capacity: &[],
    }
}

const PARTS: &[(&str, PartKeys)] = &[
    ("CommandModule", mass_only("command_capsule_kg")),
    ("ResearchModule", mass_only("modules.research_kg")),
    ("CargoBay", mass_only("modules.warehouse_kg")),
    ("GasCargoBay", mass_only("modules.gas_kg")),
    ("LiquidCargoBay", mass_only("modules.liquid_kg")),
    ("SpecialCargoBay", mass_only("modules.creature_kg")),
    ("TouristModule", mass_only("modules.visitor_room_kg")),
    (
        "SteamEngine",
        PartKeys {
            mass: Some("engines.steam.mass_kg"),
            efficiency: Some("engines.steam.efficiency_km_per_kg"),
            capacity: &[],
        },
    ),
    (
        "KeroseneEngine",
        PartKeys {
            mass: Some("engines.oil.mass_kg"),
            efficiency: Some("engines.oil.efficiency_km_per_kg"),
            capacity: &[],
        },
    ),
    (
        "HydrogenEngine",
        PartKeys {
            mass: Some("engines.hydrogen.mass_kg"),
            efficiency: Some("engines.hydrogen.efficiency_km_per_kg"),
            capacity: &[],
        },
    ),
    (
        "LiquidFuelTank",
        PartKeys {
            mass: Some("fuel_tank.mass_kg"),
            efficiency: None,
            capacity: &["fuel_tank.capacity_kg"],
        },
    ),
    (
        "OxidizerTank",
        PartKeys {
            mass: Some("oxidizers.solid.tank_mass_kg"),
            efficiency: None,
            capacity: &["oxidizers.solid.tank_capacity_kg"],
        },
    ),
    (
        "OxidizerTankLiquid",
        PartKeys {
            mass: Some("oxidizers.liquid.tank_mass_kg"),
            efficiency: None,
            capacity: &["oxidizers.liquid.tank_capacity_kg"],
        },
    ),
    (
        // Holds the same mass of iron and oxylite
        "SolidBooster",
        PartKeys {
            mass: Some("booster.mass_kg"),
            efficiency: Some("booster.efficiency_km_per_kg"),
            capacity: &["booster.fuel_kg", "booster.oxidizer_kg"],
        },
    ),
];

fn part_keys(id: &str) -> Option<&'static PartKeys> {
    PARTS.iter().find(|(part, _)| *part == id).map(|(_, keys)| keys)
}

/// Float constants from the TUNING classes, keyed `CLASS.NAME`
#[derive(Debug, Default)]
pub struct TuningTables {
    /// Mass arrays, summed (a building's mass is the sum of its materials)
    pub arrays: HashMap<String, f64>,
    pub scalars: HashMap<String, f64>,
}

/// Balance values recognised in one config file
#[derive(Debug, Default)]
struct ExtractedPart {
    id: String,
    values: Vec<(&'static str, f64)>,
}

/// Find every C# file below the decompiled source directory
pub fn find_source_files(decompiled_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(decompiled_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "cs") {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn parse_float(literal: &str) -> Option<f64> {
    literal.trim().trim_end_matches(['f', 'F']).parse().ok()
}

fn sum_floats(list: &str) -> Option<f64> {
    let mut total = 0.0;
    let mut any = false;
    for item in list.split(',').filter(|s| !s.trim().is_empty()) {
        total += parse_float(item)?;
        any = true;
    }
    any.then_some(total)
}

/// `BUILDINGS.ROCKETRY_MASS_KG.HOLLOW_TIER2` -> `ROCKETRY_MASS_KG.HOLLOW_TIER2`
fn tuning_key(expr: &str) -> Option<String> {
    let mut parts = expr.trim().rsplit('.');
    let name = parts.next()?;
    let class = parts.next()?;
    Some(format!("{}.{}", class, name))
}

/// Body of every class as (opening brace, closing brace, name)
///
/// Braces are matched by depth, so a constant after a nested class closes is
/// filed under the outer class. Braces inside strings or comments are not
/// skipped. A class left open at end of file runs to the end.
fn class_scopes<'a>(content: &str, classes: &[(usize, &'a str)]) -> Vec<(usize, usize, &'a str)> {
    let mut scopes = Vec::new();
    let mut open: Vec<(usize, Option<&'a str>)> = Vec::new();
    let mut declarations = classes.iter().peekable();
    let mut pending = None;

    for (pos, ch) in content.char_indices() {
        while let Some(&&(start, name)) = declarations.peek() {
            if start > pos {
                break;
            }
            pending = Some(name);
            declarations.next();
        }
        match ch {
            '{' => open.push((pos, pending.take())),
            '}' => {
                if let Some((start, Some(name))) = open.pop() {
                    scopes.push((start, pos, name));
                }
            }
            _ => {}
        }
    }

    scopes.extend(
        open.into_iter()
            .filter_map(|(start, name)| Some((start, content.len(), name?))),
    );
    scopes
}

/// Collect TUNING constants from one file into the tables
pub fn scan_tuning(content: &str, tables: &mut TuningTables) -> Result<()> {
    let class_re = Regex::new(r"\bclass\s+(\w+)")?;
    let classes: Vec<(usize, &str)> = class_re
        .captures_iter(content)
        .filter_map(|cap| Some((cap.get(0)?.start(), cap.get(1)?.as_str())))
        .collect();

    let scopes = class_scopes(content, &classes);
    let enclosing = |pos: usize| {
        scopes
            .iter()
            .filter(|(open, close, _)| *open < pos && pos < *close)
            .max_by_key(|(open, _, _)| *open)
            .map(|(_, _, name)| *name)
    };

    // Pattern: public static float[] COMMAND_MODULE_MASS = new float[] { 200f };
    let array_re = Regex::new(
        r"static\s+(?:readonly\s+)?float\[\]\s+(\w+)\s*=\s*new\s+float\[\]\s*\{([^}]*)\}",
    )?;
    for cap in array_re.captures_iter(content) {
        let Some(whole) = cap.get(0) else {
            continue;
        };
        if let (Some(class), Some(sum)) = (enclosing(whole.start()), sum_floats(&cap[2])) {
            tables.arrays.insert(format!("{}.{}", class, &cap[1]), sum);
        }
    }

    // Pattern: public const float MEDIUM = 40f;
    let scalar_re =
        Regex::new(r"(?:static|const)\s+(?:readonly\s+)?float\s+(\w+)\s*=\s*([\d.]+)[fF]?\s*;")?;
    for cap in scalar_re.captures_iter(content) {
        let Some(whole) = cap.get(0) else {
            continue;
        };
        if let (Some(class), Some(value)) = (enclosing(whole.start()), parse_float(&cap[2])) {
            tables.scalars.insert(format!("{}.{}", class, &cap[1]), value);
        }
    }

    Ok(())
}

/// Resolve a literal (`40f`) or a TUNING reference to a scalar
fn resolve_scalar(expr: &str, tuning: &TuningTables) -> Option<f64> {
    parse_float(expr).or_else(|| tuning.scalars.get(&tuning_key(expr)?).copied())
}

fn resolve_array(expr: &str, tuning: &TuningTables) -> Option<f64> {
    tuning.arrays.get(&tuning_key(expr)?).copied()
}

/// Find the building ID of a config file
fn parse_building_id(content: &str) -> Result<Option<String>> {
    // Pattern 1: public const string ID = "KeroseneEngine";
    let const_id_re = Regex::new(r#"(?:public\s+)?const\s+string\s+ID\s*=\s*"(\w+)""#)?;
    if let Some(cap) = const_id_re.captures(content) {
        return Ok(Some(cap[1].to_string()));
    }

    // Pattern 2: direct string in CreateBuildingDef("KeroseneEngine", ...)
    let direct_id_re = Regex::new(r#"CreateBuildingDef\s*\(\s*"(\w+)""#)?;
    Ok(direct_id_re
        .captures(content)
        .map(|cap| cap[1].to_string()))
}

/// Find the construction mass passed to CreateBuildingDef
fn parse_mass(content: &str, tuning: &TuningTables) -> Result<Option<f64>> {
    let call_re = Regex::new(r"CreateBuildingDef\s*\(([^;]*)\)\s*;")?;
    let Some(call) = call_re.captures(content) else {
        return Ok(None);
    };
    let args = &call[1];

    // Literal: ..., new float[] { 200f }, ...
    let literal_re = Regex::new(r"new\s+float\[\]\s*\{([^}]*)\}")?;
    if let Some(cap) = literal_re.captures(args) {
        return Ok(sum_floats(&cap[1]));
    }

    // Tuning reference: ..., BUILDINGS.ROCKETRY_MASS_KG.DENSE_TIER0, ...
    let tuning_re = Regex::new(r"((?:\w+\.)*(?:ROCKETRY_MASS_KG|CONSTRUCTION_MASS_KG)\.\w+)")?;
    if let Some(cap) = tuning_re.captures(args) {
        return Ok(resolve_array(&cap[1], tuning));
    }

    // Local variable declared earlier in the method
    // Pattern: float[] engineMassLarge = BUILDINGS.ROCKETRY_MASS_KG.ENGINE_MASS_LARGE;
    let local_re = Regex::new(r"float\[\]\s+(\w+)\s*=\s*([^;]+);")?;
    for cap in local_re.captures_iter(content) {
        let name_re = Regex::new(&format!(r"\b{}\b", regex::escape(&cap[1])))?;
        if !name_re.is_match(args) {
            continue;
        }
        let value = match literal_re.captures(&cap[2]) {
            Some(lit) => sum_floats(&lit[1]),
            None => resolve_array(&cap[2], tuning),
        };
        if value.is_some() {
            return Ok(value);
        }
    }

    Ok(None)
}

/// Parse a single rocket part config
fn parse_part_config(content: &str, tuning: &TuningTables) -> Result<Option<ExtractedPart>> {
    let Some(id) = parse_building_id(content)? else {
        return Ok(None);
    };
    let Some(keys) = part_keys(&id) else {
        return Ok(None);
    };

    let mut part = ExtractedPart {
        id,
        values: Vec::new(),
    };

    if let Some(key) = keys.mass {
        if let Some(mass) = parse_mass(content, tuning)? {
            part.values.push((key, mass));
        }
    }

    // Pattern: rocketEngine.efficiency = ROCKETRY.ENGINE_EFFICIENCY.MEDIUM;
    if let Some(key) = keys.efficiency {
        let efficiency_re = Regex::new(r"\.efficiency\s*=\s*([^;]+);")?;
        if let Some(value) = efficiency_re
            .captures(content)
            .and_then(|cap| resolve_scalar(&cap[1], tuning))
        {
            part.values.push((key, value));
        }
    }

    // Pattern: storage.capacityKg = 900f;
    if !keys.capacity.is_empty() {
        let capacity_re = Regex::new(r"capacityKg\s*=\s*([^;]+);")?;
        if let Some(value) = capacity_re
            .captures(content)
            .and_then(|cap| resolve_scalar(&cap[1], tuning))
        {
            for &key in keys.capacity {
                part.values.push((key, value));
            }
        }
    }

    Ok(Some(part))
}

/// Extract rocket balance data from decompiled source and store it as overrides
pub fn extract_to_database(conn: &Connection, decompiled_dir: &Path) -> Result<ExtractStats> {
    let mut stats = ExtractStats::default();

    println!("Scanning {} for C# sources...", decompiled_dir.display());
    let files = find_source_files(decompiled_dir)?;
    println!("Found {} source files", files.len());

    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        match fs::read_to_string(&path) {
            Ok(content) => sources.push((path, content)),
            Err(e) => {
                eprintln!("  Error reading {}: {}", path.display(), e);
                stats.errors += 1;
            }
        }
    }

    let mut tuning = TuningTables::default();
    for (_, content) in &sources {
        scan_tuning(content, &mut tuning)?;
    }
    println!(
        "Collected {} tuning arrays and {} tuning scalars",
        tuning.arrays.len(),
        tuning.scalars.len()
    );

    for (path, content) in &sources {
        let is_config = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with("Config.cs"));
        if !is_config {
            continue;
        }

        match parse_part_config(content, &tuning) {
            Ok(Some(part)) => {
                let source = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string);

                for (key, value) in &part.values {
                    db::upsert_entry(
                        conn,
                        &BalanceEntry {
                            key: key.to_string(),
                            value: *value,
                            source: source.clone(),
                        },
                    )
                    .with_context(|| format!("Failed to store {} from {}", key, path.display()))?;
                }

                stats.parts += 1;
                stats.values += part.values.len();

                println!("  Parsed: {} ({} values)", part.id, part.values.len());
            }
            Ok(None) => {
                // Not a rocket part we know
                stats.skipped += 1;
            }
            Err(e) => {
                eprintln!("  Error parsing {}: {}", path.display(), e);
                stats.errors += 1;
            }
        }
    }

    Ok(stats)
}

#[derive(Debug, Default)]
pub struct ExtractStats {
    pub parts: usize,
    pub values: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl std::fmt::Display for ExtractStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Extracted {} rocket parts ({} values). Skipped: {}, Errors: {}",
            self.parts, self.values, self.skipped, self.errors
        )
    }
}
