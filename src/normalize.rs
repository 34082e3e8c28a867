//! Turns raw form values into a well-typed [`Query`]
//!
//! Sloppy input is coerced rather than rejected. The only refusal is a
//! distance that is not a positive finite number.

use crate::error::{CalcError, Result};
use crate::models::{EngineType, ModuleCounts, ModuleKind, OxidizerType, Query, RawQuery};

/// Distance used when the form leaves the field untouched
pub const DEFAULT_DISTANCE_KM: f64 = 10_000.0;

/// Normalize raw field values into a query
pub fn normalize(raw: &RawQuery) -> Result<Query> {
    let engine: EngineType = raw
        .engine
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    // Kept even for steam engines, where it has no effect
    let oxidizer: OxidizerType = raw
        .oxidizer
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    let mut modules = ModuleCounts::default();
    for kind in ModuleKind::ALL {
        modules.set(kind, parse_count(raw.module(kind)));
    }

    Ok(Query {
        engine,
        oxidizer,
        distance_km: parse_distance(raw.distance.as_deref())?,
        allow_waste: raw.allow_waste.as_deref().is_some_and(parse_flag),
        modules,
    })
}

/// Parse a module count, clamping anything unusable to zero
pub fn parse_count(value: Option<&str>) -> u32 {
    let Some(value) = value else {
        return 0;
    };
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => n.floor().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

/// Parse the requested distance in kilometres
pub fn parse_distance(value: Option<&str>) -> Result<f64> {
    let Some(value) = value else {
        return Ok(DEFAULT_DISTANCE_KM);
    };
    match value.trim().parse::<f64>() {
        Ok(d) if d.is_finite() && d > 0.0 => Ok(d),
        _ => Err(CalcError::InvalidQuery(value.to_string())),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on" | "checked"
    )
}
