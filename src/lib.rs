//! ONI Rocket Calculator
//!
//! Plans fuel tank, oxidizer tank and booster counts for an Oxygen Not
//! Included rocket so that it reaches a requested distance.

pub mod balance;
pub mod calculator;
pub mod config;
pub mod controller;
pub mod db;
pub mod distance;
pub mod error;
pub mod extract;
pub mod filter;
pub mod history;
pub mod models;
pub mod normalize;
pub mod search;
pub mod weight;

pub use balance::Balance;
pub use calculator::Calculator;
pub use controller::{Command, Controller, Outcome};
pub use error::CalcError;
pub use history::HistoryLog;
pub use models::{
    EngineType, ModuleCounts, ModuleKind, OxidizerType, Query, RawQuery, Solution, SolutionSet,
};
pub use normalize::normalize;
