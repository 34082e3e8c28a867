//! Command handling between a front end and the calculator
//!
//! The controller owns no history. The caller passes its [`HistoryLog`] in
//! with every command, which keeps the calculator free of session state.

use crate::calculator::Calculator;
use crate::error::Result;
use crate::history::HistoryLog;
use crate::models::{Query, SolutionSet};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Solve a new query and record it
    Submit { query: Query },
    /// Solve a stored query again without recording it
    Replay { query: Query },
    RemoveHistoryEntry { index: usize },
    ClearHistory,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Solved(SolutionSet),
    Removed(Option<Query>),
    Cleared,
}

#[derive(Debug, Clone, Default)]
pub struct Controller {
    calculator: Calculator,
}

impl Controller {
    pub fn new(calculator: Calculator) -> Self {
        Controller { calculator }
    }

    pub fn handle(&self, history: &mut HistoryLog, command: Command) -> Result<Outcome> {
        match command {
            Command::Submit { query } => {
                let solutions = self.calculator.calculate(&query)?;
                history.append(query);
                Ok(Outcome::Solved(solutions))
            }
            Command::Replay { query } => Ok(Outcome::Solved(self.calculator.calculate(&query)?)),
            Command::RemoveHistoryEntry { index } => Ok(Outcome::Removed(history.remove_at(index))),
            Command::ClearHistory => {
                history.clear();
                Ok(Outcome::Cleared)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcError;
    use crate::models::{EngineType, ModuleCounts, OxidizerType};

    fn query(distance_km: f64) -> Query {
        Query {
            engine: EngineType::Hydrogen,
            oxidizer: OxidizerType::Liquid,
            distance_km,
            allow_waste: false,
            modules: ModuleCounts {
                warehouse: 1,
                ..ModuleCounts::default()
            },
        }
    }

    #[test]
    fn submit_records_and_replay_reproduces() {
        let controller = Controller::default();
        let mut history = HistoryLog::default();

        let submitted = controller
            .handle(&mut history, Command::Submit { query: query(30_000.0) })
            .unwrap();
        assert_eq!(history.len(), 1);

        let stored = history.get(0).unwrap().clone();
        let replayed = controller
            .handle(&mut history, Command::Replay { query: stored })
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(submitted, replayed);
    }

    #[test]
    fn empty_answers_are_still_recorded() {
        let controller = Controller::default();
        let mut history = HistoryLog::default();
        let outcome = controller
            .handle(&mut history, Command::Submit { query: query(50_000_000.0) })
            .unwrap();
        assert_eq!(outcome, Outcome::Solved(SolutionSet::default()));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn invalid_queries_are_not_recorded() {
        let controller = Controller::default();
        let mut history = HistoryLog::default();
        let result = controller.handle(&mut history, Command::Submit { query: query(-1.0) });
        assert!(matches!(result, Err(CalcError::InvalidQuery(_))));
        assert!(history.is_empty());
    }

    #[test]
    fn remove_and_clear_history() {
        let controller = Controller::default();
        let mut history = HistoryLog::default();
        history.append(query(1_000.0));
        history.append(query(2_000.0));

        let outcome = controller
            .handle(&mut history, Command::RemoveHistoryEntry { index: 0 })
            .unwrap();
        assert_eq!(outcome, Outcome::Removed(Some(query(1_000.0))));
        assert_eq!(
            controller
                .handle(&mut history, Command::RemoveHistoryEntry { index: 9 })
                .unwrap(),
            Outcome::Removed(None)
        );

        assert_eq!(
            controller.handle(&mut history, Command::ClearHistory).unwrap(),
            Outcome::Cleared
        );
        assert!(history.is_empty());
    }
}
