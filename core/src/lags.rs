//! Lag state updater — carries predicted values forward one day.
//!
//! RULE: Lag features for day k are derived strictly from predictions
//! for days before k. The updater knows nothing about calendar dates;
//! the forecaster invokes it once per day transition and never for
//! the final day.

use crate::schema::columns;
use crate::skeleton::DayRow;
use std::collections::VecDeque;

/// Lag depth and rolling-average window, fixed by the trained model's
/// feature engineering.
pub const LAG_DEPTH: usize = 7;

/// The most recent predicted (or seed) targets, FIFO-bounded to
/// [`LAG_DEPTH`] entries. Owned by a single forecast run; reset at
/// the start of each run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LagHistory {
    values: VecDeque<f64>,
}

impl LagHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, discarding the oldest once the bound is hit.
    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
        if self.values.len() > LAG_DEPTH {
            self.values.pop_front();
        }
    }

    /// Arithmetic mean of the retained values. 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Produce day k+1's row from day k's finished state.
///
/// Lags cascade one position: `lag_d` on the returned row takes
/// `lag_{d-1}` from `current` for d in [2, 7], and `lag_1` becomes
/// `predicted`. The rolling average is recomputed from `history`
/// after `predicted` is appended.
///
/// `next` is not mutated; exactly one writer per day index, written
/// once, back in the forecaster's arena.
pub fn advance(
    current: &DayRow,
    next: &DayRow,
    predicted: f64,
    history: &mut LagHistory,
) -> DayRow {
    let mut updated = next.clone();

    for d in (2..=LAG_DEPTH).rev() {
        if let Some(value) = current.get(&columns::lag(d - 1)) {
            updated.set(&columns::lag(d), value);
        }
    }
    updated.set(&columns::lag(1), predicted);

    history.push(predicted);
    updated.set(columns::UNITS_MA7, history.mean());

    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_fifo_bounded_to_seven() {
        let mut history = LagHistory::new();
        for v in 1..=9 {
            history.push(v as f64);
        }
        assert_eq!(history.len(), LAG_DEPTH);
        // Oldest two (1, 2) dropped; mean of 3..=9 is 6.
        assert_eq!(history.mean(), 6.0);
    }

    #[test]
    fn mean_of_partial_history() {
        let mut history = LagHistory::new();
        history.push(4.0);
        history.push(8.0);
        assert_eq!(history.mean(), 6.0);
    }
}
