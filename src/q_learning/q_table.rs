//! Q-table: board state → action index → value

use std::collections::HashMap;

use crate::{Error, Result, game::BoardState};

/// Two-level value table.
///
/// Each known board maps to a dense row of values indexed by the action's
/// position in the shared [`ActionSpace`](crate::game::ActionSpace). Rows only
/// come into existence through [`ensure_initialized`](Self::ensure_initialized)
/// (or [`set`](Self::set)); reads never insert.
#[derive(Debug, Clone)]
pub struct QTable {
    rows: HashMap<BoardState, Vec<f64>>,
    num_actions: usize,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create an empty Q-table over `num_actions` actions
    pub fn new(num_actions: usize, learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            rows: HashMap::new(),
            num_actions,
            learning_rate,
            discount_factor,
        }
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Create the row for `state` with every action at 0.0, unless it exists.
    ///
    /// Returns `true` if a new row was created.
    pub fn ensure_initialized(&mut self, state: &BoardState) -> bool {
        if self.rows.contains_key(state) {
            return false;
        }
        self.rows
            .insert(state.clone(), vec![0.0; self.num_actions]);
        true
    }

    pub fn contains(&self, state: &BoardState) -> bool {
        self.rows.contains_key(state)
    }

    /// All action values for `state`, if the row exists
    pub fn values(&self, state: &BoardState) -> Option<&[f64]> {
        self.rows.get(state).map(Vec::as_slice)
    }

    /// Value of one state-action pair, if the row exists
    pub fn get(&self, state: &BoardState, action: usize) -> Option<f64> {
        self.rows
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
    }

    /// Set one state-action value, creating the row if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAction`] if `action` is out of range.
    pub fn set(&mut self, state: &BoardState, action: usize, value: f64) -> Result<()> {
        if action >= self.num_actions {
            return Err(Error::UnknownAction {
                action: format!("#{action}"),
            });
        }
        self.ensure_initialized(state);
        if let Some(row) = self.rows.get_mut(state) {
            row[action] = value;
        }
        Ok(())
    }

    /// Maximum value over all actions in `state`
    pub fn max_q(&self, state: &BoardState) -> Option<f64> {
        self.rows
            .get(state)
            .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    /// Every action attaining the maximum value in `state`, in index order.
    ///
    /// Empty if the state has no row.
    pub fn greedy_actions(&self, state: &BoardState) -> Vec<usize> {
        let Some(max) = self.max_q(state) else {
            return Vec::new();
        };
        self.rows
            .get(state)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &value)| value == max)
                    .map(|(action, _)| action)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// The row for `next_state` is created if missing. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownState`] if `state` has no row, or
    /// [`Error::UnknownAction`] if `action` is out of range. The table is left
    /// unchanged in both cases.
    pub fn q_learning_update(
        &mut self,
        state: &BoardState,
        action: usize,
        reward: f64,
        next_state: &BoardState,
    ) -> Result<f64> {
        let current_q = match self.rows.get(state) {
            Some(row) => *row.get(action).ok_or_else(|| Error::UnknownAction {
                action: format!("#{action}"),
            })?,
            None => {
                return Err(Error::UnknownState {
                    state: state.label(),
                });
            }
        };

        self.ensure_initialized(next_state);
        let max_next_q = self.max_q(next_state).unwrap_or(0.0);

        let td_target = reward + self.discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;

        if let Some(row) = self.rows.get_mut(state) {
            row[action] = new_q;
        }
        Ok(new_q)
    }

    /// Drop every row
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Number of states with a row
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Code, Feedback};

    fn empty_board() -> BoardState {
        BoardState::new(3, 1)
    }

    fn board_after(guess: u8) -> BoardState {
        let mut board = BoardState::new(3, 1);
        board
            .record(&Code::new([guess]), Feedback::default())
            .unwrap();
        board
    }

    #[test]
    fn test_reads_do_not_insert() {
        let qtable = QTable::new(2, 0.5, 0.9);
        assert_eq!(qtable.get(&empty_board(), 0), None);
        assert_eq!(qtable.values(&empty_board()), None);
        assert!(qtable.greedy_actions(&empty_board()).is_empty());
        assert!(qtable.is_empty());
    }

    #[test]
    fn test_ensure_initialized_is_idempotent() {
        let mut qtable = QTable::new(3, 0.5, 0.9);
        let state = empty_board();
        assert!(qtable.ensure_initialized(&state));
        qtable.set(&state, 1, 2.5).unwrap();
        assert!(!qtable.ensure_initialized(&state));
        assert_eq!(qtable.values(&state), Some(&[0.0, 2.5, 0.0][..]));
        assert_eq!(qtable.len(), 1);
    }

    #[test]
    fn test_max_q_and_greedy_actions() {
        let mut qtable = QTable::new(4, 0.5, 0.9);
        let state = empty_board();
        qtable.set(&state, 0, 0.5).unwrap();
        qtable.set(&state, 1, 1.5).unwrap();
        qtable.set(&state, 3, 1.5).unwrap();

        assert_eq!(qtable.max_q(&state), Some(1.5));
        assert_eq!(qtable.greedy_actions(&state), vec![1, 3]);
    }

    #[test]
    fn test_set_rejects_out_of_range_action() {
        let mut qtable = QTable::new(2, 0.5, 0.9);
        assert!(matches!(
            qtable.set(&empty_board(), 2, 1.0),
            Err(Error::UnknownAction { .. })
        ));
    }

    #[test]
    fn test_q_learning_update() {
        let mut qtable = QTable::new(2, 0.5, 0.99);
        let state = empty_board();
        let next_state = board_after(1);

        qtable.ensure_initialized(&state);
        qtable.set(&next_state, 0, 1.0).unwrap();
        qtable.set(&next_state, 1, 2.0).unwrap();

        // Q(s,1) = 0.0 + 0.5 * (0.0 + 0.99 * 2.0 - 0.0) = 0.99
        let updated = qtable.q_learning_update(&state, 1, 0.0, &next_state).unwrap();
        assert!((updated - 0.99).abs() < 1e-12);
        assert_eq!(qtable.get(&state, 1), Some(updated));
    }

    #[test]
    fn test_update_initializes_next_state() {
        let mut qtable = QTable::new(2, 0.2, 0.9);
        let state = empty_board();
        let next_state = board_after(2);
        qtable.ensure_initialized(&state);

        let updated = qtable
            .q_learning_update(&state, 0, -1.0, &next_state)
            .unwrap();
        assert!((updated + 0.2).abs() < 1e-12);
        assert_eq!(qtable.values(&next_state), Some(&[0.0, 0.0][..]));
    }

    #[test]
    fn test_update_on_unknown_state_fails() {
        let mut qtable = QTable::new(2, 0.5, 0.9);
        let result = qtable.q_learning_update(&empty_board(), 0, 1.0, &board_after(1));
        assert!(matches!(result, Err(Error::UnknownState { .. })));
        assert!(qtable.is_empty());
    }
}
