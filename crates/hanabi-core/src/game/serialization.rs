use super::table::{DealError, Table};
use crate::knowledge::chronological_actions;
use crate::model::action::Action;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::state::ActionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything needed to replay a game dealt by [`Table`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistorySnapshot {
    pub players: usize,
    pub deck: Vec<Card>,
    pub actions: Vec<Action>,
}

impl HistorySnapshot {
    pub fn capture(table: &Table) -> Self {
        HistorySnapshot {
            players: table.state().player_count(),
            deck: table.deck_order().to_vec(),
            actions: chronological_actions(table.state())
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    /// Re-deals the recorded deck and applies every recorded action.
    pub fn restore(&self) -> Result<Table, ReplayError> {
        let mut table = Table::deal(&Deck::from_cards(self.deck.clone()), self.players)
            .map_err(ReplayError::Deal)?;
        for (index, action) in self.actions.iter().enumerate() {
            table
                .apply(action.clone())
                .map_err(|source| ReplayError::Action { index, source })?;
        }
        Ok(table)
    }

    pub fn to_json(table: &Table) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Self::capture(table))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    Deal(DealError),
    Action { index: usize, source: ActionError },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Deal(err) => write!(f, "cannot deal recorded deck: {err}"),
            ReplayError::Action { index, source } => {
                write!(f, "recorded action {index} is illegal: {source}")
            }
        }
    }
}

impl std::error::Error for ReplayError {}
