//! Folding the public action history into per-slot hint knowledge.

use super::hint::CardHint;
use crate::model::action::Action;
use crate::model::colour::Colour;
use crate::model::state::GameState;
use std::fmt;

/// Every action from the initial deal up to `state`, oldest first.
pub fn chronological_actions(state: &GameState) -> Vec<&Action> {
    let mut actions: Vec<&Action> = state.ancestry().filter_map(GameState::action).collect();
    actions.reverse();
    actions
}

/// The root of the history `state` belongs to.
pub fn initial_state(state: &GameState) -> &GameState {
    state.ancestry().last().unwrap_or(state)
}

/// Canonical hand size for this game, read from the initial deal.
pub fn initial_hand_size(state: &GameState) -> usize {
    initial_state(state).hand(0).len()
}

/// Most recent action taken by `player`, if they have acted at all.
pub fn last_action_of(state: &GameState, player: usize) -> Option<&Action> {
    last_turn_of(state, player).and_then(GameState::action)
}

/// Node produced by the most recent action of `player`.
pub(crate) fn last_turn_of(state: &GameState, player: usize) -> Option<&GameState> {
    state
        .ancestry()
        .find(|node| node.action().is_some_and(|action| action.player() == player))
}

/// What one player has been told about each slot of their own hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintLedger {
    player: usize,
    hints: Vec<CardHint>,
}

impl HintLedger {
    pub fn new(player: usize, hand_size: usize) -> Self {
        Self {
            player,
            hints: (0..hand_size).map(CardHint::new).collect(),
        }
    }

    /// Replays the full history of `state` from the subject's point of view.
    pub fn for_player(state: &GameState, player: usize) -> Self {
        let mut ledger = Self::new(player, initial_hand_size(state));
        for action in chronological_actions(state) {
            ledger.apply(action);
        }
        ledger
    }

    pub fn apply(&mut self, action: &Action) {
        if action.removes_card_of(self.player) {
            // The slot now holds a fresh card, or nothing near the end of the game.
            if let Some(hint) = action.slot().and_then(|slot| self.hints.get_mut(slot)) {
                hint.reset();
            }
            return;
        }
        match action {
            Action::Hint {
                receiver,
                hint,
                hinted,
                ..
            } if *receiver == self.player => {
                for (slot_hint, pointed) in self.hints.iter_mut().zip(hinted) {
                    if *pointed {
                        slot_hint.is(*hint);
                    } else {
                        slot_hint.is_not(*hint);
                    }
                }
            }
            _ => {}
        }
    }

    pub fn player(&self) -> usize {
        self.player
    }

    pub fn hints(&self) -> &[CardHint] {
        &self.hints
    }

    pub fn get(&self, slot: usize) -> Option<&CardHint> {
        self.hints.get(slot)
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }
}

/// Human-readable dump of the whole game, oldest state first.
pub fn format_history(state: &GameState) -> String {
    let mut out = String::new();
    match write_history(&mut out, state) {
        Ok(()) => out,
        Err(fmt::Error) => String::from("GAME HISTORY unavailable"),
    }
}

fn write_history(out: &mut impl fmt::Write, state: &GameState) -> fmt::Result {
    let mut states: Vec<&GameState> = state.ancestry().collect();
    states.reverse();

    writeln!(out, "GAME HISTORY\n------")?;
    for node in states {
        let fireworks = Colour::ALL
            .iter()
            .filter_map(|colour| node.fireworks().top(*colour))
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "State {}:", node.order())?;
        match node.action() {
            Some(action) => writeln!(out, "\t<<< {action}")?,
            None => writeln!(out, "\t<<< deal")?,
        }
        writeln!(out, "\tFireworks: [{fireworks}]")?;
        writeln!(
            out,
            "\tHints: {}  Fuses: {}",
            node.hint_tokens(),
            node.fuse_tokens()
        )?;
        for player in 0..node.player_count() {
            let marker = if node.next_player() == player { "* " } else { "  " };
            let hand = node
                .hand(player)
                .iter()
                .map(|slot| slot.map_or_else(|| "??".to_string(), |card| card.to_string()))
                .collect::<Vec<_>>()
                .join(" ");
            let view = HintLedger::for_player(node, player)
                .hints()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "\t\t{marker}P{player}: {hand} with view {view}")?;
        }
    }
    Ok(())
}
