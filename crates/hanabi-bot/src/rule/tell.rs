use super::{Rule, checked};
use crate::hint_utility::HintUtility;
use hanabi_core::inference::{is_critical, is_playable, is_useless};
use hanabi_core::knowledge::{HintLedger, has_turn_left};
use hanabi_core::model::action::{Action, Hint};
use hanabi_core::model::card::{Card, MAX_VALUE, MIN_VALUE};
use hanabi_core::model::colour::Colour;
use hanabi_core::model::state::{GameState, MAX_HINT_TOKENS};
use tracing::{Level, event};

pub const HINT_FEATURE_COUNT: usize = 7;

/// Which of the receiver's cards a tell rule is trying to point out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TellFocus {
    Playable,
    Useful,
    Useless,
}

impl TellFocus {
    fn accepts(self, state: &GameState, card: Card) -> bool {
        match self {
            TellFocus::Playable => is_playable(state, card),
            TellFocus::Useful => !is_useless(state, card),
            TellFocus::Useless => is_useless(state, card),
        }
    }
}

/// Per-feature weights applied to [`HintFeatures`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HintWeights(pub [f32; HINT_FEATURE_COUNT]);

/// Measurements of one candidate hint, in [`HintWeights`] order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HintFeatures {
    /// Touched slots holding a focus card.
    pub focus_touched: f32,
    /// Receiver slots whose candidate set shrinks, touched or not.
    pub informed_slots: f32,
    /// 1 for the next player, 1/2 for the one after and so on.
    pub urgency: f32,
    /// Touched slots holding something other than a focus card.
    pub stray_touched: f32,
    /// Share of the hint bank still available.
    pub token_share: f32,
    /// Slots whose exact card becomes known.
    pub identified: f32,
    /// Touched slots holding the last live copy of a needed card.
    pub critical_touched: f32,
}

impl HintFeatures {
    pub fn values(&self) -> [f32; HINT_FEATURE_COUNT] {
        [
            self.focus_touched,
            self.informed_slots,
            self.urgency,
            self.stray_touched,
            self.token_share,
            self.identified,
            self.critical_touched,
        ]
    }

    pub fn score(&self, weights: &HintWeights) -> f32 {
        self.values()
            .iter()
            .zip(weights.0.iter())
            .map(|(value, weight)| value * weight)
            .sum()
    }
}

/// Tells another player about cards matching `focus`.
///
/// Every colour and value hint to every reachable player is scored; the best
/// one is given when its utility reaches `threshold`. A candidate must narrow
/// what the receiver knows about at least one focus card.
#[derive(Debug, Clone, Copy)]
pub struct TellRule {
    player: usize,
    focus: TellFocus,
    min_hint_tokens: u8,
    reach: usize,
    threshold: f32,
    weights: HintWeights,
}

impl TellRule {
    /// `reach` limits receivers to the next `reach` players in turn order;
    /// zero reaches everyone.
    pub fn new(
        player: usize,
        focus: TellFocus,
        min_hint_tokens: u8,
        reach: usize,
        threshold: f32,
        weights: HintWeights,
    ) -> Self {
        Self {
            player,
            focus,
            min_hint_tokens: min_hint_tokens.max(1),
            reach,
            threshold,
            weights,
        }
    }

    pub fn focus(&self) -> TellFocus {
        self.focus
    }

    fn receivers(&self, state: &GameState) -> Vec<usize> {
        let players = state.player_count();
        let others = players.saturating_sub(1);
        let reach = if self.reach == 0 {
            others
        } else {
            self.reach.min(others)
        };
        (1..=reach)
            .map(|offset| (self.player + offset) % players)
            .filter(|receiver| has_turn_left(state, *receiver))
            .collect()
    }

    fn evaluate(&self, state: &GameState, receiver: usize, hint: Hint) -> Option<HintUtility> {
        let hand = state.hand(receiver);
        let slots: Vec<usize> = hand
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_some_and(|card| hint.matches(card)))
            .map(|(slot, _)| slot)
            .collect();
        if slots.is_empty() {
            return None;
        }

        let before = HintLedger::for_player(state, receiver);
        let mut after = before.clone();
        let hinted = hand
            .iter()
            .map(|card| card.is_some_and(|card| hint.matches(card)))
            .collect();
        after.apply(&Action::hint(self.player, receiver, hint, hinted));

        let mut features = HintFeatures::default();
        let mut narrows_focus = false;
        for (old, new) in before.hints().iter().zip(after.hints()) {
            let narrowed = new.candidate_count() < old.candidate_count();
            if narrowed {
                features.informed_slots += 1.0;
            }
            if new.known_card().is_some() && old.known_card().is_none() {
                features.identified += 1.0;
            }
            let Some(card) = hand.get(old.slot()).copied().flatten() else {
                continue;
            };
            if !hint.matches(card) {
                continue;
            }
            if self.focus.accepts(state, card) {
                features.focus_touched += 1.0;
                narrows_focus |= narrowed;
            } else {
                features.stray_touched += 1.0;
            }
            if is_critical(state, card) {
                features.critical_touched += 1.0;
            }
        }
        if !narrows_focus {
            return None;
        }

        let players = state.player_count();
        let distance = (receiver + players - self.player) % players;
        features.urgency = 1.0 / distance.max(1) as f32;
        features.token_share = f32::from(state.hint_tokens()) / f32::from(MAX_HINT_TOKENS);

        let (colour, value) = match hint {
            Hint::Colour(colour) => (Some(colour), None),
            Hint::Value(value) => (None, Some(value)),
        };
        HintUtility::new(
            receiver,
            features.score(&self.weights),
            hint.kind(),
            colour,
            value,
            slots,
        )
        .ok()
    }

    /// Highest-utility hint this rule would consider, regardless of threshold.
    pub fn best_hint(&self, state: &GameState) -> Option<HintUtility> {
        let mut best: Option<HintUtility> = None;
        for receiver in self.receivers(state) {
            for hint in all_hints() {
                let Some(candidate) = self.evaluate(state, receiver, hint) else {
                    continue;
                };
                if best
                    .as_ref()
                    .is_none_or(|current| candidate.utility() > current.utility())
                {
                    best = Some(candidate);
                }
            }
        }
        best
    }
}

fn all_hints() -> impl Iterator<Item = Hint> {
    Colour::ALL
        .into_iter()
        .map(Hint::Colour)
        .chain((MIN_VALUE..=MAX_VALUE).map(Hint::Value))
}

impl Rule for TellRule {
    fn name(&self) -> &'static str {
        match self.focus {
            TellFocus::Playable => "tell_playable",
            TellFocus::Useful => "tell_useful",
            TellFocus::Useless => "tell_useless",
        }
    }

    fn play(&self, state: &GameState) -> Option<Action> {
        if state.hint_tokens() < self.min_hint_tokens {
            return None;
        }

        let best = self.best_hint(state)?;
        if best.utility() < self.threshold {
            return None;
        }

        event!(
            target: "hanabi_bot::tell",
            Level::DEBUG,
            rule = self.name(),
            player = self.player,
            receiver = best.receiver(),
            hint = %best.hint(),
            utility = best.utility(),
        );

        match best.to_action(state, self.player) {
            Ok(action) => checked(self.name(), state, action),
            Err(err) => {
                tracing::warn!(
                    target: "hanabi_bot::tell",
                    rule = self.name(),
                    error = %err,
                    "hint could not be turned into an action"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(colour: Colour, value: u8) -> Option<Card> {
        Some(Card::new(colour, value))
    }

    fn focus_only() -> HintWeights {
        HintWeights([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
    }

    fn three_players(p1: Vec<Option<Card>>, p2: Vec<Option<Card>>) -> std::sync::Arc<GameState> {
        GameState::initial(vec![vec![None; 5], p1, p2], 0)
    }

    fn no_playables() -> Vec<Option<Card>> {
        vec![
            card(Colour::Green, 3),
            card(Colour::Blue, 4),
            card(Colour::White, 4),
            card(Colour::Yellow, 3),
            card(Colour::Red, 2),
        ]
    }

    #[test]
    fn score_is_a_weighted_sum() {
        let features = HintFeatures {
            focus_touched: 2.0,
            stray_touched: 1.0,
            critical_touched: 1.0,
            ..HintFeatures::default()
        };
        let weights = HintWeights([0.5, 0.0, 0.0, -0.3, 0.0, 0.0, 0.8]);
        assert!((features.score(&weights) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn points_out_a_playable_card() {
        let mut p1 = no_playables();
        p1[0] = card(Colour::Red, 1);
        let state = three_players(p1, no_playables());
        let rule = TellRule::new(0, TellFocus::Playable, 1, 0, 0.0, focus_only());
        let action = rule.play(&state).unwrap();
        assert_eq!(action.hint_receiver(), Some(1));
        assert_eq!(action.hint_payload(), Some(Hint::Colour(Colour::Red)));
        assert_eq!(
            action.hinted_slots(),
            Some(&[true, false, false, false, true][..])
        );
        assert!(state.check_legal(&action).is_ok());
    }

    #[test]
    fn stray_cards_lower_the_utility() {
        let mut p1 = no_playables();
        p1[0] = card(Colour::Red, 1);
        let state = three_players(p1, no_playables());
        let weights = HintWeights([1.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0]);
        let best = TellRule::new(0, TellFocus::Playable, 1, 0, 0.0, weights)
            .best_hint(&state)
            .unwrap();
        // The value hint touches only the red one; the colour hint also the red two.
        assert_eq!(best.hint(), Hint::Value(1));
        assert_eq!(best.slots(), &[0]);
        assert!((best.utility() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn abstains_without_focus_cards_or_tokens() {
        let state = three_players(no_playables(), no_playables());
        let rule = TellRule::new(0, TellFocus::Playable, 1, 0, 0.0, focus_only());
        assert_eq!(rule.play(&state), None);
        // Nothing is useless on empty fireworks.
        let useless = TellRule::new(0, TellFocus::Useless, 1, 0, 0.0, focus_only());
        assert_eq!(useless.play(&state), None);

        let mut p1 = no_playables();
        p1[2] = card(Colour::White, 1);
        let state = three_players(p1, no_playables());
        let greedy = TellRule::new(0, TellFocus::Playable, 9, 0, 0.0, focus_only());
        assert_eq!(greedy.play(&state), None);
        let picky = TellRule::new(0, TellFocus::Playable, 1, 0, 5.0, focus_only());
        assert_eq!(picky.play(&state), None);
    }

    #[test]
    fn reach_limits_the_receivers() {
        let mut p2 = no_playables();
        p2[1] = card(Colour::Blue, 1);
        let state = three_players(no_playables(), p2);

        let near = TellRule::new(0, TellFocus::Playable, 1, 1, 0.0, focus_only());
        assert_eq!(near.play(&state), None);

        let far = TellRule::new(0, TellFocus::Playable, 1, 0, 0.0, focus_only());
        assert_eq!(far.play(&state).and_then(|a| a.hint_receiver()), Some(2));
    }

    #[test]
    fn useful_focus_skips_cards_already_identified() {
        let p1 = vec![
            card(Colour::Red, 1),
            card(Colour::Red, 1),
            card(Colour::Red, 1),
            card(Colour::Red, 1),
            card(Colour::Red, 1),
        ];
        let root = GameState::initial(vec![vec![None; 5], p1, vec![None; 5]], 0);
        let mut table = root.table().clone();
        table.next_player = 1;
        table.hint_tokens = 7;
        let told = GameState::successor(
            &root,
            Action::hint(0, 1, Hint::Colour(Colour::Red), vec![true; 5]),
            table.clone(),
        );
        table.next_player = 2;
        table.hint_tokens = 6;
        let state = GameState::successor(
            &told,
            Action::hint(2, 1, Hint::Value(1), vec![true; 5]),
            table,
        );

        let rule = TellRule::new(2, TellFocus::Useful, 1, 0, 0.0, focus_only());
        assert!(rule.best_hint(&state).is_none());
    }
}
