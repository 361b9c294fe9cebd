use super::Rule;
use hanabi_core::model::action::Action;
use hanabi_core::model::state::GameState;

/// Ordered rules; the first one that does not abstain decides.
#[derive(Default)]
pub struct RuleSequence {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSequence {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn push(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name())
    }

    /// Like [`Rule::play`] but also reports which member decided.
    pub fn decide(&self, state: &GameState) -> Option<(&'static str, Action)> {
        self.rules
            .iter()
            .find_map(|rule| rule.play(state).map(|action| (rule.name(), action)))
    }
}

impl Rule for RuleSequence {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn play(&self, state: &GameState) -> Option<Action> {
        self.decide(state).map(|(_, action)| action)
    }
}

impl std::fmt::Debug for RuleSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanabi_core::model::card::Card;
    use hanabi_core::model::colour::Colour;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Abstain(&'static AtomicUsize);

    impl Rule for Abstain {
        fn name(&self) -> &'static str {
            "abstain"
        }

        fn play(&self, _state: &GameState) -> Option<Action> {
            self.0.fetch_add(1, Ordering::SeqCst);
            None
        }
    }

    struct Fixed(usize);

    impl Rule for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn play(&self, _state: &GameState) -> Option<Action> {
            Some(Action::play(0, self.0))
        }
    }

    fn state() -> std::sync::Arc<GameState> {
        let card = Some(Card::new(Colour::Green, 2));
        GameState::initial(vec![vec![card; 5], vec![card; 5]], 0)
    }

    #[test]
    fn first_decision_wins() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let sequence = RuleSequence::new(vec![
            Box::new(Abstain(&CALLS)),
            Box::new(Fixed(2)),
            Box::new(Fixed(4)),
        ]);
        assert_eq!(
            sequence.decide(&state()),
            Some(("fixed", Action::play(0, 2)))
        );
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn abstains_when_every_member_abstains() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let sequence = RuleSequence::new(vec![Box::new(Abstain(&CALLS)), Box::new(Abstain(&CALLS))]);
        assert_eq!(sequence.play(&state()), None);
        assert_eq!(CALLS.load(Ordering::SeqCst), 2);
        assert!(RuleSequence::default().play(&state()).is_none());
    }
}
