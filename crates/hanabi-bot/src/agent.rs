use crate::rule::{FallbackRule, Rule, RuleSequence};
use hanabi_core::knowledge::format_history;
use hanabi_core::model::action::Action;
use hanabi_core::model::state::GameState;
use tracing::{Level, event};

/// A seat's decision function: the configured rules, then the fallback.
#[derive(Debug)]
pub struct RuleAgent {
    player: usize,
    rules: RuleSequence,
    fallback: FallbackRule,
}

impl RuleAgent {
    pub fn new(player: usize, rules: RuleSequence) -> Self {
        Self {
            player,
            rules,
            fallback: FallbackRule::new(player),
        }
    }

    pub fn from_rules(player: usize, rules: Vec<Box<dyn Rule>>) -> Self {
        Self::new(player, RuleSequence::new(rules))
    }

    pub fn player(&self) -> usize {
        self.player
    }

    pub fn rules(&self) -> &RuleSequence {
        &self.rules
    }

    /// Never abstains; when every configured rule does, the fallback answers.
    pub fn act(&self, state: &GameState) -> Action {
        let (rule, action) = self
            .rules
            .decide(state)
            .unwrap_or_else(|| (self.fallback.name(), self.fallback.fallback_action(state)));
        log_decision(self.player, state, rule, &action);
        action
    }
}

impl Rule for RuleAgent {
    fn name(&self) -> &'static str {
        "agent"
    }

    fn play(&self, state: &GameState) -> Option<Action> {
        Some(self.act(state))
    }
}

fn log_decision(player: usize, state: &GameState, rule: &'static str, action: &Action) {
    if tracing::enabled!(Level::TRACE) {
        event!(
            target: "hanabi_bot::history",
            Level::TRACE,
            player,
            history = %format_history(state),
        );
    }
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    event!(
        target: "hanabi_bot::agent",
        Level::INFO,
        player,
        order = state.order(),
        hint_tokens = state.hint_tokens(),
        fuse_tokens = state.fuse_tokens(),
        score = state.fireworks().score(),
        rule,
        action = %action,
    );
}
