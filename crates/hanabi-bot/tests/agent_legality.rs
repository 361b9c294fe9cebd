use hanabi_bot::{
    DiscardProbablyUselessRule, HintWeights, OsawaDiscardRule, PlayProbablySafeRule,
    PlaySafeRule, RandomDiscardRule, Rule, RuleAgent, TellFocus, TellRule,
};
use hanabi_core::game::table::{Table, observed_by};

const MAX_TURNS: usize = 400;

fn full_agent(player: usize) -> RuleAgent {
    let weights = HintWeights([0.1, 0.1, 0.1, -0.3, 0.1, 0.5, 0.8]);
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(PlaySafeRule::new(player)),
        Box::new(PlayProbablySafeRule::new(player, 0.7, 2)),
        Box::new(TellRule::new(player, TellFocus::Playable, 1, 0, 0.0, weights)),
        Box::new(OsawaDiscardRule::new(player)),
        Box::new(TellRule::new(player, TellFocus::Useless, 2, 0, 0.0, weights)),
        Box::new(TellRule::new(player, TellFocus::Useful, 3, 1, 0.0, weights)),
        Box::new(DiscardProbablyUselessRule::new(player, 0.6)),
        Box::new(RandomDiscardRule::new(player, 7)),
    ];
    RuleAgent::from_rules(player, rules)
}

fn play_out(players: usize, seed: u64, agents: &[RuleAgent]) -> Table {
    let mut table = Table::with_seed(players, seed).unwrap();
    for _ in 0..MAX_TURNS {
        if table.is_finished() {
            break;
        }
        let state = table.state().clone();
        let action = agents[state.next_player()].act(&state);
        if let Err(err) = table.apply(action.clone()) {
            panic!("seed {seed}: {action} rejected: {err}");
        }
    }
    table
}

#[test]
fn rule_agents_finish_games_with_legal_actions_only() {
    for players in 2..=5 {
        let agents: Vec<RuleAgent> = (0..players).map(full_agent).collect();
        for seed in 0..6 {
            let table = play_out(players, seed, &agents);
            assert!(table.is_finished(), "{players} players, seed {seed}");
            assert!(table.score() <= 25);
        }
    }
}

#[test]
fn fallback_only_agents_are_legal_too() {
    let agents: Vec<RuleAgent> = (0..3).map(|p| RuleAgent::from_rules(p, Vec::new())).collect();
    for seed in 10..14 {
        assert!(play_out(3, seed, &agents).is_finished());
    }
}

#[test]
fn decisions_only_depend_on_what_the_seat_can_see() {
    let agents: Vec<RuleAgent> = (0..4).map(full_agent).collect();
    let mut table = Table::with_seed(4, 31).unwrap();
    for _ in 0..30 {
        if table.is_finished() {
            break;
        }
        let state = table.state().clone();
        let seat = state.next_player();
        let action = agents[seat].act(&state);
        let masked = observed_by(&state, seat);
        assert_eq!(agents[seat].act(&masked), action);
        table.apply(action).unwrap();
    }
}
