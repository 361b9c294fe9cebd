pub mod agent;
pub mod hint_utility;
pub mod rule;

pub use agent::RuleAgent;
pub use hint_utility::{HintUtility, HintUtilityError};
pub use rule::{
    DiscardProbablyUselessRule, FallbackRule, HintFeatures, HintWeights, OsawaDiscardRule,
    PlayProbablySafeRule, PlaySafeRule, RandomDiscardRule, Rule, RuleSequence, TellFocus,
    TellRule,
};
