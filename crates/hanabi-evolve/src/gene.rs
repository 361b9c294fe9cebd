use crate::config::{CrossoverConfig, MutationConfig, SpawnConfig};
use hanabi_bot::rule::HINT_FEATURE_COUNT;
use hanabi_bot::{
    DiscardProbablyUselessRule, HintWeights, OsawaDiscardRule, PlayProbablySafeRule,
    PlaySafeRule, RandomDiscardRule, Rule, TellFocus, TellRule,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight slot 0 is the rule's threshold; the rest feed the hint features.
pub const FEATURE_COUNT: usize = HINT_FEATURE_COUNT + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    PlaySafe,
    PlayProbablySafe,
    TellAnyonePlayable,
    TellAnyoneUseful,
    TellAnyoneUseless,
    OsawaDiscard,
    DiscardProbablyUseless,
    RandomDiscard,
}

impl RuleKind {
    pub const ALL: [RuleKind; 8] = [
        RuleKind::PlaySafe,
        RuleKind::PlayProbablySafe,
        RuleKind::TellAnyonePlayable,
        RuleKind::TellAnyoneUseful,
        RuleKind::TellAnyoneUseless,
        RuleKind::OsawaDiscard,
        RuleKind::DiscardProbablyUseless,
        RuleKind::RandomDiscard,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            RuleKind::PlaySafe => "PS",
            RuleKind::PlayProbablySafe => "PPS",
            RuleKind::TellAnyonePlayable => "TAP",
            RuleKind::TellAnyoneUseful => "TAF",
            RuleKind::TellAnyoneUseless => "TAU",
            RuleKind::OsawaDiscard => "OD",
            RuleKind::DiscardProbablyUseless => "DPU",
            RuleKind::RandomDiscard => "RD",
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Feature index to weight; indices past the end read as zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights(Vec<f32>);

impl Weights {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn random<R: Rng + ?Sized>(range: f32, rng: &mut R) -> Self {
        Self(
            (0..FEATURE_COUNT)
                .map(|_| rng.gen_range(-range..=range))
                .collect(),
        )
    }

    pub fn get(&self, index: usize) -> f32 {
        self.0.get(index).copied().unwrap_or(0.0)
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn threshold(&self) -> f32 {
        self.get(0)
    }

    pub fn hint_weights(&self) -> HintWeights {
        let mut weights = [0.0; HINT_FEATURE_COUNT];
        for (index, weight) in weights.iter_mut().enumerate() {
            *weight = self.get(index + 1);
        }
        HintWeights(weights)
    }
}

/// One parametrised rule: a kind, two small knobs and a weight table.
///
/// | kind | knob_a | knob_b | weights |
/// |---|---|---|---|
/// | play probably safe | min fuses | - | threshold = confidence |
/// | tell anyone * | min hint tokens | reach (0 = all) | threshold + hint features |
/// | discard probably useless | - | - | threshold |
/// | random discard | seed high byte | seed low byte | - |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub kind: RuleKind,
    pub knob_a: u8,
    pub knob_b: u8,
    pub weights: Weights,
}

impl Gene {
    pub fn new(kind: RuleKind, knob_a: u8, knob_b: u8, weights: Weights) -> Self {
        Self {
            kind,
            knob_a,
            knob_b,
            weights,
        }
    }

    pub fn spawn_random<R: Rng + ?Sized>(cfg: &SpawnConfig, rng: &mut R) -> Self {
        Self {
            kind: RuleKind::random(rng),
            knob_a: rng.gen_range(0..=cfg.knob_max),
            knob_b: rng.gen_range(0..=cfg.knob_max),
            weights: Weights::random(cfg.weight_range, rng),
        }
    }

    /// Takes the whole gene from one parent, preferring the fitter one.
    pub fn crossover<R: Rng + ?Sized>(
        x: &Gene,
        x_fitness: f32,
        y: &Gene,
        y_fitness: f32,
        cfg: &CrossoverConfig,
        rng: &mut R,
    ) -> Gene {
        let (stronger, weaker) = if x_fitness >= y_fitness { (x, y) } else { (y, x) };
        let bias = if x_fitness == y_fitness {
            0.5
        } else {
            cfg.stronger_gene_bias
        };
        if rng.gen_bool(bias) {
            stronger.clone()
        } else {
            weaker.clone()
        }
    }

    pub fn mutate<R: Rng + ?Sized>(
        &self,
        mutation: &MutationConfig,
        spawn: &SpawnConfig,
        rng: &mut R,
    ) -> Gene {
        let mut gene = self.clone();
        if rng.gen_bool(mutation.kind) {
            gene.kind = RuleKind::random(rng);
        }
        for knob in [&mut gene.knob_a, &mut gene.knob_b] {
            if rng.gen_bool(mutation.knob) {
                *knob = if rng.gen_bool(0.5) {
                    knob.saturating_sub(1)
                } else {
                    knob.saturating_add(1).min(spawn.knob_max.max(*knob))
                };
            }
        }

        let mut values = gene.weights.0;
        values.resize(values.len().max(FEATURE_COUNT), 0.0);
        for value in values.iter_mut() {
            if rng.gen_bool(mutation.weight) {
                *value += rng.gen_range(-mutation.weight_step..=mutation.weight_step);
            }
        }
        gene.weights = Weights(values);
        gene
    }

    /// The concrete rule this gene stands for when acting as `player`.
    pub fn to_rule(&self, player: usize) -> Box<dyn Rule> {
        let threshold = self.weights.threshold();
        match self.kind {
            RuleKind::PlaySafe => Box::new(PlaySafeRule::new(player)),
            RuleKind::PlayProbablySafe => {
                Box::new(PlayProbablySafeRule::new(player, threshold, self.knob_a))
            }
            RuleKind::TellAnyonePlayable => self.tell(player, TellFocus::Playable),
            RuleKind::TellAnyoneUseful => self.tell(player, TellFocus::Useful),
            RuleKind::TellAnyoneUseless => self.tell(player, TellFocus::Useless),
            RuleKind::OsawaDiscard => Box::new(OsawaDiscardRule::new(player)),
            RuleKind::DiscardProbablyUseless => {
                Box::new(DiscardProbablyUselessRule::new(player, threshold))
            }
            RuleKind::RandomDiscard => {
                let seed = (u64::from(self.knob_a) << 8) | u64::from(self.knob_b);
                Box::new(RandomDiscardRule::new(player, seed))
            }
        }
    }

    fn tell(&self, player: usize, focus: TellFocus) -> Box<dyn Rule> {
        Box::new(TellRule::new(
            player,
            focus,
            self.knob_a,
            usize::from(self.knob_b),
            self.weights.threshold(),
            self.weights.hint_weights(),
        ))
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weights = self
            .weights
            .values()
            .iter()
            .map(|w| format!("{w:.2}"))
            .collect::<Vec<_>>()
            .join(",");
        write!(
            f,
            "{}[{},{}|{}]",
            self.kind.code(),
            self.knob_a,
            self.knob_b,
            weights
        )
    }
}
