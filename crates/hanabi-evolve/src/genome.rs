use crate::config::{CrossoverConfig, EvolutionConfig, SpawnConfig};
use crate::gene::{Gene, RuleKind, Weights};
use hanabi_bot::RuleAgent;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomeId(u64);

impl GenomeId {
    pub fn fresh<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.next_u64())
    }
}

impl fmt::Display for GenomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// An ordered rule chain in encoded form.
///
/// Genomes never change after construction; crossover and mutation build new
/// ones with fresh ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    id: GenomeId,
    dna: Vec<Gene>,
}

impl Genome {
    pub fn new<R: Rng + ?Sized>(dna: Vec<Gene>, rng: &mut R) -> Self {
        Self {
            id: GenomeId::fresh(rng),
            dna,
        }
    }

    pub fn id(&self) -> GenomeId {
        self.id
    }

    pub fn genes(&self) -> &[Gene] {
        &self.dna
    }

    pub fn len(&self) -> usize {
        self.dna.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dna.is_empty()
    }

    /// Shared positions come from either parent gene by gene; the longer
    /// parent's tail survives gene by gene with a chance that depends on
    /// whether that parent is the fitter one.
    pub fn crossover<R: Rng + ?Sized>(
        x: &Genome,
        x_fitness: f32,
        y: &Genome,
        y_fitness: f32,
        cfg: &CrossoverConfig,
        rng: &mut R,
    ) -> Genome {
        let mut dna: Vec<Gene> = x
            .dna
            .iter()
            .zip(&y.dna)
            .map(|(a, b)| Gene::crossover(a, x_fitness, b, y_fitness, cfg, rng))
            .collect();

        let x_stronger = x_fitness >= y_fitness;
        let (longer, longer_is_stronger) = if x.len() >= y.len() {
            (x, x_stronger)
        } else {
            (y, !x_stronger)
        };
        let keep = if longer_is_stronger {
            cfg.stronger_tail_keep
        } else {
            cfg.weaker_tail_keep
        };
        let shared = dna.len();
        for gene in &longer.dna[shared..] {
            if rng.gen_bool(keep) {
                dna.push(gene.clone());
            }
        }

        Genome::new(dna, rng)
    }

    pub fn mutate<R: Rng + ?Sized>(&self, cfg: &EvolutionConfig, rng: &mut R) -> Genome {
        let rates = &cfg.mutation;
        let mut dna = self.dna.clone();

        if rng.gen_bool(rates.drop_gene) && dna.len() > 1 {
            let index = rng.gen_range(0..dna.len());
            dna.remove(index);
        }
        if rng.gen_bool(rates.add_gene) && dna.len() <= rates.max_length {
            dna.push(Gene::spawn_random(&cfg.spawn, rng));
        }
        if rng.gen_bool(rates.swap_genes) && dna.len() > 3 {
            let a = rng.gen_range(0..dna.len());
            let b = rng.gen_range(0..dna.len());
            dna.swap(a, b);
        }

        let dna = dna
            .iter()
            .map(|gene| gene.mutate(rates, &cfg.spawn, rng))
            .collect();
        Genome::new(dna, rng)
    }

    pub fn spawn_random<R: Rng + ?Sized>(cfg: &SpawnConfig, rng: &mut R) -> Genome {
        let length = rng.gen_range(cfg.min_length..=cfg.max_length);
        let dna = (0..length).map(|_| Gene::spawn_random(cfg, rng)).collect();
        Genome::new(dna, rng)
    }

    /// A hand-built chain diversified by repeated mutation.
    ///
    /// Structural mutations are rare, so the rule-kind skeleton usually
    /// survives while knobs and weights drift.
    pub fn spawn_model<R: Rng + ?Sized>(cfg: &EvolutionConfig, rng: &mut R) -> Genome {
        let mut genome = Genome::new(model_dna(), rng);
        for _ in 0..cfg.spawn.model_mutation_passes {
            genome = genome.mutate(cfg, rng);
        }
        genome
    }

    /// Decodes the chain for one seat; the fallback is always appended.
    pub fn as_agent(&self, player: usize) -> RuleAgent {
        RuleAgent::from_rules(player, self.dna.iter().map(|g| g.to_rule(player)).collect())
    }

    pub fn short_dna(&self) -> String {
        let codes = self
            .dna
            .iter()
            .map(|gene| gene.kind.code())
            .collect::<Vec<_>>()
            .join("-");
        format!("({codes})")
    }
}

fn model_dna() -> Vec<Gene> {
    const HINT_WEIGHTS: [f32; 7] = [0.1, 0.1, 0.1, -0.3, 0.1, 0.5, 0.8];
    let weights = |threshold: f32| {
        let mut values = vec![threshold];
        values.extend_from_slice(&HINT_WEIGHTS);
        Weights::new(values)
    };

    vec![
        Gene::new(RuleKind::PlaySafe, 2, 0, weights(0.0)),
        Gene::new(RuleKind::PlayProbablySafe, 2, 0, weights(0.7)),
        Gene::new(RuleKind::TellAnyonePlayable, 0, 0, weights(0.0)),
        Gene::new(RuleKind::OsawaDiscard, 0, 0, weights(0.0)),
        Gene::new(RuleKind::TellAnyoneUseless, 0, 0, weights(0.0)),
        Gene::new(RuleKind::TellAnyoneUseful, 0, 0, weights(0.0)),
        Gene::new(RuleKind::RandomDiscard, 0, 0, weights(0.0)),
    ]
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.id)?;
        for (index, gene) in self.dna.iter().enumerate() {
            if index > 0 {
                f.write_str("...")?;
            }
            write!(f, "{gene}")?;
        }
        f.write_str(")")
    }
}
