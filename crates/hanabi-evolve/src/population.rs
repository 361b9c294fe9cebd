use crate::config::EvolutionConfig;
use crate::genome::Genome;
use rand::Rng;
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BreedError {
    #[error("population is empty")]
    Empty,
    #[error("expected {expected} fitness values, got {actual}")]
    FitnessLength { expected: usize, actual: usize },
    #[error("fitness of genome {index} is not a finite number")]
    NonFiniteFitness { index: usize },
}

/// One generation of genomes. Fitness is measured elsewhere and handed in
/// one value per genome, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    genomes: Vec<Genome>,
}

impl Population {
    pub fn new(genomes: Vec<Genome>) -> Self {
        Self { genomes }
    }

    /// A model genome followed by random ones, `population_size` in total.
    pub fn spawn<R: Rng + ?Sized>(cfg: &EvolutionConfig, rng: &mut R) -> Self {
        let mut genomes = Vec::with_capacity(cfg.population_size);
        if cfg.population_size > 0 {
            genomes.push(Genome::spawn_model(cfg, rng));
        }
        while genomes.len() < cfg.population_size {
            genomes.push(Genome::spawn_random(&cfg.spawn, rng));
        }
        Self { genomes }
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    fn check_fitness(&self, fitness: &[f32]) -> Result<(), BreedError> {
        if self.genomes.is_empty() {
            return Err(BreedError::Empty);
        }
        if fitness.len() != self.genomes.len() {
            return Err(BreedError::FitnessLength {
                expected: self.genomes.len(),
                actual: fitness.len(),
            });
        }
        if let Some(index) = fitness.iter().position(|value| !value.is_finite()) {
            return Err(BreedError::NonFiniteFitness { index });
        }
        Ok(())
    }

    /// Fittest genome; ties go to the earlier one.
    pub fn best(&self, fitness: &[f32]) -> Result<&Genome, BreedError> {
        self.check_fitness(fitness)?;
        let mut best = 0;
        for (index, value) in fitness.iter().enumerate() {
            if *value > fitness[best] {
                best = index;
            }
        }
        Ok(&self.genomes[best])
    }

    /// Next generation: the `elitism` fittest genomes carried over unchanged,
    /// then mutated children of tournament-selected parents.
    pub fn breed<R: Rng + ?Sized>(
        &self,
        fitness: &[f32],
        cfg: &EvolutionConfig,
        rng: &mut R,
    ) -> Result<Population, BreedError> {
        self.check_fitness(fitness)?;

        let mut ranked: Vec<usize> = (0..self.genomes.len()).collect();
        ranked.sort_by(|a, b| fitness[*b].total_cmp(&fitness[*a]));

        let mut next: Vec<Genome> = ranked
            .iter()
            .take(cfg.elitism.min(cfg.population_size))
            .map(|index| self.genomes[*index].clone())
            .collect();

        while next.len() < cfg.population_size {
            let x = tournament_selection(fitness, cfg.tournament_size, rng);
            let y = tournament_selection(fitness, cfg.tournament_size, rng);
            let child = Genome::crossover(
                &self.genomes[x],
                fitness[x],
                &self.genomes[y],
                fitness[y],
                &cfg.crossover,
                rng,
            );
            next.push(child.mutate(cfg, rng));
        }

        log_generation(fitness, &self.genomes[ranked[0]]);
        Ok(Population::new(next))
    }
}

/// Index of the fittest of `size` uniformly drawn contestants.
fn tournament_selection<R: Rng + ?Sized>(fitness: &[f32], size: usize, rng: &mut R) -> usize {
    let mut best = rng.gen_range(0..fitness.len());
    for _ in 1..size {
        let contender = rng.gen_range(0..fitness.len());
        if fitness[contender] > fitness[best] {
            best = contender;
        }
    }
    best
}

fn log_generation(fitness: &[f32], leader: &Genome) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let mean = fitness.iter().sum::<f32>() / fitness.len() as f32;
    let top = fitness.iter().copied().fold(f32::MIN, f32::max);
    event!(
        target: "hanabi_evolve::population",
        Level::INFO,
        size = fitness.len(),
        best_fitness = top,
        mean_fitness = mean,
        leader = %leader.id(),
        dna = %leader.short_dna(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn small_config() -> EvolutionConfig {
        EvolutionConfig {
            population_size: 6,
            elitism: 2,
            tournament_size: 2,
            ..EvolutionConfig::default()
        }
    }

    #[test]
    fn spawn_fills_the_configured_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let population = Population::spawn(&small_config(), &mut rng);
        assert_eq!(population.len(), 6);
        assert_eq!(population.genomes()[0].len(), 7);
    }

    #[test]
    fn elites_survive_unchanged() {
        let mut rng = StdRng::seed_from_u64(2);
        let cfg = small_config();
        let population = Population::spawn(&cfg, &mut rng);
        let fitness = [3.0, 9.0, 1.0, 7.0, 0.0, 2.0];
        let next = population.breed(&fitness, &cfg, &mut rng).unwrap();
        assert_eq!(next.len(), 6);
        assert_eq!(next.genomes()[0], population.genomes()[1]);
        assert_eq!(next.genomes()[1], population.genomes()[3]);
        assert_eq!(population.best(&fitness).unwrap(), &population.genomes()[1]);
    }

    #[test]
    fn fitness_must_line_up_with_the_genomes() {
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = small_config();
        let population = Population::spawn(&cfg, &mut rng);
        assert_eq!(
            population.breed(&[1.0; 5], &cfg, &mut rng).unwrap_err(),
            BreedError::FitnessLength {
                expected: 6,
                actual: 5
            }
        );
        let mut fitness = [1.0; 6];
        fitness[4] = f32::NAN;
        assert_eq!(
            population.best(&fitness).unwrap_err(),
            BreedError::NonFiniteFitness { index: 4 }
        );
        assert_eq!(
            Population::new(Vec::new()).best(&[]).unwrap_err(),
            BreedError::Empty
        );
    }
}
