pub mod config;
pub mod gene;
pub mod genome;
pub mod logging;
pub mod population;

pub use config::{
    ConfigError, CrossoverConfig, EvolutionConfig, LoggingConfig, MutationConfig, SpawnConfig,
    ValidationError,
};
pub use gene::{FEATURE_COUNT, Gene, RuleKind, Weights};
pub use genome::{Genome, GenomeId};
pub use population::{BreedError, Population};
