use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_POPULATION_SIZE: usize = 50;
const DEFAULT_ELITISM: usize = 2;
const DEFAULT_TOURNAMENT_SIZE: usize = 3;

/// Root evolution configuration loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvolutionConfig {
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    #[serde(default = "default_elitism")]
    pub elitism: usize,
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
    #[serde(default)]
    pub mutation: MutationConfig,
    #[serde(default)]
    pub crossover: CrossoverConfig,
    #[serde(default)]
    pub spawn: SpawnConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            elitism: DEFAULT_ELITISM,
            tournament_size: DEFAULT_TOURNAMENT_SIZE,
            mutation: MutationConfig::default(),
            crossover: CrossoverConfig::default(),
            spawn: SpawnConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EvolutionConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let mut cfg: EvolutionConfig = serde_yaml::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        positive("population_size", self.population_size)?;
        positive("tournament_size", self.tournament_size)?;
        if self.elitism > self.population_size {
            return Err(ValidationError::InvalidField {
                field: "elitism".to_string(),
                message: format!(
                    "cannot keep {} elites in a population of {}",
                    self.elitism, self.population_size
                ),
            });
        }
        self.mutation.validate()?;
        self.crossover.validate()?;
        self.spawn.validate()?;
        self.logging.normalize();
        Ok(())
    }
}

fn default_population_size() -> usize {
    DEFAULT_POPULATION_SIZE
}

fn default_elitism() -> usize {
    DEFAULT_ELITISM
}

fn default_tournament_size() -> usize {
    DEFAULT_TOURNAMENT_SIZE
}

/// Structural and per-gene mutation rates.
///
/// Structural rates are chances per mutation of the whole genome; the rest
/// apply independently to each gene, knob or weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MutationConfig {
    pub drop_gene: f64,
    pub add_gene: f64,
    pub swap_genes: f64,
    /// Genes are only appended while the genome has at most this many.
    pub max_length: usize,
    pub kind: f64,
    pub knob: f64,
    pub weight: f64,
    pub weight_step: f32,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            drop_gene: 1.0 / 10_000.0,
            add_gene: 1.0 / 10_000.0,
            swap_genes: 1.0 / 5_000.0,
            max_length: 20,
            kind: 0.001,
            knob: 0.02,
            weight: 0.05,
            weight_step: 0.1,
        }
    }
}

impl MutationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        probability("mutation.drop_gene", self.drop_gene)?;
        probability("mutation.add_gene", self.add_gene)?;
        probability("mutation.swap_genes", self.swap_genes)?;
        probability("mutation.kind", self.kind)?;
        probability("mutation.knob", self.knob)?;
        probability("mutation.weight", self.weight)?;
        if !self.weight_step.is_finite() || self.weight_step < 0.0 {
            return Err(ValidationError::InvalidField {
                field: "mutation.weight_step".to_string(),
                message: "step must be a finite, non-negative number".to_string(),
            });
        }
        Ok(())
    }
}

/// How children inherit from two parents of known fitness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CrossoverConfig {
    /// Chance to keep each tail gene when the fitter parent is the longer one.
    pub stronger_tail_keep: f64,
    /// Chance to keep each tail gene when the weaker parent is the longer one.
    pub weaker_tail_keep: f64,
    /// Chance that a shared position takes the fitter parent's gene.
    pub stronger_gene_bias: f64,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            stronger_tail_keep: 0.9,
            weaker_tail_keep: 0.4,
            stronger_gene_bias: 0.7,
        }
    }
}

impl CrossoverConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        probability("crossover.stronger_tail_keep", self.stronger_tail_keep)?;
        probability("crossover.weaker_tail_keep", self.weaker_tail_keep)?;
        probability("crossover.stronger_gene_bias", self.stronger_gene_bias)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    pub min_length: usize,
    pub max_length: usize,
    /// Largest value a freshly drawn knob can take.
    pub knob_max: u8,
    /// Fresh weights are drawn from `-weight_range..=weight_range`.
    pub weight_range: f32,
    /// Mutation passes applied to the hand-built model genome.
    pub model_mutation_passes: usize,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            min_length: 6,
            max_length: 9,
            knob_max: 3,
            weight_range: 1.0,
            model_mutation_passes: 30,
        }
    }
}

impl SpawnConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.min_length > self.max_length {
            return Err(ValidationError::InvalidField {
                field: "spawn.min_length".to_string(),
                message: format!(
                    "minimum length {} exceeds maximum {}",
                    self.min_length, self.max_length
                ),
            });
        }
        if !self.weight_range.is_finite() || self.weight_range < 0.0 {
            return Err(ValidationError::InvalidField {
                field: "spawn.weight_range".to_string(),
                message: "range must be a finite, non-negative number".to_string(),
            });
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_log_dir")]
    pub directory: PathBuf,
    #[serde(default = "default_json")]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            directory: default_log_dir(),
            json: default_json(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_json() -> bool {
    true
}

fn positive(field: &str, value: usize) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::InvalidField {
            field: field.to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn probability(field: &str, value: f64) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::InvalidField {
            field: field.to_string(),
            message: format!("{value} is not a probability"),
        });
    }
    Ok(())
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARTIAL_YAML: &str = r#"
population_size: 24
mutation:
  drop_gene: 0.01
crossover:
  weaker_tail_keep: 0.25
"#;

    #[test]
    fn missing_blocks_fall_back_to_defaults() {
        let mut cfg: EvolutionConfig = serde_yaml::from_str(PARTIAL_YAML).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.population_size, 24);
        assert_eq!(cfg.elitism, DEFAULT_ELITISM);
        assert_eq!(cfg.mutation.drop_gene, 0.01);
        assert_eq!(cfg.mutation.swap_genes, 1.0 / 5_000.0);
        assert_eq!(cfg.crossover.weaker_tail_keep, 0.25);
        assert_eq!(cfg.crossover.stronger_tail_keep, 0.9);
        assert_eq!(cfg.spawn, SpawnConfig::default());
        assert!(!cfg.logging.enable_structured);
    }

    #[test]
    fn rates_outside_unit_interval_are_rejected() {
        let mut cfg = EvolutionConfig::default();
        cfg.crossover.stronger_gene_bias = 1.5;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().starts_with("crossover.stronger_gene_bias"));
    }

    #[test]
    fn elitism_cannot_exceed_population() {
        let mut cfg = EvolutionConfig {
            population_size: 2,
            elitism: 3,
            ..EvolutionConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn blank_level_normalizes_to_info() {
        let mut cfg = EvolutionConfig::default();
        cfg.logging.tracing_level = "  ".to_string();
        cfg.validate().unwrap();
        assert_eq!(cfg.logging.level(), Some(Level::INFO));
    }
}
