//! Run configuration, overridable through `SEPSIS_*` environment variables.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use tracing::Level;

use crate::dataset::{SPLIT_SEED, TEST_RATIO};
use crate::error::{Error, Result};
use crate::selector::{DatasetChoice, select_dataset};

pub const ENV_DATA_DIR: &str = "SEPSIS_DATA_DIR";
pub const ENV_OUTPUT_DIR: &str = "SEPSIS_OUTPUT_DIR";
pub const ENV_DATASET: &str = "SEPSIS_DATASET";
pub const ENV_DATASET_PATH: &str = "SEPSIS_DATASET_PATH";
pub const ENV_MAX_ATTEMPTS: &str = "SEPSIS_MAX_ATTEMPTS";
pub const ENV_NEIGHBOURS: &str = "SEPSIS_NEIGHBOURS";
pub const ENV_LOG: &str = "SEPSIS_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Directory holding the SMALL/MEDIUM/LARGE study files.
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Skips the prompt when set.
    pub dataset: Option<DatasetChoice>,
    /// Skips the prompt and reports under the empty size label.
    pub dataset_path: Option<PathBuf>,
    /// `None` re-prompts forever.
    pub max_attempts: Option<usize>,
    pub neighbours: usize,
    pub test_ratio: f64,
    pub seed: u64,
    pub log_level: Level,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            dataset: None,
            dataset_path: None,
            max_attempts: None,
            neighbours: 1,
            test_ratio: TEST_RATIO,
            seed: SPLIT_SEED,
            log_level: Level::INFO,
        }
    }
}

impl RunConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset or empty keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = RunConfig::default();

        if let Some(dir) = get(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(choice) = get(ENV_DATASET) {
            config.dataset = Some(choice.trim().parse()?);
        }
        if let Some(path) = get(ENV_DATASET_PATH) {
            config.dataset_path = Some(PathBuf::from(path));
        }
        if let Some(max) = get(ENV_MAX_ATTEMPTS) {
            config.max_attempts = Some(parse_positive(ENV_MAX_ATTEMPTS, &max)?);
        }
        if let Some(k) = get(ENV_NEIGHBOURS) {
            config.neighbours = parse_positive(ENV_NEIGHBOURS, &k)?;
        }
        if let Some(level) = get(ENV_LOG) {
            config.log_level = Level::from_str(level.trim())
                .map_err(|_| Error::InvalidConfig(format!("{ENV_LOG}: unknown log level {level:?}")))?;
        }

        Ok(config)
    }
}

/// The study file a run reads and the size label its report is named after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    pub path: PathBuf,
    pub size_label: &'static str,
}

impl RunConfig {
    /// An explicit path wins over a preset choice, which wins over asking on
    /// `input`/`output`.
    pub fn dataset_source<R, W>(&self, input: &mut R, output: &mut W) -> Result<DatasetSource>
    where
        R: BufRead,
        W: Write,
    {
        if let Some(path) = &self.dataset_path {
            return Ok(DatasetSource {
                path: path.clone(),
                size_label: "",
            });
        }

        let choice = match self.dataset {
            Some(choice) => choice,
            None => select_dataset(input, output, self.max_attempts)?,
        };
        Ok(DatasetSource {
            path: choice.path_in(&self.data_dir),
            size_label: choice.size_label(),
        })
    }
}

fn parse_positive(key: &str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::InvalidConfig(format!(
            "{key} must be a positive integer, got {value:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::PROMPT;
    use std::collections::HashMap;
    use std::io::Cursor;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<RunConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RunConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_the_study_setup() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.neighbours, 1);
        assert_eq!(config.test_ratio, 0.2);
        assert_eq!(config.seed, 0);
        assert!(config.dataset.is_none());
        assert!(config.max_attempts.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = from_pairs(&[
            (ENV_DATA_DIR, "/data"),
            (ENV_OUTPUT_DIR, "/tmp/out"),
            (ENV_DATASET, "3"),
            (ENV_MAX_ATTEMPTS, "5"),
            (ENV_NEIGHBOURS, "3"),
            (ENV_LOG, "debug"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.dataset, Some(DatasetChoice::Large));
        assert_eq!(config.max_attempts, Some(5));
        assert_eq!(config.neighbours, 3);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn empty_values_keep_defaults() {
        let config = from_pairs(&[(ENV_DATASET, ""), (ENV_NEIGHBOURS, "  ")]).unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn bad_values_are_rejected() {
        for pairs in [
            [(ENV_DATASET, "4")],
            [(ENV_NEIGHBOURS, "0")],
            [(ENV_MAX_ATTEMPTS, "many")],
            [(ENV_LOG, "loud")],
        ] {
            assert!(matches!(from_pairs(&pairs), Err(Error::InvalidConfig(_))));
        }
    }

    fn resolve(config: &RunConfig, answers: &str) -> (Result<DatasetSource>, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let source = config.dataset_source(&mut input, &mut output);
        (source, String::from_utf8(output).unwrap())
    }

    #[test]
    fn explicit_path_beats_preset_and_prompt() {
        let config = from_pairs(&[(ENV_DATASET_PATH, "/studies/custom.csv"), (ENV_DATASET, "3")]).unwrap();
        let (source, output) = resolve(&config, "1\n");

        assert_eq!(
            source.unwrap(),
            DatasetSource {
                path: PathBuf::from("/studies/custom.csv"),
                size_label: "",
            }
        );
        assert!(output.is_empty());
    }

    #[test]
    fn preset_choice_skips_the_prompt() {
        let config = from_pairs(&[(ENV_DATA_DIR, "/data"), (ENV_DATASET, "2")]).unwrap();
        let (source, output) = resolve(&config, "1\n");

        assert_eq!(
            source.unwrap(),
            DatasetSource {
                path: PathBuf::from("/data/MEDIUM_sepsis_survival_study.csv"),
                size_label: "Medium",
            }
        );
        assert!(output.is_empty());
    }

    #[test]
    fn without_overrides_the_user_is_asked() {
        let config = from_pairs(&[(ENV_DATA_DIR, "/data")]).unwrap();
        let (source, output) = resolve(&config, "9\n3\n");

        assert_eq!(
            source.unwrap(),
            DatasetSource {
                path: PathBuf::from("/data/LARGE_sepsis_survival_study.csv"),
                size_label: "Large",
            }
        );
        assert_eq!(output.matches(PROMPT).count(), 2);
    }

    #[test]
    fn prompt_respects_the_attempt_cap() {
        let config = from_pairs(&[(ENV_MAX_ATTEMPTS, "1")]).unwrap();
        let (source, _) = resolve(&config, "9\n3\n");
        assert!(matches!(source, Err(Error::TooManyAttempts(1))));
    }
}
