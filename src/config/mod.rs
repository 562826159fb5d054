use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::TableError;

// Defaults for primer design. These reproduce the scoring model used to pick
// primers for the amplicon panels.

/// Melting temperature that candidates are scored against, in degrees C
pub const DEFAULT_MELT_TEMPERATURE_TARGET: f64 = 62.0;

/// GC percentage that candidates are scored against
pub const DEFAULT_GC_PERCENTAGE_TARGET: f64 = 50.0;

/// Melting temperature closeness counts double in the total score
pub const DEFAULT_MELT_TEMPERATURE_WEIGHT: f64 = 2.0;

pub const DEFAULT_GC_PERCENTAGE_WEIGHT: f64 = 1.0;

pub const DEFAULT_GC_CLAMP_WEIGHT: f64 = 1.0;

pub const DEFAULT_MIN_PRIMER_LENGTH: usize = 19;

pub const DEFAULT_MAX_PRIMER_LENGTH: usize = 26;

/// How melting temperature is estimated for a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MeltMethod {
    /// Wallace rule up to 13 bp, GC-content formula above
    #[default]
    Basic,
    /// Modified Breslauer nearest-neighbor model
    Breslauer,
}

/// What to do with an amplicon shorter than the longest primer candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ShortAmpliconPolicy {
    /// Fail the amplicon
    #[default]
    Reject,
    /// Enumerate only the primer lengths that fit in the amplicon
    Truncate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignParams {
    pub melt_temperature_target: f64,
    pub gc_percentage_target: f64,
    pub melt_temperature_weight: f64,
    pub gc_percentage_weight: f64,
    pub gc_clamp_weight: f64,
    pub min_primer_length: usize,
    pub max_primer_length: usize,
    pub melt_method: MeltMethod,
    pub short_amplicon: ShortAmpliconPolicy,
}

impl Default for DesignParams {
    fn default() -> Self {
        DesignParams {
            melt_temperature_target: DEFAULT_MELT_TEMPERATURE_TARGET,
            gc_percentage_target: DEFAULT_GC_PERCENTAGE_TARGET,
            melt_temperature_weight: DEFAULT_MELT_TEMPERATURE_WEIGHT,
            gc_percentage_weight: DEFAULT_GC_PERCENTAGE_WEIGHT,
            gc_clamp_weight: DEFAULT_GC_CLAMP_WEIGHT,
            min_primer_length: DEFAULT_MIN_PRIMER_LENGTH,
            max_primer_length: DEFAULT_MAX_PRIMER_LENGTH,
            melt_method: MeltMethod::default(),
            short_amplicon: ShortAmpliconPolicy::default(),
        }
    }
}

impl DesignParams {
    /// Read parameters from a TOML file. Fields that are not given keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, TableError> {
        let content = std::fs::read_to_string(path).map_err(|e| TableError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let params: DesignParams = toml::from_str(&content).map_err(|e| TableError::Toml {
            path: path.to_path_buf(),
            source: e,
        })?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.min_primer_length == 0 {
            return Err(TableError::Params(
                "min_primer_length must be greater than 0".to_string(),
            ));
        }
        if self.min_primer_length > self.max_primer_length {
            return Err(TableError::Params(format!(
                "min_primer_length ({}) must not exceed max_primer_length ({})",
                self.min_primer_length, self.max_primer_length
            )));
        }
        if self.melt_method == MeltMethod::Breslauer && self.min_primer_length < 2 {
            return Err(TableError::Params(
                "the breslauer melt method needs primers of at least 2 bp".to_string(),
            ));
        }
        let weights = [
            ("melt_temperature_weight", self.melt_temperature_weight),
            ("gc_percentage_weight", self.gc_percentage_weight),
            ("gc_clamp_weight", self.gc_clamp_weight),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(TableError::Params(format!(
                    "{} must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }
        if !self.melt_temperature_target.is_finite() || !self.gc_percentage_target.is_finite() {
            return Err(TableError::Params("targets must be finite numbers".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let params = DesignParams::default();
        assert_eq!(params.melt_temperature_target, 62.0);
        assert_eq!(params.gc_percentage_target, 50.0);
        assert_eq!(params.melt_temperature_weight, 2.0);
        assert_eq!(params.min_primer_length, 19);
        assert_eq!(params.max_primer_length, 26);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_from_toml_file_partial() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.toml");
        let mut file = File::create(&path).unwrap();
        writeln!(
            file,
            r#"
            melt_temperature_target = 60.0
            max_primer_length = 24
            melt_method = "breslauer"
            short_amplicon = "truncate"
            "#
        )
        .unwrap();

        let params = DesignParams::from_toml_file(&path).unwrap();
        assert_eq!(params.melt_temperature_target, 60.0);
        assert_eq!(params.max_primer_length, 24);
        assert_eq!(params.melt_method, MeltMethod::Breslauer);
        assert_eq!(params.short_amplicon, ShortAmpliconPolicy::Truncate);

        // Untouched fields keep their defaults
        assert_eq!(params.gc_percentage_target, 50.0);
        assert_eq!(params.min_primer_length, 19);
    }

    #[test]
    fn test_from_toml_file_unknown_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.toml");
        std::fs::write(&path, "melting_target = 60.0\n").unwrap();

        let result = DesignParams::from_toml_file(&path);
        assert!(matches!(result, Err(TableError::Toml { .. })));
    }

    #[test]
    fn test_from_toml_file_missing() {
        let dir = tempdir().unwrap();
        let result = DesignParams::from_toml_file(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(TableError::Io { .. })));
    }

    #[test]
    fn test_validate() {
        let mut params = DesignParams::default();
        params.min_primer_length = 30;
        assert!(params.validate().is_err());

        let mut params = DesignParams::default();
        params.min_primer_length = 0;
        assert!(params.validate().is_err());

        let mut params = DesignParams::default();
        params.gc_clamp_weight = -1.0;
        assert!(params.validate().is_err());

        let mut params = DesignParams::default();
        params.melt_temperature_target = f64::NAN;
        assert!(params.validate().is_err());
    }
}
