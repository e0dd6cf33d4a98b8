use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{RamanError, Result};

fn default_n_exp_steps() -> usize {
    100_000
}

/// Run configuration, in physical units.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Kelvin
    pub temperature: f64,
    /// Number of integration steps per `2\pi`
    pub n_steps: usize,
    /// Integrand magnitude below which the integral is truncated
    pub limit: f64,
    /// meV
    pub decay_rate: f64,
    /// meV
    pub smearing: f64,
    /// Energy of the intermediate electronic level, eV
    pub mid_level: f64,
    /// eV
    pub laser_energies: Vec<f64>,
    /// meV
    pub energy_shifts: Vec<f64>,
    /// Optional explicit counts, checked against the lists
    #[serde(default)]
    pub n_lasers: Option<usize>,
    #[serde(default)]
    pub n_shifts: Option<usize>,
    /// Path of the mode table, relative to the configuration file
    pub mode_table: PathBuf,
    #[serde(default = "default_n_exp_steps")]
    pub n_exp_steps: usize,
    #[serde(default)]
    pub workers: Option<usize>,
}

impl RunConfig {
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration, or a declared
    /// count disagrees with its list
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: RunConfig = serde_yaml::from_str(text)?;
        config.check_counts()?;
        Ok(config)
    }

    /// Read a configuration file, resolving the mode table against its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_to_string(path)?;
        let mut config = Self::from_yaml(&text)?;
        if config.mode_table.is_relative() {
            if let Some(dir) = path.parent() {
                config.mode_table = dir.join(&config.mode_table);
            }
        }
        Ok(config)
    }

    fn check_counts(&self) -> Result<()> {
        for (what, declared, list) in [
            ("laser energies", self.n_lasers, &self.laser_energies),
            ("energy shifts", self.n_shifts, &self.energy_shifts),
        ] {
            if let Some(declared) = declared {
                if declared != list.len() {
                    return Err(RamanError::CountMismatch {
                        what,
                        declared,
                        found: list.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// One row of the mode table.
#[derive(Clone, Debug, PartialEq)]
pub struct ModeRecord {
    pub index: usize,
    pub huang_rhys: f64,
    /// Scaled units
    pub omega: f64,
    /// Scaled units
    pub omega_excited: f64,
}

/// The phonon mode table: a header line, the mode count, then one
/// `index S_j omega_j omega_nj` line per mode.
#[derive(Clone, Debug, PartialEq)]
pub struct ModeTable {
    pub modes: Vec<ModeRecord>,
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, line: usize, name: &str) -> Result<T> {
    let field = field.ok_or_else(|| RamanError::ModeTable {
        line,
        message: format!("missing {name}"),
    })?;
    field.parse().map_err(|_| RamanError::ModeTable {
        line,
        message: format!("bad {name} '{field}'"),
    })
}

impl ModeTable {
    /// # Errors
    ///
    /// Returns [`RamanError::ModeTable`] for malformed lines, or
    /// [`RamanError::CountMismatch`] if fewer modes are listed than declared
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate().skip(1);
        let (count_line, count) = lines.next().ok_or_else(|| RamanError::ModeTable {
            line: 2,
            message: "missing mode count".to_owned(),
        })?;
        let n_modes: usize =
            parse_field(count.split_whitespace().next(), count_line + 1, "mode count")?;

        let modes = lines
            .filter(|(_, l)| !l.trim().is_empty())
            .take(n_modes)
            .map(|(i, l)| {
                let mut fields = l.split_whitespace();
                Ok(ModeRecord {
                    index: parse_field(fields.next(), i + 1, "mode index")?,
                    huang_rhys: parse_field(fields.next(), i + 1, "Huang-Rhys factor")?,
                    omega: parse_field(fields.next(), i + 1, "frequency")?,
                    omega_excited: parse_field(fields.next(), i + 1, "excited frequency")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if modes.len() != n_modes {
            return Err(RamanError::CountMismatch {
                what: "modes",
                declared: n_modes,
                found: modes.len(),
            });
        }
        Ok(ModeTable { modes })
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        Self::parse(&read_to_string(path)?)
    }
}

fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| RamanError::Io {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{ModeTable, RunConfig};
    use crate::error::RamanError;

    const CONFIG: &str = "
temperature: 300.0
n_steps: 200
limit: 1.0e-6
decay_rate: 10.0
smearing: 5.0
mid_level: 2.0
laser_energies: [2.1, 2.3]
energy_shifts: [-10.0, 0.0, 10.0]
mode_table: Sj.out
";

    #[test]
    fn test_parse_config() {
        let config = RunConfig::from_yaml(CONFIG).unwrap();
        assert_eq!(config.n_steps, 200);
        assert_eq!(config.laser_energies, vec![2.1, 2.3]);
        assert_eq!(config.energy_shifts.len(), 3);
        assert_eq!(config.n_exp_steps, 100_000);
        assert_eq!(config.workers, None);
        assert_eq!(config.mode_table, Path::new("Sj.out"));
    }

    #[test]
    fn test_declared_counts_must_match() {
        let text = format!("{CONFIG}n_shifts: 4\n");
        assert!(matches!(
            RunConfig::from_yaml(&text),
            Err(RamanError::CountMismatch { declared: 4, found: 3, .. })
        ));
        let text = format!("{CONFIG}n_shifts: 3\nn_lasers: 2\n");
        assert!(RunConfig::from_yaml(&text).is_ok());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let text = format!("{CONFIG}gamma: 1.0\n");
        assert!(matches!(RunConfig::from_yaml(&text), Err(RamanError::Yaml(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let result = RunConfig::load(Path::new("/nonexistent/raman.yaml"));
        assert!(matches!(result, Err(RamanError::Io { .. })));
    }

    #[test]
    fn test_parse_mode_table() {
        let table = ModeTable::parse(
            "Huang-Rhys factors\n2\n  1 0.25 1.5 1.6\n\n  2 0.10 3.0 2.9 extra\n",
        )
        .unwrap();
        assert_eq!(table.modes.len(), 2);
        assert_eq!(table.modes[1].index, 2);
        assert!((table.modes[0].huang_rhys - 0.25).abs() < 1e-15);
        assert!((table.modes[1].omega_excited - 2.9).abs() < 1e-15);
    }

    #[test]
    fn test_mode_table_errors() {
        assert!(matches!(
            ModeTable::parse("header\n3\n1 0.1 1.0 1.0\n"),
            Err(RamanError::CountMismatch { declared: 3, found: 1, .. })
        ));
        assert!(matches!(
            ModeTable::parse("header\n1\n1 0.1 abc 1.0\n"),
            Err(RamanError::ModeTable { line: 3, .. })
        ));
        assert!(matches!(
            ModeTable::parse("header\n"),
            Err(RamanError::ModeTable { line: 2, .. })
        ));
    }
}
