use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::lattice::LatticeParams;
use crate::core::tuning::{Factor, TuningInfo};

/// One harmonic factor: slaved to the fifth chain by `steps`, or free at
/// `cents`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FactorConfig {
    #[serde(default = "FactorConfig::default_generated")]
    pub generated: bool,
    #[serde(default)]
    pub steps: i32,
    #[serde(default)]
    pub cents: f64,
}

impl FactorConfig {
    fn default_generated() -> bool {
        true
    }

    pub fn generated(steps: i32) -> Self {
        Self {
            generated: true,
            steps,
            cents: 0.0,
        }
    }

    pub fn independent(cents: f64) -> Self {
        Self {
            generated: false,
            steps: 0,
            cents,
        }
    }

    fn factor(&self) -> Factor {
        if self.generated {
            Factor::Generated { steps: self.steps }
        } else {
            Factor::Independent {
                semis: self.cents / 100.0,
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TuningConfig {
    /// Base generator (tempered fifth) in cents.
    #[serde(default = "TuningConfig::default_fifth_cents")]
    pub fifth_cents: f64,
    #[serde(default = "TuningConfig::default_third")]
    pub third: FactorConfig,
    #[serde(default = "TuningConfig::default_seventh")]
    pub seventh: FactorConfig,
    #[serde(default = "TuningConfig::default_eleventh")]
    pub eleventh: FactorConfig,
}

impl TuningConfig {
    fn default_fifth_cents() -> f64 {
        700.0
    }
    fn default_third() -> FactorConfig {
        FactorConfig::generated(4)
    }
    fn default_seventh() -> FactorConfig {
        FactorConfig::generated(-2)
    }
    fn default_eleventh() -> FactorConfig {
        FactorConfig::generated(6)
    }

    pub fn tuning_info(&self) -> TuningInfo {
        TuningInfo::new(
            self.fifth_cents / 100.0,
            self.third.factor(),
            self.seventh.factor(),
            self.eleventh.factor(),
        )
    }
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            fifth_cents: Self::default_fifth_cents(),
            third: Self::default_third(),
            seventh: Self::default_seventh(),
            eleventh: Self::default_eleventh(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LatticeConfig {
    #[serde(default = "LatticeConfig::default_rows")]
    pub rows: usize,
    #[serde(default = "LatticeConfig::default_cols")]
    pub cols: usize,
    #[serde(default)]
    pub offset_x: i32,
    #[serde(default)]
    pub offset_y: i32,
    #[serde(default)]
    pub offset_z: i32,
    #[serde(default = "LatticeConfig::default_tolerance_cents")]
    pub tolerance_cents: f64,
    #[serde(default = "LatticeConfig::default_anchor_offset")]
    pub anchor_offset: i32,
    #[serde(default = "LatticeConfig::default_letter_span")]
    pub letter_span: i32,
}

impl LatticeConfig {
    fn default_rows() -> usize {
        13
    }
    fn default_cols() -> usize {
        9
    }
    fn default_tolerance_cents() -> f64 {
        5.0
    }
    fn default_anchor_offset() -> i32 {
        1
    }
    fn default_letter_span() -> i32 {
        4
    }

    pub fn lattice_params(&self) -> LatticeParams {
        LatticeParams {
            rows: self.rows.max(1),
            cols: self.cols.max(1),
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            offset_z: self.offset_z,
            tolerance: self.tolerance_cents / 100.0,
            anchor_offset: self.anchor_offset,
            letter_span: self.letter_span,
        }
    }
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            rows: Self::default_rows(),
            cols: Self::default_cols(),
            offset_x: 0,
            offset_y: 0,
            offset_z: 0,
            tolerance_cents: Self::default_tolerance_cents(),
            anchor_offset: Self::default_anchor_offset(),
            letter_span: Self::default_letter_span(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MidiConfig {
    /// Substring of the input port name to connect to; first port if unset.
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default = "MidiConfig::default_bend_range_semis")]
    pub bend_range_semis: f64,
}

impl MidiConfig {
    fn default_bend_range_semis() -> f64 {
        24.0
    }
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            port: None,
            bend_range_semis: Self::default_bend_range_semis(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub tuning: TuningConfig,
    #[serde(default)]
    pub lattice: LatticeConfig,
    #[serde(default)]
    pub midi: MidiConfig,
}

impl AppConfig {
    /// Read the config at `path`, falling back to defaults on any error.
    /// A missing file is created with the defaults so users have something
    /// to edit.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        eprintln!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    eprintln!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, text) {
                    eprintln!("Failed to write default config to {path}: {err}");
                }
            }
            Err(err) => {
                eprintln!("Failed to serialize default config: {err}");
            }
        }
        default_cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_is_twelve_tet() {
        let t = TuningConfig::default().tuning_info();
        assert_eq!(t.semis_factor3(), 7.0);
        assert_eq!(t.semis_factor5(), 4.0);
        assert_eq!(t.semis_factor7(), 10.0);
        assert_eq!(t.semis_factor11(), 6.0);
    }

    #[test]
    fn independent_factor_converts_cents() {
        let t = TuningConfig {
            third: FactorConfig::independent(386.314),
            ..TuningConfig::default()
        }
        .tuning_info();
        assert!((t.semis_factor5() - 3.86314).abs() < 1e-12);
    }

    #[test]
    fn lattice_params_convert_cents_and_clamp_size() {
        let cfg = LatticeConfig {
            rows: 0,
            tolerance_cents: 10.0,
            ..LatticeConfig::default()
        };
        let params = cfg.lattice_params();
        assert_eq!(params.rows, 1);
        assert!((params.tolerance - 0.1).abs() < 1e-12);
    }
}
