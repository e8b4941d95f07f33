//! Generator-chain tuning parameterization.
//!
//! A tuning is a base generator (a tempered fifth, in semitones) plus three
//! harmonic factors (5, 7, 11). Each factor is either generated from the
//! base by an integer number of fifths mod the octave, or carries its own
//! independent size. One representation covers equal temperaments
//! (all-generated), meantones (tempered fifth, generated rest), and just
//! intonation (every factor independent).

/// How one harmonic factor gets its size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Factor {
    /// `steps` fifths, folded into the octave. Exact modular arithmetic.
    Generated { steps: i32 },
    /// Free interval size in semitones.
    Independent { semis: f64 },
}

/// Immutable tuning snapshot. Replaced wholesale on any tuning change,
/// never mutated field by field.
#[derive(Clone, Debug, PartialEq)]
pub struct TuningInfo {
    semis_factor3: f64,
    factor5: Factor,
    factor7: Factor,
    factor11: Factor,
}

impl TuningInfo {
    pub fn new(semis_factor3: f64, factor5: Factor, factor7: Factor, factor11: Factor) -> Self {
        Self {
            semis_factor3,
            factor5,
            factor7,
            factor11,
        }
    }

    /// 12-tone equal temperament: 700-cent fifth, everything generated.
    pub fn twelve_tet() -> Self {
        Self::new(
            7.0,
            Factor::Generated { steps: 4 },
            Factor::Generated { steps: -2 },
            Factor::Generated { steps: 6 },
        )
    }

    fn resolve(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Generated { steps } => {
                (f64::from(steps) * self.semis_factor3).rem_euclid(12.0)
            }
            Factor::Independent { semis } => semis,
        }
    }

    pub fn semis_factor3(&self) -> f64 {
        self.semis_factor3
    }

    pub fn semis_factor5(&self) -> f64 {
        self.resolve(self.factor5)
    }

    pub fn semis_factor7(&self) -> f64 {
        self.resolve(self.factor7)
    }

    pub fn semis_factor11(&self) -> f64 {
        self.resolve(self.factor11)
    }

    pub fn factor5(&self) -> Factor {
        self.factor5
    }

    pub fn factor7(&self) -> Factor {
        self.factor7
    }

    pub fn factor11(&self) -> Factor {
        self.factor11
    }

    /// The factor-5 size the fifth chain would produce for a letter span of
    /// `steps` fifths. Tile naming compares this against the actual factor-5
    /// size to decide whether comma annotations apply.
    pub fn generated_factor5_semis(&self, steps: i32) -> f64 {
        (f64::from(steps) * self.semis_factor3).rem_euclid(12.0)
    }
}
