//! Absolute pitch and octave-reduced pitch class.
//!
//! A [`Pitch`] is a position in fractional MIDI units (69.0 = A4 = 440 Hz).
//! Equality is epsilon-tolerant and therefore non-transitive; containers
//! never key on it directly and use the quantized [`PitchKey`] instead.

/// Two pitches closer than this are considered the same pitch.
/// 1/1000 cent, in semitone units.
pub const EPSILON: f64 = 1e-5;

/// Quantization step for [`PitchKey`]: 1/1000 semitone.
const KEY_STEPS_PER_SEMI: f64 = 1000.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Pitch {
    pub midi: f64,
}

impl Pitch {
    pub fn new(midi: f64) -> Self {
        Self { midi }
    }

    /// Convert a frequency to fractional MIDI units.
    ///
    /// Returns `None` for non-finite or non-positive input; callers at the
    /// note-source boundary must not let such values into the pitch domain.
    pub fn from_freq_hz(freq_hz: f64) -> Option<Self> {
        if !freq_hz.is_finite() || freq_hz <= 0.0 {
            return None;
        }
        let midi = 69.0 + 12.0 * (freq_hz / 440.0).log2();
        if midi.is_finite() { Some(Self { midi }) } else { None }
    }

    pub fn freq_hz(&self) -> f64 {
        440.0 * ((self.midi - 69.0) / 12.0).exp2()
    }

    /// Epsilon-tolerant equality. Weak (non-transitive): use only for
    /// explicit matching, never for container identity.
    #[inline]
    pub fn approx_eq(&self, other: &Pitch) -> bool {
        (self.midi - other.midi).abs() < EPSILON
    }

    /// Stable container identity: pitch rounded to 1/1000 semitone.
    #[inline]
    pub fn key(&self) -> PitchKey {
        PitchKey((self.midi * KEY_STEPS_PER_SEMI).round() as i64)
    }

    /// Total order over raw values (stricter granularity than `approx_eq`).
    #[inline]
    pub fn total_cmp(&self, other: &Pitch) -> std::cmp::Ordering {
        self.midi.total_cmp(&other.midi)
    }
}

/// Exact, hashable stand-in for a [`Pitch`] in associative containers.
///
/// Epsilon-equality is unusable as map identity (two pitches within epsilon
/// can quantize apart, and hashing has no tolerance), so all shared state is
/// keyed by this fixed-point value and epsilon matching stays confined to
/// [`PitchClass::matches`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PitchKey(pub i64);

impl PitchKey {
    pub fn pitch(&self) -> Pitch {
        Pitch {
            midi: self.0 as f64 / KEY_STEPS_PER_SEMI,
        }
    }
}

/// A pitch folded into a single octave, in `[0, 12)` semitones.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PitchClass {
    semis: f64,
}

impl PitchClass {
    pub fn from_pitch(pitch: Pitch) -> Self {
        Self {
            semis: pitch.midi.rem_euclid(12.0),
        }
    }

    pub fn from_semis(semis: f64) -> Self {
        Self {
            semis: semis.rem_euclid(12.0),
        }
    }

    pub fn semis(&self) -> f64 {
        self.semis
    }

    pub fn cents(&self) -> f64 {
        self.semis * 100.0
    }

    /// Does `pitch` (in any octave) land on this class within `tolerance`
    /// semitones? The effective window is `max(EPSILON, tolerance)`.
    pub fn matches(&self, pitch: Pitch, tolerance: f64) -> bool {
        let reduced = PitchClass::from_pitch(pitch).semis;
        (reduced - self.semis).abs() <= EPSILON.max(tolerance)
    }

    pub fn approx_eq(&self, other: &PitchClass) -> bool {
        (self.semis - other.semis).abs() < EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_freq_reference_points() {
        let a4 = Pitch::from_freq_hz(440.0).unwrap();
        assert!((a4.midi - 69.0).abs() < 1e-9);
        let a5 = Pitch::from_freq_hz(880.0).unwrap();
        assert!((a5.midi - 81.0).abs() < 1e-9);
        let c4 = Pitch::from_freq_hz(261.625_565).unwrap();
        assert!((c4.midi - 60.0).abs() < 1e-6);
    }

    #[test]
    fn from_freq_rejects_bad_input() {
        assert!(Pitch::from_freq_hz(0.0).is_none());
        assert!(Pitch::from_freq_hz(-440.0).is_none());
        assert!(Pitch::from_freq_hz(f64::NAN).is_none());
        assert!(Pitch::from_freq_hz(f64::INFINITY).is_none());
    }

    #[test]
    fn freq_round_trip() {
        for &f in &[27.5, 261.63, 440.0, 3520.0] {
            let p = Pitch::from_freq_hz(f).unwrap();
            assert!((p.freq_hz() - f).abs() / f < 1e-9);
        }
    }

    #[test]
    fn approx_eq_is_epsilon_bounded() {
        let p = Pitch::new(60.0);
        assert!(p.approx_eq(&Pitch::new(60.0 + EPSILON * 0.5)));
        assert!(!p.approx_eq(&Pitch::new(60.0 + EPSILON * 2.0)));
    }

    #[test]
    fn key_quantizes_to_millisemitones() {
        assert_eq!(Pitch::new(60.0).key(), PitchKey(60_000));
        assert_eq!(Pitch::new(60.0004).key(), PitchKey(60_000));
        assert_eq!(Pitch::new(60.0006).key(), PitchKey(60_001));
        assert_eq!(Pitch::new(-1.5).key(), PitchKey(-1_500));
    }

    #[test]
    fn negative_pitch_reduces_into_octave() {
        let pc = PitchClass::from_pitch(Pitch::new(-1.0));
        assert!((pc.semis() - 11.0).abs() < 1e-12);
        let pc = PitchClass::from_pitch(Pitch::new(-24.0));
        assert!(pc.semis().abs() < 1e-12);
    }

    #[test]
    fn matches_uses_max_of_epsilon_and_tolerance() {
        let pc = PitchClass::from_semis(4.0);
        // Zero tolerance still allows the built-in epsilon.
        assert!(pc.matches(Pitch::new(64.0 + EPSILON * 0.5), 0.0));
        assert!(!pc.matches(Pitch::new(64.002), 0.0));
        assert!(pc.matches(Pitch::new(64.002), 0.05));
    }
}
