use tonnetz_lens::core::pitch::Pitch;
use tonnetz_lens::core::pitch_state::Aggregator;

#[test]
fn released_note_decays_out_in_exactly_100_ticks() {
    let mut agg = Aggregator::new();
    let p = Pitch::new(60.0);
    agg.note_on(1, p);
    agg.note_off(1);

    for tick in 1..=99 {
        agg.tick();
        assert!(
            agg.info(p.key()).is_some(),
            "entry vanished early at tick {tick}"
        );
    }
    agg.tick();
    assert!(agg.info(p.key()).is_none(), "entry should be gone at tick 100");
}

#[test]
fn map_is_empty_after_150_idle_ticks() {
    let mut agg = Aggregator::new();
    for (id, midi) in [(1u64, 48.0), (2, 60.5), (3, 72.25)] {
        agg.note_on(id, Pitch::new(midi));
    }
    for id in [1u64, 2, 3] {
        agg.note_off(id);
    }
    for _ in 0..150 {
        agg.tick();
    }
    assert!(agg.is_empty());
    assert_eq!(agg.held_count(), 0);
}

#[test]
fn retrigger_during_decay_restores_full_intensity() {
    let mut agg = Aggregator::new();
    let p = Pitch::new(64.0);
    agg.note_on(1, p);
    agg.note_off(1);
    for _ in 0..50 {
        agg.tick();
    }
    let halfway = agg.info(p.key()).unwrap().note;
    assert!(halfway < 1.0 && halfway > 0.0);

    agg.note_on(2, p);
    assert_eq!(agg.info(p.key()).unwrap().note, 1.0);
    agg.tick();
    assert_eq!(agg.info(p.key()).unwrap().note, 1.0);
}

#[test]
fn decay_restarts_on_each_release() {
    let mut agg = Aggregator::new();
    let p = Pitch::new(55.0);
    agg.note_on(1, p);
    agg.note_off(1);
    for _ in 0..80 {
        agg.tick();
    }
    agg.note_on(1, p);
    agg.note_off(1);
    // A fresh 100-tick window applies after the retrigger.
    for _ in 0..99 {
        agg.tick();
    }
    assert!(agg.info(p.key()).is_some());
    agg.tick();
    assert!(agg.info(p.key()).is_none());
}

#[test]
fn intensities_stay_in_unit_range_throughout() {
    let mut agg = Aggregator::new();
    let p = Pitch::new(69.0);
    agg.note_on(1, p);
    for tick in 0..300 {
        if tick == 120 {
            agg.note_off(1);
        }
        agg.tick();
        agg.check_invariants().unwrap();
    }
}
