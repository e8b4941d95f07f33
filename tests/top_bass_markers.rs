use tonnetz_lens::core::pitch::Pitch;
use tonnetz_lens::core::pitch_state::Aggregator;

fn held_triad() -> Aggregator {
    let mut agg = Aggregator::new();
    agg.note_on(1, Pitch::new(60.0));
    agg.note_on(2, Pitch::new(64.0));
    agg.note_on(3, Pitch::new(67.0));
    agg
}

#[test]
fn extremes_converge_to_one_and_inner_voices_to_zero() {
    let mut agg = held_triad();
    for _ in 0..20 {
        agg.tick();
    }
    let info = |midi: f64| agg.info(Pitch::new(midi).key()).unwrap();
    assert_eq!(info(67.0).top, 1.0);
    assert_eq!(info(67.0).bass, 0.0);
    assert_eq!(info(60.0).bass, 1.0);
    assert_eq!(info(60.0).top, 0.0);
    assert_eq!(info(64.0).top, 0.0);
    assert_eq!(info(64.0).bass, 0.0);
}

#[test]
fn markers_step_rather_than_snap() {
    let mut agg = held_triad();
    agg.tick();
    let top = agg.info(Pitch::new(67.0).key()).unwrap().top;
    assert!(top > 0.0 && top < 1.0, "one tick should move, not snap: {top}");
}

#[test]
fn marker_migrates_when_the_extreme_is_released() {
    let mut agg = held_triad();
    for _ in 0..20 {
        agg.tick();
    }
    agg.note_off(3); // drop the 67
    for _ in 0..20 {
        agg.tick();
    }
    let info = |midi: f64| agg.info(Pitch::new(midi).key()).unwrap();
    assert_eq!(info(64.0).top, 1.0, "64 becomes the new top");
    assert_eq!(info(60.0).bass, 1.0, "bass is unchanged");
}

#[test]
fn single_note_is_both_top_and_bass() {
    let mut agg = Aggregator::new();
    agg.note_on(1, Pitch::new(62.5));
    for _ in 0..10 {
        agg.tick();
    }
    let info = agg.info(Pitch::new(62.5).key()).unwrap();
    assert_eq!(info.top, 1.0);
    assert_eq!(info.bass, 1.0);
}

#[test]
fn bend_past_a_neighbor_moves_the_top_marker() {
    let mut agg = Aggregator::new();
    agg.note_on(1, Pitch::new(60.0));
    agg.note_on(2, Pitch::new(62.0));
    for _ in 0..10 {
        agg.tick();
    }
    // Glide note 1 above note 2.
    agg.note_bend(1, Pitch::new(63.5));
    for _ in 0..20 {
        agg.tick();
    }
    assert_eq!(agg.info(Pitch::new(63.5).key()).unwrap().top, 1.0);
    assert_eq!(agg.info(Pitch::new(62.0).key()).unwrap().top, 0.0);
    assert_eq!(agg.info(Pitch::new(62.0).key()).unwrap().bass, 1.0);
}
