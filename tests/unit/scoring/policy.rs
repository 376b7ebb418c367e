use super::*;
use crate::foundation::core::{Point, Rgba, Size};
use crate::painting::segment::LineSegment;

fn settings() -> ScoringSettings {
    ScoringSettings {
        max_image_compare_points: 100.0,
        max_tape_points: 20.0,
        min_points_to_win: 90.0,
        points_deducted_per_tape: 8.0,
    }
}

#[test]
fn tape_score_never_goes_negative() {
    let s = settings();
    assert_eq!(tape_score(0, &s), 20.0);
    assert_eq!(tape_score(2, &s), 4.0);
    assert_eq!(tape_score(3, &s), 0.0);
    assert_eq!(tape_score(50, &s), 0.0);
}

#[test]
fn forger_score_scales_similarity_into_budget() {
    let s = settings();
    assert_eq!(forger_score(1.0, 0, &s), 120.0);
    assert_eq!(forger_score(0.5, 1, &s), 62.0);
    assert_eq!(forger_score(2.0, 10, &s), 100.0);
}

#[test]
fn win_threshold_is_inclusive() {
    let s = settings();
    assert!(s.did_forger_win(90.0));
    assert!(!s.did_forger_win(89.99));
}

#[test]
fn validation_rejects_negative_and_non_finite() {
    assert!(ScoringSettings::default().validate().is_ok());
    let negative = ScoringSettings {
        points_deducted_per_tape: -1.0,
        ..settings()
    };
    let err = negative.validate().unwrap_err().to_string();
    assert!(err.contains("points_deducted_per_tape"));
    let nan = ScoringSettings {
        min_points_to_win: f32::NAN,
        ..settings()
    };
    assert!(nan.validate().is_err());
}

#[test]
fn neutral_outcome_never_wins() {
    let n = RoundOutcome::neutral();
    assert_eq!(n.score, 0.0);
    assert!(!n.did_forger_win);
}

#[test]
fn determine_result_charges_reference_tapes() {
    let size = Size::new(40, 40);
    let mut reference = Painting::new(size);
    let tape = LineSegment::new(Rgba::BLACK, Point::new(5.0, 5.0), 10.0)
        .with_end(Point::new(35.0, 5.0));
    assert!(reference.begin_line(tape, true));
    reference.end_line().unwrap();
    assert!(reference.try_remove_tape(0));
    let forgery = Painting::new(size);

    let mut scorer = SimilarityScorer::default();
    let outcome = determine_result(&reference, &forgery, &settings(), &mut scorer);
    assert_eq!(outcome.similarity, 1.0);
    assert_eq!(outcome.tape_score, 12.0);
    assert_eq!(outcome.score, 112.0);
    assert!(outcome.did_forger_win);
}
