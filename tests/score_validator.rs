use wavefall_server::error::ScoreRejection;
use wavefall_server::scores::{
    validate_claim, GameMode, ScoreClaim, MAX_DURATION_MS, MAX_SCORE, MAX_SCORE_PER_WAVE,
    MAX_WAVE, MIN_WAVE_DURATION_MS,
};
use wavefall_server::ScoreRecord;

fn claim(mode: GameMode, wave_reached: u32, duration_ms: u64, score: u64) -> ScoreClaim {
    ScoreClaim {
        mode,
        wave_reached,
        duration_ms,
        score,
        seed: "d41d8cd9".into(),
        client_version: Some("1.4.2".into()),
        user_id: None,
    }
}

// The thresholds are contract values, not incidental numbers; a change to
// either is a change to what the backend promises to accept.
#[test]
fn test_threshold_constants_are_pinned() {
    assert_eq!(MIN_WAVE_DURATION_MS, 5_000);
    assert_eq!(MAX_SCORE_PER_WAVE, 10_000);
    assert_eq!(MAX_WAVE, 100);
    assert_eq!(MAX_SCORE, 1_000_000);
    assert_eq!(MAX_DURATION_MS, 86_400_000);
}

#[test]
fn test_extreme_duration_never_reaches_persistence() {
    // A duration near u64::MAX would go negative in the signed column; the
    // structural cap must refuse it before a record is ever built.
    let c = claim(GameMode::Endless, 1, u64::MAX, 0);
    let err = validate_claim(&c).unwrap_err();
    assert!(matches!(err, ScoreRejection::StructuralInvalid(_)));

    // Everything the validator does accept narrows losslessly.
    let c = claim(GameMode::Endless, 1, MAX_DURATION_MS, 0);
    assert!(validate_claim(&c).is_ok());
    let record = ScoreRecord::from_claim(&c);
    assert_eq!(record.duration_ms, MAX_DURATION_MS as i64);
    assert!(record.duration_ms >= 0);
}

#[test]
fn test_plausible_claim_is_accepted() {
    // Ten waves in a minute at 5k points apiece sits inside both envelopes.
    assert!(validate_claim(&claim(GameMode::Normal, 10, 60_000, 50_000)).is_ok());
}

#[test]
fn test_too_fast_claim_is_implausible_duration() {
    let err = validate_claim(&claim(GameMode::Normal, 10, 30_000, 50_000)).unwrap_err();
    assert_eq!(
        err,
        ScoreRejection::ImplausibleDuration {
            wave_reached: 10,
            duration_ms: 30_000,
            floor_ms: 50_000,
        }
    );
}

#[test]
fn test_overscored_claim_is_implausible_rate() {
    let err = validate_claim(&claim(GameMode::Hard, 5, 30_000, 60_000)).unwrap_err();
    assert_eq!(
        err,
        ScoreRejection::ImplausibleScoreRate {
            wave_reached: 5,
            score: 60_000,
            ceiling: 50_000,
        }
    );
}

#[test]
fn test_wave_zero_is_structurally_invalid() {
    let err = validate_claim(&claim(GameMode::Endless, 0, 60_000, 1_000)).unwrap_err();
    assert!(matches!(err, ScoreRejection::StructuralInvalid(_)));
}

#[test]
fn test_duration_floor_checked_before_score_ceiling() {
    // Violates both heuristics; the duration floor reports first.
    let err = validate_claim(&claim(GameMode::Normal, 10, 1_000, 999_999)).unwrap_err();
    assert!(matches!(err, ScoreRejection::ImplausibleDuration { .. }));
}

#[test]
fn test_validator_applies_identically_across_modes() {
    for mode in [GameMode::Normal, GameMode::Hard, GameMode::Endless] {
        assert!(validate_claim(&claim(mode, 10, 60_000, 50_000)).is_ok());
        assert!(validate_claim(&claim(mode, 10, 30_000, 50_000)).is_err());
    }
}

#[test]
fn test_anonymous_and_attributed_claims_gate_the_same() {
    let mut c = claim(GameMode::Normal, 10, 60_000, 50_000);
    assert!(validate_claim(&c).is_ok());

    c.user_id = Some(uuid::Uuid::new_v4());
    assert!(validate_claim(&c).is_ok());
}

#[test]
fn test_mode_deserializes_from_lowercase() {
    let c: ScoreClaim = serde_json::from_str(
        r#"{"mode":"endless","wave_reached":10,"duration_ms":60000,"score":50000,"seed":"abc"}"#,
    )
    .unwrap();
    assert_eq!(c.mode, GameMode::Endless);
    assert!(c.user_id.is_none());

    // Unknown modes never reach the validator; they fail at the type.
    assert!(serde_json::from_str::<ScoreClaim>(
        r#"{"mode":"speedrun","wave_reached":10,"duration_ms":60000,"score":50000,"seed":"abc"}"#,
    )
    .is_err());
}
