use super::*;
use serde_json::json;

fn session(limit: Option<i64>) -> StartSessionDto {
    StartSessionDto { deck_id: "deck-1".to_string(), limit }
}

#[test]
fn test_limit_defaults_to_twenty() {
    assert_eq!(session(None).validated_limit().unwrap(), DEFAULT_SESSION_LIMIT);

    let dto: StartSessionDto = serde_json::from_value(json!({"deck_id": "deck-1"})).unwrap();
    assert_eq!(dto.validated_limit().unwrap(), 20);
}

#[test]
fn test_limit_bounds() {
    assert_eq!(session(Some(1)).validated_limit().unwrap(), 1);
    assert_eq!(session(Some(50)).validated_limit().unwrap(), 50);

    for bad in [0, -3, 51, 1000] {
        let err = session(Some(bad)).validated_limit().unwrap_err();
        assert!(matches!(err, StudyError::Validation(_)), "limit {} accepted", bad);
    }
}

#[test]
fn test_blank_deck_id_rejected() {
    let dto = StartSessionDto { deck_id: "  ".to_string(), limit: None };
    assert!(matches!(dto.validated_limit(), Err(StudyError::Validation(_))));
}

#[test]
fn test_submit_review_rating_parsing() {
    let dto: SubmitReviewDto = serde_json::from_value(json!({
        "study_record_id": "rec-1",
        "flashcard_id": "card-1",
        "rating": "good"
    }))
    .unwrap();
    assert_eq!(dto.parse_rating().unwrap(), Rating::Good);
    assert!(dto.validate_ids().is_ok());

    let dto: SubmitReviewDto = serde_json::from_value(json!({
        "study_record_id": "rec-1",
        "flashcard_id": "card-1",
        "rating": "hard"
    }))
    .unwrap();
    assert!(dto.parse_rating().is_err());
}

#[test]
fn test_submit_review_blank_ids_rejected() {
    let dto = SubmitReviewDto {
        study_record_id: "".to_string(),
        flashcard_id: "card-1".to_string(),
        rating: "good".to_string(),
        expected_last_review_date: None,
    };
    assert!(matches!(dto.validate_ids(), Err(StudyError::Validation(_))));
}

#[test]
fn test_expected_last_review_date_distinguishes_null_from_missing() {
    let omitted: SubmitReviewDto = serde_json::from_value(json!({
        "study_record_id": "rec-1",
        "flashcard_id": "card-1",
        "rating": "easy"
    }))
    .unwrap();
    assert_eq!(omitted.expected_last_review_date, None);

    let null: SubmitReviewDto = serde_json::from_value(json!({
        "study_record_id": "rec-1",
        "flashcard_id": "card-1",
        "rating": "easy",
        "expected_last_review_date": null
    }))
    .unwrap();
    assert_eq!(null.expected_last_review_date, Some(None));

    let dated: SubmitReviewDto = serde_json::from_value(json!({
        "study_record_id": "rec-1",
        "flashcard_id": "card-1",
        "rating": "easy",
        "expected_last_review_date": "2025-03-01T10:00:00Z"
    }))
    .unwrap();
    let expected = "2025-03-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
    assert_eq!(dated.expected_last_review_date, Some(Some(expected)));
}

#[test]
fn test_update_flashcard_requires_a_change() {
    assert!(UpdateFlashcardDto::default().validate().is_err());
    assert!(UpdateFlashcardDto { front: Some("q".to_string()), back: None }.validate().is_ok());
    assert!(UpdateFlashcardDto { front: Some(" ".to_string()), back: None }.validate().is_err());
}

#[test]
fn test_create_dtos_reject_blank_content() {
    assert!(CreateDeckDto { name: "".to_string(), description: None }.validate().is_err());
    assert!(CreateDeckDto { name: "Deck".to_string(), description: None }.validate().is_ok());

    let card: CreateFlashcardDto = serde_json::from_value(json!({"front": "q", "back": "a"})).unwrap();
    assert!(!card.ai_generated);
    assert!(card.validate().is_ok());
    assert!(CreateFlashcardDto { front: "q".to_string(), back: "".to_string(), ai_generated: false }.validate().is_err());
}
