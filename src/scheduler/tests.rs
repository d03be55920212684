use super::*;
use chrono::TimeZone;

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, 9, 30, 0).unwrap()
}

fn state(ease_factor: f64, interval_days: i32, repetitions: i32) -> ScheduleState {
    ScheduleState {
        ease_factor,
        interval_days,
        repetitions,
        next_review_date: at(1),
        last_review_date: Some(at(1)),
    }
}

#[test]
fn test_initial_state_is_due_immediately() {
    let now = at(2);
    let initial = ScheduleState::initial(now);

    assert_eq!(initial.ease_factor, DEFAULT_EASE_FACTOR);
    assert_eq!(initial.interval_days, 0);
    assert_eq!(initial.repetitions, 0);
    assert_eq!(initial.last_review_date, None);
    assert!(initial.is_due(now));
    assert!(!initial.is_due(now - Duration::seconds(1)));
}

#[test]
fn test_first_good_review_of_fresh_card() {
    let now = at(2);
    let next = compute_next_state(&ScheduleState::initial(now), Rating::Good, now);

    assert_eq!(next.repetitions, 1);
    assert_eq!(next.interval_days, 1);
    assert_eq!(next.ease_factor, DEFAULT_EASE_FACTOR);
    assert_eq!(next.next_review_date, now + Duration::days(1));
    assert_eq!(next.last_review_date, Some(now));
}

#[test]
fn test_second_good_review_schedules_six_days() {
    let first = compute_next_state(&ScheduleState::initial(at(1)), Rating::Good, at(1));
    let second = compute_next_state(&first, Rating::Good, at(2));

    assert_eq!(second.repetitions, 2);
    assert_eq!(second.interval_days, 6);
    assert_eq!(second.next_review_date, at(8));
}

#[test]
fn test_third_good_review_multiplies_by_ease() {
    let next = compute_next_state(&state(2.5, 6, 2), Rating::Good, at(10));

    assert_eq!(next.repetitions, 3);
    assert_eq!(next.interval_days, 15);
    assert_eq!(next.ease_factor, 2.5);
}

#[test]
fn test_interval_rounds_to_nearest_day() {
    // 7 * 1.3 = 9.1 -> 9, 11 * 1.3 = 14.3 -> 14, 5 * 1.5 = 7.5 -> 8
    assert_eq!(compute_next_state(&state(1.3, 7, 3), Rating::Good, at(1)).interval_days, 9);
    assert_eq!(compute_next_state(&state(1.3, 11, 3), Rating::Good, at(1)).interval_days, 14);
    assert_eq!(compute_next_state(&state(1.5, 5, 3), Rating::Good, at(1)).interval_days, 8);
    // 3 * 1.9 = 5.7 would truncate to 5
    assert_eq!(compute_next_state(&state(1.9, 3, 4), Rating::Good, at(1)).interval_days, 6);
}

#[test]
fn test_again_resets_progress() {
    let now = at(5);
    let next = compute_next_state(&state(2.0, 10, 5), Rating::Again, now);

    assert_eq!(next.repetitions, 0);
    assert_eq!(next.interval_days, 1);
    assert!((next.ease_factor - 1.8).abs() < 1e-9);
    assert_eq!(next.next_review_date, now + Duration::days(1));
    assert_eq!(next.last_review_date, Some(now));
}

#[test]
fn test_again_respects_ease_floor() {
    let next = compute_next_state(&state(1.4, 3, 3), Rating::Again, at(1));
    assert_eq!(next.ease_factor, MIN_EASE_FACTOR);

    let mut current = ScheduleState::initial(at(1));
    for _ in 0..20 {
        current = compute_next_state(&current, Rating::Again, at(1));
        assert!(current.ease_factor >= MIN_EASE_FACTOR);
    }
    assert_eq!(current.ease_factor, MIN_EASE_FACTOR);
}

#[test]
fn test_easy_grows_interval_with_previous_ease() {
    let next = compute_next_state(&state(2.5, 6, 2), Rating::Easy, at(1));

    assert_eq!(next.repetitions, 3);
    assert_eq!(next.interval_days, 15);
    assert!((next.ease_factor - 2.65).abs() < 1e-9);
}

#[test]
fn test_easy_on_fresh_card_follows_first_branch() {
    let now = at(3);
    let next = compute_next_state(&ScheduleState::initial(now), Rating::Easy, now);

    assert_eq!(next.repetitions, 1);
    assert_eq!(next.interval_days, 1);
    assert!((next.ease_factor - 2.65).abs() < 1e-9);
}

#[test]
fn test_good_after_lapse_restarts_sequence() {
    let lapsed = compute_next_state(&state(2.3, 40, 6), Rating::Again, at(1));
    let first = compute_next_state(&lapsed, Rating::Good, at(2));
    let second = compute_next_state(&first, Rating::Good, at(3));

    assert_eq!((first.repetitions, first.interval_days), (1, 1));
    assert_eq!((second.repetitions, second.interval_days), (2, 6));
}

#[test]
fn test_interval_is_capped() {
    let next = compute_next_state(&state(3.0, MAX_INTERVAL_DAYS, 30), Rating::Easy, at(1));
    assert_eq!(next.interval_days, MAX_INTERVAL_DAYS);
    assert_eq!(next.next_review_date, at(1) + Duration::days(MAX_INTERVAL_DAYS as i64));
}

#[test]
fn test_preview_lists_every_rating() {
    let current = state(2.5, 6, 2);
    let previews = preview(&current, at(1));

    let ratings: Vec<Rating> = previews.iter().map(|(r, _)| *r).collect();
    assert_eq!(ratings, vec![Rating::Again, Rating::Good, Rating::Easy]);
    assert_eq!(previews[0].1.interval_days, 1);
    assert_eq!(previews[1].1.interval_days, 15);
    assert_eq!(previews[2].1.interval_days, 15);
    assert!(previews[2].1.ease_factor > previews[1].1.ease_factor);
}
