//! Lesson range decoding.
//!
//! The timetable writes the periods of a class as `"start-end"`, e.g. `"3-4"`.
//! A day has 14 periods numbered from 1.

use crate::error::LessonError;

/// Last period of a day.
pub const MAX_LESSON: u32 = 14;

/// Decode `"n-m"` into `[n, m]`.
///
/// Checks run in a fixed order (token count, ordering, zero, upper bound,
/// numeric) so a token like `"0-a"` reports the zero rule, not the numeric one.
/// Tokens are read like plain integers: surrounding whitespace is ignored and
/// an empty token counts as `0`.
pub fn parse_lessons(raw: &str) -> Result<[u32; 2], LessonError> {
    let tokens: Vec<Option<u64>> = raw.split('-').map(lesson_number).collect();

    let &[start, end] = tokens.as_slice() else {
        return Err(LessonError::TokenCount);
    };

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(LessonError::Order);
        }
    }
    if tokens.contains(&Some(0)) {
        return Err(LessonError::Zero);
    }
    if tokens.iter().flatten().any(|&n| n > u64::from(MAX_LESSON)) {
        return Err(LessonError::ExceedsMax { max: MAX_LESSON });
    }

    match (start, end) {
        // both are within 1..=MAX_LESSON here
        (Some(s), Some(e)) => Ok([s as u32, e as u32]),
        _ => Err(LessonError::NonNumeric),
    }
}

/// Plain integer token; too many digits for `u64` still reads as a number.
fn lesson_number(token: &str) -> Option<u64> {
    let token = token.trim();
    if token.is_empty() {
        return Some(0);
    }
    let digits = token.strip_prefix('+').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}
