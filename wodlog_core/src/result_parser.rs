//! Parsing of free-text performance results.
//!
//! Each export row carries a result type tag and a formatted result string
//! such as `"3 x 10 @ 85 lbs"`, `"19:05"` or `"7 + 3"`. The tag selects a
//! grammar; the grammar extracts whatever numeric measures it can. Parsing
//! never fails: anything unrecognized is kept as notes.

use crate::types::{ComponentType, MovementType, ParsedPerformanceResult, ResultType, ScoreType};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// "3 x 10 @ 85 lbs", "1x5@135#"
static SETS_REPS_WEIGHT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*x\s*(\d+)\s*@\s*(\d+(?:\.\d+)?)\s*(?:lbs?|#)")
        .expect("valid sets/reps/weight regex")
});
// "225 lbs", "95#"
static WEIGHT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:lbs?|#)").expect("valid weight regex")
});
// "75#", "@75#", "'75#" inside a comment
static COMMENT_WEIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[@']?(\d+)\s*#").expect("valid comment weight regex"));
static ROUNDS_PLUS_REPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*\+\s*(\d+)").expect("valid rounds+reps regex"));
static SETS_X_REPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*x\s*(\d+)").expect("valid sets x reps regex"));
static REPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*reps?\b").expect("valid reps regex"));
static ROUNDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*rounds?\b").expect("valid rounds regex"));
static CALORIES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:calories|calorie|cals?)\b").expect("valid calories regex")
});
static DISTANCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:meters?|m)\b").expect("valid distance regex")
});
static TOTAL_REPS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*total\s*reps?\b").expect("valid total reps regex")
});

/// Parse a formatted result according to its result type
///
/// Always returns a result. When the type is unknown, or its grammar finds
/// nothing, the notes become `"{type}: {result}. {comment}"` and every
/// numeric field stays `None`.
pub fn parse_result(
    result_type: &ResultType,
    result: &str,
    comment: &str,
) -> ParsedPerformanceResult {
    let result = result.trim();

    let mut parsed = ParsedPerformanceResult {
        notes: comment.to_string(),
        ..Default::default()
    };

    match result_type {
        ResultType::Weight => parse_weight(result, comment, &mut parsed),
        ResultType::Time => parse_time(result, &mut parsed),
        ResultType::AmrapRoundsAndReps => parse_rounds_and_reps(result, &mut parsed),
        ResultType::AmrapReps | ResultType::MaxReps => parse_reps(result, &mut parsed),
        ResultType::AmrapRounds => {
            parsed.rounds = ROUNDS_RE.captures(result).and_then(|c| int_at(&c, 1));
        }
        ResultType::Calories => {
            parsed.calories = CALORIES_RE.captures(result).and_then(|c| int_at(&c, 1));
        }
        ResultType::Distance => {
            parsed.distance = DISTANCE_RE.captures(result).and_then(|c| float_at(&c, 1));
        }
        ResultType::EachRound => {
            parsed.reps = TOTAL_REPS_RE.captures(result).and_then(|c| int_at(&c, 1));
        }
        ResultType::Other(_) => {}
    }

    if parsed.has_no_measures() {
        tracing::debug!(
            "No measures recognized for {} result {:?}, keeping as notes",
            result_type,
            result
        );
        parsed.notes = format!("{}: {}. {}", result_type, result, comment);
    }

    parsed
}

fn int_at(caps: &Captures<'_>, i: usize) -> Option<u32> {
    caps.get(i).and_then(|m| m.as_str().parse().ok())
}

fn float_at(caps: &Captures<'_>, i: usize) -> Option<f64> {
    caps.get(i).and_then(|m| m.as_str().parse().ok())
}

fn parse_weight(s: &str, comment: &str, parsed: &mut ParsedPerformanceResult) {
    if let Some(caps) = SETS_REPS_WEIGHT_RE.captures(s) {
        parsed.sets = int_at(&caps, 1);
        parsed.reps = int_at(&caps, 2);
        parsed.weight = float_at(&caps, 3);
        return;
    }

    if let Some(caps) = WEIGHT_RE.captures(s) {
        parsed.weight = float_at(&caps, 1);
        return;
    }

    // Some lifters only note the load in the comment
    if let Some(caps) = COMMENT_WEIGHT_RE.captures(comment) {
        parsed.weight = float_at(&caps, 1);
    }
}

fn parse_time(s: &str, parsed: &mut ParsedPerformanceResult) {
    let parts: Vec<&str> = s.split(':').map(str::trim).collect();

    let total = match parts.as_slice() {
        [minutes, seconds] => {
            let minutes: u32 = match minutes.parse() {
                Ok(m) => m,
                Err(_) => return,
            };
            let seconds: u32 = match seconds.parse() {
                Ok(s) => s,
                Err(_) => return,
            };
            minutes.checked_mul(60).and_then(|m| m.checked_add(seconds))
        }
        [hours, minutes, seconds] => {
            let (hours, minutes, seconds): (u32, u32, u32) =
                match (hours.parse(), minutes.parse(), seconds.parse()) {
                    (Ok(h), Ok(m), Ok(s)) => (h, m, s),
                    _ => return,
                };
            hours
                .checked_mul(3600)
                .and_then(|h| h.checked_add(minutes.checked_mul(60)?))
                .and_then(|t| t.checked_add(seconds))
        }
        // A bare number is already seconds
        [raw] => raw.parse().ok(),
        _ => None,
    };

    parsed.time_seconds = total.filter(|t| *t > 0);
}

fn parse_rounds_and_reps(s: &str, parsed: &mut ParsedPerformanceResult) {
    if let Some(caps) = ROUNDS_PLUS_REPS_RE.captures(s) {
        parsed.rounds = int_at(&caps, 1);
        parsed.reps = int_at(&caps, 2);
    }
}

fn parse_reps(s: &str, parsed: &mut ParsedPerformanceResult) {
    if let Some(caps) = SETS_X_REPS_RE.captures(s) {
        parsed.sets = int_at(&caps, 1);
        parsed.reps = int_at(&caps, 2);
        return;
    }

    if let Some(caps) = REPS_RE.captures(s) {
        parsed.reps = int_at(&caps, 1);
    }
}

/// Map a result type to the score type a new WOD should use
pub fn determine_wod_score_type(result_type: &ResultType) -> ScoreType {
    match result_type {
        ResultType::Time => ScoreType::Time,
        ResultType::AmrapRoundsAndReps | ResultType::AmrapRounds | ResultType::AmrapReps => {
            ScoreType::RoundsReps
        }
        ResultType::Weight => ScoreType::MaxWeight,
        _ => ScoreType::Time,
    }
}

/// Map a component type to the movement type a new movement should use
pub fn determine_movement_type(component_type: &ComponentType) -> MovementType {
    match component_type.as_str().to_lowercase().as_str() {
        "weightlifting" => MovementType::Weightlifting,
        "gymnastics" => MovementType::Gymnastics,
        "cardio" => MovementType::Cardio,
        _ => MovementType::Bodyweight,
    }
}

/// Render the canonical display string of a score
///
/// Inverse of the time, rounds+reps and weight grammars. Returns `None`
/// when the measures the score type needs are missing.
pub fn format_score_value(parsed: &ParsedPerformanceResult, score_type: ScoreType) -> Option<String> {
    match score_type {
        ScoreType::Time => parsed.time_seconds.map(|total| {
            let hours = total / 3600;
            let minutes = (total % 3600) / 60;
            let seconds = total % 60;
            if hours > 0 {
                format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
            } else {
                format!("{:02}:{:02}", minutes, seconds)
            }
        }),
        ScoreType::RoundsReps => match (parsed.rounds, parsed.reps) {
            (Some(rounds), Some(reps)) => Some(format!("{} rounds + {} reps", rounds, reps)),
            (Some(rounds), None) => Some(format!("{} rounds", rounds)),
            (None, Some(reps)) => Some(format!("{} reps", reps)),
            (None, None) => None,
        },
        ScoreType::MaxWeight => parsed.weight.map(|w| format!("{:.0} lbs", w)),
    }
}
