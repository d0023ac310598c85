use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{CapabilityRating, GapCategory, ScoreCategory};
use crate::normalize::sources::{Cell, RawRow};

pub const REALISTIC_SCORE: f64 = 10.0;
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingColumn {
    pub header: String,
    pub code: String,
}

/// Header to question code for every header that starts with a rating code.
///
/// Independent of the synonym tables. Repeated identical headers are listed once.
pub fn extract_rating_columns(headers: &[String], pattern: &Regex) -> Vec<RatingColumn> {
    let mut columns = Vec::<RatingColumn>::new();

    for header in headers {
        if columns.iter().any(|column| &column.header == header) {
            continue;
        }

        let Some(code) = pattern
            .captures(header.trim())
            .and_then(|captures| captures.get(1).or_else(|| captures.get(0)))
        else {
            continue;
        };

        columns.push(RatingColumn {
            header: header.clone(),
            code: code.as_str().to_ascii_uppercase(),
        });
    }

    columns
}

pub fn gap_category(gap_score: f64) -> GapCategory {
    if gap_score <= 1.0 {
        GapCategory::NoGap
    } else if gap_score <= 2.0 {
        GapCategory::MinorGap
    } else if gap_score <= 5.0 {
        GapCategory::ModerateGap
    } else {
        GapCategory::CriticalGap
    }
}

pub fn score_category(score: f64) -> ScoreCategory {
    if score >= 8.0 {
        ScoreCategory::High
    } else if score >= 5.0 {
        ScoreCategory::Moderate
    } else {
        ScoreCategory::Low
    }
}

pub fn parse_score(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Blank => return None,
        Cell::Number(value) => *value,
        Cell::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
    };

    if value.is_nan() || !(MIN_SCORE..=MAX_SCORE).contains(&value) {
        return None;
    }

    Some(value)
}

pub fn build_rating(code: &str, current_score: f64) -> CapabilityRating {
    let gap_score = REALISTIC_SCORE - current_score;
    CapabilityRating {
        question_code: code.to_string(),
        current_score,
        realistic_score: REALISTIC_SCORE,
        gap_score,
        gap_category: gap_category(gap_score),
        current_score_category: score_category(current_score),
    }
}

/// Ratings for one row, read column by column. Blank and invalid cells are
/// skipped; a later column carrying an already-seen code replaces the earlier
/// rating in place.
pub fn collect_ratings(row: &RawRow, columns: &[RatingColumn]) -> Vec<CapabilityRating> {
    let mut ratings = Vec::<CapabilityRating>::new();

    for (header, cell) in row.columns() {
        let Some(column) = columns.iter().find(|column| column.header == header) else {
            continue;
        };
        let Some(score) = parse_score(cell) else {
            if !cell.is_blank() {
                debug!(
                    header = %column.header,
                    code = %column.code,
                    value = %cell.as_text(),
                    "skipped invalid rating cell"
                );
            }
            continue;
        };

        let rating = build_rating(&column.code, score);
        match ratings
            .iter_mut()
            .find(|existing| existing.question_code == rating.question_code)
        {
            Some(existing) => *existing = rating,
            None => ratings.push(rating),
        }
    }

    ratings
}

pub fn average_score(ratings: &[CapabilityRating]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }

    let total = ratings
        .iter()
        .map(|rating| rating.current_score)
        .sum::<f64>();
    Some(total / ratings.len() as f64)
}
