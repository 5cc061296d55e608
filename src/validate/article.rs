//! Plausibility checks for extracted article text.
//!
//! Runs between extraction and the ML stages; a failure here stops the
//! pipeline before any model is invoked.

use super::ValidationError;

pub const MIN_TEXT_LENGTH: usize = 50;
pub const MAX_TEXT_LENGTH: usize = 50_000;

/// Minimum share of Hangul syllables for text to count as Korean content.
const MIN_KOREAN_RATIO: f64 = 0.1;

/// Average Korean reading speed, characters per minute.
const READ_CHARS_PER_MINUTE: usize = 500;

/// Validate length bounds and Korean-character ratio of an article body.
pub fn check_article_text(text: &str) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }

    let text = text.trim();
    let char_count = text.chars().count();

    if char_count < MIN_TEXT_LENGTH {
        return Err(ValidationError::TextTooShort {
            min: MIN_TEXT_LENGTH,
        });
    }
    if char_count > MAX_TEXT_LENGTH {
        return Err(ValidationError::TextTooLong {
            max: MAX_TEXT_LENGTH,
        });
    }

    let korean_chars = text.chars().filter(|c| is_hangul(*c)).count();
    if (korean_chars as f64) / (char_count as f64) < MIN_KOREAN_RATIO {
        return Err(ValidationError::NotKorean);
    }

    Ok(())
}

/// Estimated reading time in whole minutes, at least 1.
pub fn estimate_read_time(text: &str) -> usize {
    let chars = text.chars().count();
    let minutes = (chars as f64 / READ_CHARS_PER_MINUTE as f64).round() as usize;
    minutes.max(1)
}

fn is_hangul(c: char) -> bool {
    ('가'..='힣').contains(&c)
}
