//! Resolves an entered code against the sheet records.

use crate::{
    error::MatchError,
    random::{self, RandomSource},
    sheet::Record,
};

/// Number of slots in an entered code.
pub const CODE_LENGTH: usize = 5;

/// Separator used when joining digits into a lookup key.
pub const KEY_SEPARATOR: &str = "-";

/// Display label for fallback results.
pub const WRONG_CODE_LABEL: &str = "Oops! Wrong code";

/// Outcome of matching an entered code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A record's passcode equals the entered key.
    Match {
        /// Name of the matching record.
        name: String,
        /// Video link of the matching record.
        video_link: String,
    },
    /// Nothing matched; a random fallback was drawn.
    Fallback {
        /// Drawn fallback link.
        video_link: String,
    },
    /// Nothing matched and there is nothing to fall back to because no
    /// records were loaded at all.
    Empty,
}

impl Resolution {
    /// Title to show above the video. Fallbacks use `fallback_label`.
    pub fn title<'a>(&'a self, fallback_label: &'a str) -> &'a str {
        match self {
            Resolution::Match { name, .. } => name.as_str(),
            Resolution::Fallback { .. } | Resolution::Empty => fallback_label,
        }
    }

    /// Link to play, if any.
    pub fn video_link(&self) -> Option<&str> {
        match self {
            Resolution::Match { video_link, .. } | Resolution::Fallback { video_link } => {
                Some(video_link.as_str())
            }
            Resolution::Empty => None,
        }
    }

    /// True for a matched record.
    pub fn is_match(&self) -> bool {
        matches!(self, Resolution::Match { .. })
    }
}

/// Join the digits into the lookup key, e.g. `3-1-4-1-5`.
pub fn passcode_key(code: &[u8; CODE_LENGTH]) -> String {
    code.iter()
        .map(|digit| digit.to_string())
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

/// First record whose passcode equals `key` exactly.
pub fn find_record<'a>(records: &'a [Record], key: &str) -> Option<&'a Record> {
    records.iter().find(|record| record.passcode == key)
}

/// Resolve `code` to a record, or draw a fallback when nothing matches.
pub fn resolve(
    code: &[u8; CODE_LENGTH],
    records: &[Record],
    fallbacks: &[String],
    rng: &mut dyn RandomSource,
) -> Result<Resolution, MatchError> {
    let key = passcode_key(code);
    if let Some(record) = find_record(records, &key) {
        return Ok(Resolution::Match {
            name: record.name.clone(),
            video_link: record.video_link.clone(),
        });
    }

    match random::choose(rng, fallbacks) {
        Some(link) => Ok(Resolution::Fallback {
            video_link: link.clone(),
        }),
        None if records.is_empty() => Ok(Resolution::Empty),
        None => Err(MatchError::EmptyFallback),
    }
}
