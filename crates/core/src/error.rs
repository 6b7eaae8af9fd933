//! Error types surfaced by the core crate.
//!
//! Loading failures are fatal for a run, link failures are reported per
//! attempt, and the session errors guard the five-slot entry flow.

use std::path::PathBuf;

use thiserror::Error;

/// Reading the sheet source failed. Fatal for the current run.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The HTTP request could not be completed.
    #[error("failed to fetch {url}: {source}")]
    Request {
        /// URL that was requested.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("fetching {url} returned HTTP {status}")]
    Status {
        /// URL that was requested.
        url: String,
        /// Status code reported by the server.
        status: u16,
    },

    /// A local sheet file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path of the sheet file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Matching could not produce a result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    /// No record matched and the fallback pool is empty.
    #[error("no passcode matched and no fallback videos are available")]
    EmptyFallback,
}

/// A video link does not have the expected `/d/<id>` shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    /// No file identifier could be extracted.
    #[error("could not load video: unrecognised link {link:?}")]
    Invalid {
        /// The offending link.
        link: String,
    },
}

/// Invalid operation on the entered code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Slot index is not in `0..5`.
    #[error("slot {0} is out of range")]
    SlotOutOfRange(usize),

    /// Digit is not in `1..=5`.
    #[error("digit {0} is out of range")]
    DigitOutOfRange(u8),

    /// Submitted before all five slots were filled.
    #[error("all five slots must be filled before submitting")]
    Incomplete,
}

/// Submitting the entered code failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// The code itself was not submittable.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The matcher could not resolve the code.
    #[error(transparent)]
    Match(#[from] MatchError),

    /// The resolved video link is unusable.
    #[error(transparent)]
    Link(#[from] LinkError),

    /// No sheet rows were loaded, so there is nothing to show.
    #[error("no passcode sheet rows are loaded")]
    NothingLoaded,
}
