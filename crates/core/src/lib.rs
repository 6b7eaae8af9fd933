#![warn(clippy::all, missing_docs)]

//! Core logic for the passcode game.
//!
//! This crate loads the passcode sheet, keeps the per-run session state and
//! resolves entered codes to videos. Frontends only render what it returns.

pub mod config;
pub mod error;
pub mod link;
pub mod matcher;
pub mod random;
pub mod session;
pub mod sheet;
pub mod widget;

pub use self::config::AppConfig;
pub use error::{LinkError, LoadError, MatchError, SessionError, SubmitError};
pub use matcher::{resolve, Resolution};
pub use random::{RandomSource, SeededRandom, SequenceRandom};
pub use session::{EnteredCode, GameSession, Outcome};
pub use sheet::{Record, Sheet, SheetLoader, SheetSource};
pub use widget::{InputStyle, OptionPicker};
