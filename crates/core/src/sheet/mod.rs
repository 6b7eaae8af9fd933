//! Passcode sheet models, CSV parsing and loading.

pub mod loader;
mod models;
pub mod parser;

pub use loader::{SheetLoader, SheetSource};
pub use models::{Record, Sheet};
pub use parser::{parse_sheet, split_row};
