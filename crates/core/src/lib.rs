pub mod error;
pub mod names;
pub mod types;

pub use error::{Error, Result};
pub use names::{CharSet, NameIssue, needs_trimming, validate_name};
pub use names::{GENRE_CHARS, NAME_CHARS, TITLE_CHARS};
pub use types::*;
