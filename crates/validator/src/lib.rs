//! Convention checks for an Artist → [Album] → Files music tree.
//!
//! [`walk::run`] drives the whole audit: it classifies folders by depth,
//! derives the expected artist/album names from folder paths
//! ([`folder`]), evaluates the per-file rule set ([`rules`]), and persists
//! corrected tags through a [`tags::TagStore`] unless the run is a dry run.

pub mod folder;
pub mod rules;
pub mod tags;
pub mod walk;

pub use rules::{CheckOutcome, check_file};
pub use tags::{LoftyTagStore, TagStore};
pub use walk::run;
