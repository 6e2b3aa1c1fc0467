//! Derive expected artist and album names from a folder's path.
//!
//! Two folder-naming conventions coexist: plain display names
//! (`John Doe`) and sortable `Last_First` names (`Doe_John`), the latter
//! rewritten to display form.

use std::path::Path;

use tagcheck_core::{Error, Result};

/// Last path segment verbatim, empty string for a path with no segments.
pub fn album_name_from_folder(path: &Path) -> String {
    segments(path).last().map(|s| s.to_string()).unwrap_or_default()
}

/// Derive the artist display name from a folder path.
///
/// For an album folder the artist is the second-to-last segment, otherwise
/// the last. A candidate without `_` is already in display form. With `_`
/// it must split into exactly two parts (`Last_First`) and comes back as
/// `"First Last"`.
///
/// # Errors
///
/// `Error::ShallowFolder` when the path has fewer than 3 segments (the
/// convention requires at least root/artist depth below a named root), and
/// `Error::MalformedArtistFolder` when an underscore candidate does not
/// split into exactly two parts.
pub fn artist_name_from_folder(path: &Path, is_album_folder: bool) -> Result<String> {
    let segments = segments(path);

    if segments.len() < 3 {
        return Err(Error::ShallowFolder(path.to_path_buf()));
    }

    let candidate = if is_album_folder {
        segments[segments.len() - 2]
    } else {
        segments[segments.len() - 1]
    };

    if !candidate.contains('_') {
        return Ok(candidate.to_string());
    }

    let parts: Vec<&str> = candidate.split('_').collect();

    if parts.len() != 2 {
        return Err(Error::MalformedArtistFolder(path.to_path_buf()));
    }

    Ok(format!("{} {}", parts[1], parts[0]))
}

/// Named path segments, root and prefix components excluded.
fn segments(path: &Path) -> Vec<&str> {
    path.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect()
}
