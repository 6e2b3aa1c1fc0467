//! The per-file rule set.
//!
//! Rules run in a fixed order over one file's metadata plus its
//! folder-derived context. Each rule either reports a finding, silently
//! repairs a field, or both. Repairs are applied only when the corrected
//! value is unambiguous and lossless (whitespace trims, clears of fields
//! the convention forbids). Everything ambiguous — character violations,
//! multiple values, folder/tag disagreement — is reported and left alone.
//!
//! No rule short-circuits: a file with five problems gets five entries.

use std::path::Path;

use tagcheck_core::{
    FolderContext, GENRE_CHARS, NAME_CHARS, NameIssue, TITLE_CHARS, TrackMetadata,
    ViolationReport, needs_trimming, validate_name,
};

/// Result of checking one file.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// The (possibly corrected) metadata snapshot.
    pub metadata: TrackMetadata,
    /// True when at least one repair was applied and the snapshot must be
    /// written back.
    pub needs_update: bool,
    /// Ordered findings, repairs included as info entries.
    pub report: ViolationReport,
}

/// Check one audio file against the metadata convention.
///
/// `cover_candidates` carries the non-audio siblings of an album folder.
/// They are accepted so album checks have the full folder picture, but no
/// reconciliation rule fires yet.
// TODO: reconcile embedded pictures against the sibling image files once a
// matching policy is agreed.
pub fn check_file(
    file_path: &Path,
    metadata: TrackMetadata,
    ctx: &FolderContext,
    cover_candidates: Option<&[std::path::PathBuf]>,
) -> CheckOutcome {
    let _ = cover_candidates;
    let mut meta = metadata;
    let mut report = ViolationReport::new();
    let mut needs_update = false;

    // Title.
    if meta.title.trim().is_empty() {
        report.error("the title is not set");
    }

    if needs_trimming(&meta.title) {
        report.info(format!("trimming title {:?}", meta.title));
        meta.title = meta.title.trim().to_string();
        needs_update = true;
    }

    if !TITLE_CHARS.contains_all(&meta.title) {
        report.error(format!(
            "the title {:?} contains characters outside the allowed set",
            meta.title
        ));
    }

    // Performers.
    if meta.performers.is_empty() {
        report.error("no artist is set");
    }

    if meta.performers.len() != 1 {
        report.error(format!(
            "expected exactly one artist, found {:?}",
            meta.performers
        ));
    }

    if meta.performers.len() == 1 && needs_trimming(&meta.performers[0]) {
        report.info(format!("trimming artist {:?}", meta.performers[0]));
        meta.performers[0] = meta.performers[0].trim().to_string();
        needs_update = true;
    }

    let first_performer = meta.performers.first().cloned().unwrap_or_default();
    match validate_name(meta.performers.first().map(String::as_str), NAME_CHARS) {
        Err(NameIssue::Empty) => report.error("the artist name is empty"),
        Err(NameIssue::ForbiddenChars) => report.error(format!(
            "the artist {:?} contains characters outside the allowed set",
            first_performer
        )),
        Ok(()) => {}
    }

    if meta.performers.first().map(String::as_str) != Some(ctx.artist_name.as_str()) {
        report.error(format!(
            "the artist tag {:?} does not match the folder artist {:?}",
            meta.performers.first(),
            ctx.artist_name
        ));
    }

    // Genres.
    if meta.genres.is_empty() {
        report.error("no genre is set");
    }

    if meta.genres.len() != 1 {
        report.error(format!("expected exactly one genre, found {:?}", meta.genres));
    }

    if meta.genres.len() == 1 && needs_trimming(&meta.genres[0]) {
        report.info(format!("trimming genre {:?}", meta.genres[0]));
        meta.genres[0] = meta.genres[0].trim().to_string();
        needs_update = true;
    }

    if let Some(genre) = meta.genres.first()
        && !GENRE_CHARS.contains_all(genre)
    {
        report.error(format!(
            "the genre {:?} contains characters outside the allowed set",
            genre
        ));
    }

    // Fields the convention forbids: clear them, nothing is lost.
    if !meta.comment.trim().is_empty() {
        report.info(format!("removing comment {:?}", meta.comment));
        meta.comment = String::new();
        needs_update = true;
    }

    if meta.year > 0 {
        report.info(format!("removing year {}", meta.year));
        meta.year = 0;
        needs_update = true;
    }

    if !meta.album_artists.is_empty() {
        report.info(format!("removing album artists {:?}", meta.album_artists));
        meta.album_artists.clear();
        needs_update = true;
    }

    if !meta.composers.is_empty() {
        report.info(format!("removing composers {:?}", meta.composers));
        meta.composers.clear();
        needs_update = true;
    }

    if meta.disc > 0 {
        report.info(format!("removing disc number {}", meta.disc));
        meta.disc = 0;
        needs_update = true;
    }

    // File name must be "{Title}-{Artist}.<ext>". Never auto-renamed.
    if let Some(performer) = meta.performers.first() {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let expected = format!("{}-{}.{}", meta.title, performer, ext);
        let actual = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        if expected != actual {
            report.error(format!(
                "the file name {:?} does not match the expected {:?}",
                actual, expected
            ));
        }
    }

    match &ctx.album_name {
        // Artist-only folder: no album grouping, so the album field and
        // embedded pictures must be absent.
        None => {
            if !meta.album.trim().is_empty() {
                report.info(format!("removing album {:?}", meta.album));
                meta.album = String::new();
                needs_update = true;
            }

            if !meta.pictures.is_empty() {
                report.info(format!("removing {} embedded picture(s)", meta.pictures.len()));
                meta.pictures.clear();
                needs_update = true;
            }
        }
        Some(_) => {
            if meta.album.trim().is_empty() {
                report.error("the album is not set");
            }

            if needs_trimming(&meta.album) {
                report.info(format!("trimming album {:?}", meta.album));
                meta.album = meta.album.trim().to_string();
                needs_update = true;
            }

            match validate_name(Some(&meta.album), NAME_CHARS) {
                // Emptiness already reported above.
                Err(NameIssue::Empty) | Ok(()) => {}
                Err(NameIssue::ForbiddenChars) => report.error(format!(
                    "the album {:?} contains characters outside the allowed set",
                    meta.album
                )),
            }

            if meta.track == 0 {
                report.warning("the track number is not set");
            }
        }
    }

    CheckOutcome {
        metadata: meta,
        needs_update,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tagcheck_core::Severity;

    fn artist_ctx() -> FolderContext {
        FolderContext {
            artist_name: "John Doe".to_string(),
            album_name: None,
        }
    }

    fn album_ctx() -> FolderContext {
        FolderContext {
            artist_name: "John Doe".to_string(),
            album_name: Some("GreatestHits".to_string()),
        }
    }

    fn clean_track() -> TrackMetadata {
        TrackMetadata {
            title: "Song".to_string(),
            performers: vec!["John Doe".to_string()],
            genres: vec!["Rock".to_string()],
            ..TrackMetadata::default()
        }
    }

    fn has_error_containing(report: &ViolationReport, needle: &str) -> bool {
        report
            .entries()
            .iter()
            .any(|v| v.severity == Severity::Error && v.message.contains(needle))
    }

    #[test]
    fn test_clean_artist_folder_file_passes() {
        let path = PathBuf::from("music/D/Doe_John/Song-John Doe.mp3");
        let outcome = check_file(&path, clean_track(), &artist_ctx(), None);

        assert!(!outcome.needs_update);
        assert!(outcome.report.is_empty());
    }

    // Scenario: title needs a trim, comment and year are set. All three are
    // silent repairs; the post-trim file name still matches, so no errors.
    #[test]
    fn test_repairs_trim_title_and_clear_forbidden_fields() {
        let path = PathBuf::from("music/D/Doe_John/Song-John Doe.mp3");
        let mut meta = clean_track();
        meta.title = " Song ".to_string();
        meta.comment = "ripped by xyz".to_string();
        meta.year = 1999;

        let outcome = check_file(&path, meta, &artist_ctx(), None);

        assert!(outcome.needs_update);
        assert_eq!(outcome.metadata.title, "Song");
        assert_eq!(outcome.metadata.comment, "");
        assert_eq!(outcome.metadata.year, 0);
        assert_eq!(outcome.report.count(Severity::Error), 0);
        assert_eq!(outcome.report.count(Severity::Info), 3);
    }

    #[test]
    fn test_missing_title_is_an_error_not_a_repair() {
        let path = PathBuf::from("music/D/Doe_John/-John Doe.mp3");
        let mut meta = clean_track();
        meta.title = String::new();

        let outcome = check_file(&path, meta, &artist_ctx(), None);

        assert!(!outcome.needs_update);
        assert!(has_error_containing(&outcome.report, "title is not set"));
    }

    #[test]
    fn test_title_character_violation_reported_not_fixed() {
        let path = PathBuf::from("music/D/Doe_John/Song #1-John Doe.mp3");
        let mut meta = clean_track();
        meta.title = "Song #1".to_string();

        let outcome = check_file(&path, meta.clone(), &artist_ctx(), None);

        assert!(!outcome.needs_update);
        assert_eq!(outcome.metadata.title, meta.title);
        assert!(has_error_containing(&outcome.report, "allowed set"));
    }

    // Scenario: two performers. Multiple-artist error, no trim applied,
    // first performer still checked against folder and character set.
    #[test]
    fn test_multiple_performers_reported_first_still_checked() {
        let path = PathBuf::from("music/D/Doe_John/Song-John Doe.mp3");
        let mut meta = clean_track();
        meta.performers = vec![" Jane/Doe ".to_string(), "Someone".to_string()];

        let outcome = check_file(&path, meta.clone(), &artist_ctx(), None);

        assert!(!outcome.needs_update);
        assert_eq!(outcome.metadata.performers, meta.performers);
        assert!(has_error_containing(&outcome.report, "exactly one artist"));
        assert!(has_error_containing(&outcome.report, "allowed set"));
        assert!(has_error_containing(&outcome.report, "does not match the folder artist"));
    }

    #[test]
    fn test_performer_folder_mismatch_is_reported_only() {
        let path = PathBuf::from("music/D/Doe_John/Song-Jane Doe.mp3");
        let mut meta = clean_track();
        meta.performers = vec!["Jane Doe".to_string()];

        let outcome = check_file(&path, meta.clone(), &artist_ctx(), None);

        assert!(!outcome.needs_update);
        assert_eq!(outcome.metadata.performers, meta.performers);
        assert!(has_error_containing(&outcome.report, "does not match the folder artist"));
    }

    #[test]
    fn test_genre_rules() {
        let path = PathBuf::from("music/D/Doe_John/Song-John Doe.mp3");

        let mut meta = clean_track();
        meta.genres = vec![];
        let outcome = check_file(&path, meta, &artist_ctx(), None);
        assert!(has_error_containing(&outcome.report, "no genre is set"));

        let mut meta = clean_track();
        meta.genres = vec![" Rock".to_string()];
        let outcome = check_file(&path, meta, &artist_ctx(), None);
        assert!(outcome.needs_update);
        assert_eq!(outcome.metadata.genres, vec!["Rock"]);
        assert_eq!(outcome.report.count(Severity::Error), 0);

        let mut meta = clean_track();
        meta.genres = vec!["Hip Hop".to_string()];
        let outcome = check_file(&path, meta, &artist_ctx(), None);
        assert!(has_error_containing(&outcome.report, "allowed set"));
    }

    #[test]
    fn test_album_artists_composers_disc_cleared() {
        let path = PathBuf::from("music/D/Doe_John/Song-John Doe.mp3");
        let mut meta = clean_track();
        meta.album_artists = vec!["Various".to_string()];
        meta.composers = vec!["J Doe".to_string()];
        meta.disc = 1;

        let outcome = check_file(&path, meta, &artist_ctx(), None);

        assert!(outcome.needs_update);
        assert!(outcome.metadata.album_artists.is_empty());
        assert!(outcome.metadata.composers.is_empty());
        assert_eq!(outcome.metadata.disc, 0);
        assert_eq!(outcome.report.count(Severity::Error), 0);
    }

    #[test]
    fn test_file_name_mismatch_reported_never_renamed() {
        let path = PathBuf::from("music/D/Doe_John/01 - Song.mp3");
        let outcome = check_file(&path, clean_track(), &artist_ctx(), None);

        assert!(!outcome.needs_update);
        assert!(has_error_containing(&outcome.report, "file name"));
    }

    #[test]
    fn test_artist_folder_clears_album_and_pictures() {
        let path = PathBuf::from("music/D/Doe_John/Song-John Doe.mp3");
        let mut meta = clean_track();
        meta.album = "Leftover".to_string();
        meta.pictures = vec![vec![0xFF, 0xD8]];

        let outcome = check_file(&path, meta, &artist_ctx(), None);

        assert!(outcome.needs_update);
        assert_eq!(outcome.metadata.album, "");
        assert!(outcome.metadata.pictures.is_empty());
        assert_eq!(outcome.report.count(Severity::Error), 0);
    }

    // Scenario: album folder with the album field empty. Error, no
    // auto-fix; needs_update driven only by other rules.
    #[test]
    fn test_album_folder_missing_album_is_an_error() {
        let path = PathBuf::from("music/D/Doe_John/GreatestHits/Song-John Doe.mp3");
        let mut meta = clean_track();
        meta.track = 1;

        let outcome = check_file(&path, meta, &album_ctx(), None);

        assert!(!outcome.needs_update);
        assert_eq!(outcome.metadata.album, "");
        assert!(has_error_containing(&outcome.report, "album is not set"));
    }

    #[test]
    fn test_album_folder_keeps_album_and_pictures() {
        let path = PathBuf::from("music/D/Doe_John/GreatestHits/Song-John Doe.mp3");
        let mut meta = clean_track();
        meta.album = "GreatestHits".to_string();
        meta.track = 3;
        meta.pictures = vec![vec![0xFF, 0xD8]];

        let covers = vec![PathBuf::from("music/D/Doe_John/GreatestHits/cover.jpg")];
        let outcome = check_file(&path, meta, &album_ctx(), Some(&covers));

        assert!(!outcome.needs_update);
        assert_eq!(outcome.metadata.album, "GreatestHits");
        assert_eq!(outcome.metadata.pictures.len(), 1);
        assert!(outcome.report.is_empty());
    }

    #[test]
    fn test_album_folder_trims_album_and_warns_on_missing_track() {
        let path = PathBuf::from("music/D/Doe_John/GreatestHits/Song-John Doe.mp3");
        let mut meta = clean_track();
        meta.album = " GreatestHits".to_string();

        let outcome = check_file(&path, meta, &album_ctx(), None);

        assert!(outcome.needs_update);
        assert_eq!(outcome.metadata.album, "GreatestHits");
        assert_eq!(outcome.report.count(Severity::Error), 0);
        assert_eq!(outcome.report.count(Severity::Warning), 1);
    }

    #[test]
    fn test_album_character_violation_reported() {
        let path = PathBuf::from("music/D/Doe_John/Greatest-Hits/Song-John Doe.mp3");
        let mut meta = clean_track();
        meta.album = "Greatest-Hits".to_string();
        meta.track = 1;

        let ctx = FolderContext {
            artist_name: "John Doe".to_string(),
            album_name: Some("Greatest-Hits".to_string()),
        };
        let outcome = check_file(&path, meta, &ctx, None);

        assert!(!outcome.needs_update);
        assert!(has_error_containing(&outcome.report, "album"));
    }

    #[test]
    fn test_check_is_idempotent() {
        let path = PathBuf::from("music/D/Doe_John/Song-John Doe.mp3");
        let mut meta = clean_track();
        meta.title = " Song ".to_string();
        meta.comment = "x".to_string();
        meta.year = 2001;
        meta.album = "Stray".to_string();
        meta.pictures = vec![vec![1, 2, 3]];

        let first = check_file(&path, meta, &artist_ctx(), None);
        assert!(first.needs_update);

        let second = check_file(&path, first.metadata.clone(), &artist_ctx(), None);
        assert!(!second.needs_update);
        assert_eq!(second.metadata, first.metadata);
        assert_eq!(second.report.count(Severity::Info), 0);
    }
}
