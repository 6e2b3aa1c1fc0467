//! Tree walk and folder classification.
//!
//! Folders are classified purely by depth below the music root:
//! depth 0 and 1 are grouping levels that must hold no files, depth 2 is
//! an artist folder, depth 3 an album folder. Anything deeper is outside
//! the convention and is reported, never descended into.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};
use walkdir::WalkDir;

use tagcheck_core::{
    Error, FolderContext, NAME_CHARS, Result, RunSummary, Severity, validate_name,
};

use crate::folder;
use crate::rules;
use crate::tags::TagStore;

const AUDIO_EXTENSION: &str = "mp3";

/// Walk the whole tree below `root`, check every audio file, and persist
/// corrections through `store` unless `dry_run` is set.
///
/// Local failures (an unreadable folder, a vanished file, a failed save)
/// are reported and skipped; only a missing root aborts the run.
pub fn run(root: &Path, store: &impl TagStore, dry_run: bool) -> Result<RunSummary> {
    if !root.is_dir() {
        return Err(Error::MissingFolder(root.to_path_buf()));
    }

    let mut walker = Walker {
        store,
        dry_run,
        summary: RunSummary::default(),
    };

    // contents_first yields each folder only after its subfolders are
    // done, so albums are checked before their artist folder and depth is
    // computed per branch by walkdir.
    for entry in WalkDir::new(root).max_depth(3).contents_first(true) {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => {
                walker.visit_folder(entry.path(), entry.depth());
            }
            Ok(_) => {}
            Err(e) => {
                error!("failed to read a directory entry: {}", e);
                walker.summary.errors += 1;
            }
        }
    }

    Ok(walker.summary)
}

struct Walker<'a, S: TagStore> {
    store: &'a S,
    dry_run: bool,
    summary: RunSummary,
}

impl<S: TagStore> Walker<'_, S> {
    fn visit_folder(&mut self, path: &Path, depth: usize) {
        self.summary.folders_visited += 1;

        match depth {
            0 | 1 => self.check_grouping_folder(path),
            2 => self.check_artist_folder(path),
            3 => self.check_album_folder(path),
            // max_depth keeps anything deeper out of the iterator; the
            // album-folder check reports such nesting.
            _ => {}
        }
    }

    /// Root and letter-grouping levels: folders only, no files.
    fn check_grouping_folder(&mut self, path: &Path) {
        let (_, files) = self.list_entries(path);

        if !files.is_empty() {
            error!(
                folder = %path.display(),
                "no files are allowed at this level, found {:?}",
                file_names(&files)
            );
            self.summary.errors += 1;
        }
    }

    fn check_artist_folder(&mut self, path: &Path) {
        let Some(ctx) = self.folder_context(path, false) else {
            return;
        };

        let (_, files) = self.list_entries(path);
        let (audio, other) = partition_audio(files);

        // Loose images or notes belong in album folders, if anywhere.
        if !other.is_empty() {
            warn!(
                folder = %path.display(),
                "unexpected non-audio files {:?}",
                file_names(&other)
            );
            self.summary.warnings += 1;
        }

        for file in &audio {
            self.check_audio_file(file, &ctx, None);
        }
    }

    fn check_album_folder(&mut self, path: &Path) {
        let (subfolders, files) = self.list_entries(path);

        // Decided behavior for trees nested deeper than the convention:
        // report and ignore, never descend.
        if !subfolders.is_empty() {
            warn!(
                folder = %path.display(),
                "folders nested below the album level are ignored: {:?}",
                file_names(&subfolders)
            );
            self.summary.warnings += 1;
        }

        let Some(ctx) = self.folder_context(path, true) else {
            return;
        };

        let (audio, covers) = partition_audio(files);

        for file in &audio {
            self.check_audio_file(file, &ctx, Some(&covers));
        }
    }

    /// Derive and validate the folder's artist name, plus the album name
    /// for album folders. A failure skips the whole folder: checking files
    /// against a name we could not derive would only produce noise.
    fn folder_context(&mut self, path: &Path, is_album_folder: bool) -> Option<FolderContext> {
        let artist_name = match folder::artist_name_from_folder(path, is_album_folder) {
            Ok(name) => name,
            Err(e) => {
                warn!("skipping folder: {}", e);
                self.summary.warnings += 1;
                return None;
            }
        };

        if validate_name(Some(&artist_name), NAME_CHARS).is_err() {
            warn!(
                folder = %path.display(),
                "skipping folder, artist name {:?} is not a valid name",
                artist_name
            );
            self.summary.warnings += 1;
            return None;
        }

        let album_name = is_album_folder.then(|| folder::album_name_from_folder(path));

        Some(FolderContext {
            artist_name,
            album_name,
        })
    }

    fn check_audio_file(
        &mut self,
        path: &Path,
        ctx: &FolderContext,
        covers: Option<&[PathBuf]>,
    ) {
        let metadata = match self.store.load(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                error!(file = %path.display(), "skipping file: {}", e);
                self.summary.errors += 1;
                return;
            }
        };

        self.summary.files_checked += 1;

        let outcome = rules::check_file(path, metadata, ctx, covers);

        for violation in &outcome.report {
            match violation.severity {
                Severity::Error => {
                    error!(file = %path.display(), "{}", violation.message);
                    self.summary.errors += 1;
                }
                Severity::Warning => {
                    warn!(file = %path.display(), "{}", violation.message);
                    self.summary.warnings += 1;
                }
                Severity::Info => {
                    info!(file = %path.display(), "{}", violation.message);
                    self.summary.repairs += 1;
                }
            }
        }

        if !outcome.needs_update {
            return;
        }

        if self.dry_run {
            info!(file = %path.display(), "dry run, corrections not written");
            return;
        }

        info!(file = %path.display(), "updating file");
        match self.store.save(path, &outcome.metadata) {
            Ok(()) => self.summary.files_updated += 1,
            Err(e) => {
                error!(file = %path.display(), "failed to update: {}", e);
                self.summary.errors += 1;
            }
        }
    }

    /// Snapshot one folder's direct entries, subfolders and files split.
    /// No order is imposed beyond what the filesystem yields.
    fn list_entries(&mut self, path: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut subfolders = Vec::new();
        let mut files = Vec::new();

        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                error!(folder = %path.display(), "failed to list folder: {}", e);
                self.summary.errors += 1;
                return (subfolders, files);
            }
        };

        for entry in entries {
            match entry {
                Ok(entry) => {
                    let entry_path = entry.path();
                    if entry_path.is_dir() {
                        subfolders.push(entry_path);
                    } else {
                        files.push(entry_path);
                    }
                }
                Err(e) => {
                    error!(folder = %path.display(), "failed to read an entry: {}", e);
                    self.summary.errors += 1;
                }
            }
        }

        (subfolders, files)
    }
}

fn is_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(AUDIO_EXTENSION))
}

fn partition_audio(files: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<PathBuf>) {
    files.into_iter().partition(|f| is_audio(f))
}

/// File names only, for log lines that list a folder's contents.
fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string())
        })
        .collect()
}
