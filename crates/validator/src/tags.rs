//! Tag store: load a [`TrackMetadata`] snapshot from an audio file and
//! write a corrected snapshot back.

use std::path::Path;

use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::prelude::Accessor;
use lofty::read_from_path;
use lofty::tag::{ItemKey, ItemValue, Tag, TagItem};

use tagcheck_core::{Error, Result, TrackMetadata};

/// The walker's seam to tag I/O. Tests substitute an in-memory store so
/// traversal logic can be exercised without real audio files.
pub trait TagStore {
    /// Load the tag state of one file. Fails with `Error::MissingFile`
    /// when the file vanished between enumeration and load.
    fn load(&self, path: &Path) -> Result<TrackMetadata>;

    /// Persist a corrected snapshot. All mutated fields are written back
    /// in a single save.
    fn save(&self, path: &Path, metadata: &TrackMetadata) -> Result<()>;
}

/// lofty-backed implementation used by the real runs.
pub struct LoftyTagStore;

impl TagStore for LoftyTagStore {
    fn load(&self, path: &Path) -> Result<TrackMetadata> {
        if !path.exists() {
            return Err(Error::MissingFile(path.to_path_buf()));
        }

        let tagged = read_from_path(path).map_err(|e| Error::Tag(e.to_string()))?;

        let tag = match tagged.primary_tag().or_else(|| tagged.first_tag()) {
            Some(tag) => tag,
            // A file with no tag at all: every rule sees empty fields.
            None => return Ok(TrackMetadata::default()),
        };

        Ok(TrackMetadata {
            title: tag.title().map(|t| t.to_string()).unwrap_or_default(),
            performers: strings(tag, ItemKey::TrackArtist),
            genres: strings(tag, ItemKey::Genre),
            comment: tag.comment().map(|c| c.to_string()).unwrap_or_default(),
            year: tag.year().unwrap_or(0),
            album_artists: strings(tag, ItemKey::AlbumArtist),
            composers: strings(tag, ItemKey::Composer),
            disc: tag.disk().unwrap_or(0),
            album: tag.album().map(|a| a.to_string()).unwrap_or_default(),
            track: tag.track().unwrap_or(0),
            pictures: tag.pictures().iter().map(|p| p.data().to_vec()).collect(),
        })
    }

    fn save(&self, path: &Path, metadata: &TrackMetadata) -> Result<()> {
        let mut tagged = read_from_path(path).map_err(|e| Error::Tag(e.to_string()))?;

        if tagged.primary_tag().is_none() {
            tagged.insert_tag(Tag::new(tagged.primary_tag_type()));
        }

        let tag = tagged
            .primary_tag_mut()
            .ok_or_else(|| Error::Tag(format!("no writable tag for {}", path.display())))?;

        set_text(tag, &metadata.title, Tag::set_title, Tag::remove_title);
        set_text(tag, &metadata.album, Tag::set_album, Tag::remove_album);
        set_text(tag, &metadata.comment, Tag::set_comment, Tag::remove_comment);
        set_number(tag, metadata.year, Tag::set_year, Tag::remove_year);
        set_number(tag, metadata.track, Tag::set_track, Tag::remove_track);
        set_number(tag, metadata.disc, Tag::set_disk, Tag::remove_disk);

        replace_strings(tag, ItemKey::TrackArtist, &metadata.performers);
        replace_strings(tag, ItemKey::Genre, &metadata.genres);
        replace_strings(tag, ItemKey::AlbumArtist, &metadata.album_artists);
        replace_strings(tag, ItemKey::Composer, &metadata.composers);

        // The rules only ever clear pictures, never add or reorder them.
        if metadata.pictures.is_empty() {
            while !tag.pictures().is_empty() {
                tag.remove_picture(0);
            }
        }

        tagged
            .save_to_path(path, WriteOptions::default())
            .map_err(|e| Error::Tag(e.to_string()))
    }
}

fn strings(tag: &Tag, key: ItemKey) -> Vec<String> {
    tag.get_strings(&key).map(str::to_string).collect()
}

fn set_text(tag: &mut Tag, value: &str, set: fn(&mut Tag, String), remove: fn(&mut Tag)) {
    if value.is_empty() {
        remove(tag);
    } else {
        set(tag, value.to_string());
    }
}

fn set_number(tag: &mut Tag, value: u32, set: fn(&mut Tag, u32), remove: fn(&mut Tag)) {
    if value == 0 {
        remove(tag);
    } else {
        set(tag, value);
    }
}

fn replace_strings(tag: &mut Tag, key: ItemKey, values: &[String]) {
    tag.remove_key(&key);
    for value in values {
        tag.push(TagItem::new(key.clone(), ItemValue::Text(value.clone())));
    }
}
