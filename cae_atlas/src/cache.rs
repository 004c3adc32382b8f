// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! On-disk cache of rasterized atlases.
//!
//! Each [`CacheKey`] owns one directory under the cache root holding four artifacts:
//!
//! | file            | contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`ATLAS_IMAGE_FILE`] | the atlas as an 8-bit grayscale PNG                     |
//! | [`UV_FILE`]     | raw [`UvLocation`] records                                   |
//! | [`METRICS_FILE`] | raw [`Metrics`] records                                     |
//! | [`METADATA_FILE`] | one raw [`Metadata`] record                                |
//!
//! Binary files hold fixed-size, native-endian records with no framing, so the
//! record count is the file length divided by the record size.
//!
//! The artifacts are written into a staging directory which is then renamed into
//! place, so readers only ever observe a complete set or no set at all.

use std::fmt;
use std::fs;
use std::hash::BuildHasher;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytemuck::Pod;
use foldhash::fast::FixedState;
use image::{ExtendedColorType, ImageFormat};
use log::{debug, info, warn};

use crate::{AtlasError, CharMapData, FontSource, Metadata, Metrics, UvLocation};

/// File name of the atlas image.
pub const ATLAS_IMAGE_FILE: &str = "tex";
/// File name of the UV table.
pub const UV_FILE: &str = "uv.dat";
/// File name of the metrics table.
pub const METRICS_FILE: &str = "metrics.dat";
/// File name of the metadata record.
pub const METADATA_FILE: &str = "meta.dat";

/// Seed for key hashing. Changing it invalidates every existing cache entry.
///
/// `foldhash` does not promise stable output across releases or targets, so a
/// dependency bump may also change keys. Stale entries are then left unused and
/// the atlas is rebuilt.
const KEY_SEED: u64 = 0x6361_655f_6174_6c73;

/// Identifies the cached atlas of one font face at one pixel size.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives a key from a font identity (usually its path), face index and size.
    ///
    /// The key is deterministic: the same inputs give the same key in every run.
    pub fn new(font_identity: &str, index: u32, px_size: u32) -> Self {
        let hash = FixedState::with_seed(KEY_SEED).hash_one((font_identity, index, px_size));
        let stem = Path::new(font_identity)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("font");
        let stem: String = stem
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        Self(format!("{stem}-{px_size}px-{hash:016x}"))
    }

    /// The key for `font` at `px_size`.
    pub fn for_font(font: &FontSource, px_size: u32) -> Self {
        Self::new(&font.identity(), font.index(), px_size)
    }

    /// The key as a directory name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A directory of cached atlases.
#[derive(Clone, Debug)]
pub struct AtlasCache {
    root: PathBuf,
}

impl AtlasCache {
    /// Creates a cache rooted at `root`. The directory is created on first store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a cache in the per-user application data directory.
    pub fn in_user_data_dir() -> Result<Self, AtlasError> {
        let base = dirs::data_local_dir().ok_or_else(|| {
            AtlasError::io(
                "<user data directory>",
                std::io::Error::new(ErrorKind::NotFound, "no per-user data directory"),
            )
        })?;
        let root = base.join("cae").join("atlas");
        fs::create_dir_all(&root).map_err(|err| AtlasError::io(&root, err))?;
        Ok(Self { root })
    }

    /// The cache root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory holding the artifacts for `key`.
    pub fn entry_dir(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    /// Returns the cached atlas for `key`, building and storing it on a miss.
    ///
    /// `build` is not called when a complete, consistent entry exists. A corrupt entry
    /// is logged and rebuilt.
    pub fn load_or_build<F>(&self, key: &CacheKey, build: F) -> Result<CharMapData, AtlasError>
    where
        F: FnOnce() -> Result<CharMapData, AtlasError>,
    {
        match self.load(key) {
            Ok(Some(data)) => {
                debug!("atlas cache hit for {key}");
                return Ok(data);
            }
            Ok(None) => debug!("atlas cache miss for {key}"),
            Err(err @ AtlasError::CacheCorrupt { .. }) => warn!("{err}; rebuilding {key}"),
            Err(err) => return Err(err),
        }
        let data = build()?;
        self.store(key, &data)?;
        info!("cached atlas {key} in {}", self.entry_dir(key).display());
        Ok(data)
    }

    /// Loads the entry for `key`.
    ///
    /// Returns `Ok(None)` if any artifact is missing, and
    /// [`AtlasError::CacheCorrupt`] if the artifacts are present but inconsistent.
    pub fn load(&self, key: &CacheKey) -> Result<Option<CharMapData>, AtlasError> {
        let dir = self.entry_dir(key);
        let paths = ArtifactPaths::new(&dir);
        let (Some(meta), Some(uv), Some(metrics), Some(image)) = (
            read_artifact(&paths.metadata)?,
            read_artifact(&paths.uv)?,
            read_artifact(&paths.metrics)?,
            read_artifact(&paths.image)?,
        ) else {
            return Ok(None);
        };

        let records: Vec<Metadata> = decode_records(&paths.metadata, &meta)?;
        let [metadata] = records[..] else {
            return Err(AtlasError::corrupt(
                &paths.metadata,
                format!("expected one record, found {}", records.len()),
            ));
        };
        let char_to_uv_locations: Vec<UvLocation> = decode_records(&paths.uv, &uv)?;
        let char_to_metrics: Vec<Metrics> = decode_records(&paths.metrics, &metrics)?;

        let atlas = image::load_from_memory_with_format(&image, ImageFormat::Png)
            .map_err(|err| AtlasError::corrupt(&paths.image, err.to_string()))?
            .into_luma8();
        if i64::from(atlas.width()) != i64::from(metadata.image_width)
            || i64::from(atlas.height()) != i64::from(metadata.image_height)
        {
            return Err(AtlasError::corrupt(
                &paths.image,
                format!(
                    "image is {}x{} but metadata says {}x{}",
                    atlas.width(),
                    atlas.height(),
                    metadata.image_width,
                    metadata.image_height
                ),
            ));
        }

        let data = CharMapData {
            metadata,
            pixels: atlas.into_raw(),
            char_to_uv_locations,
            char_to_metrics,
        };
        data.validate()
            .map_err(|reason| AtlasError::corrupt(&dir, reason))?;
        Ok(Some(data))
    }

    /// Stores `data` as the entry for `key`, replacing any previous entry.
    pub fn store(&self, key: &CacheKey, data: &CharMapData) -> Result<(), AtlasError> {
        fs::create_dir_all(&self.root).map_err(|err| AtlasError::io(&self.root, err))?;
        let staging = self.root.join(format!(".{key}.staging"));
        remove_dir_if_present(&staging)?;
        fs::create_dir(&staging).map_err(|err| AtlasError::io(&staging, err))?;

        let result = write_artifacts(&ArtifactPaths::new(&staging), data)
            .and_then(|()| self.commit(&staging, &self.entry_dir(key)));
        if result.is_err() {
            // Best effort: a leftover staging directory is cleared by the next store.
            let _ = fs::remove_dir_all(&staging);
        }
        result
    }

    fn commit(&self, staging: &Path, target: &Path) -> Result<(), AtlasError> {
        remove_dir_if_present(target)?;
        fs::rename(staging, target).map_err(|err| AtlasError::io(target, err))
    }
}

struct ArtifactPaths {
    image: PathBuf,
    uv: PathBuf,
    metrics: PathBuf,
    metadata: PathBuf,
}

impl ArtifactPaths {
    fn new(dir: &Path) -> Self {
        Self {
            image: dir.join(ATLAS_IMAGE_FILE),
            uv: dir.join(UV_FILE),
            metrics: dir.join(METRICS_FILE),
            metadata: dir.join(METADATA_FILE),
        }
    }
}

fn write_artifacts(paths: &ArtifactPaths, data: &CharMapData) -> Result<(), AtlasError> {
    let Metadata {
        image_width,
        image_height,
        ..
    } = data.metadata;
    let (Ok(width), Ok(height)) = (u32::try_from(image_width), u32::try_from(image_height)) else {
        return Err(AtlasError::corrupt(
            &paths.metadata,
            format!("cannot store a {image_width}x{image_height} atlas"),
        ));
    };
    image::save_buffer_with_format(
        &paths.image,
        &data.pixels,
        width,
        height,
        ExtendedColorType::L8,
        ImageFormat::Png,
    )
    .map_err(|source| AtlasError::Image {
        path: paths.image.clone(),
        source,
    })?;
    write_records(&paths.uv, &data.char_to_uv_locations)?;
    write_records(&paths.metrics, &data.char_to_metrics)?;
    write_records(&paths.metadata, core::slice::from_ref(&data.metadata))
}

fn write_records<T: Pod>(path: &Path, records: &[T]) -> Result<(), AtlasError> {
    fs::write(path, bytemuck::cast_slice::<T, u8>(records)).map_err(|err| AtlasError::io(path, err))
}

/// Reads a whole artifact, mapping "not found" to `None`.
fn read_artifact(path: &Path) -> Result<Option<Vec<u8>>, AtlasError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(AtlasError::io(path, err)),
    }
}

fn decode_records<T: Pod>(path: &Path, bytes: &[u8]) -> Result<Vec<T>, AtlasError> {
    let record_size = size_of::<T>();
    if bytes.len() % record_size != 0 {
        return Err(AtlasError::corrupt(
            path,
            format!(
                "length {} is not a multiple of the {record_size}-byte record size",
                bytes.len()
            ),
        ));
    }
    Ok(bytemuck::pod_collect_to_vec(bytes))
}

fn remove_dir_if_present(path: &Path) -> Result<(), AtlasError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(AtlasError::io(path, err)),
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::pack::synthetic_glyphs;
    use crate::{CHAR_COUNT, pack_glyphs};

    fn sample() -> CharMapData {
        pack_glyphs(&synthetic_glyphs(), 5)
    }

    fn key() -> CacheKey {
        CacheKey::new("/fonts/Iosevka Term.ttf", 0, 16)
    }

    #[test]
    fn round_trip_is_exact() {
        let root = tempfile::tempdir().unwrap();
        let cache = AtlasCache::new(root.path());
        let data = sample();
        cache.store(&key(), &data).unwrap();
        let loaded = cache.load(&key()).unwrap().expect("entry was stored");
        assert_eq!(loaded, data);
        assert_eq!(
            bytemuck::cast_slice::<UvLocation, u8>(&loaded.char_to_uv_locations),
            bytemuck::cast_slice::<UvLocation, u8>(&data.char_to_uv_locations),
            "uv table is bit-identical"
        );
    }

    #[test]
    fn loaded_tables_cover_every_code() {
        let root = tempfile::tempdir().unwrap();
        let cache = AtlasCache::new(root.path());
        cache.store(&key(), &sample()).unwrap();
        let loaded = cache.load(&key()).unwrap().unwrap();
        assert_eq!(loaded.char_to_uv_locations.len(), loaded.char_to_metrics.len());
        assert!(loaded.char_to_metrics.len() >= CHAR_COUNT);
    }

    #[test]
    fn artifacts_use_fixed_layout() {
        let root = tempfile::tempdir().unwrap();
        let cache = AtlasCache::new(root.path());
        let data = sample();
        cache.store(&key(), &data).unwrap();
        let dir = cache.entry_dir(&key());
        let len = |name: &str| fs::metadata(dir.join(name)).unwrap().len();
        assert_eq!(len(METADATA_FILE), 12);
        assert_eq!(len(UV_FILE), 8 * CHAR_COUNT as u64);
        assert_eq!(len(METRICS_FILE), 20 * CHAR_COUNT as u64);
        let meta = fs::read(dir.join(METADATA_FILE)).unwrap();
        assert_eq!(&meta[8..12], &data.metadata.space_width.to_ne_bytes());
    }

    #[test]
    fn missing_entry_is_a_miss() {
        let root = tempfile::tempdir().unwrap();
        let cache = AtlasCache::new(root.path());
        assert!(cache.load(&key()).unwrap().is_none());
    }

    #[test]
    fn partial_entry_is_a_miss() {
        let root = tempfile::tempdir().unwrap();
        let cache = AtlasCache::new(root.path());
        cache.store(&key(), &sample()).unwrap();
        fs::remove_file(cache.entry_dir(&key()).join(UV_FILE)).unwrap();
        assert!(cache.load(&key()).unwrap().is_none());
    }

    #[test]
    fn hit_does_not_build() {
        let root = tempfile::tempdir().unwrap();
        let cache = AtlasCache::new(root.path());
        let data = sample();
        cache.store(&key(), &data).unwrap();
        let loaded = cache
            .load_or_build(&key(), || panic!("cache hit must not rebuild"))
            .unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn miss_builds_once_then_hits() {
        let root = tempfile::tempdir().unwrap();
        let cache = AtlasCache::new(root.path());
        let builds = Cell::new(0);
        let build = || {
            builds.set(builds.get() + 1);
            Ok(sample())
        };
        let first = cache.load_or_build(&key(), build).unwrap();
        let second = cache.load_or_build(&key(), build).unwrap();
        assert_eq!(builds.get(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn build_errors_propagate_without_storing() {
        let root = tempfile::tempdir().unwrap();
        let cache = AtlasCache::new(root.path());
        let result = cache.load_or_build(&key(), || {
            Err(AtlasError::FontUnavailable {
                candidates: vec!["Nope".into()],
            })
        });
        assert!(matches!(result, Err(AtlasError::FontUnavailable { .. })));
        assert!(!cache.entry_dir(&key()).exists());
    }

    #[test]
    fn truncated_table_is_corrupt_and_rebuilt() {
        let root = tempfile::tempdir().unwrap();
        let cache = AtlasCache::new(root.path());
        let data = sample();
        cache.store(&key(), &data).unwrap();
        let metrics_path = cache.entry_dir(&key()).join(METRICS_FILE);
        let mut bytes = fs::read(&metrics_path).unwrap();
        bytes.pop();
        fs::write(&metrics_path, bytes).unwrap();

        match cache.load(&key()) {
            Err(AtlasError::CacheCorrupt { path, .. }) => assert_eq!(path, metrics_path),
            other => panic!("expected CacheCorrupt, got {other:?}"),
        }

        let builds = Cell::new(0);
        let rebuilt = cache
            .load_or_build(&key(), || {
                builds.set(builds.get() + 1);
                Ok(data.clone())
            })
            .unwrap();
        assert_eq!(builds.get(), 1);
        assert_eq!(rebuilt, data);
        assert_eq!(cache.load(&key()).unwrap(), Some(data));
    }

    #[test]
    fn each_artifact_is_read_from_its_own_path() {
        let root = tempfile::tempdir().unwrap();
        let cache = AtlasCache::new(root.path());
        cache.store(&key(), &sample()).unwrap();
        // A UV table with one record short of the metrics table must be detected,
        // which it would not be if the UV table were read from the metrics file.
        let uv_path = cache.entry_dir(&key()).join(UV_FILE);
        let mut uv = fs::read(&uv_path).unwrap();
        uv.truncate(uv.len() - size_of::<UvLocation>());
        fs::write(&uv_path, uv).unwrap();
        assert!(matches!(
            cache.load(&key()),
            Err(AtlasError::CacheCorrupt { .. })
        ));
    }

    #[test]
    fn storing_twice_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let cache = AtlasCache::new(root.path().join("nested").join("root"));
        let data = sample();
        cache.store(&key(), &data).unwrap();
        cache.store(&key(), &data).unwrap();
        assert_eq!(cache.load(&key()).unwrap(), Some(data));
        let leftovers: Vec<_> = fs::read_dir(cache.root())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from(key().as_str())]);
    }

    #[test]
    fn keys_are_deterministic_and_distinct() {
        assert_eq!(key(), CacheKey::new("/fonts/Iosevka Term.ttf", 0, 16));
        assert_ne!(key(), CacheKey::new("/fonts/Iosevka Term.ttf", 0, 17));
        assert_ne!(key(), CacheKey::new("/fonts/Iosevka Term.ttf", 1, 16));
        assert_ne!(key(), CacheKey::new("/other/Iosevka Term.ttf", 0, 16));
        assert!(key().as_str().starts_with("Iosevka_Term-16px-"));
    }
}
