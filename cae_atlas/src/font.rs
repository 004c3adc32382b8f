// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font resolution from an ordered list of candidates.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fontique::{Blob, Collection, CollectionOptions, FamilyInfo, GenericFamily, SourceKind};
use log::debug;
use swash::FontRef;

use crate::AtlasError;

/// The bytes of one font face plus where they came from.
#[derive(Clone)]
pub struct FontSource {
    name: String,
    path: Option<PathBuf>,
    index: u32,
    data: Blob<u8>,
}

impl FontSource {
    /// Loads a font file from disk.
    pub fn from_path(path: impl AsRef<Path>, index: u32) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| AtlasError::io(path, err))?;
        Ok(Self {
            name: path.display().to_string(),
            path: Some(path.to_path_buf()),
            index,
            data: Blob::new(Arc::new(bytes)),
        })
    }

    /// Wraps font bytes that have no backing file.
    pub fn from_bytes(name: impl Into<String>, index: u32, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            path: None,
            index,
            data: Blob::new(Arc::new(bytes)),
        }
    }

    /// The candidate name this font was resolved from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The font file, if the font was loaded from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Index of the face within a font collection file.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The raw font data.
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// A stable string identifying this face, used to derive cache keys.
    ///
    /// This is the font path when there is one and the candidate name otherwise.
    pub fn identity(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => format!("memory:{}", self.name),
        }
    }

    /// Whether the bytes parse as a font face at [`FontSource::index`].
    pub fn is_usable(&self) -> bool {
        FontRef::from_index(self.data(), self.index as usize).is_some()
    }

    /// Looks `name` up in `collection`. Generic names such as `monospace` map to
    /// the families the system configures for them, tried in order.
    fn from_collection(collection: &mut Collection, name: &str) -> Option<Self> {
        match GenericFamily::parse(name) {
            Some(generic) => {
                let ids = collection.generic_families(generic).collect::<Vec<_>>();
                ids.into_iter().find_map(|id| {
                    let family = collection.family(id)?;
                    Self::from_family(&family, name)
                })
            }
            None => {
                let family = collection.family_by_name(name)?;
                Self::from_family(&family, name)
            }
        }
    }

    fn from_family(family: &FamilyInfo, name: &str) -> Option<Self> {
        let font = family.default_font()?;
        let data = font.load(None)?;
        let path = if let SourceKind::Path(path) = &font.source().kind {
            Some(path.to_path_buf())
        } else {
            None
        };
        Some(Self {
            name: name.to_owned(),
            path,
            index: font.index(),
            data,
        })
        .filter(Self::is_usable)
    }
}

impl fmt::Debug for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSource")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("index", &self.index)
            .field("data", &format_args!("[{} bytes]", self.data().len()))
            .finish()
    }
}

/// Resolves the first usable font from `candidates`.
///
/// Each candidate is either a path to a font file, a family name looked up in the
/// system font collection, or a generic name like `monospace`. Candidates are tried
/// in order and one whose bytes do not parse as a font is skipped.
pub fn resolve_font<S: AsRef<str>>(candidates: &[S]) -> Result<FontSource, AtlasError> {
    let mut collection = Collection::new(CollectionOptions {
        shared: false,
        system_fonts: true,
    });
    for candidate in candidates {
        let candidate = candidate.as_ref();
        let path = Path::new(candidate);
        let resolved = if path.is_file() {
            FontSource::from_path(path, 0)
                .ok()
                .filter(FontSource::is_usable)
        } else {
            FontSource::from_collection(&mut collection, candidate)
        };
        match resolved {
            Some(font) => {
                debug!("resolved font candidate `{candidate}` to {}", font.identity());
                return Ok(font);
            }
            None => debug!("font candidate `{candidate}` did not resolve"),
        }
    }
    Err(AtlasError::FontUnavailable {
        candidates: candidates.iter().map(|c| c.as_ref().to_owned()).collect(),
    })
}
