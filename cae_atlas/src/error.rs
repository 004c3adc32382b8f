// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while resolving, rasterizing or caching a font atlas.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AtlasError {
    /// None of the candidate fonts could be opened.
    #[error("no usable font among candidates [{}]", .candidates.join(", "))]
    FontUnavailable {
        /// The candidates that were tried, in order.
        candidates: Vec<String>,
    },
    /// A single character could not be rendered.
    ///
    /// The rasterizer recovers from this by substituting an empty glyph.
    #[error("character code {code} could not be rasterized")]
    GlyphRaster {
        /// The byte value of the character.
        code: u8,
    },
    /// A cached artifact is inconsistent. Recovered by rebuilding the atlas.
    #[error("cached artifact `{}` is corrupt: {reason}", .path.display())]
    CacheCorrupt {
        /// The offending artifact.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },
    /// A directory or file operation failed.
    #[error("i/o error on `{}`", .path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The atlas image could not be encoded.
    #[error("failed to write atlas image `{}`", .path.display())]
    Image {
        /// The image path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: image::ImageError,
    },
}

impl AtlasError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CacheCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
