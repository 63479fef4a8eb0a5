//! Asset locations and byte fetching with progress.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::AssetLoadError;

/// Largest asset accepted, in bytes.
pub const MAX_ASSET_BYTES: u64 = 512 * 1024 * 1024;

const READ_CHUNK: usize = 64 * 1024;

/// Where an asset's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// An `http://` or `https://` URL.
    Url(String),
}

impl AssetSource {
    /// Classify a location string: URLs by scheme, anything else as a path.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_owned())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }

    /// Directory that relative references inside the asset resolve
    /// against. Only local files have one.
    #[must_use]
    pub fn base_dir(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => path.parent(),
            Self::Url(_) => None,
        }
    }

    /// Read the whole asset, reporting progress in `[0, 1]` as bytes arrive.
    ///
    /// # Errors
    ///
    /// [`AssetLoadError::Io`] for unreadable files,
    /// [`AssetLoadError::Fetch`] for network failures, and
    /// [`AssetLoadError::TooLarge`] past [`MAX_ASSET_BYTES`].
    pub fn fetch(
        &self,
        on_progress: &mut dyn FnMut(f32),
    ) -> Result<Vec<u8>, AssetLoadError> {
        match self {
            Self::Path(path) => {
                let file = std::fs::File::open(path)?;
                let total = file.metadata().ok().map(|m| m.len());
                read_with_progress(file, total, MAX_ASSET_BYTES, on_progress)
            }
            Self::Url(url) => fetch_url(url, on_progress),
        }
    }
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(feature = "remote")]
fn fetch_url(
    url: &str,
    on_progress: &mut dyn FnMut(f32),
) -> Result<Vec<u8>, AssetLoadError> {
    log::info!("downloading {url}");
    let mut response = ureq::get(url)
        .call()
        .map_err(|e| AssetLoadError::Fetch(format!("{url}: {e}")))?;
    let total = response.body().content_length();
    let reader = response
        .body_mut()
        .with_config()
        .limit(MAX_ASSET_BYTES)
        .reader();
    read_with_progress(reader, total, MAX_ASSET_BYTES, on_progress)
}

#[cfg(not(feature = "remote"))]
fn fetch_url(
    url: &str,
    _on_progress: &mut dyn FnMut(f32),
) -> Result<Vec<u8>, AssetLoadError> {
    Err(AssetLoadError::Fetch(format!(
        "{url}: built without the `remote` feature"
    )))
}

/// Drain `reader`, reporting `bytes_read / total` (clamped to `[0, 1]`)
/// after each chunk and `1.0` at the end.
///
/// Without a known total only the final `1.0` is reported.
pub(crate) fn read_with_progress(
    mut reader: impl Read,
    total: Option<u64>,
    max_bytes: u64,
    on_progress: &mut dyn FnMut(f32),
) -> Result<Vec<u8>, AssetLoadError> {
    let capacity = total.unwrap_or(0).min(max_bytes) as usize;
    let mut bytes = Vec::with_capacity(capacity);
    let mut chunk = vec![0_u8; READ_CHUNK];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(AssetLoadError::Io(e)),
        };
        bytes.extend_from_slice(&chunk[..n]);
        if bytes.len() as u64 > max_bytes {
            return Err(AssetLoadError::TooLarge { limit: max_bytes });
        }
        if let Some(total) = total.filter(|&t| t > 0) {
            on_progress(progress_fraction(bytes.len() as u64, total));
        }
    }
    on_progress(1.0);
    Ok(bytes)
}

/// `loaded / total` clamped to `[0, 1]`; servers may under-report length.
#[must_use]
pub fn progress_fraction(loaded: u64, total: u64) -> f32 {
    if total == 0 {
        return 1.0;
    }
    (loaded as f64 / total as f64).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn parse_distinguishes_urls() {
        assert_eq!(
            AssetSource::parse("https://example.com/sky.hdr"),
            AssetSource::Url("https://example.com/sky.hdr".to_owned())
        );
        assert_eq!(
            AssetSource::parse("HTTP://example.com/a.glb"),
            AssetSource::Url("HTTP://example.com/a.glb".to_owned())
        );
        assert_eq!(
            AssetSource::parse("textures/DamagedHelmet.gltf"),
            AssetSource::Path(PathBuf::from("textures/DamagedHelmet.gltf"))
        );
    }

    #[test]
    fn base_dir_only_for_paths() {
        let local = AssetSource::parse("models/helmet/scene.gltf");
        assert_eq!(local.base_dir(), Some(Path::new("models/helmet")));
        assert!(AssetSource::parse("https://x.org/a.gltf")
            .base_dir()
            .is_none());
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress_fraction(50, 100), 0.5);
        assert_eq!(progress_fraction(150, 100), 1.0);
        assert_eq!(progress_fraction(0, 0), 1.0);
    }

    #[test]
    fn read_reports_monotonic_progress_ending_at_one() {
        let data = vec![7_u8; READ_CHUNK * 3 + 10];
        let mut seen = Vec::new();
        let bytes = read_with_progress(
            Cursor::new(data.clone()),
            Some(data.len() as u64),
            MAX_ASSET_BYTES,
            &mut |f| seen.push(f),
        )
        .unwrap();
        assert_eq!(bytes, data);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last().copied(), Some(1.0));
        assert!(seen.len() >= 4);
    }

    #[test]
    fn unknown_length_reports_only_completion() {
        let mut seen = Vec::new();
        let _ = read_with_progress(
            Cursor::new(vec![1_u8; 10]),
            None,
            MAX_ASSET_BYTES,
            &mut |f| seen.push(f),
        )
        .unwrap();
        assert_eq!(seen, vec![1.0]);
    }

    #[test]
    fn oversized_input_rejected() {
        let err = read_with_progress(
            Cursor::new(vec![0_u8; 100]),
            None,
            10,
            &mut |_| {},
        )
        .unwrap_err();
        assert!(matches!(err, AssetLoadError::TooLarge { limit: 10 }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = AssetSource::parse("/definitely/not/here.hdr");
        let err = source.fetch(&mut |_| {}).unwrap_err();
        assert!(matches!(err, AssetLoadError::Io(_)));
    }
}
