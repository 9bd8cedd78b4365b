//! Collision-free path planning for derived assets.

use std::io;
use std::path::{Path, PathBuf};

/// Marker substring identifying an already-upscaled asset name.
const UPSCALE_MARKER: &str = "upscaled";

/// Bare file name of a storage-relative path, e.g. `outputs/a.png` -> `a.png`.
///
/// This is the file-system side of the ledger join; output paths are always
/// stored as `<dir>/<basename>`.
pub fn file_name_of(path: &str) -> Option<&str> {
    Path::new(path).file_name().and_then(|n| n.to_str())
}

/// Plan the destination path for an upscaled copy of `relative_output`.
///
/// The stem gains a `-upscaled` suffix unless it already contains the
/// marker; `-1`, `-2`, … are appended until a name is found that does not
/// exist in `outputs_dir`. Existence is probed immediately before
/// acceptance, so two planners running concurrently can still pick the same
/// name (an accepted weakness, see DESIGN.md).
pub async fn upscaled_destination(
    outputs_dir: &Path,
    relative_output: &str,
) -> io::Result<PathBuf> {
    let source = Path::new(relative_output);
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let base = if stem.contains(UPSCALE_MARKER) {
        stem
    } else {
        format!("{stem}-upscaled")
    };

    let mut candidate = format!("{base}{ext}");
    let mut counter = 1u32;
    loop {
        let candidate_path = outputs_dir.join(&candidate);
        if !tokio::fs::try_exists(&candidate_path).await? {
            return Ok(candidate_path);
        }
        candidate = format!("{base}-{counter}{ext}");
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_of_strips_directories() {
        assert_eq!(file_name_of("outputs/a.png"), Some("a.png"));
        assert_eq!(file_name_of("a.png"), Some("a.png"));
    }

    #[tokio::test]
    async fn first_candidate_when_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let dest = upscaled_destination(dir.path(), "outputs/photo.png")
            .await
            .unwrap();
        assert_eq!(dest, dir.path().join("photo-upscaled.png"));
    }

    #[tokio::test]
    async fn collisions_get_numeric_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo-upscaled.png"), b"x").unwrap();

        let dest = upscaled_destination(dir.path(), "outputs/photo.png")
            .await
            .unwrap();
        assert_eq!(dest, dir.path().join("photo-upscaled-1.png"));

        std::fs::write(&dest, b"x").unwrap();
        let next = upscaled_destination(dir.path(), "outputs/photo.png")
            .await
            .unwrap();
        assert_eq!(next, dir.path().join("photo-upscaled-2.png"));
    }

    #[tokio::test]
    async fn already_upscaled_stem_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let dest = upscaled_destination(dir.path(), "outputs/photo-upscaled.png")
            .await
            .unwrap();
        assert_eq!(dest, dir.path().join("photo-upscaled.png"));
    }

    #[tokio::test]
    async fn never_returns_an_existing_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo-upscaled.png"), b"x").unwrap();
        std::fs::write(dir.path().join("photo-upscaled-1.png"), b"x").unwrap();

        let dest = upscaled_destination(dir.path(), "outputs/photo.png")
            .await
            .unwrap();
        assert!(!dest.exists());
        assert_eq!(dest, dir.path().join("photo-upscaled-2.png"));
    }
}
