use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::Result;

/// File extensions accepted as still images (compared case-insensitively)
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "tiff", "gif"];

pub fn is_supported_image<P: AsRef<Path>>(path: P) -> bool {
    match path.as_ref().extension().and_then(|ext| ext.to_str()) {
        Some(ext) => IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Recursively collect supported images, sorted by lower-cased file name
///
/// Any file with a supported extension counts, including dot-files and symbolic
/// links to files. Files with equal lower-cased names are ordered by full path so
/// the result is a total order.
pub fn discover_images<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>> {
    let directory = directory.as_ref();
    let mut images = Vec::new();

    for entry in WalkDir::new(directory) {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();

        // `Path::is_file` follows symlinks, `DirEntry::file_type` does not
        if path.is_file() && is_supported_image(path) {
            debug!("Discovered image: {}", path.display());
            images.push(path.to_path_buf());
        }
    }

    images.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)).then_with(|| a.cmp(b)));

    info!("Discovered {} images under {}", images.len(), directory.display());
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"not really an image").unwrap();
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_image("a.png"));
        assert!(is_supported_image("a.JPEG"));
        assert!(is_supported_image("dir/b.Tiff"));
        assert!(is_supported_image("c.webp"));
        assert!(!is_supported_image("d.mp4"));
        assert!(!is_supported_image("png"));
    }

    #[test]
    fn test_recursive_case_insensitive_sort() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("b_second.PNG"));
        touch(&dir.path().join("nested/A_first.jpg"));
        touch(&dir.path().join("nested/deeper/c_third.gif"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join(".cover.png"));

        let images = discover_images(dir.path()).unwrap();
        let names: Vec<String> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![".cover.png", "A_first.jpg", "b_second.PNG", "c_third.gif"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_images_are_discovered() {
        let source = tempdir().unwrap();
        let target = source.path().join("real.png");
        touch(&target);

        let dir = tempdir().unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("linked.png")).unwrap();
        std::os::unix::fs::symlink(source.path().join("gone.png"), dir.path().join("dangling.png")).unwrap();

        let images = discover_images(dir.path()).unwrap();
        assert_eq!(images, vec![dir.path().join("linked.png")]);
    }

    #[test]
    fn test_same_name_in_two_folders_is_ordered_by_path() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("z/shot.png"));
        touch(&dir.path().join("a/shot.png"));

        let images = discover_images(dir.path()).unwrap();
        assert_eq!(images, vec![dir.path().join("a/shot.png"), dir.path().join("z/shot.png")]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(discover_images(dir.path()).unwrap().is_empty());
    }
}
