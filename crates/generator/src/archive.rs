use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::path::Path;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Version-control metadata created inside the tree by `publish`
const SKIPPED_DIRS: &[&str] = &[".git"];

/// Zip every file under `root` into `archive_path`, overwriting any previous archive.
///
/// Entry names are relative to `root` with `/` separators, so the root
/// directory's own name never appears inside the archive. Returns the number
/// of files stored.
pub fn create_archive(root: &Path, archive_path: &Path) -> Result<usize> {
    if let Some(parent) = archive_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let file = File::create(archive_path)
        .with_context(|| format!("Failed to create archive {}", archive_path.display()))?;
    let mut zip = ZipWriter::new(file);

    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !(e.file_type().is_dir() && is_skipped(e.file_name())));

    let mut count = 0;
    for entry in walker {
        let entry = entry.context("Failed to walk output directory")?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative_path = path
            .strip_prefix(root)
            .context("Failed to get relative path")?;
        let name = relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        zip.start_file(name, options)?;
        let mut f = File::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
        std::io::copy(&mut f, &mut zip)?;
        count += 1;
    }

    zip.finish()?;

    Ok(count)
}

fn is_skipped(name: &OsStr) -> bool {
    SKIPPED_DIRS.iter().any(|dir| name == *dir)
}
