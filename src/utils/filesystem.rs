use crate::utils::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;
use walkdir::WalkDir;

const RIP_EXTENSIONS: &[&str] = &["mkv"];

/// Finds ripped files below `dir`, sorted by path.
pub fn find_rip_outputs<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir.as_ref())
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_rip_output(p))
        .collect();
    files.sort();
    files
}

pub fn is_rip_output<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| RIP_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Creates a fresh, uniquely named work directory inside `temp_root`.
pub fn create_work_dir<P: AsRef<Path>>(temp_root: P) -> Result<PathBuf> {
    let dir = temp_root
        .as_ref()
        .join(format!("autorip_{}", Uuid::new_v4().simple()));
    std::fs::create_dir_all(&dir)?;
    debug!("Created work directory {}", dir.display());
    Ok(dir)
}

pub fn ensure_parent_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Returns `path` if free, otherwise the first free `name (N).ext`.
pub fn unique_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let extension = path.extension().and_then(|s| s.to_str());
    let parent = path.parent().unwrap_or(Path::new("."));

    (2u32..)
        .map(|n| {
            let name = match extension {
                Some(ext) => format!("{} ({}).{}", stem, n, ext),
                None => format!("{} ({})", stem, n),
            };
            parent.join(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Moves a file, falling back to copy-and-delete across filesystems.
pub fn move_file<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q) -> Result<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    ensure_parent_dir(to)?;

    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }

    debug!(
        "Rename failed, copying {} -> {}",
        from.display(),
        to.display()
    );
    std::fs::copy(from, to).map_err(|e| {
        Error::rip(format!(
            "Failed to move {} to {}: {}",
            from.display(),
            to.display(),
            e
        ))
    })?;
    std::fs::remove_file(from)?;
    Ok(())
}

pub fn get_file_size<P: AsRef<Path>>(path: P) -> Result<u64> {
    let metadata = std::fs::metadata(path)?;
    Ok(metadata.len())
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let size = bytes as f64;
    let unit_index = (size.log(THRESHOLD) as usize).min(UNITS.len() - 1);
    let size_in_unit = size / THRESHOLD.powi(unit_index as i32);

    format!("{:.2} {}", size_in_unit, UNITS[unit_index])
}
