use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use super::{FILE_EXTENSION, FILE_PREFIX};
use crate::error::VisualizationResult;

/// Delete the oldest generated files in `dir` so at most `max_files` remain.
///
/// Only `graph_*.html` files are considered. `max_files == 0` disables
/// pruning. Returns the number of files removed.
pub async fn prune(dir: &Path, max_files: usize) -> VisualizationResult<usize> {
    if max_files == 0 {
        return Ok(0);
    }

    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut generated: Vec<(SystemTime, PathBuf)> = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_generated(&path) {
            continue;
        }
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        generated.push((modified, path));
    }

    if generated.len() <= max_files {
        return Ok(0);
    }

    generated.sort();
    let excess = generated.len() - max_files;
    let mut removed = 0;

    for (_, path) in generated.into_iter().take(excess) {
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Evicted old visualization");
                removed += 1;
            }
            // A concurrent prune may have won the race
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to evict visualization");
            }
        }
    }

    Ok(removed)
}

fn is_generated(path: &Path) -> bool {
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(FILE_PREFIX));
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == FILE_EXTENSION);
    name_ok && ext_ok
}
