use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::Config;

#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    pub name: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// Archive names are served back over HTTP, so accept only the exact shape
/// this module generates.
pub fn is_valid_archive_name(name: &str) -> bool {
    name.starts_with("backup_")
        && name.ends_with(".zip")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
}

/// Create a compressed archive of the database dump and the media tree,
/// then purge archives older than the retention window. Blocks until the
/// archive is fully written.
pub async fn create(config: &Config) -> Result<BackupInfo, String> {
    tokio::fs::create_dir_all(&config.backup_dir)
        .await
        .map_err(|e| format!("Failed to create backup directory: {e}"))?;

    let dump = dump_database(&config.database_url).await?;

    let name = format!("backup_{}.zip", Utc::now().format("%Y%m%d_%H%M%S"));
    let archive_path = config.backup_dir.join(&name);
    let media_dir = config.media_dir.clone();

    let path_for_task = archive_path.clone();
    tokio::task::spawn_blocking(move || write_archive(&path_for_task, &dump, &media_dir))
        .await
        .map_err(|e| format!("Backup task failed: {e}"))??;

    let removed = purge_older_than(&config.backup_dir, config.backup_retention_days);
    for old in &removed {
        tracing::info!("Removed expired backup {old}");
    }

    let metadata = std::fs::metadata(&archive_path)
        .map_err(|e| format!("Backup archive missing after creation: {e}"))?;

    Ok(BackupInfo {
        name,
        size_bytes: metadata.len(),
        created_at: metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now()),
    })
}

async fn dump_database(database_url: &str) -> Result<Vec<u8>, String> {
    let output = tokio::process::Command::new("pg_dump")
        .arg("--no-owner")
        .arg(database_url)
        .output()
        .await
        .map_err(|e| format!("Failed to run pg_dump: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("pg_dump failed: {}", stderr.trim()));
    }

    Ok(output.stdout)
}

fn write_archive(archive_path: &Path, dump: &[u8], media_dir: &Path) -> Result<(), String> {
    let file = std::fs::File::create(archive_path)
        .map_err(|e| format!("Failed to create archive: {e}"))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("database.sql", options)
        .map_err(|e| format!("Failed to add database dump: {e}"))?;
    zip.write_all(dump)
        .map_err(|e| format!("Failed to write database dump: {e}"))?;

    if media_dir.is_dir() {
        for entry in WalkDir::new(media_dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(media_dir)
                .map_err(|e| format!("Media path outside media dir: {e}"))?;
            let archive_name = PathBuf::from("media").join(relative);

            zip.start_file(archive_name.to_string_lossy(), options)
                .map_err(|e| format!("Failed to add media file: {e}"))?;
            let contents = std::fs::read(entry.path())
                .map_err(|e| format!("Failed to read media file: {e}"))?;
            zip.write_all(&contents)
                .map_err(|e| format!("Failed to write media file: {e}"))?;
        }
    }

    zip.finish()
        .map_err(|e| format!("Failed to finish archive: {e}"))?;
    Ok(())
}

/// Newest first.
pub fn list(backup_dir: &Path) -> Result<Vec<BackupInfo>, String> {
    let mut backups = Vec::new();

    let entries = match std::fs::read_dir(backup_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(backups),
        Err(e) => return Err(format!("Failed to read backup directory: {e}")),
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let name = entry.file_name().to_string_lossy().to_string();
        if !is_valid_archive_name(&name) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        backups.push(BackupInfo {
            name,
            size_bytes: metadata.len(),
            created_at: metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now()),
        });
    }

    backups.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.name.cmp(&a.name)));
    Ok(backups)
}

pub fn delete(backup_dir: &Path, name: &str) -> Result<(), String> {
    if !is_valid_archive_name(name) {
        return Err("Invalid archive name".to_string());
    }
    std::fs::remove_file(backup_dir.join(name)).map_err(|e| format!("Failed to delete backup: {e}"))
}

/// Remove archives older than the retention window; returns the removed names.
pub fn purge_older_than(backup_dir: &Path, retention_days: i64) -> Vec<String> {
    let cutoff = Utc::now() - Duration::days(retention_days);
    let mut removed = Vec::new();

    let Ok(entries) = std::fs::read_dir(backup_dir) else {
        return removed;
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let name = entry.file_name().to_string_lossy().to_string();
        if !is_valid_archive_name(&name) {
            continue;
        }
        let created = entry
            .metadata()
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from);
        if let Ok(created) = created {
            if created < cutoff && std::fs::remove_file(entry.path()).is_ok() {
                removed.push(name);
            }
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::is_valid_archive_name;

    #[test]
    fn accepts_generated_names() {
        assert!(is_valid_archive_name("backup_20260805_120000.zip"));
    }

    #[test]
    fn rejects_traversal_and_foreign_names() {
        assert!(!is_valid_archive_name("../etc/passwd"));
        assert!(!is_valid_archive_name("backup_../../x.zip"));
        assert!(!is_valid_archive_name("backup_a/b.zip"));
        assert!(!is_valid_archive_name("notbackup.zip"));
        assert!(!is_valid_archive_name("backup_1.tar.gz"));
    }
}
