use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::entities::PluginDescriptor;
use crate::infrastructure::config::join_within;
use super::pool::{RunReport, WorkerPool};

/// What happened to each declared path of one plugin
#[derive(Debug, Clone, Default)]
pub struct UninstallReport {
    pub removed: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
    /// Declared paths that would resolve outside the install root
    pub skipped: Vec<String>,
}

impl UninstallReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Best-effort removal of files and directories a plugin declares as owned
#[derive(Clone, Default)]
pub struct Uninstaller;

impl Uninstaller {
    pub fn new() -> Self {
        Self
    }

    /// Remove every declared file, then every declared directory, under
    /// `dest_root`. Failures are logged and recorded, never returned.
    pub async fn uninstall(&self, descriptor: &PluginDescriptor, dest_root: &Path) -> UninstallReport {
        tracing::info!("Uninstalling plugin {}", descriptor.name);
        let mut report = UninstallReport::default();
        if descriptor.uninstall.is_empty() {
            tracing::warn!("Plugin {} declares nothing to remove", descriptor.name);
        }

        for file in &descriptor.uninstall.files {
            let Some(path) = declared_path(dest_root, file, &mut report) else {
                continue;
            };
            tracing::debug!("Removing file {}", path.display());
            let result = tokio::fs::remove_file(&path).await;
            record(&mut report, path, result);
        }

        for dir in &descriptor.uninstall.directories {
            let Some(path) = declared_path(dest_root, dir, &mut report) else {
                continue;
            };
            tracing::debug!("Removing directory {}", path.display());
            let result = tokio::fs::remove_dir_all(&path).await;
            record(&mut report, path, result);
        }

        report
    }

    pub async fn uninstall_all(
        &self,
        pool: &WorkerPool,
        plugins: Vec<PluginDescriptor>,
        dest_root: &Path,
    ) -> RunReport<UninstallReport> {
        let units = plugins
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();

        pool.run(units, |descriptor| {
            let uninstaller = self.clone();
            let dest_root = dest_root.to_path_buf();
            async move { Ok(uninstaller.uninstall(&descriptor, &dest_root).await) }
        })
        .await
    }
}

fn declared_path(dest_root: &Path, declared: &str, report: &mut UninstallReport) -> Option<PathBuf> {
    let path = join_within(dest_root, declared);
    if path.is_none() {
        tracing::warn!("Skipping {}: outside the install directory", declared);
        report.skipped.push(declared.to_string());
    }
    path
}

fn record(report: &mut UninstallReport, path: PathBuf, result: std::io::Result<()>) {
    match result {
        Ok(()) => report.removed.push(path),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("Already absent: {}", path.display());
            report.missing.push(path);
        }
        Err(e) => {
            tracing::warn!("Error removing {}: {}", path.display(), e);
            report.failed.push((path, e.to_string()));
        }
    }
}
