use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::application::errors::{ExtractError, TaskError};
use crate::domain::entities::PluginDescriptor;
use crate::infrastructure::config::join_within;
use crate::infrastructure::plugins::{extract, ExtractSummary, Fetcher};
use super::pool::{RunReport, WorkerPool};

/// Downloads plugin archives and unpacks them under an install root
#[derive(Clone)]
pub struct Installer {
    fetcher: Fetcher,
    download_timeout: Duration,
}

impl Installer {
    pub fn new(fetcher: Fetcher, download_timeout: Duration) -> Self {
        Self { fetcher, download_timeout }
    }

    /// Install one plugin: fetch its archive to a temp file, then extract it
    /// to `<dest_root>/<extractPrefix>`.
    ///
    /// No rollback: a failure partway through extraction leaves the files
    /// already written. The temp file is removed once the unit finishes.
    pub async fn install(&self, descriptor: &PluginDescriptor, dest_root: &Path) -> Result<ExtractSummary, TaskError> {
        tracing::info!("Installing plugin {}", descriptor.name);

        let extract_dir = extract_dir(dest_root, descriptor)?;

        let temp = tempfile::Builder::new()
            .prefix("cs2pm-plugin-")
            .suffix(".zip")
            .tempfile()
            .map_err(TaskError::TempFile)?;
        let handle = temp.as_file().try_clone().map_err(TaskError::TempFile)?;

        let download = self.fetcher.fetch(&descriptor.download_url, tokio::fs::File::from_std(handle));
        tokio::time::timeout(self.download_timeout, download)
            .await
            .map_err(|_| TaskError::TimedOut(self.download_timeout))??;

        let summary = tokio::task::spawn_blocking(move || {
            let summary = extract(temp.path(), &extract_dir);
            drop(temp);
            summary
        })
        .await
        .map_err(|e| TaskError::Worker(e.to_string()))??;

        tracing::info!(
            "Installed plugin {} ({} files, {} directories)",
            descriptor.name,
            summary.files,
            summary.directories
        );
        Ok(summary)
    }

    /// Install every descriptor through `pool`, collecting one outcome each
    pub async fn install_all(
        &self,
        pool: &WorkerPool,
        plugins: Vec<PluginDescriptor>,
        dest_root: &Path,
    ) -> RunReport<ExtractSummary> {
        let units = plugins
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();

        pool.run(units, |descriptor| {
            let installer = self.clone();
            let dest_root = dest_root.to_path_buf();
            async move { installer.install(&descriptor, &dest_root).await }
        })
        .await
    }
}

/// Resolve where a plugin's archive unpacks; an empty prefix means the root
fn extract_dir(dest_root: &Path, descriptor: &PluginDescriptor) -> Result<PathBuf, ExtractError> {
    let prefix = descriptor.extract_prefix.trim();
    if prefix.is_empty() || prefix == "." {
        return Ok(dest_root.to_path_buf());
    }
    join_within(dest_root, prefix).ok_or_else(|| ExtractError::PathEscape {
        entry: descriptor.extract_prefix.clone(),
    })
}
