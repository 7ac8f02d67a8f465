//! Outreach delivery. A sink accepting a campaign marks it ready.

use std::future::Future;
use std::path::{Path, PathBuf};

use painscout_campaign::Campaign;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("outreach file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize campaign {campaign_id}: {source}")]
    Serialize {
        campaign_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("outreach sink rejected campaign {campaign_id}: {reason}")]
    Rejected { campaign_id: String, reason: String },
}

/// Accepts composed campaigns for delivery.
pub trait OutreachSink: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SinkError`] when the campaign could not be accepted.
    fn send(&self, campaign: &Campaign) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// Appends one JSON object per campaign to a file.
pub struct JsonlOutreachSink {
    path: PathBuf,
    // Serializes appends so lines never interleave.
    lock: Mutex<()>,
}

impl JsonlOutreachSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl OutreachSink for JsonlOutreachSink {
    async fn send(&self, campaign: &Campaign) -> Result<(), SinkError> {
        let mut line = serde_json::to_string(campaign).map_err(|source| SinkError::Serialize {
            campaign_id: campaign.campaign_id.clone(),
            source,
        })?;
        line.push('\n');

        let _guard = self.lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;

        tracing::debug!(
            campaign_id = %campaign.campaign_id,
            path = %self.path.display(),
            "campaign appended to outreach file"
        );
        Ok(())
    }
}

/// Logs each campaign and accepts it without writing anything.
#[derive(Debug, Default)]
pub struct DryRunSink;

impl OutreachSink for DryRunSink {
    async fn send(&self, campaign: &Campaign) -> Result<(), SinkError> {
        tracing::info!(
            campaign_id = %campaign.campaign_id,
            organization = %campaign.domain,
            persona = %campaign.target_persona,
            steps = campaign.outreach_units(),
            "dry run: campaign not delivered"
        );
        Ok(())
    }
}
