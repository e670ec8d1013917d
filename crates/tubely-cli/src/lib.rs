//! Consistency checks between video records and stored objects.
//!
//! An upload writes its object before the record is updated. If the update fails the
//! object stays behind with nothing pointing at it; [`reconcile`] finds those objects
//! and [`verify`] checks one record against the stores.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use serde::Serialize;
use tubely_core::AssetClass;
use tubely_db::VideoStore;
use tubely_storage::{Storage, StorageError};
use uuid::Uuid;

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Stored keys that no record references.
    pub orphaned: Vec<String>,
    /// Referenced keys with no stored object.
    pub missing: Vec<String>,
    /// References that do not resolve to a key of this store.
    pub unresolvable: Vec<String>,
    pub deleted: usize,
}

/// Compare stored video objects under `prefix` with the references held by records.
///
/// A stored key counts as referenced when a reference of any class resolves to it.
/// Only video references that fail to resolve are reported. With `delete`, orphaned
/// objects are removed.
pub async fn reconcile(
    storage: &dyn Storage,
    records: &dyn VideoStore,
    prefix: Option<&str>,
    delete: bool,
) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();

    let references = records
        .list_asset_references()
        .await
        .context("Failed to list asset references")?;

    // Any class may resolve here: a local video store can share its root with thumbnails.
    let mut referenced = BTreeSet::new();
    for reference in &references {
        match storage.key_for_reference(&reference.reference) {
            Ok(key) => {
                referenced.insert(key);
            }
            Err(StorageError::DataIntegrity(_)) if reference.class != AssetClass::Video => {}
            Err(StorageError::DataIntegrity(message)) => {
                tracing::warn!(
                    video_id = %reference.video_id,
                    reference = %reference.reference,
                    error = %message,
                    "Reference does not resolve to a stored key"
                );
                report.unresolvable.push(reference.reference.clone());
            }
            Err(e) => return Err(e.into()),
        }
    }

    let stored: BTreeSet<String> = storage
        .list_keys(prefix)
        .await
        .context("Failed to list stored objects")?
        .into_iter()
        .collect();

    report.orphaned = stored.difference(&referenced).cloned().collect();
    report.missing = referenced
        .iter()
        .filter(|key| prefix.map_or(true, |p| key.starts_with(p)))
        .filter(|key| !stored.contains(*key))
        .cloned()
        .collect();

    if delete {
        for key in &report.orphaned {
            storage
                .delete(key)
                .await
                .with_context(|| format!("Failed to delete orphaned object {}", key))?;
            report.deleted += 1;
        }
    }

    tracing::info!(
        stored = stored.len(),
        referenced = referenced.len(),
        orphaned = report.orphaned.len(),
        missing = report.missing.len(),
        deleted = report.deleted,
        "Reconcile finished"
    );

    Ok(report)
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AssetCheck {
    pub class: AssetClass,
    pub reference: String,
    pub key: Option<String>,
    pub exists: bool,
}

/// Check that every reference on `video_id` points at an existing object.
pub async fn verify(
    video_id: Uuid,
    records: &dyn VideoStore,
    thumbnails: &dyn Storage,
    videos: &dyn Storage,
) -> Result<Vec<AssetCheck>> {
    let video = records
        .get_video(video_id)
        .await?
        .with_context(|| format!("Video {} not found", video_id))?;

    let mut checks = Vec::new();
    for class in [AssetClass::Thumbnail, AssetClass::Video] {
        let Some(reference) = video.asset_reference(class) else {
            continue;
        };
        let store = match class {
            AssetClass::Thumbnail => thumbnails,
            AssetClass::Video => videos,
        };
        let check = match store.key_for_reference(reference) {
            Ok(key) => AssetCheck {
                class,
                reference: reference.to_string(),
                exists: store.exists(&key).await?,
                key: Some(key),
            },
            Err(StorageError::DataIntegrity(_)) => AssetCheck {
                class,
                reference: reference.to_string(),
                key: None,
                exists: false,
            },
            Err(e) => return Err(e.into()),
        };
        checks.push(check);
    }

    Ok(checks)
}

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
