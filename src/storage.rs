//! XML file [`Store`] implementation.
//!
//! The whole collection lives in a single XML document (see
//! [`contact_book_core::codec`] for the layout). Saves write a sibling
//! `<file>.tmp` and rename it over the target, so an interrupted write
//! leaves the previous image in place.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use contact_book_core::codec;
use contact_book_core::collection::ContactCollection;
use contact_book_core::store::Store;

use crate::config::Config;

/// Stores the collection as an XML document at a fixed path.
pub struct XmlFileStore {
    path: PathBuf,
}

impl XmlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.storage.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` if a stored image exists at the configured path.
    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl Store for XmlFileStore {
    async fn load(&self, default_name: &str) -> Result<ContactCollection> {
        let meta = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "no contact file at {}, starting with an empty book",
                    self.path.display()
                );
                return Ok(ContactCollection::new(default_name));
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to stat {}", self.path.display()));
            }
        };
        if meta.is_dir() {
            bail!("{}: is a directory", self.path.display());
        }

        let xml = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let collection = codec::decode(&xml, default_name)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        debug!(
            "loaded {} contact(s) from {}",
            collection.len(),
            self.path.display()
        );
        Ok(collection)
    }

    async fn save(&self, collection: &ContactCollection) -> Result<()> {
        let xml = codec::encode(collection)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, xml)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e).with_context(|| format!("Failed to replace {}", self.path.display()));
        }

        debug!(
            "saved {} contact(s) to {}",
            collection.len(),
            self.path.display()
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
