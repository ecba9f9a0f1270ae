//! The ordered, id-unique set of contacts.
//!
//! Every record held by a [`ContactCollection`] has a non-empty id that no
//! other record in the same collection shares. Ids are only ever assigned
//! here: on [`add`](ContactCollection::add), and when restoring stored
//! records whose ids are missing or duplicated
//! ([`from_records`](ContactCollection::from_records)).

use std::collections::HashSet;

use log::warn;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ContactFilter, ContactRecord};

/// A named, ordered collection of [`ContactRecord`]s.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactCollection {
    name: String,
    #[serde(rename = "contacts")]
    records: Vec<ContactRecord>,
}

impl ContactCollection {
    /// An empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
        }
    }

    /// Restores a collection from stored records, keeping their ids.
    ///
    /// Records without an id, with an empty id, or repeating an id already
    /// seen earlier in `records` are given a fresh one. Order is preserved.
    pub fn from_records(name: impl Into<String>, records: Vec<ContactRecord>) -> Self {
        let reserved: HashSet<String> = records
            .iter()
            .filter_map(|r| r.id.clone())
            .filter(|id| !id.is_empty())
            .collect();

        let mut collection = Self::new(name);
        let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
        let mut repaired = 0usize;

        for mut record in records {
            let keep = match record.id.as_deref() {
                Some(id) if !id.is_empty() => seen.insert(id.to_string()),
                _ => false,
            };
            if !keep {
                let id = collection
                    .unique_id_from(|| Uuid::new_v4().to_string(), |id| reserved.contains(id));
                seen.insert(id.clone());
                record.id = Some(id);
                repaired += 1;
            }
            collection.records.push(record);
        }

        if repaired > 0 {
            warn!(
                "collection '{}': assigned fresh ids to {} record(s) with missing or duplicate ids",
                collection.name, repaired
            );
        }
        collection
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record whose id equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&ContactRecord> {
        self.records.iter().find(|r| r.id() == Some(id))
    }

    fn find_by_id_mut(&mut self, id: &str) -> Option<&mut ContactRecord> {
        self.records.iter_mut().find(|r| r.id() == Some(id))
    }

    /// A random UUID (canonical hyphenated form) not used by any record.
    pub fn generate_unique_id(&self) -> String {
        self.unique_id_from(|| Uuid::new_v4().to_string(), |_| false)
    }

    /// Draws candidates from `next` until one is neither held by a record nor
    /// `reserved`.
    fn unique_id_from(
        &self,
        mut next: impl FnMut() -> String,
        reserved: impl Fn(&str) -> bool,
    ) -> String {
        loop {
            let candidate = next();
            if !reserved(&candidate) && self.find_by_id(&candidate).is_none() {
                return candidate;
            }
        }
    }

    /// Appends `record` under a freshly generated id, replacing any id it
    /// carried. Returns the stored record.
    pub fn add(&mut self, mut record: ContactRecord) -> &ContactRecord {
        record.id = Some(self.generate_unique_id());
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Every record matching `filter`, in collection order.
    pub fn search(&self, filter: &ContactFilter) -> Vec<&ContactRecord> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    /// Removes every record matching `filter` and returns them in their
    /// original order. Nothing changes when nothing matches.
    pub fn remove(&mut self, filter: &ContactFilter) -> Vec<ContactRecord> {
        if !self.records.iter().any(|r| filter.matches(r)) {
            return Vec::new();
        }
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|r| filter.matches(r));
        self.records = kept;
        removed
    }

    /// Removes records matching the id and all content fields of `record`.
    pub fn remove_record(&mut self, record: &ContactRecord) -> Vec<ContactRecord> {
        self.remove(&ContactFilter::from_record(record))
    }

    /// Copies the present fields of `data` onto the record with id `id`.
    ///
    /// Values rejected by validation leave the field unchanged and are not
    /// reported here; validate up front (see
    /// [`ContactDraft::into_record`](crate::models::ContactDraft::into_record))
    /// to learn which were dropped.
    ///
    /// Returns the updated record, or `None` if no record has that id.
    pub fn update(&mut self, id: &str, data: &ContactRecord) -> Option<&ContactRecord> {
        let record = self.find_by_id_mut(id)?;
        record.copy_from(data);
        Some(&*record)
    }
}

impl PartialEq for ContactCollection {
    /// Same name and the same records, pairwise by id, in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.records.len() == other.records.len()
            && self.records.iter().zip(&other.records).all(|(a, b)| a == b)
    }
}

impl Eq for ContactCollection {}
