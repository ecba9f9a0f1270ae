//! Core data types: [`ContactRecord`], the partial-field [`ContactFilter`],
//! and the client-supplied [`ContactDraft`].
//!
//! Records compare equal by id only. Use [`ContactRecord::is_similar_to`]
//! to compare content.

use serde::{Deserialize, Serialize};

use crate::validate::{is_valid_email, is_valid_phone};

/// A named field of a contact record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    LastName,
    Email,
    Address,
    Phone,
}

impl Field {
    /// The five content fields, in document order. Excludes [`Field::Id`].
    pub const CONTENT: [Field; 5] = [
        Field::Name,
        Field::LastName,
        Field::Email,
        Field::Address,
        Field::Phone,
    ];

    /// Every field, id first.
    pub const ALL: [Field; 6] = [
        Field::Id,
        Field::Name,
        Field::LastName,
        Field::Email,
        Field::Address,
        Field::Phone,
    ];

    /// Wire name of the field (JSON property and query parameter).
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Address => "address",
            Field::Phone => "phone",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single contact.
///
/// The id is assigned by the owning
/// [`ContactCollection`](crate::collection::ContactCollection) and cannot be
/// set from outside this crate. Email and phone only change through their
/// validating setters.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) phone: Option<String>,
}

impl ContactRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Value of `field` on this record.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Id => self.id(),
            Field::Name => self.name(),
            Field::LastName => self.last_name(),
            Field::Email => self.email(),
            Field::Address => self.address(),
            Field::Phone => self.phone(),
        }
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = Some(value.into());
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.last_name = Some(value.into());
    }

    pub fn set_address(&mut self, value: impl Into<String>) {
        self.address = Some(value.into());
    }

    /// Sets the email if it passes validation. Returns `false` and leaves the
    /// field untouched otherwise.
    pub fn set_email(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if !is_valid_email(&value) {
            return false;
        }
        self.email = Some(value);
        true
    }

    /// Sets the phone if it passes validation. Returns `false` and leaves the
    /// field untouched otherwise.
    pub fn set_phone(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if !is_valid_phone(&value) {
            return false;
        }
        self.phone = Some(value);
        true
    }

    /// Assigns a content field through its setter. Returns `false` if the
    /// value was rejected. Assigning [`Field::Id`] is always rejected.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> bool {
        match field {
            Field::Id => false,
            Field::Name => {
                self.set_name(value);
                true
            }
            Field::LastName => {
                self.set_last_name(value);
                true
            }
            Field::Email => self.set_email(value),
            Field::Address => {
                self.set_address(value);
                true
            }
            Field::Phone => self.set_phone(value),
        }
    }

    pub fn with_name(mut self, value: impl Into<String>) -> Self {
        self.set_name(value);
        self
    }

    pub fn with_last_name(mut self, value: impl Into<String>) -> Self {
        self.set_last_name(value);
        self
    }

    pub fn with_email(mut self, value: impl Into<String>) -> Self {
        self.set_email(value);
        self
    }

    pub fn with_address(mut self, value: impl Into<String>) -> Self {
        self.set_address(value);
        self
    }

    pub fn with_phone(mut self, value: impl Into<String>) -> Self {
        self.set_phone(value);
        self
    }

    /// Copies every present content field of `other` onto `self` through the
    /// setters. The id is never copied.
    ///
    /// Returns the fields whose values were rejected by validation.
    pub fn copy_from(&mut self, other: &ContactRecord) -> Vec<Field> {
        let mut rejected = Vec::new();
        for field in Field::CONTENT {
            if let Some(value) = other.get(field) {
                if !self.set(field, value) {
                    rejected.push(field);
                }
            }
        }
        rejected
    }

    /// `true` if all five content fields are equal. Ids are ignored.
    pub fn is_similar_to(&self, other: &ContactRecord) -> bool {
        Field::CONTENT
            .iter()
            .all(|&field| self.get(field) == other.get(field))
    }
}

impl PartialEq for ContactRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ContactRecord {}

/// Per-field match criteria for search and removal.
///
/// A `None` field matches anything; a `Some` field must equal the record's
/// value exactly. The query parameter `uuid` is accepted for `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFilter {
    #[serde(default, alias = "uuid", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ContactFilter {
    /// A filter matching every record.
    pub fn any() -> Self {
        Self::default()
    }

    /// A filter on id only.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// A filter pinning every field of `record`, id included.
    pub fn from_record(record: &ContactRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            address: record.address.clone(),
            phone: record.phone.clone(),
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Id => self.id.as_deref(),
            Field::Name => self.name.as_deref(),
            Field::LastName => self.last_name.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Address => self.address.as_deref(),
            Field::Phone => self.phone.as_deref(),
        }
    }

    /// `true` when no field is constrained.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|&f| self.get(f).is_none())
    }

    /// `true` if every constrained field equals the record's value.
    pub fn matches(&self, record: &ContactRecord) -> bool {
        Field::ALL.iter().all(|&field| match self.get(field) {
            None => true,
            Some(wanted) => record.get(field) == Some(wanted),
        })
    }
}

/// Contact data as supplied by a client: no id, nothing validated yet.
///
/// Unknown properties (including an `id`) are ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ContactDraft {
    /// Builds an id-less record through the validating setters.
    ///
    /// Returns the record and the fields whose values were rejected.
    pub fn into_record(self) -> (ContactRecord, Vec<Field>) {
        let mut record = ContactRecord::new();
        let values = [
            (Field::Name, self.name),
            (Field::LastName, self.last_name),
            (Field::Email, self.email),
            (Field::Address, self.address),
            (Field::Phone, self.phone),
        ];
        let mut rejected = Vec::new();
        for (field, value) in values {
            if let Some(value) = value {
                if !record.set(field, value) {
                    rejected.push(field);
                }
            }
        }
        (record, rejected)
    }
}
