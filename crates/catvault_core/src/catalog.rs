//! The plaintext catalog data model.
//!
//! Catalogs are created and replaced wholesale by a server sync pass and
//! never partially mutated locally, so these are plain data types with no
//! mutation helpers.

use serde::{Deserialize, Serialize};

/// Kind of catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogType {
    /// Flat list of entries (the common case: countries, genders, ...).
    List,
    /// Entries form a hierarchy via their reference codes.
    Hierarchical,
    /// A single configuration-style value rather than a list.
    Simple,
}

/// The value payload of a catalog.
///
/// "simple" catalogs carry one entry; everything else carries an ordered
/// list. The serde representation is untagged so the JSON stays an array
/// or a bare object, matching the server wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogValue {
    /// Ordered reference rows.
    List(Vec<CatalogEntry>),
    /// A single value, for `CatalogType::Simple`.
    Single(Box<CatalogEntry>),
}

impl CatalogValue {
    /// Returns the entries as a slice, regardless of shape.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        match self {
            CatalogValue::List(entries) => entries,
            CatalogValue::Single(entry) => std::slice::from_ref(entry),
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// One reference-data row (a country, a gender, a document type, ...).
///
/// `id` is unique within its catalog; consumers map `id -> value` and
/// `name -> label` when building option lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Unique id within the catalog.
    pub id: String,
    /// Display label.
    pub name: String,
    /// External-system integration code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_code: Option<String>,
    /// Cross-reference code, e.g. a parent entry in hierarchical catalogs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_code: Option<String>,
    /// Short mnemonic code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display rank.
    #[serde(default)]
    pub order: i64,
    /// Value kind, e.g. "text".
    #[serde(rename = "type", default)]
    pub entry_type: Option<String>,
    /// Whether the row may be edited server-side.
    #[serde(default)]
    pub editable: bool,
    /// Creation timestamp, ISO-8601.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last-update timestamp, ISO-8601.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A named collection of reference-data entries.
///
/// The logical plaintext unit: this whole object is what gets encrypted
/// into a record's sealed blob. The id is server-assigned and stable
/// across sync cycles; lookup-by-name callers assume one active catalog
/// per name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Opaque unique identifier, stable across sync cycles.
    pub catalog_id: String,
    /// Human-readable key, e.g. "countries".
    pub catalog_name: String,
    /// Kind of catalog.
    pub catalog_type: CatalogType,
    /// Soft-delete / visibility flag.
    pub is_active: bool,
    /// The reference rows.
    #[serde(rename = "catalogValue")]
    pub value: CatalogValue,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation timestamp, ISO-8601.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last-update timestamp, ISO-8601. Doubles as the ordered-scan index.
    pub updated_at: String,
    /// Audit: creating user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_user_id: Option<String>,
    /// Audit: last updating user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by_user_id: Option<String>,
}
