//! JSON codec for the catalog payload.
//!
//! The sealed blob's plaintext is the JSON serialization of the full
//! [`Catalog`], including the fields that are duplicated into the record's
//! plaintext indexes.

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};

/// Serializes a catalog to its JSON payload form.
pub fn encode_catalog(catalog: &Catalog) -> CoreResult<String> {
    serde_json::to_string(catalog).map_err(|e| CoreError::malformed_record(e.to_string()))
}

/// Parses a JSON payload back into a catalog.
///
/// # Errors
///
/// Returns [`CoreError::MalformedRecord`] if the payload is not valid
/// JSON or required fields are absent.
pub fn decode_catalog(json: &str) -> CoreResult<Catalog> {
    serde_json::from_str(json).map_err(|e| CoreError::malformed_record(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogType, CatalogValue};

    fn catalog() -> Catalog {
        Catalog {
            catalog_id: "c1".into(),
            catalog_name: "countries".into(),
            catalog_type: CatalogType::List,
            is_active: true,
            value: CatalogValue::List(vec![]),
            description: Some("ISO countries".into()),
            created_at: Some("2026-01-01T00:00:00Z".into()),
            updated_at: "2026-02-01T00:00:00Z".into(),
            created_by_user_id: None,
            updated_by_user_id: Some("u42".into()),
        }
    }

    #[test]
    fn encode_decode_roundtrip() {
        let original = catalog();
        let json = encode_catalog(&original).unwrap();
        let back = decode_catalog(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let json = encode_catalog(&catalog()).unwrap();
        assert!(json.contains("\"catalogId\""));
        assert!(json.contains("\"catalogValue\""));
        assert!(json.contains("\"isActive\""));
        assert!(!json.contains("\"catalog_id\""));
    }

    #[test]
    fn not_json_is_malformed() {
        let err = decode_catalog("definitely not json").unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { .. }));
    }

    #[test]
    fn missing_required_field_is_malformed() {
        // No catalogName.
        let json = r#"{"catalogId":"c1","catalogType":"list","isActive":true,
                       "catalogValue":[],"updatedAt":"2026-01-01T00:00:00Z"}"#;
        let err = decode_catalog(json).unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { .. }));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = decode_catalog("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { .. }));
    }
}
