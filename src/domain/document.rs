//! Registry document schema.
//!
//! Field names on the wire follow the upstream registry JSON exactly, and all
//! dates are date-only values formatted as `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A document fetched from, and submitted to, the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Participant details block
    pub description: Description,
    /// Registry document identifier
    pub doc_id: String,
    /// Document status as reported by the registry
    pub doc_status: String,
    /// Document type code
    pub doc_type: String,
    /// Whether this document describes imported goods
    #[serde(rename = "importRequest")]
    pub import_request: bool,
    /// Tax id of the goods owner
    #[serde(rename = "owner_inn")]
    pub owner_tax_id: String,
    /// Tax id of the participant
    #[serde(rename = "participant_inn")]
    pub participant_tax_id: String,
    /// Tax id (or jurisdiction code) of the producer
    #[serde(rename = "producer_inn")]
    pub producer_tax_id: String,
    /// Date of production
    #[serde(with = "date_format")]
    pub production_date: NaiveDate,
    /// Production type code
    pub production_type: String,
    /// Products covered by this document, in registry order
    #[serde(default)]
    pub products: Vec<Product>,
    /// Registration date
    #[serde(with = "date_format")]
    pub reg_date: NaiveDate,
    /// Registration number
    pub reg_number: String,
}

/// Nested participant block of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Tax id of the participant
    #[serde(rename = "participantInn")]
    pub participant_tax_id: String,
}

/// Certificate metadata for a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Kind of conformity document
    pub certificate_document: String,
    /// Issue date of the conformity document
    #[serde(with = "date_format")]
    pub certificate_document_date: NaiveDate,
    /// Number of the conformity document
    pub certificate_document_number: String,
    /// Tax id of the goods owner
    #[serde(rename = "owner_inn")]
    pub owner_tax_id: String,
    /// Tax id of the producer
    #[serde(rename = "producer_inn")]
    pub producer_tax_id: String,
    /// Date of production
    #[serde(with = "date_format")]
    pub production_date: NaiveDate,
    /// Commodity nomenclature code
    pub tnved_code: String,
    /// Unit identification code
    pub uit_code: String,
    /// Transport package identification code
    pub uitu_code: String,
}

impl Document {
    /// Parse a document from registry JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Human-readable JSON with every field in declaration order.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// `YYYY-MM-DD` (de)serialization for date-only fields.
mod date_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::document::{sample_document as document, ymd as date};

    const REGISTRY_JSON: &str = r#"{
        "description": { "participantInn": "7700000001" },
        "doc_id": "doc-1",
        "doc_status": "DRAFT",
        "doc_type": "LP_INTRODUCE_GOODS",
        "importRequest": true,
        "owner_inn": "7700000002",
        "participant_inn": "7700000001",
        "producer_inn": "RF",
        "production_date": "2024-03-01",
        "production_type": "OWN_PRODUCTION",
        "products": [{
            "certificate_document": "CONFORMITY_CERTIFICATE",
            "certificate_document_date": "2024-02-10",
            "certificate_document_number": "RU-123",
            "owner_inn": "7700000002",
            "producer_inn": "RF",
            "production_date": "2024-03-01",
            "tnved_code": "6401100000",
            "uit_code": "010460043993125621JgXJ5.T",
            "uitu_code": ""
        }],
        "reg_date": "2024-03-05",
        "reg_number": "REG-0001"
    }"#;

    #[test]
    fn test_parse_registry_json() {
        let doc = Document::from_json(REGISTRY_JSON).unwrap();

        assert_eq!(doc.description.participant_tax_id, "7700000001");
        assert!(doc.import_request);
        assert_eq!(doc.producer_tax_id, "RF");
        assert_eq!(doc.production_date, date(2024, 3, 1));
        assert_eq!(doc.reg_date, date(2024, 3, 5));
        assert_eq!(doc.products.len(), 1);
        assert_eq!(doc.products[0].certificate_document_date, date(2024, 2, 10));
    }

    #[test]
    fn test_wire_field_names() {
        let json = document("RF").to_pretty_json().unwrap();

        for name in [
            "\"participantInn\"",
            "\"doc_id\"",
            "\"importRequest\"",
            "\"owner_inn\"",
            "\"producer_inn\"",
            "\"certificate_document_date\"",
            "\"uitu_code\"",
        ] {
            assert!(json.contains(name), "missing {} in {}", name, json);
        }
        assert!(json.contains("\"production_date\": \"2024-03-01\""));
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let json = document("RF").to_pretty_json().unwrap();

        let positions: Vec<usize> = ["\"description\"", "\"doc_id\"", "\"products\"", "\"reg_number\""]
            .iter()
            .map(|name| json.find(name).unwrap())
            .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_rejects_date_with_time_component() {
        let json = REGISTRY_JSON.replace("\"2024-03-05\"", "\"2024-03-05T10:00:00\"");
        assert!(Document::from_json(&json).is_err());
    }

    #[test]
    fn test_missing_products_defaults_to_empty() {
        let mut value: serde_json::Value = serde_json::from_str(REGISTRY_JSON).unwrap();
        value.as_object_mut().unwrap().remove("products");

        let doc: Document = serde_json::from_value(value).unwrap();
        assert!(doc.products.is_empty());
    }
}
