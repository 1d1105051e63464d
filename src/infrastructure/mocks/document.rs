//! Ready-made documents for tests.

use crate::domain::document::{Description, Document, Product};
use chrono::NaiveDate;

/// Build a date, panicking on an invalid one.
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// A complete document with one product, produced by `producer`.
pub fn sample_document(producer: &str) -> Document {
    Document {
        description: Description {
            participant_tax_id: "7700000001".to_string(),
        },
        doc_id: "doc-1".to_string(),
        doc_status: "DRAFT".to_string(),
        doc_type: "LP_INTRODUCE_GOODS".to_string(),
        import_request: false,
        owner_tax_id: "7700000002".to_string(),
        participant_tax_id: "7700000001".to_string(),
        producer_tax_id: producer.to_string(),
        production_date: ymd(2024, 3, 1),
        production_type: "OWN_PRODUCTION".to_string(),
        products: vec![Product {
            certificate_document: "CONFORMITY_CERTIFICATE".to_string(),
            certificate_document_date: ymd(2024, 2, 10),
            certificate_document_number: "RU-123".to_string(),
            owner_tax_id: "7700000002".to_string(),
            producer_tax_id: producer.to_string(),
            production_date: ymd(2024, 3, 1),
            tnved_code: "6401100000".to_string(),
            uit_code: "010460043993125621JgXJ5.T".to_string(),
            uitu_code: String::new(),
        }],
        reg_date: ymd(2024, 3, 5),
        reg_number: "REG-0001".to_string(),
    }
}
