//! # CoT/Ditto document codec
//!
//! A bidirectional codec between Cursor-on-Target (CoT) XML events and the
//! flat, replicated document format a CRDT-backed document store (e.g. Ditto)
//! persists them as.
//!
//! ## Features
//! - Parse and generate CoT XML messages
//! - Transform between CoT events and typed, replicable documents
//! - Deterministic type classification and CRDT-safe stable detail keys
//! - Semantic (order/formatting-independent) XML equivalence checking
//! - Observer-resilient conversion for store-callback contexts
//!
//! ## Modules
//! - `cot_events`: Core CoT event types
//! - `point`: `<point>` codec
//! - `detail`: detail tree ↔ nested map ↔ flat `r_*` key transforms
//! - `classifier`: CoT `type` → document variant classification
//! - `header`: common document header field extraction
//! - `document`: the five document variants and flat-JSON (de)serialization
//! - `ditto`: `Event` ↔ `Document` conversion and observer helpers
//! - `comparator`: semantic XML equivalence
//! - `model`: flat convenience projection of an `Event`
//! - `policy`: strict/safe conversion policy
//! - `temporal`: CoT timestamp codec
//! - `error`: error types
//! - `xml_parser` / `xml_writer`: CoT XML (de)serialization

#![warn(missing_docs)]

/// Type classification: CoT `type` string to document variant (§4.4).
pub mod classifier;

/// Semantic XML equivalence checking (§4.7).
pub mod comparator;

/// Core CoT event types and parsing.
pub mod cot_events;

/// Detail section tree / nested-map / flat-key transforms.
pub mod detail;

/// Event ↔ Document conversion and observer-context helpers.
pub mod ditto;

/// The five document variants and flat-JSON (de)serialization.
pub mod document;

/// Error types and utilities.
pub mod error;

/// Common document header field extraction.
pub mod header;

/// Flat, caller-convenience projection of a CoT event.
pub mod model;

/// `<point>` lat/lon/hae/ce/le codec.
pub mod point;

/// Construction-time conversion policy.
pub mod policy;

/// CoT timestamp parsing and formatting.
pub mod temporal;

/// XML parsing utilities.
pub mod xml_parser;

/// XML generation utilities.
pub mod xml_writer;

use error::ConversionError;

/// Parses CoT XML directly into a typed [`document::Document`] (§4.6).
pub fn xml_to_document(
    xml: &str,
    peer_key: &str,
    policy: policy::ConversionPolicy,
) -> Result<document::Document, ConversionError> {
    let event = xml_parser::parse_event(xml)?;
    ditto::cot_to_document(&event, peer_key, policy)
}

/// Serializes a typed [`document::Document`] back to CoT XML (§4.6).
pub fn document_to_xml(
    document: &document::Document,
    policy: policy::ConversionPolicy,
) -> Result<String, ConversionError> {
    let event = ditto::document_to_event(document, policy)?;
    Ok(xml_writer::write_event(&event)?)
}

// Re-export the most commonly used types and observer helpers.
pub use comparator::{semantic_equal, Mismatch};
pub use cot_events::Event;
pub use ditto::{document_id_of, document_kind_of, document_type_of, observer_map_to_typed};
pub use document::Document;
pub use policy::ConversionPolicy;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_round_trips_through_document() {
        let xml = r#"<event version="2.0" uid="USER-1" type="a-f-G-U-C" time="2024-01-01T00:00:00.000Z" start="2024-01-01T00:00:00.000Z" stale="2024-01-01T00:05:00.000Z" how="m-g"><point lat="34.1" lon="-118.1" hae="150.0" ce="9999999.0" le="9999999.0"/><detail><contact callsign="ALPHA-1"/></detail></event>"#;
        let doc = xml_to_document(xml, "peer-1", ConversionPolicy::strict()).unwrap();
        assert_eq!(doc.id(), "USER-1");

        let rebuilt_xml = document_to_xml(&doc, ConversionPolicy::strict()).unwrap();
        assert!(semantic_equal(xml, &rebuilt_xml).is_ok());
    }
}
