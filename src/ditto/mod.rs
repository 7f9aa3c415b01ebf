//! Event ↔ Document conversion and observer-context helpers (§4.6).
//!
//! Three files: [`to_ditto`] (Event → Document, §4.4/§4.5 applied), [`from_ditto`]
//! (Document → Event, the reverse), and [`sdk_conversion`] (observer-resilient
//! façade helpers for callers holding only a flat JSON value).

pub mod from_ditto;
pub mod sdk_conversion;
pub mod to_ditto;

pub use from_ditto::document_to_event;
pub use sdk_conversion::{document_id_of, document_kind_of, document_type_of, observer_map_to_typed};
pub use to_ditto::cot_to_document;
