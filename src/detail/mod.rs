//! The detail codec (§4.3): tree ↔ nested map, nested map ↔ flat `r_*` keys,
//! and the CRDT stable-key mode layered on top of the nested map.

pub mod flatten;
pub mod stable_key;
pub mod tree;

pub use flatten::{flatten, unflatten};
pub use stable_key::{from_stable_key_map, generate_stable_key, is_stable_key, to_stable_key_map};
pub use tree::{from_map, parse_detail, to_map, write_detail, DetailElement};
