//! Type classifier (§4.4): deterministic, order-significant mapping from a CoT
//! `type` string to a document variant.
//!
//! Grounded on `ditto/to_ditto.rs::cot_to_document`'s dispatch, but rebuilt as
//! a single pure function with the exact precedence order the teacher's ad-hoc
//! `.contains()` chain didn't follow, and with a real `Generic` arm (the
//! teacher falls through to `File` for anything unrecognized). Isolated here,
//! per REDESIGN FLAGS, so the heuristic has its own tests independent of the
//! façade that calls it.

/// One of the five document variants a CoT event is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Api,
    Chat,
    File,
    MapItem,
    Generic,
}

/// Classifies a CoT `type` string. Total: every input produces a variant
/// (§8 property 7), falling back to `Generic`. Check order matches §4.4
/// exactly and must not be reordered.
pub fn classify(cot_type: &str) -> DocumentKind {
    if cot_type == "t-x-c-t" || cot_type == "b-m-p-s-p-i" || cot_type.contains("api") || cot_type.contains("data")
    {
        return DocumentKind::Api;
    }
    if cot_type == "b-t-f" || cot_type.contains("chat") || cot_type.contains("message") {
        return DocumentKind::Chat;
    }
    if cot_type == "b-f-t-f"
        || cot_type == "b-f-t-a"
        || cot_type.contains("file")
        || cot_type.contains("attachment")
    {
        return DocumentKind::File;
    }
    if cot_type.starts_with("a-f-")
        || cot_type.starts_with("a-h-")
        || cot_type.starts_with("a-n-")
        || cot_type == "a-u-G"
        || cot_type == "a-u-S"
        || cot_type == "a-u-A"
        || cot_type.contains("a-u-r-loc")
    {
        return DocumentKind::MapItem;
    }
    DocumentKind::Generic
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_variant() {
        assert_eq!(classify("t-x-c-t"), DocumentKind::Api);
        assert_eq!(classify("some-api-thing"), DocumentKind::Api);
        assert_eq!(classify("b-t-f"), DocumentKind::Chat);
        assert_eq!(classify("group-chat-room"), DocumentKind::Chat);
        assert_eq!(classify("b-f-t-f"), DocumentKind::File);
        assert_eq!(classify("custom-attachment"), DocumentKind::File);
        assert_eq!(classify("a-f-G-U-C"), DocumentKind::MapItem);
        assert_eq!(classify("a-u-S"), DocumentKind::MapItem);
        assert_eq!(classify("a-u-r-loc-g"), DocumentKind::MapItem);
        assert_eq!(classify("x-unknown-type"), DocumentKind::Generic);
    }

    #[test]
    fn api_check_outranks_later_checks() {
        // "data" makes this match Api before MapItem's a-f- prefix check runs.
        assert_eq!(classify("a-f-data"), DocumentKind::Api);
    }

    #[test]
    fn is_total() {
        assert_eq!(classify(""), DocumentKind::Generic);
        assert_eq!(classify("garbage!!"), DocumentKind::Generic);
    }
}
