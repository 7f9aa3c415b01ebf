//! Semantic XML comparator (§4.7): bidirectional equivalence between two CoT
//! XML documents, independent of attribute order, detail-group order, and
//! floating-point formatting noise.
//!
//! Grounded on `roxmltree` (declared but unused by the teacher) for read-only
//! DOM traversal — a better fit here than `quick_xml`'s streaming reader since
//! the comparator needs random access to both trees' children at once, not a
//! single forward pass — and on `similar` (also declared but unused) for the
//! word-level diff rendered into each [`Mismatch`]'s detail string.

use roxmltree::{Document as XmlDocument, Node};
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeMap;
use std::fmt::Write as _;

const TOLERANCE: f64 = 1e-6;

/// Renders a word-level diff between two mismatched values for the
/// [`Mismatch`] diagnostic.
fn diff_detail(label: &str, a: &str, b: &str) -> String {
    let diff = TextDiff::from_words(a, b);
    let mut rendered = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => ' ',
        };
        let _ = write!(rendered, "{sign}{change}");
    }
    format!("{label}: {rendered}")
}

/// Why two CoT XML documents were judged not semantically equivalent.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Which comparison phase detected the mismatch.
    pub phase: Phase,
    /// A path-like description of where the mismatch occurred (e.g. `event@uid`).
    pub path: String,
    /// Human-readable detail.
    pub detail: String,
}

/// The phase of comparison in which a [`Mismatch`] was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Root,
    EventAttributes,
    Point,
    DetailGroups,
    DetailAttributes,
    Text,
}

/// Compares two CoT XML documents for semantic equivalence (§4.7).
///
/// Returns `Ok(())` if equivalent, or `Err(Mismatch)` describing the first
/// difference found. The comparison is symmetric: swapping `a` and `b` finds
/// the same kind of mismatch (an attribute present only in one side is
/// detected from either direction), satisfying §8 property 3.
pub fn semantic_equal(a: &str, b: &str) -> Result<(), Mismatch> {
    let doc_a = parse(a)?;
    let doc_b = parse(b)?;
    let root_a = event_root(&doc_a)?;
    let root_b = event_root(&doc_b)?;

    compare_attributes(&root_a, &root_b, "event")?;
    compare_point(&root_a, &root_b)?;
    compare_detail(&root_a, &root_b)?;
    Ok(())
}

fn parse(xml: &str) -> Result<XmlDocument<'_>, Mismatch> {
    roxmltree::Document::parse(xml).map_err(|e| Mismatch {
        phase: Phase::Root,
        path: "document".to_string(),
        detail: format!("malformed XML: {e}"),
    })
}

fn event_root<'a, 'input>(doc: &'a XmlDocument<'input>) -> Result<Node<'a, 'input>, Mismatch> {
    let root = doc.root_element();
    if root.tag_name().name() != "event" {
        return Err(Mismatch {
            phase: Phase::Root,
            path: "document".to_string(),
            detail: format!("root element is '{}', not 'event'", root.tag_name().name()),
        });
    }
    Ok(root)
}

fn attr_map(node: &Node<'_, '_>) -> BTreeMap<String, String> {
    node.attributes()
        .map(|a| (a.name().to_string(), a.value().to_string()))
        .collect()
}

fn values_equivalent(a: &str, b: &str) -> bool {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => (x - y).abs() <= TOLERANCE,
        _ => a == b,
    }
}

fn compare_attributes(a: &Node<'_, '_>, b: &Node<'_, '_>, path: &str) -> Result<(), Mismatch> {
    let attrs_a = attr_map(a);
    let attrs_b = attr_map(b);
    for (key, val_a) in &attrs_a {
        match attrs_b.get(key) {
            Some(val_b) if values_equivalent(val_a, val_b) => {}
            Some(val_b) => {
                return Err(Mismatch {
                    phase: Phase::EventAttributes,
                    path: format!("{path}@{key}"),
                    detail: diff_detail("value differs", val_a, val_b),
                })
            }
            None => {
                return Err(Mismatch {
                    phase: Phase::EventAttributes,
                    path: format!("{path}@{key}"),
                    detail: "present only on the left".to_string(),
                })
            }
        }
    }
    for key in attrs_b.keys() {
        if !attrs_a.contains_key(key) {
            return Err(Mismatch {
                phase: Phase::EventAttributes,
                path: format!("{path}@{key}"),
                detail: "present only on the right".to_string(),
            });
        }
    }
    Ok(())
}

fn child_element<'a, 'input>(node: &Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.is_element() && c.tag_name().name() == name)
}

fn compare_point(a: &Node<'_, '_>, b: &Node<'_, '_>) -> Result<(), Mismatch> {
    let point_a = child_element(a, "point");
    let point_b = child_element(b, "point");
    match (point_a, point_b) {
        (None, None) => Ok(()),
        (Some(pa), Some(pb)) => compare_attributes(&pa, &pb, "point"),
        (Some(_), None) => Err(Mismatch {
            phase: Phase::Point,
            path: "point".to_string(),
            detail: "present only on the left".to_string(),
        }),
        (None, Some(_)) => Err(Mismatch {
            phase: Phase::Point,
            path: "point".to_string(),
            detail: "present only on the right".to_string(),
        }),
    }
}

fn detail_children<'a, 'input>(node: &Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    match child_element(node, "detail") {
        Some(detail) => detail.children().filter(|c| c.is_element()).collect(),
        None => Vec::new(),
    }
}

/// Groups children by tag name, preserving first-seen group order and
/// within-group document order (order within a group is significant; order
/// of groups relative to each other is not, per §4.7).
fn group_by_tag<'a, 'input>(
    children: &[Node<'a, 'input>],
) -> BTreeMap<String, Vec<Node<'a, 'input>>> {
    let mut groups: BTreeMap<String, Vec<Node<'a, 'input>>> = BTreeMap::new();
    for child in children {
        groups.entry(child.tag_name().name().to_string()).or_default().push(*child);
    }
    groups
}

fn compare_detail(a: &Node<'_, '_>, b: &Node<'_, '_>) -> Result<(), Mismatch> {
    let groups_a = group_by_tag(&detail_children(a));
    let groups_b = group_by_tag(&detail_children(b));

    for (tag, group_a) in &groups_a {
        let group_b = groups_b.get(tag).ok_or_else(|| Mismatch {
            phase: Phase::DetailGroups,
            path: format!("detail/{tag}"),
            detail: "tag present only on the left".to_string(),
        })?;
        compare_group(tag, group_a, group_b)?;
    }
    for tag in groups_b.keys() {
        if !groups_a.contains_key(tag) {
            return Err(Mismatch {
                phase: Phase::DetailGroups,
                path: format!("detail/{tag}"),
                detail: "tag present only on the right".to_string(),
            });
        }
    }
    Ok(())
}

fn compare_group(
    tag: &str,
    group_a: &[Node<'_, '_>],
    group_b: &[Node<'_, '_>],
) -> Result<(), Mismatch> {
    if group_a.len() != group_b.len() {
        return Err(Mismatch {
            phase: Phase::DetailGroups,
            path: format!("detail/{tag}"),
            detail: format!("group size {} != {}", group_a.len(), group_b.len()),
        });
    }
    for (i, (el_a, el_b)) in group_a.iter().zip(group_b.iter()).enumerate() {
        let path = format!("detail/{tag}[{i}]");
        compare_attributes(el_a, el_b, &path)?;
        compare_text(el_a, el_b, &path)?;
    }
    Ok(())
}

fn compare_text(a: &Node<'_, '_>, b: &Node<'_, '_>, path: &str) -> Result<(), Mismatch> {
    let text_a = a.text().unwrap_or("").trim();
    let text_b = b.text().unwrap_or("").trim();
    if text_a != text_b {
        return Err(Mismatch {
            phase: Phase::Text,
            path: path.to_string(),
            detail: diff_detail("text differs", text_a, text_b),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_documents_are_equal() {
        let xml = r#"<event version="2.0" uid="U" type="a-f-G-U-C" time="t" start="t" stale="t" how="h"><point lat="34.052235" lon="-118.243683" hae="1.0" ce="1.0" le="1.0"/><detail><contact callsign="A"/></detail></event>"#;
        assert!(semantic_equal(xml, xml).is_ok());
    }

    #[test]
    fn attribute_order_does_not_matter() {
        let a = r#"<event uid="U" type="T" time="t" start="t" stale="t" how="h"/>"#;
        let b = r#"<event how="h" stale="t" start="t" time="t" type="T" uid="U"/>"#;
        assert!(semantic_equal(a, b).is_ok());
    }

    #[test]
    fn numeric_point_fields_tolerate_tiny_differences() {
        let a = r#"<event uid="U" type="T" time="t" start="t" stale="t" how="h"><point lat="34.0000001" lon="0" hae="0" ce="0" le="0"/></event>"#;
        let b = r#"<event uid="U" type="T" time="t" start="t" stale="t" how="h"><point lat="34.0000000" lon="0" hae="0" ce="0" le="0"/></event>"#;
        assert!(semantic_equal(a, b).is_ok());
    }

    #[test]
    fn extra_attribute_is_rejected_from_either_direction() {
        let a = r#"<event uid="T" type="a-f-G-U-C" time="t" start="t" stale="t" how="h"/>"#;
        let b = r#"<event uid="T" type="a-f-G-U-C" time="t" start="t" stale="t" how="h" extra="x"/>"#;
        assert!(semantic_equal(a, b).is_err());
        assert!(semantic_equal(b, a).is_err());
    }

    #[test]
    fn detail_group_order_is_insignificant_but_within_group_order_matters() {
        let a = r#"<event uid="U" type="T" time="t" start="t" stale="t" how="h"><detail><foo a="1"/><foo a="2"/><bar/></detail></event>"#;
        let b = r#"<event uid="U" type="T" time="t" start="t" stale="t" how="h"><detail><bar/><foo a="1"/><foo a="2"/></detail></event>"#;
        assert!(semantic_equal(a, b).is_ok());

        let swapped = r#"<event uid="U" type="T" time="t" start="t" stale="t" how="h"><detail><foo a="2"/><foo a="1"/><bar/></detail></event>"#;
        assert!(semantic_equal(a, swapped).is_err());
    }

    #[test]
    fn mismatched_root_is_rejected() {
        assert!(semantic_equal("<notevent/>", "<notevent/>").is_err());
    }
}
