use std::collections::HashSet;

use crate::dom::dom_model::{Document, ElementData, NodeId};
use crate::selector::selector_model::{
    AttrOp, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, PseudoClass,
    SelectorList, SimpleSelector,
};

pub fn matches_list(doc: &Document, node: NodeId, list: &SelectorList) -> bool {
    list.0.iter().any(|complex| matches_complex(doc, node, complex))
}

pub fn matches_complex(doc: &Document, node: NodeId, complex: &ComplexSelector) -> bool {
    match complex.compounds.len() {
        0 => false,
        n => matches_from(doc, node, complex, n - 1, &mut HashSet::new()),
    }
}

/// Match `compounds[..=idx]` with `node` as the subject of `compounds[idx]`,
/// walking right to left.
///
/// `failed` holds every `(node, idx)` state already known not to match, so
/// each state is evaluated at most once and descendant / sibling backtracking
/// stays polynomial in the selector length.
fn matches_from(
    doc: &Document,
    node: NodeId,
    complex: &ComplexSelector,
    idx: usize,
    failed: &mut HashSet<(NodeId, usize)>,
) -> bool {
    if failed.contains(&(node, idx)) {
        return false;
    }
    let matched = matches_state(doc, node, complex, idx, failed);
    if !matched {
        failed.insert((node, idx));
    }
    matched
}

fn matches_state(
    doc: &Document,
    node: NodeId,
    complex: &ComplexSelector,
    idx: usize,
    failed: &mut HashSet<(NodeId, usize)>,
) -> bool {
    if !matches_compound(doc, node, &complex.compounds[idx]) {
        return false;
    }
    if idx == 0 {
        return true;
    }

    match complex.combinators[idx - 1] {
        Combinator::Child => doc
            .parent_element(node)
            .map(|p| matches_from(doc, p, complex, idx - 1, failed))
            .unwrap_or(false),
        Combinator::Descendant => {
            let mut current = doc.parent_element(node);
            while let Some(ancestor) = current {
                if matches_from(doc, ancestor, complex, idx - 1, failed) {
                    return true;
                }
                current = doc.parent_element(ancestor);
            }
            false
        }
        Combinator::NextSibling => doc
            .previous_element_sibling(node)
            .map(|s| matches_from(doc, s, complex, idx - 1, failed))
            .unwrap_or(false),
        Combinator::SubsequentSibling => {
            let mut current = doc.previous_element_sibling(node);
            while let Some(sibling) = current {
                if matches_from(doc, sibling, complex, idx - 1, failed) {
                    return true;
                }
                current = doc.previous_element_sibling(sibling);
            }
            false
        }
    }
}

fn matches_compound(doc: &Document, node: NodeId, compound: &CompoundSelector) -> bool {
    let Some(el) = doc.element(node) else {
        return false;
    };
    if let Some(tag) = &compound.tag {
        if !el.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    compound
        .simples
        .iter()
        .all(|simple| matches_simple(doc, node, el, simple))
}

fn matches_simple(doc: &Document, node: NodeId, el: &ElementData, simple: &SimpleSelector) -> bool {
    match simple {
        SimpleSelector::Id(id) => el.attr("id") == Some(id.as_str()),
        SimpleSelector::Class(class) => el.has_class(class),
        SimpleSelector::Attribute(attr) => matches_attribute(el, attr),
        SimpleSelector::Pseudo(pseudo) => matches_pseudo(doc, node, pseudo),
    }
}

fn matches_attribute(el: &ElementData, selector: &AttributeSelector) -> bool {
    let Some(actual) = el.attr(&selector.name) else {
        return false;
    };
    let Some((op, expected)) = &selector.matcher else {
        return true;
    };

    let (actual, expected) = if selector.case_insensitive {
        (actual.to_lowercase(), expected.to_lowercase())
    } else {
        (actual.to_string(), expected.clone())
    };

    match op {
        AttrOp::Equals => actual == expected,
        AttrOp::Includes => {
            !expected.is_empty()
                && !expected.contains(char::is_whitespace)
                && actual.split_ascii_whitespace().any(|t| t == expected)
        }
        AttrOp::DashMatch => actual == expected || actual.starts_with(&format!("{expected}-")),
        AttrOp::Prefix => !expected.is_empty() && actual.starts_with(&expected),
        AttrOp::Suffix => !expected.is_empty() && actual.ends_with(&expected),
        AttrOp::Substring => !expected.is_empty() && actual.contains(&expected),
    }
}

fn matches_pseudo(doc: &Document, node: NodeId, pseudo: &PseudoClass) -> bool {
    match pseudo {
        PseudoClass::FirstChild => doc.element_index(node) == Some(1),
        PseudoClass::LastChild => {
            doc.element_index(node) == Some(doc.element_siblings(node).len())
        }
        PseudoClass::OnlyChild => doc.element_siblings(node).len() == 1,
        PseudoClass::NthChild(nth) => doc.element_index(node).map(|i| nth.matches(i)).unwrap_or(false),
        PseudoClass::NthOfType(nth) => doc.type_index(node).map(|i| nth.matches(i)).unwrap_or(false),
        PseudoClass::Not(list) => !matches_list(doc, node, list),
    }
}
