//! Small helpers over `xmltree` shared by the document models.

use xmltree::{Element, EmitterConfig, XMLNode};

pub(crate) fn parse(bytes: &[u8]) -> Result<Element, String> {
    Element::parse(bytes).map_err(|e| e.to_string())
}

pub(crate) fn serialize(root: &Element) -> Result<Vec<u8>, String> {
    let mut out = Vec::new();
    root.write_with_config(&mut out, EmitterConfig::new().perform_indent(true))
        .map_err(|e| e.to_string())?;
    Ok(out)
}

pub(crate) fn child_elements_mut(el: &mut Element) -> impl Iterator<Item = &mut Element> {
    el.children.iter_mut().filter_map(|node| match node {
        XMLNode::Element(e) => Some(e),
        _ => None,
    })
}

pub(crate) fn child_elements(el: &Element) -> impl Iterator<Item = &Element> {
    el.children.iter().filter_map(|node| match node {
        XMLNode::Element(e) => Some(e),
        _ => None,
    })
}

/// Text of the first child named `name`; `None` when absent or empty.
pub(crate) fn child_text(el: &Element, name: &str) -> Option<String> {
    el.get_child(name)
        .and_then(|c| c.get_text())
        .map(|t| t.into_owned())
        .filter(|t| !t.is_empty())
}

pub(crate) fn set_text(el: &mut Element, text: &str) {
    el.children = vec![XMLNode::Text(text.to_string())];
}

pub(crate) fn text_element(name: &str, text: &str) -> Element {
    let mut el = Element::new(name);
    set_text(&mut el, text);
    el
}

/// Descendants matching `pred`, in document order. Matches are not searched further.
pub(crate) fn collect<'a>(el: &'a Element, pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
    for child in child_elements(el) {
        if pred(child) {
            out.push(child);
        } else {
            collect(child, pred, out);
        }
    }
}

pub(crate) fn collect_mut<'a>(
    el: &'a mut Element,
    pred: &dyn Fn(&Element) -> bool,
    out: &mut Vec<&'a mut Element>,
) {
    for child in child_elements_mut(el) {
        if pred(&*child) {
            out.push(child);
        } else {
            collect_mut(child, pred, out);
        }
    }
}

/// First descendant named `name`, depth first.
pub(crate) fn find_first<'a>(el: &'a Element, name: &str) -> Option<&'a Element> {
    child_elements(el).find_map(|e| {
        if e.name == name {
            Some(e)
        } else {
            find_first(e, name)
        }
    })
}

pub(crate) fn find_first_mut<'a>(el: &'a mut Element, name: &str) -> Option<&'a mut Element> {
    child_elements_mut(el).find_map(|e| {
        if e.name == name {
            Some(e)
        } else {
            find_first_mut(e, name)
        }
    })
}
