//! Small helpers layered on `roxmltree` for the attribute-heavy, non-nested
//! documents in `spec.md` §6. Every loader in this module turns a missing or
//! malformed attribute into the matching `EngineError` variant, never a
//! panic.

use std::path::{Path, PathBuf};

use roxmltree::Node;

use crate::{error::EngineError, math::Vec2};

pub fn read_and_parse(path: &Path) -> Result<String, EngineError> {
    std::fs::read_to_string(path).map_err(|source| EngineError::DocumentLoad { path: path.to_owned(), source })
}

pub fn parse_document<'a>(path: &Path, text: &'a str) -> Result<roxmltree::Document<'a>, EngineError> {
    roxmltree::Document::parse(text).map_err(|source| EngineError::Parse { path: path.to_owned(), source })
}

/// A required attribute on `node`, or a `Schema` error naming `node`'s tag.
pub fn required_attr<'a>(path: &Path, node: Node<'a, 'a>, attribute: &'static str) -> Result<&'a str, EngineError> {
    node.attribute(attribute).ok_or_else(|| EngineError::Schema { path: path.to_owned(), tag: node.tag_name().name().to_owned(), attribute })
}

/// A required `f32` attribute.
pub fn required_f32(path: &Path, node: Node<'_, '_>, attribute: &'static str) -> Result<f32, EngineError> {
    let raw = required_attr(path, node, attribute)?;
    raw.trim().parse::<f32>().map_err(|_| EngineError::Numeric {
        path: path.to_owned(),
        tag: node.tag_name().name().to_owned(),
        attribute,
        expected: "number",
        value: raw.to_owned(),
    })
}

/// A required `"x,y"` attribute, parsed into a `Vec2`.
pub fn required_vec2(path: &Path, node: Node<'_, '_>, attribute: &'static str) -> Result<Vec2, EngineError> {
    let raw = required_attr(path, node, attribute)?;
    let invalid = || EngineError::Numeric {
        path: path.to_owned(),
        tag: node.tag_name().name().to_owned(),
        attribute,
        expected: "\"x,y\" pair",
        value: raw.to_owned(),
    };
    let mut parts = raw.split(',');
    let x = parts.next().ok_or_else(invalid)?.trim().parse::<f32>().map_err(|_| invalid())?;
    let y = parts.next().ok_or_else(invalid)?.trim().parse::<f32>().map_err(|_| invalid())?;
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(Vec2::new(x, y))
}

/// Direct children of `node` with the given tag name, in document order.
pub fn children<'a, 'input>(node: Node<'a, 'input>, tag: &'static str) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |c| c.is_element() && c.tag_name().name() == tag)
}

pub fn canonical_dir(dir_attr: &str) -> PathBuf {
    PathBuf::from(dir_attr)
}
