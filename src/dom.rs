//! The element-tree walk that drives the pipeline.
//!
//! XML tokenizing is out of scope; the caller hands over an already-built
//! [`Element`] tree. The walk tracks the transform stack across `g`/`svg`
//! nesting, dispatches `path` elements to the interpreter and the basic
//! shapes to their adapters, and clips every resulting primitive against the
//! configured working area.

use crate::clip;
use crate::path;
use crate::primitive::Primitive;
use crate::shape;
use crate::transform::{Transform, TransformStack};
use crate::{Config, Error};

/// One element of the input document tree.
///
/// A minimal stand-in for the DOM collaborator: a tag name, attributes, and
/// children in document order.
#[derive(Clone, Debug, Default)]
pub struct Element {
    /// The tag name, e.g. `"path"`.
    pub name: String,
    /// Child elements in document order.
    pub children: Vec<Element>,
    attrs: Vec<(String, String)>,
}

impl Element {
    /// A new element with no attributes or children.
    pub fn new(name: &str) -> Self {
        Element {
            name: name.to_owned(),
            children: Vec::new(),
            attrs: Vec::new(),
        }
    }

    /// Sets an attribute. Repeated names are kept; lookup takes the last one.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.push((name.to_owned(), value.to_owned()));
    }

    /// Looks up an attribute by name, last occurrence winning.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Converts a document tree into clipped motion primitives.
///
/// The root element must be `svg`; anything else is a structural error and
/// fails the whole conversion. Within the tree, malformed path data,
/// transforms, and shape attributes are local: they are logged and skipped,
/// and the rest of the document still converts. Primitives come out in
/// document order, clipped to `[0, width] × [0, height]`, with fill-eligible
/// pieces re-closed so the fill planner can run on them directly.
pub fn convert(root: &Element, config: &Config) -> Result<Vec<Primitive>, Error> {
    if root.name != "svg" {
        return Err(Error::NotAnSvgDocument);
    }

    let mut stack = TransformStack::new();
    let mut collected = Vec::new();
    walk(root, config, &mut stack, &mut collected);

    let mut out = Vec::new();
    for prim in collected {
        for mut piece in clip::split(&prim, config.width, config.height) {
            if piece.fill {
                piece.close();
            }
            out.push(piece);
        }
    }
    Ok(out)
}

fn walk(el: &Element, config: &Config, stack: &mut TransformStack, out: &mut Vec<Primitive>) {
    let own = el
        .attr("transform")
        .map(Transform::parse)
        .unwrap_or_else(Transform::identity);
    stack.push(&own);

    match el.name.as_str() {
        "svg" | "g" => {
            for child in &el.children {
                walk(child, config, stack, out);
            }
        }
        "path" => {
            if let Some(d) = el.attr("d") {
                let (prims, err) = path::parse_path(d, config.tolerance);
                if let Some(err) = err {
                    log::warn!("{err}; keeping {} primitives parsed before it", prims.len());
                }
                for prim in prims {
                    finish(prim, el, stack, out);
                }
            } else {
                log::warn!("path element without a \"d\" attribute, skipping");
            }
        }
        "rect" => {
            if let Some(prim) = shape::rect(el) {
                finish(prim, el, stack, out);
            }
        }
        "circle" => {
            if let Some(prim) = shape::circle(el, config.tolerance) {
                finish(prim, el, stack, out);
            }
        }
        "ellipse" => {
            if let Some(prim) = shape::ellipse(el, config.tolerance) {
                finish(prim, el, stack, out);
            }
        }
        "line" => {
            if let Some(prim) = shape::line(el) {
                finish(prim, el, stack, out);
            }
        }
        "polyline" => {
            if let Some(prim) = shape::polyline(el) {
                finish(prim, el, stack, out);
            }
        }
        "polygon" => {
            if let Some(prim) = shape::polygon(el) {
                finish(prim, el, stack, out);
            }
        }
        other => {
            log::trace!("skipping unsupported tag {other:?}");
        }
    }

    stack.pop();
}

/// Applies the active transform and the element's fill eligibility, then
/// appends the primitive in document order.
fn finish(mut prim: Primitive, el: &Element, stack: &TransformStack, out: &mut Vec<Primitive>) {
    prim.fill = el.attr("fill").is_some_and(|v| v.trim() != "none");
    prim.transform(&stack.current());
    out.push(prim);
}
