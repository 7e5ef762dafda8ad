//! Direct shape-to-primitive adapters for the basic SVG shapes.
//!
//! Unlike `path` these need no state machine: each element maps straight to
//! one primitive. A missing or malformed attribute is a local error — the
//! adapter logs it and returns `None`, and conversion moves on to the next
//! element.

use crate::curve;
use crate::dom::Element;
use crate::geom::Point;
use crate::primitive::Primitive;

/// Looks up a required numeric attribute; logs and bails on absence or a
/// value that doesn't parse.
fn required(el: &Element, name: &str) -> Option<f64> {
    match el.attr(name) {
        Some(value) => match value.trim().parse() {
            Ok(v) => Some(v),
            Err(_) => {
                log::warn!(
                    "invalid attribute {name}={value:?} in tag {:?}, skipping element",
                    el.name
                );
                None
            }
        },
        None => {
            log::warn!(
                "no required attribute {name:?} in tag {:?}, skipping element",
                el.name
            );
            None
        }
    }
}

/// Converts a `rect` element. The outline runs clockwise from `(x, y)`.
pub fn rect(el: &Element) -> Option<Primitive> {
    let x = required(el, "x")?;
    let y = required(el, "y")?;
    let width = required(el, "width")?;
    let height = required(el, "height")?;

    let mut prim = Primitive::new(Point::new(x, y));
    prim.push(Point::new(x + width, y));
    prim.push(Point::new(x + width, y + height));
    prim.push(Point::new(x, y + height));
    prim.push(Point::new(x, y));
    Some(prim)
}

/// Converts a `circle` element via the closed-form ellipse sampler.
pub fn circle(el: &Element, tolerance: f64) -> Option<Primitive> {
    let cx = required(el, "cx")?;
    let cy = required(el, "cy")?;
    let r = required(el, "r")?;
    ring(el, Point::new(cx, cy), r, r, tolerance)
}

/// Converts an `ellipse` element via the closed-form ellipse sampler.
pub fn ellipse(el: &Element, tolerance: f64) -> Option<Primitive> {
    let cx = required(el, "cx")?;
    let cy = required(el, "cy")?;
    let rx = required(el, "rx")?;
    let ry = required(el, "ry")?;
    ring(el, Point::new(cx, cy), rx, ry, tolerance)
}

fn ring(el: &Element, center: Point, rx: f64, ry: f64, tolerance: f64) -> Option<Primitive> {
    let pts = match curve::sample_ellipse(center, rx, ry, tolerance) {
        Ok(pts) => pts,
        Err(err) => {
            log::warn!("cannot sample tag {:?}: {err}, skipping element", el.name);
            return None;
        }
    };
    let mut iter = pts.into_iter();
    let mut prim = Primitive::new(iter.next()?);
    for p in iter {
        prim.push(p);
    }
    prim.close();
    Some(prim)
}

/// Converts a `line` element to a single segment.
pub fn line(el: &Element) -> Option<Primitive> {
    let x1 = required(el, "x1")?;
    let y1 = required(el, "y1")?;
    let x2 = required(el, "x2")?;
    let y2 = required(el, "y2")?;

    let mut prim = Primitive::new(Point::new(x1, y1));
    prim.push(Point::new(x2, y2));
    Some(prim)
}

/// Converts a `polyline` element.
pub fn polyline(el: &Element) -> Option<Primitive> {
    points_list(el)
}

/// Converts a `polygon` element; same as `polyline` but closed.
pub fn polygon(el: &Element) -> Option<Primitive> {
    let mut prim = points_list(el)?;
    prim.close();
    Some(prim)
}

fn points_list(el: &Element) -> Option<Primitive> {
    let Some(value) = el.attr("points") else {
        log::warn!(
            "no required attribute \"points\" in tag {:?}, skipping element",
            el.name
        );
        return None;
    };
    let mut coords = Vec::new();
    for token in value.split(|c: char| c.is_whitespace() || c == ',') {
        if token.is_empty() {
            continue;
        }
        match token.parse::<f64>() {
            Ok(v) => coords.push(v),
            Err(_) => {
                log::warn!(
                    "invalid coordinate {token:?} in tag {:?}, skipping element",
                    el.name
                );
                return None;
            }
        }
    }
    if coords.len() < 4 || coords.len() % 2 != 0 {
        log::warn!(
            "points list in tag {:?} has {} coordinates, skipping element",
            el.name,
            coords.len()
        );
        return None;
    }
    let mut prim = Primitive::new(Point::new(coords[0], coords[1]));
    for pair in coords[2..].chunks_exact(2) {
        prim.push(Point::new(pair[0], pair[1]));
    }
    Some(prim)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, attrs: &[(&str, &str)]) -> Element {
        let mut el = Element::new(name);
        for (k, v) in attrs {
            el.set_attr(k, v);
        }
        el
    }

    #[test]
    fn rect_outline() {
        let el = element(
            "rect",
            &[("x", "1"), ("y", "2"), ("width", "10"), ("height", "20")],
        );
        let prim = rect(&el).unwrap();
        assert_eq!(prim.start, Point::new(1.0, 2.0));
        assert_eq!(
            prim.points,
            vec![
                Point::new(11.0, 2.0),
                Point::new(11.0, 22.0),
                Point::new(1.0, 22.0),
                Point::new(1.0, 2.0),
            ]
        );
    }

    #[test]
    fn rect_missing_attribute_is_skipped() {
        let el = element("rect", &[("x", "1"), ("y", "2"), ("width", "10")]);
        assert_eq!(rect(&el), None);
        let el = element(
            "rect",
            &[("x", "1"), ("y", "2"), ("width", "ten"), ("height", "3")],
        );
        assert_eq!(rect(&el), None);
    }

    #[test]
    fn circle_is_closed() {
        let el = element("circle", &[("cx", "0"), ("cy", "0"), ("r", "10")]);
        let prim = circle(&el, 1.0).unwrap();
        assert!(prim.is_closed());
        assert_eq!(prim.start, Point::new(10.0, 0.0));
        for p in prim.vertices() {
            assert!((p.len() - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn circle_bad_radius_is_skipped() {
        let el = element("circle", &[("cx", "0"), ("cy", "0"), ("r", "-1")]);
        assert_eq!(circle(&el, 1.0), None);
    }

    #[test]
    fn line_segment() {
        let el = element(
            "line",
            &[("x1", "0"), ("y1", "0"), ("x2", "3"), ("y2", "4")],
        );
        let prim = line(&el).unwrap();
        assert_eq!(prim.start, Point::new(0.0, 0.0));
        assert_eq!(prim.points, vec![Point::new(3.0, 4.0)]);
    }

    #[test]
    fn polygon_closes_polyline_does_not() {
        let open = polyline(&element("polyline", &[("points", "0,0 10,0 10,10")])).unwrap();
        assert!(!open.is_closed());
        assert_eq!(open.len(), 2);

        let closed = polygon(&element("polygon", &[("points", "0,0 10,0 10,10")])).unwrap();
        assert!(closed.is_closed());
        assert_eq!(closed.len(), 3);
    }

    #[test]
    fn odd_points_list_is_skipped() {
        assert_eq!(
            polyline(&element("polyline", &[("points", "0,0 10,0 10")])),
            None
        );
    }
}
