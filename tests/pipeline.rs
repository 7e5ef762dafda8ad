//! End-to-end scenarios driving the whole conversion pipeline through the
//! public API.

use plotline::geom::{Point, EPS};
use plotline::{convert, fill, Config, Element};

fn svg(children: Vec<Element>) -> Element {
    let mut root = Element::new("svg");
    root.children = children;
    root
}

fn path(d: &str) -> Element {
    let mut el = Element::new("path");
    el.set_attr("d", d);
    el
}

fn assert_close(a: Point, b: Point) {
    assert!(a.dist(&b) < 1e-9, "{a:?} != {b:?}");
}

#[test]
fn square_against_narrow_viewport_splits_into_piece_and_chord() {
    // A 10x10 square against a 5-wide working area: the part left of x = 5
    // survives as one stitched piece, and the cut at x = 5 comes back as a
    // bridging chord.
    let config = Config::new(0.1, 5.0, 20.0, 1.0).unwrap();
    let root = svg(vec![path("M0,0 L10,0 L10,10 L0,10 Z")]);
    let prims = convert(&root, &config).unwrap();

    assert_eq!(prims.len(), 2);
    for prim in &prims {
        for v in prim.vertices() {
            assert!(v.x >= -EPS && v.x <= 5.0 + EPS);
            assert!(v.y >= -EPS && v.y <= 20.0 + EPS);
        }
    }

    let piece: Vec<Point> = prims[0].vertices().collect();
    assert_eq!(piece.len(), 4);
    assert_close(piece[0], Point::new(5.0, 10.0));
    assert_close(piece[1], Point::new(0.0, 10.0));
    assert_close(piece[2], Point::new(0.0, 0.0));
    assert_close(piece[3], Point::new(5.0, 0.0));

    let chord: Vec<Point> = prims[1].vertices().collect();
    assert_eq!(chord.len(), 2);
    assert!((chord[0].x - 5.0).abs() < 1e-9);
    assert!((chord[1].x - 5.0).abs() < 1e-9);
}

#[test]
fn transformed_group_with_curves_stays_within_tolerance_of_the_circle() {
    // A unit circle scaled and translated into the middle of the working
    // area: every flattened vertex must sit on the transformed circle to
    // within the flattening tolerance.
    let tolerance = 0.05;
    let config = Config::new(tolerance, 100.0, 100.0, 1.0).unwrap();
    let mut group = Element::new("g");
    group.set_attr("transform", "translate(50, 50) scale(20)");
    let mut circle = Element::new("circle");
    circle.set_attr("cx", "0");
    circle.set_attr("cy", "0");
    circle.set_attr("r", "1");
    group.children.push(circle);
    let prims = convert(&svg(vec![group]), &config).unwrap();

    assert_eq!(prims.len(), 1);
    let center = Point::new(50.0, 50.0);
    for v in prims[0].vertices() {
        let r = v.dist(&center);
        // The adapter samples at the pre-transform tolerance; a uniform
        // scale of 20 stretches the permitted sagitta accordingly.
        assert!((r - 20.0).abs() < tolerance * 20.0 + 1e-9, "radius {r}");
    }
}

#[test]
fn filled_rect_converts_and_plans_passes() {
    let config = Config::new(0.1, 100.0, 100.0, 1.0).unwrap();
    let mut rect = Element::new("rect");
    rect.set_attr("x", "10");
    rect.set_attr("y", "10");
    rect.set_attr("width", "10");
    rect.set_attr("height", "4");
    rect.set_attr("fill", "black");
    let prims = convert(&svg(vec![rect]), &config).unwrap();

    assert_eq!(prims.len(), 1);
    assert!(prims[0].fill);
    assert!(prims[0].is_closed());

    let passes = fill::plan(&prims[0], config.fill_step).unwrap();
    assert_eq!(passes.len(), 10);
    for (entry, exit) in &passes {
        assert!((entry.y - exit.y).abs() > 3.0);
        assert!(entry.x >= 10.0 - 1e-9 && entry.x <= 20.0 + 1e-9);
    }
}

#[test]
fn smooth_cubic_path_matches_its_explicit_form() {
    let config = Config::new(0.01, 100.0, 100.0, 1.0).unwrap();
    let shorthand = svg(vec![path("M0,0 C0,10 10,10 10,0 S20,-10 20,0")]);
    let explicit = svg(vec![path("M0,0 C0,10 10,10 10,0 C10,-10 20,-10 20,0")]);
    let a = convert(&shorthand, &config).unwrap();
    let b = convert(&explicit, &config).unwrap();

    assert_eq!(a.len(), b.len());
    for (pa, pb) in a.iter().zip(&b) {
        let va: Vec<Point> = pa.vertices().collect();
        let vb: Vec<Point> = pb.vertices().collect();
        assert_eq!(va.len(), vb.len());
        for (x, y) in va.iter().zip(&vb) {
            assert_close(*x, *y);
        }
    }
}

#[test]
fn mixed_document_collects_everything_in_order() {
    let config = Config::new(0.1, 200.0, 200.0, 1.0).unwrap();
    let mut line = Element::new("line");
    line.set_attr("x1", "0");
    line.set_attr("y1", "0");
    line.set_attr("x2", "10");
    line.set_attr("y2", "10");
    let mut poly = Element::new("polygon");
    poly.set_attr("points", "20,20 30,20 25,30");
    let root = svg(vec![path("M1,1 L2,2"), line, poly]);
    let prims = convert(&root, &config).unwrap();

    assert_eq!(prims.len(), 3);
    assert_close(prims[0].start, Point::new(1.0, 1.0));
    assert_close(prims[1].start, Point::new(0.0, 0.0));
    assert_close(prims[2].start, Point::new(20.0, 20.0));
    assert!(prims[2].is_closed());
}

#[test]
fn fully_outside_content_vanishes_without_error() {
    let config = Config::new(0.1, 10.0, 10.0, 1.0).unwrap();
    let root = svg(vec![path("M20,20 L30,30 L40,20")]);
    let prims = convert(&root, &config).unwrap();
    assert!(prims.is_empty());
}
