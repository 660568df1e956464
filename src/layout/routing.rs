use super::types::Point;

// ── Bend selection ──────────────────────────────────────────────────
/// Offsets below this many corner radii get a single bezier; two arcs would overlap.
pub const DEFAULT_BEND_THRESHOLD: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    CubicTo {
        c1: Point,
        c2: Point,
        to: Point,
    },
    /// Circular arc rounding the corner at `corner`, ending at the tangent point `to`.
    ArcTo {
        corner: Point,
        to: Point,
        radius: f32,
        /// Clockwise on screen (y grows downwards), i.e. the SVG sweep flag.
        clockwise: bool,
    },
}

impl PathSegment {
    pub fn end(&self) -> Point {
        match *self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => p,
            PathSegment::CubicTo { to, .. } | PathSegment::ArcTo { to, .. } => to,
        }
    }

    pub fn is_curve(&self) -> bool {
        matches!(self, PathSegment::CubicTo { .. } | PathSegment::ArcTo { .. })
    }

    fn translated(self, dx: f32, dy: f32) -> Self {
        match self {
            PathSegment::MoveTo(p) => PathSegment::MoveTo(p.offset(dx, dy)),
            PathSegment::LineTo(p) => PathSegment::LineTo(p.offset(dx, dy)),
            PathSegment::CubicTo { c1, c2, to } => PathSegment::CubicTo {
                c1: c1.offset(dx, dy),
                c2: c2.offset(dx, dy),
                to: to.offset(dx, dy),
            },
            PathSegment::ArcTo {
                corner,
                to,
                radius,
                clockwise,
            } => PathSegment::ArcTo {
                corner: corner.offset(dx, dy),
                to: to.offset(dx, dy),
                radius,
                clockwise,
            },
        }
    }
}

/// Ordered drawing instructions for one parent→child connector. Always starts with `MoveTo`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EdgePath {
    pub segments: Vec<PathSegment>,
}

impl EdgePath {
    pub fn start(&self) -> Option<Point> {
        self.segments.first().map(PathSegment::end)
    }

    pub fn end(&self) -> Option<Point> {
        self.segments.last().map(PathSegment::end)
    }

    pub fn curves(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter().filter(|segment| segment.is_curve())
    }

    /// Vertices including control and corner points, for dumps and hit testing.
    pub fn polyline(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.segments.len() * 2);
        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => points.push(p),
                PathSegment::CubicTo { c1, c2, to } => points.extend([c1, c2, to]),
                PathSegment::ArcTo { corner, to, .. } => points.extend([corner, to]),
            }
        }
        points
    }

    pub fn to_svg_path(&self) -> String {
        let mut d = String::new();
        for segment in &self.segments {
            if !d.is_empty() {
                d.push(' ');
            }
            match *segment {
                PathSegment::MoveTo(p) => d.push_str(&format!("M {:.2} {:.2}", p.x, p.y)),
                PathSegment::LineTo(p) => d.push_str(&format!("L {:.2} {:.2}", p.x, p.y)),
                PathSegment::CubicTo { c1, c2, to } => d.push_str(&format!(
                    "C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
                    c1.x, c1.y, c2.x, c2.y, to.x, to.y
                )),
                PathSegment::ArcTo {
                    to,
                    radius,
                    clockwise,
                    ..
                } => d.push_str(&format!(
                    "A {radius:.2} {radius:.2} 0 0 {} {:.2} {:.2}",
                    u8::from(clockwise),
                    to.x,
                    to.y
                )),
            }
        }
        d
    }

    pub(crate) fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .map(|segment| segment.translated(dx, dy))
                .collect(),
        }
    }
}

/// Routes from a parent's bottom-center `start` to a child's top-center `end`.
///
/// The bend always happens at `start.y + child_gap / 2`, so every edge leaving the
/// same row shares the same curve height regardless of where its child sits.
pub fn route_edge(start: Point, end: Point, corner_radius: f32, child_gap: f32) -> EdgePath {
    route_edge_with_threshold(start, end, corner_radius, child_gap, DEFAULT_BEND_THRESHOLD)
}

pub fn route_edge_with_threshold(
    start: Point,
    end: Point,
    corner_radius: f32,
    child_gap: f32,
    bend_threshold: f32,
) -> EdgePath {
    let r = corner_radius;
    let mid_y = start.y + child_gap / 2.0;
    let dx = start.x - end.x;

    let mut segments = vec![PathSegment::MoveTo(start)];
    if dx == 0.0 {
        segments.push(PathSegment::LineTo(end));
    } else if dx.abs() < bend_threshold * r {
        segments.push(PathSegment::LineTo(Point::new(start.x, mid_y - r)));
        segments.push(PathSegment::CubicTo {
            c1: Point::new(start.x, mid_y),
            c2: Point::new(end.x, mid_y),
            to: Point::new(end.x, mid_y + r),
        });
        segments.push(PathSegment::LineTo(end));
    } else {
        // +1 when the child sits to the left; both arcs turn towards it.
        let side = dx.signum();
        let toward_child_left = side > 0.0;
        segments.push(PathSegment::LineTo(Point::new(start.x, mid_y - r)));
        segments.push(PathSegment::ArcTo {
            corner: Point::new(start.x, mid_y),
            to: Point::new(start.x - side * r, mid_y),
            radius: r,
            clockwise: toward_child_left,
        });
        segments.push(PathSegment::LineTo(Point::new(end.x + side * r, mid_y)));
        segments.push(PathSegment::ArcTo {
            corner: Point::new(end.x, mid_y),
            to: Point::new(end.x, mid_y + r),
            radius: r,
            clockwise: !toward_child_left,
        });
        segments.push(PathSegment::LineTo(end));
    }
    EdgePath { segments }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(path: &EdgePath) -> Vec<&'static str> {
        path.segments
            .iter()
            .map(|segment| match segment {
                PathSegment::MoveTo(_) => "M",
                PathSegment::LineTo(_) => "L",
                PathSegment::CubicTo { .. } => "C",
                PathSegment::ArcTo { .. } => "A",
            })
            .collect()
    }

    #[rstest]
    #[case(0.0, 0.0, 40.0)]
    #[case(55.5, 40.0, 120.0)]
    #[case(-30.0, 10.0, 11.0)]
    fn aligned_endpoints_give_one_straight_segment(
        #[case] x: f32,
        #[case] y0: f32,
        #[case] y1: f32,
    ) {
        let path = route_edge(Point::new(x, y0), Point::new(x, y1), 10.0, 40.0);
        assert_eq!(
            path.segments,
            vec![
                PathSegment::MoveTo(Point::new(x, y0)),
                PathSegment::LineTo(Point::new(x, y1)),
            ]
        );
    }

    #[test]
    fn small_offset_uses_single_bezier_at_mid_row() {
        let path = route_edge(Point::new(0.0, 0.0), Point::new(5.0, 40.0), 10.0, 40.0);
        assert_eq!(kinds(&path), vec!["M", "L", "C", "L"]);
        assert_eq!(path.curves().count(), 1);
        let Some(PathSegment::CubicTo { c1, c2, to }) = path.curves().next().copied() else {
            panic!("expected a cubic bezier");
        };
        assert_eq!(c1, Point::new(0.0, 20.0));
        assert_eq!(c2, Point::new(5.0, 20.0));
        assert_eq!(to, Point::new(5.0, 30.0));
        assert_eq!(path.segments[1].end(), Point::new(0.0, 10.0));
        assert_eq!(path.end(), Some(Point::new(5.0, 40.0)));
    }

    #[rstest]
    #[case(19.9, "C")]
    #[case(20.0, "A")]
    #[case(-19.9, "C")]
    #[case(-20.0, "A")]
    fn threshold_is_twice_the_radius(#[case] end_x: f32, #[case] expected_curve: &str) {
        let path = route_edge(Point::new(0.0, 0.0), Point::new(end_x, 40.0), 10.0, 40.0);
        assert!(kinds(&path).iter().any(|kind| *kind == expected_curve));
    }

    #[test]
    fn threshold_is_tunable() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(25.0, 40.0);
        let default = route_edge(start, end, 10.0, 40.0);
        assert_eq!(kinds(&default), vec!["M", "L", "A", "L", "A", "L"]);
        let wide = route_edge_with_threshold(start, end, 10.0, 40.0, 3.0);
        assert_eq!(kinds(&wide), vec!["M", "L", "C", "L"]);
    }

    #[test]
    fn large_offset_to_the_right_turns_counterclockwise_then_clockwise() {
        let path = route_edge(Point::new(50.0, 40.0), Point::new(160.0, 80.0), 10.0, 40.0);
        assert_eq!(kinds(&path), vec!["M", "L", "A", "L", "A", "L"]);
        assert_eq!(path.segments[1].end(), Point::new(50.0, 50.0));
        match path.segments[2] {
            PathSegment::ArcTo {
                corner,
                to,
                radius,
                clockwise,
            } => {
                assert_eq!(corner, Point::new(50.0, 60.0));
                assert_eq!(to, Point::new(60.0, 60.0));
                assert_eq!(radius, 10.0);
                assert!(!clockwise);
            }
            other => panic!("unexpected segment {other:?}"),
        }
        assert_eq!(path.segments[3].end(), Point::new(150.0, 60.0));
        match path.segments[4] {
            PathSegment::ArcTo { to, clockwise, .. } => {
                assert_eq!(to, Point::new(160.0, 70.0));
                assert!(clockwise);
            }
            other => panic!("unexpected segment {other:?}"),
        }
        assert_eq!(path.end(), Some(Point::new(160.0, 80.0)));
    }

    #[test]
    fn large_offset_to_the_left_mirrors_the_turns() {
        let path = route_edge(Point::new(160.0, 40.0), Point::new(50.0, 80.0), 10.0, 40.0);
        let arcs: Vec<(Point, bool)> = path
            .segments
            .iter()
            .filter_map(|segment| match *segment {
                PathSegment::ArcTo { to, clockwise, .. } => Some((to, clockwise)),
                _ => None,
            })
            .collect();
        assert_eq!(
            arcs,
            vec![
                (Point::new(150.0, 60.0), true),
                (Point::new(50.0, 70.0), false),
            ]
        );
        assert_eq!(path.segments[3].end(), Point::new(60.0, 60.0));
    }

    #[test]
    fn bend_height_ignores_child_position() {
        let a = route_edge(Point::new(0.0, 0.0), Point::new(200.0, 40.0), 10.0, 40.0);
        let b = route_edge(Point::new(0.0, 0.0), Point::new(200.0, 400.0), 10.0, 40.0);
        assert_eq!(a.segments[3].end().y, 20.0);
        assert_eq!(b.segments[3].end().y, 20.0);
    }

    #[test]
    fn svg_path_data() {
        let straight = route_edge(Point::new(1.0, 2.0), Point::new(1.0, 3.0), 10.0, 40.0);
        assert_eq!(straight.to_svg_path(), "M 1.00 2.00 L 1.00 3.00");
        let rounded = route_edge(Point::new(0.0, 0.0), Point::new(100.0, 40.0), 10.0, 40.0);
        let d = rounded.to_svg_path();
        assert!(d.starts_with("M 0.00 0.00 L 0.00 10.00 A 10.00 10.00 0 0 0 10.00 20.00"));
        assert!(d.ends_with("A 10.00 10.00 0 0 1 100.00 30.00 L 100.00 40.00"));
    }

    #[test]
    fn polyline_and_translation() {
        let path = route_edge(Point::new(0.0, 0.0), Point::new(5.0, 40.0), 10.0, 40.0);
        assert_eq!(path.polyline().len(), 6);
        let moved = path.translated(10.0, 5.0);
        assert_eq!(moved.start(), Some(Point::new(10.0, 5.0)));
        assert_eq!(moved.end(), Some(Point::new(15.0, 45.0)));
        assert_eq!(moved.curves().count(), 1);
    }
}
