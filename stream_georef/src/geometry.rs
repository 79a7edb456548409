//! Planar geometry for stream polylines.

/// Representation of a 2D point.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Calculates the Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Side of a directed polyline a point falls on, looking along the direction
/// of increasing distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    On,
}

/// Result of projecting a point onto a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Nearest point on the polyline.
    pub point: Point,
    /// Distance along the polyline to the nearest point.
    pub distance: f64,
    /// Distance from the input point to the nearest point.
    pub offset: f64,
    /// Side of the polyline the input point lies on.
    pub side: Side,
}

/// Series of connected line segments with distance measured from the first
/// vertex.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polyline {
    pub vertices: Vec<Point>,
}

impl Polyline {
    /// Creates a new polyline from a list of vertices.
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Returns the total length of all segments in the polyline.
    pub fn length(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|pair| distance(pair[0], pair[1]))
            .sum()
    }

    /// Returns the point at the given distance along the polyline, clamped to
    /// its ends. `None` only when the polyline has no vertices.
    pub fn point_at(&self, dist: f64) -> Option<Point> {
        let mut remaining = dist.max(0.0);
        for pair in self.vertices.windows(2) {
            let len = distance(pair[0], pair[1]);
            if remaining <= len {
                if len < f64::EPSILON {
                    return Some(pair[0]);
                }
                let t = remaining / len;
                return Some(Point::new(
                    pair[0].x + t * (pair[1].x - pair[0].x),
                    pair[0].y + t * (pair[1].y - pair[0].y),
                ));
            }
            remaining -= len;
        }
        self.vertices.last().copied()
    }

    /// Projects `target` onto the polyline, returning the nearest point, the
    /// distance along the polyline to it, the offset and the side. `None`
    /// when the polyline has no segments of nonzero length.
    pub fn project(&self, target: Point) -> Option<Projection> {
        let mut best: Option<Projection> = None;
        let mut chainage = 0.0;
        for pair in self.vertices.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let len = distance(a, b);
            if len < f64::EPSILON {
                continue;
            }
            let dx = (b.x - a.x) / len;
            let dy = (b.y - a.y) / len;
            let t = ((target.x - a.x) * dx + (target.y - a.y) * dy).clamp(0.0, len);
            let nearest = Point::new(a.x + t * dx, a.y + t * dy);
            let offset = distance(target, nearest);
            if best.map_or(true, |p| offset < p.offset) {
                let cross = dx * (target.y - a.y) - dy * (target.x - a.x);
                let side = if cross > f64::EPSILON {
                    Side::Left
                } else if cross < -f64::EPSILON {
                    Side::Right
                } else {
                    Side::On
                };
                best = Some(Projection {
                    point: nearest,
                    distance: chainage + t,
                    offset,
                    side,
                });
            }
            chainage += len;
        }
        best
    }
}
