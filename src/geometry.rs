use serde::{Deserialize, Serialize};

/// A point in geographic degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArcConfig {
    /// Curvature intensity: control-point displacement as a fraction of the
    /// endpoint distance.
    pub curve_offset: f64,
    /// Number of segments; the polyline has `steps + 1` points.
    pub steps: usize,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            curve_offset: 0.2,
            steps: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlowArc {
    pub points: Vec<GeoPoint>,
    /// Tangent direction at the polyline midpoint, as a compass-style bearing
    /// in degrees (0 = north, 90 = east). Orients the arrow marker.
    pub midpoint_angle_deg: f64,
}

/// Samples a quadratic Bezier arc between two sites.
///
/// The control point is the straight-line midpoint displaced along the
/// perpendicular of `to - from` (rotated 90 degrees as `(-dy, dx)`), scaled by
/// the curve offset. Being a pure function of the endpoints, every arc bows to
/// the same side of its line.
pub fn flow_arc(from: GeoPoint, to: GeoPoint, config: &ArcConfig) -> FlowArc {
    let steps = config.steps.max(1);
    let mid = GeoPoint::new((from.lon + to.lon) / 2.0, (from.lat + to.lat) / 2.0);
    let dx = to.lon - from.lon;
    let dy = to.lat - from.lat;
    let control = GeoPoint::new(
        mid.lon - dy * config.curve_offset,
        mid.lat + dx * config.curve_offset,
    );

    let mut points = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        points.push(bezier_at(from, control, to, t));
    }
    // Endpoint fidelity regardless of floating-point accumulation.
    points[0] = from;
    points[steps] = to;

    let midpoint_angle_deg = midpoint_angle(&points);

    FlowArc {
        points,
        midpoint_angle_deg,
    }
}

fn bezier_at(from: GeoPoint, control: GeoPoint, to: GeoPoint, t: f64) -> GeoPoint {
    let u = 1.0 - t;
    GeoPoint::new(
        u * u * from.lon + 2.0 * u * t * control.lon + t * t * to.lon,
        u * u * from.lat + 2.0 * u * t * control.lat + t * t * to.lat,
    )
}

// The axis order in atan2 is deliberately swapped from math convention: the
// result is a compass bearing (0 = north, clockwise positive), which is what
// a map arrow wants.
fn midpoint_angle(points: &[GeoPoint]) -> f64 {
    let (before, after) = if points.len() >= 3 {
        let mid = points.len() / 2;
        (points[mid - 1], points[mid + 1])
    } else if points.len() == 2 {
        (points[0], points[1])
    } else {
        return 0.0;
    };
    let dx = after.lon - before.lon;
    let dy = after.lat - before.lat;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    dx.atan2(dy).to_degrees()
}

/// Maps flow magnitudes onto stroke widths by linear interpolation.
#[derive(Debug, Clone, Copy)]
pub struct WidthScale {
    pub min_value: f64,
    pub max_value: f64,
    pub min_width: f32,
    pub max_width: f32,
}

impl WidthScale {
    pub const DEFAULT_MIN_WIDTH: f32 = 2.0;
    pub const DEFAULT_MAX_WIDTH: f32 = 12.0;

    pub fn new(min_value: f64, max_value: f64, min_width: f32, max_width: f32) -> Self {
        Self {
            min_value,
            max_value,
            min_width,
            max_width,
        }
    }

    /// Builds a scale spanning the given magnitudes with the default pixel
    /// range. An empty iterator produces a degenerate scale.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min_value = f64::INFINITY;
        let mut max_value = f64::NEG_INFINITY;
        for value in values {
            min_value = min_value.min(value);
            max_value = max_value.max(value);
        }
        if !min_value.is_finite() || !max_value.is_finite() {
            min_value = 0.0;
            max_value = 0.0;
        }
        Self::new(
            min_value,
            max_value,
            Self::DEFAULT_MIN_WIDTH,
            Self::DEFAULT_MAX_WIDTH,
        )
    }

    /// Width for a magnitude. A degenerate range (all flows equal, or a
    /// single link) yields the middle of the pixel range rather than a
    /// division by zero; out-of-range values clamp. Always finite.
    pub fn width_for(&self, value: f64) -> f32 {
        let range = self.max_value - self.min_value;
        if range <= 0.0 {
            return (self.min_width + self.max_width) / 2.0;
        }
        let t = ((value - self.min_value) / range).clamp(0.0, 1.0) as f32;
        self.min_width + t * (self.max_width - self.min_width)
    }
}
