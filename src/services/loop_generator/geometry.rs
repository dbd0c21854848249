//! Planar geometry over lat/lng pairs.
//!
//! Everything here treats degrees as a flat x/y plane (`x = lng`, `y = lat`).
//! That is fine for boundaries a few kilometers across, which is all a
//! user-drawn running area ever is.

use crate::constants::MIN_BOUNDARY_VERTICES;
use crate::models::Coordinates;

/// Returns the polygon when it has enough vertices to constrain anything.
pub fn active_boundary(boundary: Option<&[Coordinates]>) -> Option<&[Coordinates]> {
    boundary.filter(|polygon| polygon.len() >= MIN_BOUNDARY_VERTICES)
}

/// Even-odd ray cast along the point's latitude. The ring is implicitly
/// closed. Points exactly on an edge may land either way.
pub fn point_in_polygon(point: &Coordinates, polygon: &[Coordinates]) -> bool {
    if polygon.len() < MIN_BOUNDARY_VERTICES {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (&polygon[i], &polygon[j]);
        if (a.lat > point.lat) != (b.lat > point.lat) {
            let crossing_lng = (b.lng - a.lng) * (point.lat - a.lat) / (b.lat - a.lat) + a.lng;
            if point.lng < crossing_lng {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Nearest point to `point` on the closed segment `seg_start..seg_end`.
pub fn project_to_segment(
    point: &Coordinates,
    seg_start: &Coordinates,
    seg_end: &Coordinates,
) -> Coordinates {
    let dx = seg_end.lng - seg_start.lng;
    let dy = seg_end.lat - seg_start.lat;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0.0 {
        return *seg_start;
    }

    let t = ((point.lng - seg_start.lng) * dx + (point.lat - seg_start.lat) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);

    Coordinates {
        lat: seg_start.lat + t * dy,
        lng: seg_start.lng + t * dx,
    }
}

/// Unweighted vertex centroid.
pub fn polygon_centroid(polygon: &[Coordinates]) -> Coordinates {
    let n = polygon.len().max(1) as f64;
    let (lat_sum, lng_sum) = polygon
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));

    Coordinates {
        lat: lat_sum / n,
        lng: lng_sum / n,
    }
}

/// Closest point on any edge of the ring, with no nudging.
pub fn nearest_boundary_point(point: &Coordinates, polygon: &[Coordinates]) -> Coordinates {
    let mut best = *point;
    let mut best_dist = f64::INFINITY;

    let mut j = polygon.len().saturating_sub(1);
    for i in 0..polygon.len() {
        let candidate = project_to_segment(point, &polygon[j], &polygon[i]);
        let dist = point.distance_sq_deg(&candidate);
        if dist < best_dist {
            best_dist = dist;
            best = candidate;
        }
        j = i;
    }

    best
}

/// Closest boundary point, moved `nudge_fraction` of the way toward the
/// centroid so it tests as interior. Only call this for points that already
/// fail [`point_in_polygon`].
///
/// On concave rings the centroid can sit outside (the notch of a U, the
/// corner of an L), so a nudge that does not land inside falls back to
/// [`interior_point_near`]. The result is only outside for a ring with no
/// area at all.
pub fn nearest_point_on_polygon(
    point: &Coordinates,
    polygon: &[Coordinates],
    nudge_fraction: f64,
) -> Coordinates {
    let edge_point = nearest_boundary_point(point, polygon);
    let centroid = polygon_centroid(polygon);

    let nudged = Coordinates {
        lat: edge_point.lat + nudge_fraction * (centroid.lat - edge_point.lat),
        lng: edge_point.lng + nudge_fraction * (centroid.lng - edge_point.lng),
    };
    if point_in_polygon(&nudged, polygon) {
        return nudged;
    }

    interior_point_near(&edge_point, polygon, nudge_fraction).unwrap_or(nudged)
}

/// Interior point close to `target`, found on horizontal scan lines.
///
/// Scan lines run through `target` itself and halfway between each pair of
/// neighbouring vertex latitudes, where no vertex can sit on the line. Each
/// line is cut into inside spans by the same crossing rule as
/// [`point_in_polygon`]; `target` is clamped into every span, kept
/// `margin` of the span width away from its ends. The candidate nearest to
/// `target` that passes [`point_in_polygon`] wins.
pub fn interior_point_near(
    target: &Coordinates,
    polygon: &[Coordinates],
    margin: f64,
) -> Option<Coordinates> {
    if polygon.len() < MIN_BOUNDARY_VERTICES {
        return None;
    }

    let mut lats: Vec<f64> = polygon.iter().map(|p| p.lat).collect();
    lats.sort_by(f64::total_cmp);
    lats.dedup();

    let mut scan_lats = vec![target.lat];
    scan_lats.extend(lats.windows(2).map(|w| (w[0] + w[1]) / 2.0));

    let margin = margin.clamp(0.0, 0.45);
    let mut best: Option<(f64, Coordinates)> = None;

    for lat in scan_lats {
        let crossings = scan_line_crossings(lat, polygon);
        for span in crossings.chunks_exact(2) {
            let width = span[1] - span[0];
            if width <= 0.0 {
                continue;
            }
            let lng = target
                .lng
                .clamp(span[0] + margin * width, span[1] - margin * width);
            let candidate = Coordinates { lat, lng };
            if !point_in_polygon(&candidate, polygon) {
                continue;
            }

            let dist = target.distance_sq_deg(&candidate);
            if best.map_or(true, |(best_dist, _)| dist < best_dist) {
                best = Some((dist, candidate));
            }
        }
    }

    best.map(|(_, point)| point)
}

/// Sorted longitudes where the ring crosses the line at `lat`
fn scan_line_crossings(lat: f64, polygon: &[Coordinates]) -> Vec<f64> {
    let mut crossings = Vec::new();
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (&polygon[i], &polygon[j]);
        if (a.lat > lat) != (b.lat > lat) {
            crossings.push((b.lng - a.lng) * (lat - a.lat) / (b.lat - a.lat) + a.lng);
        }
        j = i;
    }
    crossings.sort_by(f64::total_cmp);
    crossings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinates {
        Coordinates { lat, lng }
    }

    fn unit_square() -> Vec<Coordinates> {
        vec![c(0.0, 0.0), c(0.0, 1.0), c(1.0, 1.0), c(1.0, 0.0)]
    }

    /// "L" shape with the re-entrant corner around (1.5, 1.5)
    fn l_shape() -> Vec<Coordinates> {
        vec![
            c(0.0, 0.0),
            c(0.0, 2.0),
            c(1.0, 2.0),
            c(1.0, 1.0),
            c(2.0, 1.0),
            c(2.0, 0.0),
        ]
    }

    #[test]
    fn test_point_in_square() {
        let square = unit_square();
        assert!(point_in_polygon(&c(0.5, 0.5), &square));
        assert!(point_in_polygon(&c(0.01, 0.99), &square));
        assert!(!point_in_polygon(&c(1.5, 0.5), &square));
        assert!(!point_in_polygon(&c(-10.0, -10.0), &square));
        assert!(!point_in_polygon(&c(0.5, 100.0), &square));
    }

    #[test]
    fn test_point_in_concave_polygon() {
        let l = l_shape();
        assert!(point_in_polygon(&c(0.5, 0.5), &l));
        assert!(point_in_polygon(&c(0.5, 1.5), &l));
        assert!(point_in_polygon(&c(1.5, 0.5), &l));
        // re-entrant corner is outside
        assert!(!point_in_polygon(&c(1.5, 1.5), &l));
    }

    #[test]
    fn test_degenerate_polygon_contains_nothing() {
        let line = vec![c(0.0, 0.0), c(1.0, 1.0)];
        assert!(!point_in_polygon(&c(0.5, 0.5), &line));
        assert!(active_boundary(Some(line.as_slice())).is_none());
        assert!(active_boundary(None).is_none());
        assert!(active_boundary(Some(unit_square().as_slice())).is_some());
    }

    #[test]
    fn test_project_to_segment_clamps() {
        let a = c(0.0, 0.0);
        let b = c(0.0, 10.0);

        // interior projection
        assert_eq!(project_to_segment(&c(3.0, 4.0), &a, &b), c(0.0, 4.0));
        // before the start clamps to t = 0
        assert_eq!(project_to_segment(&c(2.0, -5.0), &a, &b), a);
        // past the end clamps to t = 1
        assert_eq!(project_to_segment(&c(-2.0, 15.0), &a, &b), b);
    }

    #[test]
    fn test_project_to_zero_length_segment() {
        let a = c(40.71, -74.0);
        assert_eq!(project_to_segment(&c(41.0, -73.0), &a, &a), a);
    }

    #[test]
    fn test_polygon_centroid_is_vertex_mean() {
        assert_eq!(polygon_centroid(&unit_square()), c(0.5, 0.5));

        // vertex mean, not area centroid: duplicate vertex pulls it
        let skewed = vec![c(0.0, 0.0), c(0.0, 1.0), c(1.0, 1.0), c(1.0, 0.0), c(1.0, 0.0)];
        let centroid = polygon_centroid(&skewed);
        assert!((centroid.lat - 0.6).abs() < 1e-12);
        assert!((centroid.lng - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_boundary_point_picks_closest_edge() {
        let square = unit_square();
        assert_eq!(nearest_boundary_point(&c(0.5, 3.0), &square), c(0.5, 1.0));
        assert_eq!(nearest_boundary_point(&c(-2.0, 0.3), &square), c(0.0, 0.3));
        assert_eq!(nearest_boundary_point(&c(5.0, 5.0), &square), c(1.0, 1.0));
    }

    #[test]
    fn test_nearest_point_on_polygon_nudges_inside() {
        let square = unit_square();
        let result = nearest_point_on_polygon(&c(0.5, 3.0), &square, 0.02);
        // 2% from (0.5, 1.0) toward (0.5, 0.5)
        assert!((result.lat - 0.5).abs() < 1e-12);
        assert!((result.lng - 0.99).abs() < 1e-12);
        assert!(point_in_polygon(&result, &square));
    }

    #[test]
    fn test_nearest_point_on_polygon_always_inside_convex() {
        let square = unit_square();
        let outside = [
            c(-3.0, -3.0),
            c(-1.0, 0.5),
            c(0.5, -7.0),
            c(2.0, 2.0),
            c(1.0000001, 0.25),
            c(40.0, -12.0),
        ];
        for point in outside {
            assert!(!point_in_polygon(&point, &square));
            let inside = nearest_point_on_polygon(&point, &square, 0.02);
            assert!(
                point_in_polygon(&inside, &square),
                "{:?} projected to {:?} which is outside",
                point,
                inside
            );
        }
    }

    /// Ring open to the east; its vertex centroid sits in the notch
    fn u_shape() -> Vec<Coordinates> {
        vec![
            c(0.0, 0.0),
            c(0.0, 10.0),
            c(1.0, 10.0),
            c(1.0, 1.0),
            c(9.0, 1.0),
            c(9.0, 10.0),
            c(10.0, 10.0),
            c(10.0, 0.0),
        ]
    }

    #[test]
    fn test_nearest_point_on_polygon_inside_l_corner() {
        let l = l_shape();
        let corner = c(1.5, 1.5);
        assert!(!point_in_polygon(&corner, &l));
        // the vertex centroid is the re-entrant vertex itself
        assert_eq!(polygon_centroid(&l), c(1.0, 1.0));

        let result = nearest_point_on_polygon(&corner, &l, 0.02);
        assert!(point_in_polygon(&result, &l), "{:?} is outside", result);
    }

    #[test]
    fn test_nearest_point_on_polygon_always_inside_concave() {
        let shapes = [l_shape(), u_shape()];
        for shape in &shapes {
            let mut checked = 0;
            for i in 0..45 {
                for j in 0..45 {
                    let p = c(-1.0 + i as f64 * 0.2731, -1.0 + j as f64 * 0.2731);
                    if point_in_polygon(&p, shape) {
                        continue;
                    }
                    checked += 1;
                    let inside = nearest_point_on_polygon(&p, shape, 0.02);
                    assert!(
                        point_in_polygon(&inside, shape),
                        "{:?} projected to {:?} which is outside",
                        p,
                        inside
                    );
                }
            }
            assert!(checked > 0);
        }
    }

    #[test]
    fn test_interior_point_near_stays_close() {
        let u = u_shape();
        let notch = c(5.0, 5.0);
        assert!(!point_in_polygon(&notch, &u));
        assert!(!point_in_polygon(&polygon_centroid(&u), &u));

        let edge_point = c(1.0, 5.0);
        let inside = interior_point_near(&edge_point, &u, 0.02).unwrap();
        assert!(point_in_polygon(&inside, &u));
        // lands in the bottom arm, not across the notch
        assert!(inside.lat < 1.0);
        assert!((inside.lng - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_interior_point_near_needs_area() {
        let flat = vec![c(0.0, 0.0), c(0.0, 1.0), c(0.0, 2.0)];
        assert!(interior_point_near(&c(1.0, 1.0), &flat, 0.02).is_none());
        assert!(interior_point_near(&c(1.0, 1.0), &flat[..2], 0.02).is_none());
    }

    #[test]
    fn test_agrees_with_geo_contains() {
        use geo::{Contains, LineString, Point, Polygon};

        let l = l_shape();
        let ring: LineString<f64> = l.iter().map(|p| (p.lng, p.lat)).collect::<Vec<_>>().into();
        let polygon = Polygon::new(ring, vec![]);

        for i in 0..40 {
            for j in 0..40 {
                // offset the grid so no sample sits on an edge
                let p = c(-0.5 + i as f64 * 0.0731, -0.5 + j as f64 * 0.0731);
                assert_eq!(
                    point_in_polygon(&p, &l),
                    polygon.contains(&Point::new(p.lng, p.lat)),
                    "disagreement at {:?}",
                    p
                );
            }
        }
    }
}
