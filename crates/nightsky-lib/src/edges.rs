//! Constellation line segments between visible stars.

use serde::Serialize;

use crate::coords::EquatorialPosition;
use crate::sky::Constellation;
use crate::visibility::VisibilityResult;

/// Segments spanning at least this much right ascension are treated as
/// crossing the 0°/360° seam and are not drawn.
pub const RA_WRAP_THRESHOLD_DEG: f64 = 180.0;

/// A drawable segment between two visible stars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderableEdge {
    pub from: EquatorialPosition,
    pub to: EquatorialPosition,
    /// `|from.ra - to.ra| >= RA_WRAP_THRESHOLD_DEG`.
    pub wraps: bool,
}

impl RenderableEdge {
    fn between(from: EquatorialPosition, to: EquatorialPosition) -> Self {
        Self {
            from,
            to,
            wraps: (from.ra - to.ra).abs() >= RA_WRAP_THRESHOLD_DEG,
        }
    }
}

/// Every segment whose endpoints are both visible, wrapping or not, in
/// constellation order then segment order.
pub fn classify_edges(
    constellations: &[Constellation],
    visibility: &VisibilityResult,
) -> Vec<RenderableEdge> {
    constellations
        .iter()
        .flat_map(|constellation| constellation.segments())
        .filter_map(|(a, b)| {
            let from = visibility.get(a)?;
            let to = visibility.get(b)?;
            Some(RenderableEdge::between(*from, *to))
        })
        .collect()
}

/// Segments to draw: both endpoints visible and not crossing the RA seam.
pub fn build_edges(
    constellations: &[Constellation],
    visibility: &VisibilityResult,
) -> Vec<RenderableEdge> {
    classify_edges(constellations, visibility)
        .into_iter()
        .filter(|edge| !edge.wraps)
        .collect()
}
