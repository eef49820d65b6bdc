//! One-call entry point for renderers: night window, visible stars, and
//! drawable constellation segments for an observer and date.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::config::ObservingConfig;
use crate::coords::GeoCoordinates;
use crate::edges::{build_edges, RenderableEdge};
use crate::error::Result;
use crate::night::{night_window, NightWindow};
use crate::sky::SkyCatalog;
use crate::visibility::{visible_tonight, VisibilityResult};

/// Everything needed to plot tonight's sky in RA/Dec.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkyReport {
    pub observer: GeoCoordinates,
    pub date: NaiveDate,
    pub window: NightWindow,
    /// Number of instants sampled across the window.
    pub samples: usize,
    pub visible: VisibilityResult,
    pub edges: Vec<RenderableEdge>,
}

/// Compute the sky report for `latitude`/`longitude` on the evening of `date`.
///
/// Coordinates are validated before any computation; invalid input yields
/// [`crate::Error::InvalidCoordinates`].
pub fn compute_sky_report(
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
    catalog: &SkyCatalog,
    config: &ObservingConfig,
) -> Result<SkyReport> {
    let observer = GeoCoordinates::new(latitude, longitude)?;
    sky_report_for(&observer, date, catalog, config)
}

/// Same as [`compute_sky_report`] for already validated coordinates.
pub fn sky_report_for(
    observer: &GeoCoordinates,
    date: NaiveDate,
    catalog: &SkyCatalog,
    config: &ObservingConfig,
) -> Result<SkyReport> {
    let window = night_window(observer, date, config)?;
    let visible = visible_tonight(observer, &window, &catalog.objects, config)?;
    let edges = build_edges(&catalog.constellations, &visible);

    info!(
        %date,
        visible = visible.len(),
        edges = edges.len(),
        "computed sky report"
    );

    Ok(SkyReport {
        observer: *observer,
        date,
        samples: window.sample_count(config.sample_interval),
        window,
        visible,
        edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sky::{Constellation, SkyObject};

    fn catalog() -> SkyCatalog {
        SkyCatalog {
            objects: vec![
                SkyObject::new("HIP 1", 0.0, 51.5),
                SkyObject::new("HIP 2", 10.0, 60.0),
                SkyObject::new("HIP 3", 350.0, 70.0),
                SkyObject::new("HIP 4", 0.0, -80.0),
            ],
            constellations: vec![Constellation {
                name: "Tst".into(),
                stars: vec!["HIP 1".into(), "HIP 2".into(), "HIP 3".into(), "HIP 4".into()],
            }],
        }
    }

    #[test]
    fn london_report_filters_invisible_and_wrapping_segments() {
        let date = NaiveDate::from_ymd_opt(2024, 10, 15).unwrap();
        let report =
            compute_sky_report(51.5, -0.1, date, &catalog(), &ObservingConfig::default()).unwrap();

        assert!(report.visible.contains("HIP 1"));
        assert!(report.visible.contains("HIP 2"));
        assert!(report.visible.contains("HIP 3"));
        assert!(!report.visible.contains("HIP 4"));

        // HIP 1 -> HIP 2 drawn, HIP 2 -> HIP 3 crosses the seam, HIP 4 is below.
        assert_eq!(report.edges.len(), 1);
        assert_eq!(report.edges[0].to.ra, 10.0);
        assert!(report.samples > 20);
    }

    #[test]
    fn invalid_coordinates_fail_before_computation() {
        let date = NaiveDate::from_ymd_opt(2024, 10, 15).unwrap();
        let err = compute_sky_report(95.0, 0.0, date, &catalog(), &ObservingConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinates { .. }));
    }

    #[test]
    fn report_serializes_for_renderers() {
        let date = NaiveDate::from_ymd_opt(2024, 10, 15).unwrap();
        let report =
            compute_sky_report(51.5, -0.1, date, &catalog(), &ObservingConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["visible"]["HIP 1"]["dec"], 51.5);
        assert!(json["window"]["sunset"].is_string());
        assert_eq!(json["edges"][0]["wraps"], false);
    }
}
