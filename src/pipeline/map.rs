//! Country frequency aggregation for the accident map.
//!
//! Unlike every other view this one runs over the full, unfiltered dataset;
//! the year-range selector deliberately does not apply to the map.

use std::collections::HashMap;

use crate::loader::Dataset;
use crate::pipeline::types::CountryPoint;

/// Marker radius is the country's accident count divided by this constant.
pub const MARKER_RADIUS_DIVISOR: f64 = 30.0;

impl CountryPoint {
    /// Circle-marker radius for the map widget.
    pub fn marker_radius(&self) -> f64 {
        self.accidents as f64 / MARKER_RADIUS_DIVISOR
    }
}

/// One marker per country that has at least one row with a valid coordinate.
///
/// The coordinate is the first valid pair encountered in table order; later
/// rows with different coordinates for the same country are ignored. The
/// accident count covers every row of the country, coordinates or not.
/// Countries with no valid coordinate at all are excluded, not zero-filled.
/// Output order is pinned: descending count, then country name.
pub fn country_frequency_map(dataset: &Dataset) -> Vec<CountryPoint> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    let mut first_coords: HashMap<&str, (f64, f64)> = HashMap::new();

    for record in dataset.records() {
        let country = record.country.as_str();
        if country.is_empty() {
            continue;
        }

        *counts.entry(country).or_default() += 1;

        if let Some(coord) = record.coordinate() {
            first_coords.entry(country).or_insert(coord);
        }
    }

    let mut points: Vec<CountryPoint> = first_coords
        .into_iter()
        .map(|(country, (latitude, longitude))| CountryPoint {
            country: country.to_string(),
            latitude,
            longitude,
            accidents: counts[country],
        })
        .collect();

    points.sort_by(|a, b| {
        b.accidents
            .cmp(&a.accidents)
            .then_with(|| a.country.cmp(&b.country))
    });
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Dataset;

    const CSV: &str = "\
fecha,all_aboard,cantidad de fallecidos,ac_type_clasif2,Ruta_continente,Ruta_pais,Ruta_lat,Ruta_lon
2000-01-10,100,20,Avión,Americas,Argentina,-34.6,-58.4
2000-02-11,40,10,Avión,Americas,Argentina,-31.4,-64.2
2000-03-05,30,5,Avión,Europe,Spain,,
2000-04-01,25,2,Avión,Europe,Spain,40.4,-3.7
2000-05-09,20,1,Avión,Asia,Nepal,,
2000-06-20,50,50,Helicóptero,Europe,France,48.8,2.3
";

    fn points() -> Vec<CountryPoint> {
        let ds = Dataset::from_reader(CSV.as_bytes()).unwrap();
        country_frequency_map(&ds)
    }

    #[test]
    fn test_first_seen_coordinate_wins() {
        let argentina = points()
            .into_iter()
            .find(|p| p.country == "Argentina")
            .unwrap();
        assert_eq!((argentina.latitude, argentina.longitude), (-34.6, -58.4));
        assert_eq!(argentina.accidents, 2);
    }

    #[test]
    fn test_count_includes_coordinate_less_rows() {
        // Spain's first row has no coordinates; the second supplies them
        // and the count still covers both rows.
        let spain = points().into_iter().find(|p| p.country == "Spain").unwrap();
        assert_eq!((spain.latitude, spain.longitude), (40.4, -3.7));
        assert_eq!(spain.accidents, 2);
    }

    #[test]
    fn test_country_without_coordinates_excluded() {
        assert!(points().iter().all(|p| p.country != "Nepal"));
    }

    #[test]
    fn test_every_point_has_at_least_one_accident() {
        let pts = points();
        assert!(!pts.is_empty());
        assert!(pts.iter().all(|p| p.accidents >= 1));
    }

    #[test]
    fn test_deterministic_order() {
        let pts = points();
        // Two-count countries first, name-sorted, then France.
        let names: Vec<&str> = pts.iter().map(|p| p.country.as_str()).collect();
        assert_eq!(names, vec!["Argentina", "Spain", "France"]);
    }

    #[test]
    fn test_marker_radius_scaling() {
        let argentina = points()
            .into_iter()
            .find(|p| p.country == "Argentina")
            .unwrap();
        assert!((argentina.marker_radius() - 2.0 / 30.0).abs() < 1e-12);
    }
}
