use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

const EARTH_RADIUS_KM: f64 = 6371.0;
const JERUSALEM: (f64, f64) = (31.7683, 35.2137);
const JERUSALEM_RADIUS_KM: f64 = 500.0;
/// Long-run monthly count of M4.5+ events used as the acceleration baseline.
const HISTORICAL_MONTHLY_AVERAGE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Earthquake {
    pub id: String,
    pub magnitude: f64,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_km: f64,
    pub time: DateTime<Utc>,
}

impl Earthquake {
    pub fn is_significant(&self) -> bool {
        self.magnitude >= 5.0
    }

    pub fn is_major(&self) -> bool {
        self.magnitude >= 7.0
    }

    pub fn is_prophetically_relevant(&self) -> bool {
        let near_jerusalem = haversine_km((self.latitude, self.longitude), JERUSALEM)
            <= JERUSALEM_RADIUS_KM;
        let near_mediterranean = self.longitude > -10.0
            && self.longitude < 40.0
            && self.latitude > 30.0
            && self.latitude < 45.0;
        let near_ring_of_fire = (self.longitude > 100.0 && self.longitude < 180.0)
            || (self.longitude > -180.0 && self.longitude < -60.0);

        self.is_significant() && (near_jerusalem || near_mediterranean || near_ring_of_fire)
    }

    fn grid_cell(&self) -> (i32, i32) {
        ((self.latitude / 10.0) as i32, (self.longitude / 10.0) as i32)
    }
}

fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;
    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Activity figure folded into the earthquake condition after each feed poll.
///
/// Significant quake count over 100, scaled by the number of distinct
/// locations over 10.
pub fn activity_score(earthquakes: &[Earthquake]) -> f64 {
    let significant: Vec<&Earthquake> = earthquakes.iter().filter(|q| q.is_significant()).collect();
    let locations: HashSet<&str> = significant.iter().map(|q| q.location.as_str()).collect();
    significant.len() as f64 / 100.0 * locations.len() as f64 / 10.0
}

/// Aggregate frequency statistics over a polling span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarthquakeFrequency {
    pub total: usize,
    pub by_magnitude: BTreeMap<i32, usize>,
    pub diverse_locations: usize,
    pub average_per_month: f64,
    pub significant: usize,
    pub prophetically_relevant: usize,
}

impl EarthquakeFrequency {
    pub fn from_events(earthquakes: &[Earthquake], days: u32) -> Self {
        let mut by_magnitude = BTreeMap::new();
        for quake in earthquakes {
            *by_magnitude.entry(quake.magnitude as i32).or_insert(0) += 1;
        }

        let diverse_locations = earthquakes
            .iter()
            .map(Earthquake::grid_cell)
            .collect::<HashSet<_>>()
            .len();

        let months = (days / 30).max(1) as f64;

        Self {
            total: earthquakes.len(),
            by_magnitude,
            diverse_locations,
            average_per_month: earthquakes.len() as f64 / months,
            significant: earthquakes.iter().filter(|q| q.is_significant()).count(),
            prophetically_relevant: earthquakes
                .iter()
                .filter(|q| q.is_prophetically_relevant())
                .count(),
        }
    }

    pub fn diversity_score(&self) -> f64 {
        self.diverse_locations as f64 / self.total.max(1) as f64 * 100.0
    }

    pub fn acceleration_score(&self) -> f64 {
        self.average_per_month / HISTORICAL_MONTHLY_AVERAGE * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn quake(magnitude: f64, location: &str, latitude: f64, longitude: f64) -> Earthquake {
        Earthquake {
            id: format!("{location}-{magnitude}"),
            magnitude,
            location: location.to_string(),
            latitude,
            longitude,
            depth_km: 10.0,
            time: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn relevance_regions() {
        assert!(quake(5.4, "Dead Sea", 31.5, 35.5).is_prophetically_relevant());
        assert!(quake(6.1, "Aegean Sea", 38.0, 25.0).is_prophetically_relevant());
        assert!(quake(6.8, "Honshu", 36.0, 140.0).is_prophetically_relevant());
        assert!(!quake(6.0, "Mid-Atlantic Ridge", 0.0, -25.0).is_prophetically_relevant());
        assert!(!quake(4.9, "Dead Sea", 31.5, 35.5).is_prophetically_relevant());
    }

    #[test]
    fn haversine_matches_known_distance() {
        // Jerusalem to Cairo is roughly 425 km.
        let distance = haversine_km(JERUSALEM, (30.0444, 31.2357));
        assert!((distance - 425.0).abs() < 15.0, "got {distance}");
    }

    #[test]
    fn activity_score_scales_with_count_and_spread() {
        let quakes = vec![
            quake(5.5, "Chile", -33.0, -71.0),
            quake(6.0, "Chile", -34.0, -71.5),
            quake(5.1, "Japan", 36.0, 140.0),
            quake(4.2, "Nevada", 38.0, -117.0),
        ];
        // 3 significant over 100, 2 locations over 10.
        assert!((activity_score(&quakes) - 0.006).abs() < 1e-12);
        assert_eq!(activity_score(&[]), 0.0);
    }

    #[test]
    fn frequency_groups_by_magnitude_and_grid() {
        let quakes = vec![
            quake(4.6, "Chile", -33.0, -71.0),
            quake(4.9, "Chile", -33.5, -71.2),
            quake(7.2, "Alaska", 61.0, -150.0),
        ];
        let frequency = EarthquakeFrequency::from_events(&quakes, 60);

        assert_eq!(frequency.total, 3);
        assert_eq!(frequency.by_magnitude.get(&4), Some(&2));
        assert_eq!(frequency.by_magnitude.get(&7), Some(&1));
        assert_eq!(frequency.diverse_locations, 2);
        assert_eq!(frequency.average_per_month, 1.5);
        assert_eq!(frequency.significant, 1);
        assert!((frequency.acceleration_score() - 3.0).abs() < 1e-12);
    }
}
