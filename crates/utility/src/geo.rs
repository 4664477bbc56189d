//! Great-circle math on a spherical earth.

/// Mean earth radius used for every distance in this workspace.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Axis aligned box of roughly `radius_km` around a point, as
/// `((min_lat, min_lon), (max_lat, max_lon))` in degrees.
///
/// Only meant as a cheap prefilter before the exact haversine check, so it
/// is clamped to valid coordinates rather than wrapped around the poles or
/// the antimeridian.
pub fn calculate_bounding_box(
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> ((f64, f64), (f64, f64)) {
    let lat_rad = to_radians(lat);
    let lon_rad = to_radians(lon);

    let min_lat = lat_rad - radius_km / EARTH_RADIUS_KM;
    let max_lat = lat_rad + radius_km / EARTH_RADIUS_KM;

    // longitude degrees shrink towards the poles
    let lon_delta = match lat_rad.cos() {
        cos if cos.abs() < f64::EPSILON => std::f64::consts::PI,
        cos => radius_km / (EARTH_RADIUS_KM * cos.abs()),
    };
    let min_lon = lon_rad - lon_delta;
    let max_lon = lon_rad + lon_delta;

    (
        (
            to_degrees(min_lat).max(-90.0),
            to_degrees(min_lon).max(-180.0),
        ),
        (to_degrees(max_lat).min(90.0), to_degrees(max_lon).min(180.0)),
    )
}

/// Haversine distance in kilometers between two points given in degrees.
///
/// Pure and symmetric; `haversine_distance(a, a) == 0`. Coordinates outside
/// the valid latitude/longitude ranges are not checked.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine_distance(13.263018, 80.027427, 13.263018, 80.027427), 0.0);
        assert_eq!(haversine_distance(-45.0, 170.0, -45.0, 170.0), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let points = [
            (13.263018, 80.027427),
            (13.259708, 80.025416),
            (28.675015901626473, 77.21675859763418),
            (-33.8688, 151.2093),
            (0.0, 0.0),
        ];
        for &(lat1, lon1) in &points {
            for &(lat2, lon2) in &points {
                let there = haversine_distance(lat1, lon1, lat2, lon2);
                let back = haversine_distance(lat2, lon2, lat1, lon1);
                assert!((there - back).abs() < EPSILON, "{there} != {back}");
            }
        }
    }

    #[test]
    fn one_degree_along_equator() {
        // 2 * pi * 6371 / 360
        let expected = 111.19492664455873;
        let distance = haversine_distance(0.0, 0.0, 0.0, 1.0);
        assert!((distance - expected).abs() < 1e-6, "{distance}");
    }

    #[test]
    fn chennai_to_delhi() {
        let distance = haversine_distance(
            13.080917019874969,
            80.26358605588356,
            28.675015901626473,
            77.21675859763418,
        );
        assert!((distance - 1760.0).abs() < 15.0, "{distance}");
    }

    #[test]
    fn bounding_box_contains_center() {
        let ((min_lat, min_lon), (max_lat, max_lon)) =
            calculate_bounding_box(13.2626, 80.0270, 0.5);
        assert!(min_lat < 13.2626 && 13.2626 < max_lat);
        assert!(min_lon < 80.0270 && 80.0270 < max_lon);
        // half a kilometer is well below a hundredth of a degree here
        assert!(max_lat - min_lat < 0.01);
    }

    #[test]
    fn bounding_box_is_clamped_at_the_pole() {
        let ((min_lat, min_lon), (max_lat, max_lon)) =
            calculate_bounding_box(90.0, 0.0, 10.0);
        assert_eq!(max_lat, 90.0);
        assert!(min_lat < 90.0);
        assert_eq!(min_lon, -180.0);
        assert_eq!(max_lon, 180.0);
    }
}
