use common::position::Coordinates;

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance in meters between two geographic
/// positions.
///
/// Uses the haversine formula over a spherical Earth with the mean radius of
/// 6 371 000 m. The error against an ellipsoidal model stays well below
/// 0.5 % for any pair of coordinates, which is sufficient for ranging and
/// proximity decisions on position fixes.
///
/// # Parameters
/// - `p1`: The first geographic position.
/// - `p2`: The second geographic position.
///
/// # Returns
/// The distance between `p1` and `p2` in meters as a `f64`.
///
/// # Notes
/// - Latitude and longitude are expected in **degrees**.
pub fn distance(p1: &Coordinates, p2: &Coordinates) -> f64 {
    let dlat = (p2.latitude - p1.latitude).to_radians();
    let dlon = (p2.longitude - p1.longitude).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + p1.latitude.to_radians().cos() * p2.latitude.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Calculates the initial bearing in degrees from `p1` towards `p2`.
///
/// The result is the forward azimuth a traveler at `p1` would take on the
/// great circle towards `p2`, normalized into `[0, 360)` where 0 is north
/// and 90 is east.
///
/// # Parameters
/// - `p1`: The position the bearing is taken from.
/// - `p2`: The position the bearing points towards.
///
/// # Returns
/// The initial bearing in degrees as a `f64` in `[0, 360)`.
pub fn bearing(p1: &Coordinates, p2: &Coordinates) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let dlon = (p2.longitude - p1.longitude).to_radians();
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let mut brng = y.atan2(x).to_degrees();
    if brng < 0.0 {
        brng += 360.0;
    }
    brng
}
