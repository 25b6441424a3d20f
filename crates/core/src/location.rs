//! Approximate crash locations for the approval map.
//!
//! Cameras do not report coordinates yet, so the map centres on a fixed
//! point per city with a small random offset.

use rand::Rng;
use serde::Serialize;

/// Key of the fallback entry.
const UNKNOWN: &str = "Unknown";

/// Maximum jitter applied to each axis, in degrees.
pub const JITTER_DEGREES: f64 = 0.005;

/// Zoom level used when centring the map on a crash.
pub const MAP_ZOOM: u8 = 15;

/// Radius of the highlighted area around the marker, in metres.
pub const AREA_RADIUS_METRES: u32 = 100;

const CITY_COORDINATES: &[(&str, f64, f64)] = &[
    ("Mumbai", 19.0760, 72.8777),
    ("Delhi", 28.7041, 77.1025),
    ("Bangalore", 12.9716, 77.5946),
    ("Hyderabad", 17.3850, 78.4867),
    ("Chennai", 13.0827, 80.2707),
    ("Kolkata", 22.5726, 88.3639),
    ("Pune", 18.5204, 73.8567),
    ("Ahmedabad", 23.0225, 72.5714),
    ("Jaipur", 26.9124, 75.7873),
    ("Surat", 21.1702, 72.8311),
    ("Lucknow", 26.8467, 80.9462),
    ("Kanpur", 26.4499, 80.3319),
    ("Nagpur", 21.1458, 79.0882),
    ("Indore", 22.7196, 75.8577),
    ("Thane", 19.2183, 72.9781),
    ("Bhopal", 23.2599, 77.4126),
    ("Visakhapatnam", 17.6868, 83.2185),
    ("Patna", 25.5941, 85.1376),
    ("Vadodara", 22.3072, 73.1812),
    ("Ghaziabad", 28.6692, 77.4538),
    ("Ludhiana", 30.9010, 75.8573),
    ("Agra", 27.1767, 78.0081),
    ("Nashik", 19.9975, 73.7898),
    ("Faridabad", 28.4089, 77.3178),
    ("Meerut", 28.9845, 77.7064),
    ("Rajkot", 22.3039, 70.8022),
    ("Kalyan-Dombivali", 19.2402, 73.1305),
    ("Vasai-Virar", 19.4912, 72.8054),
    ("Varanasi", 25.3176, 82.9739),
    ("Srinagar", 34.0837, 74.7973),
    ("Aurangabad", 19.8762, 75.3433),
    ("Dhanbad", 23.7957, 86.4304),
    ("Amritsar", 31.6340, 74.8723),
    ("Navi Mumbai", 19.0330, 73.0297),
    ("Allahabad", 25.4358, 81.8463),
    ("Test City", 28.7041, 77.1025),
    (UNKNOWN, 20.5937, 78.9629),
];

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Fixed coordinates for `city`, falling back to the centre of India.
pub fn city_coordinates(city: Option<&str>) -> GeoPoint {
    let lookup = |name: &str| {
        CITY_COORDINATES
            .iter()
            .find(|(c, _, _)| *c == name)
            .map(|&(_, lat, lng)| GeoPoint { lat, lng })
    };

    city.and_then(lookup)
        .or_else(|| lookup(UNKNOWN))
        .unwrap_or(GeoPoint {
            lat: 20.5937,
            lng: 78.9629,
        })
}

/// City coordinates with up to [`JITTER_DEGREES`] of random offset per axis.
pub fn approximate_location<R: Rng>(city: Option<&str>, rng: &mut R) -> GeoPoint {
    let base = city_coordinates(city);
    GeoPoint {
        lat: base.lat + rng.random_range(-JITTER_DEGREES..=JITTER_DEGREES),
        lng: base.lng + rng.random_range(-JITTER_DEGREES..=JITTER_DEGREES),
    }
}
