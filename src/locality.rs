//! Regional location helpers for records that carry a place.

use crate::provider::{choose, ValueProvider};
use serde::{Deserialize, Serialize};

/// Cities used in generated location descriptions
pub const REGIONAL_CITIES: &[&str] = &[
    "Abbotsford", "Burnaby", "Campbell River", "Castlegar", "Chilliwack", "Courtenay",
    "Cranbrook", "Dawson Creek", "Fort St. John", "Kamloops", "Kelowna", "Kitimat", "Langford",
    "Merritt", "Nanaimo", "Nelson", "Osoyoos", "Penticton", "Port Alberni", "Powell River",
    "Prince George", "Prince Rupert", "Quesnel", "Revelstoke", "Smithers", "Squamish",
    "Terrace", "Trail", "Vernon", "Victoria", "Williams Lake",
];

const POSTAL_DISTRICTS: &[u8] = b"XVTSRPNKLMHJGECBA";

// Rough box that keeps points on land: Osoyoos (south), Lower Post (north),
// Terrace (west), Dawson Creek (east).
const LAT_MIN: f64 = 49.0323;
const LAT_MAX: f64 = 59.9238;
const LONG_MIN: f64 = -128.6032;
const LONG_MAX: f64 = -120.2377;
const ALTITUDE_MAX: u64 = 1300;

/// A point inside the regional bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
    pub altitude: u64,
}

impl Coordinates {
    /// `[long, lat]`, the order geo fields expect
    pub fn centroid(&self) -> [f64; 2] {
        [self.long, self.lat]
    }
}

/// Postal code shaped like `V5K 0A1`
pub fn fake_postal_code(provider: &mut dyn ValueProvider) -> String {
    let district = char::from(*choose(provider, POSTAL_DISTRICTS).unwrap_or(&b'V'));
    let mut letter = || char::from(b'A' + provider.number(0, 25) as u8);
    let (l1, l2) = (letter(), letter());
    let mut digit = || char::from(b'0' + provider.number(0, 9) as u8);
    let (d1, d2, d3) = (digit(), digit(), digit());
    format!("{}{}{} {}{}{}", district, d1, l1, d2, l2, d3)
}

pub fn fake_coordinates(provider: &mut dyn ValueProvider) -> Coordinates {
    Coordinates {
        lat: provider.float(LAT_MIN, LAT_MAX),
        long: provider.float(LONG_MIN, LONG_MAX),
        altitude: provider.number(1, ALTITUDE_MAX),
    }
}

/// Description such as `120km NE of Kamloops`
pub fn fake_location_description(provider: &mut dyn ValueProvider) -> String {
    let ns = *choose(provider, &["", "N", "S"]).unwrap_or(&"");
    let ew = *choose(provider, &["", "E", "W"]).unwrap_or(&"");
    let axis = if ns.is_empty() && ew.is_empty() {
        choose(provider, &["N", "S", "E", "W"]).copied().unwrap_or("N").to_string()
    } else {
        format!("{}{}", ns, ew)
    };
    let distance = provider.number(0, 200);
    let city = choose(provider, REGIONAL_CITIES).copied().unwrap_or("Victoria");
    format!("{}km {} of {}", distance, axis, city)
}
