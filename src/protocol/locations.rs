//! Known places used by the composite tools: cities, islands, representative
//! sampling points and approximate island bounding boxes.

use super::alias::normalize_key;

/// A named coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub key: &'static str,
    pub lat: f64,
    pub lng: f64,
    /// Island key (see [`ISLANDS`]); `None` outside the Hawaiian extents.
    pub island: Option<&'static str>,
}

/// Lat/lng box: `(lat_min, lat_max, lng_min, lng_max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl Bounds {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat) && (self.lng_min..=self.lng_max).contains(&lng)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Island {
    pub key: &'static str,
    /// Canonical extent code for raster/time-series requests.
    pub extent: &'static str,
    /// `None` for statewide.
    pub bounds: Option<Bounds>,
    pub points: &'static [Point],
}

const fn pt(name: &'static str, lat: f64, lng: f64) -> Point {
    Point { name, lat, lng }
}

const fn bx(lat_min: f64, lat_max: f64, lng_min: f64, lng_max: f64) -> Option<Bounds> {
    Some(Bounds {
        lat_min,
        lat_max,
        lng_min,
        lng_max,
    })
}

pub const CITIES: &[City] = &[
    City { key: "honolulu", lat: 21.3069, lng: -157.8583, island: Some("oahu") },
    City { key: "hilo", lat: 19.7241, lng: -155.0868, island: Some("big_island") },
    City { key: "kona", lat: 19.6393, lng: -155.9969, island: Some("big_island") },
    City { key: "kahului", lat: 20.8893, lng: -156.4729, island: Some("maui") },
    City { key: "lihue", lat: 21.9811, lng: -159.3711, island: Some("kauai") },
    City { key: "kaunakakai", lat: 21.0905, lng: -157.0226, island: Some("molokai") },
    City { key: "lanai_city", lat: 20.8264, lng: -156.9182, island: Some("lanai") },
    City { key: "pago_pago", lat: -14.2794, lng: -170.7006, island: None },
];

pub const ISLANDS: &[Island] = &[
    Island {
        key: "oahu",
        extent: "oa",
        bounds: bx(21.2, 21.8, -158.3, -157.6),
        points: &[
            pt("Honolulu (South)", 21.3069, -157.8583),
            pt("Kaneohe (Windward)", 21.4111, -157.7967),
            pt("Kapolei (Leeward)", 21.3358, -158.0561),
            pt("Wahiawa (Central)", 21.5028, -158.0236),
            pt("North Shore", 21.5956, -158.1070),
        ],
    },
    Island {
        key: "big_island",
        extent: "bi",
        bounds: bx(18.9, 20.3, -156.1, -154.8),
        points: &[
            pt("Hilo (East/Wet)", 19.7241, -155.0868),
            pt("Kona (West/Dry)", 19.6393, -155.9969),
            pt("Waimea (Upcountry)", 20.0201, -155.6677),
            pt("Volcano (Highland/Wet)", 19.4315, -155.2323),
            pt("South Point", 18.9136, -155.6793),
        ],
    },
    Island {
        key: "maui",
        extent: "mn",
        bounds: bx(20.5, 21.1, -156.7, -155.9),
        points: &[
            pt("Kahului (Central)", 20.8893, -156.4729),
            pt("Hana (East/Wet)", 20.7575, -155.9884),
            pt("Lahaina (West/Dry)", 20.8783, -156.6825),
            pt("Kula (Upcountry)", 20.7922, -156.3267),
        ],
    },
    Island {
        key: "kauai",
        extent: "ka",
        bounds: bx(21.8, 22.3, -159.8, -159.2),
        points: &[
            pt("Lihue (East)", 21.9811, -159.3711),
            pt("Poipu (South)", 21.8817, -159.4580),
            pt("Princeville (North)", 22.2201, -159.4831),
            pt("Waimea (West)", 21.9568, -159.6698),
            pt("Kokee (Mountain)", 22.1264, -159.6467),
        ],
    },
    Island {
        key: "molokai",
        extent: "mn",
        bounds: bx(21.0, 21.3, -157.3, -156.7),
        points: &[
            pt("Kaunakakai (South)", 21.0905, -157.0226),
            pt("Kualapuu (Central)", 21.1611, -157.0683),
            pt("Halawa (East)", 21.1578, -156.7442),
        ],
    },
    Island {
        key: "lanai",
        extent: "mn",
        bounds: bx(20.7, 21.0, -157.0, -156.8),
        points: &[
            pt("Lanai City", 20.8264, -156.9182),
            pt("Manele (South)", 20.7389, -156.8886),
        ],
    },
    Island {
        key: "statewide",
        extent: "statewide",
        bounds: None,
        points: &[
            pt("Honolulu (Oahu)", 21.3069, -157.8583),
            pt("Hilo (Big Island)", 19.7241, -155.0868),
            pt("Kahului (Maui)", 20.8893, -156.4729),
            pt("Lihue (Kauai)", 21.9811, -159.3711),
        ],
    },
];

/// Keys of [`CITIES`], in table order.
pub const CITY_KEYS: &[&str] = &[
    "honolulu",
    "hilo",
    "kona",
    "kahului",
    "lihue",
    "kaunakakai",
    "lanai_city",
    "pago_pago",
];

/// Keys of [`ISLANDS`], in table order.
pub const ISLAND_KEYS: &[&str] = &[
    "oahu",
    "big_island",
    "maui",
    "kauai",
    "molokai",
    "lanai",
    "statewide",
];

/// Find a city by (loosely spelled) name.
pub fn find_city(name: &str) -> Option<&'static City> {
    let key = normalize_key(name);
    CITIES.iter().find(|c| c.key == key)
}

/// Find an island by key or by any extent alias that names a single island.
pub fn find_island(name: &str) -> Option<&'static Island> {
    let key = normalize_key(name);
    ISLANDS.iter().find(|i| i.key == key).or_else(|| match key.as_str() {
        "hawaii_island" | "island_of_hawaii" | "hawaii_county" | "bi" => island("big_island"),
        "oa" => island("oahu"),
        "ka" => island("kauai"),
        "hawaii" | "state" | "all_islands" => island("statewide"),
        _ => None,
    })
}

fn island(key: &str) -> Option<&'static Island> {
    ISLANDS.iter().find(|i| i.key == key)
}

/// Great-circle distance in kilometres (haversine, mean Earth radius).
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_city_loose_spelling() {
        assert_eq!(find_city("Lanai City").map(|c| c.key), Some("lanai_city"));
        assert_eq!(find_city("HILO").map(|c| c.key), Some("hilo"));
        assert!(find_city("Paris").is_none());
    }

    #[test]
    fn test_find_island_by_alias() {
        assert_eq!(find_island("Big Island").map(|i| i.extent), Some("bi"));
        assert_eq!(find_island("O'ahu").map(|i| i.key), Some("oahu"));
        assert_eq!(find_island("lanai").map(|i| i.extent), Some("mn"));
    }

    #[test]
    fn test_haversine_known_distance() {
        // Honolulu to Hilo is roughly 340 km.
        let d = haversine_km(21.3069, -157.8583, 19.7241, -155.0868);
        assert!((320.0..360.0).contains(&d), "got {d}");
        assert!(haversine_km(21.0, -157.0, 21.0, -157.0) < 1e-9);
    }

    #[test]
    fn test_key_lists_match_tables() {
        let cities: Vec<_> = CITIES.iter().map(|c| c.key).collect();
        let islands: Vec<_> = ISLANDS.iter().map(|i| i.key).collect();
        assert_eq!(cities, CITY_KEYS);
        assert_eq!(islands, ISLAND_KEYS);
    }

    #[test]
    fn test_city_islands_exist() {
        for city in CITIES {
            if let Some(key) = city.island {
                assert!(island(key).is_some(), "{} points at unknown island", city.key);
            }
        }
    }

    #[test]
    fn test_points_inside_bounds() {
        for island in ISLANDS {
            if let Some(bounds) = island.bounds {
                for p in island.points {
                    assert!(bounds.contains(p.lat, p.lng), "{} outside {}", p.name, island.key);
                }
            }
        }
    }
}
