//! NAIF integer codes and names of the bodies the pipeline knows about

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref NAMES_BY_ID: HashMap<i32, &'static str> = {
        let mut m = HashMap::new();
        for &(id, name) in NAIF_NAMES.iter() {
            m.entry(id).or_insert(name);
        }
        m
    };
    static ref IDS_BY_NAME: HashMap<String, i32> = NAIF_NAMES
        .iter()
        .map(|&(id, name)| (name.to_lowercase(), id))
        .collect();
}

/// Canonical name for a NAIF code
pub fn naif_name(id: i32) -> Option<&'static str> {
    NAMES_BY_ID.get(&id).copied()
}

/// NAIF code for a name, ignoring case and surrounding whitespace
pub fn naif_id(name: &str) -> Option<i32> {
    IDS_BY_NAME.get(&name.trim().to_lowercase()).copied()
}

/// (code, name) pairs; the first name listed for a code is canonical
const NAIF_NAMES: &[(i32, &str)] = &[
    (0, "SOLAR SYSTEM BARYCENTER"),
    (0, "SSB"),
    (1, "MERCURY BARYCENTER"),
    (2, "VENUS BARYCENTER"),
    (3, "EARTH BARYCENTER"),
    (3, "EMB"),
    (3, "EARTH-MOON BARYCENTER"),
    (4, "MARS BARYCENTER"),
    (5, "JUPITER BARYCENTER"),
    (6, "SATURN BARYCENTER"),
    (7, "URANUS BARYCENTER"),
    (8, "NEPTUNE BARYCENTER"),
    (9, "PLUTO BARYCENTER"),
    (10, "SUN"),
    (199, "MERCURY"),
    (299, "VENUS"),
    (301, "MOON"),
    (399, "EARTH"),
    (499, "MARS"),
    (599, "JUPITER"),
    (699, "SATURN"),
    (799, "URANUS"),
    (899, "NEPTUNE"),
    (999, "PLUTO"),
];

/// NAIF codes used in segment chains
pub mod codes {
    pub const SOLAR_SYSTEM_BARYCENTER: i32 = 0;
    pub const MERCURY_BARYCENTER: i32 = 1;
    pub const VENUS_BARYCENTER: i32 = 2;
    pub const EARTH_MOON_BARYCENTER: i32 = 3;
    pub const MARS_BARYCENTER: i32 = 4;
    pub const JUPITER_BARYCENTER: i32 = 5;
    pub const SATURN_BARYCENTER: i32 = 6;
    pub const URANUS_BARYCENTER: i32 = 7;
    pub const NEPTUNE_BARYCENTER: i32 = 8;
    pub const PLUTO_BARYCENTER: i32 = 9;
    pub const SUN: i32 = 10;
    pub const MERCURY: i32 = 199;
    pub const VENUS: i32 = 299;
    pub const MOON: i32 = 301;
    pub const EARTH: i32 = 399;
    pub const MARS: i32 = 499;
    pub const JUPITER: i32 = 599;
    pub const SATURN: i32 = 699;
    pub const URANUS: i32 = 799;
    pub const NEPTUNE: i32 = 899;
    pub const PLUTO: i32 = 999;
}
