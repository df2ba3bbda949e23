//! Solar system bodies and the per-body pipeline
//!
//! [`Body`] carries the static facts about each major body: NAIF id, the
//! chain of ephemeris segments that leads to it from the solar system
//! barycenter, mean radius and the body it orbits. [`PipelineContext`] holds
//! the shared collaborators, and [`SolarSystemBody`] walks one body through
//! the reference-frame stages at one instant.

mod context;
mod solar_system_body;
#[cfg(test)]
mod tests;

pub use context::PipelineContext;
pub use solar_system_body::{RadialMotion, SolarSystemBody};

use std::fmt;

use crate::ephemlib::names::{self, codes};
use crate::units::{kilometer, Distance};

/// Major solar system bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    pub const ALL: [Body; 11] = [
        Body::Sun,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Moon,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Moon => "Moon",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }

    /// NAIF SPICE id of the body itself
    pub fn naif_id(&self) -> i32 {
        match self {
            Body::Sun => codes::SUN,
            Body::Mercury => codes::MERCURY,
            Body::Venus => codes::VENUS,
            Body::Earth => codes::EARTH,
            Body::Moon => codes::MOON,
            Body::Mars => codes::MARS,
            Body::Jupiter => codes::JUPITER,
            Body::Saturn => codes::SATURN,
            Body::Uranus => codes::URANUS,
            Body::Neptune => codes::NEPTUNE,
            Body::Pluto => codes::PLUTO,
        }
    }

    /// Segments summed to reach the body from the solar system barycenter
    ///
    /// The outer planets are represented by their system barycenters.
    pub fn segment_chain(&self) -> &'static [(i32, i32)] {
        use codes::*;
        const SSB: i32 = SOLAR_SYSTEM_BARYCENTER;
        match self {
            Body::Sun => &[(SSB, SUN)],
            Body::Mercury => &[(SSB, MERCURY_BARYCENTER), (MERCURY_BARYCENTER, MERCURY)],
            Body::Venus => &[(SSB, VENUS_BARYCENTER), (VENUS_BARYCENTER, VENUS)],
            Body::Earth => &[(SSB, EARTH_MOON_BARYCENTER), (EARTH_MOON_BARYCENTER, EARTH)],
            Body::Moon => &[(SSB, EARTH_MOON_BARYCENTER), (EARTH_MOON_BARYCENTER, MOON)],
            Body::Mars => &[(SSB, MARS_BARYCENTER), (MARS_BARYCENTER, MARS)],
            Body::Jupiter => &[(SSB, JUPITER_BARYCENTER)],
            Body::Saturn => &[(SSB, SATURN_BARYCENTER)],
            Body::Uranus => &[(SSB, URANUS_BARYCENTER)],
            Body::Neptune => &[(SSB, NEPTUNE_BARYCENTER)],
            Body::Pluto => &[(SSB, PLUTO_BARYCENTER)],
        }
    }

    /// Volumetric mean radius (IAU WGCCRE 2015)
    pub fn mean_radius(&self) -> Distance {
        let km = match self {
            Body::Sun => 695_700.0,
            Body::Mercury => 2_439.4,
            Body::Venus => 6_051.8,
            Body::Earth => 6_371.0084,
            Body::Moon => 1_737.4,
            Body::Mars => 3_389.5,
            Body::Jupiter => 69_911.0,
            Body::Saturn => 58_232.0,
            Body::Uranus => 25_362.0,
            Body::Neptune => 24_622.0,
            Body::Pluto => 1_188.3,
        };
        Distance::new::<kilometer>(km)
    }

    /// The body this one orbits; `None` for the Sun
    pub fn primary(&self) -> Option<Body> {
        match self {
            Body::Sun => None,
            Body::Moon => Some(Body::Earth),
            _ => Some(Body::Sun),
        }
    }

    /// Look up a body by NAIF id, accepting system barycenters for the
    /// planets that have no separate body segment here
    pub fn from_naif_id(id: i32) -> Option<Body> {
        match id {
            codes::SUN => Some(Body::Sun),
            codes::MERCURY => Some(Body::Mercury),
            codes::VENUS => Some(Body::Venus),
            codes::EARTH => Some(Body::Earth),
            codes::MOON => Some(Body::Moon),
            codes::MARS => Some(Body::Mars),
            codes::JUPITER_BARYCENTER | codes::JUPITER => Some(Body::Jupiter),
            codes::SATURN_BARYCENTER | codes::SATURN => Some(Body::Saturn),
            codes::URANUS_BARYCENTER | codes::URANUS => Some(Body::Uranus),
            codes::NEPTUNE_BARYCENTER | codes::NEPTUNE => Some(Body::Neptune),
            codes::PLUTO_BARYCENTER | codes::PLUTO => Some(Body::Pluto),
            _ => None,
        }
    }

    /// Look up a body by name, case-insensitively
    pub fn from_name(name: &str) -> Option<Body> {
        names::naif_id(name).and_then(Body::from_naif_id)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
