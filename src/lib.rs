//! Apparent positions of solar system bodies
//!
//! Positions move through five stages: geometric (barycentric), astrometric
//! (light-time corrected, relative to the Earth), mean of date (precessed),
//! apparent (nutated and aberrated) and topocentric (relative to a point on
//! the Earth's surface).
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use starframe::ephemlib::InMemoryEphemeris;
//! use starframe::positions::ReferenceFrame;
//! use starframe::{Body, PipelineConfig, PipelineContext, Timescale};
//!
//! # fn main() -> starframe::Result<()> {
//! let ephemeris = Arc::new(InMemoryEphemeris::new());
//! let context = PipelineContext::new(ephemeris, PipelineConfig::default())?;
//! let t = Timescale::default().utc(2025, 2, 7, 12, 0, 0.0)?;
//! let neptune = context.body(Body::Neptune, t).apparent()?;
//! println!("{}", neptune.equatorial());
//! # Ok(())
//! # }
//! ```

pub mod cachelib;
pub mod config;
pub mod constants;
pub mod earthlib;
pub mod ephemlib;
pub mod errors;
pub mod framelib;
pub mod lighttime;
pub mod magnitudelib;
pub mod nutationlib;
pub mod planetlib;
pub mod positions;
pub mod precessionlib;
pub mod relativity;
pub mod time;
pub mod toposlib;
pub mod units;

pub use config::PipelineConfig;
pub use errors::{Result, StarframeError};
pub use planetlib::{Body, PipelineContext, SolarSystemBody};
pub use time::{Instant, Timescale};
