//! Apparent positions from a small linear ephemeris
//!
//! Builds straight-line segments for the Sun, Earth, Moon, Mars and Neptune
//! around 2025-02-07 and walks each body through the pipeline. Pass a JSON
//! configuration file as the first argument to override the defaults.
//!
//! Usage: RUST_LOG=debug cargo run --example apparent_positions [config.json]

use std::sync::Arc;

use nalgebra::Vector3;
use starframe::constants::AU_KM;
use starframe::ephemlib::{InMemoryEphemeris, LinearSegment};
use starframe::positions::ReferenceFrame;
use starframe::toposlib::WGS84;
use starframe::units::{arcsecond, degree};
use starframe::{Body, PipelineConfig, PipelineContext, Timescale};

fn segment(center: i32, target: i32, epoch: f64, pos_au: [f64; 3], vel_au_day: [f64; 3]) -> LinearSegment {
    LinearSegment::new(
        center,
        target,
        epoch,
        Vector3::from(pos_au) * AU_KM,
        Vector3::from(vel_au_day) * AU_KM,
    )
}

fn main() -> starframe::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    let ts = Timescale::default();
    let t = ts.utc(2025, 2, 7, 12, 0, 0.0)?;
    let epoch = t.tt();

    let ephemeris = InMemoryEphemeris::new()
        .with_segment(segment(0, 10, epoch, [-0.0056, -0.0041, -0.0016], [5.0e-6, -6.0e-6, -2.6e-6]))
        .with_segment(segment(0, 3, epoch, [-0.7385, 0.5994, 0.2599], [-0.01140, -0.01182, -0.00513]))
        .with_segment(segment(3, 399, epoch, [-2.0e-5, 2.0e-5, 8.0e-6], [-5.3e-6, -4.0e-6, -1.7e-6]))
        .with_segment(segment(3, 301, epoch, [0.00163, -0.00163, -0.00065], [4.3e-4, 3.3e-4, 1.4e-4]))
        .with_segment(segment(0, 4, epoch, [1.1, 0.95, 0.41], [-0.0093, 0.0108, 0.0052]))
        .with_segment(segment(4, 499, epoch, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]))
        .with_segment(segment(0, 8, epoch, [29.852, -0.92497, -1.14018], [0.000137, 0.002875, 0.001247]));

    let context = PipelineContext::new(Arc::new(ephemeris), config)?;
    let observer = WGS84.latlon(-33.8688, 151.2093, 58.0)?;

    println!("Apparent positions at {t}, observer {observer}\n");
    for body in [Body::Sun, Body::Moon, Body::Mars, Body::Neptune] {
        let evaluation = context.body(body, t);
        let apparent = evaluation.apparent()?;
        let horizon = observer.altaz(&evaluation.observed_by(&observer)?);
        let light_time = evaluation.light_time()?;

        println!("{body}");
        println!("  apparent    {}", apparent.equatorial());
        println!("  light time  {:.2} min", light_time.delay_seconds / 60.0);
        println!(
            "  alt/az      {:.3}° / {:.3}°",
            horizon.altitude.get::<degree>(),
            horizon.azimuth.get::<degree>()
        );
        println!("  magnitude   {:.2}", evaluation.apparent_magnitude()?);
        println!("  diameter    {:.2}\"", evaluation.angular_diameter()?.get::<arcsecond>());
    }

    println!("\ncache holds {} entries", context.cache().size());
    Ok(())
}
