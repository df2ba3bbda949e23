use std::sync::Arc;

use nalgebra::Matrix3;

use super::{Body, SolarSystemBody};
use crate::cachelib::{fetch_typed, CacheKey, CacheOperation, CacheQualifier, ComputationCache};
use crate::config::PipelineConfig;
use crate::ephemlib::{chain_state, Ephemeris};
use crate::errors::Result;
use crate::lighttime::LightTimeDelay;
use crate::nutationlib::Nutation;
use crate::positions::Geometric;
use crate::precessionlib::Precession;
use crate::time::Instant;
use crate::units::{PositionVector, VelocityVector};

/// Collaborators shared by every pipeline evaluation
///
/// Cloning is cheap; the ephemeris and cache are shared.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    ephemeris: Arc<dyn Ephemeris>,
    cache: Arc<dyn ComputationCache>,
    config: PipelineConfig,
    light_time: LightTimeDelay,
}

impl PipelineContext {
    /// Validate `config` and build the cache it selects
    pub fn new(ephemeris: Arc<dyn Ephemeris>, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let cache = config.build_cache()?;
        Ok(Self::assemble(ephemeris, cache, config))
    }

    /// Use an existing cache, for sharing one between contexts
    ///
    /// Ephemeris-derived entries are keyed on [`Ephemeris::cache_id`], so
    /// contexts over different ephemerides never see each other's states.
    pub fn with_cache(
        ephemeris: Arc<dyn Ephemeris>,
        cache: Arc<dyn ComputationCache>,
        config: PipelineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(ephemeris, cache, config))
    }

    fn assemble(ephemeris: Arc<dyn Ephemeris>, cache: Arc<dyn ComputationCache>, config: PipelineConfig) -> Self {
        let light_time = LightTimeDelay::from_config(&config.light_time);
        Self {
            ephemeris,
            cache,
            config,
            light_time,
        }
    }

    pub fn ephemeris(&self) -> &dyn Ephemeris {
        self.ephemeris.as_ref()
    }

    pub fn cache(&self) -> &dyn ComputationCache {
        self.cache.as_ref()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn light_time_solver(&self) -> &LightTimeDelay {
        &self.light_time
    }

    /// Start evaluating `body` at `instant`
    pub fn body(&self, body: Body, instant: Instant) -> SolarSystemBody<'_> {
        SolarSystemBody::new(self, body, instant)
    }

    /// Precession matrix for the configured model
    pub fn precession_matrix(&self, instant: &Instant) -> Result<Matrix3<f64>> {
        let model = self.config.precession_model;
        let key = CacheKey::new(CacheOperation::Precession, instant, &[])
            .with_qualifier(CacheQualifier::Precession(model));
        fetch_typed(self.cache(), key, || Ok(Precession::matrix_for_model(instant, model)))
    }

    pub fn nutation_matrix(&self, instant: &Instant) -> Result<Matrix3<f64>> {
        let key = CacheKey::new(CacheOperation::Nutation, instant, &[]);
        fetch_typed(self.cache(), key, || Ok(Nutation::matrix_for(instant)))
    }

    /// Barycentric state of `body`, shared through the context cache
    pub fn geometric(&self, body: Body, instant: &Instant) -> Result<Geometric> {
        let chain = body.segment_chain();
        let key = CacheKey::new(CacheOperation::Geometric, instant, chain)
            .with_source(self.ephemeris.cache_id());
        fetch_typed(self.cache(), key, || {
            let state = chain_state(self.ephemeris(), chain, instant.tt())?;
            Ok(Geometric::new(
                body,
                *instant,
                PositionVector::from_km(state.position),
                VelocityVector::from_km_per_day(state.velocity),
            ))
        })
    }
}
