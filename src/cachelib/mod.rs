//! Memoization of per-instant pipeline results
//!
//! [`ComputationCache`] is the strategy a [`crate::planetlib::PipelineContext`]
//! holds: either an [`LruCache`] keyed by [`CacheKey`] or the [`NullCache`],
//! which stores nothing. Typed access goes through [`fetch_typed`].

mod lru;

pub use lru::LruCache;

use std::fmt::Debug;

use nalgebra::Matrix3;

use crate::errors::Result;
use crate::positions::{Apparent, Astrometric, Geometric, MeanOfDate, Topocentric};
use crate::precessionlib::PrecessionModel;
use crate::time::Instant;

/// Which computation a cache entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOperation {
    Geometric,
    Astrometric,
    MeanOfDate,
    Apparent,
    Topocentric,
    Precession,
    Nutation,
}

/// Variant of an operation that changes its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CacheQualifier {
    #[default]
    None,
    Precession(PrecessionModel),
    Deflected(bool),
    /// Exact ITRS coordinates of an observer on a named geoid
    Observer {
        geoid: &'static str,
        itrs_bits: [u64; 3],
    },
}

/// Operation, instant, segment chain, the ephemeris that produced the
/// states and an optional qualifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub operation: CacheOperation,
    pub tt_bits: u64,
    pub segments: Vec<(i32, i32)>,
    pub source: Option<u64>,
    pub qualifier: CacheQualifier,
}

impl CacheKey {
    pub fn new(operation: CacheOperation, instant: &Instant, segments: &[(i32, i32)]) -> Self {
        Self {
            operation,
            tt_bits: instant.cache_key(),
            segments: segments.to_vec(),
            source: None,
            qualifier: CacheQualifier::None,
        }
    }

    /// Tie the entry to one ephemeris, see [`crate::ephemlib::Ephemeris::cache_id`]
    pub fn with_source(mut self, source: u64) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_qualifier(mut self, qualifier: CacheQualifier) -> Self {
        self.qualifier = qualifier;
        self
    }
}

/// Anything the pipeline memoizes
#[derive(Debug, Clone)]
pub enum CacheValue {
    Geometric(Geometric),
    Astrometric(Astrometric),
    MeanOfDate(MeanOfDate),
    Apparent(Apparent),
    Topocentric(Topocentric),
    Matrix(Matrix3<f64>),
}

/// Conversion between a concrete result and [`CacheValue`]
pub trait Cacheable: Clone + Sized {
    fn into_cache_value(self) -> CacheValue;

    fn from_cache_value(value: CacheValue) -> Option<Self>;
}

macro_rules! impl_cacheable {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Cacheable for $ty {
                fn into_cache_value(self) -> CacheValue {
                    CacheValue::$variant(self)
                }

                fn from_cache_value(value: CacheValue) -> Option<Self> {
                    match value {
                        CacheValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_cacheable! {
    Geometric => Geometric,
    Astrometric => Astrometric,
    MeanOfDate => MeanOfDate,
    Apparent => Apparent,
    Topocentric => Topocentric,
    Matrix3<f64> => Matrix,
}

/// Shared cache strategy
pub trait ComputationCache: Send + Sync + Debug {
    fn get(&self, key: &CacheKey) -> Option<CacheValue>;

    fn set(&self, key: CacheKey, value: CacheValue);

    fn clear(&self);

    fn size(&self) -> usize;

    fn max_size(&self) -> usize;

    fn set_max_size(&self, max_size: usize) -> Result<()>;
}

impl ComputationCache for LruCache<CacheKey, CacheValue> {
    fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        LruCache::get(self, key)
    }

    fn set(&self, key: CacheKey, value: CacheValue) {
        LruCache::set(self, key, value)
    }

    fn clear(&self) {
        LruCache::clear(self)
    }

    fn size(&self) -> usize {
        LruCache::size(self)
    }

    fn max_size(&self) -> usize {
        LruCache::max_size(self)
    }

    fn set_max_size(&self, max_size: usize) -> Result<()> {
        LruCache::set_max_size(self, max_size)
    }
}

/// Cache that never stores anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl ComputationCache for NullCache {
    fn get(&self, _key: &CacheKey) -> Option<CacheValue> {
        None
    }

    fn set(&self, _key: CacheKey, _value: CacheValue) {}

    fn clear(&self) {}

    fn size(&self) -> usize {
        0
    }

    fn max_size(&self) -> usize {
        0
    }

    fn set_max_size(&self, _max_size: usize) -> Result<()> {
        Ok(())
    }
}

/// Return the cached `T` under `key`, or compute and store it
///
/// An entry of the wrong kind under the key counts as a miss and is replaced.
pub fn fetch_typed<C, T, F>(cache: &C, key: CacheKey, compute: F) -> Result<T>
where
    C: ComputationCache + ?Sized,
    T: Cacheable,
    F: FnOnce() -> Result<T>,
{
    if let Some(value) = cache.get(&key).and_then(T::from_cache_value) {
        log::trace!("cache hit for {:?} at tt_bits {:#x}", key.operation, key.tt_bits);
        return Ok(value);
    }
    log::trace!("cache miss for {:?} at tt_bits {:#x}", key.operation, key.tt_bits);
    let value = compute()?;
    cache.set(key, value.clone().into_cache_value());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StarframeError;
    use crate::time::Timescale;
    use std::cell::Cell;

    fn key(op: CacheOperation, day: f64) -> CacheKey {
        let ts = Timescale::default();
        let t = ts.tt_jd(2_460_714.0 + day).unwrap();
        CacheKey::new(op, &t, &[(0, 3), (3, 399)])
    }

    #[test]
    fn test_keys_distinguish_operation_time_and_qualifier() {
        let a = key(CacheOperation::Precession, 0.0);
        assert_eq!(a, key(CacheOperation::Precession, 0.0));
        assert_ne!(a, key(CacheOperation::Nutation, 0.0));
        assert_ne!(a, key(CacheOperation::Precession, 0.5));
        assert_ne!(
            a,
            a.clone().with_qualifier(CacheQualifier::Precession(PrecessionModel::Iau2006))
        );
        assert_ne!(
            a.clone().with_qualifier(CacheQualifier::Deflected(false)),
            a.clone().with_qualifier(CacheQualifier::Deflected(true))
        );
    }

    #[test]
    fn test_keys_distinguish_ephemeris_source() {
        let a = key(CacheOperation::Geometric, 0.0);
        assert_ne!(a, a.clone().with_source(1));
        assert_ne!(a.clone().with_source(1), a.clone().with_source(2));
        assert_eq!(a.clone().with_source(1), a.with_source(1));
    }

    #[test]
    fn test_observer_qualifiers_compare_exact_bits() {
        let near = CacheQualifier::Observer {
            geoid: "WGS84",
            itrs_bits: [1.0f64.to_bits(), 0.0f64.to_bits(), 0.0f64.to_bits()],
        };
        let nudged = CacheQualifier::Observer {
            geoid: "WGS84",
            itrs_bits: [1.0f64.to_bits() + 1, 0.0f64.to_bits(), 0.0f64.to_bits()],
        };
        let other_geoid = CacheQualifier::Observer {
            geoid: "IERS2010",
            itrs_bits: [1.0f64.to_bits(), 0.0f64.to_bits(), 0.0f64.to_bits()],
        };
        assert_ne!(near, nudged);
        assert_ne!(near, other_geoid);
    }

    #[test]
    fn test_fetch_typed_computes_once() {
        let cache = LruCache::<CacheKey, CacheValue>::new(8).unwrap();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Ok(Matrix3::identity() * 2.0)
        };

        let k = key(CacheOperation::Precession, 0.0);
        let first: Matrix3<f64> = fetch_typed(&cache, k.clone(), compute).unwrap();
        let second: Matrix3<f64> = fetch_typed(&cache, k, || unreachable!()).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
        assert_eq!(ComputationCache::size(&cache), 1);
    }

    #[test]
    fn test_fetch_typed_propagates_errors_without_storing() {
        let cache = LruCache::<CacheKey, CacheValue>::new(8).unwrap();
        let result: Result<Matrix3<f64>> = fetch_typed(&cache, key(CacheOperation::Nutation, 0.0), || {
            Err(StarframeError::Config("boom".into()))
        });
        assert!(result.is_err());
        assert_eq!(ComputationCache::size(&cache), 0);
    }

    #[test]
    fn test_null_cache_always_recomputes() {
        let cache = NullCache;
        let calls = Cell::new(0);
        for _ in 0..3 {
            let _: Matrix3<f64> = fetch_typed(&cache, key(CacheOperation::Precession, 0.0), || {
                calls.set(calls.get() + 1);
                Ok(Matrix3::identity())
            })
            .unwrap();
        }
        assert_eq!(calls.get(), 3);
        assert_eq!(cache.size(), 0);
        assert!(cache.set_max_size(0).is_ok());
    }

    #[test]
    fn test_trait_object_resize() {
        let cache: Box<dyn ComputationCache> = Box::new(LruCache::<CacheKey, CacheValue>::new(4).unwrap());
        for day in 0..4 {
            cache.set(key(CacheOperation::Nutation, f64::from(day)), CacheValue::Matrix(Matrix3::zeros()));
        }
        cache.set_max_size(1).unwrap();
        assert_eq!(cache.size(), 1);
        assert!(cache.get(&key(CacheOperation::Nutation, 3.0)).is_some());
        assert!(matches!(cache.set_max_size(0), Err(StarframeError::InvalidCacheSize(0))));
    }
}
