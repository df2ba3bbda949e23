//! Delta-T (TT - UT1) from a tabulated series
//!
//! Values are yearly estimates from the IERS/USNO long-term series, linearly
//! interpolated between entries. Outside the table the nearest boundary value
//! is used; an empty table yields zero.

use crate::constants::{DAYS_PER_JULIAN_YEAR, J2000};

/// Built-in Delta-T samples as (decimal year, seconds)
#[rustfmt::skip]
const DELTA_T_SAMPLES: [(f64, f64); 31] = [
    (1900.0, -2.79), (1905.0, 3.86), (1910.0, 10.46), (1915.0, 17.20),
    (1920.0, 21.16), (1925.0, 23.62), (1930.0, 24.02), (1935.0, 23.93),
    (1940.0, 24.33), (1945.0, 26.77), (1950.0, 29.15), (1955.0, 31.07),
    (1960.0, 33.15), (1965.0, 35.73), (1970.0, 40.18), (1975.0, 45.48),
    (1980.0, 50.54), (1985.0, 54.34), (1990.0, 56.86), (1995.0, 60.78),
    (2000.0, 63.83), (2005.0, 64.69), (2010.0, 66.07), (2015.0, 67.64),
    (2018.0, 68.97), (2020.0, 69.36), (2021.0, 69.36), (2022.0, 69.29),
    (2023.0, 69.20), (2024.0, 69.18), (2025.0, 69.14),
];

/// Tabulated Delta-T with clamped linear interpolation
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaTTable {
    years: Vec<f64>,
    seconds: Vec<f64>,
}

impl Default for DeltaTTable {
    fn default() -> Self {
        Self::new(DELTA_T_SAMPLES.to_vec())
    }
}

impl DeltaTTable {
    /// Build a table from (decimal year, Delta-T seconds) samples in any order
    pub fn new(mut samples: Vec<(f64, f64)>) -> Self {
        samples.retain(|(year, value)| year.is_finite() && value.is_finite());
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (years, seconds) = samples.into_iter().unzip();
        Self { years, seconds }
    }

    /// A table with no samples; every lookup returns zero
    pub fn empty() -> Self {
        Self {
            years: Vec::new(),
            seconds: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Compute delta-T in seconds for a given TT Julian date
    pub fn compute(&self, tt_jd: f64) -> f64 {
        let year = 2000.0 + (tt_jd - J2000) / DAYS_PER_JULIAN_YEAR;
        self.compute_for_year(year)
    }

    /// Compute delta-T in seconds for a given decimal year
    pub fn compute_for_year(&self, year: f64) -> f64 {
        let (Some(&first), Some(&last)) = (self.years.first(), self.years.last()) else {
            return 0.0;
        };

        if year <= first {
            log::trace!("Delta-T lookup for {year} clamped to {first}");
            return self.seconds[0];
        }
        if year >= last {
            log::trace!("Delta-T lookup for {year} clamped to {last}");
            return self.seconds[self.seconds.len() - 1];
        }

        // First sample strictly after `year`; bounds above guarantee 1..len
        let hi = self.years.partition_point(|y| *y <= year);
        let lo = hi - 1;
        let span = self.years[hi] - self.years[lo];
        let frac = (year - self.years[lo]) / span;
        self.seconds[lo] + frac * (self.seconds[hi] - self.seconds[lo])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tabulated_value_at_j2000() {
        let table = DeltaTTable::default();
        assert_relative_eq!(table.compute(J2000), 63.83, epsilon = 1e-9);
        assert_relative_eq!(table.compute_for_year(2000.0), 63.83, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_interpolation() {
        let table = DeltaTTable::new(vec![(2000.0, 60.0), (2010.0, 70.0)]);
        assert_relative_eq!(table.compute_for_year(2005.0), 65.0, epsilon = 1e-12);
        assert_relative_eq!(table.compute_for_year(2002.5), 62.5, epsilon = 1e-12);
    }

    #[test]
    fn test_clamps_outside_table() {
        let table = DeltaTTable::default();
        assert_relative_eq!(table.compute_for_year(1600.0), -2.79, epsilon = 1e-12);
        assert_relative_eq!(table.compute_for_year(2400.0), 69.14, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_table_is_zero() {
        let table = DeltaTTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.compute(J2000), 0.0);
    }

    #[test]
    fn test_unsorted_input() {
        let table = DeltaTTable::new(vec![(2010.0, 70.0), (f64::NAN, 1.0), (2000.0, 60.0)]);
        assert_eq!(table.len(), 2);
        assert_relative_eq!(table.compute_for_year(2001.0), 61.0, epsilon = 1e-12);
    }

    #[test]
    fn test_monotonic_in_recent_decades() {
        let table = DeltaTTable::default();
        let mut prev = table.compute_for_year(1960.0);
        for year in (1961..=2015).map(f64::from) {
            let dt = table.compute_for_year(year);
            assert!(dt >= prev, "Delta-T decreased at {year}: {prev} -> {dt}");
            prev = dt;
        }
    }
}
