//! TAI - UTC leap-second table

/// Leap seconds as (UTC Julian date the offset takes effect, TAI - UTC seconds)
#[rustfmt::skip]
const LEAP_SECONDS: [(f64, f64); 28] = [
    (2_441_317.5, 10.0), (2_441_499.5, 11.0), (2_441_683.5, 12.0), (2_442_048.5, 13.0),
    (2_442_413.5, 14.0), (2_442_778.5, 15.0), (2_443_144.5, 16.0), (2_443_509.5, 17.0),
    (2_443_874.5, 18.0), (2_444_239.5, 19.0), (2_444_786.5, 20.0), (2_445_151.5, 21.0),
    (2_445_516.5, 22.0), (2_446_247.5, 23.0), (2_447_161.5, 24.0), (2_447_892.5, 25.0),
    (2_448_257.5, 26.0), (2_448_804.5, 27.0), (2_449_169.5, 28.0), (2_449_534.5, 29.0),
    (2_450_083.5, 30.0), (2_450_630.5, 31.0), (2_451_179.5, 32.0), (2_453_736.5, 33.0),
    (2_454_832.5, 34.0), (2_456_109.5, 35.0), (2_457_204.5, 36.0), (2_457_754.5, 37.0),
];

/// Step table of TAI - UTC offsets
///
/// Dates before the first entry use the first offset; an empty table is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct LeapSecondTable {
    entries: Vec<(f64, f64)>,
}

impl Default for LeapSecondTable {
    fn default() -> Self {
        Self::new(LEAP_SECONDS.to_vec())
    }
}

impl LeapSecondTable {
    pub fn new(mut entries: Vec<(f64, f64)>) -> Self {
        entries.retain(|(jd, offset)| jd.is_finite() && offset.is_finite());
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// TAI - UTC in seconds at a UTC Julian date
    pub fn tai_minus_utc(&self, utc_jd: f64) -> f64 {
        let idx = self.entries.partition_point(|(start, _)| *start <= utc_jd);
        match idx {
            0 => self.entries.first().map_or(0.0, |(_, offset)| *offset),
            n => self.entries[n - 1].1,
        }
    }

    /// TAI - UTC in seconds at a TAI Julian date
    pub fn tai_minus_utc_at_tai(&self, tai_jd: f64) -> f64 {
        let idx = self
            .entries
            .partition_point(|(start, offset)| start + offset / 86_400.0 <= tai_jd);
        match idx {
            0 => self.entries.first().map_or(0.0, |(_, offset)| *offset),
            n => self.entries[n - 1].1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_offset() {
        let table = LeapSecondTable::default();
        // 2025-02-07
        assert_eq!(table.tai_minus_utc(2_460_714.0), 37.0);
    }

    #[test]
    fn test_step_boundary() {
        let table = LeapSecondTable::default();
        assert_eq!(table.tai_minus_utc(2_457_754.5 - 1e-6), 36.0);
        assert_eq!(table.tai_minus_utc(2_457_754.5), 37.0);
    }

    #[test]
    fn test_clamps_before_1972() {
        let table = LeapSecondTable::default();
        assert_eq!(table.tai_minus_utc(2_400_000.5), 10.0);
    }

    #[test]
    fn test_tai_lookup_matches_utc_lookup() {
        let table = LeapSecondTable::default();
        let utc = 2_451_545.0;
        let offset = table.tai_minus_utc(utc);
        assert_eq!(table.tai_minus_utc_at_tai(utc + offset / 86_400.0), offset);
    }

    #[test]
    fn test_empty_table() {
        let table = LeapSecondTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.tai_minus_utc(2_460_000.0), 0.0);
        assert_eq!(table.tai_minus_utc_at_tai(2_460_000.0), 0.0);
    }
}
