//! Five-number summaries for the per-bin boxplot panel.

use super::stats;

/// Boxplot statistics for one bin and one model.
///
/// Whiskers reach the most extreme data points within 1.5 IQR of the
/// quartiles; values beyond the whiskers are not drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxplotStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
}

impl BoxplotStats {
    /// Summarize a sample; `None` when it is empty.
    pub fn from_sample(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = stats::sorted(values);
        let q1 = stats::percentile_of_sorted(&sorted, 25.0);
        let median = stats::percentile_of_sorted(&sorted, 50.0);
        let q3 = stats::percentile_of_sorted(&sorted, 75.0);
        let reach = 1.5 * (q3 - q1);

        let fence_low = q1 - reach;
        let fence_high = q3 + reach;
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= fence_low)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= fence_high)
            .unwrap_or(q3);

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
        })
    }

    /// Vertical span the renderer needs to fit this box.
    pub fn extent(&self) -> (f64, f64) {
        (self.whisker_low, self.whisker_high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sample_has_no_stats() {
        assert_eq!(BoxplotStats::from_sample(&[]), None);
    }

    #[test]
    fn quartiles_interpolate() {
        let stats = BoxplotStats::from_sample(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q3, 3.25);
    }

    #[test]
    fn whiskers_clip_to_data_within_reach() {
        // The 100.0 flier lies outside 1.5 IQR, so the upper whisker stops
        // at the most extreme ordinary value.
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let stats = BoxplotStats::from_sample(&values).unwrap();
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 5.0);
    }

    #[test]
    fn single_value_degenerates_to_that_value() {
        let stats = BoxplotStats::from_sample(&[7.0]).unwrap();
        assert_eq!(stats.median, 7.0);
        assert_eq!(stats.whisker_low, 7.0);
        assert_eq!(stats.whisker_high, 7.0);
    }
}
