//! Descriptive statistics over `f64` samples.

/// Arithmetic mean of `values`.
///
/// Returns `None` for an empty slice.
///
/// # Examples
///
/// ```
/// # use staghunt_stats::descriptive::mean;
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of `values`.
///
/// The values are copied and stable-sorted; the input order is preserved.
/// For an odd count the middle element is returned, for an even count the
/// arithmetic mean of the two central elements.
///
/// Returns `None` for an empty slice.
///
/// # Examples
///
/// ```
/// # use staghunt_stats::descriptive::median;
/// assert_eq!(median(&[0.9, 0.1, 0.5]), Some(0.5));
/// assert_eq!(median(&[0.2, 0.4, 0.6, 0.8]), Some(0.5));
/// ```
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_of_sorted(&sorted)
}

fn median_of_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some(f64::midpoint(sorted[n / 2 - 1], sorted[n / 2]))
    }
}

/// Descriptive statistics summarizing a dataset.
///
/// Used by the training loop to summarize the fitness of each generation.
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// The median of the dataset.
    pub median: f64,
    /// The population standard deviation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use staghunt_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Like [`Self::new`], but skips sorting.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let n = sorted_values.len() as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let median = median_of_sorted(sorted_values)?;
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        Some(Self {
            min,
            max,
            mean,
            median,
            std_dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_median_odd_uses_middle_element() {
        assert_eq!(median(&[0.1, 0.5, 0.9]), Some(0.5));
        assert_eq!(median(&[0.9, 0.5, 0.1]), Some(0.5));
    }

    #[test]
    fn test_median_even_averages_central_pair() {
        assert_eq!(median(&[0.2, 0.4, 0.6, 0.8]), Some(0.5));
        assert_eq!(median(&[1.0, 3.0]), Some(2.0));
    }

    #[test]
    fn test_median_does_not_reorder_input() {
        let values = [3.0, 1.0, 2.0];
        let _ = median(&values);
        assert_eq!(values, [3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_median_single_and_empty() {
        assert_eq!(median(&[0.7]), Some(0.7));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_constant_dataset_has_zero_spread() {
        let stats = DescriptiveStats::new([4.0, 4.0, 4.0]).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.min, stats.max);
    }

    #[test]
    fn test_spread_of_two_points() {
        let stats = DescriptiveStats::new([0.0, 2.0]).unwrap();
        assert_eq!(stats.mean, 1.0);
        assert_eq!(stats.median, 1.0);
        assert_eq!(stats.std_dev, 1.0);
    }

    #[test]
    fn test_empty_dataset_is_none() {
        assert!(DescriptiveStats::new(std::iter::empty()).is_none());
    }
}
