//! Column statistics over present values.

/// Median of the values; mean of the middle pair for even counts
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;

    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (ddof = 0)
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Mean and standard deviation used to score a column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScorer {
    pub mean: f64,
    pub std_dev: f64,
}

impl ZScorer {
    pub fn fit(values: &[f64]) -> Option<Self> {
        Some(Self {
            mean: mean(values)?,
            std_dev: std_dev(values)?,
        })
    }

    /// Distance from the mean in standard deviations; `None` for a
    /// constant column, where the ratio is 0/0
    pub fn score(&self, value: f64) -> Option<f64> {
        if self.std_dev == 0.0 {
            None
        } else {
            Some((value - self.mean) / self.std_dev)
        }
    }
}
