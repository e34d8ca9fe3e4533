//! Summary statistics over latency samples
//!
//! All functions take the samples by shared reference and sort a private
//! copy, so the caller's ordering is never disturbed. Every function rejects
//! an empty sample set with [`AppError::Statistics`].

use crate::error::{AppError, Result};

fn ensure_non_empty(samples: &[f64]) -> Result<()> {
    if samples.is_empty() {
        return Err(AppError::statistics("No samples available"));
    }
    Ok(())
}

/// Ascending copy of the samples
pub fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Middle value; mean of the two middle values for even lengths
pub fn median(samples: &[f64]) -> Result<f64> {
    ensure_non_empty(samples)?;
    let sorted = sorted_copy(samples);
    let mid = sorted.len() / 2;

    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Nearest-rank percentile: index `ceil(p/100 * len) - 1`, clamped to the sample range
pub fn percentile(samples: &[f64], pct: f64) -> Result<f64> {
    ensure_non_empty(samples)?;
    if !(0.0..=100.0).contains(&pct) {
        return Err(AppError::statistics(format!(
            "Percentile must be between 0 and 100, got {}",
            pct
        )));
    }

    let sorted = sorted_copy(samples);
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, sorted.len() as i64 - 1) as usize;
    Ok(sorted[index])
}

/// Arithmetic mean
pub fn mean(samples: &[f64]) -> Result<f64> {
    ensure_non_empty(samples)?;
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odd_length() {
        let samples = [10.0, 20.0, 30.0];
        assert_eq!(median(&samples).unwrap(), 20.0);
        assert_eq!(percentile(&samples, 95.0).unwrap(), 30.0);
        assert_eq!(mean(&samples).unwrap(), 20.0);
    }

    #[test]
    fn test_even_length_median() {
        assert_eq!(median(&[5.0, 15.0, 25.0, 35.0]).unwrap(), 20.0);
        assert_eq!(median(&[35.0, 5.0, 25.0, 15.0]).unwrap(), 20.0);
    }

    #[test]
    fn test_single_sample() {
        assert_eq!(median(&[42.0]).unwrap(), 42.0);
        assert_eq!(percentile(&[42.0], 95.0).unwrap(), 42.0);
        assert_eq!(mean(&[42.0]).unwrap(), 42.0);
    }

    #[test]
    fn test_p95_index_for_twenty_samples() {
        // ceil(0.95 * 20) - 1 = 18
        let samples: Vec<f64> = (1..=20).map(f64::from).collect();
        assert_eq!(percentile(&samples, 95.0).unwrap(), 19.0);
    }

    #[test]
    fn test_percentile_clamps_low_end() {
        assert_eq!(percentile(&[3.0, 1.0, 2.0], 0.0).unwrap(), 1.0);
        assert_eq!(percentile(&[3.0, 1.0, 2.0], 100.0).unwrap(), 3.0);
        assert!(percentile(&[1.0], 101.0).is_err());
    }

    #[test]
    fn test_sentinel_dominates_p95() {
        let samples = [12.0, 15.0, 99999.0, 11.0];
        assert_eq!(percentile(&samples, 95.0).unwrap(), 99999.0);
        assert_eq!(median(&samples).unwrap(), 13.5);
    }

    #[test]
    fn test_input_order_preserved() {
        let samples = vec![30.0, 10.0, 20.0];
        let _ = median(&samples).unwrap();
        let _ = percentile(&samples, 95.0).unwrap();
        assert_eq!(samples, vec![30.0, 10.0, 20.0]);
    }

    #[test]
    fn test_empty_samples_rejected() {
        assert!(matches!(median(&[]), Err(AppError::Statistics(_))));
        assert!(matches!(percentile(&[], 95.0), Err(AppError::Statistics(_))));
        assert!(matches!(mean(&[]), Err(AppError::Statistics(_))));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(123.456), 123.46);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(99999.0), 99999.0);
    }
}
