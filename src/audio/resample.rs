use crate::error::{Result, WordsyncError};

/// Linearly resample `samples` from `source_rate` to `target_rate`.
pub fn linear_resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if source_rate == 0 || target_rate == 0 {
        return Err(WordsyncError::transcribe_failed(format!(
            "sample rates must be positive (got {source_rate} -> {target_rate})"
        )));
    }
    if samples.is_empty() || source_rate == target_rate {
        return Ok(samples.to_vec());
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let output_len = ((samples.len() as f64) * ratio).ceil().max(1.0) as usize;
    let last_index = samples.len() - 1;
    let output = (0..output_len)
        .map(|i| {
            let position = i as f64 / ratio;
            let left = (position.floor() as usize).min(last_index);
            let right = (left + 1).min(last_index);
            let t = (position - left as f64) as f32;
            samples[left] * (1.0 - t) + samples[right] * t
        })
        .collect();
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::linear_resample;

    #[test]
    fn preserves_constant_signal_after_downsample() {
        let input = vec![0.5; 441];
        let resampled = linear_resample(&input, 44_100, 16_000).unwrap();
        let expected_len = (441.0_f64 * (16_000.0 / 44_100.0)).ceil() as usize;
        assert_eq!(resampled.len(), expected_len);
        assert!(resampled.iter().all(|&sample| (sample - 0.5).abs() < 1e-6));
    }

    #[test]
    fn same_rate_is_identity() {
        let input = vec![0.1, -0.2, 0.3];
        assert_eq!(linear_resample(&input, 16_000, 16_000).unwrap(), input);
    }

    #[test]
    fn rejects_zero_rate() {
        assert!(linear_resample(&[0.0], 0, 16_000).is_err());
    }
}
