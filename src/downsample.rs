use crate::types::DownsampledWaveform;

/// Reduces `samples` to at most roughly `bucket_count` (min, max) pairs.
///
/// The run length is `max(1, len / bucket_count)` and the last run takes
/// whatever is left, so the number of buckets is `ceil(len / step)`. That can
/// exceed `bucket_count` when the division rounds down, but it never drops a
/// sample and never exceeds `len`.
///
/// Empty input or `bucket_count == 0` gives an empty result.
///
/// # Examples
///
/// ```rust
/// use edfwindow::downsample_min_max;
///
/// let envelope = downsample_min_max(&[5.0, 1.0, 8.0, 3.0, 10.0, 2.0, 7.0, 4.0], 2);
/// assert_eq!(envelope.mins, vec![1.0, 2.0]);
/// assert_eq!(envelope.maxs, vec![8.0, 10.0]);
/// ```
pub fn downsample_min_max(samples: &[f32], bucket_count: usize) -> DownsampledWaveform {
    if samples.is_empty() || bucket_count == 0 {
        return DownsampledWaveform::default();
    }

    let step = (samples.len() / bucket_count).max(1);
    let buckets = samples.len().div_ceil(step);
    let mut mins = Vec::with_capacity(buckets);
    let mut maxs = Vec::with_capacity(buckets);

    for run in samples.chunks(step) {
        let (lo, hi) = run[1..]
            .iter()
            .fold((run[0], run[0]), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        mins.push(lo);
        maxs.push(hi);
    }

    DownsampledWaveform { mins, maxs }
}
