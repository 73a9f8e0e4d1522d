use std::f32::consts::PI;

use futures::future::{self, BoxFuture, FutureExt};

use crate::error::Result;
use crate::source::DataSource;
use crate::types::{ChannelInfo, WaveformWindow};

const MOCK_SAMPLE_RATE: f64 = 256.0;
const MOCK_DURATION: f64 = 120.0;

/// Synthetic source for working on the display without a recording
///
/// Three bipolar montage channels at 256 Hz, 120 s long. Each channel is a
/// 9 Hz sine of amplitude 45 plus a 1.25 Hz sine of amplitude 10.
#[derive(Debug, Clone)]
pub struct MockSource {
    channels: Vec<ChannelInfo>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    pub fn new() -> Self {
        let channels = ["Fp1-F7", "F7-T3", "T3-T5"]
            .iter()
            .enumerate()
            .map(|(id, label)| ChannelInfo {
                id,
                label: label.to_string(),
                sample_rate_hz: MOCK_SAMPLE_RATE,
                unit: "uV".to_string(),
            })
            .collect();
        MockSource { channels }
    }

    /// Generates the window directly. The request is echoed back unclamped
    /// and unknown channels fall back to 256 Hz.
    pub fn generate(
        &self,
        channel_id: usize,
        start_seconds: f64,
        duration_seconds: f64,
    ) -> WaveformWindow {
        let rate = self
            .channels
            .iter()
            .find(|c| c.id == channel_id)
            .map_or(MOCK_SAMPLE_RATE, |c| c.sample_rate_hz);
        let count = ((duration_seconds * rate).floor().max(0.0) as usize).max(1);

        let samples = (0..count)
            .map(|i| {
                let t = (start_seconds + i as f64 / rate) as f32;
                (2.0 * PI * 9.0 * t).sin() * 45.0 + (2.0 * PI * 1.25 * t).sin() * 10.0
            })
            .collect();

        WaveformWindow {
            start_seconds,
            duration_seconds,
            samples,
        }
    }
}

impl DataSource for MockSource {
    fn channels(&self) -> &[ChannelInfo] {
        &self.channels
    }

    fn duration_seconds(&self) -> f64 {
        MOCK_DURATION
    }

    fn read_window(
        &self,
        channel_id: usize,
        start_seconds: f64,
        duration_seconds: f64,
    ) -> BoxFuture<'_, Result<WaveformWindow>> {
        future::ready(Ok(self.generate(channel_id, start_seconds, duration_seconds))).boxed()
    }
}
