//! The capability shared by every waveform source the display layer can use

use futures::future::{BoxFuture, FutureExt};

use crate::error::Result;
use crate::reader::EdfReader;
use crate::types::{ChannelInfo, WaveformWindow};

/// A waveform source: a channel catalog, a total duration and windowed reads.
///
/// `read_window` returns a future so a UI event loop can await it instead of
/// blocking. The decoding behind it is ordinary synchronous code.
///
/// ```rust
/// use edfwindow::{DataSource, EdfReader, MockSource};
/// use futures::executor::block_on;
///
/// fn first_second(source: &dyn DataSource) -> usize {
///     let id = source.channels()[0].id;
///     block_on(source.read_window(id, 0.0, 1.0)).map(|w| w.samples.len()).unwrap_or(0)
/// }
///
/// # let data = edfwindow::doctest_utils::ramp_fixture();
/// assert_eq!(first_second(&EdfReader::from_bytes(data)?), 256);
/// assert_eq!(first_second(&MockSource::new()), 256);
/// # Ok::<(), edfwindow::EdfError>(())
/// ```
pub trait DataSource: Send + Sync {
    fn channels(&self) -> &[ChannelInfo];

    fn duration_seconds(&self) -> f64;

    fn read_window(
        &self,
        channel_id: usize,
        start_seconds: f64,
        duration_seconds: f64,
    ) -> BoxFuture<'_, Result<WaveformWindow>>;
}

impl DataSource for EdfReader {
    fn channels(&self) -> &[ChannelInfo] {
        &self.header().channels
    }

    fn duration_seconds(&self) -> f64 {
        self.header().file_duration()
    }

    fn read_window(
        &self,
        channel_id: usize,
        start_seconds: f64,
        duration_seconds: f64,
    ) -> BoxFuture<'_, Result<WaveformWindow>> {
        async move { self.read_physical_window(channel_id, start_seconds, duration_seconds) }
            .boxed()
    }
}
