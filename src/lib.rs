//! # EDF/BDF windowed reader
//!
//! Reads EDF and BDF biosignal recordings (EEG, polysomnography, ...) and
//! serves arbitrary time windows of any channel, plus a min/max downsampler
//! that reduces a window to a fixed number of display buckets.
//!
//! ## Quick Start
//!
//! ```rust
//! use edfwindow::{downsample_min_max, EdfReader, Result};
//!
//! fn main() -> Result<()> {
//!     # let path = std::env::temp_dir().join("edfwindow_quickstart.edf");
//!     # use edfwindow::doctest_utils::{FixtureBuilder, FixtureSignal};
//!     # FixtureBuilder::new()
//!     #     .signal(FixtureSignal::new("Fp1-F7", 256).samples((0..2560).collect()))
//!     #     .write_to(&path)?;
//!     let reader = EdfReader::open(&path)?;
//!     println!("Duration: {:.1} seconds", reader.duration_seconds());
//!
//!     for channel in reader.channels() {
//!         println!(
//!             "{} {} {} Hz [{}]",
//!             channel.id, channel.label, channel.sample_rate_hz, channel.unit
//!         );
//!     }
//!
//!     // 2.5 seconds starting at t = 4 s, reduced to 200 buckets
//!     let window = reader.read_physical_window(0, 4.0, 2.5)?;
//!     let envelope = downsample_min_max(&window.samples, 200);
//!     println!("{} samples -> {} buckets", window.samples.len(), envelope.len());
//!     # std::fs::remove_file(&path).ok();
//!     Ok(())
//! }
//! ```
//!
//! ## Physical vs Digital Values
//!
//! Samples are stored as 16-bit (EDF) or 24-bit (BDF) integers. Each channel
//! maps them linearly onto its physical range:
//!
//! ```text
//! bit_value = (physical_max - physical_min) / (digital_max - digital_min)
//! offset    = physical_max / bit_value - digital_max
//! physical  = bit_value * (offset + digital)
//! ```
//!
//! ## Windows
//!
//! Requested ranges are clamped to the recording. Reading past the end gives a
//! shorter (or empty) window rather than an error:
//!
//! ```rust
//! use edfwindow::doctest_utils::{FixtureBuilder, FixtureSignal};
//! use edfwindow::EdfReader;
//!
//! let data = FixtureBuilder::new()
//!     .signal(FixtureSignal::new("C3-P3", 10))
//!     .records(20)
//!     .build();
//! let reader = EdfReader::from_bytes(data)?;
//!
//! let tail = reader.read_physical_window(0, 18.0, 10.0)?;
//! assert_eq!(tail.duration_seconds, 2.0);
//! assert_eq!(tail.samples.len(), 20);
//!
//! let past_end = reader.read_physical_window(0, 25.0, 5.0)?;
//! assert!(past_end.samples.is_empty());
//! # Ok::<(), edfwindow::EdfError>(())
//! ```

pub mod downsample;
pub mod error;
pub mod header;
pub mod mock;
pub mod reader;
pub mod source;
pub mod types;
pub mod utils;

#[doc(hidden)]
pub mod doctest_utils; // For internal doctest support

// Re-export main types for convenience
pub use downsample::downsample_min_max;
pub use error::{EdfError, Result};
pub use header::EdfHeader;
pub use mock::MockSource;
pub use reader::{decode_bdf_sample, decode_edf_sample, EdfReader};
pub use source::DataSource;
pub use types::{
    ChannelInfo, DownsampledWaveform, RecordLayout, RecordingInfo, SampleFormat, SignalParam,
    WaveformWindow,
};

/// Size of the fixed header preamble in bytes
pub const EDF_PREAMBLE_SIZE: usize = 256;

/// Library version
///
/// ```rust
/// assert!(edfwindow::version().contains('.'));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
