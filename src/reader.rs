use std::fs;
use std::path::Path;

use log::trace;

use crate::error::{EdfError, Result};
use crate::header::{parse_header, EdfHeader};
use crate::types::{
    ChannelInfo, RecordLayout, RecordingInfo, SampleFormat, SignalParam, WaveformWindow,
};

/// Keeps a record that starts exactly at the window end out of the record range.
const RECORD_EPSILON: f64 = 1e-9;

/// EDF/BDF reader over an in-memory copy of the file
///
/// The header is parsed once on construction; every later call only reads.
/// Reads take `&self`, so one reader can be shared across threads (for
/// example behind an `Arc`) without locking.
///
/// # Examples
///
/// ```rust
/// use edfwindow::{downsample_min_max, EdfReader};
///
/// # let data = edfwindow::doctest_utils::ramp_fixture();
/// let reader = EdfReader::from_bytes(data)?;
/// for channel in reader.channels() {
///     println!("{}: {} ({} Hz)", channel.id, channel.label, channel.sample_rate_hz);
/// }
///
/// let window = reader.read_physical_window(0, 0.0, 1.0)?;
/// assert_eq!(window.samples.len(), 256);
///
/// let envelope = downsample_min_max(&window.samples, 100);
/// assert_eq!(envelope.mins.len(), envelope.maxs.len());
/// # Ok::<(), edfwindow::EdfError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EdfReader {
    data: Vec<u8>,
    header: EdfHeader,
}

impl EdfReader {
    /// Loads the whole file into memory and parses its header
    ///
    /// # Errors
    ///
    /// * `EdfError::FileNotFound` - the file doesn't exist or can't be opened
    /// * any header error from [`EdfReader::from_bytes`]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(&path)
            .map_err(|e| EdfError::FileNotFound(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_bytes(data)
    }

    /// Parses the header of an EDF/BDF image and takes ownership of the bytes
    ///
    /// # Errors
    ///
    /// * `EdfError::FileTooShort` - shorter than 256 bytes or than the declared header
    /// * `EdfError::InvalidField` - a required preamble field is unparsable
    /// * `EdfError::InvalidSignalCount` - the signal count is unparsable or not positive
    /// * `EdfError::InvalidSignalField` - a per-signal numeric field is unparsable
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let header = parse_header(&data)?;
        Ok(EdfReader { data, header })
    }

    pub fn header(&self) -> &EdfHeader {
        &self.header
    }

    /// Channel catalog in declaration order; `channels()[i].id == i`
    pub fn channels(&self) -> &[ChannelInfo] {
        &self.header.channels
    }

    /// Total recording length: number of data records × record duration
    pub fn duration_seconds(&self) -> f64 {
        self.header.file_duration()
    }

    pub fn layout(&self) -> &RecordLayout {
        &self.header.layout
    }

    pub fn recording_info(&self) -> &RecordingInfo {
        &self.header.recording
    }

    pub fn signal_param(&self, channel_id: usize) -> Option<&SignalParam> {
        self.header.signals.get(channel_id)
    }

    /// Decodes the physical values of one channel between `start_seconds`
    /// and `start_seconds + duration_seconds`.
    ///
    /// The range is clamped to `[0, duration]` first. A range that is empty
    /// after clamping yields an empty window, not an error. The returned
    /// window carries the clamped start and duration.
    ///
    /// Only the data records overlapping the range are touched, and within
    /// each record only this channel's samples are decoded.
    ///
    /// # Errors
    ///
    /// * `EdfError::InvalidChannel` - `channel_id` is not in the catalog
    /// * `EdfError::TruncatedRecord` - an overlapping record lies past the end of the data
    pub fn read_physical_window(
        &self,
        channel_id: usize,
        start_seconds: f64,
        duration_seconds: f64,
    ) -> Result<WaveformWindow> {
        let param = self
            .header
            .signals
            .get(channel_id)
            .ok_or(EdfError::InvalidChannel(channel_id))?;
        let sample_rate = self.header.channels[channel_id].sample_rate_hz;
        let layout = &self.header.layout;
        let file_duration = layout.file_duration();

        // 限制在文件时长范围内
        let start = start_seconds.max(0.0).min(file_duration);
        if duration_seconds.is_nan() {
            return Ok(WaveformWindow::empty(start));
        }
        let end = (start + duration_seconds).min(file_duration);
        let duration = end - start;
        if !(duration > 0.0) || layout.datarecords_in_file == 0 {
            return Ok(WaveformWindow::empty(start));
        }

        let record_duration = layout.datarecord_duration;
        let first_record = (start / record_duration).floor() as usize;
        let last_record = (layout.datarecords_in_file - 1)
            .min(((end - RECORD_EPSILON) / record_duration).floor().max(0.0) as usize);
        if first_record > last_record || first_record >= layout.datarecords_in_file {
            return Ok(WaveformWindow::empty(start));
        }

        // 预留容量不超过缓冲区实际能容纳的样本数
        let capacity = ((duration * sample_rate).ceil() as usize)
            .min(self.data.len().saturating_sub(layout.header_bytes) / param.bytes_per_sample);
        let mut samples = Vec::with_capacity(capacity);

        for record in first_record..=last_record {
            let record_start = record as f64 * record_duration;

            let first_sample = ((start - record_start).max(0.0) * sample_rate).floor() as usize;
            let window_end = (end - record_start).min(record_duration);
            let last_sample = param
                .samples_per_record
                .min((window_end * sample_rate).ceil().max(0.0) as usize);
            if first_sample >= last_sample {
                continue;
            }

            let bytes = self.record_slice(record, param, first_sample, last_sample)?;
            decode_into(&mut samples, bytes, layout.format, param);
        }

        trace!(
            "channel {} window [{:.3}, {:.3}) s: records {}..={}, {} samples",
            channel_id,
            start,
            end,
            first_record,
            last_record,
            samples.len()
        );

        Ok(WaveformWindow {
            start_seconds: start,
            duration_seconds: duration,
            samples,
        })
    }

    /// Raw bytes of samples `first..last` of one channel in one data record
    fn record_slice(
        &self,
        record: usize,
        param: &SignalParam,
        first: usize,
        last: usize,
    ) -> Result<&[u8]> {
        let layout = &self.header.layout;
        // 计算文件偏移量
        let offset = record
            .checked_mul(layout.record_bytes)
            .and_then(|o| o.checked_add(layout.header_bytes + param.buffer_offset))
            .and_then(|o| o.checked_add(first * param.bytes_per_sample));
        let end = offset.and_then(|o| o.checked_add((last - first) * param.bytes_per_sample));

        let truncated = EdfError::TruncatedRecord {
            record,
            end: end.unwrap_or(usize::MAX),
            len: self.data.len(),
        };
        match (offset, end) {
            (Some(offset), Some(end)) => self.data.get(offset..end).ok_or(truncated),
            _ => Err(truncated),
        }
    }
}

fn decode_into(out: &mut Vec<f32>, bytes: &[u8], format: SampleFormat, param: &SignalParam) {
    match format {
        SampleFormat::Edf => out.extend(
            bytes
                .chunks_exact(2)
                .map(|b| param.to_physical(decode_edf_sample([b[0], b[1]])) as f32),
        ),
        SampleFormat::Bdf => out.extend(
            bytes
                .chunks_exact(3)
                .map(|b| param.to_physical(decode_bdf_sample([b[0], b[1], b[2]])) as f32),
        ),
    }
}

/// Decodes a 16-bit little-endian EDF sample.
pub fn decode_edf_sample(bytes: [u8; 2]) -> i32 {
    i16::from_le_bytes(bytes) as i32
}

/// Decodes a 24-bit little-endian BDF sample; the top byte carries the sign.
pub fn decode_bdf_sample(bytes: [u8; 3]) -> i32 {
    (bytes[0] as i32) | ((bytes[1] as i32) << 8) | ((bytes[2] as i8 as i32) << 16)
}
