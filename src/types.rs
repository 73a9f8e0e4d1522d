use chrono::{NaiveDate, NaiveTime};

/// Sample encoding of the data records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// EDF: 16-bit little-endian two's complement
    Edf,
    /// BDF: 24-bit little-endian two's complement (first header byte is `0xFF`)
    Bdf,
}

impl SampleFormat {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::Edf => 2,
            SampleFormat::Bdf => 3,
        }
    }
}

/// One entry of the channel catalog
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelInfo {
    /// 0-based index in declaration order
    pub id: usize,
    pub label: String,
    pub sample_rate_hz: f64,
    pub unit: String,
}

/// Scaling and layout parameters of one signal, derived once at parse time
#[derive(Debug, Clone)]
pub struct SignalParam {
    pub label: String,
    pub physical_dimension: String,
    pub physical_min: f64,
    pub physical_max: f64,
    pub digital_min: i64,
    pub digital_max: i64,
    pub samples_per_record: usize,
    /// 每个数字单位对应的物理值
    pub bit_value: f64,
    /// 缩放前加到数字值上的偏移
    pub offset: f64,
    /// 信号在数据记录中的字节偏移
    pub buffer_offset: usize,
    pub bytes_per_sample: usize,
}

impl SignalParam {
    /// Converts a digital sample to its physical value.
    ///
    /// `physical = bit_value * (offset + digital)`, which maps `digital_min`
    /// to `physical_min` and `digital_max` to `physical_max`. A channel whose
    /// digital range is zero carries `bit_value = 1, offset = 0` and decodes
    /// every sample to `0.0`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use edfwindow::SignalParam;
    ///
    /// let param = SignalParam::new("EEG Fp1", "uV", -100.0, 100.0, -32768, 32767, 256, 0, 2);
    /// assert!((param.to_physical(-32768) + 100.0).abs() < 1e-9);
    /// assert!((param.to_physical(32767) - 100.0).abs() < 1e-9);
    /// ```
    pub fn to_physical(&self, digital_value: i32) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        if self.bit_value == 0.0 {
            // physical_min == physical_max
            return self.physical_min;
        }
        self.bit_value * (self.offset + digital_value as f64)
    }

    /// True when `digital_min == digital_max`
    pub fn is_degenerate(&self) -> bool {
        self.digital_min == self.digital_max
    }

    /// Builds the parameters for one signal and derives its scale factors.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        label: &str,
        physical_dimension: &str,
        physical_min: f64,
        physical_max: f64,
        digital_min: i64,
        digital_max: i64,
        samples_per_record: usize,
        buffer_offset: usize,
        bytes_per_sample: usize,
    ) -> Self {
        let digital_range = (digital_max - digital_min) as f64;
        let (bit_value, offset) = if digital_range == 0.0 {
            (1.0, 0.0)
        } else {
            let bit_value = (physical_max - physical_min) / digital_range;
            if bit_value == 0.0 {
                (0.0, 0.0)
            } else {
                (bit_value, physical_max / bit_value - digital_max as f64)
            }
        };

        SignalParam {
            label: label.to_string(),
            physical_dimension: physical_dimension.to_string(),
            physical_min,
            physical_max,
            digital_min,
            digital_max,
            samples_per_record,
            bit_value,
            offset,
            buffer_offset,
            bytes_per_sample,
        }
    }
}

/// File-wide geometry of the data records
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordLayout {
    pub format: SampleFormat,
    /// 头部总字节数
    pub header_bytes: usize,
    /// 每个数据记录的大小（字节）
    pub record_bytes: usize,
    pub datarecords_in_file: usize,
    /// 数据记录时长（秒）
    pub datarecord_duration: f64,
}

impl RecordLayout {
    pub fn file_duration(&self) -> f64 {
        self.datarecords_in_file as f64 * self.datarecord_duration
    }
}

/// Descriptive header fields that play no part in decoding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingInfo {
    pub version: String,
    pub patient: String,
    pub recording: String,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub reserved: String,
}

/// Decoded samples for one channel over a (clamped) time range
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveformWindow {
    pub start_seconds: f64,
    pub duration_seconds: f64,
    pub samples: Vec<f32>,
}

impl WaveformWindow {
    pub fn empty(start_seconds: f64) -> Self {
        WaveformWindow {
            start_seconds,
            duration_seconds: 0.0,
            samples: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Min/max envelope, one pair per display bucket
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownsampledWaveform {
    pub mins: Vec<f32>,
    pub maxs: Vec<f32>,
}

impl DownsampledWaveform {
    pub fn len(&self) -> usize {
        self.mins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mins.is_empty()
    }
}
