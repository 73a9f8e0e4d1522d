// Internal utilities for documentation tests and integration tests
// Builds in-memory EDF/BDF images so tests do not need fixture files on disk

use std::path::Path;

use crate::header::{signal_field_blocks, SignalField, BDF_MAGIC};
use crate::{Result, EDF_PREAMBLE_SIZE};

/// One signal of a synthetic recording
#[derive(Debug, Clone)]
pub struct FixtureSignal {
    pub label: String,
    pub unit: String,
    pub physical_min: f64,
    pub physical_max: f64,
    pub digital_min: i32,
    pub digital_max: i32,
    pub samples_per_record: usize,
    /// 数字样本，按时间顺序跨越所有数据记录；不足部分补 0
    pub samples: Vec<i32>,
}

impl FixtureSignal {
    /// A 16-bit full-range signal mapped onto `[-100, 100] uV`.
    pub fn new(label: &str, samples_per_record: usize) -> Self {
        FixtureSignal {
            label: label.to_string(),
            unit: "uV".to_string(),
            physical_min: -100.0,
            physical_max: 100.0,
            digital_min: -32768,
            digital_max: 32767,
            samples_per_record,
            samples: Vec::new(),
        }
    }

    pub fn physical(mut self, min: f64, max: f64) -> Self {
        self.physical_min = min;
        self.physical_max = max;
        self
    }

    pub fn digital(mut self, min: i32, max: i32) -> Self {
        self.digital_min = min;
        self.digital_max = max;
        self
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    pub fn samples(mut self, samples: Vec<i32>) -> Self {
        self.samples = samples;
        self
    }
}

/// Builder for a synthetic EDF or BDF byte image
///
/// ```rust
/// use edfwindow::doctest_utils::{FixtureBuilder, FixtureSignal};
/// use edfwindow::EdfReader;
///
/// let data = FixtureBuilder::new()
///     .signal(FixtureSignal::new("Fp1-F7", 256).samples((0..512).collect()))
///     .build();
/// let reader = EdfReader::from_bytes(data)?;
/// assert_eq!(reader.duration_seconds(), 2.0);
/// # Ok::<(), edfwindow::EdfError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FixtureBuilder {
    bdf: bool,
    record_duration: String,
    records: Option<usize>,
    start_date: String,
    start_time: String,
    patient: String,
    signals: Vec<FixtureSignal>,
    preamble_overrides: Vec<(usize, usize, String)>,
    signal_overrides: Vec<(usize, SignalField, String)>,
}

impl Default for FixtureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureBuilder {
    pub fn new() -> Self {
        FixtureBuilder {
            bdf: false,
            record_duration: "1".to_string(),
            records: None,
            start_date: "01.01.24".to_string(),
            start_time: "00.00.00".to_string(),
            patient: "X X X X".to_string(),
            signals: Vec::new(),
            preamble_overrides: Vec::new(),
            signal_overrides: Vec::new(),
        }
    }

    /// Writes 24-bit samples and marks byte 0 with `0xFF`.
    pub fn bdf(mut self) -> Self {
        self.bdf = true;
        self
    }

    pub fn record_duration(mut self, seconds: f64) -> Self {
        self.record_duration = seconds.to_string();
        self
    }

    /// Number of data records; defaults to enough records to hold every signal's samples.
    pub fn records(mut self, records: usize) -> Self {
        self.records = Some(records);
        self
    }

    pub fn start(mut self, date: &str, time: &str) -> Self {
        self.start_date = date.to_string();
        self.start_time = time.to_string();
        self
    }

    pub fn patient(mut self, patient: &str) -> Self {
        self.patient = patient.to_string();
        self
    }

    pub fn signal(mut self, signal: FixtureSignal) -> Self {
        self.signals.push(signal);
        self
    }

    /// Replaces the preamble field at `offset..offset + width` with `text`.
    pub fn preamble_field(mut self, offset: usize, width: usize, text: &str) -> Self {
        self.preamble_overrides.push((offset, width, text.to_string()));
        self
    }

    /// Replaces one per-signal header entry with `text`.
    pub fn signal_field(mut self, signal: usize, field: SignalField, text: &str) -> Self {
        self.signal_overrides.push((signal, field, text.to_string()));
        self
    }

    pub fn header_bytes(&self) -> usize {
        EDF_PREAMBLE_SIZE * (self.signals.len() + 1)
    }

    fn record_count(&self) -> usize {
        self.records.unwrap_or_else(|| {
            self.signals
                .iter()
                .map(|s| s.samples.len().div_ceil(s.samples_per_record.max(1)))
                .max()
                .unwrap_or(0)
                .max(1)
        })
    }

    pub fn build(&self) -> Vec<u8> {
        let ns = self.signals.len();
        let records = self.record_count();
        let mut data = vec![b' '; self.header_bytes()];

        if self.bdf {
            data[0] = BDF_MAGIC;
            put(&mut data, 1, 7, "BIOSEMI");
        } else {
            put(&mut data, 0, 8, "0");
        }
        put(&mut data, 8, 80, &self.patient);
        put(&mut data, 88, 80, "Startdate X X X X");
        put(&mut data, 168, 8, &self.start_date);
        put(&mut data, 176, 8, &self.start_time);
        put(&mut data, 184, 8, &self.header_bytes().to_string());
        put(&mut data, 236, 8, &records.to_string());
        put(&mut data, 244, 8, &self.record_duration);
        put(&mut data, 252, 4, &ns.to_string());

        let blocks = signal_field_blocks(ns);
        for (i, signal) in self.signals.iter().enumerate() {
            for block in &blocks {
                let text = match block.field {
                    SignalField::Label => signal.label.clone(),
                    SignalField::PhysicalDimension => signal.unit.clone(),
                    SignalField::PhysicalMin => signal.physical_min.to_string(),
                    SignalField::PhysicalMax => signal.physical_max.to_string(),
                    SignalField::DigitalMin => signal.digital_min.to_string(),
                    SignalField::DigitalMax => signal.digital_max.to_string(),
                    SignalField::SamplesPerRecord => signal.samples_per_record.to_string(),
                    SignalField::Transducer | SignalField::Prefilter | SignalField::Reserved => {
                        String::new()
                    }
                };
                let range = block.range(i);
                put(&mut data, range.start, block.width, &text);
            }
        }

        for (offset, width, text) in &self.preamble_overrides {
            put(&mut data, *offset, *width, text);
        }
        for (signal, field, text) in &self.signal_overrides {
            let block = blocks[*field as usize];
            put(&mut data, block.range(*signal).start, block.width, text);
        }

        // 数据记录：每条记录依次写入各信号的样本
        for record in 0..records {
            for signal in &self.signals {
                let spr = signal.samples_per_record;
                for k in 0..spr {
                    let value = signal.samples.get(record * spr + k).copied().unwrap_or(0);
                    let bytes = value.to_le_bytes();
                    if self.bdf {
                        data.extend_from_slice(&bytes[..3]);
                    } else {
                        data.extend_from_slice(&(value as i16).to_le_bytes());
                    }
                }
            }
        }

        data
    }

    /// Writes the image to `path`.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.build())?;
        Ok(())
    }
}

/// Creates the 1-channel, 1-second, 256 Hz ramp recording used throughout the docs:
/// digital `-32768..=32767` mapped onto `[-100, 100] uV`.
pub fn ramp_fixture() -> Vec<u8> {
    let samples = (0..256)
        .map(|i| -32768 + ((i as i64 * 65535) / 255) as i32)
        .collect();
    FixtureBuilder::new()
        .signal(FixtureSignal::new("EEG Fp1", 256).samples(samples))
        .build()
}

/// 左对齐、空格填充、超长截断
fn put(data: &mut [u8], offset: usize, width: usize, text: &str) {
    let bytes = text.as_bytes();
    for (k, slot) in data[offset..offset + width].iter_mut().enumerate() {
        *slot = bytes.get(k).copied().unwrap_or(b' ');
    }
}
