//! EDF/BDF header parsing
//!
//! The first 256 bytes hold the fixed preamble. The signal header that
//! follows is field-major: all `ns` labels, then all `ns` transducer strings,
//! and so on. [`signal_field_blocks`] computes where each of those sub-blocks
//! starts so the offset arithmetic can be checked on its own.

use chrono::{NaiveDate, NaiveTime};
use log::debug;

use crate::error::{EdfError, Result};
use crate::types::{ChannelInfo, RecordLayout, RecordingInfo, SampleFormat, SignalParam};
use crate::utils::{ascii_field, parse_ascii_float, parse_ascii_int};
use crate::EDF_PREAMBLE_SIZE;

/// First byte of a BDF file
pub const BDF_MAGIC: u8 = 0xFF;

/// One field of the per-signal header, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalField {
    Label,
    Transducer,
    PhysicalDimension,
    PhysicalMin,
    PhysicalMax,
    DigitalMin,
    DigitalMax,
    Prefilter,
    SamplesPerRecord,
    Reserved,
}

impl SignalField {
    pub const ALL: [SignalField; 10] = [
        SignalField::Label,
        SignalField::Transducer,
        SignalField::PhysicalDimension,
        SignalField::PhysicalMin,
        SignalField::PhysicalMax,
        SignalField::DigitalMin,
        SignalField::DigitalMax,
        SignalField::Prefilter,
        SignalField::SamplesPerRecord,
        SignalField::Reserved,
    ];

    /// Width of one signal's entry in bytes
    pub fn width(self) -> usize {
        match self {
            SignalField::Label => 16,
            SignalField::Transducer | SignalField::Prefilter => 80,
            SignalField::Reserved => 32,
            _ => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SignalField::Label => "label",
            SignalField::Transducer => "transducer type",
            SignalField::PhysicalDimension => "physical dimension",
            SignalField::PhysicalMin => "physical minimum",
            SignalField::PhysicalMax => "physical maximum",
            SignalField::DigitalMin => "digital minimum",
            SignalField::DigitalMax => "digital maximum",
            SignalField::Prefilter => "prefiltering",
            SignalField::SamplesPerRecord => "samples per record",
            SignalField::Reserved => "reserved",
        }
    }
}

/// Location of one field's sub-block inside the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBlock {
    pub field: SignalField,
    /// 子块起始位置（从文件开头算起）
    pub start: usize,
    pub width: usize,
    pub signal_count: usize,
}

impl FieldBlock {
    /// Byte range of `signal`'s entry in this block
    pub fn range(&self, signal: usize) -> std::ops::Range<usize> {
        let start = self.start + signal * self.width;
        start..start + self.width
    }

    pub fn end(&self) -> usize {
        self.start + self.width * self.signal_count
    }
}

/// Computes the start offset of every per-signal sub-block for `signal_count`
/// signals. Each block starts where the previous one ends, beginning at byte 256.
pub fn signal_field_blocks(signal_count: usize) -> Vec<FieldBlock> {
    let mut start = EDF_PREAMBLE_SIZE;
    SignalField::ALL
        .iter()
        .map(|&field| {
            let block = FieldBlock {
                field,
                start,
                width: field.width(),
                signal_count,
            };
            start = block.end();
            block
        })
        .collect()
}

/// Everything derived from the header, computed once per file
#[derive(Debug, Clone)]
pub struct EdfHeader {
    pub layout: RecordLayout,
    pub channels: Vec<ChannelInfo>,
    pub signals: Vec<SignalParam>,
    pub recording: RecordingInfo,
}

impl EdfHeader {
    pub fn file_duration(&self) -> f64 {
        self.layout.file_duration()
    }
}

/// Parses the preamble and signal header of an in-memory EDF/BDF image.
///
/// # Errors
///
/// * `EdfError::FileTooShort` - fewer than 256 bytes, or fewer than the
///   declared header length
/// * `EdfError::InvalidField` - a required preamble field is unparsable
/// * `EdfError::InvalidSignalCount` - the signal count is unparsable or not positive
/// * `EdfError::InvalidSignalField` - a numeric per-signal field is unparsable
pub fn parse_header(data: &[u8]) -> Result<EdfHeader> {
    if data.len() < EDF_PREAMBLE_SIZE {
        return Err(EdfError::FileTooShort {
            len: data.len(),
            required: EDF_PREAMBLE_SIZE,
        });
    }

    let format = if data[0] == BDF_MAGIC {
        SampleFormat::Bdf
    } else {
        SampleFormat::Edf
    };

    // 解析固定头部字段
    let header_bytes = parse_ascii_int(&data[184..192])
        .filter(|&v| v >= 0)
        .ok_or_else(|| invalid_field("header byte count", &data[184..192]))?
        as usize;

    let datarecords = parse_ascii_int(&data[236..244])
        .filter(|&v| v >= 0)
        .ok_or_else(|| invalid_field("number of data records", &data[236..244]))?
        as usize;

    let datarecord_duration = parse_ascii_float(&data[244..252])
        .filter(|&v| v > 0.0)
        .ok_or_else(|| invalid_field("data record duration", &data[244..252]))?;

    let signal_count = parse_ascii_int(&data[252..256])
        .filter(|&v| v > 0)
        .ok_or_else(|| EdfError::InvalidSignalCount(ascii_field(&data[252..256])))?
        as usize;

    if data.len() < header_bytes {
        return Err(EdfError::FileTooShort {
            len: data.len(),
            required: header_bytes,
        });
    }

    let blocks = signal_field_blocks(signal_count);
    // 保留字段不参与解析，不要求其存在
    let parsed_end = blocks
        .iter()
        .filter(|b| b.field != SignalField::Reserved)
        .map(FieldBlock::end)
        .max()
        .unwrap_or(EDF_PREAMBLE_SIZE);
    if data.len() < parsed_end {
        return Err(EdfError::FileTooShort {
            len: data.len(),
            required: parsed_end,
        });
    }

    // blocks 与 SignalField::ALL 顺序一致
    let block = |field: SignalField| blocks[field as usize];

    let bytes_per_sample = format.bytes_per_sample();
    let mut channels = Vec::with_capacity(signal_count);
    let mut signals = Vec::with_capacity(signal_count);
    let mut buffer_offset = 0usize;

    for i in 0..signal_count {
        let text = |field: SignalField| ascii_field(&data[block(field).range(i)]);
        let float = |field: SignalField| -> Result<f64> {
            let bytes = &data[block(field).range(i)];
            parse_ascii_float(bytes).ok_or_else(|| invalid_signal_field(i, field, bytes))
        };
        let int = |field: SignalField| -> Result<i64> {
            let bytes = &data[block(field).range(i)];
            parse_ascii_int(bytes).ok_or_else(|| invalid_signal_field(i, field, bytes))
        };

        let label = text(SignalField::Label);
        let unit = text(SignalField::PhysicalDimension);
        let physical_min = float(SignalField::PhysicalMin)?;
        let physical_max = float(SignalField::PhysicalMax)?;
        let digital_min = int(SignalField::DigitalMin)?;
        let digital_max = int(SignalField::DigitalMax)?;

        let samples_bytes = &data[block(SignalField::SamplesPerRecord).range(i)];
        let samples_per_record = int(SignalField::SamplesPerRecord)?;
        if samples_per_record < 1 {
            return Err(invalid_signal_field(i, SignalField::SamplesPerRecord, samples_bytes));
        }
        let samples_per_record = samples_per_record as usize;

        channels.push(ChannelInfo {
            id: i,
            label: label.clone(),
            sample_rate_hz: samples_per_record as f64 / datarecord_duration,
            unit: unit.clone(),
        });

        signals.push(SignalParam::new(
            &label,
            &unit,
            physical_min,
            physical_max,
            digital_min,
            digital_max,
            samples_per_record,
            buffer_offset,
            bytes_per_sample,
        ));

        // 更新缓冲区偏移
        buffer_offset += samples_per_record * bytes_per_sample;
    }

    let layout = RecordLayout {
        format,
        header_bytes,
        record_bytes: buffer_offset,
        datarecords_in_file: datarecords,
        datarecord_duration,
    };

    debug!(
        "parsed {:?} header: {} signals, {} records of {} s ({} bytes each), header {} bytes",
        format, signal_count, datarecords, datarecord_duration, buffer_offset, header_bytes
    );

    Ok(EdfHeader {
        layout,
        channels,
        signals,
        recording: parse_recording_info(data),
    })
}

/// 解析描述性字段，失败时返回 `None` 而不是错误
fn parse_recording_info(data: &[u8]) -> RecordingInfo {
    let version = if data[0] == BDF_MAGIC {
        ascii_field(&data[1..8])
    } else {
        ascii_field(&data[0..8])
    };

    RecordingInfo {
        version,
        patient: ascii_field(&data[8..88]),
        recording: ascii_field(&data[88..168]),
        start_date: parse_start_date(&ascii_field(&data[168..176])),
        start_time: parse_start_time(&ascii_field(&data[176..184])),
        reserved: ascii_field(&data[192..236]),
    }
}

/// 解析日期 "dd.mm.yy"
fn parse_start_date(s: &str) -> Option<NaiveDate> {
    let parts: Vec<u32> = dotted_triplet(s)?;
    let yy = parts[2] as i32;
    let year = if yy > 84 { 1900 + yy } else { 2000 + yy };
    NaiveDate::from_ymd_opt(year, parts[1], parts[0])
}

/// 解析时间 "hh.mm.ss"
fn parse_start_time(s: &str) -> Option<NaiveTime> {
    let parts = dotted_triplet(s)?;
    NaiveTime::from_hms_opt(parts[0], parts[1], parts[2])
}

fn dotted_triplet(s: &str) -> Option<Vec<u32>> {
    let parts = s
        .split('.')
        .map(|p| p.trim().parse::<u32>().ok())
        .collect::<Option<Vec<u32>>>()?;
    (parts.len() == 3).then_some(parts)
}

fn invalid_field(field: &'static str, bytes: &[u8]) -> EdfError {
    EdfError::InvalidField {
        field,
        value: ascii_field(bytes),
    }
}

fn invalid_signal_field(signal: usize, field: SignalField, bytes: &[u8]) -> EdfError {
    EdfError::InvalidSignalField {
        signal,
        field: field.name(),
        value: ascii_field(bytes),
    }
}
