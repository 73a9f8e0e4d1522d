use edfwindow::doctest_utils::{ramp_fixture, FixtureBuilder, FixtureSignal};
use edfwindow::header::SignalField;
use edfwindow::{downsample_min_max, EdfError, EdfReader, SampleFormat};
use tempfile::tempdir;

// 恒等映射：物理值等于数字值
fn identity_signal(label: &str, samples_per_record: usize) -> FixtureSignal {
    FixtureSignal::new(label, samples_per_record).physical(-32768.0, 32767.0)
}

fn assert_relative_eq(actual: f64, expected: f64) {
    let tolerance = expected.abs().max(1.0) * 1e-6;
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_ramp_end_to_end() {
    let reader = EdfReader::from_bytes(ramp_fixture()).unwrap();

    assert_eq!(reader.channels().len(), 1);
    assert_eq!(reader.channels()[0].label, "EEG Fp1");
    assert_eq!(reader.channels()[0].unit, "uV");
    assert_eq!(reader.channels()[0].sample_rate_hz, 256.0);
    assert_eq!(reader.duration_seconds(), 1.0);

    let window = reader.read_physical_window(0, 0.0, 1.0).unwrap();
    assert_eq!(window.samples.len(), 256);
    assert!((window.samples[0] + 100.0).abs() < 0.01);
    assert!((window.samples[255] - 100.0).abs() < 0.01);

    let envelope = downsample_min_max(&window.samples, 100);
    assert_eq!(envelope.mins.len(), envelope.maxs.len());
    let overall_min = envelope.mins.iter().cloned().fold(f32::INFINITY, f32::min);
    let overall_max = envelope.maxs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    assert!((overall_min + 100.0).abs() < 1.0);
    assert!((overall_max - 100.0).abs() < 1.0);

    println!(
        "Ramp: {} samples -> {} buckets, range {:.2} to {:.2}",
        window.samples.len(),
        envelope.len(),
        overall_min,
        overall_max
    );
}

#[test]
fn test_open_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ramp.edf");
    std::fs::write(&path, ramp_fixture()).unwrap();

    let reader = EdfReader::open(&path).unwrap();
    assert_eq!(reader.layout().format, SampleFormat::Edf);
    assert_eq!(reader.layout().header_bytes, 512);
    assert_eq!(reader.layout().record_bytes, 512);
    assert_eq!(reader.layout().datarecords_in_file, 1);
}

#[test]
fn test_open_missing_file() {
    let dir = tempdir().unwrap();
    match EdfReader::open(dir.path().join("nonexistent.edf")) {
        Err(EdfError::FileNotFound(msg)) => assert!(msg.contains("nonexistent.edf")),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn test_channel_catalog() {
    let data = FixtureBuilder::new()
        .record_duration(0.5)
        .signal(FixtureSignal::new("Fp1-F7", 128))
        .signal(FixtureSignal::new("ECG", 64).unit("mV"))
        .signal(FixtureSignal::new("Resp", 4).unit("Ohm"))
        .records(8)
        .build();
    let reader = EdfReader::from_bytes(data).unwrap();

    let channels = reader.channels();
    assert_eq!(channels.len(), 3);
    for (i, channel) in channels.iter().enumerate() {
        assert_eq!(channel.id, i);
    }
    assert_eq!(channels[0].label, "Fp1-F7");
    assert_eq!(channels[0].sample_rate_hz, 256.0);
    assert_eq!(channels[1].unit, "mV");
    assert_eq!(channels[1].sample_rate_hz, 128.0);
    assert_eq!(channels[2].sample_rate_hz, 8.0);
    assert_eq!(reader.duration_seconds(), 4.0);
}

#[test]
fn test_record_layout_offsets() {
    let data = FixtureBuilder::new()
        .signal(FixtureSignal::new("A", 100))
        .signal(FixtureSignal::new("B", 10))
        .signal(FixtureSignal::new("C", 1))
        .records(3)
        .build();
    let reader = EdfReader::from_bytes(data).unwrap();

    let offsets: Vec<usize> = (0..3)
        .map(|i| reader.signal_param(i).unwrap().buffer_offset)
        .collect();
    assert_eq!(offsets, vec![0, 200, 220]);
    assert_eq!(reader.layout().record_bytes, 222);
    assert_eq!(reader.layout().header_bytes, 256 * 4);
    assert!(reader.signal_param(3).is_none());
}

#[test]
fn test_bdf_detection_and_layout() {
    let data = FixtureBuilder::new()
        .bdf()
        .signal(FixtureSignal::new("A", 10).digital(-8_388_608, 8_388_607))
        .signal(FixtureSignal::new("B", 5).digital(-8_388_608, 8_388_607))
        .records(2)
        .build();
    let reader = EdfReader::from_bytes(data).unwrap();

    assert_eq!(reader.layout().format, SampleFormat::Bdf);
    assert_eq!(reader.signal_param(0).unwrap().bytes_per_sample, 3);
    assert_eq!(reader.signal_param(1).unwrap().buffer_offset, 30);
    assert_eq!(reader.layout().record_bytes, 45);
    assert_eq!(reader.recording_info().version, "BIOSEMI");
}

#[test]
fn test_bdf_sign_extension_through_reader() {
    let data = FixtureBuilder::new()
        .bdf()
        .signal(
            FixtureSignal::new("Cz", 4)
                .digital(-8_388_608, 8_388_607)
                .physical(-8_388_608.0, 8_388_607.0)
                .samples(vec![-1, 1, -8_388_608, 8_388_607]),
        )
        .build();
    let reader = EdfReader::from_bytes(data).unwrap();

    let window = reader.read_physical_window(0, 0.0, 1.0).unwrap();
    assert_eq!(window.samples, vec![-1.0, 1.0, -8_388_608.0, 8_388_607.0]);
}

#[test]
fn test_physical_endpoints_round_trip() {
    let data = FixtureBuilder::new()
        .signal(
            FixtureSignal::new("ECG", 2)
                .physical(-3.5, 12.25)
                .digital(-2048, 2047)
                .unit("mV")
                .samples(vec![-2048, 2047]),
        )
        .build();
    let reader = EdfReader::from_bytes(data).unwrap();

    let param = reader.signal_param(0).unwrap();
    assert_relative_eq(param.to_physical(-2048), -3.5);
    assert_relative_eq(param.to_physical(2047), 12.25);

    // 与常见的 offset = physical_min - digital_min * bit_value 形式一致
    let textbook = |d: i32| {
        param.physical_min + (d as f64 - param.digital_min as f64) * param.bit_value
    };
    for d in [-2048, -1, 0, 1000, 2047] {
        assert_relative_eq(param.to_physical(d), textbook(d));
    }

    let window = reader.read_physical_window(0, 0.0, 1.0).unwrap();
    assert_relative_eq(window.samples[0] as f64, -3.5);
    assert_relative_eq(window.samples[1] as f64, 12.25);
}

#[test]
fn test_degenerate_digital_range_decodes_to_zero() {
    let data = FixtureBuilder::new()
        .signal(FixtureSignal::new("Flat", 4).digital(0, 0).samples(vec![0, 5, -3, 1000]))
        .build();
    let reader = EdfReader::from_bytes(data).unwrap();

    let param = reader.signal_param(0).unwrap();
    assert_eq!(param.bit_value, 1.0);
    assert_eq!(param.offset, 0.0);

    let window = reader.read_physical_window(0, 0.0, 1.0).unwrap();
    assert_eq!(window.samples.len(), 4);
    assert!(window.samples.iter().all(|&v| v == 0.0));
}

#[test]
fn test_recording_metadata() {
    let data = FixtureBuilder::new()
        .start("24.12.99", "23.59.58")
        .patient("MCH-0234567 F 02-MAY-1951 Haagse_Harry")
        .signal(FixtureSignal::new("EEG", 1))
        .build();
    let reader = EdfReader::from_bytes(data).unwrap();

    let info = reader.recording_info();
    assert_eq!(info.patient, "MCH-0234567 F 02-MAY-1951 Haagse_Harry");
    assert_eq!(info.start_date, chrono::NaiveDate::from_ymd_opt(1999, 12, 24));
    assert_eq!(info.start_time, chrono::NaiveTime::from_hms_opt(23, 59, 58));
}

#[test]
fn test_file_shorter_than_preamble() {
    match EdfReader::from_bytes(vec![b' '; 100]) {
        Err(EdfError::FileTooShort { len, required }) => {
            assert_eq!(len, 100);
            assert_eq!(required, 256);
        }
        other => panic!("expected FileTooShort, got {other:?}"),
    }
}

#[test]
fn test_file_shorter_than_declared_header() {
    let mut data = ramp_fixture();
    data.truncate(300);
    match EdfReader::from_bytes(data) {
        Err(EdfError::FileTooShort { required, .. }) => assert_eq!(required, 512),
        other => panic!("expected FileTooShort, got {other:?}"),
    }
}

#[test]
fn test_unparsable_preamble_fields() {
    let cases = [
        (184, 8, "abc", "header byte count"),
        (236, 8, "many", "number of data records"),
        (236, 8, "-1", "number of data records"),
        (244, 8, "0", "data record duration"),
        (244, 8, "-1.5", "data record duration"),
        (244, 8, "", "data record duration"),
    ];

    for (offset, width, text, expected) in cases {
        let data = FixtureBuilder::new()
            .signal(identity_signal("EEG", 8))
            .preamble_field(offset, width, text)
            .build();
        let err = EdfReader::from_bytes(data).unwrap_err();
        assert!(err.is_header_error());
        match err {
            EdfError::InvalidField { field, .. } => assert_eq!(field, expected),
            other => panic!("{text:?} at {offset}: expected InvalidField, got {other:?}"),
        }
    }
}

#[test]
fn test_invalid_signal_count() {
    for text in ["0", "-2", "x"] {
        let data = FixtureBuilder::new()
            .signal(identity_signal("EEG", 8))
            .preamble_field(252, 4, text)
            .build();
        assert!(matches!(
            EdfReader::from_bytes(data),
            Err(EdfError::InvalidSignalCount(_))
        ));
    }
}

#[test]
fn test_invalid_signal_field_names_signal() {
    let data = FixtureBuilder::new()
        .signal(identity_signal("A", 8))
        .signal(identity_signal("B", 8))
        .signal_field(1, SignalField::PhysicalMin, "abc")
        .build();
    match EdfReader::from_bytes(data) {
        Err(EdfError::InvalidSignalField { signal, field, value }) => {
            assert_eq!(signal, 1);
            assert_eq!(field, "physical minimum");
            assert_eq!(value, "abc");
        }
        other => panic!("expected InvalidSignalField, got {other:?}"),
    }

    let data = FixtureBuilder::new()
        .signal(identity_signal("A", 8))
        .signal_field(0, SignalField::SamplesPerRecord, "12.5")
        .build();
    let err = EdfReader::from_bytes(data).unwrap_err();
    assert!(err.to_string().contains("samples per record for signal 0"));
}

#[test]
fn test_free_text_fields_are_not_validated() {
    let data = FixtureBuilder::new()
        .signal(identity_signal("A", 8))
        .signal_field(0, SignalField::Transducer, "\u{00e9}lectrode")
        .signal_field(0, SignalField::Prefilter, "HP:0.1Hz LP:70Hz")
        .build();
    assert!(EdfReader::from_bytes(data).is_ok());
}
