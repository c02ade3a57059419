mod common;
use common::{dataset, temp_path};
use erpkit::{group_average, write_dataset, RawDataset, SignalWriter};

#[test]
fn dataset_survives_write_and_load() {
    let ds = dataset();
    let path = temp_path("dataset.safetensors");
    write_dataset(&ds, &path).unwrap();
    let back = RawDataset::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(back.subjects(), ds.subjects());
    assert_eq!(back.groups(), ds.groups());
    assert_eq!(back.timeline(), ds.timeline());
    assert_eq!(back.values(), ds.values());
}

#[test]
fn missing_file_is_io_error() {
    let err = RawDataset::load(&temp_path("does_not_exist.safetensors")).unwrap_err();
    assert_eq!(err.kind(), erpkit::ErrorKind::Io);
}

#[test]
fn signal_writer_stores_noise() {
    let ds = dataset();
    let sig = group_average(&ds, "ASD", (1, 10), 1).unwrap();
    let path = temp_path("signal.safetensors");
    let mut w = SignalWriter::new();
    w.add_signal("asd", &sig);
    w.write(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).ok();
    let n = u64::from_le_bytes(bytes[..8].try_into().unwrap()) as usize;
    let header: serde_json::Value = serde_json::from_slice(&bytes[8..8 + n]).unwrap();
    for key in ["asd", "asd_timeline", "asd_noise"] {
        assert_eq!(header[key]["dtype"], "F64", "{key}");
        assert_eq!(header[key]["shape"][0], sig.len() as u64, "{key}");
    }
}
