//! Safetensors exchange for datasets and signals.
//!
//! Dataset layout read by [`RawDataset::load`]:
//!
//! ```text
//! values    [S, T, TR, B]  F32 | F64   NaN = missing
//! timeline  [T]            F32 | F64   ms
//! subjects  [n]            U8          newline-separated ids
//! groups    [n]            U8          newline-separated labels
//! ```
//!
//! [`SignalWriter`] stores each signal as `<name>`, `<name>_timeline` and,
//! when present, `<name>_noise` (all F64).
use ndarray::{Array1, Array4};
use std::collections::HashMap;
use std::path::Path;

use crate::dataset::RawDataset;
use crate::error::{ErpError, Result};
use crate::signal::Signal;

// ── Low-level safetensors parser ─────────────────────────────────────────────

type Header = HashMap<String, serde_json::Value>;

fn format_err(msg: impl Into<String>) -> ErpError {
    ErpError::Format(msg.into())
}

fn parse_header(bytes: &[u8]) -> Result<(Header, usize)> {
    let len_bytes: [u8; 8] = bytes
        .get(..8)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| format_err("safetensors file too small"))?;
    let end = usize::try_from(u64::from_le_bytes(len_bytes))
        .ok()
        .and_then(|n| n.checked_add(8))
        .ok_or_else(|| format_err("header length overflows"))?;
    let raw = bytes
        .get(8..end)
        .ok_or_else(|| format_err("header length exceeds file size"))?;
    let header: Header = serde_json::from_slice(raw)
        .map_err(|e| format_err(format!("failed to parse header: {e}")))?;
    Ok((header, end))
}

fn entry<'h>(header: &'h Header, key: &str) -> Result<&'h serde_json::Value> {
    header.get(key).ok_or_else(|| format_err(format!("missing '{key}' key")))
}

fn tensor_bytes<'b>(
    bytes: &'b [u8],
    data_start: usize,
    entry: &serde_json::Value,
) -> Result<&'b [u8]> {
    let offsets = entry["data_offsets"]
        .as_array()
        .filter(|o| o.len() == 2)
        .ok_or_else(|| format_err("bad data_offsets"))?;
    let absolute = |v: &serde_json::Value| {
        v.as_u64()
            .and_then(|o| usize::try_from(o).ok())
            .and_then(|o| data_start.checked_add(o))
            .ok_or_else(|| format_err("bad data_offsets"))
    };
    let (s, e) = (absolute(&offsets[0])?, absolute(&offsets[1])?);
    bytes
        .get(s..e)
        .ok_or_else(|| format_err("tensor data out of bounds"))
}

fn shape_of(entry: &serde_json::Value) -> Result<Vec<usize>> {
    entry["shape"]
        .as_array()
        .ok_or_else(|| format_err("missing shape"))?
        .iter()
        .map(|v| {
            v.as_u64()
                .map(|n| n as usize)
                .ok_or_else(|| format_err("bad shape"))
        })
        .collect()
}

/// Read an F32 or F64 tensor, widened to f64.
fn read_f64_tensor(bytes: &[u8], data_start: usize, entry: &serde_json::Value) -> Result<Vec<f64>> {
    let raw = tensor_bytes(bytes, data_start, entry)?;
    match entry["dtype"].as_str() {
        Some("F32") => Ok(raw
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
            .collect()),
        Some("F64") => Ok(raw
            .chunks_exact(8)
            .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
            .collect()),
        other => Err(format_err(format!("unsupported dtype {other:?}, expected F32 or F64"))),
    }
}

fn read_strings(bytes: &[u8], data_start: usize, entry: &serde_json::Value) -> Result<Vec<String>> {
    let raw = tensor_bytes(bytes, data_start, entry)?;
    let text = std::str::from_utf8(raw).map_err(|e| format_err(format!("invalid UTF-8: {e}")))?;
    Ok(text
        .split('\n')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect())
}

// ── Dataset reader ───────────────────────────────────────────────────────────

impl RawDataset {
    /// Load a dataset written by [`write_dataset`] (or any producer of the
    /// layout above) and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let (header, data_start) = parse_header(&bytes)?;

        let values_entry = entry(&header, "values")?;
        let shape = shape_of(values_entry)?;
        if shape.len() != 4 {
            return Err(format_err(format!("'values' must be 4-D, got shape {shape:?}")));
        }
        let values = Array4::from_shape_vec(
            (shape[0], shape[1], shape[2], shape[3]),
            read_f64_tensor(&bytes, data_start, values_entry)?,
        )
        .map_err(|e| format_err(format!("'values': {e}")))?;

        let timeline_entry = entry(&header, "timeline")?;
        let timeline = Array1::from(read_f64_tensor(&bytes, data_start, timeline_entry)?);
        let subjects = read_strings(&bytes, data_start, entry(&header, "subjects")?)?;
        let groups = read_strings(&bytes, data_start, entry(&header, "groups")?)?;

        log::debug!("loaded {} : {:?} {} groups", path.display(), values.dim(), groups.len());
        RawDataset::new(values, subjects, groups, timeline)
    }
}

// ── Writer ───────────────────────────────────────────────────────────────────

struct Tensor {
    name: String,
    dtype: &'static str,
    shape: Vec<usize>,
    bytes: Vec<u8>,
}

/// Safetensors writer for F64 and string tensors.
///
/// ```rust,no_run
/// use erpkit::io::SignalWriter;
/// use std::path::Path;
/// let mut w = SignalWriter::new();
/// w.add_f64("timeline", &[0.0, 2.0, 4.0], &[3]);
/// w.write(Path::new("/tmp/out.safetensors")).unwrap();
/// ```
#[derive(Default)]
pub struct SignalWriter {
    tensors: Vec<Tensor>,
}

impl SignalWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_f64(&mut self, name: &str, data: &[f64], shape: &[usize]) {
        self.tensors.push(Tensor {
            name: name.to_string(),
            dtype: "F64",
            shape: shape.to_vec(),
            bytes: data.iter().flat_map(|v| v.to_le_bytes()).collect(),
        });
    }

    /// Newline-joined strings as a U8 tensor.
    pub fn add_strings(&mut self, name: &str, items: &[String]) {
        let bytes = items.join("\n").into_bytes();
        self.tensors.push(Tensor {
            name: name.to_string(),
            dtype: "U8",
            shape: vec![bytes.len()],
            bytes,
        });
    }

    /// `<name>`, `<name>_timeline` and, if the signal has noise, `<name>_noise`.
    pub fn add_signal(&mut self, name: &str, signal: &Signal) {
        let n = signal.len();
        self.add_f64(name, &signal.values().to_vec(), &[n]);
        self.add_f64(&format!("{name}_timeline"), &signal.timeline().to_vec(), &[n]);
        if let Some(noise) = signal.noise() {
            self.add_f64(&format!("{name}_noise"), &noise.to_vec(), &[n]);
        }
    }

    /// Header JSON, space-padded to a multiple of 8 bytes.
    fn header(&self) -> Result<Vec<u8>> {
        let mut offset = 0usize;
        let map: serde_json::Map<String, serde_json::Value> = self
            .tensors
            .iter()
            .map(|t| {
                let range = [offset, offset + t.bytes.len()];
                offset = range[1];
                let meta = serde_json::json!({
                    "dtype": t.dtype,
                    "shape": t.shape,
                    "data_offsets": range,
                });
                (t.name.clone(), meta)
            })
            .collect();
        let mut header = serde_json::to_vec(&map)
            .map_err(|e| format_err(format!("failed to encode header: {e}")))?;
        header.resize(header.len().next_multiple_of(8), b' ');
        Ok(header)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let header = self.header()?;
        let payload: usize = self.tensors.iter().map(|t| t.bytes.len()).sum();
        let mut buf = Vec::with_capacity(8 + header.len() + payload);
        buf.extend_from_slice(&(header.len() as u64).to_le_bytes());
        buf.extend_from_slice(&header);
        for t in &self.tensors {
            buf.extend_from_slice(&t.bytes);
        }
        std::fs::write(path, buf)?;
        Ok(())
    }
}

/// Write `dataset` in the layout [`RawDataset::load`] reads.
pub fn write_dataset(dataset: &RawDataset, path: &Path) -> Result<()> {
    let mut w = SignalWriter::new();
    let values: Vec<f64> = dataset.values().iter().copied().collect();
    w.add_f64("values", &values, dataset.values().shape());
    w.add_f64("timeline", &dataset.timeline().to_vec(), &[dataset.n_times()]);
    w.add_strings("subjects", dataset.subjects());
    w.add_strings("groups", dataset.groups());
    w.write(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_too_small() {
        assert!(parse_header(&[1, 2, 3]).is_err());
    }

    #[test]
    fn header_longer_than_file() {
        let mut bytes = 1000u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"{}");
        assert!(parse_header(&bytes).is_err());
    }

    #[test]
    fn header_length_overflows() {
        let mut bytes = u64::MAX.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"{}");
        assert!(matches!(parse_header(&bytes), Err(ErpError::Format(_))));
    }

    #[test]
    fn data_offsets_overflow() {
        let e = serde_json::json!({"dtype": "F64", "shape": [1], "data_offsets": [0, u64::MAX]});
        assert!(matches!(tensor_bytes(&[0; 8], 16, &e), Err(ErpError::Format(_))));
    }

    #[test]
    fn header_is_padded_to_eight_bytes() {
        let mut w = SignalWriter::new();
        w.add_f64("x", &[1.0], &[1]);
        w.add_strings("ids", &["S01".to_string()]);
        let header = w.header().unwrap();
        assert_eq!(header.len() % 8, 0);
        let parsed: serde_json::Value = serde_json::from_slice(&header).unwrap();
        assert_eq!(parsed["ids"]["data_offsets"][0], 8);
    }

    #[test]
    fn f32_is_widened() {
        let data: Vec<u8> = [1.5f32, -2.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        let e = serde_json::json!({"dtype": "F32", "shape": [2], "data_offsets": [0, 8]});
        assert_eq!(read_f64_tensor(&data, 0, &e).unwrap(), vec![1.5, -2.0]);
    }

    #[test]
    fn unsupported_dtype() {
        let e = serde_json::json!({"dtype": "I32", "shape": [1], "data_offsets": [0, 4]});
        assert!(read_f64_tensor(&[0, 0, 0, 0], 0, &e).is_err());
    }
}
