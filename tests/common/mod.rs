//! Shared fixtures: hand-built DICOM Part 10 files and a counting fake decoder.

#![allow(dead_code)]

use dcmfind::record::{DecodeError, Decoded};
use dcmfind::{AttributeMap, AttributeRecord, RecordDecoder};
use dicom_core::Tag;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const ACCESSION: &str = "CR2022062117111";

// --- DICOM Part 10 writer (explicit VR little endian) ---

fn element(group: u16, elem: u16, vr: &[u8; 2], value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(12 + value.len());
    out.extend_from_slice(&group.to_le_bytes());
    out.extend_from_slice(&elem.to_le_bytes());
    out.extend_from_slice(vr);
    if matches!(vr, b"OB" | b"OW" | b"OF" | b"SQ" | b"UT" | b"UN") {
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&(value.len() as u32).to_le_bytes());
    } else {
        out.extend_from_slice(&(value.len() as u16).to_le_bytes());
    }
    out.extend_from_slice(value);
    out
}

fn padded(s: &str, pad: u8) -> Vec<u8> {
    let mut v = s.as_bytes().to_vec();
    if v.len() % 2 == 1 {
        v.push(pad);
    }
    v
}

/// Minimal secondary-capture style file with the given attributes.
pub fn dicom_bytes(instance_uid: &str, accession: &str, study_date: &str, rows: u16) -> Vec<u8> {
    let mut meta = Vec::new();
    meta.extend(element(0x0002, 0x0001, b"OB", &[0, 1]));
    meta.extend(element(
        0x0002,
        0x0002,
        b"UI",
        &padded("1.2.840.10008.5.1.4.1.1.7", 0),
    ));
    meta.extend(element(0x0002, 0x0003, b"UI", &padded(instance_uid, 0)));
    meta.extend(element(0x0002, 0x0010, b"UI", &padded("1.2.840.10008.1.2.1", 0)));
    meta.extend(element(0x0002, 0x0012, b"UI", &padded("1.2.3.4", 0)));

    let mut out = vec![0u8; 128];
    out.extend_from_slice(b"DICM");
    out.extend(element(0x0002, 0x0000, b"UL", &(meta.len() as u32).to_le_bytes()));
    out.extend(meta);

    out.extend(element(0x0008, 0x0016, b"UI", &padded("1.2.840.10008.5.1.4.1.1.7", 0)));
    out.extend(element(0x0008, 0x0018, b"UI", &padded(instance_uid, 0)));
    out.extend(element(0x0008, 0x0020, b"DA", &padded(study_date, b' ')));
    out.extend(element(0x0008, 0x0050, b"SH", &padded(accession, b' ')));
    out.extend(element(0x0010, 0x0010, b"PN", &padded("Doe^John", b' ')));
    out.extend(element(0x0028, 0x0010, b"US", &rows.to_le_bytes()));
    out
}

pub fn write_dicom(path: &Path, instance_uid: &str, accession: &str, study_date: &str, rows: u16) {
    std::fs::write(path, dicom_bytes(instance_uid, accession, study_date, rows)).unwrap();
}

/// `0.jpg` (not DICOM), `1.dcm`, and `2.dcm` carrying [`ACCESSION`].
pub fn three_file_fixture(dir: &Path) {
    std::fs::write(dir.join("0.jpg"), b"\xff\xd8\xff\xe0 definitely not dicom").unwrap();
    write_dicom(&dir.join("1.dcm"), "1.2.3.4.5.1", "CR2022010100001", "20200102", 512);
    write_dicom(&dir.join("2.dcm"), "1.2.3.4.5.2", ACCESSION, "20220621", 1000);
}

// --- Fake decoder ---

/// Marker on the first line of files the fake decoder accepts. Following lines are
/// `gggg,eeee=value` in hex.
pub const FAKE_MAGIC: &str = "FAKE-DICOM";

pub fn write_fake(path: &Path, attrs: &[((u16, u16), &str)]) {
    let mut body = format!("{FAKE_MAGIC}\n");
    for ((g, e), v) in attrs {
        body.push_str(&format!("{g:04x},{e:04x}={v}\n"));
    }
    std::fs::write(path, body).unwrap();
}

/// Decoder over [`write_fake`] files. Counts every attempt and can slow each one down.
#[derive(Default)]
pub struct FakeDecoder {
    pub attempts: AtomicUsize,
    pub delay: Option<Duration>,
}

impl FakeDecoder {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            attempts: AtomicUsize::new(0),
            delay: Some(delay),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl RecordDecoder for FakeDecoder {
    fn open(&self, path: &Path) -> Result<Decoded, DecodeError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            std::thread::sleep(d);
        }
        let text = std::fs::read_to_string(path).map_err(|source| DecodeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut lines = text.lines();
        if lines.next() != Some(FAKE_MAGIC) {
            return Ok(Decoded::NotThisFormat);
        }
        let mut record = AttributeMap::new();
        for line in lines {
            let Some((tag, value)) = line.split_once('=') else {
                continue;
            };
            let Some((g, e)) = tag.split_once(',') else {
                continue;
            };
            let g = u16::from_str_radix(g, 16).unwrap();
            let e = u16::from_str_radix(e, 16).unwrap();
            record.insert(Tag(g, e), value);
        }
        let meta = AttributeMap::new().with(Tag(0x0002, 0x0010), "1.2.840.10008.1.2.1");
        let records: Vec<Box<dyn AttributeRecord>> = vec![Box::new(record), Box::new(meta)];
        Ok(Decoded::Records(records))
    }
}
