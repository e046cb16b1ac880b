//! DICOM Part 10 decoder backed by `dicom-object`.

use dicom_dictionary_std::tags;
use dicom_object::{DefaultDicomObject, OpenFileOptions};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{AttributeMap, AttributeRecord, DecodeError, Decoded, first_value};
use crate::AttributeTag;

/// Preamble length before the `DICM` magic.
const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8; 4] = b"DICM";

/// Decodes DICOM Part 10 files up to (not including) pixel data.
#[derive(Clone, Copy, Debug, Default)]
pub struct DicomDecoder;

impl DicomDecoder {
    pub fn new() -> Self {
        Self
    }
}

/// True when the file carries the 128-byte preamble followed by `DICM`.
fn has_dicom_magic(path: &Path) -> Result<bool, DecodeError> {
    let mut file = File::open(path).map_err(|source| DecodeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut head = [0u8; PREAMBLE_LEN + 4];
    match file.read_exact(&mut head) {
        Ok(()) => Ok(&head[PREAMBLE_LEN..] == MAGIC),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(source) => Err(DecodeError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

impl super::RecordDecoder for DicomDecoder {
    fn open(&self, path: &Path) -> Result<Decoded, DecodeError> {
        if !has_dicom_magic(path)? {
            return Ok(Decoded::NotThisFormat);
        }
        let obj = OpenFileOptions::new()
            .read_until(tags::PIXEL_DATA)
            .open_file(path)
            .map_err(|e| DecodeError::Corrupt {
                path: path.display().to_string(),
                msg: e.to_string(),
            })?;
        let meta = meta_record(&obj);
        Ok(Decoded::Records(vec![
            Box::new(DatasetRecord(obj)),
            Box::new(meta),
        ]))
    }
}

/// Primary dataset of an opened file.
struct DatasetRecord(DefaultDicomObject);

impl AttributeRecord for DatasetRecord {
    fn try_get_string(&self, tag: AttributeTag) -> Option<String> {
        let element = self.0.get(tag)?;
        element.to_str().ok().map(|s| first_value(&s))
    }

    fn contains(&self, tag: AttributeTag) -> bool {
        self.0.get(tag).is_some()
    }
}

/// Copy the file meta group (0002,xxxx) into a plain record.
fn meta_record(obj: &DefaultDicomObject) -> AttributeMap {
    let meta = obj.meta();
    let mut record = AttributeMap::new();
    record
        .insert(
            tags::FILE_META_INFORMATION_GROUP_LENGTH,
            meta.information_group_length.to_string(),
        )
        .insert(
            tags::MEDIA_STORAGE_SOP_CLASS_UID,
            meta.media_storage_sop_class_uid.as_str(),
        )
        .insert(
            tags::MEDIA_STORAGE_SOP_INSTANCE_UID,
            meta.media_storage_sop_instance_uid.as_str(),
        )
        .insert(tags::TRANSFER_SYNTAX_UID, meta.transfer_syntax.as_str())
        .insert(
            tags::IMPLEMENTATION_CLASS_UID,
            meta.implementation_class_uid.as_str(),
        );
    if let Some(name) = &meta.implementation_version_name {
        record.insert(tags::IMPLEMENTATION_VERSION_NAME, name.as_str());
    }
    if let Some(title) = &meta.source_application_entity_title {
        record.insert(tags::SOURCE_APPLICATION_ENTITY_TITLE, title.as_str());
    }
    record
}
