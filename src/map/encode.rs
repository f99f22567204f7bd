//! Mapper, serialize direction: typed record to document tree
//!
//! Emits children in schema-declared order regardless of how the caller
//! populated the record, and re-checks required cardinality so that the
//! output is schema-valid by construction.

use crate::error::{Error, ErrorKind, Result};
use crate::record::{
    AudioInfo, AudioMd, CalibrationInfo, ChannelAssignment, Compression, Dimensions, FileData,
    Material, MessageDigest, PhysicalData, SoundChannelMap, Tracking,
};
use crate::schema::{self, ValueType};
use crate::xml::model::{Content, Document, Element};

/// Namespace prefix used for emitted AudioMD elements
const AMD_PREFIX: &str = "amd";

/// Encoder from an [`AudioMd`] record to a document tree
#[derive(Clone, Copy, Debug, Default)]
pub struct Encoder;

impl Encoder {
    pub fn new() -> Self {
        Self
    }

    /// Build a document tree from a record
    pub fn encode(&self, record: &AudioMd) -> Result<Document> {
        let mut root = Element::new(amd("AUDIOMD"));
        root.attributes.insert(
            format!("xmlns:{AMD_PREFIX}"),
            schema::AUDIOMD_NS.to_string(),
        );
        root.attributes
            .insert("xmlns:xsi".to_string(), schema::XSI_NS.to_string());
        root.attributes.insert(
            "xsi:schemaLocation".to_string(),
            schema::SCHEMA_LOCATION.to_string(),
        );
        root.attributes.insert(
            "ANALOGDIGITALFLAG".to_string(),
            record.analog_digital_flag.as_str().to_string(),
        );

        if let Some(file_data) = &record.file_data {
            root.children
                .push(Content::Element(encode_file_data(file_data)?));
        }
        if let Some(physical_data) = &record.physical_data {
            root.children
                .push(Content::Element(encode_physical_data(physical_data)?));
        }
        if let Some(audio_info) = &record.audio_info {
            root.children
                .push(Content::Element(encode_audio_info(audio_info)?));
        }
        if let Some(calibration_info) = &record.calibration_info {
            root.children
                .push(Content::Element(encode_calibration_info(calibration_info)));
        }

        Ok(Document { root })
    }
}

fn amd(tag: &str) -> String {
    format!("{AMD_PREFIX}:{tag}")
}

/// Append a leaf element holding the given text
fn leaf(children: &mut Vec<Content>, tag: &str, text: impl Into<String>) {
    let mut el = Element::new(amd(tag));
    el.children.push(Content::Text(text.into()));
    children.push(Content::Element(el));
}

fn leaf_opt(children: &mut Vec<Content>, tag: &str, value: &Option<String>) {
    if let Some(value) = value {
        leaf(children, tag, value.clone());
    }
}

fn leaf_all(children: &mut Vec<Content>, tag: &str, values: &[String]) {
    for value in values {
        leaf(children, tag, value.clone());
    }
}

fn leaf_int(children: &mut Vec<Content>, tag: &str, value: &Option<i64>) {
    if let Some(value) = value {
        leaf(children, tag, value.to_string());
    }
}

fn leaf_decimal(
    children: &mut Vec<Content>,
    tag: &str,
    value: &Option<f64>,
    path: &str,
) -> Result<()> {
    if let Some(value) = value {
        leaf(children, tag, finite(*value, path)?.to_string());
    }
    Ok(())
}

fn attr_opt(el: &mut Element, name: &str, value: &Option<String>) {
    if let Some(value) = value {
        el.attributes.insert(name.to_string(), value.clone());
    }
}

fn attr_decimal(el: &mut Element, name: &str, value: &Option<f64>) -> Result<()> {
    if let Some(value) = value {
        let path = format!("/AUDIOMD/physicalData/dimensions/@{name}");
        el.attributes
            .insert(name.to_string(), finite(*value, &path)?.to_string());
    }
    Ok(())
}

/// NaN and infinities have no XML decimal form and would not parse back
fn finite(value: f64, path: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::schema(ErrorKind::TypeCoercion {
            path: path.to_string(),
            expected: ValueType::Decimal.expected(),
            found: value.to_string(),
        }))
    }
}

fn encode_file_data(data: &FileData) -> Result<Element> {
    let mut el = Element::new(amd("fileData"));
    let children = &mut el.children;

    leaf_int(children, "audioBlockSize", &data.audio_block_size);
    leaf_all(children, "audioDataEncoding", &data.audio_data_encoding);
    leaf_int(children, "bitsPerSample", &data.bits_per_sample);
    leaf_opt(children, "byteOrder", &data.byte_order);
    for digest in &data.message_digest {
        children.push(Content::Element(encode_message_digest(digest)));
    }
    for compression in &data.compression {
        children.push(Content::Element(encode_compression(compression)));
    }
    leaf_int(children, "dataRate", &data.data_rate);
    if let Some(mode) = data.data_rate_mode {
        leaf(children, "dataRateMode", mode.as_str());
    }
    leaf_int(children, "firstSampleOffset", &data.first_sample_offset);
    leaf_int(children, "firstValidByteBlock", &data.first_valid_byte_block);
    leaf_opt(children, "formatLocation", &data.format_location);
    leaf_opt(children, "formatName", &data.format_name);
    leaf_all(children, "formatNote", &data.format_note);
    leaf_opt(children, "formatVersion", &data.format_version);
    leaf_int(children, "lastValidByteBlock", &data.last_valid_byte_block);
    leaf_int(children, "numSampleFrames", &data.num_sample_frames);
    leaf_decimal(
        children,
        "samplingFrequency",
        &data.sampling_frequency,
        "/AUDIOMD/fileData/samplingFrequency",
    )?;
    leaf_opt(children, "security", &data.security);
    leaf_all(children, "use", &data.use_types);
    leaf_all(children, "otherUse", &data.other_use);
    leaf_int(children, "wordSize", &data.word_size);

    Ok(el)
}

fn encode_message_digest(digest: &MessageDigest) -> Element {
    let mut el = Element::new(amd("messageDigest"));
    leaf(
        &mut el.children,
        "messageDigestDatetime",
        digest.datetime.clone(),
    );
    leaf(
        &mut el.children,
        "messageDigestAlgorithm",
        digest.algorithm.clone(),
    );
    leaf(&mut el.children, "messageDigest", digest.digest.clone());
    el
}

fn encode_compression(compression: &Compression) -> Element {
    let mut el = Element::new(amd("compression"));
    leaf_opt(
        &mut el.children,
        "codecCreatorApp",
        &compression.codec_creator_app,
    );
    leaf_opt(
        &mut el.children,
        "codecCreatorAppVersion",
        &compression.codec_creator_app_version,
    );
    leaf_opt(&mut el.children, "codecName", &compression.codec_name);
    if let Some(quality) = compression.codec_quality {
        leaf(&mut el.children, "codecQuality", quality.as_str());
    }
    el
}

fn encode_physical_data(data: &PhysicalData) -> Result<Element> {
    let mut el = Element::new(amd("physicalData"));
    let children = &mut el.children;

    leaf_opt(
        children,
        "EBUStorageMediaCodes",
        &data.ebu_storage_media_codes,
    );
    leaf_opt(children, "condition", &data.condition);
    for dimensions in &data.dimensions {
        children.push(Content::Element(encode_dimensions(dimensions)?));
    }
    leaf_opt(children, "disposition", &data.disposition);
    leaf_opt(children, "equalization", &data.equalization);
    leaf_opt(children, "generation", &data.generation);
    leaf_opt(children, "groove", &data.groove);
    for material in &data.material {
        children.push(Content::Element(encode_material(material)));
    }
    leaf_opt(children, "noiseReduction", &data.noise_reduction);
    leaf_opt(children, "physFormat", &data.phys_format);
    leaf_opt(children, "speed", &data.speed);
    leaf_opt(children, "speedAdjustment", &data.speed_adjustment);
    leaf_opt(children, "speedNote", &data.speed_note);
    leaf_opt(children, "trackFormat", &data.track_format);
    for tracking in &data.tracking {
        children.push(Content::Element(encode_tracking(tracking)));
    }
    leaf_all(children, "note", &data.note);

    Ok(el)
}

fn encode_dimensions(dimensions: &Dimensions) -> Result<Element> {
    let mut el = Element::new(amd("dimensions"));
    attr_decimal(&mut el, "DEPTH", &dimensions.depth)?;
    attr_decimal(&mut el, "DIAMETER", &dimensions.diameter)?;
    attr_decimal(&mut el, "GAUGE", &dimensions.gauge)?;
    attr_decimal(&mut el, "HEIGHT", &dimensions.height)?;
    attr_decimal(&mut el, "LENGTH", &dimensions.length)?;
    attr_opt(&mut el, "NOTE", &dimensions.note);
    attr_decimal(&mut el, "THICKNESS", &dimensions.thickness)?;
    attr_opt(&mut el, "UNITS", &dimensions.units);
    attr_decimal(&mut el, "WIDTH", &dimensions.width)?;
    Ok(el)
}

fn encode_material(material: &Material) -> Element {
    let mut el = Element::new(amd("material"));
    let children = &mut el.children;
    leaf_opt(children, "baseMaterial", &material.base_material);
    leaf_opt(children, "binder", &material.binder);
    leaf_opt(children, "discSurface", &material.disc_surface);
    leaf_opt(children, "oxide", &material.oxide);
    leaf_opt(children, "activeLayer", &material.active_layer);
    leaf_opt(children, "reflectiveLayer", &material.reflective_layer);
    leaf_opt(children, "stockBrand", &material.stock_brand);
    leaf_opt(children, "method", &material.method);
    leaf_opt(children, "usedSides", &material.used_sides);
    el
}

fn encode_tracking(tracking: &Tracking) -> Element {
    let mut el = Element::new(amd("tracking"));
    leaf_opt(&mut el.children, "trackingType", &tracking.tracking_type);
    leaf_opt(&mut el.children, "trackingValue", &tracking.tracking_value);
    el
}

fn encode_audio_info(info: &AudioInfo) -> Result<Element> {
    let mut el = Element::new(amd("audioInfo"));
    let children = &mut el.children;

    leaf_opt(children, "duration", &info.duration);
    leaf_all(children, "note", &info.note);
    leaf_int(children, "numChannels", &info.num_channels);
    for map in &info.sound_channel_map {
        children.push(Content::Element(encode_sound_channel_map(map)?));
    }
    leaf_all(children, "soundField", &info.sound_field);

    Ok(el)
}

fn encode_sound_channel_map(map: &SoundChannelMap) -> Result<Element> {
    if map.channel_assignments.is_empty() {
        return Err(Error::schema(ErrorKind::MissingRequiredField {
            path: "/AUDIOMD/audioInfo/soundChannelMap/channelAssignment".to_string(),
        }));
    }

    let mut el = Element::new(amd("soundChannelMap"));
    for assignment in &map.channel_assignments {
        el.children
            .push(Content::Element(encode_channel_assignment(assignment)));
    }
    Ok(el)
}

fn encode_channel_assignment(assignment: &ChannelAssignment) -> Element {
    let mut el = Element::new(amd("channelAssignment"));
    if let Some(num) = assignment.channel_num {
        el.attributes
            .insert("CHANNELNUM".to_string(), num.to_string());
    }
    attr_opt(&mut el, "MAPLOCATION", &assignment.map_location);
    el
}

fn encode_calibration_info(info: &CalibrationInfo) -> Element {
    let mut el = Element::new(amd("calibrationInfo"));
    let children = &mut el.children;
    leaf_opt(children, "calibrationExtInt", &info.ext_int);
    leaf_opt(children, "calibrationLocation", &info.location);
    leaf_opt(children, "calibrationTimeStamp", &info.time_stamp);
    leaf_opt(children, "calibrationTrackType", &info.track_type);
    el
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AnalogDigitalFlag;

    #[test]
    fn test_root_attributes() -> Result<()> {
        let record = AudioMd::new(AnalogDigitalFlag::Analog);
        let doc = Encoder::new().encode(&record)?;

        assert_eq!(doc.root.name, "amd:AUDIOMD");
        assert_eq!(
            doc.root.attributes.get("xmlns:amd"),
            Some(&schema::AUDIOMD_NS.to_string())
        );
        assert_eq!(
            doc.root.attributes.get("xsi:schemaLocation"),
            Some(&schema::SCHEMA_LOCATION.to_string())
        );
        assert_eq!(
            doc.root.attributes.get("ANALOGDIGITALFLAG"),
            Some(&"Analog".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_schema_order_independent_of_population_order() -> Result<()> {
        // Fields set "backwards": wordSize before audioDataEncoding
        let mut file_data = FileData::default();
        file_data.word_size = Some(2);
        file_data.audio_data_encoding.push("PCM".to_string());

        let mut record = AudioMd::new(AnalogDigitalFlag::FileDigital);
        record.file_data = Some(file_data);

        let doc = Encoder::new().encode(&record)?;
        let file_data_el = doc
            .root
            .child_elements()
            .next()
            .ok_or_else(|| Error::schema(ErrorKind::MissingRequiredField {
                path: "/AUDIOMD/fileData".to_string(),
            }))?;
        let names: Vec<&str> = file_data_el
            .child_elements()
            .map(|el| el.local_name())
            .collect();
        assert_eq!(names, vec!["audioDataEncoding", "wordSize"]);
        Ok(())
    }

    #[test]
    fn test_non_finite_decimal_rejected() {
        let mut file_data = FileData::default();
        file_data.sampling_frequency = Some(f64::NAN);
        let mut record = AudioMd::new(AnalogDigitalFlag::FileDigital);
        record.file_data = Some(file_data);

        let err = Encoder::new().encode(&record).unwrap_err();
        match err.kind() {
            ErrorKind::TypeCoercion { path, .. } => {
                assert_eq!(path, "/AUDIOMD/fileData/samplingFrequency");
            }
            other => panic!("expected TypeCoercion, got {other:?}"),
        }

        let mut physical = crate::record::PhysicalData::default();
        physical.dimensions.push(Dimensions {
            diameter: Some(f64::INFINITY),
            ..Dimensions::default()
        });
        let mut record = AudioMd::new(AnalogDigitalFlag::Analog);
        record.physical_data = Some(physical);

        let err = Encoder::new().encode(&record).unwrap_err();
        match err.kind() {
            ErrorKind::TypeCoercion { path, .. } => {
                assert_eq!(path, "/AUDIOMD/physicalData/dimensions/@DIAMETER");
            }
            other => panic!("expected TypeCoercion, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_sound_channel_map_rejected() {
        let mut info = AudioInfo::default();
        info.sound_channel_map.push(SoundChannelMap::default());
        let mut record = AudioMd::new(AnalogDigitalFlag::FileDigital);
        record.audio_info = Some(info);

        let err = Encoder::new().encode(&record).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::MissingRequiredField {
                path: "/AUDIOMD/audioInfo/soundChannelMap/channelAssignment".to_string()
            }
        );
    }
}
