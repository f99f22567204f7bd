//! Typed AudioMD records
//!
//! Value types mirroring the AudioMD 2.0 element hierarchy. Optional fields
//! are `Option`, repeated fields are `Vec`; a record built programmatically
//! starts empty and serializes only what was set. Records have no identity
//! beyond their own lifetime and are compared structurally.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::schema;

/// Root AudioMD record (`AUDIOMD` element)
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AudioMd {
    pub analog_digital_flag: AnalogDigitalFlag,
    pub file_data: Option<FileData>,
    pub physical_data: Option<PhysicalData>,
    pub audio_info: Option<AudioInfo>,
    pub calibration_info: Option<CalibrationInfo>,
}

impl AudioMd {
    /// Create an empty record with the given flag
    pub fn new(analog_digital_flag: AnalogDigitalFlag) -> Self {
        Self {
            analog_digital_flag,
            ..Self::default()
        }
    }
}

/// `ANALOGDIGITALFLAG` attribute of the root element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnalogDigitalFlag {
    Analog,
    PhysDigital,
    #[default]
    FileDigital,
}

impl AnalogDigitalFlag {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analog => "Analog",
            Self::PhysDigital => "PhysDigital",
            Self::FileDigital => "FileDigital",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Analog" => Some(Self::Analog),
            "PhysDigital" => Some(Self::PhysDigital),
            "FileDigital" => Some(Self::FileDigital),
            _ => None,
        }
    }
}

/// `dataRateMode` vocabulary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataRateMode {
    Fixed,
    Variable,
}

impl DataRateMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::Variable => "Variable",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Fixed" => Some(Self::Fixed),
            "Variable" => Some(Self::Variable),
            _ => None,
        }
    }
}

/// `codecQuality` vocabulary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CodecQuality {
    Lossless,
    Lossy,
}

impl CodecQuality {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lossless => "lossless",
            Self::Lossy => "lossy",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "lossless" => Some(Self::Lossless),
            "lossy" => Some(Self::Lossy),
            _ => None,
        }
    }
}

/// `fileData` element
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileData {
    pub audio_block_size: Option<i64>,
    pub audio_data_encoding: Vec<String>,
    pub bits_per_sample: Option<i64>,
    pub byte_order: Option<String>,
    pub message_digest: Vec<MessageDigest>,
    pub compression: Vec<Compression>,
    pub data_rate: Option<i64>,
    pub data_rate_mode: Option<DataRateMode>,
    pub first_sample_offset: Option<i64>,
    pub first_valid_byte_block: Option<i64>,
    pub format_location: Option<String>,
    pub format_name: Option<String>,
    pub format_note: Vec<String>,
    pub format_version: Option<String>,
    pub last_valid_byte_block: Option<i64>,
    pub num_sample_frames: Option<i64>,
    pub sampling_frequency: Option<f64>,
    pub security: Option<String>,
    pub use_types: Vec<String>,
    pub other_use: Vec<String>,
    pub word_size: Option<i64>,
}

/// `messageDigest` element; all three children are required by the schema
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MessageDigest {
    pub datetime: String,
    pub algorithm: String,
    pub digest: String,
}

impl MessageDigest {
    pub fn new(
        datetime: impl Into<String>,
        algorithm: impl Into<String>,
        digest: impl Into<String>,
    ) -> Self {
        Self {
            datetime: datetime.into(),
            algorithm: algorithm.into(),
            digest: digest.into(),
        }
    }
}

/// `compression` element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Compression {
    pub codec_creator_app: Option<String>,
    pub codec_creator_app_version: Option<String>,
    pub codec_name: Option<String>,
    pub codec_quality: Option<CodecQuality>,
}

/// `physicalData` element
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhysicalData {
    pub ebu_storage_media_codes: Option<String>,
    pub condition: Option<String>,
    pub dimensions: Vec<Dimensions>,
    pub disposition: Option<String>,
    pub equalization: Option<String>,
    pub generation: Option<String>,
    pub groove: Option<String>,
    pub material: Vec<Material>,
    pub noise_reduction: Option<String>,
    pub phys_format: Option<String>,
    pub speed: Option<String>,
    pub speed_adjustment: Option<String>,
    pub speed_note: Option<String>,
    pub track_format: Option<String>,
    pub tracking: Vec<Tracking>,
    pub note: Vec<String>,
}

/// `dimensions` element (attribute-only)
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimensions {
    pub depth: Option<f64>,
    pub diameter: Option<f64>,
    pub gauge: Option<f64>,
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub note: Option<String>,
    pub thickness: Option<f64>,
    pub units: Option<String>,
    pub width: Option<f64>,
}

/// `material` element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material {
    pub base_material: Option<String>,
    pub binder: Option<String>,
    pub disc_surface: Option<String>,
    pub oxide: Option<String>,
    pub active_layer: Option<String>,
    pub reflective_layer: Option<String>,
    pub stock_brand: Option<String>,
    pub method: Option<String>,
    pub used_sides: Option<String>,
}

/// `tracking` element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tracking {
    pub tracking_type: Option<String>,
    pub tracking_value: Option<String>,
}

/// `audioInfo` element
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AudioInfo {
    pub duration: Option<String>,
    pub note: Vec<String>,
    pub num_channels: Option<i64>,
    pub sound_channel_map: Vec<SoundChannelMap>,
    pub sound_field: Vec<String>,
}

/// `soundChannelMap` element; must hold at least one assignment
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoundChannelMap {
    pub channel_assignments: Vec<ChannelAssignment>,
}

/// `channelAssignment` element (attribute-only)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelAssignment {
    pub channel_num: Option<i64>,
    pub map_location: Option<String>,
}

/// `calibrationInfo` element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationInfo {
    pub ext_int: Option<String>,
    pub location: Option<String>,
    pub time_stamp: Option<String>,
    pub track_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_tokens_match_schema_vocabulary() {
        for token in schema::ANALOG_DIGITAL_FLAGS {
            let flag = AnalogDigitalFlag::from_token(token).expect("known token");
            assert_eq!(flag.as_str(), *token);
        }
        assert!(AnalogDigitalFlag::from_token("Digital").is_none());
    }

    #[test]
    fn test_data_rate_mode_tokens_match_schema_vocabulary() {
        for token in schema::DATA_RATE_MODES {
            let mode = DataRateMode::from_token(token).expect("known token");
            assert_eq!(mode.as_str(), *token);
        }
    }

    #[test]
    fn test_codec_quality_tokens_match_schema_vocabulary() {
        for token in schema::CODEC_QUALITIES {
            let quality = CodecQuality::from_token(token).expect("known token");
            assert_eq!(quality.as_str(), *token);
        }
    }

    #[test]
    fn test_default_record_is_empty() {
        let record = AudioMd::new(AnalogDigitalFlag::Analog);
        assert!(record.file_data.is_none());
        assert!(record.physical_data.is_none());
        assert!(record.audio_info.is_none());
        assert!(record.calibration_info.is_none());
    }
}
