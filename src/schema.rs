//! Schema model for AudioMD 2.0
//!
//! A static description of the structural contract: element names, nesting,
//! attribute sets, cardinalities and value types. All rules are `'static`
//! data shared read-only across calls; the mapper consults them in both
//! directions.
//!
//! References:
//!
//! * AudioMD <https://www.loc.gov/standards/amdvmd/>
//! * Schema documentation: <https://www.loc.gov/standards/amdvmd/htmldoc/audioMD.html>

/// AudioMD XML namespace
pub const AUDIOMD_NS: &str = "http://www.loc.gov/audioMD/";

/// XML Schema instance namespace
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Value of `xsi:schemaLocation` emitted on the root element
pub const SCHEMA_LOCATION: &str =
    "http://www.loc.gov/audioMD/ https://www.loc.gov/standards/amdvmd/audioMD.xsd";

/// Version of the AudioMD standard this model describes
pub const SCHEMA_VERSION: &str = "2.0";

/// How many times a child element may appear
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    /// 0..1
    Optional,
    /// exactly 1
    Required,
    /// 0..n
    Repeated,
    /// 1..n
    RequiredRepeated,
}

impl Cardinality {
    pub const fn allows_many(self) -> bool {
        matches!(self, Self::Repeated | Self::RequiredRepeated)
    }

    pub const fn is_required(self) -> bool {
        matches!(self, Self::Required | Self::RequiredRepeated)
    }
}

/// Primitive type of an element's text content or an attribute value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    Str,
    Int,
    Decimal,
    /// Controlled vocabulary
    Token(&'static [&'static str]),
}

impl ValueType {
    /// Human-readable type name for error messages
    pub fn expected(&self) -> String {
        match self {
            Self::Str => "string".to_string(),
            Self::Int => "integer".to_string(),
            Self::Decimal => "decimal".to_string(),
            Self::Token(vocab) => format!("one of {}", vocab.join(", ")),
        }
    }
}

/// Rule for one attribute of an element
#[derive(Debug)]
pub struct AttrRule {
    pub name: &'static str,
    pub required: bool,
    pub value: ValueType,
}

/// Rule for one child position inside an element
///
/// Holds the child's rule directly rather than its name: `messageDigest`
/// names both a container and its leaf value child, so a name-keyed lookup
/// would collide.
#[derive(Debug)]
pub struct ChildRule {
    pub rule: &'static ElementRule,
    pub cardinality: Cardinality,
}

/// Structural rule for one element
#[derive(Debug)]
pub struct ElementRule {
    pub name: &'static str,
    pub attributes: &'static [AttrRule],
    pub children: &'static [ChildRule],
    /// Declared type of the text content, `None` for container elements
    pub value: Option<ValueType>,
}

impl ElementRule {
    /// Find the rule for a direct child by local name
    pub fn child(&self, name: &str) -> Option<&'static ChildRule> {
        self.children.iter().find(|c| c.rule.name == name)
    }

    /// Find the rule for an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&'static AttrRule> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Resolve an element path from the root, e.g.
/// `["AUDIOMD", "fileData", "bitsPerSample"]`
pub fn lookup(path: &[&str]) -> Option<&'static ElementRule> {
    let (first, rest) = path.split_first()?;
    if *first != ROOT.name {
        return None;
    }
    let mut rule = &ROOT;
    for segment in rest {
        rule = rule.child(segment)?.rule;
    }
    Some(rule)
}

const fn leaf(name: &'static str, value: ValueType) -> ElementRule {
    ElementRule {
        name,
        attributes: &[],
        children: &[],
        value: Some(value),
    }
}

const fn child(rule: &'static ElementRule, cardinality: Cardinality) -> ChildRule {
    ChildRule { rule, cardinality }
}

/// Vocabulary of the `ANALOGDIGITALFLAG` root attribute
pub const ANALOG_DIGITAL_FLAGS: &[&str] = &["Analog", "PhysDigital", "FileDigital"];

/// Vocabulary of `dataRateMode`
pub const DATA_RATE_MODES: &[&str] = &["Fixed", "Variable"];

/// Vocabulary of `codecQuality`
pub const CODEC_QUALITIES: &[&str] = &["lossless", "lossy"];

// fileData leaves

static AUDIO_BLOCK_SIZE: ElementRule = leaf("audioBlockSize", ValueType::Int);
static AUDIO_DATA_ENCODING: ElementRule = leaf("audioDataEncoding", ValueType::Str);
static BITS_PER_SAMPLE: ElementRule = leaf("bitsPerSample", ValueType::Int);
static BYTE_ORDER: ElementRule = leaf("byteOrder", ValueType::Str);
static DATA_RATE: ElementRule = leaf("dataRate", ValueType::Int);
static DATA_RATE_MODE: ElementRule = leaf("dataRateMode", ValueType::Token(DATA_RATE_MODES));
static FIRST_SAMPLE_OFFSET: ElementRule = leaf("firstSampleOffset", ValueType::Int);
static FIRST_VALID_BYTE_BLOCK: ElementRule = leaf("firstValidByteBlock", ValueType::Int);
static FORMAT_LOCATION: ElementRule = leaf("formatLocation", ValueType::Str);
static FORMAT_NAME: ElementRule = leaf("formatName", ValueType::Str);
static FORMAT_NOTE: ElementRule = leaf("formatNote", ValueType::Str);
static FORMAT_VERSION: ElementRule = leaf("formatVersion", ValueType::Str);
static LAST_VALID_BYTE_BLOCK: ElementRule = leaf("lastValidByteBlock", ValueType::Int);
static NUM_SAMPLE_FRAMES: ElementRule = leaf("numSampleFrames", ValueType::Int);
static SAMPLING_FREQUENCY: ElementRule = leaf("samplingFrequency", ValueType::Decimal);
static SECURITY: ElementRule = leaf("security", ValueType::Str);
static USE: ElementRule = leaf("use", ValueType::Str);
static OTHER_USE: ElementRule = leaf("otherUse", ValueType::Str);
static WORD_SIZE: ElementRule = leaf("wordSize", ValueType::Int);

// messageDigest

static MESSAGE_DIGEST_DATETIME: ElementRule = leaf("messageDigestDatetime", ValueType::Str);
static MESSAGE_DIGEST_ALGORITHM: ElementRule = leaf("messageDigestAlgorithm", ValueType::Str);
static MESSAGE_DIGEST_VALUE: ElementRule = leaf("messageDigest", ValueType::Str);

static MESSAGE_DIGEST: ElementRule = ElementRule {
    name: "messageDigest",
    attributes: &[],
    children: &[
        child(&MESSAGE_DIGEST_DATETIME, Cardinality::Required),
        child(&MESSAGE_DIGEST_ALGORITHM, Cardinality::Required),
        child(&MESSAGE_DIGEST_VALUE, Cardinality::Required),
    ],
    value: None,
};

// compression

static CODEC_CREATOR_APP: ElementRule = leaf("codecCreatorApp", ValueType::Str);
static CODEC_CREATOR_APP_VERSION: ElementRule = leaf("codecCreatorAppVersion", ValueType::Str);
static CODEC_NAME: ElementRule = leaf("codecName", ValueType::Str);
static CODEC_QUALITY: ElementRule = leaf("codecQuality", ValueType::Token(CODEC_QUALITIES));

static COMPRESSION: ElementRule = ElementRule {
    name: "compression",
    attributes: &[],
    children: &[
        child(&CODEC_CREATOR_APP, Cardinality::Optional),
        child(&CODEC_CREATOR_APP_VERSION, Cardinality::Optional),
        child(&CODEC_NAME, Cardinality::Optional),
        child(&CODEC_QUALITY, Cardinality::Optional),
    ],
    value: None,
};

static FILE_DATA: ElementRule = ElementRule {
    name: "fileData",
    attributes: &[],
    children: &[
        child(&AUDIO_BLOCK_SIZE, Cardinality::Optional),
        child(&AUDIO_DATA_ENCODING, Cardinality::Repeated),
        child(&BITS_PER_SAMPLE, Cardinality::Optional),
        child(&BYTE_ORDER, Cardinality::Optional),
        child(&MESSAGE_DIGEST, Cardinality::Repeated),
        child(&COMPRESSION, Cardinality::Repeated),
        child(&DATA_RATE, Cardinality::Optional),
        child(&DATA_RATE_MODE, Cardinality::Optional),
        child(&FIRST_SAMPLE_OFFSET, Cardinality::Optional),
        child(&FIRST_VALID_BYTE_BLOCK, Cardinality::Optional),
        child(&FORMAT_LOCATION, Cardinality::Optional),
        child(&FORMAT_NAME, Cardinality::Optional),
        child(&FORMAT_NOTE, Cardinality::Repeated),
        child(&FORMAT_VERSION, Cardinality::Optional),
        child(&LAST_VALID_BYTE_BLOCK, Cardinality::Optional),
        child(&NUM_SAMPLE_FRAMES, Cardinality::Optional),
        child(&SAMPLING_FREQUENCY, Cardinality::Optional),
        child(&SECURITY, Cardinality::Optional),
        child(&USE, Cardinality::Repeated),
        child(&OTHER_USE, Cardinality::Repeated),
        child(&WORD_SIZE, Cardinality::Optional),
    ],
    value: None,
};

// physicalData

static EBU_STORAGE_MEDIA_CODES: ElementRule = leaf("EBUStorageMediaCodes", ValueType::Str);
static CONDITION: ElementRule = leaf("condition", ValueType::Str);
static DISPOSITION: ElementRule = leaf("disposition", ValueType::Str);
static EQUALIZATION: ElementRule = leaf("equalization", ValueType::Str);
static GENERATION: ElementRule = leaf("generation", ValueType::Str);
static GROOVE: ElementRule = leaf("groove", ValueType::Str);
static NOISE_REDUCTION: ElementRule = leaf("noiseReduction", ValueType::Str);
static PHYS_FORMAT: ElementRule = leaf("physFormat", ValueType::Str);
static SPEED: ElementRule = leaf("speed", ValueType::Str);
static SPEED_ADJUSTMENT: ElementRule = leaf("speedAdjustment", ValueType::Str);
static SPEED_NOTE: ElementRule = leaf("speedNote", ValueType::Str);
static TRACK_FORMAT: ElementRule = leaf("trackFormat", ValueType::Str);
static NOTE: ElementRule = leaf("note", ValueType::Str);

static DIMENSIONS: ElementRule = ElementRule {
    name: "dimensions",
    attributes: &[
        AttrRule {
            name: "DEPTH",
            required: false,
            value: ValueType::Decimal,
        },
        AttrRule {
            name: "DIAMETER",
            required: false,
            value: ValueType::Decimal,
        },
        AttrRule {
            name: "GAUGE",
            required: false,
            value: ValueType::Decimal,
        },
        AttrRule {
            name: "HEIGHT",
            required: false,
            value: ValueType::Decimal,
        },
        AttrRule {
            name: "LENGTH",
            required: false,
            value: ValueType::Decimal,
        },
        AttrRule {
            name: "NOTE",
            required: false,
            value: ValueType::Str,
        },
        AttrRule {
            name: "THICKNESS",
            required: false,
            value: ValueType::Decimal,
        },
        AttrRule {
            name: "UNITS",
            required: false,
            value: ValueType::Str,
        },
        AttrRule {
            name: "WIDTH",
            required: false,
            value: ValueType::Decimal,
        },
    ],
    children: &[],
    value: None,
};

static BASE_MATERIAL: ElementRule = leaf("baseMaterial", ValueType::Str);
static BINDER: ElementRule = leaf("binder", ValueType::Str);
static DISC_SURFACE: ElementRule = leaf("discSurface", ValueType::Str);
static OXIDE: ElementRule = leaf("oxide", ValueType::Str);
static ACTIVE_LAYER: ElementRule = leaf("activeLayer", ValueType::Str);
static REFLECTIVE_LAYER: ElementRule = leaf("reflectiveLayer", ValueType::Str);
static STOCK_BRAND: ElementRule = leaf("stockBrand", ValueType::Str);
static METHOD: ElementRule = leaf("method", ValueType::Str);
static USED_SIDES: ElementRule = leaf("usedSides", ValueType::Str);

static MATERIAL: ElementRule = ElementRule {
    name: "material",
    attributes: &[],
    children: &[
        child(&BASE_MATERIAL, Cardinality::Optional),
        child(&BINDER, Cardinality::Optional),
        child(&DISC_SURFACE, Cardinality::Optional),
        child(&OXIDE, Cardinality::Optional),
        child(&ACTIVE_LAYER, Cardinality::Optional),
        child(&REFLECTIVE_LAYER, Cardinality::Optional),
        child(&STOCK_BRAND, Cardinality::Optional),
        child(&METHOD, Cardinality::Optional),
        child(&USED_SIDES, Cardinality::Optional),
    ],
    value: None,
};

static TRACKING_TYPE: ElementRule = leaf("trackingType", ValueType::Str);
static TRACKING_VALUE: ElementRule = leaf("trackingValue", ValueType::Str);

static TRACKING: ElementRule = ElementRule {
    name: "tracking",
    attributes: &[],
    children: &[
        child(&TRACKING_TYPE, Cardinality::Optional),
        child(&TRACKING_VALUE, Cardinality::Optional),
    ],
    value: None,
};

static PHYSICAL_DATA: ElementRule = ElementRule {
    name: "physicalData",
    attributes: &[],
    children: &[
        child(&EBU_STORAGE_MEDIA_CODES, Cardinality::Optional),
        child(&CONDITION, Cardinality::Optional),
        child(&DIMENSIONS, Cardinality::Repeated),
        child(&DISPOSITION, Cardinality::Optional),
        child(&EQUALIZATION, Cardinality::Optional),
        child(&GENERATION, Cardinality::Optional),
        child(&GROOVE, Cardinality::Optional),
        child(&MATERIAL, Cardinality::Repeated),
        child(&NOISE_REDUCTION, Cardinality::Optional),
        child(&PHYS_FORMAT, Cardinality::Optional),
        child(&SPEED, Cardinality::Optional),
        child(&SPEED_ADJUSTMENT, Cardinality::Optional),
        child(&SPEED_NOTE, Cardinality::Optional),
        child(&TRACK_FORMAT, Cardinality::Optional),
        child(&TRACKING, Cardinality::Repeated),
        child(&NOTE, Cardinality::Repeated),
    ],
    value: None,
};

// audioInfo

static DURATION: ElementRule = leaf("duration", ValueType::Str);
static NUM_CHANNELS: ElementRule = leaf("numChannels", ValueType::Int);
static SOUND_FIELD: ElementRule = leaf("soundField", ValueType::Str);

static CHANNEL_ASSIGNMENT: ElementRule = ElementRule {
    name: "channelAssignment",
    attributes: &[
        AttrRule {
            name: "CHANNELNUM",
            required: false,
            value: ValueType::Int,
        },
        AttrRule {
            name: "MAPLOCATION",
            required: false,
            value: ValueType::Str,
        },
    ],
    children: &[],
    value: None,
};

static SOUND_CHANNEL_MAP: ElementRule = ElementRule {
    name: "soundChannelMap",
    attributes: &[],
    children: &[child(&CHANNEL_ASSIGNMENT, Cardinality::RequiredRepeated)],
    value: None,
};

static AUDIO_INFO: ElementRule = ElementRule {
    name: "audioInfo",
    attributes: &[],
    children: &[
        child(&DURATION, Cardinality::Optional),
        child(&NOTE, Cardinality::Repeated),
        child(&NUM_CHANNELS, Cardinality::Optional),
        child(&SOUND_CHANNEL_MAP, Cardinality::Repeated),
        child(&SOUND_FIELD, Cardinality::Repeated),
    ],
    value: None,
};

// calibrationInfo

static CALIBRATION_EXT_INT: ElementRule = leaf("calibrationExtInt", ValueType::Str);
static CALIBRATION_LOCATION: ElementRule = leaf("calibrationLocation", ValueType::Str);
static CALIBRATION_TIME_STAMP: ElementRule = leaf("calibrationTimeStamp", ValueType::Str);
static CALIBRATION_TRACK_TYPE: ElementRule = leaf("calibrationTrackType", ValueType::Str);

static CALIBRATION_INFO: ElementRule = ElementRule {
    name: "calibrationInfo",
    attributes: &[],
    children: &[
        child(&CALIBRATION_EXT_INT, Cardinality::Optional),
        child(&CALIBRATION_LOCATION, Cardinality::Optional),
        child(&CALIBRATION_TIME_STAMP, Cardinality::Optional),
        child(&CALIBRATION_TRACK_TYPE, Cardinality::Optional),
    ],
    value: None,
};

/// Rule for the `AUDIOMD` root element
pub static ROOT: ElementRule = ElementRule {
    name: "AUDIOMD",
    attributes: &[AttrRule {
        name: "ANALOGDIGITALFLAG",
        required: true,
        value: ValueType::Token(ANALOG_DIGITAL_FLAGS),
    }],
    children: &[
        child(&FILE_DATA, Cardinality::Optional),
        child(&PHYSICAL_DATA, Cardinality::Optional),
        child(&AUDIO_INFO, Cardinality::Optional),
        child(&CALIBRATION_INFO, Cardinality::Optional),
    ],
    value: None,
};
