//! audiomd - Reader and writer for AudioMD 2.0 technical audio metadata
//!
//! Maps AudioMD XML documents (Library of Congress standard, namespace
//! `http://www.loc.gov/audioMD/`) to and from typed records, validating
//! structure, cardinality and value types against the AudioMD 2.0 schema
//! rules in both directions.
//!
//! # Quick Start
//!
//! ```
//! use audiomd::from_str;
//! # fn main() -> Result<(), audiomd::Error> {
//! let xml = r#"<amd:AUDIOMD xmlns:amd="http://www.loc.gov/audioMD/"
//!                           ANALOGDIGITALFLAG="FileDigital">
//!     <amd:fileData>
//!         <amd:audioDataEncoding>PCM</amd:audioDataEncoding>
//!         <amd:bitsPerSample>16</amd:bitsPerSample>
//!     </amd:fileData>
//! </amd:AUDIOMD>"#;
//! let record = from_str(xml)?;
//! let bits = record.file_data.as_ref().and_then(|fd| fd.bits_per_sample);
//! assert_eq!(bits, Some(16));
//! # Ok(())
//! # }
//! ```
//!
//! References:
//!
//! * AudioMD <https://www.loc.gov/standards/amdvmd/>
//! * Schema documentation: <https://www.loc.gov/standards/amdvmd/htmldoc/audioMD.html>

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod xml;
pub use xml::{Content, Document, Element, Parser as XmlParser, Writer, WriterConfig};

pub mod schema;

pub mod record;
pub use record::{
    AnalogDigitalFlag, AudioInfo, AudioMd, CalibrationInfo, ChannelAssignment, CodecQuality,
    Compression, DataRateMode, Dimensions, FileData, Material, MessageDigest, PhysicalData,
    SoundChannelMap, Tracking,
};

pub mod map;
pub use map::{Config, Decoder, Encoder, Mode, Warning};

/// Parse an AudioMD record from XML text (strict mode)
pub fn from_str(s: &str) -> Result<AudioMd> {
    from_bytes(s.as_bytes())
}

/// Parse an AudioMD record from XML bytes (strict mode)
pub fn from_bytes(bytes: &[u8]) -> Result<AudioMd> {
    let doc = parse_tree(bytes)?;
    Decoder::new(&doc).decode()
}

/// Parse with custom configuration, returning collected warnings
pub fn from_str_with_config(s: &str, config: Config) -> Result<(AudioMd, Vec<Warning>)> {
    let doc = parse_tree(s.as_bytes())?;
    Decoder::with_config(&doc, config).decode_with_warnings()
}

/// Map an already-parsed document tree to an AudioMD record (strict mode)
pub fn from_tree(doc: &Document) -> Result<AudioMd> {
    Decoder::new(doc).decode()
}

/// Serialize a record to pretty-printed XML with a declaration
pub fn to_xml(record: &AudioMd) -> Result<String> {
    to_xml_with_config(record, WriterConfig::default())
}

/// Serialize a record to XML with explicit writer configuration
pub fn to_xml_with_config(record: &AudioMd, config: WriterConfig) -> Result<String> {
    let doc = to_tree(record)?;
    Ok(Writer::with_config(config).write(&doc))
}

/// Build a document tree from a record without serializing it to text
pub fn to_tree(record: &AudioMd) -> Result<Document> {
    Encoder::new().encode(record)
}

fn parse_tree(bytes: &[u8]) -> Result<Document> {
    // A document with no content at all is missing its root element, which
    // is a schema failure rather than a syntax failure.
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::schema(ErrorKind::MissingRequiredField {
            path: format!("/{}", schema::ROOT.name),
        }));
    }
    XmlParser::new(bytes).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_missing_root() {
        let err = from_str("").unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::MissingRequiredField {
                path: "/AUDIOMD".to_string()
            }
        );

        let err = from_str("   \n  ").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MissingRequiredField { .. }));
    }
}
