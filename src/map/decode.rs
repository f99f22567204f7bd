//! Mapper, parse direction: document tree to typed record
//!
//! Walks the tree top-down, resolving every element against the schema model.
//! Namespace-aware: `xmlns` declarations are tracked in a scope stack, and
//! every AudioMD element must resolve to the AudioMD namespace. Strictness is
//! controlled by [`Config`](crate::map::Config): in lenient mode unknown
//! elements and attributes become [`Warning`]s instead of errors.

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::map::{Config, Mode, Warning};
use crate::record::{
    AnalogDigitalFlag, AudioInfo, AudioMd, CalibrationInfo, ChannelAssignment, CodecQuality,
    Compression, DataRateMode, Dimensions, FileData, Material, MessageDigest, PhysicalData,
    SoundChannelMap, Tracking,
};
use crate::schema::{self, ChildRule, ElementRule, ValueType};
use crate::xml::model::{Content, Document, Element};

/// Decoder from a document tree to an [`AudioMd`] record
#[derive(Debug)]
pub struct Decoder<'a> {
    doc: &'a Document,
    config: Config,
    warnings: Vec<Warning>,
    // prefix -> namespace bindings, one frame per open element
    scopes: Vec<Vec<(String, String)>>,
}

type Groups<'a> = IndexMap<&'static str, Vec<&'a Element>>;

impl<'a> Decoder<'a> {
    /// Create a strict decoder
    pub fn new(doc: &'a Document) -> Self {
        Self::with_config(doc, Config::default())
    }

    /// Create a decoder with explicit configuration
    pub fn with_config(doc: &'a Document, config: Config) -> Self {
        Self {
            doc,
            config,
            warnings: Vec::new(),
            scopes: Vec::new(),
        }
    }

    /// Decode the document, discarding lenient-mode warnings
    pub fn decode(mut self) -> Result<AudioMd> {
        self.run()
    }

    /// Decode the document and return collected warnings alongside the record
    pub fn decode_with_warnings(mut self) -> Result<(AudioMd, Vec<Warning>)> {
        let record = self.run()?;
        Ok((record, self.warnings))
    }

    fn run(&mut self) -> Result<AudioMd> {
        tracing::debug!(mode = ?self.config.mode, "decoding audioMD document");
        let doc = self.doc;
        self.decode_root(&doc.root)
    }

    fn decode_root(&mut self, root: &'a Element) -> Result<AudioMd> {
        self.scoped(root, |this| {
            let path = format!("/{}", schema::ROOT.name);

            let ns = this.element_ns(root, &path)?;
            if root.local_name() != schema::ROOT.name || ns != schema::AUDIOMD_NS {
                return Err(Error::with_message(
                    ErrorKind::SchemaViolation { path },
                    Span::empty(),
                    format!(
                        "expected {{{}}}{} root element, found {}",
                        schema::AUDIOMD_NS,
                        schema::ROOT.name,
                        root.name
                    ),
                ));
            }

            this.check_attributes(root, &schema::ROOT, &path)?;
            let flag = this.root_flag(root, &path)?;

            let mut groups = this.collect_children(root, &schema::ROOT, &path)?;
            let file_data = match this.optional(&mut groups, &schema::ROOT, &path, "fileData")? {
                Some(el) => Some(this.decode_file_data(el, &format!("{path}/fileData"))?),
                None => None,
            };
            let physical_data =
                match this.optional(&mut groups, &schema::ROOT, &path, "physicalData")? {
                    Some(el) => {
                        Some(this.decode_physical_data(el, &format!("{path}/physicalData"))?)
                    }
                    None => None,
                };
            let audio_info = match this.optional(&mut groups, &schema::ROOT, &path, "audioInfo")? {
                Some(el) => Some(this.decode_audio_info(el, &format!("{path}/audioInfo"))?),
                None => None,
            };
            let calibration_info =
                match this.optional(&mut groups, &schema::ROOT, &path, "calibrationInfo")? {
                    Some(el) => {
                        Some(this.decode_calibration_info(el, &format!("{path}/calibrationInfo"))?)
                    }
                    None => None,
                };

            Ok(AudioMd {
                analog_digital_flag: flag,
                file_data,
                physical_data,
                audio_info,
                calibration_info,
            })
        })
    }

    fn root_flag(&mut self, root: &Element, path: &str) -> Result<AnalogDigitalFlag> {
        let attr_path = format!("{path}/@ANALOGDIGITALFLAG");
        let Some(raw) = root.attributes.get("ANALOGDIGITALFLAG") else {
            return Err(Error::schema(ErrorKind::MissingRequiredField {
                path: attr_path,
            }));
        };
        AnalogDigitalFlag::from_token(raw).ok_or_else(|| {
            Error::schema(ErrorKind::TypeCoercion {
                path: attr_path,
                expected: ValueType::Token(schema::ANALOG_DIGITAL_FLAGS).expected(),
                found: raw.clone(),
            })
        })
    }

    fn decode_file_data(&mut self, el: &'a Element, path: &str) -> Result<FileData> {
        self.scoped(el, |this| {
            let rule = rule_at(&["AUDIOMD", "fileData"], path)?;
            this.check_attributes(el, rule, path)?;
            let mut groups = this.collect_children(el, rule, path)?;

            let mut data = FileData {
                audio_block_size: this.opt_int(&mut groups, rule, path, "audioBlockSize")?,
                audio_data_encoding: this.vec_str(&mut groups, rule, path, "audioDataEncoding")?,
                bits_per_sample: this.opt_int(&mut groups, rule, path, "bitsPerSample")?,
                byte_order: this.opt_str(&mut groups, rule, path, "byteOrder")?,
                data_rate: this.opt_int(&mut groups, rule, path, "dataRate")?,
                first_sample_offset: this.opt_int(&mut groups, rule, path, "firstSampleOffset")?,
                first_valid_byte_block: this.opt_int(
                    &mut groups,
                    rule,
                    path,
                    "firstValidByteBlock",
                )?,
                format_location: this.opt_str(&mut groups, rule, path, "formatLocation")?,
                format_name: this.opt_str(&mut groups, rule, path, "formatName")?,
                format_note: this.vec_str(&mut groups, rule, path, "formatNote")?,
                format_version: this.opt_str(&mut groups, rule, path, "formatVersion")?,
                last_valid_byte_block: this.opt_int(
                    &mut groups,
                    rule,
                    path,
                    "lastValidByteBlock",
                )?,
                num_sample_frames: this.opt_int(&mut groups, rule, path, "numSampleFrames")?,
                sampling_frequency: this.opt_decimal(
                    &mut groups,
                    rule,
                    path,
                    "samplingFrequency",
                )?,
                security: this.opt_str(&mut groups, rule, path, "security")?,
                use_types: this.vec_str(&mut groups, rule, path, "use")?,
                other_use: this.vec_str(&mut groups, rule, path, "otherUse")?,
                word_size: this.opt_int(&mut groups, rule, path, "wordSize")?,
                ..FileData::default()
            };

            if let Some(raw) = this.opt_str(&mut groups, rule, path, "dataRateMode")? {
                let mode_path = format!("{path}/dataRateMode");
                let mode = DataRateMode::from_token(&raw).ok_or_else(|| {
                    Error::schema(ErrorKind::TypeCoercion {
                        path: mode_path,
                        expected: ValueType::Token(schema::DATA_RATE_MODES).expected(),
                        found: raw,
                    })
                })?;
                data.data_rate_mode = Some(mode);
            }

            let digest_path = format!("{path}/messageDigest");
            for digest_el in this.repeated(&mut groups, rule, path, "messageDigest")? {
                data.message_digest
                    .push(this.decode_message_digest(digest_el, &digest_path)?);
            }

            let compression_path = format!("{path}/compression");
            for compression_el in this.repeated(&mut groups, rule, path, "compression")? {
                data.compression
                    .push(this.decode_compression(compression_el, &compression_path)?);
            }

            Ok(data)
        })
    }

    fn decode_message_digest(&mut self, el: &'a Element, path: &str) -> Result<MessageDigest> {
        self.scoped(el, |this| {
            let rule = rule_at(&["AUDIOMD", "fileData", "messageDigest"], path)?;
            this.check_attributes(el, rule, path)?;
            let mut groups = this.collect_children(el, rule, path)?;

            Ok(MessageDigest {
                datetime: this.req_str(&mut groups, rule, path, "messageDigestDatetime")?,
                algorithm: this.req_str(&mut groups, rule, path, "messageDigestAlgorithm")?,
                digest: this.req_str(&mut groups, rule, path, "messageDigest")?,
            })
        })
    }

    fn decode_compression(&mut self, el: &'a Element, path: &str) -> Result<Compression> {
        self.scoped(el, |this| {
            let rule = rule_at(&["AUDIOMD", "fileData", "compression"], path)?;
            this.check_attributes(el, rule, path)?;
            let mut groups = this.collect_children(el, rule, path)?;

            let mut compression = Compression {
                codec_creator_app: this.opt_str(&mut groups, rule, path, "codecCreatorApp")?,
                codec_creator_app_version: this.opt_str(
                    &mut groups,
                    rule,
                    path,
                    "codecCreatorAppVersion",
                )?,
                codec_name: this.opt_str(&mut groups, rule, path, "codecName")?,
                codec_quality: None,
            };

            if let Some(raw) = this.opt_str(&mut groups, rule, path, "codecQuality")? {
                let quality_path = format!("{path}/codecQuality");
                let quality = CodecQuality::from_token(&raw).ok_or_else(|| {
                    Error::schema(ErrorKind::TypeCoercion {
                        path: quality_path,
                        expected: ValueType::Token(schema::CODEC_QUALITIES).expected(),
                        found: raw,
                    })
                })?;
                compression.codec_quality = Some(quality);
            }

            Ok(compression)
        })
    }

    fn decode_physical_data(&mut self, el: &'a Element, path: &str) -> Result<PhysicalData> {
        self.scoped(el, |this| {
            let rule = rule_at(&["AUDIOMD", "physicalData"], path)?;
            this.check_attributes(el, rule, path)?;
            let mut groups = this.collect_children(el, rule, path)?;

            let mut data = PhysicalData {
                ebu_storage_media_codes: this.opt_str(
                    &mut groups,
                    rule,
                    path,
                    "EBUStorageMediaCodes",
                )?,
                condition: this.opt_str(&mut groups, rule, path, "condition")?,
                disposition: this.opt_str(&mut groups, rule, path, "disposition")?,
                equalization: this.opt_str(&mut groups, rule, path, "equalization")?,
                generation: this.opt_str(&mut groups, rule, path, "generation")?,
                groove: this.opt_str(&mut groups, rule, path, "groove")?,
                noise_reduction: this.opt_str(&mut groups, rule, path, "noiseReduction")?,
                phys_format: this.opt_str(&mut groups, rule, path, "physFormat")?,
                speed: this.opt_str(&mut groups, rule, path, "speed")?,
                speed_adjustment: this.opt_str(&mut groups, rule, path, "speedAdjustment")?,
                speed_note: this.opt_str(&mut groups, rule, path, "speedNote")?,
                track_format: this.opt_str(&mut groups, rule, path, "trackFormat")?,
                note: this.vec_str(&mut groups, rule, path, "note")?,
                ..PhysicalData::default()
            };

            let dimensions_path = format!("{path}/dimensions");
            for dims_el in this.repeated(&mut groups, rule, path, "dimensions")? {
                data.dimensions
                    .push(this.decode_dimensions(dims_el, &dimensions_path)?);
            }

            let material_path = format!("{path}/material");
            for material_el in this.repeated(&mut groups, rule, path, "material")? {
                data.material
                    .push(this.decode_material(material_el, &material_path)?);
            }

            let tracking_path = format!("{path}/tracking");
            for tracking_el in this.repeated(&mut groups, rule, path, "tracking")? {
                data.tracking
                    .push(this.decode_tracking(tracking_el, &tracking_path)?);
            }

            Ok(data)
        })
    }

    fn decode_dimensions(&mut self, el: &'a Element, path: &str) -> Result<Dimensions> {
        self.scoped(el, |this| {
            let rule = rule_at(&["AUDIOMD", "physicalData", "dimensions"], path)?;
            this.check_attributes(el, rule, path)?;
            this.forbid_children(el, path)?;

            Ok(Dimensions {
                depth: this.attr_decimal(el, "DEPTH", path)?,
                diameter: this.attr_decimal(el, "DIAMETER", path)?,
                gauge: this.attr_decimal(el, "GAUGE", path)?,
                height: this.attr_decimal(el, "HEIGHT", path)?,
                length: this.attr_decimal(el, "LENGTH", path)?,
                note: el.attributes.get("NOTE").cloned(),
                thickness: this.attr_decimal(el, "THICKNESS", path)?,
                units: el.attributes.get("UNITS").cloned(),
                width: this.attr_decimal(el, "WIDTH", path)?,
            })
        })
    }

    fn decode_material(&mut self, el: &'a Element, path: &str) -> Result<Material> {
        self.scoped(el, |this| {
            let rule = rule_at(&["AUDIOMD", "physicalData", "material"], path)?;
            this.check_attributes(el, rule, path)?;
            let mut groups = this.collect_children(el, rule, path)?;

            Ok(Material {
                base_material: this.opt_str(&mut groups, rule, path, "baseMaterial")?,
                binder: this.opt_str(&mut groups, rule, path, "binder")?,
                disc_surface: this.opt_str(&mut groups, rule, path, "discSurface")?,
                oxide: this.opt_str(&mut groups, rule, path, "oxide")?,
                active_layer: this.opt_str(&mut groups, rule, path, "activeLayer")?,
                reflective_layer: this.opt_str(&mut groups, rule, path, "reflectiveLayer")?,
                stock_brand: this.opt_str(&mut groups, rule, path, "stockBrand")?,
                method: this.opt_str(&mut groups, rule, path, "method")?,
                used_sides: this.opt_str(&mut groups, rule, path, "usedSides")?,
            })
        })
    }

    fn decode_tracking(&mut self, el: &'a Element, path: &str) -> Result<Tracking> {
        self.scoped(el, |this| {
            let rule = rule_at(&["AUDIOMD", "physicalData", "tracking"], path)?;
            this.check_attributes(el, rule, path)?;
            let mut groups = this.collect_children(el, rule, path)?;

            Ok(Tracking {
                tracking_type: this.opt_str(&mut groups, rule, path, "trackingType")?,
                tracking_value: this.opt_str(&mut groups, rule, path, "trackingValue")?,
            })
        })
    }

    fn decode_audio_info(&mut self, el: &'a Element, path: &str) -> Result<AudioInfo> {
        self.scoped(el, |this| {
            let rule = rule_at(&["AUDIOMD", "audioInfo"], path)?;
            this.check_attributes(el, rule, path)?;
            let mut groups = this.collect_children(el, rule, path)?;

            let mut info = AudioInfo {
                duration: this.opt_str(&mut groups, rule, path, "duration")?,
                note: this.vec_str(&mut groups, rule, path, "note")?,
                num_channels: this.opt_int(&mut groups, rule, path, "numChannels")?,
                sound_field: this.vec_str(&mut groups, rule, path, "soundField")?,
                ..AudioInfo::default()
            };

            let map_path = format!("{path}/soundChannelMap");
            for map_el in this.repeated(&mut groups, rule, path, "soundChannelMap")? {
                info.sound_channel_map
                    .push(this.decode_sound_channel_map(map_el, &map_path)?);
            }

            Ok(info)
        })
    }

    fn decode_sound_channel_map(&mut self, el: &'a Element, path: &str) -> Result<SoundChannelMap> {
        self.scoped(el, |this| {
            let rule = rule_at(&["AUDIOMD", "audioInfo", "soundChannelMap"], path)?;
            this.check_attributes(el, rule, path)?;
            let mut groups = this.collect_children(el, rule, path)?;

            let mut map = SoundChannelMap::default();
            let assignment_path = format!("{path}/channelAssignment");
            for assignment_el in this.repeated(&mut groups, rule, path, "channelAssignment")? {
                map.channel_assignments
                    .push(this.decode_channel_assignment(assignment_el, &assignment_path)?);
            }
            Ok(map)
        })
    }

    fn decode_channel_assignment(
        &mut self,
        el: &'a Element,
        path: &str,
    ) -> Result<ChannelAssignment> {
        self.scoped(el, |this| {
            let rule = rule_at(
                &["AUDIOMD", "audioInfo", "soundChannelMap", "channelAssignment"],
                path,
            )?;
            this.check_attributes(el, rule, path)?;
            this.forbid_children(el, path)?;

            Ok(ChannelAssignment {
                channel_num: this.attr_int(el, "CHANNELNUM", path)?,
                map_location: el.attributes.get("MAPLOCATION").cloned(),
            })
        })
    }

    fn decode_calibration_info(&mut self, el: &'a Element, path: &str) -> Result<CalibrationInfo> {
        self.scoped(el, |this| {
            let rule = rule_at(&["AUDIOMD", "calibrationInfo"], path)?;
            this.check_attributes(el, rule, path)?;
            let mut groups = this.collect_children(el, rule, path)?;

            Ok(CalibrationInfo {
                ext_int: this.opt_str(&mut groups, rule, path, "calibrationExtInt")?,
                location: this.opt_str(&mut groups, rule, path, "calibrationLocation")?,
                time_stamp: this.opt_str(&mut groups, rule, path, "calibrationTimeStamp")?,
                track_type: this.opt_str(&mut groups, rule, path, "calibrationTrackType")?,
            })
        })
    }

    // ---- namespace scopes ----

    /// Run `f` with the element's namespace declarations in scope; the frame
    /// is popped whether `f` succeeds or fails
    fn scoped<T>(&mut self, el: &Element, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.enter(el);
        let result = f(self);
        self.scopes.pop();
        result
    }

    fn enter(&mut self, el: &Element) {
        let mut frame = Vec::new();
        for (name, value) in el.attributes.iter() {
            if name == "xmlns" {
                frame.push((String::new(), value.clone()));
            } else if let Some(prefix) = name.strip_prefix("xmlns:") {
                frame.push((prefix.to_string(), value.clone()));
            }
        }
        self.scopes.push(frame);
    }

    fn resolve_prefix(&self, prefix: &str) -> Option<&str> {
        for frame in self.scopes.iter().rev() {
            for (p, ns) in frame.iter().rev() {
                if p == prefix {
                    return Some(ns);
                }
            }
        }
        None
    }

    /// Namespace of an element; its own scope frame must already be pushed
    fn element_ns(&self, el: &Element, path: &str) -> Result<String> {
        match el.prefix() {
            Some(prefix) => self
                .resolve_prefix(prefix)
                .map(str::to_string)
                .ok_or_else(|| {
                    Error::with_message(
                        ErrorKind::SchemaViolation {
                            path: path.to_string(),
                        },
                        Span::empty(),
                        format!("unbound namespace prefix: {prefix}"),
                    )
                }),
            None => Ok(self.resolve_prefix("").unwrap_or_default().to_string()),
        }
    }

    // ---- structural checks ----

    /// Validate the attribute set of an element against its rule
    fn check_attributes(
        &mut self,
        el: &Element,
        rule: &'static ElementRule,
        path: &str,
    ) -> Result<()> {
        let names: Vec<String> = el.attributes.keys().cloned().collect();
        for name in names {
            if name == "xmlns" || name.starts_with("xmlns:") {
                continue;
            }
            if let Some((prefix, _local)) = name.split_once(':') {
                // xsi:schemaLocation and friends are wiring, not metadata
                if self.resolve_prefix(prefix) == Some(schema::XSI_NS) {
                    continue;
                }
                self.deviation(
                    format!("{path}/@{name}"),
                    format!("unknown attribute: {name}"),
                )?;
                continue;
            }
            if rule.attribute(&name).is_none() {
                self.deviation(
                    format!("{path}/@{name}"),
                    format!("unknown attribute: {name}"),
                )?;
            }
        }

        for attr in rule.attributes {
            if attr.required && !el.attributes.contains_key(attr.name) {
                return Err(Error::schema(ErrorKind::MissingRequiredField {
                    path: format!("{path}/@{}", attr.name),
                }));
            }
        }
        Ok(())
    }

    /// Group child elements by schema rule name, applying the unknown-node
    /// policy and rejecting text content in container elements
    fn collect_children(
        &mut self,
        el: &'a Element,
        rule: &'static ElementRule,
        path: &str,
    ) -> Result<Groups<'a>> {
        let mut groups: Groups<'a> = IndexMap::new();

        for content in &el.children {
            match content {
                Content::Text(text) => {
                    self.deviation(
                        path.to_string(),
                        format!("unexpected text content: {:?}", text.trim()),
                    )?;
                }
                Content::Element(child) => {
                    let ns = self.scoped(child, |this| this.element_ns(child, path))?;

                    let local = child.local_name();
                    if ns != schema::AUDIOMD_NS {
                        self.deviation(
                            format!("{path}/{local}"),
                            format!("element outside the AudioMD namespace: {}", child.name),
                        )?;
                        continue;
                    }
                    match rule.child(local) {
                        Some(crule) => {
                            groups.entry(crule.rule.name).or_default().push(child);
                        }
                        None => {
                            self.deviation(
                                format!("{path}/{local}"),
                                format!("unknown element: {local}"),
                            )?;
                        }
                    }
                }
            }
        }

        Ok(groups)
    }

    /// A child that may appear at most once
    fn optional(
        &mut self,
        groups: &mut Groups<'a>,
        rule: &'static ElementRule,
        path: &str,
        name: &str,
    ) -> Result<Option<&'a Element>> {
        let crule = child_rule(rule, name, path)?;
        let items = groups.swap_remove(crule.rule.name).unwrap_or_default();
        self.check_count(crule, items.len(), &format!("{path}/{name}"))?;
        Ok(items.into_iter().next())
    }

    /// A child that may repeat
    fn repeated(
        &mut self,
        groups: &mut Groups<'a>,
        rule: &'static ElementRule,
        path: &str,
        name: &str,
    ) -> Result<Vec<&'a Element>> {
        let crule = child_rule(rule, name, path)?;
        let items = groups.swap_remove(crule.rule.name).unwrap_or_default();
        self.check_count(crule, items.len(), &format!("{path}/{name}"))?;
        Ok(items)
    }

    fn check_count(&self, crule: &'static ChildRule, count: usize, path: &str) -> Result<()> {
        if count == 0 && crule.cardinality.is_required() {
            return Err(Error::schema(ErrorKind::MissingRequiredField {
                path: path.to_string(),
            }));
        }
        if count > 1 && !crule.cardinality.allows_many() {
            return Err(Error::with_message(
                ErrorKind::SchemaViolation {
                    path: path.to_string(),
                },
                Span::empty(),
                format!("element appears {count} times but is allowed at most once"),
            ));
        }
        Ok(())
    }

    fn forbid_children(&mut self, el: &Element, path: &str) -> Result<()> {
        if el.has_element_children() {
            return Err(Error::with_message(
                ErrorKind::SchemaViolation {
                    path: path.to_string(),
                },
                Span::empty(),
                "element does not allow child elements",
            ));
        }
        if !el.text().trim().is_empty() {
            self.deviation(path.to_string(), "unexpected text content".to_string())?;
        }
        Ok(())
    }

    // ---- leaf extraction and coercion ----

    /// Text content of a leaf element, validated against its rule
    fn leaf_text(
        &mut self,
        el: &'a Element,
        crule: &'static ChildRule,
        path: &str,
    ) -> Result<String> {
        self.scoped(el, |this| {
            if el.has_element_children() {
                return Err(Error::with_message(
                    ErrorKind::SchemaViolation {
                        path: path.to_string(),
                    },
                    Span::empty(),
                    "leaf element has child elements",
                ));
            }
            this.check_attributes(el, crule.rule, path)?;
            Ok(el.text().trim().to_string())
        })
    }

    fn opt_str(
        &mut self,
        groups: &mut Groups<'a>,
        rule: &'static ElementRule,
        path: &str,
        name: &str,
    ) -> Result<Option<String>> {
        let crule = child_rule(rule, name, path)?;
        let child_path = format!("{path}/{name}");
        match self.optional(groups, rule, path, name)? {
            Some(el) => self.leaf_text(el, crule, &child_path).map(Some),
            None => Ok(None),
        }
    }

    fn req_str(
        &mut self,
        groups: &mut Groups<'a>,
        rule: &'static ElementRule,
        path: &str,
        name: &str,
    ) -> Result<String> {
        let crule = child_rule(rule, name, path)?;
        let child_path = format!("{path}/{name}");
        match self.optional(groups, rule, path, name)? {
            Some(el) => self.leaf_text(el, crule, &child_path),
            None => Err(Error::schema(ErrorKind::MissingRequiredField {
                path: child_path,
            })),
        }
    }

    fn vec_str(
        &mut self,
        groups: &mut Groups<'a>,
        rule: &'static ElementRule,
        path: &str,
        name: &str,
    ) -> Result<Vec<String>> {
        let crule = child_rule(rule, name, path)?;
        let child_path = format!("{path}/{name}");
        let mut out = Vec::new();
        for el in self.repeated(groups, rule, path, name)? {
            out.push(self.leaf_text(el, crule, &child_path)?);
        }
        Ok(out)
    }

    fn opt_int(
        &mut self,
        groups: &mut Groups<'a>,
        rule: &'static ElementRule,
        path: &str,
        name: &str,
    ) -> Result<Option<i64>> {
        let child_path = format!("{path}/{name}");
        match self.opt_str(groups, rule, path, name)? {
            Some(text) => coerce_int(&text, &child_path).map(Some),
            None => Ok(None),
        }
    }

    fn opt_decimal(
        &mut self,
        groups: &mut Groups<'a>,
        rule: &'static ElementRule,
        path: &str,
        name: &str,
    ) -> Result<Option<f64>> {
        let child_path = format!("{path}/{name}");
        match self.opt_str(groups, rule, path, name)? {
            Some(text) => coerce_decimal(&text, &child_path).map(Some),
            None => Ok(None),
        }
    }

    fn attr_int(&self, el: &Element, name: &str, path: &str) -> Result<Option<i64>> {
        match el.attributes.get(name) {
            Some(raw) => coerce_int(raw.trim(), &format!("{path}/@{name}")).map(Some),
            None => Ok(None),
        }
    }

    fn attr_decimal(&self, el: &Element, name: &str, path: &str) -> Result<Option<f64>> {
        match el.attributes.get(name) {
            Some(raw) => coerce_decimal(raw.trim(), &format!("{path}/@{name}")).map(Some),
            None => Ok(None),
        }
    }

    // ---- policy ----

    /// Apply the strict/lenient policy to a schema deviation
    fn deviation(&mut self, path: String, message: String) -> Result<()> {
        match self.config.mode {
            Mode::Strict => Err(Error::with_message(
                ErrorKind::SchemaViolation { path },
                Span::empty(),
                message,
            )),
            Mode::Lenient => {
                tracing::warn!(path = %path, "{message}");
                self.warnings.push(Warning { path, message });
                Ok(())
            }
        }
    }
}

fn child_rule(
    rule: &'static ElementRule,
    name: &str,
    path: &str,
) -> Result<&'static ChildRule> {
    rule.child(name).ok_or_else(|| {
        Error::schema(ErrorKind::SchemaViolation {
            path: format!("{path}/{name}"),
        })
    })
}

fn rule_at(segments: &[&str], path: &str) -> Result<&'static ElementRule> {
    schema::lookup(segments).ok_or_else(|| {
        Error::schema(ErrorKind::SchemaViolation {
            path: path.to_string(),
        })
    })
}

fn coerce_int(text: &str, path: &str) -> Result<i64> {
    text.parse::<i64>().map_err(|_| {
        Error::schema(ErrorKind::TypeCoercion {
            path: path.to_string(),
            expected: ValueType::Int.expected(),
            found: text.to_string(),
        })
    })
}

fn coerce_decimal(text: &str, path: &str) -> Result<f64> {
    let parsed = text.parse::<f64>().ok().filter(|v| v.is_finite());
    parsed.ok_or_else(|| {
        Error::schema(ErrorKind::TypeCoercion {
            path: path.to_string(),
            expected: ValueType::Decimal.expected(),
            found: text.to_string(),
        })
    })
}
