use audiomd::{
    from_str, to_xml, to_xml_with_config, AnalogDigitalFlag, AudioInfo, AudioMd, ChannelAssignment,
    Compression, ErrorKind, FileData, MessageDigest, SoundChannelMap, WriterConfig,
};

fn sample_record() -> AudioMd {
    let mut record = AudioMd::new(AnalogDigitalFlag::FileDigital);

    let mut file_data = FileData::default();
    file_data.audio_data_encoding.push("PCM".to_string());
    file_data.bits_per_sample = Some(8);
    file_data.data_rate = Some(256);
    file_data.sampling_frequency = Some(44.1);
    file_data.message_digest.push(MessageDigest::new(
        "2018-01-17T14:00:00",
        "MD5",
        "aabbccdd",
    ));
    file_data.compression.push(Compression {
        codec_creator_app: Some("SoundForge".to_string()),
        codec_creator_app_version: Some("10".to_string()),
        codec_name: Some("(:unap)".to_string()),
        codec_quality: None,
    });
    record.file_data = Some(file_data);

    let mut audio_info = AudioInfo::default();
    audio_info.duration = Some("PT1H30M".to_string());
    audio_info.num_channels = Some(1);
    let mut map = SoundChannelMap::default();
    map.channel_assignments.push(ChannelAssignment {
        channel_num: Some(1),
        map_location: Some("LEFT".to_string()),
    });
    audio_info.sound_channel_map.push(map);
    record.audio_info = Some(audio_info);

    record
}

#[test]
fn test_root_element_and_namespaces() -> Result<(), Box<dyn std::error::Error>> {
    let xml = to_xml(&sample_record())?;
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(xml.contains("<amd:AUDIOMD xmlns:amd=\"http://www.loc.gov/audioMD/\""));
    assert!(xml.contains("xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\""));
    assert!(xml.contains(
        "xsi:schemaLocation=\"http://www.loc.gov/audioMD/ \
         https://www.loc.gov/standards/amdvmd/audioMD.xsd\""
    ));
    assert!(xml.contains("ANALOGDIGITALFLAG=\"FileDigital\""));
    Ok(())
}

#[test]
fn test_leaf_values_serialized() -> Result<(), Box<dyn std::error::Error>> {
    let xml = to_xml(&sample_record())?;
    assert!(xml.contains("<amd:audioDataEncoding>PCM</amd:audioDataEncoding>"));
    assert!(xml.contains("<amd:bitsPerSample>8</amd:bitsPerSample>"));
    assert!(xml.contains("<amd:dataRate>256</amd:dataRate>"));
    assert!(xml.contains("<amd:samplingFrequency>44.1</amd:samplingFrequency>"));
    assert!(xml.contains("<amd:codecCreatorApp>SoundForge</amd:codecCreatorApp>"));
    assert!(xml.contains("<amd:channelAssignment CHANNELNUM=\"1\" MAPLOCATION=\"LEFT\"/>"));
    Ok(())
}

#[test]
fn test_schema_order_regardless_of_population_order() -> Result<(), Box<dyn std::error::Error>> {
    // Populate in reverse schema order
    let mut file_data = FileData::default();
    file_data.word_size = Some(2);
    file_data.security = Some("open".to_string());
    file_data.byte_order = Some("big endian".to_string());
    file_data.audio_block_size = Some(1024);

    let mut record = AudioMd::new(AnalogDigitalFlag::FileDigital);
    record.file_data = Some(file_data);

    let xml = to_xml_with_config(&record, WriterConfig::compact())?;
    let block = xml.find("audioBlockSize").ok_or("missing audioBlockSize")?;
    let order = xml.find("byteOrder").ok_or("missing byteOrder")?;
    let security = xml.find("security").ok_or("missing security")?;
    let word = xml.find("wordSize").ok_or("missing wordSize")?;
    assert!(block < order && order < security && security < word);
    Ok(())
}

#[test]
fn test_missing_required_field_on_serialize() {
    let mut audio_info = AudioInfo::default();
    audio_info.sound_channel_map.push(SoundChannelMap::default());
    let mut record = AudioMd::new(AnalogDigitalFlag::FileDigital);
    record.audio_info = Some(audio_info);

    let err = to_xml(&record).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::MissingRequiredField { .. }
    ));
}

#[test]
fn test_text_escaping_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let mut file_data = FileData::default();
    file_data.format_note.push("A <note> & \"quotes\"".to_string());
    let mut record = AudioMd::new(AnalogDigitalFlag::FileDigital);
    record.file_data = Some(file_data);

    let xml = to_xml(&record)?;
    assert!(xml.contains("A &lt;note&gt; &amp; \"quotes\""));

    let reparsed = from_str(&xml)?;
    let notes = reparsed.file_data.ok_or("missing fileData")?.format_note;
    assert_eq!(notes, vec!["A <note> & \"quotes\""]);
    Ok(())
}

#[test]
fn test_round_trip_stability() -> Result<(), Box<dyn std::error::Error>> {
    let record = sample_record();
    let first = to_xml(&record)?;
    let reparsed = from_str(&first)?;
    assert_eq!(reparsed, record);
    let second = to_xml(&reparsed)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_compact_output_has_no_declaration() -> Result<(), Box<dyn std::error::Error>> {
    let xml = to_xml_with_config(&sample_record(), WriterConfig::compact())?;
    assert!(xml.starts_with("<amd:AUDIOMD"));
    assert!(!xml.contains('\n'));
    Ok(())
}

#[test]
fn test_empty_record_serializes_to_bare_root() -> Result<(), Box<dyn std::error::Error>> {
    let record = AudioMd::new(AnalogDigitalFlag::Analog);
    let xml = to_xml_with_config(&record, WriterConfig::compact())?;
    assert!(xml.ends_with("ANALOGDIGITALFLAG=\"Analog\"/>"));
    Ok(())
}
