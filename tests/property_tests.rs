//! Property-based tests for the AudioMD mapper
//!
//! 1. Round-trip law: serialize(parse(serialize(record))) == serialize(record)
//! 2. Parsing back a serialized record reproduces the record exactly
//! 3. Arbitrary input never panics the XML parser

use proptest::prelude::*;

use audiomd::{
    from_str, to_xml, AnalogDigitalFlag, AudioInfo, AudioMd, ChannelAssignment, Compression,
    DataRateMode, FileData, MessageDigest, SoundChannelMap,
};

/// Element text that survives the decoder's whitespace trimming unchanged
fn arb_text() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-zA-Z0-9&<>][a-zA-Z0-9 ._&<>-]{0,10}[a-zA-Z0-9]|[a-zA-Z0-9]")
        .expect("valid regex")
}

fn arb_flag() -> impl Strategy<Value = AnalogDigitalFlag> {
    prop_oneof![
        Just(AnalogDigitalFlag::Analog),
        Just(AnalogDigitalFlag::PhysDigital),
        Just(AnalogDigitalFlag::FileDigital),
    ]
}

fn arb_message_digest() -> impl Strategy<Value = MessageDigest> {
    (arb_text(), arb_text(), arb_text()).prop_map(|(datetime, algorithm, digest)| MessageDigest {
        datetime,
        algorithm,
        digest,
    })
}

fn arb_compression() -> impl Strategy<Value = Compression> {
    (
        proptest::option::of(arb_text()),
        proptest::option::of(arb_text()),
    )
        .prop_map(|(app, name)| Compression {
            codec_creator_app: app,
            codec_name: name,
            ..Compression::default()
        })
}

fn arb_file_data() -> impl Strategy<Value = FileData> {
    (
        proptest::collection::vec(arb_text(), 0..3),
        proptest::option::of(0i64..1_000_000),
        proptest::option::of(arb_text()),
        proptest::option::of(prop_oneof![
            Just(DataRateMode::Fixed),
            Just(DataRateMode::Variable)
        ]),
        proptest::option::of(-1e6f64..1e6f64),
        proptest::collection::vec(arb_message_digest(), 0..2),
        proptest::collection::vec(arb_compression(), 0..2),
    )
        .prop_map(
            |(encodings, bits, byte_order, mode, frequency, digests, compressions)| FileData {
                audio_data_encoding: encodings,
                bits_per_sample: bits,
                byte_order,
                data_rate_mode: mode,
                sampling_frequency: frequency,
                message_digest: digests,
                compression: compressions,
                ..FileData::default()
            },
        )
}

fn arb_audio_info() -> impl Strategy<Value = AudioInfo> {
    (
        proptest::option::of(arb_text()),
        proptest::option::of(0i64..64),
        proptest::collection::vec(
            proptest::collection::vec(
                (proptest::option::of(0i64..64), proptest::option::of(arb_text())).prop_map(
                    |(num, location)| ChannelAssignment {
                        channel_num: num,
                        map_location: location,
                    },
                ),
                1..3,
            )
            .prop_map(|assignments| SoundChannelMap {
                channel_assignments: assignments,
            }),
            0..2,
        ),
    )
        .prop_map(|(duration, channels, maps)| AudioInfo {
            duration,
            num_channels: channels,
            sound_channel_map: maps,
            ..AudioInfo::default()
        })
}

fn arb_record() -> impl Strategy<Value = AudioMd> {
    (
        arb_flag(),
        proptest::option::of(arb_file_data()),
        proptest::option::of(arb_audio_info()),
    )
        .prop_map(|(flag, file_data, audio_info)| AudioMd {
            analog_digital_flag: flag,
            file_data,
            audio_info,
            ..AudioMd::default()
        })
}

proptest! {
    /// serialize(parse(serialize(r))) == serialize(r)
    #[test]
    fn xml_roundtrip_is_stable(record in arb_record()) {
        let first = to_xml(&record).unwrap();
        let reparsed = from_str(&first).unwrap();
        let second = to_xml(&reparsed).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Parsing back a serialized record reproduces the record
    #[test]
    fn record_roundtrips_exactly(record in arb_record()) {
        let xml = to_xml(&record).unwrap();
        let reparsed = from_str(&xml).unwrap();
        prop_assert_eq!(reparsed, record);
    }

    /// The XML parser never panics on arbitrary input
    #[test]
    fn parser_never_panics(input in "\\PC{0,200}") {
        let _result = from_str(&input);
    }

    /// Attribute values always round-trip through escaping
    #[test]
    fn map_location_roundtrips(location in "[a-zA-Z0-9&<>\"' ]{1,20}") {
        prop_assume!(location.trim() == location);
        let mut info = AudioInfo::default();
        let mut map = SoundChannelMap::default();
        map.channel_assignments.push(ChannelAssignment {
            channel_num: Some(1),
            map_location: Some(location.clone()),
        });
        info.sound_channel_map.push(map);
        let mut record = AudioMd::new(AnalogDigitalFlag::FileDigital);
        record.audio_info = Some(info);

        let xml = to_xml(&record).unwrap();
        let reparsed = from_str(&xml).unwrap();
        let roundtripped = reparsed
            .audio_info
            .and_then(|i| i.sound_channel_map.into_iter().next())
            .and_then(|m| m.channel_assignments.into_iter().next())
            .and_then(|a| a.map_location);
        prop_assert_eq!(roundtripped, Some(location));
    }
}
