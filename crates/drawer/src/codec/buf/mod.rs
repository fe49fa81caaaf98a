//! Flat-buffer codec.
//!
//! Elements are appended positionally with no keys: structs are their fields
//! in declaration order, collections a 4-byte count followed by the elements,
//! `Option` a marker byte (0 absent, 1 present) followed by the value. Enum
//! variants are a 4-byte variant index.
//!
//! Decoding mirrors encoding exactly. There is no field lookup, so missing
//! fields cannot fall back to defaults and the format is not self-describing.

mod decoder;
mod encoder;

pub use decoder::BufDecoder;
pub use encoder::BufEncoder;

/// Marker byte preceding an absent optional value.
pub const ABSENT: u8 = 0;

/// Marker byte preceding a present optional value.
pub const PRESENT: u8 = 1;

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::codec::{Reader, Writer};
    use crate::error::{DecodeError, EncodeError};
    use crate::limits::BufLimits;
    use crate::test_data::{Attitude, CityData, Message, StreetData2, Zoo};

    fn encode<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
        let mut writer = Writer::new();
        value.serialize(&mut BufEncoder::new(&mut writer)).unwrap();
        writer.into_bytes()
    }

    fn decode<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T, DecodeError> {
        let mut decoder = BufDecoder::new(bytes);
        let value = T::deserialize(&mut decoder)?;
        decoder.end()?;
        Ok(value)
    }

    #[test]
    fn test_struct_layout() {
        let bytes = encode(&CityData {
            id: 1,
            name: "Bar".into(),
        });
        assert_eq!(bytes, vec![0, 0, 0, 1, 3, b'B', b'a', b'r']);
    }

    #[test]
    fn test_option_markers() {
        let street = StreetData2 {
            id: 2,
            name: "Baz".into(),
            city: None,
        };
        let bytes = encode(&street);
        assert_eq!(bytes, vec![0, 0, 0, 2, 3, b'B', b'a', b'z', ABSENT]);
        assert_eq!(decode::<StreetData2>(&bytes).unwrap(), street);

        let street = StreetData2 {
            city: Some(CityData {
                id: 3,
                name: String::new(),
            }),
            ..street
        };
        let bytes = encode(&street);
        assert_eq!(bytes[8], PRESENT);
        assert_eq!(decode::<StreetData2>(&bytes).unwrap(), street);
    }

    #[test]
    fn test_collections_are_counted() {
        let bytes = encode(&vec![7i16, -1]);
        assert_eq!(bytes, vec![0, 0, 0, 2, 0, 7, 0xFF, 0xFF]);

        let map: BTreeMap<String, bool> = [("a".to_owned(), true)].into();
        let bytes = encode(&map);
        assert_eq!(bytes, vec![0, 0, 0, 1, 1, b'a', 1]);
        assert_eq!(decode::<BTreeMap<String, bool>>(&bytes).unwrap(), map);
    }

    #[test]
    fn test_enum_index() {
        assert_eq!(encode(&Attitude::Negative), vec![0, 0, 0, 2]);
        assert_eq!(decode::<Attitude>(&[0, 0, 0, 1]).unwrap(), Attitude::Neutral);
        assert!(matches!(
            decode::<Attitude>(&[0, 0, 0, 9]),
            Err(DecodeError::InvalidValue { .. })
        ));

        let message = Message::Str {
            text: "hi".into(),
        };
        assert_eq!(decode::<Message>(&encode(&message)).unwrap(), message);
    }

    #[test]
    fn test_zoo_round_trip() {
        let zoo = Zoo::sample();
        assert_eq!(decode::<Zoo>(&encode(&zoo)).unwrap(), zoo);
    }

    #[test]
    fn test_underrun() {
        let bytes = encode(&CityData {
            id: 1,
            name: "Bar".into(),
        });
        assert!(matches!(
            decode::<CityData>(&bytes[..6]),
            Err(DecodeError::BufferUnderrun { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_markers() {
        assert_eq!(
            decode::<Option<i8>>(&[2, 0]).unwrap_err(),
            DecodeError::InvalidMarker { value: 2 }
        );
        assert_eq!(
            decode::<bool>(&[5]).unwrap_err(),
            DecodeError::InvalidBool { value: 5 }
        );
    }

    #[test]
    fn test_trailing_bytes() {
        assert_eq!(
            decode::<i8>(&[1, 2]).unwrap_err(),
            DecodeError::TrailingBytes { remaining: 1 }
        );
    }

    #[test]
    fn test_not_self_describing() {
        let err = decode::<serde_json::Value>(&[0]).unwrap_err();
        assert!(matches!(err, DecodeError::NotSelfDescribing { .. }));
    }

    #[test]
    fn test_collection_limit() {
        let bytes = encode(&vec![0u8; 10]);
        let mut decoder = BufDecoder::with_limits(
            &bytes,
            BufLimits {
                max_collection_len: 4,
                ..BufLimits::default()
            },
        );
        let err = Vec::<u8>::deserialize(&mut decoder).unwrap_err();
        assert!(matches!(err, DecodeError::LengthExceedsLimit { len: 10, max: 4, .. }));
    }

    #[test]
    fn test_string_limit_on_encode() {
        let long = "x".repeat(crate::limits::MAX_STRING_LEN + 1);
        let mut writer = Writer::new();
        let err = long
            .serialize(&mut BufEncoder::new(&mut writer))
            .unwrap_err();
        assert!(matches!(err, EncodeError::LengthExceedsLimit { .. }));
    }

    #[test]
    fn test_longest_string_of_wide_chars() {
        let wide = "\u{1F600}".repeat(crate::limits::MAX_STRING_LEN);
        let bytes = encode(&wide);
        assert_eq!(decode::<String>(&bytes).unwrap(), wide);
    }

    #[test]
    fn test_shared_reader() {
        let mut writer = Writer::new();
        5i32.serialize(&mut BufEncoder::new(&mut writer)).unwrap();
        "next".serialize(&mut BufEncoder::new(&mut writer)).unwrap();
        let bytes = writer.into_bytes();

        let mut decoder = BufDecoder::from_reader(Reader::new(&bytes), BufLimits::default());
        assert_eq!(i32::deserialize(&mut decoder).unwrap(), 5);
        let reader = decoder.into_reader();
        assert_eq!(reader.position(), 4);
        let mut decoder = BufDecoder::from_reader(reader, BufLimits::default());
        assert_eq!(<&str>::deserialize(&mut decoder).unwrap(), "next");
        decoder.end().unwrap();
    }
}
