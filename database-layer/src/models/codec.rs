//! JSON encoding of structured values kept in TEXT columns
//!
//! Decoding never drops data silently: a malformed column is reported as
//! [`DatabaseError::Encoding`] naming the column.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{DatabaseError, DatabaseResult};

pub fn encode<T: Serialize + ?Sized>(column: &'static str, value: &T) -> DatabaseResult<String> {
    serde_json::to_string(value).map_err(|e| DatabaseError::encoding(column, e))
}

pub fn encode_optional<T: Serialize>(column: &'static str, value: Option<&T>) -> DatabaseResult<Option<String>> {
    value.map(|v| encode(column, v)).transpose()
}

pub fn decode<T: DeserializeOwned>(column: &'static str, raw: &str) -> DatabaseResult<T> {
    serde_json::from_str(raw).map_err(|e| DatabaseError::encoding(column, e))
}

/// `NULL` and empty text both decode to `None`.
pub fn decode_optional<T: DeserializeOwned>(column: &'static str, raw: Option<&str>) -> DatabaseResult<Option<T>> {
    match raw {
        Some(text) if !text.trim().is_empty() => decode(column, text).map(Some),
        _ => Ok(None),
    }
}

/// Empty text decodes to an empty list.
pub fn decode_list<T: DeserializeOwned>(column: &'static str, raw: &str) -> DatabaseResult<Vec<T>> {
    if raw.trim().is_empty() {
        Ok(Vec::new())
    } else {
        decode(column, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, Medication, VitalSigns};

    #[test]
    fn empty_list_encodes_as_brackets() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(encode("languages", &empty).unwrap(), "[]");
        assert!(decode_list::<String>("languages", "").unwrap().is_empty());
    }

    #[test]
    fn address_keeps_its_field_set() {
        let address = Address {
            street: "1 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip_code: "62701".into(),
            country: "US".into(),
        };
        let raw = encode("address", &address).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["city", "country", "state", "street", "zip_code"]);
        assert_eq!(decode_optional::<Address>("address", Some(&raw)).unwrap(), Some(address));
    }

    #[test]
    fn medications_preserve_order_and_quantity() {
        let meds = vec![
            Medication {
                medication_name: "Amoxicillin".into(),
                dosage: "500mg".into(),
                frequency: "3x daily".into(),
                duration: "7 days".into(),
                route: "oral".into(),
                instructions: "after meals".into(),
                quantity: 21,
            },
            Medication {
                medication_name: "Ibuprofen".into(),
                quantity: 10,
                ..Medication::default()
            },
        ];
        let raw = encode("medications", &meds).unwrap();
        assert!(raw.contains(r#""quantity":21"#));
        assert_eq!(decode_list::<Medication>("medications", &raw).unwrap(), meds);
    }

    #[test]
    fn vital_signs_omit_absent_fields() {
        let vitals = VitalSigns {
            heart_rate: Some(72),
            blood_pressure: Some("120/80".into()),
            ..VitalSigns::default()
        };
        let raw = encode("vital_signs", &vitals).unwrap();
        assert_eq!(raw, r#"{"blood_pressure":"120/80","heart_rate":72}"#);
    }

    #[test]
    fn malformed_json_is_an_encoding_error() {
        let err = decode_optional::<Address>("address", Some("{not json")).unwrap_err();
        assert!(matches!(err, DatabaseError::Encoding { column: "address", .. }));
        assert!(decode_optional::<Address>("address", None).unwrap().is_none());
        assert!(decode_optional::<Address>("address", Some("")).unwrap().is_none());
    }
}
