//! Tuya data point type model.
//! Describes DP value types, per-code status range descriptors, and integer scaling.

use crate::error::{DpError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

define_dp_type! {
    Boolean = "Boolean",
    Integer = "Integer",
    Enum = "Enum",
    String = "String",
    Json = "Json",
    Raw = "Raw",
    Bitmap = "Bitmap",
}

impl std::fmt::Display for DpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DpType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DpType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Status range descriptor of one DP code, as supplied by the vendor.
///
/// `values` is kept as received: Tuya sends it either as a JSON-encoded
/// string or as an already structured object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRange {
    pub code: String,
    #[serde(rename = "type")]
    pub dp_type: DpType,
    #[serde(default)]
    pub values: Value,
}

impl StatusRange {
    pub fn new<C: Into<String>>(code: C, dp_type: DpType, values: Value) -> Self {
        Self {
            code: code.into(),
            dp_type,
            values,
        }
    }

    /// Returns `values` as a JSON object, decoding it first when it is a string.
    /// Anything that is not (or does not decode to) an object yields `None`.
    pub fn values_object(&self) -> Option<Map<String, Value>> {
        metadata_object(&self.values)
    }
}

/// Interprets vendor metadata as a JSON object.
pub(crate) fn metadata_object(metadata: &Value) -> Option<Map<String, Value>> {
    match metadata {
        Value::Object(map) => Some(map.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    }
}

/// 2^63 as a float; integral floats in `-I64_BOUND..I64_BOUND` convert exactly.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Reads an integer from a JSON number or a numeric string.
/// Floats must be integral and inside the `i64` range; nothing is clamped.
pub(crate) fn json_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(f))
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Integer type information for a DP code (range, scale, step, unit).
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerTypeInformation {
    pub dpcode: String,
    pub min: i64,
    pub max: i64,
    /// Decimal places: a raw value `v` represents `v / 10^scale`.
    pub scale: u32,
    pub step: i64,
    pub unit: String,
    /// When false, raw values outside `min..=max` are still reported.
    pub check_range: bool,
}

impl IntegerTypeInformation {
    /// Plain integer information used to expose a bitmap as a number: no scaling, 31-bit max.
    pub fn plain<C: Into<String>>(dpcode: C) -> Self {
        Self {
            dpcode: dpcode.into(),
            min: 0,
            max: i32::MAX as i64,
            scale: 0,
            step: 1,
            unit: String::new(),
            check_range: true,
        }
    }

    /// Parses the `values` of an Integer status range.
    ///
    /// `min` and `max` are required; `scale` defaults to 0, `step` to 1, `unit` to "".
    pub fn from_status_range(status_range: &StatusRange) -> Result<Self> {
        let code = status_range.code.clone();
        if status_range.dp_type != DpType::Integer {
            return Err(DpError::WrongDpType {
                code,
                expected: DpType::Integer.as_str(),
                found: status_range.dp_type.as_str(),
            });
        }

        let invalid = |reason: &str| DpError::InvalidTypeInformation {
            code: status_range.code.clone(),
            reason: reason.to_string(),
        };

        let values = status_range
            .values_object()
            .ok_or_else(|| invalid("values is not a JSON object"))?;
        let field = |name: &str| values.get(name).and_then(json_as_i64);

        let min = field("min").ok_or_else(|| invalid("missing or invalid 'min'"))?;
        let max = field("max").ok_or_else(|| invalid("missing or invalid 'max'"))?;
        let scale = match values.get("scale") {
            None => 0,
            Some(v) => json_as_i64(v)
                .and_then(|s| u32::try_from(s).ok())
                .ok_or_else(|| invalid("invalid 'scale'"))?,
        };
        let step = field("step").unwrap_or(1);
        let unit = values
            .get("unit")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            dpcode: code,
            min,
            max,
            scale,
            step,
            unit,
            check_range: true,
        })
    }

    /// Same information with range checking disabled.
    pub fn without_range_check(mut self) -> Self {
        self.check_range = false;
        self
    }

    fn factor(&self) -> f64 {
        10f64.powi(self.scale as i32)
    }

    /// Converts a raw device integer to its native value.
    pub fn scale_value(&self, raw: i64) -> f64 {
        raw as f64 / self.factor()
    }

    /// Converts a native value back to the raw device integer, rounding to nearest.
    pub fn scale_value_back(&self, value: f64) -> i64 {
        (value * self.factor()).round() as i64
    }

    pub fn is_in_range(&self, raw: i64) -> bool {
        (self.min..=self.max).contains(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dp_type_parse() {
        assert_eq!("Bitmap".parse::<DpType>(), Ok(DpType::Bitmap));
        assert_eq!("bitmap".parse::<DpType>(), Ok(DpType::Bitmap));
        assert_eq!("Integer".parse::<DpType>(), Ok(DpType::Integer));
        assert_eq!(
            "Float".parse::<DpType>(),
            Err(DpError::UnknownDpType("Float".into()))
        );
        assert_eq!(DpType::Json.to_string(), "Json");
    }

    #[test]
    fn test_status_range_deserialize() {
        let sr: StatusRange = serde_json::from_value(json!({
            "code": "fault",
            "type": "Bitmap",
            "values": "{\"label\":[\"E1\",\"E2\"]}"
        }))
        .unwrap();
        assert_eq!(sr.dp_type, DpType::Bitmap);
        let obj = sr.values_object().unwrap();
        assert_eq!(obj["label"], json!(["E1", "E2"]));
    }

    #[test]
    fn test_values_object_rejects_non_objects() {
        let sr = StatusRange::new("x", DpType::Raw, json!("[1,2]"));
        assert!(sr.values_object().is_none());
        let sr = StatusRange::new("x", DpType::Raw, Value::Null);
        assert!(sr.values_object().is_none());
    }

    #[test]
    fn test_integer_type_information() {
        let sr = StatusRange::new(
            "temp_set",
            DpType::Integer,
            json!({"min": 50, "max": "350", "scale": 1, "step": 5, "unit": "℃"}),
        );
        let info = IntegerTypeInformation::from_status_range(&sr).unwrap();
        assert_eq!(info.min, 50);
        assert_eq!(info.max, 350);
        assert_eq!(info.unit, "℃");
        assert_eq!(info.scale_value(215), 21.5);
        assert_eq!(info.scale_value_back(21.5), 215);
        assert_eq!(info.scale_value_back(21.46), 215);
        assert!(info.is_in_range(350));
        assert!(!info.is_in_range(351));
    }

    #[test]
    fn test_json_as_i64_rejects_out_of_range_floats() {
        assert_eq!(json_as_i64(&json!(12.0)), Some(12));
        assert_eq!(json_as_i64(&json!(-3.0)), Some(-3));
        assert_eq!(json_as_i64(&json!(12.5)), None);
        assert_eq!(json_as_i64(&json!(1e30)), None);
        assert_eq!(json_as_i64(&json!(-1e30)), None);
        assert_eq!(json_as_i64(&json!(9.223372036854775808e18)), None);
        assert_eq!(json_as_i64(&json!(-9.223372036854775808e18)), Some(i64::MIN));
        assert_eq!(json_as_i64(&json!(" 42 ")), Some(42));
        assert_eq!(json_as_i64(&json!(true)), None);
    }

    #[test]
    fn test_integer_type_information_defaults_and_errors() {
        let sr = StatusRange::new("countdown_1", DpType::Integer, json!("{\"min\":0,\"max\":86400}"));
        let info = IntegerTypeInformation::from_status_range(&sr).unwrap();
        assert_eq!(info.scale, 0);
        assert_eq!(info.step, 1);
        assert_eq!(info.unit, "");

        let sr = StatusRange::new("countdown_1", DpType::Integer, json!({"min": 0}));
        assert!(matches!(
            IntegerTypeInformation::from_status_range(&sr),
            Err(DpError::InvalidTypeInformation { .. })
        ));

        let sr = StatusRange::new("switch", DpType::Boolean, json!({}));
        assert!(matches!(
            IntegerTypeInformation::from_status_range(&sr),
            Err(DpError::WrongDpType { .. })
        ));
    }
}
