//! DP code wrappers binding one data point of a device to its type information.
//! A wrapper is located once per entity and then read on every state update.

use crate::device::Device;
use crate::dptype::{DpType, IntegerTypeInformation, StatusRange, json_as_i64};
use crate::error::{DpError, Result};
use crate::labels::LabelTable;
use log::{debug, warn};
use serde_json::Value;

/// Common interface of DP code wrappers.
pub trait DpCodeWrapper: Sized {
    /// Value handed to the host entity.
    type Output;

    /// DP type a status range must carry for this wrapper to apply.
    const DP_TYPE: DpType;

    fn dpcode(&self) -> &str;

    /// Builds the wrapper from a status range already checked to be of [`DP_TYPE`](Self::DP_TYPE).
    fn from_status_range(status_range: &StatusRange) -> Result<Self>;

    /// Reads and converts the current value. `None` means the value is unavailable.
    fn read_device_status(&self, device: &Device) -> Option<Self::Output>;

    /// Locates `dpcode` on the device, reporting why it could not be wrapped.
    fn try_find_dpcode(device: &Device, dpcode: &str) -> Result<Self> {
        let status_range = device
            .status_range(dpcode)
            .ok_or_else(|| DpError::DpCodeNotFound(dpcode.to_string()))?;
        if status_range.dp_type != Self::DP_TYPE {
            return Err(DpError::WrongDpType {
                code: dpcode.to_string(),
                expected: Self::DP_TYPE.as_str(),
                found: status_range.dp_type.as_str(),
            });
        }
        Self::from_status_range(status_range)
    }

    /// Locates `dpcode` on the device; `None` when absent or of another type.
    fn find_dpcode(device: &Device, dpcode: &str) -> Option<Self> {
        match Self::try_find_dpcode(device, dpcode) {
            Ok(wrapper) => Some(wrapper),
            Err(e @ DpError::InvalidTypeInformation { .. }) => {
                warn!("Device {}: {}", device.id, e);
                None
            }
            Err(e) => {
                debug!("Device {}: {}", device.id, e);
                None
            }
        }
    }
}

/// Bitmap DP exposed as a single sensor holding the decoded active labels.
///
/// Labels come from the `label` list of the status range values. Bits beyond
/// the list are reported as `bitN`.
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapLabelsWrapper {
    dpcode: String,
    type_information: IntegerTypeInformation,
    labels: LabelTable,
}

impl BitmapLabelsWrapper {
    pub fn new<C: Into<String>>(dpcode: C, labels: LabelTable) -> Self {
        let dpcode = dpcode.into();
        Self {
            type_information: IntegerTypeInformation::plain(dpcode.clone()),
            dpcode,
            labels,
        }
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn type_information(&self) -> &IntegerTypeInformation {
        &self.type_information
    }

    /// The undecoded bitmask, for hosts that also expose the plain integer.
    pub fn read_raw(&self, device: &Device) -> Option<u64> {
        device
            .status_value(&self.dpcode)
            .and_then(crate::bitmap::parse_raw_value)
    }
}

impl DpCodeWrapper for BitmapLabelsWrapper {
    type Output = String;
    const DP_TYPE: DpType = DpType::Bitmap;

    fn dpcode(&self) -> &str {
        &self.dpcode
    }

    fn from_status_range(status_range: &StatusRange) -> Result<Self> {
        Ok(Self::new(
            status_range.code.clone(),
            LabelTable::from_metadata(&status_range.values),
        ))
    }

    fn read_device_status(&self, device: &Device) -> Option<String> {
        let raw = device.status_value(&self.dpcode)?;
        self.labels.decode_value(raw)
    }
}

/// Integer DP whose reported values are not rejected when outside `min..=max`.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerNoMinMaxCheckWrapper {
    dpcode: String,
    type_information: IntegerTypeInformation,
    pub native_unit: String,
    pub min_value: f64,
    pub max_value: f64,
    pub value_step: f64,
}

impl IntegerNoMinMaxCheckWrapper {
    pub fn new(type_information: IntegerTypeInformation) -> Self {
        let type_information = type_information.without_range_check();
        Self {
            dpcode: type_information.dpcode.clone(),
            native_unit: type_information.unit.clone(),
            min_value: type_information.scale_value(type_information.min),
            max_value: type_information.scale_value(type_information.max),
            value_step: type_information.scale_value(type_information.step),
            type_information,
        }
    }

    pub fn type_information(&self) -> &IntegerTypeInformation {
        &self.type_information
    }

    /// Converts a host value back to the raw device integer.
    pub fn convert_value_to_raw_value(&self, value: f64) -> Value {
        Value::from(self.type_information.scale_value_back(value))
    }
}

impl DpCodeWrapper for IntegerNoMinMaxCheckWrapper {
    type Output = f64;
    const DP_TYPE: DpType = DpType::Integer;

    fn dpcode(&self) -> &str {
        &self.dpcode
    }

    fn from_status_range(status_range: &StatusRange) -> Result<Self> {
        IntegerTypeInformation::from_status_range(status_range).map(Self::new)
    }

    fn read_device_status(&self, device: &Device) -> Option<f64> {
        let raw = device.status_value(&self.dpcode)?;
        let Some(raw) = json_as_i64(raw) else {
            debug!("Ignoring non-integer value for {}: {}", self.dpcode, raw);
            return None;
        };
        if self.type_information.check_range && !self.type_information.is_in_range(raw) {
            return None;
        }
        Some(self.type_information.scale_value(raw))
    }
}

/// Boolean DP backing a switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanWrapper {
    dpcode: String,
}

impl BooleanWrapper {
    pub fn new<C: Into<String>>(dpcode: C) -> Self {
        Self {
            dpcode: dpcode.into(),
        }
    }

    pub fn convert_value_to_raw_value(&self, value: bool) -> Value {
        Value::Bool(value)
    }
}

impl DpCodeWrapper for BooleanWrapper {
    type Output = bool;
    const DP_TYPE: DpType = DpType::Boolean;

    fn dpcode(&self) -> &str {
        &self.dpcode
    }

    fn from_status_range(status_range: &StatusRange) -> Result<Self> {
        Ok(Self::new(status_range.code.clone()))
    }

    fn read_device_status(&self, device: &Device) -> Option<bool> {
        device.status_value(&self.dpcode)?.as_bool()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device() -> Device {
        Device::new("bf01", "dbl")
            .with_status_range(StatusRange::new(
                "fault",
                DpType::Bitmap,
                json!("{\"label\":[\"00\",\"E01\",\"E02\"]}"),
            ))
            .with_status_range(StatusRange::new(
                "temp_set",
                DpType::Integer,
                json!({"min": 50, "max": 350, "scale": 1, "step": 5, "unit": "℃"}),
            ))
            .with_status_range(StatusRange::new("switch", DpType::Boolean, json!("{}")))
            .with_status("fault", json!(6))
            .with_status("temp_set", json!(400))
            .with_status("switch", json!(true))
    }

    #[test]
    fn test_find_bitmap_wrapper() {
        let device = device();
        let wrapper = BitmapLabelsWrapper::find_dpcode(&device, "fault").unwrap();
        assert_eq!(wrapper.dpcode(), "fault");
        assert_eq!(wrapper.labels().labels(), ["00", "E01", "E02"]);
        assert_eq!(wrapper.type_information().max, 2_147_483_647);
        assert_eq!(wrapper.type_information().scale, 0);
        assert_eq!(wrapper.read_device_status(&device).as_deref(), Some("E01,E02"));
        assert_eq!(wrapper.read_raw(&device), Some(6));
    }

    #[test]
    fn test_bitmap_wrapper_reads() {
        let wrapper = BitmapLabelsWrapper::find_dpcode(&device(), "fault").unwrap();
        let read = |v: Value| wrapper.read_device_status(&device().with_status("fault", v));
        assert_eq!(read(json!(0)).as_deref(), Some("00"));
        assert_eq!(read(json!(8)).as_deref(), Some("bit3"));
        assert_eq!(read(json!("2")).as_deref(), Some("E01"));
        assert_eq!(read(json!("garbage")), None);
        assert_eq!(read(Value::Null), None);

        let mut missing = device();
        missing.status.remove("fault");
        assert_eq!(wrapper.read_device_status(&missing), None);
    }

    #[test]
    fn test_find_rejects_wrong_type_and_missing() {
        let device = device();
        assert!(BitmapLabelsWrapper::find_dpcode(&device, "temp_set").is_none());
        assert!(BitmapLabelsWrapper::find_dpcode(&device, "nope").is_none());
        assert_eq!(
            BitmapLabelsWrapper::try_find_dpcode(&device, "nope"),
            Err(DpError::DpCodeNotFound("nope".into()))
        );
        assert!(matches!(
            BooleanWrapper::try_find_dpcode(&device, "fault"),
            Err(DpError::WrongDpType { expected: "Boolean", found: "Bitmap", .. })
        ));
    }

    #[test]
    fn test_integer_no_min_max_check() {
        let device = device();
        let wrapper = IntegerNoMinMaxCheckWrapper::find_dpcode(&device, "temp_set").unwrap();
        assert_eq!(wrapper.native_unit, "℃");
        assert_eq!(wrapper.min_value, 5.0);
        assert_eq!(wrapper.max_value, 35.0);
        assert_eq!(wrapper.value_step, 0.5);
        // 400 is above max but still reported
        assert_eq!(wrapper.read_device_status(&device), Some(40.0));
        assert_eq!(wrapper.convert_value_to_raw_value(21.5), json!(215));
        assert_eq!(
            wrapper.read_device_status(&device.clone().with_status("temp_set", json!("x"))),
            None
        );
    }

    #[test]
    fn test_integer_huge_float_is_unavailable() {
        let device = device();
        let wrapper = IntegerNoMinMaxCheckWrapper::find_dpcode(&device, "temp_set").unwrap();
        let huge: Value = serde_json::from_str("1e30").unwrap();
        assert_eq!(
            wrapper.read_device_status(&device.clone().with_status("temp_set", huge)),
            None
        );
        assert_eq!(
            wrapper.read_device_status(&device.with_status("temp_set", json!(215.0))),
            Some(21.5)
        );
    }

    #[test]
    fn test_integer_invalid_type_information() {
        let device = Device::new("bf01", "dbl").with_status_range(StatusRange::new(
            "temp_set",
            DpType::Integer,
            json!("{}"),
        ));
        assert!(IntegerNoMinMaxCheckWrapper::find_dpcode(&device, "temp_set").is_none());
    }

    #[test]
    fn test_boolean_wrapper() {
        let device = device();
        let wrapper = BooleanWrapper::find_dpcode(&device, "switch").unwrap();
        assert_eq!(wrapper.read_device_status(&device), Some(true));
        assert_eq!(wrapper.convert_value_to_raw_value(false), json!(false));
        assert_eq!(
            wrapper.read_device_status(&device.with_status("switch", json!("on"))),
            None
        );
    }
}
