//! Python bindings for the xtend-tuya library.
//!
//! Exposes BITMAP label decoding to the Home Assistant integration so the
//! entity read path can call into Rust. None of these functions raise on bad
//! input: unusable values come back as `None` and unusable metadata as an
//! empty label list.

use ::xtend_tuya::LabelTable;
use ::xtend_tuya::bitmap;
use log::LevelFilter;
use pyo3::prelude::*;
use serde_json::Value;

fn to_value(obj: &Bound<'_, PyAny>) -> Option<Value> {
    match pythonize::depythonize::<Value>(obj) {
        Ok(v) => Some(v),
        Err(e) => {
            log::debug!("Unsupported Python value: {}", e);
            None
        }
    }
}

/// Extracts the bitmap label list from status range metadata (str or dict).
#[pyfunction]
pub fn extract_labels(metadata: &Bound<'_, PyAny>) -> Vec<String> {
    to_value(metadata)
        .map(|v| ::xtend_tuya::extract_labels(&v))
        .unwrap_or_default()
}

/// Decodes a raw bitmap value (int or numeric str) against a label list.
///
/// `labels` is coerced like the metadata `label` field; anything that is not a
/// list decodes against an empty table.
#[pyfunction]
pub fn decode_bitmap(value: &Bound<'_, PyAny>, labels: &Bound<'_, PyAny>) -> Option<String> {
    let labels = to_value(labels)
        .map(|v| ::xtend_tuya::coerce_labels(&v))
        .unwrap_or_default();
    let raw = to_value(value)?;
    bitmap::decode_value(&raw, labels.as_slice())
}

/// Label table bound to one BITMAP DP code.
#[pyclass(frozen)]
pub struct BitmapLabels {
    inner: LabelTable,
}

#[pymethods]
impl BitmapLabels {
    #[new]
    pub fn new(metadata: &Bound<'_, PyAny>) -> Self {
        let inner = to_value(metadata)
            .map(|v| LabelTable::from_metadata(&v))
            .unwrap_or_default();
        Self { inner }
    }

    #[getter]
    pub fn labels(&self) -> Vec<String> {
        self.inner.labels().to_vec()
    }

    /// Decoded label string, or None when the value is not a usable bitmask.
    pub fn decode(&self, value: &Bound<'_, PyAny>) -> Option<String> {
        let raw = to_value(value)?;
        self.inner.decode_value(&raw)
    }

    /// Reads `dpcode` from a device status mapping and decodes it.
    pub fn read_device_status(&self, status: &Bound<'_, PyAny>, dpcode: &str) -> Option<String> {
        let raw = status.get_item(dpcode).ok()?;
        if raw.is_none() {
            return None;
        }
        self.decode(&raw)
    }

    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    pub fn __repr__(&self) -> String {
        format!("BitmapLabels(labels={:?})", self.inner.labels())
    }
}

#[pymodule]
fn xtend_tuya_rs(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Force load logging module in main thread to avoid background thread import issues
    let _ = py.import("logging")?;

    // Initialize logging bridge from Rust to Python
    let _ = pyo3_log::try_init();

    #[pyfunction]
    fn _xtend_tuya_atexit() {
        log::set_max_level(LevelFilter::Off);
    }

    #[pyfunction]
    fn version() -> &'static str {
        ::xtend_tuya::version()
    }

    m.add_function(pyo3::wrap_pyfunction!(_xtend_tuya_atexit, m)?)?;
    m.add_function(pyo3::wrap_pyfunction!(version, m)?)?;
    m.add_function(pyo3::wrap_pyfunction!(extract_labels, m)?)?;
    m.add_function(pyo3::wrap_pyfunction!(decode_bitmap, m)?)?;

    let atexit = py.import("atexit")?;
    atexit.call_method1("register", (m.getattr("_xtend_tuya_atexit")?,))?;

    m.add_class::<BitmapLabels>()?;

    m.add("NO_FAULT", bitmap::NO_FAULT)?;

    Ok(())
}
