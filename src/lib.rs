//! # xtend-tuya
//!
//! Translation of Tuya data point (DP) values into Home Assistant entity values,
//! including decoding of BITMAP fault codes into readable label lists.
//!
//! ## Quick Start
//!
//! ```rust
//! use xtend_tuya::LabelTable;
//! use serde_json::json;
//!
//! let labels = LabelTable::from_metadata(&json!("{\"label\":[\"00\",\"E01\",\"E02\"]}"));
//! assert_eq!(labels.decode(0), "00");
//! assert_eq!(labels.decode(6), "E01,E02");
//! assert_eq!(labels.decode(8), "bit3");
//! ```
//!
#[macro_use]
mod macros;
pub mod bitmap;
pub mod description;
pub mod device;
pub mod dptype;
pub mod error;
pub mod labels;
pub mod wrapper;

pub use description::{
    DescriptorTable, EntityCategory, EntityDescription, NumberMode, Platform,
    merge_device_descriptors,
};
pub use device::Device;
pub use dptype::{DpType, IntegerTypeInformation, StatusRange};
pub use error::DpError;
pub use labels::{LabelTable, coerce_labels, extract_labels};
pub use wrapper::{BitmapLabelsWrapper, BooleanWrapper, DpCodeWrapper, IntegerNoMinMaxCheckWrapper};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> &'static str {
    VERSION
}
