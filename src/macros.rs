//! Declarative helpers shared across the crate.

/// Defines numeric error code constants together with `get_error_message`.
macro_rules! define_error_codes {
    ($($name:ident = $code:literal => $msg:literal),* $(,)?) => {
        $(pub const $name: u32 = $code;)*

        /// Returns the human readable message for an error code.
        pub fn get_error_message(code: u32) -> &'static str {
            match code {
                $($name => $msg,)*
                _ => "Unknown Error",
            }
        }
    };
}

/// Defines the DP value type enum with its vendor string names.
macro_rules! define_dp_type {
    ($($variant:ident = $name:literal),* $(,)?) => {
        /// Value type of a Tuya data point, as reported in the status range.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum DpType {
            $($variant,)*
        }

        impl DpType {
            /// Vendor name of the type (e.g. "Bitmap").
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(DpType::$variant => $name,)*
                }
            }
        }

        impl std::str::FromStr for DpType {
            type Err = crate::error::DpError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($name) {
                        return Ok(DpType::$variant);
                    }
                )*
                Err(crate::error::DpError::UnknownDpType(s.to_string()))
            }
        }
    };
}
