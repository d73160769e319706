//! Status vocabularies.
//!
//! The store keeps statuses as free-form strings. Domain rules only ever test a
//! handful of known values, so each vocabulary is a closed set plus `Other`,
//! which carries unknown legacy values through untouched.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// Value outside the known set, kept verbatim.
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Other(s) => s.as_str(),
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($text => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.as_str() {
                    $($text => $name::$variant,)+
                    _ => $name::Other(s),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer).map($name::from)
            }
        }
    };
}

vocabulary! {
    /// Billing lifecycle of a fiscal device.
    DeviceStatus {
        Pending => "pending",
        Active => "active",
        Billed => "billed",
        NotRequired => "not_required",
        Expired => "expired",
    }
}

vocabulary! {
    /// Contract state of an OFD provider.
    ProviderStatus {
        Active => "active",
        Expiring => "expiring",
        Suspended => "suspended",
    }
}

vocabulary! {
    UserRole {
        Admin => "admin",
        Manager => "manager",
        Viewer => "viewer",
    }
}

vocabulary! {
    /// Outcome of a spreadsheet import.
    ImportStatus {
        Success => "success",
        Warning => "warning",
        Failed => "failed",
    }
}

impl Default for DeviceStatus {
    fn default() -> Self { DeviceStatus::Pending }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_round_trip_through_str() {
        assert_eq!(DeviceStatus::from("billed"), DeviceStatus::Billed);
        assert_eq!(DeviceStatus::Billed.as_str(), "billed");
        assert_eq!(ProviderStatus::from("active"), ProviderStatus::Active);
        assert_eq!(UserRole::from("viewer").to_string(), "viewer");
    }

    #[test]
    fn unknown_values_are_preserved() {
        let legacy = DeviceStatus::from("на проверке");
        assert!(!legacy.is_known());
        assert_eq!(legacy.as_str(), "на проверке");
        assert_eq!(ImportStatus::from(String::from("partial")), ImportStatus::Other("partial".into()));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(ProviderStatus::from("Active"), ProviderStatus::Other("Active".into()));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&vec![DeviceStatus::Pending, DeviceStatus::Other("legacy".into())]).unwrap();
        assert_eq!(json, r#"["pending","legacy"]"#);
        let back: Vec<DeviceStatus> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0], DeviceStatus::Pending);
        assert_eq!(back[1], DeviceStatus::Other("legacy".into()));
    }

    #[test]
    fn device_default_is_pending() {
        assert_eq!(DeviceStatus::default(), DeviceStatus::Pending);
    }
}
