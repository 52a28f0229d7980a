use std::str::FromStr;

use serde::{Deserialize, Serialize, de::Visitor};

use crate::{FxTarget, OsType};

impl<'de> Deserialize<'de> for FxTarget {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FxTargetVisitor;

        impl Visitor<'_> for FxTargetVisitor {
            type Value = FxTarget;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(
                    formatter,
                    "one of linux-web-app, windows-web-app, linux-function-app or windows-function-app"
                )
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                FxTarget::from_str(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(FxTargetVisitor)
    }
}

impl Serialize for FxTarget {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for OsType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct OsTypeVisitor;

        impl Visitor<'_> for OsTypeVisitor {
            type Value = OsType;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "either linux or windows")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                OsType::from_str(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(OsTypeVisitor)
    }
}

impl Serialize for OsType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
