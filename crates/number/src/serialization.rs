use {
    crate::Wad,
    serde::{
        Deserialize,
        Deserializer,
        Serialize,
        Serializer,
        de::{self, Visitor},
    },
    std::fmt,
};

/// Serialize [`Wad`] as a human readable decimal string (`"1.05"`), so JSON
/// output stays exact for values beyond `f64` precision.
impl Serialize for Wad {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Wad {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct WadVisitor;

        impl Visitor<'_> for WadVisitor {
            type Value = Wad;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a decimal encoded string with at most 18 decimals")
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                s.parse()
                    .map_err(|err| E::custom(format!("failed to decode {s:?} as wad: {err}")))
            }
        }

        deserializer.deserialize_str(WadVisitor)
    }
}
