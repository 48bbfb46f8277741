use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::types::PinStatusCode;

impl PinStatusCode {
    const fn code(&self) -> &'static [u8] {
        match self {
            Self::Ready => b"READY",
            Self::SimPin => b"SIM PIN",
            Self::SimPuk => b"SIM PUK",
            Self::PhSimPin => b"PH_SIM PIN",
            Self::PhSimPuk => b"PH_SIM PUK",
            Self::SimPin2 => b"SIM PIN2",
            Self::SimPuk2 => b"SIM PUK2",
            Self::PhNetPin => b"PH-NET PIN",
        }
    }

    fn from_code(code: &[u8]) -> Option<Self> {
        Some(match code {
            b"READY" => Self::Ready,
            b"SIM PIN" => Self::SimPin,
            b"SIM PUK" => Self::SimPuk,
            b"PH_SIM PIN" | b"PH-SIM PIN" => Self::PhSimPin,
            b"PH_SIM PUK" | b"PH-SIM PUK" => Self::PhSimPuk,
            b"SIM PIN2" => Self::SimPin2,
            b"SIM PUK2" => Self::SimPuk2,
            b"PH-NET PIN" => Self::PhNetPin,
            _ => return None,
        })
    }
}

impl Serialize for PinStatusCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(self.code())
    }
}

const VARIANTS: &[&str] = &[
    "READY",
    "SIM PIN",
    "SIM PUK",
    "PH_SIM PIN",
    "PH_SIM PUK",
    "SIM PIN2",
    "SIM PUK2",
    "PH-NET PIN",
];

struct Code(PinStatusCode);

struct CodeVisitor;

impl<'de> de::Visitor<'de> for CodeVisitor {
    type Value = Code;

    fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
        formatter.write_str("a PIN status code")
    }

    fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        PinStatusCode::from_code(value).map(Code).ok_or_else(|| {
            let value = core::str::from_utf8(value).unwrap_or("\u{fffd}");
            de::Error::unknown_variant(value, VARIANTS)
        })
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.visit_bytes(value.as_bytes())
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_identifier(CodeVisitor)
    }
}

struct Visitor;

impl<'de> de::Visitor<'de> for Visitor {
    type Value = PinStatusCode;

    fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
        formatter.write_str("enum PinStatusCode")
    }

    fn visit_enum<A>(self, data: A) -> Result<Self::Value, A::Error>
    where
        A: de::EnumAccess<'de>,
    {
        let (Code(code), _) = data.variant()?;
        Ok(code)
    }
}

impl<'de> Deserialize<'de> for PinStatusCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_enum("PinStatusCode", VARIANTS, Visitor)
    }
}
