//! Page geometry settings: paper size and margins.
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeMap};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),
    #[error("Invalid margin shorthand: expected 1, 2, or 4 values, got {0}")]
    MarginArity(usize),
    #[error("Unknown page size: {0}")]
    UnknownPageSize(String),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Margins::all(50.0)
    }
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Parse a CSS-style length value with optional unit (e.g., "10pt", "5mm", "12")
    fn parse_length(input: &str) -> Result<f32, StyleParseError> {
        let input = input.trim();
        let (number, scale) = if let Some(val) = input.strip_suffix("pt") {
            (val, 1.0)
        } else if let Some(val) = input.strip_suffix("px") {
            (val, 1.0)
        } else if let Some(val) = input.strip_suffix("in") {
            (val, 72.0)
        } else if let Some(val) = input.strip_suffix("cm") {
            (val, 28.35)
        } else if let Some(val) = input.strip_suffix("mm") {
            (val, 2.835)
        } else {
            // No unit, assume points
            (input, 1.0)
        };

        number
            .trim()
            .parse::<f32>()
            .map(|v| v * scale)
            .map_err(|_| StyleParseError::InvalidNumber(input.to_string()))
    }

    /// Parse CSS-style margin shorthand (1, 2, or 4 values)
    fn parse_shorthand(input: &str) -> Result<Self, StyleParseError> {
        let values = input
            .split_whitespace()
            .map(Self::parse_length)
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [all] => Ok(Margins::all(*all)),
            [vertical, horizontal] => Ok(Margins {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(Margins {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            other => Err(StyleParseError::MarginArity(other.len())),
        }
    }
}

impl<'de> Deserialize<'de> for Margins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MarginsVisitor;
        impl<'de> de::Visitor<'de> for MarginsVisitor {
            type Value = Margins;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a number, a string like '10pt' or '10pt 20pt', or a map")
            }

            fn visit_str<E>(self, value: &str) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Margins::parse_shorthand(value).map_err(E::custom)
            }

            fn visit_f64<E>(self, value: f64) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Ok(Margins::all(value as f32))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Ok(Margins::all(value as f32))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Margins, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut margins = Margins::all(0.0);
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "top" => margins.top = map.next_value()?,
                        "right" => margins.right = map.next_value()?,
                        "bottom" => margins.bottom = map.next_value()?,
                        "left" => margins.left = map.next_value()?,
                        _ => {
                            map.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }
                Ok(margins)
            }
        }
        deserializer.deserialize_any(MarginsVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
    Custom {
        width: f32,
        height: f32,
    },
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PageSize::A4 => serializer.serialize_str("A4"),
            PageSize::Letter => serializer.serialize_str("Letter"),
            PageSize::Legal => serializer.serialize_str("Legal"),
            PageSize::Custom { width, height } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("width", width)?;
                map.serialize_entry("height", height)?;
                map.end()
            }
        }
    }
}

impl PageSize {
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    fn parse(s: &str) -> Result<Self, StyleParseError> {
        match s.to_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            _ => Err(StyleParseError::UnknownPageSize(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageSizeDef {
            Str(String),
            Map { width: f32, height: f32 },
        }

        match PageSizeDef::deserialize(deserializer)? {
            PageSizeDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            PageSizeDef::Map { width, height } => Ok(PageSize::Custom { width, height }),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    #[serde(default)]
    pub size: PageSize,
    #[serde(default)]
    pub margins: Margins,
}

impl PageLayout {
    pub fn width(&self) -> f32 {
        self.size.dimensions_pt().0
    }

    pub fn height(&self) -> f32 {
        self.size.dimensions_pt().1
    }

    /// Horizontal room between the left and right margins.
    pub fn content_width(&self) -> f32 {
        (self.width() - self.margins.left - self.margins.right).max(0.0)
    }
}
