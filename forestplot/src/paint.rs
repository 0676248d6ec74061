// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color helpers shared by the theme, the specification types and renderers.

extern crate alloc;

use alloc::format;
use alloc::string::String;

use peniko::Color;
use peniko::color::{Srgb, parse_color};

/// Parses a CSS color string (`#rrggbb`, `rgb(...)`, named colors, ...).
///
/// Returns `None` if the string is not a valid CSS color.
pub fn parse_css_color(s: &str) -> Option<Color> {
    parse_color(s.trim())
        .ok()
        .map(|c| c.to_alpha_color::<Srgb>())
}

/// Formats a color as `#rrggbb`, ignoring alpha.
///
/// Pair with [`opacity`] when the alpha channel matters.
pub fn css_hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
}

/// Returns the color's alpha as `Some(opacity)` when it is not fully opaque.
pub fn opacity(color: Color) -> Option<f64> {
    let a = color.to_rgba8().a;
    (a != 255).then(|| f64::from(a) / 255.0)
}

/// Serde adapters storing colors as CSS strings.
#[cfg(feature = "serde")]
pub(crate) mod serde_color {
    use alloc::string::String;

    use peniko::Color;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{css_hex, parse_css_color};

    pub(crate) fn serialize<S: Serializer>(color: &Color, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&css_hex(*color))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Color, D::Error> {
        let raw = String::deserialize(d)?;
        parse_css_color(&raw).ok_or_else(|| D::Error::custom("invalid CSS color"))
    }

    pub(crate) mod option {
        use alloc::string::String;

        use peniko::Color;
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        use super::super::{css_hex, parse_css_color};

        pub(crate) fn serialize<S: Serializer>(
            color: &Option<Color>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match color {
                Some(c) => s.serialize_some(&css_hex(*c)),
                None => s.serialize_none(),
            }
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<Color>, D::Error> {
            match Option::<String>::deserialize(d)? {
                None => Ok(None),
                Some(raw) => parse_css_color(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom("invalid CSS color")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_round_trip() {
        let c = parse_css_color("#2563eb").expect("valid hex color");
        assert_eq!(css_hex(c), "#2563eb");
        assert_eq!(opacity(c), None);
    }

    #[test]
    fn invalid_colors_are_rejected() {
        assert!(parse_css_color("not-a-color").is_none());
    }
}
