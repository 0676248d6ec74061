// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small append-only SVG document writer.

use std::fmt::Write as _;

use forestplot::{Align, FontStyle, LineStyle, TextStyle, css_hex, opacity};
use kurbo::{BezPath, Rect};
use peniko::Color;

/// Horizontal text anchoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Anchor {
    Start,
    Middle,
    End,
}

impl From<Align> for Anchor {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => Self::Start,
            Align::Center => Self::Middle,
            Align::Right => Self::End,
        }
    }
}

/// Font attributes of a text run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Font<'a> {
    pub(crate) family: &'a str,
    pub(crate) size: f64,
    pub(crate) weight: u16,
    pub(crate) italic: bool,
}

impl<'a> Font<'a> {
    pub(crate) fn of(style: &'a TextStyle) -> Self {
        Self {
            family: style.font_family.as_css_family(),
            size: style.font_size,
            weight: style.font_weight.0,
            italic: style.font_style != FontStyle::Normal,
        }
    }
}

/// Stroke attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Stroke {
    pub(crate) color: Color,
    pub(crate) width: f64,
    pub(crate) style: LineStyle,
}

impl Stroke {
    pub(crate) fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            style: LineStyle::Solid,
        }
    }
}

#[derive(Debug)]
pub(crate) struct SvgWriter {
    out: String,
}

impl SvgWriter {
    /// Opens a document whose user space is `view_box`, drawn at `width × height`.
    pub(crate) fn new(view_box: Rect, width: f64, height: f64) -> Self {
        let mut out = String::new();
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        let _ = write!(
            out,
            r#"viewBox="{} {} {} {}" width="{}" height="{}" preserveAspectRatio="xMinYMin meet">"#,
            num(view_box.x0),
            num(view_box.y0),
            num(view_box.width()),
            num(view_box.height()),
            num(width),
            num(height),
        );
        out.push('\n');
        Self { out }
    }

    pub(crate) fn rect(&mut self, r: Rect, fill: Color, radius: f64) {
        if r.width() <= 0.0 || r.height() <= 0.0 {
            return;
        }
        let _ = write!(
            self.out,
            r#"<rect x="{}" y="{}" width="{}" height="{}""#,
            num(r.x0),
            num(r.y0),
            num(r.width()),
            num(r.height()),
        );
        if radius > 0.0 {
            let _ = write!(self.out, r#" rx="{}""#, num(radius));
        }
        write_paint_attr(&mut self.out, "fill", fill);
        self.out.push_str("/>\n");
    }

    pub(crate) fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Stroke) {
        if stroke.width <= 0.0 {
            return;
        }
        let _ = write!(
            self.out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
            num(from.0),
            num(from.1),
            num(to.0),
            num(to.1),
        );
        write_stroke(&mut self.out, stroke);
        self.out.push_str("/>\n");
    }

    pub(crate) fn path(&mut self, path: &BezPath, fill: Option<Color>, stroke: Option<Stroke>) {
        let _ = write!(self.out, r#"<path d="{}""#, path.to_svg());
        match fill {
            Some(c) => write_paint_attr(&mut self.out, "fill", c),
            None => self.out.push_str(r#" fill="none""#),
        }
        if let Some(s) = stroke.filter(|s| s.width > 0.0) {
            write_stroke(&mut self.out, s);
        }
        self.out.push_str("/>\n");
    }

    /// Writes `text` with its baseline vertically centered on `y`.
    pub(crate) fn text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        font: &Font<'_>,
        anchor: Anchor,
        fill: Color,
    ) {
        if text.is_empty() {
            return;
        }
        let _ = write!(
            self.out,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" dominant-baseline="middle""#,
            num(x),
            num(y),
            escape_xml(font.family),
            num(font.size),
        );
        if font.weight != 400 {
            let _ = write!(self.out, r#" font-weight="{}""#, font.weight);
        }
        if font.italic {
            self.out.push_str(r#" font-style="italic""#);
        }
        self.out.push_str(match anchor {
            Anchor::Start => r#" text-anchor="start""#,
            Anchor::Middle => r#" text-anchor="middle""#,
            Anchor::End => r#" text-anchor="end""#,
        });
        write_paint_attr(&mut self.out, "fill", fill);
        self.out.push('>');
        self.out.push_str(&escape_xml(text));
        self.out.push_str("</text>\n");
    }

    pub(crate) fn finish(mut self) -> String {
        self.out.push_str("</svg>\n");
        self.out
    }
}

fn write_stroke(out: &mut String, stroke: Stroke) {
    write_paint_attr(out, "stroke", stroke.color);
    let _ = write!(out, r#" stroke-width="{}""#, num(stroke.width));
    if let Some([on, off]) = stroke.style.dash_array() {
        let _ = write!(
            out,
            r#" stroke-dasharray="{} {}""#,
            num(on),
            num(off)
        );
    }
}

fn write_paint_attr(out: &mut String, name: &str, color: Color) {
    let _ = write!(out, r#" {name}="{}""#, css_hex(color));
    if let Some(o) = opacity(color) {
        let _ = write!(out, r#" {name}-opacity="{}""#, num(o));
    }
}

/// Formats a coordinate with at most three decimals.
pub(crate) fn num(v: f64) -> String {
    if !v.is_finite() {
        return String::from("0");
    }
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { String::from("0") } else { String::from(s) }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(0.12345), "0.123");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(f64::NAN), "0");
    }

    #[test]
    fn text_is_escaped() {
        let mut w = SvgWriter::new(Rect::new(0.0, 0.0, 10.0, 10.0), 10.0, 10.0);
        let font = Font {
            family: "sans-serif",
            size: 12.0,
            weight: 600,
            italic: false,
        };
        w.text(1.0, 2.0, "a < b & c", &font, Anchor::Start, Color::BLACK);
        let svg = w.finish();
        assert!(svg.contains("a &lt; b &amp; c"), "{svg}");
        assert!(svg.contains(r#"font-weight="600""#), "{svg}");
    }

    #[test]
    fn dashed_strokes_carry_a_pattern() {
        let mut w = SvgWriter::new(Rect::new(0.0, 0.0, 10.0, 10.0), 10.0, 10.0);
        let stroke = Stroke {
            color: Color::BLACK,
            width: 2.0,
            style: LineStyle::Dashed,
        };
        w.line((0.0, 0.0), (0.0, 10.0), stroke);
        let svg = w.finish();
        assert!(svg.contains("stroke-dasharray"), "{svg}");
    }
}
