//! Inline `style=""` model.
//!
//! Four properties are managed by the highlighter (`border-color`,
//! `background-color`, `box-shadow`, `color`). Everything else found in a
//! style attribute is carried through verbatim. Managed values the page
//! authored itself are remembered, so restoring puts them back exactly.

use crate::color::HexColor;

/// Geometry of the glow drawn around highlighted tags.
pub const SHADOW_GEOMETRY: &str = "1px 0 10px 1px";

/// Managed property values as written in the page markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthoredColors {
    pub border_color: Option<HexColor>,
    pub background_color: Option<HexColor>,
    pub box_shadow: Option<HexColor>,
    pub color: Option<HexColor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub border_color: Option<HexColor>,
    pub background_color: Option<HexColor>,
    /// Color of a `1px 0 10px 1px` box shadow.
    pub box_shadow: Option<HexColor>,
    pub color: Option<HexColor>,
    /// Unmanaged declarations, in source order.
    pub other: Vec<(String, String)>,
    pub authored: AuthoredColors,
}

impl InlineStyle {
    fn managed(&self) -> AuthoredColors {
        AuthoredColors {
            border_color: self.border_color,
            background_color: self.background_color,
            box_shadow: self.box_shadow,
            color: self.color,
        }
    }

    /// Whether the managed properties hold the page's own values.
    pub fn is_authored(&self) -> bool {
        self.managed() == self.authored
    }

    /// Put the page's own managed values back, keep the rest.
    pub fn restore_authored(&mut self) {
        let authored = self.authored;
        self.border_color = authored.border_color;
        self.background_color = authored.background_color;
        self.box_shadow = authored.box_shadow;
        self.color = authored.color;
    }

    /// Render back to a `style` attribute value.
    pub fn to_css(&self) -> String {
        let mut decls: Vec<String> = self
            .other
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        if let Some(c) = self.border_color {
            decls.push(format!("border-color: {}", c));
        }
        if let Some(c) = self.background_color {
            decls.push(format!("background-color: {}", c));
        }
        if let Some(c) = self.box_shadow {
            decls.push(format!("box-shadow: {} {}", SHADOW_GEOMETRY, c));
        }
        if let Some(c) = self.color {
            decls.push(format!("color: {}", c));
        }
        decls.join("; ")
    }
}

/// Parse an inline `style="..."` attribute value.
///
/// Managed properties whose value is not a `#rrggbb` color (or a
/// `box-shadow` ending in one) are kept as unmanaged declarations.
pub fn parse_inline_style(style: &str) -> InlineStyle {
    let mut props = InlineStyle::default();
    for decl in style.split(';') {
        let parts: Vec<&str> = decl.splitn(2, ':').collect();
        if parts.len() != 2 {
            continue;
        }
        let prop = parts[0].trim().to_ascii_lowercase();
        let val = parts[1].trim();
        let parsed = match prop.as_str() {
            "border-color" => HexColor::parse(val).ok().map(|c| props.border_color = Some(c)),
            "background-color" => HexColor::parse(val).ok().map(|c| props.background_color = Some(c)),
            "color" => HexColor::parse(val).ok().map(|c| props.color = Some(c)),
            "box-shadow" => parse_shadow_color(val).map(|c| props.box_shadow = Some(c)),
            _ => None,
        };
        if parsed.is_none() {
            props.other.push((prop, val.to_string()));
        }
    }
    props.authored = props.managed();
    props
}

fn parse_shadow_color(val: &str) -> Option<HexColor> {
    let (geometry, color) = val.trim().rsplit_once(char::is_whitespace)?;
    if geometry.split_whitespace().collect::<Vec<_>>().join(" ") != SHADOW_GEOMETRY {
        return None;
    }
    HexColor::parse(color).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_inline() {
        let props = parse_inline_style("color: #ffffff; margin: 0 4px; border-color: #112233");
        assert_eq!(props.color, Some(HexColor::new(255, 255, 255)));
        assert_eq!(props.border_color, Some(HexColor::new(0x11, 0x22, 0x33)));
        assert_eq!(props.other, vec![("margin".to_string(), "0 4px".to_string())]);
    }

    #[test]
    fn named_colors_stay_unmanaged() {
        let props = parse_inline_style("color: red");
        assert_eq!(props.color, None);
        assert!(props.is_authored());
        assert_eq!(props.to_css(), "color: red");
    }

    #[test]
    fn shadow_round_trips() {
        let props = parse_inline_style("box-shadow: 1px 0 10px 1px #0a0b0c");
        assert_eq!(props.box_shadow, Some(HexColor::new(10, 11, 12)));
        assert_eq!(props.to_css(), "box-shadow: 1px 0 10px 1px #0a0b0c");
    }

    #[test]
    fn restoring_keeps_unmanaged() {
        let mut props = parse_inline_style("padding: 2px");
        props.background_color = Some(HexColor::BLACK);
        assert!(!props.is_authored());
        props.restore_authored();
        assert_eq!(props.to_css(), "padding: 2px");
    }

    #[test]
    fn restoring_brings_back_authored_colors() {
        let mut props = parse_inline_style("color: #123456; margin: 1px");
        props.color = Some(HexColor::WHITE);
        props.border_color = Some(HexColor::BLACK);
        props.restore_authored();
        assert_eq!(props.color, Some(HexColor::new(0x12, 0x34, 0x56)));
        assert_eq!(props.border_color, None);
        assert_eq!(props.to_css(), "margin: 1px; color: #123456");
    }
}
