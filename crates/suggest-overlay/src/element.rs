#![forbid(unsafe_code)]

//! The visual element a renderer produces for one suggestion.

use bitflags::bitflags;
use suggest_core::text::display_width;

/// A color packed as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Create an opaque RGB color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | 0xFF)
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }
}

bitflags! {
    /// Text attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD      = 0b0000_0001;
        const DIM       = 0b0000_0010;
        const ITALIC    = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
        const REVERSE   = 0b0001_0000;
    }
}

/// Optional foreground, background, and attributes; unset fields inherit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Option<PackedRgba>,
    pub bg: Option<PackedRgba>,
    pub attrs: Option<StyleFlags>,
}

impl Style {
    /// An empty style.
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    /// Set the foreground color (builder).
    pub const fn fg(mut self, color: PackedRgba) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color (builder).
    pub const fn bg(mut self, color: PackedRgba) -> Self {
        self.bg = Some(color);
        self
    }

    /// Set the attributes (builder).
    pub const fn attrs(mut self, attrs: StyleFlags) -> Self {
        self.attrs = Some(attrs);
        self
    }

    /// Whether nothing is set.
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }

    /// Overlay `other` on top of `self`; attributes are unioned.
    pub fn patch(self, other: Style) -> Style {
        let attrs = match (self.attrs, other.attrs) {
            (Some(a), Some(b)) => Some(a | b),
            (a, b) => b.or(a),
        };
        Style {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            attrs,
        }
    }
}

/// A fresh, independently stylable element for one suggestion.
///
/// Each element is one or more lines of text. The overlay owns the
/// highlight flag and flips it as focus and hover move between rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionElement {
    lines: Vec<String>,
    style: Style,
    highlight_style: Style,
    highlighted: bool,
}

impl SuggestionElement {
    /// Single-line element.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            style: Style::new(),
            highlight_style: Style::new().attrs(StyleFlags::REVERSE),
            highlighted: false,
        }
    }

    /// Append another line (builder).
    pub fn with_line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    /// Set the base style (builder).
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the style applied on top of the base while highlighted (builder).
    pub fn with_highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    /// Text lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Rows the element occupies (at least one).
    pub fn height(&self) -> u16 {
        u16::try_from(self.lines.len().max(1)).unwrap_or(u16::MAX)
    }

    /// Widest line in cells.
    pub fn width(&self) -> u16 {
        let widest = self.lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
        u16::try_from(widest).unwrap_or(u16::MAX)
    }

    /// Whether the highlight is on.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    /// Style to draw with, reflecting the highlight flag.
    pub fn effective_style(&self) -> Style {
        if self.highlighted {
            self.style.patch(self.highlight_style)
        } else {
            self.style
        }
    }
}
