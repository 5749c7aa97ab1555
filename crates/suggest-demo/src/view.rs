#![forbid(unsafe_code)]

//! Draws the demo with crossterm commands.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{
    Attribute, Attributes, Color, ContentStyle, Print, PrintStyledContent, StyledContent,
};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{QueueableCommand, cursor};
use suggest_core::geometry::Rect;
use suggest_core::text::display_width;
use suggest_overlay::{OverlayLayout, PackedRgba, Style, StyleFlags, TextAnchor};
use unicode_segmentation::UnicodeSegmentation;

use crate::app::{App, LABEL};

/// Map an element style onto crossterm.
pub fn content_style(style: Style) -> ContentStyle {
    let color = |c: PackedRgba| Color::Rgb {
        r: c.r(),
        g: c.g(),
        b: c.b(),
    };
    let mut content = ContentStyle::new();
    content.foreground_color = style.fg.map(color);
    content.background_color = style.bg.map(color);
    let mut attributes = Attributes::default();
    if let Some(flags) = style.attrs {
        for (flag, attribute) in [
            (StyleFlags::BOLD, Attribute::Bold),
            (StyleFlags::DIM, Attribute::Dim),
            (StyleFlags::ITALIC, Attribute::Italic),
            (StyleFlags::UNDERLINE, Attribute::Underlined),
            (StyleFlags::REVERSE, Attribute::Reverse),
        ] {
            if flags.contains(flag) {
                attributes.set(attribute);
            }
        }
    }
    content.attributes = attributes;
    content
}

/// Truncate `text` to `width` cells and pad it to exactly that width.
pub fn fit(text: &str, width: u16) -> String {
    let width = usize::from(width);
    let mut out = String::new();
    let mut used = 0;
    for g in text.graphemes(true) {
        let w = display_width(g);
        if used + w > width {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

fn draw_border(out: &mut impl Write, area: Rect) -> io::Result<()> {
    if area.width < 2 || area.height < 2 {
        return Ok(());
    }
    let inner = usize::from(area.width - 2);
    let horizontal = "─".repeat(inner);
    out.queue(MoveTo(area.x, area.y))?
        .queue(Print(format!("┌{horizontal}┐")))?;
    for y in area.y + 1..area.bottom() - 1 {
        out.queue(MoveTo(area.x, y))?.queue(Print("│"))?;
        out.queue(MoveTo(area.right() - 1, y))?.queue(Print("│"))?;
    }
    out.queue(MoveTo(area.x, area.bottom() - 1))?
        .queue(Print(format!("└{horizontal}┘")))?;
    Ok(())
}

/// Draw the suggestion panel.
pub fn draw_overlay(out: &mut impl Write, layout: &OverlayLayout<'_>) -> io::Result<()> {
    if layout.border {
        draw_border(out, layout.area)?;
    }
    for line in &layout.lines {
        let text = fit(line.text, line.area.width);
        out.queue(MoveTo(line.area.x, line.area.y))?
            .queue(PrintStyledContent(StyledContent::new(content_style(line.style), text)))?;
    }
    Ok(())
}

/// Draw the whole screen and place the terminal cursor at the caret.
pub fn draw(out: &mut impl Write, app: &App) -> io::Result<()> {
    let field = app.field();
    out.queue(cursor::Hide)?.queue(Clear(ClearType::All))?;
    out.queue(MoveTo(0, 0))?.queue(Print(LABEL))?;

    let area = field
        .surface()
        .map(|s| s.anchor)
        .unwrap_or_default();
    for (row, line) in field.text().split('\n').enumerate().take(usize::from(area.height)) {
        out.queue(MoveTo(area.x, area.y + row as u16))?
            .queue(Print(fit(line, area.width)))?;
    }

    let below = area.bottom().saturating_add(1);
    out.queue(MoveTo(0, below))?.queue(Print(app.description()))?;
    if let Some(status) = app.status() {
        out.queue(MoveTo(0, below.saturating_add(1)))?
            .queue(Print(format!("error: {status}")))?;
    }

    if let Some(layout) = app.suggest().layout() {
        draw_overlay(out, &layout)?;
    }

    if field.is_focused()
        && let Some(caret) = field.caret_screen_position()
    {
        out.queue(MoveTo(caret.x, caret.y))?.queue(cursor::Show)?;
    }
    out.flush()
}
