#![forbid(unsafe_code)]

//! Overlay Controller.
//!
//! Owns the floating panel for one anchor: lazy construction, visibility,
//! placement relative to the anchor, rendered rows, highlight, and scrolling.
//!
//! # State machine
//!
//! ```text
//! Uninitialized --first request on a live surface--> Hidden
//! Hidden  --changed, non-empty list--> Visible
//! Visible --changed, non-empty list--> Visible   (rows rebuilt, focus reset)
//! Visible --empty list | cancel | commit | blur--> Hidden
//! any     --anchor detached--> Uninitialized
//! ```
//!
//! # Invariants
//!
//! 1. `items.len() == suggestions.len()` whenever the overlay is Visible.
//! 2. Both lists are empty whenever it is not Visible.
//! 3. `focus` is `Anchor` or `Item(i)` with `i < items.len()`.
//! 4. At most one row is highlighted.

use suggest_core::geometry::{Point, Rect};

use crate::anchor::Surface;
use crate::diff::{DiffMode, has_changed_with};
use crate::element::{Style, SuggestionElement};
use crate::error::SuggestError;
use crate::navigation::NavFocus;
use crate::source::SuggestionRenderer;

/// Lifecycle state of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlayState {
    /// No panel yet (or the anchor was detached).
    #[default]
    Uninitialized,
    /// Panel built, not shown.
    Hidden,
    /// Panel shown with at least one row.
    Visible,
}

/// Placement and sizing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Maximum panel height as a fraction `(num, den)` of the screen height.
    pub max_height_ratio: (u16, u16),
    /// Minimum panel width for single-line anchors; `None` uses the anchor width.
    pub min_width: Option<u16>,
    /// Draw a one-cell border around the rows.
    pub border: bool,
    /// Open above the anchor when there is more room there than below.
    pub flip_above: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            max_height_ratio: (1, 2),
            min_width: None,
            border: true,
            flip_above: true,
        }
    }
}

impl OverlayConfig {
    /// Set the maximum height fraction (builder).
    pub fn with_max_height_ratio(mut self, num: u16, den: u16) -> Self {
        self.max_height_ratio = (num, den.max(1));
        self
    }

    /// Fix the minimum panel width (builder).
    pub fn with_min_width(mut self, width: u16) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Enable or disable the border (builder).
    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Enable or disable flipping above the anchor (builder).
    pub fn with_flip_above(mut self, flip: bool) -> Self {
        self.flip_above = flip;
        self
    }

    fn border_cells(&self) -> u16 {
        if self.border { 2 } else { 0 }
    }
}

/// Where to attach the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub surface: Surface,
    /// Screen position of the caret glyph.
    pub caret: Option<Point>,
    /// Multi-line anchors open at the caret instead of below the widget.
    pub multiline: bool,
}

/// Result of offering a fresh list to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Same list as before. Rows and focus are untouched; a multi-line
    /// panel may still move to follow the caret.
    Unchanged,
    /// Rows rebuilt; carries the row count.
    Shown(usize),
    /// Empty list; overlay hidden.
    Hidden,
}

/// What a screen cell hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Row `index`.
    Item(usize),
    /// Inside the panel but not on a row (border, empty space).
    Panel,
}

/// The floating panel: built once per attachment, reused across shows.
#[derive(Debug, Clone, Default)]
struct Panel {
    /// Anchor bounds the panel is tracking.
    tracked_anchor: Rect,
    /// Window bounds the panel is tracking.
    tracked_window: Rect,
    /// Caret cell the panel was placed against (multi-line anchors).
    tracked_caret: Option<Point>,
    /// Outer bounds on screen.
    area: Rect,
    /// First visible content row.
    scroll_offset: u16,
}

#[derive(Debug, Clone)]
struct RenderedItem {
    element: SuggestionElement,
    /// Content row of the first line.
    top: u16,
}

impl RenderedItem {
    fn rows(&self) -> std::ops::Range<u16> {
        self.top..self.top.saturating_add(self.element.height())
    }
}

/// One visible line of a row, in screen space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutLine<'a> {
    /// Row the line belongs to.
    pub index: usize,
    /// Screen cells covered by the line (viewport width).
    pub area: Rect,
    pub text: &'a str,
    pub style: Style,
    pub highlighted: bool,
}

/// Read-only snapshot of a visible overlay for drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLayout<'a> {
    /// Outer bounds including the border.
    pub area: Rect,
    /// Region rows are drawn into.
    pub viewport: Rect,
    pub border: bool,
    /// Visible lines, top to bottom.
    pub lines: Vec<LayoutLine<'a>>,
    pub scroll_offset: u16,
    pub content_height: u16,
}

impl OverlayLayout<'_> {
    /// Whether content extends past the viewport.
    pub fn is_scrollable(&self) -> bool {
        self.content_height > self.viewport.height
    }
}

/// The overlay for one anchor.
#[derive(Debug, Clone)]
pub struct Overlay<T> {
    state: OverlayState,
    config: OverlayConfig,
    panel: Option<Panel>,
    suggestions: Vec<T>,
    items: Vec<RenderedItem>,
    focus: NavFocus,
    /// Row under the mouse; wins over keyboard focus for highlighting.
    hover: Option<usize>,
}

impl<T> Default for Overlay<T> {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

impl<T> Overlay<T> {
    /// Create an uninitialized overlay.
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            state: OverlayState::Uninitialized,
            config,
            panel: None,
            suggestions: Vec::new(),
            items: Vec::new(),
            focus: NavFocus::Anchor,
            hover: None,
        }
    }

    // --- Accessors ---

    /// Lifecycle state.
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Whether the panel is shown.
    pub fn is_visible(&self) -> bool {
        self.state == OverlayState::Visible
    }

    /// Placement rules.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub(crate) fn set_config(&mut self, config: OverlayConfig) {
        self.config = config;
    }

    /// The list currently shown (empty unless Visible).
    pub fn suggestions(&self) -> &[T] {
        &self.suggestions
    }

    /// Number of rendered rows.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Rendered element for row `index`.
    pub fn element(&self, index: usize) -> Option<&SuggestionElement> {
        self.items.get(index).map(|item| &item.element)
    }

    /// Highlighted row, if any.
    pub fn highlighted(&self) -> Option<usize> {
        self.items.iter().position(|item| item.element.is_highlighted())
    }

    /// Keyboard focus.
    pub fn focus(&self) -> NavFocus {
        self.focus
    }

    /// Outer panel bounds while Visible.
    pub fn area(&self) -> Option<Rect> {
        self.visible_panel().map(|p| p.area)
    }

    /// First visible content row.
    pub fn scroll_offset(&self) -> u16 {
        self.panel.as_ref().map_or(0, |p| p.scroll_offset)
    }

    /// Whether `index` names one of this overlay's own rows.
    pub fn contains_item(&self, index: usize) -> bool {
        self.is_visible() && index < self.items.len()
    }

    fn visible_panel(&self) -> Option<&Panel> {
        self.panel.as_ref().filter(|_| self.is_visible())
    }

    fn content_height(&self) -> u16 {
        self.items
            .last()
            .map_or(0, |item| item.rows().end)
    }

    fn viewport_of(&self, area: Rect) -> Rect {
        if self.config.border {
            area.inset(1)
        } else {
            area
        }
    }

    // --- Lifecycle ---

    /// Build the panel on first use and start tracking the anchor.
    ///
    /// No-op once built.
    pub fn ensure_initialized(&mut self, surface: &Surface) {
        if self.state != OverlayState::Uninitialized {
            return;
        }
        self.panel = Some(Panel {
            tracked_anchor: surface.anchor,
            tracked_window: surface.window,
            ..Panel::default()
        });
        self.state = OverlayState::Hidden;
        suggest_core::debug!(anchor = ?surface.anchor, "overlay panel created");
    }

    /// Offer a freshly fetched list.
    ///
    /// Unchanged lists (per `mode`) leave everything untouched. An empty
    /// changed list hides the overlay. Otherwise every value is rendered
    /// before any state changes; a render failure hides the overlay and
    /// nothing from the failed pass survives.
    pub fn apply<R>(
        &mut self,
        list: Vec<T>,
        renderer: &mut R,
        placement: &Placement,
        mode: DiffMode,
    ) -> Result<ApplyOutcome, SuggestError>
    where
        T: PartialEq,
        R: SuggestionRenderer<T> + ?Sized,
    {
        if !has_changed_with(&self.suggestions, &list, mode) {
            suggest_core::trace!(count = list.len(), "suggestions unchanged");
            if self.is_visible() && self.caret_moved(placement) {
                self.reposition(placement);
            }
            return Ok(ApplyOutcome::Unchanged);
        }
        if list.is_empty() {
            self.hide();
            return Ok(ApplyOutcome::Hidden);
        }
        match self.show(list, renderer, placement)? {
            0 => Ok(ApplyOutcome::Hidden),
            count => Ok(ApplyOutcome::Shown(count)),
        }
    }

    /// Render `list` and show it, replacing any current rows.
    ///
    /// Returns the row count, or 0 with the overlay hidden when the screen
    /// leaves no room for a single row.
    pub fn show<R>(
        &mut self,
        list: Vec<T>,
        renderer: &mut R,
        placement: &Placement,
    ) -> Result<usize, SuggestError>
    where
        R: SuggestionRenderer<T> + ?Sized,
    {
        if list.is_empty() {
            self.hide();
            return Ok(0);
        }
        self.ensure_initialized(&placement.surface);

        let _span = suggest_core::debug_span!("suggest_render", count = list.len()).entered();
        let mut items = Vec::with_capacity(list.len());
        let mut top = 0u16;
        for (index, value) in list.iter().enumerate() {
            let element = match renderer.render(value) {
                Ok(element) => element,
                Err(err) => {
                    suggest_core::warn!(index, error = %err, "render failed, hiding overlay");
                    self.hide();
                    return Err(match err {
                        SuggestError::Render { .. } => err,
                        other => SuggestError::Render {
                            index,
                            message: other.to_string(),
                        },
                    });
                }
            };
            let height = element.height();
            items.push(RenderedItem { element, top });
            top = top.saturating_add(height);
        }

        let count = items.len();
        self.suggestions = list;
        self.items = items;
        self.focus = NavFocus::Anchor;
        self.hover = None;
        if let Some(panel) = self.panel.as_mut() {
            panel.scroll_offset = 0;
        }
        self.refresh_highlight();
        self.state = OverlayState::Visible;
        self.reposition(placement);
        if !self.is_visible() {
            return Ok(0);
        }
        suggest_core::debug!(count, area = ?self.area(), "overlay shown");
        Ok(count)
    }

    /// Hide the panel and drop its rows. Keeps the panel for reuse.
    pub fn hide(&mut self) {
        if self.state == OverlayState::Visible {
            suggest_core::debug!("overlay hidden");
            self.state = OverlayState::Hidden;
        }
        self.suggestions.clear();
        self.items.clear();
        self.focus = NavFocus::Anchor;
        self.hover = None;
    }

    /// Drop the panel entirely (anchor detached).
    pub fn teardown(&mut self) {
        self.hide();
        if self.panel.take().is_some() {
            suggest_core::debug!("overlay panel torn down");
        }
        self.state = OverlayState::Uninitialized;
    }

    // --- Placement ---

    /// Recompute the panel bounds from the anchor's current placement.
    pub fn reposition(&mut self, placement: &Placement) {
        let content_width = self
            .items
            .iter()
            .map(|item| item.element.width())
            .max()
            .unwrap_or(0);
        let content_height = self.content_height();
        let area = compute_area(&self.config, placement, content_width, content_height);
        let viewport = self.viewport_of(area);
        let viewport_height = viewport.height;

        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        panel.tracked_anchor = placement.surface.anchor;
        panel.tracked_window = placement.surface.window;
        panel.tracked_caret = placement.caret;
        panel.area = area;
        let max_offset = content_height.saturating_sub(viewport_height);
        panel.scroll_offset = panel.scroll_offset.min(max_offset);
        if viewport.is_empty() && self.state == OverlayState::Visible {
            suggest_core::debug!(?area, "no room for rows, hiding overlay");
            self.hide();
            return;
        }
        if let Some(i) = self.focus.item() {
            self.scroll_into_view(i);
        }
    }

    /// Whether the anchor or window moved since the panel was placed.
    pub fn is_tracking_stale(&self, surface: &Surface) -> bool {
        self.panel.as_ref().is_some_and(|p| {
            p.tracked_anchor != surface.anchor || p.tracked_window != surface.window
        })
    }

    /// A multi-line panel follows the caret; single-line panels ignore it.
    fn caret_moved(&self, placement: &Placement) -> bool {
        placement.multiline
            && self
                .panel
                .as_ref()
                .is_some_and(|p| p.tracked_caret != placement.caret)
    }

    // --- Focus and highlight ---

    /// Move keyboard focus to row `index`: highlight it alone and scroll it
    /// into view. Returns `false` for an index outside the rows.
    pub fn focus_item(&mut self, index: usize) -> bool {
        if !self.contains_item(index) {
            return false;
        }
        self.focus = NavFocus::Item(index);
        self.hover = None;
        self.refresh_highlight();
        self.scroll_into_view(index);
        suggest_core::trace!(index, "row focused");
        true
    }

    /// Move keyboard focus back to the anchor.
    pub fn focus_anchor(&mut self) {
        self.focus = NavFocus::Anchor;
        self.refresh_highlight();
    }

    /// Update the row under the mouse (`None` when off all rows).
    pub fn set_hover(&mut self, index: Option<usize>) {
        let index = index.filter(|&i| self.contains_item(i));
        if self.hover != index {
            self.hover = index;
            self.refresh_highlight();
        }
    }

    fn refresh_highlight(&mut self) {
        let target = self.hover.or(self.focus.item());
        for (i, item) in self.items.iter_mut().enumerate() {
            item.element.set_highlighted(Some(i) == target);
        }
    }

    // --- Scrolling ---

    /// Scroll so row `index` is fully visible (or its top, if taller than the viewport).
    fn scroll_into_view(&mut self, index: usize) {
        let Some(rows) = self.items.get(index).map(RenderedItem::rows) else {
            return;
        };
        let Some(area) = self.panel.as_ref().map(|p| p.area) else {
            return;
        };
        let viewport = self.viewport_of(area).height;
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        if rows.start < panel.scroll_offset {
            panel.scroll_offset = rows.start;
        } else if rows.end > panel.scroll_offset.saturating_add(viewport) {
            let height = rows.end - rows.start;
            panel.scroll_offset = if height > viewport {
                rows.start
            } else {
                rows.end - viewport
            };
        }
    }

    /// Scroll the viewport by `delta` rows, clamped to the content.
    pub fn scroll_by(&mut self, delta: i32) {
        if !self.is_visible() {
            return;
        }
        let content = self.content_height();
        let Some(area) = self.panel.as_ref().map(|p| p.area) else {
            return;
        };
        let max_offset = content.saturating_sub(self.viewport_of(area).height);
        if let Some(panel) = self.panel.as_mut() {
            let next = i32::from(panel.scroll_offset).saturating_add(delta);
            panel.scroll_offset = next.clamp(0, i32::from(max_offset)) as u16;
        }
    }

    // --- Hit testing and layout ---

    /// What the screen cell `(x, y)` hits, `None` outside the panel.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<HitTarget> {
        let panel = self.visible_panel()?;
        if !panel.area.contains(x, y) {
            return None;
        }
        let viewport = self.viewport_of(panel.area);
        if !viewport.contains(x, y) {
            return Some(HitTarget::Panel);
        }
        let row = panel.scroll_offset + (y - viewport.y);
        Some(
            self.items
                .iter()
                .position(|item| item.rows().contains(&row))
                .map_or(HitTarget::Panel, HitTarget::Item),
        )
    }

    /// Snapshot of what to draw, `None` unless Visible.
    pub fn layout(&self) -> Option<OverlayLayout<'_>> {
        let panel = self.visible_panel()?;
        let viewport = self.viewport_of(panel.area);
        let visible = panel.scroll_offset..panel.scroll_offset.saturating_add(viewport.height);

        let mut lines = Vec::new();
        for (index, item) in self.items.iter().enumerate() {
            for (k, text) in item.element.lines().iter().enumerate() {
                let row = item.top.saturating_add(k as u16);
                if !visible.contains(&row) {
                    continue;
                }
                lines.push(LayoutLine {
                    index,
                    area: Rect::new(
                        viewport.x,
                        viewport.y + (row - panel.scroll_offset),
                        viewport.width,
                        1,
                    ),
                    text,
                    style: item.element.effective_style(),
                    highlighted: item.element.is_highlighted(),
                });
            }
        }

        Some(OverlayLayout {
            area: panel.area,
            viewport,
            border: self.config.border,
            lines,
            scroll_offset: panel.scroll_offset,
            content_height: self.content_height(),
        })
    }
}

/// Panel bounds for `content_width` x `content_height` rows of content.
///
/// Single-line anchors open at their bottom-left corner, at least as wide as
/// the anchor. Multi-line anchors open on the row below the caret glyph.
/// Height is capped at the configured fraction of the screen and at the rows
/// available on the chosen side of the anchor.
fn compute_area(
    config: &OverlayConfig,
    placement: &Placement,
    content_width: u16,
    content_height: u16,
) -> Rect {
    let surface = &placement.surface;
    let screen = surface.screen;
    let border = config.border_cells();

    let caret = placement.caret.filter(|_| placement.multiline);
    let (x, top_limit, below_start, min_width) = match caret {
        Some(caret) => (caret.x, caret.y, caret.y.saturating_add(1), 0),
        None => (
            surface.anchor.x,
            surface.anchor.y,
            surface.anchor.bottom(),
            config.min_width.unwrap_or(surface.anchor.width),
        ),
    };

    let width = content_width
        .saturating_add(border)
        .max(min_width)
        .min(screen.width);
    let x = x.min(screen.width.saturating_sub(width));

    let (num, den) = config.max_height_ratio;
    let cap = (u32::from(screen.height) * u32::from(num) / u32::from(den.max(1))) as u16;
    let wanted = content_height.saturating_add(border).min(cap.max(1));

    let below = screen.height.saturating_sub(below_start);
    let above = top_limit;
    // With no row left below, flipping is the only way to show anything.
    let may_flip = config.flip_above || below <= border;
    if may_flip && below < wanted && above > below {
        let height = wanted.min(above);
        Rect::new(x, above - height, width, height)
    } else {
        Rect::new(x, below_start.min(screen.height), width, wanted.min(below))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use suggest_core::geometry::Size;

    fn placement(anchor: Rect) -> Placement {
        Placement {
            surface: Surface::fullscreen(anchor, Size::new(80, 24)),
            caret: None,
            multiline: false,
        }
    }

    fn render(value: &&str) -> SuggestionElement {
        SuggestionElement::new(*value)
    }

    fn shown(list: &[&'static str], anchor: Rect) -> Overlay<&'static str> {
        let mut overlay = Overlay::default();
        overlay
            .show(list.to_vec(), &mut render, &placement(anchor))
            .unwrap();
        overlay
    }

    #[test]
    fn starts_uninitialized_and_builds_lazily() {
        let mut overlay: Overlay<&str> = Overlay::default();
        assert_eq!(overlay.state(), OverlayState::Uninitialized);
        overlay.ensure_initialized(&placement(Rect::new(0, 0, 10, 1)).surface);
        assert_eq!(overlay.state(), OverlayState::Hidden);
        assert!(overlay.area().is_none());
    }

    #[test]
    fn opens_below_single_line_anchor() {
        let overlay = shown(&["abc", "abd"], Rect::new(4, 2, 20, 1));
        assert!(overlay.is_visible());
        assert_eq!(overlay.item_count(), 2);
        // 2 rows + border, at least the anchor width.
        assert_eq!(overlay.area(), Some(Rect::new(4, 3, 20, 4)));
    }

    #[test]
    fn widens_for_long_rows() {
        let overlay = shown(&["a fairly long suggestion"], Rect::new(0, 0, 5, 1));
        assert_eq!(overlay.area().map(|a| a.width), Some(26));
    }

    #[test]
    fn height_capped_at_half_screen() {
        let list: Vec<&'static str> = vec!["x"; 40];
        let overlay = shown(&list, Rect::new(0, 0, 10, 1));
        assert_eq!(overlay.area().map(|a| a.height), Some(12));
        let layout = overlay.layout().unwrap();
        assert!(layout.is_scrollable());
        assert_eq!(layout.lines.len(), 10);
    }

    #[test]
    fn flips_above_when_bottom_is_tight() {
        let overlay = shown(&["a", "b", "c", "d"], Rect::new(0, 21, 10, 1));
        // Only 2 rows below (22, 23); 21 above.
        assert_eq!(overlay.area(), Some(Rect::new(0, 15, 10, 6)));
    }

    #[test]
    fn multiline_opens_below_caret() {
        let mut overlay = Overlay::default();
        let place = Placement {
            surface: Surface::fullscreen(Rect::new(0, 0, 40, 10), Size::new(80, 24)),
            caret: Some(Point::new(7, 3)),
            multiline: true,
        };
        overlay.show(vec!["abc"], &mut render, &place).unwrap();
        assert_eq!(overlay.area(), Some(Rect::new(7, 4, 5, 3)));
    }

    #[test]
    fn no_room_below_flips_even_when_flipping_is_off() {
        let mut overlay = Overlay::new(OverlayConfig::default().with_flip_above(false));
        overlay
            .show(vec!["a", "b"], &mut render, &placement(Rect::new(0, 23, 10, 1)))
            .unwrap();
        assert_eq!(overlay.area(), Some(Rect::new(0, 19, 10, 4)));
    }

    #[test]
    fn no_room_at_all_stays_hidden() {
        let cramped = Placement {
            surface: Surface::fullscreen(Rect::new(0, 0, 10, 1), Size::new(80, 1)),
            caret: None,
            multiline: false,
        };
        let mut overlay = Overlay::default();
        let outcome = overlay
            .apply(vec!["a"], &mut render, &cramped, DiffMode::Unordered)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Hidden);
        assert!(!overlay.is_visible());
        assert_eq!(overlay.item_count(), 0);

        let mut overlay = shown(&["a", "b"], Rect::new(0, 0, 10, 1));
        overlay.focus_item(1);
        overlay.reposition(&cramped);
        assert!(!overlay.is_visible());
        assert_eq!(overlay.focus(), NavFocus::Anchor);
    }

    #[test]
    fn unchanged_list_follows_multiline_caret() {
        let at = |x, y| Placement {
            surface: Surface::fullscreen(Rect::new(0, 0, 40, 10), Size::new(80, 24)),
            caret: Some(Point::new(x, y)),
            multiline: true,
        };
        let mut overlay = Overlay::default();
        overlay.show(vec!["abc"], &mut render, &at(7, 3)).unwrap();
        let outcome = overlay
            .apply(vec!["abc"], &mut render, &at(2, 5), DiffMode::Unordered)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Unchanged);
        assert_eq!(overlay.area(), Some(Rect::new(2, 6, 5, 3)));
    }

    #[test]
    fn min_width_overrides_anchor_width() {
        let mut overlay = Overlay::new(OverlayConfig::default().with_min_width(30).with_border(false));
        overlay
            .show(vec!["abc"], &mut render, &placement(Rect::new(0, 0, 10, 1)))
            .unwrap();
        assert_eq!(overlay.area(), Some(Rect::new(0, 1, 30, 1)));
    }

    #[test]
    fn clamps_to_right_edge() {
        let overlay = shown(&["0123456789"], Rect::new(75, 0, 5, 1));
        assert_eq!(overlay.area(), Some(Rect::new(68, 1, 12, 3)));
    }

    #[test]
    fn focus_highlights_exactly_one_row_and_scrolls() {
        let list: Vec<&'static str> = vec!["x"; 40];
        let mut overlay = shown(&list, Rect::new(0, 0, 10, 1));
        assert_eq!(overlay.highlighted(), None);
        assert!(overlay.focus_item(15));
        assert_eq!(overlay.highlighted(), Some(15));
        assert_eq!(overlay.focus(), NavFocus::Item(15));
        // Viewport is 10 rows; row 15 must be the last visible one.
        assert_eq!(overlay.scroll_offset(), 6);
        assert!(overlay.focus_item(2));
        assert_eq!(overlay.scroll_offset(), 2);
        assert!(!overlay.focus_item(40));
    }

    #[test]
    fn hover_wins_then_yields_to_focus() {
        let mut overlay = shown(&["a", "b", "c"], Rect::new(0, 0, 10, 1));
        overlay.focus_item(0);
        overlay.set_hover(Some(2));
        assert_eq!(overlay.highlighted(), Some(2));
        overlay.set_hover(None);
        assert_eq!(overlay.highlighted(), Some(0));
        overlay.focus_anchor();
        assert_eq!(overlay.highlighted(), None);
    }

    #[test]
    fn hit_test_maps_rows() {
        let overlay = shown(&["a", "b"], Rect::new(0, 0, 10, 1));
        // Panel at (0,1) 10x4: border row 1, items rows 2 and 3.
        assert_eq!(overlay.hit_test(3, 1), Some(HitTarget::Panel));
        assert_eq!(overlay.hit_test(3, 2), Some(HitTarget::Item(0)));
        assert_eq!(overlay.hit_test(3, 3), Some(HitTarget::Item(1)));
        assert_eq!(overlay.hit_test(3, 9), None);
    }

    #[test]
    fn multi_line_elements_stack() {
        let mut overlay = Overlay::default();
        let mut two_lines = |v: &&str| SuggestionElement::new(*v).with_line("detail");
        overlay
            .show(vec!["a", "b"], &mut two_lines, &placement(Rect::new(0, 0, 10, 1)))
            .unwrap();
        assert_eq!(overlay.area().map(|a| a.height), Some(6));
        assert_eq!(overlay.hit_test(1, 4), Some(HitTarget::Item(1)));
        let layout = overlay.layout().unwrap();
        assert_eq!(layout.lines.len(), 4);
        assert_eq!(layout.lines[3].text, "detail");
        assert_eq!(layout.lines[3].index, 1);
    }

    #[test]
    fn render_failure_hides_and_keeps_nothing() {
        let mut overlay = shown(&["a"], Rect::new(0, 0, 10, 1));
        let mut calls = 0;
        let mut failing = |v: &&str| -> SuggestionElement {
            calls += 1;
            SuggestionElement::new(*v)
        };
        // Replace with a renderer that fails on the second item.
        struct FailSecond(usize);
        impl SuggestionRenderer<&'static str> for FailSecond {
            fn render(&mut self, v: &&'static str) -> Result<SuggestionElement, SuggestError> {
                self.0 += 1;
                if self.0 == 2 {
                    Err(SuggestError::Render {
                        index: 1,
                        message: "boom".into(),
                    })
                } else {
                    Ok(SuggestionElement::new(*v))
                }
            }
        }
        let err = overlay
            .show(vec!["x", "y", "z"], &mut FailSecond(0), &placement(Rect::new(0, 0, 10, 1)))
            .unwrap_err();
        assert!(matches!(err, SuggestError::Render { index: 1, .. }));
        assert_eq!(overlay.state(), OverlayState::Hidden);
        assert_eq!(overlay.item_count(), 0);
        assert!(overlay.suggestions().is_empty());
        overlay
            .show(vec!["a"], &mut failing, &placement(Rect::new(0, 0, 10, 1)))
            .unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn apply_skips_unchanged_lists() {
        let mut overlay = shown(&["a", "b"], Rect::new(0, 0, 10, 1));
        overlay.focus_item(1);
        let mut calls = 0;
        let mut counting = |v: &&str| {
            calls += 1;
            SuggestionElement::new(*v)
        };
        let place = placement(Rect::new(0, 0, 10, 1));
        let outcome = overlay
            .apply(vec!["b", "a"], &mut counting, &place, DiffMode::Unordered)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Unchanged);
        assert_eq!(overlay.focus(), NavFocus::Item(1));
        let outcome = overlay
            .apply(vec!["b", "a"], &mut counting, &place, DiffMode::Ordered)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Shown(2));
        assert_eq!(overlay.focus(), NavFocus::Anchor);
        assert_eq!(calls, 2);
    }

    #[test]
    fn apply_empty_hides() {
        let mut overlay = shown(&["a"], Rect::new(0, 0, 10, 1));
        let place = placement(Rect::new(0, 0, 10, 1));
        let outcome = overlay
            .apply(Vec::new(), &mut render, &place, DiffMode::Unordered)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Hidden);
        assert!(!overlay.is_visible());
        let outcome = overlay
            .apply(Vec::new(), &mut render, &place, DiffMode::Unordered)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Unchanged);
    }

    #[test]
    fn reposition_follows_anchor() {
        let mut overlay = shown(&["a"], Rect::new(0, 0, 10, 1));
        let moved = placement(Rect::new(5, 5, 10, 1));
        assert!(overlay.is_tracking_stale(&moved.surface));
        overlay.reposition(&moved);
        assert_eq!(overlay.area(), Some(Rect::new(5, 6, 10, 3)));
        assert!(!overlay.is_tracking_stale(&moved.surface));
    }

    #[test]
    fn scroll_by_clamps() {
        let list: Vec<&'static str> = vec!["x"; 15];
        let mut overlay = shown(&list, Rect::new(0, 0, 10, 1));
        overlay.scroll_by(100);
        assert_eq!(overlay.scroll_offset(), 5);
        overlay.scroll_by(-2);
        assert_eq!(overlay.scroll_offset(), 3);
        overlay.scroll_by(-100);
        assert_eq!(overlay.scroll_offset(), 0);
    }

    #[test]
    fn teardown_returns_to_uninitialized() {
        let mut overlay = shown(&["a"], Rect::new(0, 0, 10, 1));
        overlay.teardown();
        assert_eq!(overlay.state(), OverlayState::Uninitialized);
        assert_eq!(overlay.item_count(), 0);
        assert!(overlay.layout().is_none());
    }
}
