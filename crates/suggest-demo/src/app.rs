#![forbid(unsafe_code)]

//! Demo state: one path field, its suggestions, and what was picked.

use std::cell::RefCell;
use std::path::{MAIN_SEPARATOR, Path};
use std::rc::Rc;

use suggest_core::event::{Event, KeyCode};
use suggest_core::geometry::{Rect, Size};
use suggest_overlay::{
    DiffMode, Suggest, SuggestError, Surface, TextAnchor, TextField, TriggerPolicy,
};

use crate::cli::Opts;
use crate::paths::{PathEntry, PathRenderer, PathSource, replace_caret_line};

/// Label drawn left of the field.
pub const LABEL: &str = "Enter file path: ";

/// Rows used by a multi-line field.
const MULTILINE_ROWS: u16 = 4;

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// The demo model.
pub struct App {
    field: TextField,
    suggest: Suggest<PathEntry>,
    description: Rc<RefCell<String>>,
    status: Option<String>,
    screen: Size,
}

/// Field bounds for a screen of `screen` cells.
pub fn field_area(screen: Size, multiline: bool) -> Rect {
    let x = (LABEL.len() as u16).min(screen.width.saturating_sub(1));
    let height = if multiline { MULTILINE_ROWS } else { 1 };
    Rect::new(x, 0, screen.width.saturating_sub(x).max(1), height.min(screen.height))
}

/// Starting text: the root directory with a trailing separator.
fn initial_text(root: &Path) -> String {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let mut text = root.display().to_string();
    if !text.ends_with(MAIN_SEPARATOR) {
        text.push(MAIN_SEPARATOR);
    }
    text
}

impl App {
    pub fn new(opts: &Opts, screen: Size) -> Self {
        let description = Rc::new(RefCell::new(String::new()));
        let picked = Rc::clone(&description);
        let multiline = opts.multiline;
        let listener = move |entry: &PathEntry, anchor: &mut dyn TextAnchor| -> Result<(), SuggestError> {
            if multiline {
                replace_caret_line(anchor, &entry.completion());
            } else {
                anchor.set_text(&entry.completion());
            }
            *picked.borrow_mut() = format!("Type: {}", entry.kind_label());
            tracing::info!(path = %entry.path().display(), "picked");
            Ok(())
        };

        let policy = if opts.caret_driven {
            TriggerPolicy::caret_driven()
        } else {
            TriggerPolicy::default()
        };
        let mode = if opts.ordered_diff {
            DiffMode::Ordered
        } else {
            DiffMode::Unordered
        };
        let suggest = Suggest::new(PathSource::new(&opts.root), PathRenderer, listener)
            .with_trigger_policy(policy)
            .with_diff_mode(mode);

        let mut field = TextField::new()
            .with_multiline(multiline)
            .with_value(initial_text(&opts.root))
            .with_focused(true);
        field.attach(Surface::fullscreen(field_area(screen, multiline), screen));

        Self {
            field,
            suggest,
            description,
            status: None,
            screen,
        }
    }

    pub fn field(&self) -> &TextField {
        &self.field
    }

    pub fn suggest(&self) -> &Suggest<PathEntry> {
        &self.suggest
    }

    /// "Type: Folder" / "Type: File" for the last pick.
    pub fn description(&self) -> String {
        self.description.borrow().clone()
    }

    /// Last error, if the most recent event failed.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn screen(&self) -> Size {
        self.screen
    }

    /// Route one event.
    pub fn handle(&mut self, event: &Event) -> Control {
        if let Event::Key(key) = event
            && key.ctrl()
            && matches!(key.code, KeyCode::Char('c' | 'q'))
        {
            return Control::Quit;
        }
        if let Event::Resize { width, height } = *event {
            self.resize(Size::new(width, height));
        }
        match self.suggest.handle_event(&mut self.field, event) {
            Ok(_) => self.status = None,
            Err(err) => {
                tracing::warn!(error = %err, "suggestion event failed");
                self.status = Some(err.to_string());
            }
        }
        Control::Continue
    }

    fn resize(&mut self, screen: Size) {
        self.screen = screen;
        let area = field_area(screen, self.field.is_multiline());
        self.field.attach(Surface::fullscreen(area, screen));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use suggest_core::event::{KeyEvent, Modifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code))
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        dir
    }

    fn app(dir: &Path) -> App {
        let opts = Opts {
            root: dir.to_path_buf(),
            ..Opts::default()
        };
        App::new(&opts, Size::new(80, 24))
    }

    #[test]
    fn starts_at_root_with_separator() {
        let dir = fixture();
        let app = app(dir.path());
        assert!(app.field().text().ends_with(MAIN_SEPARATOR));
        assert!(app.field().is_focused());
        assert!(!app.suggest().overlay().is_visible());
    }

    #[test]
    fn down_lists_root_and_enter_picks_folder() {
        let dir = fixture();
        let mut app = app(dir.path());
        app.handle(&key(KeyCode::Down));
        assert_eq!(app.suggest().overlay().item_count(), 2);
        app.handle(&key(KeyCode::Enter));
        assert!(app.field().text().ends_with(&format!("docs{MAIN_SEPARATOR}")));
        assert_eq!(app.description(), "Type: Folder");
    }

    #[test]
    fn typing_filters_and_file_pick_sets_description() {
        let dir = fixture();
        let mut app = app(dir.path());
        app.handle(&key(KeyCode::Char('n')));
        assert_eq!(app.suggest().overlay().item_count(), 1);
        app.handle(&key(KeyCode::Down));
        app.handle(&key(KeyCode::Enter));
        assert!(app.field().text().ends_with("notes.txt"));
        assert_eq!(app.description(), "Type: File");
        assert_eq!(app.status(), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let dir = fixture();
        let mut app = app(dir.path());
        let quit = Event::Key(KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL));
        assert_eq!(app.handle(&quit), Control::Quit);
        assert_eq!(app.handle(&key(KeyCode::Char('c'))), Control::Continue);
    }

    #[test]
    fn resize_reattaches_field() {
        let dir = fixture();
        let mut app = app(dir.path());
        app.handle(&Event::Resize {
            width: 120,
            height: 40,
        });
        assert_eq!(app.screen(), Size::new(120, 40));
        let surface = app.field().surface().unwrap();
        assert_eq!(surface.anchor, field_area(Size::new(120, 40), false));
    }

    #[test]
    fn field_area_leaves_room_for_label() {
        assert_eq!(field_area(Size::new(80, 24), false), Rect::new(17, 0, 63, 1));
        assert_eq!(field_area(Size::new(80, 24), true).height, 4);
        assert_eq!(field_area(Size::new(10, 2), true), Rect::new(9, 0, 1, 2));
    }
}
