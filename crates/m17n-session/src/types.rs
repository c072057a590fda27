use std::ops::Range;

use bitflags::bitflags;

use m17n_core::backend::CandidateGroup;
use m17n_core::settings::{Color, Orientation, UnderlineStyle};

/// Outcome of offering one key symbol to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedResult {
    /// The backend consumed the key and produced no text.
    Consumed,
    /// The backend produced text, already committed to the host.
    Committed(String),
    /// Neither; the key should go to the next handler.
    Passthrough,
}

impl FeedResult {
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Passthrough)
    }
}

/// Candidate navigation requested by the host's candidate window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    PageUp,
    PageDown,
    CursorLeft,
    CursorRight,
}

impl NavDirection {
    /// Synthetic key the backend uses for this movement.
    pub fn key_name(self) -> &'static str {
        match self {
            Self::PageUp => "Up",
            Self::PageDown => "Down",
            Self::CursorLeft => "Left",
            Self::CursorRight => "Right",
        }
    }
}

/// Purpose of the focused text field, as the host numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPurpose {
    #[default]
    FreeForm,
    Alpha,
    Digits,
    Number,
    Phone,
    Url,
    Email,
    Name,
    Password,
    Pin,
    Terminal,
}

impl InputPurpose {
    pub fn from_ordinal(n: u32) -> Self {
        match n {
            1 => Self::Alpha,
            2 => Self::Digits,
            3 => Self::Number,
            4 => Self::Phone,
            5 => Self::Url,
            6 => Self::Email,
            7 => Self::Name,
            8 => Self::Password,
            9 => Self::Pin,
            10 => Self::Terminal,
            _ => Self::FreeForm,
        }
    }

    /// Fields whose keystrokes must never reach the backend.
    pub fn is_private(self) -> bool {
        matches!(self, Self::Password | Self::Pin)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InputHints: u32 {
        const SPELLCHECK = 1 << 0;
        const NO_SPELLCHECK = 1 << 1;
        const WORD_COMPLETION = 1 << 2;
        const LOWERCASE = 1 << 3;
        const UPPERCASE_CHARS = 1 << 4;
        const UPPERCASE_WORDS = 1 << 5;
        const UPPERCASE_SENTENCES = 1 << 6;
        const INHIBIT_OSK = 1 << 7;
        const VERTICAL_WRITING = 1 << 8;
        const EMOJI = 1 << 9;
        const NO_EMOJI = 1 << 10;
        const PRIVATE = 1 << 11;
    }
}

bitflags! {
    /// What the focused client supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        const PREEDIT_TEXT = 1 << 0;
        const AUXILIARY_TEXT = 1 << 1;
        const LOOKUP_TABLE = 1 << 2;
        const FOCUS = 1 << 3;
        const PROPERTY = 1 << 4;
        const SURROUNDING_TEXT = 1 << 5;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Foreground(Color),
    Background(Color),
    Underline(UnderlineStyle),
}

/// A styling run over `[start, end)` characters of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextAttribute {
    pub kind: AttributeKind,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreeditText {
    pub text: String,
    pub attributes: Vec<TextAttribute>,
}

/// Last preedit pushed to the host. Fully replaced on every redraw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreeditState {
    pub text: String,
    /// Cursor offset in characters.
    pub cursor: usize,
    pub visible: bool,
}

/// Status label shown next to the engine icon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusIndicator {
    pub label: Option<String>,
    pub visible: bool,
}

impl StatusIndicator {
    /// Shown only when the backend reports something other than the
    /// engine's own title.
    pub fn from_status(status: String, title: Option<&str>) -> Self {
        if status.is_empty() || title == Some(status.as_str()) {
            return Self::default();
        }
        Self {
            label: Some(status),
            visible: true,
        }
    }
}

/// A host panel property (menu item or indicator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub label: Option<String>,
    pub icon: Option<String>,
    pub tooltip: Option<String>,
    pub sensitive: bool,
    pub visible: bool,
}

impl Property {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: None,
            icon: None,
            tooltip: None,
            sensitive: true,
            visible: true,
        }
    }
}

pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Host candidate table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
    pub page_size: usize,
    pub cursor_pos: usize,
    pub cursor_visible: bool,
    pub round: bool,
    pub orientation: Orientation,
    pub candidates: Vec<String>,
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, 0, true, true)
    }
}

impl LookupTable {
    pub fn new(page_size: usize, cursor_pos: usize, cursor_visible: bool, round: bool) -> Self {
        Self {
            page_size,
            cursor_pos,
            cursor_visible,
            round,
            orientation: Orientation::System,
            candidates: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
        self.cursor_pos = 0;
    }

    /// Replace the contents with one rebuilt group.
    pub fn load(&mut self, page: &CandidatePage, orientation: Orientation) {
        self.candidates.clone_from(&page.candidates);
        self.page_size = page.page_size;
        self.cursor_pos = page.cursor;
        self.orientation = orientation;
    }
}

/// The group of candidates containing the backend's current index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePage {
    pub candidates: Vec<String>,
    pub page_size: usize,
    /// Cursor relative to the start of the group.
    pub cursor: usize,
    /// 1-based group ordinal.
    pub page: usize,
    pub total: usize,
}

impl CandidatePage {
    pub fn auxiliary_text(&self) -> String {
        format!("( {} / {} )", self.page, self.total)
    }
}

/// Walk `groups` to the one containing `index` and decode it. `None` when
/// the index lies past the last group.
pub fn rebuild_candidates(groups: &[CandidateGroup], index: usize) -> Option<CandidatePage> {
    let mut running = 0;
    let (ordinal, group) = groups.iter().enumerate().find(|(_, g)| {
        if running + g.len() > index {
            return true;
        }
        running += g.len();
        false
    })?;

    let candidates: Vec<String> = match group {
        CandidateGroup::Text(text) => text
            .code_points()
            .iter()
            .map(|&c| match char::from_u32(c) {
                Some(ch) => ch.to_string(),
                None => format!("INVCODE=U+{c:04X}"),
            })
            .collect(),
        CandidateGroup::List(items) => items
            .iter()
            .map(|item| item.to_utf8().unwrap_or_else(|_| "NULL".to_string()))
            .collect(),
    };

    Some(CandidatePage {
        page_size: candidates.len(),
        candidates,
        cursor: index - running,
        page: ordinal + 1,
        total: groups.len(),
    })
}

/// Text around the client's cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurroundingText {
    pub text: String,
    /// Cursor offset in characters.
    pub cursor_pos: usize,
    pub anchor_pos: usize,
}

/// Character range selected by a signed request length at `cursor`:
/// negative reaches back, positive forward, zero selects nothing. Clamped to
/// `[0, len]`.
pub fn surrounding_span(cursor: usize, len: usize, request: i32) -> Range<usize> {
    let cursor = cursor.min(len);
    let n = request.unsigned_abs() as usize;
    if request < 0 {
        cursor.saturating_sub(n)..cursor
    } else if request > 0 {
        cursor..cursor.saturating_add(n).min(len)
    } else {
        cursor..cursor
    }
}

/// `(offset, nchars)` for the host's delete call, or `None` for a zero
/// request.
pub fn delete_arguments(request: i32) -> Option<(i32, u32)> {
    match request {
        0 => None,
        n if n < 0 => Some((n, n.unsigned_abs())),
        n => Some((0, n.unsigned_abs())),
    }
}
