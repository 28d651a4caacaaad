//! Line reconstruction from positioned words.
//!
//! The word extractor (upstream, out of scope) hands us words in rough
//! reading order with their bounding boxes. Logical text lines are rebuilt by
//! vertical-band clustering: a word joins the current line when its top or
//! bottom edge sits within a small tolerance of the line's running bounding
//! box, otherwise the line is flushed and a new one starts.

use serde::{Deserialize, Serialize};

use caslens_core::types::InvestorInfo;

/// Axis-aligned bounding box in page coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Rect { x0, y0, x1, y1 }
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y1 - self.y0).abs()
    }
}

/// A positioned word as produced by the PDF text extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub rect: Rect,
    pub text: String,
}

impl Word {
    pub fn new(rect: Rect, text: impl Into<String>) -> Self {
        Word {
            rect,
            text: text.into(),
        }
    }
}

/// A reconstructed logical text line. `words` stays sorted left-to-right so
/// downstream column disambiguation can recover x-positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub words: Vec<Word>,
}

/// One page of input: the extractor's word list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    pub words: Vec<Word>,
}

/// Everything the engine consumes for one document. The first page's raw
/// text blocks drive issuer/mode classification; investor info arrives
/// pre-extracted from the upstream table layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub first_page_blocks: Vec<String>,
    pub pages: Vec<Page>,
    pub investor_info: Option<InvestorInfo>,
}

/// Empirically tuned layout constants. Real-world statements occasionally
/// need retuning, so these are carried as configuration rather than baked
/// into the algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Max distance between word and line top/bottom edges to merge (units).
    pub line_tolerance: f64,
    /// A word is a vertical artifact when `width * factor < height`.
    pub vertical_factor: f64,
    /// Column matching: how far left of the header box a value may start.
    pub column_left: f64,
    /// Column matching: how far right of the header box a value may end.
    pub column_right: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            line_tolerance: 3.0,
            vertical_factor: 4.0,
            column_left: 20.0,
            column_right: 5.0,
        }
    }
}

/// Named numeric columns of a transaction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Amount,
    Units,
    Nav,
    Balance,
}

impl Column {
    pub const ALL: [Column; 4] = [Column::Amount, Column::Units, Column::Nav, Column::Balance];
}

/// Per-page map from column name to the bounding box of its header word.
/// Absent entries mean the column cannot be disambiguated on this page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColumnMap {
    pub amount: Option<Rect>,
    pub units: Option<Rect>,
    pub nav: Option<Rect>,
    pub balance: Option<Rect>,
}

impl ColumnMap {
    pub fn get(&self, column: Column) -> Option<Rect> {
        match column {
            Column::Amount => self.amount,
            Column::Units => self.units,
            Column::Nav => self.nav,
            Column::Balance => self.balance,
        }
    }

    fn set(&mut self, column: Column, rect: Rect) {
        match column {
            Column::Amount => self.amount = Some(rect),
            Column::Units => self.units = Some(rect),
            Column::Nav => self.nav = Some(rect),
            Column::Balance => self.balance = Some(rect),
        }
    }
}

/// Rebuild logical text lines from one page's words, ordered top to bottom.
///
/// Words are taken in input (reading) order. Vertical artifacts such as
/// rotated watermarks are dropped. Within a line, words are re-sorted
/// left-to-right and joined with single spaces.
pub fn recover_lines(words: &[Word], tolerances: &Tolerances) -> Vec<Line> {
    let mut finished: Vec<(Rect, Vec<Word>)> = Vec::new();
    let mut current: Vec<Word> = Vec::new();
    let mut line_rect = Rect::default();

    for word in words {
        if word.rect.width() * tolerances.vertical_factor < word.rect.height() {
            continue;
        }
        if current.is_empty() {
            line_rect = word.rect;
            current.push(word.clone());
            continue;
        }
        let near_top = (line_rect.y0 - word.rect.y0).abs() <= tolerances.line_tolerance;
        let near_bottom = (line_rect.y1 - word.rect.y1).abs() <= tolerances.line_tolerance;
        if near_top || near_bottom {
            line_rect = line_rect.union(&word.rect);
            current.push(word.clone());
        } else {
            finished.push((line_rect, std::mem::take(&mut current)));
            line_rect = word.rect;
            current.push(word.clone());
        }
    }
    if !current.is_empty() {
        finished.push((line_rect, current));
    }

    finished.sort_by(|a, b| a.0.y1.total_cmp(&b.0.y1));
    finished
        .into_iter()
        .map(|(_, mut line_words)| {
            line_words.sort_by(|a, b| a.rect.x0.total_cmp(&b.rect.x0));
            let text = line_words
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            Line {
                text,
                words: line_words,
            }
        })
        .collect()
}

/// Locate the numeric table columns on a page by their header words.
///
/// Each column is keyed on a case-insensitive text suffix; when several words
/// match, the topmost wins (the real header row, not a data cell that happens
/// to contain the word).
pub fn column_positions(words: &[Word]) -> ColumnMap {
    let suffixes = [
        (Column::Amount, "amount"),
        (Column::Units, "units"),
        (Column::Nav, "nav"),
        (Column::Balance, "balance"),
    ];

    let mut map = ColumnMap::default();
    for (column, suffix) in suffixes {
        let best = words
            .iter()
            .filter(|w| w.text.to_lowercase().ends_with(suffix))
            .min_by(|a, b| a.rect.y0.total_cmp(&b.rect.y0));
        if let Some(word) = best {
            map.set(column, word.rect);
        }
    }
    map
}
