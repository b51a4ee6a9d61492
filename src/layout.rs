//! Masonry column layout.
//!
//! Images are packed Pinterest-style: a container holds N columns and every
//! new image goes to the column that is currently shortest. Ties go to the
//! leftmost column, so equal-height images fill columns round-robin.
//!
//! ```text
//! heights  [10, 30, 20]   → place into column 0
//! heights  [40, 30, 30]   → place into column 1 (first of the tied pair)
//! ```
//!
//! The layout owns element ids and heights only. Column heights are always
//! derived from their members, so updating an element's height (when a lazy
//! image finishes decoding) immediately affects later placements and the
//! geometry used for reveal.

use std::fmt;

/// Column count used when the host gives none.
pub const DEFAULT_COLUMNS: usize = 3;

/// Stable identifier of a rendered image element within one gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Vertical extent of an element, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Parse the host's `--columns` property.
///
/// Anything that is not a positive integer falls back to `default`.
pub fn column_count(property: Option<&str>, default: usize) -> usize {
    property
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(default.max(1))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Slot {
    id: ElementId,
    height: f64,
}

/// One column: an ordered run of elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Column {
    slots: Vec<Slot>,
}

impl Column {
    /// Current rendered height: the sum of member heights.
    pub fn height(&self) -> f64 {
        self.slots.iter().map(|s| s.height).sum()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Member ids in append order.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.slots.iter().map(|s| s.id)
    }

    fn append(&mut self, id: ElementId, height: f64) {
        self.slots.push(Slot { id, height });
    }
}

/// Index of the shortest column, first one on ties. `None` when there are
/// no columns.
pub fn shortest_column(columns: &[Column]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, column) in columns.iter().enumerate() {
        let h = column.height();
        match best {
            Some((_, best_h)) if h >= best_h => {}
            _ => best = Some((i, h)),
        }
    }
    best.map(|(i, _)| i)
}

/// The columns of one gallery container.
#[derive(Debug, Clone, PartialEq)]
pub struct Masonry {
    columns: Vec<Column>,
}

impl Masonry {
    /// A fresh layout with `n` empty columns (at least one).
    pub fn create_columns(n: usize) -> Self {
        Self {
            columns: vec![Column::default(); n.max(1)],
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an element to the shortest column; returns that column's index.
    pub fn place(&mut self, id: ElementId, height: f64) -> usize {
        let index = shortest_column(&self.columns).unwrap_or(0);
        self.columns[index].append(id, height);
        index
    }

    /// Every element in document order: column by column, top to bottom.
    pub fn elements(&self) -> Vec<ElementId> {
        self.columns.iter().flat_map(|c| c.ids()).collect()
    }

    pub fn column_of(&self, id: ElementId) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.slots.iter().any(|s| s.id == id))
    }

    /// Change an element's height in place; its column and position stay.
    pub fn set_height(&mut self, id: ElementId, height: f64) -> bool {
        for column in &mut self.columns {
            if let Some(slot) = column.slots.iter_mut().find(|s| s.id == id) {
                slot.height = height;
                return true;
            }
        }
        false
    }

    /// Take an element out of the layout.
    pub fn remove(&mut self, id: ElementId) -> bool {
        for column in &mut self.columns {
            if let Some(pos) = column.slots.iter().position(|s| s.id == id) {
                column.slots.remove(pos);
                return true;
            }
        }
        false
    }

    /// Vertical position of an element within its column.
    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        for column in &self.columns {
            let mut top = 0.0;
            for slot in &column.slots {
                if slot.id == id {
                    return Some(Rect {
                        top,
                        height: slot.height,
                    });
                }
                top += slot.height;
            }
        }
        None
    }

    /// Replace the columns with `n` new ones and place every existing element
    /// again, in document order, by the shortest-column rule.
    pub fn rebuild(&mut self, n: usize) {
        let slots: Vec<Slot> = self
            .columns
            .iter()
            .flat_map(|c| c.slots.iter().copied())
            .collect();
        *self = Self::create_columns(n);
        for slot in slots {
            self.place(slot.id, slot.height);
        }
    }
}
