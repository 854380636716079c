//! Win evaluation.
//!
//! Pure functions over a card grid and the called set. The engine re-derives
//! every claim through [`evaluate`]; nothing a client reports is trusted.

use super::{card::Card, stage::Stage};
use serde::Serialize;
use std::collections::HashSet;

/// A completed line on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Line {
    Row(usize),
    Column(usize),
    /// Top-left to bottom-right
    Diagonal,
    /// Top-right to bottom-left
    AntiDiagonal,
}

impl Line {
    pub fn kind(&self) -> LineKind {
        match self {
            Line::Row(_) => LineKind::Row,
            Line::Column(_) => LineKind::Column,
            Line::Diagonal | Line::AntiDiagonal => LineKind::Diagonal,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    #[default]
    None,
    Row,
    Column,
    Diagonal,
}

/// Result of evaluating one card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    /// Effective marks: called numbers plus server-side marks
    pub marked: Vec<Vec<bool>>,
    /// Completed lines: rows, then columns, then diagonals
    pub lines: Vec<Line>,
    /// Every cell marked
    pub full_house: bool,
}

impl Evaluation {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Kind of the first completed line
    pub fn kind(&self) -> LineKind {
        self.lines.first().map(Line::kind).unwrap_or_default()
    }

    /// Whether the card meets the win condition of `stage`
    pub fn satisfies(&self, stage: Stage) -> bool {
        match stage {
            Stage::Single => !self.lines.is_empty(),
            Stage::Double => self.lines.len() >= 2,
            Stage::Full => self.full_house,
            Stage::Lobby | Stage::Ended => false,
        }
    }

    /// Richest prize tier this card qualifies for
    pub fn best_stage(&self) -> Option<Stage> {
        [Stage::Full, Stage::Double, Stage::Single]
            .into_iter()
            .find(|s| self.satisfies(*s))
    }
}

/// Effective marked-cell matrix
pub fn marked_cells(
    numbers: &[Vec<u32>],
    marks: &[Vec<bool>],
    called: &HashSet<u32>,
) -> Vec<Vec<bool>> {
    numbers
        .iter()
        .enumerate()
        .map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(|(c, n)| {
                    called.contains(n)
                        || marks
                            .get(r)
                            .and_then(|m| m.get(c))
                            .copied()
                            .unwrap_or(false)
                })
                .collect()
        })
        .collect()
}

/// Evaluate a grid against the called set.
///
/// Diagonals are only considered for square grids.
pub fn evaluate(numbers: &[Vec<u32>], marks: &[Vec<bool>], called: &HashSet<u32>) -> Evaluation {
    let marked = marked_cells(numbers, marks, called);
    let height = marked.len();
    let width = marked.first().map(Vec::len).unwrap_or(0);
    let rectangular = marked.iter().all(|row| row.len() == width);
    let mut lines = Vec::new();

    if height == 0 || width == 0 || !rectangular {
        return Evaluation {
            marked,
            lines,
            full_house: false,
        };
    }

    for (r, row) in marked.iter().enumerate() {
        if row.iter().all(|m| *m) {
            lines.push(Line::Row(r));
        }
    }

    for c in 0..width {
        if marked.iter().all(|row| row[c]) {
            lines.push(Line::Column(c));
        }
    }

    if height == width {
        if (0..height).all(|i| marked[i][i]) {
            lines.push(Line::Diagonal);
        }
        if (0..height).all(|i| marked[i][width - 1 - i]) {
            lines.push(Line::AntiDiagonal);
        }
    }

    let full_house = marked.iter().flatten().all(|m| *m);

    Evaluation {
        marked,
        lines,
        full_house,
    }
}

/// Evaluate a card against the called set
pub fn evaluate_card(card: &Card, called: &HashSet<u32>) -> Evaluation {
    evaluate(&card.numbers, &card.marks, called)
}
