use crate::models::{Id, Metric};
use crate::pipeline::{compare_metrics, find_metric, ComparisonRow};
use std::collections::BTreeSet;
use std::str::FromStr;
use strum_macros::Display;

/// Distinct corpora that have at least one metric record. Used for corpus
/// choices when the `/corpora/` catalogue itself failed to load.
pub fn corpora(metrics: &[Metric]) -> Vec<Id> {
    metrics
        .iter()
        .map(|m| m.corpus)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn keyboards_for_corpus(metrics: &[Metric], corpus: Id) -> Vec<Id> {
    metrics
        .iter()
        .filter(|m| m.corpus == corpus)
        .map(|m| m.keyboard)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn layouts_for_corpus_and_keyboard(metrics: &[Metric], corpus: Id, keyboard: Id) -> Vec<Id> {
    metrics
        .iter()
        .filter(|m| m.corpus == corpus && m.keyboard == keyboard)
        .map(|m| m.layout)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionField {
    Corpus,
    Keyboard,
    Layout,
}

/// One panel's `(corpus, keyboard, layout)` pick. Any level may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub corpus: Option<Id>,
    pub keyboard: Option<Id>,
    pub layout: Option<Id>,
}

impl Selection {
    pub fn new(corpus: Option<Id>, keyboard: Option<Id>, layout: Option<Id>) -> Self {
        Self {
            corpus,
            keyboard,
            layout,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.corpus.is_some() && self.keyboard.is_some() && self.layout.is_some()
    }

    pub fn resolve<'a>(&self, metrics: &'a [Metric]) -> Option<&'a Metric> {
        match (self.corpus, self.keyboard, self.layout) {
            (Some(c), Some(k), Some(l)) => find_metric(metrics, c, k, l),
            _ => None,
        }
    }

    /// Re-applies a raw pick top-down so every level is valid for `metrics`.
    pub fn narrowed(self, metrics: &[Metric]) -> Self {
        let s = narrow_selection(Self::default(), SelectionField::Corpus, self.corpus, metrics);
        let s = narrow_selection(s, SelectionField::Keyboard, self.keyboard, metrics);
        narrow_selection(s, SelectionField::Layout, self.layout, metrics)
    }

    pub fn keyboard_options(&self, metrics: &[Metric]) -> Vec<Id> {
        self.corpus
            .map(|c| keyboards_for_corpus(metrics, c))
            .unwrap_or_default()
    }

    pub fn layout_options(&self, metrics: &[Metric]) -> Vec<Id> {
        match (self.corpus, self.keyboard) {
            (Some(c), Some(k)) => layouts_for_corpus_and_keyboard(metrics, c, k),
            _ => Vec::new(),
        }
    }
}

/// Parses `corpus,keyboard,layout`; empty or missing parts stay unset.
impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() > 3 {
            return Err(format!("expected 'corpus,keyboard,layout', got '{}'", s));
        }

        let mut ids = [None; 3];
        for (slot, part) in ids.iter_mut().zip(&parts) {
            if !part.is_empty() {
                let id = part
                    .parse::<Id>()
                    .map_err(|_| format!("'{}' is not a valid id", part))?;
                *slot = Some(id);
            }
        }
        Ok(Self::new(ids[0], ids[1], ids[2]))
    }
}

/// Applies one dropdown change and cascades downward.
///
/// The corpus is taken as given, even when it has no metric records; its
/// keyboard list is then simply empty. Keyboard and layout survive only while
/// they stay available under the levels above them, otherwise they reset to
/// empty. Picks that are not available are rejected the same way.
pub fn narrow_selection(
    prev: Selection,
    changed: SelectionField,
    value: Option<Id>,
    metrics: &[Metric],
) -> Selection {
    let (corpus, keyboard, layout) = match changed {
        SelectionField::Corpus => (value, prev.keyboard, prev.layout),
        SelectionField::Keyboard => (prev.corpus, value, prev.layout),
        SelectionField::Layout => (prev.corpus, prev.keyboard, value),
    };

    let keyboard = match (corpus, keyboard) {
        (Some(c), Some(k)) if keyboards_for_corpus(metrics, c).contains(&k) => Some(k),
        _ => None,
    };
    let layout = match (corpus, keyboard, layout) {
        (Some(c), Some(k), Some(l)) if layouts_for_corpus_and_keyboard(metrics, c, k).contains(&l) => {
            Some(l)
        }
        _ => None,
    };

    Selection::new(corpus, keyboard, layout)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectAction {
    pub side: Side,
    pub field: SelectionField,
    pub value: Option<Id>,
}

/// Both panels of the compare page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompareState {
    pub left: Selection,
    pub right: Selection,
}

impl CompareState {
    pub fn side(&self, side: Side) -> &Selection {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Pure reducer step; the other panel is never touched.
    pub fn apply(&self, action: SelectAction, metrics: &[Metric]) -> CompareState {
        let mut next = *self;
        let target = match action.side {
            Side::Left => &mut next.left,
            Side::Right => &mut next.right,
        };
        *target = narrow_selection(*target, action.field, action.value, metrics);
        next
    }

    pub fn resolved<'a>(&self, metrics: &'a [Metric]) -> (Option<&'a Metric>, Option<&'a Metric>) {
        (self.left.resolve(metrics), self.right.resolve(metrics))
    }

    /// Right panel measured against the left one, once both resolve.
    pub fn diff_rows(&self, metrics: &[Metric]) -> Option<Vec<ComparisonRow>> {
        match self.resolved(metrics) {
            (Some(reference), Some(current)) => Some(compare_metrics(current, reference)),
            _ => None,
        }
    }
}
