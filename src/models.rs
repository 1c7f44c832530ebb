use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

/// Backend primary keys are opaque integers.
pub type Id = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub unique_symbols: Option<u64>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyboard {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub form_factor: String,
    #[serde(default)]
    pub keys: Option<u32>,
    #[serde(default)]
    pub rows: Option<u32>,
    #[serde(default)]
    pub keyboard_model: Value,
    #[serde(default)]
    pub keyboard_preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub layout_model: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPreview {
    pub id: Id,
    pub keyboard: Id,
    pub layout: Id,
    #[serde(default)]
    pub layout_preview: Option<String>,
}

/// List endpoints answer either with a bare array or a paginated envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Bare(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Bare(items) => items,
            ListPayload::Paged { results } => results,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, ValueEnum)]
pub enum MetricGroup {
    #[strum(serialize = "Finger usage")]
    FingerUsage,
    #[strum(serialize = "Travel distance")]
    Travel,
    #[strum(serialize = "Row usage")]
    RowUsage,
    Bigrams,
    Skipgrams,
    Trigrams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Frequencies and usage shares in `[0, 1]`.
    Fraction,
    /// Travel distance in key units (u).
    Distance,
}

/// Every numeric column of a metric record, named as on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    EnumCount,
    Display,
    AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum MetricField {
    LeftPinkyUsage,
    LeftRingUsage,
    LeftMiddleUsage,
    LeftIndexUsage,
    LeftThumbUsage,
    RightThumbUsage,
    RightIndexUsage,
    RightMiddleUsage,
    RightRingUsage,
    RightPinkyUsage,

    LeftPinkyTravel,
    LeftRingTravel,
    LeftMiddleTravel,
    LeftIndexTravel,
    LeftThumbTravel,
    RightThumbTravel,
    RightIndexTravel,
    RightMiddleTravel,
    RightRingTravel,
    RightPinkyTravel,
    TotalTravel,

    NumberRowUsage,
    TopRowUsage,
    HomeRowUsage,
    BottomRowUsage,
    ThumbRowUsage,
    OtherRowUsage,

    Sfb,
    ScissorBigram,
    LateralStretchBigram,
    Sfs,
    ScissorSkipgram,
    LateralStretchSkipgram,
    Alternate,
    RollIn,
    RollOut,
    Onehand,
    Redirect,
    BadRedirect,
}

impl MetricField {
    pub fn group(self) -> MetricGroup {
        use MetricField::*;
        match self {
            LeftPinkyUsage | LeftRingUsage | LeftMiddleUsage | LeftIndexUsage | LeftThumbUsage
            | RightThumbUsage | RightIndexUsage | RightMiddleUsage | RightRingUsage
            | RightPinkyUsage => MetricGroup::FingerUsage,
            LeftPinkyTravel | LeftRingTravel | LeftMiddleTravel | LeftIndexTravel
            | LeftThumbTravel | RightThumbTravel | RightIndexTravel | RightMiddleTravel
            | RightRingTravel | RightPinkyTravel | TotalTravel => MetricGroup::Travel,
            NumberRowUsage | TopRowUsage | HomeRowUsage | BottomRowUsage | ThumbRowUsage
            | OtherRowUsage => MetricGroup::RowUsage,
            Sfb | ScissorBigram | LateralStretchBigram => MetricGroup::Bigrams,
            Sfs | ScissorSkipgram | LateralStretchSkipgram => MetricGroup::Skipgrams,
            Alternate | RollIn | RollOut | Onehand | Redirect | BadRedirect => {
                MetricGroup::Trigrams
            }
        }
    }

    pub fn unit(self) -> Unit {
        match self.group() {
            MetricGroup::Travel => Unit::Distance,
            _ => Unit::Fraction,
        }
    }

    /// Hand owning a per-finger column. `None` for aggregate columns.
    pub fn hand(self) -> Option<Hand> {
        use MetricField::*;
        match self {
            LeftPinkyUsage | LeftRingUsage | LeftMiddleUsage | LeftIndexUsage | LeftThumbUsage
            | LeftPinkyTravel | LeftRingTravel | LeftMiddleTravel | LeftIndexTravel
            | LeftThumbTravel => Some(Hand::Left),
            RightThumbUsage | RightIndexUsage | RightMiddleUsage | RightRingUsage
            | RightPinkyUsage | RightThumbTravel | RightIndexTravel | RightMiddleTravel
            | RightRingTravel | RightPinkyTravel => Some(Hand::Right),
            _ => None,
        }
    }

    /// Whether a higher value is a regression. Stated per column, never derived.
    pub fn more_is_worse(self) -> bool {
        use MetricField::*;
        match self {
            LeftPinkyUsage | RightPinkyUsage | LeftRingUsage | RightRingUsage => true,
            LeftMiddleUsage | LeftIndexUsage | LeftThumbUsage | RightThumbUsage
            | RightIndexUsage | RightMiddleUsage => false,

            LeftPinkyTravel | LeftRingTravel | LeftMiddleTravel | LeftIndexTravel
            | LeftThumbTravel | RightThumbTravel | RightIndexTravel | RightMiddleTravel
            | RightRingTravel | RightPinkyTravel | TotalTravel => true,

            HomeRowUsage | ThumbRowUsage => false,
            NumberRowUsage | TopRowUsage | BottomRowUsage | OtherRowUsage => true,

            Sfb | ScissorBigram | LateralStretchBigram => true,
            Sfs | ScissorSkipgram | LateralStretchSkipgram => true,
            Alternate | RollIn | RollOut | Onehand => false,
            Redirect | BadRedirect => true,
        }
    }

    pub fn label(self) -> &'static str {
        use MetricField::*;
        match self {
            LeftPinkyUsage => "L Pinky",
            LeftRingUsage => "L Ring",
            LeftMiddleUsage => "L Middle",
            LeftIndexUsage => "L Index",
            LeftThumbUsage => "L Thumb",
            RightThumbUsage => "R Thumb",
            RightIndexUsage => "R Index",
            RightMiddleUsage => "R Middle",
            RightRingUsage => "R Ring",
            RightPinkyUsage => "R Pinky",
            LeftPinkyTravel => "L Pinky travel",
            LeftRingTravel => "L Ring travel",
            LeftMiddleTravel => "L Middle travel",
            LeftIndexTravel => "L Index travel",
            LeftThumbTravel => "L Thumb travel",
            RightThumbTravel => "R Thumb travel",
            RightIndexTravel => "R Index travel",
            RightMiddleTravel => "R Middle travel",
            RightRingTravel => "R Ring travel",
            RightPinkyTravel => "R Pinky travel",
            TotalTravel => "Total travel",
            NumberRowUsage => "Number row",
            TopRowUsage => "Top row",
            HomeRowUsage => "Home row",
            BottomRowUsage => "Bottom row",
            ThumbRowUsage => "Thumb row",
            OtherRowUsage => "Other rows",
            Sfb => "SFB",
            ScissorBigram => "Scissors",
            LateralStretchBigram => "LSB",
            Sfs => "SFS",
            ScissorSkipgram => "Scissor skips",
            LateralStretchSkipgram => "LSS",
            Alternate => "Alternate",
            RollIn => "Roll in",
            RollOut => "Roll out",
            Onehand => "Onehand",
            Redirect => "Redirect",
            BadRedirect => "Bad redirect",
        }
    }

    pub fn in_group(group: MetricGroup) -> impl Iterator<Item = MetricField> {
        MetricField::iter().filter(move |f| f.group() == group)
    }
}

/// One finger's share of keystrokes, tagged with its hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerUsage {
    pub field: MetricField,
    pub hand: Hand,
    pub value: f64,
}

/// Ergonomics statistics for one `(corpus, keyboard, layout)` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMetric", into = "RawMetric")]
pub struct Metric {
    pub id: Id,
    pub corpus: Id,
    pub keyboard: Id,
    pub layout: Id,
    pub corpus_name: String,
    pub keyboard_name: String,
    pub layout_name: String,
    values: BTreeMap<MetricField, f64>,
}

impl Metric {
    pub fn new(id: Id, corpus: Id, keyboard: Id, layout: Id) -> Self {
        Self {
            id,
            corpus,
            keyboard,
            layout,
            corpus_name: String::new(),
            keyboard_name: String::new(),
            layout_name: String::new(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: MetricField, value: f64) -> Self {
        self.set(field, Some(value));
        self
    }

    /// Non-finite values are treated as undefined.
    pub fn set(&mut self, field: MetricField, value: Option<f64>) {
        match value.filter(|v| v.is_finite()) {
            Some(v) => {
                self.values.insert(field, v);
            }
            None => {
                self.values.remove(&field);
            }
        }
    }

    pub fn value(&self, field: MetricField) -> Option<f64> {
        self.values.get(&field).copied()
    }

    pub fn triple(&self) -> (Id, Id, Id) {
        (self.corpus, self.keyboard, self.layout)
    }

    pub fn matches(&self, corpus: Id, keyboard: Id, layout: Id) -> bool {
        self.triple() == (corpus, keyboard, layout)
    }

    /// The ten per-finger usage values. Undefined entries count as zero.
    pub fn finger_usages(&self) -> Vec<FingerUsage> {
        MetricField::in_group(MetricGroup::FingerUsage)
            .filter_map(|field| {
                field.hand().map(|hand| FingerUsage {
                    field,
                    hand,
                    value: self.value(field).unwrap_or(0.0),
                })
            })
            .collect()
    }

    pub fn display_name(&self) -> String {
        if self.layout_name.is_empty() {
            format!("layout #{}", self.layout)
        } else {
            self.layout_name.clone()
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawMetric {
    id: Id,
    #[serde(alias = "corpus_id")]
    corpus: Id,
    #[serde(alias = "keyboard_id")]
    keyboard: Id,
    #[serde(alias = "layout_id")]
    layout: Id,
    #[serde(default)]
    corpus_name: String,
    #[serde(default)]
    keyboard_name: String,
    #[serde(default)]
    layout_name: String,
    #[serde(flatten)]
    columns: Map<String, Value>,
}

impl From<RawMetric> for Metric {
    fn from(raw: RawMetric) -> Self {
        // Only JSON numbers count; strings and nulls stay undefined.
        let values = MetricField::iter()
            .filter_map(|field| {
                raw.columns
                    .get(field.as_ref())
                    .and_then(Value::as_f64)
                    .filter(|v| v.is_finite())
                    .map(|v| (field, v))
            })
            .collect();

        Self {
            id: raw.id,
            corpus: raw.corpus,
            keyboard: raw.keyboard,
            layout: raw.layout,
            corpus_name: raw.corpus_name,
            keyboard_name: raw.keyboard_name,
            layout_name: raw.layout_name,
            values,
        }
    }
}

impl From<Metric> for RawMetric {
    fn from(metric: Metric) -> Self {
        let columns = metric
            .values
            .iter()
            .map(|(field, v)| (field.as_ref().to_string(), Value::from(*v)))
            .collect();

        Self {
            id: metric.id,
            corpus: metric.corpus,
            keyboard: metric.keyboard,
            layout: metric.layout,
            corpus_name: metric.corpus_name,
            keyboard_name: metric.keyboard_name,
            layout_name: metric.layout_name,
            columns,
        }
    }
}
