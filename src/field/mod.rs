//! Field widgets and formatters.
//!
//! - [`OptionsWidget`] - select lists, radio buttons/checkboxes and single
//!   on/off checkboxes over a list of allowed options
//! - [`TaxonomyFormatter`] - loads the terms referenced by taxonomy fields
//!   before they are displayed

mod options;
mod taxonomy;

pub use options::{
    EMPTY_OPTION_KEY, ElementValue, OPTIONS_EMPTY_NONE, OPTIONS_EMPTY_SELECT, OptionNode, OptionTree, OptionsWidget,
    WidgetKind, flatten_options, sanitize_label,
};
pub use taxonomy::{MemoryTermStorage, TaxonomyFormatter, Term, TermReference, TermStorage};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One field item: property name to value.
pub type FieldItem = BTreeMap<String, serde_json::Value>;

/// How many values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    Limited(u32),
    Unlimited,
}

impl Cardinality {
    /// Whether more than one value is allowed.
    pub fn is_multiple(self) -> bool {
        match self {
            Cardinality::Limited(count) => count > 1,
            Cardinality::Unlimited => true,
        }
    }
}

impl Default for Cardinality {
    fn default() -> Self {
        Cardinality::Limited(1)
    }
}
