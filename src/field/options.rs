//! Widgets choosing from a list of allowed options.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

use super::{Cardinality, FieldItem};
use crate::entity::FormState;

/// Empty option labelled "- None -" (or "N/A" for buttons).
pub const OPTIONS_EMPTY_NONE: &str = "option_none";

/// Empty option labelled "- Select a value -".
pub const OPTIONS_EMPTY_SELECT: &str = "option_select";

/// Key of the empty option.
pub const EMPTY_OPTION_KEY: &str = "_none";

/// Tags kept in option labels.
const ALLOWED_LABEL_TAGS: &[&str] = &[
    "a", "b", "big", "br", "code", "del", "em", "i", "img", "ins", "li", "ol", "p", "pre", "q", "small", "span",
    "strong", "sub", "sup", "tt", "ul",
];

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)\b[^>]*>").expect("tag pattern is valid")
});

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").expect("script pattern is valid")
});

/// One entry of an option list: a label, or a group of nested options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionNode {
    Label(String),
    Group(OptionTree),
}

/// Ordered option list; keys are the stored values, or group names.
pub type OptionTree = Vec<(String, OptionNode)>;

/// Submitted value of a widget element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementValue {
    Single(String),
    Multiple(Vec<String>),
}

/// The kinds of options widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetKind {
    /// `options_select`: a select list; supports option groups.
    Select,
    /// `options_buttons`: radios or checkboxes.
    Buttons,
    /// `options_onoff`: a single checkbox.
    OnOff,
}

impl WidgetKind {
    /// Plugin id of the widget.
    pub fn plugin_id(self) -> &'static str {
        match self {
            WidgetKind::Select => "options_select",
            WidgetKind::Buttons => "options_buttons",
            WidgetKind::OnOff => "options_onoff",
        }
    }
}

/// An options widget bound to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsWidget {
    kind: WidgetKind,
    field_name: String,
    title: String,
    /// Main property of the field items, e.g. `value` or `target_id`.
    column: String,
    required: bool,
    multiple: bool,
    has_value: bool,
}

impl OptionsWidget {
    pub fn new(kind: WidgetKind, field_name: impl Into<String>, title: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            kind,
            field_name: field_name.into(),
            title: title.into(),
            column: column.into(),
            required: false,
            multiple: false,
            has_value: false,
        }
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn cardinality(mut self, cardinality: Cardinality) -> Self {
        self.multiple = cardinality.is_multiple();
        self
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Record whether the field already holds a value.
    pub fn prepare(&mut self, items: &[FieldItem]) {
        self.has_value = items.first().is_some_and(|item| item.get(&self.column).is_some_and(|v| !v.is_null()));
    }

    /// Select lists render option groups; the other widgets need a flat list.
    pub fn supports_groups(&self) -> bool {
        self.kind == WidgetKind::Select
    }

    /// Which empty option the widget needs, if any.
    pub fn empty_option(&self) -> Option<&'static str> {
        match self.kind {
            WidgetKind::Select if self.multiple => (!self.required).then_some(OPTIONS_EMPTY_NONE),
            WidgetKind::Select if !self.required => Some(OPTIONS_EMPTY_NONE),
            WidgetKind::Select if !self.has_value => Some(OPTIONS_EMPTY_SELECT),
            WidgetKind::Select => None,
            WidgetKind::Buttons => (!self.required && !self.multiple).then_some(OPTIONS_EMPTY_NONE),
            WidgetKind::OnOff => None,
        }
    }

    /// The options to render from the field's settable options.
    ///
    /// Prepends the empty option when needed, sanitizes every label and
    /// flattens groups unless the widget supports them.
    pub fn options(&self, settable: &OptionTree) -> OptionTree {
        let mut options = OptionTree::with_capacity(settable.len() + 1);

        let empty = self.empty_option();
        if let Some(empty) = empty {
            let label = match (self.kind, empty) {
                (WidgetKind::Buttons, _) => "N/A",
                (_, OPTIONS_EMPTY_NONE) => "- None -",
                _ => "- Select a value -",
            };
            options.push((EMPTY_OPTION_KEY.to_string(), OptionNode::Label(label.to_string())));
        }
        // The prepended empty option shadows a settable one with the same key
        options.extend(settable.iter().filter(|(key, _)| empty.is_none() || key != EMPTY_OPTION_KEY).cloned());

        let options = sanitize_tree(options);
        if self.supports_groups() {
            options
        } else {
            flatten_options(&options)
                .into_iter()
                .map(|(key, label)| (key, OptionNode::Label(label)))
                .collect()
        }
    }

    /// Values of `items` present in the option list, in item order.
    pub fn selected_options(&self, items: &[FieldItem], settable: &OptionTree) -> Vec<String> {
        let flat = flatten_options(&self.options(settable));
        items
            .iter()
            .filter_map(|item| item.get(&self.column).and_then(value_key))
            .filter(|value| flat.iter().any(|(key, _)| key == value))
            .collect()
    }

    /// Validate the submitted element and store it as field items.
    ///
    /// A required field submitted with only the empty option is an error.
    /// The empty option is dropped and the remaining values are stored on
    /// `state` under the field name as `[{column: value}, ...]`.
    pub fn validate_element(&self, value: &ElementValue, state: &mut FormState) -> Vec<FieldItem> {
        if self.required && *value == ElementValue::Single(EMPTY_OPTION_KEY.to_string()) {
            state.set_error(self.field_name.clone(), format!("{} field is required.", self.title));
        }

        let mut values = match value {
            ElementValue::Single(value) => vec![value.clone()],
            ElementValue::Multiple(values) => values.clone(),
        };
        if let Some(index) = values.iter().position(|v| v == EMPTY_OPTION_KEY) {
            values.remove(index);
        }

        let items: Vec<FieldItem> = values
            .into_iter()
            .map(|value| FieldItem::from([(self.column.clone(), Value::String(value))]))
            .collect();

        state.values.insert(
            self.field_name.clone(),
            Value::Array(items.iter().map(|item| Value::Object(item.clone().into_iter().collect())).collect()),
        );
        items
    }
}

fn value_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        _ => None,
    }
}

fn sanitize_tree(tree: OptionTree) -> OptionTree {
    tree.into_iter()
        .map(|(key, node)| {
            let node = match node {
                OptionNode::Label(label) => OptionNode::Label(sanitize_label(&label)),
                OptionNode::Group(group) => OptionNode::Group(sanitize_tree(group)),
            };
            (key, node)
        })
        .collect()
}

/// Flatten nested options into `(key, label)` pairs.
///
/// Group names are dropped. A key appearing twice keeps its first position
/// and its last label.
pub fn flatten_options(tree: &OptionTree) -> Vec<(String, String)> {
    fn walk(tree: &OptionTree, result: &mut Vec<(String, String)>) {
        for (key, node) in tree {
            match node {
                OptionNode::Label(label) => match result.iter_mut().find(|(existing, _)| existing == key) {
                    Some(entry) => entry.1 = label.clone(),
                    None => result.push((key.clone(), label.clone())),
                },
                OptionNode::Group(group) => walk(group, result),
            }
        }
    }

    let mut result = Vec::new();
    walk(tree, &mut result);
    result
}

/// Strip markup from an option label except a small set of inline and list
/// tags. Kept tags lose their attributes; script and style blocks are
/// removed with their content.
pub fn sanitize_label(label: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(label, "");
    HTML_TAG
        .replace_all(&without_scripts, |caps: &regex::Captures<'_>| {
            let tag = caps[2].to_ascii_lowercase();
            if ALLOWED_LABEL_TAGS.contains(&tag.as_str()) {
                format!("<{}{tag}>", &caps[1])
            } else {
                String::new()
            }
        })
        .into_owned()
}
