use cmscore::entity::FormState;
use cmscore::field::{
    Cardinality, ElementValue, FieldItem, MemoryTermStorage, OptionNode, OptionTree, OptionsWidget, TaxonomyFormatter,
    Term, TermReference, WidgetKind,
};
use serde_json::json;

fn allowed_values() -> OptionTree {
    vec![
        ("1".to_string(), OptionNode::Label("Rust".to_string())),
        ("2".to_string(), OptionNode::Label("<b>Tokio</b> <div>CMS</div>".to_string())),
    ]
}

#[test]
fn test_checkbox_submission_feeds_formatter() {
    let widget = OptionsWidget::new(WidgetKind::Buttons, "field_tags", "Tags", "target_id")
        .cardinality(Cardinality::Unlimited);
    let mut state = FormState::new();

    let labels: Vec<String> = widget
        .options(&allowed_values())
        .into_iter()
        .filter_map(|(_, node)| match node {
            OptionNode::Label(label) => Some(label),
            OptionNode::Group(_) => None,
        })
        .collect();
    assert_eq!(labels, vec!["Rust", "<b>Tokio</b> CMS"], "no empty option for multiple checkboxes");

    let items = widget.validate_element(&ElementValue::Multiple(vec!["1".into(), "2".into(), "7".into()]), &mut state);
    assert!(!state.has_errors());
    assert_eq!(state.values["field_tags"], json!([{"target_id": "1"}, {"target_id": "2"}, {"target_id": "7"}]));

    let mut references: Vec<Vec<TermReference>> = vec![
        items
            .iter()
            .filter_map(|item| item["target_id"].as_str()?.parse().ok())
            .map(TermReference::new)
            .collect(),
    ];
    let storage = MemoryTermStorage::new([Term::new(1, "tags", "Rust"), Term::new(2, "tags", "Tokio")]);
    TaxonomyFormatter.prepare_view(&mut references, &storage);

    assert_eq!(TaxonomyFormatter::term_names(&references[0]), vec!["Rust", "Tokio"]);
    assert_eq!(storage.loads(), 1);
}

#[test]
fn test_required_select_reports_missing_value() {
    let mut widget = OptionsWidget::new(WidgetKind::Select, "field_topic", "Topic", "value").required(true);
    widget.prepare(&[]);
    let mut state = FormState::new();

    let options = widget.options(&allowed_values());
    assert_eq!(options[0], ("_none".to_string(), OptionNode::Label("- Select a value -".to_string())));

    let items = widget.validate_element(&ElementValue::Single("_none".to_string()), &mut state);
    assert!(items.is_empty());
    assert_eq!(state.errors.get("field_topic").map(String::as_str), Some("Topic field is required."));
}

#[test]
fn test_selected_options_ignore_stale_values() {
    let widget = OptionsWidget::new(WidgetKind::Select, "field_topic", "Topic", "value")
        .cardinality(Cardinality::Limited(3));
    let items: Vec<FieldItem> = ["2", "99"]
        .iter()
        .map(|value| FieldItem::from([("value".to_string(), json!(value))]))
        .collect();

    assert_eq!(widget.selected_options(&items, &allowed_values()), vec!["2".to_string()]);
}

#[test]
fn test_formatter_across_entities_with_autocreate() {
    let storage = MemoryTermStorage::new([Term::new(3, "tags", "Wasm")]);
    let mut references = vec![
        vec![TermReference::new(3), TermReference::new(4)],
        vec![TermReference::autocreate(Term::new(0, "tags", "Brand new"))],
        vec![],
    ];

    TaxonomyFormatter.prepare_view(&mut references, &storage);

    assert_eq!(TaxonomyFormatter::term_names(&references[0]), vec!["Wasm"]);
    assert_eq!(TaxonomyFormatter::term_names(&references[1]), vec!["Brand new"]);
    assert!(references[2].is_empty());
    assert_eq!(storage.loads(), 1);
}
