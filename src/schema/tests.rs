//! Schema inference tests

use super::*;
use crate::document::Document;
use crate::error::Error;
use crate::mapping::{Directive, MapColumn, MapTable, TosserMap};
use ::arrow::datatypes::{DataType, TimeUnit};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use tempfile::tempdir;
use test_case::test_case;

fn policy() -> TosserMap {
    TosserMap::new("shop", "orders")
}

fn doc(data: Value) -> Document {
    Document::new(data)
}

/// Run one full session over the given data trees
fn generate(schema: &mut TosserSchema, docs: &[Value]) {
    schema.begin().unwrap();
    for data in docs {
        schema.contribute(&doc(data.clone())).unwrap();
    }
    schema.end().unwrap();
}

fn type_of(schema: &TosserSchema, table: &str, column: &str) -> String {
    schema.column(table, column).unwrap().type_var.to_string()
}

// ============================================================================
// Type Var Tests
// ============================================================================

#[test_case("string", SchemaType::String, None ; "bare string")]
#[test_case("string(12)", SchemaType::String, Some(12) ; "sized string")]
#[test_case("integer", SchemaType::Integer, None ; "integer")]
#[test_case("datetime", SchemaType::Datetime, None ; "datetime")]
fn test_type_var_parse(text: &str, schema_type: SchemaType, length: Option<usize>) {
    let type_var: TypeVar = text.parse().unwrap();
    assert_eq!(type_var.schema_type, schema_type);
    assert_eq!(type_var.length, length);
    assert_eq!(type_var.to_string(), text);
}

#[test_case("varchar" ; "unknown base type")]
#[test_case("string(" ; "unterminated length")]
#[test_case("" ; "empty")]
fn test_type_var_parse_errors(text: &str) {
    assert!(text.parse::<TypeVar>().is_err());
}

#[test]
fn test_type_var_serde_as_string() {
    let type_var = TypeVar::string(7);
    assert_eq!(serde_json::to_value(&type_var).unwrap(), json!("string(7)"));

    let back: TypeVar = serde_json::from_value(json!("decimal")).unwrap();
    assert_eq!(back, TypeVar::new(SchemaType::Decimal));
}

#[test]
fn test_enum_eligibility() {
    assert!(SchemaType::String.is_enum_eligible());
    assert!(SchemaType::Integer.is_enum_eligible());
    assert!(SchemaType::Boolean.is_enum_eligible());
    assert!(!SchemaType::Decimal.is_enum_eligible());
    assert!(!SchemaType::Date.is_enum_eligible());
    assert!(!SchemaType::Null.is_enum_eligible());
}

#[test]
fn test_column_and_table_identity() {
    let mut a = SchemaColumn::new("t", "c", TypeVar::new(SchemaType::Integer));
    let b = SchemaColumn::new("t", "c", TypeVar::string(3));
    a.enum_values = Some(vec![json!(1)]);
    assert_eq!(a, b);
    assert_ne!(a, SchemaColumn::new("t", "d", TypeVar::new(SchemaType::Integer)));

    assert_eq!(SchemaTable::new("items"), SchemaTable::with_parent("items", "orders"));
    assert_ne!(SchemaTable::new("items"), SchemaTable::new("orders"));
}

#[test]
fn test_effective_type_prefers_hint() {
    let mut column = SchemaColumn::new("t", "c", TypeVar::string(3));
    assert_eq!(column.effective_type(), &TypeVar::string(3));

    column.hint = Some(TypeVar::new(SchemaType::Integer));
    assert_eq!(column.effective_type(), &TypeVar::new(SchemaType::Integer));
}

// ============================================================================
// Inference Tests
// ============================================================================

#[test_case(json!(null), "null" ; "null value")]
#[test_case(json!(true), "boolean" ; "boolean value")]
#[test_case(json!(42), "integer" ; "integer value")]
#[test_case(json!(-7), "integer" ; "negative integer")]
#[test_case(json!(2.5), "decimal" ; "decimal value")]
#[test_case(json!("2024-02-29"), "date" ; "leap date")]
#[test_case(json!("12:30:05"), "time" ; "time")]
#[test_case(json!("12:30:05.250"), "time" ; "time with fraction")]
#[test_case(json!("2024-01-15T10:30:00Z"), "datetime" ; "rfc3339 utc")]
#[test_case(json!("2024-01-15T10:30:00+02:00"), "datetime" ; "rfc3339 offset")]
#[test_case(json!("2024-01-15 10:30:00"), "datetime" ; "naive space separated")]
#[test_case(json!("2023-02-30"), "string(10)" ; "impossible date is a string")]
#[test_case(json!("25:00:00"), "string(8)" ; "impossible time is a string")]
#[test_case(json!("hello"), "string(5)" ; "plain string")]
#[test_case(json!("héllo"), "string(5)" ; "length counts characters")]
fn test_infer_scalar(value: Value, expected: &str) {
    assert_eq!(infer_type(&value, None).to_string(), expected);
}

#[test_case(TypeVar::string(3), json!("hello"), "string(5)" ; "longer string grows")]
#[test_case(TypeVar::string(9), json!("hi"), "string(9)" ; "shorter string keeps")]
#[test_case(TypeVar::new(SchemaType::Null), json!(3), "integer" ; "null prior yields")]
#[test_case(TypeVar::new(SchemaType::Integer), json!(null), "integer" ; "null value yields")]
#[test_case(TypeVar::new(SchemaType::Integer), json!(2.5), "decimal" ; "integer to decimal")]
#[test_case(TypeVar::new(SchemaType::Decimal), json!(3), "decimal" ; "decimal absorbs integer")]
#[test_case(TypeVar::new(SchemaType::Integer), json!("abc"), "string(3)" ; "integer to string")]
#[test_case(TypeVar::new(SchemaType::Date), json!(12345), "string(5)" ; "date and integer")]
#[test_case(TypeVar::string(2), json!(123456), "string(6)" ; "string absorbs integer text")]
#[test_case(TypeVar::new(SchemaType::Boolean), json!(1), "string(1)" ; "boolean and integer")]
fn test_widen(prior: TypeVar, value: Value, expected: &str) {
    assert_eq!(infer_type(&value, Some(&prior)).to_string(), expected);
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[test]
fn test_contribute_before_begin_fails() {
    let mut schema = TosserSchema::new(policy());
    let err = schema.contribute(&doc(json!({"a": 1}))).unwrap_err();

    assert!(err.is_lifecycle());
    assert_eq!(schema.tables().count(), 0);
    assert_eq!(schema.contributions(), 0);
}

#[test]
fn test_end_twice_fails() {
    let mut schema = TosserSchema::new(policy());
    schema.begin().unwrap();
    schema.contribute(&doc(json!({"a": 1}))).unwrap();
    schema.end().unwrap();

    let err = schema.end().unwrap_err();
    assert!(matches!(err, Error::Lifecycle { ref state, .. } if state == "complete"));
    assert_eq!(schema.columns("orders").len(), 1);
    assert!(schema.is_complete());
}

#[test]
fn test_begin_twice_fails() {
    let mut schema = TosserSchema::new(policy());
    schema.begin().unwrap();
    assert!(schema.begin().unwrap_err().is_lifecycle());
    assert!(schema.resume().unwrap_err().is_lifecycle());
}

#[test]
fn test_contribute_after_end_fails() {
    let mut schema = TosserSchema::new(policy());
    generate(&mut schema, &[json!({"a": 1})]);
    assert!(schema.contribute(&doc(json!({"b": 2}))).is_err());
    assert!(schema.column("orders", "b").is_none());
}

#[test]
fn test_begin_resets_registry() {
    let mut schema = TosserSchema::new(policy());
    generate(&mut schema, &[json!({"a": 1})]);
    generate(&mut schema, &[json!({"b": 1})]);

    assert!(schema.column("orders", "a").is_none());
    assert!(schema.column("orders", "b").is_some());
    assert_eq!(schema.contributions(), 1);
}

#[test]
fn test_resume_keeps_registry() {
    let mut schema = TosserSchema::new(policy());
    generate(&mut schema, &[json!({"a": 1})]);

    schema.resume().unwrap();
    assert!(!schema.is_complete());
    schema.contribute(&doc(json!({"a": "text", "b": true}))).unwrap();
    schema.end().unwrap();

    assert_eq!(type_of(&schema, "orders", "a"), "string(4)");
    assert_eq!(type_of(&schema, "orders", "b"), "boolean");
}

// ============================================================================
// Contribution Tests
// ============================================================================

#[test]
fn test_root_table_exists_after_any_contribution() {
    let mut schema = TosserSchema::new(policy());
    generate(&mut schema, &[json!({})]);

    assert!(schema.table("orders").is_some());
    assert_eq!(schema.contributions(), 1);
}

#[test]
fn test_flatten_round_trip() {
    let mut schema = TosserSchema::new(policy());
    generate(&mut schema, &[json!({"a": {"b": 1}})]);

    assert_eq!(schema.tables().count(), 1);
    assert!(schema.table("a").is_none());
    assert_eq!(type_of(&schema, "orders", "a_b"), "integer");
}

#[test]
fn test_array_boundary_creates_dependent_table() {
    let mut schema = TosserSchema::new(policy());
    generate(&mut schema, &[json!({"items": [{"x": 1}, {"x": 2}]})]);

    let items = schema.table("items").unwrap();
    assert_eq!(items.parent.as_deref(), Some("orders"));
    assert_eq!(type_of(&schema, "items", "x"), "integer");
    assert!(schema.column("orders", "x").is_none());

    let order: Vec<_> = schema.tables().map(|t| t.name.as_str()).collect();
    assert_eq!(order, vec!["orders", "items"]);
}

#[test]
fn test_dependencies_created_before_dependents() {
    let mut schema = TosserSchema::new(policy().with_climb_arrays(true));
    generate(&mut schema, &[json!({"items": [{"parts": [{"p": 1}]}]})]);

    let order: Vec<_> = schema.tables().map(|t| t.name.as_str()).collect();
    assert_eq!(order, vec!["orders", "items", "items_parts"]);
    assert_eq!(
        schema.table("items_parts").unwrap().parent.as_deref(),
        Some("items")
    );
}

#[test]
fn test_root_array_rejected_without_partial_contribution() {
    let mut schema = TosserSchema::new(policy());
    schema.begin().unwrap();

    let err = schema
        .contribute(&doc(json!([{"x": 1}, {"y": 2}])))
        .unwrap_err();
    assert!(err.is_unsupported_structure());
    assert_eq!(schema.tables().count(), 0);
    assert_eq!(schema.contributions(), 0);
    assert!(schema.is_generating());
}

#[test_case(json!([]) ; "empty")]
#[test_case(json!([1, 2]) ; "scalars")]
fn test_root_array_without_objects_rejected(data: Value) {
    let mut schema = TosserSchema::new(policy());
    schema.begin().unwrap();

    let err = schema.contribute(&doc(data)).unwrap_err();
    assert!(err.is_unsupported_structure());
    assert_eq!(schema.tables().count(), 0);
    assert_eq!(schema.contributions(), 0);
}

#[test]
fn test_widening_is_order_independent() {
    let mut forward = TosserSchema::new(policy());
    generate(&mut forward, &[json!({"v": 1}), json!({"v": 2.5})]);

    let mut backward = TosserSchema::new(policy());
    generate(&mut backward, &[json!({"v": 2.5}), json!({"v": 1})]);

    assert_eq!(type_of(&forward, "orders", "v"), "decimal");
    assert_eq!(type_of(&backward, "orders", "v"), "decimal");
}

#[test]
fn test_max_length_is_padded() {
    let options = InferenceOptions::new().with_length_pad(5);
    let mut schema = TosserSchema::with_options(policy(), options);
    generate(&mut schema, &[json!({"s": "abc"}), json!({"s": "abcdefg"})]);

    let column = schema.column("orders", "s").unwrap();
    assert_eq!(column.type_var, TypeVar::string(7));
    assert_eq!(column.max_length, Some(12));
}

#[test]
fn test_max_length_absent_for_non_strings() {
    let mut schema = TosserSchema::new(policy());
    generate(&mut schema, &[json!({"n": 5})]);
    assert_eq!(schema.column("orders", "n").unwrap().max_length, None);
}

#[test]
fn test_columns_keep_insertion_order() {
    let mut schema = TosserSchema::new(policy());
    generate(&mut schema, &[json!({"z": 1, "a": 2}), json!({"m": 3, "z": 4})]);

    let names: Vec<_> = schema
        .columns("orders")
        .iter()
        .map(|c| c.column_name.as_str())
        .collect();
    assert_eq!(names, vec!["z", "a", "m"]);
}

// ============================================================================
// Enum Tests
// ============================================================================

#[test]
fn test_enum_tracks_distinct_values_in_first_seen_order() {
    let mut schema = TosserSchema::new(policy());
    generate(
        &mut schema,
        &[
            json!({"s": "b"}),
            json!({"s": "a"}),
            json!({"s": "b"}),
            json!({"s": null}),
        ],
    );

    let column = schema.column("orders", "s").unwrap();
    assert_eq!(column.enum_values, Some(vec![json!("b"), json!("a")]));
}

#[test]
fn test_enum_cap_is_one_way() {
    let options = InferenceOptions::new().with_enum_max(2);
    let mut schema = TosserSchema::with_options(policy(), options);
    generate(
        &mut schema,
        &[json!({"s": 1}), json!({"s": 2}), json!({"s": 3})],
    );
    assert_eq!(schema.column("orders", "s").unwrap().enum_values, None);

    schema.resume().unwrap();
    for v in [1, 1, 2] {
        schema.contribute(&doc(json!({ "s": v }))).unwrap();
    }
    schema.end().unwrap();
    assert_eq!(schema.column("orders", "s").unwrap().enum_values, None);
}

#[test]
fn test_enum_cleared_by_ineligible_type() {
    let mut schema = TosserSchema::new(policy());
    generate(&mut schema, &[json!({"v": 1}), json!({"v": 1.5}), json!({"v": 2})]);

    let column = schema.column("orders", "v").unwrap();
    assert_eq!(column.type_var.to_string(), "decimal");
    assert_eq!(column.enum_values, None);
}

#[test]
fn test_enum_pending_from_null() {
    let mut schema = TosserSchema::new(policy());
    generate(&mut schema, &[json!({"v": null}), json!({"v": "x"})]);

    let column = schema.column("orders", "v").unwrap();
    assert_eq!(column.type_var, TypeVar::string(1));
    assert_eq!(column.enum_values, Some(vec![json!("x")]));
}

#[test]
fn test_enum_members_become_text_when_widened_to_string() {
    let mut schema = TosserSchema::new(policy());
    generate(
        &mut schema,
        &[json!({"s": 1}), json!({"s": "x"}), json!({"s": "1"}), json!({"s": true})],
    );

    let column = schema.column("orders", "s").unwrap();
    assert_eq!(column.type_var.schema_type, SchemaType::String);
    assert_eq!(
        column.enum_values,
        Some(vec![json!("1"), json!("x"), json!("true")])
    );
}

#[test]
fn test_enum_text_members_count_against_cap() {
    let options = InferenceOptions::new().with_enum_max(2);
    let mut schema = TosserSchema::with_options(policy(), options);
    generate(
        &mut schema,
        &[json!({"s": 7}), json!({"s": "7"}), json!({"s": "a"}), json!({"s": 7})],
    );

    assert_eq!(
        schema.column("orders", "s").unwrap().enum_values,
        Some(vec![json!("7"), json!("a")])
    );
}

#[test]
fn test_no_enum_for_dates() {
    let mut schema = TosserSchema::new(policy());
    generate(&mut schema, &[json!({"d": "2024-01-01"})]);
    assert_eq!(schema.column("orders", "d").unwrap().enum_values, None);
}

// ============================================================================
// Policy Directive Tests
// ============================================================================

#[test]
fn test_keep_directive() {
    let policy = policy().with_table(
        "orders",
        MapTable::new().with_directive(Directive::Keep, vec![json!("id")]),
    );
    let mut schema = TosserSchema::new(policy);
    generate(&mut schema, &[json!({"id": 1, "note": "x", "items": [{"y": 1}]})]);

    assert!(schema.column("orders", "id").is_some());
    assert!(schema.column("orders", "note").is_none());
    // Directives are per table
    assert!(schema.column("items", "y").is_some());
}

#[test]
fn test_ignore_directive_still_creates_tables() {
    let policy = policy().with_table(
        "items",
        MapTable::new().with_directive(Directive::Ignore, vec![json!("secret")]),
    );
    let mut schema = TosserSchema::new(policy);
    generate(&mut schema, &[json!({"items": [{"secret": "s"}]})]);

    assert!(schema.table("items").is_some());
    assert!(schema.columns("items").is_empty());
}

#[test]
fn test_values_directive_pins_enum() {
    let policy = policy().with_table(
        "orders",
        MapTable::new().with_directive(
            Directive::Values,
            vec![json!("status"), json!("open"), json!("closed")],
        ),
    );
    let options = InferenceOptions::new().with_enum_max(1);
    let mut schema = TosserSchema::with_options(policy, options);
    generate(
        &mut schema,
        &[json!({"status": "open"}), json!({"status": "weird"})],
    );

    let column = schema.column("orders", "status").unwrap();
    assert_eq!(column.enum_values, Some(vec![json!("open"), json!("closed")]));
    assert_eq!(column.type_var, TypeVar::string(5));
}

#[test]
fn test_column_override_renames_and_hints() {
    let policy = policy().with_table(
        "orders",
        MapTable::new().with_column(
            "customer_id",
            MapColumn {
                name: Some("cust".to_string()),
                type_var: Some(TypeVar::new(SchemaType::Integer)),
            },
        ),
    );
    let mut schema = TosserSchema::new(policy);
    generate(&mut schema, &[json!({"customer": {"id": "C-1"}})]);

    assert!(schema.column("orders", "customer_id").is_none());
    let column = schema.column("orders", "cust").unwrap();
    assert_eq!(column.type_var, TypeVar::string(3));
    assert_eq!(column.hint, Some(TypeVar::new(SchemaType::Integer)));
    assert_eq!(column.effective_type(), &TypeVar::new(SchemaType::Integer));
}

#[test]
fn test_source_alias_merges_tables() {
    let policy = policy().with_table("items", MapTable::new().with_source("lines"));
    let mut schema = TosserSchema::new(policy);
    generate(
        &mut schema,
        &[json!({"items": [{"a": 1}]}), json!({"lines": [{"b": 2}]})],
    );

    assert!(schema.table("lines").is_none());
    assert_eq!(schema.columns("items").len(), 2);
}

#[test]
fn test_conflicting_parent_is_reported() {
    let policy = policy()
        .with_climb_arrays(true)
        .with_table("parts", MapTable::new().with_source("items_parts"));
    let mut schema = TosserSchema::new(policy);
    schema.begin().unwrap();
    schema
        .contribute(&doc(json!({"parts": [{"p": 1}]})))
        .unwrap();

    let err = schema
        .contribute(&doc(json!({"items": [{"parts": [{"p": 2}]}]})))
        .unwrap_err();
    assert!(err.to_string().contains("already depends on"));
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[test]
fn test_render_format() {
    let mut schema = TosserSchema::new(policy());
    generate(&mut schema, &[json!({"name": "ab", "price": 1.5})]);

    assert_eq!(
        schema.render(),
        json!({
            "data": {
                "orders": {
                    "name": {"type": "string(2)", "hint": null, "enum": ["ab"], "max_length": 12},
                    "price": {"type": "decimal", "hint": null, "enum": null, "max_length": null}
                }
            },
            "__TOSSER_metadata__": {"version": 1}
        })
    );
}

#[test]
fn test_render_document_degrades_to_metadata_only() {
    let mut unrepresentable: HashMap<(i32, i32), i32> = HashMap::new();
    unrepresentable.insert((1, 2), 3);

    let rendered = render_document(&unrepresentable);
    assert_eq!(rendered, json!({"__TOSSER_metadata__": {"version": 1}}));
}

#[tokio::test]
async fn test_write_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let mut schema = TosserSchema::new(policy());
    generate(
        &mut schema,
        &[
            json!({"id": 1, "customer": {"name": "Ada"}, "items": [{"sku": "A1", "qty": 2}]}),
            json!({"id": 2, "customer": {"name": null}, "tags": ["x", "y"], "placed": "2024-01-01"}),
        ],
    );

    let path = schema.write(dir.path()).await.unwrap();
    assert!(path.ends_with("schema.toss"));

    let loaded = TosserSchema::load(&path, policy(), InferenceOptions::default()).unwrap();
    assert!(loaded.is_complete());
    assert!(!loaded.is_generating());

    let pairs = |s: &TosserSchema| -> Vec<(String, String, String)> {
        s.tables()
            .flat_map(|t| {
                s.columns(&t.name).iter().map(|c| {
                    (
                        c.table_name.clone(),
                        c.column_name.clone(),
                        c.type_var.to_string(),
                    )
                })
            })
            .collect()
    };
    assert_eq!(pairs(&loaded), pairs(&schema));

    // Parent links are not persisted
    assert!(loaded.tables().all(SchemaTable::is_dependency_root));
}

#[tokio::test]
async fn test_write_refused_while_generating() {
    let dir = tempdir().unwrap();
    let mut schema = TosserSchema::new(policy());
    schema.begin().unwrap();

    let err = schema.write(dir.path()).await.unwrap_err();
    assert!(err.is_lifecycle());
    assert!(!dir.path().join("schema.toss").exists());
}

#[test]
fn test_load_rejects_unknown_version() {
    let err = TosserSchema::from_json(
        r#"{"data": {}, "__TOSSER_metadata__": {"version": 7}}"#,
        policy(),
        InferenceOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        Error::UnsupportedSchemaVersion {
            found: 7,
            expected: 1
        }
    ));
}

#[test]
fn test_load_metadata_only_file_is_empty() {
    let schema = TosserSchema::from_json(
        r#"{"__TOSSER_metadata__": {"version": 1}}"#,
        policy(),
        InferenceOptions::default(),
    )
    .unwrap();

    assert_eq!(schema.tables().count(), 0);
    assert!(schema.is_complete());
}

#[test]
fn test_null_only_column_renders_without_enum() {
    let mut schema = TosserSchema::new(policy());
    generate(&mut schema, &[json!({"gone": null})]);

    assert_eq!(
        schema.render()["data"]["orders"]["gone"],
        json!({"type": "null", "hint": null, "enum": null, "max_length": null})
    );

    // Reloaded, the column still starts tracking on its first value
    let mut reloaded =
        TosserSchema::from_json(&schema.render_string().unwrap(), policy(), InferenceOptions::default())
            .unwrap();
    assert_eq!(reloaded.column("orders", "gone").unwrap().enum_values, Some(vec![]));

    reloaded.resume().unwrap();
    reloaded.contribute(&doc(json!({"gone": "back"}))).unwrap();
    reloaded.end().unwrap();
    assert_eq!(
        reloaded.column("orders", "gone").unwrap().enum_values,
        Some(vec![json!("back")])
    );
}

#[test]
fn test_load_restores_column_metadata() {
    let schema = TosserSchema::from_json(
        r#"{
            "data": {"orders": {"s": {"type": "string(3)", "hint": "integer", "enum": ["a"], "max_length": 13}}},
            "__TOSSER_metadata__": {"version": 1}
        }"#,
        policy(),
        InferenceOptions::default(),
    )
    .unwrap();

    let column = schema.column("orders", "s").unwrap();
    assert_eq!(column.type_var, TypeVar::string(3));
    assert_eq!(column.hint, Some(TypeVar::new(SchemaType::Integer)));
    assert_eq!(column.enum_values, Some(vec![json!("a")]));
    assert_eq!(column.max_length, Some(13));
}

#[test]
fn test_load_rejects_malformed_column() {
    let err = TosserSchema::from_json(
        r#"{"data": {"orders": {"s": {"type": "blob"}}}, "__TOSSER_metadata__": {"version": 1}}"#,
        policy(),
        InferenceOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::SchemaFile { .. }));
}

#[test]
fn test_load_missing_file() {
    let err = TosserSchema::load("/nonexistent/schema.toss", policy(), InferenceOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

// ============================================================================
// Arrow Tests
// ============================================================================

#[test]
fn test_arrow_type_mapping() {
    assert_eq!(SchemaType::String.to_arrow(), DataType::Utf8);
    assert_eq!(SchemaType::Integer.to_arrow(), DataType::Int64);
    assert_eq!(SchemaType::Decimal.to_arrow(), DataType::Float64);
    assert_eq!(SchemaType::Boolean.to_arrow(), DataType::Boolean);
    assert_eq!(SchemaType::Null.to_arrow(), DataType::Null);
    assert_eq!(SchemaType::Date.to_arrow(), DataType::Date32);
    assert_eq!(
        SchemaType::Time.to_arrow(),
        DataType::Time64(TimeUnit::Microsecond)
    );
    assert_eq!(
        SchemaType::Datetime.to_arrow(),
        DataType::Timestamp(TimeUnit::Microsecond, None)
    );
}

#[test]
fn test_arrow_schemas_include_keys() {
    let mut schema = TosserSchema::new(policy());
    generate(&mut schema, &[json!({"id": 1, "items": [{"sku": "A"}]})]);

    let schemas = schema.to_arrow_schemas();
    assert_eq!(schemas.len(), 2);

    let (name, orders) = &schemas[0];
    assert_eq!(name, "orders");
    let fields: Vec<_> = orders.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(fields, vec!["orders_id", "id"]);
    assert!(!orders.field(0).is_nullable());
    assert!(orders.field(1).is_nullable());

    let (name, items) = &schemas[1];
    assert_eq!(name, "items");
    let fields: Vec<_> = items.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(fields, vec!["items_id", "orders_id", "sku"]);
    assert_eq!(items.metadata().get("parent").map(String::as_str), Some("orders"));
}

#[test]
fn test_arrow_uses_hint_and_skips_key_collisions() {
    let policy = policy().with_table(
        "orders",
        MapTable::new().with_column(
            "code",
            MapColumn {
                name: None,
                type_var: Some(TypeVar::new(SchemaType::Integer)),
            },
        ),
    );
    let mut schema = TosserSchema::new(policy);
    generate(&mut schema, &[json!({"orders_id": 9, "code": "12"})]);

    let schemas = schema.to_arrow_schemas();
    let orders = &schemas[0].1;
    assert_eq!(orders.fields().len(), 2);
    assert_eq!(orders.field(1).name(), "code");
    assert_eq!(orders.field(1).data_type(), &DataType::Int64);
}
