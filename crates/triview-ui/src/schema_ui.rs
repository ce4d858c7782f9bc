//! Schema-driven UI generation.
//!
//! Walks the JSON Schema produced by `schemars` and renders one collapsible
//! folder per object and one slider per numeric leaf. Each control knows
//! its object path; changing it sends a `set_option` IPC message carrying
//! that path to the native viewer.

use dioxus::prelude::*;
use serde_json::Value;

use crate::bridge;

/// Convert a `snake_case` string to `Title Case`.
fn display_name(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    format!("{upper}{}", chars.as_str())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One folder per top-level options section.
#[component]
pub fn OptionFolders(schema: Value, options: Value) -> Element {
    let Some(props) = schema.pointer("/properties").and_then(Value::as_object)
    else {
        return rsx! { p { "No schema loaded" } };
    };

    rsx! {
        for (key, section_schema) in props.iter() {
            {render_node(
                vec![key.clone()],
                section_schema,
                options.get(key),
                &schema,
            )}
        }
    }
}

/// Resolve a `$ref` pointer (e.g. `"#/$defs/PositionOptions"`) against
/// the root schema. Returns the input schema unchanged if there is no
/// `$ref`.
fn resolve_ref<'a>(schema: &'a Value, root: &'a Value) -> &'a Value {
    if let Some(ref_str) = schema.get("$ref").and_then(Value::as_str) {
        let pointer = ref_str.strip_prefix('#').unwrap_or(ref_str);
        root.pointer(pointer).unwrap_or(schema)
    } else {
        schema
    }
}

/// Render a schema node at `path`: objects become folders, numbers become
/// sliders.
fn render_node(
    path: Vec<String>,
    raw_schema: &Value,
    current: Option<&Value>,
    root: &Value,
) -> Element {
    let schema = resolve_ref(raw_schema, root);
    let key = path.last().map_or("", String::as_str);
    let label = schema
        .get("title")
        .or_else(|| raw_schema.get("title"))
        .and_then(Value::as_str)
        .map_or_else(|| display_name(key), str::to_owned);

    if let Some(props) = schema.get("properties").and_then(Value::as_object) {
        return rsx! {
            details { open: true,
                summary { class: "section-header", "{label}" }
                div { class: "section-body",
                    for (child, child_schema) in props.iter() {
                        {render_node(
                            child_path(&path, child),
                            child_schema,
                            current.and_then(|c| c.get(child)),
                            root,
                        )}
                    }
                }
            }
        };
    }

    match schema.get("type").and_then(Value::as_str) {
        Some("number" | "integer") => rsx! {
            div { class: "field-row",
                label { class: "field-label", "{label}" }
                {render_number_field(path, schema, current)}
            }
        },
        _ => rsx! {
            div { class: "field-row",
                label { class: "field-label", "{label}" }
                span { class: "text-xs text-neutral-600", "(unsupported type)" }
            }
        },
    }
}

fn child_path(parent: &[String], child: &str) -> Vec<String> {
    let mut path = parent.to_vec();
    path.push(child.to_owned());
    path
}

/// Slider with the schema's range and step, plus a numeric readout.
fn render_number_field(
    path: Vec<String>,
    schema: &Value,
    current: Option<&Value>,
) -> Element {
    let current_val = current.and_then(Value::as_f64).unwrap_or(0.0);
    let min = schema.get("minimum").and_then(Value::as_f64);
    let max = schema.get("maximum").and_then(Value::as_f64);
    let is_int = schema.get("type").and_then(Value::as_str) == Some("integer");
    let step = schema
        .get("step")
        .and_then(Value::as_f64)
        .unwrap_or(if is_int { 1.0 } else { 0.01 });
    let decimals = if step >= 1.0 { 0 } else { 2 };
    let readout = format!("{readout}");

    rsx! {
        input {
            r#type: "range",
            value: "{current_val}",
            step: "{step}",
            min: min.map(|v| format!("{v}")).unwrap_or_default(),
            max: max.map(|v| format!("{v}")).unwrap_or_default(),
            oninput: move |evt: Event<FormData>| {
                if let Ok(v) = evt.value().parse::<f64>() {
                    let val = if is_int {
                        Value::from(v as i64)
                    } else {
                        Value::from(v)
                    };
                    bridge::send_set_option(&path, &val);
                }
            },
        }
        span { class: "field-value", "{readout}" }
    }
}
