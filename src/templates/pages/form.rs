// templates/pages/form.rs

use crate::entities::{EntitySpec, FieldErrors, FieldKind, FormField, FormInput};
use crate::templates::components::{button, card};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct FormPageVm<'a> {
    pub entity: &'a EntitySpec,
    /// `None` for the create form.
    pub record_id: Option<&'a str>,
    pub values: &'a FormInput,
    pub errors: &'a FieldErrors,
    /// Failure reported by the API on submit.
    pub message: Option<&'a str>,
}

pub fn form_page(vm: &FormPageVm) -> Markup {
    let entity = vm.entity;
    let (title, action) = match vm.record_id {
        Some(id) => (format!("Edit {}", entity.singular), entity.record_path(id, None)),
        None => (format!("New {}", entity.singular), entity.list_path()),
    };

    desktop_layout(
        &title,
        Some(entity.slug),
        card(
            &title,
            html! {
                @if let Some(message) = vm.message {
                    div class="alert alert-error" role="alert" { (message) }
                }
                form method="post" action=(action) class="entity-form" novalidate {
                    @for field in entity.form.fields {
                        (form_field(field, vm.values.get(field.name).map(String::as_str), vm.errors.get(field.name)))
                    }
                    div class="form-actions" {
                        (button("Save"))
                        a href=(entity.list_path()) { "Cancel" }
                    }
                }
            },
        ),
    )
}

fn form_field(field: &FormField, value: Option<&str>, error: Option<&String>) -> Markup {
    let value = value.unwrap_or("");
    let id = format!("field-{}", field.name);

    html! {
        div class=(if error.is_some() { "field has-error" } else { "field" }) {
            label for=(id) {
                (field.label)
                @if field.required { span class="required" { " *" } }
            }
            @match field.kind {
                FieldKind::TextArea => {
                    textarea id=(id) name=(field.name) rows="4" { (value) }
                }
                FieldKind::Select(options) => {
                    select id=(id) name=(field.name) {
                        option value="" { "Choose…" }
                        @for choice in options {
                            option value=(choice) selected[choice.eq_ignore_ascii_case(value)] { (choice) }
                        }
                    }
                }
                FieldKind::Checkbox => {
                    input type="checkbox" id=(id) name=(field.name) checked[!value.is_empty()];
                }
                kind => {
                    input type=(input_type(kind)) id=(id) name=(field.name) value=(value)
                        placeholder=[placeholder(kind)] step=[(kind == FieldKind::Number).then_some("any")];
                }
            }
            @if let Some(error) = error {
                p class="field-error" { (error) }
            }
        }
    }
}

fn input_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Email => "email",
        FieldKind::Phone => "tel",
        FieldKind::Number => "number",
        FieldKind::Date => "date",
        FieldKind::DateTime => "datetime-local",
        FieldKind::Url => "url",
        FieldKind::Text
        | FieldKind::TextArea
        | FieldKind::TimeWindow
        | FieldKind::Select(_)
        | FieldKind::Checkbox => "text",
    }
}

fn placeholder(kind: FieldKind) -> Option<&'static str> {
    match kind {
        FieldKind::TimeWindow => Some("9:00 AM - 5:00 PM"),
        FieldKind::Phone => Some("+1 555 123 4567"),
        FieldKind::Url => Some("https://"),
        _ => None,
    }
}
