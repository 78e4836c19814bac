use super::escape_html;
use crate::action::Action;
use std::fmt::Write;

/// A control binding declared by the markup that contains it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub key: String,
    pub action: Action,
}

/// Markup under construction together with the bindings of its controls
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Markup {
    html: String,
    bindings: Vec<Binding>,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn into_parts(self) -> (String, Vec<Binding>) {
        (self.html, self.bindings)
    }

    /// Append trusted markup
    pub fn raw(&mut self, html: &str) -> &mut Self {
        self.html.push_str(html);
        self
    }

    /// Append user text, escaped
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.html.push_str(&escape_html(text));
        self
    }

    /// Register `action` and return the key its control posts
    pub fn bind(&mut self, action: Action) -> String {
        let key = action.key();
        if !self.bindings.iter().any(|binding| binding.key == key) {
            self.bindings.push(Binding {
                key: key.clone(),
                action,
            });
        }
        key
    }

    pub fn form_start(&mut self, class: &str) -> &mut Self {
        let _ = write!(
            self.html,
            r#"<form method="post" action="/action" class="{class}">"#
        );
        self
    }

    pub fn form_end(&mut self) -> &mut Self {
        self.raw("</form>")
    }

    /// Submit button of the surrounding form
    pub fn submit(&mut self, action: Action, label: &str, class: &str, aria_label: &str) -> &mut Self {
        let key = self.bind(action);
        let _ = write!(
            self.html,
            r#"<button type="submit" name="action" value="{}" class="{class}" aria-label="{}">{label}</button>"#,
            escape_html(&key),
            escape_html(aria_label),
        );
        self
    }

    /// Submit button that skips browser validation, e.g. "Cancel"
    pub fn cancel(&mut self, action: Action, label: &str, class: &str) -> &mut Self {
        let key = self.bind(action);
        let _ = write!(
            self.html,
            r#"<button type="submit" name="action" value="{}" class="{class}" formnovalidate>{label}</button>"#,
            escape_html(&key),
        );
        self
    }

    /// A stand-alone button in its own form
    pub fn button(&mut self, action: Action, label: &str, class: &str, aria_label: &str) -> &mut Self {
        self.form_start("inline-form");
        self.submit(action, label, class, aria_label);
        self.form_end()
    }

    /// Labelled text input
    pub fn input(&mut self, spec: Input<'_>) -> &mut Self {
        let required = if spec.required { " required" } else { "" };
        let _ = write!(
            self.html,
            r#"<div><label for="{id}" class="block text-sm font-medium text-gray-700">{label}</label><input type="{kind}" id="{id}" name="{name}" value="{value}" class="input"{required}{extra}/></div>"#,
            id = spec.id,
            label = spec.label,
            kind = spec.kind,
            name = spec.name,
            value = escape_html(spec.value),
            extra = spec.extra,
        );
        self
    }

    /// Labelled textarea
    pub fn textarea(&mut self, spec: Input<'_>) -> &mut Self {
        let required = if spec.required { " required" } else { "" };
        let _ = write!(
            self.html,
            r#"<div><label for="{id}" class="block text-sm font-medium text-gray-700">{label}</label><textarea id="{id}" name="{name}" class="input"{required}{extra}>{value}</textarea></div>"#,
            id = spec.id,
            label = spec.label,
            name = spec.name,
            value = escape_html(spec.value),
            extra = spec.extra,
        );
        self
    }
}

/// Form field description for [`Markup::input`] and [`Markup::textarea`]
#[derive(Clone, Copy, Debug)]
pub struct Input<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub label: &'a str,
    pub kind: &'a str,
    pub value: &'a str,
    pub required: bool,
    pub extra: &'a str,
}

impl<'a> Input<'a> {
    pub fn text(id: &'a str, name: &'a str, label: &'a str, value: &'a str) -> Self {
        Self {
            id,
            name,
            label,
            kind: "text",
            value,
            required: false,
            extra: "",
        }
    }

    pub fn kind(mut self, kind: &'a str) -> Self {
        self.kind = kind;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn extra(mut self, extra: &'a str) -> Self {
        self.extra = extra;
        self
    }
}
