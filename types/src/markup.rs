//! Serializing a JSON value into element markup.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

use crate::json_text::to_json_text;

/// How serialized JSON is written into the output element.
///
/// `Raw` writes the JSON text as markup, so a payload containing `<b>` renders
/// a bold element. `Escaped` turns markup-significant characters into entities
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupPolicy {
    #[default]
    Raw,
    Escaped,
}

impl MarkupPolicy {
    #[must_use]
    pub const fn from_escape_flag(escape: bool) -> Self {
        if escape {
            MarkupPolicy::Escaped
        } else {
            MarkupPolicy::Raw
        }
    }

    /// Compact JSON text of `value` as the browser stringifies it, prepared
    /// for `innerHTML`.
    #[must_use]
    pub fn render(self, value: &Value) -> String {
        let json = to_json_text(value);
        match self {
            MarkupPolicy::Raw => json,
            MarkupPolicy::Escaped => escape_markup(&json).into_owned(),
        }
    }
}

/// Replace `& < > " '` with their HTML entities.
#[must_use]
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
