//! Built-in HTML renderer.
//!
//! Emits a plain semantic document: one `<section>` per top-level CV key,
//! mappings as `<dl>`, lists as `<ul>`. Styling comes from the theme's
//! stylesheet. Recognised options: `title`, `lang`, `stylesheet`.

use serde_yaml::{Mapping, Value};

use crate::core::path::key_label;
use crate::core::slug::{SLUG_KEY, slugify};
use crate::error::Result;

use super::{Renderer, Theme};

const DEFAULT_TITLE: &str = "Curriculum Vitae";
const DEFAULT_LANG: &str = "en";

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, cv: &Value, theme: &Theme, options: &Mapping) -> Result<String> {
        let title = option_str(options, "title")
            .or_else(|| cv.get("basics").and_then(|b| b.get("name")).and_then(Value::as_str))
            .unwrap_or(DEFAULT_TITLE);
        let lang = option_str(options, "lang").unwrap_or(DEFAULT_LANG);
        let stylesheet = option_str(options, "stylesheet").or(theme.stylesheet.as_deref());

        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n");
        out.push_str(&format!("<html lang=\"{}\">\n", escape(lang)));
        out.push_str("<head>\n<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{}</title>\n", escape(title)));
        if let Some(href) = stylesheet {
            out.push_str(&format!("<link rel=\"stylesheet\" href=\"{}\">\n", escape(href)));
        }
        out.push_str("</head>\n<body>\n<main class=\"cv\">\n");

        if let Some(sections) = cv.as_mapping() {
            for (key, value) in sections {
                let Some(name) = key_label(key) else { continue };
                out.push_str(&format!(
                    "<section id=\"{}\">\n<h2>{}</h2>\n",
                    escape(&slugify(&name)),
                    escape(&heading(&name))
                ));
                write_value(&mut out, value);
                out.push_str("</section>\n");
            }
        }

        out.push_str("</main>\n</body>\n</html>\n");
        Ok(out)
    }
}

fn option_str<'a>(options: &'a Mapping, key: &str) -> Option<&'a str> {
    options.get(key).and_then(Value::as_str)
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Mapping(map) => {
            out.push_str("<dl>\n");
            for (key, child) in map {
                let Some(name) = key_label(key) else { continue };
                if name == SLUG_KEY {
                    continue;
                }
                out.push_str(&format!("<dt>{}</dt>\n", escape(&heading(&name))));
                out.push_str("<dd>");
                write_value(out, child);
                out.push_str("</dd>\n");
            }
            out.push_str("</dl>\n");
        }
        Value::Sequence(items) => {
            out.push_str("<ul>\n");
            for item in items {
                match item.get(SLUG_KEY).and_then(Value::as_str) {
                    Some(slug) => {
                        out.push_str(&format!("<li data-slug=\"{}\">", escape(slug)));
                    }
                    None => out.push_str("<li>"),
                }
                write_value(out, item);
                out.push_str("</li>\n");
            }
            out.push_str("</ul>\n");
        }
        Value::Tagged(tagged) => write_value(out, &tagged.value),
        Value::Null => {}
        Value::Bool(flag) => out.push_str(if *flag { "yes" } else { "no" }),
        Value::Number(number) => out.push_str(&number.to_string()),
        Value::String(text) => out.push_str(&escape(text)),
    }
}

/// `start_date` / `start-date` -> `Start date`.
fn heading(key: &str) -> String {
    let spaced = key.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
