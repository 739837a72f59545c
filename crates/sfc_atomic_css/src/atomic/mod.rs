//! Built-in atomic CSS engine.
//!
//! A Tailwind-compatible subset: colors, spacing, sizing, typography, flexbox,
//! borders and a handful of keywords, with pseudo-class (`hover:`) and
//! breakpoint (`md:`) variants. Rules accumulate across renders until
//! [`StyleEngine::reset`] is called.

mod theme;
mod utilities;

use rustc_hash::FxHashSet;

pub use theme::{ColorValue, EngineConfig, Theme, ThemeConfig, ThemeExtension};
use utilities::Declaration;

use crate::synthesizer::StyleEngine;

/// `id` of the `<style>` element returned by [`AtomicSheet::style_tag`].
pub const STYLE_ELEMENT_ID: &str = "__atomic";

#[derive(Debug, Clone)]
struct Rule {
    /// Index into the theme's screens for rules behind a breakpoint.
    screen: Option<(usize, String)>,
    css: String,
}

/// A rule sheet that registers one rule per recognised class token.
#[derive(Debug, Clone)]
pub struct AtomicSheet {
    theme: Theme,
    important: bool,
    rules: Vec<Rule>,
    /// Tokens already handled since the last reset, recognised or not.
    seen: FxHashSet<String>,
}

impl AtomicSheet {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            theme: Theme::from_config(&config.theme),
            important: config.important,
            rules: Vec::new(),
            seen: FxHashSet::default(),
        }
    }

    /// Number of rules registered since the last reset.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Register the rule for one class token.
    ///
    /// Returns `false` if the token is not recognised.
    pub fn register(&mut self, token: &str) -> bool {
        if !self.seen.insert(token.to_string()) {
            return true;
        }
        match self.build_rule(token) {
            Some(rule) => {
                self.rules.push(rule);
                true
            }
            None => {
                tracing::debug!(token, "ignoring unknown utility class");
                false
            }
        }
    }

    /// The sheet text without the `<style>` wrapper.
    ///
    /// Unconditioned rules come first, then rules behind each breakpoint in
    /// ascending breakpoint order, each group in registration order.
    pub fn css(&self) -> String {
        let mut css = String::new();
        for rule in self.rules.iter().filter(|rule| rule.screen.is_none()) {
            css.push_str(&rule.css);
        }

        let mut screened: Vec<(usize, &String, &String)> = self
            .rules
            .iter()
            .filter_map(|rule| {
                rule.screen
                    .as_ref()
                    .map(|(index, width)| (*index, width, &rule.css))
            })
            .collect();
        screened.sort_by_key(|(index, _, _)| *index);
        for (_, width, rule) in screened {
            css.push_str(&format!("@media (min-width:{width}){{{rule}}}"));
        }
        css
    }

    fn build_rule(&self, token: &str) -> Option<Rule> {
        let mut parts: Vec<&str> = token.split(':').collect();
        let utility = parts.pop()?;
        let (negative, utility) = match utility.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, utility),
        };

        let mut screen = None;
        let mut pseudo = String::new();
        for variant in parts {
            if let Some(class) = pseudo_class(variant) {
                pseudo.push_str(class);
            } else if let Some((index, width)) = self.theme.screen(variant) {
                if screen.is_some() {
                    return None;
                }
                screen = Some((index, width.to_string()));
            } else {
                return None;
            }
        }

        let declarations = utilities::resolve(utility, negative, &self.theme)?;
        let selector = format!(".{}{pseudo}", escape_class(token));
        Some(Rule {
            screen,
            css: format!("{selector}{{{}}}", self.declaration_block(&declarations)),
        })
    }

    fn declaration_block(&self, declarations: &[Declaration]) -> String {
        let suffix = if self.important { " !important" } else { "" };
        declarations
            .iter()
            .map(|d| format!("{}:{}{suffix}", d.property, d.value))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl Default for AtomicSheet {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl StyleEngine for AtomicSheet {
    fn reset(&mut self) {
        self.rules.clear();
        self.seen.clear();
    }

    fn render(&mut self, markup: &str) {
        for value in class_attributes(markup) {
            let value = value.replace("&quot;", "\"").replace("&amp;", "&");
            for token in value.split_ascii_whitespace() {
                self.register(token);
            }
        }
    }

    fn style_tag(&self) -> String {
        format!("<style id=\"{STYLE_ELEMENT_ID}\">{}</style>", self.css())
    }
}

fn pseudo_class(variant: &str) -> Option<&'static str> {
    Some(match variant {
        "hover" => ":hover",
        "focus" => ":focus",
        "active" => ":active",
        "disabled" => ":disabled",
        "first" => ":first-child",
        "last" => ":last-child",
        _ => return None,
    })
}

/// Values of every `class="..."` / `class='...'` attribute in `markup`.
fn class_attributes(markup: &str) -> Vec<&str> {
    let mut values = Vec::new();
    let mut rest = markup;
    while let Some(index) = rest.find("class=") {
        let after = &rest[index + "class=".len()..];
        let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            rest = after;
            continue;
        };
        let body = &after[1..];
        let end = body.find(quote).unwrap_or(body.len());
        values.push(&body[..end]);
        rest = &body[end..];
    }
    values
}

/// Escape a class name for use in a CSS class selector.
fn escape_class(class: &str) -> String {
    let mut escaped = String::with_capacity(class.len() + 4);
    for (i, c) in class.chars().enumerate() {
        if i == 0 && c.is_ascii_digit() {
            escaped.push_str(&format!("\\3{c} "));
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            escaped.push(c);
        } else {
            escaped.push('\\');
            escaped.push(c);
        }
    }
    escaped
}
