//! Style synthesis on top of an atomic CSS engine.
//!
//! Engines accumulate rules across renders, so every synthesis starts with a
//! reset. [`StyleSynthesizer`] owns that ordering: reset, render a throwaway
//! `<div class="...">`, then read the sheet back and strip its `<style>` tags.

use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, StyleSheet};

/// An atomic CSS engine with mutable rule-accumulation state.
pub trait StyleEngine {
    /// Drop every rule registered so far.
    fn reset(&mut self);

    /// Register rules for every class token found in `markup`.
    fn render(&mut self, markup: &str);

    /// The accumulated sheet, wrapped in a `<style>` element.
    fn style_tag(&self) -> String;
}

/// Turns class names into the stylesheet text for one module.
pub struct StyleSynthesizer<'e, E: StyleEngine + ?Sized> {
    engine: &'e mut E,
    minify: bool,
}

impl<'e, E: StyleEngine + ?Sized> StyleSynthesizer<'e, E> {
    pub fn new(engine: &'e mut E) -> Self {
        Self {
            engine,
            minify: false,
        }
    }

    /// Re-print the generated sheet minified.
    #[must_use]
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Generate the CSS for a space-separated list of class names.
    pub fn synthesize(&mut self, class_names: &str) -> String {
        self.engine.reset();
        let attribute = class_names.replace('&', "&amp;").replace('"', "&quot;");
        self.engine.render(&format!("<div class=\"{attribute}\"></div>"));
        let styles = strip_style_tag(&self.engine.style_tag());
        let styles = if self.minify { minify_css(&styles) } else { styles };
        tracing::trace!(bytes = styles.len(), "synthesized stylesheet");
        styles
    }
}

/// Remove the `<style ...>` opening tag and `</style>` closing tag an engine
/// wraps its sheet in.
fn strip_style_tag(tag: &str) -> String {
    let mut css = tag.trim();
    if let Some(rest) = css.strip_prefix("<style")
        && let Some(open_end) = rest.find('>')
    {
        css = &rest[open_end + 1..];
    }
    css.strip_suffix("</style>").unwrap_or(css).to_string()
}

/// Minify a stylesheet, returning it unchanged if it does not parse.
fn minify_css(css: &str) -> String {
    let Ok(mut stylesheet) = StyleSheet::parse(css, ParserOptions::default()) else {
        return css.to_string();
    };
    if stylesheet.minify(MinifyOptions::default()).is_err() {
        return css.to_string();
    }
    stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_or_else(|_| css.to_string(), |result| result.code)
}
