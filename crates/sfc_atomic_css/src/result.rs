//! Output of a module transform.

/// The transformed module and the stylesheet generated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    /// The module source. Unchanged in emit mode, and when the module has
    /// no default export.
    pub code: String,
    /// Source map JSON for `code`.
    ///
    /// `None` in emit mode, when nothing was rewritten, or when
    /// `TransformOptions::sourcemap` is `false`.
    pub map: Option<String>,
    /// The synthesized stylesheet, without `<style>` tags.
    pub styles: String,
    /// The class names found in the module, space separated, in discovery order.
    pub class_names: String,
}
