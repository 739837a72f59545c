//! Module id filtering and emitted asset naming.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Default include pattern: custom-element single-file components.
pub const DEFAULT_INCLUDE: &str = "**/*.ce.vue";

/// Default pattern for emitted stylesheet names.
pub const DEFAULT_EMITTED_FILE_NAME: &str = "[name].[ext]";

/// Which module ids are transformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            include: vec![DEFAULT_INCLUDE.to_string()],
            exclude: Vec::new(),
        }
    }
}

/// Compiled include/exclude globs.
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: GlobSet,
    exclude: GlobSet,
}

impl FileFilter {
    pub fn new(options: &FilterOptions) -> Result<Self, globset::Error> {
        Ok(Self {
            include: build_set(&options.include)?,
            exclude: build_set(&options.exclude)?,
        })
    }

    /// Whether `id` matches some include pattern and no exclude pattern.
    ///
    /// Query strings (`App.ce.vue?vue&type=style`) are not stripped, so
    /// virtual sub-modules do not match `*.vue` patterns.
    pub fn matches(&self, id: &str) -> bool {
        self.include.is_match(id) && !self.exclude.is_match(id)
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
    }
    builder.build()
}

/// Name of the stylesheet asset emitted for module `id`.
///
/// The basename of `id` is split on `.`; `[name]` is replaced by the first
/// part and `[ext]` by the second, then `.css` is appended:
/// `src/Button.ce.vue` with `[name].[ext]` gives `Button.ce.css`.
pub fn asset_file_name(id: &str, pattern: &str) -> String {
    let basename = id.rsplit(['/', '\\']).next().unwrap_or(id);
    let mut parts = basename.split('.');
    let name = parts.next().unwrap_or_default();
    let ext = parts.next().unwrap_or_default();
    format!("{}.css", pattern.replace("[name]", name).replace("[ext]", ext))
}
