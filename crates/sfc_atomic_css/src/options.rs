//! Options for the transform.

/// What the transform returns to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Rewrite the module's default export to carry the generated styles (default).
    #[default]
    Inject,
    /// Leave the module untouched and hand the generated styles back to the
    /// caller, who persists them as a separate stylesheet asset.
    Emit,
}

/// Options for a single module transform.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// The module id or filename. Used as the sourcemap source path.
    pub filename: Option<String>,

    /// Whether the styles are injected into the module or only returned.
    pub mode: OutputMode,

    /// Whether to produce a sourcemap for injected output.
    pub sourcemap: bool,

    /// Name of the runtime helper that normalizes dynamic class bindings.
    /// Defaults to `"_normalizeClass"`.
    pub normalize_class_helper: Option<String>,

    /// Local name of the export augmentation helper.
    /// Defaults to `"_export_sfc"`.
    pub export_helper: Option<String>,

    /// Import specifier the export augmentation helper is loaded from.
    /// Defaults to `"plugin-vue:export-helper"`.
    pub export_helper_source: Option<String>,

    /// Whether to minify the synthesized stylesheet.
    pub minify: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            filename: None,
            mode: OutputMode::default(),
            sourcemap: true,
            normalize_class_helper: None,
            export_helper: None,
            export_helper_source: None,
            minify: false,
        }
    }
}

impl TransformOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the output mode.
    #[must_use]
    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable sourcemap generation.
    #[must_use]
    pub fn with_sourcemap(mut self, enabled: bool) -> Self {
        self.sourcemap = enabled;
        self
    }

    /// Set the name of the class normalization helper.
    #[must_use]
    pub fn with_normalize_class_helper(mut self, name: impl Into<String>) -> Self {
        self.normalize_class_helper = Some(name.into());
        self
    }

    /// Set the local name of the export augmentation helper.
    #[must_use]
    pub fn with_export_helper(mut self, name: impl Into<String>) -> Self {
        self.export_helper = Some(name.into());
        self
    }

    /// Set the import specifier of the export augmentation helper.
    #[must_use]
    pub fn with_export_helper_source(mut self, source: impl Into<String>) -> Self {
        self.export_helper_source = Some(source.into());
        self
    }

    /// Enable or disable stylesheet minification.
    #[must_use]
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Get the class normalization helper name, with default fallback.
    pub fn get_normalize_class_helper(&self) -> &str {
        self.normalize_class_helper
            .as_deref()
            .unwrap_or("_normalizeClass")
    }

    /// Get the export helper name, with default fallback.
    pub fn get_export_helper(&self) -> &str {
        self.export_helper.as_deref().unwrap_or("_export_sfc")
    }

    /// Get the export helper import specifier, with default fallback.
    pub fn get_export_helper_source(&self) -> &str {
        self.export_helper_source
            .as_deref()
            .unwrap_or("plugin-vue:export-helper")
    }

    /// Get the sourcemap source path, with default fallback.
    pub fn get_filename(&self) -> &str {
        self.filename.as_deref().unwrap_or("<stdin>")
    }
}
