//! Node.js binding: atomic CSS for compiled single-file components, shaped
//! as a bundler plugin.

mod error;

#[cfg(all(
    feature = "allocator",
    not(any(
        target_arch = "arm",
        target_os = "freebsd",
        target_os = "windows",
        target_family = "wasm"
    ))
))]
#[global_allocator]
static ALLOC: mimalloc_safe::MiMalloc = mimalloc_safe::MiMalloc;

use napi_derive::napi;

use crate::error::TransformErrorInfo;
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use sfc_atomic_css::{
    AtomicSheet, DEFAULT_EMITTED_FILE_NAME, EngineConfig, FileFilter, FilterOptions,
    TransformOptions, asset_file_name, transform,
};

pub const PLUGIN_NAME: &str = "sfc-atomic-css";

/// Where the generated stylesheet ends up.
#[napi(string_enum)]
pub enum OutputMode {
    /// Embed the stylesheet in the component's default export (default).
    #[napi(value = "inject")]
    Inject,
    /// Leave the module untouched and return the stylesheet as an asset.
    #[napi(value = "emit")]
    Emit,
}

/// Options for [`AtomicCssPlugin`].
#[napi(object)]
#[derive(Default)]
pub struct PluginOptions {
    /// Glob patterns of module ids to transform.
    /// Defaults to `["**/*.ce.vue"]`.
    pub include: Option<Vec<String>>,

    /// Glob patterns of module ids to skip, even if included.
    pub exclude: Option<Vec<String>>,

    /// Defaults to `"inject"`.
    #[napi(ts_type = "'inject' | 'emit'")]
    pub mode: Option<OutputMode>,

    /// Configuration of the atomic CSS engine, e.g.
    /// `{ important: true, theme: { extend: { colors: { brand: '#123456' } } } }`.
    #[napi(ts_type = "Record<string, unknown>")]
    pub engine_config: Option<serde_json::Value>,

    /// Name pattern of emitted stylesheets. `[name]` and `[ext]` are the
    /// first two dot-separated parts of the module's basename; `.css` is
    /// appended. Defaults to `"[name].[ext]"`.
    pub emitted_file_name: Option<String>,

    /// Generate a source map for injected output. Defaults to `true`.
    pub sourcemap: Option<bool>,

    /// Minify the generated stylesheet. Defaults to `false`.
    pub minify: Option<bool>,
}

/// A stylesheet to be written next to the bundle.
#[napi(object)]
pub struct Asset {
    pub file_name: String,
    pub source: String,
}

/// Result of transforming one module.
#[napi(object)]
pub struct TransformOutput {
    /// The module code. Empty when `errors` is not.
    pub code: String,
    /// Source map JSON for `code`, when one was generated.
    pub map: Option<String>,
    /// The stylesheet, in `"emit"` mode.
    pub asset: Option<Asset>,
    pub errors: Vec<TransformErrorInfo>,
}

impl TransformOutput {
    fn failed(errors: Vec<TransformErrorInfo>) -> Self {
        Self {
            code: String::new(),
            map: None,
            asset: None,
            errors,
        }
    }
}

/// One plugin instance. Owns its filter and its engine, so modules are
/// transformed one at a time per instance.
///
/// @example
/// ```javascript
/// import { AtomicCssPlugin } from '@sfc-atomic-css/binding';
///
/// const plugin = new AtomicCssPlugin({ mode: 'inject' });
/// const result = plugin.transform(code, '/src/Button.ce.vue');
/// if (result) console.log(result.code);
/// ```
#[napi]
pub struct AtomicCssPlugin {
    filter: FileFilter,
    engine: AtomicSheet,
    options: TransformOptions,
    emitted_file_name: String,
}

#[napi]
impl AtomicCssPlugin {
    #[napi(constructor)]
    pub fn new(options: Option<PluginOptions>) -> napi::Result<Self> {
        let options = options.unwrap_or_default();

        let mut filter_options = FilterOptions::default();
        if let Some(include) = options.include {
            filter_options.include = include;
        }
        if let Some(exclude) = options.exclude {
            filter_options.exclude = exclude;
        }
        let filter = FileFilter::new(&filter_options).map_err(|error| {
            napi::Error::from_reason(format!("invalid include/exclude pattern: {error}"))
        })?;

        let engine_config: EngineConfig = match options.engine_config {
            Some(value) => serde_json::from_value(value).map_err(|error| {
                napi::Error::from_reason(format!("invalid engine configuration: {error}"))
            })?,
            None => EngineConfig::default(),
        };

        let mode = match options.mode {
            Some(OutputMode::Emit) => sfc_atomic_css::OutputMode::Emit,
            _ => sfc_atomic_css::OutputMode::Inject,
        };

        Ok(Self {
            filter,
            engine: AtomicSheet::new(&engine_config),
            options: TransformOptions::new()
                .with_mode(mode)
                .with_sourcemap(options.sourcemap.unwrap_or(true))
                .with_minify(options.minify.unwrap_or(false)),
            emitted_file_name: options
                .emitted_file_name
                .unwrap_or_else(|| DEFAULT_EMITTED_FILE_NAME.to_string()),
        })
    }

    #[napi(getter)]
    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// Whether `id` would be transformed.
    #[napi]
    pub fn filter(&self, id: String) -> bool {
        self.filter.matches(&id)
    }

    /// Transform a compiled component module.
    ///
    /// Returns `null` for modules outside the include/exclude filter.
    #[napi]
    pub fn transform(&mut self, code: String, id: String) -> Option<TransformOutput> {
        if !self.filter.matches(&id) {
            return None;
        }
        Some(self.transform_impl(&code, &id))
    }
}

impl AtomicCssPlugin {
    fn transform_impl(&mut self, source_text: &str, id: &str) -> TransformOutput {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source_text, SourceType::mjs()).parse();
        if !ret.errors.is_empty() {
            return TransformOutput::failed(TransformErrorInfo::from_diagnostics(
                id,
                source_text,
                ret.errors,
            ));
        }

        let options = self.options.clone().with_filename(id);
        match transform(source_text, &ret.program, &mut self.engine, &options) {
            Ok(result) => {
                let asset = (options.mode == sfc_atomic_css::OutputMode::Emit).then(|| Asset {
                    file_name: asset_file_name(id, &self.emitted_file_name),
                    source: result.styles,
                });
                TransformOutput {
                    code: result.code,
                    map: result.map,
                    asset,
                    errors: Vec::new(),
                }
            }
            Err(error) => TransformOutput::failed(TransformErrorInfo::from_transform_error(
                id,
                source_text,
                &error,
            )),
        }
    }
}
