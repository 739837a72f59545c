//! Atomic CSS for compiled single-file components.
//!
//! Takes the JavaScript a component compiler produced for one component,
//! finds every class name its render code can apply, generates the matching
//! atomic stylesheet and embeds it in the component's default export:
//!
//! ```js
//! // input
//! const _sfc_main = { /* ... */ };
//! function _sfc_render(_ctx, _cache) {
//!   return (_openBlock(), _createElementBlock("div", { class: "p-4 text-2xl" }))
//! }
//! export default /* @__PURE__ */ _export_sfc(_sfc_main, [["render", _sfc_render]]);
//!
//! // output
//! export default /* @__PURE__ */ _export_sfc(_sfc_main, [["styles", [`.p-4{padding:1rem}...`]], ["render", _sfc_render]]);
//! ```
//!
//! The module is patched in place (see [`SourcePatcher`]), so everything but
//! the rewritten export is preserved byte for byte and a sourcemap back to the
//! input can be produced.
//!
//! ## Stages
//!
//! 1. [`extract_class_names`] walks the AST.
//! 2. [`StyleSynthesizer`] drives a [`StyleEngine`] ([`AtomicSheet`] is built in).
//! 3. [`ExportRewriter`] patches the default export.

mod atomic;
mod diagnostic;
mod error;
mod escape;
mod extractor;
mod filter;
mod options;
mod patcher;
mod result;
mod rewriter;
mod synthesizer;

pub use atomic::{
    AtomicSheet, ColorValue, EngineConfig, STYLE_ELEMENT_ID, Theme, ThemeConfig, ThemeExtension,
};
pub use diagnostic::{Diagnostic, DiagnosticLabel};
pub use error::TransformError;
pub use extractor::{ClassNameExtractor, extract_class_names};
pub use filter::{
    DEFAULT_EMITTED_FILE_NAME, DEFAULT_INCLUDE, FileFilter, FilterOptions, asset_file_name,
};
pub use options::{OutputMode, TransformOptions};
pub use patcher::{PatchError, SourcePatcher};
pub use result::TransformResult;
pub use rewriter::{EntryValue, ExportDescriptor, ExportRewriter, MetadataEntry};
pub use synthesizer::{StyleEngine, StyleSynthesizer};

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_parser::Parser;
use oxc_span::SourceType;

/// Transform one parsed module.
///
/// `program` must be the AST of `source_text`. The engine is reset before
/// use, so one engine can serve any number of modules in sequence.
///
/// # Errors
///
/// Fails if the default export has an unsupported shape or a malformed
/// metadata list. No output is produced for the module in that case.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(filename = options.get_filename(), mode = ?options.mode)
)]
pub fn transform<E: StyleEngine + ?Sized>(
    source_text: &str,
    program: &Program<'_>,
    engine: &mut E,
    options: &TransformOptions,
) -> Result<TransformResult, TransformError> {
    let class_names = extract_class_names(program, options.get_normalize_class_helper());
    let styles = StyleSynthesizer::new(engine)
        .with_minify(options.minify)
        .synthesize(&class_names);

    if options.mode == OutputMode::Emit {
        return Ok(TransformResult {
            code: source_text.to_string(),
            map: None,
            styles,
            class_names,
        });
    }

    let patcher = ExportRewriter::new(source_text, options).rewrite(program, &styles)?;
    let map = (options.sourcemap && patcher.has_changes())
        .then(|| patcher.generate_map(options.get_filename()).to_json_string());

    Ok(TransformResult {
        code: patcher.to_string(),
        map,
        styles,
        class_names,
    })
}

/// Parse `source_text` as an ES module and [`transform`] it.
///
/// # Errors
///
/// Fails with [`TransformError::Parse`] if the source does not parse, and
/// otherwise as [`transform`] does.
pub fn transform_source<E: StyleEngine + ?Sized>(
    source_text: &str,
    engine: &mut E,
    options: &TransformOptions,
) -> Result<TransformResult, TransformError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source_text, SourceType::mjs()).parse();
    if !ret.errors.is_empty() {
        return Err(TransformError::Parse(
            ret.errors
                .iter()
                .map(|error| Diagnostic::from_oxc(source_text, error))
                .collect(),
        ));
    }
    transform(source_text, &ret.program, engine, options)
}
