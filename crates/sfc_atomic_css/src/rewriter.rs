//! Export rewriting.
//!
//! A compiled component module ends in one of two default exports:
//!
//! ```js
//! export default _sfc_main;
//! export default /* @__PURE__ */ _export_sfc(_sfc_main, [["render", _sfc_render]]);
//! ```
//!
//! Both are rewritten into the second form with a leading `"styles"` pair
//! carrying the synthesized sheet. Only the export statement (first form) or
//! the metadata list (second form) is overwritten; the rest of the module is
//! copied through untouched.

use oxc_ast::AstKind;
use oxc_ast::ast::*;
use oxc_ast_visit::{Visit, walk};
use oxc_span::{GetSpan, Span};

use crate::error::TransformError;
use crate::escape::{escape_double_quotes, template_literal};
use crate::options::TransformOptions;
use crate::patcher::SourcePatcher;

const STYLES_KEY: &str = "styles";

/// The default export of a module, in one of the recognised shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportDescriptor {
    /// `export default <name>;`
    BareIdentifier { span: Span, name: String },
    /// `export default <helper>(<component>, [<entries>])`. `span` covers
    /// the metadata list.
    WrappedCall { span: Span, entries: Vec<MetadataEntry> },
}

/// One `[key, value]` pair of the metadata list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub key: String,
    /// The key literal as written, quotes and escapes included.
    pub key_span: Span,
    pub value: EntryValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    /// Elements of a `"styles"` array, forwarded verbatim.
    Styles(Vec<Span>),
    /// Any other value, forwarded verbatim.
    Opaque(Span),
}

/// Rewrites the default export of one module to carry its styles.
pub struct ExportRewriter<'s, 'o> {
    patcher: SourcePatcher<'s>,
    export_helper: &'o str,
    export_helper_source: &'o str,
    export: Option<Result<ExportDescriptor, TransformError>>,
}

impl<'s, 'o> ExportRewriter<'s, 'o> {
    pub fn new(source_text: &'s str, options: &'o TransformOptions) -> Self {
        Self {
            patcher: SourcePatcher::new(source_text),
            export_helper: options.get_export_helper(),
            export_helper_source: options.get_export_helper_source(),
            export: None,
        }
    }

    /// Walk `program`, then patch its default export to embed `styles`.
    ///
    /// A module without a default export comes back unchanged.
    pub fn rewrite(
        mut self,
        program: &Program<'_>,
        styles: &str,
    ) -> Result<SourcePatcher<'s>, TransformError> {
        self.visit_program(program);
        match self.export.take() {
            None => {
                tracing::debug!("no default export, module left unchanged");
                Ok(self.patcher)
            }
            Some(Err(error)) => Err(error),
            Some(Ok(descriptor)) => {
                self.apply(&descriptor, styles)?;
                Ok(self.patcher)
            }
        }
    }

    fn apply(
        &mut self,
        descriptor: &ExportDescriptor,
        styles: &str,
    ) -> Result<(), TransformError> {
        match descriptor {
            ExportDescriptor::BareIdentifier { span, name } => {
                tracing::debug!(component = %name, "rewriting bare default export");
                let helper = self.export_helper;
                let statement = format!(
                    "import {helper} from \"{}\";\n\
                     export default /* @__PURE__ */ {helper}({name}, [[\"{STYLES_KEY}\", [{}]]]);",
                    escape_double_quotes(self.export_helper_source),
                    template_literal(styles),
                );
                self.patcher.overwrite_span(*span, statement)?;
            }
            ExportDescriptor::WrappedCall { span, entries } => {
                tracing::debug!(entries = entries.len(), "rewriting wrapped default export");
                let list = self.metadata_list(entries, styles)?;
                self.patcher.overwrite_span(*span, list)?;
            }
        }
        Ok(())
    }

    /// `[["styles", [<new>, <forwarded>...]], [<key>, <value>]...]`
    fn metadata_list(
        &self,
        entries: &[MetadataEntry],
        styles: &str,
    ) -> Result<String, TransformError> {
        let mut style_elements = vec![template_literal(styles)];
        let mut pairs = Vec::with_capacity(entries.len());
        for entry in entries {
            match &entry.value {
                EntryValue::Styles(spans) => {
                    for span in spans {
                        style_elements.push(self.patcher.slice_span(*span)?);
                    }
                }
                EntryValue::Opaque(span) => pairs.push(format!(
                    "[{}, {}]",
                    self.patcher.slice_span(entry.key_span)?,
                    self.patcher.slice_span(*span)?
                )),
            }
        }
        pairs.insert(
            0,
            format!("[\"{STYLES_KEY}\", [{}]]", style_elements.join(", ")),
        );
        Ok(format!("[{}]", pairs.join(", ")))
    }

    fn describe(
        &self,
        declaration: &ExportDefaultDeclaration<'_>,
    ) -> Result<ExportDescriptor, TransformError> {
        match &declaration.declaration {
            ExportDefaultDeclarationKind::Identifier(ident) => {
                Ok(ExportDescriptor::BareIdentifier {
                    span: declaration.span,
                    name: ident.name.to_string(),
                })
            }
            ExportDefaultDeclarationKind::CallExpression(call) if self.is_export_helper(call) => {
                describe_wrapped_call(call)
            }
            other => Err(TransformError::UnsupportedExportShape { span: other.span() }),
        }
    }

    fn is_export_helper(&self, call: &CallExpression<'_>) -> bool {
        matches!(&call.callee, Expression::Identifier(callee) if callee.name == self.export_helper)
    }

    /// `export { x as default }` and `export * as default from "..."` also
    /// define the default export but cannot be rewritten in place.
    fn record_unsupported_default(&mut self, span: Span) {
        if self.export.is_none() {
            self.export = Some(Err(TransformError::UnsupportedExportShape { span }));
        }
    }
}

fn describe_wrapped_call(call: &CallExpression<'_>) -> Result<ExportDescriptor, TransformError> {
    let Some(Expression::ArrayExpression(list)) =
        call.arguments.get(1).and_then(Argument::as_expression)
    else {
        return Err(TransformError::MalformedMetadataEntry {
            span: call.span,
            reason: "expected an array of metadata entries as the second argument",
        });
    };

    let mut entries = Vec::with_capacity(list.elements.len());
    for element in &list.elements {
        let entry = match element {
            ArrayExpressionElement::Elision(_) => continue,
            ArrayExpressionElement::ArrayExpression(pair) => metadata_entry(pair)?,
            other => {
                return Err(TransformError::MalformedMetadataEntry {
                    span: other.span(),
                    reason: "expected a [key, value] pair",
                });
            }
        };
        entries.push(entry);
    }

    Ok(ExportDescriptor::WrappedCall {
        span: list.span,
        entries,
    })
}

fn metadata_entry(pair: &ArrayExpression<'_>) -> Result<MetadataEntry, TransformError> {
    let malformed = |reason| TransformError::MalformedMetadataEntry {
        span: pair.span,
        reason,
    };

    let [key, value] = pair.elements.as_slice() else {
        return Err(malformed("expected exactly two elements"));
    };
    let ArrayExpressionElement::StringLiteral(key) = key else {
        return Err(malformed("expected a string literal key"));
    };
    let Some(value) = value.as_expression() else {
        return Err(malformed("expected an expression value"));
    };

    let value = if key.value == STYLES_KEY {
        let Expression::ArrayExpression(styles) = value else {
            return Err(malformed("expected an array of styles"));
        };
        EntryValue::Styles(
            styles
                .elements
                .iter()
                .filter(|element| !matches!(element, ArrayExpressionElement::Elision(_)))
                .map(|element| element.span())
                .collect(),
        )
    } else {
        EntryValue::Opaque(value.span())
    };

    Ok(MetadataEntry {
        key: key.value.to_string(),
        key_span: key.span,
        value,
    })
}

impl<'a> Visit<'a> for ExportRewriter<'_, '_> {
    fn enter_node(&mut self, kind: AstKind<'a>) {
        let span = kind.span();
        self.patcher.add_sourcemap_location(span.start);
        self.patcher.add_sourcemap_location(span.end);
    }

    fn visit_export_default_declaration(&mut self, it: &ExportDefaultDeclaration<'a>) {
        if self.export.is_none() {
            self.export = Some(self.describe(it));
        }
        walk::walk_export_default_declaration(self, it);
    }

    fn visit_export_named_declaration(&mut self, it: &ExportNamedDeclaration<'a>) {
        if let Some(specifier) = it
            .specifiers
            .iter()
            .find(|specifier| specifier.exported.name() == "default")
        {
            self.record_unsupported_default(specifier.span);
        }
        walk::walk_export_named_declaration(self, it);
    }

    fn visit_export_all_declaration(&mut self, it: &ExportAllDeclaration<'a>) {
        if it
            .exported
            .as_ref()
            .is_some_and(|exported| exported.name() == "default")
        {
            self.record_unsupported_default(it.span);
        }
        walk::walk_export_all_declaration(self, it);
    }
}

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    use super::*;

    fn rewrite(source: &str, styles: &str) -> Result<String, TransformError> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert!(ret.errors.is_empty(), "Parse errors: {:?}", ret.errors);
        let options = TransformOptions::default();
        ExportRewriter::new(source, &options)
            .rewrite(&ret.program, styles)
            .map(|patcher| patcher.to_string())
    }

    #[test]
    fn test_bare_identifier() {
        let source = "const _sfc_main = {};\nexport default _sfc_main;\n";
        assert_eq!(
            rewrite(source, ".a{color:red}").unwrap(),
            "const _sfc_main = {};\nimport _export_sfc from \"plugin-vue:export-helper\";\nexport default /* @__PURE__ */ _export_sfc(_sfc_main, [[\"styles\", [`.a{color:red}`]]]);\n"
        );
    }

    #[test]
    fn test_wrapped_call_moves_styles_first() {
        let source = r#"export default /* @__PURE__ */ _export_sfc(_sfc_main, [["render", _sfc_render], ["styles", [_style_0]]]);"#;
        assert_eq!(
            rewrite(source, ".c{}").unwrap(),
            r#"export default /* @__PURE__ */ _export_sfc(_sfc_main, [["styles", [`.c{}`, _style_0]], ["render", _sfc_render]]);"#
        );
    }

    #[test]
    fn test_wrapped_call_keeps_other_entries_in_order() {
        let source = r#"export default _export_sfc(_sfc_main, [['render', _sfc_render], ['__scopeId', "data-v-1"], ["__file", "/src/A.vue"]]);"#;
        assert_eq!(
            rewrite(source, "").unwrap(),
            r#"export default _export_sfc(_sfc_main, [["styles", [``]], ['render', _sfc_render], ['__scopeId', "data-v-1"], ["__file", "/src/A.vue"]]);"#
        );
    }

    #[test]
    fn test_keys_are_copied_as_written() {
        let source = r"export default _export_sfc(_sfc_main, [['a\nb', 1], ['\u0063', 2]]);";
        let output = rewrite(source, "").unwrap();
        assert_eq!(
            output,
            r#"export default _export_sfc(_sfc_main, [["styles", [``]], ['a\nb', 1], ['\u0063', 2]]);"#
        );

        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, &output, SourceType::mjs()).parse();
        assert!(ret.errors.is_empty(), "Parse errors: {:?}", ret.errors);
    }

    #[test]
    fn test_multiple_styles_pairs_are_merged() {
        let source = r#"export default _export_sfc(_sfc_main, [["styles", [a]], ["render", r], ["styles", [b, c]]]);"#;
        assert_eq!(
            rewrite(source, "x").unwrap(),
            r#"export default _export_sfc(_sfc_main, [["styles", [`x`, a, b, c]], ["render", r]]);"#
        );
    }

    #[test]
    fn test_styles_are_escaped() {
        let source = "export default _sfc_main";
        let output = rewrite(source, ".hover\\:x:hover{content:\"`${a}`\"}").unwrap();
        assert!(output.ends_with(
            "[[\"styles\", [`.hover\\\\:x:hover{content:\"\\`\\${a}\\`\"}`]]]);"
        ));
    }

    #[test]
    fn test_no_default_export() {
        let source = "export const a = 1;\nexport { a as b };\n";
        assert_eq!(rewrite(source, ".a{}").unwrap(), source);
    }

    #[test]
    fn test_unsupported_shape() {
        let source = "export default someFunctionCall();";
        let error = rewrite(source, "").unwrap_err();
        assert!(matches!(
            error,
            TransformError::UnsupportedExportShape { span } if span == Span::new(15, 33)
        ));

        let source = "export default { name: 'Inline' };";
        assert!(matches!(
            rewrite(source, "").unwrap_err(),
            TransformError::UnsupportedExportShape { .. }
        ));
    }

    #[test]
    fn test_default_export_specifiers_are_unsupported() {
        let source = "const _sfc_main = {};\nexport { _sfc_main as default };\n";
        let error = rewrite(source, ".p-4{}").unwrap_err();
        assert!(matches!(
            error,
            TransformError::UnsupportedExportShape { span } if span == Span::new(31, 51)
        ));

        for source in [
            "export { default } from \"./Other.vue\";",
            "export { Foo as default, bar } from \"./Other.vue\";",
            "export * as default from \"./Other.vue\";",
        ] {
            assert!(
                matches!(
                    rewrite(source, ""),
                    Err(TransformError::UnsupportedExportShape { .. })
                ),
                "{source}"
            );
        }
    }

    #[test]
    fn test_malformed_entries() {
        let cases = [
            "export default _export_sfc(_sfc_main);",
            "export default _export_sfc(_sfc_main, list);",
            r#"export default _export_sfc(_sfc_main, [["render"]]);"#,
            r#"export default _export_sfc(_sfc_main, [["render", r, x]]);"#,
            r#"export default _export_sfc(_sfc_main, [[render, r]]);"#,
            r#"export default _export_sfc(_sfc_main, ["render"]);"#,
            r#"export default _export_sfc(_sfc_main, [["styles", _style_0]]);"#,
            r#"export default _export_sfc(_sfc_main, [...pairs]);"#,
        ];
        for source in cases {
            assert!(
                matches!(
                    rewrite(source, ""),
                    Err(TransformError::MalformedMetadataEntry { .. })
                ),
                "{source}"
            );
        }
    }

    #[test]
    fn test_custom_helper() {
        let source = "export default _sfc_main;";
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        let options = TransformOptions::default()
            .with_export_helper("_wrap")
            .with_export_helper_source("virtual:wrap");
        let output = ExportRewriter::new(source, &options)
            .rewrite(&ret.program, "")
            .unwrap()
            .to_string();
        assert_eq!(
            output,
            "import _wrap from \"virtual:wrap\";\nexport default /* @__PURE__ */ _wrap(_sfc_main, [[\"styles\", [``]]]);"
        );

        // `_export_sfc` is not the configured helper, so this is not a wrapped call.
        let source = "export default _export_sfc(_sfc_main, []);";
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert!(matches!(
            ExportRewriter::new(source, &options).rewrite(&ret.program, ""),
            Err(TransformError::UnsupportedExportShape { .. })
        ));
    }
}
