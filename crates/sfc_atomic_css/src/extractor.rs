//! Class-name extraction.
//!
//! Walks a compiled component module and collects every class name that its
//! render code could apply. A class value is found wherever an object literal
//! has a property named `class`; from there the value is resolved by shape:
//!
//! - `"foo bar"`: the literal text.
//! - `` `foo ${x} bar` ``: every static chunk; interpolations are unknowable.
//! - `_normalizeClass(arg)`: `arg` is resolved in turn.
//! - `[a, b]`: every element is resolved in turn.
//! - `{ foo: cond }`: every key, whatever the condition evaluates to.
//! - `(expr)`: `expr`.
//!
//! Anything else contributes nothing.

use oxc_ast::ast::*;
use oxc_ast_visit::{Visit, walk};
use oxc_span::{GetSpan, Span};
use rustc_hash::FxHashSet;

/// Collect the class names of `program`, joined by single spaces in
/// discovery order.
pub fn extract_class_names(program: &Program<'_>, normalize_helper: &str) -> String {
    ClassNameExtractor::new(normalize_helper)
        .collect(program)
        .join(" ")
}

/// Depth-first walker that resolves class-bearing expressions.
///
/// Expressions waiting to be resolved are tracked by span in `pending`, so
/// the AST itself is never annotated.
pub struct ClassNameExtractor<'h> {
    normalize_helper: &'h str,
    pending: FxHashSet<Span>,
    class_names: Vec<String>,
}

impl<'h> ClassNameExtractor<'h> {
    pub fn new(normalize_helper: &'h str) -> Self {
        Self {
            normalize_helper,
            pending: FxHashSet::default(),
            class_names: Vec::new(),
        }
    }

    /// Run the walk and return the class names in discovery order.
    ///
    /// Duplicates are kept.
    pub fn collect(mut self, program: &Program<'_>) -> Vec<String> {
        self.visit_program(program);
        tracing::debug!(count = self.class_names.len(), "extracted class names");
        self.class_names
    }

    fn mark(&mut self, expr: &Expression<'_>) {
        self.pending.insert(expr.span());
    }

    fn resolve(&mut self, expr: &Expression<'_>) {
        match expr {
            Expression::StringLiteral(lit) => {
                if !lit.value.is_empty() {
                    self.class_names.push(lit.value.to_string());
                }
            }
            Expression::TemplateLiteral(template) => {
                for quasi in &template.quasis {
                    if let Some(cooked) = &quasi.value.cooked
                        && !cooked.is_empty()
                    {
                        self.class_names.push(cooked.to_string());
                    }
                }
            }
            Expression::CallExpression(call) if self.is_normalize_call(call) => {
                if let Some(first) = call.arguments.first().and_then(Argument::as_expression) {
                    self.mark(first);
                }
            }
            Expression::ArrayExpression(array) => {
                for element in &array.elements {
                    if let Some(element) = element.as_expression() {
                        self.mark(element);
                    }
                }
            }
            Expression::ObjectExpression(object) => {
                for property in &object.properties {
                    if let ObjectPropertyKind::ObjectProperty(property) = property
                        && let Some(name) = property.key.static_name()
                    {
                        self.class_names.push(name.into_owned());
                    }
                }
            }
            Expression::ParenthesizedExpression(paren) => self.mark(&paren.expression),
            _ => {}
        }
    }

    fn is_normalize_call(&self, call: &CallExpression<'_>) -> bool {
        matches!(
            call.callee.without_parentheses(),
            Expression::Identifier(ident) if ident.name == self.normalize_helper
        )
    }
}

impl<'a> Visit<'a> for ClassNameExtractor<'_> {
    fn visit_object_property(&mut self, it: &ObjectProperty<'a>) {
        if it.key.static_name().is_some_and(|name| name == "class") {
            self.mark(&it.value);
        }
        walk::walk_object_property(self, it);
    }

    fn visit_expression(&mut self, it: &Expression<'a>) {
        if self.pending.remove(&it.span()) {
            self.resolve(it);
        }
        walk::walk_expression(self, it);
    }
}

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    use super::*;

    fn collect(source: &str) -> Vec<String> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert!(ret.errors.is_empty(), "Parse errors: {:?}", ret.errors);
        ClassNameExtractor::new("_normalizeClass").collect(&ret.program)
    }

    #[test]
    fn test_no_class_properties() {
        let source = r#"const _sfc_main = { name: "Plain" };
export default _sfc_main;"#;
        assert!(collect(source).is_empty());
    }

    #[test]
    fn test_string_literal() {
        let source = r#"_createElementBlock("div", { class: "foo bar" });"#;
        assert_eq!(collect(source), vec!["foo bar"]);
    }

    #[test]
    fn test_string_key_named_class() {
        let source = r#"h("div", { "class": "a", className: "ignored" });"#;
        assert_eq!(collect(source), vec!["a"]);
    }

    #[test]
    fn test_empty_literal_is_skipped() {
        let source = r#"h("div", { class: "" }); h("p", { class: "x" });"#;
        assert_eq!(collect(source), vec!["x"]);
    }

    #[test]
    fn test_template_literal_static_chunks() {
        let source = r#"h("div", { class: `px-4 ${_ctx.size} text-sm` });"#;
        assert_eq!(collect(source), vec!["px-4 ", " text-sm"]);
    }

    #[test]
    fn test_array_and_conditional_object() {
        let source = r#"h("div", { class: _normalizeClass(['a', { b: _ctx.cond }]) });"#;
        assert_eq!(collect(source), vec!["a", "b"]);
    }

    #[test]
    fn test_nested_arrays_and_string_keys() {
        let source = r#"h("div", {
  class: _normalizeClass([['n1', { 'bg-red-200': _ctx.on, "text-lg": true }], `t1`])
});"#;
        assert_eq!(collect(source), vec!["n1", "bg-red-200", "text-lg", "t1"]);
    }

    #[test]
    fn test_parenthesized_values() {
        let source = r#"h("div", { class: ("p-4") });
h("span", { class: _normalizeClass([("a"), (({ b: _ctx.on }))]) });
h("p", { class: (_normalizeClass)(["c"]) });"#;
        assert_eq!(collect(source), vec!["p-4", "a", "b", "c"]);
    }

    #[test]
    fn test_other_call_is_not_resolved() {
        let source = r#"h("div", { class: computeClass(['a']) });"#;
        assert!(collect(source).is_empty());
    }

    #[test]
    fn test_unresolvable_shapes_contribute_nothing() {
        let source = r#"h("div", { class: _ctx.cls });
h("span", { class: _ctx.on ? "a" : "b" });
const cls = "x"; h("p", { class });"#;
        assert!(collect(source).is_empty());
    }

    #[test]
    fn test_union_in_traversal_order() {
        let source = r#"function _sfc_render(_ctx, _cache) {
  return (_openBlock(), _createElementBlock("div", { class: "p-4" }, [
    _createElementVNode("button", {
      class: _normalizeClass(['bg-green-200', { 'bg-yellow-200': _ctx.clicked }]),
      onClick: _cache[0] || (_cache[0] = $event => (_ctx.clicked = true))
    }, "Click", 2),
    _createElementVNode("span", { class: `text-2xl ${_ctx.extra}` }, null, 2)
  ]))
}"#;
        assert_eq!(
            collect(source),
            vec!["p-4", "bg-green-200", "bg-yellow-200", "text-2xl "]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let source = r#"h("a", { class: "x" }); h("b", { class: "x" });"#;
        assert_eq!(collect(source), vec!["x", "x"]);
    }

    #[test]
    fn test_custom_normalize_helper() {
        let allocator = Allocator::default();
        let source = r#"h("div", { class: normalizeClass(["a"]) });"#;
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert_eq!(extract_class_names(&ret.program, "normalizeClass"), "a");
        assert_eq!(extract_class_names(&ret.program, "_normalizeClass"), "");
    }

    #[test]
    fn test_joined_output() {
        let allocator = Allocator::default();
        let source = r#"h("div", { class: _normalizeClass(["a b", { c: x }]) });"#;
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert_eq!(extract_class_names(&ret.program, "_normalizeClass"), "a b c");
    }
}
