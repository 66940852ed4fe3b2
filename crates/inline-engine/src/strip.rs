//! In-process TypeScript type stripping.
//!
//! Parses a segment with the swc TypeScript parser and blanks out every
//! erasable type-level construct: annotations, type parameters, interfaces,
//! type aliases, `as`/`satisfies` casts, type-only imports and exports, and
//! TS-only modifiers. Erased spans are overwritten with spaces (newlines are
//! kept), so everything the stripper does not touch survives byte-for-byte
//! and the output has the same length and line structure as the input.
//!
//! Constructs that need real code generation — enums, non-ambient
//! namespaces, parameter properties, decorators, abstract classes,
//! `export =` — are rejected with an error instead of producing wrong
//! output.

use crate::error::EngineError;
use crate::SwcOptions;
use std::sync::Arc;
use swc_common::{BytePos, SourceMap, Span, Spanned};
use swc_ecma_ast as ast;
use swc_ecma_parser::{parse_file_as_module, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};

pub(crate) fn strip_types(source: &str, opts: &SwcOptions) -> Result<String, EngineError> {
    let cm: Arc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        swc_common::FileName::Custom("_.ts".into()).into(),
        source.to_string(),
    );

    let mut recovered = Vec::new();
    let module = parse_file_as_module(
        &fm,
        Syntax::Typescript(TsSyntax {
            tsx: opts.tsx,
            ..Default::default()
        }),
        ast::EsVersion::Es2022,
        None,
        &mut recovered,
    )
    .map_err(|e| EngineError::Parse(format!("{:?}", e)))?;

    if let Some(e) = recovered.into_iter().next() {
        return Err(EngineError::Parse(format!("{:?}", e)));
    }

    let mut eraser = Eraser {
        base: fm.start_pos,
        src: source,
        ranges: Vec::new(),
        unsupported: None,
    };
    module.visit_with(&mut eraser);

    if let Some(what) = eraser.unsupported {
        return Err(EngineError::UnsupportedSyntax(what));
    }

    Ok(blank(source, &eraser.ranges))
}

/// Overwrites every range with spaces, keeping line breaks in place.
fn blank(source: &str, ranges: &[(usize, usize)]) -> String {
    if ranges.is_empty() {
        return source.to_string();
    }

    let mut bytes = source.as_bytes().to_vec();
    for &(lo, hi) in ranges {
        let hi = hi.min(bytes.len());
        for b in &mut bytes[lo..hi] {
            if *b != b'\n' && *b != b'\r' {
                *b = b' ';
            }
        }
    }
    // Blanked bytes are ASCII; the buffer stays valid UTF-8.
    String::from_utf8_lossy(&bytes).into_owned()
}

/// TS-only member and declaration modifiers. `static`, `async`, `get` and
/// `set` are runtime keywords and stay.
const TS_MODIFIERS: &[&str] = &[
    "declare",
    "readonly",
    "private",
    "protected",
    "public",
    "abstract",
    "override",
];

fn is_ident_byte(b: u8) -> bool {
    b == b'_' || b == b'$' || b.is_ascii_alphanumeric()
}

struct Eraser<'a> {
    base: BytePos,
    src: &'a str,
    ranges: Vec<(usize, usize)>,
    unsupported: Option<String>,
}

impl Eraser<'_> {
    fn lo(&self, span: Span) -> usize {
        (span.lo.0 - self.base.0) as usize
    }

    fn hi(&self, span: Span) -> usize {
        (span.hi.0 - self.base.0) as usize
    }

    fn erase(&mut self, span: Span) {
        self.erase_between(self.lo(span), self.hi(span));
    }

    fn erase_between(&mut self, lo: usize, hi: usize) {
        if lo < hi {
            self.ranges.push((lo, hi));
        }
    }

    /// Erases a type annotation, extending backwards over whitespace to the
    /// introducing `:` when the span does not already cover it.
    fn erase_type_ann(&mut self, span: Span) {
        let mut lo = self.lo(span);
        let head = self.src[..lo].trim_end();
        if head.ends_with(':') {
            lo = head.len() - 1;
        }
        self.erase_between(lo, self.hi(span));
    }

    /// Erases a single marker character (`?` or `!`) directly after `pos`,
    /// skipping whitespace.
    fn erase_char_after(&mut self, pos: usize, ch: char) {
        let rest = &self.src[pos..];
        let trimmed = rest.trim_start();
        if trimmed.starts_with(ch) {
            let at = pos + (rest.len() - trimmed.len());
            self.erase_between(at, at + ch.len_utf8());
        }
    }

    /// Erases a comma-separated list item together with one adjacent comma.
    fn erase_list_item(&mut self, span: Span) {
        let lo = self.lo(span);
        let hi = self.hi(span);

        let rest = &self.src[hi..];
        let trimmed = rest.trim_start();
        if trimmed.starts_with(',') {
            let comma = hi + (rest.len() - trimmed.len());
            self.erase_between(lo, comma + 1);
            return;
        }

        let head = self.src[..lo].trim_end();
        if head.ends_with(',') {
            self.erase_between(head.len() - 1, hi);
        } else {
            self.erase_between(lo, hi);
        }
    }

    /// Blanks TS-only modifier keywords appearing between `lo` and `hi`
    /// (the stretch before a member's key).
    fn erase_modifiers(&mut self, lo: usize, hi: usize) {
        if lo >= hi {
            return;
        }
        let region = &self.src[lo..hi];
        let bytes = region.as_bytes();
        for word in TS_MODIFIERS {
            let mut from = 0;
            while let Some(idx) = region[from..].find(word) {
                let at = from + idx;
                let end = at + word.len();
                let before_ok = at == 0 || !is_ident_byte(bytes[at - 1]);
                let after_ok = end >= bytes.len() || !is_ident_byte(bytes[end]);
                if before_ok && after_ok {
                    self.erase_between(lo + at, lo + end);
                }
                from = end;
            }
        }
    }

    fn flag_unsupported(&mut self, what: &str) {
        if self.unsupported.is_none() {
            self.unsupported = Some(what.to_string());
        }
    }
}

/// Whether a declaration is ambient or an overload signature, i.e. erased
/// wholesale.
fn is_type_only_decl(decl: &ast::Decl) -> bool {
    match decl {
        ast::Decl::TsInterface(_) | ast::Decl::TsTypeAlias(_) => true,
        ast::Decl::Var(var) => var.declare,
        ast::Decl::Fn(f) => f.declare || f.function.body.is_none(),
        ast::Decl::Class(c) => c.declare,
        ast::Decl::TsEnum(e) => e.declare,
        ast::Decl::TsModule(m) => m.declare,
        _ => false,
    }
}

impl Visit for Eraser<'_> {
    fn visit_module_item(&mut self, item: &ast::ModuleItem) {
        use ast::{ModuleDecl, ModuleItem};
        match item {
            ModuleItem::ModuleDecl(decl) => match decl {
                ModuleDecl::Import(import) if import.type_only => self.erase(import.span),
                ModuleDecl::ExportNamed(named) if named.type_only => self.erase(named.span),
                ModuleDecl::ExportDecl(export) if is_type_only_decl(&export.decl) => {
                    self.erase(export.span)
                }
                ModuleDecl::ExportDefaultDecl(export) => match &export.decl {
                    ast::DefaultDecl::TsInterfaceDecl(_) => self.erase(export.span),
                    ast::DefaultDecl::Fn(f) if f.function.body.is_none() => self.erase(export.span),
                    _ => item.visit_children_with(self),
                },
                ModuleDecl::TsImportEquals(_) => self.flag_unsupported("import = require(...)"),
                ModuleDecl::TsExportAssignment(_) => self.flag_unsupported("export = ..."),
                ModuleDecl::TsNamespaceExport(_) => self.flag_unsupported("export as namespace"),
                _ => item.visit_children_with(self),
            },
            ModuleItem::Stmt(_) => item.visit_children_with(self),
        }
    }

    fn visit_stmt(&mut self, stmt: &ast::Stmt) {
        if let ast::Stmt::Decl(decl) = stmt {
            if is_type_only_decl(decl) {
                self.erase(stmt.span());
                return;
            }
        }
        stmt.visit_children_with(self);
    }

    fn visit_ts_type_ann(&mut self, n: &ast::TsTypeAnn) {
        self.erase_type_ann(n.span);
    }

    fn visit_ts_type_param_decl(&mut self, n: &ast::TsTypeParamDecl) {
        self.erase(n.span);
    }

    fn visit_ts_type_param_instantiation(&mut self, n: &ast::TsTypeParamInstantiation) {
        self.erase(n.span);
    }

    fn visit_ts_as_expr(&mut self, n: &ast::TsAsExpr) {
        self.erase_between(self.hi(n.expr.span()), self.hi(n.span));
        n.expr.visit_with(self);
    }

    fn visit_ts_satisfies_expr(&mut self, n: &ast::TsSatisfiesExpr) {
        self.erase_between(self.hi(n.expr.span()), self.hi(n.span));
        n.expr.visit_with(self);
    }

    fn visit_ts_const_assertion(&mut self, n: &ast::TsConstAssertion) {
        self.erase_between(self.hi(n.expr.span()), self.hi(n.span));
        n.expr.visit_with(self);
    }

    fn visit_ts_non_null_expr(&mut self, n: &ast::TsNonNullExpr) {
        self.erase_between(self.hi(n.expr.span()), self.hi(n.span));
        n.expr.visit_with(self);
    }

    fn visit_ts_type_assertion(&mut self, n: &ast::TsTypeAssertion) {
        self.erase_between(self.lo(n.span), self.lo(n.expr.span()));
        n.expr.visit_with(self);
    }

    fn visit_ts_instantiation(&mut self, n: &ast::TsInstantiation) {
        self.erase_between(self.hi(n.expr.span()), self.hi(n.span));
        n.expr.visit_with(self);
    }

    fn visit_ident(&mut self, n: &ast::Ident) {
        if n.optional {
            self.erase_char_after(self.hi(n.span), '?');
        }
    }

    fn visit_var_declarator(&mut self, n: &ast::VarDeclarator) {
        if n.definite {
            if let ast::Pat::Ident(binding) = &n.name {
                self.erase_char_after(self.hi(binding.id.span), '!');
            }
        }
        n.visit_children_with(self);
    }

    fn visit_param(&mut self, n: &ast::Param) {
        // A `this` parameter has no runtime counterpart; drop it with its
        // trailing comma rather than leaving a bare `this` binding behind.
        if let ast::Pat::Ident(binding) = &n.pat {
            if &*binding.id.sym == "this" {
                self.erase_list_item(n.span);
                return;
            }
        }
        n.visit_children_with(self);
    }

    fn visit_import_decl(&mut self, n: &ast::ImportDecl) {
        // Whole type-only imports are erased at the module item level.
        for spec in &n.specifiers {
            if let ast::ImportSpecifier::Named(named) = spec {
                if named.is_type_only {
                    self.erase_list_item(named.span);
                }
            }
        }
    }

    fn visit_named_export(&mut self, n: &ast::NamedExport) {
        for spec in &n.specifiers {
            if let ast::ExportSpecifier::Named(named) = spec {
                if named.is_type_only {
                    self.erase_list_item(named.span);
                }
            }
        }
    }

    fn visit_class(&mut self, n: &ast::Class) {
        if n.is_abstract {
            self.flag_unsupported("abstract classes");
            return;
        }
        if let (Some(first), Some(last)) = (n.implements.first(), n.implements.last()) {
            let first_lo = self.lo(first.span());
            let last_hi = self.hi(last.span());
            if let Some(kw) = self.src[..first_lo].rfind("implements") {
                self.erase_between(kw, last_hi);
            }
        }
        n.visit_children_with(self);
    }

    fn visit_class_member(&mut self, n: &ast::ClassMember) {
        use ast::ClassMember;
        match n {
            ClassMember::TsIndexSignature(sig) => self.erase(sig.span),
            ClassMember::Method(m) => {
                if m.is_abstract {
                    self.flag_unsupported("abstract members");
                    return;
                }
                if m.function.body.is_none() {
                    // Overload signature.
                    self.erase(m.span);
                    return;
                }
                self.erase_modifiers(self.lo(m.span), self.lo(m.key.span()));
                if m.is_optional {
                    self.erase_char_after(self.hi(m.key.span()), '?');
                }
                n.visit_children_with(self);
            }
            ClassMember::ClassProp(p) => {
                if p.is_abstract {
                    self.flag_unsupported("abstract members");
                    return;
                }
                if p.declare {
                    self.erase(p.span);
                    return;
                }
                self.erase_modifiers(self.lo(p.span), self.lo(p.key.span()));
                if p.is_optional {
                    self.erase_char_after(self.hi(p.key.span()), '?');
                }
                if p.definite {
                    self.erase_char_after(self.hi(p.key.span()), '!');
                }
                n.visit_children_with(self);
            }
            ClassMember::PrivateProp(p) => {
                self.erase_modifiers(self.lo(p.span), self.lo(p.key.span));
                if p.is_optional {
                    self.erase_char_after(self.hi(p.key.span), '?');
                }
                if p.definite {
                    self.erase_char_after(self.hi(p.key.span), '!');
                }
                n.visit_children_with(self);
            }
            ClassMember::PrivateMethod(m) => {
                if m.function.body.is_none() {
                    self.erase(m.span);
                    return;
                }
                self.erase_modifiers(self.lo(m.span), self.lo(m.key.span));
                n.visit_children_with(self);
            }
            ClassMember::Constructor(ctor) => {
                for param in &ctor.params {
                    if matches!(param, ast::ParamOrTsParamProp::TsParamProp(_)) {
                        self.flag_unsupported("constructor parameter properties");
                        return;
                    }
                }
                n.visit_children_with(self);
            }
            _ => n.visit_children_with(self),
        }
    }

    fn visit_decorator(&mut self, _n: &ast::Decorator) {
        self.flag_unsupported("decorators");
    }

    fn visit_ts_enum_decl(&mut self, n: &ast::TsEnumDecl) {
        if !n.declare {
            self.flag_unsupported("enum declarations");
        }
    }

    fn visit_ts_module_decl(&mut self, n: &ast::TsModuleDecl) {
        if !n.declare && !n.global {
            self.flag_unsupported("namespace declarations");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strip(source: &str) -> String {
        strip_types(source, &SwcOptions::default()).unwrap()
    }

    fn squash(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_strips_variable_annotation() {
        let out = strip("const x: number = 1;");
        assert_eq!(squash(&out), "const x = 1;");
    }

    #[test]
    fn test_output_length_is_preserved() {
        let src = "const x: number = 1;\nlet y: string[] = [];\n";
        let out = strip(src);
        assert_eq!(out.len(), src.len());
        assert_eq!(out.lines().count(), src.lines().count());
    }

    #[test]
    fn test_strips_interface_and_type_alias() {
        let out = strip("interface Point { x: number }\ntype Id = string;\nconst p = { x: 1 };\n");
        assert!(!out.contains("interface"));
        assert!(!out.contains("type Id"));
        assert!(out.contains("const p = { x: 1 };"));
    }

    #[test]
    fn test_strips_function_signature_types() {
        let out = strip("function add<T>(a: number, b: number): number { return a + b; }");
        assert_eq!(squash(&out), "function add (a , b ) { return a + b; }");
    }

    #[test]
    fn test_strips_optional_parameter_marker() {
        let out = strip("function f(a?: string) { return a; }");
        assert_eq!(squash(&out), "function f(a ) { return a; }");
    }

    #[test]
    fn test_strips_this_parameter() {
        let out = strip("function f(this: Window, x: number) { return x; }");
        assert_eq!(squash(&out), "function f( x ) { return x; }");
    }

    #[test]
    fn test_strips_as_and_satisfies() {
        let out = strip("const a = 1 as number;\nconst b = { x: 1 } satisfies object;\n");
        assert!(!out.contains("as number"));
        assert!(!out.contains("satisfies"));
        assert!(out.contains("const a = 1"));
    }

    #[test]
    fn test_strips_non_null_and_definite() {
        let out = strip("let a!: number;\nconst b = a!;\n");
        assert!(!out.contains('!'));
        assert!(!out.contains("number"));
    }

    #[test]
    fn test_strips_call_type_arguments() {
        let out = strip("const xs = new Map<string, number>();");
        assert_eq!(squash(&out), "const xs = new Map ();");
    }

    #[test]
    fn test_strips_type_only_imports() {
        let src = "import type { A } from './a';\nimport { type B, c } from './b';\nc();\n";
        let out = strip(src);
        assert!(!out.contains("type"));
        assert!(!out.contains('A'));
        assert!(out.contains("from './b'"));
        assert!(out.contains("c()"));
    }

    #[test]
    fn test_keeps_value_imports_verbatim() {
        let src = "import widget from './widget.html'; void widget;\nconst n = 1;\n";
        let out = strip(src);
        assert!(out.contains("import widget from './widget.html';"));
        assert!(out.contains("void widget;"));
    }

    #[test]
    fn test_strips_class_modifiers_and_implements() {
        let src = "class C implements Base {\n  private count: number = 0;\n  readonly name = 'c';\n  get total(): number { return this.count; }\n}\n";
        let out = strip(src);
        assert!(!out.contains("implements"));
        assert!(!out.contains("private"));
        assert!(!out.contains("readonly"));
        assert!(!out.contains("number"));
        assert!(out.contains("get total"));
        assert!(out.contains("return this.count;"));
    }

    #[test]
    fn test_strips_declare_statements_and_overloads() {
        let src = "declare const w: number;\nfunction f(a: string): void;\nfunction f(a: unknown) {}\n";
        let out = strip(src);
        assert!(!out.contains("declare"));
        assert_eq!(squash(&out), "function f(a ) {}");
    }

    #[test]
    fn test_rejects_enum() {
        let err = strip_types("enum Color { Red }", &SwcOptions::default()).err();
        assert!(matches!(err, Some(EngineError::UnsupportedSyntax(_))));
    }

    #[test]
    fn test_rejects_namespace() {
        let err = strip_types("namespace N { export const x = 1; }", &SwcOptions::default()).err();
        assert!(matches!(err, Some(EngineError::UnsupportedSyntax(_))));
    }

    #[test]
    fn test_rejects_parameter_properties() {
        let err = strip_types(
            "class C { constructor(private x: number) {} }",
            &SwcOptions::default(),
        )
        .err();
        assert!(matches!(err, Some(EngineError::UnsupportedSyntax(_))));
    }

    #[test]
    fn test_rejects_decorators() {
        // Rejected either by the parser (decorators are off) or by the
        // eraser; both surface as a compile error.
        let err = strip_types("class C { @dec method() {} }", &SwcOptions::default()).err();
        assert!(err.is_some());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = strip_types("const x: = ;", &SwcOptions::default()).err();
        assert!(matches!(err, Some(EngineError::Parse(_))));
    }

    #[test]
    fn test_plain_javascript_passes_through() {
        let src = "const x = 1;\nconsole.log(x);\n";
        assert_eq!(strip(src), src);
    }
}
