//! Scope tree construction and variable resolution

use glsltree::{DiagnosticKind, Error, NodeTag, ParseOptionsBuilder, ScopeId};
use pretty_assertions::assert_eq;

mod common;

#[test]
fn scopes_single_root() {
    let program = common::parse(
        r#"float g;
void f(float a) {
    for (int i = 0; i < 2; i++) {
        while (true) {
            { float x; }
        }
    }
    do { } while (false);
    switch (1) { default: break; }
}
float h(float b);
"#,
    );

    let roots: Vec<_> = program.scopes.iter().filter(|s| s.is_root()).collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].id, ScopeId::ROOT);
    assert_eq!(roots[0].name, "global");

    // Every scope reaches the root through its parents
    for scope in program.scopes.iter() {
        let last = program.scopes.ancestors(scope.id).last().map(|s| s.id);
        assert_eq!(last, Some(ScopeId::ROOT));
    }

    let names: Vec<_> = program.scopes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "global",
            "f",
            "for",
            "while",
            "compound statement",
            "do",
            "switch",
            "h"
        ]
    );
}

#[test]
fn scopes_declarations_are_registered() {
    let program = common::parse(
        r#"float g;
void f(float a) {
    for (int i = 0; i < 2; i++) { g += a; }
}
"#,
    );

    let root = program.root_scope();
    assert!(root.bindings.contains_key("g"));
    assert!(!root.bindings.contains_key("a"));

    let f = program
        .scopes
        .children(ScopeId::ROOT)
        .next()
        .expect("no function scope");
    assert_eq!(f.name, "f");
    assert!(f.bindings.contains_key("a"));

    let for_scope = program.scopes.children(f.id).next().expect("no for scope");
    assert_eq!(for_scope.name, "for");
    assert!(for_scope.bindings.contains_key("i"));

    // Declaration, assignment
    assert_eq!(root.bindings["g"].references.len(), 2);
    assert!(program.diagnostics.is_empty());
}

#[test]
fn scopes_shadowing() {
    let program = common::parse(
        r#"void main() {
    float x = 1.0;
    {
        float x = 2.0;
        x;
    }
    {
        x;
    }
}
"#,
    );

    let x = common::ids_of(&program.node, NodeTag::Identifier, "x");
    assert_eq!(x.len(), 4);

    let main = program
        .scopes
        .children(ScopeId::ROOT)
        .next()
        .expect("no main scope");
    let blocks: Vec<_> = program.scopes.children(main.id).collect();
    assert_eq!(blocks.len(), 2);

    // Inner declaration and the reference next to it
    let (scope, entry) = program
        .scopes
        .lookup_binding(blocks[0].id, "x")
        .expect("x not found");
    assert_eq!(scope.id, blocks[0].id);
    assert_eq!(entry.declaration, Some(x[1]));
    assert_eq!(entry.references, vec![x[1], x[2]]);

    // The sibling block sees the outer declaration
    let (scope, entry) = program
        .scopes
        .lookup_binding(blocks[1].id, "x")
        .expect("x not found");
    assert_eq!(scope.id, main.id);
    assert_eq!(entry.declaration, Some(x[0]));
    assert_eq!(entry.references, vec![x[0], x[3]]);

    assert!(blocks[1].bindings.is_empty());
    assert!(program.diagnostics.is_empty());
}

#[test]
fn scopes_duplicate_variable() {
    let program = common::parse_quiet("int x;\nint x;\n");
    let x = common::ids_of(&program.node, NodeTag::Identifier, "x");

    let root = program.root_scope();
    assert_eq!(root.bindings.len(), 1);
    assert_eq!(root.bindings["x"].declaration, Some(x[0]));
    assert_eq!(root.bindings["x"].references, x);

    assert_eq!(program.diagnostics.len(), 1);
    assert_eq!(program.diagnostics[0].kind, DiagnosticKind::DuplicateVariable);
    assert_eq!(program.diagnostics[0].node, x[1]);
}

#[test]
fn scopes_duplicate_variable_strict() {
    common::init_logger();

    let options = ParseOptionsBuilder::default()
        .fail_on_warn(true)
        .build()
        .unwrap();

    match glsltree::parse("int x;\nint x;\n", &options) {
        Err(Error::Diagnostic(diagnostic)) => {
            assert_eq!(diagnostic.kind, DiagnosticKind::DuplicateVariable)
        }
        other => panic!("expected a diagnostic error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn scopes_duplicate_in_nested_scope_is_shadowing() {
    let program = common::parse("int x;\nvoid main() { int x; }\n");
    assert!(program.diagnostics.is_empty());
}

#[test]
fn scopes_undeclared_variable() {
    let program = common::parse_quiet("void main() { y = 1.0; float y; }");
    let y = common::ids_of(&program.node, NodeTag::Identifier, "y");

    assert_eq!(program.diagnostics.len(), 1);
    assert_eq!(
        program.diagnostics[0].kind,
        DiagnosticKind::UndeclaredVariable
    );

    // The later declaration completes the entry created by the use
    let main = program.scopes.children(ScopeId::ROOT).next().unwrap();
    assert_eq!(main.bindings["y"].declaration, Some(y[1]));
    assert_eq!(main.bindings["y"].references, y);
}

#[test]
fn scopes_builtin_variables_are_ignored() {
    let program = common::parse(
        r#"invariant gl_Position;
void main() { gl_FragColor = vec4(gl_FragCoord.xy, 0.0, 1.0); }"#,
    );

    assert!(program.diagnostics.is_empty());
    assert!(program.scopes.iter().all(|s| s.bindings.is_empty()));
}

#[test]
fn scopes_types() {
    let program = common::parse_quiet(
        r#"struct Light { vec3 color; };
Light lights[2];
void main() {
    struct Local { float x; };
    Local l;
    Missing m;
}
"#,
    );

    let root = program.root_scope();
    let light = common::ids_of(&program.node, NodeTag::TypeName, "Light");
    assert_eq!(root.types["Light"].declaration, Some(light[0]));
    assert_eq!(root.types["Light"].references, light);
    assert!(!root.types.contains_key("Local"));

    let main = program.scopes.children(ScopeId::ROOT).next().unwrap();
    assert!(main.types.contains_key("Local"));
    assert_eq!(main.types["Local"].references.len(), 2);

    // Member names are not variables
    assert!(!root.bindings.contains_key("color"));

    assert_eq!(program.diagnostics.len(), 1);
    assert_eq!(program.diagnostics[0].kind, DiagnosticKind::UndeclaredType);
    assert_eq!(main.types["Missing"].declaration, None);
}

#[test]
fn scopes_interface_blocks() {
    let program = common::parse(
        r#"uniform Globals { mat4 mvp; } globals;
uniform Anonymous { vec4 tint; float alpha; };
void main() { gl_Position = globals.mvp * tint * alpha; }
"#,
    );

    let root = program.root_scope();
    let names: Vec<_> = root.bindings.keys().map(|k| k.as_str()).collect();
    assert_eq!(names, vec!["globals", "tint", "alpha"]);
    assert!(program.diagnostics.is_empty());
}

#[test]
fn scopes_spans() {
    let options = ParseOptionsBuilder::default()
        .include_location(true)
        .build()
        .unwrap();

    let program = common::parse_with("float a;\nvoid main() {\n  a = 1.0;\n}\n", &options);

    let main = program.scopes.children(ScopeId::ROOT).next().unwrap();
    let span = main.span.expect("no span for main");
    assert_eq!(span.start.line, 2);
    assert_eq!(span.start.column, 1);
    assert_eq!(span.end.line, 4);

    let a = common::ids_of(&program.node, NodeTag::Identifier, "a");
    let usage = program.find(a[1]).unwrap();
    let span = usage.span.unwrap();
    assert_eq!((span.start.line, span.start.column), (3, 3));
    assert_eq!(span.start.offset, 25);
}
