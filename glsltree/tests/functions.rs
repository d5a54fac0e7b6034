//! Function registration, overload resolution and call classification

use glsltree::{DiagnosticKind, NodeKind, NodeTag};
use pretty_assertions::assert_eq;

mod common;

fn keys(program: &glsltree::Program, name: &str) -> Vec<String> {
    program
        .root_scope()
        .functions
        .get(name)
        .map(|overloads| overloads.keys().map(|k| k.to_string()).collect())
        .unwrap_or_default()
}

#[test]
fn functions_overload_arity() {
    let program = common::parse_quiet(
        r#"float foo(float a) { return a; }
void main() {
    foo(1.0);
    foo(1.0, 2.0);
}
"#,
    );

    assert_eq!(
        keys(&program, "foo"),
        vec!["float: float", "UNKNOWN: UNKNOWN, UNKNOWN"]
    );

    let calls = common::find_all(&program.node, &|node| node.tag() == NodeTag::FunctionCall);
    let definition = common::find_all(&program.node, &|node| node.tag() == NodeTag::Function);

    let overloads = &program.root_scope().functions["foo"];
    let declared = &overloads["float: float"];
    assert_eq!(declared.declaration, Some(definition[0].id));
    assert!(declared.defined);
    assert_eq!(declared.references, vec![definition[0].id, calls[0].id]);

    let implicit = &overloads["UNKNOWN: UNKNOWN, UNKNOWN"];
    assert_eq!(implicit.declaration, None);
    assert_eq!(implicit.references, vec![calls[1].id]);

    assert_eq!(program.diagnostics.len(), 1);
    assert_eq!(
        program.diagnostics[0].kind,
        DiagnosticKind::NoMatchingOverload
    );
    assert_eq!(program.diagnostics[0].node, calls[1].id);
}

#[test]
fn functions_void_parameter() {
    let program = common::parse_quiet(
        r#"float zero(void) { return 0.0; }
float one(float x) { return x; }
void main() {
    zero();
    zero(void);
    one();
}
"#,
    );

    assert_eq!(keys(&program, "zero"), vec!["float: void"]);
    assert_eq!(keys(&program, "one"), vec!["float: float", "UNKNOWN: void"]);

    let zero = &program.root_scope().functions["zero"]["float: void"];
    assert_eq!(zero.references.len(), 3);

    let kinds: Vec<_> = program.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::NoMatchingOverload]);
}

#[test]
fn functions_prototype_then_definition() {
    let program = common::parse(
        r#"vec3 shade(vec3 n, float k[2]);
void main() { shade(vec3(0.0), float[2](1.0, 2.0)); }
vec3 shade(vec3 n, float k[2]) { return n * k[0]; }
"#,
    );

    assert_eq!(keys(&program, "shade"), vec!["vec3: vec3, float[2]"]);

    let overload = &program.root_scope().functions["shade"]["vec3: vec3, float[2]"];
    assert!(overload.defined);
    assert_eq!(overload.references.len(), 3);
    assert!(program.diagnostics.is_empty());
}

#[test]
fn functions_call_before_declaration() {
    let program = common::parse_quiet(
        r#"void main() { later(1); }
void later(int x) { }
"#,
    );

    // The call-only overload is taken over by the definition
    assert_eq!(keys(&program, "later"), vec!["void: int"]);

    let overload = &program.root_scope().functions["later"]["void: int"];
    assert!(overload.defined);
    assert_eq!(overload.references.len(), 2);

    let kinds: Vec<_> = program.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::UndeclaredFunction]);
}

#[test]
fn functions_duplicates() {
    let program = common::parse_quiet(
        r#"float f(float x);
float f(float x);
float f(float x) { return x; }
float f(float x) { return x; }
float f(int x) { return 1.0; }
"#,
    );

    assert_eq!(keys(&program, "f"), vec!["float: float", "float: int"]);

    let kinds: Vec<_> = program.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::DuplicatePrototype,
            DiagnosticKind::DuplicateFunction
        ]
    );
}

#[test]
fn functions_constructor_call() {
    let program = common::parse(
        r#"struct Foo { float x; };
void main() {
    Foo foo = Foo(1.0);
}
"#,
    );

    let foo = common::ids_of(&program.node, NodeTag::TypeName, "Foo");
    assert_eq!(foo.len(), 3);
    assert_eq!(program.root_scope().types["Foo"].references, foo);

    assert!(program.root_scope().functions.get("Foo").is_none());
    assert!(program.diagnostics.is_empty());

    // Constructor calls keep their type callee
    let calls = common::find_all(&program.node, &|node| node.tag() == NodeTag::FunctionCall);
    match &calls[0].kind {
        NodeKind::FunctionCall { identifier, .. } => {
            assert_eq!(identifier.tag(), NodeTag::TypeSpecifier)
        }
        _ => unreachable!(),
    }
}

#[test]
fn functions_calls_get_identifier_callees() {
    let program = common::parse(
        r#"float f(float x) { return x; }
void main() { float y = f(2.0) + max(1.0, 2.0) + vec2(1.0).x; }
"#,
    );

    let calls = common::find_all(&program.node, &|node| node.tag() == NodeTag::FunctionCall);
    let callees: Vec<_> = calls
        .into_iter()
        .map(|call| match &call.kind {
            NodeKind::FunctionCall { identifier, .. } => identifier.tag(),
            _ => unreachable!(),
        })
        .collect();

    assert_eq!(
        callees,
        vec![
            NodeTag::Identifier,
            NodeTag::Identifier,
            NodeTag::TypeSpecifier
        ]
    );

    // Built-in functions are not registered
    assert!(program.root_scope().functions.get("max").is_none());
    assert!(program.diagnostics.is_empty());

    // Re-tagged callees get fresh ids that do not collide with parsed nodes
    let identifiers = common::find_all(&program.node, &|node| node.tag() == NodeTag::Identifier);
    let mut ids: Vec<_> = identifiers.iter().map(|node| node.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), identifiers.len());
}

#[test]
fn functions_user_overload_of_builtin() {
    let program = common::parse(
        r#"float max(float a, float b, float c) { return a; }
void main() { max(1.0, 2.0, 3.0); }
"#,
    );

    let overloads = &program.root_scope().functions["max"];
    assert_eq!(overloads["float: float, float, float"].references.len(), 2);
    assert!(program.diagnostics.is_empty());
}
