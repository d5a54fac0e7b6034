//! Renaming through the scope registries

use glsltree::{rename_bindings, Error, NodeTag, ScopeId, Visitors};
use pretty_assertions::assert_eq;

mod common;

#[test]
fn rename_global_bindings() {
    let mut program = common::parse(
        r#"uniform float time;
float scale = 2.0;
void main() {
    float time2 = time * scale;
    gl_FragColor = vec4(time2);
}
"#,
    );

    program
        .rename_bindings(|name, _| format!("u_{}", name))
        .unwrap();

    assert_eq!(
        program.generate(),
        r#"uniform float u_time;
float u_scale = 2.0;
void main() {
    float time2 = u_time * u_scale;
    gl_FragColor = vec4(time2);
}
"#
    );
}

#[test]
fn rename_local_bindings_only() {
    let mut program = common::parse(
        r#"float x;
void f(float a) {
    float x = a;
    x += 1.0;
}
void main() { x = 0.0; }
"#,
    );

    let f = program
        .scopes
        .children(ScopeId::ROOT)
        .next()
        .expect("no function scope")
        .clone();

    rename_bindings(&mut program.node, &f, |name, _| format!("{}_local", name)).unwrap();

    assert_eq!(
        program.generate(),
        r#"float x;
void f(float a_local) {
    float x_local = a_local;
    x_local += 1.0;
}
void main() { x = 0.0; }
"#
    );
}

#[test]
fn rename_types() {
    let mut program = common::parse(
        r#"struct Light { vec3 color; };
Light lights[2];
Light make() { return Light(vec3(1.0)); }
"#,
    );

    program.rename_types(|name, _| format!("{}_t", name)).unwrap();

    assert_eq!(
        program.generate(),
        r#"struct Light_t { vec3 color; };
Light_t lights[2];
Light_t make() { return Light_t(vec3(1.0)); }
"#
    );
}

#[test]
fn rename_functions() {
    let mut program = common::parse_quiet(
        r#"float helper(float x);
float helper(float x) { return x; }
float helper(int x) { return 1.0; }
void main() {
    float a = helper(1.0) + undeclared(2) + max(1.0, 2.0);
}
"#,
    );

    let mut seen = Vec::new();
    program
        .rename_functions(|name, node| {
            seen.push(node.tag());
            format!("_{}", name)
        })
        .unwrap();

    assert_eq!(
        program.generate(),
        r#"float _helper(float x);
float _helper(float x) { return x; }
float _helper(int x) { return 1.0; }
void _main() {
    float a = _helper(1.0) + _undeclared(2) + max(1.0, 2.0);
}
"#
    );

    // Every reference of every overload is passed to the mangling function
    assert_eq!(seen.len(), 6);
    assert!(seen.contains(&NodeTag::FunctionPrototype));
    assert!(seen.contains(&NodeTag::Function));
    assert!(seen.contains(&NodeTag::FunctionCall));
}

#[test]
fn rename_preserves_ids() {
    let mut program = common::parse("float a; void main() { a = 1.0; }");
    let before = common::ids_of(&program.node, NodeTag::Identifier, "a");

    program.rename_bindings(|_, _| "b".to_owned()).unwrap();

    let after = common::ids_of(&program.node, NodeTag::Identifier, "b");
    assert_eq!(before, after);
    assert_eq!(program.root_scope().bindings["a"].references, after);
}

#[test]
fn rename_missing_reference() {
    let mut program = common::parse("float a; void main() { a; }");

    // Drop the use of `a` from the tree without updating the scopes
    let mut visitors =
        Visitors::new().on_enter(NodeTag::ExpressionStatement, |path| path.remove());
    program.visit(&mut visitors).unwrap();

    match program.rename_bindings(|name, _| name.to_uppercase()) {
        Err(Error::MissingReference { name }) => assert_eq!(name, "a"),
        other => panic!("expected a missing reference error, got {:?}", other),
    }
}
