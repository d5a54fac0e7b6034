use glsltree_uniforms::{declared_names, uniform_names};
use pretty_assertions::assert_eq;

mod common;

#[test]
fn uniforms_plain_declarations() {
    common::init_logger();

    let names = uniform_names(
        r#"uniform float test;
uniform int fart;
uniform vec4 aksdjasd;
uniform mat3 transform;
vec3 test2;
"#,
    )
    .unwrap();

    assert_eq!(names, vec!["test", "fart", "aksdjasd", "transform"]);
}

#[test]
fn uniforms_declarator_lists() {
    common::init_logger();

    let names = uniform_names(
        r#"uniform highp float a, b[2], c;
const float d = 1.0;
void main() { float e; }
"#,
    )
    .unwrap();

    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn uniforms_interface_blocks() {
    common::init_logger();

    let names = uniform_names(
        r#"layout(std140) uniform Matrices { mat4 view; mat4 projection; } matrices;
uniform Lighting { vec3 direction; vec3 color[4]; };
in Inputs { vec2 uv; };
"#,
    )
    .unwrap();

    assert_eq!(names, vec!["matrices", "direction", "color"]);
}

#[test]
fn uniforms_other_qualifier() {
    common::init_logger();

    let program = glsltree::parse_default(
        r#"in vec2 uv;
in vec3 normal;
out vec4 color;
uniform sampler2D image;
"#,
    )
    .unwrap();

    assert_eq!(declared_names(&program.node, "in"), vec!["uv", "normal"]);
    assert_eq!(declared_names(&program.node, "out"), vec!["color"]);
}

#[test]
fn uniforms_syntax_error() {
    common::init_logger();

    assert!(uniform_names("uniform float;;;x").is_err());
}
