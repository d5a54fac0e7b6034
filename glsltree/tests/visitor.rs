//! Tree traversal, removal and replacement

use glsltree::{
    generate, Error, Node, NodeKind, NodeTag, Path, SlotKind, Token, Visitor, Visitors,
};
use pretty_assertions::assert_eq;

mod common;

fn statements(program: &glsltree::Program) -> Vec<String> {
    common::find_all(&program.node, &|node| {
        node.tag() == NodeTag::ExpressionStatement
    })
    .into_iter()
    .map(|node| generate(node).trim().to_owned())
    .collect()
}

#[test]
fn visitor_remove_every_other_statement() {
    let mut program = common::parse("float a, b, c, d, e;\nvoid main() { a; b; c; d; e; }\n");
    let mut visited = Vec::new();

    {
        let mut visitors = Visitors::new().on_enter(NodeTag::ExpressionStatement, |path| {
            visited.push(generate(path.node()));

            match path.key().and_then(|key| key.index) {
                Some(index) if index % 2 == 1 => path.remove(),
                _ => Ok(()),
            }
        });

        program.visit(&mut visitors).unwrap();
    }

    assert_eq!(visited, vec!["a; ", "b; ", "c; ", "d; ", "e; "]);
    assert_eq!(statements(&program), vec!["a;", "c;", "e;"]);
    assert_eq!(
        program.generate(),
        "float a, b, c, d, e;\nvoid main() { a; c; e; }\n"
    );
}

#[test]
fn visitor_remove_adjacent_statements() {
    let mut program = common::parse("float a; void main() { a; a; a; a; }");

    let mut visitors = Visitors::new().on_enter(NodeTag::ExpressionStatement, |path| {
        match path.key().and_then(|key| key.index) {
            Some(1) | Some(2) => path.remove(),
            _ => Ok(()),
        }
    });

    program.visit(&mut visitors).unwrap();
    assert_eq!(program.generate(), "float a; void main() { a; a; }");
}

#[test]
fn visitor_replace() {
    let mut program = common::parse("void main() { float x = 1.0 + 1.0; }");

    let mut visitors = Visitors::new().on_enter(NodeTag::Literal, |path| {
        let trivia = match &path.node().kind {
            NodeKind::Literal { literal } => literal.trivia.clone(),
            _ => unreachable!(),
        };

        path.replace_with(Node::new(NodeKind::Literal {
            literal: Token::with_trivia("2.0", trivia),
        }))
    });

    program.visit(&mut visitors).unwrap();
    assert_eq!(program.generate(), "void main() { float x = 2.0 + 2.0; }");
}

#[test]
fn visitor_remove_optional_else() {
    let mut program = common::parse(
        "bool c; float a, b;\nvoid main() { if (c) { a; } else { b; } }",
    );

    let mut visitors = Visitors::new().on_enter(NodeTag::CompoundStatement, |path| {
        let is_else = path.parent().map(Node::tag) == Some(NodeTag::IfStatement)
            && path.key().map(|key| key.kind) == Some(SlotKind::Optional);

        if is_else {
            path.remove()
        } else {
            Ok(())
        }
    });

    program.visit(&mut visitors).unwrap();
    assert_eq!(
        program.generate(),
        "bool c; float a, b;\nvoid main() { if (c) { a; } }"
    );
}

#[test]
fn visitor_skip_children() {
    let mut program = common::parse(
        r#"float x;
void skipped() { x; x; }
void main() { x; }
"#,
    );

    let mut seen = 0;
    {
        let mut visitors = Visitors::new()
            .on_enter(NodeTag::Function, |path| {
                let name = common::find_all(path.node(), &|node| {
                    node.tag() == NodeTag::FunctionHeader
                })[0]
                    .children()[1]
                    .name()
                    .map(str::to_owned);

                if name.as_deref() == Some("skipped") {
                    path.skip();
                }

                Ok(())
            })
            .on_enter(NodeTag::Identifier, |_| {
                seen += 1;
                Ok(())
            });

        program.visit(&mut visitors).unwrap();
    }

    // Declaration of x, name of main and the use in main
    assert_eq!(seen, 3);
}

#[test]
fn visitor_ancestors() {
    let mut program = common::parse("float x;\nvoid main() { if (true) { x; } }");

    let mut parents = Vec::new();
    let mut functions = 0;
    {
        let mut visitors = Visitors::new().on_enter(NodeTag::Identifier, |path| {
            if path.node().name() == Some("x") {
                parents.push(path.parent().map(Node::tag));

                if path
                    .find_parent(|node| node.tag() == NodeTag::Function)
                    .is_some()
                {
                    functions += 1;
                }

                let root = path.ancestors().last().map(Node::tag);
                assert_eq!(root, Some(NodeTag::Program));
            }

            Ok(())
        });

        program.visit(&mut visitors).unwrap();
    }

    assert_eq!(
        parents,
        vec![
            Some(NodeTag::Declaration),
            Some(NodeTag::ExpressionStatement)
        ]
    );
    assert_eq!(functions, 1);
}

#[test]
fn visitor_exit_order() {
    struct Order(Vec<String>);

    impl Visitor for Order {
        fn enter(&mut self, path: &mut Path<'_>) -> glsltree::Result<()> {
            if let NodeTag::Function | NodeTag::ReturnStatement = path.node().tag() {
                self.0.push(format!("enter {:?}", path.node().tag()));
            }

            Ok(())
        }

        fn exit(&mut self, path: &mut Path<'_>) -> glsltree::Result<()> {
            if let NodeTag::Function | NodeTag::ReturnStatement = path.node().tag() {
                self.0.push(format!("exit {:?}", path.node().tag()));
            }

            Ok(())
        }
    }

    let mut program = common::parse("void main() { return; }");
    let mut order = Order(Vec::new());
    program.visit(&mut order).unwrap();

    assert_eq!(
        order.0,
        vec![
            "enter Function",
            "enter ReturnStatement",
            "exit ReturnStatement",
            "exit Function"
        ]
    );
}

#[test]
fn visitor_remove_required_slot() {
    let mut program = common::parse("float a, b;\nvoid main() { a + b; }");
    let before = program.generate();

    let mut visitors = Visitors::new().on_enter(NodeTag::Identifier, |path| {
        if path.parent().map(Node::tag) == Some(NodeTag::Binary) {
            path.remove()?;
        }

        Ok(())
    });

    match program.visit(&mut visitors) {
        Err(Error::RequiredSlot { parent, .. }) => assert_eq!(parent, NodeTag::Binary),
        other => panic!("expected a required slot error, got {:?}", other),
    }

    // Nothing is applied when the visit fails
    assert_eq!(program.generate(), before);
}

#[test]
fn visitor_remove_root() {
    let mut program = common::parse("float a;");

    let mut visitors = Visitors::new().on_enter(NodeTag::Program, |path| path.remove());

    match program.visit(&mut visitors) {
        Err(Error::DetachedNode { operation }) => assert_eq!(operation, "remove"),
        other => panic!("expected a detached node error, got {:?}", other),
    }
}

/// Remove the nodes of kind `tag` whose generated text is one of `targets`
fn remove_matching(src: &str, tag: NodeTag, targets: &[&str]) -> String {
    let mut program = common::parse_quiet(src);

    let mut visitors = Visitors::new().on_enter(tag, |path| {
        if targets.contains(&generate(path.node()).trim()) {
            path.remove()
        } else {
            Ok(())
        }
    });

    program.visit(&mut visitors).unwrap();

    let generated = program.generate();
    common::parse_quiet(&generated);
    generated
}

#[test]
fn visitor_remove_declarators() {
    let src = "uniform float a, b, c;\n";

    assert_eq!(
        remove_matching(src, NodeTag::Declaration, &["a"]),
        "uniform float b, c;\n"
    );
    assert_eq!(
        remove_matching(src, NodeTag::Declaration, &["b"]),
        "uniform float a, c;\n"
    );
    assert_eq!(
        remove_matching(src, NodeTag::Declaration, &["c"]),
        "uniform float a, b;\n"
    );
    assert_eq!(
        remove_matching(src, NodeTag::Declaration, &["a", "c"]),
        "uniform float b;\n"
    );
}

#[test]
fn visitor_remove_arguments() {
    let src = "void main() { f(1.0, 2.0, 3.0); }";

    assert_eq!(
        remove_matching(src, NodeTag::Literal, &["1.0"]),
        "void main() { f(2.0, 3.0); }"
    );
    assert_eq!(
        remove_matching(src, NodeTag::Literal, &["2.0"]),
        "void main() { f(1.0, 3.0); }"
    );
    assert_eq!(
        remove_matching(src, NodeTag::Literal, &["3.0"]),
        "void main() { f(1.0, 2.0); }"
    );
    assert_eq!(
        remove_matching(src, NodeTag::Literal, &["2.0", "3.0"]),
        "void main() { f(1.0); }"
    );
}

#[test]
fn visitor_remove_keeps_trailing_comma() {
    let src = "float a[3] = { 1.0, 2.0, 3.0, };";

    assert_eq!(
        remove_matching(src, NodeTag::Literal, &["3.0"]),
        "float a[3] = { 1.0, 2.0, };"
    );
    assert_eq!(
        remove_matching(src, NodeTag::Literal, &["1.0"]),
        "float a[3] = { 2.0, 3.0, };"
    );
}

#[test]
fn visitor_replacement_is_detached() {
    let mut program = common::parse("float a; void main() { a; }");

    let mut visitors = Visitors::new().on_enter(NodeTag::ExpressionStatement, |path| {
        path.replace_with(Node::new(NodeKind::JumpStatement {
            keyword: Token::new("discard"),
            semi: Token::with_trivia(";", " "),
        }))
    });

    program.visit(&mut visitors).unwrap();
    assert_eq!(program.generate(), "float a; void main() { discard; }");

    let jumps = common::find_all(&program.node, &|node| node.tag() == NodeTag::JumpStatement);
    assert!(jumps[0].id.is_detached());
    assert!(!program.node.id.is_detached());
}
