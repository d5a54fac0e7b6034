use glsltree::{Node, NodeId, NodeTag, ParseOptions, ParseOptionsBuilder, Program};

#[allow(dead_code)]
pub fn init_logger() {
    env_logger::builder()
        .format_timestamp(None)
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init()
        .ok();
}

#[allow(dead_code)]
pub fn parse(src: &str) -> Program {
    parse_with(src, &ParseOptions::default())
}

#[allow(dead_code)]
pub fn parse_quiet(src: &str) -> Program {
    let options = ParseOptionsBuilder::default()
        .quiet(true)
        .build()
        .expect("failed to build options");

    parse_with(src, &options)
}

#[allow(dead_code)]
pub fn parse_with(src: &str, options: &ParseOptions) -> Program {
    init_logger();

    match glsltree::parse(src, options) {
        Ok(program) => program,
        Err(err) => panic!("failed to parse:\n{}\n>>> error: {}", src, err),
    }
}

/// Check that `src` is generated back unchanged, and that parsing the output again gives the
/// same tree
#[allow(dead_code)]
pub fn verify_roundtrip(src: &str) {
    let program = parse_quiet(src);
    let generated = program.generate();

    eprintln!(">>> source: \n{}\n>>> generated: \n{}", src, generated);
    pretty_assertions::assert_eq!(generated, src);

    let reparsed = parse_quiet(&generated);
    pretty_assertions::assert_eq!(reparsed.node, program.node);
}

/// Nodes of `tree` matching `predicate`, in pre-order
#[allow(dead_code)]
pub fn find_all<'n>(tree: &'n Node, predicate: &impl Fn(&Node) -> bool) -> Vec<&'n Node> {
    let mut found = Vec::new();
    if predicate(tree) {
        found.push(tree);
    }

    for child in tree.children() {
        found.extend(find_all(child, predicate));
    }

    found
}

/// Ids of the nodes of kind `tag` named `name`, in pre-order
#[allow(dead_code)]
pub fn ids_of(tree: &Node, tag: NodeTag, name: &str) -> Vec<NodeId> {
    find_all(tree, &|node| node.tag() == tag && node.name() == Some(name))
        .into_iter()
        .map(|node| node.id)
        .collect()
}
