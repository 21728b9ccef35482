//! Graphviz rendering of the parse tree
//!
//! ```text
//! digraph ParseTree {
//!     rankdir=TB;
//!     splines=true;
//!     node0 [label="Program", shape=ellipse, style=filled, fillcolor=lightgray];
//!     node1 [label="KEYWORD\n(\"int\")", shape=box, style=filled, fillcolor=lightblue];
//!     node0 -> node1;
//! }
//! ```
//!
//! Render with `dot -Tpng tree.dot -o tree.png`.

use crate::features::parsing::domain::ParseTreeNode;

/// Escape a string for use inside a quoted DOT label.
///
/// `\` must be escaped first so later escapes are not doubled.
fn escape_dot_label(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
}

fn node_label(node: &ParseTreeNode) -> String {
    match (&node.value, node.is_terminal) {
        (Some(value), true) => format!(
            "{}\\n(\\\"{}\\\")",
            escape_dot_label(&node.name),
            escape_dot_label(value)
        ),
        _ => escape_dot_label(&node.name),
    }
}

/// Render `root` as a DOT digraph.
///
/// Nodes are numbered in pre-order, so output is deterministic. The walk uses
/// an explicit stack and handles arbitrarily deep trees.
pub fn to_dot(root: &ParseTreeNode) -> String {
    let mut out = String::from("digraph ParseTree {\n");
    out.push_str("    rankdir=TB;\n");
    out.push_str("    splines=true;\n");

    let mut edges = Vec::new();
    let mut next_id = 0usize;
    // (node, parent id)
    let mut stack: Vec<(&ParseTreeNode, Option<usize>)> = vec![(root, None)];

    while let Some((node, parent)) = stack.pop() {
        let id = next_id;
        next_id += 1;

        let (shape, color) = if node.is_terminal {
            ("box", "lightblue")
        } else {
            ("ellipse", "lightgray")
        };
        out.push_str(&format!(
            "    node{} [label=\"{}\", shape={}, style=filled, fillcolor={}];\n",
            id,
            node_label(node),
            shape,
            color
        ));

        if let Some(parent) = parent {
            edges.push((parent, id));
        }
        for child in node.children.iter().rev() {
            stack.push((child, Some(id)));
        }
    }

    if !edges.is_empty() {
        out.push('\n');
    }
    for (from, to) in edges {
        out.push_str(&format!("    node{} -> node{};\n", from, to));
    }

    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::infrastructure::analyze_source;

    #[test]
    fn test_dot_structure() {
        let outcome = analyze_source("int main() { return 0; }");
        let dot = to_dot(&outcome.parse_tree);

        assert!(dot.starts_with("digraph ParseTree {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("rankdir=TB;"));
        assert!(dot.contains("node0 [label=\"Program\", shape=ellipse"));
        assert!(dot.contains("node0 -> node1;"));

        let nodes = dot.lines().filter(|l| l.contains("[label=")).count();
        assert_eq!(nodes, outcome.parse_tree.node_count());
        let edges = dot.lines().filter(|l| l.contains("->")).count();
        assert_eq!(edges, nodes - 1);
    }

    #[test]
    fn test_terminal_label_is_escaped() {
        let outcome = analyze_source(r#"void f() { puts("say \"hi\""); }"#);
        let dot = to_dot(&outcome.parse_tree);
        assert!(dot.contains(r#"label="STRING\n(\"\"say \\\"hi\\\"\"\")", shape=box"#));
    }

    #[test]
    fn test_empty_program() {
        let dot = to_dot(&ParseTreeNode::non_terminal("Program"));
        assert!(dot.contains("node0 [label=\"Program\""));
        assert!(!dot.contains("->"));
    }
}
