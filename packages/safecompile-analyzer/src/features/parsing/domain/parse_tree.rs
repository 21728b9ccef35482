//! Concrete parse tree
//!
//! Each node owns its children outright. The tree is built top-down and is
//! acyclic, so no arena or parent links are needed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::models::Token;

/// Node in the concrete parse tree.
///
/// Non-terminals are named after grammar constructs (`FunctionDefinition`,
/// `Statement`, ...). Terminals are named after the token kind and carry the
/// lexeme as `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseTreeNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub is_terminal: bool,
    #[serde(default)]
    pub children: Vec<ParseTreeNode>,
}

impl ParseTreeNode {
    /// Create a grammar-construct node with no children
    pub fn non_terminal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            is_terminal: false,
            children: Vec::new(),
        }
    }

    /// Create a leaf for a consumed token
    pub fn terminal(token: &Token) -> Self {
        Self {
            name: token.kind.as_str().to_string(),
            value: Some(token.lexeme.clone()),
            is_terminal: true,
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: ParseTreeNode) {
        self.children.push(child);
    }

    /// Rename in place (used when a definition turns out to be a prototype)
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Direct children with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ParseTreeNode> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&ParseTreeNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Total number of nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Pre-order iterator over the subtree
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Lexemes of all terminal leaves, in source order
    pub fn terminal_values(&self) -> Vec<&str> {
        self.iter()
            .filter(|node| node.is_terminal)
            .filter_map(|node| node.value.as_deref())
            .collect()
    }
}

impl fmt::Display for ParseTreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} ({})", self.name, value),
            None => f.write_str(&self.name),
        }
    }
}

/// Pre-order traversal without recursion
pub struct PreOrder<'a> {
    stack: Vec<&'a ParseTreeNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a ParseTreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::TokenKind;

    #[test]
    fn test_terminal_from_token() {
        let node = ParseTreeNode::terminal(&Token::new(TokenKind::Keyword, "int", 1));
        assert_eq!(node.name, "KEYWORD");
        assert_eq!(node.value.as_deref(), Some("int"));
        assert!(node.is_terminal);
        assert_eq!(node.to_string(), "KEYWORD (int)");
    }

    #[test]
    fn test_preorder_and_counts() {
        let mut root = ParseTreeNode::non_terminal("Program");
        let mut func = ParseTreeNode::non_terminal("FunctionDefinition");
        func.add_child(ParseTreeNode::terminal(&Token::new(TokenKind::Keyword, "void", 1)));
        func.add_child(ParseTreeNode::terminal(&Token::new(TokenKind::Identifier, "f", 1)));
        root.add_child(func);

        assert_eq!(root.node_count(), 4);
        let names: Vec<_> = root.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Program", "FunctionDefinition", "KEYWORD", "IDENTIFIER"]);
        assert_eq!(root.terminal_values(), vec!["void", "f"]);
        assert_eq!(root.children_named("FunctionDefinition").count(), 1);
    }

    #[test]
    fn test_json_shape() {
        let root = ParseTreeNode::non_terminal("Program");
        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["name"], "Program");
        assert_eq!(json["is_terminal"], false);
        assert!(json.get("value").is_none());
    }
}
