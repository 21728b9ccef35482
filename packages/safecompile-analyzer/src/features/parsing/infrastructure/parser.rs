//! Tolerant recursive-descent parser for the C subset
//!
//! # Grammar
//!
//! ```text
//! Program             -> FunctionDefinition*
//! FunctionDefinition  -> TypeSpec IDENTIFIER '(' Parameters ')' '{' FunctionBody '}'
//! Statement           -> Declaration | ReturnStatement | ControlStructure
//!                      | ExpressionStatement | Block | JumpStatement | EmptyStatement
//! Declaration         -> TypeSpec IDENTIFIER ('[' ArraySize ']')* ('=' Expression)? (',' ...)* ';'
//! ReturnStatement     -> 'return' Expression? ';'
//! ControlStructure    -> ('if'|'while'|'for'|'switch') '(' Condition ')' Body ('else' Body)?
//!                      | 'do' Body 'while' '(' Condition ')' ';'
//! ExpressionStatement -> Expression (',' Expression)* ';'
//! ```
//!
//! Expressions are flat token runs. They stop at `; { } ) ] ,` or a
//! statement keyword and only descend to balance `(...)` and `[...]`.
//!
//! # Recovery
//!
//! A required-token mismatch records a [`Diagnostic`] and abandons the current
//! construct (returns `None`). Every loop checks that the cursor moved; if a
//! pass made no progress exactly one token is skipped. The parser therefore
//! always terminates and always returns a `Program` root.
//!
//! # Inline detection
//!
//! Identifiers consumed in expression position (expressions, conditions,
//! array sizes, initializers) are checked against the insecure function
//! table as they are consumed. Declared names and function names are not.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{AnalyzerError, Result};
use crate::features::lexing::tokenize;
use crate::features::parsing::domain::{
    Diagnostic, DiagnosticKind, InsecureFunctionTable, ParseTreeNode, INSECURE_FUNCTIONS,
};
use crate::shared::models::{Finding, Token, TokenKind};

/// Deepest block/group nesting the parser descends into
pub const MAX_NESTING_DEPTH: usize = 128;

/// Keywords that may start a type specifier
const TYPE_KEYWORDS: &[&str] = &[
    "int", "char", "void", "float", "double", "long", "short", "unsigned", "signed", "const",
    "static", "extern", "volatile", "register", "inline", "auto", "restrict", "struct", "union",
    "enum", "_Bool",
];

const CONTROL_KEYWORDS: &[&str] = &["if", "while", "for", "switch"];

/// Tokens that end a flat expression
const EXPRESSION_TERMINATORS: &[&str] = &[";", "{", "}", ")", "]", ","];

fn is_type_keyword(token: &Token) -> bool {
    token.kind == TokenKind::Keyword && TYPE_KEYWORDS.contains(&token.lexeme.as_str())
}

/// Keywords that can only begin a statement, never continue an expression
const STATEMENT_KEYWORDS: &[&str] = &[
    "return", "if", "else", "while", "for", "do", "switch", "case", "default", "break",
    "continue", "goto", "typedef",
];

fn is_expression_terminator(token: &Token) -> bool {
    match token.kind {
        TokenKind::Separator => EXPRESSION_TERMINATORS.contains(&token.lexeme.as_str()),
        TokenKind::Keyword => STATEMENT_KEYWORDS.contains(&token.lexeme.as_str()),
        TokenKind::Preprocessor => true,
        _ => false,
    }
}

fn can_start_expression(token: &Token) -> bool {
    match token.kind {
        TokenKind::Identifier
        | TokenKind::Number
        | TokenKind::String
        | TokenKind::Char
        | TokenKind::Operator => true,
        TokenKind::Separator => token.lexeme == "(",
        TokenKind::Keyword => token.lexeme == "sizeof",
        _ => false,
    }
}

/// Everything a single parse produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseOutcome {
    /// Recovered syntax problems, in the order they were hit
    pub warnings: Vec<Diagnostic>,
    /// Insecure-call findings, in source order
    pub insecure_findings: Vec<Finding>,
    /// Root `Program` node; may be partial but is never absent
    pub parse_tree: ParseTreeNode,
}

impl ParseOutcome {
    /// Warnings in their `"<line>: <message>"` form
    pub fn warning_lines(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }
}

/// Tokenize and parse `source`. Never fails on malformed input.
pub fn analyze_source(source: &str) -> ParseOutcome {
    Parser::from_scanned(tokenize(source)).parse()
}

/// Per-invocation parser state
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    nesting_reported: bool,
    diagnostics: Vec<Diagnostic>,
    findings: Vec<Finding>,
    table: &'static InsecureFunctionTable,
}

impl Parser {
    /// Create a parser over an externally supplied token list.
    ///
    /// Trivia tokens are dropped. Fails if a token has line 0 or the line
    /// numbers decrease. An empty list is a valid empty program.
    pub fn new(tokens: Vec<Token>) -> Result<Self> {
        let tokens: Vec<Token> = tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect();

        let mut previous = 1;
        for (index, token) in tokens.iter().enumerate() {
            if token.line == 0 {
                return Err(AnalyzerError::invalid_tokens(format!(
                    "token {} ({:?}) has line 0; lines are 1-based",
                    index, token.lexeme
                )));
            }
            if token.line < previous {
                return Err(AnalyzerError::invalid_tokens(format!(
                    "token {} ({:?}) is on line {} after a token on line {}",
                    index, token.lexeme, token.line, previous
                )));
            }
            previous = token.line;
        }

        Ok(Self::from_scanned(tokens))
    }

    /// Tokens straight from our own scanner already satisfy the contract
    pub(crate) fn from_scanned(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            nesting_reported: false,
            diagnostics: Vec::new(),
            findings: Vec::new(),
            table: &INSECURE_FUNCTIONS,
        }
    }

    /// Parse the whole token list
    pub fn parse(mut self) -> ParseOutcome {
        let mut root = ParseTreeNode::non_terminal("Program");

        while let Some(token) = self.peek() {
            let start = self.pos;

            if token.kind == TokenKind::Preprocessor {
                self.skip_preprocessor();
                continue;
            }

            if is_type_keyword(token) {
                if let Some(function) = self.parse_function_definition() {
                    root.add_child(function);
                }
            } else {
                let line = token.line;
                self.warn(Some(line), DiagnosticKind::InvalidTopLevel, "Invalid function definition");
            }

            if self.pos == start {
                self.skip_token();
            }
        }

        debug!(
            functions = root.children.len(),
            warnings = self.diagnostics.len(),
            findings = self.findings.len(),
            "parse finished"
        );

        ParseOutcome {
            warnings: self.diagnostics,
            insecure_findings: self.findings,
            parse_tree: root,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Cursor helpers
    // ═══════════════════════════════════════════════════════════════════

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at_separator(&self, lexeme: &str) -> bool {
        self.peek().is_some_and(|t| t.is_separator(lexeme))
    }

    fn at_operator(&self, lexeme: &str) -> bool {
        self.peek().is_some_and(|t| t.is(TokenKind::Operator, lexeme))
    }

    fn at_keyword(&self, lexeme: &str) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(lexeme))
    }

    /// Line of the current token, else of the last token, else none
    fn current_line(&self) -> Option<u32> {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|token| token.line)
    }

    fn last_line(&self) -> Option<u32> {
        self.tokens.last().map(|token| token.line)
    }

    fn warn(&mut self, line: Option<u32>, kind: DiagnosticKind, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(line, kind, message));
    }

    /// Consume a separator if present
    fn eat_separator(&mut self, lexeme: &str) -> Option<ParseTreeNode> {
        if self.at_separator(lexeme) {
            self.bump().map(|t| ParseTreeNode::terminal(&t))
        } else {
            None
        }
    }

    /// Consume a required separator or record a `MissingToken` warning
    fn expect_separator(&mut self, lexeme: &str, message: &str) -> Option<ParseTreeNode> {
        let node = self.eat_separator(lexeme);
        if node.is_none() {
            let line = self.current_line();
            self.warn(line, DiagnosticKind::MissingToken, message);
        }
        node
    }

    fn expect_identifier(&mut self, message: &str) -> Option<ParseTreeNode> {
        if self.peek().is_some_and(|t| t.kind == TokenKind::Identifier) {
            self.bump().map(|t| ParseTreeNode::terminal(&t))
        } else {
            let line = self.current_line();
            self.warn(line, DiagnosticKind::MissingToken, message);
            None
        }
    }

    /// Drop one token so the caller is guaranteed to make progress
    fn skip_token(&mut self) {
        if let Some(token) = self.bump() {
            self.warn(
                Some(token.line),
                DiagnosticKind::SkippedToken,
                format!("Skipping unrecognized token: {}", token),
            );
        }
    }

    fn skip_preprocessor(&mut self) {
        if let Some(token) = self.bump() {
            self.warn(
                Some(token.line),
                DiagnosticKind::SkippedPreprocessor,
                format!("Skipping preprocessor directive: {}", token.lexeme.trim()),
            );
        }
    }

    /// Consume a token in expression position, checking it for insecure calls
    fn consume_expression_token(&mut self, into: &mut ParseTreeNode) {
        if let Some(token) = self.bump() {
            if token.kind == TokenKind::Identifier {
                self.check_insecure_call(&token);
            }
            into.add_child(ParseTreeNode::terminal(&token));
        }
    }

    fn check_insecure_call(&mut self, token: &Token) {
        if let Some(finding) = self.table.finding_for(&token.lexeme, token.line) {
            debug!(function = %token.lexeme, line = token.line, "insecure call");
            self.findings.push(finding);
        }
    }

    /// Enter one nesting level; false (and a one-time warning) past the limit
    fn enter_nested(&mut self) -> bool {
        if self.depth >= MAX_NESTING_DEPTH {
            if !self.nesting_reported {
                self.nesting_reported = true;
                let line = self.current_line();
                self.warn(
                    line,
                    DiagnosticKind::NestingLimit,
                    format!("Nesting deeper than {} levels is not descended", MAX_NESTING_DEPTH),
                );
            }
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave_nested(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Top level
    // ═══════════════════════════════════════════════════════════════════

    /// Type keywords, an optional struct/union/enum tag, then pointer stars
    fn parse_type_spec(&mut self, into: &mut ParseTreeNode) {
        let mut tagged = false;
        while let Some(token) = self.peek() {
            if is_type_keyword(token) {
                tagged = matches!(token.lexeme.as_str(), "struct" | "union" | "enum");
                let token = token.clone();
                self.pos += 1;
                into.add_child(ParseTreeNode::terminal(&token));
            } else if tagged && token.kind == TokenKind::Identifier {
                // `struct point p`: the tag is part of the type
                tagged = false;
                let token = token.clone();
                self.pos += 1;
                into.add_child(ParseTreeNode::terminal(&token));
            } else {
                break;
            }
        }
        self.parse_pointer_stars(into);
    }

    fn parse_pointer_stars(&mut self, into: &mut ParseTreeNode) {
        while self.at_operator("*") {
            if let Some(star) = self.bump() {
                into.add_child(ParseTreeNode::terminal(&star));
            }
        }
    }

    fn parse_function_definition(&mut self) -> Option<ParseTreeNode> {
        let mut node = ParseTreeNode::non_terminal("FunctionDefinition");

        self.parse_type_spec(&mut node);
        let name = self.expect_identifier("Invalid function definition: expected function name")?;
        let function_name = name.value.clone().unwrap_or_default();
        node.add_child(name);

        let open = self.expect_separator("(", "Expected '(' after function name")?;
        node.add_child(open);

        let (parameters, closed) = self.parse_parameters()?;
        node.add_child(parameters);
        if let Some(close) = closed {
            node.add_child(close);
        }

        // Prototype: `int f(int);`
        if let Some(semicolon) = self.eat_separator(";") {
            node.rename("FunctionDeclaration");
            node.add_child(semicolon);
            return Some(node);
        }

        let lbrace = self.expect_separator("{", "Expected '{' to open function body")?;
        node.add_child(lbrace);

        let (body, rbrace) = self.parse_statement_list("FunctionBody");
        node.add_child(body);
        match rbrace {
            Some(rbrace) => node.add_child(rbrace),
            None => {
                let line = self.last_line();
                self.warn(line, DiagnosticKind::UnclosedBlock, "Unclosed function body");
            }
        }

        debug!(function = %function_name, "function definition parsed");
        Some(node)
    }

    /// Parameter tokens up to the matching `)`.
    ///
    /// Returns the closing paren when found. Hitting `{` first is recovered
    /// (warning, no closing paren); hitting EOF aborts the definition.
    fn parse_parameters(&mut self) -> Option<(ParseTreeNode, Option<ParseTreeNode>)> {
        let mut parameters = ParseTreeNode::non_terminal("Parameters");
        let mut depth = 0usize;

        loop {
            let Some(token) = self.peek() else {
                let line = self.last_line();
                self.warn(line, DiagnosticKind::UnclosedParameters, "Unclosed function parameters");
                return None;
            };

            if token.is_separator(")") {
                if depth == 0 {
                    let close = self.bump().map(|t| ParseTreeNode::terminal(&t));
                    return Some((parameters, close));
                }
                depth -= 1;
            } else if token.is_separator("(") {
                depth += 1;
            } else if token.is_separator("{") {
                let line = token.line;
                self.warn(
                    Some(line),
                    DiagnosticKind::UnclosedParameters,
                    "Unclosed function parameters: expected ')' before '{'",
                );
                return Some((parameters, None));
            }

            if let Some(token) = self.bump() {
                parameters.add_child(ParseTreeNode::terminal(&token));
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════

    /// Statements until `}` (consumed and returned) or EOF (returns `None`)
    fn parse_statement_list(&mut self, name: &str) -> (ParseTreeNode, Option<ParseTreeNode>) {
        let mut list = ParseTreeNode::non_terminal(name);

        loop {
            match self.peek() {
                None => return (list, None),
                Some(token) if token.is_separator("}") => {
                    let rbrace = self.bump().map(|t| ParseTreeNode::terminal(&t));
                    return (list, rbrace);
                }
                Some(_) => {}
            }

            let start = self.pos;
            if let Some(statement) = self.parse_statement() {
                list.add_child(statement);
            }
            if self.pos == start {
                self.skip_token();
            }
        }
    }

    /// One statement, wrapped in a `Statement` node
    fn parse_statement(&mut self) -> Option<ParseTreeNode> {
        let token = self.peek()?.clone();

        if token.kind == TokenKind::Preprocessor {
            self.skip_preprocessor();
            return None;
        }

        if !self.enter_nested() {
            self.bump();
            return None;
        }

        let inner = if token.is_separator("{") {
            Some(self.parse_block())
        } else if token.is_separator(";") {
            self.bump().map(|t| {
                let mut empty = ParseTreeNode::non_terminal("EmptyStatement");
                empty.add_child(ParseTreeNode::terminal(&t));
                empty
            })
        } else if token.kind == TokenKind::Keyword {
            match token.lexeme.as_str() {
                "return" => self.parse_return_statement(),
                "do" => self.parse_do_while(),
                "break" | "continue" | "goto" => self.parse_jump_statement(),
                "case" | "default" => Some(self.parse_label()),
                kw if CONTROL_KEYWORDS.contains(&kw) => self.parse_control_structure(),
                _ if is_type_keyword(&token) => self.parse_declaration(),
                _ if can_start_expression(&token) => self.parse_expression_statement(),
                _ => {
                    self.warn(
                        Some(token.line),
                        DiagnosticKind::SkippedToken,
                        format!("Skipping unhandled token as statement: {}", token),
                    );
                    self.bump();
                    None
                }
            }
        } else if can_start_expression(&token) {
            self.parse_expression_statement()
        } else {
            self.warn(
                Some(token.line),
                DiagnosticKind::SkippedToken,
                format!("Skipping unhandled token as statement: {}", token),
            );
            self.bump();
            None
        };

        self.leave_nested();

        inner.map(|construct| {
            let mut statement = ParseTreeNode::non_terminal("Statement");
            statement.add_child(construct);
            statement
        })
    }

    fn parse_block(&mut self) -> ParseTreeNode {
        let mut block = ParseTreeNode::non_terminal("Block");
        let open_line = self.current_line();

        if let Some(lbrace) = self.eat_separator("{") {
            block.add_child(lbrace);
        }

        let (body, rbrace) = self.parse_statement_list("Block");
        block.children.extend(body.children);
        match rbrace {
            Some(rbrace) => block.add_child(rbrace),
            None => self.warn(open_line, DiagnosticKind::UnclosedBlock, "Unclosed block"),
        }
        block
    }

    fn parse_declaration(&mut self) -> Option<ParseTreeNode> {
        let mut declaration = ParseTreeNode::non_terminal("Declaration");
        self.parse_type_spec(&mut declaration);

        loop {
            self.parse_pointer_stars(&mut declaration);
            let name = self.expect_identifier("Expected identifier in declaration")?;
            declaration.add_child(name);

            while let Some(lbracket) = self.eat_separator("[") {
                declaration.add_child(lbracket);
                let size = self.parse_expression("ArraySize");
                declaration.add_child(size);
                let rbracket = self.expect_separator("]", "Missing ']' in array declaration")?;
                declaration.add_child(rbracket);
            }

            if self.at_operator("=") {
                if let Some(assign) = self.bump() {
                    declaration.add_child(ParseTreeNode::terminal(&assign));
                }
                if self.at_separator("{") {
                    let initializer = self.parse_initializer_list();
                    declaration.add_child(initializer);
                } else {
                    let value = self.parse_expression("Expression");
                    declaration.add_child(value);
                }
            }

            match self.eat_separator(",") {
                Some(comma) => declaration.add_child(comma),
                None => break,
            }
        }

        let semicolon = self.expect_separator(";", "Missing ';' in declaration")?;
        declaration.add_child(semicolon);
        Some(declaration)
    }

    /// `{ ... }` initializer, consumed flat with brace balancing
    fn parse_initializer_list(&mut self) -> ParseTreeNode {
        let mut list = ParseTreeNode::non_terminal("InitializerList");
        let open_line = self.current_line();
        let mut depth = 0usize;

        while let Some(token) = self.peek() {
            if token.is_separator("{") {
                depth += 1;
            } else if token.is_separator("}") {
                depth = depth.saturating_sub(1);
                self.consume_expression_token(&mut list);
                if depth == 0 {
                    return list;
                }
                continue;
            } else if token.is_separator(";") || token.kind == TokenKind::Preprocessor {
                break;
            }
            self.consume_expression_token(&mut list);
        }

        self.warn(open_line, DiagnosticKind::UnclosedBlock, "Unclosed initializer list");
        list
    }

    fn parse_return_statement(&mut self) -> Option<ParseTreeNode> {
        let mut statement = ParseTreeNode::non_terminal("ReturnStatement");
        if let Some(keyword) = self.bump() {
            statement.add_child(ParseTreeNode::terminal(&keyword));
        }

        if !self.at_separator(";") {
            let value = self.parse_expression("Expression");
            if !value.children.is_empty() {
                statement.add_child(value);
            }
        }

        let semicolon = self.expect_separator(";", "Missing ';' after return statement")?;
        statement.add_child(semicolon);
        Some(statement)
    }

    fn parse_jump_statement(&mut self) -> Option<ParseTreeNode> {
        let mut statement = ParseTreeNode::non_terminal("JumpStatement");
        let keyword = self.bump()?;
        let message = format!("Missing ';' after '{}'", keyword.lexeme);
        statement.add_child(ParseTreeNode::terminal(&keyword));

        if keyword.lexeme == "goto" {
            let label = self.expect_identifier("Expected label after 'goto'")?;
            statement.add_child(label);
        }

        let semicolon = self.expect_separator(";", &message)?;
        statement.add_child(semicolon);
        Some(statement)
    }

    /// `case <expr>:` or `default:`
    fn parse_label(&mut self) -> ParseTreeNode {
        let mut label = ParseTreeNode::non_terminal("LabelStatement");
        if let Some(keyword) = self.bump() {
            label.add_child(ParseTreeNode::terminal(&keyword));
        }

        while let Some(token) = self.peek() {
            if token.is_separator(":") {
                if let Some(colon) = self.bump() {
                    label.add_child(ParseTreeNode::terminal(&colon));
                }
                return label;
            }
            if is_expression_terminator(token) {
                break;
            }
            self.consume_expression_token(&mut label);
        }

        let line = self.current_line();
        self.warn(line, DiagnosticKind::MissingToken, "Missing ':' after case label");
        label
    }

    /// `if` / `while` / `for` / `switch` with a token-walked condition
    fn parse_control_structure(&mut self) -> Option<ParseTreeNode> {
        let mut control = ParseTreeNode::non_terminal("ControlStructure");
        let keyword = self.bump()?;
        control.add_child(ParseTreeNode::terminal(&keyword));

        let lparen = self.expect_separator("(", &format!("Expected '(' after '{}'", keyword.lexeme))?;
        control.add_child(lparen);
        self.parse_condition(&mut control, &keyword);

        self.parse_body(&mut control, &keyword.lexeme);

        if keyword.lexeme == "if" && self.at_keyword("else") {
            if let Some(else_kw) = self.bump() {
                control.add_child(ParseTreeNode::terminal(&else_kw));
            }
            self.parse_body(&mut control, "else");
        }

        Some(control)
    }

    /// `do Body while ( Condition ) ;`
    fn parse_do_while(&mut self) -> Option<ParseTreeNode> {
        let mut control = ParseTreeNode::non_terminal("ControlStructure");
        let keyword = self.bump()?;
        control.add_child(ParseTreeNode::terminal(&keyword));

        self.parse_body(&mut control, "do");

        if !self.at_keyword("while") {
            let line = self.current_line();
            self.warn(line, DiagnosticKind::MissingToken, "Expected 'while' after 'do' body");
            return Some(control);
        }
        let while_kw = self.bump()?;
        control.add_child(ParseTreeNode::terminal(&while_kw));

        let lparen = self.expect_separator("(", "Expected '(' after 'while'")?;
        control.add_child(lparen);
        self.parse_condition(&mut control, &while_kw);

        let semicolon = self.expect_separator(";", "Missing ';' after do-while")?;
        control.add_child(semicolon);
        Some(control)
    }

    /// Condition tokens up to the matching `)`, walked one by one.
    ///
    /// Stops early at `{` / `}` so a missing `)` does not swallow the body.
    fn parse_condition(&mut self, control: &mut ParseTreeNode, keyword: &Token) {
        let mut condition = ParseTreeNode::non_terminal("Condition");
        let mut depth = 0usize;
        let mut closed = None;

        while let Some(token) = self.peek() {
            if token.is_separator(")") {
                if depth == 0 {
                    closed = self.bump().map(|t| ParseTreeNode::terminal(&t));
                    break;
                }
                depth -= 1;
            } else if token.is_separator("(") {
                depth += 1;
            } else if token.is_separator("{")
                || token.is_separator("}")
                || token.kind == TokenKind::Preprocessor
            {
                break;
            }
            self.consume_expression_token(&mut condition);
        }

        control.add_child(condition);
        match closed {
            Some(rparen) => control.add_child(rparen),
            None => self.warn(
                Some(keyword.line),
                DiagnosticKind::UnclosedGroup,
                format!("Unclosed condition in '{}'", keyword.lexeme),
            ),
        }
    }

    /// Block or single statement following a control keyword
    fn parse_body(&mut self, control: &mut ParseTreeNode, keyword: &str) {
        match self.peek() {
            None => {
                let line = self.last_line();
                self.warn(
                    line,
                    DiagnosticKind::MissingToken,
                    format!("Missing body for '{}'", keyword),
                );
            }
            Some(token) if token.is_separator("{") => {
                if self.enter_nested() {
                    let block = self.parse_block();
                    self.leave_nested();
                    control.add_child(block);
                }
            }
            Some(_) => {
                if let Some(statement) = self.parse_statement() {
                    control.add_child(statement);
                }
            }
        }
    }

    fn parse_expression_statement(&mut self) -> Option<ParseTreeNode> {
        let mut statement = ParseTreeNode::non_terminal("ExpressionStatement");
        let start_line = self.current_line();

        let expression = self.parse_expression("Expression");
        statement.add_child(expression);
        while let Some(comma) = self.eat_separator(",") {
            statement.add_child(comma);
            let next = self.parse_expression("Expression");
            statement.add_child(next);
        }

        match self.eat_separator(";") {
            Some(semicolon) => {
                statement.add_child(semicolon);
                Some(statement)
            }
            None => {
                self.warn(start_line, DiagnosticKind::MissingToken, "Missing ';' in statement");
                None
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════

    /// Flat token run up to a terminator, balancing `(...)` and `[...]`
    fn parse_expression(&mut self, name: &str) -> ParseTreeNode {
        let mut expression = ParseTreeNode::non_terminal(name);

        while let Some(token) = self.peek() {
            if token.is_separator("(") || token.is_separator("[") {
                self.parse_group(&mut expression);
            } else if is_expression_terminator(token) {
                break;
            } else {
                self.consume_expression_token(&mut expression);
            }
        }

        expression
    }

    /// `(`/`[` group: the opener, a nested `Expression`, then the closer
    fn parse_group(&mut self, into: &mut ParseTreeNode) {
        let Some(open) = self.bump() else {
            return;
        };
        into.add_child(ParseTreeNode::terminal(&open));

        if !self.enter_nested() {
            return;
        }

        let closer = if open.lexeme == "(" { ")" } else { "]" };
        let mut inner = ParseTreeNode::non_terminal("Expression");

        while let Some(token) = self.peek() {
            if token.is_separator(closer) {
                break;
            }
            if token.is_separator("(") || token.is_separator("[") {
                self.parse_group(&mut inner);
            } else if token.is_separator(",") {
                self.consume_expression_token(&mut inner);
            } else if is_expression_terminator(token) {
                break;
            } else {
                self.consume_expression_token(&mut inner);
            }
        }

        self.leave_nested();
        into.add_child(inner);

        match self.eat_separator(closer) {
            Some(close) => into.add_child(close),
            None => {
                let message = if closer == ")" {
                    "Unclosed parenthesis in expression/call"
                } else {
                    "Unclosed bracket in array access"
                };
                self.warn(Some(open.line), DiagnosticKind::UnclosedGroup, message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParseOutcome {
        analyze_source(source)
    }

    fn statement_kinds(body: &ParseTreeNode) -> Vec<&str> {
        body.children_named("Statement")
            .map(|s| s.children[0].name.as_str())
            .collect()
    }

    #[test]
    fn test_minimal_function() {
        let outcome = parse("int main() { return 0; }");
        assert!(outcome.warnings.is_empty(), "{:?}", outcome.warning_lines());

        let root = &outcome.parse_tree;
        assert_eq!(root.name, "Program");
        assert_eq!(root.children.len(), 1);

        let function = &root.children[0];
        assert_eq!(function.name, "FunctionDefinition");
        let body = function.child("FunctionBody").unwrap();
        assert_eq!(body.children_named("Statement").count(), 1);
        assert_eq!(statement_kinds(body), vec!["ReturnStatement"]);
    }

    #[test]
    fn test_empty_input_has_root() {
        let outcome = parse("");
        assert_eq!(outcome.parse_tree.name, "Program");
        assert!(outcome.parse_tree.children.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_gets_is_flagged_with_line() {
        let source = "\n\n\n\nint main() {\n    char buffer[10];\n    gets(buffer);\n    return 0;\n}\n";
        let outcome = parse(source);
        let finding = outcome
            .insecure_findings
            .iter()
            .find(|f| f.title.contains("gets"))
            .unwrap();
        assert_eq!(finding.line_number, 7);
        assert_eq!(finding.source_tag, "parser");
        assert_eq!(finding.cwe_id.as_deref(), Some("CWE-120"));
    }

    #[test]
    fn test_declared_names_are_not_flagged() {
        let outcome = parse("int system() { int printf = 1; return printf; }");
        // Only the use in `return printf;` counts
        assert_eq!(outcome.insecure_findings.len(), 1);
        assert_eq!(outcome.insecure_findings[0].title, "Unsafe printf() Usage");
    }

    #[test]
    fn test_calls_inside_conditions_and_bodies() {
        let source = "int main() {\n  while (scanf(\"%d\", &x)) {\n    if (1) strcpy(a, b);\n  }\n  return 0;\n}";
        let outcome = parse(source);
        let found: Vec<_> = outcome
            .insecure_findings
            .iter()
            .map(|f| (f.title.as_str(), f.line_number))
            .collect();
        assert_eq!(
            found,
            vec![("Unsafe scanf() Usage", 2), ("Unsafe strcpy() Usage", 3)]
        );
        assert!(outcome.warnings.is_empty(), "{:?}", outcome.warning_lines());
    }

    #[test]
    fn test_unclosed_function_body() {
        let outcome = parse("int main() {\n  int x = 1;\n  return x;\n");
        let lines = outcome.warning_lines();
        assert!(lines.iter().any(|w| w.contains("Unclosed function body")), "{:?}", lines);
        assert_eq!(outcome.parse_tree.children.len(), 1);
    }

    #[test]
    fn test_unclosed_parameters_at_eof() {
        let outcome = parse("int main(int argc, char **argv");
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.kind == DiagnosticKind::UnclosedParameters));
        assert!(outcome.parse_tree.children.is_empty());
    }

    #[test]
    fn test_missing_paren_before_body_still_scans_body() {
        let outcome = parse("void f(int a {\n  gets(a);\n}");
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.kind == DiagnosticKind::UnclosedParameters));
        assert_eq!(outcome.insecure_findings.len(), 1);
        assert_eq!(outcome.insecure_findings[0].line_number, 2);
    }

    #[test]
    fn test_preprocessor_is_skipped_with_warning() {
        let outcome = parse("#include <stdio.h>\nint main() { return 0; }");
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, DiagnosticKind::SkippedPreprocessor);
        assert_eq!(outcome.warnings[0].line, Some(1));
        assert_eq!(outcome.parse_tree.children.len(), 1);
    }

    #[test]
    fn test_invalid_top_level_skips_one_token() {
        let outcome = parse("foo bar\nint main() { return 0; }");
        let invalid = outcome
            .warnings
            .iter()
            .filter(|w| w.kind == DiagnosticKind::InvalidTopLevel)
            .count();
        assert_eq!(invalid, 2);
        assert_eq!(outcome.parse_tree.children.len(), 1);
    }

    #[test]
    fn test_missing_semicolon_in_declaration() {
        let outcome = parse("int main() {\n  int x = 5\n  return x;\n}");
        assert!(outcome
            .warning_lines()
            .iter()
            .any(|w| w.contains("Missing ';' in declaration")));
    }

    #[test]
    fn test_missing_semicolon_reports_statement_line() {
        let outcome = parse("int main() {\n  x = 1\n\n\n}");
        assert_eq!(outcome.warning_lines(), vec!["2: Missing ';' in statement".to_string()]);
    }

    #[test]
    fn test_array_declaration_and_initializer() {
        let outcome = parse("int main() { char buf[10 * 2]; int v[] = {1, 2, 3}; return 0; }");
        assert!(outcome.warnings.is_empty(), "{:?}", outcome.warning_lines());
        let body = outcome.parse_tree.children[0].child("FunctionBody").unwrap();
        assert_eq!(
            statement_kinds(body),
            vec!["Declaration", "Declaration", "ReturnStatement"]
        );
        let first = &body.children[0].children[0];
        assert!(first.child("ArraySize").is_some());
        let second = &body.children[1].children[0];
        assert!(second.child("InitializerList").is_some());
    }

    #[test]
    fn test_control_structures_and_else() {
        let source = "int f(int a) {\n  if (a > 1) { a = 2; } else a = 3;\n  for (int i = 0; i < a; i++) a--;\n  do { a++; } while (a < 10);\n  return a;\n}";
        let outcome = parse(source);
        assert!(outcome.warnings.is_empty(), "{:?}", outcome.warning_lines());
        let body = outcome.parse_tree.children[0].child("FunctionBody").unwrap();
        assert_eq!(
            statement_kinds(body),
            vec!["ControlStructure", "ControlStructure", "ControlStructure", "ReturnStatement"]
        );
    }

    #[test]
    fn test_switch_with_labels() {
        let source = "void f(int a) { switch (a) { case 1: gets(b); break; default: break; } }";
        let outcome = parse(source);
        assert!(outcome.warnings.is_empty(), "{:?}", outcome.warning_lines());
        assert_eq!(outcome.insecure_findings.len(), 1);
    }

    #[test]
    fn test_prototype_is_accepted() {
        let outcome = parse("int helper(int x);\nint main() { return helper(1); }");
        assert!(outcome.warnings.is_empty(), "{:?}", outcome.warning_lines());
        assert_eq!(outcome.parse_tree.children[0].name, "FunctionDeclaration");
        assert_eq!(outcome.parse_tree.children[1].name, "FunctionDefinition");
    }

    #[test]
    fn test_unclosed_call_parenthesis() {
        let outcome = parse("int main() {\n  printf(\"x\";\n  return 0;\n}");
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.kind == DiagnosticKind::UnclosedGroup && w.line == Some(2)));
    }

    #[test]
    fn test_expression_groups_are_nested() {
        let outcome = parse("void f() { x = a[(b + 1)]; }");
        let statement = &outcome.parse_tree.children[0]
            .child("FunctionBody")
            .unwrap()
            .children[0];
        let expression = statement.children[0].child("Expression").unwrap();
        let group = expression.child("Expression").unwrap();
        assert!(group.child("Expression").is_some());
    }

    #[test]
    fn test_deep_nesting_terminates() {
        let source = format!("int main() {{ x = {}1{}; }}", "(".repeat(5000), ")".repeat(5000));
        let outcome = parse(&source);
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.kind == DiagnosticKind::NestingLimit));

        let blocks = format!("int main() {}{}", "{".repeat(3000), "}".repeat(3000));
        let outcome = parse(&blocks);
        assert_eq!(outcome.parse_tree.name, "Program");
    }

    #[test]
    fn test_new_rejects_zero_line() {
        let tokens = vec![Token::new(TokenKind::Keyword, "int", 0)];
        assert!(matches!(Parser::new(tokens), Err(AnalyzerError::InvalidTokens(_))));
    }

    #[test]
    fn test_new_rejects_decreasing_lines() {
        let tokens = vec![
            Token::new(TokenKind::Keyword, "int", 3),
            Token::new(TokenKind::Identifier, "x", 2),
        ];
        assert!(Parser::new(tokens).is_err());
    }

    #[test]
    fn test_new_accepts_empty_and_drops_trivia() {
        let outcome = Parser::new(Vec::new()).unwrap().parse();
        assert!(outcome.parse_tree.children.is_empty());

        let tokens = crate::features::lexing::scan("int main() { return 0; }");
        let outcome = Parser::new(tokens).unwrap().parse();
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.parse_tree.children.len(), 1);
    }
}
