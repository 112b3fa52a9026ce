//! Checked construction of syntax tree nodes.
//!
//! A parser produces each child as an `Option<Node>`, `None` meaning the
//! sub-parse failed. The factories here report a missing required child as an
//! error diagnostic and refuse to build the node. Everything the failed call was
//! given is dropped with it.

use thiserror::Error;
use tracing::trace;
use tshpp_diagnostics::{Category, Diagnostic, Diagnostics, FatalError};
use tshpp_tokens::TokenKind;

use crate::location::SourceLocation;
use crate::node::{Node, NodeKind};
use crate::types::TypeDescriptor;

/// Why a node could not be built
#[derive(Debug, Error)]
pub enum AstError {
    #[error("missing {child} for {node}")]
    MissingChild {
        node: &'static str,
        child: &'static str,
    },
    #[error(transparent)]
    Fatal(#[from] FatalError),
}

pub type AstResult<T = Node> = Result<T, AstError>;

/// Builds nodes, reporting malformed ones to a diagnostics context
pub struct AstBuilder<'d> {
    diagnostics: &'d mut Diagnostics,
}

impl<'d> AstBuilder<'d> {
    pub fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &*self.diagnostics
    }

    pub fn program<I>(&mut self, declarations: I, location: SourceLocation) -> AstResult
    where
        I: IntoIterator,
        I::Item: Into<Option<Node>>,
    {
        let declarations = self.require_all("Program", "declaration", declarations, &location)?;
        Ok(Node::new(NodeKind::Program { declarations }, location))
    }

    /// A function with a body, or without one for a forward declaration.
    pub fn function_decl<I>(
        &mut self,
        name: impl Into<String>,
        params: I,
        body: Option<Node>,
        return_type: TypeDescriptor,
        location: SourceLocation,
    ) -> AstResult
    where
        I: IntoIterator,
        I::Item: Into<Option<Node>>,
    {
        let name = self.require_name("FunctionDecl", name.into(), &location)?;
        let params = self.require_all("FunctionDecl", "parameter", params, &location)?;
        Ok(Node::new(
            NodeKind::FunctionDecl {
                name,
                params,
                body: body.map(Box::new),
                return_type,
                is_external: false,
            },
            location,
        ))
    }

    /// An `екстерно` function, declared here and defined elsewhere
    pub fn external_decl<I>(
        &mut self,
        name: impl Into<String>,
        params: I,
        return_type: TypeDescriptor,
        location: SourceLocation,
    ) -> AstResult
    where
        I: IntoIterator,
        I::Item: Into<Option<Node>>,
    {
        let name = self.require_name("FunctionDecl", name.into(), &location)?;
        let params = self.require_all("FunctionDecl", "parameter", params, &location)?;
        Ok(Node::new(
            NodeKind::FunctionDecl {
                name,
                params,
                body: None,
                return_type,
                is_external: true,
            },
            location,
        ))
    }

    pub fn var_decl(
        &mut self,
        name: impl Into<String>,
        initializer: Option<Node>,
        var_type: TypeDescriptor,
        location: SourceLocation,
    ) -> AstResult {
        let name = self.require_name("VarDecl", name.into(), &location)?;
        Ok(Node::new(
            NodeKind::VarDecl {
                name,
                initializer: initializer.map(Box::new),
                var_type,
            },
            location,
        ))
    }

    pub fn array_decl<I>(
        &mut self,
        name: impl Into<String>,
        size: usize,
        initializers: I,
        element_type: TypeDescriptor,
        location: SourceLocation,
    ) -> AstResult
    where
        I: IntoIterator,
        I::Item: Into<Option<Node>>,
    {
        let name = self.require_name("ArrayDecl", name.into(), &location)?;
        let initializers = self.require_all("ArrayDecl", "initializer", initializers, &location)?;
        Ok(Node::new(
            NodeKind::ArrayDecl {
                name,
                size,
                initializers,
                element_type,
            },
            location,
        ))
    }

    pub fn block<I>(&mut self, statements: I, location: SourceLocation) -> AstResult
    where
        I: IntoIterator,
        I::Item: Into<Option<Node>>,
    {
        let statements = self.require_all("Block", "statement", statements, &location)?;
        Ok(Node::new(NodeKind::Block { statements }, location))
    }

    pub fn if_stmt(
        &mut self,
        condition: Option<Node>,
        then_branch: Option<Node>,
        else_branch: Option<Node>,
        location: SourceLocation,
    ) -> AstResult {
        let condition = self.require("IfStmt", "condition", condition, &location)?;
        let then_branch = self.require("IfStmt", "then branch", then_branch, &location)?;
        Ok(Node::new(
            NodeKind::IfStmt {
                condition,
                then_branch,
                else_branch: else_branch.map(Box::new),
            },
            location,
        ))
    }

    pub fn while_stmt(
        &mut self,
        condition: Option<Node>,
        body: Option<Node>,
        location: SourceLocation,
    ) -> AstResult {
        let condition = self.require("WhileStmt", "condition", condition, &location)?;
        let body = self.require("WhileStmt", "body", body, &location)?;
        Ok(Node::new(NodeKind::WhileStmt { condition, body }, location))
    }

    /// Only the body of a `за` loop is required.
    pub fn for_stmt(
        &mut self,
        initializer: Option<Node>,
        condition: Option<Node>,
        increment: Option<Node>,
        body: Option<Node>,
        location: SourceLocation,
    ) -> AstResult {
        let body = self.require("ForStmt", "body", body, &location)?;
        Ok(Node::new(
            NodeKind::ForStmt {
                initializer: initializer.map(Box::new),
                condition: condition.map(Box::new),
                increment: increment.map(Box::new),
                body,
            },
            location,
        ))
    }

    pub fn do_while_stmt(
        &mut self,
        body: Option<Node>,
        condition: Option<Node>,
        location: SourceLocation,
    ) -> AstResult {
        let body = self.require("DoWhileStmt", "body", body, &location)?;
        let condition = self.require("DoWhileStmt", "condition", condition, &location)?;
        Ok(Node::new(NodeKind::DoWhileStmt { body, condition }, location))
    }

    pub fn return_stmt(&mut self, value: Option<Node>, location: SourceLocation) -> Node {
        Node::new(
            NodeKind::ReturnStmt {
                value: value.map(Box::new),
            },
            location,
        )
    }

    pub fn break_stmt(&mut self, location: SourceLocation) -> Node {
        Node::new(NodeKind::BreakStmt, location)
    }

    pub fn expr_stmt(&mut self, expression: Option<Node>, location: SourceLocation) -> AstResult {
        let expression = self.require("ExprStmt", "expression", expression, &location)?;
        Ok(Node::new(NodeKind::ExprStmt { expression }, location))
    }

    pub fn binary_expr(
        &mut self,
        left: Option<Node>,
        operator: TokenKind,
        right: Option<Node>,
        location: SourceLocation,
    ) -> AstResult {
        let left = self.require("BinaryExpr", "left operand", left, &location)?;
        let right = self.require("BinaryExpr", "right operand", right, &location)?;
        Ok(Node::new(
            NodeKind::BinaryExpr {
                left,
                operator,
                right,
            },
            location,
        ))
    }

    pub fn unary_expr(
        &mut self,
        operand: Option<Node>,
        operator: TokenKind,
        is_prefix: bool,
        location: SourceLocation,
    ) -> AstResult {
        let operand = self.require("UnaryExpr", "operand", operand, &location)?;
        Ok(Node::new(
            NodeKind::UnaryExpr {
                operand,
                operator,
                is_prefix,
            },
            location,
        ))
    }

    pub fn int_literal(&mut self, value: i64, location: SourceLocation) -> Node {
        Node::new(NodeKind::IntLiteral(value), location)
    }

    pub fn char_literal(&mut self, value: char, location: SourceLocation) -> Node {
        Node::new(NodeKind::CharLiteral(value), location)
    }

    pub fn string_literal(&mut self, value: impl Into<String>, location: SourceLocation) -> Node {
        Node::new(NodeKind::StringLiteral(value.into()), location)
    }

    pub fn bool_literal(&mut self, value: bool, location: SourceLocation) -> Node {
        Node::new(NodeKind::BoolLiteral(value), location)
    }

    pub fn identifier(&mut self, name: impl Into<String>, location: SourceLocation) -> AstResult {
        let name = self.require_name("Identifier", name.into(), &location)?;
        Ok(Node::new(NodeKind::Identifier(name), location))
    }

    pub fn array_access(
        &mut self,
        array: Option<Node>,
        index: Option<Node>,
        location: SourceLocation,
    ) -> AstResult {
        let array = self.require("ArrayAccess", "array", array, &location)?;
        let index = self.require("ArrayAccess", "index", index, &location)?;
        Ok(Node::new(NodeKind::ArrayAccess { array, index }, location))
    }

    pub fn call_expr<I>(
        &mut self,
        callee: Option<Node>,
        arguments: I,
        location: SourceLocation,
    ) -> AstResult
    where
        I: IntoIterator,
        I::Item: Into<Option<Node>>,
    {
        let callee = self.require("CallExpr", "callee", callee, &location)?;
        let arguments = self.require_all("CallExpr", "argument", arguments, &location)?;
        Ok(Node::new(NodeKind::CallExpr { callee, arguments }, location))
    }

    pub fn assignment(
        &mut self,
        target: Option<Node>,
        value: Option<Node>,
        location: SourceLocation,
    ) -> AstResult {
        let target = self.require("Assignment", "target", target, &location)?;
        let value = self.require("Assignment", "value", value, &location)?;
        Ok(Node::new(NodeKind::Assignment { target, value }, location))
    }

    pub fn type_node(&mut self, ty: TypeDescriptor, location: SourceLocation) -> Node {
        Node::new(NodeKind::Type(ty), location)
    }

    fn require(
        &mut self,
        node: &'static str,
        child: &'static str,
        value: Option<Node>,
        location: &SourceLocation,
    ) -> AstResult<Box<Node>> {
        match value {
            Some(value) => Ok(Box::new(value)),
            None => Err(self.missing(node, child, location)),
        }
    }

    fn require_all<I>(
        &mut self,
        node: &'static str,
        child: &'static str,
        values: I,
        location: &SourceLocation,
    ) -> AstResult<Vec<Node>>
    where
        I: IntoIterator,
        I::Item: Into<Option<Node>>,
    {
        let mut nodes = Vec::new();
        for value in values {
            match value.into() {
                Some(value) => nodes.push(value),
                None => return Err(self.missing(node, child, location)),
            }
        }
        Ok(nodes)
    }

    fn require_name(
        &mut self,
        node: &'static str,
        name: String,
        location: &SourceLocation,
    ) -> AstResult<String> {
        if name.is_empty() {
            Err(self.missing(node, "name", location))
        } else {
            Ok(name)
        }
    }

    #[track_caller]
    fn missing(
        &mut self,
        node: &'static str,
        child: &'static str,
        location: &SourceLocation,
    ) -> AstError {
        trace!("refusing to build {node} at {location}: no {child}");
        let diagnostic = Diagnostic::error(Category::Internal, format!("missing {child} for {node}"))
            .at(location.file(), location.line, location.column);
        match self.diagnostics.report(diagnostic) {
            Ok(()) => AstError::MissingChild { node, child },
            Err(fatal) => AstError::Fatal(fatal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;
    use tshpp_diagnostics::Severity;

    fn at(line: u32) -> SourceLocation {
        SourceLocation::at(line, 1)
    }

    #[test]
    fn builds_if_with_optional_else() {
        let mut diagnostics = Diagnostics::quiet();
        let mut builder = AstBuilder::new(&mut diagnostics);
        let condition = builder.bool_literal(true, at(1));
        let then_branch = builder.break_stmt(at(1));
        let node = builder
            .if_stmt(Some(condition), Some(then_branch), None, at(1))
            .unwrap();
        assert_eq!(node.kind_name(), "IfStmt");
        assert_eq!(node.children().len(), 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn missing_child_is_reported() {
        let mut diagnostics = Diagnostics::quiet();
        let mut builder = AstBuilder::new(&mut diagnostics);
        let body = builder.break_stmt(at(4));
        let result = builder.while_stmt(None, Some(body), at(4));
        assert!(matches!(
            result,
            Err(AstError::MissingChild {
                node: "WhileStmt",
                child: "condition"
            })
        ));

        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.severity(), Severity::Error);
        assert_eq!(diagnostic.category(), Category::Internal);
        assert_eq!(diagnostic.message(), "missing condition for WhileStmt");
        assert_eq!(diagnostic.line(), 4);
    }

    #[test]
    fn missing_list_element_fails_whole_list() {
        let mut diagnostics = Diagnostics::quiet();
        let mut builder = AstBuilder::new(&mut diagnostics);
        let first = builder.int_literal(1, at(2));
        let result = builder.array_decl(
            "низ",
            3,
            vec![Some(first), None],
            TypeDescriptor::Int,
            at(2),
        );
        assert!(matches!(
            result,
            Err(AstError::MissingChild {
                child: "initializer",
                ..
            })
        ));
        assert_eq!(diagnostics.errors(), 1);
    }

    #[test]
    fn empty_name_is_missing() {
        let mut diagnostics = Diagnostics::quiet();
        let mut builder = AstBuilder::new(&mut diagnostics);
        assert!(builder.identifier("", at(1)).is_err());
        assert!(builder.identifier("бројач", at(1)).is_ok());
        assert_eq!(builder.diagnostics().errors(), 1);
    }

    #[test]
    fn external_has_no_body() {
        let mut diagnostics = Diagnostics::quiet();
        let mut builder = AstBuilder::new(&mut diagnostics);
        let param = builder
            .var_decl("x", None, TypeDescriptor::Int, at(1))
            .unwrap();
        let node = builder
            .external_decl("штампај", [param], TypeDescriptor::Void, at(1))
            .unwrap();
        match node.kind() {
            NodeKind::FunctionDecl {
                is_external, body, ..
            } => {
                assert!(*is_external);
                assert!(body.is_none());
            }
            other => panic!("unexpected {}", other.name()),
        }
    }
}
