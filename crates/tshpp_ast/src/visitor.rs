//! Visiting syntax trees.
//!
//! [`Node::accept`] walks a tree pre-order, depth first, with children in
//! declaration order. Every node is first handed to [`Visitor::visit_node`],
//! which dispatches to the callback for its variant. All callbacks default to
//! doing nothing. Returning `Err` from any callback stops the walk, and the
//! error is returned from `accept` without visiting anything else.

use tshpp_common::ensure_sufficient_stack;
use tshpp_visitor_gen::visitor;

use crate::node::{Node, NodeKind};

visitor! {
    /// A read-only visitor over a syntax tree
    pub trait Visitor {
        /// Called for every node. Overrides should call [`visit_node`] to keep
        /// the per-variant callbacks.
        visit fn node(v, node: &Node) -> Result<()> {
            match node.kind() {
                NodeKind::Program { .. } => v.visit_program(node),
                NodeKind::FunctionDecl { .. } => v.visit_function_decl(node),
                NodeKind::VarDecl { .. } => v.visit_var_decl(node),
                NodeKind::ArrayDecl { .. } => v.visit_array_decl(node),
                NodeKind::Block { .. } => v.visit_block(node),
                NodeKind::IfStmt { .. } => v.visit_if_stmt(node),
                NodeKind::WhileStmt { .. } => v.visit_while_stmt(node),
                NodeKind::ForStmt { .. } => v.visit_for_stmt(node),
                NodeKind::DoWhileStmt { .. } => v.visit_do_while_stmt(node),
                NodeKind::ReturnStmt { .. } => v.visit_return_stmt(node),
                NodeKind::BreakStmt => v.visit_break_stmt(node),
                NodeKind::ExprStmt { .. } => v.visit_expr_stmt(node),
                NodeKind::BinaryExpr { .. } => v.visit_binary_expr(node),
                NodeKind::UnaryExpr { .. } => v.visit_unary_expr(node),
                NodeKind::IntLiteral(_) => v.visit_int_literal(node),
                NodeKind::CharLiteral(_) => v.visit_char_literal(node),
                NodeKind::StringLiteral(_) => v.visit_string_literal(node),
                NodeKind::BoolLiteral(_) => v.visit_bool_literal(node),
                NodeKind::Identifier(_) => v.visit_identifier(node),
                NodeKind::ArrayAccess { .. } => v.visit_array_access(node),
                NodeKind::CallExpr { .. } => v.visit_call_expr(node),
                NodeKind::Assignment { .. } => v.visit_assignment(node),
                NodeKind::Type(_) => v.visit_type_node(node),
            }
        }

        visit fn program(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn function_decl(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn var_decl(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn array_decl(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn block(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn if_stmt(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn while_stmt(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn for_stmt(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn do_while_stmt(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn return_stmt(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn break_stmt(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn expr_stmt(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn binary_expr(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn unary_expr(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn int_literal(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn char_literal(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn string_literal(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn bool_literal(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn identifier(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn array_access(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn call_expr(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn assignment(v, node: &Node) -> Result<()> { Ok(()) }
        visit fn type_node(v, node: &Node) -> Result<()> { Ok(()) }
    }
}

visitor! {
    /// A visitor that may rewrite the nodes it visits, such as the semantic
    /// stage filling in resolved types
    pub trait VisitorMut {
        /// Called for every node. Overrides should call [`visit_node_mut`] to
        /// keep the per-variant callbacks.
        visit fn node_mut(v, node: &mut Node) -> Result<()> {
            match node.kind() {
                NodeKind::Program { .. } => v.visit_program_mut(node),
                NodeKind::FunctionDecl { .. } => v.visit_function_decl_mut(node),
                NodeKind::VarDecl { .. } => v.visit_var_decl_mut(node),
                NodeKind::ArrayDecl { .. } => v.visit_array_decl_mut(node),
                NodeKind::Block { .. } => v.visit_block_mut(node),
                NodeKind::IfStmt { .. } => v.visit_if_stmt_mut(node),
                NodeKind::WhileStmt { .. } => v.visit_while_stmt_mut(node),
                NodeKind::ForStmt { .. } => v.visit_for_stmt_mut(node),
                NodeKind::DoWhileStmt { .. } => v.visit_do_while_stmt_mut(node),
                NodeKind::ReturnStmt { .. } => v.visit_return_stmt_mut(node),
                NodeKind::BreakStmt => v.visit_break_stmt_mut(node),
                NodeKind::ExprStmt { .. } => v.visit_expr_stmt_mut(node),
                NodeKind::BinaryExpr { .. } => v.visit_binary_expr_mut(node),
                NodeKind::UnaryExpr { .. } => v.visit_unary_expr_mut(node),
                NodeKind::IntLiteral(_) => v.visit_int_literal_mut(node),
                NodeKind::CharLiteral(_) => v.visit_char_literal_mut(node),
                NodeKind::StringLiteral(_) => v.visit_string_literal_mut(node),
                NodeKind::BoolLiteral(_) => v.visit_bool_literal_mut(node),
                NodeKind::Identifier(_) => v.visit_identifier_mut(node),
                NodeKind::ArrayAccess { .. } => v.visit_array_access_mut(node),
                NodeKind::CallExpr { .. } => v.visit_call_expr_mut(node),
                NodeKind::Assignment { .. } => v.visit_assignment_mut(node),
                NodeKind::Type(_) => v.visit_type_node_mut(node),
            }
        }

        visit fn program_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn function_decl_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn var_decl_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn array_decl_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn block_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn if_stmt_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn while_stmt_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn for_stmt_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn do_while_stmt_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn return_stmt_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn break_stmt_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn expr_stmt_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn binary_expr_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn unary_expr_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn int_literal_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn char_literal_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn string_literal_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn bool_literal_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn identifier_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn array_access_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn call_expr_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn assignment_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
        visit fn type_node_mut(v, node: &mut Node) -> Result<()> { Ok(()) }
    }
}

impl Node {
    /// Walks this tree with a visitor, pre-order.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Err> {
        ensure_sufficient_stack(|| {
            visitor.visit_node(self)?;
            for child in self.children() {
                child.accept(visitor)?;
            }
            Ok(())
        })
    }

    /// Walks this tree with a mutating visitor, pre-order. Children are
    /// collected after the callback for their parent has returned.
    pub fn accept_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V) -> Result<(), V::Err> {
        ensure_sufficient_stack(|| {
            visitor.visit_node_mut(self)?;
            for child in self.children_mut() {
                child.accept_mut(visitor)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::SourceLocation;
    use crate::types::TypeDescriptor;
    use test_log::test;
    use tshpp_tokens::TokenKind;

    fn leaf(kind: NodeKind) -> Box<Node> {
        Box::new(Node::new(kind, SourceLocation::at(1, 1)))
    }

    /// `a + 1 < b`
    fn comparison() -> Node {
        let sum = Node::new(
            NodeKind::BinaryExpr {
                left: leaf(NodeKind::Identifier("a".to_string())),
                operator: TokenKind::Plus,
                right: leaf(NodeKind::IntLiteral(1)),
            },
            SourceLocation::at(1, 1),
        );
        Node::new(
            NodeKind::BinaryExpr {
                left: Box::new(sum),
                operator: TokenKind::Lt,
                right: leaf(NodeKind::Identifier("b".to_string())),
            },
            SourceLocation::at(1, 1),
        )
    }

    #[derive(Default)]
    struct Names(Vec<&'static str>);

    impl Visitor for Names {
        type Err = ();

        fn visit_node(&mut self, node: &Node) -> Result<(), ()> {
            self.0.push(node.kind_name());
            visit_node(self, node)
        }
    }

    #[test]
    fn pre_order() {
        let mut names = Names::default();
        comparison().accept(&mut names).unwrap();
        assert_eq!(
            names.0,
            [
                "BinaryExpr",
                "BinaryExpr",
                "Identifier",
                "IntLiteral",
                "Identifier"
            ]
        );
    }

    struct FindInt;

    impl Visitor for FindInt {
        type Err = i64;

        fn visit_int_literal(&mut self, node: &Node) -> Result<(), i64> {
            match node.kind() {
                NodeKind::IntLiteral(value) => Err(*value),
                _ => Ok(()),
            }
        }

        fn visit_identifier(&mut self, node: &Node) -> Result<(), i64> {
            match node.kind() {
                NodeKind::Identifier(name) if name == "b" => {
                    panic!("visited a sibling after stopping")
                }
                _ => Ok(()),
            }
        }
    }

    #[test]
    fn stop_propagates() {
        assert_eq!(comparison().accept(&mut FindInt), Err(1));
    }

    struct Annotate;

    impl VisitorMut for Annotate {
        type Err = std::convert::Infallible;

        fn visit_identifier_mut(&mut self, node: &mut Node) -> Result<(), Self::Err> {
            node.set_resolved_type(TypeDescriptor::Int);
            Ok(())
        }
    }

    #[test]
    fn mutable_visit_reaches_every_identifier() {
        let mut tree = comparison();
        tree.accept_mut(&mut Annotate).unwrap();

        struct Check(usize);
        impl Visitor for Check {
            type Err = ();
            fn visit_identifier(&mut self, node: &Node) -> Result<(), ()> {
                assert_eq!(node.resolved_type(), Some(&TypeDescriptor::Int));
                self.0 += 1;
                Ok(())
            }
        }
        let mut check = Check(0);
        tree.accept(&mut check).unwrap();
        assert_eq!(check.0, 2);
    }
}
