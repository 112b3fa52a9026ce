//! Indented debug dumps of syntax trees

use std::fmt::{self, Display, Formatter};

use tshpp_common::ensure_sufficient_stack;

use crate::node::{Node, NodeKind};

/// Dumps a tree, two spaces per level, starting at some indent.
///
/// An absent tree prints as `(null)`.
#[derive(Debug, Clone, Copy)]
pub struct AstPrinter<'a> {
    root: Option<&'a Node>,
    indent: usize,
}

impl<'a> AstPrinter<'a> {
    pub fn new(root: Option<&'a Node>) -> Self {
        Self { root, indent: 0 }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Display for AstPrinter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_node(f, self.root, self.indent)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_node(f, Some(self), 0)
    }
}

fn pad(f: &mut Formatter<'_>, indent: usize) -> fmt::Result {
    write!(f, "{:width$}", "", width = indent * 2)
}

fn labeled(f: &mut Formatter<'_>, label: &str, node: &Node, indent: usize) -> fmt::Result {
    pad(f, indent + 1)?;
    writeln!(f, "{label}:")?;
    write_node(f, Some(node), indent + 2)
}

fn write_node(f: &mut Formatter<'_>, node: Option<&Node>, indent: usize) -> fmt::Result {
    let Some(node) = node else {
        pad(f, indent)?;
        return writeln!(f, "(null)");
    };
    ensure_sufficient_stack(|| {
        pad(f, indent)?;
        f.write_str(node.kind_name())?;
        match node.kind() {
            NodeKind::Program { declarations } => {
                writeln!(f, " (declarations: {})", declarations.len())?;
                for declaration in declarations {
                    write_node(f, Some(declaration), indent + 1)?;
                }
            }
            NodeKind::FunctionDecl {
                name,
                params,
                body,
                return_type,
                is_external,
            } => {
                writeln!(
                    f,
                    " (name: {name}, params: {}, external: {is_external})",
                    params.len()
                )?;
                pad(f, indent + 1)?;
                writeln!(f, "Return type: {}", return_type.name())?;
                for (index, param) in params.iter().enumerate() {
                    labeled(f, &format!("Parameter {index}"), param, indent)?;
                }
                if let Some(body) = body {
                    labeled(f, "Body", body, indent)?;
                }
            }
            NodeKind::VarDecl {
                name,
                initializer,
                var_type,
            } => {
                writeln!(f, " (name: {name})")?;
                pad(f, indent + 1)?;
                writeln!(f, "Type: {}", var_type.name())?;
                if let Some(initializer) = initializer {
                    labeled(f, "Initializer", initializer, indent)?;
                }
            }
            NodeKind::ArrayDecl {
                name,
                size,
                initializers,
                element_type,
            } => {
                writeln!(
                    f,
                    " (name: {name}, size: {size}, initializers: {})",
                    initializers.len()
                )?;
                pad(f, indent + 1)?;
                writeln!(f, "Element type: {}", element_type.name())?;
                for (index, initializer) in initializers.iter().enumerate() {
                    labeled(f, &format!("Initializer {index}"), initializer, indent)?;
                }
            }
            NodeKind::Block { statements } => {
                writeln!(f, " (statements: {})", statements.len())?;
                for statement in statements {
                    write_node(f, Some(statement), indent + 1)?;
                }
            }
            NodeKind::IfStmt {
                condition,
                then_branch,
                else_branch,
            } => {
                writeln!(f)?;
                labeled(f, "Condition", condition, indent)?;
                labeled(f, "Then branch", then_branch, indent)?;
                if let Some(else_branch) = else_branch {
                    labeled(f, "Else branch", else_branch, indent)?;
                }
            }
            NodeKind::WhileStmt { condition, body } => {
                writeln!(f)?;
                labeled(f, "Condition", condition, indent)?;
                labeled(f, "Body", body, indent)?;
            }
            NodeKind::DoWhileStmt { body, condition } => {
                writeln!(f)?;
                labeled(f, "Body", body, indent)?;
                labeled(f, "Condition", condition, indent)?;
            }
            NodeKind::ForStmt {
                initializer,
                condition,
                increment,
                body,
            } => {
                writeln!(f)?;
                if let Some(initializer) = initializer {
                    labeled(f, "Initializer", initializer, indent)?;
                }
                if let Some(condition) = condition {
                    labeled(f, "Condition", condition, indent)?;
                }
                if let Some(increment) = increment {
                    labeled(f, "Increment", increment, indent)?;
                }
                labeled(f, "Body", body, indent)?;
            }
            NodeKind::ReturnStmt { value } => {
                writeln!(f)?;
                if let Some(value) = value {
                    labeled(f, "Value", value, indent)?;
                }
            }
            NodeKind::BreakStmt => writeln!(f)?,
            NodeKind::ExprStmt { expression } => {
                writeln!(f)?;
                write_node(f, Some(expression), indent + 1)?;
            }
            NodeKind::BinaryExpr {
                left,
                operator,
                right,
            } => {
                writeln!(f, " (operator: {})", operator.name())?;
                labeled(f, "Left", left, indent)?;
                labeled(f, "Right", right, indent)?;
            }
            NodeKind::UnaryExpr {
                operand,
                operator,
                is_prefix,
            } => {
                writeln!(f, " (operator: {}, prefix: {is_prefix})", operator.name())?;
                labeled(f, "Operand", operand, indent)?;
            }
            NodeKind::IntLiteral(value) => writeln!(f, " (value: {value})")?,
            NodeKind::CharLiteral(value) => {
                if (' '..='~').contains(value) {
                    writeln!(f, " (value: '{value}')")?
                } else {
                    writeln!(f, " (value: '\\u{:04x}')", u32::from(*value))?
                }
            }
            NodeKind::StringLiteral(value) => writeln!(f, " (value: \"{value}\")")?,
            NodeKind::BoolLiteral(value) => writeln!(f, " (value: {value})")?,
            NodeKind::Identifier(name) => writeln!(f, " (name: {name})")?,
            NodeKind::ArrayAccess { array, index } => {
                writeln!(f)?;
                labeled(f, "Array", array, indent)?;
                labeled(f, "Index", index, indent)?;
            }
            NodeKind::CallExpr { callee, arguments } => {
                writeln!(f, " (arguments: {})", arguments.len())?;
                labeled(f, "Callee", callee, indent)?;
                for (index, argument) in arguments.iter().enumerate() {
                    labeled(f, &format!("Argument {index}"), argument, indent)?;
                }
            }
            NodeKind::Assignment { target, value } => {
                writeln!(f)?;
                labeled(f, "Target", target, indent)?;
                labeled(f, "Value", value, indent)?;
            }
            NodeKind::Type(ty) => writeln!(f, " (type: {})", ty.name())?,
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::AstBuilder;
    use crate::location::SourceLocation;
    use crate::types::TypeDescriptor;
    use test_log::test;
    use tshpp_diagnostics::Diagnostics;
    use tshpp_tokens::TokenKind;

    #[test]
    fn prints_function() {
        let mut diagnostics = Diagnostics::quiet();
        let mut b = AstBuilder::new(&mut diagnostics);
        let loc = || SourceLocation::at(1, 1);

        let param = b.var_decl("н", None, TypeDescriptor::Int, loc()).unwrap();
        let n = b.identifier("н", loc()).unwrap();
        let one = b.int_literal(1, loc());
        let sum = b
            .binary_expr(Some(n), TokenKind::Plus, Some(one), loc())
            .unwrap();
        let ret = b.return_stmt(Some(sum), loc());
        let body = b.block([ret], loc()).unwrap();
        let function = b
            .function_decl("следећи", [param], Some(body), TypeDescriptor::Int, loc())
            .unwrap();

        let expected = "\
FunctionDecl (name: следећи, params: 1, external: false)
  Return type: int
  Parameter 0:
    VarDecl (name: н)
      Type: int
  Body:
    Block (statements: 1)
      ReturnStmt
        Value:
          BinaryExpr (operator: +)
            Left:
              Identifier (name: н)
            Right:
              IntLiteral (value: 1)
";
        assert_eq!(function.to_string(), expected);
    }

    #[test]
    fn prints_char_escapes() {
        let node = Node::new(NodeKind::CharLiteral('ћ'), SourceLocation::default());
        assert_eq!(node.to_string(), "CharLiteral (value: '\\u045b')\n");
        let node = Node::new(NodeKind::CharLiteral('a'), SourceLocation::default());
        assert_eq!(node.to_string(), "CharLiteral (value: 'a')\n");
    }

    #[test]
    fn prints_null_with_indent() {
        assert_eq!(AstPrinter::new(None).with_indent(2).to_string(), "    (null)\n");
    }
}
