//! Syntax tree nodes

use std::mem;

use tshpp_common::ensure_sufficient_stack;
use tshpp_tokens::TokenKind;

use crate::location::SourceLocation;
use crate::types::TypeDescriptor;

/// A node in the syntax tree.
///
/// A node exclusively owns its children, its strings and its resolved type.
/// Clone, drop and equality walk the tree inside a stack growth guard, so trees
/// of any depth can be copied, compared and released.
#[derive(Debug)]
pub struct Node {
    kind: NodeKind,
    location: SourceLocation,
    resolved_type: Option<TypeDescriptor>,
}

/// The closed set of node variants
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program {
        declarations: Vec<Node>,
    },
    /// A function definition, or an external declaration without a body
    FunctionDecl {
        name: String,
        params: Vec<Node>,
        body: Option<Box<Node>>,
        return_type: TypeDescriptor,
        is_external: bool,
    },
    VarDecl {
        name: String,
        initializer: Option<Box<Node>>,
        var_type: TypeDescriptor,
    },
    ArrayDecl {
        name: String,
        size: usize,
        initializers: Vec<Node>,
        element_type: TypeDescriptor,
    },
    Block {
        statements: Vec<Node>,
    },
    IfStmt {
        condition: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    WhileStmt {
        condition: Box<Node>,
        body: Box<Node>,
    },
    ForStmt {
        initializer: Option<Box<Node>>,
        condition: Option<Box<Node>>,
        increment: Option<Box<Node>>,
        body: Box<Node>,
    },
    DoWhileStmt {
        body: Box<Node>,
        condition: Box<Node>,
    },
    ReturnStmt {
        value: Option<Box<Node>>,
    },
    BreakStmt,
    ExprStmt {
        expression: Box<Node>,
    },
    BinaryExpr {
        left: Box<Node>,
        operator: TokenKind,
        right: Box<Node>,
    },
    UnaryExpr {
        operand: Box<Node>,
        operator: TokenKind,
        is_prefix: bool,
    },
    IntLiteral(i64),
    CharLiteral(char),
    StringLiteral(String),
    BoolLiteral(bool),
    Identifier(String),
    ArrayAccess {
        array: Box<Node>,
        index: Box<Node>,
    },
    CallExpr {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    Assignment {
        target: Box<Node>,
        value: Box<Node>,
    },
    Type(TypeDescriptor),
}

impl NodeKind {
    /// The name of the variant, as used in tree dumps
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "Program",
            NodeKind::FunctionDecl { .. } => "FunctionDecl",
            NodeKind::VarDecl { .. } => "VarDecl",
            NodeKind::ArrayDecl { .. } => "ArrayDecl",
            NodeKind::Block { .. } => "Block",
            NodeKind::IfStmt { .. } => "IfStmt",
            NodeKind::WhileStmt { .. } => "WhileStmt",
            NodeKind::ForStmt { .. } => "ForStmt",
            NodeKind::DoWhileStmt { .. } => "DoWhileStmt",
            NodeKind::ReturnStmt { .. } => "ReturnStmt",
            NodeKind::BreakStmt => "BreakStmt",
            NodeKind::ExprStmt { .. } => "ExprStmt",
            NodeKind::BinaryExpr { .. } => "BinaryExpr",
            NodeKind::UnaryExpr { .. } => "UnaryExpr",
            NodeKind::IntLiteral(_) => "IntLiteral",
            NodeKind::CharLiteral(_) => "CharLiteral",
            NodeKind::StringLiteral(_) => "StringLiteral",
            NodeKind::BoolLiteral(_) => "BoolLiteral",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::ArrayAccess { .. } => "ArrayAccess",
            NodeKind::CallExpr { .. } => "CallExpr",
            NodeKind::Assignment { .. } => "Assignment",
            NodeKind::Type(_) => "Type",
        }
    }

    /// Whether this variant can never own a child node
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::BreakStmt
                | NodeKind::IntLiteral(_)
                | NodeKind::CharLiteral(_)
                | NodeKind::StringLiteral(_)
                | NodeKind::BoolLiteral(_)
                | NodeKind::Identifier(_)
                | NodeKind::Type(_)
        )
    }
}

impl Node {
    pub fn new(kind: NodeKind, location: SourceLocation) -> Self {
        Self {
            kind,
            location,
            resolved_type: None,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// The type assigned during semantic analysis, if any
    pub fn resolved_type(&self) -> Option<&TypeDescriptor> {
        self.resolved_type.as_ref()
    }

    /// Replaces the resolved type, returning the previous one
    pub fn set_resolved_type(&mut self, ty: TypeDescriptor) -> Option<TypeDescriptor> {
        self.resolved_type.replace(ty)
    }

    /// The direct children of this node, in declaration order
    pub fn children(&self) -> Vec<&Node> {
        let mut children: Vec<&Node> = Vec::new();
        match &self.kind {
            NodeKind::Program { declarations: list }
            | NodeKind::ArrayDecl {
                initializers: list, ..
            }
            | NodeKind::Block { statements: list } => children.extend(list),
            NodeKind::FunctionDecl { params, body, .. } => {
                children.extend(params);
                children.extend(body.as_deref());
            }
            NodeKind::VarDecl { initializer, .. } => children.extend(initializer.as_deref()),
            NodeKind::IfStmt {
                condition,
                then_branch,
                else_branch,
            } => {
                children.push(condition);
                children.push(then_branch);
                children.extend(else_branch.as_deref());
            }
            NodeKind::WhileStmt { condition, body } => {
                children.push(condition);
                children.push(body);
            }
            NodeKind::ForStmt {
                initializer,
                condition,
                increment,
                body,
            } => {
                children.extend(initializer.as_deref());
                children.extend(condition.as_deref());
                children.extend(increment.as_deref());
                children.push(body);
            }
            NodeKind::DoWhileStmt { body, condition } => {
                children.push(body);
                children.push(condition);
            }
            NodeKind::ReturnStmt { value } => children.extend(value.as_deref()),
            NodeKind::ExprStmt { expression } => children.push(expression),
            NodeKind::BinaryExpr { left, right, .. } => {
                children.push(left);
                children.push(right);
            }
            NodeKind::UnaryExpr { operand, .. } => children.push(operand),
            NodeKind::ArrayAccess { array, index } => {
                children.push(array);
                children.push(index);
            }
            NodeKind::CallExpr { callee, arguments } => {
                children.push(callee);
                children.extend(arguments);
            }
            NodeKind::Assignment { target, value } => {
                children.push(target);
                children.push(value);
            }
            NodeKind::BreakStmt
            | NodeKind::IntLiteral(_)
            | NodeKind::CharLiteral(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::BoolLiteral(_)
            | NodeKind::Identifier(_)
            | NodeKind::Type(_) => {}
        }
        children
    }

    /// Mutable access to the direct children of this node, in declaration order
    pub fn children_mut(&mut self) -> Vec<&mut Node> {
        let mut children: Vec<&mut Node> = Vec::new();
        match &mut self.kind {
            NodeKind::Program { declarations: list }
            | NodeKind::ArrayDecl {
                initializers: list, ..
            }
            | NodeKind::Block { statements: list } => children.extend(list),
            NodeKind::FunctionDecl { params, body, .. } => {
                children.extend(params);
                children.extend(body.as_deref_mut());
            }
            NodeKind::VarDecl { initializer, .. } => children.extend(initializer.as_deref_mut()),
            NodeKind::IfStmt {
                condition,
                then_branch,
                else_branch,
            } => {
                children.push(&mut **condition);
                children.push(&mut **then_branch);
                children.extend(else_branch.as_deref_mut());
            }
            NodeKind::WhileStmt { condition, body } => {
                children.push(&mut **condition);
                children.push(&mut **body);
            }
            NodeKind::ForStmt {
                initializer,
                condition,
                increment,
                body,
            } => {
                children.extend(initializer.as_deref_mut());
                children.extend(condition.as_deref_mut());
                children.extend(increment.as_deref_mut());
                children.push(&mut **body);
            }
            NodeKind::DoWhileStmt { body, condition } => {
                children.push(&mut **body);
                children.push(&mut **condition);
            }
            NodeKind::ReturnStmt { value } => children.extend(value.as_deref_mut()),
            NodeKind::ExprStmt { expression } => children.push(&mut **expression),
            NodeKind::BinaryExpr { left, right, .. } => {
                children.push(&mut **left);
                children.push(&mut **right);
            }
            NodeKind::UnaryExpr { operand, .. } => children.push(&mut **operand),
            NodeKind::ArrayAccess { array, index } => {
                children.push(&mut **array);
                children.push(&mut **index);
            }
            NodeKind::CallExpr { callee, arguments } => {
                children.push(&mut **callee);
                children.extend(arguments);
            }
            NodeKind::Assignment { target, value } => {
                children.push(&mut **target);
                children.push(&mut **value);
            }
            NodeKind::BreakStmt
            | NodeKind::IntLiteral(_)
            | NodeKind::CharLiteral(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::BoolLiteral(_)
            | NodeKind::Identifier(_)
            | NodeKind::Type(_) => {}
        }
        children
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        ensure_sufficient_stack(|| Self {
            kind: self.kind.clone(),
            location: self.location.clone(),
            resolved_type: self.resolved_type.clone(),
        })
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        ensure_sufficient_stack(|| {
            self.location == other.location
                && self.resolved_type == other.resolved_type
                && self.kind == other.kind
        })
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        if self.kind.is_leaf() {
            return;
        }
        let kind = mem::replace(&mut self.kind, NodeKind::BreakStmt);
        ensure_sufficient_stack(move || drop(kind));
    }
}
