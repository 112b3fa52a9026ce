//! Type descriptors, attached to nodes by semantic analysis

use std::fmt::{Display, Formatter};

/// The type of a value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Void,
    Bool,
    Char,
    Int,
    Array {
        element: Box<TypeDescriptor>,
        size: usize,
    },
    Function {
        return_type: Box<TypeDescriptor>,
        params: Vec<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    pub fn array(element: TypeDescriptor, size: usize) -> Self {
        Self::Array {
            element: Box::new(element),
            size,
        }
    }

    pub fn function(return_type: TypeDescriptor, params: Vec<TypeDescriptor>) -> Self {
        Self::Function {
            return_type: Box::new(return_type),
            params,
        }
    }

    /// The category of this type, without any nested types
    pub fn name(&self) -> &'static str {
        match self {
            TypeDescriptor::Void => "void",
            TypeDescriptor::Bool => "bool",
            TypeDescriptor::Char => "char",
            TypeDescriptor::Int => "int",
            TypeDescriptor::Array { .. } => "array",
            TypeDescriptor::Function { .. } => "function",
        }
    }
}

/// Full form, e.g. `int[10]` or `fn(char, int[4]) -> bool`
impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeDescriptor::Array { element, size } => write!(f, "{element}[{size}]"),
            TypeDescriptor::Function {
                return_type,
                params,
            } => {
                write!(f, "fn(")?;
                for (index, param) in params.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {return_type}")
            }
            other => f.write_str(other.name()),
        }
    }
}
