//! Type lattice used by the inference pass.
//!
//! Scalars compare by tag, vectors element-wise and function types by the
//! identity of the scope that declared them.

use std::fmt::Display;

/// Handle to a function scope in the scope arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FnId(pub usize);

impl FnId {
    /// The synthetic function holding the top level of the file.
    pub const MODULE: FnId = FnId(0);
}

impl Display for FnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fn#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarType {
    Void,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
    String,
    Fd,
    Vec(Vec<VarType>),
    Hash,
    Fn(FnId),
}

impl VarType {
    pub fn is_unsigned(&self) -> bool {
        matches!(self, VarType::U8 | VarType::U16 | VarType::U32 | VarType::U64)
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, VarType::I8 | VarType::I16 | VarType::I32 | VarType::I64)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, VarType::F32 | VarType::F64)
    }

    /// Types accepted by arithmetic and comparison operators.
    pub fn is_numeric(&self) -> bool {
        self.is_unsigned() || self.is_signed() || self.is_float()
    }

    /// Types that cannot be the target of a cast.
    pub fn is_collection(&self) -> bool {
        matches!(self, VarType::Vec(_) | VarType::Hash | VarType::Fn(_))
    }

    pub fn is_void(&self) -> bool {
        *self == VarType::Void
    }
}

impl Display for VarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarType::Void => write!(f, "void"),
            VarType::U8 => write!(f, "u8"),
            VarType::U16 => write!(f, "u16"),
            VarType::U32 => write!(f, "u32"),
            VarType::U64 => write!(f, "u64"),
            VarType::I8 => write!(f, "i8"),
            VarType::I16 => write!(f, "i16"),
            VarType::I32 => write!(f, "i32"),
            VarType::I64 => write!(f, "i64"),
            VarType::F32 => write!(f, "f32"),
            VarType::F64 => write!(f, "f64"),
            VarType::Char => write!(f, "char"),
            VarType::String => write!(f, "string"),
            VarType::Fd => write!(f, "fd"),
            VarType::Vec(items) => {
                write!(f, "@[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            VarType::Hash => write!(f, "hash"),
            VarType::Fn(id) => write!(f, "{}", id),
        }
    }
}
