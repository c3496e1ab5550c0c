use std::fmt::Display;

use crate::lexer::tokens::Token;

use super::{
    scopes::{Scopes, SymbolId},
    types::{FnId, VarType},
};

/// Node tag. Value kinds and operator kinds occupy contiguous ranges.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AstKind {
    Var = 1,
    Int,
    Char,
    Type,
    Vec,
    Fn,
    Call,
    If,

    Assign = 10,
    Cast,
    Add,
    Sub,
    Write,
    Equal,
    LessEqual,
}

impl AstKind {
    const VALUE_START: u8 = AstKind::Var as u8;
    const VALUE_END: u8 = AstKind::If as u8;
    const OP_START: u8 = AstKind::Assign as u8;
    const OP_END: u8 = AstKind::LessEqual as u8;

    pub fn is_value(&self) -> bool {
        (Self::VALUE_START..=Self::VALUE_END).contains(&(*self as u8))
    }

    pub fn is_op(&self) -> bool {
        (Self::OP_START..=Self::OP_END).contains(&(*self as u8))
    }
}

impl Display for AstKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Assign,
    Cast,
    Add,
    Sub,
    Write,
    Equal,
    LessEqual,
}

impl OpKind {
    pub fn ast_kind(&self) -> AstKind {
        match self {
            OpKind::Assign => AstKind::Assign,
            OpKind::Cast => AstKind::Cast,
            OpKind::Add => AstKind::Add,
            OpKind::Sub => AstKind::Sub,
            OpKind::Write => AstKind::Write,
            OpKind::Equal => AstKind::Equal,
            OpKind::LessEqual => AstKind::LessEqual,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpNode {
    pub op: OpKind,
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
    pub return_type: Option<VarType>,
}

impl Drop for OpNode {
    /// Operator chains nest to the right, so the spine is unlinked in a loop
    /// instead of dropping one box inside the next.
    fn drop(&mut self) {
        let mut next = self.right.take();

        while let Some(mut node) = next {
            next = node.as_op_mut().and_then(|op| op.right.take());
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VecNode {
    pub items: Vec<Node>,
    pub item_types: Option<Vec<VarType>>,
}

/// A function literal. The statements live here, the symbols in the scope.
#[derive(Debug, Clone, PartialEq)]
pub struct FnNode {
    pub id: FnId,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    pub callee: Box<Node>,
    pub args: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfArm {
    pub cond: Box<Node>,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfNode {
    pub arms: Vec<IfArm>,
    pub else_body: Option<Vec<Node>>,
    pub return_type: Option<VarType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Var(SymbolId),
    Int(i64),
    Char(u8),
    Type(VarType),
    Vec(VecNode),
    Fn(FnNode),
    Call(CallNode),
    If(IfNode),
    Op(OpNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub token: Token,
}

impl Node {
    pub fn new(kind: NodeKind, token: Token) -> Self {
        Node { kind, token }
    }

    pub fn op(op: OpKind, token: Token) -> Self {
        Node::new(
            NodeKind::Op(OpNode {
                op,
                left: None,
                right: None,
                return_type: None,
            }),
            token,
        )
    }

    pub fn ast_kind(&self) -> AstKind {
        match &self.kind {
            NodeKind::Var(_) => AstKind::Var,
            NodeKind::Int(_) => AstKind::Int,
            NodeKind::Char(_) => AstKind::Char,
            NodeKind::Type(_) => AstKind::Type,
            NodeKind::Vec(_) => AstKind::Vec,
            NodeKind::Fn(_) => AstKind::Fn,
            NodeKind::Call(_) => AstKind::Call,
            NodeKind::If(_) => AstKind::If,
            NodeKind::Op(op) => op.op.ast_kind(),
        }
    }

    pub fn is_value(&self) -> bool {
        self.ast_kind().is_value()
    }

    pub fn is_op(&self) -> bool {
        self.ast_kind().is_op()
    }

    pub fn as_op(&self) -> Option<&OpNode> {
        match &self.kind {
            NodeKind::Op(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_op_mut(&mut self) -> Option<&mut OpNode> {
        match &mut self.kind {
            NodeKind::Op(op) => Some(op),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> NodeRef {
        NodeRef {
            kind: self.ast_kind(),
            token: self.token,
        }
    }
}

/// Tag and token of a node, kept by inference errors after the tree moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef {
    pub kind: AstKind,
    pub token: Token,
}

impl NodeRef {
    pub fn module() -> Self {
        NodeRef {
            kind: AstKind::Fn,
            token: Token::null(),
        }
    }
}

impl Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.kind, self.token)
    }
}

/// Parsed program: the top level is a synthetic function with id `FnId::MODULE`.
#[derive(Debug, Clone)]
pub struct Ast {
    pub scopes: Scopes,
    pub root: FnNode,
}

impl Ast {
    pub fn body(&self) -> &[Node] {
        &self.root.body
    }
}
