//! Bottom-up type inference.
//!
//! Every statement is inferred in order, children before parents. Operator,
//! if and vector nodes remember their type once it is known, and variables
//! receive theirs from the first assignment. Nothing is written on failure,
//! so a node that failed can be inferred again.

use log::{debug, trace};

use crate::{
    ast::{
        ast::{Ast, CallNode, FnNode, IfNode, Node, NodeKind, NodeRef, OpKind, OpNode, VecNode},
        scopes::Scopes,
        types::{FnId, VarType},
    },
    errors::errors::{InferError, InferStatus},
    symbol_table::symbol_table::SymbolRole,
};

/// Type of an already inferred node.
///
/// Operators, ifs and vectors must have been inferred first; this never
/// infers anything itself.
pub fn type_of(scopes: &Scopes, node: &Node) -> Result<VarType, InferStatus> {
    match &node.kind {
        NodeKind::Var(id) => scopes
            .symbol(*id)
            .and_then(|symbol| symbol.var_type.clone())
            .ok_or(InferStatus::VarTypeNotFound),
        NodeKind::Int(_) => Ok(VarType::I64),
        NodeKind::Char(_) => Ok(VarType::Char),
        NodeKind::Type(var_type) => Ok(var_type.clone()),
        NodeKind::Vec(vector) => vector
            .item_types
            .clone()
            .map(VarType::Vec)
            .ok_or(InferStatus::CannotGetTypeFromNode),
        NodeKind::Fn(function) => Ok(VarType::Fn(function.id)),
        NodeKind::Call(call) => match type_of(scopes, &call.callee)? {
            VarType::Fn(id) => scopes
                .get(id)
                .map(|scope| scope.signature.return_type.clone())
                .ok_or(InferStatus::CannotGetCallType),
            _ => Err(InferStatus::CallNotOnFn),
        },
        NodeKind::If(branch) => branch
            .return_type
            .clone()
            .ok_or(InferStatus::CannotGetTypeFromNode),
        NodeKind::Op(op) => op.return_type.clone().ok_or(InferStatus::InvalidNode),
    }
}

/// Infers the whole tree, filling symbol types and node types in place.
pub fn infer(ast: &mut Ast) -> Result<(), InferError> {
    let Ast { scopes, root } = ast;
    let mut checker = TypeChecker::new(scopes);

    checker.infer_fn(root, NodeRef::module())
}

pub struct TypeChecker<'s> {
    scopes: &'s mut Scopes,
    /// Functions currently being inferred, innermost last
    fn_path: Vec<FnId>,
}

/// Borrows an operand, failing with `status` at the operator when it is missing.
fn side<'n>(
    operand: &'n mut Option<Box<Node>>,
    status: InferStatus,
    op: NodeRef,
) -> Result<&'n mut Node, InferError> {
    operand
        .as_deref_mut()
        .ok_or_else(|| InferError::new(status, op))
}

/// The first arm fixes the type of an if; every later arm must match it.
fn unify(
    unified: &mut Option<VarType>,
    arm_type: VarType,
    last: NodeRef,
) -> Result<(), InferError> {
    match unified {
        Some(expected) if *expected != arm_type => {
            Err(InferError::new(InferStatus::NodeTypesNotEqual, last))
        }
        Some(_) => Ok(()),
        None => {
            *unified = Some(arm_type);
            Ok(())
        }
    }
}

impl<'s> TypeChecker<'s> {
    pub fn new(scopes: &'s mut Scopes) -> Self {
        TypeChecker {
            scopes,
            fn_path: vec![],
        }
    }

    pub fn current_fn(&self) -> FnId {
        self.fn_path.last().copied().unwrap_or(FnId::MODULE)
    }

    fn type_of(&self, node: &Node) -> Result<VarType, InferError> {
        type_of(self.scopes, node).map_err(|status| InferError::new(status, node.snapshot()))
    }

    /// Infers a function body. `node` is the literal the body belongs to.
    pub fn infer_fn(&mut self, function: &mut FnNode, node: NodeRef) -> Result<(), InferError> {
        self.fn_path.push(function.id);
        let result = self.infer_fn_body(function, node);
        self.fn_path.pop();

        result
    }

    fn infer_fn_body(&mut self, function: &mut FnNode, node: NodeRef) -> Result<(), InferError> {
        if function.body.is_empty() {
            return Err(InferError::new(InferStatus::EmptyFnBody, node));
        }

        for stmt in function.body.iter_mut() {
            self.infer_node(stmt)?;
        }

        let return_type = self.scopes[function.id].signature.return_type.clone();

        if let Some(last) = function.body.last() {
            if !return_type.is_void() && self.type_of(last)? != return_type {
                return Err(InferError::new(InferStatus::InvalidReturnType, last.snapshot()));
            }
        }

        debug!(
            "inferred {} with {} statements, returns {}",
            function.id,
            function.body.len(),
            return_type
        );
        Ok(())
    }

    pub fn infer_node(&mut self, node: &mut Node) -> Result<(), InferError> {
        let snapshot = node.snapshot();

        match &mut node.kind {
            NodeKind::Var(id) => {
                let typed = self
                    .scopes
                    .symbol(*id)
                    .is_some_and(|symbol| symbol.var_type.is_some());

                if !typed {
                    return Err(InferError::new(InferStatus::VarTypeNotFound, snapshot));
                }
            }
            NodeKind::Int(_) | NodeKind::Char(_) | NodeKind::Type(_) => {}
            NodeKind::Vec(vector) => self.infer_vec(vector)?,
            NodeKind::Fn(function) => self
                .infer_fn(function, snapshot)
                .map_err(|error| error.wrap(InferStatus::InvalidFn, snapshot))?,
            NodeKind::Call(call) => self.infer_call(call, snapshot)?,
            NodeKind::If(branch) => self.infer_if(branch, snapshot)?,
            NodeKind::Op(op) => self.infer_op(op, snapshot)?,
        }

        trace!("inferred {}", snapshot);
        Ok(())
    }

    fn infer_vec(&mut self, vector: &mut VecNode) -> Result<(), InferError> {
        if vector.item_types.is_some() {
            return Ok(());
        }

        let mut item_types = Vec::with_capacity(vector.items.len());

        for item in vector.items.iter_mut() {
            let snapshot = item.snapshot();

            self.infer_node(item)
                .map_err(|error| error.wrap(InferStatus::InvalidVecItem, snapshot))?;
            item_types.push(
                self.type_of(item)
                    .map_err(|error| error.wrap(InferStatus::InvalidVecItem, snapshot))?,
            );
        }

        vector.item_types = Some(item_types);
        Ok(())
    }

    /// Gives a still untyped callee the type of the function being inferred.
    ///
    /// A function literal assigned to a new name can call that name before
    /// the assignment has typed it. The name must be a local of the scope
    /// that encloses the function.
    fn backfill_callee(&mut self, callee: &Node) -> Result<VarType, InferStatus> {
        let NodeKind::Var(id) = &callee.kind else {
            return Err(InferStatus::CannotGetCallType);
        };

        let current = self.current_fn();
        let parent = self
            .scopes
            .parent(current)
            .ok_or(InferStatus::CannotGetCallType)?;

        if id.scope != parent {
            return Err(InferStatus::CannotGetCallType);
        }

        let symbol = self
            .scopes
            .symbol_mut(*id)
            .ok_or(InferStatus::CannotGetCallType)?;

        if symbol.role != SymbolRole::Local || !symbol.fill_type(VarType::Fn(current)) {
            return Err(InferStatus::CannotGetCallType);
        }

        debug!("{} calls itself through `{}`", current, symbol.name_lossy());
        Ok(VarType::Fn(current))
    }

    fn infer_call(&mut self, call: &mut CallNode, node: NodeRef) -> Result<(), InferError> {
        let callee = call.callee.snapshot();

        let callee_type = match type_of(self.scopes, &call.callee) {
            Ok(callee_type) => callee_type,
            Err(_) => self
                .backfill_callee(&call.callee)
                .map_err(|status| InferError::new(status, callee))?,
        };

        let VarType::Fn(id) = callee_type else {
            return Err(InferError::new(InferStatus::CallNotOnFn, callee));
        };

        let arg_types = self.scopes.arg_types(id);
        if arg_types.len() != call.args.len() {
            return Err(InferError::new(InferStatus::InvalidNumOfArgsInCall, node));
        }

        for (arg, expected) in call.args.iter_mut().zip(arg_types) {
            let snapshot = arg.snapshot();

            self.infer_node(arg)
                .map_err(|error| error.wrap(InferStatus::InvalidCallArg, snapshot))?;

            let arg_type = self
                .type_of(arg)
                .map_err(|error| error.wrap(InferStatus::CannotGetArgType, snapshot))?;
            let expected =
                expected.ok_or_else(|| InferError::new(InferStatus::CannotGetArgType, snapshot))?;

            if arg_type != expected {
                return Err(InferError::new(InferStatus::InvalidArgType, snapshot));
            }
        }

        Ok(())
    }

    /// Infers the statements of one arm and returns the type of the last one.
    fn infer_if_body(
        &mut self,
        body: &mut [Node],
        node: NodeRef,
    ) -> Result<(VarType, NodeRef), InferError> {
        for stmt in body.iter_mut() {
            let snapshot = stmt.snapshot();
            self.infer_node(stmt)
                .map_err(|error| error.wrap(InferStatus::InvalidIfBody, snapshot))?;
        }

        let last = body
            .last()
            .ok_or_else(|| InferError::new(InferStatus::InvalidIfBody, node))?;
        let arm_type = self
            .type_of(last)
            .map_err(|error| error.wrap(InferStatus::InvalidIfBody, node))?;

        Ok((arm_type, last.snapshot()))
    }

    fn infer_if(&mut self, branch: &mut IfNode, node: NodeRef) -> Result<(), InferError> {
        if branch.return_type.is_some() {
            return Ok(());
        }

        let mut unified: Option<VarType> = None;

        for arm in branch.arms.iter_mut() {
            let cond = arm.cond.snapshot();
            self.infer_node(&mut arm.cond)
                .map_err(|error| error.wrap(InferStatus::InvalidCond, cond))?;

            let (arm_type, last) = self.infer_if_body(&mut arm.body, node)?;
            unify(&mut unified, arm_type, last)?;
        }

        if let Some(else_body) = branch.else_body.as_mut() {
            let (arm_type, last) = self.infer_if_body(else_body, node)?;
            unify(&mut unified, arm_type, last)?;
        }

        let return_type = unified.ok_or_else(|| InferError::new(InferStatus::InvalidIfBody, node))?;
        branch.return_type = Some(return_type);

        Ok(())
    }

    fn infer_op(&mut self, op: &mut OpNode, node: NodeRef) -> Result<(), InferError> {
        if op.return_type.is_some() {
            return Ok(());
        }

        let return_type = match op.op {
            OpKind::Assign => self.infer_assign(op, node)?,
            OpKind::Cast => self.infer_cast(op, node)?,
            OpKind::Add | OpKind::Sub => self.infer_arithmetic(op, node)?,
            OpKind::Equal | OpKind::LessEqual => {
                self.infer_arithmetic(op, node)?;
                VarType::U8
            }
            OpKind::Write => self.infer_write(op, node)?,
        };

        op.return_type = Some(return_type);
        Ok(())
    }

    /// Infers one operand and returns its type, framing failures with `status`.
    fn infer_side(
        &mut self,
        operand: &mut Node,
        status: InferStatus,
        node: NodeRef,
    ) -> Result<VarType, InferError> {
        self.infer_node(operand)
            .map_err(|error| error.wrap(status, node))?;
        self.type_of(operand)
            .map_err(|error| error.wrap(status, node))
    }

    fn infer_assign(&mut self, op: &mut OpNode, node: NodeRef) -> Result<VarType, InferError> {
        let left = side(&mut op.left, InferStatus::InvalidAssignLeftSide, node)?;
        let NodeKind::Var(id) = &left.kind else {
            return Err(InferError::new(InferStatus::InvalidAssignLeftSide, left.snapshot()));
        };
        let id = *id;

        let right = side(&mut op.right, InferStatus::InvalidAssignRightSide, node)?;
        let right_snapshot = right.snapshot();
        let right_type = self.infer_side(right, InferStatus::InvalidAssignRightSide, node)?;

        let symbol = self
            .scopes
            .symbol_mut(id)
            .ok_or_else(|| InferError::new(InferStatus::InvalidAssignLeftSide, node))?;

        if symbol.var_type.is_none() {
            trace!("`{}` declared as {}", symbol.name_lossy(), right_type);
            symbol.fill_type(right_type);
        } else if symbol.var_type.as_ref() != Some(&right_type) {
            return Err(InferError::new(InferStatus::NodeTypesNotEqual, right_snapshot)
                .wrap(InferStatus::InvalidAssignRightSide, node));
        }

        Ok(VarType::Void)
    }

    fn infer_cast(&mut self, op: &mut OpNode, node: NodeRef) -> Result<VarType, InferError> {
        let left = side(&mut op.left, InferStatus::InvalidCastLeftNode, node)?;
        let left_snapshot = left.snapshot();

        let target = match &left.kind {
            NodeKind::Type(var_type) => var_type.clone(),
            NodeKind::Var(_) => self
                .type_of(left)
                .map_err(|error| error.wrap(InferStatus::InvalidCastLeftNode, node))?,
            _ => return Err(InferError::new(InferStatus::InvalidCastLeftNode, left_snapshot)),
        };

        if target.is_collection() {
            return Err(InferError::new(InferStatus::InvalidTypeForNode, left_snapshot)
                .wrap(InferStatus::InvalidCastLeftNode, node));
        }

        let right = side(&mut op.right, InferStatus::InvalidRightSide, node)?;
        let right_snapshot = right.snapshot();
        let right_type = self.infer_side(right, InferStatus::InvalidRightSide, node)?;

        if right_type.is_void() {
            return Err(InferError::new(InferStatus::InvalidTypeForNode, right_snapshot)
                .wrap(InferStatus::InvalidRightSide, node));
        }

        Ok(target)
    }

    /// Both sides must share one numeric type, which is returned.
    fn infer_arithmetic(&mut self, op: &mut OpNode, node: NodeRef) -> Result<VarType, InferError> {
        let left = side(&mut op.left, InferStatus::InvalidLeftSide, node)?;
        let left_type = self.infer_side(left, InferStatus::InvalidLeftSide, node)?;

        let right = side(&mut op.right, InferStatus::InvalidRightSide, node)?;
        let right_type = self.infer_side(right, InferStatus::InvalidRightSide, node)?;

        if left_type != right_type {
            return Err(InferError::new(InferStatus::NodeTypesNotEqual, node));
        }

        if !left_type.is_numeric() {
            return Err(InferError::new(InferStatus::InvalidTypeForNode, node));
        }

        Ok(left_type)
    }

    fn infer_write(&mut self, op: &mut OpNode, node: NodeRef) -> Result<VarType, InferError> {
        let left = side(&mut op.left, InferStatus::InvalidLeftSide, node)?;
        let left_snapshot = left.snapshot();
        let left_type = self.infer_side(left, InferStatus::InvalidLeftSide, node)?;

        match (&left_type, &left.kind) {
            (VarType::Fd, _) => {}
            (VarType::I64, NodeKind::Int(1 | 2)) => {}
            (VarType::I64, NodeKind::Int(_)) => {
                return Err(InferError::new(InferStatus::InvalidRawIntFd, left_snapshot)
                    .wrap(InferStatus::InvalidLeftSide, node));
            }
            (VarType::I64, _) => {}
            _ => {
                return Err(InferError::new(InferStatus::InvalidTypeForNode, left_snapshot)
                    .wrap(InferStatus::InvalidLeftSide, node));
            }
        }

        let right = side(&mut op.right, InferStatus::InvalidRightSide, node)?;
        let right_snapshot = right.snapshot();
        let right_type = self.infer_side(right, InferStatus::InvalidRightSide, node)?;

        if right_type.is_void() {
            return Err(InferError::new(InferStatus::InvalidTypeForNode, right_snapshot)
                .wrap(InferStatus::InvalidRightSide, node));
        }

        Ok(VarType::Void)
    }
}
