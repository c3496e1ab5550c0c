//! Unit tests for type inference.

use super::type_checker::{infer, type_of};
use crate::ast::ast::{Ast, AstKind, NodeKind};
use crate::ast::types::{FnId, VarType};
use crate::errors::errors::{InferError, InferStatus};
use crate::parser::parser::parse;

fn infer_ok(source: &str) -> Ast {
    let mut ast = parse(source.as_bytes()).unwrap();
    infer(&mut ast).unwrap();
    ast
}

fn infer_err(source: &str) -> InferError {
    let mut ast = parse(source.as_bytes()).unwrap();
    infer(&mut ast).unwrap_err()
}

fn module_type(ast: &Ast, name: &str) -> Option<VarType> {
    let id = ast.scopes.find(FnId::MODULE, name.as_bytes()).unwrap();
    ast.scopes.symbol(id).unwrap().var_type.clone()
}

fn last_stmt_type(ast: &Ast) -> VarType {
    type_of(&ast.scopes, ast.body().last().unwrap()).unwrap()
}

#[test]
fn test_assignment_declares_type() {
    let ast = infer_ok("\nx: 5\n");

    assert_eq!(module_type(&ast, "x"), Some(VarType::I64));
    assert_eq!(last_stmt_type(&ast), VarType::Void);
}

#[test]
fn test_reassignment_must_keep_type() {
    let ast = infer_ok("\nx: 5\nx: 6\n");
    assert_eq!(module_type(&ast, "x"), Some(VarType::I64));

    let error = infer_err("\nx: 5\nx: 'a'\n");
    assert_eq!(error.status(), InferStatus::NodeTypesNotEqual);
    assert_eq!(error.node().kind, AstKind::Char);
    assert_eq!(error.frames()[1].status, InferStatus::InvalidAssignRightSide);
}

#[test]
fn test_assignment_left_side_must_be_variable() {
    let error = infer_err("\n1: 2\n");
    assert_eq!(error.status(), InferStatus::InvalidAssignLeftSide);
}

#[test]
fn test_untyped_variable() {
    assert_eq!(infer_err("\ny\n").status(), InferStatus::VarTypeNotFound);

    let error = infer_err("\ny: z\n");
    assert_eq!(error.status(), InferStatus::VarTypeNotFound);
    assert_eq!(error.frames()[1].status, InferStatus::InvalidAssignRightSide);
}

#[test]
fn test_arithmetic_and_comparison() {
    let ast = infer_ok("\n1 + 2\n");
    assert_eq!(last_stmt_type(&ast), VarType::I64);

    let ast = infer_ok("\n1 <= 2\n");
    assert_eq!(last_stmt_type(&ast), VarType::U8);

    let ast = infer_ok("\n3 = 4 - 1\n");
    assert_eq!(last_stmt_type(&ast), VarType::U8);
}

#[test]
fn test_arithmetic_requires_equal_numeric_types() {
    let error = infer_err("\n1 + 'a'\n");
    assert_eq!(error.status(), InferStatus::NodeTypesNotEqual);
    assert_eq!(error.node().kind, AstKind::Add);

    let error = infer_err("\n'a' - 'b'\n");
    assert_eq!(error.status(), InferStatus::InvalidTypeForNode);
}

#[test]
fn test_comparison_of_narrow_types() {
    let ast = infer_ok("\na: u8 :: 1\nb: a = a\n");
    assert_eq!(module_type(&ast, "a"), Some(VarType::U8));
    assert_eq!(module_type(&ast, "b"), Some(VarType::U8));
}

#[test]
fn test_cast() {
    let ast = infer_ok("\nx: u16 :: 'a'\n");
    assert_eq!(module_type(&ast, "x"), Some(VarType::U16));

    let error = infer_err("\ny: 5 :: 1\n");
    assert_eq!(error.status(), InferStatus::InvalidCastLeftNode);

    let error = infer_err("\nv: @[1]\ny: v :: 1\n");
    assert_eq!(error.status(), InferStatus::InvalidTypeForNode);
    assert_eq!(error.frames()[1].status, InferStatus::InvalidCastLeftNode);
}

#[test]
fn test_write() {
    let ast = infer_ok("\n1 <& 'a'\n2 <& 5\n");
    assert_eq!(last_stmt_type(&ast), VarType::Void);

    let ast = infer_ok("\nout: fd :: 1\nout <& 'x'\n");
    assert_eq!(module_type(&ast, "out"), Some(VarType::Fd));

    let error = infer_err("\n3 <& 'a'\n");
    assert_eq!(error.status(), InferStatus::InvalidRawIntFd);

    let error = infer_err("\n'c' <& 1\n");
    assert_eq!(error.status(), InferStatus::InvalidTypeForNode);
    assert_eq!(error.frames()[1].status, InferStatus::InvalidLeftSide);

    let error = infer_err("\n1 <& x: 1\n");
    assert_eq!(error.status(), InferStatus::InvalidTypeForNode);
    assert_eq!(error.frames()[1].status, InferStatus::InvalidRightSide);
}

#[test]
fn test_vector_item_types() {
    let ast = infer_ok("\nv: @[1; 'a']\n");

    assert_eq!(
        module_type(&ast, "v"),
        Some(VarType::Vec(vec![VarType::I64, VarType::Char]))
    );
}

#[test]
fn test_function_bodies() {
    let error = infer_err("\nf: {()[]\n}\n");
    assert_eq!(error.status(), InferStatus::EmptyFnBody);
    assert_eq!(error.frames()[1].status, InferStatus::InvalidFn);

    let error = infer_err("\nf: {()[i64]\n'a'\n}\n");
    assert_eq!(error.status(), InferStatus::InvalidReturnType);

    let ast = infer_ok("\nx: 1\nf: {()[i64]\nx + 1\n}\n");
    assert!(matches!(module_type(&ast, "f"), Some(VarType::Fn(id)) if id != FnId::MODULE));
}

#[test]
fn test_empty_module() {
    let mut ast = parse(b"\n").unwrap();
    assert_eq!(infer(&mut ast).unwrap_err().status(), InferStatus::EmptyFnBody);
}

#[test]
fn test_call_signature() {
    let source = "\nadd: {(a :: i64; b :: i64)[i64]\na + b\n}\nadd(1; 2)\n";
    let ast = infer_ok(source);
    assert_eq!(last_stmt_type(&ast), VarType::I64);

    let error = infer_err("\nadd: {(a :: i64; b :: i64)[i64]\na + b\n}\nadd(1)\n");
    assert_eq!(error.frames()[0].status, InferStatus::InvalidNumOfArgsInCall);

    let error = infer_err("\nadd: {(a :: i64; b :: i64)[i64]\na + b\n}\nadd(1; 2; 3)\n");
    assert_eq!(error.frames()[0].status, InferStatus::InvalidNumOfArgsInCall);

    let error = infer_err("\nadd: {(a :: i64; b :: i64)[i64]\na + b\n}\nadd(1; 'a')\n");
    assert_eq!(error.status(), InferStatus::InvalidArgType);
    assert_eq!(error.node().kind, AstKind::Char);
}

#[test]
fn test_call_on_value() {
    let error = infer_err("\nx: 1\nx(1)\n");
    assert_eq!(error.status(), InferStatus::CallNotOnFn);
}

#[test]
fn test_recursive_call_is_backfilled() {
    let source = "\ncount: {(n :: i64)[i64]\n?{ (n <= 0) { 0 } { count(n - 1) } }\n}\ncount(3)\n";
    let ast = infer_ok(source);

    let Some(VarType::Fn(id)) = module_type(&ast, "count") else {
        panic!("count should be a function");
    };
    assert_eq!(ast.scopes[id].parent, Some(FnId::MODULE));
    assert_eq!(last_stmt_type(&ast), VarType::I64);
}

#[test]
fn test_backfill_requires_enclosing_scope() {
    let error = infer_err("\nf: {()[]\ng: {()[]\nf()\n}\n1\n}\n");
    assert_eq!(error.status(), InferStatus::CannotGetCallType);
}

#[test]
fn test_if_arms_must_agree() {
    let error = infer_err("\nx: ?{ (1 = 1) { 5 } { 'a' } }\n");

    assert_eq!(error.status(), InferStatus::NodeTypesNotEqual);
    assert_eq!(error.node().kind, AstKind::Char);
}

#[test]
fn test_if_without_else() {
    let ast = infer_ok("\nx: ?{ (1 = 1) { 5 } (2 = 1) { 6 } }\n");
    assert_eq!(module_type(&ast, "x"), Some(VarType::I64));

    let error = infer_err("\n?{ (z) { 1 } }\n");
    assert_eq!(error.status(), InferStatus::VarTypeNotFound);
    assert_eq!(error.frames()[1].status, InferStatus::InvalidCond);
}

#[test]
fn test_inference_is_idempotent() {
    let mut ast = parse(b"\nx: 1 + 2\nv: @[x; 'a']\nx\n").unwrap();

    infer(&mut ast).unwrap();
    let first = ast.root.clone();
    infer(&mut ast).unwrap();

    assert_eq!(ast.root, first);
    let NodeKind::Op(op) = &ast.body()[0].kind else {
        panic!("expected an assignment");
    };
    assert_eq!(op.return_type, Some(VarType::Void));
}

#[test]
fn test_if_type_is_remembered() {
    let mut ast = parse(b"\n?{ (1 = 1) { 'a' } { 'b' } }\n").unwrap();

    infer(&mut ast).unwrap();
    let NodeKind::If(branch) = &ast.body()[0].kind else {
        panic!("expected an if");
    };
    assert_eq!(branch.return_type, Some(VarType::Char));
    let first = ast.root.clone();

    infer(&mut ast).unwrap();
    assert_eq!(ast.root, first);
    assert_eq!(last_stmt_type(&ast), VarType::Char);
}

#[test]
fn test_operator_missing_left_side() {
    let error = infer_err("\n1 + + 2\n");

    assert_eq!(error.status(), InferStatus::InvalidLeftSide);
    assert_eq!(error.node().kind, AstKind::Add);
    assert_eq!(error.frames()[1].status, InferStatus::InvalidRightSide);
}
