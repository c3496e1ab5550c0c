//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs including:
//! - Statement wiring without precedence
//! - Function literals, calls, vectors and if-expressions
//! - Scoped name resolution
//! - Error frames and grammar mode limits

use super::modes::ParseMode;
use super::parser::parse;
use crate::ast::ast::{Ast, Node, NodeKind, OpKind};
use crate::ast::types::{FnId, VarType};
use crate::errors::errors::{LexStatus, ParserStatus};
use crate::lexer::tokens::TokenKind;
use crate::symbol_table::symbol_table::SymbolRole;
use crate::{Position, AST_MAX_ARGS, ERROR_MAX_STACK_SIZE, PARSER_MODE_MAX_STACK_SIZE};

fn parse_ok(source: &str) -> Ast {
    parse(source.as_bytes()).unwrap()
}

fn parse_status(source: &str) -> ParserStatus {
    parse(source.as_bytes()).unwrap_err().status()
}

fn op_parts(node: &Node) -> (OpKind, &Node, &Node) {
    let op = node.as_op().unwrap();
    (op.op, op.left.as_deref().unwrap(), op.right.as_deref().unwrap())
}

fn int_value(node: &Node) -> i64 {
    match node.kind {
        NodeKind::Int(value) => value,
        _ => panic!("expected an integer, found {:?}", node.kind),
    }
}

fn var_name(ast: &Ast, node: &Node) -> String {
    match node.kind {
        NodeKind::Var(id) => ast.scopes.symbol(id).unwrap().name_lossy(),
        _ => panic!("expected a variable, found {:?}", node.kind),
    }
}

#[test]
fn test_parse_empty_module() {
    let ast = parse_ok("\n");

    assert!(ast.body().is_empty());
    assert_eq!(ast.root.id, FnId::MODULE);
    assert_eq!(ast.scopes.len(), 1);
}

#[test]
fn test_missing_leading_newline() {
    assert_eq!(
        parse_status("x: 1\n"),
        ParserStatus::Lex(LexStatus::MissingLeadingNewline)
    );
}

#[test]
fn test_operators_thread_to_the_right() {
    let ast = parse_ok("\n1 + 2 + 3\n");
    assert_eq!(ast.body().len(), 1);

    let (op, left, right) = op_parts(&ast.body()[0]);
    assert_eq!(op, OpKind::Add);
    assert_eq!(int_value(left), 1);

    let (op, left, right) = op_parts(right);
    assert_eq!(op, OpKind::Add);
    assert_eq!(int_value(left), 2);
    assert_eq!(int_value(right), 3);
}

#[test]
fn test_assignment_takes_whole_right_side() {
    let ast = parse_ok("\nx: 1 + 2\n");

    let (op, left, right) = op_parts(&ast.body()[0]);
    assert_eq!(op, OpKind::Assign);
    assert_eq!(var_name(&ast, left), "x");

    let (op, left, right) = op_parts(right);
    assert_eq!(op, OpKind::Add);
    assert_eq!(int_value(left), 1);
    assert_eq!(int_value(right), 2);

    let symbol = &ast.scopes[FnId::MODULE].symbols[0];
    assert_eq!(symbol.role, SymbolRole::Local);
    assert_eq!(symbol.var_type, None);
}

#[test]
fn test_cast_with_type_literal() {
    let ast = parse_ok("\nx: u8 :: 5\n");

    let (_, _, cast) = op_parts(&ast.body()[0]);
    let (op, left, right) = op_parts(cast);

    assert_eq!(op, OpKind::Cast);
    assert_eq!(left.kind, NodeKind::Type(VarType::U8));
    assert_eq!(int_value(right), 5);
}

#[test]
fn test_semicolon_separates_module_statements() {
    let ast = parse_ok("\nx: 1; y: 2\n# trailing comment\n");
    assert_eq!(ast.body().len(), 2);
}

#[test]
fn test_two_values_without_operator() {
    let error = parse("\n1 2\n".as_bytes()).unwrap_err();

    assert_eq!(error.status(), ParserStatus::InvalidFinalValue);
    assert_eq!(error.token().kind, TokenKind::Newline);
    assert_eq!(error.frames()[0].mode, ParseMode::Module);
}

#[test]
fn test_value_after_staged_value() {
    let error = parse("\n1 + 2 3\n".as_bytes()).unwrap_err();

    assert_eq!(error.status(), ParserStatus::InvalidTokenSequence);
    assert_eq!(error.token().position, Position::new(2, 7));
}

#[test]
fn test_terminator_outside_its_mode() {
    assert_eq!(parse_status("\n)\n"), ParserStatus::UnexpectedTerminator);
    assert_eq!(parse_status("\nx: 1]\n"), ParserStatus::UnexpectedTerminator);
    assert_eq!(parse_status("\nx: 1}\n"), ParserStatus::UnexpectedTerminator);
}

#[test]
fn test_unsupported_tokens() {
    assert_eq!(parse_status("\ns: \"hello\"\n"), ParserStatus::UnsupportedToken);
    assert_eq!(parse_status("\n1 * 2\n"), ParserStatus::UnsupportedToken);
    assert_eq!(parse_status("\n1 < 2\n"), ParserStatus::UnsupportedToken);
}

#[test]
fn test_char_literals() {
    let ast = parse_ok("\na: 'a'\nb: '\\n'\n");

    let (_, _, right) = op_parts(&ast.body()[0]);
    assert_eq!(right.kind, NodeKind::Char(b'a'));

    let (_, _, right) = op_parts(&ast.body()[1]);
    assert_eq!(right.kind, NodeKind::Char(b'\n'));

    assert_eq!(parse_status("\nc: '\\t'\n"), ParserStatus::InvalidChar);
}

#[test]
fn test_function_literal_signature() {
    let ast = parse_ok("\nadd: {(a :: i64; b :: i64)[i64]\na + b\n}\n");

    let (_, _, literal) = op_parts(&ast.body()[0]);
    let NodeKind::Fn(function) = &literal.kind else {
        panic!("expected a function literal");
    };

    let scope = &ast.scopes[function.id];
    assert_eq!(scope.parent, Some(FnId::MODULE));
    assert_eq!(scope.signature.return_type, VarType::I64);
    assert_eq!(scope.signature.args.len(), 2);
    assert_eq!(
        ast.scopes.arg_types(function.id),
        vec![Some(VarType::I64), Some(VarType::I64)]
    );
    assert_eq!(scope.symbols[0].role, SymbolRole::Argument);
    assert_eq!(function.body.len(), 1);
}

#[test]
fn test_function_without_parameters_or_return() {
    let ast = parse_ok("\nf: {()[]\n1\n}\n");

    let (_, _, literal) = op_parts(&ast.body()[0]);
    let NodeKind::Fn(function) = &literal.kind else {
        panic!("expected a function literal");
    };

    assert_eq!(ast.scopes[function.id].signature.return_type, VarType::Void);
    assert!(ast.scopes[function.id].signature.args.is_empty());
}

#[test]
fn test_duplicate_parameter() {
    let error = parse("\nf: {(a :: i64; a :: i64)[]\na\n}\n".as_bytes()).unwrap_err();

    assert_eq!(error.status(), ParserStatus::VarInsertFail);
    assert_eq!(error.frames()[1].status, ParserStatus::InvalidFn);
}

#[test]
fn test_too_many_parameters() {
    let source = "\nf: {(a :: i64; b :: i64; c :: i64; d :: i64; e :: i64)[]\na\n}\n";
    assert_eq!(parse_status(source), ParserStatus::TooManyArguments);
}

#[test]
fn test_invalid_parameter_and_return_type() {
    assert_eq!(parse_status("\nf: {(a i64)[]\na\n}\n"), ParserStatus::InvalidParameter);
    assert_eq!(parse_status("\nf: {(a :: x)[]\na\n}\n"), ParserStatus::InvalidType);
    assert_eq!(parse_status("\nf: {()[x]\n1\n}\n"), ParserStatus::InvalidType);
    assert_eq!(
        parse_status("\nf: {()[i64 u8]\n1\n}\n"),
        ParserStatus::Lex(LexStatus::ExpectedTokenNotFound)
    );
    assert_eq!(parse_status("\nf: { 1 }\n"), ParserStatus::InvalidFn);
}

#[test]
fn test_inner_scope_resolution() {
    let ast = parse_ok("\nx: 1\ng: {()[]\ny: x\n}\n");

    let (_, _, literal) = op_parts(&ast.body()[1]);
    let NodeKind::Fn(function) = &literal.kind else {
        panic!("expected a function literal");
    };

    let (_, left, right) = op_parts(&function.body[0]);
    let (NodeKind::Var(y), NodeKind::Var(x)) = (&left.kind, &right.kind) else {
        panic!("expected two variables");
    };

    assert_eq!(y.scope, function.id);
    assert_eq!(x.scope, FnId::MODULE);
    assert!(ast.scopes.find(FnId::MODULE, b"y").is_none());
}

#[test]
fn test_call_arguments() {
    let ast = parse_ok("\nf: 1\nf(1; 2)\nf()\n");

    let NodeKind::Call(call) = &ast.body()[1].kind else {
        panic!("expected a call");
    };
    assert_eq!(call.args.len(), 2);
    assert_eq!(var_name(&ast, &call.callee), "f");

    let NodeKind::Call(call) = &ast.body()[2].kind else {
        panic!("expected a call");
    };
    assert!(call.args.is_empty());
}

#[test]
fn test_too_many_call_arguments() {
    let source = format!("\nf: 1\nf({})\n", ["1"; AST_MAX_ARGS + 1].join("; "));
    let error = parse(source.as_bytes()).unwrap_err();

    assert_eq!(error.status(), ParserStatus::TooManyArguments);
    assert_eq!(error.frames()[0].mode, ParseMode::FnCallArgs);
    assert_eq!(error.frames()[1].status, ParserStatus::InvalidCall);
}

#[test]
fn test_empty_call_argument() {
    assert_eq!(parse_status("\nf: 1\nf(1;)\n"), ParserStatus::InvalidCall);
    assert_eq!(parse_status("\nf: 1\nf(;1)\n"), ParserStatus::InvalidCall);
}

#[test]
fn test_vector_literal() {
    let ast = parse_ok("\nv: @[1; 'a'\n2]\ne: @[]\n");

    let (_, _, vector) = op_parts(&ast.body()[0]);
    let NodeKind::Vec(vector) = &vector.kind else {
        panic!("expected a vector");
    };
    assert_eq!(vector.items.len(), 3);
    assert!(vector.item_types.is_none());

    let (_, _, empty) = op_parts(&ast.body()[1]);
    assert!(matches!(&empty.kind, NodeKind::Vec(vector) if vector.items.is_empty()));
}

#[test]
fn test_if_with_else() {
    let ast = parse_ok("\nx: ?{ (1 = 1) { 5 } { 'a' } }\n");

    let (_, _, branch) = op_parts(&ast.body()[0]);
    let NodeKind::If(branch) = &branch.kind else {
        panic!("expected an if expression");
    };

    assert_eq!(branch.arms.len(), 1);
    assert!(branch.arms[0].cond.is_op());
    assert_eq!(branch.arms[0].body.len(), 1);
    assert_eq!(branch.else_body.as_ref().map(|body| body.len()), Some(1));
}

#[test]
fn test_if_arms_across_lines() {
    let ast = parse_ok("\nn: 3\n?{\n(n = 1) { 1 }\n(n = 2) {\n2\n}\n}\n");

    let NodeKind::If(branch) = &ast.body()[1].kind else {
        panic!("expected an if expression");
    };

    assert_eq!(branch.arms.len(), 2);
    assert!(branch.else_body.is_none());
}

#[test]
fn test_else_without_condition() {
    let error = parse("\n?{ { 1 } }\n".as_bytes()).unwrap_err();

    assert_eq!(error.status(), ParserStatus::MissingCondition);
    assert_eq!(error.frames()[1].status, ParserStatus::InvalidIf);
    assert_eq!(parse_status("\n?{ }\n"), ParserStatus::MissingCondition);
}

#[test]
fn test_end_of_input_inside_function() {
    let error = parse("\nf: {()[]\n1\n".as_bytes()).unwrap_err();

    assert_eq!(error.status(), ParserStatus::UnexpectedEndOfInput);
    assert_eq!(error.frames()[0].mode, ParseMode::Fn);
}

#[test]
fn test_deep_nesting_overflows_mode_stack() {
    let source = format!("\nv: {}", "@[".repeat(25));
    let error = parse(source.as_bytes()).unwrap_err();

    assert_eq!(error.status(), ParserStatus::ModePushFail);
    assert!(error.frames().len() <= ERROR_MAX_STACK_SIZE);
    assert!(error.frames()[1..]
        .iter()
        .all(|frame| frame.status == ParserStatus::InvalidVec));
}

#[test]
fn test_operator_after_two_values() {
    let ast = parse_ok("\n1 2 +\n");

    let (op, left, right) = op_parts(&ast.body()[0]);
    assert_eq!(op, OpKind::Add);
    assert_eq!(int_value(left), 1);
    assert_eq!(int_value(right), 2);
}

#[test]
fn test_operator_without_staged_value() {
    let ast = parse_ok("\n1 + + 2\n");

    let outer = ast.body()[0].as_op().unwrap();
    assert_eq!(int_value(outer.left.as_deref().unwrap()), 1);

    let inner = outer.right.as_deref().unwrap().as_op().unwrap();
    assert_eq!(inner.op, OpKind::Add);
    assert!(inner.left.is_none());
    assert_eq!(int_value(inner.right.as_deref().unwrap()), 2);
}

#[test]
fn test_long_operator_chain() {
    let count = 5000;
    let source = format!("\nx: {}1\n", "1 + ".repeat(count));
    let ast = parse_ok(&source);

    let assign = ast.body()[0].as_op().unwrap();
    let mut cursor = assign.right.as_deref();
    let mut adds = 0;

    while let Some(node) = cursor {
        match node.as_op() {
            Some(op) => {
                assert_eq!(op.op, OpKind::Add);
                assert_eq!(int_value(op.left.as_deref().unwrap()), 1);
                adds += 1;
                cursor = op.right.as_deref();
            }
            None => {
                assert_eq!(int_value(node), 1);
                cursor = None;
            }
        }
    }

    assert_eq!(adds, count);
}

#[test]
fn test_mode_stack_limit() {
    let nested = |depth: usize| format!("\nv: {}1{}\n", "@[".repeat(depth), "]".repeat(depth));

    // The module mode takes the first slot.
    let ast = parse_ok(&nested(PARSER_MODE_MAX_STACK_SIZE - 1));
    assert_eq!(ast.body().len(), 1);

    let error = parse(nested(PARSER_MODE_MAX_STACK_SIZE).as_bytes()).unwrap_err();
    assert_eq!(error.status(), ParserStatus::ModePushFail);
}
