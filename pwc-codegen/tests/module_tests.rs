//! End-to-end tests over the rendered WAT text: each builds a small
//! program tree, runs the full compile pipeline, and asserts on the
//! emitted module surface.

use pretty_assertions::assert_eq;
use pwc_codegen::compile;
use pwc_frontend::ast::{
    BinaryOp, ClassDef, Expression, ExpressionKind, FunctionDef, Literal, Parameter, Program,
    Statement, StatementKind, VarDef,
};
use pwc_frontend::types::Type;

fn num(value: i32) -> Expression {
    Expression::new(ExpressionKind::Literal(Literal::Num(value)))
}

fn boolean(value: bool) -> Expression {
    Expression::new(ExpressionKind::Literal(Literal::Bool(value)))
}

fn none_lit() -> Expression {
    Expression::new(ExpressionKind::Literal(Literal::None))
}

fn ident(name: &str) -> Expression {
    Expression::new(ExpressionKind::Identifier {
        name: name.to_string(),
    })
}

fn call(name: &str, args: Vec<Expression>) -> Expression {
    Expression::new(ExpressionKind::Call {
        name: name.to_string(),
        args,
    })
}

fn binary(op: BinaryOp, left: Expression, right: Expression) -> Expression {
    Expression::new(ExpressionKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn expr_stmt(expr: Expression) -> Statement {
    Statement::new(StatementKind::Expr(expr))
}

fn assign(name: &str, value: Expression) -> Statement {
    Statement::new(StatementKind::Assign {
        name: name.to_string(),
        value,
    })
}

fn var_def(name: &str, var_type: Type, literal: Literal) -> VarDef {
    VarDef {
        name: name.to_string(),
        var_type,
        literal,
    }
}

/// `class Counter: n: int = 0; def get(self) -> int: return self.n`
fn counter_class() -> ClassDef {
    ClassDef {
        name: "Counter".to_string(),
        fields: vec![var_def("n", Type::Int, Literal::Num(0))],
        methods: vec![FunctionDef {
            name: "get".to_string(),
            params: vec![],
            return_type: Type::Int,
            locals: vec![],
            body: vec![Statement::new(StatementKind::Return(Expression::new(
                ExpressionKind::Field {
                    object: Box::new(ident("self")),
                    field: "n".to_string(),
                },
            )))],
        }],
    }
}

#[test]
fn test_global_and_print_surface() {
    let mut program = Program {
        var_defs: vec![var_def("x", Type::Int, Literal::Num(5))],
        stmts: vec![expr_stmt(call("print", vec![ident("x")]))],
        ..Default::default()
    };
    let wat = compile(&mut program).unwrap();

    assert!(wat.starts_with("(module\n"));
    assert!(wat.ends_with(")"));
    assert!(wat.contains("(global $x (mut i32) (i32.const 5))"));
    assert!(wat.contains("(global $.heap (mut i32) (i32.const 4))"));
    assert!(wat.contains("global.get $x\n    call $print_num"));
}

#[test]
fn test_every_runtime_import_is_declared() {
    let mut program = Program::default();
    let wat = compile(&mut program).unwrap();

    for symbol in [
        "print_num",
        "print_bool",
        "print_none",
        "abs",
        "max",
        "min",
        "pow",
    ] {
        assert!(
            wat.contains(&format!(
                "(func ${symbol} (import \"imports\" \"{symbol}\")"
            )),
            "missing import for {symbol}"
        );
    }
}

#[test]
fn test_entry_result_follows_last_statement() {
    // Trailing expression statement: _start yields its value back from
    // the scratch cell.
    let mut with_result = Program {
        stmts: vec![expr_stmt(binary(BinaryOp::Add, num(1), num(2)))],
        ..Default::default()
    };
    let wat = compile(&mut with_result).unwrap();
    assert!(wat.contains("(func (export \"_start\") (result i32)"));
    assert!(wat.contains("local.set $.scratch\n    local.get $.scratch\n  )"));

    // Trailing assignment: no result.
    let mut without_result = Program {
        var_defs: vec![var_def("x", Type::Int, Literal::Num(0))],
        stmts: vec![assign("x", num(7))],
        ..Default::default()
    };
    let wat = compile(&mut without_result).unwrap();
    assert!(wat.contains("(func (export \"_start\")\n"));
    assert!(!wat.contains("(func (export \"_start\") (result i32)"));
}

#[test]
fn test_print_dispatches_on_argument_type() {
    let mut program = Program {
        stmts: vec![
            expr_stmt(call("print", vec![num(3)])),
            expr_stmt(call("print", vec![boolean(true)])),
            expr_stmt(call("print", vec![none_lit()])),
        ],
        ..Default::default()
    };
    let wat = compile(&mut program).unwrap();

    assert!(wat.contains("i32.const 3\n    call $print_num"));
    assert!(wat.contains("i32.const 1\n    call $print_bool"));
    assert!(wat.contains("i32.const 0\n    call $print_none"));
}

#[test]
fn test_while_lowers_to_block_loop() {
    let mut program = Program {
        var_defs: vec![var_def("x", Type::Int, Literal::Num(0))],
        stmts: vec![Statement::new(StatementKind::While {
            condition: binary(BinaryOp::Lt, ident("x"), num(3)),
            body: vec![assign("x", binary(BinaryOp::Add, ident("x"), num(1)))],
        })],
        ..Default::default()
    };
    let wat = compile(&mut program).unwrap();

    let expected = "    block\n      loop\n        global.get $x\n        i32.const 3\n        i32.lt_s\n        i32.eqz\n        br_if 1\n        global.get $x\n        i32.const 1\n        i32.add\n        global.set $x\n        br 0\n      end\n    end\n";
    assert!(wat.contains(expected), "loop shape not found in:\n{wat}");
}

#[test]
fn test_if_else_shape() {
    let mut program = Program {
        var_defs: vec![var_def("x", Type::Int, Literal::Num(0))],
        stmts: vec![Statement::new(StatementKind::If {
            condition: binary(BinaryOp::Eq, ident("x"), num(0)),
            then_body: vec![assign("x", num(1))],
            else_body: vec![assign("x", num(2))],
        })],
        ..Default::default()
    };
    let wat = compile(&mut program).unwrap();

    assert!(wat.contains(
        "    if\n      i32.const 1\n      global.set $x\n    else\n      i32.const 2\n      global.set $x\n    end\n"
    ));
}

#[test]
fn test_unary_lowering() {
    let mut program = Program {
        stmts: vec![
            expr_stmt(Expression::new(ExpressionKind::Unary {
                op: pwc_frontend::ast::UnaryOp::Minus,
                operand: Box::new(num(5)),
            })),
            expr_stmt(Expression::new(ExpressionKind::Unary {
                op: pwc_frontend::ast::UnaryOp::Not,
                operand: Box::new(boolean(false)),
            })),
        ],
        ..Default::default()
    };
    let wat = compile(&mut program).unwrap();

    assert!(wat.contains("i32.const 0\n    i32.const 5\n    i32.sub"));
    assert!(wat.contains("i32.const 0\n    i32.const 1\n    i32.xor"));
}

#[test]
fn test_construction_bumps_heap_by_object_size() {
    let mut program = Program {
        var_defs: vec![var_def("c", Type::Object("P".to_string()), Literal::None)],
        class_defs: vec![ClassDef {
            name: "P".to_string(),
            fields: vec![
                var_def("x", Type::Int, Literal::Num(1)),
                var_def("y", Type::Int, Literal::Num(2)),
            ],
            methods: vec![],
        }],
        stmts: vec![assign("c", call("P", vec![]))],
        ..Default::default()
    };
    let wat = compile(&mut program).unwrap();

    // Field defaults land at heap+0 and heap+4.
    assert!(wat.contains(
        "global.get $.heap\n    i32.const 0\n    i32.add\n    i32.const 1\n    i32.store"
    ));
    assert!(wat.contains(
        "global.get $.heap\n    i32.const 4\n    i32.add\n    i32.const 2\n    i32.store"
    ));
    // Heap top advances by two words, then the initializer runs on the
    // saved address.
    assert!(wat.contains(
        "global.get $.heap\n    i32.const 8\n    i32.add\n    global.set $.heap\n    call $__init__$P"
    ));
    // The synthesized initializer exists and returns its receiver.
    assert!(wat.contains("(func $__init__$P (param $self i32) (result i32)"));
    assert!(wat.contains("local.get $self\n    return"));
}

#[test]
fn test_construction_sequence_advances_heap_by_each_object_size() {
    // p = P()  (two fields, 8 bytes)
    // q = Q()  (one field, 4 bytes)
    // p = P()
    // Every construction bumps the heap top by exactly its own object's
    // size, so after the sequence the top sits at base + 8 + 4 + 8 and
    // no two objects overlap.
    let mut program = Program {
        var_defs: vec![
            var_def("p", Type::Object("P".to_string()), Literal::None),
            var_def("q", Type::Object("Q".to_string()), Literal::None),
        ],
        class_defs: vec![
            ClassDef {
                name: "P".to_string(),
                fields: vec![
                    var_def("x", Type::Int, Literal::Num(0)),
                    var_def("y", Type::Int, Literal::Num(0)),
                ],
                methods: vec![],
            },
            ClassDef {
                name: "Q".to_string(),
                fields: vec![var_def("v", Type::Int, Literal::Num(0))],
                methods: vec![],
            },
        ],
        stmts: vec![
            assign("p", call("P", vec![])),
            assign("q", call("Q", vec![])),
            assign("p", call("P", vec![])),
        ],
        ..Default::default()
    };
    let wat = compile(&mut program).unwrap();

    let bump_8 = "global.get $.heap\n    i32.const 8\n    i32.add\n    global.set $.heap";
    let bump_4 = "global.get $.heap\n    i32.const 4\n    i32.add\n    global.set $.heap";
    assert_eq!(wat.matches(bump_8).count(), 2, "in:\n{wat}");
    assert_eq!(wat.matches(bump_4).count(), 1, "in:\n{wat}");
    assert_eq!(wat.matches("call $__init__$P").count(), 2);
    assert_eq!(wat.matches("call $__init__$Q").count(), 1);
}

#[test]
fn test_user_variables_named_heap_or_scratch_do_not_collide() {
    // The reserved cells carry a `.` in their emitted names, which no
    // source identifier can contain, so a program is free to use the
    // bare words.
    let mut program = Program {
        var_defs: vec![var_def("heap", Type::Int, Literal::Num(1))],
        fun_defs: vec![FunctionDef {
            name: "f".to_string(),
            params: vec![],
            return_type: Type::Int,
            locals: vec![var_def("scratch", Type::Int, Literal::Num(2))],
            body: vec![Statement::new(StatementKind::Return(ident("scratch")))],
        }],
        stmts: vec![assign(
            "heap",
            binary(BinaryOp::Add, ident("heap"), call("f", vec![])),
        )],
        ..Default::default()
    };
    let wat = compile(&mut program).unwrap();

    // Both globals exist, distinctly named.
    assert!(wat.contains("(global $heap (mut i32) (i32.const 1))"));
    assert!(wat.contains("(global $.heap (mut i32) (i32.const 4))"));
    // Both locals exist inside f, distinctly named.
    assert!(wat.contains("(local $.scratch i32)\n    (local $scratch i32)"));
    // The assignment targets the user's global.
    assert!(wat.contains("i32.add\n    global.set $heap"));
}

#[test]
fn test_field_store_addresses_receiver_not_heap_top() {
    let mut program = Program {
        var_defs: vec![var_def(
            "c",
            Type::Object("Counter".to_string()),
            Literal::None,
        )],
        class_defs: vec![counter_class()],
        stmts: vec![
            assign("c", call("Counter", vec![])),
            Statement::new(StatementKind::FieldAssign {
                object: ident("c"),
                field: "n".to_string(),
                value: num(5),
            }),
        ],
        ..Default::default()
    };
    let wat = compile(&mut program).unwrap();

    // The store goes through the receiver's own address.
    assert!(wat.contains(
        "global.get $c\n    i32.const 0\n    i32.add\n    i32.const 5\n    i32.store"
    ));
    // Never through the heap top.
    assert!(!wat.contains(
        "global.get $.heap\n    i32.const 0\n    i32.add\n    i32.const 5\n    i32.store"
    ));
}

#[test]
fn test_method_call_dispatches_to_mangled_symbol() {
    let mut program = Program {
        var_defs: vec![var_def(
            "c",
            Type::Object("Counter".to_string()),
            Literal::None,
        )],
        class_defs: vec![counter_class()],
        stmts: vec![
            assign("c", call("Counter", vec![])),
            expr_stmt(Expression::new(ExpressionKind::MethodCall {
                object: Box::new(ident("c")),
                method: "get".to_string(),
                args: vec![],
            })),
        ],
        ..Default::default()
    };
    let wat = compile(&mut program).unwrap();

    assert!(wat.contains("(func $get$Counter (param $self i32) (result i32)"));
    assert!(wat.contains("global.get $c\n    call $get$Counter"));
    // Method body reads the field off the receiver.
    assert!(wat.contains("local.get $self\n    i32.const 0\n    i32.add\n    i32.load"));
}

#[test]
fn test_function_locals_initialize_before_body() {
    let mut program = Program {
        fun_defs: vec![FunctionDef {
            name: "bump".to_string(),
            params: vec![Parameter {
                name: "a".to_string(),
                param_type: Type::Int,
            }],
            return_type: Type::Int,
            locals: vec![var_def("t", Type::Int, Literal::Num(10))],
            body: vec![Statement::new(StatementKind::Return(binary(
                BinaryOp::Add,
                ident("a"),
                ident("t"),
            )))],
        }],
        stmts: vec![expr_stmt(call("bump", vec![num(1)]))],
        ..Default::default()
    };
    let wat = compile(&mut program).unwrap();

    assert!(wat.contains("(func $bump (param $a i32) (result i32)"));
    assert!(wat.contains("(local $.scratch i32)\n    (local $t i32)"));
    assert!(wat.contains("i32.const 10\n    local.set $t"));
    // Locals resolve to local.get, not global.get.
    assert!(wat.contains("local.get $a\n    local.get $t\n    i32.add\n    return"));
    // The fall-through result slot closes the body.
    assert!(wat.contains("return\n    i32.const 0\n  )"));
}

#[test]
fn test_builtins_lower_to_import_calls() {
    let mut program = Program {
        stmts: vec![
            expr_stmt(Expression::new(ExpressionKind::Builtin1 {
                name: "abs".to_string(),
                arg: Box::new(num(-3)),
            })),
            expr_stmt(Expression::new(ExpressionKind::Builtin2 {
                name: "max".to_string(),
                arg1: Box::new(num(1)),
                arg2: Box::new(num(2)),
            })),
        ],
        ..Default::default()
    };
    let wat = compile(&mut program).unwrap();

    assert!(wat.contains("i32.const -3\n    call $abs"));
    assert!(wat.contains("i32.const 1\n    i32.const 2\n    call $max"));
}

#[test]
fn test_is_comparison_lowers_to_eq() {
    let mut program = Program {
        stmts: vec![expr_stmt(binary(BinaryOp::Is, none_lit(), none_lit()))],
        ..Default::default()
    };
    let wat = compile(&mut program).unwrap();
    assert!(wat.contains("i32.const 0\n    i32.const 0\n    i32.eq"));
}

#[test]
fn test_empty_program_module() {
    let mut program = Program::default();
    let wat = compile(&mut program).unwrap();

    let expected_tail = "  (func (export \"_start\")\n    (local $.scratch i32)\n  )\n)";
    assert_eq!(&wat[wat.len() - expected_tail.len()..], expected_tail);
}

#[test]
fn test_compile_rejects_ill_typed_program() {
    let mut program = Program {
        stmts: vec![expr_stmt(binary(BinaryOp::Add, num(1), boolean(true)))],
        ..Default::default()
    };
    let err = compile(&mut program).unwrap_err();
    assert!(err.to_string().starts_with("Type error:"));
}
