// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! End-to-end lowering tests: build a resolved AST, lower it, and compare the
//! printed BIR against the expected text.

use bir::{
    gen_bir, gen_bir_with_options, BirFunction, BirGenError, BirGenErrorKind, BirGenOptions,
    BirInstruction, BirPackage, BlockId, ErrorCategory, InstructionKind, ScopeId, TerminatorKind,
    VarKind,
};
use bir_ast::build::*;
use bir_ast::decl::{Function, FunctionBody, Package};
use bir_ast::expr::{BinOp, Expr, ExprKind, UnaryOp};
use bir_ast::stmt::{Stmt, StmtKind, VarDef};
use bir_ast::{PackageId, SemType, Span, SymbolRef};
use bir_context::CompilerContext;
use pretty_assertions::assert_eq;

struct Fixture {
    ctx: CompilerContext,
    space: u32,
}

impl Fixture {
    fn new() -> Self {
        let mut ctx = CompilerContext::new();
        let space = ctx.new_symbol_space();
        Self { ctx, space }
    }

    fn sym(&mut self, name: &str) -> SymbolRef {
        self.ctx.define_symbol(self.space, name).unwrap()
    }

    fn lower_package(&mut self, package: &Package) -> Result<BirPackage, BirGenError> {
        gen_bir(&mut self.ctx, package)
    }

    fn lower(&mut self, functions: Vec<Function>) -> Result<BirPackage, BirGenError> {
        self.lower_package(&package(PackageId::anonymous(), functions))
    }

    fn lower_one(&mut self, function: Function) -> BirFunction {
        let mut bir = self.lower(vec![function]).unwrap();
        let lowered = bir.functions.remove(0);
        assert_temporaries_named_by_slot(&lowered);
        lowered
    }

    fn lower_err(&mut self, function: Function) -> BirGenError {
        self.lower(vec![function]).unwrap_err()
    }
}

fn lines(parts: &[&str]) -> String {
    parts.join("\n")
}

fn assert_temporaries_named_by_slot(function: &BirFunction) {
    for (i, local) in function.local_vars.iter().enumerate() {
        if local.kind == VarKind::Temporary {
            assert_eq!(local.name, format!("%{}", i));
        }
    }
    assert_eq!(function.local_vars[0].kind, VarKind::Return);
    assert_eq!(function.return_variable.index(), 0);
}

fn terminator(function: &BirFunction, block: u32) -> &TerminatorKind {
    &function.basic_blocks[block as usize]
        .terminator
        .as_ref()
        .unwrap()
        .kind
}

fn expr(kind: ExprKind, ty: SemType) -> Expr {
    Expr {
        kind,
        ty: Some(ty),
        span: Span::default(),
    }
}

#[test]
fn add_two_parameters() {
    let mut fx = Fixture::new();
    let a = fx.sym("a");
    let b = fx.sym("b");
    let f = function(
        "add",
        vec![param("a", a, SemType::Int), param("b", b, SemType::Int)],
        Some(SemType::Int),
        vec![ret(Some(binary(
            BinOp::Add,
            var("a", a, SemType::Int),
            var("b", b, SemType::Int),
            SemType::Int,
        )))],
    );
    let lowered = fx.lower_one(f);
    assert_eq!(
        lowered.to_string(),
        lines(&[
            "add(int,int) -> int {",
            "  bb0 {",
            "    %3 = + a b;",
            "    %0 = %3;",
            "    return;",
            "  }",
            "}",
        ])
    );
    assert_eq!(lowered.lookup_key, "$anon/.:add");
    assert_eq!(lowered.required_params.len(), 2);
    assert_eq!(lowered.local(lowered.required_params[0]).unwrap().kind, VarKind::Argument);
}

#[test]
fn while_with_break() {
    let mut fx = Fixture::new();
    let i = fx.sym("i");
    let iv = || var("i", i, SemType::Int);
    let f = function(
        "f",
        vec![],
        None,
        vec![
            var_def("i", i, SemType::Int, Some(int(0))),
            while_loop(
                binary(BinOp::LessThan, iv(), int(10), SemType::Boolean),
                vec![
                    if_then(
                        binary(BinOp::Equal, iv(), int(5), SemType::Boolean),
                        vec![break_stmt()],
                    ),
                    assign(iv(), binary(BinOp::Add, iv(), int(1), SemType::Int)),
                ],
            ),
        ],
    );
    let lowered = fx.lower_one(f);
    assert_eq!(
        lowered.to_string(),
        lines(&[
            "f() {",
            "  bb0 {",
            "    %1 = ConstantLoad 0;",
            "    i = %1;",
            "    GOTO bb1;",
            "  }",
            "  bb1 {",
            "    %3 = ConstantLoad 10;",
            "    %4 = < i %3;",
            "    %4 ? bb2 : bb3;",
            "  }",
            "  bb2 {",
            "    %5 = ConstantLoad 5;",
            "    %6 = == i %5;",
            "    %6 ? bb4 : bb5;",
            "  }",
            "  bb3 {",
            "    return;",
            "  }",
            "  bb4 {",
            "    GOTO bb3;",
            "  }",
            "  bb5 {",
            "    %7 = ConstantLoad 1;",
            "    %8 = + i %7;",
            "    i = %8;",
            "    GOTO bb1;",
            "  }",
            "}",
        ])
    );
    assert_eq!(lowered.predecessors()[1], vec![BlockId(0), BlockId(5)]);
}

#[test]
fn continue_jumps_to_loop_head() {
    let mut fx = Fixture::new();
    let f = function(
        "spin",
        vec![],
        None,
        vec![while_loop(boolean(true), vec![continue_stmt()])],
    );
    let lowered = fx.lower_one(f);
    assert_eq!(terminator(&lowered, 2), &TerminatorKind::Goto { target: BlockId(1) });
}

#[test]
fn break_targets_innermost_loop() {
    let mut fx = Fixture::new();
    let f = function(
        "f",
        vec![],
        None,
        vec![while_loop(
            boolean(true),
            vec![while_loop(boolean(true), vec![break_stmt()]), break_stmt()],
        )],
    );
    let lowered = fx.lower_one(f);
    // outer: head bb1, body bb2, exit bb3; inner: head bb4, body bb5, exit bb6
    assert_eq!(terminator(&lowered, 5), &TerminatorKind::Goto { target: BlockId(6) });
    assert_eq!(terminator(&lowered, 6), &TerminatorKind::Goto { target: BlockId(3) });
    assert_eq!(terminator(&lowered, 3), &TerminatorKind::Return);
}

#[test]
fn break_outside_loop_is_rejected() {
    let mut fx = Fixture::new();
    let err = fx.lower_err(function("f", vec![], None, vec![break_stmt()]));
    assert_eq!(
        err.kind,
        BirGenErrorKind::NoEnclosingLoop { statement: "break" }
    );
}

#[test]
fn list_literal() {
    let mut fx = Fixture::new();
    let f = function(
        "f",
        vec![],
        Some(SemType::List),
        vec![ret(Some(list(vec![int(1), int(2), int(3)], SemType::Int)))],
    );
    assert_eq!(
        fx.lower_one(f).to_string(),
        lines(&[
            "f() -> list {",
            "  bb0 {",
            "    %1 = ConstantLoad 1;",
            "    %2 = ConstantLoad 2;",
            "    %3 = ConstantLoad 3;",
            "    %4 = ConstantLoad 3;",
            "    %5 = newArray int[%4]{%1, %2, %3};",
            "    %0 = %5;",
            "    return;",
            "  }",
            "}",
        ])
    );
}

#[test]
fn if_else_meets_in_merge_block() {
    let mut fx = Fixture::new();
    let a = fx.sym("a");
    let b = fx.sym("b");
    let r = fx.sym("r");
    let f = function(
        "max",
        vec![param("a", a, SemType::Int), param("b", b, SemType::Int)],
        Some(SemType::Int),
        vec![
            var_def("r", r, SemType::Int, None),
            if_else(
                binary(
                    BinOp::GreaterThan,
                    var("a", a, SemType::Int),
                    var("b", b, SemType::Int),
                    SemType::Boolean,
                ),
                vec![assign(var("r", r, SemType::Int), var("a", a, SemType::Int))],
                vec![assign(var("r", r, SemType::Int), var("b", b, SemType::Int))],
            ),
            ret(Some(var("r", r, SemType::Int))),
        ],
    );
    let lowered = fx.lower_one(f);
    assert_eq!(
        lowered.to_string(),
        lines(&[
            "max(int,int) -> int {",
            "  bb0 {",
            "    %4 = > a b;",
            "    %4 ? bb1 : bb2;",
            "  }",
            "  bb1 {",
            "    r = a;",
            "    GOTO bb3;",
            "  }",
            "  bb2 {",
            "    r = b;",
            "    GOTO bb3;",
            "  }",
            "  bb3 {",
            "    %0 = r;",
            "    return;",
            "  }",
            "}",
        ])
    );
    // then and else bodies each open a scope under the function scope
    assert_eq!(lowered.scopes.len(), 3);
    assert_eq!(lowered.basic_blocks[1].instructions[0].scope(), ScopeId(1));
    assert_eq!(lowered.basic_blocks[2].instructions[0].scope(), ScopeId(2));
    assert_eq!(lowered.scopes[2].parent, Some(ScopeId(0)));
}

#[test]
fn if_without_else_branches_to_merge() {
    let mut fx = Fixture::new();
    let c = fx.sym("c");
    let f = function(
        "f",
        vec![param("c", c, SemType::Boolean)],
        None,
        vec![if_then(var("c", c, SemType::Boolean), vec![ret(None)])],
    );
    let lowered = fx.lower_one(f);
    assert_eq!(
        terminator(&lowered, 0),
        &TerminatorKind::Branch {
            op: lowered.required_params[0],
            true_bb: BlockId(1),
            false_bb: BlockId(2),
        }
    );
    assert_eq!(terminator(&lowered, 1), &TerminatorKind::Return);
    assert_eq!(terminator(&lowered, 2), &TerminatorKind::Return);
}

#[test]
fn unqualified_call_stays_in_package() {
    let mut fx = Fixture::new();
    let f = function(
        "main",
        vec![],
        None,
        vec![expr_stmt(call("foo", vec![int(1)], SemType::Nil))],
    );
    let lowered = fx.lower_one(f);
    assert_eq!(
        lowered.to_string(),
        lines(&[
            "main() {",
            "  bb0 {",
            "    %1 = ConstantLoad 1;",
            "    %2 = foo(%1) -> bb1;",
            "  }",
            "  bb1 {",
            "    return;",
            "  }",
            "}",
        ])
    );
    match terminator(&lowered, 0) {
        TerminatorKind::Call { callee, then_bb, .. } => {
            assert_eq!(callee.lookup_key, "$anon/.:foo");
            assert!(callee.package.is_unnamed());
            assert_eq!(*then_bb, BlockId(1));
        }
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn qualified_calls_use_import_package() {
    let mut fx = Fixture::new();
    let mut pkg = package(
        PackageId::anonymous(),
        vec![function(
            "main",
            vec![],
            None,
            vec![
                expr_stmt(qualified_call("io", "println", vec![string("hi")], SemType::Nil)),
                expr_stmt(qualified_call("arr", "push", vec![], SemType::Nil)),
            ],
        )],
    );
    pkg.imports.push(import(Some("ballerina"), &["io"], None));
    pkg.imports
        .push(import(Some("ballerina"), &["lang", "array"], Some("arr")));

    let bir = fx.lower_package(&pkg).unwrap();
    let main = bir.main_function().unwrap();
    let keys: Vec<&str> = main
        .basic_blocks
        .iter()
        .filter_map(|b| match &b.terminator.as_ref()?.kind {
            TerminatorKind::Call { callee, .. } => Some(callee.lookup_key.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(keys, vec!["ballerina/io:println", "ballerina/lang.array:push"]);
    assert_eq!(bir.import_modules.len(), 2);
    assert!(bir.to_string().starts_with(&lines(&[
        "module $anon-package;",
        "import ballerina/io v 0.0.0;",
        "import ballerina/lang.array v 0.0.0;",
        "",
    ])));
}

#[test]
fn explicit_alias_replaces_default_alias() {
    let mut fx = Fixture::new();
    let mut pkg = package(
        PackageId::anonymous(),
        vec![function(
            "main",
            vec![],
            None,
            vec![expr_stmt(qualified_call("array", "push", vec![], SemType::Nil))],
        )],
    );
    pkg.imports
        .push(import(Some("ballerina"), &["lang", "array"], Some("arr")));
    let err = fx.lower_package(&pkg).unwrap_err();
    assert_eq!(
        err.kind,
        BirGenErrorKind::UnresolvedImport {
            alias: "array".into()
        }
    );
    assert_eq!(err.category(), ErrorCategory::UnresolvedReference);
}

#[test]
fn unknown_import_alias() {
    let mut fx = Fixture::new();
    let err = fx.lower_err(function(
        "main",
        vec![],
        None,
        vec![expr_stmt(qualified_call("nope", "f", vec![], SemType::Nil))],
    ));
    assert_eq!(err.to_string(), "unresolved import alias `nope`");
}

#[test]
fn index_store_then_load() {
    let mut fx = Fixture::new();
    let a = fx.sym("a");
    let i = fx.sym("i");
    let arr = || var("a", a, SemType::array_of(SemType::Int));
    let idx = || var("i", i, SemType::Int);
    let f = function(
        "f",
        vec![
            param("a", a, SemType::array_of(SemType::Int)),
            param("i", i, SemType::Int),
        ],
        Some(SemType::Int),
        vec![
            assign(index(arr(), idx(), SemType::Int), int(5)),
            ret(Some(index(arr(), idx(), SemType::Int))),
        ],
    );
    let lowered = fx.lower_one(f);
    assert_eq!(
        lowered.to_string(),
        lines(&[
            "f(int[],int) -> int {",
            "  bb0 {",
            "    %3 = ConstantLoad 5;",
            "    a[i] = %3;",
            "    %4 = a[i];",
            "    %0 = %4;",
            "    return;",
            "  }",
            "}",
        ])
    );
    let kinds: Vec<InstructionKind> = lowered.basic_blocks[0]
        .instructions
        .iter()
        .map(|inst| inst.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            InstructionKind::ConstLoad,
            InstructionKind::ArrayStore,
            InstructionKind::ArrayLoad,
            InstructionKind::Move,
        ]
    );
}

#[test]
fn map_containers_use_map_access() {
    let mut fx = Fixture::new();
    let m = fx.sym("m");
    let map = || var("m", m, SemType::Map);
    let f = function(
        "f",
        vec![param("m", m, SemType::Map)],
        Some(SemType::Int),
        vec![
            assign(index(map(), string("k"), SemType::Int), int(1)),
            ret(Some(field(map(), "k", SemType::Int))),
        ],
    );
    let lowered = fx.lower_one(f);
    let kinds: Vec<InstructionKind> = lowered.basic_blocks[0]
        .instructions
        .iter()
        .map(|inst| inst.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            InstructionKind::ConstLoad,
            InstructionKind::ConstLoad,
            InstructionKind::MapStore,
            InstructionKind::ConstLoad,
            InstructionKind::MapLoad,
            InstructionKind::Move,
        ]
    );
}

#[test]
fn mapping_constructor() {
    let mut fx = Fixture::new();
    let value = expr(
        ExprKind::MappingConstructor {
            fields: vec![(ident("a"), int(1))],
        },
        SemType::Map,
    );
    let f = function("f", vec![], Some(SemType::Map), vec![ret(Some(value))]);
    assert_eq!(
        fx.lower_one(f).to_string(),
        lines(&[
            "f() -> map {",
            "  bb0 {",
            "    %1 = ConstantLoad \"a\";",
            "    %2 = ConstantLoad 1;",
            "    %3 = newMap map{%1=%2};",
            "    %0 = %3;",
            "    return;",
            "  }",
            "}",
        ])
    );
}

#[test]
fn compound_assignment_reads_then_stores() {
    let mut fx = Fixture::new();
    let x = fx.sym("x");
    let f = function(
        "f",
        vec![param("x", x, SemType::Int)],
        Some(SemType::Int),
        vec![
            compound_assign(BinOp::Add, var("x", x, SemType::Int), int(2), SemType::Int),
            ret(Some(var("x", x, SemType::Int))),
        ],
    );
    assert_eq!(
        fx.lower_one(f).to_string(),
        lines(&[
            "f(int) -> int {",
            "  bb0 {",
            "    %2 = ConstantLoad 2;",
            "    %3 = + x %2;",
            "    x = %3;",
            "    %0 = x;",
            "    return;",
            "  }",
            "}",
        ])
    );
}

#[test]
fn wildcard_assignment_discards() {
    let mut fx = Fixture::new();
    let f = function(
        "f",
        vec![],
        None,
        vec![assign(wildcard(), call("g", vec![], SemType::Int))],
    );
    let lowered = fx.lower_one(f);
    assert_eq!(lowered.basic_blocks.len(), 2);
    let sink = lowered.basic_blocks[1].instructions[0].lhs;
    assert_eq!(lowered.local(sink).unwrap().ty, None);
}

#[test]
fn unsupported_constructs() {
    let mut fx = Fixture::new();
    let err = fx.lower_err(function(
        "f",
        vec![],
        None,
        vec![expr_stmt(binary(BinOp::ClosedRange, int(1), int(3), SemType::Any))],
    ));
    assert_eq!(err.to_string(), "unsupported operator `...`");
    assert_eq!(err.category(), ErrorCategory::UnsupportedConstruct);

    let err = fx.lower_err(function(
        "f",
        vec![],
        None,
        vec![expr_stmt(unary(UnaryOp::Plus, int(1), SemType::Int))],
    ));
    assert_eq!(err.to_string(), "unsupported operator `+`");

    let err = fx.lower_err(function("f", vec![], None, vec![assign(int(1), int(2))]));
    assert_eq!(
        err.kind,
        BirGenErrorKind::UnsupportedAssignmentTarget {
            construct: "literal"
        }
    );

    let item = fx.sym("item");
    let foreach = Stmt {
        kind: StmtKind::Foreach {
            var: VarDef {
                name: ident("item"),
                symbol: item,
                ty: Some(SemType::Int),
                init: None,
            },
            collection: list(vec![], SemType::Int),
            body: block(vec![]),
        },
        span: Span::new(4, 20),
    };
    let err = fx.lower_err(function("f", vec![], None, vec![foreach]));
    assert_eq!(
        err.kind,
        BirGenErrorKind::UnsupportedStatement {
            construct: "foreach statement"
        }
    );
    assert_eq!(err.span, Span::new(4, 20));
}

#[test]
fn unresolved_variable() {
    let mut fx = Fixture::new();
    let ghost = fx.sym("ghost");
    let err = fx.lower_err(function(
        "f",
        vec![],
        Some(SemType::Int),
        vec![ret(Some(var("ghost", ghost, SemType::Int)))],
    ));
    assert_eq!(
        err.kind,
        BirGenErrorKind::UnresolvedVariable {
            name: "ghost".into()
        }
    );
}

#[test]
fn constants_load_their_value() {
    let mut fx = Fixture::new();
    let limit = fx.sym("LIMIT");
    let counter = fx.sym("counter");
    let mut pkg = package(
        PackageId::anonymous(),
        vec![function(
            "f",
            vec![],
            Some(SemType::Int),
            vec![ret(Some(var("LIMIT", limit, SemType::Int)))],
        )],
    );
    pkg.constants.push(constant("LIMIT", limit, int(10)));
    pkg.global_vars.push(global("counter", counter, SemType::Int));
    pkg.type_definitions
        .push(type_definition("Point", Some(SemType::Named("Point".into()))));
    pkg.type_definitions.push(type_definition("Pending", None));

    let bir = fx.lower_package(&pkg).unwrap();
    assert_eq!(bir.type_definitions.len(), 1);
    assert_eq!(bir.type_definitions[0].name, "Point");
    assert_eq!(
        bir.to_string(),
        lines(&[
            "module $anon-package;",
            "counter  int;",
            "const LIMIT = 10;",
            "f() -> int {",
            "  bb0 {",
            "    %1 = ConstantLoad 10;",
            "    %0 = %1;",
            "    return;",
            "  }",
            "}",
            "",
        ])
    );
}

#[test]
fn non_literal_constant_is_rejected() {
    let mut fx = Fixture::new();
    let c = fx.sym("C");
    let mut pkg = package(PackageId::anonymous(), vec![]);
    pkg.constants.push(constant(
        "C",
        c,
        binary(BinOp::Add, int(1), int(2), SemType::Int),
    ));
    let err = fx.lower_package(&pkg).unwrap_err();
    assert_eq!(err.kind, BirGenErrorKind::UnsupportedConstant { name: "C".into() });
}

#[test]
fn expression_body() {
    let mut fx = Fixture::new();
    let x = fx.sym("x");
    let f = expr_function(
        "twice",
        vec![param("x", x, SemType::Int)],
        SemType::Int,
        binary(BinOp::Mul, var("x", x, SemType::Int), int(2), SemType::Int),
    );
    assert_eq!(
        fx.lower_one(f).to_string(),
        lines(&[
            "twice(int) -> int {",
            "  bb0 {",
            "    %2 = ConstantLoad 2;",
            "    %3 = * x %2;",
            "    %0 = %3;",
            "    return;",
            "  }",
            "}",
        ])
    );
}

#[test]
fn external_body_is_rejected() {
    let mut fx = Fixture::new();
    let f = Function {
        name: ident("native"),
        params: vec![],
        return_type: None,
        body: FunctionBody::External,
        span: Span::new(0, 10),
    };
    let err = fx.lower_err(f);
    assert!(matches!(
        err.kind,
        BirGenErrorKind::UnsupportedFunctionBody { ref function, .. } if function == "native"
    ));
    assert_eq!(err.span, Span::new(0, 10));
}

#[test]
fn panic_terminates_block() {
    let mut fx = Fixture::new();
    let f = function(
        "fail",
        vec![],
        None,
        vec![panic(string("boom")), ret(None)],
    );
    assert_eq!(
        fx.lower_one(f).to_string(),
        lines(&[
            "fail() {",
            "  bb0 {",
            "    %1 = ConstantLoad \"boom\";",
            "    panic %1;",
            "  }",
            "}",
        ])
    );
}

#[test]
fn lock_block() {
    let mut fx = Fixture::new();
    let x = fx.sym("x");
    let f = function(
        "f",
        vec![],
        None,
        vec![
            var_def("x", x, SemType::Int, Some(int(1))),
            lock(vec![assign(var("x", x, SemType::Int), int(2))]),
        ],
    );
    let lowered = fx.lower_one(f);
    assert_eq!(
        lowered.to_string(),
        lines(&[
            "f() {",
            "  bb0 {",
            "    %1 = ConstantLoad 1;",
            "    x = %1;",
            "    lock -> bb1;",
            "  }",
            "  bb1 {",
            "    %3 = ConstantLoad 2;",
            "    x = %3;",
            "    unlock -> bb2;",
            "  }",
            "  bb2 {",
            "    return;",
            "  }",
            "}",
        ])
    );
    assert_eq!(lowered.basic_blocks[1].instructions[1].scope(), ScopeId(1));
}

#[test]
fn ternary_writes_one_result() {
    let mut fx = Fixture::new();
    let c = fx.sym("c");
    let choice = expr(
        ExprKind::Ternary {
            cond: Box::new(var("c", c, SemType::Boolean)),
            then_expr: Box::new(int(1)),
            else_expr: Box::new(int(2)),
        },
        SemType::Int,
    );
    let f = function(
        "f",
        vec![param("c", c, SemType::Boolean)],
        Some(SemType::Int),
        vec![ret(Some(choice))],
    );
    assert_eq!(
        fx.lower_one(f).to_string(),
        lines(&[
            "f(boolean) -> int {",
            "  bb0 {",
            "    c ? bb1 : bb2;",
            "  }",
            "  bb1 {",
            "    %3 = ConstantLoad 1;",
            "    %2 = %3;",
            "    GOTO bb3;",
            "  }",
            "  bb2 {",
            "    %4 = ConstantLoad 2;",
            "    %2 = %4;",
            "    GOTO bb3;",
            "  }",
            "  bb3 {",
            "    %0 = %2;",
            "    return;",
            "  }",
            "}",
        ])
    );
}

#[test]
fn type_test_and_cast() {
    let mut fx = Fixture::new();
    let v = fx.sym("v");
    let f = function(
        "f",
        vec![param("v", v, SemType::Any)],
        Some(SemType::Boolean),
        vec![
            expr_stmt(cast(var("v", v, SemType::Any), SemType::Int)),
            ret(Some(type_test(var("v", v, SemType::Any), SemType::Int, true))),
        ],
    );
    assert_eq!(
        fx.lower_one(f).to_string(),
        lines(&[
            "f(any) -> boolean {",
            "  bb0 {",
            "    %2 = <int>(v);",
            "    %3 = v !is int;",
            "    %0 = %3;",
            "    return;",
            "  }",
            "}",
        ])
    );
}

#[test]
fn narrowed_symbol_reaches_original_binding() {
    let mut fx = Fixture::new();
    let x = fx.sym("x");
    let narrowed = fx.ctx.create_narrowed_symbol(x).unwrap();
    let f = function(
        "f",
        vec![param("x", x, SemType::Any)],
        Some(SemType::Int),
        vec![ret(Some(group(var("x", narrowed, SemType::Int))))],
    );
    let lowered = fx.lower_one(f);
    let moved = &lowered.basic_blocks[0].instructions[0];
    assert_eq!(moved.rhs_operands(), vec![lowered.required_params[0]]);
}

#[test]
fn entry_function_is_recorded() {
    let mut fx = Fixture::new();
    let bir = fx
        .lower(vec![
            function("helper", vec![], None, vec![]),
            function("main", vec![], None, vec![]),
        ])
        .unwrap();
    assert_eq!(bir.main_function, Some(1));
    assert_eq!(bir.main_function().unwrap().name, "main");
    assert!(bir.function("helper").is_some());
}

#[test]
fn options_rename_blocks_and_entry() {
    let mut fx = Fixture::new();
    let options = BirGenOptions {
        entry_function: "start".to_string(),
        block_id_prefix: "L".to_string(),
        verify: true,
    };
    let pkg = package(
        PackageId::anonymous(),
        vec![
            function("main", vec![], None, vec![]),
            function(
                "start",
                vec![],
                None,
                vec![while_loop(boolean(false), vec![])],
            ),
        ],
    );
    let bir = gen_bir_with_options(&mut fx.ctx, &pkg, &options).unwrap();
    assert_eq!(bir.main_function().unwrap().name, "start");
    let names: Vec<&str> = bir.functions[1]
        .basic_blocks
        .iter()
        .map(|b| b.name.as_str())
        .collect();
    assert_eq!(names, vec!["L0", "L1", "L2", "L3"]);
    assert!(bir.functions[1].to_string().contains("GOTO L1;"));
}

#[test]
fn every_operand_refers_to_a_local() {
    let mut fx = Fixture::new();
    let n = fx.sym("n");
    let acc = fx.sym("acc");
    let nv = || var("n", n, SemType::Int);
    let accv = || var("acc", acc, SemType::Int);
    let f = function(
        "sum",
        vec![param("n", n, SemType::Int)],
        Some(SemType::Int),
        vec![
            var_def("acc", acc, SemType::Int, Some(int(0))),
            while_loop(
                binary(BinOp::GreaterThan, nv(), int(0), SemType::Boolean),
                vec![
                    compound_assign(BinOp::Add, accv(), nv(), SemType::Int),
                    compound_assign(BinOp::Sub, nv(), int(1), SemType::Int),
                    expr_stmt(call("log", vec![accv()], SemType::Nil)),
                ],
            ),
            ret(Some(accv())),
        ],
    );
    let lowered = fx.lower_one(f);
    let len = lowered.local_vars.len();
    for block in &lowered.basic_blocks {
        for inst in &block.instructions {
            assert!(inst.lhs.index() < len);
            assert!(inst.rhs_operands().iter().all(|op| op.index() < len));
        }
        let term = block.terminator.as_ref().unwrap();
        assert!(term.rhs_operands().iter().all(|op| op.index() < len));
        assert!(term.successors().iter().all(|s| lowered.block(*s).is_some()));
    }
    assert!(bir::verify_function(&lowered).is_ok());
}

#[test]
fn calls_nested_in_conditions_and_index() {
    let mut fx = Fixture::new();
    let a = fx.sym("a");
    let f = function(
        "f",
        vec![param("a", a, SemType::array_of(SemType::Int))],
        Some(SemType::Int),
        vec![
            while_loop(
                call("c", vec![], SemType::Boolean),
                vec![if_else(
                    call("d", vec![], SemType::Boolean),
                    vec![break_stmt()],
                    vec![continue_stmt()],
                )],
            ),
            ret(Some(index(
                var("a", a, SemType::array_of(SemType::Int)),
                call("g", vec![], SemType::Int),
                SemType::Int,
            ))),
        ],
    );
    let lowered = fx.lower_one(f);
    // The container is read in the block the index call continues in.
    assert_eq!(
        lowered.to_string(),
        lines(&[
            "f(int[]) -> int {",
            "  bb0 {",
            "    GOTO bb1;",
            "  }",
            "  bb1 {",
            "    %2 = c() -> bb2;",
            "  }",
            "  bb2 {",
            "    %2 ? bb3 : bb4;",
            "  }",
            "  bb3 {",
            "    %3 = d() -> bb5;",
            "  }",
            "  bb4 {",
            "    %4 = g() -> bb9;",
            "  }",
            "  bb5 {",
            "    %3 ? bb6 : bb7;",
            "  }",
            "  bb6 {",
            "    GOTO bb4;",
            "  }",
            "  bb7 {",
            "    GOTO bb1;",
            "  }",
            "  bb8 {",
            "    GOTO bb1;",
            "  }",
            "  bb9 {",
            "    %5 = a[%4];",
            "    %0 = %5;",
            "    return;",
            "  }",
            "}",
        ])
    );
}

#[test]
fn call_as_binary_operand() {
    let mut fx = Fixture::new();
    let f = function(
        "f",
        vec![],
        Some(SemType::Int),
        vec![ret(Some(binary(
            BinOp::Add,
            call("h", vec![], SemType::Int),
            int(1),
            SemType::Int,
        )))],
    );
    assert_eq!(
        fx.lower_one(f).to_string(),
        lines(&[
            "f() -> int {",
            "  bb0 {",
            "    %1 = h() -> bb1;",
            "  }",
            "  bb1 {",
            "    %2 = ConstantLoad 1;",
            "    %3 = + %1 %2;",
            "    %0 = %3;",
            "    return;",
            "  }",
            "}",
        ])
    );
}

#[test]
fn rebound_alias_resolves_to_later_import() {
    let mut fx = Fixture::new();
    let mut pkg = package(
        PackageId::anonymous(),
        vec![function(
            "main",
            vec![],
            None,
            vec![expr_stmt(qualified_call("x", "f", vec![], SemType::Nil))],
        )],
    );
    pkg.imports.push(import(Some("acme"), &["x"], None));
    pkg.imports.push(import(Some("other"), &["util"], Some("x")));

    let bir = fx.lower_package(&pkg).unwrap();
    assert_eq!(bir.import_modules.len(), 2);
    match terminator(bir.main_function().unwrap(), 0) {
        TerminatorKind::Call { callee, .. } => assert_eq!(callee.lookup_key, "other/util:f"),
        other => panic!("expected call, got {:?}", other),
    }
}
