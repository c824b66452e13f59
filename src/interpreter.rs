//! Tree-walking evaluator.
//!
//! Statements execute against a mutable closure and a `Context` that owns
//! the program's output stream. `return` unwinds as `Unwind::Return` and is
//! consumed by the nearest enclosing `MethodBody`; runtime errors keep
//! propagating to the embedding caller.

use std::rc::Rc;

use crate::ast::{ComparisonOp, Statement};
use crate::runtime::{
    self, Class, ClassInstance, Closure, Context, ExecResult, Executable, Object, ObjectHolder,
    RuntimeError, Unwind,
};

const INIT_METHOD: &str = "__init__";
const ADD_METHOD: &str = "__add__";

/// Runs a whole program in a fresh root closure. A `return` signal escaping
/// to the top level is a runtime error.
pub fn run_program(program: &Statement, context: &mut dyn Context) -> Result<(), RuntimeError> {
    let mut closure = Closure::new();
    match program.execute(&mut closure, context) {
        Ok(_) => Ok(()),
        Err(Unwind::Return(_)) => Err(RuntimeError::ReturnOutsideMethod),
        Err(Unwind::Error(error)) => Err(error),
    }
}

impl Executable for Statement {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        match self {
            Statement::Const(value) => Ok(value.clone()),
            Statement::Assignment { name, value } => {
                let value = value.execute(closure, context)?;
                closure.insert(name.clone(), value.clone());
                Ok(value)
            }
            Statement::VariableValue { dotted_ids } => read_variable(dotted_ids, closure),
            Statement::FieldAssignment {
                object,
                field_name,
                value,
            } => assign_field(object, field_name, value, closure, context),
            Statement::Print { args } => print_args(args, closure, context),
            Statement::Stringify { argument } => {
                let value = argument.execute(closure, context)?;
                let text = runtime::to_output(&value, context)?;
                Ok(ObjectHolder::string(text))
            }
            Statement::Add { lhs, rhs } => {
                let lhs = lhs.execute(closure, context)?;
                let rhs = rhs.execute(closure, context)?;
                add(&lhs, &rhs, context)
            }
            Statement::Sub { lhs, rhs } => {
                numeric_op(lhs, rhs, "subtraction", closure, context, |a, b| {
                    Ok(a.wrapping_sub(b))
                })
            }
            Statement::Mult { lhs, rhs } => {
                numeric_op(lhs, rhs, "multiplication", closure, context, |a, b| {
                    Ok(a.wrapping_mul(b))
                })
            }
            Statement::Div { lhs, rhs } => {
                numeric_op(lhs, rhs, "division", closure, context, |a, b| {
                    if b == 0 {
                        return Err(RuntimeError::DivisionByZero);
                    }
                    Ok(a.wrapping_div(b))
                })
            }
            Statement::And { lhs, rhs } => {
                // Both operands are always evaluated.
                let lhs = lhs.execute(closure, context)?;
                let rhs = rhs.execute(closure, context)?;
                Ok(ObjectHolder::bool(
                    runtime::is_true(&lhs) && runtime::is_true(&rhs),
                ))
            }
            Statement::Or { lhs, rhs } => {
                let lhs = lhs.execute(closure, context)?;
                if runtime::is_true(&lhs) {
                    return Ok(ObjectHolder::bool(true));
                }
                let rhs = rhs.execute(closure, context)?;
                Ok(ObjectHolder::bool(runtime::is_true(&rhs)))
            }
            Statement::Not { argument } => {
                let value = argument.execute(closure, context)?;
                Ok(ObjectHolder::bool(!runtime::is_true(&value)))
            }
            Statement::Comparison { op, lhs, rhs } => {
                let lhs = lhs.execute(closure, context)?;
                let rhs = rhs.execute(closure, context)?;
                let verdict = match op {
                    ComparisonOp::Eq => runtime::equal(&lhs, &rhs, context)?,
                    ComparisonOp::NotEq => runtime::not_equal(&lhs, &rhs, context)?,
                    ComparisonOp::Less => runtime::less(&lhs, &rhs, context)?,
                    ComparisonOp::Greater => runtime::greater(&lhs, &rhs, context)?,
                    ComparisonOp::LessOrEq => runtime::less_or_equal(&lhs, &rhs, context)?,
                    ComparisonOp::GreaterOrEq => runtime::greater_or_equal(&lhs, &rhs, context)?,
                };
                Ok(ObjectHolder::bool(verdict))
            }
            Statement::MethodCall {
                object,
                method,
                args,
            } => {
                let receiver = object.execute(closure, context)?;
                let mut actual_args = Vec::with_capacity(args.len());
                for arg in args {
                    actual_args.push(arg.execute(closure, context)?);
                }
                receiver.call_method(method, &actual_args, context)
            }
            Statement::NewInstance { class, args } => new_instance(class, args, closure, context),
            Statement::IfElse {
                condition,
                if_body,
                else_body,
            } => {
                let condition = condition.execute(closure, context)?;
                if runtime::is_true(&condition) {
                    if_body.execute(closure, context)
                } else if let Some(else_body) = else_body {
                    else_body.execute(closure, context)
                } else {
                    Ok(ObjectHolder::none())
                }
            }
            Statement::Return { value } => {
                let value = value.execute(closure, context)?;
                Err(Unwind::Return(value))
            }
            Statement::MethodBody { body } => match body.execute(closure, context) {
                Ok(_) => Ok(ObjectHolder::none()),
                Err(Unwind::Return(value)) => Ok(value),
                Err(error) => Err(error),
            },
            Statement::Compound { statements } => {
                for statement in statements {
                    statement.execute(closure, context)?;
                }
                Ok(ObjectHolder::none())
            }
            Statement::ClassDefinition { class } => {
                let holder = ObjectHolder::own(Object::Class(Rc::clone(class)));
                closure.insert(class.name().to_string(), holder.clone());
                Ok(holder)
            }
        }
    }
}

fn read_variable(dotted_ids: &[String], closure: &Closure) -> ExecResult {
    let [name, fields @ ..] = dotted_ids else {
        return Err(RuntimeError::UndefinedVariable {
            name: String::new(),
        }
        .into());
    };
    let mut object = closure
        .get(name)
        .cloned()
        .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.clone() })?;
    for field in fields {
        object = read_field(&object, field)?;
    }
    Ok(object)
}

fn read_field(object: &ObjectHolder, field: &str) -> Result<ObjectHolder, RuntimeError> {
    let Some(rc) = object.get() else {
        return Err(RuntimeError::NotAnInstance {
            type_name: object.type_name(),
        });
    };
    match &*rc.borrow() {
        Object::Instance(instance) => instance
            .fields()
            .get(field)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownField {
                field: field.to_string(),
                type_name: instance.class().name().to_string(),
            }),
        other => Err(RuntimeError::NotAnInstance {
            type_name: other.type_name(),
        }),
    }
}

fn assign_field(
    object: &Statement,
    field_name: &str,
    value: &Statement,
    closure: &mut Closure,
    context: &mut dyn Context,
) -> ExecResult {
    let receiver = object.execute(closure, context)?;
    let value = value.execute(closure, context)?;
    let Some(rc) = receiver.get() else {
        return Err(RuntimeError::NotAnInstance {
            type_name: receiver.type_name(),
        }
        .into());
    };
    match &mut *rc.borrow_mut() {
        Object::Instance(instance) => {
            instance
                .fields_mut()
                .insert(field_name.to_string(), value.clone());
            Ok(value)
        }
        other => Err(RuntimeError::NotAnInstance {
            type_name: other.type_name(),
        }
        .into()),
    }
}

fn print_args(args: &[Statement], closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
    let mut first = true;
    for arg in args {
        let value = arg.execute(closure, context)?;
        let text = runtime::to_output(&value, context)?;
        let out = context.output_stream();
        if !first {
            write!(out, " ")?;
        }
        write!(out, "{text}")?;
        first = false;
    }
    writeln!(context.output_stream())?;
    Ok(ObjectHolder::none())
}

fn add(lhs: &ObjectHolder, rhs: &ObjectHolder, context: &mut dyn Context) -> ExecResult {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        return Ok(ObjectHolder::number(a.wrapping_add(b)));
    }
    if let (Some(a), Some(b)) = (lhs.as_string(), rhs.as_string()) {
        return Ok(ObjectHolder::string(a + &b));
    }
    if lhs.has_method(ADD_METHOD, 1) {
        return lhs.call_method(ADD_METHOD, &[rhs.clone()], context);
    }
    Err(RuntimeError::UnsupportedOperation {
        operation: "addition",
        lhs: lhs.type_name(),
        rhs: rhs.type_name(),
    }
    .into())
}

fn numeric_op(
    lhs: &Statement,
    rhs: &Statement,
    operation: &'static str,
    closure: &mut Closure,
    context: &mut dyn Context,
    apply: impl Fn(i64, i64) -> Result<i64, RuntimeError>,
) -> ExecResult {
    let lhs = lhs.execute(closure, context)?;
    let rhs = rhs.execute(closure, context)?;
    match (lhs.as_number(), rhs.as_number()) {
        (Some(a), Some(b)) => Ok(ObjectHolder::number(apply(a, b)?)),
        _ => Err(RuntimeError::UnsupportedOperation {
            operation,
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        }
        .into()),
    }
}

fn new_instance(
    class: &Rc<Class>,
    args: &[Statement],
    closure: &mut Closure,
    context: &mut dyn Context,
) -> ExecResult {
    let instance = ObjectHolder::own(Object::Instance(ClassInstance::new(Rc::clone(class))));
    // Arguments are evaluated only when a matching __init__ exists.
    if instance.has_method(INIT_METHOD, args.len()) {
        let mut actual_args = Vec::with_capacity(args.len());
        for arg in args {
            actual_args.push(arg.execute(closure, context)?);
        }
        instance.call_method(INIT_METHOD, &actual_args, context)?;
    }
    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Method;

    fn num(value: i64) -> Statement {
        Statement::Const(ObjectHolder::number(value))
    }

    fn text(value: &str) -> Statement {
        Statement::Const(ObjectHolder::string(value.to_string()))
    }

    fn boolean(value: bool) -> Statement {
        Statement::Const(ObjectHolder::bool(value))
    }

    fn var(name: &str) -> Statement {
        Statement::VariableValue {
            dotted_ids: vec![name.to_string()],
        }
    }

    fn dotted(ids: &[&str]) -> Statement {
        Statement::VariableValue {
            dotted_ids: ids.iter().map(|id| id.to_string()).collect(),
        }
    }

    fn assign(name: &str, value: Statement) -> Statement {
        Statement::Assignment {
            name: name.to_string(),
            value: Box::new(value),
        }
    }

    fn print(args: Vec<Statement>) -> Statement {
        Statement::Print { args }
    }

    fn compound(statements: Vec<Statement>) -> Statement {
        Statement::Compound { statements }
    }

    fn method(name: &str, params: &[&str], body: Statement) -> Method {
        Method {
            name: name.to_string(),
            formal_params: params.iter().map(|p| p.to_string()).collect(),
            body: Rc::new(Statement::MethodBody {
                body: Box::new(body),
            }),
        }
    }

    fn class(name: &str, methods: Vec<Method>, parent: Option<&Rc<Class>>) -> Rc<Class> {
        Rc::new(Class::new(
            name.to_string(),
            methods,
            parent.map(Rc::clone),
        ))
    }

    fn method_call(object: Statement, name: &str, args: Vec<Statement>) -> Statement {
        Statement::MethodCall {
            object: Box::new(object),
            method: name.to_string(),
            args,
        }
    }

    fn new_of(class: &Rc<Class>, args: Vec<Statement>) -> Statement {
        Statement::NewInstance {
            class: Rc::clone(class),
            args,
        }
    }

    fn run(program: Statement) -> (ExecResult, String) {
        let mut output = String::new();
        let result = {
            let mut context = crate::runtime::SimpleContext::new(&mut output);
            let mut closure = Closure::new();
            program.execute(&mut closure, &mut context)
        };
        (result, output)
    }

    fn run_expecting_output(program: Statement) -> String {
        let (result, output) = run(program);
        result.expect("execution failed");
        output
    }

    fn expect_runtime_error(result: ExecResult) -> RuntimeError {
        match result.expect_err("expected a runtime error") {
            Unwind::Error(error) => error,
            Unwind::Return(_) => panic!("unexpected return signal"),
        }
    }

    #[test]
    fn assignment_stores_and_returns_the_value() {
        let (result, _) = run(compound(vec![
            assign("x", num(3)),
            print(vec![var("x")]),
        ]));
        result.expect("execution failed");

        let mut output = String::new();
        let mut context = crate::runtime::SimpleContext::new(&mut output);
        let mut closure = Closure::new();
        let returned = assign("y", num(9))
            .execute(&mut closure, &mut context)
            .expect("assignment failed");
        assert_eq!(returned.as_number(), Some(9));
        assert_eq!(closure.get("y").and_then(|v| v.as_number()), Some(9));
    }

    #[test]
    fn arithmetic_follows_the_node_tree() {
        let program = print(vec![Statement::Add {
            lhs: Box::new(num(1)),
            rhs: Box::new(Statement::Mult {
                lhs: Box::new(num(2)),
                rhs: Box::new(num(3)),
            }),
        }]);
        assert_eq!(run_expecting_output(program), "7\n");
    }

    #[test]
    fn subtraction_division_and_errors() {
        let program = print(vec![Statement::Div {
            lhs: Box::new(Statement::Sub {
                lhs: Box::new(num(10)),
                rhs: Box::new(num(4)),
            }),
            rhs: Box::new(num(2)),
        }]);
        assert_eq!(run_expecting_output(program), "3\n");

        let (result, _) = run(Statement::Div {
            lhs: Box::new(num(1)),
            rhs: Box::new(num(0)),
        });
        assert_eq!(expect_runtime_error(result), RuntimeError::DivisionByZero);

        let (result, _) = run(Statement::Sub {
            lhs: Box::new(num(1)),
            rhs: Box::new(text("x")),
        });
        assert_eq!(
            expect_runtime_error(result),
            RuntimeError::UnsupportedOperation {
                operation: "subtraction",
                lhs: "number".to_string(),
                rhs: "string".to_string(),
            }
        );
    }

    #[test]
    fn add_concatenates_strings() {
        let program = print(vec![Statement::Add {
            lhs: Box::new(text("hi")),
            rhs: Box::new(text(" there")),
        }]);
        assert_eq!(run_expecting_output(program), "hi there\n");
    }

    #[test]
    fn add_dispatches_to_the_dunder() {
        // class Acc:
        //   def __init__(self, v): self.v = v
        //   def __add__(self, other): return self.v + other
        let acc = class(
            "Acc",
            vec![
                method(
                    "__init__",
                    &["v"],
                    Statement::FieldAssignment {
                        object: Box::new(var("self")),
                        field_name: "v".to_string(),
                        value: Box::new(var("v")),
                    },
                ),
                method(
                    "__add__",
                    &["other"],
                    Statement::Return {
                        value: Box::new(Statement::Add {
                            lhs: Box::new(dotted(&["self", "v"])),
                            rhs: Box::new(var("other")),
                        }),
                    },
                ),
            ],
            None,
        );
        let program = print(vec![Statement::Add {
            lhs: Box::new(new_of(&acc, vec![num(40)])),
            rhs: Box::new(num(2)),
        }]);
        assert_eq!(run_expecting_output(program), "42\n");
    }

    #[test]
    fn and_evaluates_both_operands() {
        // A falsy left side must not prevent evaluation of the right side.
        let (result, _) = run(Statement::And {
            lhs: Box::new(boolean(false)),
            rhs: Box::new(var("missing")),
        });
        assert_eq!(
            expect_runtime_error(result),
            RuntimeError::UndefinedVariable {
                name: "missing".to_string(),
            }
        );

        let program = print(vec![Statement::And {
            lhs: Box::new(num(1)),
            rhs: Box::new(text("x")),
        }]);
        assert_eq!(run_expecting_output(program), "True\n");
    }

    #[test]
    fn or_short_circuits_on_a_truthy_left_side() {
        let program = print(vec![Statement::Or {
            lhs: Box::new(num(1)),
            rhs: Box::new(var("missing")),
        }]);
        assert_eq!(run_expecting_output(program), "True\n");

        let program = print(vec![Statement::Or {
            lhs: Box::new(num(0)),
            rhs: Box::new(text("")),
        }]);
        assert_eq!(run_expecting_output(program), "False\n");
    }

    #[test]
    fn not_negates_truthiness() {
        let program = print(vec![
            Statement::Not {
                argument: Box::new(num(0)),
            },
            Statement::Not {
                argument: Box::new(text("x")),
            },
        ]);
        assert_eq!(run_expecting_output(program), "True False\n");
    }

    #[test]
    fn comparison_nodes_produce_booleans() {
        let compare = |op| {
            Statement::Comparison {
                op,
                lhs: Box::new(num(2)),
                rhs: Box::new(num(3)),
            }
        };
        let program = print(vec![
            compare(ComparisonOp::Less),
            compare(ComparisonOp::Eq),
            compare(ComparisonOp::NotEq),
            compare(ComparisonOp::Greater),
            compare(ComparisonOp::LessOrEq),
            compare(ComparisonOp::GreaterOrEq),
        ]);
        assert_eq!(run_expecting_output(program), "True False True False True False\n");
    }

    #[test]
    fn if_else_branches_on_truthiness() {
        let branch = |condition: Statement| Statement::IfElse {
            condition: Box::new(condition),
            if_body: Box::new(print(vec![text("a")])),
            else_body: Some(Box::new(print(vec![text("b")]))),
        };
        assert_eq!(run_expecting_output(branch(num(0))), "b\n");
        assert_eq!(run_expecting_output(branch(num(1))), "a\n");
    }

    #[test]
    fn if_without_else_yields_none_for_a_falsy_condition() {
        let (result, output) = run(Statement::IfElse {
            condition: Box::new(num(0)),
            if_body: Box::new(print(vec![text("a")])),
            else_body: None,
        });
        assert!(result.expect("execution failed").is_empty());
        assert_eq!(output, "");
    }

    #[test]
    fn print_renders_none_for_empty_holders() {
        let program = print(vec![
            Statement::Const(ObjectHolder::none()),
            boolean(true),
            num(0),
        ]);
        assert_eq!(run_expecting_output(program), "None True 0\n");
    }

    #[test]
    fn print_without_arguments_emits_a_bare_newline() {
        assert_eq!(run_expecting_output(print(vec![])), "\n");
    }

    #[test]
    fn stringify_produces_the_printed_form() {
        let program = print(vec![Statement::Add {
            lhs: Box::new(Statement::Stringify {
                argument: Box::new(num(7)),
            }),
            rhs: Box::new(Statement::Stringify {
                argument: Box::new(boolean(true)),
            }),
        }]);
        assert_eq!(run_expecting_output(program), "7True\n");
    }

    #[test]
    fn class_definition_binds_the_name() {
        let cls = class("K", vec![], None);
        let program = compound(vec![
            Statement::ClassDefinition {
                class: Rc::clone(&cls),
            },
            print(vec![var("K")]),
        ]);
        assert_eq!(run_expecting_output(program), "Class K\n");
    }

    #[test]
    fn new_instance_runs_matching_init() {
        let cls = class(
            "P",
            vec![
                method(
                    "__init__",
                    &["v"],
                    Statement::FieldAssignment {
                        object: Box::new(var("self")),
                        field_name: "v".to_string(),
                        value: Box::new(var("v")),
                    },
                ),
                method(
                    "show",
                    &[],
                    print(vec![dotted(&["self", "v"])]),
                ),
            ],
            None,
        );
        let program = compound(vec![
            assign("x", new_of(&cls, vec![num(42)])),
            method_call(var("x"), "show", vec![]),
        ]);
        assert_eq!(run_expecting_output(program), "42\n");
    }

    #[test]
    fn new_instance_without_matching_init_skips_the_arguments() {
        let cls = class("K", vec![], None);
        // The argument would fail if it were evaluated.
        let (result, _) = run(new_of(&cls, vec![var("missing")]));
        assert!(!result.expect("construction failed").is_empty());
    }

    #[test]
    fn methods_resolve_through_the_parent_chain() {
        let base = class(
            "A",
            vec![method(
                "m",
                &[],
                Statement::Return {
                    value: Box::new(num(1)),
                },
            )],
            None,
        );
        let derived = class(
            "B",
            vec![method(
                "n",
                &[],
                Statement::Return {
                    value: Box::new(Statement::Add {
                        lhs: Box::new(method_call(var("self"), "m", vec![])),
                        rhs: Box::new(num(2)),
                    }),
                },
            )],
            Some(&base),
        );
        let program = print(vec![method_call(new_of(&derived, vec![]), "n", vec![])]);
        assert_eq!(run_expecting_output(program), "3\n");
    }

    #[test]
    fn method_call_requires_an_instance_receiver() {
        let (result, _) = run(method_call(num(1), "m", vec![]));
        assert_eq!(
            expect_runtime_error(result),
            RuntimeError::NotAnInstance {
                type_name: "number".to_string(),
            }
        );
    }

    #[test]
    fn return_terminates_only_its_own_method() {
        // inner: an early return nested in if/compound skips the rest of
        // inner, while outer continues after the call.
        let cls = class(
            "T",
            vec![
                method(
                    "inner",
                    &[],
                    compound(vec![
                        Statement::IfElse {
                            condition: Box::new(boolean(true)),
                            if_body: Box::new(compound(vec![Statement::Return {
                                value: Box::new(num(1)),
                            }])),
                            else_body: None,
                        },
                        print(vec![text("unreachable")]),
                    ]),
                ),
                method(
                    "outer",
                    &[],
                    compound(vec![
                        assign("x", method_call(var("self"), "inner", vec![])),
                        print(vec![text("after inner")]),
                        Statement::Return {
                            value: Box::new(var("x")),
                        },
                    ]),
                ),
            ],
            None,
        );
        let program = print(vec![method_call(new_of(&cls, vec![]), "outer", vec![])]);
        assert_eq!(run_expecting_output(program), "after inner\n1\n");
    }

    #[test]
    fn method_body_without_return_yields_none() {
        let cls = class("K", vec![method("quiet", &[], compound(vec![]))], None);
        let program = print(vec![method_call(new_of(&cls, vec![]), "quiet", vec![])]);
        assert_eq!(run_expecting_output(program), "None\n");
    }

    #[test]
    fn dotted_access_walks_instance_fields() {
        let inner = class(
            "Inner",
            vec![method(
                "__init__",
                &["v"],
                Statement::FieldAssignment {
                    object: Box::new(var("self")),
                    field_name: "v".to_string(),
                    value: Box::new(var("v")),
                },
            )],
            None,
        );
        let outer = class(
            "Outer",
            vec![method(
                "__init__",
                &["inner"],
                Statement::FieldAssignment {
                    object: Box::new(var("self")),
                    field_name: "inner".to_string(),
                    value: Box::new(var("inner")),
                },
            )],
            None,
        );
        let program = compound(vec![
            assign("o", new_of(&outer, vec![new_of(&inner, vec![num(5)])])),
            print(vec![dotted(&["o", "inner", "v"])]),
            Statement::FieldAssignment {
                object: Box::new(dotted(&["o", "inner"])),
                field_name: "v".to_string(),
                value: Box::new(num(9)),
            },
            print(vec![dotted(&["o", "inner", "v"])]),
        ]);
        assert_eq!(run_expecting_output(program), "5\n9\n");
    }

    #[test]
    fn dotted_access_through_a_non_instance_fails() {
        let (result, _) = run(compound(vec![
            assign("x", num(1)),
            print(vec![dotted(&["x", "field"])]),
        ]));
        assert_eq!(
            expect_runtime_error(result),
            RuntimeError::NotAnInstance {
                type_name: "number".to_string(),
            }
        );
    }

    #[test]
    fn reading_a_missing_field_fails() {
        let cls = class("K", vec![], None);
        let (result, _) = run(compound(vec![
            assign("k", new_of(&cls, vec![])),
            print(vec![dotted(&["k", "absent"])]),
        ]));
        assert_eq!(
            expect_runtime_error(result),
            RuntimeError::UnknownField {
                field: "absent".to_string(),
                type_name: "K".to_string(),
            }
        );
    }

    #[test]
    fn reading_an_undefined_variable_fails() {
        let (result, _) = run(print(vec![var("missing")]));
        assert_eq!(
            expect_runtime_error(result),
            RuntimeError::UndefinedVariable {
                name: "missing".to_string(),
            }
        );
    }

    #[test]
    fn top_level_return_is_a_runtime_error() {
        let program = Statement::Return {
            value: Box::new(num(1)),
        };
        let mut output = String::new();
        let mut context = crate::runtime::SimpleContext::new(&mut output);
        let error = run_program(&program, &mut context).expect_err("expected an error");
        assert_eq!(error, RuntimeError::ReturnOutsideMethod);
    }
}
