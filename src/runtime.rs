//! Runtime object model: values and holders, classes with inheritance,
//! truthiness, rendering, the comparison family, and method invocation.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

pub mod error;

pub use error::RuntimeError;

const STR_METHOD: &str = "__str__";
const EQ_METHOD: &str = "__eq__";
const LT_METHOD: &str = "__lt__";

/// Name-to-holder environment of one activation.
pub type Closure = BTreeMap<String, ObjectHolder>;

/// Collaborator the interpreter writes program output through.
pub trait Context {
    fn output_stream(&mut self) -> &mut dyn fmt::Write;
}

/// Context over any `fmt::Write` sink; the driver and the tests use it with
/// a `String` buffer.
pub struct SimpleContext<'a> {
    output: &'a mut dyn fmt::Write,
}

impl<'a> SimpleContext<'a> {
    pub fn new(output: &'a mut dyn fmt::Write) -> Self {
        Self { output }
    }
}

impl Context for SimpleContext<'_> {
    fn output_stream(&mut self) -> &mut dyn fmt::Write {
        self.output
    }
}

/// Non-local outcome of executing a node: the `return` signal unwinding to
/// the nearest method boundary, or a fatal runtime error. Only `MethodBody`
/// consumes the signal; errors propagate to the embedding caller.
#[derive(Debug)]
pub enum Unwind {
    Return(ObjectHolder),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

impl From<fmt::Error> for Unwind {
    fn from(error: fmt::Error) -> Self {
        Unwind::Error(RuntimeError::Output(error))
    }
}

pub type ExecResult = Result<ObjectHolder, Unwind>;

/// Executable node of the statement tree.
pub trait Executable {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult;
}

/// A method declared on a class. Formal parameters exclude the implicit
/// `self`.
pub struct Method {
    pub name: String,
    pub formal_params: Vec<String>,
    pub body: Rc<dyn Executable>,
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("formal_params", &self.formal_params)
            .finish_non_exhaustive()
    }
}

/// A class: immutable after definition, program-scoped, with an optional
/// parent forming an acyclic single-inheritance chain.
#[derive(Debug)]
pub struct Class {
    name: String,
    methods: Vec<Method>,
    parent: Option<Rc<Class>>,
}

impl Class {
    pub fn new(name: String, methods: Vec<Method>, parent: Option<Rc<Class>>) -> Self {
        Self {
            name,
            methods,
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First method with this name along the inheritance chain, any arity.
    pub fn method(&self, name: &str) -> Option<&Method> {
        if let Some(method) = self.methods.iter().find(|m| m.name == name) {
            return Some(method);
        }
        self.parent.as_deref().and_then(|parent| parent.method(name))
    }
}

#[derive(Debug)]
pub struct ClassInstance {
    class: Rc<Class>,
    fields: Closure,
}

impl ClassInstance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: Closure::new(),
        }
    }

    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    pub fn fields(&self) -> &Closure {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Closure {
        &mut self.fields
    }
}

#[derive(Debug)]
pub enum Object {
    Number(i64),
    String(String),
    Bool(bool),
    Class(Rc<Class>),
    Instance(ClassInstance),
}

impl Object {
    pub fn type_name(&self) -> String {
        match self {
            Object::Number(_) => "number".to_string(),
            Object::String(_) => "string".to_string(),
            Object::Bool(_) => "bool".to_string(),
            Object::Class(_) => "class".to_string(),
            Object::Instance(instance) => instance.class().name().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
enum Handle {
    Owned(Rc<RefCell<Object>>),
    /// Non-owning alias used to expose `self` during a method call. The call
    /// site keeps an owning holder alive for the duration of the call.
    Shared(Weak<RefCell<Object>>),
}

/// Shared, optionally-empty handle to a runtime object. The empty holder is
/// the runtime's `None`.
#[derive(Debug, Clone)]
pub struct ObjectHolder {
    data: Option<Handle>,
}

impl ObjectHolder {
    pub fn none() -> Self {
        Self { data: None }
    }

    pub fn own(object: Object) -> Self {
        Self {
            data: Some(Handle::Owned(Rc::new(RefCell::new(object)))),
        }
    }

    pub fn number(value: i64) -> Self {
        Self::own(Object::Number(value))
    }

    pub fn string(text: String) -> Self {
        Self::own(Object::String(text))
    }

    pub fn bool(value: bool) -> Self {
        Self::own(Object::Bool(value))
    }

    /// Non-owning alias of the same object.
    pub fn share(&self) -> Self {
        let data = match &self.data {
            None => None,
            Some(Handle::Owned(rc)) => Some(Handle::Shared(Rc::downgrade(rc))),
            Some(Handle::Shared(weak)) => Some(Handle::Shared(weak.clone())),
        };
        Self { data }
    }

    pub fn get(&self) -> Option<Rc<RefCell<Object>>> {
        match &self.data {
            None => None,
            Some(Handle::Owned(rc)) => Some(Rc::clone(rc)),
            Some(Handle::Shared(weak)) => weak.upgrade(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    pub fn type_name(&self) -> String {
        match self.get() {
            None => "NoneType".to_string(),
            Some(rc) => rc.borrow().type_name(),
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match &*self.get()?.borrow() {
            Object::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match &*self.get()?.borrow() {
            Object::String(text) => Some(text.clone()),
            _ => None,
        }
    }

    /// True iff the holder is a class instance whose class chain declares
    /// `method` with exactly `argument_count` formal parameters.
    pub fn has_method(&self, method: &str, argument_count: usize) -> bool {
        let Some(rc) = self.get() else {
            return false;
        };
        match &*rc.borrow() {
            Object::Instance(instance) => instance
                .class()
                .method(method)
                .is_some_and(|m| m.formal_params.len() == argument_count),
            _ => false,
        }
    }

    /// Invokes `method` on a class instance: resolves by name and exact
    /// arity, builds a fresh closure binding `self` as a non-owning share
    /// plus the formal parameters, and executes the body.
    pub fn call_method(
        &self,
        method: &str,
        args: &[ObjectHolder],
        context: &mut dyn Context,
    ) -> ExecResult {
        let Some(rc) = self.get() else {
            return Err(RuntimeError::NotAnInstance {
                type_name: self.type_name(),
            }
            .into());
        };
        let class = match &*rc.borrow() {
            Object::Instance(instance) => Rc::clone(instance.class()),
            other => {
                return Err(RuntimeError::NotAnInstance {
                    type_name: other.type_name(),
                }
                .into());
            }
        };
        let resolved = class
            .method(method)
            .filter(|m| m.formal_params.len() == args.len())
            .ok_or_else(|| RuntimeError::UnknownMethod {
                method: method.to_string(),
                arity: args.len(),
                type_name: class.name().to_string(),
            })?;

        let mut closure = Closure::new();
        closure.insert("self".to_string(), self.share());
        for (param, arg) in resolved.formal_params.iter().zip(args) {
            closure.insert(param.clone(), arg.clone());
        }
        resolved.body.execute(&mut closure, context)
    }
}

/// Truthiness: a non-zero number, a non-empty string, or `True`. Classes
/// and instances are unconditionally falsy in this dialect.
pub fn is_true(object: &ObjectHolder) -> bool {
    let Some(rc) = object.get() else {
        return false;
    };
    match &*rc.borrow() {
        Object::Number(value) => *value != 0,
        Object::String(text) => !text.is_empty(),
        Object::Bool(value) => *value,
        Object::Class(_) | Object::Instance(_) => false,
    }
}

/// Canonical printed form of a holder. Class instances dispatch to
/// `__str__` when their class declares it, and fall back to an identity
/// token otherwise.
pub fn to_output(object: &ObjectHolder, context: &mut dyn Context) -> Result<String, Unwind> {
    let Some(rc) = object.get() else {
        return Ok("None".to_string());
    };
    let fallback = {
        match &*rc.borrow() {
            Object::Number(value) => return Ok(value.to_string()),
            Object::String(text) => return Ok(text.clone()),
            Object::Bool(true) => return Ok("True".to_string()),
            Object::Bool(false) => return Ok("False".to_string()),
            Object::Class(class) => return Ok(format!("Class {}", class.name())),
            Object::Instance(_) => format!("{:p}", Rc::as_ptr(&rc)),
        }
    };
    if object.has_method(STR_METHOD, 0) {
        let rendered = object.call_method(STR_METHOD, &[], context)?;
        to_output(&rendered, context)
    } else {
        Ok(fallback)
    }
}

/// Equality per the dialect: both-empty holders are equal, same scalar
/// types compare by value, instances go through `__eq__/1` on the left
/// operand, and mixed types are never equal.
pub fn equal(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut dyn Context,
) -> Result<bool, Unwind> {
    let (Some(left), Some(right)) = (lhs.get(), rhs.get()) else {
        return Ok(lhs.is_empty() && rhs.is_empty());
    };
    let both_instances = {
        let (left, right) = (left.borrow(), right.borrow());
        match (&*left, &*right) {
            (Object::Number(a), Object::Number(b)) => return Ok(a == b),
            (Object::String(a), Object::String(b)) => return Ok(a == b),
            (Object::Bool(a), Object::Bool(b)) => return Ok(a == b),
            (Object::Instance(_), Object::Instance(_)) => true,
            _ => false,
        }
    };
    if both_instances && lhs.has_method(EQ_METHOD, 1) {
        let verdict = lhs.call_method(EQ_METHOD, &[rhs.clone()], context)?;
        return Ok(is_true(&verdict));
    }
    Ok(false)
}

/// Ordering per the dialect: same scalar types by value (strings
/// lexicographically), instances through `__lt__/1` on the left operand.
/// Anything else cannot be ordered.
pub fn less(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut dyn Context,
) -> Result<bool, Unwind> {
    let not_comparable = || RuntimeError::NotComparable {
        lhs: lhs.type_name(),
        rhs: rhs.type_name(),
    };
    let (Some(left), Some(right)) = (lhs.get(), rhs.get()) else {
        return Err(not_comparable().into());
    };
    let both_instances = {
        let (left, right) = (left.borrow(), right.borrow());
        match (&*left, &*right) {
            (Object::Number(a), Object::Number(b)) => return Ok(a < b),
            (Object::String(a), Object::String(b)) => return Ok(a < b),
            (Object::Bool(a), Object::Bool(b)) => return Ok(a < b),
            (Object::Instance(_), Object::Instance(_)) => true,
            _ => false,
        }
    };
    if both_instances && lhs.has_method(LT_METHOD, 1) {
        let verdict = lhs.call_method(LT_METHOD, &[rhs.clone()], context)?;
        return Ok(is_true(&verdict));
    }
    Err(not_comparable().into())
}

pub fn not_equal(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut dyn Context,
) -> Result<bool, Unwind> {
    Ok(!equal(lhs, rhs, context)?)
}

pub fn greater(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut dyn Context,
) -> Result<bool, Unwind> {
    Ok(!(less(lhs, rhs, context)? || equal(lhs, rhs, context)?))
}

pub fn less_or_equal(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut dyn Context,
) -> Result<bool, Unwind> {
    Ok(less(lhs, rhs, context)? || equal(lhs, rhs, context)?)
}

pub fn greater_or_equal(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut dyn Context,
) -> Result<bool, Unwind> {
    Ok(!less(lhs, rhs, context)?)
}
