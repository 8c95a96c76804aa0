//=============================================
// objgscript/interpreter/mod.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Tree-walking evaluator for ObjgScript
// Objective: Evaluate AST nodes against lexical scopes, dispatching calls to
//            closures or registered native functions
//=============================================

//=============================================
//            Section 1: Modules & Imports
//=============================================

mod builtins;
pub mod environment;
pub mod errors;
pub mod value;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::ast::{Node, Program};
use crate::codec;
use crate::config::InterpreterConfig;
use crate::native_registry;
use crate::parser::Parser;
use crate::stack::ensure_sufficient_stack;
use crate::COMPILED_EXTENSION;

pub use environment::Scope;
pub use errors::{ErrorCode, RuntimeError, ScriptError};
pub use value::{Closure, NativeFn, NativeFunction, Value};

pub(crate) use builtins::install as install_builtins;

//=============================================
//            Section 2: Interpreter State
//=============================================

/// Owns the root scope and the state shared by every evaluation: configuration,
/// current call depth and the sink `print` writes to.
pub struct Interpreter {
    root: Scope,
    config: InterpreterConfig,
    depth: usize,
    output: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Self::with_output(config, Box::new(io::stdout()))
    }

    //Function: with_output
    //Purpose: Build an interpreter whose root scope holds every registered native
    //         plus the `true`/`false`/`None` constants
    //Inputs: config: InterpreterConfig, output: Box<dyn Write>
    //Returns: Self
    pub fn with_output(config: InterpreterConfig, output: Box<dyn Write>) -> Self {
        let root = Scope::new();
        for native in native_registry::snapshot() {
            let name = native.name.clone();
            root.define(&name, Value::Native(native));
        }
        root.define("true", Value::Number(1.0));
        root.define("false", Value::Number(0.0));
        root.define("None", Value::None);
        Self {
            root,
            config,
            depth: 0,
            output,
        }
    }

    pub fn root(&self) -> Scope {
        self.root.clone()
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Sink used by `print`; native modules may write to it as well.
    pub fn output(&mut self) -> &mut dyn Write {
        self.output.as_mut()
    }

    /// Register a native process-wide and bind it in this interpreter's root scope.
    pub fn register_native(&mut self, name: &str, arity: usize, func: NativeFn) {
        native_registry::register_native(name, arity, func);
        self.root
            .define(name, Value::Native(NativeFunction::new(name, arity, func)));
    }

    //=============================================
    //            Section 3: Driver Entry Points
    //=============================================

    /// Lex, parse and evaluate `source` statement by statement in `scope`.
    /// Statements before a syntax error have already run when it is reported.
    pub fn run_source(&mut self, source: &str, scope: &Scope) -> Result<Value, ScriptError> {
        let mut last = Value::None;
        for statement in Parser::from_source(source) {
            last = self.eval(&statement?, scope)?;
        }
        Ok(last)
    }

    /// Decode a compiled artifact and evaluate it in `scope`.
    pub fn run_compiled(&mut self, bytes: &[u8], scope: &Scope) -> Result<Value, ScriptError> {
        let program = codec::deserialize(bytes)?;
        debug!(statements = program.statements.len(), "decoded compiled program");
        Ok(self.run_program(&program, scope)?)
    }

    pub fn run_program(&mut self, program: &Program, scope: &Scope) -> Result<Value, RuntimeError> {
        self.eval_block(&program.statements, scope)
    }

    /// Run a source or compiled file, chosen by its extension.
    pub fn run_file(&mut self, path: &Path, scope: &Scope) -> Result<Value, ScriptError> {
        let artifact = Artifact::read(path).map_err(|err| RuntimeError::Import {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        self.run_artifact(&artifact, scope)
    }

    fn run_artifact(&mut self, artifact: &Artifact, scope: &Scope) -> Result<Value, ScriptError> {
        match artifact {
            Artifact::Source(text) => self.run_source(text, scope),
            Artifact::Compiled(bytes) => self.run_compiled(bytes, scope),
        }
    }

    /// Evaluate the file named by `path` in the caller's scope so its top-level
    /// bindings become visible there.
    pub fn import(&mut self, path: &str, scope: &Scope) -> Result<Value, RuntimeError> {
        let resolved = self.resolve_import(path).ok_or_else(|| RuntimeError::Import {
            path: path.to_string(),
            message: "file not found".to_string(),
        })?;
        debug!(path = %resolved.display(), "importing");
        let artifact = Artifact::read(&resolved).map_err(|err| RuntimeError::Import {
            path: path.to_string(),
            message: err.to_string(),
        })?;
        self.run_artifact(&artifact, scope)
            .map_err(|error| RuntimeError::InImport {
                path: path.to_string(),
                error: Box::new(error),
            })
    }

    fn resolve_import(&self, path: &str) -> Option<PathBuf> {
        let literal = PathBuf::from(path);
        if literal.is_file() {
            return Some(literal);
        }
        if literal.is_absolute() {
            return None;
        }
        self.config
            .search_paths
            .iter()
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.is_file())
    }

    //=============================================
    //            Section 4: Evaluation
    //=============================================

    /// Evaluate one node. Nested operands and calls recurse through here, so the
    /// native stack is grown on demand before each step.
    pub fn eval(&mut self, node: &Node, scope: &Scope) -> Result<Value, RuntimeError> {
        ensure_sufficient_stack(|| self.eval_node(node, scope))
    }

    fn eval_node(&mut self, node: &Node, scope: &Scope) -> Result<Value, RuntimeError> {
        match node {
            Node::Number(text) => parse_number(text),
            Node::String(text) => Ok(Value::String(text.clone())),
            Node::None => Ok(Value::None),
            Node::Symbol(name) => scope.get(name),
            Node::Operation { op, left, right } => {
                let left = self.eval(left, scope)?;
                let right = self.eval(right, scope)?;
                apply_operator(*op, &left, &right)
            }
            Node::Assignment { target, value } => {
                let value = self.eval(value, scope)?;
                scope.set(target, value.clone());
                Ok(value)
            }
            Node::Function { params, body } => Ok(Value::Function(Rc::new(Closure {
                params: Rc::clone(params),
                body: Rc::clone(body),
                env: scope.clone(),
            }))),
            Node::Call { callee, args } => {
                let callee = self.eval(callee, scope)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call_value(&callee, args, scope)
            }
        }
    }

    fn eval_block(&mut self, statements: &[Node], scope: &Scope) -> Result<Value, RuntimeError> {
        let mut last = Value::None;
        for statement in statements {
            last = self.eval(statement, scope)?;
        }
        Ok(last)
    }

    //=============================================
    //            Section 5: Calls
    //=============================================

    //Function: call_value
    //Purpose: Invoke a closure or native with already-evaluated arguments
    //Inputs: callee: &Value, args: Vec<Value>, scope: call-site scope
    //Returns: Result<Value, RuntimeError>
    pub fn call_value(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        scope: &Scope,
    ) -> Result<Value, RuntimeError> {
        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::StackOverflow {
                limit: self.config.max_call_depth,
            });
        }
        self.depth += 1;
        let result = self.dispatch(callee, args, scope);
        self.depth -= 1;
        result
    }

    fn dispatch(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        scope: &Scope,
    ) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(closure) => {
                check_arity(callee, closure.params.len(), args.len())?;
                trace!(arity = args.len(), depth = self.depth, "calling function");
                let frame = closure.env.child();
                for (name, value) in closure.params.iter().zip(args) {
                    frame.define(name, value);
                }
                self.eval_block(&closure.body, &frame)
            }
            Value::Native(native) => {
                check_arity(callee, native.arity, args.len())?;
                trace!(name = %native.name, depth = self.depth, "calling native");
                (native.func)(self, scope, &args)
            }
            other => Err(RuntimeError::NotCallable(other.type_name())),
        }
    }

    /// Call a function value with no arguments; any other value is returned as is.
    pub fn force(&mut self, value: &Value, scope: &Scope) -> Result<Value, RuntimeError> {
        match value {
            Value::Function(_) => self.call_value(value, Vec::new(), scope),
            other => Ok(other.clone()),
        }
    }
}

//=============================================
//            Section 6: Helpers
//=============================================

enum Artifact {
    Source(String),
    Compiled(Vec<u8>),
}

impl Artifact {
    fn read(path: &Path) -> io::Result<Self> {
        let compiled = path
            .extension()
            .is_some_and(|ext| ext == COMPILED_EXTENSION);
        if compiled {
            Ok(Artifact::Compiled(fs::read(path)?))
        } else {
            Ok(Artifact::Source(fs::read_to_string(path)?))
        }
    }
}

fn parse_number(text: &str) -> Result<Value, RuntimeError> {
    text.parse::<f64>()
        .map(Value::Number)
        .map_err(|_| RuntimeError::InvalidNumber(text.to_string()))
}

fn apply_operator(op: char, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
        return Err(RuntimeError::TypeError(format!(
            "operator '{op}' expects numbers, found {} and {}",
            left.type_name(),
            right.type_name()
        )));
    };
    let result = match op {
        '+' => a + b,
        '-' => a - b,
        '*' => a * b,
        '/' => a / b,
        other => return Err(RuntimeError::UnknownOperator(other)),
    };
    Ok(Value::Number(result))
}

fn check_arity(callee: &Value, expected: usize, found: usize) -> Result<(), RuntimeError> {
    if expected != found {
        return Err(RuntimeError::ArgumentCount {
            callee: callee.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

//=============================================
//            Section 7: Tests
//=============================================
