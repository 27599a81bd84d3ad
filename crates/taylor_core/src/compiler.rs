use crate::expr::{BinaryOp, Expr, UnaryOp};
use crate::functions::Function;
use crate::traits::Scalar;
use std::cell::RefCell;

/// OpCodes for the stack-based virtual machine.
/// The VM operates on a stack of `Scalar` values (f64 or Dual).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpCode {
    /// Pushes a constant `f64` value onto the stack.
    LoadConst(f64),
    /// Pushes the value of the bound variable `x`.
    LoadVar,
    /// Pops top two values (b, a), pushes (a + b).
    Add,
    /// Pops top two values (b, a), pushes (a - b).
    Sub,
    /// Pops top two values (b, a), pushes (a * b).
    Mul,
    /// Pops top two values (b, a), pushes (a / b).
    Div,
    /// Pops top two values (b, a), pushes (a ^ b).
    Pow,
    /// Pops top value (a), pushes -a.
    Neg,
    /// Pops `argc` values and pushes the function applied to them, first
    /// argument deepest.
    Call { function: Function, argc: usize },
}

impl OpCode {
    fn binary(op: BinaryOp) -> OpCode {
        match op {
            BinaryOp::Add => OpCode::Add,
            BinaryOp::Sub => OpCode::Sub,
            BinaryOp::Mul => OpCode::Mul,
            BinaryOp::Div => OpCode::Div,
            BinaryOp::Pow => OpCode::Pow,
        }
    }
}

/// Represents a compiled sequence of operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bytecode {
    pub ops: Vec<OpCode>,
}

impl Bytecode {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Largest stack height reached while executing, used to size buffers.
    pub fn max_stack_depth(&self) -> usize {
        let mut depth = 0usize;
        let mut max = 0usize;
        for op in &self.ops {
            match op {
                OpCode::LoadConst(_) | OpCode::LoadVar => depth += 1,
                OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Pow => {
                    depth = depth.saturating_sub(1)
                }
                OpCode::Neg => {}
                OpCode::Call { argc, .. } => depth = depth.saturating_sub(*argc) + 1,
            }
            max = max.max(depth);
        }
        max
    }
}

/// Stack-based virtual machine for evaluating compiled expressions.
///
/// The VM is stateless; `execute` takes all necessary context:
/// - `bytecode`: Instructions to run.
/// - `x`: Value of the bound variable.
/// - `stack`: A mutable buffer for intermediate computations.
///
/// Returns the value left on the stack. Malformed bytecode (which the
/// compiler never emits) yields NaN instead of panicking.
pub struct VM;

impl VM {
    pub fn execute<T: Scalar>(bytecode: &Bytecode, x: T, stack: &mut Vec<T>) -> T {
        stack.clear();
        let pop = |stack: &mut Vec<T>| stack.pop().unwrap_or_else(T::nan);

        for op in &bytecode.ops {
            match op {
                OpCode::LoadConst(val) => stack.push(T::constant(*val)),
                OpCode::LoadVar => stack.push(x),
                OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Pow => {
                    let b = pop(stack);
                    let a = pop(stack);
                    let result = match op {
                        OpCode::Add => a + b,
                        OpCode::Sub => a - b,
                        OpCode::Mul => a * b,
                        OpCode::Div => a / b,
                        _ => a.powf(b),
                    };
                    stack.push(result);
                }
                OpCode::Neg => {
                    let a = pop(stack);
                    stack.push(-a);
                }
                OpCode::Call { function, argc } => {
                    let split = stack.len().saturating_sub(*argc);
                    let result = if stack.len() - split == *argc {
                        function.apply(&stack[split..])
                    } else {
                        T::nan()
                    };
                    stack.truncate(split);
                    stack.push(result);
                }
            }
        }

        pop(stack)
    }
}

/// Compiles an `Expr` into post-order `Bytecode`.
pub struct Compiler;

impl Compiler {
    pub fn compile(expr: &Expr) -> Bytecode {
        let mut ops = Vec::with_capacity(expr.size());
        Self::compile_recursive(expr, &mut ops);
        Bytecode { ops }
    }

    fn compile_recursive(expr: &Expr, ops: &mut Vec<OpCode>) {
        match expr {
            Expr::Number(n) => ops.push(OpCode::LoadConst(*n)),
            Expr::Variable => ops.push(OpCode::LoadVar),
            Expr::Binary(op, left, right) => {
                Self::compile_recursive(left, ops);
                Self::compile_recursive(right, ops);
                ops.push(OpCode::binary(*op));
            }
            Expr::Unary(UnaryOp::Neg, operand) => {
                Self::compile_recursive(operand, ops);
                ops.push(OpCode::Neg);
            }
            Expr::Call(function, args) => {
                for arg in args {
                    Self::compile_recursive(arg, ops);
                }
                ops.push(OpCode::Call {
                    function: *function,
                    argc: args.len(),
                });
            }
        }
    }
}

/// A compiled expression, ready to be evaluated any number of times.
///
/// Keeps its own f64 stack so repeated `evaluate` calls do not allocate.
/// The interior mutability makes the evaluator `!Sync`; it is meant to live
/// for one calculation on one thread.
#[derive(Debug)]
pub struct Evaluator {
    bytecode: Bytecode,
    stack: RefCell<Vec<f64>>,
}

impl Evaluator {
    pub fn new(bytecode: Bytecode) -> Self {
        let capacity = bytecode.max_stack_depth();
        Self {
            bytecode,
            stack: RefCell::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn bytecode(&self) -> &Bytecode {
        &self.bytecode
    }

    /// Evaluates at `x` with IEEE-754 semantics; domain errors come back as
    /// NaN or infinities.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self.stack.try_borrow_mut() {
            Ok(mut stack) => VM::execute(&self.bytecode, x, &mut stack),
            Err(_) => VM::execute(&self.bytecode, x, &mut Vec::new()),
        }
    }

    /// Evaluates over any scalar type, e.g. dual numbers.
    pub fn evaluate_with<T: Scalar>(&self, x: T) -> T {
        let mut stack = Vec::with_capacity(self.bytecode.max_stack_depth());
        VM::execute(&self.bytecode, x, &mut stack)
    }
}

pub fn compile(expr: &Expr) -> Evaluator {
    Evaluator::new(Compiler::compile(expr))
}

/// Whether `value` can be reported as a result: neither NaN nor infinite.
pub fn is_usable_point(value: f64) -> bool {
    value.is_finite()
}
