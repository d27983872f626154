//! Stack bytecode and the virtual machine that executes it.

use super::parser::{BinOp, Func, Node};
use super::scalar::Scalar;
use crate::types::{DomainError, ParseError};

/// Capacity of the VM value stack.
pub(crate) const STACK_CAPACITY: usize = 128;

/// Deepest stack a compiled program may need; the gap to [`STACK_CAPACITY`]
/// leaves room for wrapping a program (see `Program::fixed_point_map`).
pub(crate) const MAX_PROGRAM_DEPTH: usize = STACK_CAPACITY - 8;

/// VM instructions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum OpCode {
    /// Push a constant.
    Const(f64),
    /// Push the free variable `x`.
    Var,
    /// Pop b, a; push a + b.
    Add,
    /// Pop b, a; push a - b.
    Sub,
    /// Pop b, a; push a * b.
    Mul,
    /// Pop b, a; push a / b.
    Div,
    /// Pop b, a; push a ^ b.
    Pow,
    /// Pop a; push a ^ n for a constant n.
    PowConst(f64),
    /// Pop a; push -a.
    Neg,
    /// Pop a; push f(a).
    Call(Func),
}

impl OpCode {
    /// Net change in stack height.
    fn stack_effect(&self) -> isize {
        match self {
            OpCode::Const(_) | OpCode::Var => 1,
            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Pow => -1,
            OpCode::PowConst(_) | OpCode::Neg | OpCode::Call(_) => 0,
        }
    }
}

/// A compiled, immutable instruction sequence.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Program {
    ops: Vec<OpCode>,
    depth: usize,
}

impl Program {
    /// Compile an AST, folding constant sub-trees first.
    pub fn compile(node: &Node) -> Result<Self, ParseError> {
        let folded = fold(node);
        let mut ops = Vec::new();
        emit(&folded, &mut ops);
        let depth = max_depth(&ops);
        if depth > MAX_PROGRAM_DEPTH {
            return Err(ParseError::new(format!(
                "expression nested too deeply (needs stack depth {}, limit {})",
                depth, MAX_PROGRAM_DEPTH
            )));
        }
        Ok(Self { ops, depth })
    }

    /// Program for `x - alpha * (self)`.
    pub fn fixed_point_map(&self, alpha: f64) -> Self {
        let mut ops = Vec::with_capacity(self.ops.len() + 4);
        ops.push(OpCode::Var);
        ops.push(OpCode::Const(alpha));
        ops.extend_from_slice(&self.ops);
        ops.push(OpCode::Mul);
        ops.push(OpCode::Sub);
        Self {
            ops,
            depth: self.depth + 2,
        }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Execute the program at `x`.
    ///
    /// Never allocates: the value stack lives in a fixed-size array.
    pub fn execute<T: Scalar>(&self, x: T) -> Result<T, DomainError> {
        let at = x.value();
        if !x.is_finite() {
            return Err(DomainError::NonFinite { x: at });
        }

        let mut stack = [T::zero(); STACK_CAPACITY];
        let mut sp = 0usize;

        for op in &self.ops {
            let result = match *op {
                OpCode::Const(c) => {
                    stack[sp] = T::constant(c);
                    sp += 1;
                    continue;
                }
                OpCode::Var => {
                    stack[sp] = x;
                    sp += 1;
                    continue;
                }
                OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Pow => {
                    sp -= 1;
                    let b = stack[sp];
                    let a = stack[sp - 1];
                    match *op {
                        OpCode::Add => a + b,
                        OpCode::Sub => a - b,
                        OpCode::Mul => a * b,
                        OpCode::Div => {
                            if b.value() == 0.0 {
                                return Err(DomainError::DivisionByZero { x: at });
                            }
                            a / b
                        }
                        _ => a.powd(b),
                    }
                }
                OpCode::PowConst(n) => stack[sp - 1].powf(n),
                OpCode::Neg => -stack[sp - 1],
                OpCode::Call(func) => apply(func, stack[sp - 1], at)?,
            };

            if !result.is_finite() {
                return Err(DomainError::NonFinite { x: at });
            }
            stack[sp - 1] = result;
        }

        Ok(stack[0])
    }
}

fn apply<T: Scalar>(func: Func, a: T, at: f64) -> Result<T, DomainError> {
    Ok(match func {
        Func::Sin => a.sin(),
        Func::Cos => a.cos(),
        Func::Tan => a.tan(),
        Func::Exp => a.exp(),
        Func::Log => {
            if a.value() <= 0.0 {
                return Err(DomainError::LogNonPositive { x: at, arg: a.value() });
            }
            a.ln()
        }
        Func::Sqrt => {
            if a.value() < 0.0 {
                return Err(DomainError::SqrtNegative { x: at, arg: a.value() });
            }
            a.sqrt()
        }
        Func::Abs => a.abs(),
    })
}

/// Replace every constant sub-tree that evaluates cleanly with its value.
fn fold(node: &Node) -> Node {
    match node {
        Node::Number(_) | Node::Var => node.clone(),
        Node::Neg(inner) => {
            let inner = fold(inner);
            if let Node::Number(v) = inner {
                Node::Number(-v)
            } else {
                Node::Neg(Box::new(inner))
            }
        }
        Node::Binary(op, left, right) => {
            let left = fold(left);
            let right = fold(right);
            if let (Node::Number(_), Node::Number(_)) = (&left, &right) {
                let candidate = Node::Binary(*op, Box::new(left.clone()), Box::new(right.clone()));
                if let Some(v) = evaluate_constant(&candidate) {
                    return Node::Number(v);
                }
            }
            Node::Binary(*op, Box::new(left), Box::new(right))
        }
        Node::Call(func, arg) => {
            let arg = fold(arg);
            if let Node::Number(_) = arg {
                let candidate = Node::Call(*func, Box::new(arg.clone()));
                if let Some(v) = evaluate_constant(&candidate) {
                    return Node::Number(v);
                }
            }
            Node::Call(*func, Box::new(arg))
        }
    }
}

/// Evaluate a variable-free node; `None` if it is undefined.
fn evaluate_constant(node: &Node) -> Option<f64> {
    let mut ops = Vec::new();
    emit(node, &mut ops);
    let depth = max_depth(&ops);
    Program { ops, depth }.execute(0.0_f64).ok()
}

fn emit(node: &Node, ops: &mut Vec<OpCode>) {
    match node {
        Node::Number(v) => ops.push(OpCode::Const(*v)),
        Node::Var => ops.push(OpCode::Var),
        Node::Neg(inner) => {
            emit(inner, ops);
            ops.push(OpCode::Neg);
        }
        Node::Binary(BinOp::Pow, base, exponent) => {
            emit(base, ops);
            if let Node::Number(n) = exponent.as_ref() {
                ops.push(OpCode::PowConst(*n));
            } else {
                emit(exponent, ops);
                ops.push(OpCode::Pow);
            }
        }
        Node::Binary(op, left, right) => {
            emit(left, ops);
            emit(right, ops);
            ops.push(match op {
                BinOp::Add => OpCode::Add,
                BinOp::Sub => OpCode::Sub,
                BinOp::Mul => OpCode::Mul,
                BinOp::Div => OpCode::Div,
                BinOp::Pow => OpCode::Pow,
            });
        }
        Node::Call(func, arg) => {
            emit(arg, ops);
            ops.push(OpCode::Call(*func));
        }
    }
}

fn max_depth(ops: &[OpCode]) -> usize {
    let mut height: isize = 0;
    let mut peak: isize = 0;
    for op in ops {
        height += op.stack_effect();
        peak = peak.max(height);
    }
    peak as usize
}

#[cfg(test)]
mod tests {
    use super::super::parser::parse;
    use super::*;
    use approx::assert_relative_eq;
    use num_dual::Dual64;

    fn program(text: &str) -> Program {
        Program::compile(&parse(text).unwrap()).unwrap()
    }

    #[test]
    fn test_constant_folding() {
        let p = program("2 * pi + x");
        assert_eq!(
            p.ops,
            vec![
                OpCode::Const(2.0 * std::f64::consts::PI),
                OpCode::Var,
                OpCode::Add
            ]
        );
    }

    #[test]
    fn test_undefined_constant_left_unfolded() {
        let p = program("log(-1) + x");
        assert!(p.ops.contains(&OpCode::Call(Func::Log)));
        assert!(matches!(
            p.execute(1.0_f64),
            Err(DomainError::LogNonPositive { .. })
        ));
    }

    #[test]
    fn test_constant_exponent_uses_pow_const() {
        let p = program("x^-2");
        assert_eq!(p.ops, vec![OpCode::Var, OpCode::PowConst(-2.0)]);
        assert_relative_eq!(p.execute(-2.0_f64).unwrap(), 0.25);
    }

    #[test]
    fn test_stack_depth_tracking() {
        assert_eq!(program("x").depth(), 1);
        assert_eq!(program("x + x").depth(), 2);
        assert_eq!(program("x * (x + (x - x))").depth(), 4);
    }

    #[test]
    fn test_execute_f64() {
        let p = program("x*x - 2");
        assert_relative_eq!(p.execute(3.0_f64).unwrap(), 7.0);
    }

    #[test]
    fn test_execute_dual_gives_derivative() {
        let p = program("x^3 + sin(x)");
        let y = p.execute(Dual64::new(2.0, 1.0)).unwrap();
        assert_relative_eq!(y.re, 8.0 + 2.0_f64.sin(), epsilon = 1e-12);
        assert_relative_eq!(y.eps, 12.0 + 2.0_f64.cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_division_by_zero() {
        let p = program("1 / (x - 1)");
        assert_eq!(
            p.execute(1.0_f64),
            Err(DomainError::DivisionByZero { x: 1.0 })
        );
    }

    #[test]
    fn test_sqrt_negative() {
        let p = program("sqrt(x)");
        assert!(matches!(
            p.execute(-4.0_f64),
            Err(DomainError::SqrtNegative { .. })
        ));
        assert_relative_eq!(p.execute(4.0_f64).unwrap(), 2.0);
    }

    #[test]
    fn test_overflow_is_non_finite() {
        let p = program("exp(x)");
        assert_eq!(
            p.execute(1000.0_f64),
            Err(DomainError::NonFinite { x: 1000.0 })
        );
    }

    #[test]
    fn test_nan_power_is_domain_error() {
        let p = program("x^x");
        assert!(matches!(
            p.execute(-0.5_f64),
            Err(DomainError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_fixed_point_map_program() {
        let f = program("x*x - 2");
        let g = f.fixed_point_map(0.5);
        assert_eq!(g.depth(), f.depth() + 2);
        // g(x) = x - 0.5 (x^2 - 2) at x = 1 is 1.5
        assert_relative_eq!(g.execute(1.0_f64).unwrap(), 1.5);
    }

    #[test]
    fn test_depth_limit() {
        let mut text = String::from("x");
        for _ in 0..MAX_PROGRAM_DEPTH {
            text = format!("x + ({})", text);
        }
        let node = parse(&text).unwrap();
        let err = Program::compile(&node).unwrap_err();
        assert!(err.message.contains("nested too deeply"));
    }
}
