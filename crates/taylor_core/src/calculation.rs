//! End-to-end pipeline: parse, differentiate twice, compile three
//! evaluators, evaluate at the anchor, sample, format.

use crate::approximation::ApproximationCoefficients;
use crate::compiler::{compile, is_usable_point, Evaluator};
use crate::differentiate::differentiate;
use crate::error::{EngineError, Order, Result};
use crate::expr::Expr;
use crate::interpret::Behavior;
use crate::parser::parse_expression;
use crate::sampler::{sample, Samples};
use crate::settings::CalculationSettings;
use log::{debug, trace};
use serde::Serialize;

/// Largest derivative tree, in nodes, that gets compiled. Products grow
/// quadratically under each differentiation, so the first derivative is
/// checked before the second is built.
pub const MAX_DERIVATIVE_NODES: usize = 4_096;

fn check_size(tree: &Expr, at: Order) -> Result<()> {
    let size = tree.size();
    if size > MAX_DERIVATIVE_NODES {
        debug!("{at}(x) has {size} nodes");
        return Err(EngineError::TooComplex {
            at,
            size,
            limit: MAX_DERIVATIVE_NODES,
        });
    }
    Ok(())
}

/// A parsed expression with its first two derivatives, each compiled once.
/// Cheap to evaluate repeatedly, e.g. while an anchor slider moves.
#[derive(Debug)]
pub struct PreparedExpression {
    pub function: Expr,
    pub first: Expr,
    pub second: Expr,
    function_eval: Evaluator,
    first_eval: Evaluator,
    second_eval: Evaluator,
}

impl PreparedExpression {
    pub fn parse(source: &str) -> Result<Self> {
        let function = parse_expression(source)?;
        debug!("parsed '{}' into {} nodes", source, function.size());
        Self::from_expr(function)
    }

    pub fn from_expr(function: Expr) -> Result<Self> {
        let first = differentiate(&function);
        check_size(&first, Order::First)?;
        let second = differentiate(&first);
        check_size(&second, Order::Second)?;
        trace!("f'(x) = {first}");
        trace!("f''(x) = {second}");

        Ok(Self {
            function_eval: compile(&function),
            first_eval: compile(&first),
            second_eval: compile(&second),
            function,
            first,
            second,
        })
    }

    pub fn evaluator(&self, order: Order) -> &Evaluator {
        match order {
            Order::Value => &self.function_eval,
            Order::First => &self.first_eval,
            Order::Second => &self.second_eval,
        }
    }

    /// Raw IEEE value of f, f' or f'' at `x`; no finiteness check.
    pub fn evaluate(&self, order: Order, x: f64) -> f64 {
        self.evaluator(order).evaluate(x)
    }

    /// f, f' and f'' at `x0`, failing if `x0` or any of the three values is
    /// not finite.
    pub fn coefficients_at(&self, x0: f64) -> Result<ApproximationCoefficients> {
        if !x0.is_finite() {
            return Err(EngineError::InvalidAnchor { x0 });
        }

        let mut values = [0.0; 3];
        for (slot, order) in values
            .iter_mut()
            .zip([Order::Value, Order::First, Order::Second])
        {
            let value = self.evaluate(order, x0);
            if !is_usable_point(value) {
                debug!("{order}({x0}) evaluated to {value}");
                return Err(EngineError::NonFiniteResult { at: order, x0 });
            }
            *slot = value;
        }

        let [f0, f1, f2] = values;
        Ok(ApproximationCoefficients::new(f0, f1, f2, x0))
    }
}

/// Everything a front end needs to display one calculation.
#[derive(Debug, Clone, Serialize)]
pub struct Calculation {
    /// The parsed expression, re-rendered.
    pub expression: String,
    pub first_derivative: String,
    pub second_derivative: String,
    pub coefficients: ApproximationCoefficients,
    pub linear_formula: String,
    pub quadratic_formula: String,
    pub behavior: Behavior,
    pub samples: Samples,
}

/// Runs the full pipeline with default settings.
pub fn calculate(source: &str, x0: f64) -> Result<Calculation> {
    calculate_with(source, x0, &CalculationSettings::default())
}

/// Runs the full pipeline. Any error aborts the whole calculation; there
/// are no partial results.
pub fn calculate_with(
    source: &str,
    x0: f64,
    settings: &CalculationSettings,
) -> Result<Calculation> {
    settings.validate()?;
    if !x0.is_finite() {
        return Err(EngineError::InvalidAnchor { x0 });
    }

    let prepared = PreparedExpression::parse(source)?;
    let coefficients = prepared.coefficients_at(x0)?;
    debug!(
        "x0 = {}: f = {}, f' = {}, f'' = {}",
        x0, coefficients.f0, coefficients.f1, coefficients.f2
    );

    let samples = sample(
        prepared.evaluator(Order::Value),
        &coefficients,
        &settings.sampler,
    );
    let gaps = samples.original.gap_count();
    if gaps > 0 {
        debug!("{gaps} of {} samples are undefined", samples.original.len());
    }

    Ok(Calculation {
        expression: prepared.function.to_string(),
        first_derivative: prepared.first.to_string(),
        second_derivative: prepared.second.to_string(),
        linear_formula: coefficients.linear_formula(),
        quadratic_formula: coefficients.quadratic_formula(),
        behavior: Behavior::classify(coefficients.f1, coefficients.f2, settings.flat_tolerance),
        coefficients,
        samples,
    })
}
