use taylor_core::autodiff::forward_derivative;
use taylor_core::interpret::{Concavity, Trend};
use taylor_core::{
    calculate, calculate_with, CalculationSettings, EngineError, Order, PreparedExpression,
    SamplerSettings,
};

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn cubic_around_two() {
    let result = calculate("x^3 - 3*x + 1", 2.0).expect("calculation should succeed");

    assert_eq!(result.coefficients.f0, 3.0);
    assert_eq!(result.coefficients.f1, 9.0);
    assert_eq!(result.coefficients.f2, 12.0);
    assert_eq!(result.linear_formula, "L(x) = 9.0000x - 15.0000");
    assert_eq!(
        result.quadratic_formula,
        "P(x) = 3.0000 + 9.0000·(x-2) + 6.0000·(x-2)²"
    );
    assert_eq!(result.behavior.trend, Trend::Increasing);
    assert_eq!(result.behavior.concavity, Concavity::Up);
}

#[test]
fn sine_at_origin_is_an_inflection() {
    let result = calculate("sin(x)", 0.0).expect("calculation should succeed");

    assert_eq!(result.linear_formula, "L(x) = 1.0000x + 0.0000");
    assert_eq!(
        result.quadratic_formula,
        "P(x) = 0.0000 + 1.0000·(x-0) + 0.0000·(x-0)²"
    );
    assert_eq!(result.behavior.concavity, Concavity::Inflection);
}

#[test]
fn reciprocal_at_its_pole_fails() {
    let err = calculate("1/x", 0.0).expect_err("1/x is undefined at 0");
    assert_eq!(
        err,
        EngineError::NonFiniteResult {
            at: Order::Value,
            x0: 0.0
        }
    );
    assert_eq!(err.to_string(), "f(0) is not a finite number");
}

#[test]
fn syntax_errors_carry_positions() {
    let err = calculate("x^^2", 1.0).expect_err("double caret");
    assert_eq!(err.position(), Some(2));
    assert!(err.to_string().starts_with("Syntax error at position 2"));

    assert_eq!(
        calculate("foo(x)", 1.0).expect_err("unknown function"),
        EngineError::UnknownFunction {
            name: "foo".to_string()
        }
    );
    assert!(calculate("", 1.0).is_err());
}

#[test]
fn default_grid_around_one() {
    let result = calculate("exp(-x)", 1.0).expect("calculation should succeed");
    let xs = result.samples.original.xs();

    assert_eq!(xs.len(), 101);
    assert_eq!(xs[0], -4.0);
    assert_eq!(xs[100], 6.0);
    assert_eq!(result.samples.linear.len(), 101);
    assert_eq!(result.samples.quadratic.len(), 101);
    assert_eq!(result.samples.original.gap_count(), 0);
    assert!(result.samples.original.ys().iter().all(|y| y.is_finite()));
}

#[test]
fn custom_sampler_settings_are_honoured() {
    let settings = CalculationSettings {
        sampler: SamplerSettings {
            min_half_width: 1.0,
            width_scale: 0.0,
            steps_per_side: 4,
        },
        ..CalculationSettings::default()
    };
    let result = calculate_with("exp(x)", 0.0, &settings).expect("calculation should succeed");
    let xs = result.samples.original.xs();

    assert_eq!(xs, vec![-1.0, -0.75, -0.5, -0.25, 0.0, 0.25, 0.5, 0.75, 1.0]);
}

#[test]
fn logarithm_leaves_gaps_left_of_zero() {
    let result = calculate("ln(x)", 1.0).expect("calculation should succeed");

    assert!(result.samples.original.gap_count() > 0);
    assert_eq!(result.samples.linear.gap_count(), 0);
    assert_eq!(result.linear_formula, "L(x) = 1.0000x - 1.0000");
}

#[test]
fn approximations_touch_and_bend_with_the_curve() {
    for (source, x0) in [
        ("exp(x)", 0.5),
        ("sin(x)*exp(-x/3)", 1.2),
        ("sqrt(x^2 + 1)", -0.7),
        ("atan(x) + x^2/4", 2.0),
    ] {
        let prepared = PreparedExpression::parse(source).expect("parse should succeed");
        let c = prepared.coefficients_at(x0).expect("anchor should be regular");

        assert_eq!(c.linear(x0), c.f0, "{source}: tangent touches at x0");
        assert_eq!(c.quadratic(x0), c.f0, "{source}: parabola touches at x0");

        let h = 1e-2;
        let f = |x| prepared.evaluate(Order::Value, x);
        let quadratic_error = (f(x0 + h) - c.quadratic(x0 + h)).abs();
        let linear_error = (f(x0 + h) - c.linear(x0 + h)).abs();
        assert!(
            quadratic_error < linear_error,
            "{source}: quadratic should be the closer fit near x0"
        );
    }
}

#[test]
fn symbolic_and_forward_mode_derivatives_agree() {
    for source in [
        "x^3 - 3*x + 1",
        "tan(x)/x",
        "log(x, 3) + log10(x)",
        "cosh(x)^2 - sinh(x)^2",
        "x^x",
        "cbrt(x) * abs(x - 5)",
    ] {
        let prepared = PreparedExpression::parse(source).expect("parse should succeed");
        for x in [0.4, 1.3, 2.7] {
            let symbolic = prepared.evaluate(Order::First, x);
            let forward = forward_derivative(prepared.evaluator(Order::Value), x);
            assert_close(symbolic, forward, 1e-9 * (1.0 + forward.abs()));

            let second = prepared.evaluate(Order::Second, x);
            let forward_second = forward_derivative(prepared.evaluator(Order::First), x);
            assert_close(second, forward_second, 1e-9 * (1.0 + forward_second.abs()));
        }
    }
}

#[test]
fn invalid_anchor_is_rejected() {
    assert!(matches!(
        calculate("x", f64::NEG_INFINITY),
        Err(EngineError::InvalidAnchor { .. })
    ));
}

#[test]
fn long_inputs_fail_cleanly_on_a_small_stack() {
    let worker = std::thread::Builder::new()
        .stack_size(1 << 20)
        .spawn(|| {
            let sum = format!("{}x", "x+".repeat(20_000));
            let err = calculate(&sum, 0.5).expect_err("sum exceeds the node budget");
            assert!(err.position().is_some(), "expected a syntax error, got {err:?}");

            let product = format!("{}x", "x*".repeat(200));
            assert!(matches!(
                calculate(&product, 0.5),
                Err(EngineError::TooComplex { .. })
            ));

            let fits = format!("{}x", "x+".repeat(199));
            let result = calculate(&fits, 0.5).expect("moderate sum should succeed");
            assert_eq!(result.coefficients.f1, 200.0);
        })
        .expect("spawn worker");
    worker.join().expect("worker should not overflow its stack");
}
