use approx::assert_relative_eq;
use expr_ad::expr::Expr;
use expr_ad::variable::Variable;
use expr_ad::{differentiable, Differentiable};

#[differentiable(DiffNeuron)]
#[derive(Clone, Debug)]
struct Neuron {
    name: String,
    #[diffvar]
    weight: f64,
    #[diffvar]
    bias: f64,
}

#[differentiable(diff_example)]
fn example(a: f64, #[diffvar] x: f64) -> f64 {
    x + a
}

#[differentiable(diff_literal_left)]
fn literal_left(#[diffvar] x: f64) -> f64 {
    2.0 + x
}

#[differentiable(diff_square_plus)]
fn square_plus(a: f64, #[diffvar] x: f64) -> f64 {
    let sq = x * x;
    sq + a * x + 1.0
}

#[differentiable(diff_smooth)]
fn smooth(#[diffvar] x: f64, #[diffvar] y: f64) -> f64 {
    (x * y).sin() + y.exp().max(0.5)
}

fn assert_differentiable<T: Differentiable>() {}

#[test]
fn original_functions_are_kept() {
    assert_eq!(example(1.0, 2.0), 3.0);
    assert_eq!(literal_left(1.0), 3.0);
    assert_eq!(square_plus(2.0, 3.0), 16.0);
}

#[test]
fn macro_generates_function_companion() {
    let x = Variable::new(2.0);
    let result: Expr<f64> = diff_example(1.0, Expr::from(&x));
    assert_eq!(result.value(), 3.0);
    assert_eq!(result.grad(&x), 1.0);
}

#[test]
fn macro_wraps_literals_and_params() {
    let x = Variable::new(2.0);
    let result = diff_literal_left(Expr::from(&x));
    assert_eq!(result.value(), 4.0);
    assert_eq!(result.grad(&x), 1.0);

    // d/dx (x^2 + a*x + 1) = 2x + a
    let result = diff_square_plus(2.0, Expr::from(&x));
    assert_eq!(result.value(), 9.0);
    assert_eq!(result.grad(&x), 6.0);
}

#[test]
fn companion_tracks_several_variables() {
    let x = Variable::new(0.5);
    let y = Variable::new(2.0);
    let f = diff_smooth(Expr::from(&x), Expr::from(&y));
    assert_relative_eq!(f.value(), smooth(0.5, 2.0));
    assert_relative_eq!(f.grad(&x), 2.0 * 1.0f64.cos());
    assert_relative_eq!(f.grad(&y), 0.5 * 1.0f64.cos() + 2.0f64.exp());
    y.set_value(-3.0);
    assert_relative_eq!(f.value(), smooth(0.5, -3.0));
}

#[test]
fn macro_generates_struct_companion() {
    assert_differentiable::<DiffNeuron>();

    let neuron = Neuron {
        name: "n0".to_string(),
        weight: 0.5,
        bias: -1.0,
    };
    let diff = DiffNeuron::from(neuron.clone());
    assert_eq!(diff.name, "n0");
    assert_eq!(diff.weight.value(), 0.5);

    let params = diff.parameters();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].tag(), diff.weight.tag());
    assert_eq!(params[1].tag(), diff.bias.tag());

    let input: f64 = 4.0;
    let out = &diff.weight * input + &diff.bias;
    assert_eq!(out.value(), 1.0);
    let grads: Vec<f64> = params.iter().map(|p| out.grad(p)).collect();
    assert_eq!(grads, vec![4.0, 1.0]);

    // write back through the parameter handle
    params[0].set_value(1.0);
    assert_eq!(out.value(), 3.0);
}
