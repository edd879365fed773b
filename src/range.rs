use crate::env::Environment;
use crate::error::Error;
use crate::expr::{Calculator, Expr};
use log::debug;
use std::collections::HashMap;

/// Largest number of samples a single range may produce
pub const MAX_SAMPLES: usize = 10_000_000;

/// The result of ranging an expression over one variable. `outputs[i]` is
/// the value of the expression with the variable set to `inputs[i]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Samples {
    /// Values given to the ranged variable, in increasing order
    pub inputs: Vec<f64>,
    /// Value of the expression for each input
    pub outputs: Vec<f64>,
}

impl Samples {
    /// Number of sample points
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Check if there are no sample points
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Iterate over `(input, output)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.inputs.iter().copied().zip(self.outputs.iter().copied())
    }
}

/// The values `start`, `start + step`, `start + step + step`, ... up to and
/// including `stop`.
///
/// Values are accumulated by repeated addition, so they carry the usual
/// floating point drift. An empty list is returned if `start > stop`. An
/// infinite bound, or a `step` that cannot reach `stop` within
/// [`MAX_SAMPLES`] values, is an error.
///
/// ```
/// # use graphcalc::samples;
/// assert_eq!(samples(0.0, 2.0, 0.5), Ok(vec![0.0, 0.5, 1.0, 1.5, 2.0]));
/// assert_eq!(samples(3.0, 2.0, 1.0), Ok(vec![]));
/// assert!(samples(0.0, 2.0, 0.0).is_err());
/// ```
pub fn samples(start: f64, stop: f64, step: f64) -> Result<Vec<f64>, Error> {
    let mut values = Vec::new();
    if !(start <= stop) {
        return Ok(values);
    }
    if !(start.is_finite() && stop.is_finite()) {
        return Err(Error::UnboundedRange(start, stop));
    }
    #[allow(clippy::cast_precision_loss)]
    let too_many = (stop - start) / step >= MAX_SAMPLES as f64;
    if !(step > 0.0 && step.is_finite()) || too_many {
        return Err(Error::InvalidStep(step));
    }

    let mut value = start;
    loop {
        values.push(value);
        let next = value + step;
        if !(next <= stop) {
            break;
        }
        if next <= value {
            // step is lost below the precision of value
            return Err(Error::InvalidStep(step));
        }
        value = next;
    }
    Ok(values)
}

/// Evaluate `expression` for every value of `variable` between `start` and
/// `stop`, see [`samples`]. The first failing evaluation aborts the whole
/// range.
///
/// ```
/// # use std::collections::HashMap;
/// # use graphcalc::range;
/// let samples = range("x*x", "x", 0.0, 2.0, 1.0, &HashMap::new()).unwrap();
/// assert_eq!(samples.inputs, vec![0.0, 1.0, 2.0]);
/// assert_eq!(samples.outputs, vec![0.0, 1.0, 4.0]);
/// ```
pub fn range<'a, C>(
    expression: &str,
    variable: &str,
    start: f64,
    stop: f64,
    step: f64,
    context: C,
) -> Result<Samples, Error>
where
    C: Into<&'a HashMap<String, f64>>,
{
    Calculator::default().range(expression, variable, start, stop, step, context)
}

impl Calculator {
    /// Range `expression` over `variable`, see [`range`]
    pub fn range<'a, C>(
        &self,
        expression: &str,
        variable: &str,
        start: f64,
        stop: f64,
        step: f64,
        context: C,
    ) -> Result<Samples, Error>
    where
        C: Into<&'a HashMap<String, f64>>,
    {
        let env = self.environment(context.into());
        Expr::new(expression).range(variable, start, stop, step, &env)
    }
}

impl Expr {
    /// Evaluate the expression for every sample of `variable`, on top of the
    /// bindings in `env`. The ranged variable shadows any binding of the
    /// same name, built-in constants included.
    pub fn range(
        &self,
        variable: &str,
        start: f64,
        stop: f64,
        step: f64,
        env: &Environment,
    ) -> Result<Samples, Error> {
        let inputs = samples(start, stop, step)?;
        debug!(
            "ranging {} over {} samples in [{}, {}]",
            variable,
            inputs.len(),
            start,
            stop
        );

        let mut env = env.clone();
        let outputs = inputs
            .iter()
            .map(|&value| {
                env.bind(variable, value);
                self.eval_in(&env)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Samples { inputs, outputs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Precedence;
    use test_case::test_case;

    #[test_case(0.0, 2.0, 1.0 => Ok(vec![0.0, 1.0, 2.0]) ; "integer steps")]
    #[test_case(0.0, 2.5, 1.0 => Ok(vec![0.0, 1.0, 2.0]) ; "stop between samples")]
    #[test_case(1.0, 1.0, 1.0 => Ok(vec![1.0]) ; "single sample")]
    #[test_case(-1.0, 1.0, 0.5 => Ok(vec![-1.0, -0.5, 0.0, 0.5, 1.0]) ; "negative start")]
    #[test_case(2.0, 1.0, 1.0 => Ok(vec![]) ; "start after stop")]
    #[test_case(2.0, 1.0, 0.0 => Ok(vec![]) ; "empty range ignores step")]
    #[test_case(f64::NAN, 1.0, 1.0 => Ok(vec![]) ; "nan start")]
    #[test_case(0.0, 1.0, 0.0 => Err(Error::InvalidStep(0.0)) ; "zero step")]
    #[test_case(0.0, 1.0, -1.0 => Err(Error::InvalidStep(-1.0)) ; "negative step")]
    #[test_case(0.0, 1.0, f64::INFINITY => Err(Error::InvalidStep(f64::INFINITY)) ; "infinite step")]
    #[test_case(1e20, 2e20, 1.0 => Err(Error::InvalidStep(1.0)) ; "step below precision")]
    #[test_case(0.0, 1.0, 1e-9 => Err(Error::InvalidStep(1e-9)) ; "too many samples")]
    #[test_case(0.0, f64::INFINITY, 1.0 => Err(Error::UnboundedRange(0.0, f64::INFINITY)) ; "infinite stop")]
    #[test_case(f64::NEG_INFINITY, 0.0, 1.0 => Err(Error::UnboundedRange(f64::NEG_INFINITY, 0.0)) ; "infinite start")]
    fn sequence(start: f64, stop: f64, step: f64) -> Result<Vec<f64>, Error> {
        samples(start, stop, step)
    }

    #[test]
    fn accumulation_drifts() {
        let values = samples(0.0, 1.0, 0.1).unwrap();
        let mut expected = 0.0;
        for value in &values {
            assert_eq!(value.to_bits(), f64::to_bits(expected));
            expected += 0.1;
        }
        // 0.1 added ten times overshoots 1.0, so the last sample is 0.9999...
        assert_eq!(values.len(), 11);
        assert!(values[10] < 1.0);
        assert_ne!(values[3], 0.3);
    }

    #[test]
    fn squares() {
        let result = range("x*x", "x", 0.0, 2.0, 1.0, &HashMap::new()).unwrap();
        assert_eq!(result.inputs, vec![0.0, 1.0, 2.0]);
        assert_eq!(result.outputs, vec![0.0, 1.0, 4.0]);
        assert_eq!(result.len(), 3);
        assert_eq!(
            result.iter().collect::<Vec<_>>(),
            vec![(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)]
        );
    }

    #[test]
    fn uses_other_variables() {
        let mut context: HashMap<String, f64> = HashMap::new();
        context.insert("a".into(), 10.0);
        let result = range("a * t + 1", "t", 0.0, 2.0, 1.0, &context).unwrap();
        assert_eq!(result.outputs, vec![1.0, 11.0, 21.0]);
    }

    #[test]
    fn ranged_variable_shadows_everything() {
        let mut context: HashMap<String, f64> = HashMap::new();
        context.insert("x".into(), 100.0);
        let result = range("x + 1", "x", 0.0, 1.0, 1.0, &context).unwrap();
        assert_eq!(result.outputs, vec![1.0, 2.0]);

        let result = range("e", "e", 0.0, 1.0, 1.0, &HashMap::new()).unwrap();
        assert_eq!(result.outputs, vec![0.0, 1.0]);
    }

    #[test]
    fn builtins_follow_calculator_precedence() {
        let mut context: HashMap<String, f64> = HashMap::new();
        context.insert("pi".into(), 2.0);
        let result = range("pi * x", "x", 1.0, 1.0, 1.0, &context).unwrap();
        assert_eq!(result.outputs, vec![std::f64::consts::PI]);

        let calculator = Calculator::new().precedence(Precedence::Caller);
        let result = calculator
            .range("pi * x", "x", 1.0, 1.0, 1.0, &context)
            .unwrap();
        assert_eq!(result.outputs, vec![2.0]);
    }

    #[test]
    fn first_error_aborts() {
        assert_eq!(
            range("x * y", "x", 0.0, 2.0, 1.0, &HashMap::new()),
            Err(Error::UnknownIdentifier("y".into()))
        );
        assert_eq!(
            range("x)", "x", 0.0, 2.0, 1.0, &HashMap::new()),
            Err(Error::TrailingTokens(")".into()))
        );
        assert_eq!(
            range("x", "x", 0.0, 2.0, 0.0, &HashMap::new()),
            Err(Error::InvalidStep(0.0))
        );
        assert_eq!(
            range("x", "x", 0.0, f64::INFINITY, 1.0, &HashMap::new()),
            Err(Error::UnboundedRange(0.0, f64::INFINITY))
        );
    }

    #[test]
    fn empty_range_never_evaluates() {
        let result = range("not valid (", "x", 1.0, 0.0, 1.0, &HashMap::new()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result, Samples::default());
    }

    #[test]
    fn expr_ranges_repeatedly() {
        let expr = Expr::new("sqrt(x)");
        let env = Environment::new(&HashMap::new(), Precedence::default());
        let first = expr.range("x", 0.0, 16.0, 4.0, &env).unwrap();
        let second = expr.range("x", 0.0, 16.0, 4.0, &env).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.outputs, vec![0.0, 2.0, 8f64.sqrt(), 12f64.sqrt(), 4.0]);
        assert_eq!(env.get("x"), None);
    }
}
