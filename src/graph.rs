//! Numeric helpers for drawing the graph of an expression: sampling one
//! sample per horizontal pixel, the bounds of the plotted values and the
//! position of axis ticks. Nothing here draws anything.

use crate::error::Error;
use crate::expr::Calculator;
use crate::range::Samples;
use std::collections::HashMap;

/// Values smaller than this are considered to be zero
pub const MINIMUM_PRECISION: f64 = 1e-10;

/// Width in pixels of a graph when none is given
pub const DEFAULT_WIDTH: usize = 438;

/// Round `value` to 12 significant digits, hiding the error accumulated by
/// repeated floating point additions.
///
/// ```
/// # use graphcalc::graph::truncate_float_error;
/// assert_eq!(truncate_float_error(0.1 + 0.2), 0.3);
/// ```
pub fn truncate_float_error(value: f64) -> f64 {
    format!("{:.11e}", value).parse().unwrap_or(value)
}

/// Positions of the ticks on an axis going from `min` to `max`.
///
/// Ticks are spaced by a power of ten, or a fifth or a double of it, so that
/// there are between five and ten of them. The first tick is at or just
/// before `min`. Ticks stop early if `interval` is lost below the
/// precision of the axis values.
pub fn axis_ticks(min: f64, max: f64) -> Vec<f64> {
    let range = max - min;
    let mut ticks = Vec::new();
    if !(range > 0.0 && range.is_finite()) {
        return ticks;
    }

    let power = libm::ceil(libm::log(range) / libm::log(10.0));
    let mut interval = libm::pow(10.0, power - 1.0);
    if range / interval < 5.0 {
        interval /= 5.0;
    }
    if range / interval > 10.0 {
        interval *= 2.0;
    }

    let mut tick = min + (interval - min % interval) - interval;
    while tick <= max {
        ticks.push(tick);
        let next = tick + interval;
        if next <= tick {
            break;
        }
        tick = next;
    }
    ticks
}

/// An expression sampled across the horizontal extent of a graph
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    /// The sampled points, one per pixel column
    pub samples: Samples,
    /// Smallest x value
    pub x_min: f64,
    /// Largest x value
    pub x_max: f64,
    /// Smallest finite y value
    pub y_min: f64,
    /// Largest finite y value, at least `MINIMUM_PRECISION` above `y_min`
    pub y_max: f64,
}

impl Graph {
    /// Ticks for the x axis
    pub fn x_ticks(&self) -> Vec<f64> {
        axis_ticks(self.x_min, self.x_max)
    }

    /// Ticks for the y axis
    pub fn y_ticks(&self) -> Vec<f64> {
        axis_ticks(self.y_min, self.y_max)
    }
}

/// Sample the graph of `expression` as a function of `x`, see
/// [`Calculator::plot`]
pub fn plot<'a, C>(
    expression: &str,
    x_min: &str,
    x_max: &str,
    width: usize,
    context: C,
) -> Result<Graph, Error>
where
    C: Into<&'a HashMap<String, f64>>,
{
    Calculator::default().plot(expression, x_min, x_max, width, context)
}

impl Calculator {
    /// Sample the graph of `expression` as a function of `x`.
    ///
    /// The bounds `x_min` and `x_max` are expressions themselves, evaluated
    /// in `context`. The x range is split in `width` steps.
    ///
    /// ```
    /// # use std::collections::HashMap;
    /// # use graphcalc::Calculator;
    /// let graph = Calculator::new().plot("x*x", "-1", "1", 4, &HashMap::new()).unwrap();
    /// assert_eq!(graph.samples.inputs, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    /// assert_eq!((graph.y_min, graph.y_max), (0.0, 1.0));
    /// ```
    #[allow(clippy::cast_precision_loss)]
    pub fn plot<'a, C>(
        &self,
        expression: &str,
        x_min: &str,
        x_max: &str,
        width: usize,
        context: C,
    ) -> Result<Graph, Error>
    where
        C: Into<&'a HashMap<String, f64>>,
    {
        let context = context.into();
        let start = self.calculate(x_min, context)?;
        let end = self.calculate(x_max, context)?;
        let step = (end - start) / width as f64;
        let samples = self.range(expression, "x", start, end, step, context)?;

        let mut finite = samples.outputs.iter().copied().filter(|y| y.is_finite());
        let (y_min, mut y_max) = match finite.next() {
            Some(first) => finite.fold((first, first), |(low, high), y| (low.min(y), high.max(y))),
            None => (0.0, 0.0),
        };
        if y_max - y_min < MINIMUM_PRECISION {
            y_max += MINIMUM_PRECISION;
        }

        Ok(Graph {
            samples,
            x_min: start,
            x_max: end,
            y_min,
            y_max,
        })
    }
}
