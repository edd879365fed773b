//! Command-line interface for graphcalc.
//!
//! Evaluates an expression once, over a range of one variable, or as a
//! graph, and prints the results on standard output, one value per line.

use clap::{Parser, Subcommand};
use graphcalc::graph::DEFAULT_WIDTH;
use graphcalc::{Calculator, Error, Precedence, FUNCTIONS};
use std::collections::HashMap;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Let variables given with --var shadow the built-in constants
    #[arg(long, global = true)]
    caller_wins: bool,

    /// Command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluates an expression
    Eval {
        /// The expression to evaluate
        #[arg(allow_hyphen_values = true)]
        expression: String,
        /// Variable bindings, as name=value
        #[arg(short, long = "var", value_parser = parse_binding)]
        vars: Vec<(String, f64)>,
    },
    /// Evaluates an expression for each value of a variable
    Range {
        /// The expression to evaluate
        #[arg(allow_hyphen_values = true)]
        expression: String,
        /// Name of the ranged variable
        #[arg(long, default_value = "x")]
        over: String,
        /// First value of the range
        #[arg(long, allow_negative_numbers = true)]
        start: f64,
        /// Last value of the range, included
        #[arg(long, allow_negative_numbers = true)]
        stop: f64,
        /// Distance between two values
        #[arg(long, default_value_t = 1.0)]
        step: f64,
        /// Variable bindings, as name=value
        #[arg(short, long = "var", value_parser = parse_binding)]
        vars: Vec<(String, f64)>,
    },
    /// Samples the graph of an expression of x, with its axis ticks
    Plot {
        /// The expression to graph
        #[arg(allow_hyphen_values = true)]
        expression: String,
        /// Expression for the smallest x
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        x_min: String,
        /// Expression for the largest x
        #[arg(long, default_value = "2", allow_hyphen_values = true)]
        x_max: String,
        /// Number of steps between x_min and x_max
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: usize,
        /// Variable bindings, as name=value
        #[arg(short, long = "var", value_parser = parse_binding)]
        vars: Vec<(String, f64)>,
    },
    /// Lists the available functions
    Functions,
}

fn parse_binding(binding: &str) -> Result<(String, f64), String> {
    let (name, value) = binding
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", binding))?;
    let value = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid value for '{}': '{}'", name, value))?;
    Ok((name.trim().to_owned(), value))
}

fn run(args: Args) -> Result<(), Error> {
    let precedence = if args.caller_wins {
        Precedence::Caller
    } else {
        Precedence::Builtins
    };
    let calculator = Calculator::new().precedence(precedence);

    match args.command {
        Commands::Eval { expression, vars } => {
            let context: HashMap<String, f64> = vars.into_iter().collect();
            println!("{}", calculator.calculate(&expression, &context)?);
        }
        Commands::Range {
            expression,
            over,
            start,
            stop,
            step,
            vars,
        } => {
            let context: HashMap<String, f64> = vars.into_iter().collect();
            let samples = calculator.range(&expression, &over, start, stop, step, &context)?;
            for (input, output) in samples.iter() {
                println!("{}\t{}", input, output);
            }
        }
        Commands::Plot {
            expression,
            x_min,
            x_max,
            width,
            vars,
        } => {
            let context: HashMap<String, f64> = vars.into_iter().collect();
            let graph = calculator.plot(&expression, &x_min, &x_max, width, &context)?;
            println!("# y in [{}, {}]", graph.y_min, graph.y_max);
            println!("# x ticks: {:?}", graph.x_ticks());
            println!("# y ticks: {:?}", graph.y_ticks());
            for (x, y) in graph.samples.iter() {
                println!("{}\t{}", x, y);
            }
        }
        Commands::Functions => {
            let mut functions = FUNCTIONS.values().collect::<Vec<_>>();
            functions.sort_by_key(|function| function.name);
            for function in functions {
                println!("{}\t{}", function.name, function.arity);
            }
        }
    }
    Ok(())
}

fn main() {
    pretty_env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("x=2" => Ok(("x".to_string(), 2.0)) ; "simple binding")]
    #[test_case(" y = -0.5 " => Ok(("y".to_string(), -0.5)) ; "spaces are trimmed")]
    #[test_case("x" => Err("expected name=value, got 'x'".to_string()) ; "missing value")]
    #[test_case("x=abc" => Err("invalid value for 'x': 'abc'".to_string()) ; "invalid value")]
    fn binding(text: &str) -> Result<(String, f64), String> {
        parse_binding(text)
    }

    #[test]
    fn arguments() {
        let args = Args::parse_from(["graphcalc", "--caller-wins", "eval", "-v", "e=1", "e + 1"]);
        assert!(args.caller_wins);
        assert!(run(args).is_ok());

        let args = Args::parse_from([
            "graphcalc", "range", "x*x", "--start", "-1", "--stop", "1", "--step", "0.5",
        ]);
        match args.command {
            Commands::Range {
                ref over,
                start,
                stop,
                step,
                ..
            } => {
                assert_eq!(over, "x");
                assert_eq!((start, stop, step), (-1.0, 1.0, 0.5));
            }
            ref other => panic!("unexpected command {:?}", other),
        }
        assert!(run(args).is_ok());

        let args = Args::parse_from(["graphcalc", "eval", "foo(1)"]);
        assert_eq!(run(args), Err(Error::UnknownIdentifier("foo".into())));
    }
}
