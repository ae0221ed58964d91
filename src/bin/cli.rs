use clap::Parser;
use colored::Colorize;
use function_tree::errors::FunctionError;
use function_tree::expr::Node;
use function_tree::precision::{Precision, DEFAULT_DIGITS};
use function_tree::types::{Dbl, Mpfr};
use function_tree::Function;
use std::process;

#[derive(Parser)]
#[command(name = "ftree-info")]
#[command(about = "Degree analysis and dual-precision evaluation of expressions")]
#[command(version)]
struct Args {
    /// Expression to analyze, e.g. "x^2*y - sin(pi*x)"
    expression: String,

    /// Assigns a variable, as name=re or name=re,im (repeatable)
    #[arg(long = "at", value_name = "NAME=RE[,IM]")]
    at: Vec<String>,

    /// Working precision in decimal digits for arbitrary-precision evaluation
    #[arg(long, env = "FTREE_DIGITS", default_value_t = DEFAULT_DIGITS)]
    digits: u32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("{} {}", "Error:".red(), e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let precision = Precision::digits(args.digits)?;
    let function = Function::new(args.expression.clone())?;

    println!("{function}");
    println!("  {}: {}", "tree".cyan(), function.root());
    println!("  {}: {}", "degree".cyan(), function.degree());
    for name in function.variable_names() {
        println!(
            "  {} {name}: {}",
            "degree in".cyan(),
            function.degree_wrt(name)?
        );
    }
    println!("  {}: {}", "polynomial".cyan(), function.is_polynomial());
    println!("  {}: {}", "homogeneous".cyan(), function.is_homogeneous());

    for assignment in &args.at {
        let (name, value) = parse_assignment(assignment)?;
        let variable = function
            .variable(name)
            .ok_or_else(|| FunctionError::VariableNotFound(name.to_string()))?;
        variable.set_current_value(value.eval_at::<Dbl>(precision)?)?;
        variable.set_current_value(value.eval_at::<Mpfr>(precision)?)?;
    }

    let assigned = function
        .variables()
        .iter()
        .all(|v| v.current_value::<Dbl>().is_some());
    if assigned {
        let d = function.root().eval_at::<Dbl>(precision)?;
        let m = function.root().eval_at::<Mpfr>(precision)?;
        println!("  {}: {d}", "value (dbl)".cyan());
        println!(
            "  {}: {}",
            format!("value ({} digits)", args.digits).cyan(),
            m.to_string_radix(10, Some(args.digits as usize))
        );
    }

    Ok(())
}

/// Parses `name=re` or `name=re,im` into the name and a number node holding the value.
fn parse_assignment(assignment: &str) -> Result<(&str, Node), Box<dyn std::error::Error>> {
    let (name, value) = assignment
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=RE[,IM], got {assignment:?}"))?;
    let (re, im) = value.split_once(',').unwrap_or((value, "0"));
    Ok((name.trim(), Node::number(re.trim(), im.trim())?))
}
