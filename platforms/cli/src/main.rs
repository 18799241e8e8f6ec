mod driver;

use clap::Parser;
use driver::{banner, render_tape, Driver};
use std::error::Error;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tur_password::{password_rules, RuleSet, RuleSetLoader, TuringMachine};

/// Checks a password with a step-by-step Turing machine.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tur-password-cli 'Str0ngPass!'
  echo 'NoSpecial123' | tur-password-cli --animate
  tur-password-cli --rules machine.json aabb")]
struct Cli {
    /// The input to check. Read from stdin when omitted and stdin is piped.
    input: Option<String>,

    /// Load the rule set from a JSON file instead of the built-in password rules
    #[clap(short, long)]
    rules: Option<PathBuf>,

    /// Show the tape after every step instead of printing the trace at the end
    #[clap(short, long)]
    animate: bool,

    /// Delay between animated steps, in milliseconds
    #[clap(long, default_value_t = 150)]
    interval_ms: u64,

    /// Print only the result
    #[clap(short, long)]
    quiet: bool,

    /// Print the active rule set as JSON and exit
    #[clap(long)]
    dump_rules: bool,

    /// Enable debug logging
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();

    let directive = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(io::stderr)
        .init();

    let rules = load_rules(&cli)?;

    if cli.dump_rules {
        println!("{}", RuleSetLoader::to_json(&rules)?);
        return Ok(ExitCode::SUCCESS);
    }

    let input = read_input(&cli)?;
    let mut machine = TuringMachine::new(rules)?;

    let halt = if cli.animate {
        let driver = Driver::new(Duration::from_millis(cli.interval_ms));
        let quiet = cli.quiet;
        driver.drive(&mut machine, &input, |machine| {
            if !quiet {
                println!(
                    "{:>4} {:<16} {}",
                    machine.step_count(),
                    machine.state(),
                    render_tape(&machine.snapshot())
                );
            }
        })
    } else {
        let result = machine.run(&input);
        if !cli.quiet {
            println!("{}\n", result.trace);
        }
        result.halt
    };

    println!("{}", banner(&halt));

    Ok(if halt.is_accept() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Loads the rule set from `--rules`, falling back to the built-in password rules.
fn load_rules(cli: &Cli) -> Result<RuleSet, Box<dyn Error>> {
    let rules = match &cli.rules {
        Some(path) => RuleSetLoader::load_rules(path)?,
        None => password_rules()?,
    };

    Ok(rules)
}

/// Takes the input from the command line, or from stdin when it is piped.
fn read_input(cli: &Cli) -> Result<String, Box<dyn Error>> {
    if let Some(input) = &cli.input {
        return Ok(input.clone());
    }

    if atty::is(atty::Stream::Stdin) {
        return Err("no input given; pass it as an argument or pipe it via stdin".into());
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| format!("Failed to read from stdin: {}", e))?;

    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}
