use anyhow::Context as _;
use canonlr::{
    collection::StateID,
    grammar::{Grammar, RuleID},
    Config, ConflictPolicy, ParseError, Parser, TraceEvent, TraceSink,
};
use canonlr_lexer::{strip_comments, tokenize};
use clap::{Parser as _, ValueEnum};
use std::{fs, path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The path of grammar definition file.
    grammar: PathBuf,

    /// The source file to parse.
    source: PathBuf,

    /// Reject grammar lines that are not productions.
    #[arg(long)]
    strict: bool,

    /// Where to write the item-set dump.
    #[arg(long, default_value = "items.txt")]
    items: PathBuf,

    /// How to resolve cells with several candidate actions.
    #[arg(long, value_enum, default_value_t = PolicyArg::Legacy)]
    policy: PolicyArg,

    /// Fail when the parsing table has conflicts.
    #[arg(long)]
    deny_conflicts: bool,

    /// The maximum number of LR(1) states.
    #[arg(long, default_value_t = canonlr::config::DEFAULT_MAX_STATES)]
    max_states: usize,

    /// Only print the verdict.
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum PolicyArg {
    Legacy,
    PreferShift,
}

impl From<PolicyArg> for ConflictPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Legacy => ConflictPolicy::Legacy,
            PolicyArg::PreferShift => ConflictPolicy::PreferShift,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::trace!("CLI args = {:?}", args);

    let source = fs::read_to_string(&args.source)
        .with_context(|| format!("failed to read the source file {}", args.source.display()))?;
    let source = strip_comments(&source);

    let tokens = tokenize(&source);
    if !args.quiet {
        println!("tokens:");
        for token in &tokens {
            match &token.error {
                Some(err) => println!("error: ({}, {}) - {}", token.kind, token.text, err),
                None => println!("({}, {})", token.kind, token.text),
            }
        }
        println!();
    }

    let mut config = Config::new();
    config
        .strict(args.strict)
        .conflict_policy(args.policy.into())
        .deny_conflicts(args.deny_conflicts)
        .max_states(args.max_states);

    let grammar = Grammar::from_file(&args.grammar, config.leniency())
        .with_context(|| format!("failed to load the grammar {}", args.grammar.display()))?;
    let parser = Parser::new(grammar, &config).context("failed to build the parser")?;

    for conflict in parser.tables().conflicts() {
        println!("[warning] {}", conflict.display(parser.grammar()));
    }

    fs::write(&args.items, parser.display_items().to_string())
        .with_context(|| format!("failed to write the item sets to {}", args.items.display()))?;
    if !args.quiet {
        println!("{}", parser.display_tables());
    }

    let mut printer = Printer {
        grammar: parser.grammar(),
        quiet: args.quiet,
        steps: vec![],
    };
    match parser.parse_with(&tokens, &mut printer) {
        Ok(accepted) => {
            println!(
                "accepted ({} shift(s), {} reduction(s))",
                accepted.shifts, accepted.reductions
            );
            if !args.quiet {
                for (i, step) in printer.steps.iter().enumerate() {
                    println!("{}. {}", i + 1, step);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(ParseError::Syntax(err)) => {
            println!("rejected: {}", err);
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err).context("the parser stopped on a malformed table"),
    }
}

/// Prints every transition with the stacks right after it.
struct Printer<'g> {
    grammar: &'g Grammar,
    quiet: bool,
    steps: Vec<String>,
}

impl TraceSink<StateID, String, RuleID> for Printer<'_> {
    fn event(&mut self, event: &TraceEvent, states: &[StateID], symbols: &[String]) {
        let step = match event {
            TraceEvent::Shift { symbol, target, .. } => {
                format!("shift {}, go to state {}", symbol, target)
            }
            TraceEvent::Reduce {
                reduce, lhs, goto, ..
            } => {
                let rule = self.grammar.rule(*reduce).display(self.grammar);
                let top = states.len().checked_sub(2).map(|i| states[i]);
                match top {
                    Some(top) => format!("reduce by {}, GOTO(I{}, {}) = {}", rule, top, lhs, goto),
                    None => format!("reduce by {}", rule),
                }
            }
            TraceEvent::Accept { .. } => return,
            TraceEvent::Reject { state, symbol } => {
                if !self.quiet {
                    println!("no action in state {} for {}", state, symbol);
                    println!("  states: {:?}", states);
                    println!("  symbols: {:?}", symbols);
                }
                return;
            }
        };
        if !self.quiet {
            println!("{}", step);
            println!("  states: {:?}", states);
            println!("  symbols: {:?}\n", symbols);
        }
        self.steps.push(step);
    }
}
