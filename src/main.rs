use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use rulekit_rs::rulekit::notify::{HttpEmailSender, Notifier};
use rulekit_rs::rulekit::ruleset::{RuleSet, RuleSetBuilder, RuleSetLoader};

use std::collections::HashMap;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the rules of a rule set with their signatures
    List {
        /// Path to the rule set file
        #[arg(short, long)]
        file: String,
    },
    /// Evaluate one rule against a raw input value
    Eval {
        /// Path to the rule set file
        #[arg(short, long)]
        file: String,

        /// Name of the rule to evaluate
        #[arg(short, long)]
        rule: String,

        /// Input value (text, integer, or YYYY-MM-DD[THH:MM:SS])
        #[arg(short, long)]
        input: String,
    },
    /// Send a templated notification email
    Notify {
        /// Recipient address
        #[arg(long)]
        to: String,

        /// Sender address (defaults to EMAIL_DEFAULT_FROM)
        #[arg(long)]
        from: Option<String>,

        /// Email subject
        #[arg(short, long)]
        subject: String,

        /// Template id
        #[arg(short, long, default_value_t = 0)]
        template: usize,

        /// Placeholder value as KEY=VALUE for a named template (repeatable)
        #[arg(short, long = "value")]
        values: Vec<String>,

        /// Positional value for a positional template, in order (repeatable)
        #[arg(short, long = "arg", conflicts_with = "values")]
        args: Vec<String>,
    },
}

fn load_rule_set(file: &str) -> anyhow::Result<RuleSet> {
    let def = RuleSetLoader::new()
        .load_file(file)
        .with_context(|| format!("failed to load rule set from {}", file))?;
    let set = RuleSetBuilder::new()
        .build(&def)
        .with_context(|| format!("failed to build rule set '{}'", def.name))?;
    Ok(set)
}

fn parse_values(pairs: &[String]) -> anyhow::Result<HashMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{}'", pair))
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::List { file } => {
            let set = load_rule_set(&file)?;
            println!("Rule set: {}", set.name());
            for (name, kind, signature) in set.describe() {
                println!("  {:<24} {:<15} {}", name, kind.to_string(), signature);
            }
        }
        Commands::Eval { file, rule, input } => {
            let set = load_rule_set(&file)?;
            let result = set
                .evaluate_raw(&rule, &input)
                .with_context(|| format!("failed to evaluate rule '{}'", rule))?;
            println!("{}", result);
        }
        Commands::Notify {
            to,
            from,
            subject,
            template,
            values,
            args,
        } => {
            let sender = HttpEmailSender::from_env()?;
            let default_from = std::env::var("EMAIL_DEFAULT_FROM").unwrap_or_default();
            let notifier = Notifier::new(Arc::new(sender), default_from);

            if args.is_empty() {
                let values = parse_values(&values)?;
                notifier
                    .send_templated(from.as_deref(), &to, &subject, template, &values)
                    .await?;
            } else {
                notifier
                    .send_positional(from.as_deref(), &to, &subject, template, &args)
                    .await?;
            }
            println!("Sent template {} to {}", template, to);
        }
    }

    Ok(())
}
