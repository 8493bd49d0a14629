use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use std::time::Instant;
use tierchain::{ChainConfig, ConstantOrigin, LoggingConfig, MultiLevelCache};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "tierchain-cli")]
#[command(about = "tierchain CLI - drive a multilevel LRU/LFU cache chain", long_about = None)]
struct Args {
    /// YAML chain configuration (defaults to an LRU(3) -> LFU(2) chain)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Run the built-in demo sequence and exit
    #[arg(long)]
    demo: bool,

    /// Command to execute (if not in interactive mode)
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

type Chain = MultiLevelCache<String, String, ConstantOrigin<String>>;

struct Session {
    cache: Chain,
}

impl Session {
    fn new(config: &ChainConfig) -> Result<Self> {
        let cache = config
            .build(config.constant_origin())
            .context("Failed to build cache chain")?;
        Ok(Self { cache })
    }

    fn execute_command(&mut self, command: &str, args: &[String]) -> Result<String> {
        let start = Instant::now();

        let response = match command.to_uppercase().as_str() {
            "GET" => self.cmd_get(args)?,
            "PUT" | "SET" => self.cmd_put(args)?,
            "PUTAT" => self.cmd_put_at(args)?,
            "ADDTIER" => self.cmd_add_tier(args)?,
            "RMTIER" => self.cmd_remove_tier(args)?,
            "SHOW" => self.cmd_show(),
            "STATS" | "INFO" => self.cmd_stats(),
            "JSON" => self.cmd_json()?,
            "HELP" => self.help_text(),
            _ => return Err(anyhow::anyhow!("Unknown command: {}", command)),
        };

        let elapsed = start.elapsed();
        Ok(format!(
            "{}\n{}",
            response,
            format!("({:.2?})", elapsed).dimmed()
        ))
    }

    fn cmd_get(&mut self, args: &[String]) -> Result<String> {
        let [key] = args else {
            return Err(anyhow::anyhow!("Usage: GET key"));
        };

        let value = self.cache.get(key)?;
        Ok(format!("\"{}\"", value))
    }

    fn cmd_put(&mut self, args: &[String]) -> Result<String> {
        let [key, value] = args else {
            return Err(anyhow::anyhow!("Usage: PUT key value"));
        };

        self.cache.put(key.clone(), value.clone())?;
        Ok("OK".green().to_string())
    }

    fn cmd_put_at(&mut self, args: &[String]) -> Result<String> {
        let [level, key, value] = args else {
            return Err(anyhow::anyhow!("Usage: PUTAT level key value"));
        };

        let level: usize = level
            .parse()
            .with_context(|| format!("Invalid level: {}", level))?;
        self.cache.put_at(level, key.clone(), value.clone())?;
        Ok("OK".green().to_string())
    }

    fn cmd_add_tier(&mut self, args: &[String]) -> Result<String> {
        let [capacity, policy] = args else {
            return Err(anyhow::anyhow!("Usage: ADDTIER capacity LRU|LFU"));
        };

        let capacity: usize = capacity
            .parse()
            .with_context(|| format!("Invalid capacity: {}", capacity))?;
        self.cache.add_tier_named(capacity, policy)?;
        Ok(format!(
            "{} (level {})",
            "OK".green(),
            self.cache.tier_count()
        ))
    }

    fn cmd_remove_tier(&mut self, args: &[String]) -> Result<String> {
        let [level] = args else {
            return Err(anyhow::anyhow!("Usage: RMTIER level"));
        };

        let level: usize = level
            .parse()
            .with_context(|| format!("Invalid level: {}", level))?;
        self.cache.remove_tier(level)?;
        Ok("OK".green().to_string())
    }

    fn cmd_show(&self) -> String {
        if self.cache.is_empty() {
            return "(no tiers)".yellow().to_string();
        }
        self.cache.snapshot().to_string()
    }

    fn cmd_stats(&self) -> String {
        let stats = self.cache.stats();

        let mut output = Vec::new();
        output.push("# Chain".to_string());
        output.push(format!("tiers: {}", self.cache.tier_count()));
        output.push(format!("gets: {}", stats.gets));
        output.push(format!("puts: {}", stats.puts));
        output.push(format!("promotions: {}", stats.promotions));
        output.push(format!("origin_loads: {}", stats.origin_loads));
        output.push(format!("origin_failures: {}", stats.origin_failures));
        output.push(format!("hit_rate: {:.2}%", stats.hit_rate() * 100.0));

        for (i, tier) in stats.tiers.iter().enumerate() {
            output.push(String::new());
            output.push(format!("# L{}", i + 1));
            output.push(format!("hits: {}", tier.hits));
            output.push(format!("misses: {}", tier.misses));
            output.push(format!("inserts: {}", tier.inserts));
            output.push(format!("evictions: {}", tier.evictions));
            output.push(format!("hit_rate: {:.2}%", tier.hit_rate() * 100.0));
        }

        output.join("\n")
    }

    fn cmd_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.cache.snapshot())?)
    }

    fn help_text(&self) -> String {
        format!(
            r#"{}

{}
  GET key                    Read key, promoting it or loading it from origin
  PUT key value              Write key into L1 only
  PUTAT level key value      Write key into one tier only (warm a slower tier)

{}
  ADDTIER capacity policy    Append a tier (policy: LRU or LFU)
  RMTIER level               Remove the tier at 1-based level

{}
  SHOW                       Display every tier's contents
  STATS                      Hit/miss/eviction counters
  JSON                       Snapshot as JSON
  HELP                       Show this help message
  QUIT                       Exit the CLI
"#,
            "tierchain CLI - Available Commands".bold().cyan(),
            "Cache Commands:".bold(),
            "Topology Commands:".bold(),
            "Inspection Commands:".bold(),
        )
    }
}

/// Replays the reference walkthrough: three writes, a read, an eviction, a promotion
const DEMO_SCRIPT: &[&[&str]] = &[
    &["PUT", "A", "1"],
    &["PUT", "B", "2"],
    &["PUT", "C", "3"],
    &["GET", "A"],
    &["PUT", "D", "4"],
    &["GET", "C"],
    &["SHOW"],
];

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ChainConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ChainConfig::default(),
    };
    init_tracing(&config.logging);

    let mut session = Session::new(&config)?;

    if args.demo {
        for step in DEMO_SCRIPT {
            let cmd_args: Vec<String> = step[1..].iter().map(|s| s.to_string()).collect();
            info!("{} {}", step[0].bold(), cmd_args.join(" "));
            let output = session.execute_command(step[0], &cmd_args)?;
            info!("{}", output);
        }
        return Ok(());
    }

    // Check if running in command mode or interactive mode
    if !args.command.is_empty() {
        let cmd = &args.command[0];
        let cmd_args: Vec<String> = args.command[1..].to_vec();

        match session.execute_command(cmd, &cmd_args) {
            Ok(output) => {
                info!("{}", output);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "{}", format!("Error: {}", e).red());
                std::process::exit(1);
            }
        }
    } else {
        run_interactive(session)
    }
}

fn run_interactive(mut session: Session) -> Result<()> {
    info!(
        "{}",
        format!("tierchain CLI v{}", env!("CARGO_PKG_VERSION"))
            .bold()
            .cyan()
    );
    info!("Chain ready with {} tiers", session.cache.tier_count());
    info!("Type {} for available commands\n", "HELP".bold());

    let mut rl = DefaultEditor::new()?;

    loop {
        let prompt = format!(
            "{}> ",
            format!("tierchain [{} tiers]", session.cache.tier_count()).green()
        );
        let readline = rl.readline(&prompt);

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                rl.add_history_entry(&line)?;

                let parts: Vec<String> = line.split_whitespace().map(String::from).collect();
                let cmd = &parts[0];
                let args = &parts[1..];

                if cmd.to_uppercase() == "QUIT" || cmd.to_uppercase() == "EXIT" {
                    info!("Goodbye!");
                    break;
                }

                match session.execute_command(cmd, args) {
                    Ok(output) => info!("{}", output),
                    Err(e) => {
                        error!(error = %e, "{}", format!("Error: {}", e).red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                info!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                info!("Goodbye!");
                break;
            }
            Err(err) => {
                error!(error = ?err, "Readline error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn session() -> Session {
        colored::control::set_override(false);
        Session::new(&ChainConfig::default()).unwrap()
    }

    #[test]
    fn test_demo_script_runs() {
        let mut session = session();
        for step in DEMO_SCRIPT {
            session.execute_command(step[0], &args(&step[1..])).unwrap();
        }

        let shown = session.cmd_show();
        assert!(shown.starts_with("Level 1:\nLRU Cache:\n  Key: C, Value: 3\n"));
        assert!(shown.contains("Level 2:\nLFU Cache:\n"));
    }

    #[test]
    fn test_get_miss_uses_fallback() {
        let mut session = session();
        let output = session.cmd_get(&args(&["nope"])).unwrap();
        assert_eq!(output, "\"Value from main memory\"");
    }

    #[test]
    fn test_usage_and_domain_errors() {
        let mut session = session();

        assert!(session.cmd_get(&[]).is_err());
        assert!(session.cmd_put(&args(&["only-key"])).is_err());
        assert!(session.cmd_add_tier(&args(&["3", "XYZ"])).is_err());
        assert!(session.cmd_add_tier(&args(&["three", "LRU"])).is_err());
        assert!(session.cmd_remove_tier(&args(&["0"])).is_err());
        assert!(session.execute_command("BOGUS", &[]).is_err());
        assert_eq!(session.cache.tier_count(), 2);
    }

    #[test]
    fn test_topology_commands() {
        let mut session = session();
        session.cmd_add_tier(&args(&["8", "LFU"])).unwrap();
        assert_eq!(session.cache.tier_count(), 3);

        session.cmd_remove_tier(&args(&["1"])).unwrap();
        session.cmd_remove_tier(&args(&["1"])).unwrap();
        session.cmd_remove_tier(&args(&["1"])).unwrap();
        assert_eq!(session.cmd_show(), "(no tiers)");
        assert!(session.cmd_get(&args(&["a"])).is_err());
    }

    #[test]
    fn test_json_snapshot() {
        let mut session = session();
        session.cmd_put(&args(&["A", "1"])).unwrap();
        session.cmd_put_at(&args(&["2", "B", "2"])).unwrap();

        let json: serde_json::Value = serde_json::from_str(&session.cmd_json().unwrap()).unwrap();
        assert_eq!(json["tiers"][0]["policy"], "LRU");
        assert_eq!(json["tiers"][0]["entries"][0]["key"], "A");
        assert!(json["tiers"][0]["entries"][0].get("frequency").is_none());
        assert_eq!(json["tiers"][1]["entries"][0]["frequency"], 1);
    }
}
