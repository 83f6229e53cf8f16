//! InkVerify CLI — thin wrapper around lock derivation
//!
//! Commands:
//!   inkverify derive  — derive a lock record for a credential pair
//!   inkverify verify  — check a credential pair against a lock
//!   inkverify audit   — sample random seeds and look for short cycles
//!   inkverify config  — show or initialise the configuration file

use inkverify_core::audit::{avalanche, probe_stability};
use inkverify_core::{Lock, LockConfig, LockError, LockPipeline, LockRecord, Seed};
use log::{info, warn};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::env;
use std::process;
use std::time::Instant;

const CONFIG_FILE: &str = "inkverify.json";

fn print_usage() {
    println!(
        r#"
InkVerify — memory-hard cellular-automaton locks

Usage: inkverify <command> [options]

Commands:
  derive  <user> <password> [width] [height] [generations]             Derive a lock record
  verify  <user> <password> <lock-hex> [width] [height] [generations]  Verify against a lock
  audit   [samples] [width] [height] [generations]                     Probe random seeds for cycles
  config  [init]                                                       Show or write {config}

Grid and generation arguments override {config} when given.

Examples:
  inkverify derive alice correct-horse 256 256 1000
  inkverify verify alice correct-horse 3f9a...e1 256 256 1000
  inkverify audit 100 64 64 1000
"#,
        config = CONFIG_FILE
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let result = match args[1].as_str() {
        "derive" => cmd_derive(&args[2..]),
        "verify" => cmd_verify(&args[2..]),
        "audit" => cmd_audit(&args[2..]),
        "config" => cmd_config(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(0)
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            Ok(2)
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, name: &str) -> Result<Option<T>, LockError> {
    match args.get(index) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| LockError::config(format!("{} must be a number, got '{}'", name, raw))),
        None => Ok(None),
    }
}

/// Load the config file and apply `[width] [height] [generations]` overrides
/// found at `args[offset..]`
fn load_config(args: &[String], offset: usize) -> Result<LockConfig, LockError> {
    let mut config = LockConfig::load_or_default(CONFIG_FILE)?;
    if let Some(width) = parse_arg(args, offset, "width")? {
        config.grid_width = width;
    }
    if let Some(height) = parse_arg(args, offset + 1, "height")? {
        config.grid_height = height;
    }
    if let Some(generations) = parse_arg(args, offset + 2, "generations")? {
        config.generation_target = generations;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_derive(args: &[String]) -> Result<i32, LockError> {
    if args.len() < 2 {
        eprintln!("Usage: inkverify derive <user> <password> [width] [height] [generations]");
        return Ok(2);
    }
    let config = load_config(args, 2)?;
    info!("Deriving lock for '{}' ({})", args[0], config.summary());

    let start = Instant::now();
    let record = LockRecord::create(args[0].as_str(), &[args[0].as_str(), args[1].as_str()], &config)?;
    let elapsed = start.elapsed();

    println!("{}", record.to_json()?);
    info!("Completed in {:.2?}", elapsed);
    Ok(0)
}

fn cmd_verify(args: &[String]) -> Result<i32, LockError> {
    if args.len() < 3 {
        eprintln!("Usage: inkverify verify <user> <password> <lock-hex> [width] [height] [generations]");
        return Ok(2);
    }
    let config = load_config(args, 3)?;
    let expected = Lock::from_hex(&args[2])?;
    let pipeline = LockPipeline::new(&config)?;

    let start = Instant::now();
    let ok = pipeline.verify(&[args[0].as_str(), args[1].as_str()], expected.as_bytes());
    info!("Verification took {:.2?}", start.elapsed());

    if ok {
        println!("MATCH");
        Ok(0)
    } else {
        println!("NO MATCH");
        Ok(1)
    }
}

fn random_credential<R: Rng>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric).take(len).map(char::from).collect()
}

fn cmd_audit(args: &[String]) -> Result<i32, LockError> {
    let samples: usize = parse_arg(args, 0, "samples")?.unwrap_or(100);
    let config = load_config(args, 1)?;
    let params = config.params()?;
    let pipeline = LockPipeline::new(&config)?;
    info!("Auditing {} random seeds ({})", samples, config.summary());

    let mut rng = rand::thread_rng();
    let mut stabilized = 0usize;
    let mut pairs = Vec::with_capacity(samples);
    let start = Instant::now();

    for i in 0..samples {
        let user = random_credential(&mut rng, 8);
        let password = random_credential(&mut rng, 16);
        let report = probe_stability(&Seed::derive(&[&user, &password]), &params, params.generations() as usize)?;
        if let Some(cycle) = report.cycle {
            stabilized += 1;
            warn!(
                "Sample {} cycled: period {} from generation {}",
                i, cycle.period, cycle.first_seen
            );
        }

        // Same password with its last character changed
        let mut edited = password.clone();
        let last = edited.pop().map(|c| if c == 'a' { 'b' } else { 'a' }).unwrap_or('a');
        edited.push(last);
        let a = pipeline.derive(&[&user, &password])?;
        let b = pipeline.derive(&[&user, &edited])?;
        pairs.push((a, b));
    }

    println!("\n  InkVerify Audit");
    println!("  {}", "=".repeat(40));
    println!("  Samples:      {}", samples);
    println!("  Stabilized:   {}", stabilized);
    println!("  Avalanche:    {:.4}", avalanche(pairs));
    println!("  Elapsed:      {:.2?}", start.elapsed());

    Ok(if stabilized == 0 { 0 } else { 1 })
}

fn cmd_config(args: &[String]) -> Result<i32, LockError> {
    if args.first().map(String::as_str) == Some("init") {
        let config = LockConfig::default();
        config.save(CONFIG_FILE)?;
        println!("  Wrote default configuration to {}", CONFIG_FILE);
        return Ok(0);
    }
    let config = LockConfig::load_or_default(CONFIG_FILE)?;
    println!("  {}", config.summary());
    println!(
        "{}",
        serde_json::to_string_pretty(&config).map_err(|e| LockError::ConfigFile(e.to_string()))?
    );
    Ok(0)
}
