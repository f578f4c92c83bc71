//! Engine diagnostics for the `check` command.
//!
//! Verifies that the configured engine commands exist and are executable
//! before a long dub run discovers it the hard way.

use crate::config::Config;
use std::process::Command;

/// Result of one engine check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Command exists and is executable
    Ok,
    /// No command configured for this engine
    Unconfigured,
    /// Command is not found
    NotFound,
    /// Command is found but something looks off
    Warning(String),
}

/// Check whether the program behind an engine command can be spawned.
fn check_command(argv: &Option<Vec<String>>) -> CheckResult {
    let Some(argv) = argv else {
        return CheckResult::Unconfigured;
    };
    let Some(program) = argv.first() else {
        return CheckResult::Unconfigured;
    };

    match Command::new(program).arg("--version").output() {
        Ok(output) if output.status.success() => CheckResult::Ok,
        // Many engine wrappers have no --version; existing is what matters
        Ok(_) => CheckResult::Warning(format!("'{}' found but --version failed", program)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(format!("Error checking '{}': {}", program, e)),
    }
}

/// Check every configured engine and print a human-readable report.
///
/// Returns `true` when all required engines are present.
pub fn check_engines(config: &Config) -> bool {
    let engines = [
        ("separation", &config.engines.separation, true),
        ("diarization", &config.engines.diarization, true),
        ("classification", &config.engines.classification, false),
        ("transcription", &config.engines.transcription, true),
        ("translation", &config.engines.translation, true),
        ("synthesis", &config.engines.synthesis, true),
    ];

    let mut all_ok = true;
    for (name, argv, required) in engines {
        let result = check_command(argv);
        let line = match &result {
            CheckResult::Ok => format!("  [ok]      {}", name),
            CheckResult::Unconfigured if required => {
                all_ok = false;
                format!("  [missing] {} (not configured)", name)
            }
            CheckResult::Unconfigured => {
                format!("  [--]      {} (not configured, heuristic fallback)", name)
            }
            CheckResult::NotFound => {
                all_ok = false;
                format!("  [missing] {} (command not found)", name)
            }
            CheckResult::Warning(message) => format!("  [warn]    {} ({})", name, message),
        };
        eprintln!("{}", line);
    }

    if !all_ok {
        eprintln!("\nConfigure missing engines in {}", Config::default_path().display());
    }
    all_ok
}
