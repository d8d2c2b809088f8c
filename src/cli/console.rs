use async_trait::async_trait;
use colored::*;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use super::operator::{parse_verdict, OperatorSurface, Verdict};
use crate::amend::AmendConfig;
use crate::core::{AmendError, AmendResult};
use crate::graph::Interaction;
use crate::permissions::Decision;
use crate::session::SessionReport;

/// Console handles all terminal I/O with colored formatting
pub struct Console<R = BufReader<Stdin>> {
    input: Lines<R>,
}

impl Console {
    /// Create a new Console reading answers from stdin
    pub fn new() -> Self {
        Self::with_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: AsyncBufRead + Unpin + Send> Console<R> {
    /// Create a new Console reading answers from any buffered reader
    pub fn with_reader(reader: R) -> Self {
        Self {
            input: reader.lines(),
        }
    }

    /// Print a system message (progress, info, etc.)
    pub fn print_system(&self, message: &str) {
        println!("{} {}", "System:".yellow().bold(), message);
    }

    /// Print an error message
    pub fn print_error(&self, error: &str) {
        eprintln!("{} {}", "Error:".red().bold(), error);
    }

    /// Print a welcome banner
    pub fn print_banner(&self, config: &AmendConfig) {
        println!("{}", "=".repeat(60).bright_blue());
        println!("{}", "  Policy Amendment".bright_blue().bold());
        println!("{}", "=".repeat(60).bright_blue());
        println!();
        println!("Policy:   {}", config.policy_path.display());
        if config.save_path() != config.policy_path {
            println!("Output:   {}", config.save_path().display());
        }
        println!("Interval: {:?}", config.scan_interval);
        match config.timeout {
            Some(timeout) => println!("Time-out: {:?}", timeout),
            None => println!("Time-out: none"),
        }
        println!();
        println!("Answer each prompt with y or n (Enter means yes). Press Ctrl+C to finish.");
        println!();
    }

    /// Print the end-of-session summary
    pub fn print_report(&self, report: &SessionReport) {
        println!();
        println!("{}", "─".repeat(60).bright_black());
        println!(
            "{} {} ({} scans, {} accepted, {} rejected)",
            "Session finished:".bright_white().bold(),
            report.reason,
            report.scans,
            report.accepted,
            report.rejected
        );
        match &report.saved_to {
            Some(path) => println!(
                "{}",
                format!("✓ Policy saved to {}", path.display()).green()
            ),
            None => println!("{}", "Policy unchanged".bright_black()),
        }
        if report.unresolved > 0 {
            println!(
                "{}",
                format!("{} interactions left unresolved", report.unresolved).yellow()
            );
        } else {
            println!("{}", "No unresolved interactions".green());
        }
        println!("{}", "─".repeat(60).bright_black());
    }

    fn print_interaction(&self, interaction: &Interaction, current: Decision) {
        println!();
        println!("{}", "─".repeat(60).yellow());
        println!(
            "{} {} wants to {} {} {}",
            "⚠️ Permission Required".yellow().bold(),
            interaction.endpoint.to_string().cyan().bold(),
            interaction.direction,
            interaction.kind,
            interaction.resolved_name().magenta().bold()
        );
        match current {
            Decision::Deny => println!("{}", policy_status(current).red()),
            _ => println!("{}", policy_status(current).bright_black()),
        }
        println!("{}", "─".repeat(60).yellow());
    }
}

/// One-line description of what the policy currently decides
pub fn policy_status(current: Decision) -> &'static str {
    match current {
        Decision::Allow => "Currently allowed by policy",
        Decision::Deny => {
            "Currently denied by policy; an ALLOW rule will not override the existing DENY"
        }
        Decision::NotSpecified => "Not covered by the policy",
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> OperatorSurface for Console<R> {
    async fn prompt(
        &mut self,
        interaction: &Interaction,
        current: Decision,
    ) -> AmendResult<Verdict> {
        self.print_interaction(interaction, current);

        loop {
            print!("{} ", "Allow this interaction? [Y/n]:".yellow().bold());
            io::stdout().flush()?;

            let Some(line) = self.input.next_line().await? else {
                println!();
                return Err(AmendError::InputClosed);
            };

            match parse_verdict(&line) {
                Ok(Verdict::Accept) => {
                    println!("{}", "✓ Allowed".green());
                    return Ok(Verdict::Accept);
                }
                Ok(Verdict::Reject) => {
                    println!("{}", "✗ Not allowed".red());
                    return Ok(Verdict::Reject);
                }
                Err(e) => {
                    tracing::debug!("{}", e);
                    println!("{}", "Invalid choice. Please answer y or n.".red());
                }
            }
        }
    }
}
