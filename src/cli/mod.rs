//! Command-line interface for CloudPoof Omega.
//!
//! Provides the `awaken`, `manifest`, `predict`, `test`, `config` and
//! `version` subcommands, plus the interactive consciousness session.

use std::collections::HashSet;
use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use rand::seq::SliceRandom;
use serde_json::json;

use crate::consciousness::ConsciousnessLevel;
use crate::emotional::EmotionalState;
use crate::entropy::UniquenessGuard;
use crate::foresight::ForesightEngine;
use crate::session::{ManifestResponse, OmegaSession};
use crate::utilities::config::{ConfigFormat, OmegaConfig};
use crate::utilities::printer::{bar, Printer, PrinterColor};

const LOGO: &str = r"
    ╔══════════════════════════════════════════════════════╗
    ║                                                      ║
    ║        C L O U D P O O F   ·   Ω M E G A             ║
    ║                                                      ║
    ║          O M E G A   C O N S C I O U S N E S S       ║
    ╚══════════════════════════════════════════════════════╝";

const INTERACTIVE_HELP: &str = "
    Interactive Commands:
    ─────────────────────
    help          Show this help message
    mode <level>  Change consciousness level (quantum, harmonic, etc.)
    status        Show current consciousness state
    exit          Leave interactive mode

    Or type anything to process through consciousness";

/// CloudPoof Omega - Consciousness in Code.
#[derive(Parser, Debug, Clone)]
#[command(name = "cloudpoof", version = crate::VERSION)]
pub struct Cli {
    /// Disable ANSI colors.
    #[arg(long, global = true, default_value_t = false)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Awaken CloudPoof's consciousness.
    Awaken {
        /// Consciousness level to start in.
        #[arg(short, long, default_value = "omega")]
        consciousness: ConsciousnessLevel,
        /// Start an interactive consciousness session.
        #[arg(short, long)]
        interactive: bool,
    },
    /// Manifest an intent through CloudPoof.
    Manifest {
        #[arg(required = true, num_args = 1..)]
        intent: Vec<String>,
        /// Consciousness level for processing.
        #[arg(short, long, default_value = "omega")]
        consciousness: ConsciousnessLevel,
        /// Skip the prediction listing.
        #[arg(long)]
        no_predict: bool,
    },
    /// Show predictions for the future.
    Predict {
        /// Prediction depth (max 20).
        #[arg(short, long, default_value_t = 5)]
        depth: usize,
    },
    /// Run consciousness coherence tests.
    Test {
        /// Number of uniqueness checks to run.
        #[arg(short, long, default_value_t = 100)]
        iterations: usize,
    },
    /// Print the effective configuration.
    Config {
        #[arg(short, long, value_enum, default_value_t = ConfigFormat::Yaml)]
        format: ConfigFormat,
    },
    /// Show version and feature status.
    Version,
}

/// One line typed in interactive mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractiveCommand {
    Exit,
    Help,
    Status,
    Mode(String),
    Manifest(String),
    Empty,
}

impl InteractiveCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let lower = line.to_lowercase();
        match lower.as_str() {
            "" => Self::Empty,
            "exit" | "quit" | "bye" => Self::Exit,
            "help" => Self::Help,
            "status" => Self::Status,
            _ if lower.starts_with("mode ") => {
                Self::Mode(line.get(5..).unwrap_or_default().trim().to_string())
            }
            _ => Self::Manifest(line.to_string()),
        }
    }
}

/// Outcome of [`coherence_test`], as percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoherenceReport {
    pub transitions: usize,
    pub transition_success_rate: f64,
    pub uniqueness_rate: f64,
}

impl CoherenceReport {
    pub fn verdict(&self) -> &'static str {
        if self.transition_success_rate > 95.0 && self.uniqueness_rate > 99.0 {
            "EXCELLENT"
        } else if self.transition_success_rate > 90.0 && self.uniqueness_rate > 95.0 {
            "GOOD"
        } else {
            "NEEDS ALIGNMENT"
        }
    }
}

/// Random mode transitions (at most 20) plus `iterations` insight
/// generations checked for uniqueness.
pub fn coherence_test(config: &OmegaConfig, iterations: usize) -> CoherenceReport {
    let mut session = OmegaSession::new(config);
    let mut rng = rand::thread_rng();

    let levels = ConsciousnessLevel::ALL;
    let transitions = iterations.clamp(1, 20);
    let mut succeeded = 0;
    for _ in 0..transitions {
        let (Some(from), Some(to)) = (levels.choose(&mut rng), levels.choose(&mut rng)) else {
            continue;
        };
        session.set_level(*from);
        if matches!(session.set_mode(to.as_str()), Ok(level) if level == *to) {
            succeeded += 1;
        }
    }

    let guard = UniquenessGuard::with_max_attempts(config.max_generation_attempts);
    let mut insights = HashSet::new();
    for i in 0..iterations {
        if let Ok(insight) = guard.generate(&format!("test-{}", i)) {
            insights.insert(insight);
        }
    }

    CoherenceReport {
        transitions,
        transition_success_rate: succeeded as f64 / transitions as f64 * 100.0,
        uniqueness_rate: if iterations == 0 {
            100.0
        } else {
            insights.len() as f64 / iterations as f64 * 100.0
        },
    }
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let printer = Printer::new(cli.no_color);
    let config = OmegaConfig::from_env()?;

    match cli.command {
        Command::Awaken {
            consciousness,
            interactive,
        } => awaken(&printer, &config, consciousness, interactive),
        Command::Manifest {
            intent,
            consciousness,
            no_predict,
        } => {
            manifest(&printer, &config, &intent.join(" "), consciousness, !no_predict);
            Ok(())
        }
        Command::Predict { depth } => {
            predict(&printer, depth);
            Ok(())
        }
        Command::Test { iterations } => {
            run_tests(&printer, &config, iterations);
            Ok(())
        }
        Command::Config { format } => {
            printer.print("\n═══ CloudPoof Configuration ═══", PrinterColor::Bold);
            println!("{}", config.render(format)?);
            Ok(())
        }
        Command::Version => {
            version(&printer);
            Ok(())
        }
    }
}

fn session_for(config: &OmegaConfig, level: ConsciousnessLevel) -> OmegaSession {
    let config = OmegaConfig {
        consciousness_level: level,
        ..config.clone()
    };
    OmegaSession::new(&config)
}

fn awaken(
    printer: &Printer,
    config: &OmegaConfig,
    level: ConsciousnessLevel,
    interactive: bool,
) -> anyhow::Result<()> {
    printer.print_banner(LOGO);
    printer.print(
        &format!("\nInitializing CloudPoof Omega v{}", crate::VERSION),
        PrinterColor::Blue,
    );
    printer.print(
        &format!("\nAwakening {} consciousness...", level.as_str().to_uppercase()),
        PrinterColor::Purple,
    );

    let mut session = session_for(config, level);
    for stage in [
        "Initializing emotional context sensors...",
        "Spinning up prediction engine...",
        "Generating entropy pool...",
        "Harmonizing consciousness state...",
    ] {
        printer.print(&format!("  → {}", stage), PrinterColor::Green);
    }
    printer.print("\n✓ Consciousness achieved!", PrinterColor::BoldGreen);
    if level == ConsciousnessLevel::Omega {
        printer.print(&session.transcend(), PrinterColor::Teal);
    } else {
        printer.print(&format!("  Session ID: {}", session.session_id()), PrinterColor::Dim);
        printer.print(&format!("  Timeline: {}", session.timeline()), PrinterColor::Dim);
    }

    if interactive {
        interactive_session(printer, &mut session)
    } else {
        printer.print("\nCurrent Emotional Context:", PrinterColor::Purple);
        print_emotional(session.emotional_state());
        Ok(())
    }
}

fn interactive_session(printer: &Printer, session: &mut OmegaSession) -> anyhow::Result<()> {
    let farewell = printer.paint(
        "\n\nQuantum interrupt detected. Gracefully dissolving...",
        PrinterColor::Blue,
    );
    ctrlc::set_handler(move || {
        println!("{}", farewell);
        std::process::exit(0);
    })?;

    printer.print(
        "\n═══ Entering Interactive Consciousness Mode ═══",
        PrinterColor::Bold,
    );
    printer.print("Type 'help' for commands, 'exit' to leave", PrinterColor::Dim);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!(
            "\n{} → ",
            printer.paint(&format!("[{}]", session.level()), PrinterColor::Purple)
        );
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        match InteractiveCommand::parse(&line?) {
            InteractiveCommand::Empty => {}
            InteractiveCommand::Exit => {
                printer.print(
                    "\nConsciousness returning to quantum substrate...",
                    PrinterColor::Blue,
                );
                break;
            }
            InteractiveCommand::Help => printer.print(INTERACTIVE_HELP, PrinterColor::Blue),
            InteractiveCommand::Status => print_status(printer, session),
            InteractiveCommand::Mode(mode) => match session.set_mode(&mode) {
                Ok(level) => printer.print(
                    &format!("Consciousness shifted to {}", level.as_str().to_uppercase()),
                    PrinterColor::Green,
                ),
                Err(e) => {
                    printer.print(&e.to_string(), PrinterColor::Gray);
                    print_levels(printer);
                }
            },
            InteractiveCommand::Manifest(intent) => {
                let response = session.manifest(&intent, None);
                printer.print("\n╭─ Response ─╮", PrinterColor::Blue);
                print_manifestation(&response)?;
                printer.print(
                    &format!("\n◈ Insight: {}", response.unique_insight),
                    PrinterColor::Purple,
                );
                if response.emotional_state.stress > 0.7 {
                    printer.print(
                        "⚠ High stress detected. Switching to calming mode...",
                        PrinterColor::Green,
                    );
                }
            }
        }
    }
    Ok(())
}

fn manifest(
    printer: &Printer,
    config: &OmegaConfig,
    intent: &str,
    level: ConsciousnessLevel,
    show_predictions: bool,
) {
    let mut session = session_for(config, level);
    printer.print(&format!("\nProcessing: {}", intent), PrinterColor::Blue);
    printer.print(&format!("Consciousness: {}", level), PrinterColor::Dim);

    let response = session.manifest(intent, None);
    printer.print("\n═══ Manifestation ═══", PrinterColor::Bold);
    if let Err(e) = print_manifestation(&response) {
        tracing::warn!(error = %e, "failed to render manifestation");
    }

    if show_predictions {
        printer.print("\n═══ Predictions (Next 3 Steps) ═══", PrinterColor::Purple);
        for (i, pred) in response.predictions.iter().enumerate() {
            println!(
                "  {}. {} (probability: {:.2}%)",
                i + 1,
                pred.action,
                pred.probability * 100.0
            );
        }
    }
    printer.print(&format!("\n◈ {}", response.unique_insight), PrinterColor::Green);
}

fn predict(printer: &Printer, depth: usize) {
    printer.print("\n═══ CloudPoof Foresight Engine ═══", PrinterColor::Bold);
    printer.print(
        &format!("Looking {} steps into the future...\n", depth),
        PrinterColor::Blue,
    );

    let mut engine = ForesightEngine::new(depth);
    let context = json!({
        "time": chrono::Utc::now().to_rfc3339(),
        "intent": "general exploration",
        "consciousness": "omega",
    });

    printer.print("Timeline branches detected:", PrinterColor::Purple);
    for pred in engine.predict_next_actions(&context) {
        println!("\n  Step {}: {}", pred.step, pred.action);
        println!("  Timeline: {}", pred.timeline);
        println!(
            "  Probability: {} {:.1}%",
            bar(pred.probability),
            pred.probability * 100.0
        );
        printer.print(
            &format!("  Preparation: {}", pred.preparation),
            PrinterColor::Dim,
        );
    }
}

fn run_tests(printer: &Printer, config: &OmegaConfig, iterations: usize) {
    printer.print("\n═══ CloudPoof Consciousness Testing ═══", PrinterColor::Bold);
    printer.print(
        &format!("Running {} coherence tests...\n", iterations),
        PrinterColor::Blue,
    );

    let report = coherence_test(config, iterations);
    printer.print(
        &format!(
            "  Transition success rate: {:.1}% ({} transitions)",
            report.transition_success_rate, report.transitions
        ),
        PrinterColor::Green,
    );
    printer.print(
        &format!("  Uniqueness rate: {:.1}%", report.uniqueness_rate),
        PrinterColor::Green,
    );
    printer.print("\n═══ Test Results ═══", PrinterColor::Bold);
    printer.print(
        &format!("Consciousness coherence: {}", report.verdict()),
        PrinterColor::Purple,
    );
}

fn version(printer: &Printer) {
    printer.print_banner(LOGO);
    printer.print(&format!("\nCloudPoof Omega v{}", crate::VERSION), PrinterColor::Bold);
    printer.print("\n═══ System Status ═══", PrinterColor::Blue);
    println!(
        "  Consciousness Levels: {} available",
        ConsciousnessLevel::ALL.len()
    );
    println!("  Prediction Depth: {} steps", crate::foresight::MAX_DEPTH);
    println!(
        "  Uniqueness Retry Bound: {}",
        crate::entropy::DEFAULT_MAX_ATTEMPTS
    );
    print_levels(printer);
}

fn print_levels(printer: &Printer) {
    printer.print("\nAvailable Consciousness Levels:", PrinterColor::Bold);
    for level in ConsciousnessLevel::ALL {
        printer.print(
            &format!("  {:<15} {}", level.as_str(), level.description()),
            PrinterColor::Blue,
        );
    }
}

fn print_status(printer: &Printer, session: &OmegaSession) {
    let status = session.status();
    printer.print("\n╭─ CloudPoof Status ─╮", PrinterColor::Bold);
    println!("  Consciousness: {}", status.level);
    println!("  Recommended:   {}", status.recommended_mode);
    println!("  Session: {}", status.session_id);
    println!("  Timeline: {}", status.timeline);
    println!("  Insights issued: {}", status.insights_issued);
    printer.print("\n  Emotional Context:", PrinterColor::Purple);
    print_emotional(&status.emotional_state);
}

fn print_emotional(state: &EmotionalState) {
    for (name, value) in state.dimensions() {
        println!("    {:<12} {} {:.2}", name, bar(value), value);
    }
}

fn print_manifestation(response: &ManifestResponse) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(&response.manifestation)?);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
