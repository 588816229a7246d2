//! Glitchlock CLI
//!
//! Usage:
//!   glitchlock                               # Interactive puzzle session
//!   glitchlock --config engine.json          # Session with custom tunables
//!   glitchlock --json                        # JSON output per event
//!   glitchlock --serve --addr 0.0.0.0:3000   # Account/progress API server
//!
//! Interactive input, one per line:
//!   0.1 0.2 9.8        accelerometer sample (m/s²)
//!   speed 3.2          scalar speed sample
//!   scan | decrypt ..  terminal command
//!   say let me in      voice transcript
//!   open camera        open a module
//!   challenge compass  show a gated module's puzzle
//!   home               back to the home grid
//!   grant motion       answer a permission prompt (grant/deny)
//!   status             current screen state
//!   quit

use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::time::Instant;

use glitchlock::config::EngineConfig;
use glitchlock::core::{run_server, NavOutcome, NarrativeOutput, PuzzleScreen, SensorView, TriggerParser};
use glitchlock::types::{ModuleId, Permission, PermissionKind, SensorSample, TickOutput};
use glitchlock::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "glitchlock",
    version = VERSION,
    about = "Glitchlock - compromised-device puzzle engine",
    long_about = "Glitchlock drives the sensor-to-state pipeline and narrative engine of the\n\
                  compromised-device puzzle.\n\n\
                  Shake the device past the unlock threshold to open gated modules while\n\
                  the infection advances through seven glitch levels.\n\n\
                  Modes:\n  \
                  --interactive  Feed samples and commands from stdin (default)\n  \
                  --serve        Account and progress API server"
)]
struct Args {
    /// Interactive mode - read samples and commands from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// JSON engine config (missing fields keep defaults)
    #[arg(short, long)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show plot geometry after each sample
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    if args.serve {
        return run_server(&args.addr).await;
    }

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    if !args.interactive {
        log::debug!("no mode given, defaulting to interactive");
    }
    run_interactive(config, &args)?;
    Ok(())
}

/// Input line, parsed
enum Input<'a> {
    Sample(SensorSample),
    Voice(&'a str),
    Open(ModuleId),
    Challenge(ModuleId),
    Home,
    Permission(PermissionKind, Permission),
    Status,
    Command(&'a str),
}

fn parse_input(line: &str, now_ms: i64) -> Result<Input<'_>, String> {
    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or_default().to_lowercase();
    let rest: Vec<&str> = words.collect();

    match head.as_str() {
        "speed" => {
            let value = rest
                .first()
                .and_then(|v| v.parse::<f64>().ok())
                .ok_or("usage: speed <value>")?;
            Ok(Input::Sample(SensorSample::speed(value, now_ms)))
        }
        "say" => Ok(Input::Voice(line[3..].trim())),
        "open" | "challenge" => {
            let module = rest
                .first()
                .and_then(|m| ModuleId::parse(m))
                .ok_or_else(|| format!("unknown module, expected one of {:?}", ModuleId::ALL.map(|m| m.name())))?;
            if head == "open" {
                Ok(Input::Open(module))
            } else {
                Ok(Input::Challenge(module))
            }
        }
        "home" => Ok(Input::Home),
        "status" => Ok(Input::Status),
        "grant" | "deny" => {
            let kind = match rest.first().map(|k| k.to_lowercase()).as_deref() {
                Some("camera") => PermissionKind::Camera,
                Some("microphone") | Some("mic") => PermissionKind::Microphone,
                Some("motion") => PermissionKind::Motion,
                _ => return Err("usage: grant|deny camera|microphone|motion".to_string()),
            };
            let answer = if head == "grant" { Permission::Granted } else { Permission::Denied };
            Ok(Input::Permission(kind, answer))
        }
        _ => {
            let axes: Vec<f64> = line
                .split_whitespace()
                .map_while(|v| v.parse::<f64>().ok())
                .collect();
            match axes.as_slice() {
                [x, y, z] if line.split_whitespace().count() == 3 => {
                    Ok(Input::Sample(SensorSample::axes(*x, *y, *z, now_ms)))
                }
                _ => Ok(Input::Command(line)),
            }
        }
    }
}

/// Run an interactive puzzle session
fn run_interactive(config: EngineConfig, args: &Args) -> io::Result<()> {
    let parser = TriggerParser::new();
    let mut screen = PuzzleScreen::new(config.clone());
    screen.mount();

    print_header(&config);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut last_frame = Instant::now();

    loop {
        print!("{}", format_prompt(&screen, args.no_color));
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        // Wall-clock time between lines drives the narrative timer and fade
        let elapsed = last_frame.elapsed().as_millis() as u64;
        last_frame = Instant::now();
        for output in screen.on_frame(elapsed) {
            print_narrative(&output, args);
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let now_ms = chrono::Utc::now().timestamp_millis();
        match parse_input(line, now_ms) {
            Ok(Input::Sample(sample)) => {
                if let Some(output) = screen.on_sample(sample) {
                    print_tick(&output, args);
                    if args.verbose {
                        print_sensor_view(&screen.sensor_view());
                    }
                }
            }
            Ok(Input::Voice(transcript)) => match parser.parse_voice(transcript) {
                Some(trigger) => {
                    if let Some(phrase) = parser.matched_phrase(transcript) {
                        println!("{}", format!("  heard: \"{}\"", phrase).dimmed());
                    }
                    if let Some(output) = screen.on_trigger(trigger) {
                        print_narrative(&output, args);
                    }
                }
                None => println!("{}", "  ...static...".dimmed()),
            },
            Ok(Input::Open(module)) => print_nav(&screen.open(module), args),
            Ok(Input::Challenge(module)) => print_nav(&screen.challenge(module), args),
            Ok(Input::Home) => print_nav(&screen.go_home(), args),
            Ok(Input::Permission(kind, answer)) => {
                screen.set_permission(kind, answer);
                println!("  {:?} permission: {:?}", kind, answer);
            }
            Ok(Input::Status) => print_status(&screen, args),
            Ok(Input::Command(cmd)) => match parser.parse_command(cmd) {
                Some(trigger) => {
                    if let Some(output) = screen.on_trigger(trigger) {
                        print_narrative(&output, args);
                    }
                }
                None => println!("{}", format!("  command not found: {}", cmd).yellow()),
            },
            Err(msg) => println!("{}", format!("  ⚠ {}", msg).yellow()),
        }
    }

    screen.exit();
    println!(
        "\nSession ended. Samples: {} | Level: {}",
        screen.pipeline().total_samples(),
        screen.narrative().level()
    );
    Ok(())
}

/// Print header
fn print_header(config: &EngineConfig) {
    let rule = "════════════════════════════════════════════════════════";
    println!("{}", rule.bold());
    println!("{}", format!("  GLITCHLOCK v{}", VERSION).bold().red());
    println!("{}", rule.bold());
    println!(
        "Shake past {:.2}{} to unlock {:?}. Type 'quit' to exit.",
        config.unlock_threshold,
        config.unit,
        config.gated_modules.iter().map(|m| m.name()).collect::<Vec<_>>()
    );
    println!();
}

fn format_prompt(screen: &PuzzleScreen, no_color: bool) -> String {
    let level = screen.narrative().level();
    let state = screen.navigator().state();
    if no_color {
        format!("[{} {}] > ", level, state)
    } else if screen.directive().danger_tint {
        format!("{} > ", format!("[{} {}]", level, state).red().bold())
    } else {
        format!("{} > ", format!("[{} {}]", level, state).green())
    }
}

fn print_tick(output: &TickOutput, args: &Args) {
    if args.json {
        print_json(output);
    } else if args.no_color {
        println!("{}", output.to_parseable_string());
    } else {
        println!("{}", output.to_terminal_string());
        if output.just_unlocked {
            println!("{}", "  ✓ LOCK BROKEN - gated modules released".green().bold());
        }
    }
}

fn print_narrative(output: &NarrativeOutput, args: &Args) {
    if args.json {
        print_json(output);
    } else if args.no_color {
        println!("{}", output.to_parseable_string());
    } else {
        println!("{}", output.to_terminal_string());
        if output.changed && output.directive.audio_cue {
            println!("{}", "  ♪ alarm".magenta());
        }
    }
}

fn print_nav(outcome: &NavOutcome, args: &Args) {
    if args.json {
        print_json(outcome);
    } else if args.no_color {
        println!("state={} | changed={} | reason={}", outcome.state, outcome.changed, outcome.reason.code());
    } else if outcome.reason.is_noop() {
        println!("{}", format!("  {} ({})", outcome.reason.description(), outcome.reason.code()).yellow());
    } else {
        println!("  → {}", outcome.state.to_string().cyan());
    }
}

fn print_sensor_view(view: &SensorView) {
    match view {
        SensorView::Plot(plot) => {
            println!(
                "  plot {}x{:.0} [{:.2}..{:.2}] {} points stroke={}",
                plot.width,
                plot.height,
                plot.min,
                plot.max,
                plot.points.len(),
                plot.band.hex()
            );
            println!("  {}", plot.to_svg_path().dimmed());
        }
        other => {
            if let Some(reason) = other.reason() {
                println!("  sensor view: {}", reason);
            }
        }
    }
}

fn print_status(screen: &PuzzleScreen, args: &Args) {
    let nav = screen.navigator();
    if args.json {
        let status = serde_json::json!({
            "level": screen.narrative().level(),
            "state": nav.state(),
            "home_enabled": nav.home_enabled(),
            "unlocked": screen.pipeline().unlock_state(),
            "unlocked_modules": nav.unlocked_modules(),
            "terminal": screen.terminal_text(),
        });
        println!("{}", status);
        return;
    }
    println!("  level:    {}", screen.narrative().level());
    println!("  state:    {}", nav.state());
    println!("  home:     {}", if nav.home_enabled() { "enabled" } else { "disabled" });
    println!("  unlocked: {}", screen.pipeline().unlock_state().is_unlocked);
    for module in ModuleId::ALL {
        println!(
            "    {:<9} gated={} available={} content={:?}",
            module.name(),
            nav.is_gated(module),
            nav.is_available(module),
            nav.content(module)
        );
    }
    println!("  terminal: {}", screen.terminal_text());
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("failed to serialize output: {}", e),
    }
}
