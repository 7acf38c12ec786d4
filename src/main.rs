//! Doselog CLI - personal dosing and vial-inventory tracker
//!
//! Usage: doselog <COMMAND>
//!
//! Commands:
//!   log       Record a dose drawn from a vial
//!   undo      Remove a dose record and restore the vial's content
//!   history   List recorded doses
//!   vial      Manage the vial inventory
//!   weight    Record body weight and track target progress
//!   cycle     Configure per-compound dose intervals
//!   schedule  Show the projected next dose per compound
//!   status    Ledger overview

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use doselog::schedule::{project, Urgency};
use doselog::store::{default_state_path, StateStore};
use doselog::{catalog, clamped_progress, Compound, LedgerState};

/// Doselog - personal dosing and vial-inventory tracker
#[derive(Parser, Debug)]
#[command(name = "doselog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output machine-readable JSON lines
    #[arg(long, default_value = "false")]
    json: bool,

    /// Path to the state file (default: ~/.doselog/state.json)
    #[arg(long)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record a dose drawn from a vial
    Log {
        /// Compound identifier (mounjaro, tesamorelin, retatrutide)
        compound: String,

        /// Dose amount in mg
        dose: f64,

        /// Vial to draw from
        #[arg(long)]
        vial: Option<u64>,

        /// Dose date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Remove a dose record and restore the vial's content
    Undo {
        /// Record id to remove
        id: u64,
    },

    /// List recorded doses
    History {
        /// Restrict to one compound
        compound: Option<String>,
    },

    /// Manage the vial inventory
    #[command(subcommand)]
    Vial(VialCommands),

    /// Record body weight and track target progress
    #[command(subcommand)]
    Weight(WeightCommands),

    /// Configure per-compound dose intervals
    #[command(subcommand)]
    Cycle(CycleCommands),

    /// Show the projected next dose per compound
    Schedule,

    /// Ledger overview
    Status,
}

#[derive(Subcommand, Debug)]
enum VialCommands {
    /// Register a new vial
    Add {
        /// Compound identifier
        compound: String,

        /// Vial size in mg
        size: f64,
    },

    /// List vials, optionally for one compound
    List {
        compound: Option<String>,

        /// Only vials with content left
        #[arg(long)]
        available: bool,
    },

    /// Correct a vial's remaining content
    Set {
        /// Vial id
        id: u64,

        /// New remaining amount in mg
        remaining: f64,
    },

    /// Delete a vial (remaining content is forfeited)
    Rm {
        /// Vial id
        id: u64,
    },
}

#[derive(Subcommand, Debug)]
enum WeightCommands {
    /// Record a weight observation
    Add {
        /// Weight in kg
        weight: f64,

        /// Observation date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Remove a weight record
    Rm {
        /// Record id
        id: u64,
    },

    /// Set or clear the target weight
    Target {
        /// Target weight in kg
        value: Option<f64>,

        /// Clear the target
        #[arg(long)]
        clear: bool,
    },

    /// Show trend statistics
    Stats,
}

#[derive(Subcommand, Debug)]
enum CycleCommands {
    /// Override the dose interval for a compound
    Set {
        /// Compound identifier
        compound: String,

        /// Interval in days
        days: u32,
    },

    /// Show effective intervals for all compounds
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = match cli.state {
        Some(path) => path,
        None => default_state_path().context("could not determine home directory")?,
    };
    let store = StateStore::new(path);
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Log {
            compound,
            dose,
            vial,
            date,
        } => cmd_log(&store, &compound, dose, vial, date.unwrap_or(today), cli.json),
        Commands::Undo { id } => cmd_undo(&store, id, cli.json),
        Commands::History { compound } => cmd_history(&store, compound.as_deref(), cli.json),
        Commands::Vial(cmd) => match cmd {
            VialCommands::Add { compound, size } => {
                cmd_vial_add(&store, &compound, size, today, cli.json)
            }
            VialCommands::List {
                compound,
                available,
            } => cmd_vial_list(&store, compound.as_deref(), available, cli.json),
            VialCommands::Set { id, remaining } => cmd_vial_set(&store, id, remaining, cli.json),
            VialCommands::Rm { id } => cmd_vial_rm(&store, id, cli.json),
        },
        Commands::Weight(cmd) => match cmd {
            WeightCommands::Add { weight, date } => {
                cmd_weight_add(&store, weight, date.unwrap_or(today), cli.json)
            }
            WeightCommands::Rm { id } => cmd_weight_rm(&store, id, cli.json),
            WeightCommands::Target { value, clear } => {
                cmd_weight_target(&store, value, clear, cli.json)
            }
            WeightCommands::Stats => cmd_weight_stats(&store, cli.json),
        },
        Commands::Cycle(cmd) => match cmd {
            CycleCommands::Set { compound, days } => cmd_cycle_set(&store, &compound, days, cli.json),
            CycleCommands::List => cmd_cycle_list(&store, cli.json),
        },
        Commands::Schedule => cmd_schedule(&store, today, cli.json),
        Commands::Status => cmd_status(&store, today, cli.json),
    }
}

/// Persist the state, reporting a failure without reverting the mutation.
/// The in-memory state is the source of truth; the file is best-effort.
fn save_state(store: &StateStore, state: &LedgerState) {
    if let Err(e) = store.save(state) {
        eprintln!("⚠ Failed to save state to {}: {}", store.path().display(), e);
    }
}

fn parse_compound(name: &str) -> Result<Compound> {
    Ok(name.parse::<Compound>()?)
}

fn cmd_log(
    store: &StateStore,
    compound: &str,
    dose: f64,
    vial: Option<u64>,
    date: NaiveDate,
    json: bool,
) -> Result<()> {
    let compound = parse_compound(compound)?;
    let mut state = store.load_or_default();

    let vial = match vial {
        Some(id) => Some(id),
        // with exactly one candidate vial there is nothing to choose
        None => {
            let mut available = state.inventory.list_available(compound);
            match (available.next(), available.next()) {
                (Some(v), None) => Some(v.id),
                _ => None,
            }
        }
    };

    let record_id = state.admit(date, compound, dose, vial)?;
    save_state(store, &state);

    let remaining = vial.and_then(|id| state.inventory.get(id)).map(|v| v.remaining);
    if json {
        let output = serde_json::json!({
            "event": "log",
            "id": record_id,
            "compound": compound.to_string(),
            "dose": dose,
            "date": date.to_string(),
            "vialRemaining": remaining,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("💉 Recorded {}mg {} on {}", dose, catalog::get(compound).name, date);
        if let Some(remaining) = remaining {
            println!("   Vial has {:.1}mg left", remaining);
        }
    }

    Ok(())
}

fn cmd_undo(store: &StateStore, id: u64, json: bool) -> Result<()> {
    let mut state = store.load_or_default();
    let revoked = state.revoke(id)?;
    save_state(store, &state);

    if json {
        let output = serde_json::json!({
            "event": "undo",
            "id": revoked.record.id,
            "compound": revoked.record.compound.to_string(),
            "dose": revoked.record.dose,
            "capacityRestored": revoked.capacity_restored,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "↩ Removed {}mg {} dose from {}",
            revoked.record.dose,
            catalog::get(revoked.record.compound).name,
            revoked.record.date
        );
        if !revoked.capacity_restored {
            println!(
                "⚠ Vial {} no longer exists - its content was not restored",
                revoked.record.vial_id
            );
        }
    }

    Ok(())
}

fn cmd_history(store: &StateStore, compound: Option<&str>, json: bool) -> Result<()> {
    let state = store.load_or_default();
    let compound = compound.map(parse_compound).transpose()?;

    let records: Vec<_> = state
        .injections
        .all()
        .iter()
        .filter(|r| compound.is_none_or(|c| r.compound == c))
        .collect();

    if json {
        for record in &records {
            let output = serde_json::json!({
                "event": "injection",
                "id": record.id,
                "date": record.date.to_string(),
                "compound": record.compound.to_string(),
                "dose": record.dose,
                "vialId": record.vial_id,
            });
            println!("{}", serde_json::to_string(&output)?);
        }
    } else if records.is_empty() {
        println!("No doses recorded.");
    } else {
        for record in &records {
            println!(
                "  #{:<4} {}  {:>6}mg  {}",
                record.id,
                record.date,
                record.dose,
                catalog::get(record.compound).name
            );
        }
    }

    Ok(())
}

fn cmd_vial_add(
    store: &StateStore,
    compound: &str,
    size: f64,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let compound = parse_compound(compound)?;
    let def = catalog::get(compound);
    if size > 0.0 && !def.vial_sizes.contains(&size) && !def.allows_custom_vial {
        anyhow::bail!(
            "{} vials come in {:?} mg; custom sizes are not supported for this compound",
            def.name,
            def.vial_sizes
        );
    }

    let mut state = store.load_or_default();
    let vial_id = state.add_vial(compound, size, today)?;
    save_state(store, &state);

    if json {
        let output = serde_json::json!({
            "event": "vial-add",
            "id": vial_id,
            "compound": compound.to_string(),
            "totalCapacity": size,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("📦 Registered {}mg {} vial (#{})", size, def.name, vial_id);
    }

    Ok(())
}

fn cmd_vial_list(
    store: &StateStore,
    compound: Option<&str>,
    available: bool,
    json: bool,
) -> Result<()> {
    let state = store.load_or_default();
    let compound = compound.map(parse_compound).transpose()?;

    let vials: Vec<_> = state
        .inventory
        .all()
        .iter()
        .filter(|v| compound.is_none_or(|c| v.compound == c))
        .filter(|v| !available || v.remaining > 0.0)
        .collect();

    if json {
        for vial in &vials {
            let output = serde_json::json!({
                "event": "vial",
                "id": vial.id,
                "compound": vial.compound.to_string(),
                "totalCapacity": vial.total,
                "remaining": vial.remaining,
                "addedDate": vial.added.to_string(),
            });
            println!("{}", serde_json::to_string(&output)?);
        }
        return Ok(());
    }

    if vials.is_empty() {
        println!("No vials registered.");
        return Ok(());
    }

    for vial in &vials {
        println!(
            "  #{:<4} {:<12} {:>6.1}mg / {:>6.1}mg  {:>3.0}%  (added {})",
            vial.id,
            catalog::get(vial.compound).name,
            vial.remaining,
            vial.total,
            vial.fill_fraction() * 100.0,
            vial.added
        );
    }
    for c in Compound::ALL {
        let total = state.inventory.total_by_compound(c);
        if total > 0.0 {
            println!("  {} total: {:.1}mg", catalog::get(c).name, total);
        }
    }

    Ok(())
}

fn cmd_vial_set(store: &StateStore, id: u64, remaining: f64, json: bool) -> Result<()> {
    let mut state = store.load_or_default();
    state.inventory.set_remaining(id, remaining)?;
    save_state(store, &state);

    if json {
        let output = serde_json::json!({
            "event": "vial-set",
            "id": id,
            "remaining": remaining,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("✎ Vial #{} set to {:.1}mg remaining", id, remaining);
    }

    Ok(())
}

fn cmd_vial_rm(store: &StateStore, id: u64, json: bool) -> Result<()> {
    let mut state = store.load_or_default();
    let removed = state.inventory.delete_vial(id)?;
    let orphaned = state
        .injections
        .all()
        .iter()
        .filter(|r| r.vial_id == id)
        .count();
    save_state(store, &state);

    if json {
        let output = serde_json::json!({
            "event": "vial-rm",
            "id": id,
            "forfeited": removed.remaining,
            "orphanedRecords": orphaned,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "🗑 Deleted vial #{} ({:.1}mg forfeited)",
            id, removed.remaining
        );
        if orphaned > 0 {
            println!(
                "⚠ {} dose record(s) still reference this vial; undoing them will not restore content",
                orphaned
            );
        }
    }

    Ok(())
}

fn cmd_weight_add(store: &StateStore, weight: f64, date: NaiveDate, json: bool) -> Result<()> {
    let mut state = store.load_or_default();
    let id = state.next_id();
    state.weights.record(id, date, weight)?;
    save_state(store, &state);

    if json {
        let output = serde_json::json!({
            "event": "weight-add",
            "id": id,
            "date": date.to_string(),
            "weight": weight,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("⚖ Recorded {:.1}kg on {}", weight, date);
        if let Ok(net) = state.weights.net_change() {
            println!("   Net change since start: {:+.1}kg", net);
        }
    }

    Ok(())
}

fn cmd_weight_rm(store: &StateStore, id: u64, json: bool) -> Result<()> {
    let mut state = store.load_or_default();
    let removed = state.weights.remove(id)?;
    save_state(store, &state);

    if json {
        let output = serde_json::json!({
            "event": "weight-rm",
            "id": id,
            "date": removed.date.to_string(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("🗑 Removed weight record #{} ({})", id, removed.date);
    }

    Ok(())
}

fn cmd_weight_target(
    store: &StateStore,
    value: Option<f64>,
    clear: bool,
    json: bool,
) -> Result<()> {
    let mut state = store.load_or_default();
    if clear {
        state.target_weight = None;
    } else {
        let value = value.context("provide a target weight or --clear")?;
        if !value.is_finite() || value <= 0.0 {
            anyhow::bail!("target weight must be a positive number");
        }
        state.target_weight = Some(value);
    }
    save_state(store, &state);

    if json {
        let output = serde_json::json!({
            "event": "weight-target",
            "target": state.target_weight,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        match state.target_weight {
            Some(t) => println!("🎯 Target weight set to {:.1}kg", t),
            None => println!("🎯 Target weight cleared"),
        }
    }

    Ok(())
}

fn cmd_weight_stats(store: &StateStore, json: bool) -> Result<()> {
    use doselog::LedgerError;

    let state = store.load_or_default();
    if state.weights.is_empty() {
        if json {
            println!("{}", serde_json::json!({ "event": "weight-stats", "records": 0 }));
        } else {
            println!("No weight records.");
        }
        return Ok(());
    }

    let start = state.weights.start()?;
    let current = state.weights.current()?;
    let net = state.weights.net_change()?;
    let percent = state.weights.percent_change()?;

    // progress is undefined when the target equals the start weight;
    // surface that instead of a bogus percentage
    let progress = match state.target_weight {
        Some(target) => match state.weights.progress_toward(target) {
            Ok(raw) => Some(Ok(raw)),
            Err(LedgerError::DegenerateTarget { .. }) => Some(Err(())),
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    if json {
        let output = serde_json::json!({
            "event": "weight-stats",
            "records": state.weights.all().len(),
            "start": start.weight,
            "current": current.weight,
            "netChange": net,
            "percentChange": percent,
            "target": state.target_weight,
            "progress": progress.and_then(|p| p.ok()),
            "progressUndefined": matches!(progress, Some(Err(()))),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("⚖ Weight");
        println!("  Start:   {:.1}kg ({})", start.weight, start.date);
        println!("  Current: {:.1}kg ({})", current.weight, current.date);
        println!("  Change:  {:+.1}kg ({:+.1}%)", net, percent);
        match progress {
            Some(Ok(raw)) => {
                if let Some(target) = state.target_weight {
                    println!(
                        "  Target:  {:.1}kg - {:.0}% there ({:.1}% raw)",
                        target,
                        clamped_progress(raw),
                        raw
                    );
                }
            }
            Some(Err(())) => println!("  Target equals start weight - progress undefined"),
            None => {}
        }
    }

    Ok(())
}

fn cmd_cycle_set(store: &StateStore, compound: &str, days: u32, json: bool) -> Result<()> {
    let compound = parse_compound(compound)?;
    if days == 0 {
        anyhow::bail!("cycle length must be at least 1 day");
    }

    let mut state = store.load_or_default();
    state.cycles.insert(compound, days);
    save_state(store, &state);

    if json {
        let output = serde_json::json!({
            "event": "cycle-set",
            "compound": compound.to_string(),
            "days": days,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "🔁 {} now every {} day(s)",
            catalog::get(compound).name,
            days
        );
    }

    Ok(())
}

fn cmd_cycle_list(store: &StateStore, json: bool) -> Result<()> {
    let state = store.load_or_default();

    for compound in Compound::ALL {
        let def = catalog::get(compound);
        let days = state.cycle_days(compound);
        let overridden = state.cycles.contains_key(&compound);
        if json {
            let output = serde_json::json!({
                "event": "cycle",
                "compound": compound.to_string(),
                "days": days,
                "default": def.default_cycle_days,
                "overridden": overridden,
            });
            println!("{}", serde_json::to_string(&output)?);
        } else {
            let marker = if overridden { " (override)" } else { "" };
            println!("  {:<12} every {} day(s){}", def.name, days, marker);
        }
    }

    Ok(())
}

fn cmd_schedule(store: &StateStore, today: NaiveDate, json: bool) -> Result<()> {
    let state = store.load_or_default();
    let projections = project(&state, today);

    if json {
        for p in &projections {
            let output = serde_json::json!({
                "event": "projection",
                "compound": p.compound.to_string(),
                "nextDue": p.next_due.to_string(),
                "daysUntil": p.days_until,
            });
            println!("{}", serde_json::to_string(&output)?);
        }
        return Ok(());
    }

    if projections.is_empty() {
        println!("No doses recorded yet - nothing to project.");
        return Ok(());
    }

    println!("📅 Next doses (today is {})", today);
    for p in &projections {
        let name = catalog::get(p.compound).name;
        match p.urgency() {
            Urgency::DueNow if p.days_until < 0 => {
                println!("  🔴 {:<12} overdue by {} day(s)", name, -p.days_until)
            }
            Urgency::DueNow => println!("  🔴 {:<12} due today", name),
            Urgency::Soon => {
                println!("  🟡 {:<12} due {} ({} day(s))", name, p.next_due, p.days_until)
            }
            Urgency::Later => {
                println!("  🟢 {:<12} due {} ({} day(s))", name, p.next_due, p.days_until)
            }
        }
    }

    Ok(())
}

fn cmd_status(store: &StateStore, today: NaiveDate, json: bool) -> Result<()> {
    let state = store.load_or_default();
    let projections = project(&state, today);

    if json {
        let output = serde_json::json!({
            "event": "status",
            "injections": state.injections.all().len(),
            "vials": state.inventory.all().len(),
            "weights": state.weights.all().len(),
            "target": state.target_weight,
            "due": projections.iter().filter(|p| p.days_until <= 0).count(),
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("💉 Doselog");
    println!(
        "  {} dose(s), {} vial(s), {} weight record(s)",
        state.injections.all().len(),
        state.inventory.all().len(),
        state.weights.all().len()
    );
    for compound in Compound::ALL {
        let total = state.inventory.total_by_compound(compound);
        if total > 0.0 {
            println!(
                "  {:<12} {:.1}mg in stock",
                catalog::get(compound).name,
                total
            );
        }
    }
    let due: Vec<_> = projections.iter().filter(|p| p.days_until <= 0).collect();
    if !due.is_empty() {
        println!();
        for p in due {
            println!("  🔴 {} is due", catalog::get(p.compound).name);
        }
    }

    Ok(())
}
