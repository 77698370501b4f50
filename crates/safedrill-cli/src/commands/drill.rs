use std::time::Duration;

use clap::Subcommand;
use safedrill_core::{
    AlarmSignal, Config, Drill, DrillCatalog, DrillController, DrillEngine, Event, PlayState,
    SilentAlarm, SystemClock, Ticker, TimeSource, Transition,
};
use tokio::time::MissedTickBehavior;

use crate::siren::TerminalSiren;

#[derive(Subcommand)]
pub enum DrillAction {
    /// List available drills
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the steps of a drill
    Show {
        /// Disaster type (e.g. "earthquake", "fire")
        kind: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a drill, printing events as JSON lines
    Run {
        /// Disaster type (e.g. "earthquake", "fire")
        kind: String,
        /// Feed synthetic ticks instead of waiting on the clock
        #[arg(long)]
        simulate: bool,
        /// Run without the siren
        #[arg(long)]
        no_siren: bool,
    },
}

fn lookup<'a>(catalog: &'a DrillCatalog, kind: &str) -> &'a Drill {
    if catalog.find(kind).is_none() {
        tracing::warn!(kind, fallback = safedrill_core::drill::FALLBACK_KIND, "unknown drill kind");
    }
    catalog.get(kind)
}

/// Print the transition's events, followed by a full snapshot whenever a new
/// step became current.
fn emit<A: AlarmSignal>(
    controller: &DrillController<A>,
    t: &Transition,
) -> Result<(), Box<dyn std::error::Error>> {
    for event in &t.events {
        println!("{}", serde_json::to_string(event)?);
    }
    if t
        .events
        .iter()
        .any(|e| matches!(e, Event::StepAdvanced { .. }))
    {
        println!("{}", serde_json::to_string(&controller.engine().snapshot())?);
    }
    Ok(())
}

pub fn run(action: DrillAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let catalog = config.catalog()?;

    match action {
        DrillAction::List { json } => {
            if json {
                let rows: Vec<_> = catalog
                    .drills()
                    .iter()
                    .map(|d| {
                        serde_json::json!({
                            "id": d.id(),
                            "name": d.name(),
                            "steps": d.len(),
                            "total_duration_ms": d.total_duration_ms(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for d in catalog.drills() {
                    println!(
                        "{:<12} {:<12} {} steps, {:.1}s",
                        d.id(),
                        d.name(),
                        d.len(),
                        d.total_duration_ms() as f64 / 1000.0
                    );
                }
            }
        }
        DrillAction::Show { kind, json } => {
            let drill = lookup(&catalog, &kind);
            if json {
                println!("{}", serde_json::to_string_pretty(drill)?);
            } else {
                println!("{} Drill", drill.name());
                for (i, step) in drill.steps().iter().enumerate() {
                    println!(
                        "{}. {} ({}s) - {}",
                        i + 1,
                        step.title,
                        step.duration_secs(),
                        step.description
                    );
                    if !step.safety_note.is_empty() {
                        println!("   Safety: {}", step.safety_note);
                    }
                }
            }
        }
        DrillAction::Run {
            kind,
            simulate,
            no_siren,
        } => {
            let mut options = config.drill_options();
            if no_siren {
                options.alarm_enabled = false;
            }
            let engine = DrillEngine::with_options(lookup(&catalog, &kind).clone(), options);
            let interval_ms = config.drill.tick_interval_ms;

            let mut engine = if simulate {
                let mut controller = DrillController::new(engine, SilentAlarm::default());
                simulate_run(&mut controller, interval_ms)?;
                controller.into_parts().0
            } else {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?;
                let controller = DrillController::new(engine, TerminalSiren::new());
                runtime
                    .block_on(realtime_run(controller, interval_ms))?
                    .into_parts()
                    .0
            };

            if engine.play_state() == PlayState::Completed {
                let award = engine.award(&config.scoring_policy())?;
                println!("{}", serde_json::to_string(&award)?);
            }
        }
    }
    Ok(())
}

/// Drive the drill to completion with fixed synthetic ticks.
fn simulate_run<A: AlarmSignal>(
    controller: &mut DrillController<A>,
    interval_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let t = controller.play();
    emit(controller, &t)?;
    while controller.status().play_state == PlayState::Running {
        let t = controller.tick(interval_ms);
        emit(controller, &t)?;
    }
    Ok(())
}

/// Drive the drill from the wall clock. Ctrl-C resets the drill.
async fn realtime_run(
    mut controller: DrillController<TerminalSiren>,
    interval_ms: u64,
) -> Result<DrillController<TerminalSiren>, Box<dyn std::error::Error>> {
    let mut ticker = Ticker::new(SystemClock);
    let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let t = controller.play();
    emit(&controller, &t)?;
    ticker.resume();

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                ticker.halt();
                tracing::info!("interrupted, resetting drill");
                let t = controller.reset();
                emit(&controller, &t)?;
                break;
            }
            _ = interval.tick() => {
                if let Some(elapsed) = ticker.sample() {
                    let t = controller.tick(elapsed);
                    emit(&controller, &t)?;
                }
                if controller.status().play_state != PlayState::Running {
                    ticker.halt();
                    break;
                }
                let now = ticker.clock().now_ms();
                controller.alarm_mut().pulse(now);
            }
        }
    }
    Ok(controller)
}
