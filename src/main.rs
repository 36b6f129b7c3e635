// ==========================================
// Exam Center - command line entry
// ==========================================
// Usage:
//   exam-center [db_path] <command> [exam_id]
//
// Commands:
//   init                   create the schema
//   worklist <exam_id>     placement worklist (JSON)
//   hall-plan <exam_id>    hall plan per (session, department) (JSON)
//   place <exam_id>        place and save every pair without a saved placement
//   roster <exam_id>       hall lists (CSV)
//   signatures <exam_id>   signature lists (CSV)
//
// db_path falls back to EXAM_CENTER_DB, then to the user data dir.
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use exam_center::api::RosterSheet;
use exam_center::app::{get_default_db_path, AppState};
use exam_center::engine::{thread_source, UuidGenerator};

const COMMANDS: &[&str] = &["init", "worklist", "hall-plan", "place", "roster", "signatures"];

fn usage() -> String {
    format!(
        "usage: exam-center [db_path] <{}> [exam_id]",
        COMMANDS.join("|")
    )
}

fn main() -> Result<()> {
    exam_center::logging::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let db_path = match args.first() {
        Some(first) if !COMMANDS.contains(&first.as_str()) => args.remove(0),
        _ => get_default_db_path(),
    };
    let command = args.first().cloned().ok_or_else(|| anyhow!(usage()))?;
    let exam_id = args.get(1).map(|s| s.trim().to_string());

    tracing::info!(version = exam_center::VERSION, db = %db_path, %command, "{}", exam_center::APP_NAME);

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    let require_exam = || exam_id.clone().filter(|s| !s.is_empty()).ok_or_else(|| anyhow!(usage()));

    match command.as_str() {
        "init" => {
            println!("schema ready: {}", state.db_path);
        }
        "worklist" => {
            let items = state.placement_api.list_work_items(&require_exam()?)?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        "hall-plan" => {
            let lines = state.hall_plan_api.list_hall_plan(&require_exam()?)?;
            println!("{}", serde_json::to_string_pretty(&lines)?);
        }
        "place" => {
            let report = state.placement_api.auto_place_exam(
                &require_exam()?,
                &mut thread_source(),
                &mut UuidGenerator,
            )?;
            tracing::info!("{}", report.message);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "roster" | "signatures" => {
            let sheet = if command == "roster" {
                RosterSheet::HallList
            } else {
                RosterSheet::SignatureList
            };
            let stdout = std::io::stdout();
            state
                .report_api
                .export_rosters_csv(&require_exam()?, sheet, stdout.lock())
                .context("roster export failed")?;
        }
        other => bail!("unknown command {}\n{}", other, usage()),
    }

    Ok(())
}
