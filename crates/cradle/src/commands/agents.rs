//! Cradle (agent) command handlers.

use std::sync::Arc;

use tabled::Tabled;

use cradle_core::{Agent, Monitor};

use crate::cli::{AgentsArgs, AgentsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AgentRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "UUID")]
    uuid: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Registered")]
    registered: String,
}

impl AgentRow {
    fn new(agent: &Agent, selected: Option<&str>) -> Self {
        Self {
            marker: if selected == Some(agent.uuid.as_str()) {
                "*"
            } else {
                ""
            },
            id: agent.id,
            uuid: agent.uuid.clone(),
            ip: util::or_dash(agent.ip.as_deref()),
            registered: util::or_dash(agent.created_at.as_deref()),
        }
    }
}

fn detail(agent: &Arc<Agent>) -> String {
    [
        format!("ID:         {}", agent.id),
        format!("UUID:       {}", agent.uuid),
        format!("IP:         {}", util::or_dash(agent.ip.as_deref())),
        format!("Registered: {}", util::or_dash(agent.created_at.as_deref())),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    monitor: &Monitor,
    args: AgentsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AgentsCommand::List => {
            let agents = monitor.store().agents();
            let selected = monitor.store().selected_uuid();
            let out = output::render_list(
                &global.output,
                agents.as_slice(),
                |a| AgentRow::new(a, selected.as_deref()),
                |a| a.uuid.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AgentsCommand::Add { uuid } => {
            let agent = monitor.register_agent(&uuid).await?;
            util::remember_agent(global, Some(&agent.uuid))?;
            output::note(
                &format!("✓ Cradle {} registered and selected", agent.uuid),
                global.quiet,
            );
            let out = output::render_single(&global.output, &agent, detail, |a| a.uuid.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AgentsCommand::Select { uuid } => {
            let agent = monitor.select_agent(uuid.trim()).await?;
            util::remember_agent(global, Some(&agent.uuid))?;
            output::note(&format!("✓ Selected cradle {}", agent.uuid), global.quiet);
            Ok(())
        }

        AgentsCommand::Remove { uuid } => {
            if monitor.store().agent(&uuid).is_none() {
                return Err(CliError::NotFound {
                    resource_type: "cradle".into(),
                    identifier: uuid,
                    list_command: "agents list".into(),
                });
            }
            let prompt = format!("Delete cradle {uuid} and all of its recorded data?");
            if !util::confirm(&prompt, "agents remove", global.yes)? {
                return Ok(());
            }

            let was_selected = monitor.store().selected_uuid().as_deref() == Some(uuid.as_str());
            monitor.delete_agent(&uuid).await?;
            output::note(&format!("✓ Cradle {uuid} deleted"), global.quiet);

            if was_selected {
                let next = monitor.store().selected_uuid();
                util::remember_agent(global, next.as_deref())?;
                if let Some(next) = next {
                    output::note(&format!("  Now selected: {next}"), global.quiet);
                }
            }
            Ok(())
        }
    }
}
