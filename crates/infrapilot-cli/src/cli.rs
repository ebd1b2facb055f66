//! Command handlers
//!
//! Each handler calls into `infrapilot-core` and prints the resulting
//! `Display` output through the terminal renderer.

use std::{
    env,
    io::{self, Write},
};

use anyhow::{bail, Context, Result};
use infrapilot_core::{
    Credentials, ExecutionEvent, ExecutionOutcome, ExecutionPlan, PilotClient, RunSummary,
};
use log::info;

use crate::{
    args::{PlanArgs, RunArgs},
    renderer::TerminalRenderer,
};

pub struct Cli {
    client: PilotClient,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(client: PilotClient, renderer: TerminalRenderer) -> Self {
        Self { client, renderer }
    }

    pub async fn plan(&self, args: &PlanArgs) -> Result<()> {
        let plan = self.request_plan(&args.instruction, !args.live).await?;
        self.renderer.render(&plan.to_string());
        Ok(())
    }

    pub async fn run(&self, args: &RunArgs) -> Result<()> {
        let plan = self.request_plan(&args.instruction, !args.live).await?;
        self.renderer.render(&plan.to_string());

        if plan.steps.is_empty() {
            self.renderer.line("Nothing to execute.");
            return Ok(());
        }
        let prompt = format!("Execute {} steps ({})?", plan.steps.len(), plan.mode);
        if !args.yes && !confirm(&prompt).await? {
            self.renderer.line("Execution aborted.");
            return Ok(());
        }

        self.execute(plan).await
    }

    pub fn tools(&self) {
        let catalog = self.client.tool_catalog();
        let mut markdown = String::from("# Tools\n\n");
        if catalog.is_empty() {
            markdown.push_str("No tool mappings configured.\n");
        }
        for (name, tool) in catalog.iter() {
            markdown.push_str(&format!("- {name}: `{tool}`\n"));
        }
        self.renderer.render(&markdown);
    }

    async fn request_plan(&self, instruction: &str, dry_run: bool) -> Result<ExecutionPlan> {
        self.client
            .request_plan(instruction, dry_run)
            .await
            .context("Failed to request an execution plan")
    }

    async fn execute(&self, plan: ExecutionPlan) -> Result<()> {
        let mut handle = self.client.execute(plan, credentials_from_env());
        info!("Started execution {}", handle.execution_id());

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                event = handle.next_event() => match event {
                    Some(event) => self.show_event(&event),
                    None => break,
                },
                _ = &mut ctrl_c, if !handle.is_closed() => {
                    self.renderer.line("Interrupted, closing the execution stream...");
                    handle.close();
                }
            }
        }

        let report = handle.wait().await.context("Execution task failed")?;
        if let ExecutionOutcome::Completed(result) = &report.outcome {
            self.renderer.render(&result.to_string());
        }
        self.renderer.render(&RunSummary(&report).to_string());

        match report.outcome {
            ExecutionOutcome::Completed(_) | ExecutionOutcome::CompletedUnconfirmed => Ok(()),
            ExecutionOutcome::Failed(error) => {
                bail!("Execution {} failed: {error}", report.execution_id)
            }
            ExecutionOutcome::Cancelled => bail!("Execution {} was cancelled", report.execution_id),
        }
    }

    fn show_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::Failed(_) => self.renderer.error(&event.to_string()),
            // Shown in full once the run is over
            ExecutionEvent::Completed(Some(_)) => {}
            _ => self.renderer.line(&event.to_string()),
        }
    }
}

fn credentials_from_env() -> Credentials {
    let var = |name: &str| env::var(name).ok().filter(|value| !value.is_empty());
    Credentials {
        aws_access_key: var("AWS_ACCESS_KEY_ID"),
        aws_secret_key: var("AWS_SECRET_ACCESS_KEY"),
        google_api_key: var("GOOGLE_API_KEY"),
    }
}

async fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let answer = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().read_line(&mut line).map(|_| line)
    })
    .await
    .context("Failed to read confirmation")??;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
