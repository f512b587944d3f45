use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    view, ClaimOutcome, ClaimPrompt, FormField, HttpPortalService, ItemFilter, PortalController,
    CLAIM_CONFIRM_PROMPT,
};
use shared::domain::ItemId;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Report and browse lost & found items on campus")]
struct Args {
    #[arg(long, default_value = "http://localhost:8080")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the latest reported items.
    List {
        #[arg(long, default_value = "all")]
        filter: ItemFilter,
    },
    /// Report a lost or found item.
    Report {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "type", default_value = "LOST")]
        item_type: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        contact_name: String,
        #[arg(long, default_value = "")]
        contact_phone: String,
    },
    /// Mark an item as claimed.
    Claim {
        id: i64,
        /// Skip the confirmation question.
        #[arg(long)]
        yes: bool,
    },
    /// Check that the backend is reachable.
    Ping,
}

struct TerminalPrompt {
    assume_yes: bool,
}

impl ClaimPrompt for TerminalPrompt {
    fn confirm_claim(&self, item_id: ItemId) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{CLAIM_CONFIRM_PROMPT} (item #{item_id}) [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let service = HttpPortalService::new(&args.server_url)
        .with_context(|| format!("invalid --server-url '{}'", args.server_url))?;
    let service = Arc::new(service);

    let (controller, succeeded) = match args.command {
        Command::Ping => return Ok(ping_backend(&PortalController::new(service)).await),
        Command::List { filter } => {
            let mut controller = PortalController::open(service).await;
            controller.set_filter(filter);
            let succeeded = controller.state().list_error.is_none();
            (controller, succeeded)
        }
        Command::Report {
            title,
            description,
            item_type,
            location,
            contact_name,
            contact_phone,
        } => {
            let mut controller = PortalController::open(service).await;
            let fields = [
                (FormField::Title, title),
                (FormField::Description, description),
                (FormField::Type, item_type),
                (FormField::Location, location),
                (FormField::ContactName, contact_name),
                (FormField::ContactPhone, contact_phone),
            ];
            for (field, value) in &fields {
                controller
                    .update_field(*field, value)
                    .with_context(|| format!("invalid value for {field:?}"))?;
            }
            let succeeded = submit_report(&mut controller).await;
            (controller, succeeded)
        }
        Command::Claim { id, yes } => {
            let mut controller = PortalController::open(service).await;
            let succeeded = claim_item(&mut controller, ItemId(id), yes).await;
            (controller, succeeded)
        }
    };

    println!("{}", view::render_list(&controller));
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn ping_backend(controller: &PortalController) -> ExitCode {
    match controller.ping().await {
        Ok(ping) => {
            println!("{}: {}", ping.status, ping.message);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("backend unreachable: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn submit_report(controller: &mut PortalController) -> bool {
    let outcome = controller.submit().await;
    let submit = &controller.state().submit;
    if let Some(message) = submit.success_message() {
        println!("{message}");
    }
    if let Some(message) = submit.error_message() {
        eprintln!("{message}");
    }
    outcome.is_ok()
}

async fn claim_item(controller: &mut PortalController, item_id: ItemId, assume_yes: bool) -> bool {
    let prompt = TerminalPrompt { assume_yes };
    let outcome = controller.claim(item_id, &prompt).await;
    if let Some(alert) = controller.take_alert() {
        eprintln!("{alert}");
    }
    match outcome {
        Ok(ClaimOutcome::Claimed) => true,
        Ok(ClaimOutcome::Declined) => {
            println!("Claim cancelled.");
            true
        }
        Ok(ClaimOutcome::NotOffered) => {
            println!("Item #{item_id} is already claimed.");
            true
        }
        Err(_) => false,
    }
}
