use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use server_api::{claim_item, create_item, list_items, ApiContext, DEFAULT_LIST_LIMIT};
use shared::{domain::ItemId, protocol::CreateItemForm};
use storage::{ClaimUpdate, Storage};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/lostfound.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    ListItems {
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: u32,
    },
    CreateItem {
        title: String,
        #[arg(long = "type", default_value = "LOST")]
        item_type: String,
        #[arg(long)]
        contact_name: String,
        #[arg(long)]
        contact_phone: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        location: String,
    },
    ClaimItem {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;
    let mut ctx = ApiContext::new(storage);

    match cli.command {
        Command::ListItems { limit } => {
            ctx.list_limit = limit;
            let items = list_items(&ctx).await.map_err(|e| anyhow!(e.message))?;
            for item in items {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    item.id,
                    item.item_type,
                    item.status,
                    item.date_reported.to_rfc3339(),
                    item.title
                );
            }
        }
        Command::CreateItem {
            title,
            item_type,
            contact_name,
            contact_phone,
            description,
            location,
        } => {
            let form = CreateItemForm {
                title: Some(title),
                description: Some(description),
                item_type: Some(item_type),
                location: Some(location),
                contact_name: Some(contact_name),
                contact_phone: Some(contact_phone),
            };
            let item = create_item(&ctx, &form)
                .await
                .map_err(|e| anyhow!(e.message))?;
            println!("created item_id={}", item.id);
        }
        Command::ClaimItem { id } => {
            let update = claim_item(&ctx, ItemId(id))
                .await
                .map_err(|e| anyhow!(e.message))?;
            match update {
                ClaimUpdate::AlreadyClaimed => println!("item_id={id} was already claimed"),
                _ => println!("claimed item_id={id}"),
            }
        }
    }

    Ok(())
}
