use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use itertools::Itertools;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{
    integrations::{
        github::{GhCfg, Github},
        openai::{OpenAi, OpenAiCfg},
        supabase::{Supabase, SupabaseCfg},
    },
    models::AuditRecord,
    settings::Settings,
};

mod integrations;
mod models;
mod settings;

const DEFAULT_DESCRIPTION: &str =
    "Please make it possible to use the GitHub CLI to create issues.";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("issuebot=info,warn"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let settings = Settings::new()?;
    let theme = ColorfulTheme::default();

    let description: String = Input::with_theme(&theme)
        .with_prompt("Describe your issue or feature request")
        .default(DEFAULT_DESCRIPTION.to_string())
        .interact_text()?;

    let github = Github::new(&GhCfg {
        repo: settings.github.repo.clone(),
        token: settings.github.token.clone(),
    })?;

    // Snapshot taken before generation; labels added or removed on the
    // repository afterwards are not seen by this run.
    let registry = github.fetch_labels().await?;
    info!("{}: {} known labels", settings.github.repo, registry.len());
    if registry.is_empty() {
        warn!(
            "{} has no labels, any suggested label will be rejected",
            settings.github.repo
        );
    }

    let openai = OpenAi::new(&OpenAiCfg {
        api_key: settings.openai.api_key.clone(),
        model: settings.openai.model.clone(),
    });

    let draft = openai.draft_issue(&description).await?;
    draft.validate(&registry)?;

    println!("\n{}\n", draft.title);
    println!("{}\n", draft.body);
    println!("Labels: {}\n", draft.labels.iter().join(", "));

    if Confirm::with_theme(&theme)
        .with_prompt("Do you want to create the issue?")
        .default(false)
        .interact()?
    {
        let url = github.create_issue(&draft).await?;
        println!("Issue created successfully: {url}");
    } else {
        println!("Issue creation aborted.");
    }

    if Confirm::with_theme(&theme)
        .with_prompt("Do you want to log the issue in Supabase?")
        .default(false)
        .interact()?
    {
        let supabase = Supabase::new(&SupabaseCfg {
            url: settings.supabase.url.clone(),
            key: settings.supabase.key.clone(),
            table: settings.supabase.table.clone(),
        })?;

        supabase.insert(&AuditRecord::from_draft(&draft)).await?;
        println!("Issue logged successfully in Supabase.");
    } else {
        println!("Issue logging in Supabase aborted.");
    }

    Ok(())
}
