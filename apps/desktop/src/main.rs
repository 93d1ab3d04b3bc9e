use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    sort::sort_page, ContactDraft, ContactPage, ContactsClient, ContactsHandle, HttpContactsApi,
    SaveRequest,
};
use shared::{
    domain::{ContactField, ContactId, SortConfig, SortDirection},
    protocol::Contact,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "contacts_desktop", about = "Manage contacts from the command line")]
struct Args {
    /// Contacts API base URL; overrides contacts.toml and environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one page of contacts.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, value_enum, default_value_t = SortColumn::FirstName)]
        sort: SortColumn,
        #[arg(long)]
        desc: bool,
        #[arg(long)]
        json: bool,
    },
    Create(ContactFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: ContactFields,
    },
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Args, Debug)]
struct ContactFields {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    job_title: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SortColumn {
    FirstName,
    LastName,
    Email,
    Phone,
    Company,
    JobTitle,
}

impl From<SortColumn> for ContactField {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::FirstName => ContactField::FirstName,
            SortColumn::LastName => ContactField::LastName,
            SortColumn::Email => ContactField::Email,
            SortColumn::Phone => ContactField::Phone,
            SortColumn::Company => ContactField::Company,
            SortColumn::JobTitle => ContactField::JobTitle,
        }
    }
}

impl ContactFields {
    fn into_draft(self, id: Option<ContactId>) -> Result<ContactDraft> {
        let draft = ContactDraft {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            company: self.company.unwrap_or_default(),
            job_title: self.job_title.unwrap_or_default(),
        };
        if let Some(field) = draft.missing_required() {
            bail!("{} is required", field.label());
        }
        Ok(draft)
    }
}

fn render_table(contacts: &[Contact]) -> String {
    let mut columns: Vec<Vec<String>> = ContactField::ALL
        .iter()
        .map(|field| vec![field.label().to_string()])
        .collect();
    let mut ids = vec!["ID".to_string()];
    for contact in contacts {
        ids.push(contact.id.to_string());
        for (column, field) in columns.iter_mut().zip(ContactField::ALL) {
            column.push(contact.field_value(field).to_string());
        }
    }
    columns.insert(0, ids);

    let widths: Vec<usize> = columns
        .iter()
        .map(|column| column.iter().map(|cell| cell.chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in 0..=contacts.len() {
        let line: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| format!("{:<width$}", column[row], width = *width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn page_summary(page: &ContactPage) -> String {
    format!(
        "Page {} of {} ({} contacts)",
        page.page,
        page.total_pages.max(1),
        page.total
    )
}

fn confirm_delete(id: &ContactId, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
    write!(
        out,
        "Are you sure you want to delete this contact? ({id}) [y/N] "
    )?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

async fn run(
    client: &impl ContactsHandle,
    command: Command,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::List {
            page,
            sort,
            desc,
            json,
        } => {
            let direction = if desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            let mut page = client.load_page(page).await?;
            page.contacts = sort_page(&page.contacts, SortConfig::new(sort.into(), direction));
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&page)?)?;
            } else if page.contacts.is_empty() {
                writeln!(out, "No contacts found.")?;
                writeln!(out, "{}", page_summary(&page))?;
            } else {
                write!(out, "{}", render_table(&page.contacts))?;
                writeln!(out, "{}", page_summary(&page))?;
            }
        }
        Command::Create(fields) => {
            let payload = fields.into_draft(None)?.to_payload();
            let created = client.save_contact(SaveRequest::Create(payload)).await?;
            match created {
                Some(contact) => writeln!(out, "Created {} ({})", contact.display_name(), contact.id)?,
                None => writeln!(out, "Contact created")?,
            }
        }
        Command::Update { id, fields } => {
            let id = ContactId::new(id);
            let payload = fields.into_draft(Some(id.clone()))?.to_payload();
            let updated = client
                .save_contact(SaveRequest::Update {
                    id: id.clone(),
                    payload,
                })
                .await?;
            match updated {
                Some(contact) => writeln!(out, "Updated {} ({})", contact.display_name(), contact.id)?,
                None => writeln!(out, "Updated contact {id}")?,
            }
        }
        Command::Delete { id, yes } => {
            let id = ContactId::new(id);
            if !yes && !confirm_delete(&id, input, out)? {
                writeln!(out, "Delete cancelled")?;
                return Ok(());
            }
            match client.delete_contact(&id).await {
                Ok(()) => writeln!(out, "Deleted contact {id}")?,
                Err(err) if err.is_not_found() => bail!("contact {id} does not exist"),
                Err(err) => return Err(err.into()),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let settings = client_core::load_settings().with_api_base_url(args.api_url);
    tracing::info!(api = %settings.api_base_url, "using contacts api");
    let api = HttpContactsApi::new(&settings).context("invalid contacts api configuration")?;
    let client = ContactsClient::new(api);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    run(&client, args.command, &mut input, &mut out).await
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
