use anyhow::{bail, Context};
use clap::ArgAction;
use tracing::{debug, instrument};

use mediashelf_client::{render_table, ApiClient, ItemFilter, NewItemRequest, DEFAULT_API_URL};
use mediashelf_core::ItemId;

#[derive(Debug, clap::Parser)]
#[command(version, about = "Browse and edit the media catalogue")]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Base URL of the mediashelf API
    #[arg(long, env = "MEDIASHELF_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let client = ApiClient::new(self.api_url);
        debug!(api_url = client.base_url(), "using API");
        self.command.run(&client).await
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout is reserved for the table.
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// List items, sorted by title
    List(List),

    /// Add a new item
    Add(Add),

    /// Delete an item by id
    Delete(Delete),
}

impl Command {
    async fn run(self, client: &ApiClient) -> anyhow::Result<()> {
        match self {
            Self::List(cmd) => cmd.run(client).await,
            Self::Add(cmd) => cmd.run(client).await,
            Self::Delete(cmd) => cmd.run(client).await,
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct List {
    /// Case-insensitive match against title or author
    #[arg(short, long)]
    query: Option<String>,

    /// Only show one type (book, magazine, film)
    #[arg(short = 't', long = "type")]
    item_type: Option<String>,
}

impl List {
    #[instrument(skip(client))]
    async fn run(self, client: &ApiClient) -> anyhow::Result<()> {
        let filter = ItemFilter {
            query: self.query,
            item_type: self.item_type,
        };
        let items = client.list(&filter).await.context("failed to list items")?;
        print!("{}", render_table(&items));
        Ok(())
    }
}

#[derive(Debug, clap::Args)]
pub struct Add {
    /// book, magazine or film
    #[arg(short = 't', long = "type")]
    item_type: String,

    #[arg(long)]
    title: String,

    #[arg(short, long)]
    author: Option<String>,

    #[arg(short, long)]
    year: Option<i64>,
}

impl Add {
    #[instrument(skip(client))]
    async fn run(self, client: &ApiClient) -> anyhow::Result<()> {
        let request = NewItemRequest {
            item_type: self.item_type,
            title: self.title,
            author: self.author,
            year: self.year,
        };
        let item = client.create(&request).await.context("failed to add item")?;
        print!("{}", render_table(std::slice::from_ref(&item)));
        Ok(())
    }
}

#[derive(Debug, clap::Args)]
pub struct Delete {
    /// Id of the item to remove
    id: ItemId,
}

impl Delete {
    #[instrument(skip(client))]
    async fn run(self, client: &ApiClient) -> anyhow::Result<()> {
        if !client.delete(self.id).await.context("failed to delete item")? {
            bail!("no item with id {}", self.id);
        }
        println!("deleted item {}", self.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_add_with_optionals() {
        let cli = Cli::try_parse_from([
            "mediashelf", "add", "--type", "book", "--title", "Dune", "--year", "1965",
        ])
        .unwrap();
        let Command::Add(add) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(add.item_type, "book");
        assert_eq!(add.title, "Dune");
        assert_eq!(add.author, None);
        assert_eq!(add.year, Some(1965));
    }

    #[test]
    fn delete_rejects_non_positive_ids() {
        assert!(Cli::try_parse_from(["mediashelf", "delete", "0"]).is_err());
        assert!(Cli::try_parse_from(["mediashelf", "delete", "abc"]).is_err());

        let cli = Cli::try_parse_from(["mediashelf", "-vv", "delete", "3"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Delete(Delete { id }) if id.get() == 3));
    }

    #[test]
    fn api_url_flag_overrides_default() {
        let cli = Cli::try_parse_from(["mediashelf", "--api-url", "http://shelf:9000", "list"]).unwrap();
        assert_eq!(cli.api_url, "http://shelf:9000");
    }
}
