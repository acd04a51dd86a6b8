//! # `restaurants`
//!
//! Command-line front end for the restaurant list. Every subcommand goes
//! through [`RestaurantApp`], so validation, confirmation and result notices
//! behave exactly as they do for any other front end.
//!
//! ```bash
//! restaurants list --page 2
//! restaurants add --name Tako --cuisine Japanese --image https://x/y.jpg \
//!     --location Tokyo --rating 5 --price '$$'
//! restaurants edit 3 --rating 4
//! restaurants delete 3 --yes
//! ```

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use tracing::{info, Instrument};

use restaurant_list::clients::CachedClient;
use restaurant_list::config::ClientConfig;
use restaurant_list::confirm::DialogKind;
use restaurant_list::form::FormField;
use restaurant_list::lifecycle::{setup_tracing, AppError, RestaurantApp};
use restaurant_list::list::RestaurantCard;
use restaurant_list::model::RestaurantId;

#[derive(Parser, Debug)]
#[command(name = "restaurants", version, about = "Save your favorite restaurants!", long_about = None)]
struct Cli {
    /// API root, e.g. http://localhost:8000
    #[arg(long, env = "API_BASE_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one page of restaurants
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show a single restaurant
    Show { id: u64 },
    /// Add a restaurant
    Add(FieldArgs),
    /// Change some fields of a restaurant
    Edit {
        id: u64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a restaurant
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    cuisine: Option<String>,
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    rating: Option<i64>,
    /// One of $, $$, $$$
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

impl FieldArgs {
    fn apply(self, app: &mut RestaurantApp) -> Result<(), AppError> {
        let text = [
            (FormField::Name, self.name),
            (FormField::CuisineType, self.cuisine),
            (FormField::ImageUrl, self.image),
            (FormField::Location, self.location),
            (FormField::PriceRange, self.price),
            (FormField::Description, self.description),
        ];
        for (field, value) in text {
            if let Some(value) = value {
                app.set_field(field, value)?;
            }
        }
        if let Some(rating) = self.rating {
            app.set_field(FormField::Rating, rating)?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    setup_tracing();
    let cli = Cli::parse();

    let config = match cli.api_url.as_deref() {
        Some(url) => ClientConfig::new(url)?,
        None => ClientConfig::from_env()?,
    };

    let mut app = RestaurantApp::start(config)?;
    let span = tracing::info_span!("command");
    let result = run(&mut app, cli.command).instrument(span).await;
    app.shutdown().await?;
    result
}

async fn run(app: &mut RestaurantApp, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List { page } => {
            let loaded = app.refresh().await;
            app.change_page(page);
            // On failure the view leads with the error banner.
            print!("{}", app.view());
            loaded?;
        }
        Command::Show { id } => {
            let record = app
                .client()
                .get(RestaurantId(id))
                .await
                .with_context(|| format!("Restaurant {id} could not be loaded"))?;
            print!("{}", RestaurantCard(&record));
        }
        Command::Add(fields) => {
            app.open_create_form();
            fields.apply(app)?;
            submit(app).await?;
        }
        Command::Edit { id, fields } => {
            let record = app.client().get(RestaurantId(id)).await?;
            app.open_edit_form(&record);
            fields.apply(app)?;
            submit(app).await?;
        }
        Command::Delete { id, yes } => {
            let record = app.client().get(RestaurantId(id)).await?;
            app.request_delete(&record)?;
            print!("{}", app.state().confirmation);
            if !yes && !ask("Type 'y' to confirm: ")? {
                app.cancel_confirmation()?;
                println!("Cancelled.");
                return Ok(());
            }
            app.confirm()?;
            app.settle().await;
            acknowledge(app)?;
        }
    }
    Ok(())
}

async fn submit(app: &mut RestaurantApp) -> anyhow::Result<()> {
    match app.submit_form() {
        Ok(()) => {}
        Err(AppError::Invalid(errors)) => {
            for (field, message) in &errors {
                eprintln!("  {field}: {message}");
            }
            bail!("Please fix the fields above");
        }
        Err(e) => return Err(e.into()),
    }
    info!("Saving restaurant");
    app.settle().await;
    acknowledge(app)
}

/// Prints the result notice, dismisses it, and fails on a warning.
fn acknowledge(app: &mut RestaurantApp) -> anyhow::Result<()> {
    let Some(dialog) = app.state().confirmation.dialog().cloned() else {
        return Ok(());
    };
    println!("{}", dialog.title);
    println!("{}", dialog.description);
    app.confirm()?;
    if dialog.kind == DialogKind::Warning {
        bail!(dialog.description);
    }
    Ok(())
}

fn ask(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
