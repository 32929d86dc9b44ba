use anyhow::Context;
use bizadvisor_core::client::{HttpRecommendationApi, RecommendationClient};
use bizadvisor_core::dashboard::{DashboardController, DashboardView};
use bizadvisor_core::domain::form::{LoginForm, RecommendationForm, SignupForm};
use bizadvisor_core::history::SearchHistoryStore;
use bizadvisor_core::notify::Notifier;
use bizadvisor_core::session::SessionStore;
use bizadvisor_core::storage::{FileStore, KeyValueStore};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

#[derive(Debug, Parser)]
#[command(name = "bizadvisor", about = "Business recommendation dashboard")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in. Any well-formed credentials are accepted.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create a local account and sign in.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    Logout,

    /// Show the signed-in user.
    Whoami,

    /// Ask the recommendation service for a business opportunity.
    Recommend {
        #[arg(long)]
        industry: String,

        /// Available investment budget.
        #[arg(long, default_value = "50000")]
        budget: String,

        #[arg(long)]
        location: String,

        /// Print the full detail view instead of the summary card.
        #[arg(long)]
        details: bool,
    },

    /// List the most recent searches, oldest first.
    History,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let settings = bizadvisor_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    match run(args.command, &settings).await {
        Ok(code) => Ok(code),
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            Err(err)
        }
    }
}

async fn run(
    command: Command,
    settings: &bizadvisor_core::config::Settings,
) -> anyhow::Result<ExitCode> {
    let data_dir = settings.resolve_data_dir()?;
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&data_dir)?);
    let notifier: Arc<dyn Notifier> = Arc::new(render::TerminalNotifier);
    let session = SessionStore::open(store.clone(), notifier.clone());

    match command {
        Command::Login { email, password } => {
            let form = LoginForm { email, password };
            form.validate()?;
            if !session.login(&form.email, &form.password) {
                return Ok(ExitCode::FAILURE);
            }
            if let Some(user) = session.current_user() {
                println!("Signed in as {} <{}>", user.name, user.email);
            }
        }
        Command::Signup {
            name,
            email,
            password,
        } => {
            let form = SignupForm {
                name,
                email,
                password,
            };
            form.validate()?;
            if !session.signup(&form.email, &form.password, &form.name) {
                return Ok(ExitCode::FAILURE);
            }
            println!("Account created. Signed in as {}", form.name);
        }
        Command::Logout => {
            session.logout();
            println!("Signed out");
        }
        Command::Whoami => {
            let state = session.state();
            match (&state.user, &state.error) {
                (Some(user), _) => println!("{}", render::user(user)),
                (None, Some(error)) => println!("Not signed in ({error})"),
                (None, None) => println!("Not signed in"),
            }
        }
        Command::Recommend {
            industry,
            budget,
            location,
            details,
        } => {
            if session.current_user().is_none() {
                anyhow::bail!("not signed in; run `bizadvisor login` first");
            }

            let request = RecommendationForm {
                industry,
                budget,
                location,
            }
            .validate_and_into_request()?;

            let api = HttpRecommendationApi::from_settings(settings)
                .context("failed to set up recommendation service client")?;
            let mut dashboard = DashboardController::new(
                RecommendationClient::new(Arc::new(api)),
                SearchHistoryStore::new(store.clone()),
                notifier.clone(),
            );

            let outcome = dashboard.submit(request).await;

            if details {
                let first_id = dashboard.state().recommendations.first().map(|r| r.id.clone());
                if let Some(id) = first_id {
                    dashboard.select(&id);
                }
            }
            print_view(dashboard.view());

            if outcome.is_err() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::History => {
            let history = SearchHistoryStore::new(store.clone());
            println!("{}", render::history(&history.get_search_history()));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_view(view: DashboardView<'_>) {
    match view {
        DashboardView::Loading => println!("Analyzing market data and generating recommendations..."),
        DashboardView::Detail(recommendation) => println!("{}", render::details(recommendation)),
        DashboardView::List {
            recommendations,
            market_trend,
            industry,
        } => {
            if !recommendations.is_empty() {
                println!("Recommended Business Opportunities\n");
                for recommendation in recommendations {
                    println!("{}", render::card(recommendation));
                }
            }
            if let Some(trend) = market_trend {
                let title = format!("{} - Market Growth Trends", industry.unwrap_or("Market"));
                println!("{}", render::trend(&title, &trend.trend));
            }
        }
    }
}

fn init_sentry(settings: &bizadvisor_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
