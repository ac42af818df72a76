use clap::{Args, Parser, Subcommand};
use tracing::{info, Instrument};
use user_manager::{
    setup_tracing, ApiConfig, Backend, ConfigError, CreateUserInput, FromEnv, Submission,
    TracingNotifier, UpdateUserInput, User, UserId, UserSystem,
};

/// List, create, edit and delete users on a remote collection.
#[derive(Parser)]
#[command(name = "user-manager", version)]
struct Cli {
    /// Base URL of the user API (overrides USER_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Repository backend: server, placeholder or memory (overrides USER_API_BACKEND)
    #[arg(long, global = true)]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every user
    List,
    /// Show a single user
    Show { id: UserId },
    /// Create a user
    Create(CreateArgs),
    /// Change fields of an existing user
    Update(UpdateArgs),
    /// Delete a user
    Delete { id: UserId },
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    username: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    website: Option<String>,
}

#[derive(Args)]
struct UpdateArgs {
    id: UserId,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    website: Option<String>,
}

impl From<CreateArgs> for CreateUserInput {
    fn from(args: CreateArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            username: args.username,
            phone: args.phone,
            website: args.website,
        }
    }
}

impl From<UpdateArgs> for UpdateUserInput {
    fn from(args: UpdateArgs) -> Self {
        Self {
            id: args.id,
            name: args.name,
            email: args.email,
            username: args.username,
            phone: args.phone,
            website: args.website,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    setup_tracing();
    let cli = Cli::parse();

    let config = load_config(&cli).map_err(|e| e.to_string())?;
    let system = UserSystem::from_config(&config).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("command", backend = %system.backend());
    let outcome = run(&system, cli.command).instrument(span).await;

    system.shutdown().await?;
    outcome
}

fn load_config(cli: &Cli) -> Result<ApiConfig, ConfigError> {
    let mut config = ApiConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(backend) = cli.backend {
        config = config.with_backend(backend);
    }
    Ok(config)
}

async fn run(system: &UserSystem, command: Command) -> Result<(), String> {
    let mut directory = system.directory(TracingNotifier);

    match command {
        Command::List => {
            if !directory.load_users().await {
                return Err("Failed to load users".to_string());
            }
            print_users(directory.users());
        }
        Command::Show { id } => {
            let user = directory
                .use_cases()
                .get_user_by_id(id)
                .await
                .ok_or_else(|| format!("User {id} not found"))?;
            print_users(&[user]);
        }
        Command::Create(args) => {
            let user = directory
                .submit(Submission::Create(args.into()))
                .await
                .map_err(|e| e.to_string())?;
            print_users(&[user]);
        }
        Command::Update(args) => {
            let input = UpdateUserInput::from(args);
            if !input.has_changes() {
                return Err("Nothing to update: pass at least one field".to_string());
            }

            let current = directory
                .use_cases()
                .get_user_by_id(input.id)
                .await
                .ok_or_else(|| format!("User {} not found", input.id))?;
            directory.edit_user(current);

            let user = directory
                .submit(Submission::Update(input))
                .await
                .map_err(|e| e.to_string())?;
            print_users(&[user]);
        }
        Command::Delete { id } => {
            if !directory.delete_user(id).await {
                return Err(format!("Failed to delete user {id}"));
            }
            info!(user_id = id, "Done");
        }
    }

    Ok(())
}

fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found");
        return;
    }

    println!("{:>6}  {:<24} {:<16} {:<32} {:<20} {}", "ID", "NAME", "USERNAME", "EMAIL", "PHONE", "WEBSITE");
    for user in users {
        println!(
            "{:>6}  {:<24} {:<16} {:<32} {:<20} {}",
            user.id,
            user.name,
            user.username,
            user.email,
            user.phone.as_deref().unwrap_or("-"),
            user.website.as_deref().unwrap_or("-"),
        );
    }
}
