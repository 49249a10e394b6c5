use clap::{Args, Subcommand};
use folio_app::{
    auth::{NewUser, PgAuthService, TokenConfig, UserRole},
    database,
};

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    /// Bootstrap an administrator account.
    CreateAdmin(CreateAdminArgs),
}

#[derive(Debug, Args)]
struct CreateAdminArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Login email
    #[arg(long)]
    email: String,

    /// Password; prefer passing via environment
    #[arg(long, env = "FOLIO_ADMIN_PASSWORD")]
    password: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    match command.command {
        UserSubcommand::CreateAdmin(args) => create_admin(args).await,
    }
}

async fn create_admin(args: CreateAdminArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    // The CLI never mints tokens; the signer config is inert here.
    let tokens = TokenConfig {
        secret: String::new(),
        access_ttl_secs: 0,
        refresh_ttl_secs: 0,
    };

    let service = PgAuthService::new(pool, &tokens);

    let user = service
        .create_user_with_role(
            NewUser {
                name: args.name,
                email: args.email,
                password: args.password,
            },
            UserRole::Admin,
        )
        .await
        .map_err(|error| format!("failed to create admin: {error}"))?;

    println!("admin_uuid: {}", user.uuid);
    println!("admin_email: {}", user.email);

    Ok(())
}
