//! FitForm admin CLI
//!
//! Operational entry point for the persistence layer: schema migrations,
//! account management, nutrition calculation and a model availability check.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fitform_backend::classifier::{self, ModelError};
use fitform_backend::services::{NutritionService, SuperuserFlags, UserFlags, UserService};
use fitform_backend::{config, db};
use fitform_shared::{ActivityLevel, Sex, UserProfile};
use sqlx::PgPool;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about = "FitForm - fitness tracking administration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create a regular user
    CreateUser {
        #[command(flatten)]
        account: AccountArgs,
        /// Grant staff access
        #[arg(long)]
        staff: bool,
        /// Create the account deactivated
        #[arg(long)]
        inactive: bool,
    },
    /// Create a user with staff and superuser rights
    CreateSuperuser {
        #[command(flatten)]
        account: AccountArgs,
    },
    /// Delete a user and everything they own
    DeleteUser {
        #[arg(long)]
        id: i64,
    },
    /// Calculate and store a user's daily nutrition requirements
    CalculateNutrition {
        #[arg(long)]
        user_id: i64,
        /// sedentary, lightly-active, moderately-active, very-active or extra-active
        #[arg(long, default_value = "moderately-active")]
        activity: ActivityLevel,
    },
    /// Verify the pose-classifier model can be loaded
    CheckModel {
        /// Directory to look in instead of the configured one
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct AccountArgs {
    #[arg(long)]
    email: String,
    /// Omit to create an account that cannot log in with a password
    #[arg(long, env = "FITFORM_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[arg(long)]
    name: String,
    #[arg(long)]
    age: u32,
    /// M, F or O
    #[arg(long)]
    sex: Sex,
    #[arg(long)]
    height_inches: f64,
    #[arg(long)]
    weight_kg: f64,
}

impl AccountArgs {
    fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            age: self.age,
            sex: self.sex,
            height_inches: self.height_inches,
            weight_kg: self.weight_kg,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = config::AppConfig::load()?;

    match cli.command {
        Commands::Migrate => {
            let pool = connect(&config).await?;
            db::run_migrations(&pool).await?;
        }
        Commands::CreateUser {
            account,
            staff,
            inactive,
        } => {
            let pool = connect(&config).await?;
            let flags = UserFlags {
                is_active: !inactive,
                is_staff: staff,
                ..UserFlags::default()
            };
            let user = UserService::create_user(
                &pool,
                &account.email,
                account.password.clone(),
                &account.profile(),
                flags,
            )
            .await?;
            println!("Created user {} (id {})", user, user.id);
        }
        Commands::CreateSuperuser { account } => {
            let pool = connect(&config).await?;
            let user = UserService::create_superuser(
                &pool,
                &account.email,
                account.password.clone(),
                &account.profile(),
                SuperuserFlags::default(),
            )
            .await?;
            println!("Created superuser {} (id {})", user, user.id);
        }
        Commands::DeleteUser { id } => {
            let pool = connect(&config).await?;
            let summary = UserService::delete_user(&pool, id).await?;
            println!(
                "Deleted user {}: {} uploads, {} exercise logs, {} rep details, \
                 {} measurements, {} nutrition records",
                id,
                summary.video_uploads,
                summary.exercise_logs,
                summary.rep_details,
                summary.body_measurements,
                summary.nutrition_requirements
            );
        }
        Commands::CalculateNutrition { user_id, activity } => {
            let pool = connect(&config).await?;
            let record = NutritionService::calculate(&pool, user_id, activity).await?;
            println!(
                "User {}: {}, {} protein (calculated {})",
                user_id, record.calories, record.protein, record.calculation_date
            );
        }
        Commands::CheckModel { dir } => {
            let loaded = match dir {
                Some(dir) => classifier::load_model(&dir),
                None => classifier::get_model(&config.model),
            };
            match loaded {
                Ok(model) => println!(
                    "Model OK: {} ({} bytes)",
                    model.model_path().display(),
                    model.model_size()
                ),
                Err(e @ ModelError::NotFound { .. }) => {
                    error!("{}", e);
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

async fn connect(config: &config::AppConfig) -> Result<PgPool> {
    info!("Connecting to database...");
    db::connect(&config.database).await
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "fitform=info,fitform_backend=info".into()
        } else {
            "fitform=debug,fitform_backend=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_superuser() {
        let cli = Cli::try_parse_from([
            "fitform",
            "create-superuser",
            "--email",
            "admin@Example.COM",
            "--password",
            "s3cret",
            "--name",
            "Admin",
            "--age",
            "40",
            "--sex",
            "O",
            "--height-inches",
            "68.5",
            "--weight-kg",
            "72.25",
        ])
        .unwrap();

        match cli.command {
            Commands::CreateSuperuser { account } => {
                assert_eq!(account.email, "admin@Example.COM");
                assert_eq!(account.password.as_deref(), Some("s3cret"));
                assert_eq!(account.profile().sex, Sex::Other);
                assert_eq!(account.profile().height_inches, 68.5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_calculate_nutrition() {
        let cli = Cli::try_parse_from([
            "fitform",
            "calculate-nutrition",
            "--user-id",
            "7",
            "--activity",
            "very-active",
        ])
        .unwrap();
        match cli.command {
            Commands::CalculateNutrition { user_id, activity } => {
                assert_eq!(user_id, 7);
                assert_eq!(activity, ActivityLevel::VeryActive);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["fitform", "calculate-nutrition", "--user-id", "7"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::CalculateNutrition { activity: ActivityLevel::ModeratelyActive, .. }
        ));

        let bad = Cli::try_parse_from([
            "fitform",
            "calculate-nutrition",
            "--user-id",
            "7",
            "--activity",
            "couch",
        ]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_sex() {
        let result = Cli::try_parse_from([
            "fitform",
            "create-user",
            "--email",
            "a@b.com",
            "--name",
            "A",
            "--age",
            "30",
            "--sex",
            "X",
            "--height-inches",
            "70",
            "--weight-kg",
            "80",
        ]);
        assert!(result.is_err());
    }
}
