use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kitchen_chef::admin::{self, AdminDish, AdminUser, DishDraft, DishFilter, UserDraft};
use kitchen_chef::auth::{self, Registration, Role};
use kitchen_chef::config::{Config, ConfigOverrides, GeneratorBackend};
use kitchen_chef::dishes::{DishLibrary, DishRecord};
use kitchen_chef::generator::{build_generator, search_online};
use kitchen_chef::kitchen::{Kitchen, Vote};
use kitchen_chef::output::csv::{
    admin_dishes_to_csv, admin_users_to_csv, dishes_to_csv, history_to_csv, recipes_to_csv,
};
use kitchen_chef::output::json::render_json;
use kitchen_chef::output::table::{
    render_admin_dishes_table, render_admin_users_table, render_cuisines_table,
    render_dish_detail, render_dishes_table, render_favorites_table, render_history_table,
    render_online_table, render_overview_table, render_recipe, render_scaled, render_stats_table,
};
use kitchen_chef::recipe::{Difficulty, Recipe, SearchMode, IMPROVEMENT_SUGGESTIONS};
use kitchen_chef::server::run_server;
use kitchen_chef::storage::{CookieConsent, KitchenState, SqliteStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VoteArg {
    Up,
    Down,
}

impl From<VoteArg> for Vote {
    fn from(value: VoteArg) -> Self {
        match value {
            VoteArg::Up => Vote::Up,
            VoteArg::Down => Vote::Down,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "kitchen-chef",
    about = "Recipe generation from ingredients or dish names"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    db: Option<String>,
    #[arg(short, long)]
    backend: Option<GeneratorBackend>,
    #[arg(long = "remote-endpoint")]
    remote_endpoint: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a recipe from a comma-separated ingredient list or a dish name.
    Generate {
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,
        #[arg(long)]
        dish: bool,
        #[arg(long)]
        save: bool,
    },
    Improve {
        #[arg(required_unless_present = "suggestions")]
        id: Option<String>,
        #[arg(required_unless_present = "suggestions")]
        feedback: Option<String>,
        #[arg(long)]
        save: bool,
        /// List the canned feedback suggestions instead of improving.
        #[arg(long, conflicts_with_all = ["id", "feedback", "save"])]
        suggestions: bool,
    },
    Scale {
        id: String,
        servings: u32,
    },
    Search {
        #[arg(num_args = 0..)]
        query: Vec<String>,
    },
    Suggestions,
    Dish {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    Cuisines,
    Online {
        #[arg(required = true, num_args = 1..)]
        dish: Vec<String>,
        /// 1-based result number to import as a recipe.
        #[arg(long)]
        import: Option<usize>,
        #[arg(long)]
        save: bool,
    },
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesCommand>,
    },
    History {
        #[arg(long)]
        dish: bool,
        #[arg(long)]
        remove: Option<usize>,
        #[arg(long)]
        clear: bool,
    },
    Feedback {
        #[arg(value_enum)]
        vote: VoteArg,
    },
    Stats,
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Register {
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long = "first-name")]
        first_name: String,
        #[arg(long = "last-name")]
        last_name: String,
    },
    Whoami,
    Consent {
        value: Option<CookieConsent>,
    },
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 3001)]
        port: u16,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[derive(Debug, Subcommand)]
enum FavoritesCommand {
    List,
    Show { id: String },
    Remove { id: String },
}

#[derive(Debug, Subcommand)]
enum AdminCommand {
    Overview,
    Users {
        #[command(subcommand)]
        action: Option<AdminUsersCommand>,
    },
    Dishes {
        #[command(subcommand)]
        action: Option<AdminDishesCommand>,
    },
}

#[derive(Debug, Subcommand)]
enum AdminUsersCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        email: String,
        #[arg(long = "first-name")]
        first_name: String,
        #[arg(long = "last-name")]
        last_name: String,
        #[arg(long)]
        admin: bool,
    },
    Update {
        id: u32,
        #[arg(long)]
        email: Option<String>,
        #[arg(long = "first-name")]
        first_name: Option<String>,
        #[arg(long = "last-name")]
        last_name: Option<String>,
        #[arg(long)]
        admin: Option<bool>,
        #[arg(long)]
        verified: Option<bool>,
    },
    Delete {
        id: u32,
    },
    Toggle {
        id: u32,
    },
}

#[derive(Debug, Subcommand)]
enum AdminDishesCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        continent: Option<String>,
        #[arg(long)]
        difficulty: Option<Difficulty>,
    },
    Add {
        name: String,
        #[arg(long)]
        continent: String,
        #[arg(long)]
        country: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 0)]
        prep: u32,
        #[arg(long, default_value_t = 0)]
        cook: u32,
        #[arg(long, default_value_t = 4)]
        servings: u32,
        #[arg(long, default_value = "Medium")]
        difficulty: Difficulty,
        #[arg(long)]
        featured: bool,
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    Delete {
        id: u32,
    },
    Toggle {
        id: u32,
    },
    Feature {
        id: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        db_path: cli.db.clone(),
        backend: cli.backend,
        remote_endpoint: cli.remote_endpoint.clone(),
    });

    if let Commands::Config { init, show } = &cli.command {
        return handle_config_command(*init, *show, &config, &config_path);
    }
    if let Commands::Serve { host, port } = &cli.command {
        let bind = format!("{host}:{port}");
        let addr: SocketAddr = bind
            .parse()
            .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
        return run_server(config, addr).await;
    }

    let library = DishLibrary::builtin();
    match &cli.command {
        Commands::Search { query } => {
            let hits = library.search(&query.join(" "));
            print_dishes(&hits, cli.output)?;
            return Ok(());
        }
        Commands::Suggestions => {
            let suggestions = library.suggestions();
            match cli.output {
                OutputFormat::Table => println!("{}", suggestions.join("\n")),
                _ => println!("{}", render_json(&suggestions)?),
            }
            return Ok(());
        }
        Commands::Dish { name } => {
            let name = name.join(" ");
            let dish = library
                .get(&name)
                .ok_or_else(|| anyhow!("no dish named {name} in the library"))?;
            match cli.output {
                OutputFormat::Table => println!("{}", render_dish_detail(dish)),
                OutputFormat::Json => println!("{}", render_json(dish)?),
                OutputFormat::Csv => print!("{}", dishes_to_csv(&[dish])?),
            }
            return Ok(());
        }
        Commands::Improve {
            suggestions: true, ..
        } => {
            match cli.output {
                OutputFormat::Table => println!("{}", IMPROVEMENT_SUGGESTIONS.join("\n")),
                _ => println!("{}", render_json(&IMPROVEMENT_SUGGESTIONS)?),
            }
            return Ok(());
        }
        Commands::Cuisines => {
            let grouped = library.by_cuisine();
            match cli.output {
                OutputFormat::Table => println!("{}", render_cuisines_table(&grouped)),
                _ => println!("{}", render_json(&grouped)?),
            }
            return Ok(());
        }
        _ => {}
    }

    let db_path = config.resolved_db_path();
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("failed opening kitchen store: {}", db_path.display()))?;
    let state = KitchenState::new(store).with_history_limit(config.history.limit);
    let generator = build_generator(&config.generator);
    let mut kitchen = Kitchen::new(state, generator);

    match &cli.command {
        Commands::Generate { input, dish, save } => {
            let mode = if *dish {
                SearchMode::Dish
            } else {
                SearchMode::Ingredients
            };
            let recipe = kitchen.generate(mode, &input.join(" ")).await?;
            if *save {
                kitchen.save_favorite(recipe.clone())?;
                info!(id = %recipe.id, "saved to favorites");
            }
            print_recipe(&recipe, cli.output)?;
        }
        Commands::Improve {
            id: Some(id),
            feedback: Some(feedback),
            save,
            ..
        } => {
            let improved = kitchen.improve_favorite(id, feedback, *save)?;
            print_recipe(&improved, cli.output)?;
        }
        Commands::Scale { id, servings } => {
            let (recipe, scaled) = kitchen.scale_favorite(id, *servings)?;
            match cli.output {
                OutputFormat::Table => println!("{}", render_scaled(&recipe, &scaled)),
                _ => println!("{}", render_json(&scaled)?),
            }
        }
        Commands::Online { dish, import, save } => {
            let dish = dish.join(" ");
            let delay = Duration::from_millis(config.generator.online_delay_ms);
            let results = search_online(&dish, delay).await;
            match import {
                None => match cli.output {
                    OutputFormat::Table => println!("{}", render_online_table(&results)),
                    _ => println!("{}", render_json(&results)?),
                },
                Some(number) => {
                    let hit = number
                        .checked_sub(1)
                        .and_then(|idx| results.get(idx))
                        .cloned()
                        .ok_or_else(|| anyhow!("no online result number {number}"))?;
                    let recipe = hit.into_recipe(&dish)?;
                    if *save {
                        kitchen.save_favorite(recipe.clone())?;
                    }
                    print_recipe(&recipe, cli.output)?;
                }
            }
        }
        Commands::Favorites { action } => match action {
            None | Some(FavoritesCommand::List) => {
                let favorites = kitchen.state().favorites()?;
                print_favorites(&favorites, cli.output)?;
            }
            Some(FavoritesCommand::Show { id }) => {
                print_recipe(&kitchen.favorite(id)?, cli.output)?;
            }
            Some(FavoritesCommand::Remove { id }) => {
                let removed = kitchen.remove_favorite(id)?;
                println!("Removed {} ({})", removed.title, removed.id);
            }
        },
        Commands::History {
            dish,
            remove,
            clear,
        } => {
            let mode = if *dish {
                SearchMode::Dish
            } else {
                SearchMode::Ingredients
            };
            if *clear {
                kitchen.clear_history(mode)?;
            } else if let Some(index) = remove {
                kitchen.remove_history(mode, *index)?;
            }
            let entries = kitchen.history(mode)?;
            let label = if *dish { "Dish" } else { "Ingredients" };
            match cli.output {
                OutputFormat::Table => println!("{}", render_history_table(label, &entries)),
                OutputFormat::Json => println!("{}", render_json(&entries)?),
                OutputFormat::Csv => print!("{}", history_to_csv(&entries)?),
            }
        }
        Commands::Feedback { vote } => {
            let vote: Vote = (*vote).into();
            let count = kitchen.feedback(vote)?;
            println!("Thanks for the feedback ({vote}: {count})");
        }
        Commands::Stats => {
            let stats = kitchen.stats()?;
            match cli.output {
                OutputFormat::Table => println!("{}", render_stats_table(&stats)),
                _ => println!("{}", render_json(&stats)?),
            }
        }
        Commands::Login { email, password } => {
            let user = auth::login(kitchen.state_mut(), email, password)?;
            println!("Signed in as {} ({})", user.full_name(), user.role);
        }
        Commands::Logout => {
            auth::logout(kitchen.state_mut())?;
            println!("Signed out");
        }
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let registration = Registration {
                email: email.clone(),
                password: password.clone(),
                first_name: first_name.clone(),
                last_name: last_name.clone(),
            };
            let user = auth::register(kitchen.state_mut(), &registration)?;
            println!("Registered and signed in as {}", user.full_name());
        }
        Commands::Whoami => match auth::current_user(kitchen.state())? {
            Some(user) => match cli.output {
                OutputFormat::Table => {
                    println!("{} <{}> ({})", user.full_name(), user.email, user.role)
                }
                _ => println!("{}", render_json(&user)?),
            },
            None => println!("Not signed in"),
        },
        Commands::Consent { value } => {
            if let Some(value) = value {
                kitchen.state_mut().set_consent(*value)?;
            }
            match kitchen.state().consent()? {
                Some(consent) => println!("Cookie consent: {consent}"),
                None => println!("Cookie consent: not answered"),
            }
        }
        Commands::Admin { action } => {
            handle_admin_command(action, kitchen.state_mut(), cli.output)?;
        }
        Commands::Improve { .. }
        | Commands::Search { .. }
        | Commands::Suggestions
        | Commands::Dish { .. }
        | Commands::Cuisines
        | Commands::Serve { .. }
        | Commands::Config { .. } => {}
    }

    Ok(())
}

fn handle_config_command(init: bool, show: bool, config: &Config, config_path: &Path) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn handle_admin_command(
    action: &AdminCommand,
    state: &mut KitchenState<SqliteStore>,
    format: OutputFormat,
) -> Result<()> {
    match action {
        AdminCommand::Overview => {
            let overview = admin::overview(state)?;
            match format {
                OutputFormat::Table => println!("{}", render_overview_table(&overview)),
                _ => println!("{}", render_json(&overview)?),
            }
        }
        AdminCommand::Users { action } => {
            let (actor, mut catalog) = admin::user_catalog(state)?;
            let changed = match action {
                None => None,
                Some(AdminUsersCommand::List { search }) => {
                    let users = catalog.search(search.as_deref().unwrap_or_default());
                    print_admin_users(&users, format)?;
                    return Ok(());
                }
                Some(AdminUsersCommand::Add {
                    email,
                    first_name,
                    last_name,
                    admin,
                }) => Some(catalog.create(UserDraft {
                    email: email.clone(),
                    first_name: first_name.clone(),
                    last_name: last_name.clone(),
                    role: if *admin { Role::Admin } else { Role::User },
                    is_active: true,
                    email_verified: false,
                })?),
                Some(AdminUsersCommand::Update {
                    id,
                    email,
                    first_name,
                    last_name,
                    admin,
                    verified,
                }) => {
                    let current = catalog
                        .get(*id)
                        .cloned()
                        .ok_or_else(|| anyhow!("no user with id {id}"))?;
                    let role = match admin {
                        Some(true) => Role::Admin,
                        Some(false) => Role::User,
                        None => current.role,
                    };
                    Some(catalog.update(
                        *id,
                        UserDraft {
                            email: email.clone().unwrap_or(current.email),
                            first_name: first_name.clone().unwrap_or(current.first_name),
                            last_name: last_name.clone().unwrap_or(current.last_name),
                            role,
                            is_active: current.is_active,
                            email_verified: verified.unwrap_or(current.email_verified),
                        },
                    )?)
                }
                Some(AdminUsersCommand::Delete { id }) => Some(catalog.delete(*id)?),
                Some(AdminUsersCommand::Toggle { id }) => Some(catalog.toggle_active(*id)?),
            };
            match changed {
                Some(user) => {
                    catalog.save(state)?;
                    info!(admin = %actor.email, user = user.id, "user catalog updated");
                    print_admin_users(&[&user], format)?;
                }
                None => {
                    let users: Vec<&AdminUser> = catalog.users().iter().collect();
                    print_admin_users(&users, format)?;
                }
            }
        }
        AdminCommand::Dishes { action } => {
            let (actor, mut catalog) = admin::dish_catalog(state)?;
            let changed = match action {
                None => None,
                Some(AdminDishesCommand::List {
                    search,
                    continent,
                    difficulty,
                }) => {
                    let filter = DishFilter {
                        search: search.clone(),
                        continent: continent.clone(),
                        difficulty: *difficulty,
                    };
                    print_admin_dishes(&catalog.filter(&filter), format)?;
                    return Ok(());
                }
                Some(AdminDishesCommand::Add {
                    name,
                    continent,
                    country,
                    description,
                    prep,
                    cook,
                    servings,
                    difficulty,
                    featured,
                    tags,
                }) => Some(catalog.create(DishDraft {
                    name: name.clone(),
                    continent: continent.clone(),
                    country: country.clone(),
                    description: description.clone(),
                    prep_time_minutes: *prep,
                    cook_time_minutes: *cook,
                    servings: *servings,
                    difficulty: *difficulty,
                    is_featured: *featured,
                    is_active: true,
                    tags: tags.clone(),
                })?),
                Some(AdminDishesCommand::Delete { id }) => Some(catalog.delete(*id)?),
                Some(AdminDishesCommand::Toggle { id }) => Some(catalog.toggle_active(*id)?),
                Some(AdminDishesCommand::Feature { id }) => Some(catalog.toggle_featured(*id)?),
            };
            match changed {
                Some(dish) => {
                    catalog.save(state)?;
                    info!(admin = %actor.email, dish = dish.id, "dish catalog updated");
                    print_admin_dishes(&[&dish], format)?;
                }
                None => {
                    let dishes: Vec<&AdminDish> = catalog.dishes().iter().collect();
                    print_admin_dishes(&dishes, format)?;
                }
            }
        }
    }
    Ok(())
}

fn print_recipe(recipe: &Recipe, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_recipe(recipe)),
        OutputFormat::Json => println!("{}", render_json(recipe)?),
        OutputFormat::Csv => print!("{}", recipes_to_csv(std::slice::from_ref(recipe))?),
    }
    Ok(())
}

fn print_favorites(favorites: &[Recipe], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if favorites.is_empty() {
                warn!("no favorites saved yet");
            }
            println!("{}", render_favorites_table(favorites));
        }
        OutputFormat::Json => println!("{}", render_json(favorites)?),
        OutputFormat::Csv => print!("{}", recipes_to_csv(favorites)?),
    }
    Ok(())
}

fn print_dishes(dishes: &[&DishRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_dishes_table(dishes)),
        OutputFormat::Json => println!("{}", render_json(dishes)?),
        OutputFormat::Csv => print!("{}", dishes_to_csv(dishes)?),
    }
    Ok(())
}

fn print_admin_users(users: &[&AdminUser], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_admin_users_table(users)),
        OutputFormat::Json => println!("{}", render_json(users)?),
        OutputFormat::Csv => print!("{}", admin_users_to_csv(users)?),
    }
    Ok(())
}

fn print_admin_dishes(dishes: &[&AdminDish], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_admin_dishes_table(dishes)),
        OutputFormat::Json => println!("{}", render_json(dishes)?),
        OutputFormat::Csv => print!("{}", admin_dishes_to_csv(dishes)?),
    }
    Ok(())
}
