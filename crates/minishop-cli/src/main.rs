use std::fs;

use clap::Parser;
use cli::{Args, Commands, ItemAction, MemberAction, OrderAction, TeamAction};
use logging::setup_logging;
use member::PageArgs;
use minishop_config::{
    config::{self, generate_default_config, get_config, Config, CONFIG_PATH},
    paths::resolve_path,
};
use minishop_core::{
    database::Database,
    error::ErrorContext,
    seed::seed_sample_data,
    ShopResult,
};
use minishop_db::{models::order::Address, query::MemberSearchCondition};
use nu_ansi_term::Color::Green;
use tracing::{debug, info, warn};
use utils::{Colored, COLOR, JSON};

mod cli;
mod item;
mod logging;
mod member;
mod order;
mod team;
mod utils;

fn open_database() -> ShopResult<Database> {
    let db_path = get_config().get_db_path()?;
    debug!(path = %db_path.display(), "opening database");
    Database::open(db_path)
}

fn handle_cli() -> ShopResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        let mut color = COLOR.write()?;
        *color = false;
    }

    if args.json {
        let mut json = JSON.write()?;
        *json = true;
    }

    if let Some(ref c) = args.config {
        let path = resolve_path(c)?;
        let mut config_path = CONFIG_PATH.write()?;
        *config_path = path;
    }

    match args.command {
        Commands::DefConfig => generate_default_config()?,
        command => {
            config::init()?;

            match command {
                Commands::Config => {
                    let config_path = CONFIG_PATH.read()?.to_path_buf();
                    let content = match fs::read_to_string(&config_path) {
                        Ok(v) => v,
                        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                            warn!("Config file {} not found", config_path.display());
                            Config::default_config().to_annotated_document()?.to_string()
                        }
                        Err(err) => {
                            return Err(err)
                                .with_context(|| format!("reading {}", config_path.display()));
                        }
                    };
                    info!("{}", content);
                }
                Commands::Env => {
                    let config = get_config();

                    info!("MINISHOP_CONFIG={}", CONFIG_PATH.read()?.display());
                    info!("MINISHOP_DB={}", config.get_db_path()?.display());
                    info!(
                        "MINISHOP_PAGE_SIZE={} (max {})",
                        config.default_page_size(),
                        config.max_page_size()
                    );
                }
                Commands::Seed => {
                    let db = open_database()?;
                    let summary = seed_sample_data(&db)?;
                    info!(
                        teams = summary.teams,
                        members = summary.members,
                        items = summary.items,
                        "Seeded {} teams, {} members and {} items",
                        Colored(Green, summary.teams),
                        Colored(Green, summary.members),
                        Colored(Green, summary.items)
                    );
                }
                Commands::Team { action } => {
                    let db = open_database()?;
                    match action {
                        TeamAction::Add { name } => team::add_team(&db, &name)?,
                        TeamAction::List => team::list_teams(&db)?,
                        TeamAction::Stats => team::team_stats(&db)?,
                    }
                }
                Commands::Member { action } => {
                    let db = open_database()?;
                    match action {
                        MemberAction::Add {
                            username,
                            age,
                            team,
                        } => member::add_member(&db, &username, age, team.as_deref())?,
                        MemberAction::Search {
                            username,
                            team_name,
                            age_goe,
                            age_loe,
                            page,
                            offset,
                            size,
                            simple,
                        } => {
                            let condition = MemberSearchCondition {
                                username,
                                team_name,
                                age_goe,
                                age_loe,
                            };
                            member::search_members(
                                &db,
                                condition,
                                PageArgs {
                                    page,
                                    offset,
                                    size,
                                    simple,
                                },
                            )?;
                        }
                        MemberAction::Stats => member::member_stats(&db)?,
                        MemberAction::RenameYoungerThan { age, username } => {
                            member::rename_younger_than(&db, age, &username)?
                        }
                        MemberAction::RemoveYoungerThan { age } => {
                            member::remove_younger_than(&db, age)?
                        }
                    }
                }
                Commands::Item { action } => {
                    let db = open_database()?;
                    match action {
                        ItemAction::AddBook {
                            name,
                            price,
                            stock,
                            author,
                            isbn,
                        } => item::add_book(
                            &db,
                            &name,
                            price,
                            stock,
                            author.as_deref(),
                            isbn.as_deref(),
                        )?,
                        ItemAction::AddMovie {
                            name,
                            price,
                            stock,
                            artist,
                            etc,
                        } => item::add_movie(
                            &db,
                            &name,
                            price,
                            stock,
                            artist.as_deref(),
                            etc.as_deref(),
                        )?,
                        ItemAction::List { item_type } => {
                            item::list_items(&db, item_type.map(Into::into))?
                        }
                    }
                }
                Commands::Order { action } => {
                    let db = open_database()?;
                    match action {
                        OrderAction::Place {
                            member,
                            items,
                            city,
                            street,
                            zipcode,
                        } => {
                            let address = Address {
                                city,
                                street,
                                zipcode,
                            };
                            order::place_order(&db, member, &items, address)?;
                        }
                        OrderAction::Show { id } => order::show_order(&db, id)?,
                        OrderAction::List { member, status } => {
                            order::list_orders(&db, member, status.map(Into::into))?
                        }
                        OrderAction::Cancel { id } => order::cancel_order(&db, id)?,
                        OrderAction::Deliver { id } => order::deliver_order(&db, id)?,
                    }
                }
                Commands::DefConfig => unreachable!(),
            }
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
