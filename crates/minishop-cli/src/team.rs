use minishop_core::{database::Database, teams, ShopResult};
use nu_ansi_term::Color::{Blue, Cyan, Green};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{themes::BorderCorrection, Panel, Style},
};
use tracing::info;

use crate::utils::{json_enabled, or_dash, print_json, Colored};

pub fn add_team(db: &Database, name: &str) -> ShopResult<()> {
    let id = teams::create_team(db, name)?;
    info!(team_id = id, "Created team {} ({})", Colored(Blue, name), id);
    Ok(())
}

#[derive(Serialize)]
struct TeamListing<'a> {
    id: i32,
    name: &'a str,
    members: Vec<Option<&'a str>>,
}

pub fn list_teams(db: &Database) -> ShopResult<()> {
    let teams = teams::list_teams_with_members(db)?;

    if json_enabled() {
        let listing: Vec<TeamListing> = teams
            .iter()
            .map(|(team, members)| TeamListing {
                id: team.id,
                name: &team.name,
                members: members.iter().map(|m| m.username.as_deref()).collect(),
            })
            .collect();
        return print_json(&listing);
    }

    if teams.is_empty() {
        info!("No teams found");
        return Ok(());
    }

    let mut builder = Builder::new();
    builder.push_record(["ID", "Team", "Members"]);
    for (team, members) in &teams {
        let names: Vec<String> = members
            .iter()
            .map(|m| format!("{} ({})", or_dash(m.username.as_deref()), m.age))
            .collect();
        builder.push_record([
            team.id.to_string(),
            Colored(Blue, &team.name).to_string(),
            names.join(", "),
        ]);
    }

    let table = builder
        .build()
        .with(Panel::header("Teams"))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .to_string();
    info!("\n{table}");

    Ok(())
}

pub fn team_stats(db: &Database) -> ShopResult<()> {
    let summary = teams::team_age_summary(db)?;

    if json_enabled() {
        return print_json(&summary);
    }

    let mut builder = Builder::new();
    builder.push_record(["Team", "Average age"]);
    for row in &summary {
        builder.push_record([
            Colored(Cyan, &row.team_name).to_string(),
            row.avg_age
                .map(|avg| Colored(Green, format!("{avg:.1}")).to_string())
                .unwrap_or_else(|| "-".into()),
        ]);
    }

    let table = builder
        .build()
        .with(Panel::header("Average age per team"))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .to_string();
    info!("\n{table}");

    Ok(())
}
