use minishop_config::config::get_config;
use minishop_core::{database::Database, members, ShopResult};
use minishop_db::query::{CountStrategy, MemberSearchCondition, Pageable};
use nu_ansi_term::Color::{Blue, Cyan, Green, LightRed, Yellow};
use tabled::{
    builder::Builder,
    settings::{themes::BorderCorrection, Panel, Style},
};
use tracing::{debug, info};

use crate::utils::{json_enabled, or_dash, print_json, Colored};

pub fn add_member(db: &Database, username: &str, age: i32, team: Option<&str>) -> ShopResult<()> {
    let id = members::register_member(db, username, age, team)?;
    info!(
        member_id = id,
        "Registered {} ({}){}",
        Colored(Blue, username),
        id,
        team.map(|t| format!(" in {}", Colored(Cyan, t)))
            .unwrap_or_default()
    );
    Ok(())
}

/// Page position requested on the command line.
pub struct PageArgs {
    pub page: Option<i64>,
    pub offset: Option<i64>,
    pub size: Option<i64>,
    pub simple: bool,
}

impl PageArgs {
    fn pageable(&self) -> ShopResult<Pageable> {
        let size = get_config().page_size(self.size);
        let pageable = match (self.page, self.offset) {
            (Some(page), _) => Pageable::of_page(page, size)?,
            (None, offset) => Pageable::new(offset.unwrap_or(0), size)?,
        };
        Ok(pageable)
    }

    fn strategy(&self) -> CountStrategy {
        if self.simple || !get_config().optimized_count() {
            CountStrategy::Simple
        } else {
            CountStrategy::Optimized
        }
    }
}

pub fn search_members(
    db: &Database,
    condition: MemberSearchCondition,
    page_args: PageArgs,
) -> ShopResult<()> {
    let pageable = page_args.pageable()?;
    let strategy = page_args.strategy();
    debug!(?strategy, "resolved page request");

    let page = members::search_members(db, &condition, &pageable, strategy)?;

    if json_enabled() {
        return print_json(&page);
    }

    for member in &page.content {
        info!(
            member_id = member.member_id,
            username = member.username,
            age = member.age,
            team_name = member.team_name,
            "{} {} | {} | {}",
            Colored(Yellow, format!("#{}", member.member_id)),
            Colored(Blue, or_dash(member.username.as_deref())),
            member.age,
            Colored(Cyan, or_dash(member.team_name.as_deref()))
        );
    }

    info!(
        "{}",
        Colored(
            LightRed,
            format!(
                "Page {} of {} ({} of {} members)",
                pageable.page_number() + 1,
                page.total_pages().max(1),
                page.content.len(),
                page.total_elements
            )
        )
    );
    if page.has_next() {
        info!(
            "Next page: --offset {}",
            Colored(Green, pageable.next().offset())
        );
    }

    Ok(())
}

pub fn member_stats(db: &Database) -> ShopResult<()> {
    let stats = members::member_statistics(db)?;

    if json_enabled() {
        return print_json(&stats);
    }

    let show = |v: Option<String>| v.unwrap_or_else(|| "-".into());

    let mut builder = Builder::new();
    builder.push_record(["Members".to_string(), Colored(Cyan, stats.count).to_string()]);
    builder.push_record([
        "Sum of ages".to_string(),
        show(stats.sum.map(|v| v.to_string())),
    ]);
    builder.push_record([
        "Average age".to_string(),
        show(stats.avg.map(|v| format!("{v:.1}"))),
    ]);
    builder.push_record(["Oldest".to_string(), show(stats.max.map(|v| v.to_string()))]);
    builder.push_record(["Youngest".to_string(), show(stats.min.map(|v| v.to_string()))]);

    let table = builder
        .build()
        .with(Panel::header("Member statistics"))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .to_string();
    info!("\n{table}");

    Ok(())
}

pub fn rename_younger_than(db: &Database, age: i32, username: &str) -> ShopResult<()> {
    let count = members::rename_younger_than(db, age, username)?;
    info!(
        updated = count,
        "Renamed {} member(s) younger than {} to {}",
        Colored(Green, count),
        age,
        Colored(Blue, username)
    );
    Ok(())
}

pub fn remove_younger_than(db: &Database, age: i32) -> ShopResult<()> {
    let count = members::remove_younger_than(db, age)?;
    info!(
        removed = count,
        "Removed {} member(s) younger than {}",
        Colored(Green, count),
        age
    );
    Ok(())
}
