use anyhow::{bail, Context};
use std::env;
use std::sync::Arc;

use rally_client::config::Config;
use rally_client::models::{GroupId, LoginDTO, Match, Team, UserId};
use rally_client::perspective::{derive_perspective, ScoreLine};
use rally_client::service::{ApiClient, GroupService, MatchService, QueryCache, Session};
use rally_client::telemetry::init_telemetry;

const USAGE: &str = "usage: rally <groups | matches <group_id> [page] | pending <group_id> | stats <group_id> <game_id>>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_telemetry(&config.telemetry);

    let client = ApiClient::new(&config.api)?;
    let cache = Arc::new(QueryCache::new(config.cache.stale_after()));
    let session = Session::new(client.clone(), cache.clone());

    session.init().await;
    if session.current_user().await.is_none() {
        if let (Some(username), Some(password)) = (&config.auth.username, &config.auth.password) {
            let dto = LoginDTO {
                username: username.clone(),
                password: password.clone(),
            };
            session.login(dto).await.context("Login failed")?;
        }
    }
    let user = session.require_user().await.context("Not signed in")?;
    tracing::info!(user_id = user.id, "Signed in as {}", user.username);

    let groups = GroupService::new(client.clone(), cache.clone());
    let matches = MatchService::new(client, cache, config.cache.page_size);

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("groups") => {
            for group in groups.list_groups().await? {
                println!(
                    "{:>4}  {}  ({} members, {} games, {} matches)",
                    group.id, group.name, group.member_count, group.game_count, group.match_count
                );
            }
        }
        Some("matches") => {
            let group_id = parse_id(args.get(1))?;
            let page: u32 = match args.get(2) {
                Some(p) => p.parse().context("page must be a number")?,
                None => 1,
            };
            let query = matches.default_query().page(page);
            let result = matches.list_group_matches(group_id, &query).await?;
            for m in &result.data {
                print_match(m, user.id);
            }
            println!(
                "page {} of {} ({} matches)",
                result.meta.page, result.meta.total_pages, result.meta.total
            );
        }
        Some("pending") => {
            let group_id = parse_id(args.get(1))?;
            for m in matches.pending_matches(group_id).await? {
                print_match(&m, user.id);
                let perspective = derive_perspective(&m, user.id);
                println!("      -> {}", perspective.result.accept_label());
            }
        }
        Some("stats") => {
            let group_id = parse_id(args.get(1))?;
            let game_id = parse_id(args.get(2))?;
            let stats = groups.game_stats(group_id, game_id).await?;
            if !stats.has_matches() {
                println!("No matches recorded yet");
            }
            for entry in &stats.leaderboard {
                println!(
                    "{:>4}  {:<16} {:>5}  {}",
                    entry.rank_badge(),
                    entry.username,
                    entry.elo,
                    entry.record()
                );
            }
        }
        _ => bail!(USAGE),
    }

    Ok(())
}

fn parse_id(arg: Option<&String>) -> anyhow::Result<GroupId> {
    match arg {
        Some(id) => id.parse().with_context(|| format!("invalid id: {}", id)),
        None => bail!(USAGE),
    }
}

fn print_match(m: &Match, viewer: UserId) {
    let perspective = derive_perspective(m, viewer);
    let names = |team: Team| {
        m.roster(team)
            .iter()
            .map(|u| u.username.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!(
        "{:>5}  {}  {:<9} {:>6}  {} vs {}  [{}]",
        m.id,
        m.played_at.format("%Y-%m-%d"),
        perspective.result.label(),
        ScoreLine::for_match(m).to_string(),
        names(perspective.display.left),
        names(perspective.display.right),
        m.game_name().unwrap_or("-"),
    );
}
