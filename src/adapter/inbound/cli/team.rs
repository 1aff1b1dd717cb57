//! Handler for the `team` command.

use crate::adapter::inbound::cli::command::TeamArgs;
use crate::adapter::inbound::cli::output;
use crate::application::query::TeamReport;
use crate::domain::TeamName;
use crate::error::Result;
use crate::infrastructure::bootstrap::open_statistics_reader;
use crate::infrastructure::config::settings::Config;

/// Execute the team command.
pub async fn execute(args: &TeamArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    let statistics = open_statistics_reader(&config.storage)?;
    let report = TeamReport::load(statistics.as_ref(), &TeamName::new(args.name.as_str())).await?;

    if output::is_json() {
        output::document("team", &report);
        return Ok(());
    }

    output::section(&format!("Team {}", report.team));
    let totals = &report.statistics;
    output::field("Matches", totals.total_matches);
    output::field(
        "W / D / L",
        format!(
            "{} / {} / {}",
            totals.total_wins, totals.total_draws, totals.total_losses
        ),
    );
    output::field(
        "Goals",
        format!(
            "{} scored, {} conceded",
            totals.total_goals_scored, totals.total_goals_conceded
        ),
    );
    output::field("Fouls", totals.total_fouls);

    if report.matches.is_empty() {
        output::note("(no matches recorded)");
        return Ok(());
    }
    output::section("Matches");
    for row in &report.matches {
        output::field(
            row.match_id.as_str(),
            format!(
                "vs {} {}-{} {} ({} fouls)",
                row.opponent, row.goals_scored, row.goals_conceded, row.result, row.fouls
            ),
        );
    }
    Ok(())
}
