//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{matches, team_statistics};

/// Database row for a match record.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = matches)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MatchRow {
    pub match_id: String,
    pub timestamp: String,
    pub team: String,
    pub opponent: String,
    pub event_type: String,
    pub event_details: String,
}

/// Database row for a team statistics entry.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = team_statistics)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TeamStatisticsRow {
    pub team_name: String,
    pub match_id: String,
    pub opponent: String,
    pub date: String,
    pub goals_scored: i32,
    pub goals_conceded: i32,
    pub fouls: i32,
    pub result: String,
    pub contributions: String,
}
