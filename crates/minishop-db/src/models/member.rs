use diesel::prelude::*;
use serde::Serialize;

use crate::{
    models::team::Team,
    schema::members,
};

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(belongs_to(Team))]
#[diesel(table_name = members)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Member {
    pub id: i32,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = members)]
pub struct NewMember<'a> {
    pub username: Option<&'a str>,
    pub age: i32,
    pub team_id: Option<i32>,
}

/// A member joined with its (optional) team.
#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberTeamDto {
    pub member_id: i32,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i32>,
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct MemberDto {
    pub username: Option<String>,
    pub age: i32,
}

/// Aggregate figures over every member's age.
#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct MemberStatistics {
    pub count: i64,
    pub sum: Option<i64>,
    pub avg: Option<f64>,
    pub max: Option<i32>,
    pub min: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAgeSummary {
    pub team_name: String,
    pub avg_age: Option<f64>,
}
