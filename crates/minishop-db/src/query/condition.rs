//! Optional-field member search conditions.

use serde::{Deserialize, Serialize};

/// Filter for member searches. Every field is optional; an absent field
/// contributes no predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberSearchCondition {
    pub username: Option<String>,
    pub team_name: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
}

/// A single comparison produced from a present condition field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberPredicate {
    UsernameEq(String),
    TeamNameEq(String),
    AgeGoe(i32),
    AgeLoe(i32),
}

impl MemberSearchCondition {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.team_name.is_none()
            && self.age_goe.is_none()
            && self.age_loe.is_none()
    }

    /// Turns the present fields into predicates, in field order. The
    /// predicates are meant to be combined with AND; an empty list matches
    /// every row.
    pub fn predicates(&self) -> Vec<MemberPredicate> {
        let mut predicates = Vec::with_capacity(4);

        if let Some(username) = &self.username {
            predicates.push(MemberPredicate::UsernameEq(username.clone()));
        }
        if let Some(team_name) = &self.team_name {
            predicates.push(MemberPredicate::TeamNameEq(team_name.clone()));
        }
        if let Some(age) = self.age_goe {
            predicates.push(MemberPredicate::AgeGoe(age));
        }
        if let Some(age) = self.age_loe {
            predicates.push(MemberPredicate::AgeLoe(age));
        }

        predicates
    }
}
