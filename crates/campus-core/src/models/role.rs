use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

/// Role recorded in the `user_roles` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    Admin,
    Teacher,
    Student,
}

impl AppRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppRole::Admin => "admin",
            AppRole::Teacher => "teacher",
            AppRole::Student => "student",
        }
    }
}

impl Display for AppRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(AppRole::Admin),
            "teacher" => Ok(AppRole::Teacher),
            "student" => Ok(AppRole::Student),
            _ => Err(anyhow::anyhow!("Invalid role: {}", s)),
        }
    }
}

/// Identity resolved from a bearer credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_is_case_insensitive() {
        assert_eq!(" Admin ".parse::<AppRole>().unwrap(), AppRole::Admin);
        assert!("owner".parse::<AppRole>().is_err());
    }
}
