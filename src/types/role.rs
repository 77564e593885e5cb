//! Developer Roles
//!
//! Closed enumeration of documentation audiences. Each role carries the
//! analysis focus and guiding questions interpolated into prompts.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::DocweaveError;

/// Target audience for generated documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Backend,
    Frontend,
    Devops,
    Security,
    Data,
    Mobile,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Backend,
        Role::Frontend,
        Role::Devops,
        Role::Security,
        Role::Data,
        Role::Mobile,
    ];

    /// Lowercase tag used in branch names, file paths, and prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Backend => "backend",
            Role::Frontend => "frontend",
            Role::Devops => "devops",
            Role::Security => "security",
            Role::Data => "data",
            Role::Mobile => "mobile",
        }
    }

    /// Capitalized form for headings ("Backend Developer Guide")
    pub fn title(&self) -> &'static str {
        match self {
            Role::Backend => "Backend",
            Role::Frontend => "Frontend",
            Role::Devops => "DevOps",
            Role::Security => "Security",
            Role::Data => "Data",
            Role::Mobile => "Mobile",
        }
    }

    /// Analysis focus areas interpolated into the analysis prompt
    pub fn focus(&self) -> &'static str {
        match self {
            Role::Backend => {
                "API endpoints, database schemas, authentication, server architecture, \
                 dependencies, security patterns"
            }
            Role::Frontend => {
                "UI components, state management, routing, API integrations, styling \
                 patterns, build setup"
            }
            Role::Devops => {
                "Infrastructure, deployment configs, CI/CD, containerization, monitoring, \
                 scalability patterns"
            }
            Role::Security => {
                "Authentication, authorization, data validation, encryption, security \
                 vulnerabilities, access controls"
            }
            Role::Data => {
                "Data models, ETL pipelines, analytics, database design, data flows, \
                 processing patterns"
            }
            Role::Mobile => {
                "Mobile frameworks, platform-specific code, API integrations, offline \
                 capabilities, performance"
            }
        }
    }

    /// Guiding questions for the role-specific synthesis
    pub fn questions(&self) -> &'static str {
        match self {
            Role::Backend => {
                "What APIs does this expose? How is data stored? What authentication is \
                 used? What are the main server-side patterns?"
            }
            Role::Frontend => {
                "What UI framework is used? How is state managed? What APIs does it \
                 consume? How is styling organized?"
            }
            Role::Devops => {
                "How is this deployed? What infrastructure is needed? Are there \
                 containers? What monitoring exists?"
            }
            Role::Security => {
                "What security measures are implemented? Are there potential \
                 vulnerabilities? How is data protected?"
            }
            Role::Data => {
                "How is data structured? What processing happens? Are there analytics or \
                 ETL pipelines?"
            }
            Role::Mobile => {
                "What mobile platform? How does it handle offline? What APIs does it use? \
                 Performance considerations?"
            }
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = DocweaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "backend" => Ok(Role::Backend),
            "frontend" => Ok(Role::Frontend),
            "devops" => Ok(Role::Devops),
            "security" => Ok(Role::Security),
            "data" => Ok(Role::Data),
            "mobile" => Ok(Role::Mobile),
            other => Err(DocweaveError::InvalidInput(format!(
                "Unknown role '{}'. Valid roles: backend, frontend, devops, security, data, mobile",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_parse_case_insensitive() {
        assert_eq!("BACKEND".parse::<Role>().unwrap(), Role::Backend);
        assert_eq!("DevOps".parse::<Role>().unwrap(), Role::Devops);
    }

    #[test]
    fn test_role_parse_unknown() {
        assert!(matches!(
            "product-manager".parse::<Role>(),
            Err(DocweaveError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Security).unwrap(),
            "\"security\""
        );
    }
}
