//! Enumerations stored as TEXT columns
//!
//! Every enum round-trips through `as_str`/`parse` so the SQL layer can bind
//! and read them without a custom sqlx type.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

// ============================================================================
// ACCOUNT ENUMS
// ============================================================================

/// Account role, ordered from least to most privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    User,
    Moderator,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Moderator => "MODERATOR",
            Self::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USER" => Some(Self::User),
            "MODERATOR" => Some(Self::Moderator),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status; BLOCKED accounts cannot authenticate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[default]
    Active,
    Blocked,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Blocked => "BLOCKED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "BLOCKED" => Some(Self::Blocked),
            _ => None,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// DOCUMENT ENUMS
// ============================================================================

/// Document visibility; only VISIBLE documents appear in the public listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Processing,
    #[default]
    Visible,
    Blocked,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "PROCESSING",
            Self::Visible => "VISIBLE",
            Self::Blocked => "BLOCKED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PROCESSING" => Some(Self::Processing),
            "VISIBLE" => Some(Self::Visible),
            "BLOCKED" => Some(Self::Blocked),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ORDERING ENUMS
// ============================================================================

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sort keys for document listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum DocumentSort {
    #[default]
    UploadDate,
    #[serde(alias = "downloadCount")]
    Downloads,
    #[serde(alias = "viewCount")]
    Views,
    Title,
}

impl DocumentSort {
    /// Column expression (qualified with the `d` documents alias)
    pub fn column(&self) -> &'static str {
        match self {
            Self::UploadDate => "d.created_at",
            Self::Downloads => "d.download_count",
            Self::Views => "d.view_count",
            Self::Title => "d.title COLLATE NOCASE",
        }
    }
}

/// Sort keys for the admin user listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum UserSort {
    #[default]
    JoinedDate,
    FullName,
    Email,
    UploadsCount,
    DownloadsCount,
}

impl UserSort {
    pub fn column(&self) -> &'static str {
        match self {
            Self::JoinedDate => "created_at",
            Self::FullName => "full_name COLLATE NOCASE",
            Self::Email => "email",
            Self::UploadsCount => "uploads_count",
            Self::DownloadsCount => "downloads_count",
        }
    }

    /// Newest accounts first; alphabetical and counter sorts ascend
    pub fn default_direction(&self) -> SortDirection {
        match self {
            Self::JoinedDate => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}
