use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Health status of a posting account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Limited,
    Banned,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Limited => "limited",
            Self::Banned => "banned",
        };
        f.write_str(s)
    }
}

impl FromStr for AccountStatus {
    type Err = AccountStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "limited" => Ok(Self::Limited),
            "banned" => Ok(Self::Banned),
            other => Err(AccountStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`AccountStatus`] string.
#[derive(Debug, Clone)]
pub struct AccountStatusParseError(pub String);

impl fmt::Display for AccountStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid account status: {:?}", self.0)
    }
}

impl std::error::Error for AccountStatusParseError {}

// ---------------------------------------------------------------------------

/// Status of a weekly posting plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Active,
    Completed,
    Cancelled,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

impl FromStr for PlanStatus {
    type Err = PlanStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(PlanStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`PlanStatus`] string.
#[derive(Debug, Clone)]
pub struct PlanStatusParseError(pub String);

impl fmt::Display for PlanStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid plan status: {:?}", self.0)
    }
}

impl std::error::Error for PlanStatusParseError {}

// ---------------------------------------------------------------------------

/// Status of a scheduled posting task.
///
/// `joining` marks tasks where the account still has to join the target
/// group before it can post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
    Failed,
    Joining,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Joining => "joining",
        };
        f.write_str(s)
    }
}

impl FromStr for TaskStatus {
    type Err = TaskStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "joining" => Ok(Self::Joining),
            other => Err(TaskStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`TaskStatus`] string.
#[derive(Debug, Clone)]
pub struct TaskStatusParseError(pub String);

impl fmt::Display for TaskStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid task status: {:?}", self.0)
    }
}

impl std::error::Error for TaskStatusParseError {}

// ---------------------------------------------------------------------------

/// Pipeline status of a prospect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProspectStatus {
    Pending,
    Contacted,
    AddedToCrm,
    Archived,
}

impl fmt::Display for ProspectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Contacted => "contacted",
            Self::AddedToCrm => "added_to_crm",
            Self::Archived => "archived",
        };
        f.write_str(s)
    }
}

impl FromStr for ProspectStatus {
    type Err = ProspectStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "contacted" => Ok(Self::Contacted),
            "added_to_crm" => Ok(Self::AddedToCrm),
            "archived" => Ok(Self::Archived),
            other => Err(ProspectStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ProspectStatus`] string.
#[derive(Debug, Clone)]
pub struct ProspectStatusParseError(pub String);

impl fmt::Display for ProspectStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid prospect status: {:?}", self.0)
    }
}

impl std::error::Error for ProspectStatusParseError {}

// ---------------------------------------------------------------------------

/// How a prospect entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProspectSource {
    Manual,
    JsonImport,
    LinkedinImport,
}

impl fmt::Display for ProspectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Manual => "manual",
            Self::JsonImport => "json_import",
            Self::LinkedinImport => "linkedin_import",
        };
        f.write_str(s)
    }
}

impl FromStr for ProspectSource {
    type Err = ProspectSourceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "json_import" => Ok(Self::JsonImport),
            "linkedin_import" => Ok(Self::LinkedinImport),
            other => Err(ProspectSourceParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ProspectSource`] string.
#[derive(Debug, Clone)]
pub struct ProspectSourceParseError(pub String);

impl fmt::Display for ProspectSourceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid prospect source: {:?}", self.0)
    }
}

impl std::error::Error for ProspectSourceParseError {}

// ---------------------------------------------------------------------------

/// What happened when a call was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Answered,
    NoAnswer,
    Busy,
    Voicemail,
    WrongNumber,
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Answered => "answered",
            Self::NoAnswer => "no_answer",
            Self::Busy => "busy",
            Self::Voicemail => "voicemail",
            Self::WrongNumber => "wrong_number",
        };
        f.write_str(s)
    }
}

impl FromStr for CallOutcome {
    type Err = CallOutcomeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "answered" => Ok(Self::Answered),
            "no_answer" => Ok(Self::NoAnswer),
            "busy" => Ok(Self::Busy),
            "voicemail" => Ok(Self::Voicemail),
            "wrong_number" => Ok(Self::WrongNumber),
            other => Err(CallOutcomeParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`CallOutcome`] string.
#[derive(Debug, Clone)]
pub struct CallOutcomeParseError(pub String);

impl fmt::Display for CallOutcomeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid call outcome: {:?}", self.0)
    }
}

impl std::error::Error for CallOutcomeParseError {}

// ---------------------------------------------------------------------------

/// Categorical result code attached to an answered call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Interested,
    Callback,
    NotInterested,
    Dead,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Interested => "interested",
            Self::Callback => "callback",
            Self::NotInterested => "not_interested",
            Self::Dead => "dead",
        };
        f.write_str(s)
    }
}

impl FromStr for Disposition {
    type Err = DispositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interested" => Ok(Self::Interested),
            "callback" => Ok(Self::Callback),
            "not_interested" => Ok(Self::NotInterested),
            "dead" => Ok(Self::Dead),
            other => Err(DispositionParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Disposition`] string.
#[derive(Debug, Clone)]
pub struct DispositionParseError(pub String);

impl fmt::Display for DispositionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid disposition: {:?}", self.0)
    }
}

impl std::error::Error for DispositionParseError {}

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

/// A posting account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub fb_id: String,
    pub status: AccountStatus,
    pub browser_tag: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A target group to post into.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub member_count: i32,
    pub language: Option<String>,
    pub tags: Vec<String>,
    pub warning_count: i32,
    pub owner_account_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Metadata for an uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Media {
    pub id: Uuid,
    pub file_name: String,
    pub storage_path: String,
    pub url: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

/// A reusable text template.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Template {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A week's worth of generated posting tasks.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeeklyPlan {
    pub id: Uuid,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_tasks: i32,
    pub status: PlanStatus,
    pub created_at: DateTime<Utc>,
}

/// One scheduled (account, group, text, image) assignment.
///
/// Account/group/template/media fields are denormalized copies frozen at
/// generation time so historical tasks keep displaying what was actually
/// posted, regardless of later edits or deletes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub plan_id: Uuid,
    /// 0 = Monday .. 6 = Sunday.
    pub weekday: i32,
    pub slot: i32,
    pub account_id: Uuid,
    pub account_name: String,
    pub group_id: Uuid,
    pub group_name: String,
    pub group_url: String,
    pub template_id: Uuid,
    pub template_title: String,
    pub body: String,
    pub media_id: Option<Uuid>,
    pub media_url: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

/// A business prospect worked by the call team.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Prospect {
    pub id: Uuid,
    pub name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub status: ProspectStatus,
    pub source: ProspectSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A logged call against a prospect.
///
/// `extras` carries the optional quality-scoring and classification fields
/// from the multi-tab call form as free-form JSON.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CallLog {
    pub id: Uuid,
    pub prospect_id: Uuid,
    pub called_at: DateTime<Utc>,
    pub outcome: CallOutcome,
    pub disposition: Disposition,
    pub notes: Option<String>,
    pub extras: serde_json::Value,
}

/// A record in the external call-center collection.
///
/// Created by "add to CRM": a copy of the prospect's name and phones plus
/// its call history serialized into `call_history`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CallCenterRecord {
    pub id: Uuid,
    pub name: String,
    pub phones: Vec<String>,
    pub source_prospect_id: Option<Uuid>,
    pub call_history: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
