//! Wire shapes of the OpenProject v3 HAL+JSON responses.

use crate::errors::{AppError, AppResult};
use crate::models::TimeEntry;
use crate::utils::date::parse_api_timestamp;
use crate::utils::parse_duration_hours;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection<T> {
    /// Size of the whole collection; some endpoints leave it out.
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(rename = "_embedded")]
    pub embedded: Elements<T>,
}

#[derive(Debug, Deserialize)]
pub struct Elements<T> {
    #[serde(default = "Vec::new")]
    pub elements: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Link {
    pub href: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectDto {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct WorkPackageDto {
    pub id: u64,
    #[serde(default)]
    pub subject: String,
    #[serde(rename = "_links", default)]
    pub links: WorkPackageLinks,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackageLinks {
    #[serde(default)]
    pub time_entries: Link,
    #[serde(default)]
    pub project: Link,
}

#[derive(Debug, Default, Deserialize)]
pub struct Formattable {
    #[serde(default)]
    pub raw: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryDto {
    pub id: u64,
    pub spent_on: String,
    pub hours: Option<String>,
    #[serde(default)]
    pub comment: Option<Formattable>,
    pub created_at: String,
    #[serde(rename = "_embedded", default)]
    pub embedded: TimeEntryEmbedded,
    #[serde(rename = "_links", default)]
    pub links: TimeEntryLinks,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryEmbedded {
    pub project: Option<Named>,
    pub work_package: Option<Subject>,
    pub user: Option<Named>,
}

#[derive(Debug, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Subject {
    #[serde(default)]
    pub subject: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryLinks {
    #[serde(default)]
    pub project: Link,
    #[serde(default)]
    pub work_package: Link,
    #[serde(default)]
    pub user: Link,
}

impl TimeEntryDto {
    /// Decode into the domain type. Embedded resources win over link titles,
    /// which is all a collection element carries.
    pub fn into_time_entry(self) -> AppResult<TimeEntry> {
        let id = self.id;
        let raw_hours = self
            .hours
            .ok_or_else(|| AppError::Format(format!("time entry {id} has no hours")))?;
        let hours = parse_duration_hours(&raw_hours)?;

        let spent_on = NaiveDate::parse_from_str(&self.spent_on, "%Y-%m-%d").map_err(|_| {
            AppError::InvalidDate(format!("time entry {id}: spentOn '{}'", self.spent_on))
        })?;
        let created_at = parse_api_timestamp(&self.created_at)?;

        let project = self
            .embedded
            .project
            .map(|p| p.name)
            .or(self.links.project.title)
            .unwrap_or_default();
        let work_package_title = self
            .embedded
            .work_package
            .map(|w| w.subject)
            .or(self.links.work_package.title)
            .unwrap_or_default();
        let user_name = self
            .embedded
            .user
            .map(|u| u.name)
            .or(self.links.user.title)
            .unwrap_or_default();

        Ok(TimeEntry {
            id,
            spent_on,
            project,
            comment: self.comment.and_then(|c| c.raw).unwrap_or_default(),
            work_package_title,
            hours,
            user_name,
            created_at,
        })
    }
}
