//! Remote time-entry client.

pub mod dto;
pub mod filters;

use crate::errors::{AppError, AppResult};
use crate::models::TimeEntry;
use chrono::{DateTime, Utc};
use dto::{Collection, ProjectDto, TimeEntryDto, WorkPackageDto};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

/// Where time entries come from. The sync logic only talks to this trait.
pub trait TimeEntrySource {
    /// A single entry; `None` when the remote no longer has it.
    fn time_entry(&self, id: u64) -> AppResult<Option<TimeEntry>>;

    /// Entries created in `[start, end]`.
    fn time_entries_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<TimeEntry>>;

    /// Every entry of every work package of the projects matching `pattern`.
    fn project_time_entries(&self, pattern: &str) -> AppResult<Vec<TimeEntry>>;
}

pub struct OpenProjectClient {
    http: Client,
    base_url: String,
    username: String,
    api_key: String,
    page_size: usize,
}

impl OpenProjectClient {
    pub fn new(base_url: &str, username: &str, api_key: &str, page_size: usize) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("billsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Fetch(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
            username: username.to_string(),
            api_key: api_key.to_string(),
            page_size: page_size.max(1),
        })
    }

    /// GET a JSON document; `Ok(None)` on 404.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> AppResult<Option<T>> {
        let resp = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(&self.api_key))
            .header("Accept", "application/hal+json")
            .send()
            .map_err(|e| AppError::Fetch(format!("GET {url}: {e}")))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(AppError::Fetch(format!("GET {url}: HTTP {}", resp.status())));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::Fetch(format!("GET {url}: {e}")))?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| AppError::Fetch(format!("GET {url}: invalid JSON: {e}")))
    }

    /// Walk every page of a collection.
    fn get_all<T: DeserializeOwned>(&self, url: &str) -> AppResult<Vec<T>> {
        let mut out = Vec::new();
        let mut offset = 1;
        loop {
            let page_url = filters::with_page(url, self.page_size, offset);
            let page: Collection<T> = self
                .get_json(&page_url)?
                .ok_or_else(|| AppError::Fetch(format!("GET {page_url}: HTTP 404 Not Found")))?;

            let received = page.embedded.elements.len();
            out.extend(page.embedded.elements);
            let complete = page.total.is_some_and(|total| out.len() >= total);
            if received < self.page_size || complete {
                break;
            }
            offset += 1;
        }
        Ok(out)
    }
}

impl TimeEntrySource for OpenProjectClient {
    fn time_entry(&self, id: u64) -> AppResult<Option<TimeEntry>> {
        let url = filters::time_entry_url(&self.base_url, id);
        match self.get_json::<TimeEntryDto>(&url)? {
            Some(dto) => dto.into_time_entry().map(Some),
            None => Ok(None),
        }
    }

    fn time_entries_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<TimeEntry>> {
        let url = filters::time_entries_window_url(&self.base_url, start, end);
        self.get_all::<TimeEntryDto>(&url)?
            .into_iter()
            .map(TimeEntryDto::into_time_entry)
            .collect()
    }

    fn project_time_entries(&self, pattern: &str) -> AppResult<Vec<TimeEntry>> {
        let mut out = Vec::new();
        let projects: Vec<ProjectDto> = self.get_all(&filters::projects_url(&self.base_url, pattern))?;

        for project in projects {
            let wps: Vec<WorkPackageDto> =
                self.get_all(&filters::work_packages_url(&self.base_url, project.id))?;

            for wp in wps {
                let Some(href) = wp.links.time_entries.href.as_deref() else {
                    continue;
                };
                let url = filters::resolve_href(&self.base_url, href);
                for dto in self.get_all::<TimeEntryDto>(&url)? {
                    let mut entry = dto.into_time_entry()?;
                    if entry.work_package_title.is_empty() {
                        entry.work_package_title = wp.subject.clone();
                    }
                    if entry.project.is_empty() {
                        entry.project = wp
                            .links
                            .project
                            .title
                            .clone()
                            .unwrap_or_else(|| project.name.clone());
                    }
                    out.push(entry);
                }
            }
        }

        Ok(out)
    }
}
