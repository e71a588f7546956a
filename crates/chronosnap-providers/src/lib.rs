//! Google API clients and the schedule-item pipeline.
//!
//! This crate talks to the three upstream APIs and turns their responses
//! into the core types:
//!
//! - [`CalendarClient`], [`TasksClient`], [`DriveClient`] - low-level HTTP
//!   clients, one per API
//! - [`RawEvent`] / [`RawTask`] - provider-facing record types
//! - [`normalize`] - raw records to [`ScheduleItem`]
//! - [`classify`] - the appointment keyword filter over raw events
//! - [`TokenStore`] - file-backed bearer-token storage
//! - [`ItemSource`] - the fetch seam the sync orchestrator runs against,
//!   implemented for real by [`GoogleSource`]
//!
//! ```text
//! Calendar API ──► RawEvent ──┬─► normalize_event ───────► ScheduleItem
//!                             └─► classify ─► normalize_appointment
//! Tasks API ────► RawTask ──────► normalize_task ────────► ScheduleItem
//! Drive API ────────────────────────────────────────────► FileRecord
//! ```
//!
//! [`ScheduleItem`]: chronosnap_core::ScheduleItem

pub mod calendar;
pub mod classify;
pub mod drive;
pub mod error;
mod http;
pub mod normalize;
pub mod raw;
pub mod source;
pub mod tasks;
pub mod token;

pub use calendar::CalendarClient;
pub use classify::{APPOINTMENT_KEYWORDS, filter_appointments, is_appointment_like};
pub use drive::DriveClient;
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use normalize::{normalize_appointment, normalize_event, normalize_task};
pub use raw::{RawEvent, RawTask, RawTaskList};
pub use source::{BoxFuture, GoogleSource, ItemSource};
pub use tasks::TasksClient;
pub use token::{TokenInfo, TokenStore, default_token_path};
