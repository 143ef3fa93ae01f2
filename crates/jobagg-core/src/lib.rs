//! Core traits and types for jobagg
//!
//! This crate defines the validated vacancy record, the capabilities it depends on
//! (HTTP transport, url reachability), the job platform trait implemented by each
//! adapter crate, and the in-memory collection operations.

pub mod batch;
pub mod collection;
pub mod error;
pub mod platform;
pub mod transport;
pub mod url_check;
pub mod vacancy;

pub use batch::{BatchReport, ItemError, Rejection, normalize_batch};
pub use collection::{MergeOutcome, filter_by_keyword, merge_unique, sort_by_date, sort_by_salary};
pub use error::{Error, Result, ValidationError};
pub use platform::{JobPlatform, PlatformType};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use url_check::{HttpUrlChecker, SkipUrlCheck, UrlChecker};
pub use vacancy::{RawSalary, Salary, Vacancy, VacancyDraft, VacancyRecord};
