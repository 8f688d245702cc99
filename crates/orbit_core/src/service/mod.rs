//! Core use-case services.
//!
//! # Responsibility
//! - Turn one repository snapshot into dashboard, calendar, panel and
//!   analytics views through the pure engine.
//! - Keep CLI callers decoupled from storage details.
//!
//! # Invariants
//! - Services never read the clock; `today` is always passed in.
//! - Each call evaluates a single snapshot.

use crate::engine::EngineError;
use crate::repo::tracking_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod analytics_service;
pub mod dashboard_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure while loading or evaluating a view.
#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    Engine(EngineError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Engine(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Engine(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<EngineError> for ServiceError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
