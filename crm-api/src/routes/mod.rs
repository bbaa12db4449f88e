pub(crate) mod billing;
pub(crate) mod clients;
pub(crate) mod dashboard;
pub(crate) mod error;
pub(crate) mod goals;
pub(crate) mod leads;
pub(crate) mod projects;
pub(crate) mod records;
pub(crate) mod tasks;

pub(crate) use error::ApiError;
