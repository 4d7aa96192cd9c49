//! Shared header fragments and problem-type identifiers.

pub(crate) const BEARER_PREFIX: &str = "Bearer ";
pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

pub(crate) const PROBLEM_INTERNAL: &str = "https://mediabay.dev/problems/internal";
pub(crate) const PROBLEM_UNAUTHORIZED: &str = "https://mediabay.dev/problems/unauthorized";
pub(crate) const PROBLEM_BAD_REQUEST: &str = "https://mediabay.dev/problems/bad-request";
