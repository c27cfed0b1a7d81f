//! CLI commands

pub mod candidates;
pub mod check;
pub mod resolve;
pub mod validate;

use crate::args::TargetArgs;
use cascade_core::ConfigRequest;

/// Turn target flags into a request
pub fn request_from(target: &TargetArgs) -> anyhow::Result<ConfigRequest> {
    let mut request = ConfigRequest::parse(&target.name)?.with_version(target.version);
    if let Some(scope) = &target.scope {
        request = request.with_scope(scope);
    }
    if let Some(user) = &target.user {
        request = request.with_user(user);
    }
    Ok(request)
}
