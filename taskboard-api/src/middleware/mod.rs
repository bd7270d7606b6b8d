/// Middleware modules for the API server
///
/// - `project_access`: per-request project authorization (loads the project,
///   evaluates the policy floor, attaches `ProjectAccess`)
/// - `security`: security response headers
pub mod project_access;
pub mod security;
