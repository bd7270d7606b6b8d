/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength validation
/// - [`jwt`]: JWT access/refresh token generation and validation
/// - [`token`]: One-time email-verification and password-reset tokens
/// - [`middleware`]: Authentication context shared with the HTTP layer
/// - [`policy`]: The project authorization policy evaluator
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with configurable expiration
/// - **One-time Tokens**: Secure random generation, SHA-256 digest storage
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod token;
