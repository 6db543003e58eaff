/// Authentication primitives for Taskboard
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Session token issuance and verification
///
/// Tokens are signed with HS256 and expire 8 hours after issuance. Password
/// hashes use Argon2id with a random per-password salt; plaintext passwords
/// never leave the login and user-create handlers.

pub mod jwt;
pub mod password;
