/// Test suite for the credential lifecycle core.
///
/// Everything runs against the in-memory store with real bcrypt and JWT
/// crypto, so no database is required.
pub mod fixtures;
pub mod session_tests;
