//! Adapters behind the domain ports.
//!
//! Only PostgreSQL is implemented today; without a database the server falls
//! back to the fixture ports in `domain::ports`.

pub mod persistence;
