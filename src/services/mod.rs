// Service exports
pub mod airtable;
pub mod apollo;
pub mod cache;
pub mod gmail;
pub mod outreach;

pub use airtable::{AirtableClient, AirtableError, StoreReport};
pub use apollo::{ApolloClient, ApolloError};
pub use cache::{CacheError, CacheStatus, LeadCache};
pub use gmail::{GmailError, GmailSender, SendReport};
pub use outreach::{OutreachError, OutreachGenerator};
