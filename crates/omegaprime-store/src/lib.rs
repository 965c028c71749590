// SQLite-backed record store
// Every link gets one row, forever. The notified flag is the only thing that moves.

pub mod store;

pub use rusqlite::Error as StoreError;
pub use store::{opportunity_id, NewOpportunity, Opportunity, OpportunityStore, MAX_TITLE_CHARS};
