mod generate_id;
mod query;

pub use generate_id::{generate_id, is_valid_id};
pub use query::QueryParams;
