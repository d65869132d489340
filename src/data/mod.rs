pub mod idx;
pub mod xor;

pub use idx::{load_idx_pair, parse_idx_pair};
pub use xor::xor_table;
