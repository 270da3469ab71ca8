pub mod columns;
pub mod common;
pub mod grid;
pub mod history;
pub mod tally;
pub mod users;
