pub mod launch;
pub mod list;
