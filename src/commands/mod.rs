pub mod apply;
pub mod apply_all;
pub mod check;
pub mod list;
