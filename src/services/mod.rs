pub mod apply;
pub mod optimizer;
