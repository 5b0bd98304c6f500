pub mod branch_scope;
