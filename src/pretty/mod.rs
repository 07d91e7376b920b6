pub mod unparse;
