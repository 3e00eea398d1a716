pub mod atom;
pub mod display;
pub mod symbol_table;
pub mod term;
pub mod term_reader;
pub mod types;
pub mod variable_map;
