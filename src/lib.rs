pub mod builder;
pub mod checker;
pub mod conventions;
pub mod filter;
pub mod kernel;
pub mod prover;
pub mod statement;
pub mod theory;
pub mod theory_file;
pub mod verifier;

#[cfg(test)]
mod tests;
