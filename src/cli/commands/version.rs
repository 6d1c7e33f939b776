//! `version` command.

/// Prints version information.
pub fn execute() {
    println!("vitrine {}", env!("CARGO_PKG_VERSION"));
}
