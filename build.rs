//! Build script for fuzzy-aqi
//!
//! Embeds the crate version and target triple for `--version` output.

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=FUZZY_AQI_VERSION={}", version);

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=FUZZY_AQI_TARGET={}", target);
}
