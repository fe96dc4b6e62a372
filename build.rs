//! Build script for adc-voltmeter
//!
//! Stages `memory.x` for the RP2350 linker and adds the cortex-m-rt and defmt
//! linker scripts. Host builds (unit tests) skip all of it.

use std::path::PathBuf;
use std::{env, fs};

fn main() {
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    // Only the embedded target needs the linker setup
    if env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default() != "arm" {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    if let Err(e) = fs::copy("memory.x", out_dir.join("memory.x")) {
        panic!("Failed to stage memory.x: {}", e);
    }
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
