use std::env;
use std::path::PathBuf;

const HEADER: &str = "globalmem.h";

fn main() {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let config_path = crate_dir.join("cbindgen.toml");

    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed={}", config_path.display());

    let config = cbindgen::Config::from_file(&config_path).expect("failed to read cbindgen.toml");

    let include_dir = crate_dir.join("include");
    std::fs::create_dir_all(&include_dir).expect("failed to create include/ directory");

    cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
        .expect("cbindgen failed to generate globalmem bindings")
        .write_to_file(include_dir.join(HEADER));
}
