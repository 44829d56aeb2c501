use std::env;
use std::fs;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=COLLEGECONNECT_BUILD_WEB");
    println!("cargo:rerun-if-changed=../web/index.html");
    if env::var_os("COLLEGECONNECT_BUILD_WEB").is_none() {
        return;
    }
    println!("cargo:rerun-if-changed=../web/src");
    println!("cargo:rerun-if-changed=../web/Cargo.toml");

    let target_folder = "../target";
    let output_path = format!("{}/{}", target_folder, "www");
    // compile the frontend to wasm
    let status = Command::new("cargo")
        .current_dir("../web")
        .arg("build")
        .arg("--target")
        .arg("wasm32-unknown-unknown")
        .arg("--release")
        .status()
        .expect("Failed to compile the web project");
    if !status.success() {
        panic!("web build failed");
    }
    let wasm_file = "../target/wasm32-unknown-unknown/release/web.wasm";

    let status = Command::new("wasm-bindgen")
        .arg("--out-dir")
        .arg(&output_path)
        .arg("--target")
        .arg("web")
        .arg(wasm_file)
        .status()
        .expect("Failed to execute wasm-bindgen");

    if !status.success() {
        panic!("wasm-bindgen failed");
    }
    let source_html = "../web/index.html";
    let target_html = format!("{}/index.html", output_path);
    fs::copy(source_html, target_html).expect("Failed to copy index.html");
}
