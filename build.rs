fn main() {
    // Build date, logged at startup
    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=PDFSIGN_BUILD_DATE={}", build_date);
    println!("cargo:rerun-if-changed=build.rs");
}
