use std::env;

fn main() {
    // Build timestamp surfaced by the health endpoint
    if env::var("BUILD_TIMESTAMP").is_err() {
        let timestamp = chrono::Utc::now().to_rfc3339();
        println!("cargo:rustc-env=BUILD_TIMESTAMP={}", timestamp);
    }

    println!("cargo:rerun-if-env-changed=BUILD_TIMESTAMP");
}
