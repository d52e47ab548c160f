//! `didgate version`

/// Commit identifier injected at build time
const BUILD_CODE: Option<&str> = option_env!("DIDGATE_BUILD_CODE");

pub fn components() -> Vec<(&'static str, String)> {
    vec![
        ("Version", env!("CARGO_PKG_VERSION").to_string()),
        ("Build code", BUILD_CODE.unwrap_or_default().to_string()),
        (
            "OS/Arch",
            format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
        ),
    ]
}

pub fn print() {
    for (name, value) in components() {
        println!("{name:<13}: {value}");
    }
}
