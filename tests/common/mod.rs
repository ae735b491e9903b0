#![allow(dead_code)]

use build_assert::fixture::Fixture;
use std::collections::HashMap;

/// Manifest for a dependency-free binary package. `[workspace]` keeps cargo
/// from looking for an enclosing workspace above the temp directory.
pub fn manifest(name: &str) -> String {
    format!(
        "[package]\nname = \"{name}\"\nversion = \"0.1.0\"\nedition = \"2021\"\n\n[workspace]\n"
    )
}

/// A package that compiles cleanly and has one passing test
pub fn hello_package() -> Fixture {
    let fixture = Fixture::empty("hello").unwrap();
    fixture.create_file("Cargo.toml", &manifest("hello")).unwrap();
    fixture
        .create_file(
            "src/main.rs",
            "fn greeting() -> &'static str {\n    \"hello\"\n}\n\n\
             fn main() {\n    println!(\"{}\", greeting());\n}\n\n\
             #[test]\nfn greets() {\n    assert_eq!(greeting(), \"hello\");\n}\n",
        )
        .unwrap();
    fixture
}

/// A package with a type error
pub fn broken_package() -> Fixture {
    let fixture = Fixture::empty("broken").unwrap();
    fixture.create_file("Cargo.toml", &manifest("broken")).unwrap();
    fixture
        .create_file("src/main.rs", "fn main() {\n    let x: u32 = \"nope\";\n}\n")
        .unwrap();
    fixture
}

/// A package that compiles but whose test fails
pub fn failing_tests_package() -> Fixture {
    let fixture = Fixture::empty("failing").unwrap();
    fixture.create_file("Cargo.toml", &manifest("failing")).unwrap();
    fixture
        .create_file(
            "src/lib.rs",
            "#[test]\nfn always_fails() {\n    assert_eq!(1 + 1, 3);\n}\n",
        )
        .unwrap();
    fixture
}

/// Env override that keeps build output inside the fixture's temp dir
pub fn isolated_env(fixture: &Fixture) -> HashMap<String, String> {
    HashMap::from([
        (
            "CARGO_TARGET_DIR".to_string(),
            fixture.temp_path().join("target").to_string_lossy().to_string(),
        ),
        ("CARGO_TERM_COLOR".to_string(), "never".to_string()),
    ])
}
