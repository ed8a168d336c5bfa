//! Common utilities for CLI E2E tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

pub const EMPLOYEES_CSV: &str = "\
empleado_id,departamento,zona_geografica,ciudad,salario_anual,satisfaccion_laboral,\
productividad_score,nivel_estres,horas_semanales,horas_ejercicio_semana,horas_sueno_noche
1,Engineering,North,Madrid,95000,8,85,4,42,4,7.5
2,Engineering,South,Sevilla,105000,9,90,5,48,2,6
3,Sales,North,Madrid,60000,6,70,7,50,1,6.5
4,Sales,South,Sevilla,not-a-number,7,72,6,40,3,7
5,Support,North,Bilbao,45000,5,60,8,45,3,7
6,Support,South,Sevilla,48000,4,55,9,47,0,5
";

pub const PRODUCTS_CSV: &str = "\
product_id,main_category,actual_price,discount_percentage,rating,rating_count
P1,Electronics,15,10,4.1,200
P2,Electronics,80,25,4.4,1500
P3,Home,250,40,3.9,90
P4,Home,0,10,4.0,30
P5,Computers,120,0,4.2,800
P6,,60,15,4.5,50
P7,Computers,35,5,0,0
";

pub const PRODUCT_RULES_TOML: &str = r#"
[normalize]
required_text = ["main_category"]
required_positive = ["rating", "rating_count", "actual_price", "discount_percentage"]
"#;

/// Isolated config location and input files for one test.
pub struct Sandbox {
    dir: tempfile::TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    /// Write `contents` to `name` inside the sandbox and return its path.
    pub fn write(&self, name: &str, contents: &str) -> String {
        let path = self.dir.path().join(name);
        let mut file = std::fs::File::create(&path).expect("Failed to create input file");
        file.write_all(contents.as_bytes()).expect("Failed to write input file");
        path.to_string_lossy().into_owned()
    }

    pub fn products(&self) -> String {
        self.write("products.csv", PRODUCTS_CSV)
    }

    /// Replace the sandbox config file.
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.config_path(), contents).expect("Failed to write config");
    }

    pub fn employees(&self) -> String {
        self.write("employees.csv", EMPLOYEES_CSV)
    }

    /// Invoke a CLI command and return the output.
    pub fn run_cli(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_workpulse-cli"))
            .args(args)
            .env("WORKPULSE_CONFIG", self.config_path())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    /// Invoke a CLI command and expect success.
    pub fn run_cli_success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run_cli(args);
        if code != 0 && !stderr.is_empty() {
            eprintln!("CLI error output: {}", stderr);
        }
        assert_eq!(code, 0, "CLI command failed with code {}: {:?}", code, args);
        stdout
    }

    /// Invoke a CLI command and expect failure.
    pub fn run_cli_failure(&self, args: &[&str]) -> (String, String, i32) {
        let (stdout, stderr, code) = self.run_cli(args);
        assert!(code != 0, "CLI command unexpectedly succeeded: {:?}", args);
        (stdout, stderr, code)
    }
}

/// Parse JSON output from CLI.
pub fn parse_json<T: for<'de> serde::Deserialize<'de>>(json: &str) -> T {
    serde_json::from_str(json).expect("Failed to parse JSON output")
}

/// Check if string contains substring
pub fn assert_contains(haystack: &str, needle: &str) {
    assert!(
        haystack.contains(needle),
        "Expected '{}' to contain '{}'",
        haystack, needle
    );
}

/// Check if JSON has a specific field
pub fn assert_json_field(json: &serde_json::Value, field: &str) {
    if let Some(obj) = json.as_object() {
        assert!(
            obj.contains_key(field),
            "Expected JSON to contain field '{}', got keys: {:?}",
            field,
            obj.keys().collect::<Vec<_>>()
        );
    } else {
        panic!("Expected JSON object, got: {:?}", json);
    }
}
