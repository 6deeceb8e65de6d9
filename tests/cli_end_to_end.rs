use std::io::Write;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::{NamedTempFile, TempDir};

const DEMO_CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/catalog.toml");
const DEMO_SETTINGS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/cms-blocks.toml");

fn catalog_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write catalog");
    file
}

/// Runs the binary from an empty directory so no local settings file leaks in.
fn cms_blocks(workdir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cms-blocks"));
    cmd.current_dir(workdir.path())
        .env_remove("CMS_BLOCKS_CONFIG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

#[test]
fn render_prints_filtered_html() {
    let workdir = TempDir::new().expect("workdir");
    let assert = cms_blocks(&workdir)
        .args(["--config-file", DEMO_SETTINGS])
        .args(["render", "--catalog", DEMO_CATALOG])
        .args(["--identifier", "footer_links", "--store", "1"])
        .assert()
        .success();

    let output = stdout_of(&assert);
    assert!(output.contains("https://shop.example/about-us"), "{output}");
    assert!(output.contains("https://shop.example/contact"), "{output}");
    assert!(output.contains("555-0100"), "{output}");
    assert!(!output.contains("{{"), "{output}");
}

#[test]
fn render_prefers_store_specific_block() {
    let workdir = TempDir::new().expect("workdir");
    let assert = cms_blocks(&workdir)
        .args(["render", "--catalog", DEMO_CATALOG])
        .args(["--identifier", "footer_links", "--store", "2"])
        .assert()
        .success();

    let output = stdout_of(&assert);
    assert!(output.contains("https://nl.shop.example/over-ons"), "{output}");
    assert!(!output.contains("about-us"), "{output}");
}

#[test]
fn identities_json_lists_identifier_store_and_entity_keys() {
    let workdir = TempDir::new().expect("workdir");
    let assert = cms_blocks(&workdir)
        .args(["identities", "--catalog", DEMO_CATALOG])
        .args(["--identifier", "footer_links", "--json"])
        .assert()
        .success();

    assert_eq!(
        stdout_of(&assert).trim(),
        r#"["CMS_BLOCK_footer_links","CMS_BLOCK_footer_links_1","CMS_BLOCK_1"]"#
    );
}

#[test]
fn identities_for_missing_block_print_two_keys() {
    let catalog = catalog_file(
        r#"
[[stores]]
id = 1
code = "default"
base_url = "https://shop.example/"

[[blocks]]
id = 7
identifier = "promo"
content = "<p>promo</p>"
"#,
    );
    let workdir = TempDir::new().expect("workdir");
    let assert = cms_blocks(&workdir)
        .arg("identities")
        .arg("--catalog")
        .arg(catalog.path())
        .args(["--identifier", "nope", "--store", "1"])
        .assert()
        .success();

    let output = stdout_of(&assert);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines, vec!["CMS_BLOCK_nope", "CMS_BLOCK_nope_1"]);
}

#[test]
fn unknown_store_fails_with_message() {
    let workdir = TempDir::new().expect("workdir");
    cms_blocks(&workdir)
        .args(["render", "--catalog", DEMO_CATALOG])
        .args(["--identifier", "footer_links", "--store", "9"])
        .assert()
        .failure()
        .stderr(contains("unknown store id 9"));
}
