use assert_cmd::{cargo_bin_cmd, Command};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

fn concordia() -> Command {
    let mut cmd = cargo_bin_cmd!("concordia-house");
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn invalid_application_lists_field_errors() {
    concordia()
        .args([
            "submit",
            "--endpoint",
            "http://127.0.0.1:9",
            "application",
            "--name",
            "J",
            "--email",
            "not-an-email",
        ])
        .assert()
        .failure()
        .stdout(contains("- name: Name must be at least 2 characters"))
        .stdout(contains("- email: Please enter a valid email address"))
        .stdout(contains("- roomType: Please select a room type"));
}

#[test]
fn suggestion_needs_the_access_code() {
    concordia()
        .args([
            "submit",
            "--endpoint",
            "http://127.0.0.1:9",
            "suggestion",
            "--access-code",
            "guess",
            "--category",
            "food",
            "--suggestion",
            "Vegetarian option on Fridays",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid access code. Please check and try again."));
}

#[test]
fn suggestion_without_code_asks_for_one() {
    concordia()
        .args(["submit", "suggestion", "--category", "food"])
        .assert()
        .failure()
        .stderr(contains("Please enter the access code"));
}

#[test]
fn unreachable_endpoint_fails_with_banner() {
    concordia()
        .args([
            "submit",
            "--endpoint",
            "http://127.0.0.1:9",
            "interest",
            "--name",
            "Lwazi Dube",
            "--email",
            "lwazi@example.com",
            "--phone",
            "0831112222",
        ])
        .assert()
        .failure()
        .stderr(contains("There was an error adding you to the waitlist.").and(contains("Error")));
}

#[test]
fn recent_requires_a_database_url() {
    concordia()
        .env_remove("DATABASE_URL")
        .args(["recent", "--kind", "application"])
        .assert()
        .failure()
        .stderr(contains("DATABASE_URL must be set"));
}
