use assert_cmd::Command;

pub fn tagstrip_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tagstrip").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}
