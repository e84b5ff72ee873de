use assert_cmd::Command;
use wine_radar::{cli::format_sources, model::Source};

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("wine-radar").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn analyze_help_lists_chart_flag() {
    let mut cmd = Command::cargo_bin("wine-radar").expect("binary exists");
    let output = cmd.args(["analyze", "--help"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--chart"));
}

#[test]
fn blank_wine_fails_without_network() {
    let mut cmd = Command::cargo_bin("wine-radar").expect("binary exists");
    let output = cmd
        .args(["analyze", "   "])
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("wine name is empty"));
}

#[test]
fn citations_are_numbered() {
    let sources = vec![
        Source {
            title: "Decanter".into(),
            link: "https://www.decanter.com/bedeau".into(),
        },
        Source {
            title: "Unknown".into(),
            link: "https://blog.example/b".into(),
        },
    ];
    insta::assert_snapshot!(format_sources(&sources), @r###"
    1. Decanter (https://www.decanter.com/bedeau)
    2. Unknown (https://blog.example/b)
    "###);
}
