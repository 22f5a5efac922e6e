//! `AptPackageSystem` against a scripted command runner.

use bdapt_cli::application::PackageSystem;
use bdapt_cli::domain::CommandError;
use bdapt_cli::infra::AptPackageSystem;

use crate::helpers::{args, err_output, ok_output};
use crate::mocks::ScriptedRunner;

const PREVIEW: &[u8] = b"\
NOTE: This is only a simulation!
Reading package lists...
0 upgraded, 2 newly installed, 0 to remove and 0 not upgraded.
Inst nginx (1.18.0-6 Debian:11 [amd64])
Inst bdapt-web (1.0~20240309080501.000000 local-deb [all])
Conf nginx (1.18.0-6 Debian:11 [amd64])
";

fn system(runner: &ScriptedRunner) -> AptPackageSystem<ScriptedRunner> {
    AptPackageSystem::new(runner.clone(), "apt-get", "apt-mark")
}

#[tokio::test]
async fn test_dry_run_invocation_and_summary() {
    let runner = ScriptedRunner::with_programs(&["apt-get"]);
    runner.respond(Ok(ok_output(PREVIEW)));

    let summary = system(&runner)
        .dry_run(&args(&["/tmp/bdapt-x/bdapt-web.deb"]))
        .await
        .expect("preview")
        .expect("changes");

    assert_eq!(summary.installs, vec!["nginx", "bdapt-web"]);
    assert_eq!(
        summary.totals.as_deref(),
        Some("0 upgraded, 2 newly installed, 0 to remove and 0 not upgraded.")
    );
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "apt-get");
    assert_eq!(
        calls[0].args,
        args(&[
            "install",
            "--autoremove",
            "-f",
            "/tmp/bdapt-x/bdapt-web.deb",
            "--dry-run"
        ])
    );
}

#[tokio::test]
async fn test_dry_run_without_marked_lines_means_no_change() {
    let runner = ScriptedRunner::with_programs(&["apt-get"]);
    runner.respond(Ok(ok_output(
        b"Reading package lists...\n0 upgraded, 0 newly installed, 0 to remove and 0 not upgraded.\n",
    )));

    let summary = system(&runner)
        .dry_run(&args(&["nginx"]))
        .await
        .expect("preview");

    assert!(summary.is_none());
}

#[tokio::test]
async fn test_apply_removal_targets_non_interactively() {
    let runner = ScriptedRunner::with_programs(&["apt-get"]);

    system(&runner)
        .apply(&args(&["curl-", "vim-"]))
        .await
        .expect("apply");

    assert_eq!(
        runner.calls()[0].args,
        args(&["install", "--autoremove", "-f", "curl-", "vim-", "-y"])
    );
}

#[tokio::test]
async fn test_only_apply_is_allowed_to_finish_after_interrupt() {
    let runner = ScriptedRunner::with_programs(&["apt-get"]);
    runner.respond(Ok(ok_output(PREVIEW)));
    let packages = system(&runner);

    packages.dry_run(&args(&["nginx"])).await.expect("preview");
    packages.apply(&args(&["nginx"])).await.expect("apply");

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert!(!calls[0].waits_on_interrupt);
    assert!(calls[1].waits_on_interrupt);
}

#[tokio::test]
async fn test_non_zero_exit_carries_stderr() {
    let runner = ScriptedRunner::with_programs(&["apt-get"]);
    runner.respond(Ok(err_output(100, b"E: Unable to locate package nosuchpkg")));

    let err = system(&runner)
        .apply(&args(&["nosuchpkg"]))
        .await
        .expect_err("fails");

    match err {
        CommandError::Failed { stderr, .. } => {
            assert!(stderr.contains("Unable to locate package nosuchpkg"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_apt_is_reported_with_hint() {
    let runner = ScriptedRunner::with_programs(&[]);

    let err = system(&runner)
        .dry_run(&args(&["nginx"]))
        .await
        .expect_err("no apt");

    assert!(err.to_string().contains("APT-based system"));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_manual_mark_query_matches_whole_line() {
    let runner = ScriptedRunner::with_programs(&["apt-get", "apt-mark"]);
    runner.respond(Ok(ok_output(b"vim\n")));
    runner.respond(Ok(ok_output(b"")));
    runner.respond(Ok(err_output(1, b"E: failed")));

    let apt = system(&runner);
    assert!(apt.is_manually_installed("vim").await);
    assert!(!apt.is_manually_installed("vi").await);
    assert!(!apt.is_manually_installed("curl").await);

    let calls = runner.calls();
    assert_eq!(calls[0].program, "apt-mark");
    assert_eq!(calls[0].args, args(&["showmanual", "vim"]));
}

#[tokio::test]
async fn test_mark_manual_passes_all_packages() {
    let runner = ScriptedRunner::with_programs(&["apt-mark"]);

    system(&runner)
        .mark_manual(&args(&["curl", "vim"]))
        .await
        .expect("mark");

    assert_eq!(runner.calls()[0].args, args(&["manual", "curl", "vim"]));
}

#[test]
fn test_install_lines_parsed_through_port_default() {
    let runner = ScriptedRunner::default();
    let parsed = system(&runner).parse_dry_run_installs(std::str::from_utf8(PREVIEW).unwrap());
    assert_eq!(parsed, vec!["nginx", "bdapt-web"]);
}
