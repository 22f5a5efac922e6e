//! `EquivsBuilder` against a scripted command runner.

use bdapt_cli::application::MetapackageBuilder;
use bdapt_cli::domain::CommandError;
use bdapt_cli::infra::EquivsBuilder;
use bdapt_common::{Bundle, PackageSpec};

use crate::helpers::{err_output, ok_output};
use crate::mocks::ScriptedRunner;

fn web_bundle() -> Bundle {
    let mut bundle = Bundle::new(Some("Web server".into()));
    bundle.packages.insert("nginx".into(), PackageSpec::default());
    bundle
        .packages
        .insert("curl".into(), PackageSpec::with_version(">= 7.0"));
    bundle
}

fn builder(runner: &ScriptedRunner) -> EquivsBuilder<ScriptedRunner> {
    EquivsBuilder::new(runner.clone(), "equivs-build", "Ops <ops@example.com>")
}

#[test]
fn test_render_uses_configured_maintainer_and_sorted_depends() {
    let runner = ScriptedRunner::default();
    let control = builder(&runner).render("web", &web_bundle());

    assert!(control.contains("Package: bdapt-web\n"));
    assert!(control.contains("Maintainer: Ops <ops@example.com>\n"));
    assert!(control.contains("Depends: curl (>= 7.0), nginx\n"));
    assert!(control.contains("Version: 1.0~"));
}

#[tokio::test]
async fn test_missing_tool_reports_install_hint() {
    let runner = ScriptedRunner::with_programs(&[]);

    let err = builder(&runner)
        .build("web", &web_bundle())
        .await
        .expect_err("missing");

    assert!(matches!(err, CommandError::ToolMissing { .. }));
    assert!(err.to_string().contains("sudo apt install equivs"));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_build_returns_deb_and_removes_scratch_on_drop() {
    let runner = ScriptedRunner::with_programs(&["equivs-build"]);
    runner.produce_file("bdapt-web_1.0_all.deb");
    runner.respond(Ok(ok_output(b"dpkg-deb: building package 'bdapt-web'")));

    let artifact = builder(&runner)
        .build("web", &web_bundle())
        .await
        .expect("build");

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, vec!["control".to_string()]);
    let dir = calls[0].dir.clone().expect("ran in scratch dir");
    assert!(
        dir.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("bdapt-"))
    );
    let control = std::fs::read_to_string(dir.join("control")).expect("control written");
    assert!(control.contains("Package: bdapt-web"));
    assert_eq!(artifact.path(), dir.join("bdapt-web_1.0_all.deb"));
    assert!(artifact.path().exists());

    drop(artifact);
    assert!(!dir.exists(), "scratch directory removed with the artifact");
}

#[tokio::test]
async fn test_missing_deb_removes_scratch() {
    let runner = ScriptedRunner::with_programs(&["equivs-build"]);

    let err = builder(&runner)
        .build("web", &web_bundle())
        .await
        .expect_err("no artifact");

    assert!(matches!(err, CommandError::NoArtifact { .. }));
    let dir = runner.dirs_seen().pop().expect("dir used");
    assert!(!dir.exists());
}

#[tokio::test]
async fn test_failed_build_removes_scratch() {
    let runner = ScriptedRunner::with_programs(&["equivs-build"]);
    runner.respond(Ok(err_output(2, b"dpkg-deb: error: parsing file")));

    let err = builder(&runner)
        .build("web", &web_bundle())
        .await
        .expect_err("fails");

    assert!(err.to_string().contains("parsing file"));
    let dir = runner.dirs_seen().pop().expect("dir used");
    assert!(!dir.exists());
}
