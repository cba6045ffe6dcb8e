//! End-to-end provisioning flow tests
//!
//! These tests verify:
//! - The exact order of commands and file writes for a stock run
//! - Console progress output
//! - Failure policy behavior across a full run
//! - A run against real files in a temporary directory
//! - A dry run that leaves the host untouched

use std::fs;

use tempfile::tempdir;
use webprovision::test_utils::RecordingHost;
use webprovision::{
    CommandOutput, DryRunFiles, DryRunRunner, FailurePolicy, LocalFiles, ProvisionConfig,
    ProvisionError, Provisioner, VerifyOutcome,
};

const SELINUX_CONFIG: &str = "\
# This file controls the state of SELinux on the system.
SELINUX=enforcing
SELINUXTYPE=targeted
";

fn stock_host() -> RecordingHost {
    RecordingHost::new().with_file("/etc/selinux/config", SELINUX_CONFIG)
}

// =============================================================================
// Command Sequence
// =============================================================================

#[test]
fn test_stock_run_issues_exact_sequence() {
    let config = ProvisionConfig::default();
    let host = stock_host();
    let mut console = Vec::new();

    Provisioner::new(&config, &host, &host, &mut console)
        .run()
        .unwrap();

    assert_eq!(
        host.journal(),
        vec![
            "systemctl stop firewalld",
            "systemctl disable firewalld",
            "setenforce 0",
            "write /etc/selinux/config",
            "yum install -y httpd",
            "systemctl start httpd",
            "systemctl enable httpd",
            "cp /root/sallam.jpg /var/www/html/sallam.jpg",
            "write /var/www/html/index.html",
            "curl -s http://intranet.xyz.local",
        ]
    );
}

#[test]
fn test_stock_run_console_output() {
    let config = ProvisionConfig::default();
    let host = stock_host().with_response(
        "curl -s http://intranet.xyz.local",
        CommandOutput::succeeded("<h1>this is sallam</h1>"),
    );
    let mut console = Vec::new();

    let report = Provisioner::new(&config, &host, &host, &mut console)
        .run()
        .unwrap();
    assert!(report.is_clean());

    let output = String::from_utf8(console).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Disabling firewalld...",
            "firewalld stopped and disabled.",
            "Disabling SELinux (temporary and permanent)...",
            "SELinux set to permissive now and disabled permanently.",
            "Installing httpd...",
            "httpd installed.",
            "Starting and enabling httpd service...",
            "httpd service started and enabled.",
            "Image copied to web directory.",
            "index.html created with centered content and image.",
            "Verifying website accessibility...",
            "Website is accessible and content is correct.",
        ]
    );
}

#[test]
fn test_stock_page_does_not_satisfy_verification() {
    // The deployed heading differs from the content the check looks for
    let config = ProvisionConfig::default();
    let host = stock_host();
    let mut console = Vec::new();

    let mut provisioner = Provisioner::new(&config, &host, &host, &mut console);
    provisioner.create_index_html().unwrap();
    drop(provisioner);

    let page = host.file("/var/www/html/index.html").unwrap();
    assert_eq!(
        VerifyOutcome::from_body(&page, &config.expected_content),
        VerifyOutcome::Mismatch
    );
}

#[test]
fn test_selinux_config_rewritten_in_place() {
    let config = ProvisionConfig::default();
    let host = stock_host();
    let mut console = Vec::new();

    Provisioner::new(&config, &host, &host, &mut console)
        .run()
        .unwrap();

    assert_eq!(
        host.file("/etc/selinux/config").unwrap(),
        "# This file controls the state of SELinux on the system.\n\
         SELINUX=disabled\n\
         SELINUXTYPE=targeted\n"
    );
}

#[test]
fn test_second_run_leaves_selinux_config_unchanged() {
    let config = ProvisionConfig::default();
    let host = stock_host();

    Provisioner::new(&config, &host, &host, Vec::new()).run().unwrap();
    let after_first = host.file("/etc/selinux/config").unwrap();

    Provisioner::new(&config, &host, &host, Vec::new()).run().unwrap();
    assert_eq!(host.file("/etc/selinux/config").unwrap(), after_first);
}

// =============================================================================
// Failure Policy
// =============================================================================

#[test]
fn test_permissive_run_continues_past_every_failure() {
    let config = ProvisionConfig::default();
    let host = stock_host()
        .with_missing_program("systemctl")
        .with_response(
            "cp /root/sallam.jpg /var/www/html/sallam.jpg",
            CommandOutput::failed(1, "cp: cannot stat '/root/sallam.jpg'"),
        );
    let mut console = Vec::new();

    let report = Provisioner::new(&config, &host, &host, &mut console)
        .run()
        .unwrap();

    let failed: Vec<&str> = report.failures.iter().map(|f| f.command.as_str()).collect();
    assert_eq!(
        failed,
        vec![
            "systemctl stop firewalld",
            "systemctl disable firewalld",
            "systemctl start httpd",
            "systemctl enable httpd",
            "cp /root/sallam.jpg /var/www/html/sallam.jpg",
        ]
    );
    assert_eq!(host.journal().len(), 10);
    assert_eq!(report.verification, Some(VerifyOutcome::Mismatch));
}

#[test]
fn test_strict_run_stops_on_failed_install() {
    let config = ProvisionConfig {
        strict: true,
        ..ProvisionConfig::default()
    };
    let host = stock_host().with_response(
        "yum install -y httpd",
        CommandOutput::failed(1, "Error: Unable to find a match: httpd"),
    );
    let mut console = Vec::new();

    let err = Provisioner::new(&config, &host, &host, &mut console)
        .run()
        .unwrap_err();

    assert!(matches!(err, ProvisionError::Command(_)));
    assert!(err.to_string().contains("yum install -y httpd"));
    assert_eq!(host.journal().last().unwrap(), "yum install -y httpd");
    assert!(host.file("/var/www/html/index.html").is_none());

    let output = String::from_utf8(console).unwrap();
    assert!(output.ends_with("Installing httpd...\n"));
}

#[test]
fn test_explicit_policy_overrides_config() {
    let config = ProvisionConfig {
        strict: true,
        ..ProvisionConfig::default()
    };
    let host = stock_host().with_missing_program("setenforce");

    let report = Provisioner::new(&config, &host, &host, Vec::new())
        .with_policy(FailurePolicy::Permissive)
        .run()
        .unwrap();
    assert_eq!(report.failures.len(), 1);
}

// =============================================================================
// Local Filesystem
// =============================================================================

#[test]
fn test_run_against_temporary_directory() {
    let dir = tempdir().unwrap();
    let selinux_config = dir.path().join("selinux-config");
    let document_root = dir.path().join("html");
    fs::create_dir(&document_root).unwrap();
    fs::write(&selinux_config, SELINUX_CONFIG).unwrap();

    let config = ProvisionConfig {
        selinux_config: selinux_config.clone(),
        document_root: document_root.clone(),
        ..ProvisionConfig::default()
    };
    config.validate().unwrap();

    let commands = RecordingHost::new();
    let report = Provisioner::new(&config, &commands, &LocalFiles, Vec::new())
        .run()
        .unwrap();

    let rewritten = fs::read_to_string(&selinux_config).unwrap();
    assert!(rewritten.contains("SELINUX=disabled\n"));
    assert!(!rewritten.contains("SELINUX=enforcing"));

    let page = fs::read_to_string(document_root.join("index.html")).unwrap();
    assert!(page.contains(r#"<img src="sallam.jpg" alt="Sallam Image">"#));

    // Commands went to the fake, writes went to disk
    assert_eq!(commands.journal().len(), 8);
    assert_eq!(report.actions.len(), 10);
}

// =============================================================================
// Dry Run
// =============================================================================

#[test]
fn test_dry_run_touches_nothing_and_reports_every_command() {
    let dir = tempdir().unwrap();
    let selinux_config = dir.path().join("selinux-config");
    let document_root = dir.path().join("html");
    fs::create_dir(&document_root).unwrap();
    fs::write(&selinux_config, SELINUX_CONFIG).unwrap();

    let config = ProvisionConfig {
        selinux_config: selinux_config.clone(),
        document_root: document_root.clone(),
        ..ProvisionConfig::default()
    };
    let runner = DryRunRunner::new(RecordingHost::new());
    let mut console = Vec::new();

    let report = Provisioner::new(&config, &runner, &DryRunFiles, &mut console)
        .run()
        .unwrap();

    assert_eq!(fs::read_to_string(&selinux_config).unwrap(), SELINUX_CONFIG);
    assert!(!document_root.join("index.html").exists());

    // Only the read-only request reached the host
    assert_eq!(
        runner.inner().journal(),
        vec!["curl -s http://intranet.xyz.local"]
    );

    let selinux_write = format!("write {}", selinux_config.display());
    let page_write = format!("write {}", document_root.join("index.html").display());
    let copy = format!(
        "cp /root/sallam.jpg {}",
        document_root.join("sallam.jpg").display()
    );
    assert_eq!(
        report.actions,
        vec![
            "systemctl stop firewalld",
            "systemctl disable firewalld",
            "setenforce 0",
            selinux_write.as_str(),
            "yum install -y httpd",
            "systemctl start httpd",
            "systemctl enable httpd",
            copy.as_str(),
            page_write.as_str(),
            "curl -s http://intranet.xyz.local",
        ]
    );
    assert!(report.failures.is_empty());

    let output = String::from_utf8(console).unwrap();
    assert!(output.contains("index.html created with centered content and image."));
}
